pub mod client;
pub mod error;
mod fetch;
mod link;
mod models;
mod walker;

pub use crate::client::{HttpIndexClient, IndexClient};
pub use crate::fetch::HttpFetcher;
pub use crate::link::last_page;
pub use crate::models::{PageResult, Photo, Variant};
pub use crate::walker::{WalkOptions, walk, walk_stream};
