pub mod backend;
pub mod error;
mod key;

pub use crate::backend::ObjectStore;
pub use crate::key::ObjectKey;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn ObjectStore + Send + Sync>;
