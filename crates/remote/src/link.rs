//! Pagination `Link` header parsing.
//!
//! The index endpoint reports pagination as comma-separated annotated URLs:
//! `<https://…?page=12>; rel="last", <https://…?page=2>; rel="next"`. The
//! only entry we care about is `rel="last"`, and the only part of it we care
//! about is its `page` query parameter.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(LAST_ENTRY_REGEX, r#"<([^>]*)>\s*;\s*rel="last""#);
regex!(PAGE_PARAM_REGEX, r"[?&]page=(\d+)");

/// Extract the last-page number from a pagination `Link` response header.
///
/// Returns `None` when the header carries no `rel="last"` entry, or that
/// entry's URL has no parsable `page` query parameter.
///
/// # Examples
///
/// ```
/// let header = r#"<https://api.example.com/photos?page=12>; rel="last", <https://api.example.com/photos?page=2>; rel="next""#;
/// assert_eq!(darkroom_remote::last_page(header), Some(12));
/// ```
pub fn last_page(header: &str) -> Option<u32> {
    let url = LAST_ENTRY_REGEX.captures(header)?.get(1)?.as_str();
    let page = PAGE_PARAM_REGEX.captures(url)?.get(1)?.as_str();
    page.parse().ok()
}
