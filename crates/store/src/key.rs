//! Key derivation from source URLs.
//!
//! Object keys double as filenames on disk and as map keys in memory, so the
//! derivation has to be deterministic across process runs and has to produce
//! something every filesystem will accept as a single path component.

use std::fmt;

/// Storage identifier derived from a source URL.
///
/// Derivation is a structural character substitution (`/` → `_`, `:` → `-`,
/// `?` → `&`), not a hash: the same URL always yields the same key, and the
/// key never contains a path separator. Two sufficiently-crafted URLs *could*
/// collide under this scheme (`a/b` vs `a_b`); inputs here are server-provided
/// rather than adversarial, so that trade-off is acceptable. Swap this for a
/// cryptographic hash of the URL if that ever stops being true.
///
/// # Examples
///
/// ```
/// use darkroom_store::ObjectKey;
///
/// let key = ObjectKey::derive("https://images.example.com/photo/abc123?w=1080");
/// assert_eq!(key.as_str(), "https-__images.example.com_photo_abc123&w=1080");
/// // Same URL, same key. Always.
/// assert_eq!(key, ObjectKey::derive("https://images.example.com/photo/abc123?w=1080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Derive the storage key for a source URL.
    ///
    /// Pure and deterministic; never fails. An empty input produces an empty
    /// key, which every store backend rejects at the point of use.
    pub fn derive(url: impl AsRef<str>) -> Self {
        let key = url
            .as_ref()
            .chars()
            .map(|c| match c {
                '/' => '_',
                ':' => '-',
                '?' => '&',
                other => other,
            })
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/a/b.jpg", "https-__example.com_a_b.jpg")]
    #[case("http://x/y?w=200&h=100", "http-__x_y&w=200&h=100")]
    #[case("no-special-characters", "no-special-characters")]
    #[case("", "")]
    fn test_derivation_substitutions(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(ObjectKey::derive(url).as_str(), expected);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let url = "https://images.example.com/raw/abc?ixid=123&fm=jpg";
        assert_eq!(ObjectKey::derive(url), ObjectKey::derive(url));
    }

    #[test]
    fn test_no_path_separators_survive() {
        let key = ObjectKey::derive("https://a/b/c/d/e.png");
        assert!(!key.as_str().contains('/'));
    }
}
