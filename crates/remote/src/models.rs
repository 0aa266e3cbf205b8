//! Typed records of the remote photo index.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Known size variants of a photo's image renditions.
///
/// The service may grow new tags at any time; anything we don't recognise is
/// skipped at decode time with a warning rather than failing the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Variant {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl Variant {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "raw" => Some(Self::Raw),
            "full" => Some(Self::Full),
            "regular" => Some(Self::Regular),
            "small" => Some(Self::Small),
            "thumb" => Some(Self::Thumb),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Full => "full",
            Self::Regular => "regular",
            Self::Small => "small",
            Self::Thumb => "thumb",
        }
    }
}

/// One item of the remote photo index.
///
/// Identity is the opaque `id`: two records with the same id are the same
/// photo, and the walker deduplicates on it across pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Photo {
    /// Opaque identifier assigned by the service
    pub id: String,
    /// Pixel dimensions of the original upload
    pub width: u32,
    pub height: u32,
    /// Optional caption; frequently null
    #[serde(default)]
    pub description: Option<String>,
    /// URL per recognised size variant
    #[serde(deserialize_with = "variant_urls")]
    pub urls: BTreeMap<Variant, String>,
}

impl Photo {
    /// URL of a specific rendition, if the index carried one.
    pub fn url(&self, variant: Variant) -> Option<&str> {
        self.urls.get(&variant).map(String::as_str)
    }
}

fn variant_urls<'de, D>(deserializer: D) -> Result<BTreeMap<Variant, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut urls = BTreeMap::new();
    for (tag, url) in raw {
        match Variant::from_tag(&tag) {
            Some(variant) => {
                urls.insert(variant, url);
            },
            None => tracing::warn!(tag, "Skipping unrecognised image variant"),
        }
    }
    Ok(urls)
}

/// One decoded page of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The page number that was requested
    pub page: u32,
    /// Last-page number as reported by the server's pagination header, or
    /// `None` when the header was absent or unparsable. Only a `Some` value
    /// is a real signal that the index ends.
    pub last_page: Option<u32>,
    /// Records on this page, in server order
    pub photos: Vec<Photo>,
}

impl PageResult {
    /// Total page count. Falls back to the requested page number when the
    /// server gave no signal — "assume this is the last page", a conservative
    /// default for display purposes rather than a statement of fact.
    pub fn total_pages(&self) -> u32 {
        self.last_page.unwrap_or(self.page)
    }
}
