use serde::Deserialize;
use std::fmt;

/// Numeric post identifier taken from a status URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReference(String);

impl PostReference {
    /// Returns `None` unless `id` is a non-empty run of ASCII digits.
    pub fn new(id: &str) -> Option<Self> {
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(id.to_string()))
        } else {
            None
        }
    }
}

impl fmt::Display for PostReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A downloadable media URL.
pub type MediaLink = String;

/// Body of `GET /2/tweets/{id}` with the media expansion.
#[derive(Debug, Default, Deserialize)]
pub struct MediaQueryResult {
    #[serde(default)]
    pub data: Option<PostData>,
    #[serde(default)]
    pub includes: Option<Includes>,
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

impl MediaQueryResult {
    /// `includes.media`, empty when either level is missing or null.
    pub fn media(&self) -> &[MediaItem] {
        self.includes
            .as_ref()
            .and_then(|includes| includes.media.as_deref())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> &[ApiError] {
        self.errors.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub media: Option<Vec<MediaItem>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct MediaItem {
    #[serde(default)]
    pub media_key: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub variants: Option<Vec<Variant>>,
}

impl MediaItem {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or_default()
    }

    pub fn variants(&self) -> &[Variant] {
        self.variants.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub bit_rate: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Variant {
    pub fn bit_rate(&self) -> u64 {
        self.bit_rate.unwrap_or(0)
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or_default()
    }
}
