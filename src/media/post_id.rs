use super::types::PostReference;
use thiserror::Error;
use tracing::warn;
use url::Url;

const PLATFORM_DOMAINS: [&str; 2] = ["twitter.com", "x.com"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidPostUrl {
    #[error("malformed URL: {0}")]
    Malformed(String),

    #[error("host {0:?} is not a supported platform")]
    UnsupportedHost(String),

    #[error("no segment follows `status` in the path")]
    MissingStatus,

    #[error("post ID {0:?} is not numeric")]
    NonNumericId(String),
}

/// Pulls the post ID out of a `https://x.com/<user>/status/<id>` style URL.
///
/// Returns `None` for anything that does not parse, is not hosted on a known
/// platform domain, or has no numeric segment after `status`. The reason is
/// logged as a warning.
pub fn extract_post_id(url: &str) -> Option<PostReference> {
    match parse_post_id(url) {
        Ok(post) => Some(post),
        Err(e) => {
            warn!("Error extracting post ID from {}: {}", url, e);
            None
        }
    }
}

fn parse_post_id(url: &str) -> Result<PostReference, InvalidPostUrl> {
    let parsed = Url::parse(url.trim()).map_err(|e| InvalidPostUrl::Malformed(e.to_string()))?;

    let host = parsed.host_str().unwrap_or_default();
    if !PLATFORM_DOMAINS.iter().any(|domain| host.contains(domain)) {
        return Err(InvalidPostUrl::UnsupportedHost(host.to_string()));
    }

    let segments: Vec<&str> = parsed.path().split('/').collect();
    let id = segments
        .iter()
        .position(|segment| *segment == "status")
        .and_then(|index| segments.get(index + 1))
        .filter(|id| !id.is_empty())
        .ok_or(InvalidPostUrl::MissingStatus)?;

    PostReference::new(id).ok_or_else(|| InvalidPostUrl::NonNumericId(id.to_string()))
}
