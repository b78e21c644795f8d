mod fetcher;
mod links;
mod post_id;
mod transport;
mod types;

pub use fetcher::{FetchFailure, MediaFetcher, RetryPolicy, TokenPool, API_BASE_URL};
pub use links::extract_links;
pub use post_id::extract_post_id;
pub use transport::{ReqwestTransport, TokioSleeper};
pub use types::MediaLink;

use tracing::{info, warn};

/// Terminal result of one grab.
#[derive(Debug, PartialEq, Eq)]
pub enum GrabOutcome {
    Links(Vec<MediaLink>),
    NoMedia,
    InvalidUrl,
    FetchFailed(FetchFailure),
}

/// URL in, media links out.
pub struct MediaGrabber {
    fetcher: MediaFetcher,
}

impl MediaGrabber {
    pub fn new(fetcher: MediaFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn grab(&self, url: &str) -> GrabOutcome {
        info!("Starting grab for URL: {}", url);

        let Some(post) = extract_post_id(url) else {
            warn!("Not a post URL: {}", url);
            return GrabOutcome::InvalidUrl;
        };
        info!("Extracted post ID: {}", post);

        let response = match self.fetcher.fetch(&post).await {
            Ok(response) => response,
            Err(failure) => return GrabOutcome::FetchFailed(failure),
        };

        let links = extract_links(&response);
        if links.is_empty() {
            GrabOutcome::NoMedia
        } else {
            info!("Found {} media links for post {}", links.len(), post);
            GrabOutcome::Links(links)
        }
    }
}
