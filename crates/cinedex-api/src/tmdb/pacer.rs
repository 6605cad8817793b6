//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default spacing between requests (~40 req/s, TMDB's soft ceiling).
pub(crate) const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces consecutive requests at least `min_interval` apart.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Sleeps until the next request slot opens, then claims it.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let remaining = self.min_interval.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                tracing::trace!(wait_ms = remaining.as_millis(), "pacing TMDB request");
                tokio::time::sleep(remaining).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
