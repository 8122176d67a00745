//! Rate-limit-aware embedding adapter.

use async_trait::async_trait;
use manualqa_core::{EmbedError, Embedder, RetryConfig};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::sleep::{Sleeper, TokioSleeper};

/// Adapter that layers retry, backoff, and pacing over an [`Embedder`].
///
/// Each request runs a bounded attempt loop: a rate-limited response waits
/// `backoff` and retries, up to `max_attempts` attempts in total; any other
/// error is surfaced immediately. After a success, the next request through
/// the adapter waits until at least `pacing` has elapsed, which throttles
/// bulk indexing without delaying an isolated query.
///
/// The adapter implements [`Embedder`] itself, so it serves both indexing
/// (one call per chunk) and querying (one call per question) through the
/// same contract as the client it wraps.
pub struct EmbeddingClient {
    inner: Arc<dyn Embedder>,
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
    last_success: Mutex<Option<Instant>>,
}

impl EmbeddingClient {
    /// Create an adapter over `inner` with the given policy.
    pub fn new(inner: Arc<dyn Embedder>, config: RetryConfig) -> Self {
        Self::with_sleeper(inner, config, Arc::new(TokioSleeper))
    }

    /// Create an adapter with an explicit [`Sleeper`] (used by tests).
    pub fn with_sleeper(
        inner: Arc<dyn Embedder>,
        config: RetryConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            inner,
            config,
            sleeper,
            last_success: Mutex::new(None),
        }
    }

    /// Wait out the remainder of the pacing interval since the last success.
    async fn pace(&self) {
        let elapsed = {
            let last = self.last_success.lock().await;
            last.map(|t| t.elapsed())
        };

        if let Some(elapsed) = elapsed {
            if elapsed < self.config.pacing {
                let wait = self.config.pacing - elapsed;
                debug!("Pacing embedding request, waiting {:?}", wait);
                self.sleeper.sleep(wait).await;
            }
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.pace().await;

        let mut attempt = 1u32;
        loop {
            match self.inner.embed(text).await {
                Ok(vector) => {
                    let mut last = self.last_success.lock().await;
                    *last = Some(Instant::now());
                    return Ok(vector);
                }
                Err(EmbedError::RateLimited) if attempt < self.config.max_attempts => {
                    warn!(
                        "Embedding rate limited, waiting {:?} before retry ({}/{})",
                        self.config.backoff, attempt, self.config.max_attempts
                    );
                    self.sleeper.sleep(self.config.backoff).await;
                    attempt += 1;
                }
                Err(EmbedError::RateLimited) => {
                    return Err(EmbedError::RetriesExhausted {
                        attempts: self.config.max_attempts,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
