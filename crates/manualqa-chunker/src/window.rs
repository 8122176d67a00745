//! Fixed-size window chunking with overlap.

use manualqa_core::{ChunkConfig, ChunkError};

/// Fixed-size chunker with configurable overlap.
///
/// Windows are measured in characters. Each window starts `window - overlap`
/// characters after the previous one, so text near a window boundary always
/// appears whole in at least one of the neighboring chunks.
#[derive(Debug, Clone, Copy)]
pub struct WindowChunker {
    config: ChunkConfig,
}

impl WindowChunker {
    /// Create a chunker, validating the configuration.
    ///
    /// `overlap` must be strictly less than `window`, otherwise the window
    /// start would never advance. This is checked once here rather than on
    /// every call.
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        if config.window == 0 {
            return Err(ChunkError::InvalidConfig(
                "window must be greater than zero".to_string(),
            ));
        }
        if config.overlap >= config.window {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap ({}) must be less than window ({})",
                config.overlap, config.window
            )));
        }
        Ok(Self { config })
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> ChunkConfig {
        self.config
    }

    /// Split `text` into an ordered sequence of overlapping windows.
    ///
    /// Empty input yields an empty sequence. The last chunk may be shorter
    /// than the window.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let step = self.config.window - self.config.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total {
            let end = (start + self.config.window).min(total);
            chunks.push(chars[start..end].iter().collect());
            start += step;
        }

        chunks
    }
}

impl Default for WindowChunker {
    fn default() -> Self {
        // The default configuration always satisfies overlap < window.
        Self::new(ChunkConfig::default()).expect("default chunk config is valid")
    }
}
