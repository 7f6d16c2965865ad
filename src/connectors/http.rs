//! HTTP chunk source
//!
//! Performs a blocking GET and feeds the response body into a stream
//! sequence one read buffer at a time, so each chunk is the tail of the
//! body received since the previous one. Requires the `http` feature.

use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SeqResult;
use crate::seq::core::Step;
use crate::seq::stream::{ChunkSource, StreamSequence};

/// Configuration for the HTTP chunk source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Read buffer size per chunk, in bytes
    pub chunk_size: usize,
    /// Whole-transfer timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            timeout_ms: 30_000,
        }
    }
}

/// A chunk source backed by an HTTP GET
pub struct HttpChunkSource {
    url: String,
    config: HttpConfig,
}

impl HttpChunkSource {
    pub fn new(url: impl Into<String>) -> Self {
        HttpChunkSource {
            url: url.into(),
            config: HttpConfig::default(),
        }
    }

    pub fn with_config(url: impl Into<String>, config: HttpConfig) -> Self {
        HttpChunkSource {
            url: url.into(),
            config,
        }
    }

    /// Wrap into a stream sequence
    pub fn into_sequence(self) -> StreamSequence<Self> {
        StreamSequence::new(self)
    }
}

impl ChunkSource for HttpChunkSource {
    type Chunk = String;

    fn pump(&self, sink: &mut dyn FnMut(String) -> Step) -> SeqResult<Step> {
        log::debug!("GET {}", self.url);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build();
        let response = agent.get(&self.url).call()?;
        let mut reader = response.into_reader();
        let mut buffer = vec![0u8; self.config.chunk_size];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                return Ok(Step::Continue);
            }
            let chunk = String::from_utf8_lossy(&buffer[..n]).into_owned();
            if sink(chunk).is_stop() {
                // dropping the reader aborts the transfer
                log::debug!("sink stopped HTTP transfer from {}", self.url);
                return Ok(Step::Stop);
            }
        }
    }
}
