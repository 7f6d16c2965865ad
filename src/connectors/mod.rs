//! Input connectors feeding chunked stream sequences

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpChunkSource, HttpConfig};
