//! lazy-seq - lazy sequence pipelines for Rust
//!
//! A uniform, composable interface over "zero or more consecutive elements"
//! drawn from vectors, key/value collections, strings, generator functions,
//! chunked streams or remote HTTP bodies. Pipelines are assembled without
//! touching source elements; work happens only when a terminal drives the
//! iteration, and only as much as the terminal needs.
//!
//! ```
//! use lazy_seq::{lazy, SequenceExt, TerminalExt};
//!
//! let evens = lazy(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|x, _| x % 2 == 0)
//!     .to_vec();
//! assert_eq!(evens, vec![2, 4, 6]);
//! ```

pub mod connectors;
pub mod error;
pub mod seq;

pub use error::{SeqError, SeqResult};

// Re-export the sequence engine at the crate root
pub use seq::*;
