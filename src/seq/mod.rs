//! The lazy sequence engine
//!
//! This module tree provides the sequence protocol and its combinators:
//! [`core`] holds the protocol and streaming nodes, [`cached`] the
//! eager-when-necessary nodes, [`terminal`] the consuming operations,
//! [`sources`] the concrete adapters and dispatch, and the remaining
//! modules the keyed, string, iterator, async and stream surfaces.

pub mod async_seq;
pub mod cached;
pub mod core;
pub mod iter;
pub mod keyed;
pub mod sources;
pub mod stream;
pub mod string;
pub mod terminal;

// Core protocol and streaming nodes
pub use self::core::{
    default_order, BoxSequence, Compact, Concat, Filtered, FlattenOne, Mapped, Sequence,
    SequenceExt, Skip, Step, Take, ZipAll, Zipped,
};

// Cache-based nodes
pub use self::cached::{
    Counted, FlattenDeep, Grouped, Initial, Intersection, Memoized, Nested, Reversed, Shuffled,
    Sorted, Unique, Without,
};

// Terminal operations
pub use self::terminal::TerminalExt;

// Source adapters and dispatch
pub use self::sources::{
    generate, lazy, range, range_step, range_to, repeat_n, repeat_value, ArraySeq, Generated,
    IntoSequence, ObjectSeq, Repeated, StrSeq,
};

// Keyed and record surfaces
pub use self::keyed::{
    Assign, Defaults, FilterValues, Invert, KeyedExt, Keys, Omit, Pick, Plucked, Record,
    RecordExt, Values, WhereMatches,
};

// String specialization
pub use self::string::{MatchSeq, RegexSplitSeq, SplitSeq};

// Pull iterator surface
pub use self::iter::{
    CharPull, FilterPull, MatchPull, Pull, PullIterator, PullStdIter, RegexSplitPull,
    StrSplitPull,
};

// Async driver
pub use self::async_seq::{AsyncSequence, Scheduler, SeqStream, TokioScheduler};

// Chunked streams
pub use self::stream::{ChunkSource, Lines, StreamSequence, VecChunkSource};
