//! Chunked stream sequences
//!
//! A [`ChunkSource`] pushes chunks (typically string fragments of a larger
//! transfer) into a sink until the transfer ends, the sink stops it, or the
//! transport fails. [`StreamSequence`] gives that the sequence surface;
//! unlike the synchronous core it is fallible, because transport errors
//! propagate as-is.

use crate::error::SeqResult;

use super::core::Step;

/// Push-driven producer of chunks. `pump` must stop promptly (and abort the
/// underlying transfer) when the sink returns [`Step::Stop`], and must
/// report that stop in its result.
pub trait ChunkSource {
    type Chunk;

    fn pump(&self, sink: &mut dyn FnMut(Self::Chunk) -> Step) -> SeqResult<Step>;
}

/// Sequence surface over a chunk source
pub struct StreamSequence<S> {
    source: S,
}

impl<S: ChunkSource> StreamSequence<S> {
    pub fn new(source: S) -> Self {
        StreamSequence { source }
    }

    /// Visit every chunk in arrival order
    pub fn each(&self, f: &mut dyn FnMut(S::Chunk, usize) -> Step) -> SeqResult<Step> {
        let mut i = 0usize;
        self.source.pump(&mut |chunk| {
            let step = f(chunk, i);
            i += 1;
            step
        })
    }

    /// Collect every chunk
    pub fn to_vec(&self) -> SeqResult<Vec<S::Chunk>> {
        let mut chunks = Vec::new();
        self.each(&mut |chunk, _| {
            chunks.push(chunk);
            Step::Continue
        })?;
        Ok(chunks)
    }

    /// Split each chunk on newline and emit the segments flat.
    ///
    /// Chunks are split independently: a line spanning a chunk boundary
    /// comes out as two lines, and a chunk ending in a newline produces a
    /// trailing empty segment. This is a known limitation of splitting
    /// per-chunk; callers needing exact line reassembly must buffer chunks
    /// themselves.
    pub fn lines(self) -> Lines<S>
    where
        S: ChunkSource<Chunk = String>,
    {
        Lines {
            source: self.source,
        }
    }
}

/// Per-chunk newline split of a string chunk source
pub struct Lines<S> {
    source: S,
}

impl<S: ChunkSource<Chunk = String>> Lines<S> {
    /// Visit every line segment in arrival order
    pub fn each(&self, f: &mut dyn FnMut(String, usize) -> Step) -> SeqResult<Step> {
        let mut i = 0usize;
        self.source.pump(&mut |chunk| {
            for line in chunk.split('\n') {
                let step = f(line.to_string(), i);
                i += 1;
                if step.is_stop() {
                    return Step::Stop;
                }
            }
            Step::Continue
        })
    }

    /// Collect every line segment
    pub fn to_vec(&self) -> SeqResult<Vec<String>> {
        let mut lines = Vec::new();
        self.each(&mut |line, _| {
            lines.push(line);
            Step::Continue
        })?;
        Ok(lines)
    }
}

/// Chunk source replaying a fixed chunk list; the test double for stream
/// sequences
pub struct VecChunkSource<C> {
    chunks: Vec<C>,
}

impl<C> VecChunkSource<C> {
    pub fn new(chunks: Vec<C>) -> Self {
        VecChunkSource { chunks }
    }
}

impl<C: Clone> ChunkSource for VecChunkSource<C> {
    type Chunk = C;

    fn pump(&self, sink: &mut dyn FnMut(C) -> Step) -> SeqResult<Step> {
        for chunk in &self.chunks {
            if sink(chunk.clone()).is_stop() {
                return Ok(Step::Stop);
            }
        }
        Ok(Step::Continue)
    }
}
