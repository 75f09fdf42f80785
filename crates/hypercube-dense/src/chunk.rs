//! Chunk layout for dense storage
//!
//! A dense store of `size` elements is split into `ceil(size / 2^shift)`
//! chunks. Every chunk but the last holds exactly `2^shift` elements; the last
//! holds the remainder, so the chunks tile `[0, size)` with no slack.
//!
//! # Example
//!
//! ```
//! use hypercube_dense::chunk::ChunkLayout;
//!
//! // 10 elements in chunks of 4: [0..4) [4..8) [8..10)
//! let layout = ChunkLayout::new(10, 2).unwrap();
//! assert_eq!(layout.chunk_count(), 3);
//! assert_eq!(layout.chunk_len(2), 2);
//! assert_eq!(layout.locate(9), (2, 1));
//!
//! // A run from offset 3 of length 6 touches all three chunks
//! let spans: Vec<_> = layout.spans(3, 6).collect();
//! assert_eq!(spans.len(), 3);
//! assert_eq!((spans[1].chunk, spans[1].start, spans[1].len), (1, 0, 4));
//! ```

use hypercube_core::{HypercubeError, HypercubeResult};

use crate::config::MAX_CHUNK_SHIFT;

/// How flat offsets map onto chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    size: u64,
    shift: u32,
    mask: u64,
    count: usize,
    tail_len: usize,
}

impl ChunkLayout {
    /// Lay out `size` elements in chunks of `2^shift`
    ///
    /// # Errors
    ///
    /// Returns an error if `shift` is outside `1..=62`, or if the chunk count
    /// or a single chunk's length does not fit in `usize`.
    pub fn new(size: u64, shift: u32) -> HypercubeResult<Self> {
        if !(1..=MAX_CHUNK_SHIFT).contains(&shift) {
            return Err(HypercubeError::invalid(format!(
                "chunk shift {shift} outside 1..={MAX_CHUNK_SHIFT}"
            )));
        }
        let capacity = 1u64 << shift;
        let too_big = || HypercubeError::invalid(format!("{size} elements cannot be addressed in memory"));
        let count = usize::try_from(size.div_ceil(capacity)).map_err(|_| too_big())?;
        usize::try_from(capacity.min(size)).map_err(|_| too_big())?;
        let tail_len = match count {
            0 => 0,
            n => (size - (n as u64 - 1) * capacity) as usize,
        };
        Ok(Self {
            size,
            shift,
            mask: capacity - 1,
            count,
            tail_len,
        })
    }

    /// Total number of elements laid out
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Elements in every chunk but the last
    #[inline]
    pub fn chunk_capacity(&self) -> u64 {
        self.mask + 1
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.count
    }

    /// Length of chunk `chunk`
    #[inline]
    pub fn chunk_len(&self, chunk: usize) -> usize {
        if chunk + 1 == self.count {
            self.tail_len
        } else {
            self.chunk_capacity() as usize
        }
    }

    /// `(chunk, position within chunk)` of an in-range offset
    #[inline]
    pub fn locate(&self, offset: u64) -> (usize, usize) {
        ((offset >> self.shift) as usize, (offset & self.mask) as usize)
    }

    /// Split the run `[offset, offset + len)` at every chunk boundary
    pub fn spans(&self, offset: u64, len: usize) -> Spans {
        Spans {
            layout: *self,
            offset,
            done: 0,
            len,
        }
    }
}

/// The part of a run that falls inside one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// Chunk index
    pub chunk: usize,
    /// First position within the chunk
    pub start: usize,
    /// Number of elements
    pub len: usize,
    /// Position of this span within the whole run
    pub pos: usize,
}

/// Iterator over the [`ChunkSpan`]s of a run
#[derive(Debug, Clone)]
pub struct Spans {
    layout: ChunkLayout,
    offset: u64,
    done: usize,
    len: usize,
}

impl Iterator for Spans {
    type Item = ChunkSpan;

    fn next(&mut self) -> Option<ChunkSpan> {
        if self.done >= self.len {
            return None;
        }
        let (chunk, start) = self.layout.locate(self.offset + self.done as u64);
        let room = self.layout.chunk_len(chunk) - start;
        let len = room.min(self.len - self.done);
        let span = ChunkSpan {
            chunk,
            start,
            len,
            pos: self.done,
        };
        self.done += len;
        Some(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tiling() {
        let layout = ChunkLayout::new(16, 2).unwrap();
        assert_eq!(layout.chunk_count(), 4);
        assert_eq!(layout.chunk_len(3), 4);

        let layout = ChunkLayout::new(17, 2).unwrap();
        assert_eq!(layout.chunk_count(), 5);
        assert_eq!(layout.chunk_len(4), 1);

        let total: usize = (0..layout.chunk_count()).map(|c| layout.chunk_len(c)).sum();
        assert_eq!(total, 17);
    }

    #[test]
    fn test_empty_layout() {
        let layout = ChunkLayout::new(0, 30).unwrap();
        assert_eq!(layout.chunk_count(), 0);
        assert_eq!(layout.spans(0, 0).count(), 0);
    }

    #[test]
    fn test_single_small_chunk() {
        let layout = ChunkLayout::new(6, 30).unwrap();
        assert_eq!(layout.chunk_count(), 1);
        assert_eq!(layout.chunk_len(0), 6);
        assert_eq!(layout.locate(5), (0, 5));
    }

    #[test]
    fn test_spans_cover_run() {
        let layout = ChunkLayout::new(20, 3).unwrap();
        let spans: Vec<_> = layout.spans(5, 12).collect();
        assert_eq!(
            spans,
            vec![
                ChunkSpan { chunk: 0, start: 5, len: 3, pos: 0 },
                ChunkSpan { chunk: 1, start: 0, len: 8, pos: 3 },
                ChunkSpan { chunk: 2, start: 0, len: 1, pos: 11 },
            ]
        );
    }

    #[test]
    fn test_bad_shift() {
        assert!(ChunkLayout::new(10, 0).is_err());
        assert!(ChunkLayout::new(10, 63).is_err());
    }
}
