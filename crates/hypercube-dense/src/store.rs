//! Dense chunked storage
//!
//! Elements live in atomic cells grouped into fixed-size chunks (see
//! [`ChunkLayout`]). A chunk is published at most once through a
//! [`OnceLock`]: with lazy allocation, concurrent first writers race to
//! initialise it and all of them end up writing into the single winner.
//! Until then the chunk reads as the element's missing value.

use std::fmt;
use std::sync::atomic::{fence, Ordering};
use std::sync::OnceLock;

use hypercube_core::{
    index, Access, AtomicElement, Cube, Dimension, Element, Flags, Hypercube, HypercubeError,
    HypercubeResult,
};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::chunk::ChunkLayout;
use crate::config::{Allocation, DenseConfig};

type Chunk<T> = Box<[<T as Element>::Atomic]>;

/// A dense hypercube backed by chunked atomic cells
pub struct DenseStore<T: Element> {
    dims: Vec<Dimension>,
    layout: ChunkLayout,
    chunks: Box<[OnceLock<Chunk<T>>]>,
}

impl<T: Element> DenseStore<T> {
    /// Create a store with the default configuration
    pub fn new(dims: Vec<Dimension>) -> HypercubeResult<Self> {
        Self::with_config(dims, &DenseConfig::default())
    }

    /// Create a store with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the dimensions'
    /// size is not representable.
    pub fn with_config(dims: Vec<Dimension>, config: &DenseConfig) -> HypercubeResult<Self> {
        config.validate()?;
        let size = index::size_of(&dims)?;
        let layout = ChunkLayout::new(size, config.chunk_shift)?;
        let chunks = (0..layout.chunk_count()).map(|_| OnceLock::new()).collect();
        let store = Self {
            dims,
            layout,
            chunks,
        };
        if config.allocation == Allocation::Eager {
            store.allocate_all();
        }
        debug!(
            size,
            chunks = layout.chunk_count(),
            chunk_shift = layout.shift(),
            allocation = ?config.allocation,
            kind = %T::KIND,
            "created dense store"
        );
        Ok(store)
    }

    /// Create a store holding `values` in row-major order
    pub fn from_elements(dims: Vec<Dimension>, values: Vec<T>) -> HypercubeResult<Self> {
        Self::from_elements_with_config(dims, values, &DenseConfig::default())
    }

    pub fn from_elements_with_config(
        dims: Vec<Dimension>,
        values: Vec<T>,
        config: &DenseConfig,
    ) -> HypercubeResult<Self> {
        let size = index::size_of(&dims)?;
        if values.len() as u64 != size {
            return Err(HypercubeError::invalid(format!(
                "{} values given for a cube of size {size}",
                values.len()
            )));
        }
        let store = Self::with_config(dims, &config.clone().lazy())?;
        store.unflatten_from(&values, 0)?;
        if config.allocation == Allocation::Eager {
            store.allocate_all();
        }
        Ok(store)
    }

    /// Wrap this store in a shareable [`Cube`] handle
    pub fn into_cube(self) -> Cube<T> {
        Cube::new(self)
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Number of chunks that have been allocated so far
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.get().is_some()).count()
    }

    #[inline]
    fn chunk(&self, chunk: usize) -> Option<&[T::Atomic]> {
        self.chunks[chunk].get().map(|c| &**c)
    }

    #[inline]
    fn chunk_or_alloc(&self, chunk: usize) -> &[T::Atomic] {
        self.chunks[chunk].get_or_init(|| {
            let len = self.layout.chunk_len(chunk);
            debug!(chunk, len, "allocating dense chunk");
            (0..len).map(|_| T::Atomic::new(T::MISSING)).collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn allocate_all(&self) {
        for chunk in 0..self.chunks.len() {
            self.chunk_or_alloc(chunk);
        }
    }

    #[cfg(feature = "parallel")]
    fn allocate_all(&self) {
        (0..self.chunks.len()).into_par_iter().for_each(|chunk| {
            self.chunk_or_alloc(chunk);
        });
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        if offset >= self.layout.size() {
            return Err(HypercubeError::offset_out_of_range(offset, self.layout.size()));
        }
        Ok(())
    }

    fn fill_chunk(&self, chunk: usize, value: T) {
        for cell in self.chunk_or_alloc(chunk) {
            cell.store(value, Ordering::Relaxed);
        }
    }
}

impl<T: Element> Hypercube<T> for DenseStore<T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.layout.size()
    }

    fn flags(&self) -> Flags {
        Flags::OWNED_CONTIGUOUS
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.check_offset(offset)?;
        let (chunk, at) = self.layout.locate(offset);
        Ok(match self.chunk(chunk) {
            Some(cells) => cells[at].load(access.load_ordering()),
            None => T::MISSING,
        })
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.check_offset(offset)?;
        let (chunk, at) = self.layout.locate(offset);
        self.chunk_or_alloc(chunk)[at].store(value, access.store_ordering());
        Ok(())
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        trace!(src_offset, len = dst.len(), "dense flatten");
        for span in self.layout.spans(src_offset, dst.len()) {
            let out = &mut dst[span.pos..span.pos + span.len];
            match self.chunk(span.chunk) {
                Some(cells) => {
                    for (slot, cell) in out.iter_mut().zip(&cells[span.start..span.start + span.len]) {
                        *slot = cell.load(Ordering::Relaxed);
                    }
                }
                None => out.fill(T::MISSING),
            }
        }
        fence(Ordering::Acquire);
        Ok(())
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        trace!(dst_offset, len = src.len(), "dense unflatten");
        fence(Ordering::Release);
        for span in self.layout.spans(dst_offset, src.len()) {
            let cells = &self.chunk_or_alloc(span.chunk)[span.start..span.start + span.len];
            for (cell, &value) in cells.iter().zip(&src[span.pos..span.pos + span.len]) {
                cell.store(value, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn fill(&self, value: T) -> HypercubeResult<()> {
        fence(Ordering::Release);
        for chunk in 0..self.chunks.len() {
            self.fill_chunk(chunk, value);
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn fill(&self, value: T) -> HypercubeResult<()> {
        fence(Ordering::Release);
        (0..self.chunks.len())
            .into_par_iter()
            .for_each(|chunk| self.fill_chunk(chunk, value));
        Ok(())
    }
}

impl<T: Element> fmt::Debug for DenseStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseStore")
            .field("kind", &T::KIND)
            .field("dims", &self.dims)
            .field("chunk_shift", &self.layout.shift())
            .field("chunks", &self.layout.chunk_count())
            .field("allocated", &self.allocated_chunks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_chunks() -> DenseConfig {
        DenseConfig::new().chunk_shift(2)
    }

    #[test]
    fn test_get_set() {
        let cube = DenseStore::<i32>::new(Dimension::of(&[2, 3])).unwrap().into_cube();
        assert_eq!(cube.get(&[1, 2]).unwrap(), 0);
        cube.set(&[1, 2], 42).unwrap();
        assert_eq!(cube.get(&[1, 2]).unwrap(), 42);
        assert_eq!(cube.get_at(5).unwrap(), 42);
        assert!(cube.get_at(6).is_err());
        assert!(cube.set(&[2, 0], 1).is_err());
    }

    #[test]
    fn test_float_default_is_nan() {
        let cube = DenseStore::<f64>::new(Dimension::of(&[3])).unwrap().into_cube();
        assert!(cube.get_at(0).unwrap().is_nan());
    }

    #[test]
    fn test_lazy_chunks_read_missing() {
        let store = DenseStore::<f32>::with_config(Dimension::of(&[10]), &small_chunks().lazy()).unwrap();
        assert_eq!(store.allocated_chunks(), 0);
        assert!(store.read(9, Access::Ordered).unwrap().is_nan());

        store.write(5, 1.5, Access::Ordered).unwrap();
        assert_eq!(store.allocated_chunks(), 1);

        let mut out = [0.0f32; 10];
        store.flatten_into(0, &mut out).unwrap();
        assert!(out[0].is_nan() && out[9].is_nan());
        assert_eq!(out[5], 1.5);
        assert_eq!(store.allocated_chunks(), 1);
    }

    #[test]
    fn test_eager_allocates_everything() {
        let store = DenseStore::<i8>::with_config(Dimension::of(&[10]), &small_chunks()).unwrap();
        assert_eq!(store.allocated_chunks(), 3);
    }

    #[test]
    fn test_fill_allocates() {
        let store = DenseStore::<bool>::with_config(Dimension::of(&[9]), &small_chunks().lazy()).unwrap();
        store.fill(true).unwrap();
        assert_eq!(store.allocated_chunks(), 3);
        let cube = store.into_cube();
        assert_eq!(cube.flatten().unwrap(), vec![true; 9]);
    }

    #[test]
    fn test_bulk_across_chunk_boundaries() {
        let values: Vec<i64> = (0..23).collect();
        let store =
            DenseStore::from_elements_with_config(Dimension::of(&[23]), values.clone(), &small_chunks())
                .unwrap();
        let cube = store.into_cube();

        let mut out = vec![-1i64; 11];
        cube.to_flattened(3, &mut out, 1, 10).unwrap();
        assert_eq!(out[0], -1);
        assert_eq!(&out[1..], &values[3..13]);
    }

    #[test]
    fn test_from_elements_length_mismatch() {
        let err = DenseStore::from_elements(Dimension::of(&[2, 2]), vec![1i16, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), hypercube_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_weak_access() {
        let cube = DenseStore::<i64>::new(Dimension::of(&[4])).unwrap().into_cube();
        cube.weak_set_at(2, 7).unwrap();
        assert_eq!(cube.weak_get_at(2).unwrap(), 7);
        cube.weak_set(&[3], 8).unwrap();
        assert_eq!(cube.weak_get(&[3]).unwrap(), 8);
    }

    #[test]
    fn test_flags() {
        let cube = DenseStore::<i64>::new(Dimension::of(&[4])).unwrap().into_cube();
        assert_eq!(cube.flags(), Flags::OWNED_CONTIGUOUS);
    }
}
