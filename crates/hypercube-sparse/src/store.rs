//! Sparse map-backed storage
//!
//! Only elements that differ from the store's null value occupy memory. Each
//! is kept as `offset -> bit pattern` in a sharded concurrent map, using the
//! fixed-width encoding every element kind provides. Writing the null value
//! (compared bit for bit) removes the entry instead of storing it.

use std::fmt;

use dashmap::DashMap;
use hypercube_core::{
    index, Access, Cube, Dimension, Element, Flags, Hypercube, HypercubeError, HypercubeResult,
};
use tracing::{debug, trace};

use crate::config::SparseConfig;

/// A hypercube storing only its non-null elements
pub struct SparseStore<T: Element> {
    dims: Vec<Dimension>,
    size: u64,
    null_value: T,
    null_bits: u64,
    map: DashMap<u64, u64>,
}

impl<T: Element> SparseStore<T> {
    /// Create a store with the default configuration
    pub fn new(dims: Vec<Dimension>) -> HypercubeResult<Self> {
        Self::with_config(dims, &SparseConfig::default())
    }

    /// Create a store with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the loading factor is NaN, the capacity bounds are
    /// inverted, or the dimensions' size is not representable.
    pub fn with_config(dims: Vec<Dimension>, config: &SparseConfig<T>) -> HypercubeResult<Self> {
        config.validate()?;
        let size = index::size_of(&dims)?;
        let capacity = config.initial_capacity(size);
        debug!(size, capacity, kind = %T::KIND, "created sparse store");
        Ok(Self {
            dims,
            size,
            null_value: config.null_value,
            null_bits: config.null_value.to_bits_u64(),
            map: DashMap::with_capacity(capacity),
        })
    }

    /// Wrap this store in a shareable [`Cube`] handle
    pub fn into_cube(self) -> Cube<T> {
        Cube::new(self)
    }

    /// The value of every element without an explicit entry
    pub fn null_value(&self) -> T {
        self.null_value
    }

    /// Number of explicitly stored elements
    pub fn entry_count(&self) -> usize {
        self.map.len()
    }

    /// Current capacity of the backing map
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Explicitly stored `(offset, value)` pairs in offset order
    pub fn entries(&self) -> Vec<(u64, T)> {
        let mut entries: Vec<(u64, T)> = self
            .map
            .iter()
            .map(|e| (*e.key(), T::from_bits_u64(*e.value())))
            .collect();
        entries.sort_unstable_by_key(|&(offset, _)| offset);
        entries
    }

    #[inline]
    fn load(&self, offset: u64) -> T {
        self.map
            .get(&offset)
            .map_or(self.null_value, |bits| T::from_bits_u64(*bits))
    }

    #[inline]
    fn store(&self, offset: u64, value: T) {
        let bits = value.to_bits_u64();
        if bits == self.null_bits {
            self.map.remove(&offset);
        } else {
            self.map.insert(offset, bits);
        }
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        if offset >= self.size {
            return Err(HypercubeError::offset_out_of_range(offset, self.size));
        }
        Ok(())
    }
}

// The map's shard locks order every access, so weak and ordered access
// behave the same here.
impl<T: Element> Hypercube<T> for SparseStore<T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn flags(&self) -> Flags {
        Flags::VIEW
    }

    fn read(&self, offset: u64, _access: Access) -> HypercubeResult<T> {
        self.check_offset(offset)?;
        Ok(self.load(offset))
    }

    fn write(&self, offset: u64, value: T, _access: Access) -> HypercubeResult<()> {
        self.check_offset(offset)?;
        self.store(offset, value);
        Ok(())
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        trace!(src_offset, len = dst.len(), "sparse flatten");
        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.load(src_offset + i as u64);
        }
        Ok(())
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        trace!(dst_offset, len = src.len(), "sparse unflatten");
        for (i, &value) in src.iter().enumerate() {
            self.store(dst_offset + i as u64, value);
        }
        Ok(())
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.map.clear();
        if value.to_bits_u64() != self.null_bits {
            for offset in 0..self.size {
                self.store(offset, value);
            }
        }
        Ok(())
    }
}

impl<T: Element> fmt::Debug for SparseStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseStore")
            .field("kind", &T::KIND)
            .field("dims", &self.dims)
            .field("null_value", &self.null_value)
            .field("entries", &self.map.len())
            .finish()
    }
}
