//! Dense store configuration

use hypercube_core::{HypercubeError, HypercubeResult};

/// Default chunk shift: chunks of 2^30 elements
pub const DEFAULT_CHUNK_SHIFT: u32 = 30;

/// Largest accepted chunk shift
pub const MAX_CHUNK_SHIFT: u32 = 62;

/// When chunk memory is allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Allocation {
    /// Every chunk is allocated at construction
    #[default]
    Eager,
    /// A chunk is allocated by the first write that touches it
    Lazy,
}

/// Configuration for a [`DenseStore`](crate::DenseStore)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseConfig {
    /// Chunks hold `2^chunk_shift` elements (default: 30)
    pub chunk_shift: u32,
    /// Chunk allocation policy (default: eager)
    pub allocation: Allocation,
}

impl Default for DenseConfig {
    fn default() -> Self {
        Self {
            chunk_shift: DEFAULT_CHUNK_SHIFT,
            allocation: Allocation::Eager,
        }
    }
}

impl DenseConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk shift
    pub fn chunk_shift(mut self, shift: u32) -> Self {
        self.chunk_shift = shift;
        self
    }

    /// Set the allocation policy
    pub fn allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }

    /// Shorthand for `allocation(Allocation::Lazy)`
    pub fn lazy(self) -> Self {
        self.allocation(Allocation::Lazy)
    }

    /// Elements per chunk
    pub fn chunk_capacity(&self) -> u64 {
        1u64 << self.chunk_shift.min(MAX_CHUNK_SHIFT)
    }

    pub fn validate(&self) -> HypercubeResult<()> {
        if !(1..=MAX_CHUNK_SHIFT).contains(&self.chunk_shift) {
            return Err(HypercubeError::invalid(format!(
                "chunk_shift must be in 1..={MAX_CHUNK_SHIFT}, got {}",
                self.chunk_shift
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DenseConfig::default();
        assert_eq!(config.chunk_shift, 30);
        assert_eq!(config.allocation, Allocation::Eager);
        assert_eq!(config.chunk_capacity(), 1 << 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DenseConfig::new().chunk_shift(4).lazy();
        assert_eq!(config.chunk_capacity(), 16);
        assert_eq!(config.allocation, Allocation::Lazy);
    }

    #[test]
    fn test_validate_rejects_bad_shift() {
        assert!(DenseConfig::new().chunk_shift(0).validate().is_err());
        assert!(DenseConfig::new().chunk_shift(63).validate().is_err());
        assert!(DenseConfig::new().chunk_shift(62).validate().is_ok());
    }
}
