//! Sparse store configuration

use hypercube_core::{Element, HypercubeError, HypercubeResult};
use tracing::warn;

/// Default fraction of the cube expected to hold explicit values
pub const DEFAULT_LOADING: f64 = 0.1;

/// Smallest initial map capacity
pub const DEFAULT_MIN_CAPACITY: usize = 13;

/// Largest initial map capacity by default: the platform's array length
/// limit. The map still grows past any bound on demand.
pub const DEFAULT_MAX_CAPACITY: usize = i32::MAX as usize;

/// A tighter upper bound for cubes whose loading estimate is unreliable;
/// opt in with [`SparseConfig::bounded`]
pub const BOUNDED_MAX_CAPACITY: usize = 1 << 20;

/// Configuration for a [`SparseStore`](crate::SparseStore)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseConfig<T: Element> {
    /// Value of every element not explicitly stored (default: the missing value)
    pub null_value: T,
    /// Expected fraction of explicit elements, used to size the map (default: 0.1)
    pub loading: f64,
    /// Lower bound on the initial capacity (default: 13)
    pub min_capacity: usize,
    /// Upper bound on the initial capacity (default: 2^31 - 1)
    pub max_capacity: usize,
}

impl<T: Element> Default for SparseConfig<T> {
    fn default() -> Self {
        Self {
            null_value: T::MISSING,
            loading: DEFAULT_LOADING,
            min_capacity: DEFAULT_MIN_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl<T: Element> SparseConfig<T> {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the null value
    pub fn null_value(mut self, value: T) -> Self {
        self.null_value = value;
        self
    }

    /// Set the loading factor
    pub fn loading(mut self, loading: f64) -> Self {
        self.loading = loading;
        self
    }

    /// Set the initial capacity bounds
    pub fn capacity_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    /// Cap the initial capacity at [`BOUNDED_MAX_CAPACITY`]
    pub fn bounded(mut self) -> Self {
        self.max_capacity = BOUNDED_MAX_CAPACITY;
        self.min_capacity = self.min_capacity.min(BOUNDED_MAX_CAPACITY);
        self
    }

    pub fn validate(&self) -> HypercubeResult<()> {
        if self.loading.is_nan() {
            return Err(HypercubeError::invalid("loading factor must not be NaN"));
        }
        if self.min_capacity > self.max_capacity {
            return Err(HypercubeError::invalid(format!(
                "min_capacity {} exceeds max_capacity {}",
                self.min_capacity, self.max_capacity
            )));
        }
        Ok(())
    }

    /// Loading factor clamped into `[0, 1]`
    pub fn effective_loading(&self) -> f64 {
        let clamped = self.loading.clamp(0.0, 1.0);
        if clamped != self.loading {
            warn!(loading = self.loading, clamped, "loading factor clamped");
        }
        clamped
    }

    /// Initial map capacity for a cube of `size` elements
    ///
    /// Inverted bounds are taken in order rather than rejected here;
    /// [`validate`](Self::validate) reports them.
    pub fn initial_capacity(&self, size: u64) -> usize {
        let wanted = (size as f64 * self.effective_loading()) as u64;
        let wanted = usize::try_from(wanted).unwrap_or(usize::MAX);
        let low = self.min_capacity.min(self.max_capacity);
        let high = self.min_capacity.max(self.max_capacity);
        wanted.clamp(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SparseConfig::<f64>::default();
        assert!(config.null_value.is_nan());
        assert_eq!(config.loading, 0.1);
        assert_eq!(config.min_capacity, 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_capacity_clamped() {
        let config = SparseConfig::<i32>::default();
        assert_eq!(config.initial_capacity(10), 13);
        assert_eq!(config.initial_capacity(1_000), 100);
        assert_eq!(config.initial_capacity(1 << 40), i32::MAX as usize);
        assert_eq!(config.max_capacity, DEFAULT_MAX_CAPACITY);
    }

    #[test]
    fn test_bounded_capacity() {
        let config = SparseConfig::<f32>::new().bounded();
        assert_eq!(config.initial_capacity(1 << 40), BOUNDED_MAX_CAPACITY);
        assert_eq!(config.initial_capacity(10), 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let config = SparseConfig::<i16>::new().capacity_bounds(100, 10);
        assert!(config.validate().is_err());
        assert_eq!(config.initial_capacity(0), 10);
        assert_eq!(config.initial_capacity(500), 50);
        assert_eq!(config.initial_capacity(1 << 20), 100);
    }

    #[test]
    fn test_loading_clamped() {
        let config = SparseConfig::<i8>::new().loading(3.0);
        assert_eq!(config.effective_loading(), 1.0);
        assert_eq!(config.initial_capacity(50), 50);
        assert_eq!(SparseConfig::<i8>::new().loading(-1.0).initial_capacity(50), 13);
    }

    #[test]
    fn test_nan_loading_rejected() {
        assert!(SparseConfig::<bool>::new().loading(f64::NAN).validate().is_err());
        assert!(SparseConfig::<bool>::new().capacity_bounds(10, 5).validate().is_err());
    }
}
