//! Axis descriptors and the ways an axis can be constrained.
//!
//! A [`Dimension`] is an axis length plus an identity: two dimensions compare
//! equal only if they are clones of the same original. Views use that identity
//! to check that accessors and rolls were built for the cube they are applied
//! to.
//!
//! # Examples
//!
//! ```
//! use hypercube_core::dimension::{Accessor, Dimension};
//!
//! let dims = Dimension::of(&[2, 3]);
//! let rows = &dims[0];
//! let cols = &dims[1];
//!
//! // Fix the first axis, keep every column
//! let accessors = [Accessor::from(rows.at(0).unwrap()), Accessor::All];
//!
//! // Every other column
//! let stride = cols.slice_step(0, 3, 2).unwrap();
//! assert_eq!(stride.len(), 2);
//!
//! // Identity, not length, decides equality
//! assert_ne!(Dimension::new(3), *cols);
//! # let _ = accessors;
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{HypercubeError, HypercubeResult};

static NEXT_DIMENSION_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct DimensionInner {
    id: u64,
    length: u64,
    name: Option<String>,
}

/// An axis of a hypercube
#[derive(Clone)]
pub struct Dimension {
    inner: Arc<DimensionInner>,
}

impl Dimension {
    /// Create a fresh, unnamed dimension
    pub fn new(length: u64) -> Self {
        Self::build(length, None)
    }

    /// Create a fresh dimension with a symbolic name (e.g. "rows", "time")
    pub fn named(name: impl Into<String>, length: u64) -> Self {
        Self::build(length, Some(name.into()))
    }

    /// Create one fresh dimension per length
    pub fn of(lengths: &[u64]) -> Vec<Dimension> {
        lengths.iter().map(|&l| Dimension::new(l)).collect()
    }

    fn build(length: u64, name: Option<String>) -> Self {
        Self {
            inner: Arc::new(DimensionInner {
                id: NEXT_DIMENSION_ID.fetch_add(1, Ordering::Relaxed),
                length,
                name,
            }),
        }
    }

    /// Number of elements along this axis
    #[inline]
    pub fn length(&self) -> u64 {
        self.inner.length
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// A new dimension of `length`, carrying over this one's name
    pub(crate) fn derive(&self, length: u64) -> Dimension {
        Self::build(length, self.inner.name.clone())
    }

    /// Bind a fixed index on this axis
    pub fn at(&self, index: u64) -> HypercubeResult<Coordinate> {
        Coordinate::new(self, index)
    }

    /// Bind the half-open range `[start, end)` on this axis
    pub fn slice(&self, start: u64, end: u64) -> HypercubeResult<Slice> {
        Slice::new(self, start, end, 1)
    }

    /// Bind the strided range `[start, end)` with `step` on this axis
    pub fn slice_step(&self, start: u64, end: u64, step: u64) -> HypercubeResult<Slice> {
        Slice::new(self, start, end, step)
    }

    /// A circular shift along this axis
    pub fn roll(&self, shift: i64) -> Roll {
        Roll::new(self, shift)
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Dimension {}

impl std::hash::Hash for Dimension {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => write!(f, "Dimension({name}#{}: {})", self.inner.id, self.inner.length),
            None => write!(f, "Dimension(#{}: {})", self.inner.id, self.inner.length),
        }
    }
}

/// A single fixed index on a dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    dimension: Dimension,
    index: u64,
}

impl Coordinate {
    pub fn new(dimension: &Dimension, index: u64) -> HypercubeResult<Self> {
        if index >= dimension.length() {
            return Err(HypercubeError::IndexOutOfRange {
                index,
                length: dimension.length(),
            });
        }
        Ok(Self {
            dimension: dimension.clone(),
            index,
        })
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }
}

/// A strided half-open range `[start, end)` on a dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    dimension: Dimension,
    start: u64,
    end: u64,
    step: u64,
}

impl Slice {
    pub fn new(dimension: &Dimension, start: u64, end: u64, step: u64) -> HypercubeResult<Self> {
        if step == 0 {
            return Err(HypercubeError::invalid("slice step must be positive"));
        }
        if start > end || end > dimension.length() {
            return Err(HypercubeError::invalid(format!(
                "slice [{start}, {end}) does not fit {dimension:?}"
            )));
        }
        Ok(Self {
            dimension: dimension.clone(),
            start,
            end,
            step,
        })
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Number of elements selected, `ceil((end - start) / step)`
    #[inline]
    pub fn len(&self) -> u64 {
        (self.end - self.start).div_ceil(self.step)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How one axis of a sliced view is constrained
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Accessor {
    /// A single index; the axis disappears from the view
    Coordinate(Coordinate),
    /// A strided sub-range
    Slice(Slice),
    /// The whole axis
    #[default]
    All,
}

impl Accessor {
    /// The dimension this accessor was bound to, if any
    pub fn dimension(&self) -> Option<&Dimension> {
        match self {
            Accessor::Coordinate(c) => Some(c.dimension()),
            Accessor::Slice(s) => Some(s.dimension()),
            Accessor::All => None,
        }
    }
}

impl From<Coordinate> for Accessor {
    fn from(value: Coordinate) -> Self {
        Accessor::Coordinate(value)
    }
}

impl From<Slice> for Accessor {
    fn from(value: Slice) -> Self {
        Accessor::Slice(value)
    }
}

/// A circular shift along one dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roll {
    dimension: Dimension,
    shift: u64,
}

impl Roll {
    /// Create a roll; `shift` is normalised into `[0, length)`
    pub fn new(dimension: &Dimension, shift: i64) -> Self {
        let length = dimension.length();
        let shift = if length == 0 {
            0
        } else {
            (shift as i128).rem_euclid(length as i128) as u64
        };
        Self {
            dimension: dimension.clone(),
            shift,
        }
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    #[inline]
    pub fn shift(&self) -> u64 {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Dimension::new(4);
        let b = Dimension::new(4);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_slice_len() {
        let d = Dimension::new(10);
        assert_eq!(d.slice(2, 7).unwrap().len(), 5);
        assert_eq!(d.slice_step(0, 10, 3).unwrap().len(), 4);
        assert_eq!(d.slice_step(1, 10, 3).unwrap().len(), 3);
        assert!(d.slice(4, 4).unwrap().is_empty());
    }

    #[test]
    fn test_bad_slices() {
        let d = Dimension::new(5);
        assert!(d.slice(3, 2).is_err());
        assert!(d.slice(0, 6).is_err());
        assert!(d.slice_step(0, 5, 0).is_err());
    }

    #[test]
    fn test_coordinate_bounds() {
        let d = Dimension::new(3);
        assert_eq!(d.at(2).unwrap().index(), 2);
        assert!(d.at(3).is_err());
    }

    #[test]
    fn test_roll_normalises() {
        let d = Dimension::new(5);
        assert_eq!(d.roll(7).shift(), 2);
        assert_eq!(d.roll(-1).shift(), 4);
        assert_eq!(d.roll(-10).shift(), 0);
        assert_eq!(Dimension::new(0).roll(3).shift(), 0);
    }

    #[test]
    fn test_named_debug() {
        let d = Dimension::named("rows", 2);
        assert_eq!(d.name(), Some("rows"));
        assert!(format!("{d:?}").contains("rows"));
        assert_eq!(d.derive(1).name(), Some("rows"));
    }
}
