//! Conversions between per-axis indices and row-major flat offsets.
//!
//! The last axis varies fastest. All offsets live in `[0, size)` where `size`
//! is the product of the dimension lengths, which must fit in an `i64`.
//!
//! # Examples
//!
//! ```
//! use hypercube_core::dimension::Dimension;
//! use hypercube_core::index::{from_offset, to_offset};
//!
//! let dims = Dimension::of(&[2, 3, 4]);
//! let offset = to_offset(&dims, &[1, 2, 3]).unwrap();
//! assert_eq!(offset, 23);
//! assert_eq!(from_offset(&dims, offset).unwrap().as_slice(), &[1, 2, 3]);
//! ```

use smallvec::SmallVec;

use crate::dimension::Dimension;
use crate::error::{HypercubeError, HypercubeResult};

/// Index buffer, inline for up to six axes
pub type Indices = SmallVec<[u64; 6]>;

/// Total element count of `dims`, rejecting sizes that do not fit in an `i64`
pub fn size_of(dims: &[Dimension]) -> HypercubeResult<u64> {
    let mut size: u64 = 1;
    for dim in dims {
        size = size
            .checked_mul(dim.length())
            .filter(|&s| s <= i64::MAX as u64)
            .ok_or_else(|| {
                HypercubeError::invalid(format!("dimensions {dims:?} have an unrepresentable size"))
            })?;
    }
    Ok(size)
}

/// Lengths of each dimension
pub fn shape_of(dims: &[Dimension]) -> Indices {
    dims.iter().map(Dimension::length).collect()
}

/// Row-major flat offset of `indices`
pub fn to_offset(dims: &[Dimension], indices: &[u64]) -> HypercubeResult<u64> {
    if indices.len() != dims.len() {
        return Err(HypercubeError::dimensionality(format!(
            "expected {} indices, got {}",
            dims.len(),
            indices.len()
        )));
    }

    let mut offset = 0u64;
    for (axis, (dim, &index)) in dims.iter().zip(indices).enumerate() {
        let length = dim.length();
        if index >= length {
            return Err(HypercubeError::axis_out_of_range(axis, index, length));
        }
        offset = offset * length + index;
    }
    Ok(offset)
}

/// Per-axis indices of a flat offset, range-checked against the cube size
pub fn from_offset(dims: &[Dimension], offset: u64) -> HypercubeResult<Indices> {
    let size = size_of(dims)?;
    if offset >= size {
        return Err(HypercubeError::offset_out_of_range(offset, size));
    }
    let mut indices: Indices = SmallVec::from_elem(0, dims.len());
    unravel(dims, offset, &mut indices);
    Ok(indices)
}

/// Fill `out` with the indices of `offset` without range checks.
///
/// `out.len()` must equal `dims.len()` and `offset` must be below the size.
#[inline]
pub fn unravel(dims: &[Dimension], mut offset: u64, out: &mut [u64]) {
    debug_assert_eq!(out.len(), dims.len());
    for (slot, dim) in out.iter_mut().zip(dims).rev() {
        let length = dim.length();
        *slot = offset % length;
        offset /= length;
    }
}

/// Row-major offset of indices already known to be in range
#[inline]
pub fn ravel(dims: &[Dimension], indices: &[u64]) -> u64 {
    debug_assert_eq!(indices.len(), dims.len());
    dims.iter()
        .zip(indices)
        .fold(0u64, |acc, (dim, &i)| acc * dim.length() + i)
}

/// Fail unless `dimension` is the cube's dimension at `axis`
pub fn dimension_check(dims: &[Dimension], dimension: &Dimension, axis: usize) -> HypercubeResult<()> {
    match dims.get(axis) {
        Some(d) if d == dimension => Ok(()),
        Some(d) => Err(HypercubeError::dimensionality(format!(
            "{dimension:?} does not match axis {axis}, {d:?}"
        ))),
        None => Err(HypercubeError::dimensionality(format!(
            "axis {axis} does not exist in a {}-dimensional cube",
            dims.len()
        ))),
    }
}

/// Validate a bulk transfer of `length` elements starting at `offset`
pub fn check_run(offset: u64, length: usize, size: u64) -> HypercubeResult<()> {
    let end = offset
        .checked_add(length as u64)
        .ok_or_else(|| HypercubeError::invalid("offset plus length overflows"))?;
    if end > size {
        return Err(HypercubeError::offset_out_of_range(end.saturating_sub(1).max(offset), size));
    }
    Ok(())
}
