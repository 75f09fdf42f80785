//! The shared handle every caller works with.
//!
//! A [`Cube`] is a cheap, clonable reference to a storage leaf or a view. The
//! transpose of a cube is the same reference-counted node seen with its axes
//! reversed, so `x.transpose().transpose()` is `x` again and no view object is
//! allocated for it.
//!
//! All range and buffer validation happens here, before anything reaches the
//! wrapped implementation, so a failed call never leaves a partial copy
//! behind.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::dimension::{Accessor, Coordinate, Dimension, Roll};
use crate::element::{Access, CastFrom, Element, ElementKind};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index::{self, Indices};
use crate::view::{
    AxisRolled, Casting, FlatRolled, Permuted, ReadOnly, Reshaped, Sliced, Transposed,
    Transposition,
};

/// Elements moved per step by [`Cube::copy_from`]
const COPY_BLOCK: usize = 4096;

struct Node<T: Element> {
    cube: Box<dyn Hypercube<T>>,
    reversed: Transposition,
    size: u64,
}

/// Shared handle to a hypercube
pub struct Cube<T: Element> {
    node: Arc<Node<T>>,
    transposed: bool,
}

impl<T: Element> Clone for Cube<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            transposed: self.transposed,
        }
    }
}

impl<T: Element> Cube<T> {
    /// Wrap a storage leaf or view in a shareable handle
    pub fn new<H: Hypercube<T> + 'static>(cube: H) -> Self {
        let reversed = Transposition::reversed(cube.dimensions());
        let size = cube.size();
        Self {
            node: Arc::new(Node {
                cube: Box::new(cube),
                reversed,
                size,
            }),
            transposed: false,
        }
    }

    #[inline]
    fn with_view<R>(&self, f: impl FnOnce(&dyn Hypercube<T>) -> R) -> R {
        if self.transposed {
            f(&Transposed::new(&*self.node.cube, &self.node.reversed))
        } else {
            f(&*self.node.cube)
        }
    }

    // ---- Shape & metadata ----

    pub fn dimensions(&self) -> &[Dimension] {
        if self.transposed {
            self.node.reversed.dimensions()
        } else {
            self.node.cube.dimensions()
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dimensions().len()
    }

    pub fn shape(&self) -> Indices {
        index::shape_of(self.dimensions())
    }

    /// Length of `axis`, if it exists
    pub fn length(&self, axis: usize) -> Option<u64> {
        self.dimensions().get(axis).map(Dimension::length)
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.node.size
    }

    pub fn dtype(&self) -> ElementKind {
        T::KIND
    }

    pub fn itemsize(&self) -> usize {
        T::KIND.itemsize()
    }

    /// Total element bytes; wide enough for any representable size
    pub fn nbytes(&self) -> u128 {
        u128::from(self.size()) * self.itemsize() as u128
    }

    pub fn flags(&self) -> Flags {
        self.with_view(|c| c.flags())
    }

    /// Whether both handles are the same cube in the same orientation
    pub fn is_same(&self, other: &Cube<T>) -> bool {
        Arc::ptr_eq(&self.node, &other.node) && self.transposed == other.transposed
    }

    /// Whether `other` has the same dimensions (by identity) as this cube
    pub fn matches<U: Element>(&self, other: &Cube<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    pub fn to_offset(&self, indices: &[u64]) -> HypercubeResult<u64> {
        index::to_offset(self.dimensions(), indices)
    }

    pub fn from_offset(&self, offset: u64) -> HypercubeResult<Indices> {
        index::from_offset(self.dimensions(), offset)
    }

    // ---- Element access ----

    pub fn get(&self, indices: &[u64]) -> HypercubeResult<T> {
        self.with_view(|c| c.read_indices(indices, Access::Ordered))
    }

    pub fn set(&self, indices: &[u64], value: T) -> HypercubeResult<()> {
        self.with_view(|c| c.write_indices(indices, value, Access::Ordered))
    }

    pub fn weak_get(&self, indices: &[u64]) -> HypercubeResult<T> {
        self.with_view(|c| c.read_indices(indices, Access::Weak))
    }

    pub fn weak_set(&self, indices: &[u64], value: T) -> HypercubeResult<()> {
        self.with_view(|c| c.write_indices(indices, value, Access::Weak))
    }

    /// Read through coordinates bound to this cube's dimensions
    pub fn get_coords(&self, coords: &[Coordinate]) -> HypercubeResult<T> {
        let indices = self.coordinate_indices(coords)?;
        self.get(&indices)
    }

    pub fn set_coords(&self, coords: &[Coordinate], value: T) -> HypercubeResult<()> {
        let indices = self.coordinate_indices(coords)?;
        self.set(&indices, value)
    }

    fn coordinate_indices(&self, coords: &[Coordinate]) -> HypercubeResult<Indices> {
        let dims = self.dimensions();
        if coords.len() != dims.len() {
            return Err(HypercubeError::dimensionality(format!(
                "expected {} coordinates, got {}",
                dims.len(),
                coords.len()
            )));
        }
        coords
            .iter()
            .enumerate()
            .map(|(axis, c)| index::dimension_check(dims, c.dimension(), axis).map(|_| c.index()))
            .collect()
    }

    pub fn get_at(&self, offset: u64) -> HypercubeResult<T> {
        self.with_view(|c| c.read(offset, Access::Ordered))
    }

    pub fn set_at(&self, offset: u64, value: T) -> HypercubeResult<()> {
        self.with_view(|c| c.write(offset, value, Access::Ordered))
    }

    pub fn weak_get_at(&self, offset: u64) -> HypercubeResult<T> {
        self.with_view(|c| c.read(offset, Access::Weak))
    }

    pub fn weak_set_at(&self, offset: u64, value: T) -> HypercubeResult<()> {
        self.with_view(|c| c.write(offset, value, Access::Weak))
    }

    // ---- Bulk transfer ----

    /// Copy `length` elements starting at flat offset `src_offset` into
    /// `dst[dst_pos..dst_pos + length]`.
    ///
    /// # Errors
    ///
    /// - `NullArgument` if `dst` is empty while `length > 0`
    /// - `InvalidArgument` if the destination range does not fit `dst`
    /// - `OffsetOutOfRange` if the source run leaves `[0, size)`
    pub fn to_flattened(
        &self,
        src_offset: u64,
        dst: &mut [T],
        dst_pos: usize,
        length: usize,
    ) -> HypercubeResult<()> {
        check_buffer("destination", dst.len(), dst_pos, length)?;
        index::check_run(src_offset, length, self.size())?;
        trace!(src_offset, dst_pos, length, "to_flattened");
        if length == 0 {
            return Ok(());
        }
        let dst = &mut dst[dst_pos..dst_pos + length];
        self.with_view(|c| c.flatten_into(src_offset, dst))
    }

    /// Copy `src[src_pos..src_pos + length]` into the run starting at flat
    /// offset `dst_offset`. Errors mirror [`Cube::to_flattened`].
    pub fn from_flattened(
        &self,
        src: &[T],
        src_pos: usize,
        dst_offset: u64,
        length: usize,
    ) -> HypercubeResult<()> {
        check_buffer("source", src.len(), src_pos, length)?;
        index::check_run(dst_offset, length, self.size())?;
        trace!(src_pos, dst_offset, length, "from_flattened");
        if length == 0 {
            return Ok(());
        }
        let src = &src[src_pos..src_pos + length];
        self.with_view(|c| c.unflatten_from(src, dst_offset))
    }

    /// All elements in row-major order
    pub fn flatten(&self) -> HypercubeResult<Vec<T>> {
        let len = usize::try_from(self.size())
            .map_err(|_| HypercubeError::invalid("cube too large to flatten into memory"))?;
        let mut out = vec![T::MISSING; len];
        if len > 0 {
            self.with_view(|c| c.flatten_into(0, &mut out))?;
        }
        Ok(out)
    }

    pub fn fill(&self, value: T) -> HypercubeResult<()> {
        self.with_view(|c| c.fill(value))
    }

    /// Copy every element of `other` into this cube; shapes must agree
    pub fn copy_from(&self, other: &Cube<T>) -> HypercubeResult<()> {
        if self.shape() != other.shape() {
            return Err(HypercubeError::dimensionality(format!(
                "cannot copy shape {:?} into shape {:?}",
                other.shape().as_slice(),
                self.shape().as_slice()
            )));
        }
        let size = self.size();
        let mut buffer = vec![T::MISSING; (size as usize).min(COPY_BLOCK)];
        let mut offset = 0u64;
        while offset < size {
            let n = ((size - offset) as usize).min(COPY_BLOCK);
            other.to_flattened(offset, &mut buffer, 0, n)?;
            self.from_flattened(&buffer, 0, offset, n)?;
            offset += n as u64;
        }
        Ok(())
    }

    // ---- Views ----

    /// A view constrained by one accessor per axis
    pub fn slice(&self, accessors: &[Accessor]) -> HypercubeResult<Cube<T>> {
        Ok(Cube::new(Sliced::new(self.clone(), accessors)?))
    }

    /// A view circularly shifted along each axis with a roll.
    ///
    /// Rolling an axis-rolled view composes into a single roll of the
    /// underlying cube, and a net shift of zero returns that cube itself.
    pub fn roll(&self, rolls: &[Option<Roll>]) -> HypercubeResult<Cube<T>> {
        let dims = self.dimensions();
        if rolls.len() != dims.len() {
            return Err(HypercubeError::dimensionality(format!(
                "expected {} rolls, got {}",
                dims.len(),
                rolls.len()
            )));
        }
        let mut shifts: Indices = SmallVec::from_elem(0, dims.len());
        for (axis, roll) in rolls.iter().enumerate() {
            if let Some(roll) = roll {
                index::dimension_check(dims, roll.dimension(), axis)?;
                shifts[axis] = roll.shift();
            }
        }
        if shifts.iter().all(|&s| s == 0) {
            return Ok(self.clone());
        }

        let (base, shifts) = match self.axis_roll_parts() {
            Some((inner, prior)) => {
                let combined = dims
                    .iter()
                    .zip(prior.iter().zip(&shifts))
                    .map(|(d, (&a, &b))| (a + b) % d.length().max(1))
                    .collect::<Indices>();
                (inner, combined)
            }
            None => (self.clone(), shifts),
        };
        if shifts.iter().all(|&s| s == 0) {
            return Ok(base);
        }
        Ok(Cube::new(AxisRolled::new(base, shifts)))
    }

    /// A view circularly shifted over the flat offset space
    pub fn roll_flat(&self, shift: i64) -> Cube<T> {
        let size = self.size();
        if size == 0 {
            return self.clone();
        }
        let shift = (shift as i128).rem_euclid(size as i128) as u64;
        if shift == 0 {
            return self.clone();
        }
        match self.flat_roll_parts() {
            Some((inner, prior)) => {
                let total = ((prior as u128 + shift as u128) % size as u128) as u64;
                if total == 0 {
                    inner
                } else {
                    Cube::new(FlatRolled::new(inner, total))
                }
            }
            None => Cube::new(FlatRolled::new(self.clone(), shift)),
        }
    }

    fn flat_roll_parts(&self) -> Option<(Cube<T>, u64)> {
        if self.transposed {
            return None;
        }
        self.node
            .cube
            .flat_roll()
            .map(|(inner, shift)| (inner.clone(), shift))
    }

    fn axis_roll_parts(&self) -> Option<(Cube<T>, Indices)> {
        if self.transposed {
            return None;
        }
        self.node
            .cube
            .axis_roll()
            .map(|(inner, shifts)| (inner.clone(), Indices::from_slice(shifts)))
    }

    /// The axis-reversed companion of this cube
    pub fn transpose(&self) -> Cube<T> {
        Self {
            node: Arc::clone(&self.node),
            transposed: !self.transposed,
        }
    }

    /// A view whose axis `i` is this cube's axis `axes[i]`
    pub fn permute(&self, axes: &[usize]) -> HypercubeResult<Cube<T>> {
        let n = self.ndim();
        if axes.iter().copied().eq(0..n) && axes.len() == n {
            return Ok(self.clone());
        }
        if axes.len() == n && axes.iter().copied().eq((0..n).rev()) {
            return Ok(self.transpose());
        }
        Ok(Cube::new(Permuted::new(self.clone(), axes)?))
    }

    /// The same elements seen under new dimensions of equal total size
    pub fn reshape(&self, dimensions: Vec<Dimension>) -> HypercubeResult<Cube<T>> {
        Ok(Cube::new(Reshaped::new(self.clone(), dimensions)?))
    }

    /// A view converting elements to `U` on read and back to `T` on write
    pub fn cast<U>(&self) -> Cube<U>
    where
        U: Element + CastFrom<T>,
        T: CastFrom<U>,
    {
        Cube::new(Casting::<T, U>::new(self.clone()))
    }

    /// A view that rejects every write
    pub fn read_only(&self) -> Cube<T> {
        Cube::new(ReadOnly::new(self.clone()))
    }
}

fn check_buffer(what: &str, buffer_len: usize, pos: usize, length: usize) -> HypercubeResult<()> {
    if length > 0 && buffer_len == 0 {
        return Err(HypercubeError::null(format!("{what} buffer is empty")));
    }
    match pos.checked_add(length) {
        Some(end) if end <= buffer_len => Ok(()),
        _ => Err(HypercubeError::invalid(format!(
            "{what} range [{pos}, {pos}+{length}) exceeds buffer of length {buffer_len}"
        ))),
    }
}

impl<T: Element> Hypercube<T> for Cube<T> {
    fn dimensions(&self) -> &[Dimension] {
        Cube::dimensions(self)
    }

    fn size(&self) -> u64 {
        self.node.size
    }

    fn flags(&self) -> Flags {
        Cube::flags(self)
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.with_view(|c| c.read(offset, access))
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.with_view(|c| c.write(offset, value, access))
    }

    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        self.with_view(|c| c.read_indices(indices, access))
    }

    fn write_indices(&self, indices: &[u64], value: T, access: Access) -> HypercubeResult<()> {
        self.with_view(|c| c.write_indices(indices, value, access))
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        self.with_view(|c| c.flatten_into(src_offset, dst))
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        self.with_view(|c| c.unflatten_from(src, dst_offset))
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        Cube::fill(self, value)
    }
}

impl<T: Element> fmt::Debug for Cube<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cube")
            .field("dtype", &T::KIND)
            .field("shape", &self.shape().as_slice())
            .field("transposed", &self.transposed)
            .field("inner", &self.node.cube)
            .finish()
    }
}
