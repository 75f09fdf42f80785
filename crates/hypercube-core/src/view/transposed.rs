//! Axis permutations: the reversing transpose and arbitrary `permute`.

use smallvec::SmallVec;

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index::{self, Indices};

/// A fixed axis permutation: local axis `i` is wrapped axis `axes[i]`
#[derive(Debug, Clone)]
pub struct Transposition {
    dims: Vec<Dimension>,
    axes: SmallVec<[usize; 6]>,
    /// Only axes of length one change place, so flat offsets are unchanged
    contiguous: bool,
}

impl Transposition {
    /// The permutation reversing every axis
    pub fn reversed(wrapped: &[Dimension]) -> Self {
        Self::build(wrapped, (0..wrapped.len()).rev().collect())
    }

    /// Validate `axes` as a permutation of `wrapped`'s axes
    pub fn new(wrapped: &[Dimension], axes: &[usize]) -> HypercubeResult<Self> {
        if axes.len() != wrapped.len() {
            return Err(HypercubeError::dimensionality(format!(
                "permutation of {} axes applied to a {}-dimensional cube",
                axes.len(),
                wrapped.len()
            )));
        }
        let mut seen: SmallVec<[bool; 6]> = SmallVec::from_elem(false, axes.len());
        for &axis in axes {
            match seen.get_mut(axis) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(HypercubeError::invalid(format!(
                        "{axes:?} is not a permutation of 0..{}",
                        wrapped.len()
                    )))
                }
            }
        }
        Ok(Self::build(wrapped, SmallVec::from_slice(axes)))
    }

    fn build(wrapped: &[Dimension], axes: SmallVec<[usize; 6]>) -> Self {
        let dims = axes.iter().map(|&a| wrapped[a].clone()).collect();
        let mut moved = axes.iter().copied().filter(|&a| wrapped[a].length() > 1);
        let contiguous = match moved.next() {
            None => true,
            Some(first) => moved
                .try_fold(first, |prev, a| (a > prev).then_some(a))
                .is_some(),
        };
        Self {
            dims,
            axes,
            contiguous,
        }
    }

    /// Dimensions as seen through the permutation
    #[inline]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    #[inline]
    fn map_indices(&self, local: &[u64], out: &mut [u64]) {
        for (&l, &axis) in local.iter().zip(&self.axes) {
            out[axis] = l;
        }
    }
}

/// A borrowed, permuted view of another cube.
///
/// This is what a transposed [`Cube`] handle dispatches through; it lives on
/// the stack for the duration of one call.
#[derive(Debug)]
pub struct Transposed<'a, T: Element> {
    wrapped: &'a dyn Hypercube<T>,
    axes: &'a Transposition,
}

impl<'a, T: Element> Transposed<'a, T> {
    pub fn new(wrapped: &'a dyn Hypercube<T>, axes: &'a Transposition) -> Self {
        Self { wrapped, axes }
    }

    fn wrapped_offset(&self, offset: u64) -> u64 {
        if self.axes.contiguous {
            return offset;
        }
        let mut local: Indices = SmallVec::from_elem(0, self.axes.dims.len());
        let mut wrapped: Indices = SmallVec::from_elem(0, self.axes.dims.len());
        index::unravel(&self.axes.dims, offset, &mut local);
        self.axes.map_indices(&local, &mut wrapped);
        index::ravel(self.wrapped.dimensions(), &wrapped)
    }

    fn wrapped_indices(&self, indices: &[u64]) -> HypercubeResult<Indices> {
        index::to_offset(&self.axes.dims, indices)?;
        let mut wrapped: Indices = SmallVec::from_elem(0, indices.len());
        self.axes.map_indices(indices, &mut wrapped);
        Ok(wrapped)
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        let size = self.wrapped.size();
        if offset >= size {
            return Err(HypercubeError::offset_out_of_range(offset, size));
        }
        Ok(())
    }
}

impl<T: Element> Hypercube<T> for Transposed<'_, T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.axes.dims
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        let flags = self.wrapped.flags();
        if self.axes.contiguous {
            flags
        } else {
            flags.with_owndata(false)
        }
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.check_offset(offset)?;
        self.wrapped.read(self.wrapped_offset(offset), access)
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.check_offset(offset)?;
        self.wrapped.write(self.wrapped_offset(offset), value, access)
    }

    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        let wrapped = self.wrapped_indices(indices)?;
        self.wrapped.read_indices(&wrapped, access)
    }

    fn write_indices(&self, indices: &[u64], value: T, access: Access) -> HypercubeResult<()> {
        let wrapped = self.wrapped_indices(indices)?;
        self.wrapped.write_indices(&wrapped, value, access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        if self.axes.contiguous {
            return self.wrapped.flatten_into(src_offset, dst);
        }
        for (i, slot) in dst.iter_mut().enumerate() {
            let offset = self.wrapped_offset(src_offset + i as u64);
            *slot = self.wrapped.read(offset, Access::Ordered)?;
        }
        Ok(())
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        if self.axes.contiguous {
            return self.wrapped.unflatten_from(src, dst_offset);
        }
        for (i, &value) in src.iter().enumerate() {
            let offset = self.wrapped_offset(dst_offset + i as u64);
            self.wrapped.write(offset, value, Access::Ordered)?;
        }
        Ok(())
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(value)
    }
}

/// An owning view applying an arbitrary axis permutation
#[derive(Debug)]
pub struct Permuted<T: Element> {
    wrapped: Cube<T>,
    axes: Transposition,
}

impl<T: Element> Permuted<T> {
    pub fn new(wrapped: Cube<T>, axes: &[usize]) -> HypercubeResult<Self> {
        let axes = Transposition::new(wrapped.dimensions(), axes)?;
        Ok(Self { wrapped, axes })
    }

    #[inline]
    fn view(&self) -> Transposed<'_, T> {
        Transposed::new(&self.wrapped, &self.axes)
    }
}

impl<T: Element> Hypercube<T> for Permuted<T> {
    fn dimensions(&self) -> &[Dimension] {
        self.axes.dimensions()
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        self.view().flags()
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.view().read(offset, access)
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.view().write(offset, value, access)
    }

    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        self.view().read_indices(indices, access)
    }

    fn write_indices(&self, indices: &[u64], value: T, access: Access) -> HypercubeResult<()> {
        self.view().write_indices(indices, value, access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        self.view().flatten_into(src_offset, dst)
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        self.view().unflatten_from(src, dst_offset)
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(value)
    }
}
