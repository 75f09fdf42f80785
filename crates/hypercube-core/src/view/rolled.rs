//! Circular shifts, over the flat offset space or per axis.
//!
//! Both follow numpy's `roll`: the element at local position `p` comes from
//! wrapped position `p - shift`, modulo the extent being rolled. Rolls of
//! rolls are collapsed by [`Cube::roll`] and [`Cube::roll_flat`], so a view
//! never wraps a roll of the same kind.

use smallvec::SmallVec;

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index::{self, Indices};

#[inline]
fn unroll(local: u64, shift: u64, extent: u64) -> u64 {
    if local >= shift {
        local - shift
    } else {
        local + extent - shift
    }
}

/// A view shifted circularly over its flat offsets
#[derive(Debug)]
pub struct FlatRolled<T: Element> {
    wrapped: Cube<T>,
    shift: u64,
}

impl<T: Element> FlatRolled<T> {
    /// `shift` must already be reduced into `[1, size)`
    pub(crate) fn new(wrapped: Cube<T>, shift: u64) -> Self {
        debug_assert!(shift > 0 && shift < wrapped.size());
        Self { wrapped, shift }
    }

    pub fn shift(&self) -> u64 {
        self.shift
    }

    #[inline]
    fn wrapped_offset(&self, offset: u64) -> u64 {
        unroll(offset, self.shift, self.wrapped.size())
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        let size = self.wrapped.size();
        if offset >= size {
            return Err(HypercubeError::offset_out_of_range(offset, size));
        }
        Ok(())
    }

    /// The local run splits at most once, where it crosses `shift`
    fn split(&self, offset: u64, len: usize) -> usize {
        let end = offset + len as u64;
        if offset < self.shift && end > self.shift {
            (self.shift - offset) as usize
        } else {
            len
        }
    }
}

impl<T: Element> Hypercube<T> for FlatRolled<T> {
    fn dimensions(&self) -> &[Dimension] {
        self.wrapped.dimensions()
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        Flags::VIEW
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.check_offset(offset)?;
        self.wrapped.read(self.wrapped_offset(offset), access)
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.check_offset(offset)?;
        self.wrapped.write(self.wrapped_offset(offset), value, access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        if dst.is_empty() {
            return Ok(());
        }
        let head = self.split(src_offset, dst.len());
        let (first, second) = dst.split_at_mut(head);
        self.wrapped
            .flatten_into(self.wrapped_offset(src_offset), first)?;
        if !second.is_empty() {
            self.wrapped.flatten_into(0, second)?;
        }
        Ok(())
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        if src.is_empty() {
            return Ok(());
        }
        let head = self.split(dst_offset, src.len());
        let (first, second) = src.split_at(head);
        self.wrapped
            .unflatten_from(first, self.wrapped_offset(dst_offset))?;
        if !second.is_empty() {
            self.wrapped.unflatten_from(second, 0)?;
        }
        Ok(())
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(value)
    }

    fn flat_roll(&self) -> Option<(&Cube<T>, u64)> {
        Some((&self.wrapped, self.shift))
    }
}

/// A view shifted circularly along each axis independently
#[derive(Debug)]
pub struct AxisRolled<T: Element> {
    wrapped: Cube<T>,
    shifts: Indices,
}

impl<T: Element> AxisRolled<T> {
    /// `shifts[a]` must already be reduced into `[0, length(a))`
    pub(crate) fn new(wrapped: Cube<T>, shifts: Indices) -> Self {
        debug_assert_eq!(shifts.len(), wrapped.ndim());
        Self { wrapped, shifts }
    }

    pub fn shifts(&self) -> &[u64] {
        &self.shifts
    }

    fn map_indices(&self, local: &[u64], out: &mut [u64]) {
        let dims = self.wrapped.dimensions();
        for (((slot, &l), &s), d) in out.iter_mut().zip(local).zip(&self.shifts).zip(dims) {
            *slot = unroll(l, s, d.length());
        }
    }

    fn wrapped_offset(&self, offset: u64) -> u64 {
        let dims = self.wrapped.dimensions();
        let mut local: Indices = SmallVec::from_elem(0, dims.len());
        let mut wrapped: Indices = SmallVec::from_elem(0, dims.len());
        index::unravel(dims, offset, &mut local);
        self.map_indices(&local, &mut wrapped);
        index::ravel(dims, &wrapped)
    }

    fn wrapped_indices(&self, indices: &[u64]) -> HypercubeResult<Indices> {
        index::to_offset(self.wrapped.dimensions(), indices)?;
        let mut wrapped: Indices = SmallVec::from_elem(0, indices.len());
        self.map_indices(indices, &mut wrapped);
        Ok(wrapped)
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        let size = self.wrapped.size();
        if offset >= size {
            return Err(HypercubeError::offset_out_of_range(offset, size));
        }
        Ok(())
    }

    /// Walk `[offset, offset + len)` in runs along the last axis, split where
    /// either the local row ends or the wrapped index wraps around.
    fn for_each_run(
        &self,
        offset: u64,
        len: usize,
        mut f: impl FnMut(u64, usize, usize) -> HypercubeResult<()>,
    ) -> HypercubeResult<()> {
        let dims = self.wrapped.dimensions();
        let Some(last) = dims.last().map(Dimension::length) else {
            return f(offset, 0, len);
        };
        let mut local: Indices = SmallVec::from_elem(0, dims.len());
        let mut wrapped: Indices = SmallVec::from_elem(0, dims.len());
        let mut pos = 0usize;
        while pos < len {
            index::unravel(dims, offset + pos as u64, &mut local);
            self.map_indices(&local, &mut wrapped);
            let row_left = last - local[dims.len() - 1];
            let wrap_left = last - wrapped[dims.len() - 1];
            let run = ((len - pos) as u64).min(row_left).min(wrap_left) as usize;
            f(index::ravel(dims, &wrapped), pos, run)?;
            pos += run;
        }
        Ok(())
    }
}

impl<T: Element> Hypercube<T> for AxisRolled<T> {
    fn dimensions(&self) -> &[Dimension] {
        self.wrapped.dimensions()
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        Flags::VIEW
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
        self.for_each_run(src_offset, dst.len(), |wrapped, start, run| {
            self.wrapped.flatten_into(wrapped, &mut dst[start..start + run])
        })
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        self.for_each_run(dst_offset, src.len(), |wrapped, start, run| {
            self.wrapped.unflatten_from(&src[start..start + run], wrapped)
        })
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(value)
    }

    fn axis_roll(&self) -> Option<(&Cube<T>, &[u64])> {
        Some((&self.wrapped, &self.shifts))
    }
}
