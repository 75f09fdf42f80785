//! The capability set shared by storage backends and views.
//!
//! Implementors translate flat offsets (or per-axis indices) into whatever
//! they wrap and delegate. The public, validating surface lives on
//! [`Cube`](crate::Cube); the methods here may assume their caller has
//! already range-checked bulk transfers.

use std::fmt;

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::HypercubeResult;
use crate::flags::Flags;
use crate::index;

/// An N-dimensional typed array: a storage leaf or a computed view
pub trait Hypercube<T: Element>: Send + Sync + fmt::Debug {
    /// Axes of this cube, outermost first
    fn dimensions(&self) -> &[Dimension];

    /// Product of the dimension lengths
    fn size(&self) -> u64;

    fn flags(&self) -> Flags;

    /// Read the element at a flat offset
    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T>;

    /// Write the element at a flat offset
    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()>;

    /// Read the element at per-axis indices
    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        let offset = index::to_offset(self.dimensions(), indices)?;
        self.read(offset, access)
    }

    /// Write the element at per-axis indices
    fn write_indices(&self, indices: &[u64], value: T, access: Access) -> HypercubeResult<()> {
        let offset = index::to_offset(self.dimensions(), indices)?;
        self.write(offset, value, access)
    }

    /// Copy the run `[src_offset, src_offset + dst.len())` into `dst`.
    ///
    /// The run has been validated against [`Hypercube::size`].
    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.read(src_offset + i as u64, Access::Ordered)?;
        }
        Ok(())
    }

    /// Copy `src` into the run starting at `dst_offset`.
    ///
    /// The run has been validated against [`Hypercube::size`].
    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        for (i, &value) in src.iter().enumerate() {
            self.write(dst_offset + i as u64, value, Access::Ordered)?;
        }
        Ok(())
    }

    /// Overwrite every element with `value`
    fn fill(&self, value: T) -> HypercubeResult<()> {
        for offset in 0..self.size() {
            self.write(offset, value, Access::Ordered)?;
        }
        Ok(())
    }

    /// The cube and shift this is a flat roll of, if it is one
    fn flat_roll(&self) -> Option<(&Cube<T>, u64)> {
        None
    }

    /// The cube and per-axis shifts this is an axis roll of, if it is one
    fn axis_roll(&self) -> Option<(&Cube<T>, &[u64])> {
        None
    }
}
