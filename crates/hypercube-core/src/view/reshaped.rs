//! The same flat elements under a different set of dimensions.

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index;

/// A view with new dimensions over an unchanged flat offset space
#[derive(Debug)]
pub struct Reshaped<T: Element> {
    wrapped: Cube<T>,
    dims: Vec<Dimension>,
}

impl<T: Element> Reshaped<T> {
    pub fn new(wrapped: Cube<T>, dims: Vec<Dimension>) -> HypercubeResult<Self> {
        let size = index::size_of(&dims)?;
        if size != wrapped.size() {
            return Err(HypercubeError::invalid(format!(
                "cannot view {} elements as {:?}",
                wrapped.size(),
                index::shape_of(&dims).as_slice()
            )));
        }
        Ok(Self { wrapped, dims })
    }
}

impl<T: Element> Hypercube<T> for Reshaped<T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        self.wrapped.flags().with_owndata(false)
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.wrapped.read(offset, access)
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.wrapped.write(offset, value, access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        self.wrapped.flatten_into(src_offset, dst)
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        self.wrapped.unflatten_from(src, dst_offset)
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(value)
    }
}
