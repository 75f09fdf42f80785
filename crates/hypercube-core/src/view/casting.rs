//! Element-kind conversion on the fly.

use std::marker::PhantomData;

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, CastFrom, Element};
use crate::error::HypercubeResult;
use crate::flags::Flags;
use crate::hypercube::Hypercube;

/// A view presenting a cube of `S` as a cube of `T`.
///
/// Reads convert `S -> T` and writes convert `T -> S`, both with `as`
/// semantics. The absent marker of one kind (`NaN`) maps to the missing value
/// of the other.
#[derive(Debug)]
pub struct Casting<S: Element, T: Element> {
    wrapped: Cube<S>,
    _target: PhantomData<fn() -> T>,
}

impl<S, T> Casting<S, T>
where
    S: Element + CastFrom<T>,
    T: Element + CastFrom<S>,
{
    pub fn new(wrapped: Cube<S>) -> Self {
        Self {
            wrapped,
            _target: PhantomData,
        }
    }
}

#[inline]
fn convert<A: Element, B: Element + CastFrom<A>>(value: A) -> B {
    if value.is_absent() {
        B::MISSING
    } else {
        B::cast_from(value)
    }
}

impl<S, T> Hypercube<T> for Casting<S, T>
where
    S: Element + CastFrom<T>,
    T: Element + CastFrom<S>,
{
    fn dimensions(&self) -> &[Dimension] {
        self.wrapped.dimensions()
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        Flags::VIEW.with_owndata(false)
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.wrapped.read(offset, access).map(convert)
    }

    fn write(&self, offset: u64, value: T, access: Access) -> HypercubeResult<()> {
        self.wrapped.write(offset, convert(value), access)
    }

    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        self.wrapped.read_indices(indices, access).map(convert)
    }

    fn write_indices(&self, indices: &[u64], value: T, access: Access) -> HypercubeResult<()> {
        self.wrapped.write_indices(indices, convert(value), access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        let mut staged = vec![S::MISSING; dst.len()];
        self.wrapped.flatten_into(src_offset, &mut staged)?;
        for (slot, value) in dst.iter_mut().zip(staged) {
            *slot = convert(value);
        }
        Ok(())
    }

    fn unflatten_from(&self, src: &[T], dst_offset: u64) -> HypercubeResult<()> {
        let staged: Vec<S> = src.iter().map(|&v| convert(v)).collect();
        self.wrapped.unflatten_from(&staged, dst_offset)
    }

    fn fill(&self, value: T) -> HypercubeResult<()> {
        self.wrapped.fill(convert(value))
    }
}
