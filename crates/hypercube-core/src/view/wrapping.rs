//! Cubes over caller-owned nested `Vec`s.
//!
//! The nesting may be ragged: unless explicit dimensions are given, each axis
//! is as long as the longest array at that depth. Positions that a shorter
//! array does not reach read as the element's missing value, and writes to
//! them are dropped.
//!
//! # Examples
//!
//! ```
//! use hypercube_core::view::WrappingCube;
//! use hypercube_core::Cube;
//!
//! let rows = WrappingCube::share(vec![vec![1i32, 2, 3], vec![4]]);
//! let cube = Cube::new(WrappingCube::new(rows.clone()).unwrap());
//! assert_eq!(cube.shape().as_slice(), &[2, 3]);
//! assert_eq!(cube.get(&[1, 2]).unwrap(), 0);
//!
//! cube.set(&[0, 0], 10).unwrap();
//! assert_eq!(rows.read()[0][0], 10);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index::{self, Indices};

/// A (possibly ragged) nested array of elements
pub trait NestedArray: Send + Sync + 'static {
    type Elem: Element;

    /// Nesting depth
    const NDIM: usize;

    /// Grow `shape[d]` to the longest array found at depth `d`
    fn extents(&self, shape: &mut [u64]);

    /// The element at `indices`, if every level is long enough
    fn get_at(&self, indices: &[u64]) -> Option<Self::Elem>;

    /// The slot at `indices`, if every level is long enough
    fn slot_mut(&mut self, indices: &[u64]) -> Option<&mut Self::Elem>;
}

macro_rules! leaf_array {
    ($($ty:ty),*) => {
        $(
            impl NestedArray for Vec<$ty> {
                type Elem = $ty;
                const NDIM: usize = 1;

                fn extents(&self, shape: &mut [u64]) {
                    shape[0] = shape[0].max(self.len() as u64);
                }

                fn get_at(&self, indices: &[u64]) -> Option<$ty> {
                    let i = usize::try_from(indices[0]).ok()?;
                    self.as_slice().get(i).copied()
                }

                fn slot_mut(&mut self, indices: &[u64]) -> Option<&mut $ty> {
                    let i = usize::try_from(indices[0]).ok()?;
                    self.as_mut_slice().get_mut(i)
                }
            }
        )*
    };
}

leaf_array!(i8, i16, i32, i64, f32, f64, bool);

impl<A: NestedArray> NestedArray for Vec<A> {
    type Elem = A::Elem;
    const NDIM: usize = A::NDIM + 1;

    fn extents(&self, shape: &mut [u64]) {
        shape[0] = shape[0].max(self.len() as u64);
        for child in self {
            child.extents(&mut shape[1..]);
        }
    }

    fn get_at(&self, indices: &[u64]) -> Option<A::Elem> {
        let i = usize::try_from(indices[0]).ok()?;
        self.as_slice().get(i)?.get_at(&indices[1..])
    }

    fn slot_mut(&mut self, indices: &[u64]) -> Option<&mut A::Elem> {
        let i = usize::try_from(indices[0]).ok()?;
        self.as_mut_slice().get_mut(i)?.slot_mut(&indices[1..])
    }
}

/// A cube over a shared nested array
pub struct WrappingCube<A: NestedArray> {
    array: Arc<RwLock<A>>,
    dims: Vec<Dimension>,
    size: u64,
}

impl<A: NestedArray> WrappingCube<A> {
    /// Put `array` behind the shared lock a wrapping cube expects
    pub fn share(array: A) -> Arc<RwLock<A>> {
        Arc::new(RwLock::new(array))
    }

    /// Wrap `array`, sizing each axis to the longest array at its depth
    pub fn new(array: Arc<RwLock<A>>) -> HypercubeResult<Self> {
        let mut shape: Indices = SmallVec::from_elem(0, A::NDIM);
        array.read().extents(&mut shape);
        Self::with_dimensions(Dimension::of(&shape), array)
    }

    /// Wrap `array` under explicit dimensions, one per nesting level
    pub fn with_dimensions(dims: Vec<Dimension>, array: Arc<RwLock<A>>) -> HypercubeResult<Self> {
        if dims.len() != A::NDIM {
            return Err(HypercubeError::dimensionality(format!(
                "{} dimensions given for an array nested {} deep",
                dims.len(),
                A::NDIM
            )));
        }
        let size = index::size_of(&dims)?;
        Ok(Self { array, dims, size })
    }

    /// The wrapped array
    pub fn array(&self) -> &Arc<RwLock<A>> {
        &self.array
    }

    fn indices(&self, offset: u64) -> HypercubeResult<Indices> {
        if offset >= self.size {
            return Err(HypercubeError::offset_out_of_range(offset, self.size));
        }
        let mut indices: Indices = SmallVec::from_elem(0, self.dims.len());
        index::unravel(&self.dims, offset, &mut indices);
        Ok(indices)
    }
}

impl<A: NestedArray> fmt::Debug for WrappingCube<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappingCube")
            .field("dims", &self.dims)
            .field("size", &self.size)
            .finish()
    }
}

impl<A: NestedArray> Hypercube<A::Elem> for WrappingCube<A> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn flags(&self) -> Flags {
        Flags {
            aligned: true,
            behaved: false,
            c_contiguous: false,
            owndata: false,
            writeable: true,
        }
    }

    fn read(&self, offset: u64, _access: Access) -> HypercubeResult<A::Elem> {
        let indices = self.indices(offset)?;
        Ok(self.array.read().get_at(&indices).unwrap_or(<A::Elem as Element>::MISSING))
    }

    fn write(&self, offset: u64, value: A::Elem, _access: Access) -> HypercubeResult<()> {
        let indices = self.indices(offset)?;
        if let Some(slot) = self.array.write().slot_mut(&indices) {
            *slot = value;
        }
        Ok(())
    }

    fn read_indices(&self, indices: &[u64], _access: Access) -> HypercubeResult<A::Elem> {
        index::to_offset(&self.dims, indices)?;
        Ok(self.array.read().get_at(indices).unwrap_or(<A::Elem as Element>::MISSING))
    }

    fn write_indices(&self, indices: &[u64], value: A::Elem, _access: Access) -> HypercubeResult<()> {
        index::to_offset(&self.dims, indices)?;
        if let Some(slot) = self.array.write().slot_mut(indices) {
            *slot = value;
        }
        Ok(())
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [A::Elem]) -> HypercubeResult<()> {
        let array = self.array.read();
        let mut indices: Indices = SmallVec::from_elem(0, self.dims.len());
        for (i, slot) in dst.iter_mut().enumerate() {
            index::unravel(&self.dims, src_offset + i as u64, &mut indices);
            *slot = array.get_at(&indices).unwrap_or(<A::Elem as Element>::MISSING);
        }
        Ok(())
    }

    fn unflatten_from(&self, src: &[A::Elem], dst_offset: u64) -> HypercubeResult<()> {
        let mut array = self.array.write();
        let mut indices: Indices = SmallVec::from_elem(0, self.dims.len());
        for (i, &value) in src.iter().enumerate() {
            index::unravel(&self.dims, dst_offset + i as u64, &mut indices);
            if let Some(slot) = array.slot_mut(&indices) {
                *slot = value;
            }
        }
        Ok(())
    }
}
