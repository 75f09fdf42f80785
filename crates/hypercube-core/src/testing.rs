//! A minimal `Vec`-backed cube for exercising views without a storage crate.

use parking_lot::RwLock;

use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index;

#[derive(Debug)]
pub(crate) struct VecCube<T: Element> {
    dims: Vec<Dimension>,
    data: RwLock<Vec<T>>,
}

impl<T: Element> VecCube<T> {
    pub(crate) fn new(dims: Vec<Dimension>, data: Vec<T>) -> Self {
        assert_eq!(index::size_of(&dims).unwrap(), data.len() as u64);
        Self {
            dims,
            data: RwLock::new(data),
        }
    }

    fn check(&self, offset: u64) -> HypercubeResult<usize> {
        let size = self.data.read().len() as u64;
        if offset >= size {
            return Err(HypercubeError::offset_out_of_range(offset, size));
        }
        Ok(offset as usize)
    }
}

impl<T: Element> Hypercube<T> for VecCube<T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.data.read().len() as u64
    }

    fn flags(&self) -> Flags {
        Flags::OWNED_CONTIGUOUS
    }

    fn read(&self, offset: u64, _access: Access) -> HypercubeResult<T> {
        let i = self.check(offset)?;
        Ok(self.data.read()[i])
    }

    fn write(&self, offset: u64, value: T, _access: Access) -> HypercubeResult<()> {
        let i = self.check(offset)?;
        self.data.write()[i] = value;
        Ok(())
    }
}
