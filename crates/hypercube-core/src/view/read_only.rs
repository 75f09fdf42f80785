//! Write protection.

use crate::cube::Cube;
use crate::dimension::Dimension;
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;

/// A view that forwards reads and rejects every write
#[derive(Debug)]
pub struct ReadOnly<T: Element> {
    wrapped: Cube<T>,
}

impl<T: Element> ReadOnly<T> {
    pub fn new(wrapped: Cube<T>) -> Self {
        Self { wrapped }
    }

    fn rejected() -> HypercubeError {
        HypercubeError::unsupported("cube is read-only")
    }
}

impl<T: Element> Hypercube<T> for ReadOnly<T> {
    fn dimensions(&self) -> &[Dimension] {
        self.wrapped.dimensions()
    }

    fn size(&self) -> u64 {
        self.wrapped.size()
    }

    fn flags(&self) -> Flags {
        self.wrapped.flags().with_writeable(false)
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<T> {
        self.wrapped.read(offset, access)
    }

    fn write(&self, _offset: u64, _value: T, _access: Access) -> HypercubeResult<()> {
        Err(Self::rejected())
    }

    fn read_indices(&self, indices: &[u64], access: Access) -> HypercubeResult<T> {
        self.wrapped.read_indices(indices, access)
    }

    fn write_indices(&self, _indices: &[u64], _value: T, _access: Access) -> HypercubeResult<()> {
        Err(Self::rejected())
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [T]) -> HypercubeResult<()> {
        self.wrapped.flatten_into(src_offset, dst)
    }

    fn unflatten_from(&self, _src: &[T], _dst_offset: u64) -> HypercubeResult<()> {
        Err(Self::rejected())
    }

    fn fill(&self, _value: T) -> HypercubeResult<()> {
        Err(Self::rejected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::VecCube;

    #[test]
    fn test_writes_rejected() {
        let x = Cube::new(VecCube::new(Dimension::of(&[4]), vec![true, false, true, false]));
        let ro = x.read_only();
        assert!(!ro.flags().writeable);
        assert!(ro.get_at(0).unwrap());
        assert_eq!(ro.set_at(1, true).unwrap_err().kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(ro.fill(true).unwrap_err().kind(), ErrorKind::UnsupportedOperation);
        assert!(ro.from_flattened(&[true], 0, 0, 1).is_err());
        assert!(ro.transpose().set(&[0], true).is_err());
        assert_eq!(x.flatten().unwrap(), vec![true, false, true, false]);
    }
}
