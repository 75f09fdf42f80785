//! Sub-cubes selected by per-axis accessors.
//!
//! A coordinate pins its axis and removes it from the view, a slice maps
//! local index `i` to `start + i * step`, and `All` passes the axis through
//! with its original dimension.

use smallvec::SmallVec;

use crate::cube::Cube;
use crate::dimension::{Accessor, Dimension};
use crate::element::{Access, Element};
use crate::error::{HypercubeError, HypercubeResult};
use crate::flags::Flags;
use crate::hypercube::Hypercube;
use crate::index::{self, Indices};

/// How one wrapped axis is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisMap {
    Fixed(u64),
    Strided { start: u64, step: u64 },
    Whole,
}

/// A view selecting a strided sub-cube
#[derive(Debug)]
pub struct Sliced<T: Element> {
    wrapped: Cube<T>,
    dims: Vec<Dimension>,
    axes: SmallVec<[AxisMap; 6]>,
    size: u64,
}

impl<T: Element> Sliced<T> {
    /// Build a view with one accessor per axis of `wrapped`.
    ///
    /// Coordinates and slices must be bound to the dimension of the axis they
    /// are applied to.
    pub fn new(wrapped: Cube<T>, accessors: &[Accessor]) -> HypercubeResult<Self> {
        let wrapped_dims = wrapped.dimensions();
        if accessors.len() != wrapped_dims.len() {
            return Err(HypercubeError::dimensionality(format!(
                "expected {} accessors, got {}",
                wrapped_dims.len(),
                accessors.len()
            )));
        }

        let mut dims = Vec::with_capacity(accessors.len());
        let mut axes = SmallVec::with_capacity(accessors.len());
        for (axis, (accessor, dim)) in accessors.iter().zip(wrapped_dims).enumerate() {
            match accessor {
                Accessor::Coordinate(c) => {
                    index::dimension_check(wrapped_dims, c.dimension(), axis)?;
                    axes.push(AxisMap::Fixed(c.index()));
                }
                Accessor::Slice(s) => {
                    index::dimension_check(wrapped_dims, s.dimension(), axis)?;
                    axes.push(AxisMap::Strided {
                        start: s.start(),
                        step: s.step(),
                    });
                    dims.push(dim.derive(s.len()));
                }
                Accessor::All => {
                    axes.push(AxisMap::Whole);
                    dims.push(dim.clone());
                }
            }
        }
        let size = index::size_of(&dims)?;

        Ok(Self {
            wrapped,
            dims,
            axes,
            size,
        })
    }

    fn map_indices(&self, local: &[u64], out: &mut [u64]) {
        let mut next = local.iter();
        for (slot, map) in out.iter_mut().zip(&self.axes) {
            *slot = match *map {
                AxisMap::Fixed(i) => i,
                AxisMap::Strided { start, step } => start + next.next().copied().unwrap_or(0) * step,
                AxisMap::Whole => next.next().copied().unwrap_or(0),
            };
        }
    }

    fn wrapped_offset(&self, offset: u64) -> u64 {
        let mut local: Indices = SmallVec::from_elem(0, self.dims.len());
        let mut wrapped: Indices = SmallVec::from_elem(0, self.axes.len());
        index::unravel(&self.dims, offset, &mut local);
        self.map_indices(&local, &mut wrapped);
        index::ravel(self.wrapped.dimensions(), &wrapped)
    }

    fn wrapped_indices(&self, indices: &[u64]) -> HypercubeResult<Indices> {
        index::to_offset(&self.dims, indices)?;
        let mut wrapped: Indices = SmallVec::from_elem(0, self.axes.len());
        self.map_indices(indices, &mut wrapped);
        Ok(wrapped)
    }

    fn check_offset(&self, offset: u64) -> HypercubeResult<()> {
        if offset >= self.size {
            return Err(HypercubeError::offset_out_of_range(offset, self.size));
        }
        Ok(())
    }

    /// Walk `[offset, offset + len)` as runs that are contiguous in the
    /// wrapped cube, calling `f(wrapped_offset, start, run)` for each.
    ///
    /// Runs never extend past the lowest wrapped axis, and an axis stepped by
    /// more than one contributes single-element runs.
    fn for_each_run(
        &self,
        offset: u64,
        len: usize,
        mut f: impl FnMut(u64, usize, usize) -> HypercubeResult<()>,
    ) -> HypercubeResult<()> {
        let Some(&lowest) = self.axes.last() else {
            return f(offset, 0, len);
        };
        let mut local: Indices = SmallVec::from_elem(0, self.dims.len());
        let mut wrapped: Indices = SmallVec::from_elem(0, self.axes.len());
        let mut pos = 0usize;
        while pos < len {
            let here = offset + pos as u64;
            index::unravel(&self.dims, here, &mut local);
            self.map_indices(&local, &mut wrapped);
            let left = (len - pos) as u64;
            let run = match lowest {
                AxisMap::Fixed(_) => 1,
                AxisMap::Strided { step, .. } if step > 1 => 1,
                AxisMap::Strided { .. } | AxisMap::Whole => {
                    // The lowest wrapped axis is also the lowest local axis here
                    let (dim, &i) = self.dims.last().zip(local.last()).ok_or_else(|| {
                        HypercubeError::dimensionality("sliced view lost its lowest axis")
                    })?;
                    left.min(dim.length() - i)
                }
            } as usize;
            f(index::ravel(self.wrapped.dimensions(), &wrapped), pos, run)?;
            pos += run;
        }
        Ok(())
    }
}

impl<T: Element> Hypercube<T> for Sliced<T> {
    fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    fn size(&self) -> u64 {
        self.size
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
        let chunk = vec![value; (self.size as usize).min(1024)];
        let mut offset = 0u64;
        while offset < self.size {
            let n = ((self.size - offset) as usize).min(chunk.len());
            self.unflatten_from(&chunk[..n], offset)?;
            offset += n as u64;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::VecCube;

    fn grid() -> Cube<i32> {
        Cube::new(VecCube::new(
            Dimension::of(&[3, 4]),
            (0..12).collect::<Vec<i32>>(),
        ))
    }

    #[test]
    fn test_coordinate_elides_axis() {
        let x = grid();
        let d = x.dimensions().to_vec();
        let row = x.slice(&[d[0].at(1).unwrap().into(), Accessor::All]).unwrap();
        assert_eq!(row.shape().as_slice(), &[4]);
        assert_eq!(row.dimensions()[0], d[1]);
        assert_eq!(row.flatten().unwrap(), vec![4, 5, 6, 7]);

        let col = x.slice(&[Accessor::All, d[1].at(2).unwrap().into()]).unwrap();
        assert_eq!(col.flatten().unwrap(), vec![2, 6, 10]);
    }

    #[test]
    fn test_strided_slices() {
        let x = grid();
        let d = x.dimensions().to_vec();
        let v = x
            .slice(&[
                d[0].slice(1, 3).unwrap().into(),
                d[1].slice_step(0, 4, 2).unwrap().into(),
            ])
            .unwrap();
        assert_eq!(v.shape().as_slice(), &[2, 2]);
        assert_ne!(v.dimensions()[1], d[1]);
        assert_eq!(v.flatten().unwrap(), vec![4, 6, 8, 10]);
        assert_eq!(v.get(&[1, 1]).unwrap(), 10);
        assert!(v.get(&[2, 0]).is_err());
    }

    #[test]
    fn test_partial_run_flatten() {
        let x = grid();
        let d = x.dimensions().to_vec();
        let v = x
            .slice(&[Accessor::All, d[1].slice(1, 4).unwrap().into()])
            .unwrap();
        let mut out = [0; 5];
        v.to_flattened(2, &mut out, 0, 5).unwrap();
        assert_eq!(out, [3, 5, 6, 7, 9]);
    }

    #[test]
    fn test_write_through_slice() {
        let x = grid();
        let d = x.dimensions().to_vec();
        let v = x
            .slice(&[d[0].slice_step(0, 3, 2).unwrap().into(), Accessor::All])
            .unwrap();
        v.fill(-1).unwrap();
        assert_eq!(
            x.flatten().unwrap(),
            vec![-1, -1, -1, -1, 4, 5, 6, 7, -1, -1, -1, -1]
        );
    }

    #[test]
    fn test_mismatched_accessors() {
        let x = grid();
        let d = x.dimensions().to_vec();
        assert!(x.slice(&[Accessor::All]).is_err());
        assert!(x
            .slice(&[d[1].at(0).unwrap().into(), Accessor::All])
            .is_err());
    }
}
