//! Property-based tests for index transforms and view composition
//!
//! These run against the `Vec`-backed test cube so they exercise only the
//! logic in this crate.

#[cfg(test)]
mod tests {
    use crate::dimension::{Accessor, Dimension};
    use crate::index;
    use crate::testing::VecCube;
    use crate::Cube;
    use proptest::prelude::*;

    // Shapes of 1-4 axes, kept small so cubes can be materialised
    fn shape_strategy() -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(1u64..6, 1..=4)
    }

    fn counting_cube(shape: &[u64]) -> Cube<i64> {
        let dims = Dimension::of(shape);
        let size = index::size_of(&dims).unwrap() as i64;
        Cube::new(VecCube::new(dims, (0..size).collect()))
    }

    proptest! {
        #[test]
        fn prop_offset_roundtrip(shape in shape_strategy(), seed in any::<u64>()) {
            let dims = Dimension::of(&shape);
            let size = index::size_of(&dims).unwrap();
            let offset = seed % size;
            let indices = index::from_offset(&dims, offset).unwrap();
            prop_assert_eq!(index::to_offset(&dims, &indices).unwrap(), offset);
        }

        #[test]
        fn prop_transpose_twice_is_identity(shape in shape_strategy()) {
            let x = counting_cube(&shape);
            let t = x.transpose();
            prop_assert!(t.transpose().is_same(&x));

            let mut reversed = shape.clone();
            reversed.reverse();
            let t_shape = t.shape();
            prop_assert_eq!(t_shape.as_slice(), reversed.as_slice());
        }

        #[test]
        fn prop_transpose_swaps_indices(shape in shape_strategy(), seed in any::<u64>()) {
            let x = counting_cube(&shape);
            let offset = seed % x.size();
            let indices = x.from_offset(offset).unwrap();
            let mut reversed = indices.to_vec();
            reversed.reverse();
            prop_assert_eq!(x.transpose().get(&reversed).unwrap(), offset as i64);
        }

        #[test]
        fn prop_flat_rolls_compose(shape in shape_strategy(), a in -50i64..50, b in -50i64..50) {
            let x = counting_cube(&shape);
            let composed = x.roll_flat(a).roll_flat(b).flatten().unwrap();
            let direct = x.roll_flat(a + b).flatten().unwrap();
            prop_assert_eq!(composed, direct);
            prop_assert!(x.roll_flat(a).roll_flat(-a).is_same(&x));
        }

        #[test]
        fn prop_axis_rolls_compose(shape in shape_strategy(), a in -9i64..9, b in -9i64..9) {
            let x = counting_cube(&shape);
            let dims = x.dimensions().to_vec();
            let first: Vec<_> = dims.iter().map(|d| Some(d.roll(a))).collect();
            let second: Vec<_> = dims.iter().map(|d| Some(d.roll(b))).collect();
            let total: Vec<_> = dims.iter().map(|d| Some(d.roll(a + b))).collect();

            let composed = x.roll(&first).unwrap().roll(&second).unwrap();
            let direct = x.roll(&total).unwrap();
            prop_assert_eq!(composed.flatten().unwrap(), direct.flatten().unwrap());
        }

        #[test]
        fn prop_axis_roll_matches_elementwise(shape in shape_strategy(), shift in -9i64..9) {
            let x = counting_cube(&shape);
            let dims = x.dimensions().to_vec();
            let rolls: Vec<_> = dims.iter().map(|d| Some(d.roll(shift))).collect();
            let r = x.roll(&rolls).unwrap();

            let bulk = r.flatten().unwrap();
            for (offset, &value) in bulk.iter().enumerate() {
                prop_assert_eq!(r.get_at(offset as u64).unwrap(), value);
            }
        }

        #[test]
        fn prop_slice_mapping(
            shape in shape_strategy(),
            starts in prop::collection::vec(0u64..6, 4),
            steps in prop::collection::vec(1u64..4, 4),
        ) {
            let x = counting_cube(&shape);
            let dims = x.dimensions().to_vec();
            let accessors: Vec<Accessor> = dims
                .iter()
                .enumerate()
                .map(|(axis, d)| {
                    let start = starts[axis] % d.length();
                    d.slice_step(start, d.length(), steps[axis]).unwrap().into()
                })
                .collect();
            let view = x.slice(&accessors).unwrap();

            let bulk = view.flatten().unwrap();
            for (offset, &value) in bulk.iter().enumerate() {
                let local = view.from_offset(offset as u64).unwrap();
                let wrapped: Vec<u64> = local
                    .iter()
                    .enumerate()
                    .map(|(axis, &i)| starts[axis] % dims[axis].length() + i * steps[axis])
                    .collect();
                prop_assert_eq!(value, x.get(&wrapped).unwrap());
            }
        }

        #[test]
        fn prop_slice_out_of_range_fails(shape in shape_strategy(), extra in 0u64..4) {
            let x = counting_cube(&shape);
            let dims = x.dimensions().to_vec();
            let d = &dims[0];
            prop_assert!(d.at(d.length() + extra).is_err());
            prop_assert!(d.slice(0, d.length() + extra + 1).is_err());
        }
    }
}
