//! Property-based tests for dense storage
//!
//! Bulk transfers must agree with element-wise access no matter how the run
//! lines up with chunk boundaries.

use hypercube_core::Dimension;
use hypercube_dense::{Allocation, DenseConfig, DenseStore};
use proptest::prelude::*;

// (size, chunk shift, offset, length) with the run inside the cube
fn run_strategy() -> impl Strategy<Value = (u64, u32, u64, usize)> {
    (1u64..200, 1u32..6).prop_flat_map(|(size, shift)| {
        (0..size).prop_flat_map(move |offset| {
            let max_len = (size - offset) as usize;
            (Just(size), Just(shift), Just(offset), 0..=max_len)
        })
    })
}

fn allocation_strategy() -> impl Strategy<Value = Allocation> {
    prop_oneof![Just(Allocation::Eager), Just(Allocation::Lazy)]
}

proptest! {
    #[test]
    fn prop_flatten_matches_elementwise(
        (size, shift, offset, len) in run_strategy(),
        allocation in allocation_strategy(),
    ) {
        let config = DenseConfig::new().chunk_shift(shift).allocation(allocation);
        let values: Vec<i32> = (0..size as i32).map(|v| v * 7 - 3).collect();
        let cube = DenseStore::from_elements_with_config(Dimension::of(&[size]), values, &config)
            .unwrap()
            .into_cube();

        let mut bulk = vec![0i32; len];
        cube.to_flattened(offset, &mut bulk, 0, len).unwrap();
        for (i, &value) in bulk.iter().enumerate() {
            prop_assert_eq!(value, cube.get_at(offset + i as u64).unwrap());
        }
    }

    #[test]
    fn prop_unflatten_matches_elementwise(
        (size, shift, offset, len) in run_strategy(),
        seed in any::<i64>(),
    ) {
        let config = DenseConfig::new().chunk_shift(shift).lazy();
        let bulk = DenseStore::<i64>::with_config(Dimension::of(&[size]), &config)
            .unwrap()
            .into_cube();
        let single = DenseStore::<i64>::with_config(Dimension::of(&[size]), &config)
            .unwrap()
            .into_cube();

        let src: Vec<i64> = (0..len as i64).map(|i| seed.wrapping_add(i)).collect();
        bulk.from_flattened(&src, 0, offset, len).unwrap();
        for (i, &value) in src.iter().enumerate() {
            single.set_at(offset + i as u64, value).unwrap();
        }
        prop_assert_eq!(bulk.flatten().unwrap(), single.flatten().unwrap());
    }

    #[test]
    fn prop_out_of_range_runs_fail(size in 1u64..100, extra in 1usize..10) {
        let cube = DenseStore::<f32>::new(Dimension::of(&[size])).unwrap().into_cube();
        let mut dst = vec![0.0f32; size as usize + extra];
        prop_assert!(cube.to_flattened(0, &mut dst, 0, size as usize + extra).is_err());
        prop_assert!(cube.get_at(size).is_err());
    }
}
