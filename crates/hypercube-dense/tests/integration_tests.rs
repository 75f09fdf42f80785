//! Integration tests for hypercube-dense
//!
//! Views over dense stores, and concurrent use of a single store.

use std::sync::{Arc, Barrier};
use std::thread;

use hypercube_core::{Access, Accessor, Cube, Dimension, Flags, Hypercube, HypercubeResult};
use hypercube_dense::{DenseConfig, DenseStore};

#[test]
fn test_two_by_three_scenario() -> anyhow::Result<()> {
    let x = DenseStore::from_elements(Dimension::of(&[2, 3]), vec![1i64, 2, 3, 4, 5, 6])?.into_cube();
    let dims = x.dimensions().to_vec();

    let row = x.slice(&[dims[0].at(0)?.into(), Accessor::All])?;
    assert_eq!(row.flatten()?, vec![1, 2, 3]);

    let rolled = x.roll(&[Some(dims[0].roll(1)), None])?;
    assert_eq!(rolled.flatten()?, vec![4, 5, 6, 1, 2, 3]);

    assert_eq!(x.roll_flat(2).flatten()?, vec![5, 6, 1, 2, 3, 4]);
    assert!(x.transpose().transpose().is_same(&x));
    Ok(())
}

#[test]
fn test_cast_scenario() -> anyhow::Result<()> {
    let x = DenseStore::<f64>::new(Dimension::of(&[4]))?.into_cube();
    x.set(&[0], 3.9)?;
    assert_eq!(x.cast::<i32>().get(&[0])?, 3);
    Ok(())
}

#[test]
fn test_sliced_bulk_over_small_chunks() -> anyhow::Result<()> {
    let config = DenseConfig::new().chunk_shift(3);
    let values: Vec<i32> = (0..60).collect();
    let x = DenseStore::from_elements_with_config(Dimension::of(&[6, 10]), values, &config)?
        .into_cube();
    let dims = x.dimensions().to_vec();

    let view = x.slice(&[
        dims[0].slice(1, 5)?.into(),
        dims[1].slice(2, 9)?.into(),
    ])?;
    let bulk = view.flatten()?;
    let mut elementwise = Vec::new();
    for i in 0..4 {
        for j in 0..7 {
            elementwise.push(view.get(&[i, j])?);
        }
    }
    assert_eq!(bulk, elementwise);
    assert_eq!(bulk[0], 12);
    Ok(())
}

#[test]
fn test_copy_between_layouts() -> anyhow::Result<()> {
    let src = DenseStore::from_elements(Dimension::of(&[3, 4]), (0..12).collect::<Vec<i16>>())?
        .into_cube();
    let dst = DenseStore::<i16>::with_config(
        Dimension::of(&[4, 3]),
        &DenseConfig::new().chunk_shift(2).lazy(),
    )?
    .into_cube();
    dst.copy_from(&src.transpose())?;
    assert_eq!(dst.get(&[3, 2])?, 11);
    assert_eq!(dst.get(&[1, 0])?, 1);
    Ok(())
}

#[test]
fn test_concurrent_first_writers_share_one_chunk() {
    let store = Arc::new(
        DenseStore::<i64>::with_config(
            Dimension::of(&[64]),
            &DenseConfig::new().chunk_shift(6).lazy(),
        )
        .unwrap(),
    );
    let cube = Arc::new(Cube::new(ArcStore(Arc::clone(&store))));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cube = Arc::clone(&cube);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in (t..64).step_by(threads) {
                    cube.set_at(i as u64, i as i64 + 1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.allocated_chunks(), 1);
    let expected: Vec<i64> = (1..=64).collect();
    assert_eq!(cube.flatten().unwrap(), expected);
}

#[test]
fn test_ordered_publication_across_threads() {
    let cube = Arc::new(
        DenseStore::<i32>::with_config(Dimension::of(&[2]), &DenseConfig::new().lazy())
            .unwrap()
            .into_cube(),
    );
    let writer = {
        let cube = Arc::clone(&cube);
        thread::spawn(move || {
            cube.weak_set_at(0, 99).unwrap();
            cube.set_at(1, 1).unwrap();
        })
    };
    while cube.get_at(1).unwrap() != 1 {
        std::hint::spin_loop();
    }
    assert_eq!(cube.get_at(0).unwrap(), 99);
    writer.join().unwrap();
}

/// Lets the test keep a handle on the store while a cube wraps it
#[derive(Debug)]
struct ArcStore(Arc<DenseStore<i64>>);

impl Hypercube<i64> for ArcStore {
    fn dimensions(&self) -> &[Dimension] {
        self.0.dimensions()
    }

    fn size(&self) -> u64 {
        self.0.size()
    }

    fn flags(&self) -> Flags {
        self.0.flags()
    }

    fn read(&self, offset: u64, access: Access) -> HypercubeResult<i64> {
        self.0.read(offset, access)
    }

    fn write(&self, offset: u64, value: i64, access: Access) -> HypercubeResult<()> {
        self.0.write(offset, value, access)
    }

    fn flatten_into(&self, src_offset: u64, dst: &mut [i64]) -> HypercubeResult<()> {
        self.0.flatten_into(src_offset, dst)
    }
}
