//! A tour of hypercube views
//!
//! This example builds a small dense cube and stacks views over it:
//! 1. Slicing rows and strided columns
//! 2. Rolling along one axis and over the flattened order
//! 3. Transposing and permuting axes
//! 4. Casting to another element type and writing through it
//! 5. Copying a huge sparse cube's neighbourhood into a dense one
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=hypercube_dense=debug cargo run --example views --features tracing
//! ```

use anyhow::Result;
use hypercube::prelude::*;
use hypercube::tracing_support::{init_tracing, record_cube, TracingConfig};

fn print_matrix<T: Element>(title: &str, cube: &Cube<T>) -> Result<()> {
    println!("{title} {:?}:", cube.shape().as_slice());
    let flat = cube.flatten()?;
    let cols = cube.length(cube.ndim() - 1).unwrap_or(1).max(1) as usize;
    for row in flat.chunks(cols) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>5?}")).collect();
        println!("  {}", cells.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing(TracingConfig::default())?;

    println!("=== Hypercube views ===\n");

    let dims = vec![Dimension::named("row", 3), Dimension::named("col", 4)];
    let values: Vec<i32> = (0..12).collect();
    let x = DenseStore::from_elements(dims.clone(), values)?.into_cube();
    record_cube("x", &x);
    print_matrix("x", &x)?;

    // 1. Slicing
    let middle_row = x.slice(&[dims[0].at(1)?.into(), Accessor::All])?;
    print_matrix("\nrow 1", &middle_row)?;
    let odd_cols = x.slice(&[Accessor::All, dims[1].slice_step(1, 4, 2)?.into()])?;
    print_matrix("\nodd columns", &odd_cols)?;

    // 2. Rolling
    let down = x.roll(&[Some(dims[0].roll(1)), None])?;
    print_matrix("\nrolled down one row", &down)?;
    print_matrix("\nflat roll by 5", &x.roll_flat(5))?;

    // 3. Transposition
    let t = x.transpose();
    print_matrix("\ntranspose", &t)?;
    println!("  transpose of transpose is x: {}", t.transpose().is_same(&x));

    // 4. Casting writes through
    let as_float = odd_cols.cast::<f64>();
    as_float.set(&[0, 0], 99.7)?;
    print_matrix("\nx after writing 99.7 through a cast view", &x)?;

    let frozen = x.read_only();
    match frozen.set(&[0, 0], 1) {
        Err(e) => println!("\nread-only write rejected: {e}"),
        Ok(()) => println!("\nread-only write unexpectedly accepted"),
    }

    // 5. Sparse to dense
    let huge = hypercube::sparse(&[1 << 30, 1 << 30], 0.0f32)?;
    let hd = huge.dimensions().to_vec();
    huge.set(&[1000, 1001], 2.5)?;
    let window = huge.slice(&[
        hd[0].slice(999, 1002)?.into(),
        hd[1].slice(999, 1003)?.into(),
    ])?;
    let local = hypercube::dense::<f32>(&[3, 4])?;
    local.copy_from(&window)?;
    record_cube("local", &local);
    print_matrix("\nneighbourhood of (1000, 1001) in a 2^30 x 2^30 sparse cube", &local)?;

    Ok(())
}
