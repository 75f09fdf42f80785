//! # Hypercube - N-dimensional arrays with composable views
//!
//! Fixed-shape, typed, N-dimensional arrays over interchangeable storage,
//! plus zero-copy views (slicing, rolling, transposition, reshaping,
//! element casting, read-only) that can be stacked arbitrarily and always
//! read and write through to the underlying store.
//!
//! This is the **meta crate** that re-exports all hypercube components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use hypercube::prelude::*;
//!
//! let cube = hypercube::from_elements(&[2, 3], vec![1i64, 2, 3, 4, 5, 6])?;
//! let dims = cube.dimensions().to_vec();
//!
//! // Roll the first axis by one: row 1 comes first
//! let rolled = cube.roll(&[Some(dims[0].roll(1)), None])?;
//! assert_eq!(rolled.flatten()?, vec![4, 5, 6, 1, 2, 3]);
//!
//! // Views write through
//! rolled.transpose().set(&[2, 1], 0)?;
//! assert_eq!(cube.get(&[0, 2])?, 0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Core ([`core`])
//!
//! The [`Hypercube`](crate::core::Hypercube) trait, dimensions and
//! accessors, the element types, and every view.
//!
//! ### Dense storage ([`dense`])
//!
//! Chunked atomic cells with optional lazy chunk allocation.
//!
//! ```
//! use hypercube::dense::{DenseConfig, DenseStore};
//! use hypercube::core::Dimension;
//!
//! let store = DenseStore::<f32>::with_config(
//!     Dimension::of(&[1000, 1000]),
//!     &DenseConfig::new().chunk_shift(16).lazy(),
//! )?;
//! assert_eq!(store.allocated_chunks(), 0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Sparse storage ([`sparse`])
//!
//! A concurrent offset map for cubes that are mostly one value.
//!
//! ```
//! let cube = hypercube::sparse(&[1 << 20, 1 << 20], 0i8)?;
//! cube.set(&[7, 9], 1)?;
//! assert_eq!(cube.get(&[7, 9])?, 1);
//! assert_eq!(cube.get(&[9, 7])?, 0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Logging ([`tracing_support`])
//!
//! Subscriber setup for the `tracing` events the library crates emit.
//! Available when the `tracing` feature is enabled.
//!
//! ## Features
//!
//! - `tracing`: Enable [`tracing_support::init_tracing`]
//! - `parallel`: Allocate and fill dense chunks in parallel via Rayon
//! - `serde`: Serialize/Deserialize for dimensions, flags and configurations
//!
//! ## Examples
//!
//! See the `examples/` directory for a tour of the views.

#![deny(warnings)]

use std::sync::Arc;

use parking_lot::RwLock;

// Re-export all components
pub use hypercube_core as core;
pub use hypercube_dense as dense;
pub use hypercube_sparse as sparse;

pub mod tracing_support;

use hypercube_core::view::{NestedArray, WrappingCube};
use hypercube_core::{Cube, Dimension, Element, HypercubeResult};
use hypercube_dense::DenseStore;
use hypercube_sparse::{SparseConfig, SparseStore};

/// A dense cube of the given shape, every element missing
pub fn dense<T: Element>(shape: &[u64]) -> HypercubeResult<Cube<T>> {
    Ok(DenseStore::new(Dimension::of(shape))?.into_cube())
}

/// A dense cube of the given shape holding `values` in row-major order
pub fn from_elements<T: Element>(shape: &[u64], values: Vec<T>) -> HypercubeResult<Cube<T>> {
    Ok(DenseStore::from_elements(Dimension::of(shape), values)?.into_cube())
}

/// A sparse cube of the given shape where every element starts as `null`
///
/// The map's initial capacity is capped at
/// [`BOUNDED_MAX_CAPACITY`](hypercube_sparse::config::BOUNDED_MAX_CAPACITY)
/// so huge shapes stay cheap to create; use [`SparseStore::with_config`] for
/// full control.
pub fn sparse<T: Element>(shape: &[u64], null: T) -> HypercubeResult<Cube<T>> {
    let config = SparseConfig::new().null_value(null).bounded();
    Ok(SparseStore::with_config(Dimension::of(shape), &config)?.into_cube())
}

/// A cube over a shared nested array, sized to its longest arrays
pub fn wrap<A: NestedArray>(array: Arc<RwLock<A>>) -> HypercubeResult<Cube<A::Elem>> {
    Ok(Cube::new(WrappingCube::new(array)?))
}

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use hypercube::prelude::*;
    //!
    //! let cube: Cube<f64> = DenseStore::new(Dimension::of(&[10, 20]))?.into_cube();
    //! assert_eq!(cube.shape().as_slice(), &[10, 20]);
    //! # Ok::<(), anyhow::Error>(())
    //! ```

    // Core types
    pub use crate::core::{
        Access, Accessor, Coordinate, Cube, Dimension, Element, ElementKind, ErrorKind, Flags,
        Hypercube, HypercubeError, HypercubeResult, Roll, Slice,
    };

    // Views
    pub use crate::core::view::WrappingCube;

    // Storage
    pub use crate::dense::{Allocation, DenseConfig, DenseStore};
    pub use crate::sparse::{SparseConfig, SparseStore};
}
