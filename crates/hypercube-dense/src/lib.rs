//! # hypercube-dense
//!
//! Dense chunked storage for hypercubes.
//!
//! A [`DenseStore`] keeps every element in an atomic cell. Cells are grouped
//! into chunks of `2^chunk_shift` elements so very large cubes never need one
//! contiguous allocation, and so lazily allocated stores only pay for the
//! chunks that have been written.
//!
//! ## Quick Start
//!
//! ```
//! use hypercube_core::Dimension;
//! use hypercube_dense::{DenseConfig, DenseStore};
//!
//! let cube = DenseStore::<f64>::with_config(
//!     Dimension::of(&[1000, 1000]),
//!     &DenseConfig::new().chunk_shift(16).lazy(),
//! )
//! .unwrap()
//! .into_cube();
//!
//! // Untouched elements read as the missing value
//! assert!(cube.get(&[10, 10]).unwrap().is_nan());
//!
//! cube.set(&[10, 10], 2.5).unwrap();
//! assert_eq!(cube.get(&[10, 10]).unwrap(), 2.5);
//! ```
//!
//! ## Features
//!
//! - `parallel`: allocate and fill chunks in parallel via Rayon
//! - `serde`: Serialize/Deserialize for [`DenseConfig`]

#![deny(warnings)]

pub mod chunk;
pub mod config;
pub mod store;

pub use chunk::{ChunkLayout, ChunkSpan};
pub use config::{Allocation, DenseConfig};
pub use store::DenseStore;
