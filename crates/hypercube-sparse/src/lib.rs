//! # hypercube-sparse
//!
//! Sparse storage for hypercubes.
//!
//! A [`SparseStore`] keeps only the elements that differ from its null value
//! (by default the element's missing value: `NaN`, `0` or `false`), so memory
//! grows with the number of explicit entries rather than with the size of the
//! cube. It is safe to share between threads without external locking.
//!
//! ## Quick Start
//!
//! ```
//! use hypercube_core::Dimension;
//! use hypercube_sparse::{SparseConfig, SparseStore};
//!
//! let store = SparseStore::<f64>::with_config(
//!     Dimension::of(&[1 << 20, 1 << 20]),
//!     &SparseConfig::new().loading(0.0),
//! )
//! .unwrap();
//! let cube = store.into_cube();
//!
//! cube.set(&[123, 456], 1.0).unwrap();
//! assert_eq!(cube.get(&[123, 456]).unwrap(), 1.0);
//! assert!(cube.get(&[0, 0]).unwrap().is_nan());
//! ```
//!
//! ## Features
//!
//! - `serde`: Serialize/Deserialize for [`SparseConfig`]

#![deny(warnings)]

pub mod config;
pub mod store;

pub use config::SparseConfig;
pub use store::SparseStore;
