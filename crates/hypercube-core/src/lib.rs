//! # hypercube-core
//!
//! Dimension model, index transforms, element kinds and the composable view
//! layer for the hypercube engine.
//!
//! This crate provides the pieces every hypercube is built from:
//!
//! - **Dimensions** ([`Dimension`]) with identity semantics, and the
//!   accessors bound to them ([`Coordinate`], [`Slice`], [`Roll`])
//! - **Element kinds** ([`Element`]) over a closed set of primitives, with
//!   `as`-style conversions between them ([`CastFrom`])
//! - **The capability trait** ([`Hypercube`]) implemented by storage backends
//!   and views alike
//! - **The shared handle** ([`Cube`]) callers work with
//! - **Views** ([`view`]): sliced, transposed/permuted, rolled, casting,
//!   wrapping, reshaped and read-only
//!
//! Storage backends live in `hypercube-dense` and `hypercube-sparse`.
//!
//! ## Memory Layout
//!
//! Offsets are row-major: the last axis varies fastest. A cube's size is the
//! product of its dimension lengths and must fit in an `i64`.
//!
//! ## Concurrency
//!
//! Cubes are `Send + Sync` and every element access takes `&self`. Ordered
//! accessors (`get`, `set`, ...) use acquire/release semantics; the `weak_*`
//! variants are relaxed and leave synchronisation to the caller.
//!
//! ## Quick Start
//!
//! ```
//! use hypercube_core::{Accessor, Cube, Dimension};
//! use hypercube_core::view::WrappingCube;
//!
//! let data = WrappingCube::share(vec![vec![1i64, 2, 3], vec![4, 5, 6]]);
//! let x = Cube::new(WrappingCube::new(data).unwrap());
//! let dims = x.dimensions().to_vec();
//!
//! let first_row = x.slice(&[dims[0].at(0).unwrap().into(), Accessor::All]).unwrap();
//! assert_eq!(first_row.flatten().unwrap(), vec![1, 2, 3]);
//!
//! let rolled = x.roll(&[Some(dims[0].roll(1)), None]).unwrap();
//! assert_eq!(rolled.flatten().unwrap(), vec![4, 5, 6, 1, 2, 3]);
//!
//! assert_eq!(x.roll_flat(2).flatten().unwrap(), vec![5, 6, 1, 2, 3, 4]);
//! assert!(x.transpose().transpose().is_same(&x));
//! ```
//!
//! ## Features
//!
//! - `serde`: Serialize/Deserialize for [`Flags`] and [`ElementKind`]

#![deny(warnings)]

pub mod cube;
pub mod dimension;
pub mod element;
pub mod error;
pub mod flags;
pub mod hypercube;
pub mod index;
pub mod view;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
pub(crate) mod testing;

pub use cube::Cube;
pub use dimension::{Accessor, Coordinate, Dimension, Roll, Slice};
pub use element::{Access, AtomicElement, CastFrom, Element, ElementKind};
pub use error::{ErrorKind, HypercubeError, HypercubeResult};
pub use flags::Flags;
pub use hypercube::Hypercube;
pub use index::Indices;
