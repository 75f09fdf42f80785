//! Zero-copy views over other cubes.
//!
//! Every view holds a [`Cube`](crate::Cube) handle to what it wraps and
//! translates offsets or values on the way through. Views carry no mutable
//! state of their own, so they are freely shared across threads.

mod casting;
mod read_only;
mod reshaped;
mod rolled;
mod sliced;
mod transposed;
mod wrapping;

pub use casting::Casting;
pub use read_only::ReadOnly;
pub use reshaped::Reshaped;
pub use rolled::{AxisRolled, FlatRolled};
pub use sliced::Sliced;
pub use transposed::{Permuted, Transposed, Transposition};
pub use wrapping::{NestedArray, WrappingCube};
