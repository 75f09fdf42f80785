//! Element kinds supported by hypercubes.
//!
//! Rather than one cube type per primitive, every store and view is generic
//! over a closed set of element kinds. Each kind supplies:
//!
//! - its missing/default value ([`Element::MISSING`]): `0`, `false` or `NaN`
//! - a fixed-width 64-bit encoding used by the sparse store
//! - an atomic cell type used by the dense store
//! - `as`-style narrowing/widening conversions to every other kind
//!   ([`CastFrom`])
//!
//! # Examples
//!
//! ```
//! use hypercube_core::element::{CastFrom, Element, ElementKind};
//!
//! assert_eq!(<i64 as Element>::KIND, ElementKind::I64);
//! assert!(<f32 as Element>::MISSING.is_nan());
//! assert_eq!(i32::cast_from(3.9f64), 3);
//! assert_eq!(f64::from_bits_u64(2.5f64.to_bits_u64()), 2.5);
//! ```

use std::fmt;
use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicU32, AtomicU64, Ordering,
};

/// The closed set of element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ElementKind {
    /// Number of bytes one element occupies
    pub fn itemsize(self) -> usize {
        match self {
            ElementKind::Bool | ElementKind::I8 => 1,
            ElementKind::I16 => 2,
            ElementKind::I32 | ElementKind::F32 => 4,
            ElementKind::I64 | ElementKind::F64 => 8,
        }
    }

    /// numpy-style dtype name
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Bool => "bool",
            ElementKind::I8 => "int8",
            ElementKind::I16 => "int16",
            ElementKind::I32 => "int32",
            ElementKind::I64 => "int64",
            ElementKind::F32 => "float32",
            ElementKind::F64 => "float64",
        }
    }

    pub fn is_floating(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Memory ordering tier for element access.
///
/// `Ordered` reads acquire and writes release, so a read observes the most
/// recent completed write from any thread. `Weak` uses relaxed atomics and is
/// only safe when the caller synchronises externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    #[default]
    Ordered,
    Weak,
}

impl Access {
    #[inline]
    pub fn load_ordering(self) -> Ordering {
        match self {
            Access::Ordered => Ordering::Acquire,
            Access::Weak => Ordering::Relaxed,
        }
    }

    #[inline]
    pub fn store_ordering(self) -> Ordering {
        match self {
            Access::Ordered => Ordering::Release,
            Access::Weak => Ordering::Relaxed,
        }
    }
}

/// An atomic cell holding one element
pub trait AtomicElement<T>: Send + Sync {
    fn new(value: T) -> Self;
    fn load(&self, order: Ordering) -> T;
    fn store(&self, value: T, order: Ordering);
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive that can live in a hypercube
pub trait Element:
    sealed::Sealed + Copy + PartialEq + PartialOrd + Send + Sync + fmt::Debug + 'static
{
    const KIND: ElementKind;

    /// The default value of a fresh cell and the canonical "no value" marker
    const MISSING: Self;

    /// Atomic cell type used by dense storage
    type Atomic: AtomicElement<Self>;

    /// Whether this value is the kind's absent marker (only `NaN` for floats)
    #[inline]
    fn is_absent(self) -> bool {
        false
    }

    /// Fixed-width encoding shared by every kind
    fn to_bits_u64(self) -> u64;

    /// Inverse of [`Element::to_bits_u64`]
    fn from_bits_u64(bits: u64) -> Self;
}

macro_rules! int_element {
    ($($ty:ty => $kind:ident, $atomic:ty, $unsigned:ty);* $(;)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
                const MISSING: Self = 0;
                type Atomic = $atomic;

                #[inline]
                fn to_bits_u64(self) -> u64 {
                    self as $unsigned as u64
                }

                #[inline]
                fn from_bits_u64(bits: u64) -> Self {
                    bits as $unsigned as $ty
                }
            }

            impl AtomicElement<$ty> for $atomic {
                #[inline]
                fn new(value: $ty) -> Self {
                    <$atomic>::new(value)
                }

                #[inline]
                fn load(&self, order: Ordering) -> $ty {
                    <$atomic>::load(self, order)
                }

                #[inline]
                fn store(&self, value: $ty, order: Ordering) {
                    <$atomic>::store(self, value, order)
                }
            }
        )*
    };
}

int_element! {
    i8 => I8, AtomicI8, u8;
    i16 => I16, AtomicI16, u16;
    i32 => I32, AtomicI32, u32;
    i64 => I64, AtomicI64, u64;
}

macro_rules! float_element {
    ($($ty:ty => $kind:ident, $atomic:ty, $bits:ty);* $(;)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
                const MISSING: Self = <$ty>::NAN;
                type Atomic = $atomic;

                #[inline]
                fn is_absent(self) -> bool {
                    self.is_nan()
                }

                #[inline]
                fn to_bits_u64(self) -> u64 {
                    self.to_bits() as u64
                }

                #[inline]
                fn from_bits_u64(bits: u64) -> Self {
                    <$ty>::from_bits(bits as $bits)
                }
            }

            impl AtomicElement<$ty> for $atomic {
                #[inline]
                fn new(value: $ty) -> Self {
                    <$atomic>::new(value.to_bits())
                }

                #[inline]
                fn load(&self, order: Ordering) -> $ty {
                    <$ty>::from_bits(<$atomic>::load(self, order))
                }

                #[inline]
                fn store(&self, value: $ty, order: Ordering) {
                    <$atomic>::store(self, value.to_bits(), order)
                }
            }
        )*
    };
}

float_element! {
    f32 => F32, AtomicU32, u32;
    f64 => F64, AtomicU64, u64;
}

impl sealed::Sealed for bool {}

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bool;
    const MISSING: Self = false;
    type Atomic = AtomicBool;

    #[inline]
    fn to_bits_u64(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_bits_u64(bits: u64) -> Self {
        bits != 0
    }
}

impl AtomicElement<bool> for AtomicBool {
    #[inline]
    fn new(value: bool) -> Self {
        AtomicBool::new(value)
    }

    #[inline]
    fn load(&self, order: Ordering) -> bool {
        AtomicBool::load(self, order)
    }

    #[inline]
    fn store(&self, value: bool, order: Ordering) {
        AtomicBool::store(self, value, order)
    }
}

/// Conversion between element kinds with `as` semantics.
///
/// Floating to integer truncates toward zero and saturates; `NaN` (the
/// floating absent marker) becomes the integer missing value `0` and the
/// boolean missing value `false`.
pub trait CastFrom<S>: Sized {
    fn cast_from(value: S) -> Self;
}

macro_rules! cast_numeric {
    ($($src:ty),*) => {
        $( cast_numeric!(@from $src => i8, i16, i32, i64, f32, f64); )*
    };
    (@from $src:ty => $($dst:ty),*) => {
        $(
            impl CastFrom<$src> for $dst {
                #[inline]
                fn cast_from(value: $src) -> Self {
                    value as $dst
                }
            }
        )*
    };
}

cast_numeric!(i8, i16, i32, i64, f32, f64);

macro_rules! cast_bool {
    (ints: $($int:ty),*; floats: $($float:ty),*) => {
        $(
            impl CastFrom<bool> for $int {
                #[inline]
                fn cast_from(value: bool) -> Self {
                    <$int>::from(value)
                }
            }

            impl CastFrom<$int> for bool {
                #[inline]
                fn cast_from(value: $int) -> Self {
                    value != 0
                }
            }
        )*
        $(
            impl CastFrom<bool> for $float {
                #[inline]
                fn cast_from(value: bool) -> Self {
                    if value { 1.0 } else { 0.0 }
                }
            }

            impl CastFrom<$float> for bool {
                #[inline]
                fn cast_from(value: $float) -> Self {
                    !value.is_nan() && value != 0.0
                }
            }
        )*
    };
}

cast_bool!(ints: i8, i16, i32, i64; floats: f32, f64);

impl CastFrom<bool> for bool {
    #[inline]
    fn cast_from(value: bool) -> Self {
        value
    }
}
