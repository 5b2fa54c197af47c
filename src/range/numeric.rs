//! Numeric element types a range can walk over

use std::fmt::{Debug, Display};

mod sealed {
    pub trait Sealed {}
}

/// Primitive numbers usable as range bounds and steps
///
/// Implemented for every primitive integer and for `f32`/`f64`.
pub trait Numeric: sealed::Sealed + Copy + PartialOrd + Debug + Display {
    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(self) -> bool;
    fn is_negative(self) -> bool;
    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    /// False for NaN and infinities
    fn is_finite(self) -> bool;
}

macro_rules! signed {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Numeric for $t {
            fn zero() -> Self { 0 }
            fn one() -> Self { 1 }
            fn is_zero(self) -> bool { self == 0 }
            fn is_negative(self) -> bool { self < 0 }
            fn checked_add(self, rhs: Self) -> Option<Self> { <$t>::checked_add(self, rhs) }
            fn checked_sub(self, rhs: Self) -> Option<Self> { <$t>::checked_sub(self, rhs) }
            fn is_finite(self) -> bool { true }
        }
    )*};
}

macro_rules! unsigned {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Numeric for $t {
            fn zero() -> Self { 0 }
            fn one() -> Self { 1 }
            fn is_zero(self) -> bool { self == 0 }
            fn is_negative(self) -> bool { false }
            fn checked_add(self, rhs: Self) -> Option<Self> { <$t>::checked_add(self, rhs) }
            fn checked_sub(self, rhs: Self) -> Option<Self> { <$t>::checked_sub(self, rhs) }
            fn is_finite(self) -> bool { true }
        }
    )*};
}

macro_rules! float {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Numeric for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn is_zero(self) -> bool { self == 0.0 }
            fn is_negative(self) -> bool { self < 0.0 }
            fn checked_add(self, rhs: Self) -> Option<Self> {
                let sum = self + rhs;
                sum.is_finite().then_some(sum)
            }
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                let diff = self - rhs;
                diff.is_finite().then_some(diff)
            }
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
        }
    )*};
}

signed!(i8, i16, i32, i64, i128, isize);
unsigned!(u8, u16, u32, u64, u128, usize);
float!(f32, f64);
