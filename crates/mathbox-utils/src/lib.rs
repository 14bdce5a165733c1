//! Utilities for mathbox.

#[macro_use]
mod macros;
mod hash;
mod scalar;

pub use self::hash::hash128;
pub use self::scalar::Scalar;

#[doc(hidden)]
pub use once_cell;

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use unicode_math_class::MathClass;

/// Extra methods for [`[T]`](slice).
pub trait SliceExt<T> {
    /// Returns the indices of the first and one past the last element that
    /// do not satisfy `f`.
    ///
    /// Everything before the first index and from the second index on
    /// satisfies `f`. If all elements satisfy `f`, both indices are equal.
    fn split_prefix_suffix<F>(&self, f: F) -> (usize, usize)
    where
        F: FnMut(&T) -> bool;
}

impl<T> SliceExt<T> for [T] {
    fn split_prefix_suffix<F>(&self, mut f: F) -> (usize, usize)
    where
        F: FnMut(&T) -> bool,
    {
        let start = self.iter().position(|v| !f(v)).unwrap_or(self.len());
        let end = self
            .iter()
            .skip(start)
            .rposition(|v| !f(v))
            .map_or(start, |i| start + i + 1);
        (start, end)
    }
}

/// A numeric type.
pub trait Numeric:
    Sized
    + Debug
    + Copy
    + PartialEq
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// The identity element for addition.
    fn zero() -> Self;

    /// Whether `self` is zero.
    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Whether `self` consists only of finite parts.
    fn is_finite(self) -> bool;
}

/// Returns the default math class of a character, if it has one.
///
/// A few characters get a class that differs from the Unicode data because
/// it spaces better in practice.
pub fn default_math_class(c: char) -> Option<MathClass> {
    match c {
        // Better spacing after a colon used as a relation, e.g. `f: A -> B`.
        ':' => Some(MathClass::Relation),

        // Ellipses are spaced like ordinary symbols next to operators.
        '⋯' | '⋱' | '⋰' | '⋮' => Some(MathClass::Normal),

        // Dots and slashes should not receive operator spacing.
        '.' | '/' => Some(MathClass::Normal),

        // `\perp` is a relation in Unicode, but mostly used as a symbol.
        '\u{22A5}' => Some(MathClass::Normal),

        _ => unicode_math_class::class(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefix_suffix() {
        let xs = [0, 0, 1, 2, 0, 3, 0];
        assert_eq!(xs.split_prefix_suffix(|&x| x == 0), (2, 6));
        let ys = [0, 0];
        assert_eq!(ys.split_prefix_suffix(|&x| x == 0), (2, 2));
        let zs: [i32; 0] = [];
        assert_eq!(zs.split_prefix_suffix(|&x| x == 0), (0, 0));
    }

    #[test]
    fn test_default_math_class() {
        assert_eq!(default_math_class('+'), Some(MathClass::Vary));
        assert_eq!(default_math_class('='), Some(MathClass::Relation));
        assert_eq!(default_math_class(':'), Some(MathClass::Relation));
        assert_eq!(default_math_class('.'), Some(MathClass::Normal));
        assert_eq!(default_math_class('('), Some(MathClass::Opening));
    }
}
