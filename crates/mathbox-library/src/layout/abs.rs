use std::fmt::{self, Debug, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use mathbox_utils::{Numeric, Scalar};
use serde::{Deserialize, Serialize};

/// An absolute length, measured in typographic points.
#[derive(
    Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Abs(Scalar);

impl Abs {
    /// Tolerance used for comparisons that must survive float rounding.
    pub const EPS: f64 = 1e-4;

    /// The zero length.
    pub const fn zero() -> Self {
        Self(Scalar::ZERO)
    }

    /// The infinite length.
    pub const fn inf() -> Self {
        Self(Scalar::INFINITY)
    }

    /// Create an absolute length from a number of points.
    pub const fn pt(pt: f64) -> Self {
        Self(Scalar::new(pt))
    }

    /// Get the value of this absolute length in points.
    pub const fn to_pt(self) -> f64 {
        self.0.get()
    }

    /// The maximum of this and the other length.
    pub fn max(self, other: Self) -> Self {
        if self >= other { self } else { other }
    }

    /// The minimum of this and the other length.
    pub fn min(self, other: Self) -> Self {
        if self <= other { self } else { other }
    }

    /// Set to the maximum of this and the other length.
    pub fn set_max(&mut self, other: Self) {
        *self = (*self).max(other);
    }

    /// Set to the minimum of this and the other length.
    pub fn set_min(&mut self, other: Self) {
        *self = (*self).min(other);
    }

    /// Whether the other length fits into this one (i.e. is smaller), up to
    /// [`Self::EPS`].
    pub fn fits(self, other: Self) -> bool {
        self.0.get() + Self::EPS >= other.0.get()
    }

    /// Compares two lengths for approximate equality.
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0.get() - other.0.get()).abs() < Self::EPS
    }

    /// The absolute value of this length.
    pub fn abs(self) -> Self {
        Self::pt(self.to_pt().abs())
    }
}

impl Numeric for Abs {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_finite(self) -> bool {
        self.0.get().is_finite()
    }
}

impl Debug for Abs {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}pt", self.to_pt())
    }
}

impl Neg for Abs {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Add for Abs {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Abs {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Mul<f64> for Abs {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self(self.0 * other)
    }
}

impl Mul<Abs> for f64 {
    type Output = Abs;

    fn mul(self, other: Abs) -> Abs {
        other * self
    }
}

impl Div<f64> for Abs {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self(self.0 / other)
    }
}

impl Div for Abs {
    type Output = f64;

    fn div(self, other: Self) -> f64 {
        self.to_pt() / other.to_pt()
    }
}

impl AddAssign for Abs {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for Abs {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl MulAssign<f64> for Abs {
    fn mul_assign(&mut self, other: f64) {
        self.0 *= other;
    }
}

impl DivAssign<f64> for Abs {
    fn div_assign(&mut self, other: f64) {
        self.0 /= other;
    }
}

impl Sum for Abs {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|s| s.0).sum())
    }
}

impl<'a> Sum<&'a Self> for Abs {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        Self(iter.map(|s| s.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abs_fits_with_tolerance() {
        assert!(Abs::pt(10.0).fits(Abs::pt(10.00001)));
        assert!(!Abs::pt(10.0).fits(Abs::pt(10.1)));
    }

    #[test]
    fn test_abs_sum_and_max() {
        let total: Abs = [Abs::pt(1.0), Abs::pt(2.5)].iter().sum();
        assert_eq!(total, Abs::pt(3.5));
        assert_eq!(Abs::pt(1.0).max(Abs::pt(-3.0)), Abs::pt(1.0));
    }
}
