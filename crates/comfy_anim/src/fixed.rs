//! Q24.8 fixed-point arithmetic
//!
//! Every animated quantity (positions, velocities, progress ratios and spring
//! constants) is a signed 32-bit value whose low 8 bits hold the fraction.
//! Results are bit-for-bit reproducible on any host: no floating point is
//! involved in the engine itself.
//!
//! Addition and subtraction wrap on overflow (two's complement). Products
//! are formed in 64 bits and shifted back down with an arithmetic shift, so
//! the intermediate never truncates.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Shr, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::FixedError;

/// Number of fractional bits
pub const FRACTIONAL_BITS: u32 = 8;

/// Raw value of `1.0`
pub const SCALE: i32 = 1 << FRACTIONAL_BITS;

/// A signed Q24.8 fixed-point number
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(SCALE);
    pub const HALF: Fixed = Fixed(SCALE >> 1);
    /// Smallest representable step (1/256)
    pub const EPSILON: Fixed = Fixed(1);
    /// Largest whole number that converts without wrapping
    pub const MAX_INT: i32 = i32::MAX >> FRACTIONAL_BITS;
    /// Smallest whole number that converts without wrapping
    pub const MIN_INT: i32 = i32::MIN >> FRACTIONAL_BITS;

    /// Wrap raw Q24.8 bits
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    /// Raw Q24.8 bits
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Convert a whole number (shift left by 8)
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Fixed(n << FRACTIONAL_BITS)
    }

    /// Convert a whole number, `None` outside `MIN_INT..=MAX_INT`
    #[inline]
    pub const fn checked_from_int(n: i64) -> Option<Self> {
        if n < Self::MIN_INT as i64 || n > Self::MAX_INT as i64 {
            return None;
        }
        Some(Fixed((n as i32) << FRACTIONAL_BITS))
    }

    /// Truncate toward negative infinity (arithmetic shift right by 8)
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACTIONAL_BITS
    }

    /// Round to the nearest whole number, halves rounding up
    #[inline]
    pub const fn round_to_int(self) -> i32 {
        self.0.wrapping_add(Self::HALF.0) >> FRACTIONAL_BITS
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Fixed(self.0.wrapping_abs())
    }

    /// Fixed-point product: exact 64-bit product shifted right by 8
    #[inline]
    pub const fn mul_fixed(self, rhs: Fixed) -> Fixed {
        Fixed(((self.0 as i64 * rhs.0 as i64) >> FRACTIONAL_BITS) as i32)
    }

    /// Fixed-point quotient
    ///
    /// The dividend is widened by 8 bits before the integer division, which
    /// truncates toward zero.
    #[inline]
    pub const fn checked_div(self, rhs: Fixed) -> Result<Fixed, FixedError> {
        if rhs.0 == 0 {
            return Err(FixedError::DivisionByZero);
        }
        Ok(Fixed((((self.0 as i64) << FRACTIONAL_BITS) / rhs.0 as i64) as i32))
    }

    /// Fixed-point quotient
    ///
    /// # Panics
    ///
    /// Panics when `rhs` is zero. A zero divisor in the engine is always a
    /// configuration bug (zero duration or zero mass).
    #[inline]
    #[track_caller]
    pub fn div_fixed(self, rhs: Fixed) -> Fixed {
        match self.checked_div(rhs) {
            Ok(q) => q,
            Err(err) => panic!("{err}"),
        }
    }

    /// Lossy conversion for diagnostics and display only
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / SCALE as f32
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        self.mul_fixed(rhs)
    }
}

/// Scale by a plain integer (no fractional shift)
impl Mul<i32> for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(self.0.wrapping_mul(rhs))
    }
}

impl std::ops::Div for Fixed {
    type Output = Fixed;

    #[inline]
    #[track_caller]
    fn div(self, rhs: Fixed) -> Fixed {
        self.div_fixed(rhs)
    }
}

/// Arithmetic shift on the raw bits (`>> 1` halves, rounding down)
impl Shr<u32> for Fixed {
    type Output = Fixed;

    #[inline]
    fn shr(self, rhs: u32) -> Fixed {
        Fixed(self.0 >> rhs)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0 as i64;
        let magnitude = raw.abs();
        let whole = magnitude >> FRACTIONAL_BITS;
        let hundredths = (magnitude & (SCALE as i64 - 1)) * 100 / SCALE as i64;
        let sign = if raw < 0 { "-" } else { "" };
        write!(f, "{sign}{whole}.{hundredths:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        for n in [-70_000, -129, -1, 0, 1, 7, 255, 8_388_607] {
            assert_eq!(Fixed::from_int(n).to_int(), n);
        }
    }

    #[test]
    fn test_checked_from_int_bounds() {
        assert_eq!(Fixed::checked_from_int(8_388_607), Some(Fixed::from_int(8_388_607)));
        assert_eq!(Fixed::checked_from_int(-8_388_608), Some(Fixed::from_int(-8_388_608)));
        assert_eq!(Fixed::checked_from_int(8_388_608), None);
        assert_eq!(Fixed::checked_from_int(-8_388_609), None);
        assert_eq!(Fixed::checked_from_int(1 << 24), None);
    }

    #[test]
    fn test_to_f32() {
        assert_eq!((Fixed::from_int(3) + Fixed::HALF).to_f32(), 3.5);
        assert_eq!(Fixed::from_bits(-0x40).to_f32(), -0.25);
    }

    #[test]
    fn test_to_int_floors_negative_values() {
        assert_eq!(Fixed::from_bits(-1).to_int(), -1);
        assert_eq!(Fixed::from_bits(-0x80).to_int(), -1);
        assert_eq!(Fixed::from_bits(0xFF).to_int(), 0);
    }

    #[test]
    fn test_multiplicative_identity() {
        for bits in [-0x1234, -1, 0, 1, 0x80, 0x6400, 0x7F_FFFF] {
            let x = Fixed::from_bits(bits);
            assert_eq!(Fixed::ONE * x, x);
            assert_eq!(x / Fixed::ONE, x);
        }
    }

    #[test]
    fn test_mul_uses_wide_intermediate() {
        // 40000 * 40000 overflows 32 bits before the shift
        let a = Fixed::from_int(200);
        let b = Fixed::from_int(200);
        assert_eq!(a * b, Fixed::from_int(40_000));
    }

    #[test]
    fn test_mul_shift_rounds_toward_negative_infinity() {
        let half_step = Fixed::from_bits(1) * Fixed::HALF;
        assert_eq!(half_step, Fixed::ZERO);
        let neg_half_step = Fixed::from_bits(-1) * Fixed::HALF;
        assert_eq!(neg_half_step, Fixed::from_bits(-1));
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        let third = Fixed::ONE / Fixed::from_int(3);
        assert_eq!(third.to_bits(), 85);
        let neg_third = -Fixed::ONE / Fixed::from_int(3);
        assert_eq!(neg_third.to_bits(), -85);
    }

    #[test]
    fn test_checked_div_by_zero() {
        assert_eq!(
            Fixed::ONE.checked_div(Fixed::ZERO),
            Err(FixedError::DivisionByZero)
        );
    }

    #[test]
    #[should_panic(expected = "fixed-point division by zero")]
    fn test_div_by_zero_panics() {
        let _ = Fixed::ONE / Fixed::ZERO;
    }

    #[test]
    fn test_round_to_int() {
        let ten = Fixed::from_int(10);
        assert_eq!((ten + Fixed::from_bits(0x7F)).round_to_int(), 10);
        assert_eq!((ten + Fixed::from_bits(0x80)).round_to_int(), 11);
        assert_eq!((ten + Fixed::from_bits(0x81)).round_to_int(), 11);
        assert_eq!(Fixed::from_bits(-0x81).round_to_int(), -1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fixed::from_int(3).to_string(), "3.00");
        assert_eq!((Fixed::from_int(10) + Fixed::HALF).to_string(), "10.50");
        assert_eq!((-Fixed::from_int(2) - Fixed::HALF).to_string(), "-2.50");
    }
}
