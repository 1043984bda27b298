use crate::error::{Error, Result};
use alloc::{
    format,
    string::{String, ToString},
};
use core::fmt;
use derive_more::Display;

///
/// A number: an integer or a real.
///
/// Integer arithmetic stays integral and reports overflow instead of
/// wrapping; as soon as a real is involved the result is a real.
///
#[derive(Debug, Clone, Copy, Display)]
pub enum Number {
    #[display("{_0}")]
    Int(i64),
    #[display("{}", ShortestReal(*_0))]
    Real(f64),
}

///
/// Shortest round-tripping text of a real.
///
/// Positional between `1e-4` and `1e16` (always with a fractional part,
/// `2.0`), scientific outside it with a signed two-digit exponent
/// (`1e+16`, `2.5e-05`).
///
struct ShortestReal(f64);

impl fmt::Display for ShortestReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        if r.is_nan() {
            return f.write_str("nan");
        }
        if r.is_infinite() {
            return f.write_str(if r < 0.0 { "-inf" } else { "inf" });
        }

        // `{:e}` yields the shortest digits, e.g. `-1.5e16` or `0e0`
        let sci = format!("{r:e}");
        let (mantissa, exp) = sci.split_once('e').ok_or(fmt::Error)?;
        let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;
        let (sign, mantissa) = match mantissa.strip_prefix('-') {
            Some(mantissa) => ("-", mantissa),
            None => ("", mantissa),
        };

        if !(-4..16).contains(&exp) {
            let exp_sign = if exp < 0 { '-' } else { '+' };
            return write!(f, "{sign}{mantissa}e{exp_sign}{:02}", exp.unsigned_abs());
        }

        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        if exp < 0 {
            let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
            return write!(f, "{sign}0.{zeros}{digits}");
        }

        let point = exp.unsigned_abs() as usize + 1;
        if digits.len() <= point {
            let zeros = "0".repeat(point - digits.len());
            write!(f, "{sign}{digits}{zeros}.0")
        } else {
            let (int, fract) = digits.split_at(point);
            write!(f, "{sign}{int}.{fract}")
        }
    }
}

macro_rules! from_primitive {
    ($variant:ident($inner:ty): $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self::$variant(<$inner>::from(value))
                }
            }
        )+
    };
}

macro_rules! try_from_primitive {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TryFrom<$ty> for Number {
                type Error = Error;

                fn try_from(value: $ty) -> Result<Self> {
                    i64::try_from(value)
                        .map(Self::Int)
                        .map_err(|_| Error::InvalidLiteral(value.to_string()))
                }
            }
        )+
    };
}

from_primitive!(Int(i64): i8, i16, i32, i64, u8, u16, u32);
from_primitive!(Real(f64): f32, f64);
try_from_primitive!(u64, u128, i128, usize, isize);

impl Number {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Real(r) => r,
        }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Real(r) => r == 0.0,
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn checked_neg(self) -> Result<Self> {
        match self {
            Self::Int(i) => i.checked_neg().map(Self::Int).ok_or(Error::Overflow),
            Self::Real(r) => Ok(Self::Real(-r)),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.arith(rhs, i64::checked_add, |a, b| a + b)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.arith(rhs, i64::checked_sub, |a, b| a - b)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn checked_mul(self, rhs: Self) -> Result<Self> {
        self.arith(rhs, i64::checked_mul, |a, b| a * b)
    }

    ///
    /// Real division. The result is always a [`Number::Real`].
    ///
    /// # Errors
    ///
    /// [`Error::ZeroDivision`] if `rhs` is zero.
    ///
    pub fn true_div(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }

        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Real(true_div_int(a, b))),
            (a, b) => Ok(Self::Real(a.as_f64() / b.as_f64())),
        }
    }

    ///
    /// Division rounded toward negative infinity.
    ///
    /// Two integers give an integer, anything else a real.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroDivision`] if `rhs` is zero, [`Error::Overflow`] for
    /// `i64::MIN // -1`.
    ///
    pub fn floor_div(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }

        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => {
                let quot = a.checked_div(b).ok_or(Error::Overflow)?;
                if a % b != 0 && (a < 0) != (b < 0) {
                    Ok(Self::Int(quot - 1))
                } else {
                    Ok(Self::Int(quot))
                }
            }
            (a, b) => Ok(Self::Real(floor_div_real(a.as_f64(), b.as_f64()))),
        }
    }

    fn arith(
        self,
        rhs: Self,
        int: fn(i64, i64) -> Option<i64>,
        real: fn(f64, f64) -> f64,
    ) -> Result<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => {
                int(a, b).map(Self::Int).ok_or(Error::Overflow)
            }
            (a, b) => Ok(Self::Real(real(a.as_f64(), b.as_f64()))),
        }
    }
}

//
// Correctly rounded `a / b` for integers too wide for an `f64` mantissa.
//
// The quotient is taken with at least 56 significant bits, and any
// remainder is folded into the lowest bit so the final rounding to 53 bits
// can't land on a false tie.
//
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn true_div_int(a: i64, b: i64) -> f64 {
    let bits = |x: u128| 128 - x.leading_zeros();

    let (num, den) = (u128::from(a.unsigned_abs()), u128::from(b.unsigned_abs()));
    let shift = (56 + bits(den)).saturating_sub(bits(num));
    let num = num << shift;
    let quot = num / den | u128::from(num % den != 0);

    let value = libm::scalbn(quot as f64, -(shift as i32));
    if (a < 0) != (b < 0) {
        -value
    } else {
        value
    }
}

//
// `floor(a / b)` loses precision when `a / b` rounds up to an integer,
// so derive the quotient from the remainder instead.
//
fn floor_div_real(a: f64, b: f64) -> f64 {
    let rem = libm::fmod(a, b);
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }

    if div == 0.0 {
        return libm::copysign(0.0, a / b);
    }

    let floor = libm::floor(div);
    if div - floor > 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

//
// Integers and reals compare by exact value, so `Int(2) == Real(2.0)`
// but `Int(i64::MAX) != Real(2^63)`.
//
impl PartialEq for Number {
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    fn eq(&self, other: &Self) -> bool {
        // 2^63, the first real past `i64::MAX`
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::Int(i), Self::Real(r)) | (Self::Real(r), Self::Int(i)) => {
                libm::trunc(r) == r && (-LIMIT..LIMIT).contains(&r) && r as i64 == i
            }
        }
    }
}
