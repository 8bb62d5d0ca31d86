use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Tolerance used when approximating a decimal with continued-fraction convergents.
const PRECISION: f64 = 1.0e-6;

/// Smallest `f64` that no longer fits in an `i64` (2^63).
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A reduced numerator/denominator pair, used to render shutter speeds such as `1/200`.
///
/// Values are produced by [`Fraction::from_decimal`], which always yields a
/// denominator of at least `1`.
///
/// # Example
///
/// ```rust
/// use exiframe::fraction::Fraction;
///
/// let shutter = Fraction::from_decimal(0.005).unwrap();
/// assert_eq!(shutter, Fraction::new(1, 200));
/// assert_eq!(shutter.to_string(), "1/200");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

/// Input the decimal-to-fraction conversion refuses to handle.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FractionError {
    #[error("cannot convert non-finite value {0} to a fraction")]
    NotFinite(f64),

    #[error("cannot convert negative value {0} to a fraction")]
    Negative(f64),

    #[error("value {0} does not fit in a 64-bit fraction")]
    OutOfRange(f64),
}

impl Fraction {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Approximate a non-negative decimal with the simplest fraction within `1e-6`.
    ///
    /// Walks the continued-fraction convergents of `number`, stopping as soon
    /// as the remaining fractional part drops below `1e-6 * k²` where `k` is
    /// the current denominator. Exact binary fractions and short repeating
    /// decimals resolve to their obvious form (`0.5` → `1/2`, `1/3` → `1/3`),
    /// and `0` resolves to `0/1` without iterating.
    ///
    /// NaN, infinities and negative numbers are rejected up front so the
    /// loop always terminates. Overflow of the integer convergents is
    /// reported as [`FractionError::OutOfRange`].
    pub fn from_decimal(number: f64) -> Result<Self, FractionError> {
        if !number.is_finite() {
            return Err(FractionError::NotFinite(number));
        }
        if number < 0.0 {
            return Err(FractionError::Negative(number));
        }

        let mut x = number;
        let mut a = x.floor();
        let (mut h1, mut k1, mut h, mut k) = (1_i64, 0_i64, whole_part(a, number)?, 1_i64);

        while x - a > PRECISION * (k as f64) * (k as f64) {
            x = 1.0 / (x - a);
            a = x.floor();
            let step = whole_part(a, number)?;
            let next_h = next_convergent(step, h, h1).ok_or(FractionError::OutOfRange(number))?;
            let next_k = next_convergent(step, k, k1).ok_or(FractionError::OutOfRange(number))?;
            (h1, k1, h, k) = (h, k, next_h, next_k);
        }

        Ok(Self::new(h, k))
    }

    /// Textual form `"<numerator>/<denominator>"`.
    pub fn fractional_expression(&self) -> String {
        self.to_string()
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl TryFrom<f64> for Fraction {
    type Error = FractionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

/// Convert an already-floored, non-negative float to `i64`.
fn whole_part(floored: f64, original: f64) -> Result<i64, FractionError> {
    if floored >= I64_LIMIT {
        return Err(FractionError::OutOfRange(original));
    }
    Ok(floored as i64)
}

/// `step * current + previous` with overflow checking.
fn next_convergent(step: i64, current: i64, previous: i64) -> Option<i64> {
    step.checked_mul(current)?.checked_add(previous)
}
