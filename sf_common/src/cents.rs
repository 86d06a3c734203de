use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";

//--------------------------------------       Cents       -----------------------------------------------------------
/// A monetary amount in the gateway's minor currency unit (e.g. paise or cents).
///
/// All prices and totals in the store are held as `Cents`. The value is only ever converted to a major-unit
/// representation for display.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, SubAssign, sub_assign);
op!(unary Cents, Neg, neg);

impl Mul<i64> for Cents {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor currency units: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Cents {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Cents {}

impl TryFrom<u64> for Cents {
    type Error = CentsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(CentsConversionError(format!("Value {} is too large to convert to Cents", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let major = self.0 as f64 / 100.0;
        write!(f, "{major:0.2}")
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Build an amount from whole major units, e.g. `Cents::from_major(25)` is 25.00.
    pub fn from_major(major: i64) -> Self {
        Self(major * 100)
    }
}

#[cfg(test)]
mod test {
    use super::Cents;

    #[test]
    fn arithmetic_and_display() {
        let a = Cents::from(2599);
        let b = Cents::from_major(10);
        assert_eq!((a + b).value(), 3599);
        assert_eq!((b - a).value(), -1599);
        assert_eq!(a * 3, Cents::from(7797));
        assert_eq!(format!("{a}"), "25.99");
    }

    #[test]
    fn summing_line_totals() {
        let total: Cents = [Cents::from(100), Cents::from(250), Cents::from(99)].into_iter().sum();
        assert_eq!(total, Cents::from(449));
    }
}
