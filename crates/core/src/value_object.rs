//! Monetary amounts.

use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Amount of money in the smallest currency unit.
///
/// Signed so that intermediate previews over not-yet-valid input (e.g. a
/// negative quantity typed into a form) stay representable. Arithmetic
/// saturates instead of wrapping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Amount for `quantity` units at this unit price.
    pub fn times(self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Money)
            .map_err(|_| DomainError::validation(format!("'{}' is not a valid amount", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_and_sum() {
        let total: Money = [Money::new(1000).times(2), Money::new(2000).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(8000));
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Money::new(i64::MAX).times(2), Money::new(i64::MAX));
        assert_eq!(Money::new(i64::MAX) + Money::new(1), Money::new(i64::MAX));
    }

    #[test]
    fn parses_amount_text() {
        assert_eq!(" 2500 ".parse::<Money>().unwrap(), Money::new(2500));
        assert!("12abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }
}
