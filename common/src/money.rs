//! [`Money`]-related definitions.

use std::{iter::Sum, ops, str::FromStr};

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Monetary amount.
///
/// Amounts are fixed-point decimals. The deployment is single-currency, so
/// no currency dimension is carried: rent, service fees and deposits are all
/// denominated alike.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Into, Ord, PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// [`Money`] amount of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] out of the provided amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the raw [`Decimal`] amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Divides this [`Money`] amount by the provided divisor.
    ///
    /// [`None`] is returned in case of a zero divisor.
    #[must_use]
    pub fn checked_div(self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self).map_err(|_| "invalid amount")
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn money(s: &str) -> Money {
        Money::new(s.parse().unwrap())
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("123.45").unwrap(), money("123.45"));
        assert_eq!(Money::from_str("0").unwrap(), Money::ZERO);
        assert_eq!(Money::from_str("-17.50").unwrap(), money("-17.50"));

        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("12,50").is_err());
        assert!(Money::from_str("12.50USD").is_err());
    }

    #[test]
    fn is_positive() {
        assert!(money("0.01").is_positive());

        assert!(!Money::ZERO.is_positive());
        assert!(!money("-1").is_positive());
    }

    #[test]
    fn sums() {
        let total: Money =
            [money("1000"), money("1200"), money("0.50")].into_iter().sum();

        assert_eq!(total, money("2200.50"));
    }

    #[test]
    fn checked_div() {
        assert_eq!(
            money("300").checked_div(Decimal::from(4)),
            Some(money("75")),
        );
        assert_eq!(money("300").checked_div(Decimal::ZERO), None);
    }
}
