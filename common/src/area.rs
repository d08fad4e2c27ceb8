//! [`Area`]-related definitions.

use std::{iter::Sum, ops, str::FromStr};

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Floor area in square meters.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Into, Ord, PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Area(Decimal);

impl Area {
    /// [`Area`] of zero square meters.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Area`] out of the provided square meters amount.
    #[must_use]
    pub const fn new(sqm: Decimal) -> Self {
        Self(sqm)
    }

    /// Returns the raw [`Decimal`] square meters of this [`Area`].
    #[must_use]
    pub const fn sqm(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Area`] is zero square meters.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns this [`Area`] limited to the provided one.
    #[must_use]
    pub fn capped_at(self, limit: Self) -> Self {
        if self > limit {
            limit
        } else {
            self
        }
    }

    /// Subtracts the provided [`Area`] from this one, flooring at zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs > self {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }
}

impl ops::Add for Area {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Area {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Area {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self).map_err(|_| "invalid area")
    }
}

#[cfg(test)]
mod spec {
    use super::Area;

    fn area(s: &str) -> Area {
        s.parse().unwrap()
    }

    #[test]
    fn capped_at() {
        assert_eq!(area("400").capped_at(area("1000")), area("400"));
        assert_eq!(area("1200").capped_at(area("1000")), area("1000"));
        assert_eq!(area("1000").capped_at(area("1000")), area("1000"));
    }

    #[test]
    fn saturating_sub() {
        assert_eq!(area("1000").saturating_sub(area("400")), area("600"));
        assert_eq!(area("400").saturating_sub(area("1000")), Area::ZERO);
    }
}
