//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Floating-point percentage.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// [`Percent`] of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided values is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be greater than `0` and less than `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Creates a new [`Percent`] as the rounded `part / whole` ratio.
    ///
    /// Zero is returned for a zero `whole`, and ratios above `1` are clamped
    /// to `100`.
    #[must_use]
    pub fn ratio(part: Decimal, whole: Decimal) -> Self {
        if whole.is_zero() {
            return Self::ZERO;
        }
        Self(
            ((part / whole) * Decimal::ONE_HUNDRED)
                .round()
                .min(Decimal::ONE_HUNDRED),
        )
    }

    /// Returns the raw [`Decimal`] value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn ratio() {
        assert_eq!(
            Percent::ratio(decimal("400"), decimal("1000")),
            Percent::new(decimal("40")).unwrap(),
        );
        assert_eq!(
            Percent::ratio(decimal("1"), decimal("3")),
            Percent::new(decimal("33")).unwrap(),
        );
        assert_eq!(Percent::ratio(decimal("10"), Decimal::ZERO), Percent::ZERO);
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(
            Percent::ratio(decimal("1500"), decimal("1000")),
            Percent::new(Decimal::ONE_HUNDRED).unwrap(),
        );
    }
}
