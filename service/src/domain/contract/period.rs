//! [`Period`] definitions.

use common::{Date, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contract::space;
#[cfg(doc)]
use crate::domain::{contract::Space, Contract};

/// Pricing tier of a rental [`Space`].
///
/// A [`Period`] fixes the rent and service fee of its [`Space`] for the
/// `[start, end]` day range. All [`Period`]s of one [`Space`] together tile
/// the parent [`Contract`]'s window contiguously, with no gaps and no
/// overlaps.
#[derive(Clone, Debug, PartialEq)]
pub struct Period {
    /// ID of this [`Period`].
    pub id: Id,

    /// ID of the [`Space`] this [`Period`] prices.
    pub space_id: space::Id,

    /// First day this [`Period`] applies.
    pub start: Date,

    /// Last day this [`Period`] applies.
    pub end: Date,

    /// Monthly rent amount during this [`Period`].
    pub rent: Money,

    /// Monthly service fee during this [`Period`].
    pub service_fee: Money,

    /// 1-based [`Order`] of this [`Period`] among its [`Space`]'s periods,
    /// following the start date order.
    pub order: Order,
}

impl Period {
    /// Indicates whether this [`Period`] applies on the provided day.
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns the total monthly amount of this [`Period`]: rent plus
    /// service fee.
    #[must_use]
    pub fn total(&self) -> Money {
        self.rent + self.service_fee
    }
}

/// ID of a [`Period`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// 1-based position of a [`Period`] among its [`Space`]'s periods.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Order(i32);

/// Proposed pricing tier of a rental space, not persisted yet.
#[derive(Clone, Copy, Debug)]
pub struct Spec {
    /// First day the tier applies.
    pub start: Date,

    /// Last day the tier applies.
    pub end: Date,

    /// Monthly rent amount during the tier.
    pub rent: Money,

    /// Monthly service fee during the tier.
    pub service_fee: Money,
}

/// Validates the proposed tiers of one rental space against the
/// `[window_start, window_end]` contract window.
///
/// The tiers (considered in start date order) must begin exactly at the
/// window start, end exactly at the window end, follow each other without
/// gaps or overlaps, and carry strictly positive rent amounts.
///
/// # Errors
///
/// See [`ValidationError`] for the violated rules.
pub fn validate(
    specs: &[Spec],
    window_start: Date,
    window_end: Date,
) -> Result<(), ValidationError> {
    use ValidationError as E;

    if specs.is_empty() {
        return Err(E::Empty);
    }

    let mut sorted = specs.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|s| s.start);

    if sorted[0].start != window_start {
        return Err(E::FirstPeriodMismatch);
    }
    if sorted[sorted.len() - 1].end != window_end {
        return Err(E::LastPeriodMismatch);
    }
    for pair in sorted.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(E::GapOrOverlap);
        }
    }

    if specs.iter().any(|s| !s.rent.is_positive()) {
        return Err(E::NonPositiveRent);
    }

    Ok(())
}

/// Error of [`validate`]ing proposed pricing tiers.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// No tiers were proposed at all.
    #[display("at least one rent period is required")]
    Empty,

    /// The earliest tier doesn't start the window.
    #[display("first rent period must start at contract start date")]
    FirstPeriodMismatch,

    /// The latest tier doesn't finish the window.
    #[display("last rent period must end at contract end date")]
    LastPeriodMismatch,

    /// Some adjacent tiers leave a gap or overlap each other.
    #[display("rent periods must be continuous without gaps or overlaps")]
    GapOrOverlap,

    /// Some tier carries a non-positive rent amount.
    #[display("rent amount must be greater than 0")]
    NonPositiveRent,
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use super::{validate, Spec, ValidationError as E};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn tier(start: &str, end: &str, rent: &str) -> Spec {
        Spec {
            start: date(start),
            end: date(end),
            rent: rent.parse().unwrap(),
            service_fee: Money::ZERO,
        }
    }

    const WINDOW: (&str, &str) = ("2024-01-01", "2025-01-01");

    fn check(specs: &[Spec]) -> Result<(), E> {
        validate(specs, date(WINDOW.0), date(WINDOW.1))
    }

    #[test]
    fn accepts_single_tier() {
        assert_eq!(check(&[tier(WINDOW.0, WINDOW.1, "1000")]), Ok(()));
    }

    #[test]
    fn accepts_unsorted_contiguous_tiers() {
        assert_eq!(
            check(&[
                tier("2024-07-01", "2025-01-01", "1200"),
                tier("2024-01-01", "2024-07-01", "1000"),
            ]),
            Ok(()),
        );
    }

    #[test]
    fn rejects_empty_list() {
        assert_eq!(check(&[]), Err(E::Empty));
    }

    #[test]
    fn rejects_late_first_tier() {
        assert_eq!(
            check(&[tier("2024-02-01", "2025-01-01", "1000")]),
            Err(E::FirstPeriodMismatch),
        );
    }

    #[test]
    fn rejects_short_last_tier() {
        assert_eq!(
            check(&[tier("2024-01-01", "2024-12-01", "1000")]),
            Err(E::LastPeriodMismatch),
        );
    }

    #[test]
    fn rejects_gap() {
        assert_eq!(
            check(&[
                tier("2024-01-01", "2024-06-01", "100"),
                tier("2024-07-01", "2025-01-01", "120"),
            ]),
            Err(E::GapOrOverlap),
        );
    }

    #[test]
    fn rejects_overlap() {
        assert_eq!(
            check(&[
                tier("2024-01-01", "2024-08-01", "100"),
                tier("2024-07-01", "2025-01-01", "120"),
            ]),
            Err(E::GapOrOverlap),
        );
    }

    #[test]
    fn rejects_non_positive_rent() {
        assert_eq!(
            check(&[
                tier("2024-01-01", "2024-07-01", "0"),
                tier("2024-07-01", "2025-01-01", "120"),
            ]),
            Err(E::NonPositiveRent),
        );
        assert_eq!(
            check(&[tier(WINDOW.0, WINDOW.1, "-5")]),
            Err(E::NonPositiveRent),
        );
    }
}
