//! [`Space`] definitions.

use common::{unit, Area, Date, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    building,
    contract::{self, period, Period},
};
#[cfg(doc)]
use crate::domain::{Building, Contract};

/// Rental space leased under a [`Contract`]: an [`Area`] on a floor of a
/// [`Building`], priced by its own sequence of [`Period`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Space {
    /// ID of this [`Space`].
    pub id: Id,

    /// ID of the [`Contract`] owning this [`Space`].
    pub contract_id: contract::Id,

    /// ID of the [`Building`] this [`Space`] is located in.
    pub building_id: building::Id,

    /// [`Floor`] label of this [`Space`], if any.
    pub floor: Option<Floor>,

    /// Leased [`Area`] of this [`Space`].
    pub area: Area,

    /// [`DateTime`] when this [`Space`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,

    /// Pricing [`Period`]s of this [`Space`], in [`period::Order`].
    pub periods: Vec<Period>,
}

impl Space {
    /// Creates a new [`Space`] of the provided [`Contract`] out of the given
    /// [`Draft`].
    ///
    /// Periods are sorted by start date and tagged with their 1-based
    /// [`period::Order`]. The caller is expected to have run
    /// [`period::validate()`] against the contract window beforehand.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn new(contract_id: contract::Id, draft: Draft) -> Self {
        let Draft {
            building_id,
            floor,
            area,
            mut periods,
        } = draft;

        let id = Id::new();
        periods.sort_by_key(|p| p.start);
        let periods = periods
            .into_iter()
            .enumerate()
            .map(|(i, p)| Period {
                id: period::Id::new(),
                space_id: id,
                start: p.start,
                end: p.end,
                rent: p.rent,
                service_fee: p.service_fee,
                order: period::Order::from(
                    i32::try_from(i + 1).expect("period count overflow"),
                ),
            })
            .collect();

        Self {
            id,
            contract_id,
            building_id,
            floor,
            area,
            created_at: DateTime::now().coerce(),
            periods,
        }
    }

    /// Returns the [`Period`] pricing this [`Space`] on the provided day.
    ///
    /// Falls back to the first [`Period`] in stored order in case no period
    /// covers the day (possible for a day outside the contract window), the
    /// same way the reporting figures do.
    #[must_use]
    pub fn period_at(&self, date: Date) -> Option<&Period> {
        self.periods
            .iter()
            .find(|p| p.covers(date))
            .or_else(|| self.periods.first())
    }

    /// Returns the rent amount of this [`Space`] in force on the provided
    /// day.
    #[must_use]
    pub fn rent_at(&self, date: Date) -> Option<Money> {
        self.period_at(date).map(|p| p.rent)
    }

    /// Returns the service fee of this [`Space`] in force on the provided
    /// day.
    #[must_use]
    pub fn service_fee_at(&self, date: Date) -> Option<Money> {
        self.period_at(date).map(|p| p.service_fee)
    }
}

/// Rental space requested for a new [`Contract`], not persisted yet.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Building`] the space is located in.
    pub building_id: building::Id,

    /// [`Floor`] label of the space, if any.
    pub floor: Option<Floor>,

    /// Leased [`Area`] of the space.
    pub area: Area,

    /// Proposed pricing tiers of the space.
    pub periods: Vec<period::Spec>,
}

/// ID of a [`Space`].
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

/// Free-text floor label of a [`Space`] (e.g. `3F`, `B1`, `Mezzanine`).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Floor(String);

impl Floor {
    /// Creates a new [`Floor`] label if the given one is valid.
    #[must_use]
    pub fn new(floor: impl Into<String>) -> Option<Self> {
        let floor = floor.into();
        let valid = floor.trim() == floor
            && !floor.is_empty()
            && floor.len() <= 20;
        valid.then_some(Self(floor))
    }
}

impl FromStr for Floor {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Floor`")
    }
}

/// [`DateTime`] when a [`Space`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Space, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::{building, contract, contract::period};

    use super::{Draft, Floor, Space};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn space() -> Space {
        Space::new(
            contract::Id::new(),
            Draft {
                building_id: building::Id::new(),
                floor: Floor::new("3F"),
                area: "400".parse().unwrap(),
                periods: vec![
                    period::Spec {
                        start: date("2024-07-01"),
                        end: date("2025-01-01"),
                        rent: money("1200"),
                        service_fee: money("250"),
                    },
                    period::Spec {
                        start: date("2024-01-01"),
                        end: date("2024-07-01"),
                        rent: money("1000"),
                        service_fee: money("200"),
                    },
                ],
            },
        )
    }

    #[test]
    fn prices_by_covering_period() {
        let space = space();

        assert_eq!(space.rent_at(date("2024-08-01")), Some(money("1200")));
        assert_eq!(space.rent_at(date("2024-03-15")), Some(money("1000")));
        assert_eq!(
            space.service_fee_at(date("2024-08-01")),
            Some(money("250")),
        );
    }

    #[test]
    fn boundary_day_belongs_to_the_earlier_period() {
        // Both tiers cover 2024-07-01; the first one in order wins.
        assert_eq!(space().rent_at(date("2024-07-01")), Some(money("1000")));
    }

    #[test]
    fn falls_back_to_first_period() {
        let space = space();

        // A day outside the window resolves to the first stored tier.
        assert_eq!(space.rent_at(date("2030-01-01")), Some(money("1000")));
        assert_eq!(space.rent_at(date("2020-01-01")), Some(money("1000")));
    }
}
