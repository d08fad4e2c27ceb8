//! [`Contract`] definitions.

pub mod document;
pub mod period;
pub mod space;

use common::{define_kind, unit, Date, DateTime, DateTimeOf, Money};
use derive_more::{
    AsRef, Display, Error, From, FromStr, Into,
};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{company, customer, user};
#[cfg(doc)]
use crate::domain::{Building, Customer};

pub use self::{document::Document, period::Period, space::Space};

/// Rental contract: the aggregate root of the leasing engine.
///
/// A [`Contract`] leases one or more rental [`Space`]s of a company's
/// [`Building`]s to a [`Customer`] over the `[start, end]` window, with every
/// [`Space`] priced by its own sequence of [`Period`]s exactly tiling that
/// window. [`Space`]s, their [`Period`]s and attached [`Document`]s are owned
/// by the [`Contract`] and never outlive it.
#[derive(Clone, Debug, PartialEq)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the company this [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Customer`] renting under this [`Contract`].
    pub customer_id: customer::Id,

    /// Human-readable [`Number`] of this [`Contract`].
    ///
    /// Unique within a company by convention, not enforced by the store.
    pub number: Number,

    /// First day of the contract window.
    pub start: Date,

    /// Last day of the contract window.
    pub end: Date,

    /// Deposit paid at this [`Contract`] signing.
    pub deposit: Money,

    /// Current [`Status`] of this [`Contract`].
    pub status: Status,

    /// ID of the [`Contract`] this one renews, if any.
    pub previous_contract_id: Option<Id>,

    /// Number of renewals in the chain ending at this [`Contract`].
    pub renewal_count: i32,

    /// ID of the user who created this [`Contract`].
    pub created_by: user::Id,

    /// Free-form [`Notes`] attached to this [`Contract`], if any.
    pub notes: Option<Notes>,

    /// [`Version`] of this [`Contract`] for optimistic concurrency.
    pub version: Version,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,

    /// Rental [`Space`]s leased under this [`Contract`].
    pub spaces: Vec<Space>,

    /// [`Document`]s attached to this [`Contract`].
    pub documents: Vec<Document>,
}

impl Contract {
    /// Assembles a new [`Status::Draft`] [`Contract`] from the provided
    /// [`Draft`], validating the window and every rental space's periods
    /// before anything else happens.
    ///
    /// Pass the renewed [`Contract`] as `previous` to chain a renewal: the
    /// new [`Contract`] references it and increments its renewal count.
    ///
    /// # Errors
    ///
    /// - [`DraftError::Window`] if the window is empty or inverted.
    /// - [`DraftError::Periods`] if any space's periods don't exactly tile
    ///   the window, or some rent amount is not positive.
    pub fn draft(args: Draft<'_>) -> Result<Self, DraftError> {
        let Draft {
            company_id,
            customer_id,
            number,
            start,
            end,
            deposit,
            notes,
            created_by,
            spaces,
            previous,
        } = args;

        if start >= end {
            return Err(DraftError::Window);
        }

        let id = Id::new();
        let spaces = spaces
            .into_iter()
            .map(|draft| {
                period::validate(&draft.periods, start, end)?;
                Ok(Space::new(id, draft))
            })
            .collect::<Result<Vec<_>, period::ValidationError>>()?;

        Ok(Self {
            id,
            company_id,
            customer_id,
            number,
            start,
            end,
            deposit: deposit.unwrap_or(Money::ZERO),
            status: Status::Draft,
            previous_contract_id: previous.map(|p| p.id),
            renewal_count: previous.map_or(0, |p| p.renewal_count + 1),
            created_by,
            notes,
            version: Version::default(),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            spaces,
            documents: vec![],
        })
    }

    /// Indicates whether this [`Contract`] is in force on the provided day.
    #[must_use]
    pub fn is_active_at(&self, date: Date) -> bool {
        self.status == Status::Active
            && self.deleted_at.is_none()
            && self.start <= date
            && date <= self.end
    }
}

/// Arguments for assembling a new [`Contract`] via [`Contract::draft()`].
#[derive(Clone, Debug)]
pub struct Draft<'c> {
    /// ID of the company the new [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Customer`] renting under the new [`Contract`].
    pub customer_id: customer::Id,

    /// Human-readable [`Number`] of the new [`Contract`].
    pub number: Number,

    /// First day of the contract window.
    pub start: Date,

    /// Last day of the contract window.
    pub end: Date,

    /// Deposit paid at the signing, if any.
    pub deposit: Option<Money>,

    /// Free-form [`Notes`], if any.
    pub notes: Option<Notes>,

    /// ID of the user creating the new [`Contract`].
    pub created_by: user::Id,

    /// Rental spaces leased under the new [`Contract`].
    pub spaces: Vec<space::Draft>,

    /// [`Contract`] being renewed by the new one, if any.
    pub previous: Option<&'c Contract>,
}

/// Error of assembling a new [`Contract`] via [`Contract::draft()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, From, PartialEq)]
pub enum DraftError {
    /// Contract window is empty or inverted.
    #[display("contract end date must be after its start date")]
    Window,

    /// Rent periods of some rental space are invalid.
    #[display("{_0}")]
    #[from]
    Periods(period::ValidationError),
}

/// ID of a [`Contract`].
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

/// Human-readable number of a [`Contract`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 50
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Free-form notes attached to a [`Contract`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// Creates a new [`Notes`] if the given `notes` are valid.
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        (!notes.is_empty() && notes.len() <= 2000).then_some(Self(notes))
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "The [`Contract`] is being prepared and is not in force."]
        Draft = 1,

        #[doc = "The [`Contract`] is in force."]
        Active = 2,

        #[doc = "The [`Contract`] reached its end date or was renewed."]
        Expired = 3,

        #[doc = "The [`Contract`] was ended early by either party."]
        Terminated = 4,

        #[doc = "The [`Contract`] was abandoned before taking force."]
        Cancelled = 5,
    }
}

impl Status {
    /// Indicates whether a [`Contract`] may change from this [`Status`] into
    /// the provided one.
    ///
    /// Legal changes are `Draft → Active`, `Draft → Cancelled`,
    /// `Active → Expired` and `Active → Terminated`. [`Status::Expired`],
    /// [`Status::Terminated`] and [`Status::Cancelled`] are terminal.
    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Active | Self::Cancelled)
                | (Self::Active, Self::Expired | Self::Terminated)
        )
    }

    /// Changes this [`Status`] into the provided one.
    ///
    /// # Errors
    ///
    /// If the change is not a legal transition (see
    /// [`Status::can_transition()`]).
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        self.can_transition(to)
            .then_some(to)
            .ok_or(InvalidTransition { from: self, to })
    }
}

/// Error of an illegal [`Status`] change.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot transition `Contract` from `{from}` to `{to}`")]
pub struct InvalidTransition {
    /// [`Status`] the change was attempted from.
    pub from: Status,

    /// [`Status`] the change was attempted into.
    pub to: Status,
}

/// Version of a [`Contract`] for optimistic concurrency control.
///
/// Every update of a [`Contract`] row carries the [`Version`] it was read at
/// and bumps the counter, so two actors mutating the same [`Contract`]
/// concurrently cannot silently overwrite each other.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub struct Version(i32);

impl Version {
    /// Returns the [`Version`] following this one.
    #[must_use]
    pub fn bumped(self) -> Self {
        Self(self.0 + 1)
    }
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Contract, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::{company, customer, user};

    use super::{
        period, space, Contract, Draft, DraftError, Number, Status, Version,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn tier(start: &str, end: &str, rent: &str) -> period::Spec {
        period::Spec {
            start: date(start),
            end: date(end),
            rent: money(rent),
            service_fee: Money::ZERO,
        }
    }

    fn draft<'c>(spaces: Vec<space::Draft>) -> Draft<'c> {
        Draft {
            company_id: company::Id::new(),
            customer_id: customer::Id::new(),
            number: Number::new("CT-2024-001").unwrap(),
            start: date("2024-01-01"),
            end: date("2025-01-01"),
            deposit: Some(money("5000")),
            notes: None,
            created_by: user::Id::new(),
            spaces,
            previous: None,
        }
    }

    fn one_space(periods: Vec<period::Spec>) -> Vec<space::Draft> {
        vec![space::Draft {
            building_id: crate::domain::building::Id::new(),
            floor: space::Floor::new("3F"),
            area: "400".parse().unwrap(),
            periods,
        }]
    }

    #[test]
    fn drafts_tile_the_window() {
        let contract = Contract::draft(draft(one_space(vec![
            // Deliberately unsorted input.
            tier("2024-07-01", "2025-01-01", "1200"),
            tier("2024-01-01", "2024-07-01", "1000"),
        ])))
        .unwrap();

        assert_eq!(contract.status, Status::Draft);
        assert_eq!(contract.version, Version::default());
        assert_eq!(contract.renewal_count, 0);
        assert_eq!(contract.previous_contract_id, None);

        let periods = &contract.spaces[0].periods;
        assert_eq!(periods[0].start, contract.start);
        assert_eq!(periods[periods.len() - 1].end, contract.end);
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(
            periods.iter().map(|p| i32::from(p.order)).collect::<Vec<_>>(),
            vec![1, 2],
        );
        assert_eq!(periods[0].rent, money("1000"));
    }

    #[test]
    fn draft_rejects_inverted_window() {
        let mut args = draft(one_space(vec![tier(
            "2024-01-01",
            "2025-01-01",
            "1000",
        )]));
        args.end = args.start;

        assert_eq!(Contract::draft(args), Err(DraftError::Window));
    }

    #[test]
    fn draft_rejects_gapped_periods() {
        let result = Contract::draft(draft(one_space(vec![
            tier("2024-01-01", "2024-06-01", "100"),
            tier("2024-07-01", "2025-01-01", "120"),
        ])));

        assert_eq!(
            result,
            Err(DraftError::Periods(period::ValidationError::GapOrOverlap)),
        );
    }

    #[test]
    fn draft_chains_renewals() {
        let old = Contract::draft(draft(one_space(vec![tier(
            "2024-01-01",
            "2025-01-01",
            "1000",
        )])))
        .unwrap();

        let mut args = draft(one_space(vec![tier(
            "2024-01-01",
            "2025-01-01",
            "1100",
        )]));
        args.previous = Some(&old);
        let renewed = Contract::draft(args).unwrap();

        assert_eq!(renewed.previous_contract_id, Some(old.id));
        assert_eq!(renewed.renewal_count, old.renewal_count + 1);
    }

    #[test]
    fn status_transitions() {
        use Status as S;

        let all = [S::Draft, S::Active, S::Expired, S::Terminated, S::Cancelled];
        for from in all {
            for to in all {
                let legal = matches!(
                    (from, to),
                    (S::Draft, S::Active | S::Cancelled)
                        | (S::Active, S::Expired | S::Terminated)
                );
                assert_eq!(
                    from.transition(to).is_ok(),
                    legal,
                    "{from} -> {to}",
                );
            }
        }

        // A second expiry pass must find nothing to transition.
        assert!(S::Expired.transition(S::Expired).is_err());
    }
}
