//! [`Customer`] definitions.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::company;
#[cfg(doc)]
use crate::domain::Contract;
#[cfg(doc)]
use common::DateTime;

/// Counterparty renting spaces under [`Contract`]s.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// ID of the company this [`Customer`] belongs to.
    pub company_id: company::Id,

    /// [`Name`] of this [`Customer`].
    pub name: Name,

    /// [`Kind`] of this [`Customer`].
    pub kind: Kind,

    /// Contact phone number of this [`Customer`], if any.
    pub phone: Option<Phone>,

    /// Contact email of this [`Customer`], if any.
    pub email: Option<Email>,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Customer`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Customer`].
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

/// Name of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 255
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Contact phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

/// Contact email of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

define_kind! {
    #[doc = "Kind of a [`Customer`]."]
    enum Kind {
        #[doc = "A private person."]
        Individual = 1,

        #[doc = "A legal entity."]
        Corporate = 2,
    }
}

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

/// [`DateTime`] when a [`Customer`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Customer, unit::Deletion)>;
