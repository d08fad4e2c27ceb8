//! [`Building`] definitions.

use common::{unit, Area, DateTimeOf};
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

/// Building whose floors are leased out under [`Contract`]s.
#[derive(Clone, Debug)]
pub struct Building {
    /// ID of this [`Building`].
    pub id: Id,

    /// ID of the company owning this [`Building`].
    pub company_id: company::Id,

    /// [`Name`] of this [`Building`].
    pub name: Name,

    /// [`Code`] of this [`Building`], unique within its company.
    pub code: Code,

    /// Total rentable [`Area`] of this [`Building`].
    pub rentable_area: Area,

    /// Number of floors in this [`Building`].
    pub total_floors: i32,

    /// [`DateTime`] when this [`Building`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Building`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Building`].
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

/// Name of a [`Building`].
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

/// Short code of a [`Building`], unique within a company.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Code(String);

impl Code {
    /// Creates a new [`Code`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Code`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.trim() == code && !code.is_empty() && code.len() <= 20
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Code`")
    }
}

/// [`DateTime`] when a [`Building`] was created.
pub type CreationDateTime = DateTimeOf<(Building, unit::Creation)>;

/// [`DateTime`] when a [`Building`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Building, unit::Deletion)>;
