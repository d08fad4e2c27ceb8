//! [`Alert`] definitions.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{company, contract};
#[cfg(doc)]
use crate::domain::Contract;

/// Notification about a [`Contract`] approaching its end date.
///
/// At most one [`Alert`] exists per ([`Contract`], [`Kind`]) pair: the
/// background pass producing them checks for an existing one first.
#[derive(Clone, Debug)]
pub struct Alert {
    /// ID of this [`Alert`].
    pub id: Id,

    /// ID of the company this [`Alert`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Contract`] this [`Alert`] is about.
    pub contract_id: contract::Id,

    /// [`Kind`] of this [`Alert`].
    pub kind: Kind,

    /// Short [`Title`] of this [`Alert`].
    pub title: Title,

    /// Detailed [`Message`] of this [`Alert`].
    pub message: Message,

    /// Indicator whether this [`Alert`] has been read.
    pub is_read: bool,

    /// [`DateTime`] when this [`Alert`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Alert {
    /// Creates a new unread [`Alert`] with the provided parameters.
    #[must_use]
    pub fn new(
        company_id: company::Id,
        contract_id: contract::Id,
        kind: Kind,
        title: Title,
        message: Message,
    ) -> Self {
        Self {
            id: Id::new(),
            company_id,
            contract_id,
            kind,
            title,
            message,
            is_read: false,
            created_at: common::DateTime::now().coerce(),
        }
    }
}

/// ID of an [`Alert`].
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

/// Short title of an [`Alert`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

/// Detailed message of an [`Alert`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Message(String);

define_kind! {
    #[doc = "Kind of an [`Alert`]."]
    enum Kind {
        #[doc = "The [`Contract`] ends in 90 days."]
        Expiry90 = 1,

        #[doc = "The [`Contract`] ends in 60 days."]
        Expiry60 = 2,

        #[doc = "The [`Contract`] ends in 30 days."]
        Expiry30 = 3,
    }
}

impl Kind {
    /// Returns the number of days ahead of a [`Contract`]'s end date this
    /// [`Kind`] of [`Alert`] is raised at.
    #[must_use]
    pub fn days_ahead(self) -> u16 {
        match self {
            Self::Expiry90 => 90,
            Self::Expiry60 => 60,
            Self::Expiry30 => 30,
        }
    }
}

/// [`DateTime`] when an [`Alert`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Alert, unit::Creation)>;
