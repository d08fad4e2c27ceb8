//! [`Document`] definitions.

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contract;
#[cfg(doc)]
use crate::domain::Contract;

/// File attached to a [`Contract`] (scan of the signed papers, floor plans,
/// etc.), stored in an external document storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// ID of this [`Document`].
    pub id: Id,

    /// ID of the [`Contract`] owning this [`Document`].
    pub contract_id: contract::Id,

    /// Original [`FileName`] of this [`Document`].
    pub file_name: FileName,

    /// Opaque [`FilePath`] of this [`Document`] in the document storage.
    pub file_path: FilePath,

    /// Size of this [`Document`] in bytes.
    pub file_size: FileSize,

    /// MIME type of this [`Document`], if known.
    pub file_type: Option<FileType>,

    /// [`DateTime`] when this [`Document`] was uploaded.
    ///
    /// [`DateTime`]: common::DateTime
    pub uploaded_at: UploadDateTime,
}

/// ID of a [`Document`].
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

/// Original file name of a [`Document`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FileName(String);

impl FileName {
    /// Creates a new [`FileName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty() && name.len() <= 255).then_some(Self(name))
    }
}

impl FromStr for FileName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FileName`")
    }
}

/// Opaque path of a [`Document`] within the document storage.
///
/// Issued by the storage on upload and only meaningful to it.
#[derive(
    AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FilePath(String);

/// Size of a [`Document`] in bytes.
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
pub struct FileSize(i64);

/// MIME type of a [`Document`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FileType(String);

/// [`DateTime`] when a [`Document`] was uploaded.
///
/// [`DateTime`]: common::DateTime
pub type UploadDateTime = DateTimeOf<(Document, unit::Upload)>;
