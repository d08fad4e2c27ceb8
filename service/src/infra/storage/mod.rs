//! Document storage infrastructure.

pub mod in_memory;

use std::time::Duration;

use derive_more::{Display, Error as StdError};

use crate::domain::{
    contract,
    contract::document::{FileName, FilePath, FileType},
};
#[cfg(doc)]
use crate::domain::{contract::Document, Contract};

pub use self::in_memory::InMemory;

/// Document storage operation.
pub use common::Handler as Storage;

/// Operation to upload a file into a [`Storage`], returning the opaque
/// [`FilePath`] it was stored under.
#[derive(Clone, Debug)]
pub struct Upload {
    /// Raw bytes of the file.
    pub bytes: Vec<u8>,

    /// Original [`FileName`] of the file.
    pub file_name: FileName,

    /// MIME type of the file, if known.
    pub content_type: Option<FileType>,

    /// [`Folder`] to store the file under.
    pub folder: Folder,
}

/// Operation to issue a temporary download [`Url`] for a stored file.
#[derive(Clone, Debug)]
pub struct SignedUrl {
    /// [`FilePath`] of the stored file.
    pub path: FilePath,

    /// How long the issued [`Url`] stays valid.
    pub ttl: Duration,
}

/// Folder (path prefix) files are grouped under within a [`Storage`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Folder(String);

impl Folder {
    /// Returns the [`Folder`] grouping all [`Document`]s of the provided
    /// [`Contract`].
    #[must_use]
    pub fn of_contract(id: contract::Id) -> Self {
        Self(format!("contracts/{id}"))
    }
}

/// Temporary download URL of a stored file.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Url(String);

impl Url {
    /// Creates a new [`Url`] out of the provided string.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

/// [`Storage`] error.
///
/// A failed [`Upload`] inside a contract creation aborts the surrounding
/// database transaction: no document row is ever persisted without its file.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// No file is stored under the requested path.
    #[display("no file is stored under the `{_0}` path")]
    FileNotExists(#[error(not(source))] FilePath),
}
