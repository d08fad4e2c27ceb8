//! [`Query`] collection related to [`Contract`] [`Document`]s.

use std::time::Duration;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        company,
        contract::{self, document, Document},
    },
    infra::{
        database, storage,
        storage::{SignedUrl, Url},
        Database, Storage,
    },
    Service,
};
#[cfg(doc)]
use crate::domain::Contract;

use super::Query;

/// [`Query`] issuing a temporary download [`Url`] for a [`Document`] of a
/// [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct DocumentUrl {
    /// ID of the company the [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Contract`] owning the [`Document`].
    pub contract_id: contract::Id,

    /// ID of the [`Document`] to issue the [`Url`] for.
    pub document_id: document::Id,

    /// How long the issued [`Url`] stays valid.
    pub ttl: Duration,
}

impl<Db, St> Query<DocumentUrl> for Service<Db, St>
where
    Db: Database<
        Select<
            By<Option<Document>, (company::Id, contract::Id, document::Id)>,
        >,
        Ok = Option<Document>,
        Err = Traced<database::Error>,
    >,
    St: Storage<SignedUrl, Ok = Url, Err = Traced<storage::Error>>,
{
    type Ok = Url;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: DocumentUrl) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DocumentUrl {
            company_id,
            contract_id,
            document_id,
            ttl,
        } = query;

        let document = self
            .database()
            .execute(Select(By::<Option<Document>, _>::new((
                company_id,
                contract_id,
                document_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DocumentNotExists(document_id))
            .map_err(tracerr::wrap!())?;

        self.storage()
            .execute(SignedUrl {
                path: document.file_path,
                ttl,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DocumentUrl`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Document`] with the provided ID does not exist.
    #[display("`Document(id: {_0})` does not exist")]
    DocumentNotExists(#[error(not(source))] document::Id),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    #[from]
    Storage(storage::Error),
}
