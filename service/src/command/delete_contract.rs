//! [`Command`] for deleting a [`Contract`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{company, contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for soft-deleting a [`Contract`].
///
/// The row is tombstoned, never physically removed: every read path filters
/// deleted [`Contract`]s out, and the owned spaces, periods and documents
/// follow their aggregate. Guarded by the optimistic version the same way
/// status transitions are.
#[derive(Clone, Copy, Debug)]
pub struct DeleteContract {
    /// ID of the company the [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Contract`] to be deleted.
    pub contract_id: contract::Id,
}

impl<Db, St> Command<DeleteContract> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Contract>, (company::Id, contract::Id)>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Delete<Contract>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteContract {
            company_id,
            contract_id,
        } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new((
                company_id,
                contract_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(contract))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .then_some(())
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeleteContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] was modified concurrently.
    #[display("`Contract(id: {_0})` was modified concurrently")]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
