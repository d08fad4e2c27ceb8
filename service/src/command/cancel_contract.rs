//! [`Command`] for cancelling a [`Contract`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        company,
        contract::{self, Status},
        Contract,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for abandoning a [`Status::Draft`] [`Contract`] before it
/// takes force.
#[derive(Clone, Copy, Debug)]
pub struct CancelContract {
    /// ID of the company the [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Contract`] to be cancelled.
    pub contract_id: contract::Id,
}

impl<Db, St> Command<CancelContract> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Contract>, (company::Id, contract::Id)>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelContract {
            company_id,
            contract_id,
        } = cmd;

        let mut contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new((
                company_id,
                contract_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        contract.status = contract
            .status
            .transition(Status::Cancelled)
            .map_err(|_| tracerr::new!(E::NotDraft(contract.status)))?;

        self.database()
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .then_some(())
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;
        contract.version = contract.version.bumped();

        Ok(contract)
    }
}

/// Error of [`CancelContract`] [`Command`] execution.
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

    /// [`Contract`] is not a draft, so cannot be cancelled.
    #[display("only draft contracts can be cancelled")]
    NotDraft(#[error(not(source))] Status),
}
