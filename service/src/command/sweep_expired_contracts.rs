//! [`Command`] for sweeping outdated [`Contract`]s into expiry.

use common::{
    operations::{By, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read,
    Service,
};
#[cfg(doc)]
use crate::domain::{contract::Status, Contract};

use super::Command;

/// [`Command`] for bulk-applying the [`Status::Active`] →
/// [`Status::Expired`] transition to every [`Contract`] whose end date is
/// strictly before the provided day.
///
/// The sweep is idempotent: its predicate only matches active rows, so
/// re-running it with the same day transitions nothing further and reports
/// zero. Concurrent passes are expected to be serialized by the scheduling
/// caller (a single background task slot).
#[derive(Clone, Copy, Debug)]
pub struct SweepExpiredContracts {
    /// Day the sweep considers "today": contracts ending strictly before it
    /// expire.
    pub as_of: Date,
}

impl<Db, St> Command<SweepExpiredContracts> for Service<Db, St>
where
    Db: Database<
        Update<By<read::contract::Expired, Date>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SweepExpiredContracts,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SweepExpiredContracts { as_of } = cmd;

        self.database()
            .execute(Update(By::<read::contract::Expired, _>::new(as_of)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SweepExpiredContracts`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
