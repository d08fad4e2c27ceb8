//! [`ExpireContracts`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Start, Update},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{sweep_expired_contracts, SweepExpiredContracts},
    infra::{database, Database},
    read, Service,
};
#[cfg(doc)]
use crate::domain::Contract;

use super::Task;

/// Configuration for [`ExpireContracts`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between expiry sweep passes.
    pub interval: time::Duration,
}

/// [`Task`] periodically expiring [`Contract`]s whose end date has passed.
///
/// Each pass runs the sweep at the current day. Passes tick within a single
/// [`Background`] slot, so they cannot overlap each other.
///
/// [`Background`]: super::Background
#[derive(Clone, Copy, Debug)]
pub struct ExpireContracts<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, St> Task<Start<By<ExpireContracts<Self>, Config>>>
    for Service<Db, St>
where
    ExpireContracts<Service<Db, St>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireContracts<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpireContracts {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::ExpireContracts` failed: {e}");
            });
        }
    }
}

impl<Db, St> Task<Perform<()>> for ExpireContracts<Service<Db, St>>
where
    Db: Database<
        Update<By<read::contract::Expired, Date>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let expired = self
            .service
            .execute(SweepExpiredContracts {
                as_of: Date::today(),
            })
            .await?;
        if expired > 0 {
            log::info!("expired {expired} outdated contracts");
        }
        Ok(())
    }
}

/// Error of [`ExpireContracts`] execution.
pub type ExecutionError = Traced<sweep_expired_contracts::ExecutionError>;
