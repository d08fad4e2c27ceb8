//! [`NotifyExpiringContracts`] [`Task`].

use std::{collections::HashMap, convert::Infallible, error::Error, time};

use common::{
    operations::{By, Insert, Perform, Select, Start},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{alert, company, contract, customer, Alert, Contract, Customer},
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`NotifyExpiringContracts`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between alerting passes.
    pub interval: time::Duration,
}

/// [`Task`] periodically raising [`Alert`]s for [`Contract`]s approaching
/// their end date.
///
/// Each pass checks the 90/60/30 days-ahead thresholds and raises one
/// [`Alert`] per ([`Contract`], [`alert::Kind`]) pair at most, so re-running
/// a pass never duplicates notifications.
#[derive(Clone, Copy, Debug)]
pub struct NotifyExpiringContracts<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, St> Task<Start<By<NotifyExpiringContracts<Self>, Config>>>
    for Service<Db, St>
where
    NotifyExpiringContracts<Service<Db, St>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<NotifyExpiringContracts<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = NotifyExpiringContracts {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::NotifyExpiringContracts` failed: {e}");
            });
        }
    }
}

impl<Db, St> Task<Perform<()>> for NotifyExpiringContracts<Service<Db, St>>
where
    Db: Database<
            Select<By<Vec<Contract>, read::contract::Expiring>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<customer::Id, Customer>,
                    (company::Id, Vec<customer::Id>),
                >,
            >,
            Ok = HashMap<customer::Id, Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<alert::Id>, (contract::Id, alert::Kind)>>,
            Ok = Option<alert::Id>,
            Err = Traced<database::Error>,
        > + Database<Insert<Alert>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let today = Date::today();
        let db = self.service.database();

        for kind in [
            alert::Kind::Expiry90,
            alert::Kind::Expiry60,
            alert::Kind::Expiry30,
        ] {
            let contracts = db
                .execute(Select(By::<Vec<Contract>, _>::new(
                    read::contract::Expiring {
                        company_id: None,
                        as_of: today.plus_days(kind.days_ahead()),
                        within_days: 0,
                    },
                )))
                .await
                .map_err(tracerr::wrap!())?;

            let mut ids_by_company =
                HashMap::<company::Id, Vec<customer::Id>>::new();
            for contract in &contracts {
                ids_by_company
                    .entry(contract.company_id)
                    .or_default()
                    .push(contract.customer_id);
            }
            let mut customers = HashMap::new();
            for (company_id, customer_ids) in ids_by_company {
                customers.extend(
                    db.execute(Select(By::<
                        HashMap<customer::Id, Customer>,
                        _,
                    >::new((
                        company_id,
                        customer_ids,
                    ))))
                    .await
                    .map_err(tracerr::wrap!())?,
                );
            }

            for contract in contracts {
                let existing = db
                    .execute(Select(By::<Option<alert::Id>, _>::new((
                        contract.id,
                        kind,
                    ))))
                    .await
                    .map_err(tracerr::wrap!())?;
                if existing.is_some() {
                    continue;
                }

                let title = alert::Title::from(format!(
                    "Contract {} expires in {} days",
                    contract.number,
                    kind.days_ahead(),
                ));
                let message = alert::Message::from(
                    match customers.get(&contract.customer_id) {
                        Some(customer) => format!(
                            "Customer: {}. Contract ending on {}",
                            customer.name, contract.end,
                        ),
                        None => {
                            format!("Contract ending on {}", contract.end)
                        }
                    },
                );
                db.execute(Insert(Alert::new(
                    contract.company_id,
                    contract.id,
                    kind,
                    title,
                    message,
                )))
                .await
                .map_err(tracerr::wrap!())?;

                log::info!(
                    "created `{kind}` alert for contract `{}`",
                    contract.number,
                );
            }
        }

        Ok(())
    }
}

/// Error of [`NotifyExpiringContracts`] execution.
pub type ExecutionError = Traced<database::Error>;
