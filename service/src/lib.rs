//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::error::Error;

use common::operations::{By, Start};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// [`task::ExpireContracts`] configuration.
    pub expire_contracts: task::expire_contracts::Config,

    /// [`task::NotifyExpiringContracts`] configuration.
    pub notify_expiring_contracts: task::notify_expiring_contracts::Config,
}

/// Domain service.
///
/// Generic over its infrastructure: `Db` is the persistence backend and
/// `St` the document storage backend.
#[derive(Clone, Debug)]
pub struct Service<Db, St> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Database of this [`Service`].
    database: Db,

    /// Document storage of this [`Service`].
    storage: St,
}

impl<Db, St> Service<Db, St> {
    /// Creates a new [`Service`] with the provided parameters, spawning its
    /// periodic background passes (contract expiry sweep and expiry alerts)
    /// into the returned [`task::Background`] environment.
    pub fn new(config: Config, database: Db, storage: St) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::ExpireContracts<Self>, task::expire_contracts::Config>>,
                Ok = (),
                Err: Error,
            > + Task<
                Start<
                    By<
                        task::NotifyExpiringContracts<Self>,
                        task::notify_expiring_contracts::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            storage,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().expire_contracts))).await
        });
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().notify_expiring_contracts)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the database of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the document storage of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &St {
        &self.storage
    }
}
