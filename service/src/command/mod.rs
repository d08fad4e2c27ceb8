//! [`Command`] definition.

pub mod activate_contract;
pub mod cancel_contract;
pub mod create_contract;
pub mod delete_contract;
pub mod renew_contract;
pub mod sweep_expired_contracts;
pub mod terminate_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    activate_contract::ActivateContract, cancel_contract::CancelContract,
    create_contract::CreateContract, delete_contract::DeleteContract,
    renew_contract::RenewContract,
    sweep_expired_contracts::SweepExpiredContracts,
    terminate_contract::TerminateContract,
};
