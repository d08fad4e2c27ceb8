//! Background [`Task`]s definitions.

mod background;
pub mod expire_contracts;
pub mod notify_expiring_contracts;

pub use common::Handler as Task;

pub use self::{
    background::Background, expire_contracts::ExpireContracts,
    notify_expiring_contracts::NotifyExpiringContracts,
};
