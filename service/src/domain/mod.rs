//! Domain entities definitions.

pub mod alert;
pub mod building;
pub mod company;
pub mod contract;
pub mod customer;
pub mod user;

pub use self::{
    alert::Alert, building::Building, contract::Contract, customer::Customer,
};
