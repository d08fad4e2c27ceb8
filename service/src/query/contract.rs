//! [`Query`] collection related to a single [`Contract`].

use common::operations::By;

use crate::{
    domain::{company, contract, Contract},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`] within a company scope.
pub type ById =
    DatabaseQuery<By<Option<Contract>, (company::Id, contract::Id)>>;

/// Queries a [`Contract`] joined with its customer and buildings by its
/// [`contract::Id`] within a company scope.
pub type AggregateById = DatabaseQuery<
    By<Option<read::contract::Aggregate>, (company::Id, contract::Id)>,
>;
