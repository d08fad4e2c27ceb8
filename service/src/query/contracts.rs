//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

use crate::{domain::Contract, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`Contract`]s of a company, newest first.
pub type List =
    DatabaseQuery<By<Vec<Contract>, read::contract::list::Selector>>;

/// Queries active [`Contract`]s whose end date falls into the upcoming
/// window, soonest-ending first.
pub type Expiring =
    DatabaseQuery<By<Vec<Contract>, read::contract::Expiring>>;
