//! [`Contract`] read model definitions.

use std::collections::HashMap;

use common::Date;

use crate::domain::{building, company, Building, Contract, Customer};

/// [`Contract`] joined with the related entities it references.
///
/// This is the view the creation and renewal paths return: the owned
/// aggregate plus the [`Customer`] and [`Building`]s resolved within the
/// same company scope.
#[derive(Clone, Debug)]
pub struct Aggregate {
    /// The [`Contract`] itself, with its spaces, periods and documents.
    pub contract: Contract,

    /// [`Customer`] renting under the [`Contract`].
    pub customer: Customer,

    /// [`Building`]s hosting the [`Contract`]'s spaces, by their IDs.
    pub buildings: HashMap<building::Id, Building>,
}

pub mod list {
    //! [`Contract`]s list definitions.

    use crate::domain::{building, company, contract, customer};
    #[cfg(doc)]
    use crate::domain::Contract;

    /// Selector of a [`Contract`]s list.
    #[derive(Clone, Copy, Debug)]
    pub struct Selector {
        /// ID of the company to list [`Contract`]s of.
        pub company_id: company::Id,

        /// [`Filter`] to narrow the list with.
        pub filter: Filter,
    }

    /// Filter for a [`Contract`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`contract::Status`] to filter by.
        pub status: Option<contract::Status>,

        /// ID of the [`Customer`] to filter by.
        ///
        /// [`Customer`]: crate::domain::Customer
        pub customer_id: Option<customer::Id>,

        /// ID of the [`Building`] hosting some space to filter by.
        ///
        /// [`Building`]: crate::domain::Building
        pub building_id: Option<building::Id>,
    }
}

/// Selector of active [`Contract`]s whose end date falls into
/// `[as_of, as_of + within_days]`, ordered by end date.
#[derive(Clone, Copy, Debug)]
pub struct Expiring {
    /// ID of the company to select [`Contract`]s of.
    ///
    /// [`None`] selects across all companies (used by background passes).
    pub company_id: Option<company::Id>,

    /// Day the selection is made at.
    pub as_of: Date,

    /// Number of days ahead of `as_of` to look at.
    pub within_days: u16,
}

/// Marker of the bulk `Active → Expired` transition applied to every active
/// [`Contract`] whose end date already passed.
#[derive(Clone, Copy, Debug)]
pub struct Expired;
