//! Reporting read model definitions.

pub mod occupancy {
    //! Occupancy report rows.

    use common::Area;

    use crate::domain::building;
    #[cfg(doc)]
    use crate::domain::{Building, Contract};

    /// Per-[`Building`] occupancy figures as fetched from the store.
    ///
    /// `rented` sums the areas of spaces under active [`Contract`]s whose
    /// window contains the report day, uncapped: capping against `total`
    /// happens in the summarization step.
    #[derive(Clone, Debug)]
    pub struct BuildingRow {
        /// ID of the [`Building`].
        pub building_id: building::Id,

        /// Name of the [`Building`].
        pub building_name: building::Name,

        /// Total rentable [`Area`] of the [`Building`].
        pub total: Area,

        /// [`Area`] under active [`Contract`]s, uncapped.
        pub rented: Area,
    }
}

pub mod revenue {
    //! Revenue report rows.

    use common::Money;

    use crate::domain::{building, customer};
    #[cfg(doc)]
    use crate::domain::{Building, Contract, Customer};

    /// Company-wide revenue summary over a date range.
    #[derive(Clone, Copy, Debug)]
    pub struct Summary {
        /// Total rent of tiers overlapping the range on active
        /// [`Contract`]s.
        pub total: Money,

        /// Number of distinct active [`Contract`]s contributing to the
        /// total.
        pub active_contracts: i64,
    }

    /// Per-[`Building`] revenue breakdown row.
    #[derive(Clone, Debug)]
    pub struct BuildingRow {
        /// ID of the [`Building`].
        pub building_id: building::Id,

        /// Name of the [`Building`].
        pub building_name: building::Name,

        /// Total rent attributed to the [`Building`].
        pub total_rent: Money,

        /// Number of distinct active [`Contract`]s in the [`Building`].
        pub contracts: i64,
    }

    /// Monthly revenue trend row.
    #[derive(Clone, Debug)]
    pub struct MonthRow {
        /// Month in `YYYY-MM` form.
        pub month: String,

        /// Rent of tiers starting within the month.
        pub revenue: Money,
    }

    /// Top-[`Customer`] revenue row.
    #[derive(Clone, Debug)]
    pub struct CustomerRow {
        /// ID of the [`Customer`].
        pub customer_id: customer::Id,

        /// Name of the [`Customer`].
        pub customer_name: customer::Name,

        /// Total rent across the [`Customer`]'s active [`Contract`]s.
        pub total_rent: Money,

        /// Number of the [`Customer`]'s distinct active [`Contract`]s.
        pub contracts: i64,
    }
}
