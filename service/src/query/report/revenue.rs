//! [`Revenue`] report definition.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date, Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::company,
    infra::{database, Database},
    read::report::revenue::{BuildingRow, CustomerRow, MonthRow, Summary},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::{Building, Contract, Customer};

/// Number of months the revenue trend looks back at.
const TREND_MONTHS: u32 = 11;

/// [`Query`] assembling the revenue report of a company over a date range.
#[derive(Clone, Copy, Debug)]
pub struct Revenue {
    /// ID of the company to report on.
    pub company_id: company::Id,

    /// First day of the reported range.
    pub start: Date,

    /// Last day of the reported range.
    pub end: Date,
}

/// Output of the [`Revenue`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Total rent of tiers overlapping the range on active [`Contract`]s.
    pub total_revenue: Money,

    /// Number of distinct active [`Contract`]s contributing to the total.
    pub active_contracts: i64,

    /// Average rent per active [`Contract`], zero when there are none.
    pub average_rent: Money,

    /// Per-[`Building`] revenue breakdown, highest first.
    pub by_building: Vec<BuildingRow>,

    /// Monthly revenue trend over the trailing 12 months (including the
    /// range end's month).
    pub monthly_trend: Vec<MonthRow>,

    /// Top 10 [`Customer`]s by the total rent of their active
    /// [`Contract`]s.
    pub top_customers: Vec<CustomerRow>,
}

impl<Db, St> Query<Revenue> for Service<Db, St>
where
    Db: Database<
            Select<By<Summary, (company::Id, RangeInclusive<Date>)>>,
            Ok = Summary,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Vec<BuildingRow>, (company::Id, RangeInclusive<Date>)>,
            >,
            Ok = Vec<BuildingRow>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<MonthRow>, (company::Id, Date)>>,
            Ok = Vec<MonthRow>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<CustomerRow>, company::Id>>,
            Ok = Vec<CustomerRow>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: Revenue) -> Result<Self::Ok, Self::Err> {
        let Revenue {
            company_id,
            start,
            end,
        } = query;
        let range = RangeInclusive::new(start, end);

        let summary = self
            .database()
            .execute(Select(By::<Summary, _>::new((
                company_id,
                range.clone(),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let by_building = self
            .database()
            .execute(Select(By::<Vec<BuildingRow>, _>::new((
                company_id,
                range,
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let monthly_trend = self
            .database()
            .execute(Select(By::<Vec<MonthRow>, _>::new((
                company_id,
                end.months_back(TREND_MONTHS),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let top_customers = self
            .database()
            .execute(Select(By::<Vec<CustomerRow>, _>::new(company_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output {
            total_revenue: summary.total,
            active_contracts: summary.active_contracts,
            average_rent: average(summary.total, summary.active_contracts),
            by_building,
            monthly_trend,
            top_customers,
        })
    }
}

/// Average rent per contract, zero when no contracts contributed.
fn average(total: Money, contracts: i64) -> Money {
    total
        .checked_div(Decimal::from(contracts))
        .unwrap_or(Money::ZERO)
}

#[cfg(test)]
mod spec {
    use common::Money;

    use super::average;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn averages_over_contracts() {
        assert_eq!(average(money("3000"), 4), money("750"));
    }

    #[test]
    fn averages_zero_without_contracts() {
        assert_eq!(average(Money::ZERO, 0), Money::ZERO);
    }
}
