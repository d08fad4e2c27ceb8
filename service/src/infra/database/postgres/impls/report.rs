//! Reporting [`Database`] implementations.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{building, company, contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::report::{occupancy, revenue},
};

impl<C>
    Database<
        Select<
            By<
                Vec<occupancy::BuildingRow>,
                (company::Id, Option<building::Id>, Date),
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<occupancy::BuildingRow>;
    type Err = Traced<database::Error>;

    /// Fetches the per-building rented area on the provided day: spaces
    /// under active contracts whose window contains the day, summed as-is
    /// (capping against the rentable area belongs to the summarization).
    async fn execute(
        &self,
        Select(by): Select<
            By<
                Vec<occupancy::BuildingRow>,
                (company::Id, Option<building::Id>, Date),
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, building_id, as_of) = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.name, b.rentable_area, \
                   COALESCE(\
                       SUM(cu.area_sqm) FILTER (WHERE rc.id IS NOT NULL), \
                       0\
                   ) AS rented_area \
            FROM buildings b \
            LEFT JOIN contract_units cu ON cu.building_id = b.id \
            LEFT JOIN rent_contracts rc ON rc.id = cu.contract_id \
               AND rc.status = $4::INT2 \
               AND rc.deleted_at IS NULL \
               AND rc.start_date <= $3::DATE \
               AND rc.end_date >= $3::DATE \
            WHERE b.company_id = $1::UUID \
              AND b.deleted_at IS NULL \
              AND ($2::UUID IS NULL OR b.id = $2::UUID) \
            GROUP BY b.id, b.name, b.rentable_area \
            ORDER BY b.name";
        Ok(self
            .query(
                SQL,
                &[
                    &company_id,
                    &building_id,
                    &as_of,
                    &contract::Status::Active,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| occupancy::BuildingRow {
                building_id: row.get("id"),
                building_name: row.get("name"),
                total: row.get("rentable_area"),
                rented: row.get("rented_area"),
            })
            .collect())
    }
}

impl<C>
    Database<
        Select<By<revenue::Summary, (company::Id, RangeInclusive<Date>)>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = revenue::Summary;
    type Err = Traced<database::Error>;

    /// Sums the rent of tiers overlapping the provided range across active,
    /// non-deleted contracts, following the periods → spaces → contracts
    /// join path.
    async fn execute(
        &self,
        Select(by): Select<
            By<revenue::Summary, (company::Id, RangeInclusive<Date>)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, range) = by.into_inner();

        const SQL: &str = "\
            SELECT COALESCE(SUM(rp.rent_amount), 0) AS total_revenue, \
                   COUNT(DISTINCT rc.id) AS active_contracts \
            FROM rent_contracts rc \
            JOIN contract_units cu ON cu.contract_id = rc.id \
            JOIN rent_periods rp ON rp.contract_unit_id = cu.id \
            WHERE rc.company_id = $1::UUID \
              AND rc.status = $2::INT2 \
              AND rc.deleted_at IS NULL \
              AND rp.start_date <= $4::DATE \
              AND rp.end_date >= $3::DATE";
        let row = self
            .query_opt(
                SQL,
                &[
                    &company_id,
                    &contract::Status::Active,
                    range.start(),
                    range.end(),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .expect("aggregate query always returns a row");

        Ok(revenue::Summary {
            total: row.get("total_revenue"),
            active_contracts: row.get("active_contracts"),
        })
    }
}

impl<C>
    Database<
        Select<
            By<Vec<revenue::BuildingRow>, (company::Id, RangeInclusive<Date>)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<revenue::BuildingRow>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<revenue::BuildingRow>, (company::Id, RangeInclusive<Date>)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, range) = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.name, \
                   COALESCE(SUM(rp.rent_amount), 0) AS total_rent, \
                   COUNT(DISTINCT rc.id) AS contracts \
            FROM buildings b \
            LEFT JOIN contract_units cu ON cu.building_id = b.id \
            LEFT JOIN rent_contracts rc ON rc.id = cu.contract_id \
               AND rc.status = $2::INT2 \
               AND rc.deleted_at IS NULL \
            LEFT JOIN rent_periods rp ON rp.contract_unit_id = cu.id \
               AND rc.id IS NOT NULL \
               AND rp.start_date <= $4::DATE \
               AND rp.end_date >= $3::DATE \
            WHERE b.company_id = $1::UUID \
              AND b.deleted_at IS NULL \
            GROUP BY b.id, b.name \
            ORDER BY total_rent DESC";
        Ok(self
            .query(
                SQL,
                &[
                    &company_id,
                    &contract::Status::Active,
                    range.start(),
                    range.end(),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| revenue::BuildingRow {
                building_id: row.get("id"),
                building_name: row.get("name"),
                total_rent: row.get("total_rent"),
                contracts: row.get("contracts"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<revenue::MonthRow>, (company::Id, Date)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<revenue::MonthRow>;
    type Err = Traced<database::Error>;

    /// Fetches the monthly revenue trend: rent of tiers starting on or
    /// after the provided month start, bucketed by their starting month.
    async fn execute(
        &self,
        Select(by): Select<By<Vec<revenue::MonthRow>, (company::Id, Date)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, since) = by.into_inner();

        const SQL: &str = "\
            SELECT to_char(rp.start_date, 'YYYY-MM') AS month, \
                   COALESCE(SUM(rp.rent_amount), 0) AS revenue \
            FROM rent_periods rp \
            JOIN contract_units cu ON cu.id = rp.contract_unit_id \
            JOIN rent_contracts rc ON rc.id = cu.contract_id \
            WHERE rc.company_id = $1::UUID \
              AND rc.deleted_at IS NULL \
              AND rp.start_date >= $2::DATE \
            GROUP BY month \
            ORDER BY month";
        Ok(self
            .query(SQL, &[&company_id, &since])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| revenue::MonthRow {
                month: row.get("month"),
                revenue: row.get("revenue"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<revenue::CustomerRow>, company::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<revenue::CustomerRow>;
    type Err = Traced<database::Error>;

    /// Fetches the top 10 customers by the total rent of their active
    /// contracts.
    async fn execute(
        &self,
        Select(by): Select<By<Vec<revenue::CustomerRow>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let company_id = by.into_inner();

        const SQL: &str = "\
            SELECT c.id, c.name, \
                   COALESCE(SUM(rp.rent_amount), 0) AS total_rent, \
                   COUNT(DISTINCT rc.id) AS contracts \
            FROM customers c \
            JOIN rent_contracts rc ON rc.customer_id = c.id \
            LEFT JOIN contract_units cu ON cu.contract_id = rc.id \
            LEFT JOIN rent_periods rp ON rp.contract_unit_id = cu.id \
            WHERE c.company_id = $1::UUID \
              AND c.deleted_at IS NULL \
              AND rc.status = $2::INT2 \
              AND rc.deleted_at IS NULL \
            GROUP BY c.id, c.name \
            ORDER BY total_rent DESC \
            LIMIT 10";
        Ok(self
            .query(SQL, &[&company_id, &contract::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| revenue::CustomerRow {
                customer_id: row.get("id"),
                customer_name: row.get("name"),
                total_rent: row.get("total_rent"),
                contracts: row.get("contracts"),
            })
            .collect())
    }
}
