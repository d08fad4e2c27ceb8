//! [`Occupancy`] report definition.

use common::{
    operations::{By, Select},
    Area, Date, Percent,
};
use tracerr::Traced;

use crate::{
    domain::{building, company},
    infra::{database, Database},
    read::report::occupancy::BuildingRow,
    Query, Service,
};
#[cfg(doc)]
use crate::domain::{Building, Contract};

/// [`Query`] calculating how much of the rentable area is under active
/// [`Contract`]s on the provided day.
#[derive(Clone, Copy, Debug)]
pub struct Occupancy {
    /// ID of the company to report on.
    pub company_id: company::Id,

    /// Single [`Building`] to narrow the report to, if any.
    pub building_id: Option<building::Id>,

    /// Day the occupancy is measured at.
    pub as_of: Date,
}

/// Output of the [`Occupancy`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Total rentable [`Area`] across the reported [`Building`]s.
    pub total: Area,

    /// Rented [`Area`] across the reported [`Building`]s, capped per
    /// building.
    pub rented: Area,

    /// Vacant [`Area`] across the reported [`Building`]s.
    pub vacant: Area,

    /// Company-wide occupancy rate.
    pub rate: Percent,

    /// Per-[`Building`] breakdown.
    pub by_building: Vec<BuildingOccupancy>,
}

/// Per-[`Building`] occupancy figures.
#[derive(Clone, Debug)]
pub struct BuildingOccupancy {
    /// ID of the [`Building`].
    pub building_id: building::Id,

    /// Name of the [`Building`].
    pub building_name: building::Name,

    /// Total rentable [`Area`] of the [`Building`].
    pub total: Area,

    /// Rented [`Area`] of the [`Building`], capped at the total.
    pub rented: Area,

    /// Vacant [`Area`] of the [`Building`].
    pub vacant: Area,

    /// Occupancy rate of the [`Building`].
    pub rate: Percent,
}

impl<Db, St> Query<Occupancy> for Service<Db, St>
where
    Db: Database<
        Select<
            By<Vec<BuildingRow>, (company::Id, Option<building::Id>, Date)>,
        >,
        Ok = Vec<BuildingRow>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: Occupancy) -> Result<Self::Ok, Self::Err> {
        let Occupancy {
            company_id,
            building_id,
            as_of,
        } = query;

        let rows = self
            .database()
            .execute(Select(By::<Vec<BuildingRow>, _>::new((
                company_id,
                building_id,
                as_of,
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(summarize(rows))
    }
}

/// Summarizes the fetched per-building rows into the report [`Output`].
///
/// The rented area of each building is capped at its rentable area, so the
/// rate never reports above 100% even when overlapping contracts push the
/// raw sum higher. Note that the cap also hides genuine over-letting from
/// the report.
fn summarize(rows: Vec<BuildingRow>) -> Output {
    let mut total = Area::ZERO;
    let mut rented = Area::ZERO;

    let by_building = rows
        .into_iter()
        .map(|row| {
            let capped = row.rented.capped_at(row.total);

            total += row.total;
            rented += capped;

            BuildingOccupancy {
                building_id: row.building_id,
                building_name: row.building_name,
                total: row.total,
                rented: capped,
                vacant: row.total.saturating_sub(capped),
                rate: Percent::ratio(capped.sqm(), row.total.sqm()),
            }
        })
        .collect();

    Output {
        total,
        rented,
        vacant: total.saturating_sub(rented),
        rate: Percent::ratio(rented.sqm(), total.sqm()),
        by_building,
    }
}

#[cfg(test)]
mod spec {
    use common::{Area, Percent};

    use crate::{domain::building, read::report::occupancy::BuildingRow};

    use super::summarize;

    fn area(s: &str) -> Area {
        s.parse().unwrap()
    }

    fn percent(s: &str) -> Percent {
        s.parse().unwrap()
    }

    fn row(name: &str, total: &str, rented: &str) -> BuildingRow {
        BuildingRow {
            building_id: building::Id::new(),
            building_name: building::Name::new(name).unwrap(),
            total: area(total),
            rented: area(rented),
        }
    }

    #[test]
    fn reports_partial_occupancy() {
        let output = summarize(vec![row("Tower A", "1000", "400")]);

        assert_eq!(output.total, area("1000"));
        assert_eq!(output.rented, area("400"));
        assert_eq!(output.vacant, area("600"));
        assert_eq!(output.rate, percent("40"));
    }

    #[test]
    fn caps_overlapping_contracts_at_rentable_area() {
        // Overlapping active contracts pushed the raw sum over the
        // building's rentable area.
        let output = summarize(vec![row("Tower A", "1000", "1500")]);

        assert_eq!(output.rented, area("1000"));
        assert_eq!(output.vacant, Area::ZERO);
        assert_eq!(output.rate, percent("100"));
        assert_eq!(output.by_building[0].rented, area("1000"));
        assert_eq!(output.by_building[0].rate, percent("100"));
    }

    #[test]
    fn rates_zero_on_zero_total_area() {
        let output = summarize(vec![row("Empty lot", "0", "0")]);

        assert_eq!(output.rate, Percent::ZERO);
        assert_eq!(output.by_building[0].rate, Percent::ZERO);
    }

    #[test]
    fn aggregates_across_buildings() {
        let output = summarize(vec![
            row("Tower A", "1000", "400"),
            row("Tower B", "500", "500"),
        ]);

        assert_eq!(output.total, area("1500"));
        assert_eq!(output.rented, area("900"));
        assert_eq!(output.rate, percent("60"));
    }
}
