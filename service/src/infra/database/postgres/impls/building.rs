//! [`Building`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{building, company, Building},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `buildings` row into a [`Building`].
fn building_from_row(row: &tokio_postgres::Row) -> Building {
    Building {
        id: row.get("id"),
        company_id: row.get("company_id"),
        name: row.get("name"),
        code: row.get("code"),
        rentable_area: row.get("rentable_area"),
        total_floors: row.get("total_floors"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C>
    Database<
        Select<
            By<HashMap<building::Id, Building>, (company::Id, Vec<building::Id>)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = HashMap<building::Id, Building>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                HashMap<building::Id, Building>,
                (company::Id, Vec<building::Id>),
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, ids) = by.into_inner();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, company_id, name, code, rentable_area, total_floors, \
                   created_at, deleted_at \
            FROM buildings \
            WHERE company_id = $1::UUID \
              AND id IN (SELECT unnest($2::UUID[]) LIMIT $3::INT4) \
              AND deleted_at IS NULL \
            LIMIT $3::INT4";
        Ok(self
            .query(SQL, &[&company_id, &ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let building = building_from_row(row);
                (building.id, building)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Building>, (company::Id, building::Id)>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<HashMap<building::Id, Building>, (company::Id, Vec<building::Id>)>,
        >,
        Ok = HashMap<building::Id, Building>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Building>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Building>, (company::Id, building::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, id) = by.into_inner();
        Ok(self
            .execute(Select(By::new((company_id, vec![id]))))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}
