//! [`Customer`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{company, customer, Customer},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `customers` row into a [`Customer`].
fn customer_from_row(row: &tokio_postgres::Row) -> Customer {
    Customer {
        id: row.get("id"),
        company_id: row.get("company_id"),
        name: row.get("name"),
        kind: row.get("kind"),
        phone: row.get("phone"),
        email: row.get("email"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C>
    Database<
        Select<
            By<HashMap<customer::Id, Customer>, (company::Id, Vec<customer::Id>)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = HashMap<customer::Id, Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                HashMap<customer::Id, Customer>,
                (company::Id, Vec<customer::Id>),
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, ids) = by.into_inner();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, company_id, name, kind, phone, email, \
                   created_at, deleted_at \
            FROM customers \
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
                let customer = customer_from_row(row);
                (customer.id, customer)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Customer>, (company::Id, customer::Id)>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<HashMap<customer::Id, Customer>, (company::Id, Vec<customer::Id>)>,
        >,
        Ok = HashMap<customer::Id, Customer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, (company::Id, customer::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, id) = by.into_inner();
        Ok(self
            .execute(Select(By::new((company_id, vec![id]))))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}
