//! [`Alert`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{alert, contract, Alert},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<Alert>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(alert): Insert<Alert>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO alerts (\
                id, company_id, contract_id, kind, title, message, \
                is_read, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT2, $5::VARCHAR, \
                $6::TEXT, $7::BOOLEAN, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &alert.id,
                &alert.company_id,
                &alert.contract_id,
                &alert.kind,
                &alert.title,
                &alert.message,
                &alert.is_read,
                &alert.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Option<alert::Id>, (contract::Id, alert::Kind)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<alert::Id>;
    type Err = Traced<database::Error>;

    /// Looks an existing [`Alert`] of the provided kind up, deduplicating
    /// the expiry notification passes.
    async fn execute(
        &self,
        Select(by): Select<By<Option<alert::Id>, (contract::Id, alert::Kind)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (contract_id, kind) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM alerts \
            WHERE contract_id = $1::UUID \
              AND kind = $2::INT2 \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&contract_id, &kind])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| row.get("id")))
    }
}
