//! [`Contract`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Date,
};
use itertools::Itertools as _;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        building, company,
        contract::{self, document, Document, Period, Space},
        customer, Building, Contract, Customer,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{self, contract::Aggregate},
};

/// Maps a `rent_contracts` row into a [`Contract`] with no children loaded.
fn contract_from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        company_id: row.get("company_id"),
        customer_id: row.get("customer_id"),
        number: row.get("contract_no"),
        start: row.get("start_date"),
        end: row.get("end_date"),
        deposit: row.get("deposit_amount"),
        status: row.get("status"),
        previous_contract_id: row.get("previous_contract_id"),
        renewal_count: row.get("renewal_count"),
        created_by: row.get("created_by"),
        notes: row.get("notes"),
        version: row.get("version"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
        spaces: vec![],
        documents: vec![],
    }
}

/// Maps a `contract_documents` row into a [`Document`].
fn document_from_row(row: &Row) -> Document {
    Document {
        id: row.get("id"),
        contract_id: row.get("contract_id"),
        file_name: row.get("file_name"),
        file_path: row.get("file_path"),
        file_size: row.get("file_size"),
        file_type: row.get("file_type"),
        uploaded_at: row.get("uploaded_at"),
    }
}

/// Loads the owned spaces, periods and documents of the provided
/// [`Contract`]s, preserving their order.
async fn with_children<C: Connection>(
    db: &Postgres<C>,
    mut contracts: Vec<Contract>,
) -> Result<Vec<Contract>, Traced<database::Error>> {
    if contracts.is_empty() {
        return Ok(contracts);
    }
    let ids = contracts.iter().map(|c| c.id).collect::<Vec<_>>();

    const SPACES_SQL: &str = "\
        SELECT id, contract_id, building_id, floor, area_sqm, created_at \
        FROM contract_units \
        WHERE contract_id IN (SELECT unnest($1::UUID[])) \
        ORDER BY created_at";
    let spaces = db
        .query(SPACES_SQL, &[&ids])
        .await
        .map_err(tracerr::wrap!())?
        .into_iter()
        .map(|row| Space {
            id: row.get("id"),
            contract_id: row.get("contract_id"),
            building_id: row.get("building_id"),
            floor: row.get("floor"),
            area: row.get("area_sqm"),
            created_at: row.get("created_at"),
            periods: vec![],
        })
        .collect::<Vec<_>>();

    let space_ids = spaces.iter().map(|s| s.id).collect::<Vec<_>>();
    const PERIODS_SQL: &str = "\
        SELECT id, contract_unit_id, \
               start_date, end_date, \
               rent_amount, service_fee, period_order \
        FROM rent_periods \
        WHERE contract_unit_id IN (SELECT unnest($1::UUID[])) \
        ORDER BY period_order";
    let mut periods_by_space = db
        .query(PERIODS_SQL, &[&space_ids])
        .await
        .map_err(tracerr::wrap!())?
        .into_iter()
        .map(|row| Period {
            id: row.get("id"),
            space_id: row.get("contract_unit_id"),
            start: row.get("start_date"),
            end: row.get("end_date"),
            rent: row.get("rent_amount"),
            service_fee: row.get("service_fee"),
            order: row.get("period_order"),
        })
        .into_group_map_by(|p| p.space_id);

    let mut spaces_by_contract = spaces
        .into_iter()
        .map(|mut space| {
            space.periods =
                periods_by_space.remove(&space.id).unwrap_or_default();
            space
        })
        .into_group_map_by(|s| s.contract_id);

    const DOCUMENTS_SQL: &str = "\
        SELECT id, contract_id, \
               file_name, file_path, file_size, file_type, \
               uploaded_at \
        FROM contract_documents \
        WHERE contract_id IN (SELECT unnest($1::UUID[])) \
        ORDER BY uploaded_at";
    let mut documents_by_contract = db
        .query(DOCUMENTS_SQL, &[&ids])
        .await
        .map_err(tracerr::wrap!())?
        .iter()
        .map(document_from_row)
        .into_group_map_by(|d| d.contract_id);

    for contract in &mut contracts {
        contract.spaces =
            spaces_by_contract.remove(&contract.id).unwrap_or_default();
        contract.documents =
            documents_by_contract.remove(&contract.id).unwrap_or_default();
    }
    Ok(contracts)
}

impl<C> Database<Select<By<Option<Contract>, (company::Id, contract::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, (company::Id, contract::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, company_id, customer_id, contract_no, \
                   start_date, end_date, deposit_amount, status, \
                   previous_contract_id, renewal_count, created_by, notes, \
                   version, created_at, deleted_at \
            FROM rent_contracts \
            WHERE company_id = $1::UUID \
              AND id = $2::UUID \
              AND deleted_at IS NULL";
        let Some(row) = self
            .query_opt(SQL, &[&company_id, &id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        with_children(self, vec![contract_from_row(&row)])
            .await
            .map_err(tracerr::wrap!())
            .map(|mut contracts| contracts.pop())
    }
}

impl<C> Database<Select<By<Vec<Contract>, read::contract::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Contract>, read::contract::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::list::Selector { company_id, filter } =
            by.into_inner();

        const SQL: &str = "\
            SELECT c.id, c.company_id, c.customer_id, c.contract_no, \
                   c.start_date, c.end_date, c.deposit_amount, c.status, \
                   c.previous_contract_id, c.renewal_count, c.created_by, \
                   c.notes, c.version, c.created_at, c.deleted_at \
            FROM rent_contracts c \
            WHERE c.company_id = $1::UUID \
              AND c.deleted_at IS NULL \
              AND ($2::INT2 IS NULL OR c.status = $2::INT2) \
              AND ($3::UUID IS NULL OR c.customer_id = $3::UUID) \
              AND ($4::UUID IS NULL OR EXISTS (\
                      SELECT 1 FROM contract_units cu \
                      WHERE cu.contract_id = c.id \
                        AND cu.building_id = $4::UUID)) \
            ORDER BY c.created_at DESC";
        let contracts = self
            .query(
                SQL,
                &[
                    &company_id,
                    &filter.status,
                    &filter.customer_id,
                    &filter.building_id,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(contract_from_row)
            .collect();

        with_children(self, contracts).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Contract>, read::contract::Expiring>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, read::contract::Expiring>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::Expiring {
            company_id,
            as_of,
            within_days,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT id, company_id, customer_id, contract_no, \
                   start_date, end_date, deposit_amount, status, \
                   previous_contract_id, renewal_count, created_by, notes, \
                   version, created_at, deleted_at \
            FROM rent_contracts \
            WHERE ($1::UUID IS NULL OR company_id = $1::UUID) \
              AND status = $2::INT2 \
              AND deleted_at IS NULL \
              AND end_date >= $3::DATE \
              AND end_date <= $3::DATE + $4::INT4 \
            ORDER BY end_date";
        let contracts = self
            .query(
                SQL,
                &[
                    &company_id,
                    &contract::Status::Active,
                    &as_of,
                    &i32::from(within_days),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(contract_from_row)
            .collect();

        with_children(self, contracts).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Insert<Document>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    /// Inserts the whole [`Contract`] aggregate, in the contract → spaces →
    /// periods → documents order.
    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO rent_contracts (\
                id, company_id, customer_id, contract_no, \
                start_date, end_date, deposit_amount, status, \
                previous_contract_id, renewal_count, created_by, notes, \
                version, created_at, deleted_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, \
                $5::DATE, $6::DATE, $7::NUMERIC, $8::INT2, \
                $9::UUID, $10::INT4, $11::UUID, $12::TEXT, \
                $13::INT4, $14::TIMESTAMPTZ, $15::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &contract.id,
                &contract.company_id,
                &contract.customer_id,
                &contract.number,
                &contract.start,
                &contract.end,
                &contract.deposit,
                &contract.status,
                &contract.previous_contract_id,
                &contract.renewal_count,
                &contract.created_by,
                &contract.notes,
                &contract.version,
                &contract.created_at,
                &contract.deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        for space in &contract.spaces {
            const SPACE_SQL: &str = "\
                INSERT INTO contract_units (\
                    id, contract_id, building_id, floor, area_sqm, created_at\
                ) VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, \
                    $5::NUMERIC, $6::TIMESTAMPTZ\
                )";
            self.exec(
                SPACE_SQL,
                &[
                    &space.id,
                    &space.contract_id,
                    &space.building_id,
                    &space.floor,
                    &space.area,
                    &space.created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

            for period in &space.periods {
                const PERIOD_SQL: &str = "\
                    INSERT INTO rent_periods (\
                        id, contract_unit_id, start_date, end_date, \
                        rent_amount, service_fee, period_order\
                    ) VALUES (\
                        $1::UUID, $2::UUID, $3::DATE, $4::DATE, \
                        $5::NUMERIC, $6::NUMERIC, $7::INT4\
                    )";
                self.exec(
                    PERIOD_SQL,
                    &[
                        &period.id,
                        &period.space_id,
                        &period.start,
                        &period.end,
                        &period.rent,
                        &period.service_fee,
                        &period.order,
                    ],
                )
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
            }
        }

        for doc in &contract.documents {
            self.execute(Insert(doc.clone()))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        Ok(())
    }
}

impl<C> Database<Insert<Document>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(doc): Insert<Document>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO contract_documents (\
                id, contract_id, file_name, file_path, file_size, file_type, \
                uploaded_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::INT8, \
                $6::VARCHAR, $7::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &doc.id,
                &doc.contract_id,
                &doc.file_name,
                &doc.file_path,
                &doc.file_size,
                &doc.file_type,
                &doc.uploaded_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    /// Updates the [`Contract`] row guarded by its optimistic
    /// [`contract::Version`]: the update only applies if the stored version
    /// is still the one the [`Contract`] was read at, and bumps it.
    ///
    /// Resolves into `false` in case the version check lost, meaning a
    /// concurrent modification happened in between.
    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE rent_contracts \
            SET customer_id = $4::UUID, \
                contract_no = $5::VARCHAR, \
                start_date = $6::DATE, \
                end_date = $7::DATE, \
                deposit_amount = $8::NUMERIC, \
                status = $9::INT2, \
                previous_contract_id = $10::UUID, \
                renewal_count = $11::INT4, \
                notes = $12::TEXT, \
                version = version + 1 \
            WHERE id = $1::UUID \
              AND company_id = $2::UUID \
              AND version = $3::INT4 \
              AND deleted_at IS NULL";
        self.exec(
            SQL,
            &[
                &contract.id,
                &contract.company_id,
                &contract.version,
                &contract.customer_id,
                &contract.number,
                &contract.start,
                &contract.end,
                &contract.deposit,
                &contract.status,
                &contract.previous_contract_id,
                &contract.renewal_count,
                &contract.notes,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|affected| affected > 0)
    }
}

impl<C> Database<Delete<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    /// Soft-deletes the [`Contract`] row, guarded by its optimistic
    /// [`contract::Version`] the same way updates are.
    async fn execute(
        &self,
        Delete(contract): Delete<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE rent_contracts \
            SET deleted_at = NOW(), \
                version = version + 1 \
            WHERE id = $1::UUID \
              AND company_id = $2::UUID \
              AND version = $3::INT4 \
              AND deleted_at IS NULL";
        self.exec(SQL, &[&contract.id, &contract.company_id, &contract.version])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

impl<C> Database<Update<By<read::contract::Expired, Date>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    /// Applies the `Active → Expired` transition to every active
    /// [`Contract`] whose end date is strictly before the provided day, and
    /// resolves into the number of transitioned rows.
    ///
    /// The `status` predicate makes re-running the sweep a no-op: rows
    /// transitioned by a previous pass no longer match.
    async fn execute(
        &self,
        Update(by): Update<By<read::contract::Expired, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let as_of = by.into_inner();

        const SQL: &str = "\
            UPDATE rent_contracts \
            SET status = $1::INT2, \
                version = version + 1 \
            WHERE status = $2::INT2 \
              AND deleted_at IS NULL \
              AND end_date < $3::DATE";
        self.exec(
            SQL,
            &[
                &contract::Status::Expired,
                &contract::Status::Active,
                &as_of,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<
            By<Option<Document>, (company::Id, contract::Id, document::Id)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Document>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Document>, (company::Id, contract::Id, document::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, contract_id, id) = by.into_inner();

        const SQL: &str = "\
            SELECT d.id, d.contract_id, \
                   d.file_name, d.file_path, d.file_size, d.file_type, \
                   d.uploaded_at \
            FROM contract_documents d \
            JOIN rent_contracts c ON c.id = d.contract_id \
            WHERE c.company_id = $1::UUID \
              AND d.contract_id = $2::UUID \
              AND d.id = $3::UUID \
              AND c.deleted_at IS NULL";
        Ok(self
            .query_opt(SQL, &[&company_id, &contract_id, &id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(document_from_row))
    }
}

impl<C> Database<Select<By<Option<Aggregate>, (company::Id, contract::Id)>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<Option<Contract>, (company::Id, contract::Id)>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, (company::Id, customer::Id)>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<building::Id, Building>,
                    (company::Id, Vec<building::Id>),
                >,
            >,
            Ok = HashMap<building::Id, Building>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Aggregate>;
    type Err = Traced<database::Error>;

    /// Loads the [`Contract`] joined with its [`Customer`] and the
    /// [`Building`]s its spaces are located in.
    ///
    /// [`None`] is resolved in case the [`Contract`] doesn't exist, or its
    /// referents are gone (no consistent view can be assembled).
    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Aggregate>, (company::Id, contract::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (company_id, id) = by.into_inner();

        let Some(contract) = self
            .execute(Select(By::<Option<Contract>, _>::new((company_id, id))))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let Some(customer) = self
            .execute(Select(By::<Option<Customer>, _>::new((
                company_id,
                contract.customer_id,
            ))))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let building_ids = contract
            .spaces
            .iter()
            .map(|s| s.building_id)
            .unique()
            .collect::<Vec<_>>();
        let buildings = self
            .execute(Select(By::<HashMap<building::Id, Building>, _>::new((
                company_id,
                building_ids,
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(Aggregate {
            contract,
            customer,
            buildings,
        }))
    }
}
