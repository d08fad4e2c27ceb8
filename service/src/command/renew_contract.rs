//! [`Command`] for renewing a [`Contract`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        building, company,
        contract::{self, document, Document, Status},
        customer, Building, Contract, Customer,
    },
    infra::{
        database, storage,
        storage::{Folder, Upload},
        Database, Storage,
    },
    read::contract::Aggregate,
    Service,
};

use super::{create_contract::Attachment, Command};

/// [`Command`] for renewing an active [`Contract`] with a new one.
///
/// Runs the full creation path for the replacing [`Contract`], chains it to
/// the renewed one (`previous_contract_id`, incremented renewal count) and
/// forces the renewed [`Contract`] into [`Status::Expired`], all within one
/// transaction, so a half-renewed chain can never be observed.
#[derive(Clone, Debug)]
pub struct RenewContract {
    /// ID of the [`Contract`] being renewed.
    pub contract_id: contract::Id,

    /// Specification of the replacing [`Contract`], the full creation
    /// input. Its company scope is the one the renewed [`Contract`] is
    /// looked up in.
    pub spec: super::CreateContract,
}

impl<Db, St> Command<RenewContract> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
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
        > + Database<
            Select<By<Option<Aggregate>, (company::Id, contract::Id)>>,
            Ok = Option<Aggregate>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Insert<Contract>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<Document>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Contract>, Ok = bool, Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    St: Storage<
        Upload,
        Ok = document::FilePath,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Aggregate;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RenewContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RenewContract { contract_id, spec } = cmd;
        let company_id = spec.company_id;

        let previous = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new((
                company_id,
                contract_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if previous.status != Status::Active {
            return Err(tracerr::new!(E::NotActive(previous.status)));
        }

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new((
                company_id,
                spec.customer_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(spec.customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let building_ids =
            spec.spaces.iter().map(|s| s.building_id).collect::<Vec<_>>();
        let buildings = self
            .database()
            .execute(Select(By::<HashMap<building::Id, Building>, _>::new((
                company_id,
                building_ids,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for space in &spec.spaces {
            if !buildings.contains_key(&space.building_id) {
                return Err(tracerr::new!(E::BuildingNotExists(
                    space.building_id
                )));
            }
        }

        let mut contract = Contract::draft(contract::Draft {
            company_id,
            customer_id: spec.customer_id,
            number: spec.number,
            start: spec.start,
            end: spec.end,
            deposit: spec.deposit,
            notes: spec.notes,
            created_by: spec.created_by,
            spaces: spec.spaces,
            previous: Some(&previous),
        })
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let folder = Folder::of_contract(contract.id);
        for attachment in spec.attachments {
            let Attachment {
                file_name,
                content_type,
                bytes,
            } = attachment;

            let file_size = document::FileSize::from(
                i64::try_from(bytes.len()).expect("`usize` fits into `i64`"),
            );
            let file_path = self
                .storage()
                .execute(Upload {
                    bytes,
                    file_name: file_name.clone(),
                    content_type: content_type.clone(),
                    folder: folder.clone(),
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            let doc = Document {
                id: document::Id::new(),
                contract_id: contract.id,
                file_name,
                file_path,
                file_size,
                file_type: content_type,
                uploaded_at: DateTime::now().coerce(),
            };
            tx.execute(Insert(doc.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            contract.documents.push(doc);
        }

        let mut expired = previous;
        expired.status = expired
            .status
            .transition(Status::Expired)
            .map_err(|_| tracerr::new!(E::NotActive(expired.status)))?;
        tx.execute(Update(expired))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .then_some(())
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.database()
            .execute(Select(By::<Option<Aggregate>, _>::new((
                company_id,
                contract.id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract.id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`RenewContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Building`] with the provided ID does not exist.
    #[display("`Building(id: {_0})` does not exist")]
    BuildingNotExists(#[error(not(source))] building::Id),

    /// [`Contract`] was modified concurrently.
    #[display("`Contract(id: {_0})` was modified concurrently")]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided contract window or pricing tiers are invalid.
    #[display("{_0}")]
    #[from]
    Invalid(contract::DraftError),

    /// [`Contract`] is not active, so cannot be renewed.
    #[display("only active contracts can be renewed")]
    NotActive(#[error(not(source))] Status),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    #[from]
    Storage(storage::Error),
}
