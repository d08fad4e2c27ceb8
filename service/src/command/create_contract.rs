//! [`Command`] for creating a new [`Contract`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        building, company,
        contract::{self, document, space, Document},
        customer, user, Building, Contract, Customer,
    },
    infra::{
        database, storage,
        storage::{Folder, Upload},
        Database, Storage,
    },
    read::contract::Aggregate,
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`] together with its rental
/// spaces, their pricing tiers and the attached documents, as one atomic
/// unit of work.
///
/// Validation (the window and every space's tiers) happens before any write;
/// a failed document upload aborts the whole transaction.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the company the new [`Contract`] belongs to.
    pub company_id: company::Id,

    /// ID of the [`Customer`] renting under the new [`Contract`].
    pub customer_id: customer::Id,

    /// Human-readable number of the new [`Contract`].
    pub number: contract::Number,

    /// First day of the contract window.
    pub start: Date,

    /// Last day of the contract window.
    pub end: Date,

    /// Deposit paid at the signing, if any.
    pub deposit: Option<Money>,

    /// Free-form notes, if any.
    pub notes: Option<contract::Notes>,

    /// Rental spaces leased under the new [`Contract`], each with its
    /// proposed pricing tiers.
    pub spaces: Vec<space::Draft>,

    /// Files to attach to the new [`Contract`].
    pub attachments: Vec<Attachment>,

    /// ID of the user creating the new [`Contract`].
    pub created_by: user::Id,
}

/// File attached to a new [`Contract`].
#[derive(Clone, Debug)]
pub struct Attachment {
    /// Original name of the file.
    pub file_name: document::FileName,

    /// MIME type of the file, if known.
    pub content_type: Option<document::FileType>,

    /// Raw bytes of the file.
    pub bytes: Vec<u8>,
}

impl<Db, St> Command<CreateContract> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
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
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            company_id,
            customer_id,
            number,
            start,
            end,
            deposit,
            notes,
            spaces,
            attachments,
            created_by,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new((
                company_id,
                customer_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let building_ids =
            spaces.iter().map(|s| s.building_id).collect::<Vec<_>>();
        let buildings = self
            .database()
            .execute(Select(By::<HashMap<building::Id, Building>, _>::new((
                company_id,
                building_ids,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for space in &spaces {
            if !buildings.contains_key(&space.building_id) {
                return Err(tracerr::new!(E::BuildingNotExists(
                    space.building_id
                )));
            }
        }

        let mut contract = Contract::draft(contract::Draft {
            company_id,
            customer_id,
            number,
            start,
            end,
            deposit,
            notes,
            created_by,
            spaces,
            previous: None,
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
        for attachment in attachments {
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

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Building`] with the provided ID does not exist.
    #[display("`Building(id: {_0})` does not exist")]
    BuildingNotExists(#[error(not(source))] building::Id),

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

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    #[from]
    Storage(storage::Error),
}
