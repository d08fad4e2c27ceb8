//! [`InMemory`] document storage.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracerr::Traced;
use uuid::Uuid;

use crate::domain::contract::document::{FilePath, FileType};

use super::{Error, SignedUrl, Storage, Upload, Url};

/// In-memory [`Storage`] backend.
///
/// Holds uploaded files in process memory. Suitable for development and
/// tests; real deployments plug a bucket-backed implementation in its place.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// Stored files by their [`FilePath`].
    files: Arc<RwLock<HashMap<FilePath, File>>>,
}

/// File stored in an [`InMemory`] storage.
#[derive(Clone, Debug)]
struct File {
    /// Raw bytes of the file.
    bytes: Vec<u8>,

    /// MIME type of the file, if known.
    #[expect(dead_code, reason = "kept for future content-type responses")]
    content_type: Option<FileType>,
}

impl Storage<Upload> for InMemory {
    type Ok = FilePath;
    type Err = Traced<Error>;

    async fn execute(&self, upload: Upload) -> Result<Self::Ok, Self::Err> {
        let Upload {
            bytes,
            file_name,
            content_type,
            folder,
        } = upload;

        let path =
            FilePath::from(format!("{folder}/{}-{file_name}", Uuid::new_v4()));
        drop(self.files.write().await.insert(
            path.clone(),
            File {
                bytes,
                content_type,
            },
        ));

        Ok(path)
    }
}

impl Storage<SignedUrl> for InMemory {
    type Ok = Url;
    type Err = Traced<Error>;

    async fn execute(&self, op: SignedUrl) -> Result<Self::Ok, Self::Err> {
        let SignedUrl { path, ttl } = op;

        let files = self.files.read().await;
        let file = files
            .get(&path)
            .ok_or_else(|| tracerr::new!(Error::FileNotExists(path.clone())))?;

        Ok(Url::new(format!(
            "memory://{path}?size={}&expires_in={}",
            file.bytes.len(),
            ttl.as_secs(),
        )))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use crate::domain::contract;
    use crate::infra::storage::{
        Error, Folder, SignedUrl, Storage as _, Upload,
    };

    use super::InMemory;

    fn upload() -> Upload {
        Upload {
            bytes: b"lease scan".to_vec(),
            file_name: "lease.pdf".parse().unwrap(),
            content_type: Some("application/pdf".to_owned().into()),
            folder: Folder::of_contract(contract::Id::new()),
        }
    }

    #[tokio::test]
    async fn uploads_and_signs() {
        let storage = InMemory::default();

        let path = storage.execute(upload()).await.unwrap();
        let url = storage
            .execute(SignedUrl {
                path: path.clone(),
                ttl: Duration::from_secs(600),
            })
            .await
            .unwrap();

        assert!(url.to_string().starts_with("memory://contracts/"));
    }

    #[tokio::test]
    async fn refuses_to_sign_unknown_path() {
        let storage = InMemory::default();

        let result = storage
            .execute(SignedUrl {
                path: "contracts/nowhere.pdf".to_owned().into(),
                ttl: Duration::from_secs(600),
            })
            .await;

        assert!(matches!(
            result.map(drop).unwrap_err().as_ref(),
            Error::FileNotExists(_),
        ));
    }
}
