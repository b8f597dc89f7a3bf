mod firestore;
mod local;

pub use firestore::FirestoreStore;
pub use local::LocalStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, DocumentBackend};
use crate::storage::{Database, DatabaseError, UploadedFileRecord};

/// Collection written by the upload flow.
pub const UPLOADED_FILES_COLLECTION: &str = "uploaded_files";

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("Document store not configured: {0}")]
    NotConfigured(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Read-only access to the uploaded file records.
/// Results carry no ordering guarantee beyond what the backend returns.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All records whose `slug` equals `slug` exactly.
    async fn find_by_slug(&self, slug: &str)
        -> Result<Vec<UploadedFileRecord>, DocumentStoreError>;
}

/// Build the store selected by `config.documents.backend`.
pub fn from_config(config: &Config) -> Result<Box<dyn DocumentStore>, DocumentStoreError> {
    match config.documents.backend {
        DocumentBackend::Firestore => {
            if !config.firebase.is_configured() {
                tracing::warn!(
                    "Firebase API key or project id not set; document queries will fail"
                );
            }
            Ok(Box::new(FirestoreStore::new(
                &config.documents.firestore_base_url,
                &config.firebase,
            )?))
        }
        DocumentBackend::Local => {
            let db = Database::open(&config.documents.local_data_dir)?;
            Ok(Box::new(LocalStore::new(db)))
        }
    }
}
