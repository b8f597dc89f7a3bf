use async_trait::async_trait;

use super::{DocumentStore, DocumentStoreError};
use crate::storage::{Database, UploadedFileRecord};

/// Local redb mirror of `uploaded_files`, for development without cloud credentials.
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Vec<UploadedFileRecord>, DocumentStoreError> {
        let db = self.db.clone();
        let slug = slug.to_string();
        tokio::task::spawn_blocking(move || db.get_files_by_slug(&slug))
            .await
            .map_err(|e| DocumentStoreError::Backend(format!("lookup task failed: {e}")))?
            .map_err(DocumentStoreError::from)
    }
}
