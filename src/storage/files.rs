use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::UploadedFileRecord;
use super::tables::*;

impl Database {
    // ========================================================================
    // Uploaded file operations
    // ========================================================================

    /// Store an uploaded file record keyed by its storage path, replacing any
    /// previous record at that path and keeping the slug index in step.
    pub fn put_file(&self, file: &UploadedFileRecord) -> Result<(), DatabaseError> {
        if file.storage_path.is_empty() {
            return Err(DatabaseError::InvalidRecord(format!(
                "record '{}' has no storagePath",
                file.file_name
            )));
        }

        let write_txn = self.begin_write()?;
        {
            // Drop the old slug index entry when a re-import moves the file
            let previous_slug: Option<String> = {
                let table = write_txn.open_table(UPLOADED_FILES)?;
                let result = match table.get(file.storage_path.as_str())? {
                    Some(data) => {
                        let existing: UploadedFileRecord = rmp_serde::from_slice(data.value())?;
                        Some(existing.slug)
                    }
                    None => None,
                };
                result
            };

            if let Some(old_slug) = previous_slug.filter(|s| *s != file.slug) {
                let old_paths: Option<Vec<String>> = {
                    let slug_table = write_txn.open_table(SLUG_FILES)?;
                    let result = match slug_table.get(old_slug.as_str())? {
                        Some(data) => Some(rmp_serde::from_slice(data.value())?),
                        None => None,
                    };
                    result
                };
                if let Some(mut paths) = old_paths {
                    paths.retain(|p| p != &file.storage_path);
                    let mut slug_table = write_txn.open_table(SLUG_FILES)?;
                    if paths.is_empty() {
                        slug_table.remove(old_slug.as_str())?;
                    } else {
                        let data = rmp_serde::to_vec_named(&paths)?;
                        slug_table.insert(old_slug.as_str(), data.as_slice())?;
                    }
                }
            }

            let mut table = write_txn.open_table(UPLOADED_FILES)?;
            let data = rmp_serde::to_vec_named(file)?;
            table.insert(file.storage_path.as_str(), data.as_slice())?;

            let mut slug_table = write_txn.open_table(SLUG_FILES)?;
            let mut paths: Vec<String> = match slug_table.get(file.slug.as_str())? {
                Some(data) => rmp_serde::from_slice(data.value())?,
                None => Vec::new(),
            };

            if !paths.contains(&file.storage_path) {
                paths.push(file.storage_path.clone());
                let index_data = rmp_serde::to_vec_named(&paths)?;
                slug_table.insert(file.slug.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get every record whose slug equals `slug` exactly
    pub fn get_files_by_slug(&self, slug: &str) -> Result<Vec<UploadedFileRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let slug_table = read_txn.open_table(SLUG_FILES)?;
        let files_table = read_txn.open_table(UPLOADED_FILES)?;

        let paths: Vec<String> = match slug_table.get(slug)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut files = Vec::new();
        for path in paths {
            if let Some(data) = files_table.get(path.as_str())? {
                let file: UploadedFileRecord = rmp_serde::from_slice(data.value())?;
                files.push(file);
            }
        }

        Ok(files)
    }

    /// Get all records
    pub fn get_all_files(&self) -> Result<Vec<UploadedFileRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(UPLOADED_FILES)?;

        let mut files = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let file: UploadedFileRecord = rmp_serde::from_slice(value.value())?;
            files.push(file);
        }

        Ok(files)
    }
}
