//! Query-and-print diagnostics over the uploaded file records.

use std::io::{self, Write};

use crate::documents::{DocumentStore, DocumentStoreError};
use crate::storage::UploadedFileRecord;

/// How much of each record the report prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// File name and download URL
    #[default]
    Brief,
    /// Adds the storage path
    Detailed,
}

/// Fetch every record carrying `slug`. Single query, no pagination.
pub async fn lookup(
    store: &dyn DocumentStore,
    slug: &str,
) -> Result<Vec<UploadedFileRecord>, DocumentStoreError> {
    store.find_by_slug(slug).await
}

/// Print the count line followed by one block per record.
pub fn write_report<W: Write>(
    out: &mut W,
    slug: &str,
    records: &[UploadedFileRecord],
    verbosity: Verbosity,
) -> io::Result<()> {
    writeln!(out, "Found {} files for slug: {}", records.len(), slug)?;

    for record in records {
        writeln!(out, "File: {}", record.file_name)?;
        writeln!(out, "URL: {}", record.download_url)?;
        if verbosity == Verbosity::Detailed {
            writeln!(out, "Storage path: {}", record.storage_path)?;
        }
        writeln!(out, "---")?;
    }

    Ok(())
}
