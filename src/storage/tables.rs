use redb::TableDefinition;

/// Uploaded file records: storage path -> UploadedFileRecord (msgpack)
pub const UPLOADED_FILES: TableDefinition<&str, &[u8]> = TableDefinition::new("uploaded_files");

/// Slug index: slug -> msgpack Vec of storage paths
pub const SLUG_FILES: TableDefinition<&str, &[u8]> = TableDefinition::new("slug_files");
