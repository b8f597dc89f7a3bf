use serde::{Deserialize, Serialize};

/// A file uploaded by the site's upload flow, as stored in the `uploaded_files` collection.
///
/// Field names follow the document schema so JSON exports load unchanged.
/// `slug` groups files and is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileRecord {
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "fileName", default)]
    pub file_name: String,
    #[serde(rename = "downloadURL", default)]
    pub download_url: String,
    #[serde(rename = "storagePath", default)]
    pub storage_path: String,
}
