use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{DocumentStore, DocumentStoreError, UPLOADED_FILES_COLLECTION};
use crate::config::FirebaseConfig;
use crate::storage::UploadedFileRecord;

/// Cloud Firestore backend, queried through the REST `runQuery` endpoint with
/// the project's web API key.
pub struct FirestoreStore {
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

/// Typed Firestore value. Only strings matter for uploaded file records.
#[derive(Deserialize)]
struct FirestoreValue {
    #[serde(rename = "stringValue", default)]
    string_value: Option<String>,
}

impl FirestoreStore {
    pub fn new(base_url: &str, firebase: &FirebaseConfig) -> Result<Self, DocumentStoreError> {
        let project_id = firebase.project_id.clone().ok_or_else(|| {
            DocumentStoreError::NotConfigured("FIREBASE_PROJECT_ID is not set".to_string())
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            api_key: firebase.api_key.clone(),
            client,
        })
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id
        )
    }

    fn slug_query(slug: &str) -> serde_json::Value {
        serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": UPLOADED_FILES_COLLECTION }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "slug" },
                        "op": "EQUAL",
                        "value": { "stringValue": slug },
                    }
                }
            }
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Vec<UploadedFileRecord>, DocumentStoreError> {
        let mut request = self.client.post(self.run_query_url());
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key)]);
        }

        let resp = request
            .json(&Self::slug_query(slug))
            .send()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DocumentStoreError::Backend(format!(
                "Firestore query failed ({status}): {body}"
            )));
        }

        // An empty result set still yields one item carrying only a readTime
        let items: Vec<RunQueryItem> = resp
            .json()
            .await
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))?;

        let records = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(document_to_record)
            .collect::<Vec<_>>();

        tracing::debug!(slug, count = records.len(), "Firestore slug query complete");
        Ok(records)
    }
}

fn document_to_record(doc: FirestoreDocument) -> UploadedFileRecord {
    let mut fields = doc.fields;
    let mut take = |key: &str| {
        fields
            .remove(key)
            .and_then(|v| v.string_value)
            .unwrap_or_default()
    };

    let record = UploadedFileRecord {
        slug: take("slug"),
        file_name: take("fileName"),
        download_url: take("downloadURL"),
        storage_path: take("storagePath"),
    };

    if record.download_url.is_empty() {
        tracing::warn!(document = %doc.name, "Uploaded file document has no downloadURL");
    }

    record
}
