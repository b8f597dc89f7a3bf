use wiremock::matchers::{body_partial_json, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use landing_files::config::{Config, DocumentBackend, FirebaseConfig};
use landing_files::documents::{self, DocumentStore, DocumentStoreError, FirestoreStore, LocalStore};
use landing_files::lookup::{lookup, write_report, Verbosity};
use landing_files::storage::{Database, UploadedFileRecord};

fn record(slug: &str, name: &str) -> UploadedFileRecord {
    UploadedFileRecord {
        slug: slug.to_string(),
        file_name: name.to_string(),
        download_url: format!("https://files.example/{slug}/{name}"),
        storage_path: format!("uploads/{slug}/{name}"),
    }
}

fn seeded_local_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path()).unwrap();
    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        db.put_file(&record("abc", name)).unwrap();
    }
    for name in ["x.png", "y.png"] {
        db.put_file(&record("xyz", name)).unwrap();
    }
    (dir, LocalStore::new(db))
}

fn report(slug: &str, records: &[UploadedFileRecord], verbosity: Verbosity) -> String {
    let mut out = Vec::new();
    write_report(&mut out, slug, records, verbosity).unwrap();
    String::from_utf8(out).unwrap()
}

fn firestore_doc(id: &str, slug: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "document": {
            "name": format!("projects/landing/databases/(default)/documents/uploaded_files/{id}"),
            "fields": {
                "slug": { "stringValue": slug },
                "fileName": { "stringValue": name },
                "downloadURL": { "stringValue": format!("https://files.example/{name}") },
                "storagePath": { "stringValue": format!("uploads/{slug}/{name}") }
            },
            "createTime": "2024-03-01T10:00:00.000000Z",
            "updateTime": "2024-03-01T10:00:00.000000Z"
        },
        "readTime": "2024-03-02T10:00:00.000000Z"
    })
}

fn firebase(project: &str) -> FirebaseConfig {
    FirebaseConfig {
        api_key: Some("test-key".to_string()),
        project_id: Some(project.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_local_lookup_returns_only_matching_slug() {
    let (_dir, store) = seeded_local_store();

    let records = lookup(&store, "abc").await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.slug == "abc"));

    let output = report("abc", &records, Verbosity::Brief);
    assert!(output.starts_with("Found 3 files for slug: abc\n"));
    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        assert!(output.contains(&format!("File: {name}\n")));
        assert!(output.contains(&format!("URL: https://files.example/abc/{name}\n")));
    }
    assert!(!output.contains("Storage path:"));
    assert!(!output.contains("x.png"));
}

#[tokio::test]
async fn test_local_lookup_with_no_matches() {
    let (_dir, store) = seeded_local_store();

    let records = lookup(&store, "missing").await.unwrap();
    assert!(records.is_empty());
    assert_eq!(
        report("missing", &records, Verbosity::Detailed),
        "Found 0 files for slug: missing\n"
    );
}

#[tokio::test]
async fn test_firestore_lookup_sends_equality_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(
            r"^/v1/projects/landing/databases/\(default\)/documents:runQuery$",
        ))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": "uploaded_files" }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "slug" },
                        "op": "EQUAL",
                        "value": { "stringValue": "abc" }
                    }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            firestore_doc("1", "abc", "one.pdf"),
            firestore_doc("2", "abc", "two.pdf"),
            firestore_doc("3", "abc", "three.pdf"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&server.uri(), &firebase("landing")).unwrap();
    let records = lookup(&store, "abc").await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].file_name, "one.pdf");
    assert_eq!(records[0].download_url, "https://files.example/one.pdf");
    assert_eq!(records[2].storage_path, "uploads/abc/three.pdf");

    let output = report("abc", &records, Verbosity::Detailed);
    assert!(output.contains("Storage path: uploads/abc/two.pdf\n"));
}

#[tokio::test]
async fn test_firestore_empty_result_only_has_read_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "readTime": "2024-03-02T10:00:00Z" }])),
        )
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&server.uri(), &firebase("landing")).unwrap();
    let records = store.find_by_slug("nothing").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_firestore_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&server.uri(), &firebase("landing")).unwrap();
    let err = lookup(&store, "abc").await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::Backend(_)));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_from_config_selects_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Database::open(dir.path()).unwrap();
        db.put_file(&record("abc", "one.pdf")).unwrap();
    }

    let mut config = Config::from_source(|_| None).unwrap();
    config.documents.backend = DocumentBackend::Local;
    config.documents.local_data_dir = dir.path().to_string_lossy().to_string();

    let store = documents::from_config(&config).unwrap();
    let records = lookup(store.as_ref(), "abc").await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_from_config_without_project_fails() {
    let config = Config::from_source(|_| None).unwrap();
    assert!(matches!(
        documents::from_config(&config),
        Err(DocumentStoreError::NotConfigured(_))
    ));
}
