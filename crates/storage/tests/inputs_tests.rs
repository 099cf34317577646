// Reading goreleaser metadata.json and artifacts.json

mod common;

use common::ReleaseLayout;
use depot_storage::StorageError;
use depot_storage::inputs::{read_artifacts, read_metadata};

#[tokio::test]
async fn test_read_metadata_and_artifacts() {
    let layout = ReleaseLayout::new(0);
    layout.write_input(
        "metadata.json",
        r#"{"project_name":"example","tag":"v0.1.0","version":"v0.1.0","date":"2024-10-01T10:00:00Z"}"#,
    );
    layout.write_input(
        "artifacts.json",
        r#"[{"name":"checksums.txt","path":"dist/checksums.txt","type":"Checksum"}]"#,
    );

    let metadata = read_metadata(layout.input(), "metadata.json").await.unwrap();
    assert_eq!(metadata.name, "example");
    assert_eq!(metadata.version, "v0.1.0");

    let artifacts = read_artifacts(layout.input(), "artifacts.json").await.unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, "Checksum");
}

#[tokio::test]
async fn test_missing_documents_are_not_found() {
    let layout = ReleaseLayout::new(0);

    assert!(matches!(
        read_metadata(layout.input(), "metadata.json").await,
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        read_artifacts(layout.input(), "artifacts.json").await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_malformed_documents_are_parse_errors() {
    let layout = ReleaseLayout::new(0);
    layout.write_input("metadata.json", "{\"version\": ");
    layout.write_input("artifacts.json", "[{\"name\": 3}]");

    match read_metadata(layout.input(), "metadata.json").await {
        Err(StorageError::Parse { path, .. }) => assert!(path.ends_with("metadata.json")),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(matches!(
        read_artifacts(layout.input(), "artifacts.json").await,
        Err(StorageError::Parse { .. })
    ));
}

#[tokio::test]
async fn test_empty_inventory_is_not_an_error() {
    let layout = ReleaseLayout::new(0);
    layout.write_input("artifacts.json", "[]");

    let artifacts = read_artifacts(layout.input(), "artifacts.json").await.unwrap();
    assert!(artifacts.is_empty());
}
