//! Backend tests: resolving stores reached through location strings.
//!
//! Tests verify:
//! - Bare paths and `file://` URLs resolve through the filesystem store
//! - `http://` locations resolve through the HTTP store, including hosts that
//!   answer `403` for missing keys or refuse `HEAD`
//! - S3 stores map missing objects to absent keys
//! - Dataset paths cannot reach outside the store root
//! - Chunk bytes can be fetched from a resolved level

use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::json;

use ome_zarr_loader::{
    resolve_loader, HttpStore, LoaderError, S3Store, Store, StoreConfig, StoreError, StoreSource,
};

use super::test_utils::{
    init_tracing, omero, s3_client, spawn_http_store, spawn_http_store_with, spawn_s3_endpoint,
    zarray, Fixture, HttpBehavior,
};

const SQUARE: [u64; 5] = [1, 1, 1, 512, 512];

fn pyramid_fixture() -> Fixture {
    Fixture::ome(
        omero(&["DAPI", "GFP"]),
        &[
            ("0", [1, 2, 1, 1024, 1024], SQUARE),
            ("1", [1, 2, 1, 512, 512], SQUARE),
        ],
    )
    .with_item("0/0.1.0.1.1", vec![7u8; 16])
}

// =============================================================================
// Filesystem
// =============================================================================

#[tokio::test]
async fn test_filesystem_path_location() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    pyramid_fixture().write_to(dir.path());

    let location = dir.path().to_str().unwrap().to_string();
    let handle = resolve_loader(location).await.unwrap();

    assert!(handle.is_pyramid());
    assert_eq!(handle.level_count(), 2);
    assert_eq!(handle.metadata().unwrap().channels().len(), 2);
}

#[tokio::test]
async fn test_filesystem_file_url_location() {
    let dir = tempfile::tempdir().unwrap();
    Fixture::plain(&[32, 32], &[16, 16], &["y", "x"]).write_to(dir.path());

    let url = url::Url::from_directory_path(dir.path()).unwrap();
    let handle = resolve_loader(url.as_str()).await.unwrap();

    assert!(!handle.is_pyramid());
    assert_eq!(handle.dimensions().fields(), vec!["y", "x"]);
}

#[tokio::test]
async fn test_filesystem_dataset_path_outside_store() {
    let dir = tempfile::tempdir().unwrap();
    Fixture::new()
        .with_json("other/.zarray", &zarray(&[1, 1, 1, 64, 64], &SQUARE))
        .write_to(dir.path());
    Fixture::new()
        .with_group()
        .with_json(
            ".zattrs",
            &json!({"omero": {}, "multiscales": [{"datasets": [{"path": "../other"}]}]}),
        )
        .write_to(&dir.path().join("image.zarr"));

    let location = dir.path().join("image.zarr");
    let err = resolve_loader(location.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, LoaderError::Store(StoreError::InvalidKey(_))));
}

#[tokio::test]
async fn test_filesystem_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let location = dir.path().join("absent.zarr");

    let err = resolve_loader(location.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { key } if key == ".zarray" || key == ".zattrs"));
}

#[tokio::test]
async fn test_filesystem_chunk_bytes() {
    let dir = tempfile::tempdir().unwrap();
    pyramid_fixture().write_to(dir.path());

    let handle = resolve_loader(dir.path().to_str().unwrap()).await.unwrap();
    let base = handle.base();

    let chunk = base.retrieve_chunk_bytes(&[0, 1, 0, 1, 1]).await.unwrap();
    assert_eq!(chunk, Some(Bytes::from(vec![7u8; 16])));
    assert_eq!(base.retrieve_chunk_bytes(&[0, 0, 0, 0, 0]).await.unwrap(), None);
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn test_http_location() {
    init_tracing();
    let base = spawn_http_store(pyramid_fixture(), "image.zarr").await;

    let handle = resolve_loader(base.as_str()).await.unwrap();

    assert!(handle.is_pyramid());
    let paths: Vec<_> = handle.levels().iter().map(|l| l.path()).collect();
    assert_eq!(paths, vec!["0", "1"]);
    assert_eq!(handle.metadata().unwrap().name(), Some("test image"));

    let chunk = handle
        .base()
        .retrieve_chunk_bytes(&[0, 1, 0, 1, 1])
        .await
        .unwrap();
    assert_eq!(chunk.map(|c| c.len()), Some(16));
}

#[tokio::test]
async fn test_http_plain_array() {
    let fixture = Fixture::plain(&[64, 64], &[32, 32], &["y", "x"]);
    let base = spawn_http_store(fixture, "plain.zarr").await;

    let handle = resolve_loader(base).await.unwrap();
    assert!(!handle.is_pyramid());
    assert!(handle.metadata().is_none());
}

#[tokio::test]
async fn test_http_store_contains_item() {
    let base = spawn_http_store(pyramid_fixture(), "image.zarr").await;
    let store = HttpStore::new(url::Url::parse(&base).unwrap(), &StoreConfig::default()).unwrap();

    assert!(store.contains_item(".zgroup").await.unwrap());
    assert!(store.contains_item("1/.zarray").await.unwrap());
    assert!(!store.contains_item("2/.zarray").await.unwrap());
}

#[tokio::test]
async fn test_http_missing_level() {
    let fixture = Fixture::new()
        .with_group()
        .with_json(
            ".zattrs",
            &serde_json::json!({"omero": {}, "multiscales": [{"datasets": [{"path": "0"}]}]}),
        );
    let base = spawn_http_store(fixture, "broken.zarr").await;

    let err = resolve_loader(base).await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { key } if key == "0/.zarray"));
}

#[tokio::test]
async fn test_http_forbidden_means_absent() {
    // Buckets without list permission answer 403 for missing objects
    let fixture = Fixture::plain(&[64, 32], &[32, 32], &["y", "x"]);
    let behavior = HttpBehavior {
        missing_status: StatusCode::FORBIDDEN,
        ..HttpBehavior::default()
    };
    let base = spawn_http_store_with(fixture, "plain.zarr", behavior).await;

    let handle = resolve_loader(base).await.unwrap();
    assert!(!handle.is_pyramid());
    assert_eq!(handle.dimensions().fields(), vec!["y", "x"]);
    assert_eq!(handle.base().shape(), &[64, 32]);
}

#[tokio::test]
async fn test_http_forbidden_missing_level() {
    let fixture = Fixture::new()
        .with_group()
        .with_json(
            ".zattrs",
            &json!({"omero": {}, "multiscales": [{"datasets": [{"path": "0"}]}]}),
        );
    let behavior = HttpBehavior {
        missing_status: StatusCode::FORBIDDEN,
        ..HttpBehavior::default()
    };
    let base = spawn_http_store_with(fixture, "broken.zarr", behavior).await;

    let err = resolve_loader(base).await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { key } if key == "0/.zarray"));
}

#[tokio::test]
async fn test_http_head_not_allowed() {
    let behavior = HttpBehavior {
        allow_head: false,
        ..HttpBehavior::default()
    };
    let base = spawn_http_store_with(pyramid_fixture(), "image.zarr", behavior).await;

    let handle = resolve_loader(base.as_str()).await.unwrap();
    assert!(handle.is_pyramid());
    assert_eq!(handle.level_count(), 2);

    let store = HttpStore::new(url::Url::parse(&base).unwrap(), &StoreConfig::default()).unwrap();
    assert!(!store.contains_item("2/.zarray").await.unwrap());
}

#[tokio::test]
async fn test_http_server_error_is_transport_error() {
    let behavior = HttpBehavior {
        missing_status: StatusCode::SERVICE_UNAVAILABLE,
        ..HttpBehavior::default()
    };
    let base = spawn_http_store_with(Fixture::new(), "down.zarr", behavior).await;

    let err = resolve_loader(base).await.unwrap_err();
    assert!(matches!(err, LoaderError::Store(StoreError::Http(msg)) if msg.contains("503")));
}

#[tokio::test]
async fn test_http_dataset_path_outside_store() {
    let fixture = Fixture::new()
        .with_group()
        .with_json(
            ".zattrs",
            &json!({"omero": {}, "multiscales": [{"datasets": [{"path": "../other"}]}]}),
        );
    let base = spawn_http_store(fixture, "image.zarr").await;

    let err = resolve_loader(base).await.unwrap_err();
    assert!(matches!(err, LoaderError::Store(StoreError::InvalidKey(key)) if key.starts_with("../other")));
}

// =============================================================================
// S3
// =============================================================================

#[tokio::test]
async fn test_s3_store_contains_and_get() {
    let endpoint = spawn_s3_endpoint(pyramid_fixture(), "bucket", "image.zarr").await;
    let store = S3Store::new(s3_client(&endpoint), "bucket", "image.zarr");

    assert!(store.contains_item(".zgroup").await.unwrap());
    assert!(store.contains_item("1/.zarray").await.unwrap());
    assert!(!store.contains_item("2/.zarray").await.unwrap());

    let chunk = store.get_item("0/0.1.0.1.1").await.unwrap();
    assert_eq!(chunk, Bytes::from(vec![7u8; 16]));

    let err = store.get_item("2/.zarray").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(key) if key == "2/.zarray"));
}

#[tokio::test]
async fn test_s3_pyramid() {
    init_tracing();
    let endpoint = spawn_s3_endpoint(pyramid_fixture(), "bucket", "image.zarr").await;
    let store = S3Store::new(s3_client(&endpoint), "bucket", "image.zarr");

    let handle = resolve_loader(StoreSource::from_store(store)).await.unwrap();
    assert!(handle.is_pyramid());
    let paths: Vec<_> = handle.levels().iter().map(|l| l.path()).collect();
    assert_eq!(paths, vec!["0", "1"]);
}

#[tokio::test]
async fn test_s3_plain_array_missing_attributes() {
    // No .zgroup reads as a plain array; the missing .zattrs is then required
    let fixture = Fixture::new().with_json(".zarray", &zarray(&[64, 64], &[32, 32]));
    let endpoint = spawn_s3_endpoint(fixture, "bucket", "plain.zarr").await;
    let store = S3Store::new(s3_client(&endpoint), "bucket", "plain.zarr");

    let err = resolve_loader(StoreSource::from_store(store)).await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { key } if key == ".zattrs"));
}
