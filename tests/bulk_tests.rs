mod common;

use axum::http::Method;
use bytes::Bytes;

use bunny_storage_adapter::{
    domain::models::{CopyItem, DeleteItem, KeyLocation, ProviderSettings, WriteProbe},
    ports::storage::StorageProvider,
};
use common::{is_empty_dir, provider_for, settings, MockBunny, API_KEY, ZONE};

fn copy(source: &str, dest: &str) -> CopyItem {
    CopyItem {
        bucket: ZONE.to_string(),
        key: dest.to_string(),
        copy_source_bucket: ZONE.to_string(),
        copy_source_key: source.to_string(),
    }
}

fn location(attachment_id: u64, prefix: &str) -> KeyLocation {
    KeyLocation {
        attachment_id,
        bucket: ZONE.to_string(),
        prefix: prefix.to_string(),
    }
}

#[tokio::test]
async fn test_delete_objects_skips_empty_keys_and_continues() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "a.txt", "a");
    mock.put_object(ZONE, "c.txt", "c");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    provider
        .delete_objects(
            ZONE,
            &[
                DeleteItem::new("a.txt"),
                DeleteItem::new(""),
                DeleteItem::new("missing.txt"),
                DeleteItem::new("c.txt"),
            ],
        )
        .await;

    assert!(mock.object(ZONE, "a.txt").is_none());
    assert!(mock.object(ZONE, "c.txt").is_none());
    assert_eq!(mock.requests_with(Method::DELETE).len(), 3);
}

#[tokio::test]
async fn test_copy_objects() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "2024/a.jpg", "original");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    let failures = provider
        .copy_objects(&[copy("2024/a.jpg", "2024/b.jpg")])
        .await;

    assert!(failures.is_empty());
    assert_eq!(
        mock.object(ZONE, "2024/b.jpg"),
        Some(Bytes::from_static(b"original"))
    );
    assert!(mock.object(ZONE, "2024/a.jpg").is_some());
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn test_copy_objects_reports_only_failures() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "a.jpg", "a");
    mock.put_object(ZONE, "b.jpg", "b");
    mock.fail(Method::PUT, "/media/b-copy.jpg", 500, "");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    let failures = provider
        .copy_objects(&[
            copy("a.jpg", "a-copy.jpg"),
            copy("missing.jpg", "missing-copy.jpg"),
            copy("b.jpg", "b-copy.jpg"),
        ])
        .await;

    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].key, "missing-copy.jpg");
    assert_eq!(
        failures[0].message,
        "Bunny API request failed: Not Found (404)"
    );
    assert_eq!(failures[1].key, "b-copy.jpg");
    assert_eq!(
        failures[1].message,
        "Bunny API request failed: Internal Server Error (500)"
    );

    assert!(mock.object(ZONE, "a-copy.jpg").is_some());
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn test_copy_does_not_purge() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "a.jpg", "a");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(
        &mock,
        ProviderSettings {
            cdn_url: "https://cdn.example.com".to_string(),
            ..settings()
        },
        dir.path(),
    );

    provider.copy_objects(&[copy("a.jpg", "b.jpg")]).await;

    assert!(mock.purged_urls().is_empty());
}

#[tokio::test]
async fn test_list_keys() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "2024/01/photo.jpg", "p");
    mock.put_object(ZONE, "2024/01/photo-150x150.jpg", "t");
    mock.put_object(ZONE, "2024/02/other.jpg", "o");
    mock.fail(Method::GET, "/media/broken", 500, "");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    let keys = provider
        .list_keys(&[
            location(1, "/2024/01/"),
            location(2, "2024/03/"),
            location(3, "broken/"),
            location(4, "2024/02/"),
        ])
        .await;

    assert_eq!(keys.len(), 2);
    assert_eq!(
        keys[&1],
        vec!["2024/01/photo-150x150.jpg", "2024/01/photo.jpg"]
    );
    assert_eq!(keys[&4], vec!["2024/02/other.jpg"]);
    assert!(!keys.contains_key(&2));
    assert!(!keys.contains_key(&3));
}

#[tokio::test]
async fn test_can_write_round_trip_leaves_nothing_behind() {
    let mock = MockBunny::with_zone().await;
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    let probe = provider.can_write(ZONE, "probe.txt", b"probe").await;

    assert_eq!(probe, WriteProbe::Writable);
    assert!(mock.object(ZONE, "probe.txt").is_none());
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn test_can_write_reports_failing_step() {
    let mock = MockBunny::with_zone().await;
    mock.fail(Method::DELETE, "/media/probe.txt", 403, "");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    let probe = provider.can_write(ZONE, "probe.txt", b"probe").await;

    assert_eq!(
        probe,
        WriteProbe::Failed("Bunny API request failed: Forbidden (403)".to_string())
    );
    assert!(!probe.is_writable());
    assert!(is_empty_dir(dir.path()));

    let (provider, _) = provider_for(
        &mock,
        ProviderSettings {
            api_key: "wrong".to_string(),
            ..settings()
        },
        dir.path(),
    );
    assert!(!provider.can_write(ZONE, "x.txt", b"x").await.is_writable());
}

#[tokio::test]
async fn test_bulk_operations_use_the_configured_key() {
    let mock = MockBunny::with_zone().await;
    mock.put_object(ZONE, "a.txt", "a");
    let dir = tempfile::tempdir().unwrap();
    let (provider, _) = provider_for(&mock, settings(), dir.path());

    provider.delete_objects(ZONE, &[DeleteItem::new("a.txt")]).await;

    assert!(mock
        .requests()
        .iter()
        .all(|r| r.access_key.as_deref() == Some(API_KEY)));
}
