use chrono::TimeZone;

use super::*;
use crate::{assets::encode::OutputFormat, io::memory::MemoryStore};

fn rendered() -> CompositeResult {
    CompositeResult {
        render: vec![1; 16],
        render_format: OutputFormat::Jpeg { quality: 95 },
        render_size: (4, 4),
        thumbnail: vec![2; 8],
        thumbnail_format: OutputFormat::Png,
        thumbnail_size: (2, 2),
    }
}

#[test]
fn keys_share_timestamp_and_id() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let id = Uuid::from_u128(0xabc);
    let keys = ArtifactKeys::new("mockups/", at, id, "jpg", "png");

    let stem = format!("1700000000123-{}", id.simple());
    assert_eq!(keys.render, format!("mockups/{stem}-render.jpg"));
    assert_eq!(keys.thumbnail, format!("mockups/{stem}-thumb.png"));

    let bare = ArtifactKeys::new("", at, id, "jpg", "jpg");
    assert_eq!(bare.render, format!("{stem}-render.jpg"));
}

#[tokio::test]
async fn stores_exactly_two_artifacts() {
    let store = Arc::new(MemoryStore::new());
    let packager = OutputPackager::new(store.clone(), "mockups", Duration::from_secs(1));

    let urls = packager.package(rendered()).await.unwrap();

    let artifacts = store.artifacts();
    assert_eq!(artifacts.len(), 2);
    assert!(urls.render_url.starts_with("memory://mockups/"));
    assert!(urls.render_url.ends_with("-render.jpg"));
    assert!(urls.thumbnail_url.ends_with("-thumb.png"));

    let render = artifacts
        .iter()
        .find(|a| a.key.ends_with("-render.jpg"))
        .unwrap();
    assert_eq!(render.content_type, "image/jpeg");
    assert_eq!(render.bytes, vec![1; 16]);
    let thumb = artifacts
        .iter()
        .find(|a| a.key.ends_with("-thumb.png"))
        .unwrap();
    assert_eq!(thumb.content_type, "image/png");
}

#[tokio::test]
async fn one_failed_upload_surfaces_no_urls_and_removes_the_other() {
    let store = Arc::new(MemoryStore::new().failing_on("-thumb"));
    let packager = OutputPackager::new(store.clone(), "mockups", Duration::from_secs(1));

    let err = packager.package(rendered()).await.unwrap_err();
    assert!(matches!(err, MockupError::Storage(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn slow_store_times_out_as_storage_error() {
    let store = Arc::new(MemoryStore::new().with_delay(Duration::from_secs(30)));
    let packager = OutputPackager::new(store.clone(), "mockups", Duration::from_millis(50));

    let err = packager.package(rendered()).await.unwrap_err();
    assert!(matches!(err, MockupError::Storage(ref m) if m.contains("timed out")));
    assert!(err.is_retryable());
    assert!(store.is_empty());
}
