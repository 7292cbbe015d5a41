use super::*;

#[tokio::test]
async fn dir_store_writes_nested_keys_and_returns_file_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());

    let url = store
        .store(b"jpeg".to_vec(), "mockups/1-abc-render.jpg", "image/jpeg")
        .await
        .unwrap();

    let written = dir.path().join("mockups/1-abc-render.jpg");
    assert_eq!(std::fs::read(&written).unwrap(), b"jpeg");
    assert!(url.starts_with("file://"));
    assert!(url.ends_with("mockups/1-abc-render.jpg"));
}

#[tokio::test]
async fn dir_store_rejects_escaping_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path().join("out"));
    for key in ["", "../x.jpg", "/etc/passwd", "a/../../b"] {
        let err = store
            .store(b"x".to_vec(), key, "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, MockupError::Storage(_)), "{key:?}");
    }
}

#[tokio::test]
async fn dir_store_delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());
    store
        .store(b"x".to_vec(), "a/b.png", "image/png")
        .await
        .unwrap();

    store.delete("a/b.png").await.unwrap();
    assert!(!dir.path().join("a/b.png").exists());
    store.delete("a/b.png").await.unwrap();
}
