use super::*;

#[tokio::test]
async fn memory_source_serves_registered_objects() {
    let source = MemorySource::new().with("mem://logo", vec![1, 2, 3]);
    assert_eq!(source.fetch("mem://logo").await.unwrap(), vec![1, 2, 3]);

    let err = source.fetch("mem://other").await.unwrap_err();
    assert!(matches!(err, MockupError::Storage(_)));
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn memory_store_keeps_artifacts_sorted_by_key() {
    let store = MemoryStore::new();
    let url = store.store(vec![2], "b", "image/png").await.unwrap();
    store.store(vec![1], "a", "image/jpeg").await.unwrap();

    assert_eq!(url, "memory://b");
    let keys: Vec<_> = store.artifacts().into_iter().map(|a| a.key).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(store.artifacts()[0].content_type, "image/jpeg");
}

#[tokio::test]
async fn memory_store_failure_markers_reject_matching_keys() {
    let store = MemoryStore::new().failing_on("thumb");
    store.store(vec![0], "x-render.jpg", "image/jpeg").await.unwrap();
    let err = store
        .store(vec![0], "x-thumb.jpg", "image/jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, MockupError::Storage(_)));
    assert_eq!(store.len(), 1);

    store.delete("x-render.jpg").await.unwrap();
    assert!(store.is_empty());
}
