use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MockupError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MockupError::image_decode("x")
            .to_string()
            .contains("image decode error:")
    );
    assert!(
        MockupError::text_clip("x")
            .to_string()
            .contains("text clip error:")
    );
    assert!(
        MockupError::storage("x")
            .to_string()
            .contains("storage error:")
    );
    assert!(MockupError::render("x").to_string().contains("render error:"));
    assert!(MockupError::timeout("x").to_string().contains("timeout:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MockupError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_transient_failures_are_retryable() {
    assert!(MockupError::storage("upload failed").is_retryable());
    assert!(MockupError::timeout("budget").is_retryable());

    assert!(!MockupError::validation("scale").is_retryable());
    assert!(!MockupError::image_decode("bad png").is_retryable());
    assert!(!MockupError::text_clip("bad path").is_retryable());
    assert!(!MockupError::render("saturate").is_retryable());
}

#[test]
fn stage_display_matches_serde_name() {
    assert_eq!(Stage::Fetch.to_string(), "fetch");
    assert_eq!(
        serde_json::to_value(Stage::Composite).unwrap(),
        serde_json::json!("composite")
    );
}
