use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ReelError::input("x").to_string().contains("input error:"));
    assert!(ReelError::decode("x").to_string().contains("decode error:"));
    assert!(ReelError::context("x").to_string().contains("context error:"));
    assert!(ReelError::encode("x").to_string().contains("encode error:"));
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::invariant("x")
            .to_string()
            .contains("invariant violated:")
    );
}

#[test]
fn image_load_names_the_failing_index() {
    let msg = ReelError::image_load(3, "bad magic").to_string();
    assert!(msg.contains("#3"));
    assert!(msg.contains("bad magic"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
