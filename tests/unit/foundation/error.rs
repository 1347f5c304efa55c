use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StarcrossError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StarcrossError::load_failed("a.txt", "x")
            .to_string()
            .contains("load failed:")
    );
    assert!(
        StarcrossError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        StarcrossError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        StarcrossError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn load_failed_names_the_source() {
    let err = StarcrossError::load_failed("romeo_and_juliet.txt", "not found");
    assert!(err.is_load_failed());
    let msg = err.to_string();
    assert!(msg.contains("romeo_and_juliet.txt"));
    assert!(msg.contains("not found"));
    assert!(!StarcrossError::validation("x").is_load_failed());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StarcrossError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
