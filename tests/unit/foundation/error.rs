use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CutError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        CutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        CutError::ReferenceNotFound(PathBuf::from("/music/a.mp3"))
            .to_string()
            .contains("reference not found: '/music/a.mp3'")
    );
}

#[test]
fn probe_error_keeps_raw_diagnostic() {
    let raw = "/clips/a.mov: No such file or directory\n";
    let err = CutError::probe("/clips/a.mov", raw);
    let msg = err.to_string();
    assert!(msg.starts_with("metadata probe failed for '/clips/a.mov'"));
    assert!(msg.ends_with(raw));

    let CutError::Probe { diagnostic, .. } = err else {
        panic!("expected probe error");
    };
    assert_eq!(diagnostic, raw);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
