use super::*;

#[test]
fn editor_aliases() {
    for name in ["fcpx", "FCPX", "finalcutpro", "Final Cut", "fcp"] {
        assert_eq!(name.parse::<EditorKind>().unwrap(), EditorKind::Fcpx, "{name}");
    }
    for name in [
        "fcp7",
        "premiere",
        "Premiere Pro",
        "adobe_premiere",
        "resolve",
        "davinci",
        "DaVinci-Resolve",
    ] {
        assert_eq!(name.parse::<EditorKind>().unwrap(), EditorKind::Fcp7, "{name}");
    }
}

#[test]
fn unknown_editor_is_invalid_input() {
    let err = "avid".parse::<EditorKind>().unwrap_err();
    assert!(matches!(err, CutError::InvalidInput(_)));
    assert!(err.to_string().contains("avid"));
}

#[test]
fn factory_matches_kind() {
    for kind in [EditorKind::Fcpx, EditorKind::Fcp7] {
        assert_eq!(kind.emitter().kind(), kind);
    }
    assert_eq!(EditorKind::Fcpx.extension(), "fcpxml");
    assert_eq!(EditorKind::Fcp7.extension(), "xml");
}

#[test]
fn serde_uses_names_and_aliases() {
    assert_eq!(serde_json::to_string(&EditorKind::Fcp7).unwrap(), "\"fcp7\"");
    let kind: EditorKind = serde_json::from_str("\"premiere\"").unwrap();
    assert_eq!(kind, EditorKind::Fcp7);
    assert!(serde_json::from_str::<EditorKind>("\"imovie\"").is_err());
}
