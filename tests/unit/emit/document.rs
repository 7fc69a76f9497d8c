use chrono::TimeZone as _;

use super::*;

fn stamp() -> DocumentStamp {
    DocumentStamp::fixed(
        Utc.with_ymd_and_hms(2025, 10, 31, 17, 25, 16).unwrap(),
        [Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)],
    )
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "cutxml_document_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn stamp_formats() {
    let s = stamp();
    assert_eq!(s.suffix(), "20251031-172516");
    assert_eq!(s.mod_date(), "2025-10-31 17:25:16 +0000");
}

#[test]
fn fresh_stamps_differ() {
    assert_ne!(DocumentStamp::now().event_uid, DocumentStamp::now().event_uid);
}

#[test]
fn save_writes_exact_text() {
    let dir = temp_dir("save");
    let doc = Document {
        kind: EditorKind::Fcp7,
        xml: "<xmeml version=\"5\"/>\n".to_owned(),
    };
    let path = dir.join(format!("cut.{}", doc.extension()));
    doc.save(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), doc.as_str());

    let missing = dir.join("no_such_dir").join("cut.xml");
    assert!(matches!(doc.save(&missing), Err(crate::CutError::Other(_))));

    let _ = std::fs::remove_dir_all(dir);
}
