use chrono::TimeZone as _;
use serde_json::json;

use super::*;
use crate::assets::probe::RecordedProbe;
use crate::emit::DocumentStamp;
use crate::generator::{Generator, GeneratorOptions};
use crate::timeline::ClipRequest;

fn stamp() -> DocumentStamp {
    DocumentStamp::fixed(
        chrono::Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        [
            uuid::Uuid::from_u128(0xa),
            uuid::Uuid::from_u128(0xb),
            uuid::Uuid::from_u128(0xc),
        ],
    )
}

fn probe() -> RecordedProbe {
    RecordedProbe::new()
        .with_json(
            "/media/interview.mov",
            json!({
                "streams": [
                    {"codec_type": "video", "width": 1920, "height": 1080,
                     "r_frame_rate": "25/1", "tags": {"timecode": "01:00:00:00"}},
                    {"codec_type": "audio", "sample_rate": "48000"}
                ],
                "format": {"duration": "10.0"}
            }),
        )
        .unwrap()
        .with_json(
            "/media/phone.mp4",
            json!({
                "streams": [
                    {"codec_type": "video", "width": 1920, "height": 1080, "r_frame_rate": "25/1",
                     "side_data_list": [{"rotation": 90.0}]}
                ],
                "format": {"duration": "4.0"}
            }),
        )
        .unwrap()
}

fn render(requests: Vec<ClipRequest>, options: GeneratorOptions) -> String {
    let generator = Generator::with_probe(requests, options, &probe()).unwrap();
    generator.render_with_stamp(&stamp()).unwrap().xml
}

#[test]
fn document_skeleton() {
    let xml = render(
        vec![ClipRequest::new("/media/interview.mov").with_start(1.0).with_duration(2.0)],
        GeneratorOptions::default(),
    );

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<!DOCTYPE fcpxml>"));
    assert!(xml.contains("<fcpxml version=\"1.8\">"));
    assert!(xml.contains("frameDuration=\"1/25s\""));
    assert!(xml.contains("colorSpace=\"1-1-1 (Rec. 709)\""));
    assert!(xml.contains("<library location=\"./\">"));
    assert!(xml.contains("<event name=\"interview\" uid=\"00000000-0000-0000-0000-00000000000a\">"));
    assert!(xml.contains("name=\"interview 20250102-030405\""));
    assert!(xml.contains("modDate=\"2025-01-02 03:04:05 +0000\""));
    assert!(xml.contains("tcStart=\"0s\""));
    assert!(xml.contains("audioRate=\"48k\""));
}

#[test]
fn asset_clip_times_are_exact_fractions() {
    let xml = render(
        vec![
            ClipRequest::new("/media/interview.mov").with_duration(4.0),
            ClipRequest::new("/media/interview.mov").with_start(1.0).with_duration(2.0),
        ],
        GeneratorOptions::default(),
    );

    // one asset for both clips, starting at the embedded timecode
    assert_eq!(xml.matches("<asset ").count(), 1);
    assert!(xml.contains("start=\"3600s\""));
    assert!(xml.contains("duration=\"10s\""));
    assert!(xml.contains("audioRate=\"48000\""));
    assert!(xml.contains("hasAudio=\"1\""));

    assert_eq!(xml.matches("<asset-clip ").count(), 2);
    assert!(xml.contains("start=\"3601s\" offset=\"4s\" duration=\"2s\""));
    assert!(xml.contains("<sequence duration=\"6s\""));
    assert_eq!(xml.matches("amount=\"-13.100000000000001db\"").count(), 2);
    assert!(xml.contains("audioRole=\"dialogue\""));
}

#[test]
fn retimed_clip_carries_time_map() {
    let xml = render(
        vec![ClipRequest::new("/media/interview.mov").with_duration(4.0).with_speed(0.5)],
        GeneratorOptions::default(),
    );
    assert!(xml.contains("<timeMap>"));
    assert!(xml.contains("start=\"3600s\" offset=\"0s\" duration=\"4s\""));
    assert!(xml.contains("<timept time=\"3600s\" value=\"3600s\" interp=\"smooth2\"/>"));
    assert!(xml.contains("<timept time=\"3604s\" value=\"3602s\" interp=\"smooth2\"/>"));
}

#[test]
fn time_map_starts_at_clip_start_with_trim_and_timecode() {
    let xml = render(
        vec![
            ClipRequest::new("/media/interview.mov")
                .with_start(2.0)
                .with_duration(4.0)
                .with_speed(0.5),
        ],
        GeneratorOptions::default(),
    );
    assert!(xml.contains("start=\"3602s\" offset=\"0s\" duration=\"4s\""));
    assert!(xml.contains("<timept time=\"3602s\" value=\"3602s\" interp=\"smooth2\"/>"));
    assert!(xml.contains("<timept time=\"3606s\" value=\"3604s\" interp=\"smooth2\"/>"));
}

#[test]
fn rotation_and_conform() {
    let rotated = render(
        vec![ClipRequest::new("/media/phone.mp4")],
        GeneratorOptions::default(),
    );
    assert!(rotated.contains("<adjust-transform rotation=\"-90\"/>"));
    assert!(rotated.contains("hasAudio=\"0\""));

    let vertical = render(
        vec![ClipRequest::new("/media/interview.mov")],
        GeneratorOptions {
            sequence_width: Some(1080),
            sequence_height: Some(1920),
            ..GeneratorOptions::default()
        },
    );
    assert!(vertical.contains("<adjust-conform type=\"fill\"/>"));
    assert!(!vertical.contains("adjust-transform"));
}

#[test]
fn emitter_reports_its_kind() {
    assert_eq!(FcpxEmitter.kind(), EditorKind::Fcpx);
    assert_eq!(FORMAT_ID, "r1");
}
