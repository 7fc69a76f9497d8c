use serde_json::json;

use super::*;

fn report(value: serde_json::Value) -> ProbeReport {
    serde_json::from_value(value).unwrap()
}

#[test]
fn parses_ffprobe_shape() {
    let r = report(json!({
        "streams": [
            {"codec_type": "video", "width": 1280, "height": 720, "r_frame_rate": "24000/1001",
             "color_space": "bt709", "color_primaries": "bt709", "color_transfer": "bt709"},
            {"codec_type": "audio", "sample_rate": "48000"}
        ],
        "format": {"duration": "6.044042", "tags": {}}
    }));

    let video = r.video_stream().unwrap();
    assert_eq!(video.width, Some(1280));
    assert_eq!(video.r_frame_rate.as_deref(), Some("24000/1001"));
    assert_eq!(video.color_space_label(), REC709_COLOR_SPACE);
    assert_eq!(r.audio_sample_rate(), Some(48_000));
    assert!((r.duration_seconds() - 6.044042).abs() < 1e-9);
    assert_eq!(r.timecode_tag(), None);
    assert_eq!(r.rotation(), 0);
}

#[test]
fn timecode_prefers_stream_then_container_then_panasonic_xml() {
    let stream_and_format = report(json!({
        "streams": [
            {"codec_type": "video"},
            {"codec_type": "data", "tags": {"timecode": "02:00:00:00"}}
        ],
        "format": {"tags": {"timecode": "03:00:00:00"}}
    }));
    assert_eq!(stream_and_format.timecode_tag().as_deref(), Some("02:00:00:00"));

    let format_only = report(json!({
        "streams": [{"codec_type": "video", "tags": {"timecode": ""}}],
        "format": {"tags": {"timecode": "03:00:00:00"}}
    }));
    assert_eq!(format_only.timecode_tag().as_deref(), Some("03:00:00:00"));

    let panasonic = report(json!({
        "streams": [{"codec_type": "video"}],
        "format": {"tags": {
            "com.panasonic.Semi-Pro.metadata.xml":
                "<?xml version=\"1.0\"?><Clip><StartTimecode> 21:44:10:09 </StartTimecode></Clip>"
        }}
    }));
    assert_eq!(panasonic.timecode_tag().as_deref(), Some("21:44:10:09"));

    let annotated = report(json!({
        "format": {"tags": {
            "com.panasonic.Semi-Pro.metadata.xml":
                "<P2Main xmlns=\"urn:schemas-Professional-Plug-in:P2:ClipMetadata:v3.1\"><ClipContent>\
                 <ClipName>0001AB</ClipName>\
                 <StartTimecode xml:space=\"preserve\">01:00:00:00</StartTimecode>\
                 </ClipContent></P2Main>"
        }}
    }));
    assert_eq!(annotated.timecode_tag().as_deref(), Some("01:00:00:00"));

    let empty_element = report(json!({
        "format": {"tags": {
            "com.panasonic.Semi-Pro.metadata.xml": "<Clip><StartTimecode/><StartTimecode>  </StartTimecode></Clip>"
        }}
    }));
    assert_eq!(empty_element.timecode_tag(), None);

    let other_vendor = report(json!({
        "format": {"tags": {"com.example.metadata.xml": "<StartTimecode>01:00:00:00</StartTimecode>"}}
    }));
    assert_eq!(other_vendor.timecode_tag(), None);
}

#[test]
fn rotation_prefers_side_data_over_tag() {
    let side = report(json!({
        "streams": [{"codec_type": "video", "tags": {"rotate": "180"},
                     "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}]
    }));
    assert_eq!(side.rotation(), -90);

    let tag = report(json!({
        "streams": [{"codec_type": "video", "tags": {"rotate": "90"}}]
    }));
    assert_eq!(tag.rotation(), 90);
}

#[test]
fn recorded_probe_logs_calls_and_reports_missing_paths() {
    let probe = RecordedProbe::new()
        .with_json("/clips/a.mov", json!({"format": {"duration": "1.0"}}))
        .unwrap();

    assert!(probe.probe(Path::new("/clips/a.mov")).is_ok());
    let err = probe.probe(Path::new("/clips/missing.mov")).unwrap_err();
    let CutError::Probe { path, diagnostic } = err else {
        panic!("expected probe error");
    };
    assert_eq!(path, PathBuf::from("/clips/missing.mov"));
    assert!(diagnostic.contains("No such file or directory"));
    assert_eq!(
        probe.calls(),
        vec![PathBuf::from("/clips/a.mov"), PathBuf::from("/clips/missing.mov")]
    );
}

#[test]
fn ffprobe_spawn_failure_is_a_probe_error() {
    let probe = Ffprobe::with_program("/nonexistent/bin/ffprobe-for-tests");
    let err = probe.probe(Path::new("/clips/a.mov")).unwrap_err();
    assert!(matches!(err, CutError::Probe { .. }));
    assert!(err.to_string().contains("failed to run ffprobe"));
}
