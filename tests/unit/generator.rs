use serde_json::json;

use super::*;
use crate::assets::probe::RecordedProbe;

fn probe() -> RecordedProbe {
    RecordedProbe::new()
        .with_json(
            "/m/a.mov",
            json!({
                "streams": [{"codec_type": "video", "width": 1280, "height": 720,
                             "r_frame_rate": "25/1"}],
                "format": {"duration": "4.0"}
            }),
        )
        .unwrap()
}

#[test]
fn invalid_requests_fail_before_probing() {
    let cases = [
        vec![],
        vec![ClipRequest::new("relative.mov")],
        vec![ClipRequest::new("/m/a.mov").with_speed(0.0)],
        vec![ClipRequest::new("/m/a.mov").with_duration(-2.0)],
    ];
    for requests in cases {
        let p = probe();
        let err = Generator::with_probe(requests, GeneratorOptions::default(), &p).unwrap_err();
        assert!(matches!(err, CutError::InvalidInput(_)), "{err}");
        assert!(p.calls().is_empty());
    }

    let bad_options = [
        GeneratorOptions {
            audio_start: Some(TimeValue::Seconds(-1.0)),
            ..GeneratorOptions::default()
        },
        GeneratorOptions {
            sequence_frame_rate: Some(0),
            ..GeneratorOptions::default()
        },
        GeneratorOptions {
            sequence_width: Some(0),
            ..GeneratorOptions::default()
        },
        GeneratorOptions {
            sequence_height: Some(0),
            ..GeneratorOptions::default()
        },
    ];
    for options in bad_options {
        let p = probe();
        let err =
            Generator::with_probe(vec![ClipRequest::new("/m/a.mov")], options, &p).unwrap_err();
        assert!(matches!(err, CutError::InvalidInput(_)), "{err}");
        assert!(p.calls().is_empty());
    }
}

#[test]
fn options_deserialize_with_defaults() {
    let options: GeneratorOptions = serde_json::from_value(json!({
        "editor": "resolve",
        "sequence_frame_rate": 30,
        "audio_start": "5s"
    }))
    .unwrap();
    assert_eq!(options.editor, EditorKind::Fcp7);
    assert_eq!(options.sequence_frame_rate, Some(30));
    assert!(!options.windows_file_paths);
    assert_eq!(
        options.audio_start.unwrap().to_fraction().unwrap(),
        Fraction::from_int(5)
    );

    let empty: GeneratorOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(empty, GeneratorOptions::default());
}

#[test]
fn format_and_timeline_follow_first_clip() {
    let p = probe();
    let generator = Generator::with_probe(
        vec![ClipRequest::new("/m/a.mov"), ClipRequest::new("/m/a.mov").with_duration(1.0)],
        GeneratorOptions::default(),
        &p,
    )
    .unwrap();

    assert_eq!(p.calls().len(), 1);
    assert_eq!(generator.registry().len(), 1);
    assert_eq!(generator.format().dimensions.width, 1280);
    assert_eq!(generator.options().editor, EditorKind::Fcpx);

    let timeline = generator.timeline().unwrap();
    assert_eq!(timeline.duration, Fraction::from_int(5));
    // rendering twice does not probe again
    generator.render().unwrap();
    generator.render().unwrap();
    assert_eq!(p.calls().len(), 1);
}

#[test]
fn missing_music_is_reference_not_found() {
    let p = probe();
    let options = GeneratorOptions {
        audio_track: Some("/nonexistent/cutxml/track.wav".into()),
        ..GeneratorOptions::default()
    };
    let err = Generator::with_probe(vec![ClipRequest::new("/m/a.mov")], options, &p).unwrap_err();
    assert!(matches!(err, CutError::ReferenceNotFound(_)));
    assert!(p.calls().is_empty());
}
