// Integration tests for the capture subsystem
//
// These tests drive a CaptureSession through start/stop cycles against mock
// and file-backed devices and verify transcripts, recorded media and device
// release.

mod common;

use anyhow::Result;
use common::{final_event, partial_event, scripts, MockDevices, ScriptedRecognizer};
use interview_coach::capture::{
    Answer, CaptureConfig, CaptureSession, DeviceConfig, FileDevices, RecognitionEvent,
};
use interview_coach::error::CaptureError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn config(audio: bool, video: bool) -> CaptureConfig {
    CaptureConfig {
        devices: DeviceConfig { audio, video },
        drain_timeout: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn test_stop_while_idle_yields_empty_answer() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;

    let answer = session.stop().await?;
    assert_eq!(answer, Answer::default());
    assert!(answer.is_empty());
    assert!(!session.is_capturing());

    Ok(())
}

#[tokio::test]
async fn test_transcript_joins_final_segments_only() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![
        partial_event("Hel"),
        final_event("Hello there."),
        partial_event("I le"),
        final_event("I led the team."),
        partial_event("and we"),
    ]]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;
    let mut live = session.subscribe_transcript();

    session.start().await?;
    assert!(session.is_capturing());

    // Live view carries the pending interim text
    tokio::time::timeout(
        Duration::from_secs(1),
        live.wait_for(|text| text.ends_with("and we")),
    )
    .await??;
    assert_eq!(
        session.live_transcript(),
        "Hello there. I led the team. and we"
    );

    let answer = session.stop().await?;
    assert_eq!(answer.transcript, "Hello there. I led the team.");
    assert!(answer.media.is_none());
    assert!(!session.is_capturing());

    Ok(())
}

#[tokio::test]
async fn test_each_capture_starts_with_empty_transcript() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![
        vec![final_event("First answer.")],
        vec![final_event("Second answer.")],
    ]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;

    session.start().await?;
    let first = session.stop().await?;
    session.start().await?;
    let second = session.stop().await?;

    assert_eq!(first.transcript, "First answer.");
    assert_eq!(second.transcript, "Second answer.");

    Ok(())
}

#[tokio::test]
async fn test_recognizer_ending_on_its_own_keeps_transcript() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![
        final_event("Short answer."),
        RecognitionEvent::Ended,
    ]]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;

    session.start().await?;
    let answer = session.stop().await?;

    assert_eq!(answer.transcript, "Short answer.");

    Ok(())
}

#[tokio::test]
async fn test_video_capture_assembles_media_blob() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![final_event("On camera.")]]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, true))
            .await?;

    session.start().await?;
    let answer = session.stop().await?;

    let media = answer.media.expect("video was granted");
    assert_eq!(media.mime_type, "video/webm");
    assert_eq!(media.data, b"frame-1frame-2".to_vec());
    assert!(media.to_data_uri().starts_with("data:video/webm;base64,"));
    assert_eq!(answer.transcript, "On camera.");

    Ok(())
}

#[tokio::test]
async fn test_typed_text_overrides_spoken_transcript() -> Result<()> {
    let devices = MockDevices::new();
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![final_event("spoken words")]]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;

    session.start().await?;
    let answer = session.stop().await?;

    assert_eq!(
        answer.clone().with_typed_text(Some("typed words")).transcript,
        "typed words"
    );
    assert_eq!(answer.with_typed_text(Some("   ")).transcript, "spoken words");

    Ok(())
}

#[tokio::test]
async fn test_shutdown_releases_all_devices() -> Result<()> {
    let devices = MockDevices::new();
    let ledger = Arc::clone(&devices.ledger);
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![final_event("mid answer")]]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, true))
            .await?;
    assert_eq!(ledger.held(), 2);

    session.start().await?;
    session.shutdown().await;

    assert_eq!(ledger.held(), 0);

    Ok(())
}

#[tokio::test]
async fn test_drop_releases_all_devices() -> Result<()> {
    let devices = MockDevices::new();
    let ledger = Arc::clone(&devices.ledger);
    let recognizer = ScriptedRecognizer::new(scripts(vec![]));

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, true))
            .await?;
    session.start().await?;
    drop(session);

    assert_eq!(ledger.held(), 0);

    Ok(())
}

#[tokio::test]
async fn test_denied_camera_releases_granted_microphone() -> Result<()> {
    let devices = MockDevices::denying("Camera");
    let ledger = Arc::clone(&devices.ledger);
    let recognizer = ScriptedRecognizer::new(scripts(vec![]));

    let result =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, true)).await;

    match result {
        Err(CaptureError::PermissionDenied(device)) => assert_eq!(device, "Camera"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("camera should have been refused"),
    }
    assert_eq!(ledger.held(), 0);

    Ok(())
}

#[tokio::test]
async fn test_wav_file_microphone_feeds_recognizer() -> Result<()> {
    // Setup: write 0.5s of 16kHz mono audio
    let temp_dir = TempDir::new()?;
    let wav_path = temp_dir.path().join("answer.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&wav_path, spec)?;
    for i in 0..8000 {
        writer.write_sample(((i % 100) as i16 - 50) * 100)?;
    }
    writer.finalize()?;

    let devices = FileDevices {
        audio_file: Some(wav_path),
        video_file: None,
        frame_ms: 100,
        realtime: false,
    };
    let recognizer = ScriptedRecognizer::new(scripts(vec![vec![final_event("From a file.")]]));
    let frames = Arc::clone(&recognizer.audio_frames);

    let mut session =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await?;
    session.start().await?;

    // 500ms in 100ms frames
    for _ in 0..100 {
        if frames.load(Ordering::SeqCst) == 5 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(frames.load(Ordering::SeqCst), 5);

    let answer = session.stop().await?;
    assert_eq!(answer.transcript, "From a file.");

    session.shutdown().await;

    Ok(())
}

#[tokio::test]
async fn test_missing_microphone_file_is_permission_denied() -> Result<()> {
    let devices = FileDevices::default();
    let recognizer = ScriptedRecognizer::new(scripts(vec![]));

    let result =
        CaptureSession::open("session-1", &devices, Box::new(recognizer), config(true, false))
            .await;

    assert!(matches!(
        result,
        Err(CaptureError::PermissionDenied(ref device)) if device == "Microphone"
    ));

    Ok(())
}
