mod capture {
    include!("../src/capture.rs");
}

use capture::*;
use figura_measure::{
    CaptureSession, Category, FailureReason, LandmarkRole, Pipeline,
};
use std::time::Duration;

fn write_frame(name: &str, json: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("figura-capture-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_capture_config_builder() {
    let config = CaptureConfig::default()
        .with_countdown_secs(5)
        .with_width(640)
        .with_height(480)
        .with_pose_timeout(Duration::from_millis(250));
    assert_eq!(config.countdown_secs(), 5);
    assert_eq!(config.width(), 640);
    assert_eq!(config.height(), 480);
    assert_eq!(config.pose_timeout(), Duration::from_millis(250));
}

#[test]
fn test_capture_config_defaults() {
    let config = CaptureConfig::default();
    assert_eq!(config.countdown_secs(), 3);
    assert_eq!((config.width(), config.height()), (1280, 720));
}

#[test]
fn test_frame_size_falls_back_to_config() {
    let frame: PoseFrame = serde_json::from_str(r#"{"width": 1920, "landmarks": null}"#).unwrap();
    assert_eq!(frame.size(&CaptureConfig::default()), (1920, 720));
    assert!(frame.landmarks.is_none());

    let zero: PoseFrame = serde_json::from_str(r#"{"width": 0, "height": 0}"#).unwrap();
    assert_eq!(zero.size(&CaptureConfig::default()), (1280, 720));
}

#[tokio::test]
async fn test_file_pose_model_reads_frame() {
    let path = write_frame(
        "read",
        r#"{"width": 1000, "height": 1000, "landmarks": [{"x": 0.5, "y": 0.1, "visibility": 0.9}]}"#,
    );
    let mut model = FilePoseModel::new(&path);
    let frame = model.estimate().await.unwrap();
    let landmarks = frame.landmarks.unwrap();
    assert_eq!(landmarks.present(), 1);
    assert_eq!(landmarks.get(LandmarkRole::Nose).unwrap().visibility, 0.9);
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn test_file_pose_model_missing_file() {
    let mut model = FilePoseModel::new("/nonexistent/figura-frame.json");
    assert!(matches!(model.estimate().await, Err(CaptureError::Io(_))));
}

#[tokio::test]
async fn test_empty_frame_reports_no_person() {
    let path = write_frame("empty", r#"{"landmarks": null}"#);
    let mut model = FilePoseModel::new(&path);

    let mut session = CaptureSession::new(Category::Female);
    session.start_countdown(1).unwrap();
    let ticket = session.tick().unwrap();

    let frame = model.estimate().await.unwrap();
    let (w, h) = frame.size(&CaptureConfig::default());
    let result = session
        .deliver(ticket, frame.landmarks.as_ref(), w, h, &Pipeline::default())
        .unwrap();
    assert_eq!(result.failure, Some(FailureReason::NoPersonDetected));
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn test_bundled_config_and_sample_frame() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    let config = figura_measure::PipelineConfig::load(dir.join("default.json")).unwrap();
    assert!(config.scoring.shaping.is_some());
    let pipeline = Pipeline::new(config).unwrap();

    let mut model = FilePoseModel::new(dir.join("sample-frame.json"));
    let frame = model.estimate().await.unwrap();
    let (w, h) = frame.size(&CaptureConfig::default());
    let result = pipeline.analyze(frame.landmarks.as_ref(), w, h, Category::Male);

    assert!(result.is_success(), "{:?}", result.failure);
    let score = result.score.unwrap();
    assert!((15.0..=100.0).contains(&score));
}
