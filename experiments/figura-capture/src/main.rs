mod capture;

use capture::{CaptureConfig, CaptureError, FilePoseModel, PoseFrame, PoseModel};
use figura_base::log;
use figura_measure::{CaptureSession, CaptureState, Category, Pipeline, PipelineConfig};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match std::env::var("FIGURA_LOG_DIR") {
        Ok(dir) => figura_base::init_file_logger(dir)?,
        Err(_) => figura_base::init_stdout_logger(),
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <pose-frame.json> <male|female> [pipeline-config.json]",
            args[0]
        );
        std::process::exit(1);
    }

    let frame_path = &args[1];
    let category: Category = args[2].parse()?;
    let config = match args.get(3) {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config)?;

    let mut capture_config = CaptureConfig::default();
    if let Ok(secs) = std::env::var("FIGURA_COUNTDOWN") {
        capture_config = capture_config.with_countdown_secs(secs.parse()?);
    }

    let mut session = CaptureSession::new(category);
    session.start_countdown(capture_config.countdown_secs())?;
    log::info!(
        "capture: {} countdown, {}s",
        session.category(),
        capture_config.countdown_secs()
    );

    // countdown
    let ticket = loop {
        if let CaptureState::AwaitingCountdown { remaining } = session.state() {
            println!("{}...", remaining);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        if let Some(ticket) = session.tick() {
            break ticket;
        }
    };

    // pose model runs off the countdown task
    let (tx, rx) = oneshot::channel();
    let mut model = FilePoseModel::new(frame_path);
    tokio::spawn(async move {
        let _ = tx.send(model.estimate().await);
    });

    let frame: Result<PoseFrame, CaptureError> =
        match tokio::time::timeout(capture_config.pose_timeout(), rx).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(_)) => Err(CaptureError::Io("pose task dropped".to_string())),
            Err(_) => Err(CaptureError::Timeout),
        };
    let frame = match frame {
        Ok(frame) => frame,
        Err(e) => {
            session.abort_capture(ticket);
            log::error!("capture #{} failed: {}", ticket.generation(), e);
            return Err(e.into());
        }
    };

    let (width, height) = frame.size(&capture_config);
    let Some(result) = session.deliver(ticket, frame.landmarks.as_ref(), width, height, &pipeline)
    else {
        return Err("capture was superseded".into());
    };

    println!("{}", serde_json::to_string_pretty(result)?);
    match (result.failure, result.rounded_score(), &result.outcome) {
        (Some(reason), _, _) => println!("{}", reason.retry_message()),
        (None, Some(score), Some(outcome)) => println!("Score: {} ({})", score, outcome),
        _ => {}
    }

    Ok(())
}
