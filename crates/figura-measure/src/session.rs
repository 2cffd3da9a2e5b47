use crate::analysis::{AnalysisResult, Pipeline};
use crate::classify::Category;
use crate::error::SessionError;
use crate::landmark::LandmarkSet;
use figura_base::log;

/// Where the capture flow currently is
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    AwaitingCountdown { remaining: u32 },
    /// A frame was handed to the pose model; its result is pending.
    Capturing { generation: u64 },
    ShowingResult(AnalysisResult),
}

/// Proof of which capture a pose result belongs to.
///
/// Results delivered with an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTicket {
    generation: u64,
}

impl CaptureTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives one user's capture flow: countdown, single-frame capture, result.
///
/// At most one capture is in flight. The analysis itself is pure, so a result
/// arriving late is simply discarded.
#[derive(Debug)]
pub struct CaptureSession {
    state: CaptureState,
    category: Category,
    generation: u64,
}

impl CaptureSession {
    pub fn new(category: Category) -> Self {
        Self {
            state: CaptureState::Idle,
            category,
            generation: 0,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Counting down or waiting on the pose model.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            CaptureState::AwaitingCountdown { .. } | CaptureState::Capturing { .. }
        )
    }

    /// Switch reference set; clears any shown result.
    pub fn select_category(&mut self, category: Category) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.category = category;
        self.state = CaptureState::Idle;
        Ok(())
    }

    pub fn start_countdown(&mut self, seconds: u32) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if seconds == 0 {
            return Err(SessionError::InvalidCountdown);
        }
        self.state = CaptureState::AwaitingCountdown { remaining: seconds };
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// When it reaches zero the session moves to `Capturing` and returns the
    /// ticket the pose result must be delivered with.
    pub fn tick(&mut self) -> Option<CaptureTicket> {
        let CaptureState::AwaitingCountdown { remaining } = self.state else {
            return None;
        };
        if remaining > 1 {
            self.state = CaptureState::AwaitingCountdown {
                remaining: remaining - 1,
            };
            return None;
        }
        self.generation += 1;
        self.state = CaptureState::Capturing {
            generation: self.generation,
        };
        Some(CaptureTicket {
            generation: self.generation,
        })
    }

    /// Abort a countdown. Returns whether one was running.
    pub fn cancel_countdown(&mut self) -> bool {
        if matches!(self.state, CaptureState::AwaitingCountdown { .. }) {
            self.state = CaptureState::Idle;
            true
        } else {
            false
        }
    }

    /// The frame for `ticket` never reached the pose model; return to idle.
    pub fn abort_capture(&mut self, ticket: CaptureTicket) -> bool {
        if self.is_current(ticket) {
            self.state = CaptureState::Idle;
            true
        } else {
            false
        }
    }

    fn is_current(&self, ticket: CaptureTicket) -> bool {
        matches!(self.state, CaptureState::Capturing { generation } if generation == ticket.generation)
    }

    /// Hand over the pose model's answer for `ticket` and run the analysis.
    ///
    /// Returns `None` without touching state when the ticket is stale.
    pub fn deliver(
        &mut self,
        ticket: CaptureTicket,
        landmarks: Option<&LandmarkSet>,
        width: u32,
        height: u32,
        pipeline: &Pipeline,
    ) -> Option<&AnalysisResult> {
        if !self.is_current(ticket) {
            log::warn!(
                "dropping stale pose result for capture #{} (state {:?})",
                ticket.generation,
                self.state
            );
            return None;
        }

        let result = pipeline.analyze(landmarks, width, height, self.category);
        self.state = CaptureState::ShowingResult(result);
        self.result()
    }

    /// Clear the shown result so a new capture can start.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.state = CaptureState::Idle;
        Ok(())
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            CaptureState::ShowingResult(result) => Some(result),
            _ => None,
        }
    }
}
