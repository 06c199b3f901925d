//! Shared fixtures for unit tests

use pipestate_model::capture::CaptureLog;
use pipestate_model::gl::{GlAdapter, GlState};
use pipestate_model::{EventId, PipelineSnapshot, capture_snapshot};

pub const GL_TWO_DRAWS: &str = include_str!("../../model/fixtures/gl_two_draws.yaml");

pub fn fixture_log() -> CaptureLog<GlState> {
    CaptureLog::from_yaml(GL_TWO_DRAWS).unwrap()
}

pub fn fixture_snapshot(event: EventId) -> PipelineSnapshot {
    capture_snapshot(&fixture_log(), &GlAdapter, event).unwrap()
}
