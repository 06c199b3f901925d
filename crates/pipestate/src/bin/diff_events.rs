//! Event comparison tool
//!
//! This binary loads a recorded OpenGL capture, builds the pipeline snapshots
//! of two events and prints every slot and field that differs between them.
//! With a single event id the event is compared against the one before it.

use clap::Parser;
use pipestate::model::capture::CaptureLog;
use pipestate::model::gl::{GlAdapter, GlState};
use pipestate::model::{EventId, PipelineSnapshot, capture_snapshot};
use pipestate::{diff, labels};
use std::env;
use std::path::PathBuf;
use std::process;

/// Command-line arguments for the event comparison tool
#[derive(Parser)]
#[command(version, about = "Prints the pipeline state differences between two events")]
struct Args {
    /// Recorded capture file (YAML or JSON)
    capture: PathBuf,

    /// Event to compare
    event: EventId,

    /// Event to compare against; defaults to comparing `event` with the event before it
    other_event: Option<EventId>,
}

fn snapshot(capture: &CaptureLog<GlState>, event: EventId) -> PipelineSnapshot {
    match capture_snapshot(capture, &GlAdapter, event) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error building snapshot for event {event}: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if env::var_os("PIPESTATE_DEBUG").is_some() { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a global tracing subscriber is already installed");
    }

    let capture_path = &args.capture;
    if !capture_path.exists() {
        eprintln!("Error: Capture file '{}' does not exist", capture_path.display());
        process::exit(1);
    }

    let capture = match CaptureLog::<GlState>::from_file(capture_path) {
        Ok(capture) => capture,
        Err(e) => {
            eprintln!("Error loading capture '{}': {e}", capture_path.display());
            process::exit(1);
        }
    };

    let (from_event, to_event) = match args.other_event {
        Some(other) => (args.event, other),
        None => match capture.previous_event(args.event) {
            Some(previous) => (previous, args.event),
            None => {
                eprintln!("Error: Event {} has no previous event to compare against", args.event);
                process::exit(1);
            }
        },
    };

    let from = snapshot(&capture, from_event);
    let to = snapshot(&capture, to_event);
    let result = match diff(&from, &to) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error comparing events {from_event} and {to_event}: {e}");
            process::exit(1);
        }
    };

    println!("Event {from_event} -> {to_event}");
    if result.is_identical() {
        println!("  no differences");
        return;
    }

    let backend = capture.backend;
    let mut last_stage = None;
    for (stage, change) in result.changes() {
        if last_stage != Some(stage) {
            println!("{}:", labels::stage_name(backend, stage));
            last_stage = Some(stage);
        }
        println!("  {change}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_other_event_is_optional() {
        let args = Args::try_parse_from(["diff_events", "capture.yaml", "2"]).unwrap();
        assert_eq!(args.event, 2);
        assert_eq!(args.other_event, None);

        let args = Args::try_parse_from(["diff_events", "capture.yaml", "1", "2"]).unwrap();
        assert_eq!(args.other_event, Some(2));
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let error = Args::try_parse_from(["diff_events", "capture.yaml", "1", "2", "3"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }
}
