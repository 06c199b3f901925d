//! Snapshot dumping tool
//!
//! This binary loads a recorded OpenGL capture, builds the pipeline snapshot
//! of one event with the reference adapter and dumps it to stdout, either with
//! Debug formatting or as JSON.

use clap::Parser;
use pipestate_model::capture::CaptureLog;
use pipestate_model::gl::{GlAdapter, GlState};
use pipestate_model::{EventId, capture_snapshot};
use std::env;
use std::path::PathBuf;
use std::process;

/// Command-line arguments for the snapshot dumping tool
#[derive(Parser)]
#[command(version, about = "Builds the pipeline snapshot of one event and dumps it to stdout")]
struct Args {
    /// Recorded capture file (YAML or JSON)
    capture: PathBuf,

    /// Event to build the snapshot for
    event_id: EventId,

    /// Print the snapshot as JSON instead of Debug formatting
    #[arg(long)]
    json: bool,
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
    let event_id = args.event_id;

    let capture = match CaptureLog::<GlState>::from_file(capture_path) {
        Ok(capture) => capture,
        Err(e) => {
            eprintln!("Error loading capture '{}': {e}", capture_path.display());
            process::exit(1);
        }
    };

    let snapshot = match capture_snapshot(&capture, &GlAdapter, event_id) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error building snapshot for event {event_id}: {e}");
            process::exit(1);
        }
    };

    if args.json {
        match snapshot.to_json() {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{snapshot:#?}");
    }

    for report in snapshot.unsupported() {
        eprintln!("Unsupported: {report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag() {
        let args = Args::try_parse_from(["dump_snapshot", "capture.yaml", "3", "--json"]).unwrap();
        assert_eq!(args.event_id, 3);
        assert!(args.json);

        assert!(Args::try_parse_from(["dump_snapshot", "capture.yaml", "3", "--jsn"]).is_err());
    }
}
