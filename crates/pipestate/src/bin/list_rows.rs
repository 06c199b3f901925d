//! Pipeline table listing tool
//!
//! This binary loads a recorded OpenGL capture, builds the pipeline snapshot
//! of one event and prints the rows the pipeline panel would show for every
//! stage, applying the same visibility rules.

use clap::Parser;
use pipestate::model::capture::CaptureLog;
use pipestate::model::gl::{GlAdapter, GlState};
use pipestate::model::{EventId, StageKind, descriptor};
use pipestate::{PipelineSession, VisibilityConfig, VisibilityFlags, fixed_function_rows, labels, list_visible_rows};
use std::env;
use std::path::PathBuf;
use std::process;

/// Command-line arguments for the row listing tool
#[derive(Parser)]
#[command(version, about = "Prints the pipeline rows of one event")]
struct Args {
    /// Recorded capture file (YAML or JSON)
    capture: PathBuf,

    /// Event to list
    event_id: EventId,

    /// Also list slots the bound shaders do not use
    #[arg(long)]
    show_disabled: bool,

    /// Also list slots with nothing bound
    #[arg(long)]
    show_empty: bool,

    /// Load visibility flags and per-category overrides from a YAML file
    #[arg(long, value_name = "VISIBILITY_YAML")]
    config: Option<PathBuf>,
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

    let mut config = match &args.config {
        Some(path) => match VisibilityConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => VisibilityConfig::default(),
    };
    let shared = config.shared();
    config.set_shared(VisibilityFlags::new(shared.show_disabled || args.show_disabled, shared.show_empty || args.show_empty));

    let capture = match CaptureLog::<GlState>::from_file(capture_path) {
        Ok(capture) => capture,
        Err(e) => {
            eprintln!("Error loading capture '{}': {e}", capture_path.display());
            process::exit(1);
        }
    };

    let mut session = PipelineSession::new(capture, GlAdapter);
    let snapshot = match session.on_event_selected(event_id) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error building snapshot for event {event_id}: {e}");
            process::exit(1);
        }
    };
    let backend = snapshot.backend();

    for stage in StageKind::ALL {
        let Some(state) = snapshot.stage(stage) else {
            continue;
        };
        println!("== {} ==", labels::stage_name(backend, stage));
        if let Some(shader) = state.shader() {
            println!("  Shader: {shader} {}", state.shader_name().unwrap_or(""));
        }

        for &category in descriptor(stage).categories.iter().filter(|category| backend.supports(**category)) {
            let rows = list_visible_rows(&snapshot, stage, category, config.flags_for(category));
            if rows.is_empty() {
                continue;
            }
            println!("  {}:", labels::category_name(backend, category));
            for row in rows {
                let mut flags = String::new();
                if !row.enabled {
                    flags.push_str(" [disabled]");
                }
                if row.empty {
                    flags.push_str(" [empty]");
                }
                let name = row.name.as_deref().unwrap_or("");
                println!("    {:>6}  {:<16} {:<20} {}{flags}", row.slot, name, row.resource, row.details);
            }
        }

        match fixed_function_rows(&snapshot, stage) {
            Ok(rows) => {
                for row in rows {
                    println!("  {} = {}", row.path, row.value);
                }
            }
            Err(e) => {
                eprintln!("Error listing {stage} state: {e}");
                process::exit(1);
            }
        }
    }

    for report in snapshot.unsupported() {
        eprintln!("Unsupported: {report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_flags_and_config() {
        let args = Args::try_parse_from(["list_rows", "capture.yaml", "7", "--show-empty", "--config", "panel.yaml"]).unwrap();
        assert_eq!(args.capture, PathBuf::from("capture.yaml"));
        assert_eq!(args.event_id, 7);
        assert!(args.show_empty);
        assert!(!args.show_disabled);
        assert_eq!(args.config, Some(PathBuf::from("panel.yaml")));
    }

    #[test]
    fn test_config_requires_a_path() {
        let error = Args::try_parse_from(["list_rows", "capture.yaml", "7", "--config"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let error = Args::try_parse_from(["list_rows", "capture.yaml", "7", "--show-everything"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);

        let error = Args::try_parse_from(["list_rows", "capture.yaml", "seven"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::ValueValidation);
    }
}
