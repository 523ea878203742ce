//! GPS Analyzer Library
//!
//! Extracts GPS telemetry from ArduPilot dataflash logs and turns it into an
//! aligned, fix-filtered track with UTC timestamps and resolved speed. The
//! track can be written as CSV or handed to a plotting tool as a 3D flight
//! path colored by speed.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `gps-analyzer` command-line binary
//! - **`json`**: Enable JSON output of the flight-path render payload
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Parse a text log and export its GPS track to CSV:
//! ```rust,no_run
//! use gps_analyzer::{export_csv, parse_log_file, LogFormat, PipelineOptions};
//! use std::path::Path;
//!
//! let channels = parse_log_file(Path::new("flight.log"), LogFormat::Auto, false).unwrap();
//! let rows = export_csv(&channels, std::io::stdout(), &PipelineOptions::default()).unwrap();
//! eprintln!("Wrote {} GPS fixes", rows);
//! ```
//!
//! Inspect the processed track directly:
//! ```rust,no_run
//! use gps_analyzer::{analyze, parse_log_file, LogFormat, PipelineOptions};
//! use std::path::Path;
//!
//! let channels = parse_log_file(Path::new("flight.log"), LogFormat::Log, true).unwrap();
//! let track = analyze(&channels, &PipelineOptions::default()).unwrap();
//! println!("{} fixes, fused speed: {}", track.len(), track.speed.fused);
//! ```
//!
//! # Public API
//!
//! ## Pipeline
//! - [`analyze`] - Align, filter, resolve speed and convert time
//! - [`export_csv`] - Run the pipeline and write CSV
//! - [`render_input`] - Run the pipeline and build the plot payload
//!
//! ## Stages
//! - [`align_gps`] / [`align_fields`] - Positional alignment of channels
//! - [`filter_3d_fix`] - Drop samples without a 3D fix
//! - [`resolve_speed`] / [`vertical_velocity_available`] - Ground or 3D speed
//! - [`gps_to_unix_ms`] / [`convert_gps_times`] - GPS week time to UTC
//! - [`write_csv`] / [`write_track_csv`] - Fixed-format CSV output
//!
//! ## Log Reading
//! - [`parse_log_file`] / [`parse_log_bytes`] - Text dataflash logs to a [`ChannelSet`]

// Module declarations
pub mod align;
pub mod conversion;
pub mod error;
pub mod export;
pub mod filters;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod speed;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use align::*;
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use filters::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use pipeline::*;
#[allow(ambiguous_glob_reexports)]
pub use render::*;
#[allow(ambiguous_glob_reexports)]
pub use speed::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;
