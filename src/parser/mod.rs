pub mod format;
pub mod text;

pub use format::*;
pub use text::*;

use crate::error::{GpsError, Result};
use crate::types::ChannelSet;
use log::debug;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Magic bytes at the start of every binary dataflash message
const BINARY_HEADER: [u8; 2] = [0xA3, 0x95];

/// Dataflash log encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Binary `.bin` log
    Bin,
    /// Text `.log` dump
    Log,
    /// Decide from the file extension, then from the content
    #[default]
    Auto,
}

impl LogFormat {
    /// Resolve `Auto` to a concrete format
    pub fn detect(self, path: Option<&Path>, data: &[u8]) -> LogFormat {
        if self != LogFormat::Auto {
            return self;
        }
        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "bin" => Some(LogFormat::Bin),
                "log" => Some(LogFormat::Log),
                _ => None,
            });
        by_extension.unwrap_or_else(|| {
            if data.starts_with(&BINARY_HEADER) {
                LogFormat::Bin
            } else {
                LogFormat::Log
            }
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bin" => Ok(LogFormat::Bin),
            "log" => Ok(LogFormat::Log),
            "auto" => Ok(LogFormat::Auto),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Bin => write!(f, "bin"),
            LogFormat::Log => write!(f, "log"),
            LogFormat::Auto => write!(f, "auto"),
        }
    }
}

/// Parse log data already in memory
///
/// `path` only feeds format auto-detection.
pub fn parse_log_bytes(
    data: &[u8],
    format: LogFormat,
    path: Option<&Path>,
    skip_bad: bool,
) -> Result<ChannelSet> {
    let format = format.detect(path, data);
    debug!("Parsing {} bytes as {} log", data.len(), format);

    if format == LogFormat::Bin {
        return Err(GpsError::UnsupportedFormat(
            "binary dataflash logs must be converted to text (.log) first".to_string(),
        ));
    }
    parse_text_log(data, skip_bad)
}

/// Read and parse a dataflash log file
pub fn parse_log_file(path: &Path, format: LogFormat, skip_bad: bool) -> Result<ChannelSet> {
    let data = std::fs::read(path)?;
    parse_log_bytes(&data, format, Some(path), skip_bad)
}
