//! Text dataflash log reader
//!
//! Text logs are comma separated. `FMT` lines declare message layouts:
//!
//! ```text
//! FMT, 130, 45, GPS, QBIHBcLLeff, TimeUS,Status,GMS,GWk,NSats,HDop,Lat,Lng,Alt,Spd,GCrs
//! GPS, 120430211, 3, 264530000, 2238, 12, 0.8, -35.3632621, 149.1652374, 584.27, 0.12, 187.3
//! ```
//!
//! Every other line is one message. Its numeric columns are appended to the
//! matching channels, with the 1-based line number as the sample index.

use super::format::{FormatTable, MessageFormat};
use crate::error::{GpsError, Result};
use crate::types::{ChannelSet, Value};
use csv::{ByteRecord, ReaderBuilder, Trim};
use log::{debug, warn};

const FMT_NAME: &str = "FMT";

fn field_str(record: &ByteRecord, i: usize) -> Option<&str> {
    record.get(i).and_then(|f| std::str::from_utf8(f).ok())
}

/// Parse a numeric token, preferring an exact integer
pub fn parse_value(token: &str) -> Option<Value> {
    if let Ok(v) = token.parse::<i64>() {
        return Some(Value::Int(v));
    }
    token.parse::<f64>().ok().map(Value::Float)
}

fn parse_fmt(record: &ByteRecord) -> std::result::Result<MessageFormat, String> {
    // FMT, type, length, name, format, columns...
    let type_id = field_str(record, 1)
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or("invalid FMT type id")?;
    let name = field_str(record, 3)
        .filter(|s| !s.is_empty())
        .ok_or("missing FMT message name")?;
    let format = field_str(record, 4).ok_or("missing FMT format string")?;
    let names = (5..record.len())
        .map(|i| field_str(record, i).ok_or("column name is not UTF-8"))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    MessageFormat::new(type_id, name, format, &names).ok_or_else(|| {
        format!(
            "FMT for {} has {} format characters but {} column names",
            name,
            format.chars().count(),
            names.len()
        )
    })
}

/// Decode one message line into `(column name, value)` pairs
fn parse_message<'f>(
    record: &ByteRecord,
    format: &'f MessageFormat,
) -> std::result::Result<Vec<(&'f str, Value)>, String> {
    let values = record.len() - 1;
    let arity_ok = if format.has_string_column() {
        values >= format.columns.len()
    } else {
        values == format.columns.len()
    };
    if !arity_ok {
        return Err(format!(
            "{} expects {} values, found {}",
            format.name,
            format.columns.len(),
            values
        ));
    }

    let mut out = Vec::with_capacity(format.columns.len());
    for (i, column) in format.columns.iter().enumerate() {
        if !column.is_numeric() {
            continue;
        }
        let token = field_str(record, i + 1).unwrap_or("");
        let value = parse_value(token).ok_or_else(|| {
            format!("{}.{}: '{}' is not a number", format.name, column.name, token)
        })?;
        out.push((column.name.as_str(), value));
    }
    Ok(out)
}

/// Parse a text dataflash log into a channel set
///
/// With `skip_bad`, malformed lines are logged and skipped; otherwise the
/// first one fails the whole parse.
pub fn parse_text_log(data: &[u8], skip_bad: bool) -> Result<ChannelSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(data);

    let mut formats = FormatTable::new();
    let mut set = ChannelSet::new();
    let mut record = ByteRecord::new();
    let mut skipped = 0usize;
    let mut messages = 0usize;

    loop {
        let more = match reader.read_byte_record(&mut record) {
            Ok(more) => more,
            Err(err) => {
                let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
                if skip_bad && !err.is_io_error() {
                    warn!("Skipping unreadable line {}: {}", line, err);
                    skipped += 1;
                    continue;
                }
                return Err(GpsError::Csv(err));
            }
        };
        if !more {
            break;
        }

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let name = field_str(&record, 0).unwrap_or("");
        if name.is_empty() {
            continue;
        }

        let outcome = if name == FMT_NAME {
            parse_fmt(&record).map(|format| {
                debug!("Line {}: FMT {} ({} columns)", line, format.name, format.columns.len());
                formats.insert(format);
            })
        } else {
            match formats.get(name) {
                Some(format) => parse_message(&record, format).map(|values| {
                    for (field, value) in values {
                        set.channel_mut(&format.name, field).push(line, value);
                    }
                    messages += 1;
                }),
                None => Err(format!("unknown message type '{}'", name)),
            }
        };

        if let Err(msg) = outcome {
            if skip_bad {
                warn!("Skipping bad line {}: {}", line, msg);
                skipped += 1;
            } else {
                return Err(GpsError::Parse { line, msg });
            }
        }
    }

    debug!(
        "Read {} messages across {} formats ({} lines skipped)",
        messages,
        formats.len(),
        skipped
    );
    if skipped > 0 {
        warn!("Skipped {} malformed lines", skipped);
    }

    Ok(set)
}
