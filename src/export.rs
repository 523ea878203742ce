//! CSV export of GPS tracks
//!
//! Two layouts are supported. The extended layout (default) leads with the UTC
//! timestamp derived from GPS week/time-of-week; the basic layout is the older
//! four-column dump without calendar time.

use crate::align::GPS_TIME_FIELDS;
use crate::error::{GpsError, Result};
use crate::types::{AlignedRecord, GpsTrack, GPS_GROUP};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// CSV column layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvSchema {
    /// `TimeUS,Lat,Lng,Alt`
    Basic,
    /// `GMT,TimeUS,Lat,Lng,Alt`
    #[default]
    Extended,
}

impl CsvSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            CsvSchema::Basic => &["TimeUS", "Lat", "Lng", "Alt"],
            CsvSchema::Extended => &["GMT", "TimeUS", "Lat", "Lng", "Alt"],
        }
    }

    /// Whether rows need UTC timestamps from GPS week/time-of-week
    pub fn needs_gps_time(&self) -> bool {
        matches!(self, CsvSchema::Extended)
    }
}

impl FromStr for CsvSchema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(CsvSchema::Basic),
            "extended" => Ok(CsvSchema::Extended),
            other => Err(format!("unknown CSV schema '{}'", other)),
        }
    }
}

impl fmt::Display for CsvSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvSchema::Basic => write!(f, "basic"),
            CsvSchema::Extended => write!(f, "extended"),
        }
    }
}

/// Options controlling CSV output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvOptions {
    pub schema: CsvSchema,
    /// Marker written before the header line, e.g. `"# "`
    pub header_prefix: Option<String>,
}

fn header_record(options: &CsvOptions) -> Vec<String> {
    let mut header: Vec<String> = options
        .schema
        .columns()
        .iter()
        .map(|c| c.to_string())
        .collect();
    if let Some(prefix) = &options.header_prefix {
        header[0] = format!("{}{}", prefix, header[0]);
    }
    header
}

/// Write a record as CSV
///
/// `gmt_ms` must be given, with one entry per sample, for the extended schema.
/// It is ignored for the basic schema.
pub fn write_csv<W: Write>(
    writer: W,
    record: &AlignedRecord,
    gmt_ms: Option<&[u64]>,
    options: &CsvOptions,
) -> Result<()> {
    let gmt_ms = match (options.schema, gmt_ms) {
        (CsvSchema::Extended, None) => {
            return Err(GpsError::MissingField {
                group: GPS_GROUP.to_string(),
                field: GPS_TIME_FIELDS[0].to_string(),
            })
        }
        (CsvSchema::Extended, Some(gmt)) => {
            debug_assert_eq!(gmt.len(), record.len());
            Some(gmt)
        }
        (CsvSchema::Basic, _) => None,
    };

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(header_record(options))?;

    for i in 0..record.len() {
        let mut row = Vec::with_capacity(5);
        if let Some(gmt) = gmt_ms {
            row.push(gmt[i].to_string());
        }
        row.push(record.time_us[i].to_string());
        row.push(format!("{:.7}", record.lat[i]));
        row.push(format!("{:.7}", record.lng[i]));
        row.push(format!("{:.1}", record.alt[i]));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    debug!("Wrote {} CSV rows ({} schema)", record.len(), options.schema);
    Ok(())
}

/// Write a processed track as CSV
pub fn write_track_csv<W: Write>(writer: W, track: &GpsTrack, options: &CsvOptions) -> Result<()> {
    write_csv(writer, &track.record, track.gmt_ms.as_deref(), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_sample() -> AlignedRecord {
        AlignedRecord {
            time_us: vec![1000],
            lat: vec![12.3456789],
            lng: vec![-98.7654321],
            alt: vec![10.05],
            status: vec![3.0],
            spd: vec![0.0],
            vz: None,
            gps_time: None,
        }
    }

    fn to_string(record: &AlignedRecord, gmt: Option<&[u64]>, options: &CsvOptions) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, record, gmt, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_extended_single_row() {
        let csv = to_string(&single_sample(), Some(&[1_000_000][..]), &CsvOptions::default());
        assert_eq!(
            csv,
            "GMT,TimeUS,Lat,Lng,Alt\n1000000,1000,12.3456789,-98.7654321,10.1\n"
        );
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_basic_single_row() {
        let options = CsvOptions {
            schema: CsvSchema::Basic,
            header_prefix: None,
        };
        let csv = to_string(&single_sample(), None, &options);
        assert_eq!(csv, "TimeUS,Lat,Lng,Alt\n1000,12.3456789,-98.7654321,10.1\n");
    }

    #[test]
    fn test_empty_record_is_header_only() {
        let csv = to_string(&AlignedRecord::default(), Some(&[][..]), &CsvOptions::default());
        assert_eq!(csv, "GMT,TimeUS,Lat,Lng,Alt\n");
    }

    #[test]
    fn test_header_prefix() {
        let options = CsvOptions {
            schema: CsvSchema::Extended,
            header_prefix: Some("# ".to_string()),
        };
        let csv = to_string(&AlignedRecord::default(), Some(&[][..]), &options);
        assert_eq!(csv, "# GMT,TimeUS,Lat,Lng,Alt\n");
    }

    #[test]
    fn test_fixed_precision() {
        let record = AlignedRecord {
            time_us: vec![0, u64::MAX],
            lat: vec![1.0, -35.36326218],
            lng: vec![0.0, 149.16523],
            alt: vec![-3.0, 584.27],
            status: vec![3.0, 3.0],
            spd: vec![0.0, 0.0],
            vz: None,
            gps_time: None,
        };
        let csv = to_string(&record, Some(&[1, 2][..]), &CsvOptions::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "1,0,1.0000000,0.0000000,-3.0");
        assert_eq!(
            lines[2],
            "2,18446744073709551615,-35.3632622,149.1652300,584.3"
        );
    }

    #[test]
    fn test_extended_without_time_fails() {
        let mut out = Vec::new();
        let err = write_csv(&mut out, &single_sample(), None, &CsvOptions::default());
        assert!(matches!(err, Err(GpsError::MissingField { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!("basic".parse::<CsvSchema>(), Ok(CsvSchema::Basic));
        assert_eq!("Extended".parse::<CsvSchema>(), Ok(CsvSchema::Extended));
        assert!("gpx".parse::<CsvSchema>().is_err());
    }
}
