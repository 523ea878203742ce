//! End-to-end GPS processing
//!
//! Channel set in, aligned/filtered/derived track out. Every entry point first
//! checks that the log has a `GPS` group at all, before any other work.

use crate::align::align_gps;
use crate::conversion::{convert_gps_times, format_utc_timestamp, LeapSeconds};
use crate::error::{GpsError, Result};
use crate::export::{write_track_csv, CsvOptions, CsvSchema};
use crate::filters::filter_3d_fix;
use crate::render::RenderInput;
use crate::speed::resolve_record_speed;
use crate::types::{ChannelSet, GpsTrack, GPS_GROUP};
use log::{debug, info};
use std::io::Write;

/// Options for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub schema: CsvSchema,
    pub leap_seconds: LeapSeconds,
    /// Drop samples without a 3D fix before CSV export
    pub require_3d_fix: bool,
    /// Marker written before the CSV header line
    pub header_prefix: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            schema: CsvSchema::Extended,
            leap_seconds: LeapSeconds::default(),
            require_3d_fix: true,
            header_prefix: None,
        }
    }
}

impl PipelineOptions {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            schema: self.schema,
            header_prefix: self.header_prefix.clone(),
        }
    }
}

/// Fail with [`GpsError::NoGpsData`] unless the log has at least one `GPS` sample
///
/// A `GPS` group with no fields, or with only empty channels, counts as absent.
pub fn ensure_gps_data(set: &ChannelSet) -> Result<()> {
    if set.sample_count(GPS_GROUP) > 0 {
        Ok(())
    } else {
        Err(GpsError::NoGpsData)
    }
}

fn build_track(
    set: &ChannelSet,
    leap_seconds: LeapSeconds,
    filter: bool,
    want_time: bool,
) -> Result<GpsTrack> {
    ensure_gps_data(set)?;

    let aligned = align_gps(set, want_time)?;
    let record = if filter {
        filter_3d_fix(&aligned)
    } else {
        aligned
    };

    let speed = resolve_record_speed(set, &record);
    let leap_seconds = leap_seconds.resolve(set);

    let gmt_ms = match (&record.gps_time, want_time) {
        (Some(gps_time), true) => Some(convert_gps_times(
            &gps_time.week,
            &gps_time.ms_of_week,
            leap_seconds,
        )?),
        _ => None,
    };

    if let Some((first, last)) = gmt_ms
        .as_ref()
        .and_then(|gmt| Some((gmt.first()?, gmt.last()?)))
    {
        debug!(
            "GPS track spans {} .. {}",
            format_utc_timestamp(*first),
            format_utc_timestamp(*last)
        );
    }

    Ok(GpsTrack {
        record,
        speed,
        gmt_ms,
        leap_seconds,
    })
}

/// Run alignment, fix filtering, speed resolution and time conversion
///
/// Calendar time is computed, and GWk/GMS are required, only when the
/// schema needs it.
pub fn analyze(set: &ChannelSet, options: &PipelineOptions) -> Result<GpsTrack> {
    build_track(
        set,
        options.leap_seconds,
        options.require_3d_fix,
        options.schema.needs_gps_time(),
    )
}

/// Process the log and write the GPS track as CSV, returning the row count
///
/// Nothing is written unless every conversion succeeds.
pub fn export_csv<W: Write>(set: &ChannelSet, writer: W, options: &PipelineOptions) -> Result<usize> {
    let track = analyze(set, options)?;
    write_track_csv(writer, &track, &options.csv_options())?;
    info!(
        "Exported {} GPS samples ({} speed)",
        track.len(),
        if track.speed.fused { "3D" } else { "ground" }
    );
    Ok(track.len())
}

/// Build the flight-path render payload from 3D fixes only
pub fn render_input(set: &ChannelSet) -> Result<RenderInput> {
    let track = build_track(set, LeapSeconds::default(), true, false)?;
    Ok(RenderInput::from_track(&track))
}
