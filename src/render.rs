//! Flight-path render payload
//!
//! Drawing happens in an external plotting tool. This module only assembles
//! what it needs: the 3D-fix path, a per-point speed for the color scale and
//! the axis conventions.

use crate::types::GpsTrack;

#[cfg(feature = "json")]
use crate::Result;
#[cfg(feature = "json")]
use std::io::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Input for a 3D flight-path plot colored by speed
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderInput {
    pub lat: Vec<f64>,
    pub lng: Vec<f64>,
    pub alt: Vec<f64>,
    pub speed: Vec<f64>,
    /// True when `speed` includes the vertical component
    pub fused_speed: bool,
    /// The latitude axis is drawn inverted
    pub invert_lat_axis: bool,
    pub speed_label: String,
    pub axis_labels: [String; 3],
}

impl RenderInput {
    pub fn from_track(track: &GpsTrack) -> Self {
        Self {
            lat: track.record.lat.clone(),
            lng: track.record.lng.clone(),
            alt: track.record.alt.clone(),
            speed: track.speed.values.clone(),
            fused_speed: track.speed.fused,
            invert_lat_axis: true,
            speed_label: "speed (m/s)".to_string(),
            axis_labels: ["lat".to_string(), "long".to_string(), "alt (m)".to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

/// Serialize render input as pretty-printed JSON
#[cfg(feature = "json")]
pub fn write_render_json<W: Write>(mut writer: W, input: &RenderInput) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, input)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
