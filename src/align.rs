//! Sample alignment
//!
//! Pulls named fields out of a message group as parallel columns. The log
//! reader emits one row per message, so alignment is positional: the i-th
//! value of every field belongs to the same logged message.

use crate::error::{GpsError, Result};
use crate::types::{AlignedRecord, Channel, ChannelSet, GpsTimeColumns, Value, GPS_GROUP};
use log::{debug, warn};

/// Fields every `GPS` message must provide
pub const GPS_FIELDS: [&str; 6] = ["TimeUS", "Lat", "Lng", "Alt", "Status", "Spd"];

/// Receiver time fields, required only when calendar time is wanted
pub const GPS_TIME_FIELDS: [&str; 2] = ["GWk", "GMS"];

/// Optional vertical velocity field of the `GPS` group
pub const GPS_VZ_FIELD: &str = "VZ";

/// Look up each requested field of `group`, trimmed to a common length
fn aligned_channels<'a>(
    set: &'a ChannelSet,
    group: &str,
    fields: &[&str],
) -> Result<(Vec<&'a Channel>, usize)> {
    let channels_by_name = set
        .group(group)
        .ok_or_else(|| GpsError::MissingChannelGroup(group.to_string()))?;

    let channels = fields
        .iter()
        .map(|&field| {
            channels_by_name
                .get(field)
                .ok_or_else(|| GpsError::MissingField {
                    group: group.to_string(),
                    field: field.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let longest = channels.iter().map(|c| c.len()).max().unwrap_or(0);
    if len != longest {
        warn!(
            "{} fields have uneven lengths ({}..{}), truncating to {} samples",
            group, len, longest, len
        );
    }

    Ok((channels, len))
}

/// Extract `fields` of `group` as equal-length `f64` columns, in request order
pub fn align_fields(set: &ChannelSet, group: &str, fields: &[&str]) -> Result<Vec<Vec<f64>>> {
    let (channels, len) = aligned_channels(set, group, fields)?;
    Ok(channels
        .iter()
        .map(|c| c.values().take(len).map(Value::as_f64).collect())
        .collect())
}

fn integer_column(channel: &Channel, len: usize, group: &str, field: &str) -> Result<Vec<u64>> {
    channel
        .values()
        .take(len)
        .enumerate()
        .map(|(index, v)| {
            v.as_u64().ok_or_else(|| GpsError::InvalidValue {
                group: group.to_string(),
                field: field.to_string(),
                index,
            })
        })
        .collect()
}

fn float_column(channel: &Channel, len: usize) -> Vec<f64> {
    channel.values().take(len).map(Value::as_f64).collect()
}

/// An optional column, only used when it covers every aligned sample
fn optional_channel<'a>(set: &'a ChannelSet, field: &str, len: usize) -> Option<&'a Channel> {
    let channel = set.channel(GPS_GROUP, field)?;
    if channel.len() < len {
        warn!(
            "GPS.{} has {} samples but the record has {}, ignoring it",
            field,
            channel.len(),
            len
        );
        return None;
    }
    Some(channel)
}

fn gps_time_columns(set: &ChannelSet, len: usize) -> Result<Option<GpsTimeColumns>> {
    match (
        optional_channel(set, GPS_TIME_FIELDS[0], len),
        optional_channel(set, GPS_TIME_FIELDS[1], len),
    ) {
        (Some(week), Some(ms_of_week)) => Ok(Some(GpsTimeColumns {
            week: integer_column(week, len, GPS_GROUP, GPS_TIME_FIELDS[0])?,
            ms_of_week: integer_column(ms_of_week, len, GPS_GROUP, GPS_TIME_FIELDS[1])?,
        })),
        _ => Ok(None),
    }
}

/// Build the [`AlignedRecord`] for the `GPS` group
///
/// All [`GPS_FIELDS`] are required. [`GPS_TIME_FIELDS`] are required when
/// `require_gps_time` is set and picked up opportunistically otherwise, as is `VZ`.
/// Opportunistic time columns holding invalid values are dropped with a warning.
pub fn align_gps(set: &ChannelSet, require_gps_time: bool) -> Result<AlignedRecord> {
    let mut fields = GPS_FIELDS.to_vec();
    if require_gps_time {
        fields.extend_from_slice(&GPS_TIME_FIELDS);
    }
    let (channels, len) = aligned_channels(set, GPS_GROUP, &fields)?;

    let vz = optional_channel(set, GPS_VZ_FIELD, len).map(|c| float_column(c, len));

    let gps_time = match gps_time_columns(set, len) {
        Ok(columns) => columns,
        Err(err) if !require_gps_time => {
            warn!("Ignoring GPS time columns: {}", err);
            None
        }
        Err(err) => return Err(err),
    };

    let record = AlignedRecord {
        time_us: integer_column(channels[0], len, GPS_GROUP, GPS_FIELDS[0])?,
        lat: float_column(channels[1], len),
        lng: float_column(channels[2], len),
        alt: float_column(channels[3], len),
        status: float_column(channels[4], len),
        spd: float_column(channels[5], len),
        vz,
        gps_time,
    };

    debug!(
        "Aligned {} GPS samples (VZ {}, GPS time {})",
        record.len(),
        if record.vz.is_some() { "present" } else { "absent" },
        if record.gps_time.is_some() { "present" } else { "absent" }
    );

    Ok(record)
}
