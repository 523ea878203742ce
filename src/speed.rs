//! Speed resolution
//!
//! Decides once per log whether vertical velocity is worth folding into the
//! speed magnitude, then applies that choice to every retained sample.

use crate::types::{ChannelSet, FilteredRecord, SpeedSeries, GPA_GROUP};
use log::{debug, warn};

/// Field of the `GPA` group used to detect vertical velocity support
pub const GPA_VV_FIELD: &str = "VV";

/// Whether the log carries meaningful vertical velocity telemetry
///
/// True only if `GPA.VV` exists and its maximum over the whole, unfiltered
/// log is above zero. Receivers without vertical velocity log all zeros.
pub fn vertical_velocity_available(set: &ChannelSet) -> bool {
    let max = set
        .channel(GPA_GROUP, GPA_VV_FIELD)
        .and_then(|channel| channel.max());
    debug!("GPA.VV maximum: {:?}", max);
    matches!(max, Some(m) if m > 0.0)
}

/// Combine horizontal and vertical speed
///
/// With `fuse` set and `vz` given, each sample is `sqrt(spd² + vz²)`.
/// Otherwise the horizontal speed is returned unchanged.
pub fn resolve_speed(spd: &[f64], vz: Option<&[f64]>, fuse: bool) -> SpeedSeries {
    match (fuse, vz) {
        (true, Some(vz)) => {
            debug_assert_eq!(spd.len(), vz.len());
            SpeedSeries {
                values: spd.iter().zip(vz).map(|(h, v)| h.hypot(*v)).collect(),
                fused: true,
            }
        }
        (true, None) => {
            warn!("GPA.VV reports vertical velocity but GPS.VZ is missing, using ground speed");
            SpeedSeries {
                values: spd.to_vec(),
                fused: false,
            }
        }
        (false, _) => SpeedSeries {
            values: spd.to_vec(),
            fused: false,
        },
    }
}

/// Resolve speed for a filtered record using the log-wide vertical velocity decision
pub fn resolve_record_speed(set: &ChannelSet, record: &FilteredRecord) -> SpeedSeries {
    resolve_speed(
        &record.spd,
        record.vz.as_deref(),
        vertical_velocity_available(set),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;

    fn set_with_vv(vv: Vec<f64>) -> ChannelSet {
        let mut set = ChannelSet::new();
        set.insert_channel(GPA_GROUP, GPA_VV_FIELD, vv.into_iter().collect::<Channel>());
        set
    }

    #[test]
    fn test_vertical_velocity_detection() {
        assert!(!vertical_velocity_available(&ChannelSet::new()));
        assert!(!vertical_velocity_available(&set_with_vv(vec![0.0, 0.0])));
        assert!(!vertical_velocity_available(&set_with_vv(vec![])));
        assert!(!vertical_velocity_available(&set_with_vv(vec![-0.2, -1.0])));
        assert!(vertical_velocity_available(&set_with_vv(vec![0.0, 0.4, 0.0])));
    }

    #[test]
    fn test_identity_without_fusion() {
        let spd = [1.5, 0.0, 12.25];
        let vz = [3.0, -4.0, 1.0];
        let speed = resolve_speed(&spd, Some(&vz), false);
        assert_eq!(speed.values, spd.to_vec());
        assert!(!speed.fused);
    }

    #[test]
    fn test_fused_speed_is_euclidean_norm() {
        let spd = [3.0, 0.0, 1.0, 2.5];
        let vz = [4.0, -2.0, 0.0, -1.5];
        let speed = resolve_speed(&spd, Some(&vz), true);

        assert!(speed.fused);
        for i in 0..spd.len() {
            let expected = (spd[i] * spd[i] + vz[i] * vz[i]).sqrt();
            assert!((speed.values[i] - expected).abs() < 1e-12);
            assert!(speed.values[i] >= spd[i]);
        }
        assert_eq!(speed.values[0], 5.0);
        assert_eq!(speed.values[1], 2.0);
    }

    #[test]
    fn test_fusion_without_vz_falls_back() {
        let spd = [1.0, 2.0];
        let speed = resolve_speed(&spd, None, true);
        assert_eq!(speed.values, vec![1.0, 2.0]);
        assert!(!speed.fused);
    }
}
