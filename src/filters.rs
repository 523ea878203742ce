//! Fix-quality filtering
//!
//! Receiver status codes are 0 (no GPS), 1 (no fix), 2 (2D fix) and 3 (3D fix).
//! Newer receivers report higher codes (DGPS, RTK float, RTK fixed), and all of
//! them carry a full 3D position, so anything at or above 3 is kept.

use crate::types::{AlignedRecord, FilteredRecord};
use log::debug;

/// Lowest receiver status that carries a 3D position
pub const FIX_TYPE_3D: f64 = 3.0;

/// Whether a status code indicates a usable 3D fix
pub fn has_3d_fix(status: f64) -> bool {
    status >= FIX_TYPE_3D
}

/// Keep only the samples with a 3D fix, preserving their order
///
/// A log without a single 3D fix yields an empty record rather than an error.
pub fn filter_3d_fix(record: &AlignedRecord) -> FilteredRecord {
    let filtered = record.retain_indices(|i| has_3d_fix(record.status[i]));
    debug!(
        "Fix filter kept {} of {} GPS samples",
        filtered.len(),
        record.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_status(status: &[f64]) -> AlignedRecord {
        let n = status.len();
        AlignedRecord {
            time_us: (0..n as u64).collect(),
            lat: (0..n).map(|i| i as f64).collect(),
            lng: vec![0.0; n],
            alt: vec![0.0; n],
            status: status.to_vec(),
            spd: vec![0.0; n],
            vz: None,
            gps_time: None,
        }
    }

    #[test]
    fn test_keeps_only_3d_fixes() {
        let record = record_with_status(&[0.0, 1.0, 2.0, 3.0, 4.0, 6.0, 2.0, 3.0]);
        let filtered = filter_3d_fix(&record);

        let expected = record.status.iter().filter(|&&s| s >= 3.0).count();
        assert_eq!(filtered.len(), expected);
        assert_eq!(filtered.time_us, vec![3, 4, 5, 7]);
        assert!(filtered.status.iter().all(|&s| has_3d_fix(s)));
    }

    #[test]
    fn test_no_fix_gives_empty_record() {
        let record = record_with_status(&[0.0, 0.0, 0.0]);
        let filtered = filter_3d_fix(&record);
        assert!(filtered.is_empty());
        assert!(filtered.lat.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let record = record_with_status(&[5.0, 3.0, 1.0, 3.0]);
        let filtered = filter_3d_fix(&record);
        assert_eq!(filtered.lat, vec![0.0, 1.0, 3.0]);
    }
}
