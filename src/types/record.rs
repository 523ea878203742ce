#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GPS samples pulled out of the channel set as parallel columns
///
/// Every column has the same length; index `i` in each column refers to the
/// same logged GPS message.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlignedRecord {
    /// Log-relative time in microseconds
    pub time_us: Vec<u64>,
    pub lat: Vec<f64>,
    pub lng: Vec<f64>,
    /// Altitude in meters
    pub alt: Vec<f64>,
    /// Receiver fix type
    pub status: Vec<f64>,
    /// Horizontal ground speed in m/s
    pub spd: Vec<f64>,
    /// Vertical velocity in m/s, when the GPS message carries it
    pub vz: Option<Vec<f64>>,
    /// Receiver week / time-of-week, when the GPS message carries it
    pub gps_time: Option<GpsTimeColumns>,
}

/// GPS week number and millisecond-of-week columns
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsTimeColumns {
    pub week: Vec<u64>,
    pub ms_of_week: Vec<u64>,
}

/// An [`AlignedRecord`] restricted to samples with a 3D fix
pub type FilteredRecord = AlignedRecord;

impl AlignedRecord {
    pub fn len(&self) -> usize {
        self.time_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the positions where `keep` returns true, preserving order
    pub fn retain_indices<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let indices: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        fn pick<T: Copy>(column: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| column[i]).collect()
        }

        Self {
            time_us: pick(&self.time_us, &indices),
            lat: pick(&self.lat, &indices),
            lng: pick(&self.lng, &indices),
            alt: pick(&self.alt, &indices),
            status: pick(&self.status, &indices),
            spd: pick(&self.spd, &indices),
            vz: self.vz.as_ref().map(|vz| pick(vz, &indices)),
            gps_time: self.gps_time.as_ref().map(|t| GpsTimeColumns {
                week: pick(&t.week, &indices),
                ms_of_week: pick(&t.ms_of_week, &indices),
            }),
        }
    }
}

/// Scalar speed per retained sample
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedSeries {
    pub values: Vec<f64>,
    /// True when horizontal and vertical components were combined
    pub fused: bool,
}

impl SpeedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fully processed GPS track: filtered samples plus derived columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsTrack {
    pub record: FilteredRecord,
    pub speed: SpeedSeries,
    /// Unix epoch milliseconds (UTC) per sample, when the log has GPS time
    pub gmt_ms: Option<Vec<u64>>,
    /// Leap seconds that were subtracted to produce `gmt_ms`
    pub leap_seconds: i64,
}

impl GpsTrack {
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AlignedRecord {
        AlignedRecord {
            time_us: vec![10, 20, 30],
            lat: vec![1.0, 2.0, 3.0],
            lng: vec![4.0, 5.0, 6.0],
            alt: vec![7.0, 8.0, 9.0],
            status: vec![3.0, 1.0, 4.0],
            spd: vec![0.1, 0.2, 0.3],
            vz: Some(vec![-1.0, 0.0, 1.0]),
            gps_time: Some(GpsTimeColumns {
                week: vec![2200, 2200, 2200],
                ms_of_week: vec![100, 200, 300],
            }),
        }
    }

    #[test]
    fn test_retain_indices_keeps_columns_aligned() {
        let record = sample_record();
        let kept = record.retain_indices(|i| i != 1);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept.time_us, vec![10, 30]);
        assert_eq!(kept.lat, vec![1.0, 3.0]);
        assert_eq!(kept.lng, vec![4.0, 6.0]);
        assert_eq!(kept.alt, vec![7.0, 9.0]);
        assert_eq!(kept.status, vec![3.0, 4.0]);
        assert_eq!(kept.spd, vec![0.1, 0.3]);
        assert_eq!(kept.vz, Some(vec![-1.0, 1.0]));
        let gps_time = kept.gps_time.unwrap();
        assert_eq!(gps_time.week, vec![2200, 2200]);
        assert_eq!(gps_time.ms_of_week, vec![100, 300]);
    }

    #[test]
    fn test_retain_nothing() {
        let kept = sample_record().retain_indices(|_| false);
        assert!(kept.is_empty());
        assert_eq!(kept.vz, Some(Vec::new()));
    }
}
