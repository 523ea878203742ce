//! Shared text-log fixtures

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const FMT_LINES: &str = "\
FMT, 128, 89, FMT, BBnNZ, Type,Length,Name,Format,Columns
FMT, 130, 53, GPS, QBIHBLLeff, TimeUS,Status,GMS,GWk,NSats,Lat,Lng,Alt,Spd,VZ
FMT, 131, 30, GPA, QCCCB, TimeUS,VDop,HAcc,VAcc,VV
FMT, 91, 75, MSG, QZ, TimeUS,Message
";

/// GPS messages: one sample without a fix, then two 3D fixes
pub const GPS_LINES: &str = "\
MSG, 900000, ArduCopter V4.3.0 (abc123)
GPS, 1000000, 1, 264529000, 2238, 5, 0.0, 0.0, 0.0, 0.0, 0.0
GPS, 1200000, 3, 264530000, 2238, 12, -35.3632621, 149.1652374, 584.27, 3.0, -4.0
GPS, 1400000, 3, 264530200, 2238, 12, -35.3632700, 149.1652400, 584.31, 0.0, 0.0
";

pub const GPA_LINES: &str = "\
GPA, 1000000, 150, 300, 400, 1
GPA, 1200000, 80, 120, 200, 1
GPA, 1400000, 80, 120, 200, 1
";

/// Expected extended CSV for `flight_log()`
pub const EXTENDED_CSV: &str = "\
GMT,TimeUS,Lat,Lng,Alt
1669771712000,1200000,-35.3632621,149.1652374,584.3
1669771712200,1400000,-35.3632700,149.1652400,584.3
";

/// GPS and GPA messages, so speed is fused
pub fn flight_log() -> String {
    format!("{FMT_LINES}{GPS_LINES}{GPA_LINES}")
}

/// GPS messages only
pub fn ground_log() -> String {
    format!("{FMT_LINES}{GPS_LINES}")
}

/// A log with formats but no GPS messages
pub fn no_gps_log() -> String {
    format!("{FMT_LINES}MSG, 900000, Initialising\n")
}

pub fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test log");
    path
}
