use std::fmt;

/// Error types for GPS extraction
#[derive(Debug)]
pub enum GpsError {
    /// The log has no `GPS` message group at all
    NoGpsData,
    /// A required message group is absent from the channel set
    MissingChannelGroup(String),
    /// A required field is absent from a message group
    MissingField { group: String, field: String },
    /// A value could not be represented as the type its column requires
    InvalidValue {
        group: String,
        field: String,
        index: usize,
    },
    /// GPS time conversion left the range of a u64 millisecond count
    TimeOverflow { week: u64, ms_of_week: u64 },
    /// Log format the reader cannot decode
    UnsupportedFormat(String),
    /// Malformed log line
    Parse { line: usize, msg: String },
    /// I/O errors
    Io(std::io::Error),
    /// CSV writer/reader errors
    Csv(csv::Error),
    /// JSON serialization errors
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl fmt::Display for GpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsError::NoGpsData => write!(f, "No GPS data"),
            GpsError::MissingChannelGroup(group) => {
                write!(f, "Missing message group: {}", group)
            }
            GpsError::MissingField { group, field } => {
                write!(f, "Missing field {}.{}", group, field)
            }
            GpsError::InvalidValue {
                group,
                field,
                index,
            } => write!(
                f,
                "Invalid value for {}.{} at sample {}: expected a non-negative integer",
                group, field, index
            ),
            GpsError::TimeOverflow { week, ms_of_week } => write!(
                f,
                "GPS time out of range: week {} ms {}",
                week, ms_of_week
            ),
            GpsError::UnsupportedFormat(msg) => write!(f, "Unsupported log format: {}", msg),
            GpsError::Parse { line, msg } => write!(f, "Parse error on line {}: {}", line, msg),
            GpsError::Io(err) => write!(f, "I/O error: {}", err),
            GpsError::Csv(err) => write!(f, "CSV error: {}", err),
            #[cfg(feature = "json")]
            GpsError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for GpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpsError::Io(err) => Some(err),
            GpsError::Csv(err) => Some(err),
            #[cfg(feature = "json")]
            GpsError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GpsError {
    fn from(err: std::io::Error) -> Self {
        GpsError::Io(err)
    }
}

impl From<csv::Error> for GpsError {
    fn from(err: csv::Error) -> Self {
        GpsError::Csv(err)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for GpsError {
    fn from(err: serde_json::Error) -> Self {
        GpsError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, GpsError>;
