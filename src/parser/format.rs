use std::collections::HashMap;

/// Column definition from a `FMT` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub type_char: char,
}

impl ColumnDefinition {
    /// Whether the column holds a number. `n`, `N` and `Z` are strings, `a` is an int16 array.
    pub fn is_numeric(&self) -> bool {
        !matches!(self.type_char, 'n' | 'N' | 'Z' | 'a')
    }
}

/// Message layout declared by a `FMT` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    pub type_id: u8,
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl MessageFormat {
    /// Pair column names with format characters
    ///
    /// Returns `None` if the counts disagree.
    pub fn new(type_id: u8, name: &str, format: &str, names: &[&str]) -> Option<Self> {
        if format.chars().count() != names.len() {
            return None;
        }
        let columns = names
            .iter()
            .zip(format.chars())
            .map(|(name, type_char)| ColumnDefinition {
                name: name.to_string(),
                type_char,
            })
            .collect();
        Some(Self {
            type_id,
            name: name.to_string(),
            columns,
        })
    }

    /// A string column may contain the delimiter, so lines can carry extra fields
    pub fn has_string_column(&self) -> bool {
        self.columns.iter().any(|c| !c.is_numeric())
    }
}

/// Known message formats, keyed by message name
#[derive(Debug, Default)]
pub struct FormatTable {
    formats: HashMap<String, MessageFormat>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, format: MessageFormat) {
        self.formats.insert(format.name.clone(), format);
    }

    pub fn get(&self, name: &str) -> Option<&MessageFormat> {
        self.formats.get(name)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format_creation() {
        let fmt = MessageFormat::new(130, "GPS", "QBIHBcLLeff", &[
            "TimeUS", "Status", "GMS", "GWk", "NSats", "HDop", "Lat", "Lng", "Alt", "Spd", "GCrs",
        ])
        .unwrap();
        assert_eq!(fmt.columns.len(), 11);
        assert_eq!(fmt.columns[6].name, "Lat");
        assert_eq!(fmt.columns[6].type_char, 'L');
        assert!(!fmt.has_string_column());
    }

    #[test]
    fn test_mismatched_format() {
        assert!(MessageFormat::new(1, "X", "QB", &["TimeUS"]).is_none());
    }

    #[test]
    fn test_string_columns() {
        let fmt = MessageFormat::new(91, "MSG", "QZ", &["TimeUS", "Message"]).unwrap();
        assert!(fmt.columns[0].is_numeric());
        assert!(!fmt.columns[1].is_numeric());
        assert!(fmt.has_string_column());
    }
}
