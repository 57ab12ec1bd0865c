//! Column descriptors shared by tables, rows and envelopes.

use super::native_type::NativeType;

/// Descriptor of one recordset column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Native type driving the wire signature and client mapping.
    pub native_type: NativeType,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl Column {
    /// Create a column descriptor.
    pub fn new(name: impl Into<String>, native_type: NativeType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            native_type,
            nullable,
        }
    }
}

/// Shared column information for all rows in a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    /// Column definitions.
    pub columns: Vec<Column>,
}

impl ColumnInfo {
    /// Create new column info from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find column index by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_info_lookup() {
        let info = ColumnInfo::new(vec![
            Column::new("id", NativeType::Int4, false),
            Column::new("Name", NativeType::Varchar, true),
        ]);

        assert_eq!(info.len(), 2);
        assert_eq!(info.column_names(), vec!["id", "Name"]);
        assert_eq!(info.find_by_name("NAME"), Some(1));
        assert_eq!(info.find_by_name("missing"), None);
        assert!(!info.get(0).unwrap().nullable);
    }
}
