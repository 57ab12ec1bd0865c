//! Result-set metadata consulted by the size sub-algorithms.
//!
//! The statement layer owns this; the mapper only reads it. Live query
//! results carry server-reported modifiers and observed display widths,
//! catalog-emulated results carry manually assigned field sizes.

/// Per-column metadata of the active result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Column name.
    pub name: String,
    /// Packed type modifier: `precision << 16 | scale` for numerics,
    /// declared length for character types.
    pub type_modifier: Option<i32>,
    /// Manually assigned field size.
    pub field_size: Option<i32>,
    /// Longest value observed (display width).
    pub display_size: Option<i32>,
    /// Column is fed by a sequence default.
    pub auto_increment: bool,
}

impl FieldMetadata {
    /// Create field metadata with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the packed type modifier.
    pub fn with_type_modifier(mut self, modifier: i32) -> Self {
        self.type_modifier = Some(modifier);
        self
    }

    /// Set a numeric modifier from precision and scale.
    pub fn with_precision_scale(self, precision: u16, scale: u16) -> Self {
        self.with_type_modifier(((precision as i32) << 16) | scale as i32)
    }

    /// Set the manually assigned field size.
    pub fn with_field_size(mut self, size: i32) -> Self {
        self.field_size = Some(size);
        self
    }

    /// Set the observed display width.
    pub fn with_display_size(mut self, size: i32) -> Self {
        self.display_size = Some(size);
        self
    }

    /// Mark the column as auto-incrementing.
    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Type modifier, treating negative values as absent.
    pub fn modifier(&self) -> Option<i32> {
        self.type_modifier.filter(|m| *m > -1)
    }
}

/// Metadata of the statement's current result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMetadata {
    /// Result was synthesized locally to answer a catalog request.
    pub catalog: bool,
    /// Per-column metadata in column order.
    pub fields: Vec<FieldMetadata>,
}

impl ResultMetadata {
    /// Metadata for a live query result.
    pub fn live(fields: Vec<FieldMetadata>) -> Self {
        Self {
            catalog: false,
            fields,
        }
    }

    /// Metadata for a catalog-emulated result.
    pub fn catalog(fields: Vec<FieldMetadata>) -> Self {
        Self {
            catalog: true,
            fields,
        }
    }

    /// Get field metadata by column index.
    pub fn field(&self, col: usize) -> Option<&FieldMetadata> {
        self.fields.get(col)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_scale_packing() {
        let f = FieldMetadata::new("amount").with_precision_scale(10, 2);
        assert_eq!(f.type_modifier, Some((10 << 16) | 2));
    }

    #[test]
    fn test_negative_modifier_is_absent() {
        let f = FieldMetadata::new("x").with_type_modifier(-1);
        assert_eq!(f.modifier(), None);
    }

    #[test]
    fn test_field_lookup() {
        let meta = ResultMetadata::live(vec![FieldMetadata::new("a"), FieldMetadata::new("b")]);
        assert!(!meta.catalog);
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.field(1).map(|f| f.name.as_str()), Some("b"));
        assert!(meta.field(2).is_none());
    }
}
