//! Column-major result tables.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Cell, Column, ColumnInfo};

/// A recordset held column by column.
///
/// Every column holds the same number of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    column_info: Arc<ColumnInfo>,
    data: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from columns paired with their cells.
    pub fn new(columns: Vec<(Column, Vec<Cell>)>) -> Result<Self> {
        let expected = columns.first().map(|(_, cells)| cells.len()).unwrap_or(0);
        if let Some((column, cells)) = columns.iter().find(|(_, cells)| cells.len() != expected) {
            return Err(Error::UnevenColumns {
                column: column.name.clone(),
                expected,
                actual: cells.len(),
            });
        }
        let (columns, data): (Vec<Column>, Vec<Vec<Cell>>) = columns.into_iter().unzip();
        Ok(Self {
            column_info: Arc::new(ColumnInfo::new(columns)),
            data,
        })
    }

    /// A table with the given columns and no rows.
    pub fn empty(columns: Vec<Column>) -> Self {
        let data = vec![Vec::new(); columns.len()];
        Self {
            column_info: Arc::new(ColumnInfo::new(columns)),
            data,
        }
    }

    /// Build a table from row-major cells.
    pub fn from_rows(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::empty(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append one row.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.data.len() {
            return Err(Error::UnevenColumns {
                column: format!("row {}", self.row_count()),
                expected: self.data.len(),
                actual: row.len(),
            });
        }
        for (column, cell) in self.data.iter_mut().zip(row) {
            column.push(cell);
        }
        Ok(())
    }

    /// Column descriptors.
    pub fn columns(&self) -> &[Column] {
        &self.column_info.columns
    }

    /// Shared column information.
    pub fn column_info(&self) -> &Arc<ColumnInfo> {
        &self.column_info
    }

    pub fn column_count(&self) -> usize {
        self.data.len()
    }

    pub fn row_count(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one column.
    pub fn column(&self, index: usize) -> Option<&[Cell]> {
        self.data.get(index).map(Vec::as_slice)
    }

    /// Cells of a column looked up by name (case-insensitive).
    pub fn column_by_name(&self, name: &str) -> Option<&[Cell]> {
        self.column_info
            .find_by_name(name)
            .and_then(|idx| self.column(idx))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data.get(col).and_then(|c| c.get(row))
    }

    /// View of one row.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.row_count()).then_some(Row { table: self, index })
    }

    /// Iterate over row views in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.row_count()).map(move |index| Row { table: self, index })
    }

    /// Append the rows of `other`, which must have the same columns.
    pub fn extend(&mut self, other: Table) -> Result<()> {
        if other.columns() != self.columns() {
            return Err(Error::framing("cannot concatenate tables with different columns"));
        }
        for (column, cells) in self.data.iter_mut().zip(other.data) {
            column.extend(cells);
        }
        Ok(())
    }
}

/// One row of a [`Table`], read across its columns.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the given column.
    pub fn get(&self, col: usize) -> Option<&'a Cell> {
        self.table.cell(self.index, col)
    }

    /// Cell in the named column (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&'a Cell> {
        self.table
            .column_info
            .find_by_name(name)
            .and_then(|col| self.get(col))
    }

    pub fn len(&self) -> usize {
        self.table.column_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &'a [Column] {
        self.table.columns()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        let index = self.index;
        self.table.data.iter().map(move |column| &column[index])
    }

    /// Copy the cells out, e.g. to push them into another table.
    pub fn to_vec(&self) -> Vec<Cell> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NativeType;

    fn two_columns() -> Vec<Column> {
        vec![
            Column::new("name", NativeType::Varchar, true),
            Column::new("qty", NativeType::Int4, false),
        ]
    }

    #[test]
    fn test_uneven_columns_rejected() {
        let cols = two_columns();
        let err = Table::new(vec![
            (cols[0].clone(), vec!["a".into(), "b".into()]),
            (cols[1].clone(), vec![1.into()]),
        ])
        .unwrap_err();
        match err {
            Error::UnevenColumns {
                column,
                expected,
                actual,
            } => {
                assert_eq!(column, "qty");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected UnevenColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_and_lookup() {
        let table = Table::from_rows(
            two_columns(),
            vec![vec!["a".into(), 1.into()], vec!["bb".into(), Cell::Null]],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_by_name("QTY").unwrap()[0], Cell::Int32(1));
        assert_eq!(table.cell(1, 0), Some(&Cell::Text("bb".into())));

        let rows: Vec<Row> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index(), 1);
        assert_eq!(rows[1].get_by_name("qty"), Some(&Cell::Null));
        assert_eq!(rows[1].columns()[0].name, "name");
        assert_eq!(rows[0].to_vec(), vec![Cell::Text("a".into()), Cell::Int32(1)]);
        assert_eq!(rows[0].iter().count(), 2);
        assert!(table.row(2).is_none());

        let empty = Table::from_rows(vec![], vec![]).unwrap();
        assert_eq!(empty.rows().count(), 0);
    }

    #[test]
    fn test_push_row_wrong_width() {
        let mut table = Table::empty(two_columns());
        assert!(table.is_empty());
        assert!(table.push_row(vec!["only".into()]).is_err());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_extend() {
        let mut a = Table::from_rows(two_columns(), vec![vec!["a".into(), 1.into()]]).unwrap();
        let b = Table::from_rows(two_columns(), vec![vec!["b".into(), 2.into()]]).unwrap();
        a.extend(b).unwrap();
        assert_eq!(a.column(1).unwrap(), &[Cell::Int32(1), Cell::Int32(2)]);

        let other = Table::empty(vec![Column::new("x", NativeType::Int2, true)]);
        assert!(a.extend(other).is_err());
    }
}
