// src/extract/raw_table.rs

/// One structured table as found on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Position among all tables matched by the selector, skipped ones included.
    pub index: usize,
    /// Column labels after header flattening. Not normalized.
    pub columns: Vec<String>,
    /// Body rows, each aligned with `columns`. `None` is an empty cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn rows(&self) -> impl Iterator<Item = RawTableRow<'_>> + '_ {
        self.rows
            .iter()
            .map(move |cells| RawTableRow::new(self.index, &self.columns, cells))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Borrowed view of a single row: column label → cell, in column order.
#[derive(Debug, Clone, Copy)]
pub struct RawTableRow<'a> {
    pub table_index: usize,
    columns: &'a [String],
    cells: &'a [Option<String>],
}

impl<'a> RawTableRow<'a> {
    pub fn new(table_index: usize, columns: &'a [String], cells: &'a [Option<String>]) -> Self {
        Self {
            table_index,
            columns,
            cells,
        }
    }

    /// Case-insensitive lookup.
    ///
    /// `None` when no column has that label, `Some(None)` when the column
    /// exists but the cell is empty.
    pub fn get_ignore_case(&self, label: &str) -> Option<Option<&'a str>> {
        let wanted = label.to_lowercase();
        let cells = self.cells;
        self.columns
            .iter()
            .position(|c| c.to_lowercase() == wanted)
            .map(|i| cells.get(i).and_then(|c| c.as_deref()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let cells = self.cells;
        self.columns
            .iter()
            .enumerate()
            .map(move |(i, c)| (c.as_str(), cells.get(i).and_then(|v| v.as_deref())))
    }
}
