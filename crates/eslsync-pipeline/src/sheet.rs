//! Row model for uploaded spreadsheets and the workbook reader that
//! produces it.
//!
//! Every cell is carried as text, the way the retail export is read: numbers
//! are stringified and empty cells are `None`.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::SheetError;

/// One data row of the spreadsheet, keyed by header name in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    row_number: usize,
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    #[must_use]
    pub fn new(row_number: usize, cells: Vec<(String, Option<String>)>) -> Self {
        Self { row_number, cells }
    }

    /// 1-based spreadsheet line this row was read from.
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Value of the first column named exactly `column`, if it has one.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_none())
    }
}

/// A header row plus the data rows beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl Sheet {
    /// Builds a sheet whose header sits on line 1 and data starts on line 2.
    ///
    /// Short rows are padded with empty cells, extra cells are dropped, and
    /// rows with no values at all are ignored.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let numbered = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| (idx + 2, cells))
            .collect();
        Self::from_numbered_rows(headers, numbered)
    }

    fn from_numbered_rows(headers: Vec<String>, rows: Vec<(usize, Vec<Option<String>>)>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(row_number, mut values)| {
                values.resize(headers.len(), None);
                let cells = headers.iter().cloned().zip(values).collect();
                RawRow::new(row_number, cells)
            })
            .filter(|row| !row.is_blank())
            .collect();
        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }
}

/// Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
///
/// The first `skip_rows` spreadsheet lines are discarded (the retail export
/// puts a report title there); the next non-empty line is the header.
///
/// # Errors
///
/// - [`SheetError::Workbook`] if the bytes are not a readable workbook.
/// - [`SheetError::NoWorksheet`] if the workbook has no sheets.
/// - [`SheetError::MissingHeader`] if nothing usable follows the skipped rows.
pub fn read_workbook(bytes: &[u8], skip_rows: usize) -> Result<Sheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    // calamine crops leading empty rows, so track the physical offset.
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut lines = range
        .rows()
        .enumerate()
        .map(|(idx, cells)| (first_row + idx, cells))
        .skip_while(|(line, cells)| {
            *line < skip_rows || cells.iter().all(|cell| cell_text(cell).is_none())
        });

    let missing_header = SheetError::MissingHeader { row: skip_rows + 1 };
    let (_, header_cells) = lines.next().ok_or(missing_header)?;
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();

    let rows = lines
        .map(|(line, cells)| (line + 1, cells.iter().map(cell_text).collect()))
        .collect();

    Ok(Sheet::from_numbered_rows(headers, rows))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
