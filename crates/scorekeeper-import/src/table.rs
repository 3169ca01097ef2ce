// Spreadsheet loading: turns the first worksheet of a workbook (or a CSV file)
// into an in-memory table of typed cells keyed by header name.

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::io::Read;
use std::path::Path;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single spreadsheet value.
///
/// Empty cells and spreadsheet error values (`#N/A`, `#REF!`, ...) both load
/// as `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

static MISSING: Cell = Cell::Missing;

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The structured date-time carried by the cell, if any. Text that merely
    /// looks like a date does not count.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(value) => Some(*value),
            _ => None,
        }
    }
}

/// Text form of the cell. Missing renders as the empty string and whole
/// floats drop their fractional part (`3.0` -> `3`).
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

/// Header row plus data rows, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// 0-based position among the data rows (the header is not counted).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the given column. An absent column, or a row too short to
    /// reach it, reads as `Missing`.
    pub fn cell(&self, column: Option<usize>) -> &'a Cell {
        column
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&MISSING)
    }
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the column with exactly this header, first match wins.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(|(index, cells)| Row {
            index,
            cells: cells.as_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header and the first `limit` rows, one line each, for diagnostics.
    pub fn preview(&self, limit: usize) -> String {
        let mut out = self.columns.join(" | ");
        for row in self.rows().take(limit) {
            let cells: Vec<String> = (0..self.columns.len())
                .map(|i| row.cell(Some(i)).to_string())
                .collect();
            out.push('\n');
            out.push_str(&format!("{}: {}", row.index(), cells.join(" | ")));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: String,
        source: calamine::Error,
    },

    #[error("workbook {path} has no worksheets")]
    NoSheets { path: String },
}

// ---------------------------------------------------------------------------
// Cell conversion
// ---------------------------------------------------------------------------

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(x) => Cell::Float(*x),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Cell::Text(data.to_string()),
        Data::DateTime(dt) => match data.as_datetime() {
            // Serial values below one day carry a time of day only.
            Some(value) if dt.as_f64() < 1.0 => Cell::Time(value.time()),
            Some(value) => Cell::DateTime(value),
            None => Cell::Text(data.to_string()),
        },
        Data::DateTimeIso(s) => match data.as_datetime().or_else(|| iso_date_at_midnight(s)) {
            Some(value) => Cell::DateTime(value),
            None => Cell::Text(data.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

/// ODS date cells may hold a bare `YYYY-MM-DD`; read those as midnight.
fn iso_date_at_midnight(s: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn header_name(index: usize, cell: Cell) -> String {
    match cell {
        Cell::Missing => format!("Unnamed: {index}"),
        other => other.to_string(),
    }
}

fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::default();
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, data)| header_name(i, cell_from_data(data)))
        .collect();
    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Table::new(columns, rows)
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read CSV data with a header record. Empty fields load as `Missing`, all
/// other fields as `Text`. Records may be shorter or longer than the header.
pub fn read_csv<R: Read>(rdr: R) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let cell = if h.is_empty() {
                Cell::Missing
            } else {
                Cell::Text(h.to_string())
            };
            header_name(i, cell)
        })
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Missing
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Table::new(columns, rows))
}

/// Load a CSV file.
pub fn load_csv(path: &Path) -> Result<Table, TableError> {
    let file = std::fs::File::open(path).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_csv(file).map_err(|e| TableError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the first worksheet of an `.xlsx`, `.xlsm`, `.xls` or `.ods` workbook.
pub fn load_workbook(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::Workbook {
        path: path.display().to_string(),
        source: e,
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::NoSheets {
            path: path.display().to_string(),
        })?
        .map_err(|e| TableError::Workbook {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(table_from_range(&range))
}

/// Load a table, choosing the reader from the file extension. `.csv` goes
/// through the CSV reader, everything else is treated as a workbook.
pub fn load_table(path: &Path) -> Result<Table, TableError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv(path)
    } else {
        load_workbook(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
