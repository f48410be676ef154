// src/table.rs
//! In-memory table: ordered header row plus ordered data rows
//!
//! Cells stay text; an empty CSV field is a missing value. Nothing is coerced,
//! so `007` stays `007` and writing a table back out is byte-stable.

use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::error::{CoreError, Result};

/// A single cell; `None` is a missing value
pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Parse CSV bytes; the first record is the header row
    pub fn from_csv_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers = reader.headers()?.iter().map(str::to_owned).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| field.to_owned()))
                    .collect(),
            );
        }
        Ok(Self { headers, rows })
    }

    /// Load a CSV file as a table
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }
        Self::from_csv_bytes(&std::fs::read(path)?)
    }

    /// Serialize as CSV with `\n` record terminators
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer
            .into_inner()
            .map_err(|err| CoreError::Io(err.into_error()))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, top to bottom; short rows yield `None`
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|c| c.as_deref()))
                .collect(),
        )
    }
}
