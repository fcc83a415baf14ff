//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{RowCol, Sheet};
use crate::config::Worksheets;
use crate::error::Res;
use crate::model::{Category, Column};
use anyhow::{bail, Context};
use std::collections::HashMap;

/// The header row of the summary worksheet.
const SUMMARY_HEADERS: [&str; 3] = ["Total Income", "Total Expenses", "Net Savings"];

/// An implementation of the `Sheet` trait that does not use Google sheets. It holds a grid of
/// cells per worksheet. Missing cells read as blank.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestSheet {
    data: HashMap<String, Vec<Vec<String>>>,
}

impl TestSheet {
    /// Create a new `TestSheet` using `data`. The map key is sheet name and the map value is the
    /// rows of the sheet.
    pub(crate) fn new(data: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self { data }
    }

    /// Creates the three worksheets with their header rows and no data.
    pub(crate) fn with_worksheets(worksheets: &Worksheets) -> Self {
        let headers = |categories: &[Category]| -> Vec<Vec<String>> {
            vec![categories.iter().map(|c| c.name()).collect()]
        };
        let mut data = HashMap::new();
        data.insert(
            worksheets.income().to_string(),
            headers(Category::incomes()),
        );
        data.insert(
            worksheets.expenses().to_string(),
            headers(Category::expenses()),
        );
        data.insert(
            worksheets.summary().to_string(),
            vec![SUMMARY_HEADERS.iter().map(|s| s.to_string()).collect()],
        );
        Self::new(data)
    }

    /// Creates worksheets from CSV text, one `(sheet_name, csv)` pair per worksheet. Every CSV
    /// line is a row, including the first.
    #[cfg(test)]
    pub(crate) fn from_csv(worksheets: &[(&str, &str)]) -> Res<Self> {
        let mut data = HashMap::new();
        for (name, csv_data) in worksheets {
            let rows = load_csv(csv_data)
                .with_context(|| format!("Unable to load CSV data for sheet '{name}'"))?;
            data.insert(name.to_string(), rows);
        }
        Ok(Self::new(data))
    }

    fn rows(&self, sheet_name: &str) -> Res<&Vec<Vec<String>>> {
        self.data
            .get(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))
    }

    fn rows_mut(&mut self, sheet_name: &str) -> Res<&mut Vec<Vec<String>>> {
        self.data
            .get_mut(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn read_column(&mut self, sheet_name: &str, column: Column) -> Res<Vec<String>> {
        check_position(column)?;
        let values = self
            .rows(sheet_name)?
            .iter()
            .map(|row| row.get(column - 1).cloned().unwrap_or_default())
            .collect();
        Ok(trim_trailing_blanks(values))
    }

    async fn read_row(&mut self, sheet_name: &str, row: usize) -> Res<Vec<String>> {
        check_position(row)?;
        let values = self
            .rows(sheet_name)?
            .get(row - 1)
            .cloned()
            .unwrap_or_default();
        Ok(trim_trailing_blanks(values))
    }

    async fn write_cell(
        &mut self,
        sheet_name: &str,
        row: usize,
        column: Column,
        value: &str,
    ) -> Res<()> {
        check_position(row)?;
        check_position(column)?;
        let rows = self.rows_mut(sheet_name)?;
        if rows.len() < row {
            rows.resize(row, Vec::new());
        }
        let cells = &mut rows[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();
        Ok(())
    }

    async fn clear_all(&mut self, sheet_name: &str) -> Res<()> {
        self.rows_mut(sheet_name)?.clear();
        Ok(())
    }

    async fn insert_row(&mut self, sheet_name: &str, values: &[String], at: usize) -> Res<()> {
        check_position(at)?;
        let rows = self.rows_mut(sheet_name)?;
        if rows.len() < at - 1 {
            rows.resize(at - 1, Vec::new());
        }
        rows.insert(at - 1, values.to_vec());
        Ok(())
    }

    async fn write_range(
        &mut self,
        sheet_name: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> Res<()> {
        let start_cell = range.split(':').next().unwrap_or(range);
        let start: RowCol = start_cell
            .parse()
            .with_context(|| format!("Invalid range '{range}'"))?;
        for (row_ix, row) in values.iter().enumerate() {
            for (col_ix, value) in row.iter().enumerate() {
                self.write_cell(
                    sheet_name,
                    start.row() + row_ix,
                    start.col() + col_ix,
                    value,
                )
                .await?;
            }
        }
        Ok(())
    }
}

fn check_position(position: usize) -> Res<()> {
    if position == 0 {
        bail!("Rows and columns start at 1");
    }
    Ok(())
}

/// Drops blank cells from the end, the way the Sheets API does.
fn trim_trailing_blanks(mut values: Vec<String>) -> Vec<String> {
    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}

/// Loads data from a CSV-formatted string.
#[cfg(test)]
fn load_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(std::io::Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        rows.push(row);
    }
    Ok(rows)
}
