//! The external store. Everything that talks to a spreadsheet goes through the `Sheet` trait so
//! that the ledger and summary logic can run against Google Sheets or an in-memory grid.

mod oauth;
mod row_col;
mod sheet;
mod sheet_test_client;

use crate::error::Res;
use crate::model::Column;
use crate::Config;
use tracing::debug;

pub use row_col::RowCol;
pub(crate) use sheet_test_client::TestSheet;

use oauth::TokenProvider;
use sheet::GoogleSheet;

// OAuth scopes required for Sheets API access
// Note: drive.readonly is required because the sheets crate uses it as the default scope for API
// calls like spreadsheets().get(). We also include spreadsheets for full read/write access.
const OAUTH_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.readonly",
];

/// When this environment variable is set and non-empty, the in-memory `TestSheet` is used
/// instead of Google Sheets.
const TEST_MODE_ENV: &str = "BUDGET_IN_TEST_MODE";

/// Which `Sheet` implementation to use.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    /// Returns `Mode::Test` if `BUDGET_IN_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// The operations the budget logic needs from a spreadsheet. Rows and columns are 1-based.
///
/// None of these are atomic with respect to each other. Callers that read then write (for example
/// appending at the first free row) assume they have exclusive access to the sheet.
#[async_trait::async_trait]
pub trait Sheet {
    /// Reads a whole column from the top, including the header at position 1. Trailing blank
    /// cells are not returned; blank cells above the last value are returned as empty strings.
    async fn read_column(&mut self, sheet_name: &str, column: Column) -> Res<Vec<String>>;

    /// Reads a whole row. Trailing blank cells are not returned.
    async fn read_row(&mut self, sheet_name: &str, row: usize) -> Res<Vec<String>>;

    /// Writes one value into one cell.
    async fn write_cell(
        &mut self,
        sheet_name: &str,
        row: usize,
        column: Column,
        value: &str,
    ) -> Res<()>;

    /// Clears every value in the worksheet.
    async fn clear_all(&mut self, sheet_name: &str) -> Res<()>;

    /// Inserts `values` as a new row at position `at`. Rows at and below `at` move down by one.
    async fn insert_row(&mut self, sheet_name: &str, values: &[String], at: usize) -> Res<()>;

    /// Writes a block of rows into `range`, which is in A1 notation without the sheet name, e.g.
    /// `A2:C2`.
    async fn write_range(
        &mut self,
        sheet_name: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> Res<()>;
}

/// Creates the `Sheet` implementation selected by `mode`.
///
/// In `Mode::Google` this authorizes with the service account key named in `config`, which is
/// where an invalid or missing key is reported.
pub(crate) async fn sheet(config: &Config, mode: Mode) -> Res<Box<dyn Sheet + Send>> {
    match mode {
        Mode::Google => {
            debug!("Using Google Sheets for spreadsheet {}", config.spreadsheet_id());
            let token_provider = TokenProvider::load(&config.credentials_path()).await?;
            let sheet = GoogleSheet::new(config.spreadsheet_id(), token_provider).await?;
            Ok(Box::new(sheet))
        }
        Mode::Test => {
            debug!("Using the in-memory test sheet");
            Ok(Box::new(TestSheet::with_worksheets(config.worksheets())))
        }
    }
}
