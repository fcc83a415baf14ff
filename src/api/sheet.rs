//! Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet.

use super::oauth::TokenProvider;
use super::row_col::column_letters;
use crate::api::{RowCol, Sheet};
use crate::error::Res;
use crate::model::Column;
use anyhow::Context;
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateValuesRequest, DateTimeRenderOption, Dimension,
    ValueInputOption, ValueRange, ValueRenderOption,
};
use tracing::trace;

/// Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet. It
/// takes a `TokenProvider`, from which it gets a fresh access token before every request.
pub(super) struct GoogleSheet {
    spreadsheet_id: String,
    token_provider: TokenProvider,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) async fn new(
        spreadsheet_id: impl Into<String>,
        token_provider: TokenProvider,
    ) -> Res<Self> {
        let client = create_sheets_client(&token_provider).await?;
        Ok(Self {
            spreadsheet_id: spreadsheet_id.into(),
            token_provider,
            client,
        })
    }

    /// Refreshes the sheets client with a new access token if needed
    async fn refresh_client(&mut self) -> Res<()> {
        self.client = create_sheets_client(&self.token_provider).await?;
        Ok(())
    }

    /// Gets the values in `range` (A1 notation including the sheet name), organized by `dimension`.
    async fn values(&mut self, range: &str, dimension: Dimension) -> Res<Vec<Vec<String>>> {
        self.refresh_client().await?;
        let response = self
            .client
            .spreadsheets()
            .values_get(
                &self.spreadsheet_id,
                range,
                DateTimeRenderOption::FormattedString,
                dimension,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch {range}"))?;
        Ok(response.body.values)
    }

    /// Writes each `(range, rows)` pair in a single batch request.
    async fn update(&mut self, data: Vec<(String, Vec<Vec<String>>)>) -> Res<()> {
        self.refresh_client().await?;
        let ranges: Vec<String> = data.iter().map(|(range, _)| range.clone()).collect();
        let value_ranges: Vec<ValueRange> = data
            .into_iter()
            .map(|(range, values)| ValueRange {
                major_dimension: Some(Dimension::Rows),
                range,
                values,
            })
            .collect();

        let request = BatchUpdateValuesRequest {
            data: value_ranges,
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };

        self.client
            .spreadsheets()
            .values_batch_update(&self.spreadsheet_id, &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to write ranges: {ranges:?}"))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn read_column(&mut self, sheet_name: &str, column: Column) -> Res<Vec<String>> {
        trace!("read_column {column} of {sheet_name}");
        let letters = column_letters(column);
        let range = format!("{sheet_name}!{letters}:{letters}");
        let columns = self.values(&range, Dimension::Columns).await?;
        Ok(columns.into_iter().next().unwrap_or_default())
    }

    async fn read_row(&mut self, sheet_name: &str, row: usize) -> Res<Vec<String>> {
        trace!("read_row {row} of {sheet_name}");
        let range = format!("{sheet_name}!{row}:{row}");
        let rows = self.values(&range, Dimension::Rows).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn write_cell(
        &mut self,
        sheet_name: &str,
        row: usize,
        column: Column,
        value: &str,
    ) -> Res<()> {
        let cell = RowCol::new(row, column);
        trace!("write_cell {cell} of {sheet_name}");
        self.update(vec![(
            format!("{sheet_name}!{cell}"),
            vec![vec![value.to_string()]],
        )])
        .await
    }

    async fn clear_all(&mut self, sheet_name: &str) -> Res<()> {
        trace!("clear_all {sheet_name}");
        self.refresh_client().await?;
        let request = BatchClearValuesRequest {
            ranges: vec![format!("{sheet_name}!A:ZZ")],
        };
        self.client
            .spreadsheets()
            .values_batch_clear(&self.spreadsheet_id, &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to clear {sheet_name}"))?;
        Ok(())
    }

    async fn insert_row(&mut self, sheet_name: &str, values: &[String], at: usize) -> Res<()> {
        trace!("insert_row at {at} of {sheet_name}");
        // The values API has no insert, so the rows from `at` down are rewritten one row lower.
        let existing = self
            .values(&format!("{sheet_name}!A:ZZ"), Dimension::Rows)
            .await?;
        let mut rows = vec![values.to_vec()];
        rows.extend(existing.into_iter().skip(at.saturating_sub(1)));

        // Every row is padded to the same width so that shorter rows blank out the cells of the
        // longer rows they land on.
        let width = rows.iter().map(Vec::len).max().unwrap_or_default();
        for row in rows.iter_mut() {
            row.resize(width, String::new());
        }
        if width == 0 {
            return Ok(());
        }
        let range = format!("{sheet_name}!{}", RowCol::new(at, 1));
        self.update(vec![(range, rows)]).await
    }

    async fn write_range(
        &mut self,
        sheet_name: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> Res<()> {
        trace!("write_range {range} of {sheet_name}");
        self.update(vec![(format!("{sheet_name}!{range}"), values.to_vec())])
            .await
    }
}

/// Creates a new sheets client with a fresh access token.
async fn create_sheets_client(token_provider: &TokenProvider) -> Res<sheets::Client> {
    let access_token = token_provider.token().await?;

    // Note: The sheets crate requires client_id, client_secret, and redirect_uri,
    // but we don't need them for API calls, only the access token
    Ok(sheets::Client::new(
        String::new(), // client_id (not needed for API calls with access token)
        String::new(), // client_secret (not needed for API calls with access token)
        String::new(), // redirect_uri (not needed for API calls with access token)
        access_token,
        String::new(), // refresh_token (not needed, the service account authenticator refreshes)
    ))
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    anyhow::Error::new(e).context("The Google Sheets API request failed")
}
