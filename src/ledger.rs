//! The ledger cache: an in-memory mirror of the expenses worksheet.
//!
//! The expenses worksheet has one column per expense category with the category name in the
//! header row. The mirror is rebuilt by scanning those columns in category order, so it is grouped
//! by category rather than sorted by when each expense was added.
//!
//! Income is written straight to the income worksheet and is never mirrored.

use crate::api::Sheet;
use crate::config::Worksheets;
use crate::error::{Error, ErrorType, IntoResult, Res, Result};
use crate::model::{
    parse_amount, resolve_expense_category, resolve_income_category, Amount, Category, Column,
    LedgerEntry,
};
use anyhow::Context;
use tracing::{debug, trace, warn};

/// What to do with the mirror after an expense has been written to the sheet.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum AfterAdd {
    /// Push the new entry onto the mirror without reading the sheet again.
    #[default]
    Append,
    /// Rebuild the mirror from the sheet.
    Reload,
}

/// The outcome of `Ledger::remove`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Removal {
    Removed(LedgerEntry),
    Cancelled,
}

/// The ordered collection of expenses mirrored from the expenses worksheet.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the mirror with the contents of the expenses worksheet.
    ///
    /// The new mirror is built aside and swapped in only when every column has been read and
    /// parsed, so on error the previous mirror is left untouched.
    ///
    /// # Errors
    /// - `ErrorType::StoreUnavailable` if a column cannot be read.
    /// - `ErrorType::MalformedCell` if a non-blank data cell is not a number.
    pub async fn reload(
        &mut self,
        sheet: &mut (dyn Sheet + Send),
        worksheets: &Worksheets,
    ) -> Result<()> {
        let mut entries = Vec::new();
        for category in Category::expenses() {
            let cells = sheet
                .read_column(worksheets.expenses(), category.column())
                .await
                .with_context(|| format!("Unable to load the {category} expenses"))
                .pub_result(ErrorType::StoreUnavailable)?;
            // The first cell is the header.
            for (ix, cell) in cells.iter().enumerate().skip(1) {
                if cell.trim().is_empty() {
                    continue;
                }
                let amount = cell
                    .parse::<Amount>()
                    .with_context(|| {
                        format!(
                            "The {category} expense '{cell}' in row {} is not a number",
                            ix + 1
                        )
                    })
                    .pub_result(ErrorType::MalformedCell)?;
                entries.push(LedgerEntry::new(amount, *category));
            }
        }
        debug!("Loaded {} expenses", entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Records an expense. `amount` and `menu_key` are the raw user input.
    ///
    /// The amount is written to the first unused row of the category's column. Then, depending on
    /// `after`, the new entry is pushed onto the mirror or the mirror is reloaded. Once the write
    /// has succeeded the expense is recorded: a failed reload only logs a warning and pushes the
    /// entry onto the previous mirror.
    ///
    /// # Errors
    /// - `ErrorType::InvalidAmount` if `amount` is not a number.
    /// - `ErrorType::InvalidCategory` if `menu_key` is not an expense menu key.
    /// - `ErrorType::StoreUnavailable` if the sheet cannot be read or written.
    pub async fn add(
        &mut self,
        sheet: &mut (dyn Sheet + Send),
        worksheets: &Worksheets,
        amount: &str,
        menu_key: &str,
        after: AfterAdd,
    ) -> Result<LedgerEntry> {
        let amount = parse_amount(amount)?;
        let category = resolve_expense_category(menu_key)?;
        let row = append_to_column(sheet, worksheets.expenses(), category.column(), amount)
            .await
            .with_context(|| format!("Unable to add the expense to {category}"))
            .pub_result(ErrorType::StoreUnavailable)?;
        debug!("Expense added: {category} - {amount} at row {row}");

        let entry = LedgerEntry::new(amount, category);
        match after {
            AfterAdd::Append => self.entries.push(entry),
            AfterAdd::Reload => {
                if let Err(e) = self.reload(sheet, worksheets).await {
                    warn!(
                        "The expense was recorded but the expenses are stale, reload to retry: {e}"
                    );
                    self.entries.push(entry);
                }
            }
        }
        Ok(entry)
    }

    /// The last `n` entries, in mirror order.
    pub fn list_recent(&self, n: usize) -> &[LedgerEntry] {
        &self.entries[self.recent_offset(n)..]
    }

    /// Translates a 1-based `index` into the listing produced by `list_recent(n)` into a 1-based
    /// position in the mirror.
    ///
    /// # Errors
    /// - `ErrorType::OutOfRange` if `index` is not in that listing.
    pub fn recent_position(&self, index: usize, n: usize) -> Result<usize> {
        let shown = self.list_recent(n).len();
        if index == 0 || index > shown {
            return Err(out_of_range(shown));
        }
        Ok(self.recent_offset(n) + index)
    }

    /// Returns the entry at a 1-based mirror `position`.
    ///
    /// # Errors
    /// - `ErrorType::OutOfRange` if there is no such entry.
    pub fn get(&self, position: usize) -> Result<LedgerEntry> {
        position
            .checked_sub(1)
            .and_then(|ix| self.entries.get(ix))
            .copied()
            .ok_or_else(|| out_of_range(self.len()))
    }

    /// Removes the expense at the 1-based mirror `position` once `confirm` agrees.
    ///
    /// On confirmation the entry is dropped from the mirror and the whole expenses worksheet is
    /// rewritten from the mirror: the header row is kept, every data row is cleared and each
    /// remaining entry is appended to its category's column in mirror order. If the rewrite fails
    /// part way through, the worksheet and the mirror disagree until the next `reload`.
    ///
    /// # Errors
    /// - `ErrorType::OutOfRange` if `position` is not in the mirror. `confirm` is not called.
    /// - Any error returned by `confirm`.
    /// - `ErrorType::StoreUnavailable` if the rewrite fails.
    pub async fn remove<F>(
        &mut self,
        sheet: &mut (dyn Sheet + Send),
        worksheets: &Worksheets,
        position: usize,
        confirm: F,
    ) -> Result<Removal>
    where
        F: FnOnce(&LedgerEntry) -> Result<bool>,
    {
        let entry = self.get(position)?;
        if !confirm(&entry)? {
            debug!("Removal of {entry} canceled");
            return Ok(Removal::Cancelled);
        }
        self.entries.remove(position - 1);
        rewrite(sheet, worksheets.expenses(), &self.entries)
            .await
            .context("Unable to rewrite the expenses sheet")
            .pub_result(ErrorType::StoreUnavailable)?;
        debug!("Removed {entry}");
        Ok(Removal::Removed(entry))
    }

    fn recent_offset(&self, n: usize) -> usize {
        self.entries.len().saturating_sub(n)
    }
}

/// Records income. Income is appended to the first unused row of the category's column in the
/// income worksheet.
///
/// # Errors
/// - `ErrorType::InvalidAmount` if `amount` is not a number.
/// - `ErrorType::InvalidCategory` if `menu_key` is not an income menu key.
/// - `ErrorType::StoreUnavailable` if the sheet cannot be read or written.
pub async fn add_income(
    sheet: &mut (dyn Sheet + Send),
    worksheets: &Worksheets,
    amount: &str,
    menu_key: &str,
) -> Result<(Amount, Category)> {
    let amount = parse_amount(amount)?;
    let category = resolve_income_category(menu_key)?;
    let row = append_to_column(sheet, worksheets.income(), category.column(), amount)
        .await
        .with_context(|| format!("Unable to add the income to {category}"))
        .pub_result(ErrorType::StoreUnavailable)?;
    debug!("Income added: {category} - {amount} at row {row}");
    Ok((amount, category))
}

/// Writes `amount` just below the last non-blank cell of `column` and returns the row it was
/// written to.
async fn append_to_column(
    sheet: &mut (dyn Sheet + Send),
    sheet_name: &str,
    column: Column,
    amount: Amount,
) -> Res<usize> {
    let existing = sheet.read_column(sheet_name, column).await?;
    let row = existing.len() + 1;
    trace!("Appending {amount} to {sheet_name} row {row} column {column}");
    sheet
        .write_cell(sheet_name, row, column, &amount.to_cell())
        .await?;
    Ok(row)
}

/// Replaces all data rows of the worksheet with `entries`, keeping the header row.
async fn rewrite(
    sheet: &mut (dyn Sheet + Send),
    sheet_name: &str,
    entries: &[LedgerEntry],
) -> Res<()> {
    let headers = sheet.read_row(sheet_name, 1).await?;
    sheet.clear_all(sheet_name).await?;
    sheet.insert_row(sheet_name, &headers, 1).await?;
    for entry in entries {
        append_to_column(
            sheet,
            sheet_name,
            entry.category().column(),
            entry.amount(),
        )
        .await?;
    }
    Ok(())
}

fn out_of_range(len: usize) -> Error {
    if len == 0 {
        Error::msg(ErrorType::OutOfRange, "No expenses to remove.")
    } else {
        Error::msg(
            ErrorType::OutOfRange,
            format!("Please choose a valid expense number between 1 and {len}."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheet;
    use std::str::FromStr;

    const EXPENSES: &str = "\
Rent/Mortgage,Utilities,Shopping,Transport,Insurance,Entertainment,Savings,Miscellaneous
900,45.10,12.00,,,,,
,60,,8.40,,,,
,,19.99,,,,,3
";

    fn fixture() -> (TestSheet, Worksheets) {
        let sheet = TestSheet::from_csv(&[
            ("expenses", EXPENSES),
            ("income", "Salary,Freelance,Misc\n"),
        ])
        .unwrap();
        (sheet, Worksheets::default())
    }

    fn entry(amount: &str, category: Category) -> LedgerEntry {
        LedgerEntry::new(Amount::from_str(amount).unwrap(), category)
    }

    async fn loaded() -> (TestSheet, Worksheets, Ledger) {
        let (mut sheet, ws) = fixture();
        let mut ledger = Ledger::default();
        ledger.reload(&mut sheet, &ws).await.unwrap();
        (sheet, ws, ledger)
    }

    #[tokio::test]
    async fn test_reload_is_grouped_by_category() {
        let (_, _, ledger) = loaded().await;
        assert_eq!(
            ledger.entries(),
            &[
                entry("900", Category::RentMortgage),
                entry("45.10", Category::Utilities),
                entry("60", Category::Utilities),
                entry("12.00", Category::Shopping),
                entry("19.99", Category::Shopping),
                entry("8.40", Category::Transport),
                entry("3", Category::Miscellaneous),
            ]
        );
    }

    #[tokio::test]
    async fn test_reload_twice_is_identical() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let first = ledger.clone();
        ledger.reload(&mut sheet, &ws).await.unwrap();
        assert_eq!(first, ledger);
    }

    #[tokio::test]
    async fn test_reload_headers_only() {
        let mut sheet = TestSheet::with_worksheets(&Worksheets::default());
        let mut ledger = Ledger::default();
        ledger
            .reload(&mut sheet, &Worksheets::default())
            .await
            .unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.list_recent(10).is_empty());
    }

    #[tokio::test]
    async fn test_reload_malformed_cell_keeps_previous_mirror() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let before = ledger.clone();
        sheet.write_cell("expenses", 2, 6, "lots").await.unwrap();
        let err = ledger.reload(&mut sheet, &ws).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::MalformedCell);
        assert!(err.to_string().contains("'lots' in row 2"));
        assert_eq!(before, ledger);
    }

    #[tokio::test]
    async fn test_reload_missing_worksheet() {
        let mut sheet = TestSheet::from_csv(&[("income", "Salary\n")]).unwrap();
        let mut ledger = Ledger::default();
        let err = ledger
            .reload(&mut sheet, &Worksheets::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_add_writes_first_free_row() {
        let mut sheet = TestSheet::with_worksheets(&Worksheets::default());
        let ws = Worksheets::default();
        let mut ledger = Ledger::default();
        let added = ledger
            .add(&mut sheet, &ws, "42.50", "3", AfterAdd::Append)
            .await
            .unwrap();
        assert_eq!(added, entry("42.50", Category::Shopping));
        assert_eq!(ledger.entries(), &[added]);
        let column = sheet.read_column("expenses", 3).await.unwrap();
        assert_eq!(column, vec!["Shopping", "42.50"]);
    }

    #[tokio::test]
    async fn test_add_then_reload_grows_by_one() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let before = ledger.len();
        ledger
            .add(&mut sheet, &ws, "7.25", "2", AfterAdd::Reload)
            .await
            .unwrap();
        assert_eq!(ledger.len(), before + 1);
        // Reloaded, so the new entry sits with the other Utilities rather than at the end.
        assert_eq!(ledger.entries()[3], entry("7.25", Category::Utilities));
        let column = sheet.read_column("expenses", 2).await.unwrap();
        assert_eq!(column, vec!["Utilities", "45.10", "60", "7.25"]);
    }

    #[tokio::test]
    async fn test_add_succeeds_when_reload_fails() {
        let mut sheet = TestSheet::from_csv(&[(
            "expenses",
            "Rent/Mortgage,Utilities,Shopping\n,bad,\n",
        )])
        .unwrap();
        let ws = Worksheets::default();
        let mut ledger = Ledger::default();
        let added = ledger
            .add(&mut sheet, &ws, "42.50", "3", AfterAdd::Reload)
            .await
            .unwrap();
        assert_eq!(added, entry("42.50", Category::Shopping));
        assert_eq!(ledger.entries(), &[added]);
        let column = sheet.read_column("expenses", 3).await.unwrap();
        assert_eq!(column, vec!["Shopping", "42.50"]);
    }

    #[tokio::test]
    async fn test_add_appends_below_interior_blank() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        ledger
            .add(&mut sheet, &ws, "1", "1", AfterAdd::Append)
            .await
            .unwrap();
        let column = sheet.read_column("expenses", 1).await.unwrap();
        assert_eq!(column, vec!["Rent/Mortgage", "900", "1"]);
    }

    #[tokio::test]
    async fn test_add_invalid_input_writes_nothing() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let before = ledger.clone();

        let err = ledger
            .add(&mut sheet, &ws, "abc", "1", AfterAdd::Append)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidAmount);

        let err = ledger
            .add(&mut sheet, &ws, "5", "9", AfterAdd::Append)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidCategory);

        assert_eq!(before, ledger);
        ledger.reload(&mut sheet, &ws).await.unwrap();
        assert_eq!(before, ledger);
    }

    #[tokio::test]
    async fn test_list_recent() {
        let (_, _, ledger) = loaded().await;
        assert_eq!(ledger.list_recent(10).len(), 7);
        assert_eq!(
            ledger.list_recent(2),
            &[
                entry("8.40", Category::Transport),
                entry("3", Category::Miscellaneous)
            ]
        );
        assert!(ledger.list_recent(0).is_empty());
    }

    #[tokio::test]
    async fn test_recent_position() {
        let (_, _, ledger) = loaded().await;
        // Listing of the last 2 entries maps onto mirror positions 6 and 7.
        assert_eq!(ledger.recent_position(1, 2).unwrap(), 6);
        assert_eq!(ledger.recent_position(2, 2).unwrap(), 7);
        assert_eq!(
            ledger.recent_position(3, 2).unwrap_err().error_type(),
            ErrorType::OutOfRange
        );
        assert_eq!(ledger.recent_position(7, 10).unwrap(), 7);
        assert!(ledger.recent_position(0, 10).is_err());
    }

    #[tokio::test]
    async fn test_remove_confirmed() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let removal = ledger
            .remove(&mut sheet, &ws, 2, |_| Ok(true))
            .await
            .unwrap();
        assert_eq!(removal, Removal::Removed(entry("45.10", Category::Utilities)));
        assert_eq!(ledger.len(), 6);

        // The column closed the gap.
        let column = sheet.read_column("expenses", 2).await.unwrap();
        assert_eq!(column, vec!["Utilities", "60"]);

        // The other columns are compacted and the header is intact.
        let column = sheet.read_column("expenses", 1).await.unwrap();
        assert_eq!(column, vec!["Rent/Mortgage", "900"]);
        let column = sheet.read_column("expenses", 8).await.unwrap();
        assert_eq!(column, vec!["Miscellaneous", "3"]);

        let mirror = ledger.clone();
        ledger.reload(&mut sheet, &ws).await.unwrap();
        assert_eq!(mirror, ledger);
    }

    #[tokio::test]
    async fn test_remove_cancelled() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        let before = ledger.clone();
        let mut asked = None;
        let removal = ledger
            .remove(&mut sheet, &ws, 7, |e| {
                asked = Some(*e);
                Ok(false)
            })
            .await
            .unwrap();
        assert_eq!(removal, Removal::Cancelled);
        assert_eq!(asked, Some(entry("3", Category::Miscellaneous)));
        assert_eq!(before, ledger);
        let column = sheet.read_column("expenses", 8).await.unwrap();
        assert_eq!(column, vec!["Miscellaneous", "", "", "3"]);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_does_not_confirm() {
        let (mut sheet, ws, mut ledger) = loaded().await;
        for position in [0, 8] {
            let err = ledger
                .remove(&mut sheet, &ws, position, |_| panic!("should not confirm"))
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), ErrorType::OutOfRange);
        }
    }

    #[tokio::test]
    async fn test_remove_empty() {
        let mut sheet = TestSheet::with_worksheets(&Worksheets::default());
        let mut ledger = Ledger::default();
        let err = ledger
            .remove(&mut sheet, &Worksheets::default(), 1, |_| {
                panic!("should not confirm")
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);
        assert_eq!(err.to_string(), "No expenses to remove.");
    }

    #[tokio::test]
    async fn test_add_income() {
        let (mut sheet, ws) = fixture();
        let (amount, category) = add_income(&mut sheet, &ws, "1500", "2").await.unwrap();
        assert_eq!(amount.to_string(), "€1500.00");
        assert_eq!(category, Category::Freelance);
        let column = sheet.read_column("income", 2).await.unwrap();
        assert_eq!(column, vec!["Freelance", "1500"]);

        let err = add_income(&mut sheet, &ws, "10", "4").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidCategory);
    }
}
