//! Totals derived from the income and expenses worksheets. Nothing here is cached, every figure
//! is computed from a fresh read of the sheet.

use crate::api::Sheet;
use crate::config::Worksheets;
use crate::error::{ErrorType, IntoResult, Result};
use crate::model::{Amount, Category, Summary};
use anyhow::Context;
use tracing::debug;

/// Where the summary row is written in the summary worksheet. Row 1 holds the headers.
const SUMMARY_RANGE: &str = "A2:C2";

/// Sums every amount in the income worksheet.
///
/// # Errors
/// - `ErrorType::StoreUnavailable` if a column cannot be read.
/// - `ErrorType::MalformedCell` if a non-blank data cell is not a number or the total overflows.
pub async fn total_income(
    sheet: &mut (dyn Sheet + Send),
    worksheets: &Worksheets,
) -> Result<Amount> {
    total(sheet, worksheets.income(), Category::incomes()).await
}

/// Sums every amount in the expenses worksheet.
///
/// # Errors
/// - `ErrorType::StoreUnavailable` if a column cannot be read.
/// - `ErrorType::MalformedCell` if a non-blank data cell is not a number or the total overflows.
pub async fn total_expenses(
    sheet: &mut (dyn Sheet + Send),
    worksheets: &Worksheets,
) -> Result<Amount> {
    total(sheet, worksheets.expenses(), Category::expenses()).await
}

/// `total_income - total_expenses`, clamped to the representable range if it overflows.
pub fn net_savings(total_income: Amount, total_expenses: Amount) -> Amount {
    total_income.saturating_sub(total_expenses)
}

/// Reads both worksheets and computes all three figures.
pub async fn compute(sheet: &mut (dyn Sheet + Send), worksheets: &Worksheets) -> Result<Summary> {
    let total_income = total_income(sheet, worksheets).await?;
    let total_expenses = total_expenses(sheet, worksheets).await?;
    let summary = Summary {
        total_income,
        total_expenses,
        net_savings: net_savings(total_income, total_expenses),
    };
    debug!("Computed {summary:?}");
    Ok(summary)
}

/// Overwrites the summary row of the summary worksheet with `summary`.
///
/// # Errors
/// - `ErrorType::StoreUnavailable` if the write fails.
pub async fn publish(
    sheet: &mut (dyn Sheet + Send),
    worksheets: &Worksheets,
    summary: &Summary,
) -> Result<()> {
    sheet
        .write_range(worksheets.summary(), SUMMARY_RANGE, &[summary.to_row()])
        .await
        .context("Unable to publish the summary")
        .pub_result(ErrorType::StoreUnavailable)
}

async fn total(
    sheet: &mut (dyn Sheet + Send),
    sheet_name: &str,
    categories: &[Category],
) -> Result<Amount> {
    let mut sum = Amount::ZERO;
    for category in categories {
        let cells = sheet
            .read_column(sheet_name, category.column())
            .await
            .with_context(|| format!("Unable to read the {category} column of {sheet_name}"))
            .pub_result(ErrorType::StoreUnavailable)?;
        for (ix, cell) in cells.iter().enumerate().skip(1) {
            if cell.trim().is_empty() {
                continue;
            }
            let amount = Amount::from_cell(cell)
                .with_context(|| {
                    format!(
                        "The {category} value '{cell}' in row {} of {sheet_name} is not a number",
                        ix + 1
                    )
                })
                .pub_result(ErrorType::MalformedCell)?;
            sum = sum
                .checked_add(amount)
                .with_context(|| {
                    format!(
                        "The {category} total of {sheet_name} overflows at row {}",
                        ix + 1
                    )
                })
                .pub_result(ErrorType::MalformedCell)?;
        }
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheet;
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn sheet(income: &str, expenses: &str) -> TestSheet {
        TestSheet::from_csv(&[
            ("income", income),
            ("expenses", expenses),
            ("summary", "Total Income,Total Expenses,Net Savings\n"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_compute_and_publish() {
        let mut sheet = sheet(
            "Salary,Freelance,Misc\n\"1,000.00\",,\n",
            "Rent/Mortgage,Utilities\n200.50,\n,50\n",
        );
        let ws = Worksheets::default();
        let summary = compute(&mut sheet, &ws).await.unwrap();
        assert_eq!(summary.total_income, amount("1000.00"));
        assert_eq!(summary.total_expenses, amount("250.50"));
        assert_eq!(summary.net_savings, amount("749.50"));
        assert_eq!(summary.net_savings.to_string(), "€749.50");

        publish(&mut sheet, &ws, &summary).await.unwrap();
        let row = sheet.read_row("summary", 2).await.unwrap();
        assert_eq!(row, vec!["1000.00", "250.50", "749.50"]);
    }

    #[tokio::test]
    async fn test_publish_overwrites() {
        let mut sheet = sheet("Salary\n", "Rent/Mortgage\n");
        let ws = Worksheets::default();
        sheet
            .write_range("summary", "A2:C2", &[vec!["9".into(), "9".into(), "9".into()]])
            .await
            .unwrap();
        let summary = compute(&mut sheet, &ws).await.unwrap();
        publish(&mut sheet, &ws, &summary).await.unwrap();
        let row = sheet.read_row("summary", 2).await.unwrap();
        assert_eq!(row, vec!["0", "0", "0"]);
    }

    #[tokio::test]
    async fn test_empty_worksheets() {
        let mut sheet = TestSheet::with_worksheets(&Worksheets::default());
        let summary = compute(&mut sheet, &Worksheets::default()).await.unwrap();
        assert!(summary.total_income.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.net_savings.is_zero());
    }

    #[tokio::test]
    async fn test_totals_span_all_columns() {
        let mut sheet = sheet(
            "Salary,Freelance,Misc\n100,20,3\n,,0.5\n",
            "Rent/Mortgage,Utilities,Shopping,Transport,Insurance,Entertainment,Savings,\
            Miscellaneous\n1,1,1,1,1,1,1,1\n",
        );
        let ws = Worksheets::default();
        assert_eq!(total_income(&mut sheet, &ws).await.unwrap(), amount("123.5"));
        assert_eq!(total_expenses(&mut sheet, &ws).await.unwrap(), amount("8"));
    }

    #[tokio::test]
    async fn test_malformed_cell() {
        let mut sheet = sheet("Salary,Freelance\n100,n/a\n", "Rent/Mortgage\n");
        let err = total_income(&mut sheet, &Worksheets::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::MalformedCell);
        assert!(err.to_string().contains("'n/a' in row 2"));
    }

    #[tokio::test]
    async fn test_total_overflow_is_an_error() {
        let mut sheet = sheet(
            "Salary\n79228162514264337593543950335\n1\n",
            "Rent/Mortgage\n",
        );
        let err = total_income(&mut sheet, &Worksheets::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::MalformedCell);
        assert!(err.to_string().contains("overflows at row 3"));
    }

    #[tokio::test]
    async fn test_missing_worksheet() {
        let mut sheet = TestSheet::from_csv(&[("income", "Salary\n")]).unwrap();
        let err = total_expenses(&mut sheet, &Worksheets::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StoreUnavailable);
    }

    #[test]
    fn test_net_savings() {
        assert_eq!(
            net_savings(amount("1000.00"), amount("250.50")),
            amount("749.50")
        );
        let negative = net_savings(amount("100"), amount("150.50"));
        assert_eq!(negative, amount("-50.50"));
        assert_eq!(negative.to_string(), "-€50.50");
        assert!(net_savings(Amount::ZERO, Amount::ZERO).is_zero());
        let max = Amount::new(rust_decimal::Decimal::MAX);
        assert_eq!(net_savings(max, amount("-1")), max);
    }
}
