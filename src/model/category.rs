//! The category registry.
//!
//! Every category is bound to exactly one column of its worksheet: expense categories to columns
//! of the expenses worksheet and income categories to columns of the income worksheet. The
//! registry also maps the short menu keys a user types to categories. All of this is constant
//! data.

use crate::error::{Error, ErrorType, Result};
use serde::{Deserialize, Serialize};

/// A 1-based column position within a worksheet.
pub type Column = usize;

/// Whether a category records money coming in or going out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(CategoryKind);
serde_plain::derive_fromstr_from_deserialize!(CategoryKind);

/// A fixed classification for an income or expense entry.
///
/// The serialized form is the display name, e.g. `"Rent/Mortgage"`, which is also what `Display`
/// and `FromStr` use.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Rent/Mortgage")]
    RentMortgage,
    Utilities,
    Shopping,
    Transport,
    Insurance,
    Entertainment,
    Savings,
    Miscellaneous,
    Salary,
    Freelance,
    Misc,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

/// Expense categories in definition order. The index of each is its menu key minus one.
const EXPENSES: [Category; 8] = [
    Category::RentMortgage,
    Category::Utilities,
    Category::Shopping,
    Category::Transport,
    Category::Insurance,
    Category::Entertainment,
    Category::Savings,
    Category::Miscellaneous,
];

/// Income categories in definition order.
const INCOMES: [Category; 3] = [Category::Salary, Category::Freelance, Category::Misc];

impl Category {
    /// All expense categories, in the order their columns are scanned.
    pub fn expenses() -> &'static [Category] {
        &EXPENSES
    }

    /// All income categories, in the order their columns are scanned.
    pub fn incomes() -> &'static [Category] {
        &INCOMES
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Category::Salary | Category::Freelance | Category::Misc => CategoryKind::Income,
            _ => CategoryKind::Expense,
        }
    }

    /// The human-readable name, e.g. `Rent/Mortgage`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// The column this category owns within its worksheet.
    pub fn column(&self) -> Column {
        match self {
            Category::RentMortgage | Category::Salary => 1,
            Category::Utilities | Category::Freelance => 2,
            Category::Shopping | Category::Misc => 3,
            Category::Transport => 4,
            Category::Insurance => 5,
            Category::Entertainment => 6,
            Category::Savings => 7,
            Category::Miscellaneous => 8,
        }
    }

    /// The menu key that selects this category, `"1"` through `"8"` for expenses and `"1"` through
    /// `"3"` for income.
    pub fn menu_key(&self) -> String {
        self.column().to_string()
    }
}

/// Resolves a menu key typed by the user to an expense category.
///
/// # Errors
/// - `ErrorType::InvalidCategory` if `menu_key` is not one of `1` through `8`.
pub fn resolve_expense_category(menu_key: &str) -> Result<Category> {
    resolve(menu_key, &EXPENSES)
        .ok_or_else(|| Error::msg(ErrorType::InvalidCategory, invalid_key(menu_key, &EXPENSES)))
}

/// Resolves a menu key typed by the user to an income category.
///
/// # Errors
/// - `ErrorType::InvalidCategory` if `menu_key` is not one of `1` through `3`.
pub fn resolve_income_category(menu_key: &str) -> Result<Category> {
    resolve(menu_key, &INCOMES)
        .ok_or_else(|| Error::msg(ErrorType::InvalidCategory, invalid_key(menu_key, &INCOMES)))
}

/// Finds the column for a category by its display name.
///
/// # Errors
/// - `ErrorType::UnknownCategory` if no category has the name `category_name`.
pub fn column_for(category_name: &str) -> Result<Column> {
    category_name
        .parse::<Category>()
        .map(|c| c.column())
        .map_err(|_| {
            Error::msg(
                ErrorType::UnknownCategory,
                format!("Unknown category '{category_name}'"),
            )
        })
}

fn resolve(menu_key: &str, table: &[Category]) -> Option<Category> {
    let key = menu_key.trim();
    table.iter().find(|c| c.menu_key() == key).copied()
}

fn invalid_key(menu_key: &str, table: &[Category]) -> String {
    format!(
        "Invalid category '{}'. Please choose from 1 to {}",
        menu_key.trim(),
        table.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_expense_keys_resolve() {
        let expected = [
            ("1", "Rent/Mortgage"),
            ("2", "Utilities"),
            ("3", "Shopping"),
            ("4", "Transport"),
            ("5", "Insurance"),
            ("6", "Entertainment"),
            ("7", "Savings"),
            ("8", "Miscellaneous"),
        ];
        for (key, name) in expected {
            let category = resolve_expense_category(key).unwrap();
            assert_eq!(category.name(), name);
            assert_eq!(category.kind(), CategoryKind::Expense);
        }
    }

    #[test]
    fn test_income_keys_resolve() {
        assert_eq!(resolve_income_category("1").unwrap(), Category::Salary);
        assert_eq!(resolve_income_category("2").unwrap(), Category::Freelance);
        assert_eq!(resolve_income_category(" 3 ").unwrap(), Category::Misc);
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["0", "9", "", "one", "1.0", "-1"] {
            let err = resolve_expense_category(key).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::InvalidCategory);
        }
        for key in ["0", "4", "8", "x"] {
            let err = resolve_income_category(key).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::InvalidCategory);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let expenses: HashSet<Category> = (1..=8)
            .map(|k| resolve_expense_category(&k.to_string()).unwrap())
            .collect();
        assert_eq!(expenses.len(), 8);
        let incomes: HashSet<Category> = (1..=3)
            .map(|k| resolve_income_category(&k.to_string()).unwrap())
            .collect();
        assert_eq!(incomes.len(), 3);
    }

    #[test]
    fn test_columns_are_distinct_within_a_worksheet() {
        let columns: HashSet<Column> = Category::expenses().iter().map(|c| c.column()).collect();
        assert_eq!(columns.len(), Category::expenses().len());
        let columns: HashSet<Column> = Category::incomes().iter().map(|c| c.column()).collect();
        assert_eq!(columns.len(), Category::incomes().len());
    }

    #[test]
    fn test_column_for() {
        assert_eq!(column_for("Rent/Mortgage").unwrap(), 1);
        assert_eq!(column_for("Miscellaneous").unwrap(), 8);
        assert_eq!(column_for("Misc").unwrap(), 3);
        let err = column_for("Groceries").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnknownCategory);
    }

    #[test]
    fn test_name_round_trip() {
        for category in Category::expenses().iter().chain(Category::incomes()) {
            assert_eq!(category.name().parse::<Category>().unwrap(), *category);
        }
    }
}
