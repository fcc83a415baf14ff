//! Types that represent the core data model, such as `Amount`, `Category` and `LedgerEntry`.
mod amount;
mod category;
mod entry;

pub use amount::{parse_amount, Amount, AmountError, CURRENCY};
pub use category::{
    column_for, resolve_expense_category, resolve_income_category, Category, CategoryKind, Column,
};
pub use entry::{LedgerEntry, Summary};
