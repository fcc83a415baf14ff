use crate::model::{Amount, Category};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One recorded expense.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LedgerEntry {
    amount: Amount,
    category: Category,
}

impl LedgerEntry {
    pub fn new(amount: Amount, category: Category) -> Self {
        Self { amount, category }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl Display for LedgerEntry {
    /// e.g. `Shopping - €42.50`
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.category, self.amount)
    }
}

/// The derived totals. These are never cached; see `summary::compute`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total_income: Amount,
    pub total_expenses: Amount,
    pub net_savings: Amount,
}

impl Summary {
    /// The row written to the summary worksheet.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.total_income.to_cell(),
            self.total_expenses.to_cell(),
            self.net_savings.to_cell(),
        ]
    }
}
