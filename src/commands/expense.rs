use crate::commands::{uploaded, Out};
use crate::ledger::{AfterAdd, Removal};
use crate::model::LedgerEntry;
use crate::prompt::Console;
use crate::{Result, Session};
use std::io::{BufRead, Write};

/// Records an expense of `amount` under the expense category with menu key `menu_key`.
///
/// The expense is appended to the session's ledger without reloading it.
pub async fn expense(
    session: &mut Session,
    amount: &str,
    menu_key: &str,
) -> Result<Out<LedgerEntry>> {
    let entry = session
        .add_expense(amount, menu_key, AfterAdd::Append)
        .await?;
    Ok(Out::new(
        uploaded(entry.amount(), entry.category()),
        entry,
    ))
}

/// Lists the last `count` expenses of the session's ledger, numbered from 1.
pub fn list(session: &Session, count: usize) -> Out<Vec<LedgerEntry>> {
    let entries = session.list_recent(count);
    Out::new(listing(count, entries), entries.to_vec())
}

/// Removes the expense numbered `index` in the listing of the last `count` expenses.
///
/// Unless `assume_yes` is set, the removal is confirmed on `console`.
pub async fn remove<R, W>(
    session: &mut Session,
    console: &mut Console<R, W>,
    index: usize,
    count: usize,
    assume_yes: bool,
) -> Result<Out<LedgerEntry>>
where
    R: BufRead,
    W: Write,
{
    let position = session.ledger().recent_position(index, count)?;
    let removal = session
        .remove_expense(position, |entry| {
            if assume_yes {
                Ok(true)
            } else {
                console.confirm(&format!("Remove {entry}?"))
            }
        })
        .await?;
    Ok(match removal {
        Removal::Removed(entry) => Out::new("Expense removed.", entry),
        Removal::Cancelled => Out::new_message("Operation canceled."),
    })
}

/// e.g.
/// ```text
/// Last 10 Expenses:
/// 1. Utilities - €45.10
/// 2. Shopping - €42.50
/// ```
pub(crate) fn listing(count: usize, entries: &[LedgerEntry]) -> String {
    let mut s = format!("Last {count} Expenses:");
    for (ix, entry) in entries.iter().enumerate() {
        s.push_str(&format!("\n{}. {entry}", ix + 1));
    }
    s
}
