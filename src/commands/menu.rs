use crate::commands::expense::listing;
use crate::commands::{summary, uploaded, Out};
use crate::error::ErrorType;
use crate::ledger::{AfterAdd, Removal};
use crate::model::Category;
use crate::prompt::Console;
use crate::{Result, Session};
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "\
Please choose from one of the following options (1-6)...
1. Add Income
2. Add Expense
3. Remove Expense
4. List Expenses
5. View Summary
6. Exit";

/// Runs the interactive menu on `console` until the user chooses to exit.
///
/// A failed action is reported on the console and the menu is shown again. Only a console failure,
/// such as the input being closed, ends the loop early.
pub async fn menu<R, W>(
    session: &mut Session,
    console: &mut Console<R, W>,
    recent_count: usize,
) -> Result<Out<()>>
where
    R: BufRead,
    W: Write,
{
    loop {
        console.say(MENU)?;
        let choice = console.ask("> ")?;
        debug!("Menu option '{choice}'");
        let outcome = match choice.as_str() {
            "1" => add_income(session, console).await,
            "2" => add_expense(session, console).await,
            "3" => remove_expense(session, console, recent_count).await,
            "4" => console.say(listing(recent_count, session.list_recent(recent_count))),
            "5" => view_summary(session, console).await,
            "6" => break,
            _ => console.say("Please choose a number between 1 and 6."),
        };
        match outcome {
            Err(e) if e.error_type() == ErrorType::Io => return Err(e),
            Err(e) => console.say(e.to_string())?,
            Ok(()) => {}
        }
    }
    Ok("Exiting the program.".into())
}

async fn add_income<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let amount = console.amount("How much was this income?")?;
    let key = console.menu_key(Category::incomes())?;
    let (amount, category) = session.add_income(&amount, &key).await?;
    console.say(uploaded(amount, category))
}

async fn add_expense<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let amount = console.amount("How much was this expense?")?;
    let key = console.menu_key(Category::expenses())?;
    let entry = session.add_expense(&amount, &key, AfterAdd::Reload).await?;
    console.say(uploaded(entry.amount(), entry.category()))
}

async fn remove_expense<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
    recent_count: usize,
) -> Result<()> {
    if session.ledger().is_empty() {
        return console.say("No expenses to remove.");
    }
    console.say("Select the expense to remove:")?;
    console.say(listing(recent_count, session.list_recent(recent_count)))?;
    let Ok(index) = console.ask("> ")?.parse::<usize>() else {
        return console.say("Please enter a number.");
    };
    let position = session.ledger().recent_position(index, recent_count)?;
    let removal = session
        .remove_expense(position, |entry| {
            console.confirm(&format!("Remove {entry}?"))
        })
        .await?;
    match removal {
        Removal::Removed(_) => console.say("Expense removed."),
        Removal::Cancelled => console.say("Operation canceled."),
    }
}

async fn view_summary<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<()> {
    let summary = session.summary().await?;
    session.publish_summary(&summary).await?;
    console.say(summary::render(&summary))
}
