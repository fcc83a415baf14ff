//! These structs provide the CLI interface for the budget CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// budget: Record income and expenses in a Google Sheet.
///
/// Income and expenses are kept in the `income` and `expenses` worksheets of a Google Sheet, with
/// one column per category. The `summary` worksheet receives the total income, total expenses
/// and net savings.
///
/// Access to the sheet is through a Google Cloud service account. Share the sheet with the
/// service account's email address and pass its JSON key to `budget init`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the budget home directory and its configuration file.
    ///
    /// Run this first. You need:
    ///
    /// - The URL of your budget Google Sheet, passed as --sheet-url. The sheet needs `income`,
    ///   `expenses` and `summary` worksheets, each with a header row.
    ///
    /// - A service account JSON key, passed as --credentials. The file is moved into the
    ///   `.secrets` directory of the budget home directory.
    Init(InitArgs),
    /// Run the interactive menu.
    Menu,
    /// Record income.
    Income(AddArgs),
    /// Record an expense.
    Expense(AddArgs),
    /// List the most recent expenses.
    List(ListArgs),
    /// Remove an expense, by its number in the output of `budget list`.
    Remove(RemoveArgs),
    /// Show total income, total expenses and net savings.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The directory where the budget configuration is held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// (Not shown): Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your budget Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your service account JSON key.
    #[arg(long)]
    credentials: PathBuf,
}

impl InitArgs {
    pub fn new(sheet_url: impl Into<String>, credentials: impl Into<PathBuf>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            credentials: credentials.into(),
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn credentials(&self) -> &Path {
        &self.credentials
    }
}

/// (Not shown): Args for the `budget income` and `budget expense` commands.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount, e.g. 42.50
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// The category number as shown in the menu. Income: 1 Salary, 2 Freelance, 3 Misc.
    /// Expenses: 1 Rent/Mortgage, 2 Utilities, 3 Shopping, 4 Transport, 5 Insurance,
    /// 6 Entertainment, 7 Savings, 8 Miscellaneous.
    category: String,
}

impl AddArgs {
    pub fn new(amount: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// (Not shown): Args for the `budget list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// How many expenses to show. Defaults to `recent_count` in the config file.
    #[arg(long)]
    count: Option<usize>,
}

impl ListArgs {
    pub fn new(count: Option<usize>) -> Self {
        Self { count }
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }
}

/// (Not shown): Args for the `budget remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The number of the expense in the output of `budget list`.
    position: usize,

    /// The listing the position refers to. Defaults to `recent_count` in the config file.
    #[arg(long)]
    count: Option<usize>,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

impl RemoveArgs {
    pub fn new(position: usize, count: Option<usize>, yes: bool) -> Self {
        Self {
            position,
            count,
            yes,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// (Not shown): Args for the `budget summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// Print the totals without writing them to the summary worksheet.
    #[arg(long)]
    no_publish: bool,
}

impl SummaryArgs {
    pub fn new(no_publish: bool) -> Self {
        Self { no_publish }
    }

    pub fn publish(&self) -> bool {
        !self.no_publish
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("budget").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_expense_args() {
        let args = parse(&["--budget-home", "/tmp/b", "expense", "42.50", "3"]);
        assert_eq!(args.common().budget_home().path(), Path::new("/tmp/b"));
        assert_eq!(args.common().log_level(), LevelFilter::WARN);
        match args.command() {
            Command::Expense(add) => {
                assert_eq!(add.amount(), "42.50");
                assert_eq!(add.category(), "3");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_negative_amount_is_positional() {
        let args = parse(&["income", "-5", "1"]);
        let Command::Income(add) = args.command() else {
            panic!("expected income");
        };
        assert_eq!(add.amount(), "-5");
    }

    #[test]
    fn test_remove_and_summary_args() {
        let args = parse(&["--log-level", "debug", "remove", "2", "--yes"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Remove(remove) = args.command() else {
            panic!("expected remove");
        };
        assert_eq!(remove.position(), 2);
        assert!(remove.yes());
        assert_eq!(remove.count(), None);

        let args = parse(&["summary", "--no-publish"]);
        let Command::Summary(summary) = args.command() else {
            panic!("expected summary");
        };
        assert!(!summary.publish());
    }

    #[test]
    fn test_init_requires_credentials() {
        let result = Args::try_parse_from(["budget", "init", "--sheet-url", "https://x"]);
        assert!(result.is_err());
    }
}
