use budget_sheet::args::{Args, Command};
use budget_sheet::prompt::Console;
use budget_sheet::{commands, Config, Mode, Result, Session};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    // This allows for running the program without hitting the Google APIs. When
    // BUDGET_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    if let Command::Init(init_args) = args.command() {
        commands::init(home, init_args.credentials(), init_args.sheet_url())
            .await?
            .print();
        return Ok(());
    }

    let config = Config::load(home).await?;
    let mut session = Session::open(&config, mode).await?;
    let recent_count = config.recent_count();

    let _: () = match args.command() {
        Command::Init(_) => {}

        Command::Menu => {
            session.try_reload().await;
            let mut console = Console::new(io::stdin().lock(), io::stdout());
            commands::menu(&mut session, &mut console, recent_count)
                .await?
                .print()
        }

        Command::Income(add) => commands::income(&mut session, add.amount(), add.category())
            .await?
            .print(),

        Command::Expense(add) => commands::expense(&mut session, add.amount(), add.category())
            .await?
            .print(),

        Command::List(list_args) => {
            session.reload().await?;
            commands::list(&session, list_args.count().unwrap_or(recent_count)).print()
        }

        Command::Remove(remove_args) => {
            session.reload().await?;
            let mut console = Console::new(io::stdin().lock(), io::stdout());
            commands::remove(
                &mut session,
                &mut console,
                remove_args.position(),
                remove_args.count().unwrap_or(recent_count),
                remove_args.yes(),
            )
            .await?
            .print()
        }

        Command::Summary(summary_args) => commands::summary(&mut session, summary_args.publish())
            .await?
            .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
