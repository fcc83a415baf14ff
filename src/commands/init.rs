use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the budget home directory, its secrets subdirectory and:
/// - Creates an initial `config.json` file using `sheet_url` along with default settings
/// - Moves `credentials_file` into its default location in the budget home directory.
///
/// # Arguments
/// - `budget_home` - The directory that will hold the configuration, e.g. `$HOME/budget`
/// - `credentials_file` - The service account key JSON. Share the sheet with the service account's
///   email address so that it can edit it.
/// - `sheet_url` - The URL of the Google Sheet that holds the budget.
///
/// # Errors
/// - `ErrorType::Config` if the URL is not a Google Sheets URL or a file operation fails.
pub async fn init(budget_home: &Path, credentials_file: &Path, sheet_url: &str) -> Result<Out<()>> {
    let config = Config::create(budget_home, credentials_file, sheet_url)
        .await
        .context("Unable to create the budget home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the budget configuration at {}",
        config.config_path().display()
    )
    .into())
}
