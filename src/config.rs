//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and contains the URL of the
//! Google Sheet, the names of its worksheets and the path to the service account key.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const RECENT_COUNT: usize = 10;
const SECRETS: &str = ".secrets";
const CREDS_JSON: &str = "creds.json";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory, its secrets subdirectory and:
    /// - Creates an initial `config.json` file using `sheet_url` along with default settings
    /// - Moves `credentials_file` into its default location in the data dir.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/budget`
    /// - `credentials_file` - The service account key JSON downloaded from the Google Cloud
    ///   Console. This will be moved to `$BUDGET_HOME/.secrets/creds.json`.
    /// - `sheet_url` - The URL of the Google Sheet where the budget is stored.
    ///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if `sheet_url` is not a sheet URL.
    pub async fn create(
        dir: impl Into<PathBuf>,
        credentials_file: &Path,
        sheet_url: &str,
    ) -> Res<Self> {
        // Validate before touching the file system
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;
        utils::rename(credentials_file, secrets.join(CREDS_JSON)).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            sheet_url: sheet_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    /// - return the loaded configuration object
    ///
    /// # Errors
    /// - `ErrorType::Config` if any of the above fails.
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        Self::read(budget_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn read(budget_home: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&budget_home)
            .await
            .context("The budget home directory is missing, run 'budget init' first")?;
        let _ = utils::read_dir(&root)
            .await
            .context("The budget home directory is unreadable")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let config = Self {
            root: root.clone(),
            secrets: root.join(SECRETS),
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn worksheets(&self) -> &Worksheets {
        &self.config_file.worksheets
    }

    /// How many expenses to show when listing recent expenses.
    pub fn recent_count(&self) -> usize {
        self.config_file.recent_count
    }

    /// Returns the stored `credentials_path` if it is absolute, otherwise resolves it relative to
    /// `$BUDGET_HOME`.
    pub fn credentials_path(&self) -> PathBuf {
        let p = self.config_file.credentials_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// The names of the three worksheets (tabs) of the budget spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Worksheets {
    income: String,
    expenses: String,
    summary: String,
}

impl Default for Worksheets {
    fn default() -> Self {
        Self {
            income: "income".to_string(),
            expenses: "expenses".to_string(),
            summary: "summary".to_string(),
        }
    }
}

impl Worksheets {
    pub fn new(
        income: impl Into<String>,
        expenses: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            income: income.into(),
            expenses: expenses.into(),
            summary: summary.into(),
        }
    }

    pub fn income(&self) -> &str {
        &self.income
    }

    pub fn expenses(&self) -> &str {
        &self.expenses
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6i",
///   "worksheets": { "income": "income", "expenses": "expenses", "summary": "summary" },
///   "recent_count": 10,
///   "credentials_path": ".secrets/creds.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the budget Google Sheet
    sheet_url: String,

    /// Worksheet names, defaulting to `income`, `expenses` and `summary`
    #[serde(default)]
    worksheets: Worksheets,

    /// Number of expenses shown by the list command
    #[serde(default = "default_recent_count")]
    recent_count: usize,

    /// Path to the service account key (optional, relative to $BUDGET_HOME or absolute)
    /// Defaults to $BUDGET_HOME/.secrets/creds.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials_path: Option<PathBuf>,
}

fn default_recent_count() -> usize {
    RECENT_COUNT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            worksheets: Worksheets::default(),
            recent_count: RECENT_COUNT,
            credentials_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or is not a budget config file
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(CREDS_JSON))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL, e.g.
///   "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/..."
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid.
fn extract_spreadsheet_id(url: &str) -> Res<&str> {
    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            let id_part = parts[i + 1];
            let id = id_part
                .split(['?', '#'])
                .next()
                .unwrap_or(id_part);
            if id.is_empty() {
                break;
            }
            return Ok(id);
        }
    }
    bail!(
        "Invalid Google Sheets URL format '{url}'. \
        Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    )
}
