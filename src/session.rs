//! A `Session` ties together the sheet, the worksheet names and the ledger mirror. One is created
//! per run of the program and passed to whatever needs it.

use crate::api::{self, Mode, Sheet};
use crate::config::{Config, Worksheets};
use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::ledger::{self, AfterAdd, Ledger, Removal};
use crate::model::{Amount, Category, LedgerEntry, Summary};
use crate::summary;
use anyhow::{ensure, Context};
use tracing::{debug, warn};

pub struct Session {
    sheet: Box<dyn Sheet + Send>,
    worksheets: Worksheets,
    ledger: Ledger,
}

impl Session {
    /// Connects to the sheet configured in `config` and checks that the income, expenses and
    /// summary worksheets exist. The ledger is empty until `reload` is called.
    ///
    /// # Errors
    /// - `ErrorType::StoreUnavailable` if authorization fails or a worksheet is missing.
    pub async fn open(config: &Config, mode: Mode) -> Result<Self> {
        let sheet = api::sheet(config, mode)
            .await
            .context("Unable to connect to the budget sheet")
            .pub_result(ErrorType::StoreUnavailable)?;
        let mut session = Self::new(sheet, config.worksheets().clone());
        session.verify_worksheets().await?;
        Ok(session)
    }

    pub(crate) fn new(sheet: Box<dyn Sheet + Send>, worksheets: Worksheets) -> Self {
        Self {
            sheet,
            worksheets,
            ledger: Ledger::default(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn worksheets(&self) -> &Worksheets {
        &self.worksheets
    }

    #[cfg(test)]
    pub(crate) fn sheet_mut(&mut self) -> &mut (dyn Sheet + Send) {
        self.sheet.as_mut()
    }

    /// Rebuilds the ledger mirror from the expenses worksheet.
    pub async fn reload(&mut self) -> Result<()> {
        self.ledger
            .reload(self.sheet.as_mut(), &self.worksheets)
            .await
    }

    /// Like `reload` but failure is only logged. Used at startup where an unreadable ledger
    /// should not prevent recording income or viewing the summary.
    pub async fn try_reload(&mut self) -> bool {
        match self.reload().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to load expenses: {e}");
                false
            }
        }
    }

    pub async fn add_income(&mut self, amount: &str, menu_key: &str) -> Result<(Amount, Category)> {
        ledger::add_income(self.sheet.as_mut(), &self.worksheets, amount, menu_key).await
    }

    pub async fn add_expense(
        &mut self,
        amount: &str,
        menu_key: &str,
        after: AfterAdd,
    ) -> Result<LedgerEntry> {
        self.ledger
            .add(
                self.sheet.as_mut(),
                &self.worksheets,
                amount,
                menu_key,
                after,
            )
            .await
    }

    pub fn list_recent(&self, n: usize) -> &[LedgerEntry] {
        self.ledger.list_recent(n)
    }

    /// Removes the entry at the 1-based mirror `position`. See `Ledger::remove`.
    pub async fn remove_expense<F>(&mut self, position: usize, confirm: F) -> Result<Removal>
    where
        F: FnOnce(&LedgerEntry) -> Result<bool>,
    {
        self.ledger
            .remove(self.sheet.as_mut(), &self.worksheets, position, confirm)
            .await
    }

    pub async fn summary(&mut self) -> Result<Summary> {
        summary::compute(self.sheet.as_mut(), &self.worksheets).await
    }

    pub async fn publish_summary(&mut self, summary: &Summary) -> Result<()> {
        summary::publish(self.sheet.as_mut(), &self.worksheets, summary).await
    }

    /// Each worksheet must exist and have a header row.
    async fn verify_worksheets(&mut self) -> Result<()> {
        let names = [
            self.worksheets.income().to_string(),
            self.worksheets.expenses().to_string(),
            self.worksheets.summary().to_string(),
        ];
        for name in names {
            let headers = self
                .sheet
                .read_row(&name, 1)
                .await
                .with_context(|| format!("Unable to read the '{name}' worksheet"))
                .pub_result(ErrorType::StoreUnavailable)?;
            ensure_headers(&name, &headers).pub_result(ErrorType::StoreUnavailable)?;
            debug!("Found worksheet '{name}'");
        }
        Ok(())
    }
}

fn ensure_headers(name: &str, headers: &[String]) -> Res<()> {
    ensure!(
        !headers.is_empty(),
        "The '{name}' worksheet has no header row"
    );
    Ok(())
}
