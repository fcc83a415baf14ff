//! Service account authorization for the Google Sheets API.
//!
//! The spreadsheet must be shared with the service account's email address. The key file is the
//! JSON downloaded from the Google Cloud Console when creating a key for the service account.

use crate::api::OAUTH_SCOPES;
use crate::error::Res;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, trace};
use yup_oauth2::authenticator::DefaultAuthenticator;

/// Hands out access tokens for the service account. `yup_oauth2` caches the token in memory and
/// refreshes it when it is within a minute of expiring.
pub(super) struct TokenProvider {
    authenticator: DefaultAuthenticator,
}

impl TokenProvider {
    /// Reads the service account key at `key_path` and builds an authenticator from it.
    ///
    /// # Errors
    /// Returns an error if the key file is missing or is not a service account key.
    pub(super) async fn load(key_path: &Path) -> Res<Self> {
        debug!("Loading service account key from {}", key_path.display());
        let key = yup_oauth2::read_service_account_key(key_path)
            .await
            .with_context(|| {
                format!(
                    "Unable to read the service account key at {}",
                    key_path.display()
                )
            })?;
        let authenticator = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .context("Failed to create the service account authenticator")?;
        Ok(Self { authenticator })
    }

    /// Returns a valid access token, fetching a new one if needed.
    pub(super) async fn token(&self) -> Res<String> {
        trace!("Requesting an access token");
        let token = self
            .authenticator
            .token(OAUTH_SCOPES)
            .await
            .context("Failed to get an access token for the service account")?;
        token
            .token()
            .map(|t| t.to_string())
            .context("The access token returned for the service account was empty")
    }
}
