//! Reqwest-backed `BalanceForwarder`.
//!
//! Sends `PATCH {base}/users/balance` with the caller's own credential as the
//! `jwt-token` cookie. A 2xx status with a JSON body counts as success.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::BalanceSettings;
use crate::domain::ports::{BalanceForwarder, BalanceForwarderError};
use crate::domain::{BalanceUpdate, BearerCredential};
use crate::outbound::http_body::body_preview;

const CREDENTIAL_COOKIE: &str = "jwt-token";

/// Forwards approved task rewards to the balance service.
pub struct HttpBalanceForwarder {
    client: Client,
    endpoint: String,
}

impl HttpBalanceForwarder {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: &BalanceSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/users/balance", settings.base_url),
        })
    }
}

fn cookie_header(credential: &BearerCredential) -> String {
    format!("{CREDENTIAL_COOKIE}={}", credential.expose())
}

fn check_response(status: StatusCode, body: &[u8]) -> Result<(), BalanceForwarderError> {
    let json_body = serde_json::from_slice::<serde_json::Value>(body).is_ok();
    if status.is_success() && json_body {
        Ok(())
    } else {
        Err(BalanceForwarderError::rejected(status.as_u16(), body_preview(body)))
    }
}

#[async_trait]
impl BalanceForwarder for HttpBalanceForwarder {
    async fn forward(
        &self,
        update: &BalanceUpdate,
        credential: &BearerCredential,
    ) -> Result<(), BalanceForwarderError> {
        let response = self
            .client
            .patch(&self.endpoint)
            .header(COOKIE, cookie_header(credential))
            .json(update)
            .send()
            .await
            .map_err(|err| BalanceForwarderError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| BalanceForwarderError::transport(err.to_string()))?;
        check_response(status, &body).inspect_err(|err| {
            warn!(
                task_id = update.task_id,
                user_id = update.user_id,
                error = %err,
                "balance update failed"
            );
        })?;
        debug!(task_id = update.task_id, user_id = update.user_id, "balance updated");
        Ok(())
    }
}
