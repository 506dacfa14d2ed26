//! HTTP client for the outlet-locator page.

use std::time::Duration;

use crate::error::ScraperError;

const FETCH_ATTEMPTS: usize = 3;
const FETCH_BACKOFF_MS: [u64; 3] = [0, 300, 900];

/// Fetches locator-page HTML with a bounded retry schedule.
#[derive(Debug, Clone)]
pub struct LocatorClient {
    client: reqwest::Client,
    user_agent: String,
}

impl LocatorClient {
    /// Build a client with the given request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// Fetch the locator page body, retrying transient failures on a fixed
    /// backoff schedule. Non-2xx responses and empty bodies count as failed
    /// attempts.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::AllAttemptsFailed`] once every attempt has
    /// returned an error, a non-2xx status, or an unusable body.
    pub async fn fetch_locator_page(&self, url: &str) -> Result<String, ScraperError> {
        for attempt in 0..FETCH_ATTEMPTS {
            if let Some(delay_ms) = FETCH_BACKOFF_MS.get(attempt).copied() {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response = match self
                .client
                .get(url)
                .header(reqwest::header::USER_AGENT, &self.user_agent)
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::debug!(url, attempt, error = %err, "locator fetch failed; retrying");
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                tracing::debug!(url, attempt, status = status.as_u16(), "non-success status");
                continue;
            }

            let body = response.text().await?;
            if body.trim().is_empty() {
                tracing::debug!(url, attempt, "empty body; retrying");
                continue;
            }
            return Ok(body);
        }

        // Every attempt returned an error, non-2xx, or an empty body.
        Err(ScraperError::AllAttemptsFailed {
            url: url.to_owned(),
        })
    }
}
