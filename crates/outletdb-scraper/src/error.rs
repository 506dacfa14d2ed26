use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("locator page fetch failed after all attempts: {url}")]
    AllAttemptsFailed { url: String },

    #[error("locator page {url} contains no outlet entries")]
    NoOutletsFound { url: String },
}
