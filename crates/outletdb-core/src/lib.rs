use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod engine;
pub mod reply;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use reply::{QueryReply, SuccessReply};

/// A single physical retail outlet as served by the directory.
///
/// The `address` is the canonical key: the backing store enforces uniqueness,
/// and the query engine matches user text against addresses, not names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub name: String,
    pub address: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub operating_hours: Option<String>,
}

/// The result of an operating-hours lookup against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletHours {
    pub name: String,
    pub operating_hours: Option<String>,
}

/// Read-only view of the outlet universe consumed by the query engine.
///
/// The engine re-reads the full set on every query so answers always reflect
/// current store contents; with outlet counts in the hundreds this is cheaper
/// than keeping a cache coherent.
pub trait OutletDirectory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every outlet currently in the store, in stable iteration order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Outlet>, Self::Error>> + Send;

    /// First outlet whose address contains `address_fragment`
    /// (case-insensitive), or `None` when nothing matches.
    fn find_hours(
        &self,
        address_fragment: &str,
    ) -> impl Future<Output = Result<Option<OutletHours>, Self::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
