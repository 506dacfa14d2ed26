pub mod client;
pub mod error;
pub mod parse;

pub use client::LocatorClient;
pub use error::ScraperError;
pub use parse::{parse_outlets, ScrapedOutlet};
