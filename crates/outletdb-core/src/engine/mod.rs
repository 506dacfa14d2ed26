//! Natural-language query resolution over the outlet directory.
//!
//! The pipeline is: normalize the raw question, match its signal tokens
//! against the current set of outlet addresses, classify the intent, then
//! answer directly (count / list / hours), ask the user to disambiguate, or
//! report no match. Only the disambiguation branch touches per-user state.

pub mod intent;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod selection;

pub use intent::{classify, ClassifiedQuery, HoursFocus, QueryIntent};
pub use matcher::{LocationMatcher, SubstringMatcher};
pub use normalize::normalize_text;
pub use resolver::{QueryResolver, SelectionError};
pub use selection::{InMemorySelectionStore, SelectionStore, DEFAULT_SELECTION_TTL};
