//! The query resolver: normalizes, matches, classifies, and answers.

use thiserror::Error;

use crate::engine::intent::{classify, HoursFocus, QueryIntent};
use crate::engine::matcher::LocationMatcher;
use crate::engine::normalize::normalize_text;
use crate::engine::selection::SelectionStore;
use crate::reply::QueryReply;
use crate::OutletDirectory;

/// Failure modes of the selection flow. These never escape as transport
/// faults; the resolver renders them into `status: error` replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no outlet selection is in progress; ask about an outlet first")]
    NoPendingSelection,
    #[error("choice {choice} is out of range; pick a number between 1 and {max}")]
    InvalidChoice { choice: i64, max: usize },
}

/// Orchestrates one query or selection against the outlet directory.
///
/// Stateless apart from the injected selection store; every query re-reads
/// the location universe so answers always reflect current store contents.
#[derive(Debug, Clone)]
pub struct QueryResolver<D, M, S> {
    directory: D,
    matcher: M,
    selections: S,
}

impl<D, M, S> QueryResolver<D, M, S>
where
    D: OutletDirectory,
    M: LocationMatcher,
    S: SelectionStore,
{
    pub fn new(directory: D, matcher: M, selections: S) -> Self {
        Self {
            directory,
            matcher,
            selections,
        }
    }

    /// Resolve one free-text question for `user_id`.
    ///
    /// Malformed or empty input never fails: it falls through to a
    /// `status: error` not-found reply. Only directory access can error.
    ///
    /// # Errors
    ///
    /// Returns the directory's error if the outlet set cannot be read.
    pub async fn resolve_query(
        &self,
        query: &str,
        user_id: &str,
    ) -> Result<QueryReply, D::Error> {
        let normalized = normalize_text(query);
        let outlets = self.directory.list_all().await?;
        let labels: Vec<String> = outlets.iter().map(|o| o.address.clone()).collect();

        let matches = self.matcher.matching_labels(&normalized, &labels);
        let classified = classify(&normalized);

        tracing::debug!(
            user_id,
            intent = ?classified.intent,
            matched = matches.len(),
            known = labels.len(),
            "resolved location matches"
        );

        match classified.intent {
            QueryIntent::Count => {
                if matches.is_empty() {
                    return Ok(QueryReply::error("No outlets found to count for that query."));
                }
                Ok(QueryReply::count(matches.len(), classified.location_phrase))
            }
            QueryIntent::List => {
                if matches.is_empty() {
                    return Ok(QueryReply::error("No outlets found for that location."));
                }
                Ok(QueryReply::list(matches))
            }
            QueryIntent::Hours | QueryIntent::Unclassified => {
                self.answer_hours(user_id, matches, classified.focus).await
            }
        }
    }

    /// The hours/unclassified branch: answer directly on a unique match,
    /// otherwise open (or replace) the user's disambiguation.
    async fn answer_hours(
        &self,
        user_id: &str,
        matches: Vec<String>,
        focus: HoursFocus,
    ) -> Result<QueryReply, D::Error> {
        match matches.len() {
            0 => Ok(QueryReply::error("No outlets found matching your query.")),
            1 => {
                let address = matches.into_iter().next().unwrap_or_default();
                self.hours_reply(&address, focus).await
            }
            n => {
                // Always disambiguate on N>1, even when one candidate exactly
                // equals the query text.
                tracing::debug!(user_id, candidates = n, "opening disambiguation");
                self.selections.set(user_id, matches.clone()).await;
                Ok(QueryReply::multiple(matches))
            }
        }
    }

    /// Resolve a previously offered disambiguation with a 1-based `choice`.
    ///
    /// The pending entry is taken from the store atomically, so concurrent
    /// selections for the same user consume it exactly once. An out-of-range
    /// choice puts the entry back, leaving the selection open for another
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns the directory's error if the hours lookup cannot be read.
    pub async fn resolve_selection(
        &self,
        user_id: &str,
        choice: i64,
    ) -> Result<QueryReply, D::Error> {
        let Some(candidates) = self.selections.take(user_id).await else {
            return Ok(QueryReply::error(
                SelectionError::NoPendingSelection.to_string(),
            ));
        };

        let max = candidates.len();
        let Some(index) = valid_index(choice, max) else {
            self.selections.set(user_id, candidates).await;
            return Ok(QueryReply::error(
                SelectionError::InvalidChoice { choice, max }.to_string(),
            ));
        };

        let address = candidates[index].clone();
        self.hours_reply(&address, HoursFocus::Full).await
    }

    async fn hours_reply(&self, address: &str, focus: HoursFocus) -> Result<QueryReply, D::Error> {
        match self.directory.find_hours(address).await? {
            Some(found) => Ok(QueryReply::hours(
                found.name,
                address.to_string(),
                found.operating_hours,
                focus,
            )),
            None => Ok(QueryReply::error(
                "No operating hours found for that outlet.",
            )),
        }
    }
}

/// Map a 1-based choice onto a vector index, rejecting out-of-range values.
fn valid_index(choice: i64, max: usize) -> Option<usize> {
    if choice < 1 {
        return None;
    }
    let zero_based = usize::try_from(choice).ok()?.checked_sub(1)?;
    (zero_based < max).then_some(zero_based)
}
