use chrono::Utc;

use crate::engine::MatcherCore;
use crate::error::{LinkError, Result};
use crate::models::{EngineParams, Match, RecordSource};

/// Facade over the matcher core.
///
/// Holds the engine together with its lifecycle: `init` configures, `insert`
/// and `remove` mutate the shared trie, and `search` runs the expiry sweep
/// (when enabled) before the read-only parallel traversal.
pub struct RecordLink<S: RecordSource> {
    core: Option<MatcherCore<S>>,
}

impl<S: RecordSource> std::fmt::Debug for RecordLink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLink")
            .field("initialized", &self.core.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: RecordSource> Default for RecordLink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordSource> RecordLink<S> {
    #[must_use]
    pub fn new() -> Self {
        Self { core: None }
    }

    /// Creates the engine, or reconfigures an existing one in place.
    pub fn init(&mut self, params: EngineParams) {
        match self.core.as_mut() {
            Some(core) => core.set_params(params),
            None => self.core = Some(MatcherCore::new(params)),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.core.is_some()
    }

    /// Inserts a batch of source records into the index.
    pub fn insert(&mut self, entries: &[S]) -> Result<()> {
        let core = self.core.as_mut().ok_or(LinkError::NotInitialized)?;
        core.build(entries)
    }

    /// Removes a batch of source records; unknown records are a no-op.
    pub fn remove(&mut self, entries: &[S]) {
        if let Some(core) = self.core.as_mut() {
            core.remove(entries);
        }
    }

    /// Searches for the best matches to the query record.
    ///
    /// An uninitialized index, or a query producing no field entries, yields
    /// `(false, [])` rather than an error.
    pub fn search(&mut self, query: &S) -> (bool, Vec<Match<S>>) {
        let Some(core) = self.core.as_mut() else {
            return (false, Vec::new());
        };
        core.sweep(Utc::now());
        core.search(query)
    }

    /// Drops indexed data while keeping the engine configuration.
    pub fn reset(&mut self) {
        if let Some(core) = self.core.as_mut() {
            core.reset();
        }
    }
}
