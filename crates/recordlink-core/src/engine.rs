use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::error::{LinkError, Result};
use crate::expiry::ExpiryQueue;
use crate::matcher;
use crate::models::{
    EngineParams, Field, FieldParams, Match, MatchCandidate, RecordSource,
};
use crate::normalize::normalize;
use crate::traversal::Cursor;
use crate::trie::{NodeId, Trie};

mod join;

/// The multi-field approximate-search engine.
///
/// Writes (`build`, `remove`, `sweep`, `reset`) take `&mut self`; `search`
/// is a pure read over the shared trie, so the borrow checker enforces the
/// single-writer / many-reader discipline.
pub struct MatcherCore<S: RecordSource> {
    params: EngineParams,
    trie: Trie,
    expiry: ExpiryQueue,
    entries: HashMap<i64, S>,
}

impl<S: RecordSource> MatcherCore<S> {
    #[must_use]
    pub fn new(params: EngineParams) -> Self {
        Self {
            params,
            trie: Trie::new(),
            expiry: ExpiryQueue::default(),
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn params(&self) -> EngineParams {
        self.params
    }

    pub fn set_params(&mut self, params: EngineParams) {
        self.params = params;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, id: i64) -> Option<&S> {
        self.entries.get(&id)
    }

    /// Inserts every field-prefixed key of each source record. Building is
    /// additive; re-inserting an entry is idempotent at the trie's ID sets.
    ///
    /// With expiration enabled, a source whose adapter supplies no expiry
    /// instant aborts the build.
    pub fn build(&mut self, sources: &[S]) -> Result<()> {
        let mut inserted = 0usize;
        for source in sources {
            let Some(entry) = source.record_entry() else {
                continue;
            };
            let expiry = match (self.params.use_expiration, entry.expiry) {
                (true, None) => return Err(LinkError::MissingExpiry { id: entry.id }),
                (true, Some(at)) => Some(at),
                (false, _) => None,
            };
            for (field, value) in &entry.key {
                let key = stored_key(field, &normalize(value));
                let node = self.trie.insert(&key, entry.id);
                if let Some(at) = expiry {
                    self.expiry.push(at, node, entry.id);
                }
            }
            self.entries.insert(entry.id, source.clone());
            inserted += 1;
        }
        debug!(target: "recordlink::engine", inserted, total = self.entries.len(), "Build finished");
        Ok(())
    }

    /// Removes each source's field keys from the trie, back-pruning paths
    /// that no longer serve any stored entry. Sources whose adapter reports
    /// no entry are skipped, mirroring insertion.
    pub fn remove(&mut self, sources: &[S]) {
        for source in sources {
            let Some(entry) = source.record_entry() else {
                continue;
            };
            for (field, value) in &entry.key {
                let key = stored_key(field, &normalize(value));
                self.remove_key(&key, entry.id);
            }
            self.entries.remove(&entry.id);
        }
    }

    // Walks the key, stripping the ID at every end-of-string node on the way.
    // Pruning an interior node is refused while the chain below it survives.
    fn remove_key(&mut self, key: &str, id: i64) {
        let mut node = NodeId::ROOT;
        for ch in key.chars() {
            let Some(next) = self.trie.child(node, ch) else {
                return;
            };
            node = next;
            if self.trie.node(node).end_of_string {
                self.trie.remove_id(node, id);
            }
        }
    }

    /// Pops every entry whose expiry instant lies before `now`, detaching its
    /// ID from the terminal node and back-pruning. No-op unless expiration is
    /// enabled.
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        if !self.params.use_expiration {
            return;
        }
        let mut swept = 0usize;
        while let Some(expired) = self.expiry.pop_expired(now) {
            self.trie.remove_id(expired.node, expired.id);
            self.entries.remove(&expired.id);
            swept += 1;
        }
        if swept > 0 {
            debug!(target: "recordlink::engine", swept, "Expiry sweep removed entries");
        }
    }

    /// Runs one traversal per query field in parallel, joins the per-field
    /// candidates into whole-record matches, and ranks them by the weighted
    /// similarity score. Returns at most five matches, best first.
    pub fn search(&self, query: &S) -> (bool, Vec<Match<S>>) {
        let Some(query_entry) = query.record_entry() else {
            return (false, Vec::new());
        };
        if query_entry.key.is_empty() {
            return (false, Vec::new());
        }
        let params = query.search_params();

        debug!(
            target: "recordlink::engine",
            fields = query_entry.key.len(),
            "Fanning out field traversals"
        );

        let (tx, rx) = mpsc::channel();
        rayon::scope(|scope| {
            for (field, value) in &query_entry.key {
                let tx = tx.clone();
                let field_params = params.field(field);
                scope.spawn(move |_| {
                    let candidates = self.search_field(field, value, field_params);
                    let _ = tx.send((field.clone(), candidates));
                });
            }
        });
        drop(tx);

        // Collected into an ordered map before merging, so field completion
        // order never affects the final ranking.
        let mut by_field: BTreeMap<Field, Vec<MatchCandidate>> = BTreeMap::new();
        for (field, candidates) in rx {
            by_field.insert(field, candidates);
        }

        join::rank(self, &query_entry, &params, by_field)
    }

    fn search_field(
        &self,
        field: &Field,
        value: &str,
        field_params: FieldParams,
    ) -> Vec<MatchCandidate> {
        let word = stored_key(field, &normalize(value));
        let tag_len = field.as_str().chars().count();
        let cursor = Cursor::at_root(&word, tag_len, field_params);
        let candidates = matcher::run(&self.trie, cursor, self.params.correct_ocr_misreads);
        trace!(
            target: "recordlink::engine",
            field = %field,
            candidates = candidates.len(),
            "Field traversal finished"
        );
        candidates
    }

    /// Drops the trie, the stored entries, and any pending expirations while
    /// keeping the engine parameters.
    pub fn reset(&mut self) {
        self.trie = Trie::new();
        self.entries.clear();
        self.expiry.clear();
    }
}

fn stored_key(field: &Field, normalized_value: &str) -> String {
    format!("{field}:{normalized_value}")
}
