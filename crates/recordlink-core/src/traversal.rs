use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{FieldParams, MatchCandidate, Metric};
use crate::trie::{NodeId, Trie};

/// Traversal cursor for one field.
///
/// The search word and editable-position bitmap are shared immutably across
/// branches; `path` and `visited` are deep-copied by `Clone` whenever the
/// matcher or the frontier forks a branch.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    /// Full search word including the `"<field>:"` stem.
    pub(crate) word: Arc<[char]>,
    /// Character length of the field tag; the stem occupies `..=tag_len`.
    pub(crate) tag_len: usize,
    pub(crate) index: usize,
    pub(crate) node: NodeId,
    pub(crate) path: Vec<char>,
    pub(crate) depth: u32,
    pub(crate) edits: u32,
    /// Pending costs, applied when the node is processed rather than when the
    /// branch is created.
    pub(crate) depth_delta: u32,
    pub(crate) edit_delta: u32,
    pub(crate) max_depth: u32,
    pub(crate) max_edits: u32,
    pub(crate) editable: Arc<[bool]>,
    pub(crate) visited: HashSet<u128>,
    pub(crate) metric: Metric,
    pub(crate) min_similarity: f64,
}

impl Cursor {
    pub(crate) fn at_root(word: &str, tag_len: usize, params: FieldParams) -> Self {
        let word: Arc<[char]> = word.chars().collect();
        let editable: Arc<[bool]> = (0..word.len())
            .map(|i| i > tag_len && params.max_edits > 0)
            .collect();
        Self {
            word,
            tag_len,
            index: 0,
            node: NodeId::ROOT,
            path: Vec::new(),
            depth: 0,
            edits: 0,
            depth_delta: 0,
            edit_delta: 0,
            max_depth: params.max_depth,
            max_edits: params.max_edits,
            editable,
            visited: HashSet::new(),
            metric: params.metric,
            min_similarity: params.min_similarity,
        }
    }

    /// Composite key identifying this exploration state. Two states with the
    /// same `(index, node, edits, depth)` are interchangeable.
    pub(crate) fn visit_key(&self) -> u128 {
        ((self.index as u128) << 96)
            | (u128::from(self.edits) << 64)
            | (u128::from(self.depth) << 32)
            | (self.node.index() as u128)
    }

    /// Applies pending costs, marks the state visited, emits a candidate when
    /// the node terminates a stored key, and reports whether exploration may
    /// continue. Re-entering an already-visited state stops immediately.
    pub(crate) fn process(&mut self, trie: &Trie) -> (Option<MatchCandidate>, bool) {
        self.depth += self.depth_delta;
        self.edits += self.edit_delta;

        if !self.visited.insert(self.visit_key()) {
            return (None, false);
        }

        let node = trie.node(self.node);
        let candidate = node.end_of_string.then(|| MatchCandidate {
            text: self.path.iter().collect(),
            edit_count: self.edits,
            depth: self.depth,
            ids: node.ids.iter().copied().collect(),
        });

        let within_budget = self.edits <= self.max_edits && self.depth <= self.max_depth;
        (candidate, within_budget)
    }

    /// Portion of the consumed path beyond the `"<field>:"` stem.
    pub(crate) fn path_value(&self) -> String {
        self.path.get(self.tag_len + 1..).unwrap_or(&[]).iter().collect()
    }

    /// Portion of the search word beyond the `"<field>:"` stem.
    pub(crate) fn word_value(&self) -> String {
        self.word.get(self.tag_len + 1..).unwrap_or(&[]).iter().collect()
    }

    pub(crate) fn value_len(&self) -> usize {
        self.path.len().saturating_sub(self.tag_len + 1)
    }
}
