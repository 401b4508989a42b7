use std::collections::BinaryHeap;

use crate::metrics;
use crate::models::MatchCandidate;
use crate::traversal::Cursor;
use crate::trie::Trie;

const PREDICTED_CHAR_WEIGHT: f64 = 0.4;
const DISTANCE_WEIGHT: f64 = 0.6;

/// Partial paths shorter than this always stay in the frontier; longer ones
/// must clear the field's similarity floor to keep expanding.
const PRUNE_MIN_VALUE_LEN: usize = 4;

struct ScoredCursor {
    score: f64,
    cursor: Cursor,
}

impl PartialEq for ScoredCursor {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score).is_eq()
    }
}

impl Eq for ScoredCursor {}

impl PartialOrd for ScoredCursor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredCursor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score.total_cmp(&other.score)
    }
}

/// Best-first expansion of the trie subtree below the cursor.
///
/// Invoked when the query word is exhausted but longer stored keys may still
/// terminate below, and from editable positions to model arbitrary
/// insertions/substitutions. The entry state's visit key is dropped before
/// the loop and restored afterwards so the frontier may re-process the same
/// node under its own cost accounting.
pub(crate) fn expand(trie: &Trie, mut entry: Cursor) -> Vec<MatchCandidate> {
    let entry_key = entry.visit_key();
    entry.visited.remove(&entry_key);

    let mut heap = BinaryHeap::new();
    heap.push(ScoredCursor {
        score: 0.0,
        cursor: entry.clone(),
    });

    let mut matches = Vec::new();
    while let Some(ScoredCursor { cursor: mut current, .. }) = heap.pop() {
        let (candidate, keep_going) = current.process(trie);
        matches.extend(candidate);
        if !keep_going {
            continue;
        }

        for (ch, child) in trie.children(current.node) {
            let mut branch = current.clone();
            branch.path.push(ch);
            branch.node = child;
            branch.index += 1;
            branch.depth_delta = 0;
            branch.edit_delta = 0;
            if branch
                .word
                .get(branch.index - 1)
                .is_some_and(|&expected| ch != expected)
            {
                branch.edit_delta = 1;
                branch.depth_delta = 1;
            }

            let score = score(trie, &branch);
            if branch.value_len() >= PRUNE_MIN_VALUE_LEN && score < branch.min_similarity {
                continue;
            }
            heap.push(ScoredCursor { score, cursor: branch });
        }
    }

    entry.visited.insert(entry_key);
    matches
}

/// Composite priority: how expected the appended character is under the trie's
/// insertion counts, blended with similarity between the partial path value
/// and the query value. No similarity floor is applied here.
fn score(trie: &Trie, cursor: &Cursor) -> f64 {
    let node = trie.node(cursor.node);
    let predicted_char = node.parent.map_or(0.0, |parent| {
        let parent_count = trie.node(parent).count;
        if parent_count == 0 {
            0.0
        } else {
            f64::from(node.count) / f64::from(parent_count)
        }
    });

    let distance = metrics::similarity(&cursor.path_value(), &cursor.word_value(), cursor.metric);
    PREDICTED_CHAR_WEIGHT.mul_add(predicted_char, DISTANCE_WEIGHT * distance)
}
