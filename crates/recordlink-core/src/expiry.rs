use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};

use crate::trie::NodeId;

/// One inserted field key awaiting expiry, linked to its terminal trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExpiryEntry {
    pub(crate) expiry: DateTime<Utc>,
    pub(crate) node: NodeId,
    pub(crate) id: i64,
}

impl Ord for ExpiryEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.expiry
            .cmp(&other.expiry)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for ExpiryEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending expirations, earliest instant first.
///
/// This is deliberately a separate structure from the best-first frontier
/// heap; the two orderings never share entries.
#[derive(Debug, Default)]
pub(crate) struct ExpiryQueue {
    heap: BinaryHeap<Reverse<ExpiryEntry>>,
}

impl ExpiryQueue {
    pub(crate) fn push(&mut self, expiry: DateTime<Utc>, node: NodeId, id: i64) {
        self.heap.push(Reverse(ExpiryEntry { expiry, node, id }));
    }

    /// Pops the earliest entry iff it expired strictly before `now`.
    pub(crate) fn pop_expired(&mut self, now: DateTime<Utc>) -> Option<ExpiryEntry> {
        if self.heap.peek().is_some_and(|Reverse(e)| e.expiry < now) {
            return self.heap.pop().map(|Reverse(e)| e);
        }
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}
