use crate::frontier;
use crate::models::MatchCandidate;
use crate::ocr;
use crate::traversal::Cursor;
use crate::trie::Trie;

/// Recursive edit-tolerant walk of the trie for one field.
///
/// Each step processes the current node (applying pending costs and emitting
/// a candidate at end-of-string nodes), then branches: the exact next
/// character, plus, at editable positions, a skip of the query character,
/// a best-first expansion, and OCR confusion substitutions when enabled.
pub(crate) fn run(trie: &Trie, mut cursor: Cursor, correct_ocr: bool) -> Vec<MatchCandidate> {
    // Query exhausted: longer stored keys may still terminate below, e.g. a
    // stored "michael" under a queried "mike".
    if cursor.index >= cursor.word.len() {
        return frontier::expand(trie, cursor);
    }

    let (candidate, keep_going) = cursor.process(trie);
    let mut matches: Vec<MatchCandidate> = candidate.into_iter().collect();
    if !keep_going {
        return matches;
    }

    let ch = cursor.word[cursor.index];

    if let Some(child) = trie.child(cursor.node, ch) {
        let mut branch = cursor.clone();
        branch.index += 1;
        branch.node = child;
        branch.path.push(ch);
        branch.depth_delta = 0;
        branch.edit_delta = 0;
        matches.extend(run(trie, branch, correct_ocr));
    }

    if cursor.editable[cursor.index] {
        // Skip: a character present in the query but absent from the store.
        let mut branch = cursor.clone();
        branch.index += 1;
        branch.depth_delta = 1;
        branch.edit_delta = 1;
        matches.extend(run(trie, branch, correct_ocr));

        // Free exploration from this point; the frontier carries its own
        // cost accounting.
        matches.extend(frontier::expand(trie, cursor.clone()));

        if correct_ocr {
            matches.extend(single_char_corrections(trie, &cursor, ch, correct_ocr));
            matches.extend(multi_char_corrections(trie, &cursor, correct_ocr));
        }
    }

    matches
}

/// One query character misread as one stored character, e.g. a queried `1`
/// walking a stored `i`.
fn single_char_corrections(
    trie: &Trie,
    cursor: &Cursor,
    ch: char,
    correct_ocr: bool,
) -> Vec<MatchCandidate> {
    let mut matches = Vec::new();
    for &substitute in ocr::single_char_alternates(ch) {
        let Some(child) = trie.child(cursor.node, substitute) else {
            continue;
        };
        let mut branch = cursor.clone();
        branch.index += 1;
        branch.node = child;
        branch.path.push(substitute);
        branch.depth_delta = 1;
        branch.edit_delta = 1;
        matches.extend(run(trie, branch, correct_ocr));
    }
    matches
}

/// A short query window misread as a different stored sequence, e.g. a
/// queried `rn` standing for a stored `m` (and vice versa). The whole window
/// counts as a single edit regardless of the replacement length.
fn multi_char_corrections(trie: &Trie, cursor: &Cursor, correct_ocr: bool) -> Vec<MatchCandidate> {
    let mut matches = Vec::new();
    for window_len in ocr::MULTI_CHAR_WINDOW_LENGTHS {
        if cursor.index + window_len > cursor.word.len() {
            continue;
        }
        let window: String = cursor.word[cursor.index..cursor.index + window_len]
            .iter()
            .collect();
        for replacement in ocr::multi_char_alternates(&window) {
            let Some(end) = walk_chain(trie, cursor.node, replacement) else {
                continue;
            };
            let mut branch = cursor.clone();
            branch.index += window_len;
            branch.node = end;
            branch.path.extend(replacement.chars());
            branch.depth_delta = 1;
            branch.edit_delta = 1;
            matches.extend(run(trie, branch, correct_ocr));
        }
    }
    matches
}

fn walk_chain(trie: &Trie, from: crate::trie::NodeId, chain: &str) -> Option<crate::trie::NodeId> {
    let mut node = from;
    for ch in chain.chars() {
        node = trie.child(node, ch)?;
    }
    Some(node)
}
