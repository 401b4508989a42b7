//! Fixed confusion tables for OCR misreads.
//!
//! The single-character table is applied at the query side: a query character
//! is swapped for a table alternate while walking the stored trie. The
//! multi-character table keys are substrings as they appear in the query; the
//! replacement sequences are what the stored trie path is expected to hold.
//! Several entries appear in both directions (`m -> rn`, `rn -> m`), giving
//! symmetric correction.

pub(crate) fn single_char_alternates(ch: char) -> &'static [char] {
    match ch {
        '0' => &['o', 'd', 'q'],
        '1' => &['l', 'i'],
        '2' => &['z', 's'],
        '3' => &['e', '8', 'b'],
        '4' => &['a', 'h'],
        '5' => &['s'],
        '6' => &['b', 'g', 'G'],
        '7' => &['t', 'y'],
        '8' => &['b', '3', 'B'],
        '9' => &['g', 'q'],
        'o' => &['0', 'a'],
        'i' => &['1', 'l'],
        'l' => &['1', 'i'],
        'b' => &['8', '3', '6'],
        'g' => &['6', '9'],
        'z' => &['2'],
        'c' => &['e', 'o'],
        's' => &['5'],
        'n' => &['m', 'r'],
        'a' => &['o'],
        'e' => &['c'],
        'r' => &['n'],
        'v' => &['u'],
        'u' => &['v'],
        _ => &[],
    }
}

/// Window lengths worth probing against [`multi_char_alternates`] keys.
pub(crate) const MULTI_CHAR_WINDOW_LENGTHS: [usize; 2] = [2, 1];

pub(crate) fn multi_char_alternates(window: &str) -> &'static [&'static str] {
    match window {
        "m" => &["rn", "nn"],
        "cl" => &["d"],
        "rn" => &["m"],
        "nn" => &["m"],
        "w" => &["vv"],
        "d" => &["cl"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_zero_maps_to_letter_shapes() {
        assert_eq!(single_char_alternates('0'), &['o', 'd', 'q']);
    }

    #[test]
    fn unlisted_characters_have_no_alternates() {
        assert!(single_char_alternates('x').is_empty());
        assert!(multi_char_alternates("xy").is_empty());
    }

    #[test]
    fn rn_and_m_correct_in_both_directions() {
        assert!(multi_char_alternates("rn").contains(&"m"));
        assert!(multi_char_alternates("m").contains(&"rn"));
        assert!(multi_char_alternates("m").contains(&"nn"));
    }

    #[test]
    fn single_char_table_is_symmetric_for_i_l_1() {
        for (from, to) in [('i', '1'), ('1', 'i'), ('l', '1'), ('i', 'l')] {
            assert!(
                single_char_alternates(from).contains(&to),
                "{from} should list {to}"
            );
        }
    }
}
