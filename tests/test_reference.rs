//! Equivalence with a naive reference implementation.
//!
//! The reference keeps patterns verbatim in a map and matches them by
//! brute force against every substring of the extended word. The packed
//! automaton must agree with it on every pattern set and every word.

use std::collections::HashMap;

use proptest::prelude::*;

use liang::{CaseFolding, Hyphenator};

/// Brute-force scanner over a map of (chars -> merged priorities).
struct NaiveHyphenator {
    patterns: HashMap<Vec<u16>, Vec<u8>>,
}

impl NaiveHyphenator {
    fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map: HashMap<Vec<u16>, Vec<u8>> = HashMap::new();
        for pattern in patterns {
            let mut chars = Vec::new();
            let mut priorities = Vec::new();
            let mut pending = 0u8;
            for c in pattern.chars() {
                if c.is_ascii_digit() {
                    pending = c as u8 - b'0';
                } else {
                    priorities.push(pending);
                    chars.push(c as u16);
                    pending = 0;
                }
            }
            priorities.push(pending);
            if chars.is_empty() {
                continue;
            }
            let merged = map.entry(chars).or_insert_with(|| vec![0; priorities.len()]);
            for (dst, &src) in merged.iter_mut().zip(&priorities) {
                *dst = (*dst).max(src);
            }
        }
        Self { patterns: map }
    }

    fn hyphenate(&self, word: &str) -> Vec<u8> {
        let mut extended = vec![b'.' as u16];
        extended.extend(word.encode_utf16());
        extended.push(b'.' as u16);

        let word_units = extended.len() - 2;
        if word_units < 2 {
            return Vec::new();
        }
        let mut levels = vec![0u8; word_units - 1];

        for start in 0..extended.len() - 1 {
            for (chars, priorities) in &self.patterns {
                if extended[start..].starts_with(chars) {
                    for (i, &priority) in priorities.iter().enumerate() {
                        let Some(slot) = (start + i).checked_sub(2) else {
                            continue;
                        };
                        if slot < levels.len() && priority > levels[slot] {
                            levels[slot] = priority;
                        }
                    }
                }
            }
        }
        levels
    }
}

fn packed<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Hyphenator {
    Hyphenator::builder()
        .patterns(patterns)
        .unwrap()
        // Fold nothing so the comparison sees raw code units.
        .case_folding(CaseFolding::Verbatim)
        .build()
        .unwrap()
}

fn assert_equivalent(patterns: &[&str], words: &[&str]) {
    let naive = NaiveHyphenator::new(patterns.iter().copied());
    let hyphenator = packed(patterns.iter().copied());
    for word in words {
        assert_eq!(
            hyphenator.hyphenate(word),
            naive.hyphenate(word),
            "divergence on {word:?} under {patterns:?}"
        );
    }
}

#[test]
fn agrees_on_the_classic_set() {
    assert_equivalent(
        &["hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n"],
        &["hyphenation", "hen", "nat", "h", "", "nanana"],
    );
}

#[test]
fn agrees_on_anchored_patterns() {
    assert_equivalent(
        &[".a1b", "ab.1", "1.ab", ".hy3p", "4x."],
        &["ab", "abc", "xab", "abx", "hyphen", "x"],
    );
}

#[test]
fn agrees_on_overlapping_and_duplicate_patterns() {
    assert_equivalent(
        &["a1b", "3a2b", "ab", "a1b1c", "b1c"],
        &["abc", "ababc", "aabbcc", "abcabc"],
    );
}

#[test]
fn agrees_on_repetitive_words() {
    assert_equivalent(
        &["1a", "a2a", "aa1a"],
        &["aaaa", "aaaaaaaaaa", "aa", "a"],
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The packed automaton and the naive reference agree on random
    /// pattern sets and random words.
    #[test]
    fn prop_packed_equals_naive(
        patterns in prop::collection::vec("[a-e0-4.]{1,7}", 0..24),
        words in prop::collection::vec("[a-f]{0,12}", 1..8),
    ) {
        let refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let naive = NaiveHyphenator::new(refs.iter().copied());
        let hyphenator = packed(refs.iter().copied());
        for word in &words {
            prop_assert_eq!(hyphenator.hyphenate(word), naive.hyphenate(word));
        }
    }

    /// Inserting a pattern set guarantees the walked vector dominates
    /// each inserted pattern's own priorities.
    #[test]
    fn prop_inserted_patterns_dominate(
        patterns in prop::collection::vec("[a-e1-4]{1,6}", 1..12),
    ) {
        let refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let hyphenator = packed(refs.iter().copied());
        let naive = NaiveHyphenator::new(refs.iter().copied());

        for (chars, priorities) in &naive.patterns {
            // Walk the automaton along the pattern characters.
            let mut state = 0u16;
            let mut walked = None;
            for &unit in chars {
                state = hyphenator
                    .automaton()
                    .try_transition(state, unit)
                    .expect("inserted pattern path must exist");
                walked = hyphenator.automaton().priority_vector(state);
            }
            let walked = walked.expect("terminal state must carry a vector");
            prop_assert_eq!(walked.len(), priorities.len());
            for (have, want) in walked.iter().zip(priorities) {
                prop_assert!(have >= want);
            }
        }
    }
}
