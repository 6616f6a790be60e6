//! First-fit packing of the canonical trie into a flat transition
//! array.
//!
//! Each packed entry is a `u32` holding the transition character in the
//! low 16 bits and the destination state in the high 16 bits; an
//! all-zero word is an empty slot. Every state receives a distinct base
//! offset, so a probed slot can only contain the probed character if it
//! was written for that state, which is what makes the query-time
//! character check sufficient.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::alphabet::Alphabet;
use crate::automaton::Automaton;
use crate::trie::{InsertionTrie, NO_NODE};
use crate::Error;

/// Highest state count addressable by the 16-bit state field.
pub const MAX_STATES: usize = 1 << 16;

/// Pack the compressed trie rooted at `root` into an [`Automaton`].
pub(crate) fn pack(
    trie: &InsertionTrie,
    root: u32,
    alphabet: &Alphabet,
) -> Result<Automaton, Error> {
    // State enumeration: 0 is the root, the rest in the order their
    // owning transition is first discovered.
    let mut state_of: HashMap<u32, u16> = HashMap::new();
    let mut node_of: Vec<u32> = vec![root];
    state_of.insert(root, 0);
    let mut cursor = 0;
    while cursor < node_of.len() {
        let node = node_of[cursor];
        cursor += 1;
        let mut child = trie.node(node).first_child;
        while child != NO_NODE {
            if !state_of.contains_key(&child) {
                if node_of.len() >= MAX_STATES {
                    return Err(Error::StateOverflow {
                        states: count_states(trie, root),
                        max: MAX_STATES,
                    });
                }
                state_of.insert(child, node_of.len() as u16);
                node_of.push(child);
            }
            child = trie.node(child).next_sibling;
        }
    }
    let state_count = node_of.len();

    // Transition lists per state, in sibling-chain order.
    let transitions: Vec<Vec<(u16, u16)>> = node_of
        .iter()
        .map(|&node| {
            let mut out = Vec::new();
            let mut child = trie.node(node).first_child;
            while child != NO_NODE {
                out.push((trie.node(child).ch, state_of[&child]));
                child = trie.node(child).next_sibling;
            }
            out
        })
        .collect();

    // Hardest states first: most transitions while the array is empty.
    let mut packing_order: Vec<usize> = (0..state_count).collect();
    packing_order.sort_by_key(|&q| Reverse(transitions[q].len()));

    let mut data: Vec<u32> = Vec::new();
    let mut occupied: Vec<bool> = Vec::new();
    let mut used_bases: HashSet<u32> = HashSet::new();
    let mut bases = vec![0u32; state_count];
    // Smallest base not yet handed out; every offset below it is used.
    let mut search_start = 0u32;

    for &q in &packing_order {
        let trans = &transitions[q];
        let base = if trans.is_empty() {
            search_start
        } else {
            let mut candidate = search_start;
            'search: loop {
                if !used_bases.contains(&candidate) {
                    for &(ch, _) in trans {
                        let k = alphabet.char_map[ch as usize] as usize;
                        let slot = candidate as usize + k;
                        if slot < occupied.len() && occupied[slot] {
                            candidate += 1;
                            continue 'search;
                        }
                    }
                    break candidate;
                }
                candidate += 1;
            }
        };

        bases[q] = base;
        used_bases.insert(base);
        while used_bases.contains(&search_start) {
            search_start += 1;
        }

        for &(ch, dest) in trans {
            let k = alphabet.char_map[ch as usize] as usize;
            let slot = base as usize + k;
            if slot >= data.len() {
                let grown = (data.len() * 2).max(slot + 1).max(256);
                data.resize(grown, 0);
                occupied.resize(grown, false);
            }
            data[slot] = (u32::from(dest) << 16) | u32::from(ch);
            occupied[slot] = true;
        }
    }

    // Trim to the last occupied slot.
    let trimmed = occupied.iter().rposition(|&o| o).map_or(0, |last| last + 1);
    data.truncate(trimmed);

    let priorities: Vec<Option<Box<[u8]>>> = node_of
        .iter()
        .map(|&node| {
            trie.node(node)
                .priorities
                .clone()
                .map(Vec::into_boxed_slice)
        })
        .collect();

    log::debug!(
        "packed {state_count} states over a {}-character alphabet into {} slots ({} occupied)",
        alphabet.len,
        data.len(),
        occupied.iter().filter(|&&o| o).count()
    );

    Ok(Automaton::new(
        data,
        bases,
        alphabet.char_map.clone(),
        alphabet.len as u32,
        priorities,
    ))
}

/// Full canonical-node count, for the overflow diagnostic.
fn count_states(trie: &InsertionTrie, root: u32) -> usize {
    crate::compress::canonical_count(trie, root)
}
