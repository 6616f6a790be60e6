//! Suffix compression of the insertion trie.
//!
//! Structurally identical subtries are merged bottom-up until every
//! distinct subtrie has exactly one representative, turning the tree
//! into a DAG. Canonical identity is decided by a hash-consing table
//! keyed on (character, priority vector, canonical first child,
//! canonical next sibling); child and sibling links are compared by
//! index because descendants are canonicalized first.

use std::collections::{HashMap, HashSet};

use crate::trie::{InsertionTrie, NO_NODE};

#[derive(Hash, PartialEq, Eq)]
struct NodeKey {
    ch: u16,
    priorities: Option<Vec<u8>>,
    first_child: u32,
    next_sibling: u32,
}

/// Compress the trie in place and return the canonical root.
///
/// Idempotent: compressing an already-compressed trie maps every
/// reachable node to itself.
pub(crate) fn compress(trie: &mut InsertionTrie) -> u32 {
    let mut canon: HashMap<NodeKey, u32> = HashMap::new();
    let mut memo: HashMap<u32, u32> = HashMap::new();
    let root = trie.root();
    compress_node(trie, root, &mut canon, &mut memo)
}

fn compress_node(
    trie: &mut InsertionTrie,
    id: u32,
    canon: &mut HashMap<NodeKey, u32>,
    memo: &mut HashMap<u32, u32>,
) -> u32 {
    if id == NO_NODE {
        return NO_NODE;
    }
    if let Some(&canonical) = memo.get(&id) {
        return canonical;
    }

    let first_child = trie.node(id).first_child;
    let next_sibling = trie.node(id).next_sibling;
    let first_child = compress_node(trie, first_child, canon, memo);
    let next_sibling = compress_node(trie, next_sibling, canon, memo);

    let node = trie.node_mut(id);
    node.first_child = first_child;
    node.next_sibling = next_sibling;

    let key = NodeKey {
        ch: node.ch,
        priorities: node.priorities.clone(),
        first_child,
        next_sibling,
    };
    let canonical = *canon.entry(key).or_insert(id);
    memo.insert(id, canonical);
    canonical
}

/// Count the canonical nodes reachable from `root` through child and
/// sibling links.
pub(crate) fn canonical_count(trie: &InsertionTrie, root: u32) -> usize {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if id == NO_NODE || !seen.insert(id) {
            continue;
        }
        stack.push(trie.node(id).first_child);
        stack.push(trie.node(id).next_sibling);
    }
    seen.len()
}
