//! Property-based tests for the round-trip and clone laws.
//!
//! Generates bounded node trees with mixed block/flow styling and checks:
//! - parse(dump(n)) is structurally equal to n
//! - dump is stable after one round trip
//! - deep_clone is structurally equal and shares nothing

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;
use yamlet::{dump, load_str, Node, NodeStyle};

/// Plain-safe scalar content: no indicators, no `: `, no comments.
const SCALAR: &str = "[a-z][a-z0-9_]{0,8}";

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        1 => Just(Node::null()),
        4 => SCALAR.prop_map(Node::scalar),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            (prop::collection::vec(inner.clone(), 0..6), any::<bool>()).prop_map(
                |(items, flow)| {
                    let node = Node::seq();
                    for item in items {
                        node.push(item);
                    }
                    if flow {
                        node.set_style(NodeStyle::Flow);
                    }
                    node
                }
            ),
            (
                prop::collection::btree_map(SCALAR, inner, 0..6),
                any::<bool>()
            )
                .prop_map(|(pairs, flow)| {
                    let node = Node::map();
                    for (key, value) in pairs {
                        node.insert(Node::scalar(key), value);
                    }
                    if flow {
                        node.set_style(NodeStyle::Flow);
                    }
                    node
                }),
        ]
    })
}

fn hash_of(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn roundtrip_preserves_structure(node in node_strategy()) {
        let text = dump(&node);
        let reparsed = load_str(&text)
            .unwrap_or_else(|e| panic!("reparse failed: {}\n--- dumped:\n{}", e, text));
        prop_assert_eq!(&reparsed, &node);
    }

    #[test]
    fn dump_is_stable_after_roundtrip(node in node_strategy()) {
        let first = dump(&node);
        let reparsed = load_str(&first).unwrap();
        let second = dump(&reparsed);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn deep_clone_is_equal_and_disjoint(node in node_strategy()) {
        let clone = node.deep_clone();
        prop_assert_eq!(&clone, &node);
        prop_assert!(!clone.shares_data(&node));
        prop_assert_eq!(hash_of(&clone), hash_of(&node));
    }

    #[test]
    fn equal_nodes_hash_equal(node in node_strategy()) {
        // Rebuilding through a round trip must keep the structural hash.
        let reparsed = load_str(&dump(&node)).unwrap();
        prop_assert_eq!(hash_of(&reparsed), hash_of(&node));
    }
}
