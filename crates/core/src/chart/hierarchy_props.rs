//! Property-based tests for the account hierarchy rules.

use proptest::prelude::*;
use ledgerline_shared::types::AccountId;

use super::code::generate_account_code;
use super::error::ChartError;
use super::hierarchy::{ChartGraph, validate_create, validate_update, would_create_cycle};
use super::types::{AccountNode, AccountType};

/// Strategy to generate an account type.
fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Income),
        Just(AccountType::Expense),
    ]
}

/// Builds a chain of `len` accounts where each one's parent is the previous.
fn chain(len: usize) -> Vec<AccountNode> {
    let mut nodes: Vec<AccountNode> = Vec::with_capacity(len);
    for i in 0..len {
        let parent_id = if i == 0 { None } else { Some(nodes[i - 1].id) };
        nodes.push(AccountNode {
            id: AccountId::new(),
            account_type: AccountType::Asset,
            parent_id,
        });
    }
    nodes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Linking any account under one of its descendants is a cycle.
    #[test]
    fn prop_descendant_as_parent_is_cycle(len in 2usize..12, pick in 0usize..100) {
        let nodes = chain(len);
        let graph = ChartGraph::from_nodes(nodes.clone());
        let ancestor = pick % (len - 1);
        let descendant = ancestor + 1 + pick % (len - ancestor - 1);

        prop_assert!(would_create_cycle(&graph, nodes[ancestor].id, nodes[descendant].id));
        prop_assert!(!would_create_cycle(&graph, nodes[descendant].id, nodes[ancestor].id));
    }

    /// Sub-accounts can only be created under root accounts of the same type.
    #[test]
    fn prop_create_parent_rules(
        parent_type in account_type_strategy(),
        child_type in account_type_strategy(),
        parent_is_root in any::<bool>(),
    ) {
        let root = AccountNode { id: AccountId::new(), account_type: parent_type, parent_id: None };
        let parent = AccountNode {
            id: AccountId::new(),
            account_type: parent_type,
            parent_id: if parent_is_root { None } else { Some(root.id) },
        };
        let graph = ChartGraph::from_nodes([root, parent]);

        let result = validate_create(&graph, child_type, Some(parent.id));
        if parent_type == child_type && parent_is_root {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid_parent = matches!(result, Err(ChartError::InvalidParent { .. }));
            prop_assert!(is_invalid_parent, "expected InvalidParent, got {:?}", result);
        }
    }

    /// Re-parenting an ancestor under its descendant is always refused.
    #[test]
    fn prop_update_refuses_descendant_parent(len in 2usize..6) {
        let nodes = chain(len);
        let graph = ChartGraph::from_nodes(nodes.clone());
        let result = validate_update(&graph, nodes[0].id, AccountType::Asset, Some(nodes[len - 1].id));
        let is_cycle = matches!(result, Err(ChartError::CircularRelationship { .. }));
        prop_assert!(is_cycle, "expected CircularRelationship, got {:?}", result);
    }

    /// Generated codes are four digits, in the type's block, and unused.
    #[test]
    fn prop_generated_code_is_fresh(
        account_type in account_type_strategy(),
        suffixes in prop::collection::vec(1u32..999, 0..20),
    ) {
        let prefix = account_type.code_prefix();
        let existing: Vec<String> = suffixes.iter().map(|s| format!("{prefix}{s:03}")).collect();
        let code = generate_account_code(account_type, existing.iter().map(String::as_str)).unwrap();

        prop_assert_eq!(code.len(), 4);
        prop_assert!(code.starts_with(&prefix.to_string()));
        prop_assert!(!existing.contains(&code));
    }
}
