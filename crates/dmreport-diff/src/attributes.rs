/*
 * attributes.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Attribute differ.
 */

use crate::config::DiffConfig;
use crate::types::Operation;
use dmreport_tree::Node;

/// One attribute difference between a matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub operation: Operation,
    pub name: String,
    /// The old value, except for `Added` where it is the new value.
    pub value: String,
    /// The new value, for `Changed` only.
    pub value2: Option<String>,
}

/// Set difference over the attributes of a matched pair.
///
/// Changes come first, then removals, both in the old node's declaration
/// order, then additions in the new node's declaration order. Ignored
/// attribute names never appear.
pub fn diff_attributes(old: &Node, new: &Node, config: &DiffConfig) -> Vec<AttributeChange> {
    let mut changed = Vec::new();
    let mut removed = Vec::new();

    for (name, old_value) in old.attributes.iter() {
        if config.is_ignored_attribute(name) {
            continue;
        }
        match new.attributes.get(name) {
            Some(new_value) if new_value != old_value => changed.push(AttributeChange {
                operation: Operation::Changed,
                name: name.clone(),
                value: old_value.clone(),
                value2: Some(new_value.clone()),
            }),
            Some(_) => {}
            None => removed.push(AttributeChange {
                operation: Operation::Removed,
                name: name.clone(),
                value: old_value.clone(),
                value2: None,
            }),
        }
    }

    let added = new
        .attributes
        .iter()
        .filter(|(name, _)| !config.is_ignored_attribute(name) && !old.attributes.contains_key(*name))
        .map(|(name, value)| AttributeChange {
            operation: Operation::Added,
            name: name.clone(),
            value: value.clone(),
            value2: None,
        });

    changed.extend(removed);
    changed.extend(added);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmreport_tree::NodeKind;
    use pretty_assertions::assert_eq;

    fn summary(changes: &[AttributeChange]) -> Vec<(Operation, &str)> {
        changes.iter().map(|c| (c.operation, c.name.as_str())).collect()
    }

    #[test]
    fn test_status_change() {
        let old = Node::new(NodeKind::Parameter).with_attribute("status", "current");
        let new = Node::new(NodeKind::Parameter).with_attribute("status", "deprecated");
        assert_eq!(
            diff_attributes(&old, &new, &DiffConfig::default()),
            vec![AttributeChange {
                operation: Operation::Changed,
                name: "status".into(),
                value: "current".into(),
                value2: Some("deprecated".into()),
            }]
        );
    }

    #[test]
    fn test_emission_order() {
        let old = Node::new(NodeKind::Parameter)
            .with_attribute("gone2", "x")
            .with_attribute("access", "readOnly")
            .with_attribute("gone1", "y")
            .with_attribute("status", "current");
        let new = Node::new(NodeKind::Parameter)
            .with_attribute("new2", "a")
            .with_attribute("status", "obsoleted")
            .with_attribute("access", "readWrite")
            .with_attribute("new1", "b");
        assert_eq!(
            summary(&diff_attributes(&old, &new, &DiffConfig::default())),
            vec![
                (Operation::Changed, "access"),
                (Operation::Changed, "status"),
                (Operation::Removed, "gone2"),
                (Operation::Removed, "gone1"),
                (Operation::Added, "new2"),
                (Operation::Added, "new1"),
            ]
        );
    }

    #[test]
    fn test_ignored_attributes_are_skipped() {
        let old = Node::new(NodeKind::Object)
            .with_attribute("version", "2.15")
            .with_attribute("dmr_version", "2.15");
        let new = Node::new(NodeKind::Object)
            .with_attribute("version", "2.16")
            .with_attribute("activeNotify", "canDeny");
        assert!(diff_attributes(&old, &new, &DiffConfig::default()).is_empty());
    }

    #[test]
    fn test_identical_attributes() {
        let node = Node::new(NodeKind::Object).with_attribute("name", "Device.");
        assert!(diff_attributes(&node, &node.clone(), &DiffConfig::default()).is_empty());
    }
}
