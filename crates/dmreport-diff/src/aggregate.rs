/*
 * aggregate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Grouping of diff records by their owning model item.
 */

use crate::types::DiffRecord;
use dmreport_tree::{NodeId, Tree};
use hashlink::LinkedHashMap;

/// Diff records keyed by the model item (in the new tree) that owns them.
///
/// Both the keys and each record list keep discovery order. Nothing is
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffMap {
    entries: LinkedHashMap<NodeId, Vec<DiffRecord>>,
}

impl DiffMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` under the nearest describable ancestor-or-self of
    /// its `new_node`, returning that owner.
    pub fn append(&mut self, new_tree: &Tree, record: DiffRecord) -> NodeId {
        let owner = new_tree.model_item(record.new_node);
        if let Some(records) = self.entries.get_mut(&owner) {
            records.push(record);
        } else {
            self.entries.insert(owner, vec![record]);
        }
        owner
    }

    pub fn get(&self, owner: NodeId) -> Option<&[DiffRecord]> {
        self.entries.get(&owner).map(Vec::as_slice)
    }

    /// Owners and their records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[DiffRecord])> {
        self.entries
            .iter()
            .map(|(&owner, records)| (owner, records.as_slice()))
    }

    pub fn records(&self) -> impl Iterator<Item = &DiffRecord> {
        self.entries.values().flatten()
    }

    /// Number of owners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;
    use dmreport_tree::{Node, NodeKind};

    #[test]
    fn test_append_resolves_model_item() {
        let mut tree = Tree::new(Node::new(NodeKind::Document));
        let object = tree.add_child(tree.root(), Node::new(NodeKind::Object));
        let param = tree.add_child(object, Node::new(NodeKind::Parameter));
        let syntax = tree.add_child(param, Node::new(NodeKind::Syntax));

        let mut map = DiffMap::new();
        let owner = map.append(
            &tree,
            DiffRecord::attribute(syntax, syntax, Operation::Changed, "base", "a", Some("b".into())),
        );
        assert_eq!(owner, param);
        let owner = map.append(
            &tree,
            DiffRecord::attribute(object, object, Operation::Added, "access", "readOnly", None),
        );
        assert_eq!(owner, object);
        // the root has no describable ancestor and keys itself
        let owner = map.append(&tree, DiffRecord::element(tree.root(), tree.root(), Operation::Removed, object));
        assert_eq!(owner, tree.root());

        let owners: Vec<NodeId> = map.iter().map(|(owner, _)| owner).collect();
        assert_eq!(owners, vec![param, object, tree.root()]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_repeated_records_are_kept() {
        let tree = Tree::new(Node::new(NodeKind::Object));
        let id = tree.root();
        let record = DiffRecord::attribute(id, id, Operation::Removed, "x", "1", None);

        let mut map = DiffMap::new();
        map.append(&tree, record.clone());
        map.append(&tree, record.clone());
        assert_eq!(map.len(), 1);
        assert_eq!(map.record_count(), 2);
        assert_eq!(map.get(id), Some(&[record.clone(), record][..]));
    }
}
