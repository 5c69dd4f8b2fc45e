/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Arena-backed document tree.
 */

use crate::node::{Node, NodeId};

/// A document tree.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]. The
/// root is always the first node. Parent links are non-owning back
/// references maintained by [`Tree::add_child`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree containing just `root`.
    pub fn new(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Tree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Any children or parent link already present on `node` are discarded.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Iterate over the ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All nodes of the subtree rooted at `id` in pre-order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// The nearest describable ancestor-or-self of `id`, or `id` itself
    /// when there is none.
    pub fn model_item(&self, id: NodeId) -> NodeId {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.node(candidate).is_describable())
            .unwrap_or(id)
    }

    /// Slash-separated path of labels from the root to `id`, for messages.
    ///
    /// Nodes without a label contribute their kind name.
    pub fn nice_path(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| n != self.root())
            .map(|n| {
                let node = self.node(n);
                match node.label() {
                    "" => node.kind.as_str(),
                    label => label,
                }
            })
            .collect();
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    /// Mark every node as hidden.
    pub fn hide_all(&mut self) {
        for node in &mut self.nodes {
            node.visible = false;
        }
    }

    /// Make `id` and all of its ancestors visible.
    pub fn reveal_upwards(&mut self, id: NodeId) {
        let path: Vec<NodeId> = std::iter::once(id).chain(self.ancestors(id)).collect();
        for n in path {
            self.nodes[n.0].visible = true;
        }
    }

    /// Make `id` and all of its descendants visible.
    pub fn reveal_subtree(&mut self, id: NodeId) {
        for n in self.descendants(id) {
            self.nodes[n.0].visible = true;
        }
    }

    /// Iterate over all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}

/// Iterator returned by [`Tree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
