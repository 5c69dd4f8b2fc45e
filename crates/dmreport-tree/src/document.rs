/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Nested JSON interchange form of a tree.
 */

use crate::content::Content;
use crate::error::TreeResult;
use crate::kind::NodeKind;
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

fn default_visible() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// A node and its subtree as written by the document parser.
///
/// Content is carried as directive text and tokenized when the tree is
/// built. Spliced change annotations are written back in their rendered
/// directive form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "LinkedHashMap::is_empty")]
    pub attributes: LinkedHashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        DocumentNode {
            kind: kind.into(),
            attributes: LinkedHashMap::new(),
            key: None,
            content: None,
            footer: None,
            visible: true,
            children: Vec::new(),
        }
    }

    fn to_node(&self) -> TreeResult<Node> {
        let mut node = Node::new(self.kind.clone());
        node.attributes = self.attributes.clone();
        node.identity_key = self.key.clone();
        node.visible = self.visible;
        if self.content.is_some() || self.footer.is_some() {
            let mut content = match &self.content {
                Some(text) => Content::parse(text)?,
                None => Content::default(),
            };
            if let Some(footer) = &self.footer {
                content.set_footer(footer.clone());
            }
            node.content = Some(content);
        }
        Ok(node)
    }
}

impl Tree {
    /// Build a tree from its nested interchange form.
    pub fn from_document(root: &DocumentNode) -> TreeResult<Tree> {
        let mut tree = Tree::new(root.to_node()?);
        let mut pending: Vec<(NodeId, &DocumentNode)> = vec![(tree.root(), root)];
        while let Some((parent, doc)) = pending.pop() {
            for child in &doc.children {
                let id = tree.add_child(parent, child.to_node()?);
                pending.push((id, child));
            }
        }
        Ok(tree)
    }

    /// Write the subtree rooted at `id` in its nested interchange form.
    pub fn to_document(&self, id: NodeId) -> DocumentNode {
        let node = self.node(id);
        DocumentNode {
            kind: node.kind.clone(),
            attributes: node.attributes.clone(),
            key: node.identity_key.clone(),
            content: node.content.as_ref().map(Content::render_body),
            footer: node
                .content
                .as_ref()
                .and_then(|c| c.footer().map(str::to_string)),
            visible: node.visible,
            children: self
                .children(id)
                .iter()
                .map(|&child| self.to_document(child))
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> TreeResult<Tree> {
        let root: DocumentNode = serde_json::from_str(json)?;
        Tree::from_document(&root)
    }

    pub fn to_json_string(&self) -> TreeResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document(self.root()))?)
    }
}
