/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::content::Content;
use crate::kind::NodeKind;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Index of a node within its [`Tree`](crate::Tree).
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A document element.
///
/// Children and parent links are owned by the tree; everything else is
/// plain data. After a tree is built only `content` and `visible` are
/// expected to change.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Attribute values in declaration order.
    pub attributes: LinkedHashMap<String, String>,
    /// Ordered tuple used to establish old/new correspondence.
    pub identity_key: Option<Vec<String>>,
    pub content: Option<Content>,
    pub visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Node {
            kind: kind.into(),
            attributes: LinkedHashMap::new(),
            identity_key: None,
            content: None,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_key<I, S>(mut self, key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identity_key = Some(key.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn has_identity_key(&self) -> bool {
        self.identity_key.is_some()
    }

    pub fn is_describable(&self) -> bool {
        self.kind.is_describable()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Short human-readable name for this node.
    ///
    /// The last identity key component if there is one, otherwise the
    /// first of the `name`, `value`, `ref` or `base` attributes, otherwise
    /// the empty string.
    pub fn label(&self) -> &str {
        if let Some(last) = self.identity_key.as_ref().and_then(|key| key.last()) {
            return last;
        }
        ["name", "value", "ref", "base"]
            .iter()
            .find_map(|name| self.attribute(name))
            .unwrap_or("")
    }
}
