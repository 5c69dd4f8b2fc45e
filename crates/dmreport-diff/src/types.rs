/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Diff record types.
 */

use dmreport_tree::NodeId;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// What a diff record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Attribute,
    Element,
    Content,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Attribute => "attribute",
            Entity::Element => "element",
            Entity::Content => "content",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Added,
    Removed,
    Changed,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Added => "added",
            Operation::Removed => "removed",
            Operation::Changed => "changed",
        }
    }

    /// Capitalised verb used at the start of change phrases.
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Added => "Added",
            Operation::Removed => "Removed",
            Operation::Changed => "Changed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a sequence alignment instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

impl OpTag {
    pub fn as_str(self) -> &'static str {
        match self {
            OpTag::Equal => "equal",
            OpTag::Replace => "replace",
            OpTag::Delete => "delete",
            OpTag::Insert => "insert",
        }
    }
}

/// One alignment instruction over token offsets of the old and new body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl Opcode {
    pub fn new(tag: OpTag, old: Range<usize>, new: Range<usize>) -> Self {
        Opcode { tag, old, new }
    }

    /// Tag implied by which sides are empty.
    pub(crate) fn edit_tag(old: &Range<usize>, new: &Range<usize>) -> OpTag {
        match (old.is_empty(), new.is_empty()) {
            (true, true) => OpTag::Equal,
            (true, false) => OpTag::Insert,
            (false, true) => OpTag::Delete,
            (false, false) => OpTag::Replace,
        }
    }
}

/// Entity-specific payload of a [`DiffRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum DiffDetail {
    Attribute {
        name: String,
        value: String,
        /// The new value, for `Changed` only.
        #[serde(skip_serializing_if = "Option::is_none")]
        value2: Option<String>,
    },
    /// `elem` is an old-tree node for `Removed` and a new-tree node for
    /// `Added`.
    Element { elem: NodeId },
    Content { opcode: Opcode },
}

/// One discovered difference.
///
/// `old_node` and `new_node` are the matched pair that was being compared.
/// For element records this is the parent pair, so ownership is resolved
/// from the new parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub old_node: NodeId,
    pub new_node: NodeId,
    pub operation: Operation,
    #[serde(flatten)]
    pub detail: DiffDetail,
    pub is_whitespace: bool,
}

impl DiffRecord {
    pub fn attribute(
        old_node: NodeId,
        new_node: NodeId,
        operation: Operation,
        name: impl Into<String>,
        value: impl Into<String>,
        value2: Option<String>,
    ) -> Self {
        DiffRecord {
            old_node,
            new_node,
            operation,
            detail: DiffDetail::Attribute {
                name: name.into(),
                value: value.into(),
                value2,
            },
            is_whitespace: false,
        }
    }

    pub fn element(old_node: NodeId, new_node: NodeId, operation: Operation, elem: NodeId) -> Self {
        DiffRecord {
            old_node,
            new_node,
            operation,
            detail: DiffDetail::Element { elem },
            is_whitespace: false,
        }
    }

    pub fn content(old_node: NodeId, new_node: NodeId, opcode: Opcode, is_whitespace: bool) -> Self {
        DiffRecord {
            old_node,
            new_node,
            operation: Operation::Changed,
            detail: DiffDetail::Content { opcode },
            is_whitespace,
        }
    }

    pub fn entity(&self) -> Entity {
        match self.detail {
            DiffDetail::Attribute { .. } => Entity::Attribute,
            DiffDetail::Element { .. } => Entity::Element,
            DiffDetail::Content { .. } => Entity::Content,
        }
    }

    /// The attribute name, or the opcode kind for content records.
    pub fn name(&self) -> Option<&str> {
        match &self.detail {
            DiffDetail::Attribute { name, .. } => Some(name),
            DiffDetail::Element { .. } => None,
            DiffDetail::Content { opcode } => Some(opcode.tag.as_str()),
        }
    }

    pub fn opcode(&self) -> Option<&Opcode> {
        match &self.detail {
            DiffDetail::Content { opcode } => Some(opcode),
            _ => None,
        }
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation, self.name().unwrap_or(self.entity().as_str()))?;
        if self.is_whitespace {
            f.write_str(" (W)")?;
        }
        match &self.detail {
            DiffDetail::Attribute { value, value2, .. } => match value2 {
                Some(value2) => write!(f, " {} -> {}", value, value2),
                None => write!(f, " {}", value),
            },
            DiffDetail::Element { elem } => write!(f, " #{}", elem.index()),
            DiffDetail::Content { opcode } => write!(
                f,
                " [{}:{}] -> [{}:{}]",
                opcode.old.start, opcode.old.end, opcode.new.start, opcode.new.end
            ),
        }
    }
}
