/*
 * kind.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Node kind discriminant.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a document node.
///
/// Matching and diffing switch on this discriminant rather than on a
/// per-kind type. Kinds the report tool doesn't know about are carried
/// through as [`NodeKind::Other`] so that unfamiliar documents still diff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Document,
    Model,
    Object,
    Parameter,
    Command,
    Input,
    Output,
    Event,
    Profile,
    DataType,
    Syntax,
    Enumeration,
    Pattern,
    Range,
    Size,
    UniqueKey,
    ComponentRef,
    Other(String),
}

impl NodeKind {
    /// The element name this kind is written as in documents.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Model => "model",
            NodeKind::Object => "object",
            NodeKind::Parameter => "parameter",
            NodeKind::Command => "command",
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Event => "event",
            NodeKind::Profile => "profile",
            NodeKind::DataType => "dataType",
            NodeKind::Syntax => "syntax",
            NodeKind::Enumeration => "enumeration",
            NodeKind::Pattern => "pattern",
            NodeKind::Range => "range",
            NodeKind::Size => "size",
            NodeKind::UniqueKey => "uniqueKey",
            NodeKind::ComponentRef => "componentRef",
            NodeKind::Other(name) => name,
        }
    }

    /// Whether nodes of this kind are model items or value facets.
    ///
    /// Describable nodes carry a description and own the diff records of
    /// everything beneath them that isn't itself describable.
    pub fn is_describable(&self) -> bool {
        matches!(
            self,
            NodeKind::Model
                | NodeKind::Object
                | NodeKind::Parameter
                | NodeKind::Command
                | NodeKind::Event
                | NodeKind::Profile
                | NodeKind::DataType
                | NodeKind::Enumeration
                | NodeKind::Pattern
        )
    }
}

impl From<&str> for NodeKind {
    fn from(name: &str) -> Self {
        match name {
            "document" => NodeKind::Document,
            "model" => NodeKind::Model,
            "object" => NodeKind::Object,
            "parameter" => NodeKind::Parameter,
            "command" => NodeKind::Command,
            "input" => NodeKind::Input,
            "output" => NodeKind::Output,
            "event" => NodeKind::Event,
            "profile" => NodeKind::Profile,
            "dataType" => NodeKind::DataType,
            "syntax" => NodeKind::Syntax,
            "enumeration" => NodeKind::Enumeration,
            "pattern" => NodeKind::Pattern,
            "range" => NodeKind::Range,
            "size" => NodeKind::Size,
            "uniqueKey" => NodeKind::UniqueKey,
            "componentRef" => NodeKind::ComponentRef,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(name: String) -> Self {
        NodeKind::from(name.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
