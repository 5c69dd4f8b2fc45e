/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document tree types for data model reports.
 *
 * This crate provides the in-memory form of a parsed specification
 * document: an arena of attribute-bearing nodes with typed children,
 * optional identity keys, and structured text content made of literal
 * words and directive tokens. The diff engine reads two of these trees
 * and rewrites the newer one in place.
 */

pub mod content;
pub mod document;
pub mod error;
pub mod kind;
pub mod node;
pub mod tree;

// Re-export commonly used types at the crate root
pub use content::{
    Content, ESCAPE_SENTINEL, EditKind, EditMark, Segment, escape_directive_text, render, strip_edits,
    tokenize,
};
pub use document::DocumentNode;
pub use error::{TreeError, TreeResult};
pub use kind::NodeKind;
pub use node::{Node, NodeId};
pub use tree::{Ancestors, Tree};
