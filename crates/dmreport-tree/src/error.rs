/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for building document trees.

use thiserror::Error;

/// Errors that can occur while building a tree or tokenizing content.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A `}}` appeared with no open directive to close.
    #[error("Unbalanced directive close at byte {offset}")]
    UnbalancedClose { offset: usize },

    /// The text ended while a directive was still open.
    #[error("Unterminated directive: {{{{{name}|...")]
    Unterminated { name: String },

    /// The JSON form of a tree could not be read or written.
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
