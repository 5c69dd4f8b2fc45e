/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for tree comparison.

use dmreport_tree::{NodeId, NodeKind};
use thiserror::Error;

/// Fatal errors: the comparison was called in a way it can't honour.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Two nodes of different kinds were handed to the matcher.
    #[error("Cannot compare a {old} with a {new}")]
    KindMismatch { old: NodeKind, new: NodeKind },

    /// Anything other than exactly two trees was supplied.
    #[error("Need two trees (old and new) to compute diffs ({0} were supplied)")]
    TreeCount(usize),

    /// The old and new tree are the same tree.
    #[error("Need two distinct trees to compute diffs")]
    SameTree,

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for comparison operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// An old child with several equally plausible new counterparts.
///
/// This is recoverable: it is logged, the child is left out of the diff,
/// and the comparison as a whole is reported as unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: multiple {kind} matches [{}]", .candidate_labels.join(", "))]
pub struct AmbiguousCorrespondence {
    /// Path of the parent in the old tree.
    pub path: String,
    pub kind: NodeKind,
    pub old_child: NodeId,
    /// New-tree children that all remained plausible.
    pub candidates: Vec<NodeId>,
    pub candidate_labels: Vec<String>,
}
