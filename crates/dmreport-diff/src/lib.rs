/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Structural diff and change-annotation synthesis for data model reports.
 *
 * Given an old and a new version of a document tree, this crate works out
 * which nodes correspond, records what changed (attributes, child
 * elements, content tokens) grouped by owning model item, and then
 * rewrites the new tree in place so that a renderer shows the changes:
 * a `{{diffs}}` footer per changed model item, `{{replaced}}`,
 * `{{removed}}` and `{{inserted}}` marks inside content, and visibility
 * forced on for changed regions.
 *
 * The work is split into two phases:
 * 1. Compare: [`compare`] walks both trees and produces a [`Comparison`]
 * 2. Synthesize: [`synthesize`] applies a comparison to the new tree
 *
 * [`annotate`] runs both.
 */

pub mod aggregate;
pub mod attributes;
pub mod config;
pub mod content_diff;
pub mod error;
pub mod matcher;
pub mod strategy;
pub mod summary;
pub mod synthesize;
pub mod types;

pub use aggregate::DiffMap;
pub use attributes::{AttributeChange, diff_attributes};
pub use config::{DiffConfig, TieBreaker};
pub use content_diff::{ContentChange, diff_content};
pub use error::{AmbiguousCorrespondence, DiffError, DiffResult};
pub use matcher::{Comparison, TreeMatcher};
pub use strategy::{
    AttributeMatch, ChildAttributeSetMatch, MatchContext, MatchStrategy, SignatureMatch,
    structural_signature,
};
pub use summary::DiffSummary;
pub use synthesize::synthesize;
pub use types::{DiffDetail, DiffRecord, Entity, OpTag, Opcode, Operation};

use dmreport_tree::Tree;

/// Compare two versions of a tree.
///
/// The roots must be of the same kind. Neither tree is modified.
pub fn compare(old: &Tree, new: &Tree, config: &DiffConfig) -> DiffResult<Comparison> {
    tracing::info!(
        old = %old.node(old.root()).label(),
        new = %new.node(new.root()).label(),
        "comparing"
    );
    let mut matcher = TreeMatcher::new(old, new, config);
    matcher.compare(old.root(), new.root())?;
    let comparison = matcher.finish();
    tracing::info!(
        owners = comparison.diffs.len(),
        records = comparison.diffs.record_count(),
        unresolved = comparison.unresolved.len(),
        "compared the two trees"
    );
    Ok(comparison)
}

/// Compare a list of tree versions, which must be exactly an old and a
/// distinct new tree.
pub fn compare_versions(trees: &[&Tree], config: &DiffConfig) -> DiffResult<Comparison> {
    let [old, new] = trees else {
        return Err(DiffError::TreeCount(trees.len()));
    };
    if std::ptr::eq(*old, *new) {
        return Err(DiffError::SameTree);
    }
    compare(old, new, config)
}

/// Compare `old` with `new` and annotate `new` with the result.
pub fn annotate(
    old: &Tree,
    new: &mut Tree,
    config: &DiffConfig,
) -> DiffResult<(Comparison, DiffSummary)> {
    let comparison = compare(old, new, config)?;
    let summary = synthesize(old, new, &comparison, config);
    Ok((comparison, summary))
}
