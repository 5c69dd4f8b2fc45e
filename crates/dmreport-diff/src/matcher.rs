/*
 * matcher.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tree matcher.
 *
 * Walks the old and new trees together, depth first in old-tree order.
 * Each matched pair is handed to the attribute and content differs and
 * then recursed into. Children without a counterpart become element
 * additions or removals; children with several equally plausible
 * counterparts are reported as ambiguous and left alone.
 */

use crate::aggregate::DiffMap;
use crate::attributes::diff_attributes;
use crate::config::DiffConfig;
use crate::content_diff::diff_content;
use crate::error::{AmbiguousCorrespondence, DiffError, DiffResult};
use crate::strategy::{MatchContext, MatchStrategy, strategies_for, structural_signature};
use crate::types::{DiffRecord, Operation};
use dmreport_tree::{Content, NodeId, NodeKind, Tree};
use rustc_hash::FxHashSet;

/// The outcome of comparing two trees.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub diffs: DiffMap,
    /// Old children that could not be paired. Each was logged at error
    /// level and excluded from `diffs`.
    pub unresolved: Vec<AmbiguousCorrespondence>,
}

impl Comparison {
    /// True when every old child was either matched or removed. An
    /// unresolved comparison should be treated as failed even though it
    /// ran to completion.
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Pairs up nodes of an old and a new tree and records their differences.
pub struct TreeMatcher<'a> {
    old: &'a Tree,
    new: &'a Tree,
    config: &'a DiffConfig,
    strategies: Vec<Box<dyn MatchStrategy>>,
    diffs: DiffMap,
    unresolved: Vec<AmbiguousCorrespondence>,
}

impl<'a> TreeMatcher<'a> {
    pub fn new(old: &'a Tree, new: &'a Tree, config: &'a DiffConfig) -> Self {
        TreeMatcher {
            old,
            new,
            config,
            strategies: strategies_for(config),
            diffs: DiffMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Replace the strategy list. Signature matching is not added
    /// implicitly.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Compare a matched pair and everything below it.
    ///
    /// The two nodes must be of the same kind.
    pub fn compare(&mut self, old_id: NodeId, new_id: NodeId) -> DiffResult<()> {
        let old_tree = self.old;
        let new_tree = self.new;
        let old_node = old_tree.node(old_id);
        let new_node = new_tree.node(new_id);
        if old_node.kind != new_node.kind {
            return Err(DiffError::KindMismatch {
                old: old_node.kind.clone(),
                new: new_node.kind.clone(),
            });
        }

        tracing::debug!(
            old = %old_tree.nice_path(old_id),
            new = %new_tree.nice_path(new_id),
            kind = %old_node.kind,
            "comparing"
        );

        for change in diff_attributes(old_node, new_node, self.config) {
            self.record(DiffRecord::attribute(
                old_id,
                new_id,
                change.operation,
                change.name,
                change.value,
                change.value2,
            ));
        }

        let old_content = old_node.content.as_ref();
        let new_content = new_node.content.as_ref();
        let old_empty = old_content.is_none_or(Content::is_empty);
        let new_empty = new_content.is_none_or(Content::is_empty);
        if old_empty || new_empty {
            tracing::debug!(
                path = %new_tree.nice_path(new_id),
                old_empty,
                new_empty,
                "empty content"
            );
        }
        for change in diff_content(old_content, new_content, self.config) {
            let record = DiffRecord::content(old_id, new_id, change.opcode, change.is_whitespace);
            tracing::debug!(path = %new_tree.nice_path(new_id), "{}", record);
            self.record(record);
        }

        self.match_children(old_id, new_id)
    }

    /// Consume the matcher, returning what it found.
    pub fn finish(self) -> Comparison {
        Comparison {
            diffs: self.diffs,
            unresolved: self.unresolved,
        }
    }

    fn record(&mut self, record: DiffRecord) {
        self.diffs.append(self.new, record);
    }

    fn is_key_compatible(&self, old_child: NodeId, new_child: NodeId) -> bool {
        let old_key = self.old.node(old_child).identity_key.as_deref();
        let new_key = self.new.node(new_child).identity_key.as_deref();
        match (old_key, new_key) {
            (Some(old_key), Some(new_key)) => {
                self.config.significant_key(old_key) == self.config.significant_key(new_key)
            }
            _ => true,
        }
    }

    fn match_children(&mut self, old_id: NodeId, new_id: NodeId) -> DiffResult<()> {
        let old_tree = self.old;
        let new_tree = self.new;
        let old_children = old_tree.children(old_id);
        let new_children = new_tree.children(new_id);

        // kind groups in the old node's declared order
        let mut kinds: Vec<&NodeKind> = Vec::new();
        for &child in old_children {
            let kind = &old_tree.node(child).kind;
            if !self.config.is_ignored_kind(kind) && !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        let mut claimed: FxHashSet<NodeId> = FxHashSet::default();
        let mut contested: FxHashSet<NodeId> = FxHashSet::default();

        for kind in kinds {
            for &old_child in old_children
                .iter()
                .filter(|&&c| &old_tree.node(c).kind == kind)
            {
                let candidates: Vec<NodeId> = new_children
                    .iter()
                    .copied()
                    .filter(|c| !claimed.contains(c))
                    .filter(|&c| &new_tree.node(c).kind == kind)
                    .filter(|&c| self.is_key_compatible(old_child, c))
                    .collect();

                let matched = match candidates.as_slice() {
                    [] => {
                        tracing::debug!(
                            path = %old_tree.nice_path(old_child),
                            "removed"
                        );
                        self.record(DiffRecord::element(
                            old_id,
                            new_id,
                            Operation::Removed,
                            old_child,
                        ));
                        continue;
                    }
                    [only] => Some(*only),
                    _ => self.select(old_child, &candidates),
                };

                match matched {
                    Some(new_child) => {
                        claimed.insert(new_child);
                        self.compare(old_child, new_child)?;
                    }
                    None => {
                        let ambiguity = AmbiguousCorrespondence {
                            path: old_tree.nice_path(old_id),
                            kind: kind.clone(),
                            old_child,
                            candidate_labels: candidates
                                .iter()
                                .map(|&c| candidate_label(new_tree, c, self.config))
                                .collect(),
                            candidates,
                        };
                        tracing::error!("{}", ambiguity);
                        contested.extend(ambiguity.candidates.iter().copied());
                        self.unresolved.push(ambiguity);
                    }
                }
            }
        }

        for &new_child in new_children {
            if self.config.is_ignored_kind(&new_tree.node(new_child).kind)
                || claimed.contains(&new_child)
                || contested.contains(&new_child)
            {
                continue;
            }
            tracing::debug!(path = %new_tree.nice_path(new_child), "added");
            self.record(DiffRecord::element(
                old_id,
                new_id,
                Operation::Added,
                new_child,
            ));
        }
        Ok(())
    }

    /// Ask each strategy in turn; the first one that singles out a
    /// candidate wins.
    fn select(&self, old_child: NodeId, candidates: &[NodeId]) -> Option<NodeId> {
        let ctx = MatchContext {
            old: self.old,
            new: self.new,
            config: self.config,
        };
        self.strategies.iter().find_map(|strategy| {
            let selected = strategy.select(&ctx, old_child, candidates)?;
            tracing::debug!(
                strategy = strategy.name(),
                path = %self.old.nice_path(old_child),
                "disambiguated"
            );
            Some(selected)
        })
    }
}

fn candidate_label(tree: &Tree, id: NodeId, config: &DiffConfig) -> String {
    match tree.node(id).label() {
        "" => structural_signature(tree, id, config),
        label => label.to_string(),
    }
}
