/*
 * strategy.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tie-break strategies for children with several plausible counterparts.
 */

//! Match strategies.
//!
//! When an old child has more than one candidate in the new tree, the
//! matcher asks an ordered list of [`MatchStrategy`] implementations to
//! pick one. The first strategy that narrows the candidates to exactly one
//! wins. If none does, the correspondence is ambiguous and nothing is
//! guessed.
//!
//! [`SignatureMatch`] always runs first. The others are opt-in through
//! [`DiffConfig::tie_breakers`].

use crate::config::{DiffConfig, TieBreaker};
use dmreport_tree::{NodeId, Tree};
use rustc_hash::FxHashSet;

/// Everything a strategy may look at.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub old: &'a Tree,
    pub new: &'a Tree,
    pub config: &'a DiffConfig,
}

/// A pure candidate selector.
pub trait MatchStrategy: Send + Sync {
    /// Human-readable name, used in debug logging.
    fn name(&self) -> &str;

    /// Return the one candidate (new-tree id) that corresponds to
    /// `old_child`, or `None` if this strategy can't single one out.
    fn select(
        &self,
        ctx: &MatchContext<'_>,
        old_child: NodeId,
        candidates: &[NodeId],
    ) -> Option<NodeId>;
}

fn single<I: Iterator<Item = NodeId>>(mut iter: I) -> Option<NodeId> {
    let first = iter.next()?;
    match iter.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// The string a node is compared by when its identity is in doubt: kind,
/// significant identity key and the non-ignored attributes sorted by name.
pub fn structural_signature(tree: &Tree, id: NodeId, config: &DiffConfig) -> String {
    let node = tree.node(id);
    let mut out = String::from(node.kind.as_str());
    if let Some(key) = &node.identity_key {
        out.push('[');
        out.push_str(&config.significant_key(key).join("/"));
        out.push(']');
    }
    let mut attributes: Vec<(&String, &String)> = node
        .attributes
        .iter()
        .filter(|(name, _)| !config.is_ignored_attribute(name))
        .collect();
    attributes.sort();
    let attributes: Vec<String> = attributes
        .into_iter()
        .map(|(name, value)| format!("{}={:?}", name, value))
        .collect();
    out.push('(');
    out.push_str(&attributes.join(", "));
    out.push(')');
    out
}

/// Exact structural-string equality.
pub struct SignatureMatch;

impl MatchStrategy for SignatureMatch {
    fn name(&self) -> &str {
        "signature"
    }

    fn select(
        &self,
        ctx: &MatchContext<'_>,
        old_child: NodeId,
        candidates: &[NodeId],
    ) -> Option<NodeId> {
        let wanted = structural_signature(ctx.old, old_child, ctx.config);
        single(
            candidates
                .iter()
                .copied()
                .filter(|&c| structural_signature(ctx.new, c, ctx.config) == wanted),
        )
    }
}

/// Candidates whose named attribute equals the old child's.
pub struct AttributeMatch {
    attribute: String,
}

impl AttributeMatch {
    pub fn new(attribute: impl Into<String>) -> Self {
        AttributeMatch {
            attribute: attribute.into(),
        }
    }
}

impl MatchStrategy for AttributeMatch {
    fn name(&self) -> &str {
        "attribute"
    }

    fn select(
        &self,
        ctx: &MatchContext<'_>,
        old_child: NodeId,
        candidates: &[NodeId],
    ) -> Option<NodeId> {
        let wanted = ctx.old.node(old_child).attribute(&self.attribute)?;
        single(
            candidates
                .iter()
                .copied()
                .filter(|&c| ctx.new.node(c).attribute(&self.attribute) == Some(wanted)),
        )
    }
}

/// Candidates whose children carry the same set of values for the named
/// attribute as the old child's children.
pub struct ChildAttributeSetMatch {
    attribute: String,
}

impl ChildAttributeSetMatch {
    pub fn new(attribute: impl Into<String>) -> Self {
        ChildAttributeSetMatch {
            attribute: attribute.into(),
        }
    }

    fn values<'t>(&self, tree: &'t Tree, id: NodeId) -> FxHashSet<&'t str> {
        tree.children(id)
            .iter()
            .filter_map(|&child| tree.node(child).attribute(&self.attribute))
            .collect()
    }
}

impl MatchStrategy for ChildAttributeSetMatch {
    fn name(&self) -> &str {
        "child-attributes"
    }

    fn select(
        &self,
        ctx: &MatchContext<'_>,
        old_child: NodeId,
        candidates: &[NodeId],
    ) -> Option<NodeId> {
        let wanted = self.values(ctx.old, old_child);
        if wanted.is_empty() {
            return None;
        }
        single(
            candidates
                .iter()
                .copied()
                .filter(|&c| self.values(ctx.new, c) == wanted),
        )
    }
}

/// The strategy list for `config`: signature matching, then the configured
/// tie-breakers in order.
pub fn strategies_for(config: &DiffConfig) -> Vec<Box<dyn MatchStrategy>> {
    let mut strategies: Vec<Box<dyn MatchStrategy>> = vec![Box::new(SignatureMatch)];
    for tie_breaker in &config.tie_breakers {
        strategies.push(match tie_breaker {
            TieBreaker::Attribute(name) => Box::new(AttributeMatch::new(name.clone())),
            TieBreaker::ChildAttributes(name) => {
                Box::new(ChildAttributeSetMatch::new(name.clone()))
            }
        });
    }
    strategies
}
