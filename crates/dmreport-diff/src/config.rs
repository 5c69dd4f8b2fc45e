/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Comparison and synthesis configuration.
 */

use crate::error::DiffResult;
use dmreport_tree::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// An opt-in match strategy applied after structural-string narrowing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreaker {
    /// Candidates whose named attribute equals the old child's.
    Attribute(String),
    /// Candidates whose children carry the same set of values for the
    /// named attribute as the old child's children.
    ChildAttributes(String),
}

/// Everything the matcher and synthesizer need to know up front.
///
/// All fields have defaults, so a TOML file only needs the keys it changes:
///
/// ```toml
/// key-skip = 1
/// hide-unchanged = false
/// ignored-kinds = ["componentRef"]
/// tie-breakers = [{ attribute = "value" }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiffConfig {
    /// Attribute names that never produce diffs.
    pub ignored_attributes: BTreeSet<String>,
    /// Child kinds skipped entirely during matching.
    pub ignored_kinds: BTreeSet<String>,
    /// Leading identity key components dropped before keys are compared.
    pub key_skip: usize,
    /// Hide the whole new tree before forcing changed regions visible.
    pub hide_unchanged: bool,
    /// Directive used to reference an added node, by node kind.
    pub reference_directives: BTreeMap<String, String>,
    pub tie_breakers: Vec<TieBreaker>,
    /// Fold short whitespace/punctuation equalities into neighbouring edits.
    pub absorb_trivial_equalities: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        let ignored_attributes = [
            "action",
            "activeNotify",
            "dmr_previousParameter",
            "dmr_previousObject",
            "dmr_previousCommand",
            "dmr_previousEvent",
            "dmr_previousProfile",
            "dmr_version",
            "functional",
            "targetParent",
            "version",
        ];
        let reference_directives = [
            ("object", "object"),
            ("parameter", "param"),
            ("command", "command"),
            ("event", "event"),
            ("profile", "profile"),
        ];
        DiffConfig {
            ignored_attributes: ignored_attributes.iter().map(|s| s.to_string()).collect(),
            ignored_kinds: ["componentRef", "profile"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            key_skip: 1,
            hide_unchanged: true,
            reference_directives: reference_directives
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tie_breakers: Vec::new(),
            absorb_trivial_equalities: true,
        }
    }
}

impl DiffConfig {
    pub fn from_toml_str(text: &str) -> DiffResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn is_ignored_attribute(&self, name: &str) -> bool {
        self.ignored_attributes.contains(name)
    }

    pub fn is_ignored_kind(&self, kind: &NodeKind) -> bool {
        self.ignored_kinds.contains(kind.as_str())
    }

    pub fn reference_directive(&self, kind: &NodeKind) -> Option<&str> {
        self.reference_directives
            .get(kind.as_str())
            .map(String::as_str)
    }

    /// Drop the configured number of leading key components.
    pub fn significant_key<'k>(&self, key: &'k [String]) -> &'k [String] {
        key.get(self.key_skip..).unwrap_or_default()
    }
}
