/*
 * summary.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::types::{DiffRecord, Entity, Operation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-category record counts, reported once synthesis completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    #[serde(serialize_with = "serialize_counts")]
    counts: BTreeMap<(Entity, Operation), usize>,
    pub unresolved: usize,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&mut self, record: &DiffRecord) {
        *self
            .counts
            .entry((record.entity(), record.operation))
            .or_default() += 1;
    }

    pub fn get(&self, entity: Entity, operation: Operation) -> usize {
        self.counts.get(&(entity, operation)).copied().unwrap_or(0)
    }

    /// Number of records, not counting unresolved correspondences.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, Operation, usize)> + '_ {
        self.counts
            .iter()
            .map(|(&(entity, operation), &count)| (entity, operation, count))
    }
}

fn serialize_counts<S: serde::Serializer>(
    counts: &BTreeMap<(Entity, Operation), usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        counts
            .iter()
            .map(|((entity, operation), count)| (format!("{} {}", entity, operation), count)),
    )
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (entity, operation, count) in self.iter() {
            write!(f, "{} {} = {}, ", entity, operation, count)?;
        }
        write!(f, "unresolved = {}", self.unresolved)
    }
}
