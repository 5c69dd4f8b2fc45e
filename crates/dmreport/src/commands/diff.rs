/*
 * diff.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Diff command implementation
 */

//! Diff command implementation.
//!
//! Reads an old and a new document tree, compares them, annotates the new
//! tree in place and writes it back out. The process fails when any child
//! could not be paired unambiguously, even though the annotated tree is
//! still written.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{error, info};

use dmreport_diff::{
    AmbiguousCorrespondence, Comparison, DiffConfig, DiffRecord, DiffSummary, compare_versions,
    synthesize,
};
use dmreport_tree::Tree;

/// Arguments for the diff command
#[derive(Debug)]
pub struct DiffArgs {
    /// Old and new tree files
    pub files: Vec<PathBuf>,
    /// TOML configuration file
    pub config: Option<PathBuf>,
    /// Annotated tree destination (stdout when absent)
    pub output: Option<PathBuf>,
    /// Raw diff record destination
    pub diff_report: Option<PathBuf>,
    /// Keep unchanged nodes visible
    pub show_all: bool,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    owner: String,
    kind: &'a str,
    records: &'a [DiffRecord],
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a DiffSummary,
    diffs: Vec<ReportEntry<'a>>,
    unresolved: Vec<String>,
}

fn read_tree(path: &Path) -> Result<Tree> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Tree::from_json_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn report<'a>(new: &'a Tree, comparison: &'a Comparison, summary: &'a DiffSummary) -> Report<'a> {
    Report {
        summary,
        diffs: comparison
            .diffs
            .iter()
            .map(|(owner, records)| ReportEntry {
                owner: new.nice_path(owner),
                kind: new.node(owner).kind.as_str(),
                records,
            })
            .collect(),
        unresolved: comparison
            .unresolved
            .iter()
            .map(AmbiguousCorrespondence::to_string)
            .collect(),
    }
}

/// Execute the diff command
pub fn execute(args: DiffArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => DiffConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DiffConfig::default(),
    };
    if args.show_all {
        config.hide_unchanged = false;
    }

    let trees = args
        .files
        .iter()
        .map(|path| read_tree(path))
        .collect::<Result<Vec<Tree>>>()?;
    let comparison = {
        let refs: Vec<&Tree> = trees.iter().collect();
        compare_versions(&refs, &config)?
    };
    let Ok([old, mut new]) = <[Tree; 2]>::try_from(trees) else {
        bail!("Need exactly two trees");
    };

    let summary = synthesize(&old, &mut new, &comparison, &config);

    write_output(args.output.as_deref(), &new.to_json_string()?)?;
    if let Some(path) = &args.diff_report {
        let json = serde_json::to_string_pretty(&report(&new, &comparison, &summary))?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote diff report");
    }

    if comparison.is_resolved() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!(
            unresolved = comparison.unresolved.len(),
            "comparison is incomplete: some children could not be paired"
        );
        Ok(ExitCode::FAILURE)
    }
}
