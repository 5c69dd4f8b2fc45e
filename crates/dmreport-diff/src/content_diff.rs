/*
 * content_diff.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Content differ.
 *
 * Bodies are aligned token by token with Myers' algorithm. Equal runs are
 * dropped from the result; every remaining opcode is classified as either
 * a real edit or a whitespace-only change that renders identically.
 */

use crate::config::DiffConfig;
use crate::types::{OpTag, Opcode};
use dmreport_tree::{Content, Segment};
use similar::{Algorithm, DiffTag, capture_diff_slices};

/// A non-equal opcode and whether it only touches whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub opcode: Opcode,
    pub is_whitespace: bool,
}

/// Diff two content bodies.
///
/// Returns nothing when both sides are absent or empty. Opcodes are in
/// increasing offset order on both sides.
pub fn diff_content(
    old: Option<&Content>,
    new: Option<&Content>,
    config: &DiffConfig,
) -> Vec<ContentChange> {
    let old_body = old.map(Content::body).unwrap_or_default();
    let new_body = new.map(Content::body).unwrap_or_default();
    if old_body.is_empty() && new_body.is_empty() {
        return Vec::new();
    }

    align(old_body, new_body, config.absorb_trivial_equalities)
        .into_iter()
        .filter(|op| op.tag != OpTag::Equal)
        .map(|opcode| {
            let is_whitespace =
                is_whitespace_change(&old_body[opcode.old.clone()], &new_body[opcode.new.clone()]);
            ContentChange {
                opcode,
                is_whitespace,
            }
        })
        .collect()
}

/// Full opcode list, `Equal` runs included, covering both bodies.
pub fn align(old: &[Segment], new: &[Segment], absorb_trivial: bool) -> Vec<Opcode> {
    let mut ops: Vec<Opcode> = capture_diff_slices(Algorithm::Myers, old, new)
        .iter()
        .map(|op| {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let tag = match tag {
                DiffTag::Equal => OpTag::Equal,
                DiffTag::Delete => OpTag::Delete,
                DiffTag::Insert => OpTag::Insert,
                DiffTag::Replace => OpTag::Replace,
            };
            Opcode::new(tag, old_range, new_range)
        })
        .collect();

    if absorb_trivial {
        while let Some(merged) = absorb_one(&ops, old, new) {
            ops = merged;
        }
    }
    while let Some(widened) = widen_one(&ops, old, new) {
        ops = widened;
    }
    ops
}

/// True when the change between `old` and `new` renders as nothing but
/// reflowed whitespace.
pub fn is_whitespace_change(old: &[Segment], new: &[Segment]) -> bool {
    if old.iter().chain(new).all(Segment::is_whitespace) {
        return true;
    }
    is_rewrap_artifact(old, new)
}

/// `{{nl}}` turned into `}}{{div|{{classes}}|` by paragraph wrapping.
fn is_rewrap_artifact(old: &[Segment], new: &[Segment]) -> bool {
    match (old, new) {
        (
            [Segment::Call(nl)],
            [
                Segment::Close(close),
                Segment::Open(open),
                Segment::Call(classes),
                Segment::ArgSep,
            ],
        ) => nl == "nl" && close == "div" && open == "div" && classes == "classes",
        _ => false,
    }
}

fn edit_size(op: &Opcode) -> usize {
    op.old.len().max(op.new.len())
}

fn is_real_edit(op: &Opcode, old: &[Segment], new: &[Segment]) -> bool {
    op.tag != OpTag::Equal && !is_whitespace_change(&old[op.old.clone()], &new[op.new.clone()])
}

/// Fold the first absorbable equal run into its neighbouring edits.
///
/// An equal run qualifies when it holds only whitespace or punctuation and
/// is strictly shorter than an adjacent real edit. It is merged together
/// with every adjacent real edit into one opcode.
fn absorb_one(ops: &[Opcode], old: &[Segment], new: &[Segment]) -> Option<Vec<Opcode>> {
    for (i, op) in ops.iter().enumerate() {
        if op.tag != OpTag::Equal || !old[op.old.clone()].iter().all(Segment::is_trivial) {
            continue;
        }
        let before = i
            .checked_sub(1)
            .map(|b| &ops[b])
            .filter(|b| is_real_edit(b, old, new));
        let after = ops.get(i + 1).filter(|a| is_real_edit(a, old, new));
        let shorter = [before, after]
            .iter()
            .flatten()
            .any(|edit| op.old.len() < edit_size(edit));
        if !shorter {
            continue;
        }

        let first = if before.is_some() { i - 1 } else { i };
        let last = if after.is_some() { i + 1 } else { i };
        let old_range = ops[first].old.start..ops[last].old.end;
        let new_range = ops[first].new.start..ops[last].new.end;
        let tag = Opcode::edit_tag(&old_range, &new_range);

        let mut merged = Vec::with_capacity(ops.len());
        merged.extend_from_slice(&ops[..first]);
        merged.push(Opcode::new(tag, old_range, new_range));
        merged.extend_from_slice(&ops[last + 1..]);
        return Some(merged);
    }
    None
}

/// Which way `tokens` must grow before it nests on its own: left for a
/// close or separator belonging to an earlier open, right for an open (or
/// separator) whose close comes later.
fn unbalanced_ends(tokens: &[Segment]) -> (bool, bool) {
    let mut depth = 0usize;
    let mut left = false;
    let mut right = false;
    for token in tokens {
        match token {
            Segment::Open(_) => depth += 1,
            Segment::Close(_) if depth == 0 => left = true,
            Segment::Close(_) => depth -= 1,
            Segment::ArgSep if depth == 0 => {
                left = true;
                right = true;
            }
            _ => {}
        }
    }
    (left, right || depth > 0)
}

/// Grow the first real edit that cuts across directive nesting by one step.
///
/// A step takes one token from an adjacent equal run (on both sides) or
/// swallows an adjacent edit whole. Edits that already reach the body's
/// ends in the needed direction are left alone.
fn widen_one(ops: &[Opcode], old: &[Segment], new: &[Segment]) -> Option<Vec<Opcode>> {
    for (i, op) in ops.iter().enumerate() {
        if !is_real_edit(op, old, new) {
            continue;
        }
        let (old_left, old_right) = unbalanced_ends(&old[op.old.clone()]);
        let (new_left, new_right) = unbalanced_ends(&new[op.new.clone()]);
        let grow_left = (old_left || new_left) && i > 0;
        let grow_right = (old_right || new_right) && i + 1 < ops.len();
        if !grow_left && !grow_right {
            continue;
        }

        let mut old_range = op.old.clone();
        let mut new_range = op.new.clone();
        let mut first = i;
        let mut last = i;
        let mut left_rest = None;
        let mut right_rest = None;

        if grow_left {
            let prev = &ops[i - 1];
            first = i - 1;
            if prev.tag == OpTag::Equal && prev.old.len() > 1 {
                left_rest = Some(Opcode::new(
                    OpTag::Equal,
                    prev.old.start..prev.old.end - 1,
                    prev.new.start..prev.new.end - 1,
                ));
                old_range.start -= 1;
                new_range.start -= 1;
            } else {
                old_range.start = prev.old.start;
                new_range.start = prev.new.start;
            }
        }
        if grow_right {
            let next = &ops[i + 1];
            last = i + 1;
            if next.tag == OpTag::Equal && next.old.len() > 1 {
                right_rest = Some(Opcode::new(
                    OpTag::Equal,
                    next.old.start + 1..next.old.end,
                    next.new.start + 1..next.new.end,
                ));
                old_range.end += 1;
                new_range.end += 1;
            } else {
                old_range.end = next.old.end;
                new_range.end = next.new.end;
            }
        }

        let tag = Opcode::edit_tag(&old_range, &new_range);
        let mut widened = Vec::with_capacity(ops.len() + 1);
        widened.extend_from_slice(&ops[..first]);
        widened.extend(left_rest);
        widened.push(Opcode::new(tag, old_range, new_range));
        widened.extend(right_rest);
        widened.extend_from_slice(&ops[last + 1..]);
        return Some(widened);
    }
    None
}
