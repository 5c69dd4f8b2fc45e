/*
 * synthesize.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Annotation synthesizer.
 *
 * Turns a finished comparison into edits of the new tree: a `{{diffs}}`
 * footer listing the changes of each model item, change marks spliced
 * into content bodies, and visibility forced on for everything that
 * changed.
 */

use crate::config::DiffConfig;
use crate::matcher::Comparison;
use crate::summary::DiffSummary;
use crate::types::{DiffDetail, DiffRecord, Entity, OpTag, Operation};
use dmreport_tree::{Content, EditMark, NodeId, Segment, Tree, escape_directive_text};
use hashlink::LinkedHashMap;

/// Rewrite `new` in place from `comparison` and return the change counts.
///
/// `old` is only read, to recover the tokens that content edits removed.
pub fn synthesize(
    old: &Tree,
    new: &mut Tree,
    comparison: &Comparison,
    config: &DiffConfig,
) -> DiffSummary {
    let mut summary = DiffSummary::new();

    if config.hide_unchanged {
        new.hide_all();
        tracing::debug!("hid the whole tree");
    }

    for (owner, records) in comparison.diffs.iter() {
        let any_change = records
            .iter()
            .any(|r| r.entity() != Entity::Content || !r.is_whitespace);
        let mut phrases = Vec::new();

        for record in records {
            summary.count(record);
            if any_change {
                new.reveal_upwards(record.new_node);
            }
            if let Some(phrase) = phrase(old, new, owner, record, config) {
                phrases.push(phrase);
            }
            if let (Operation::Added, DiffDetail::Element { elem }) =
                (record.operation, &record.detail)
            {
                new.reveal_subtree(*elem);
                new.reveal_upwards(*elem);
                tracing::debug!(path = %new.nice_path(*elem), "unhid added subtree");
            }
        }
        if any_change {
            tracing::debug!(path = %new.nice_path(owner), "unhid changed node and ancestors");
        }

        if !phrases.is_empty() {
            let footer = format!("{{{{diffs|{}}}}}", phrases.join("|"));
            tracing::debug!(path = %new.nice_path(owner), footer = %footer, "footer");
            new.node_mut(owner)
                .content
                .get_or_insert_with(Content::default)
                .set_footer(footer);
        }

        splice_content(old, new, records);
    }

    summary.unresolved = comparison.unresolved.len();
    tracing::info!("appended {{{{diffs}}}} directives: {}", summary);
    summary
}

const REFERENCE_SCOPE: &str = "object";

fn emph(text: &str) -> String {
    if text.is_empty() {
        "\"\"".to_string()
    } else {
        format!("*{}*", escape_directive_text(text))
    }
}

/// `*label* ` (note the trailing space), or nothing for unlabelled nodes.
fn emph_label(tree: &Tree, id: NodeId) -> String {
    match tree.node(id).label() {
        "" => String::new(),
        label => format!("{} ", emph(label)),
    }
}

/// A directive call referencing `id`, falling back to its emphasised label.
///
/// The label is resolved in object scope, i.e. relative to the enclosing
/// object rather than the current parameter.
fn reference(tree: &Tree, id: NodeId, config: &DiffConfig) -> String {
    let node = tree.node(id);
    match config.reference_directive(&node.kind) {
        Some(directive) if node.is_describable() && !node.label().is_empty() => format!(
            "{{{{{}|{}|{}}}}} ",
            directive,
            escape_directive_text(node.label()),
            REFERENCE_SCOPE
        ),
        _ => emph_label(tree, id),
    }
}

/// Names the node that changed when it is not the model item itself.
fn context(tree: &Tree, owner: NodeId, changed: NodeId) -> String {
    if changed == owner {
        return String::new();
    }
    let node = tree.node(changed);
    let kind = node.kind.as_str();
    let label = node.label();
    if node.has_content() || label.is_empty() || label.contains(kind) {
        format!("{} ", kind)
    } else {
        format!("{} {} ", emph(label), kind)
    }
}

fn phrase(
    old: &Tree,
    new: &Tree,
    owner: NodeId,
    record: &DiffRecord,
    config: &DiffConfig,
) -> Option<String> {
    let context = context(new, owner, record.new_node);
    let verb = record.operation.verb();
    match (&record.detail, record.operation) {
        (DiffDetail::Content { .. }, _) => None,
        (DiffDetail::Attribute { name, value, value2 }, Operation::Changed) => Some(format!(
            "{} {}attribute {} from {} to {}",
            verb,
            context,
            emph(name),
            emph(value),
            emph(value2.as_deref().unwrap_or_default())
        )),
        (DiffDetail::Attribute { name, value, .. }, _) => Some(format!(
            "{} {}attribute {} = {}",
            verb,
            context,
            emph(name),
            emph(value)
        )),
        (DiffDetail::Element { elem }, Operation::Removed) => Some(format!(
            "{} {}{}{}",
            verb,
            context,
            emph_label(old, *elem),
            old.node(*elem).kind
        )),
        (DiffDetail::Element { elem }, _) => Some(format!(
            "{} {}{}{}",
            verb,
            context,
            reference(new, *elem, config),
            new.node(*elem).kind
        )),
    }
}

/// Splice change marks into every content body touched by `records`.
///
/// Each body gets its own forward cursor. Whitespace-only changes copy
/// their new tokens unannotated, so stripping the marks gives back the
/// new body exactly.
fn splice_content(old: &Tree, new: &mut Tree, records: &[DiffRecord]) {
    let mut by_node: LinkedHashMap<NodeId, Vec<&DiffRecord>> = LinkedHashMap::new();
    for record in records.iter().filter(|r| r.opcode().is_some()) {
        if let Some(list) = by_node.get_mut(&record.new_node) {
            list.push(record);
        } else {
            by_node.insert(record.new_node, vec![record]);
        }
    }

    for (node_id, mut edits) in by_node {
        edits.sort_by_key(|r| r.opcode().map(|op| op.new.start));
        let Some(content) = new.node(node_id).content.as_ref() else {
            tracing::error!(path = %new.nice_path(node_id), "content edit for a node without content");
            continue;
        };
        let body = content.body();
        let mut spliced = Vec::with_capacity(body.len() + edits.len());
        let mut j = 0;

        for record in edits {
            let Some(opcode) = record.opcode() else {
                continue;
            };
            let (Some(head), Some(new_tokens)) =
                (body.get(j..opcode.new.start), body.get(opcode.new.clone()))
            else {
                tracing::error!(
                    path = %new.nice_path(node_id),
                    "content edit out of range: {}",
                    record
                );
                continue;
            };
            spliced.extend_from_slice(head);

            let old_tokens = old
                .node(record.old_node)
                .content
                .as_ref()
                .and_then(|c| c.body().get(opcode.old.clone()))
                .unwrap_or_default();
            let mark = match opcode.tag {
                _ if record.is_whitespace => None,
                OpTag::Replace => Some(EditMark::replaced(old_tokens.to_vec(), new_tokens.to_vec())),
                OpTag::Delete => Some(EditMark::removed(old_tokens.to_vec())),
                OpTag::Insert => Some(EditMark::inserted(new_tokens.to_vec())),
                OpTag::Equal => None,
            };
            match mark {
                Some(mark) => spliced.push(Segment::Edit(mark)),
                None => spliced.extend_from_slice(new_tokens),
            }
            j = opcode.new.end;
        }
        spliced.extend_from_slice(body.get(j..).unwrap_or_default());

        tracing::debug!(
            path = %new.nice_path(node_id),
            body = %dmreport_tree::render(&spliced),
            "content"
        );
        if let Some(content) = new.node_mut(node_id).content.as_mut() {
            content.set_body(spliced);
        }
    }
}
