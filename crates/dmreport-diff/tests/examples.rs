/*
 * examples.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end comparisons of small documents.
 */

use dmreport_diff::{
    DiffConfig, DiffDetail, DiffRecord, Entity, OpTag, Operation, TieBreaker, annotate, compare,
};
use dmreport_tree::{Content, EditMark, NodeId, Segment, Tree, render, tokenize};
use pretty_assertions::assert_eq;

fn tree(json: &str) -> Tree {
    Tree::from_json_str(json).unwrap()
}

/// Follow child indexes down from the root.
fn at(tree: &Tree, path: &[usize]) -> NodeId {
    path.iter()
        .fold(tree.root(), |id, &i| tree.children(id)[i])
}

fn records(tree_diffs: &dmreport_diff::Comparison) -> Vec<&DiffRecord> {
    tree_diffs.diffs.records().collect()
}

#[test]
fn status_change_is_one_attribute_record() {
    let old = tree(
        r#"{"kind": "model", "attributes": {"name": "Device:2.15"}, "children": [
            {"kind": "parameter", "key": ["a.xml", "Enable"],
             "attributes": {"name": "Enable", "status": "current"}}
        ]}"#,
    );
    let new = tree(
        r#"{"kind": "model", "attributes": {"name": "Device:2.15"}, "children": [
            {"kind": "parameter", "key": ["b.xml", "Enable"],
             "attributes": {"name": "Enable", "status": "deprecated"}}
        ]}"#,
    );

    let comparison = compare(&old, &new, &DiffConfig::default()).unwrap();
    let param = at(&new, &[0]);
    assert_eq!(
        comparison.diffs.get(param),
        Some(
            &[DiffRecord::attribute(
                at(&old, &[0]),
                param,
                Operation::Changed,
                "status",
                "current",
                Some("deprecated".to_string()),
            )][..]
        )
    );
}

#[test]
fn removal_is_owned_by_the_new_parent() {
    let old = tree(
        r#"{"kind": "model", "children": [
            {"kind": "object", "key": ["m", "Device."], "children": [
                {"kind": "object", "key": ["m", "Foo"]},
                {"kind": "object", "key": ["m", "Bar"]}
            ]}
        ]}"#,
    );
    let mut new = tree(
        r#"{"kind": "model", "children": [
            {"kind": "object", "key": ["m", "Device."], "children": [
                {"kind": "object", "key": ["m", "Bar"]}
            ]}
        ]}"#,
    );

    let (comparison, summary) = annotate(&old, &mut new, &DiffConfig::default()).unwrap();
    let parent = at(&new, &[0]);
    let all = records(&comparison);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].entity(), Entity::Element);
    assert_eq!(all[0].operation, Operation::Removed);
    assert_eq!(
        all[0].detail,
        DiffDetail::Element {
            elem: at(&old, &[0, 0])
        }
    );
    assert_eq!(comparison.diffs.get(parent).map(<[_]>::len), Some(1));
    assert_eq!(summary.get(Entity::Element, Operation::Removed), 1);

    let footer = new.node(parent).content.as_ref().and_then(Content::footer);
    assert_eq!(footer, Some("{{diffs|Removed *Foo* object}}"));
    assert!(new.node(parent).visible);
    assert!(!new.node(at(&new, &[0, 0])).visible);
}

#[test]
fn inserted_word_becomes_one_replace() {
    let old = tree(r#"{"kind": "object", "content": "A."}"#);
    let mut new = tree(r#"{"kind": "object", "content": "A B."}"#);

    let (comparison, _) = annotate(&old, &mut new, &DiffConfig::default()).unwrap();
    let all = records(&comparison);
    assert_eq!(all.len(), 1);
    let opcode = all[0].opcode().unwrap();
    assert_eq!(opcode.tag, OpTag::Replace);
    assert_eq!(opcode.old, 1..2);
    assert_eq!(opcode.new, 1..4);
    assert!(!all[0].is_whitespace);

    let body = new.node(new.root()).content.as_ref().unwrap().body().to_vec();
    assert_eq!(
        body,
        vec![
            Segment::text("A"),
            Segment::Edit(EditMark::replaced(
                vec![Segment::text(".")],
                tokenize(" B.").unwrap()
            )),
        ]
    );
    assert_eq!(
        new.to_document(new.root()).content.as_deref(),
        Some("A{{replaced|.| B.}}")
    );
}

const ENUMS_OLD: &str = r#"{"kind": "model", "children": [
    {"kind": "parameter", "key": ["m", "Status"], "children": [
        {"kind": "enumeration", "attributes": {"value": "Up"}},
        {"kind": "enumeration", "attributes": {"value": "Down"}}
    ]}
]}"#;

#[test]
fn unkeyed_children_match_by_rendering() {
    let old = tree(ENUMS_OLD);
    let new = tree(
        r#"{"kind": "model", "children": [
            {"kind": "parameter", "key": ["m", "Status"], "children": [
                {"kind": "enumeration", "attributes": {"value": "Down"}},
                {"kind": "enumeration", "attributes": {"value": "Up"}}
            ]}
        ]}"#,
    );
    let comparison = compare(&old, &new, &DiffConfig::default()).unwrap();
    assert!(comparison.is_resolved());
    assert!(comparison.diffs.is_empty());
}

#[test]
fn tied_children_are_ambiguous_and_excluded() {
    let old = tree(
        r#"{"kind": "model", "children": [
            {"kind": "parameter", "key": ["m", "Status"], "children": [
                {"kind": "enumeration", "attributes": {"value": "Up"}, "content": "one"},
                {"kind": "enumeration", "attributes": {"value": "Up"}, "content": "two"}
            ]}
        ]}"#,
    );
    let mut new = tree(
        r#"{"kind": "model", "children": [
            {"kind": "parameter", "key": ["m", "Status"], "children": [
                {"kind": "enumeration", "attributes": {"value": "Up"}, "content": "uno"},
                {"kind": "enumeration", "attributes": {"value": "Up"}, "content": "dos"}
            ]}
        ]}"#,
    );

    let (comparison, summary) = annotate(&old, &mut new, &DiffConfig::default()).unwrap();
    assert_eq!(comparison.unresolved.len(), 2);
    assert!(!comparison.is_resolved());
    assert!(comparison.diffs.is_empty());
    assert_eq!(summary.unresolved, 2);
    assert_eq!(summary.total(), 0);
    // neither content was touched
    let first = at(&new, &[0, 0]);
    assert_eq!(
        render(new.node(first).content.as_ref().unwrap().body()),
        "uno"
    );
}

#[test]
fn tie_breaker_resolves_what_signatures_cannot() {
    let old = tree(
        r#"{"kind": "model", "children": [
            {"kind": "parameter", "key": ["m", "Status"], "children": [
                {"kind": "enumeration", "attributes": {"value": "Up", "access": "readOnly"}}
            ]}
        ]}"#,
    );
    let new = tree(
        r#"{"kind": "model", "children": [
            {"kind": "parameter", "key": ["m", "Status"], "children": [
                {"kind": "enumeration", "attributes": {"value": "Down", "access": "readWrite"}},
                {"kind": "enumeration", "attributes": {"value": "Up", "access": "readWrite"}}
            ]}
        ]}"#,
    );

    let default = compare(&old, &new, &DiffConfig::default()).unwrap();
    assert_eq!(default.unresolved.len(), 1);

    let config = DiffConfig {
        tie_breakers: vec![TieBreaker::Attribute("value".into())],
        ..DiffConfig::default()
    };
    let comparison = compare(&old, &new, &config).unwrap();
    assert!(comparison.is_resolved());
    let summary: Vec<(Entity, Operation, Option<&str>)> = comparison
        .diffs
        .records()
        .map(|r| (r.entity(), r.operation, r.name()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Entity::Attribute, Operation::Changed, Some("access")),
            (Entity::Element, Operation::Added, None),
        ]
    );
}

#[test]
fn added_object_is_referenced_and_revealed() {
    let old = tree(r#"{"kind": "model", "attributes": {"name": "Device:2"}}"#);
    let mut new = tree(
        r#"{"kind": "model", "attributes": {"name": "Device:2"}, "children": [
            {"kind": "object", "key": ["m", "Device.New."], "children": [
                {"kind": "parameter", "key": ["m", "Enable"]}
            ]}
        ]}"#,
    );
    annotate(&old, &mut new, &DiffConfig::default()).unwrap();

    let root = new.root();
    assert_eq!(
        new.node(root).content.as_ref().and_then(Content::footer),
        Some("{{diffs|Added {{object|Device.New.|object}} object}}")
    );
    assert!(new.iter().all(|(_, node)| node.visible));
}
