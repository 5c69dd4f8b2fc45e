/*
 * content.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Structured text content: literal words and directive tokens.
 *
 * Directives use the grammar `{{name|arg1|arg2}}` (or `{{name}}` with no
 * arguments) and may nest inside arguments. Text is split into words,
 * whitespace runs and single punctuation characters so that it can be
 * aligned token by token.
 */

use crate::error::{TreeError, TreeResult};
use std::fmt;

/// Reserved token standing in for `{{`, `}}` or `|` inside a directive
/// argument. The expansion engine never interprets it as directive syntax.
pub const ESCAPE_SENTINEL: &str = "\\|";

/// One token of a content body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Literal text: a word, a whitespace run or a punctuation character.
    Text(String),
    /// `{{name|`, the start of a directive that takes arguments.
    Open(String),
    /// `{{name}}`, a directive without arguments.
    Call(String),
    /// `|` between directive arguments.
    ArgSep,
    /// `}}`, closing the named directive.
    Close(String),
    /// A change annotation spliced in by the diff engine.
    Edit(EditMark),
}

/// The kind of change an [`EditMark`] annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditKind {
    Replaced,
    Removed,
    Inserted,
}

impl EditKind {
    pub fn directive_name(self) -> &'static str {
        match self {
            EditKind::Replaced => "replaced",
            EditKind::Removed => "removed",
            EditKind::Inserted => "inserted",
        }
    }
}

/// A change annotation carrying the exact old and new tokens it covers.
///
/// Renders as `{{replaced|old|new}}`, `{{removed|old}}` or
/// `{{inserted|new}}`. The old side is escaped entirely; the new side
/// keeps its directives, so it must be balanced on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditMark {
    pub kind: EditKind,
    pub old: Vec<Segment>,
    pub new: Vec<Segment>,
}

impl EditMark {
    pub fn replaced(old: Vec<Segment>, new: Vec<Segment>) -> Self {
        EditMark {
            kind: EditKind::Replaced,
            old,
            new,
        }
    }

    pub fn removed(old: Vec<Segment>) -> Self {
        EditMark {
            kind: EditKind::Removed,
            old,
            new: Vec::new(),
        }
    }

    pub fn inserted(new: Vec<Segment>) -> Self {
        EditMark {
            kind: EditKind::Inserted,
            old: Vec::new(),
            new,
        }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("{{");
        out.push_str(self.kind.directive_name());
        match self.kind {
            EditKind::Replaced => {
                out.push('|');
                out.push_str(&escape_directive_text(&render(&self.old)));
                out.push('|');
                render_argument(&self.new, out);
            }
            EditKind::Removed => {
                out.push('|');
                out.push_str(&escape_directive_text(&render(&self.old)));
            }
            EditKind::Inserted => {
                out.push('|');
                render_argument(&self.new, out);
            }
        }
        out.push_str("}}");
    }
}

/// Render new-side tokens as one directive argument. Literal text is
/// escaped; directive tokens stay live so references still resolve.
fn render_argument(segments: &[Segment], out: &mut String) {
    let mut text = String::new();
    for segment in segments {
        match segment {
            Segment::Text(literal) => text.push_str(literal),
            other => {
                out.push_str(&escape_directive_text(&text));
                text.clear();
                other.render_into(out);
            }
        }
    }
    out.push_str(&escape_directive_text(&text));
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    /// True for empty text and pure inter-word whitespace.
    pub fn is_whitespace(&self) -> bool {
        match self {
            Segment::Text(text) => text.chars().all(char::is_whitespace),
            _ => false,
        }
    }

    /// True for text that is only whitespace or only punctuation.
    pub fn is_trivial(&self) -> bool {
        match self {
            Segment::Text(text) => {
                text.chars().all(char::is_whitespace) || text.chars().all(|c| !is_word_char(c))
            }
            _ => false,
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Segment::Text(text) => out.push_str(text),
            Segment::Open(name) => {
                out.push_str("{{");
                out.push_str(name);
                out.push('|');
            }
            Segment::Call(name) => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
            Segment::ArgSep => out.push('|'),
            Segment::Close(_) => out.push_str("}}"),
            Segment::Edit(mark) => mark.render_into(out),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render_into(&mut out);
        f.write_str(&out)
    }
}

/// Structured text: a body of tokens plus an independent footer.
///
/// The body is the unit of diffing. The footer holds synthesized summary
/// text and survives any rewrite of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    body: Vec<Segment>,
    footer: Option<String>,
}

impl Content {
    pub fn new(body: Vec<Segment>) -> Self {
        Content { body, footer: None }
    }

    /// Tokenize directive text into a content body.
    pub fn parse(text: &str) -> TreeResult<Self> {
        Ok(Content::new(tokenize(text)?))
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<Segment>) {
        self.body = body;
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn set_footer(&mut self, footer: impl Into<String>) {
        self.footer = Some(footer.into());
    }

    /// True when the body has no tokens. The footer is not considered.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn render_body(&self) -> String {
        render(&self.body)
    }
}

/// Concatenate the rendered form of `segments`.
pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.render_into(&mut out);
    }
    out
}

/// Replace anything that would be read as directive syntax with
/// [`ESCAPE_SENTINEL`].
pub fn escape_directive_text(text: &str) -> String {
    text.replace('|', ESCAPE_SENTINEL)
        .replace("{{", ESCAPE_SENTINEL)
        .replace("}}", ESCAPE_SENTINEL)
}

/// Undo splicing: every [`Segment::Edit`] is replaced by its new tokens.
pub fn strip_edits(segments: &[Segment]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Edit(mark) => out.extend(strip_edits(&mark.new)),
            other => out.push(other.clone()),
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tokenize directive text.
///
/// `|` and `}}` are only syntax while a directive is open; elsewhere `|`
/// is literal text and a stray `}}` is an error. `{{` not followed by a
/// directive name and then `|` or `}}` is literal text.
pub fn tokenize(text: &str) -> TreeResult<Vec<Segment>> {
    let mut out = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut pending = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if rest.starts_with(ESCAPE_SENTINEL) {
            pending.push_str(ESCAPE_SENTINEL);
            pos += ESCAPE_SENTINEL.len();
            continue;
        }

        if let Some(after) = rest.strip_prefix("{{") {
            let name_len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
            let name = &after[..name_len];
            let tail = &after[name_len..];
            if !name.is_empty() {
                if tail.starts_with("}}") {
                    split_text(&pending, &mut out);
                    pending.clear();
                    out.push(Segment::Call(name.to_string()));
                    pos += 2 + name_len + 2;
                    continue;
                }
                if tail.starts_with('|') {
                    split_text(&pending, &mut out);
                    pending.clear();
                    out.push(Segment::Open(name.to_string()));
                    open.push(name.to_string());
                    pos += 2 + name_len + 1;
                    continue;
                }
            }
            // only the first brace is literal; the second may start a directive
            pending.push('{');
            pos += 1;
            continue;
        }

        if rest.starts_with("}}") {
            let Some(name) = open.pop() else {
                return Err(TreeError::UnbalancedClose { offset: pos });
            };
            split_text(&pending, &mut out);
            pending.clear();
            out.push(Segment::Close(name));
            pos += 2;
            continue;
        }

        if rest.starts_with('|') && !open.is_empty() {
            split_text(&pending, &mut out);
            pending.clear();
            out.push(Segment::ArgSep);
            pos += 1;
            continue;
        }

        // `rest` is non-empty here
        let c = rest.chars().next().unwrap_or_default();
        pending.push(c);
        pos += c.len_utf8();
    }

    if let Some(name) = open.pop() {
        return Err(TreeError::Unterminated { name });
    }
    split_text(&pending, &mut out);
    Ok(out)
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum CharClass {
    Word,
    Space,
    Other,
}

fn classify(c: char) -> CharClass {
    if is_word_char(c) {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

/// Split literal text into word, whitespace and punctuation tokens.
fn split_text(text: &str, out: &mut Vec<Segment>) {
    let mut start = 0;
    let mut current: Option<CharClass> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if text[i..].starts_with(ESCAPE_SENTINEL) {
            if i > start {
                out.push(Segment::text(&text[start..i]));
            }
            out.push(Segment::text(ESCAPE_SENTINEL));
            // skip the sentinel's second character
            iter.next();
            start = i + ESCAPE_SENTINEL.len();
            current = None;
            continue;
        }
        let class = classify(c);
        match current {
            Some(prev) if prev == class && class != CharClass::Other => {}
            _ => {
                if i > start {
                    out.push(Segment::text(&text[start..i]));
                }
                start = i;
                current = Some(class);
            }
        }
    }
    if start < text.len() {
        out.push(Segment::text(&text[start..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> Segment {
        Segment::text(s)
    }

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(
            tokenize("A B.").unwrap(),
            vec![t("A"), t(" "), t("B"), t(".")]
        );
        assert_eq!(tokenize("").unwrap(), Vec::<Segment>::new());
    }

    #[test]
    fn test_tokenize_directives() {
        let tokens = tokenize("See {{param|Enable}}{{nl}}done").unwrap();
        assert_eq!(
            tokens,
            vec![
                t("See"),
                t(" "),
                Segment::Open("param".into()),
                t("Enable"),
                Segment::Close("param".into()),
                Segment::Call("nl".into()),
                t("done"),
            ]
        );
    }

    #[test]
    fn test_tokenize_nested_arguments() {
        let tokens = tokenize("{{div|{{classes}}|x}}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Segment::Open("div".into()),
                Segment::Call("classes".into()),
                Segment::ArgSep,
                t("x"),
                Segment::Close("div".into()),
            ]
        );
    }

    #[test]
    fn test_pipe_outside_directive_is_text() {
        assert_eq!(tokenize("a|b").unwrap(), vec![t("a"), t("|"), t("b")]);
    }

    #[test]
    fn test_brace_pair_without_name_is_text() {
        assert_eq!(tokenize("{{ x").unwrap(), vec![t("{"), t("{"), t(" "), t("x")]);
    }

    #[test]
    fn test_escape_sentinel_is_one_token() {
        let tokens = tokenize("{{removed|a\\|b}}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Segment::Open("removed".into()),
                t("a"),
                t(ESCAPE_SENTINEL),
                t("b"),
                Segment::Close("removed".into()),
            ]
        );
    }

    #[test]
    fn test_unbalanced_close() {
        assert!(matches!(
            tokenize("oops}}"),
            Err(TreeError::UnbalancedClose { offset: 4 })
        ));
    }

    #[test]
    fn test_unterminated_directive() {
        match tokenize("{{param|x") {
            Err(TreeError::Unterminated { name }) => assert_eq!(name, "param"),
            other => panic!("expected unterminated error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_reverses_tokenize() {
        let text = "The {{param|Enable}} value, {{nl}}|and {{div|{{classes}}|x}}.";
        assert_eq!(render(&tokenize(text).unwrap()), text);
    }

    #[test]
    fn test_escape_directive_text() {
        assert_eq!(escape_directive_text("a|b"), "a\\|b");
        assert_eq!(escape_directive_text("{{nl}}"), "\\|nl\\|");
        assert_eq!(escape_directive_text("plain"), "plain");
    }

    #[test]
    fn test_edit_rendering_escapes_arguments() {
        let mark = EditMark::replaced(tokenize("{{nl}}a|b").unwrap(), tokenize("{{nl}} B.").unwrap());
        assert_eq!(render(&[Segment::Edit(mark)]), "{{replaced|\\|nl\\|a\\|b|{{nl}} B.}}");
        assert_eq!(
            render(&[Segment::Edit(EditMark::removed(vec![t("x")]))]),
            "{{removed|x}}"
        );
        assert_eq!(
            render(&[Segment::Edit(EditMark::inserted(vec![t("y")]))]),
            "{{inserted|y}}"
        );
    }

    #[test]
    fn test_inserted_reference_stays_live() {
        let new = tokenize("see {{param|B}}").unwrap();
        let text = render(&[Segment::Edit(EditMark::inserted(new))]);
        assert_eq!(text, "{{inserted|see {{param|B}}}}");
        assert_eq!(
            tokenize(&text).unwrap(),
            vec![
                Segment::Open("inserted".into()),
                t("see"),
                t(" "),
                Segment::Open("param".into()),
                t("B"),
                Segment::Close("param".into()),
                Segment::Close("inserted".into()),
            ]
        );
        // literal pipes in new text are escaped, never argument separators
        let piped = vec![t("a"), t("|"), t("b")];
        assert_eq!(
            render(&[Segment::Edit(EditMark::inserted(piped))]),
            "{{inserted|a\\|b}}"
        );
    }

    #[test]
    fn test_brace_before_directive() {
        assert_eq!(
            tokenize("{{{nl}}").unwrap(),
            vec![t("{"), Segment::Call("nl".into())]
        );
    }

    #[test]
    fn test_strip_edits() {
        let body = vec![
            t("A"),
            Segment::Edit(EditMark::replaced(vec![t(".")], vec![t(" "), t("B"), t(".")])),
            Segment::Edit(EditMark::removed(vec![t("gone")])),
        ];
        assert_eq!(strip_edits(&body), vec![t("A"), t(" "), t("B"), t(".")]);
    }

    #[test]
    fn test_whitespace_and_trivial_classification() {
        assert!(t("").is_whitespace());
        assert!(t(" \n").is_whitespace());
        assert!(!t("a").is_whitespace());
        assert!(!Segment::Call("nl".into()).is_whitespace());
        assert!(t(".").is_trivial());
        assert!(t("  ").is_trivial());
        assert!(!t("B").is_trivial());
        assert!(!Segment::ArgSep.is_trivial());
    }

    #[test]
    fn test_footer_is_independent_of_body() {
        let mut content = Content::parse("old text").unwrap();
        content.set_footer("{{diffs|Changed}}");
        content.set_body(vec![t("new")]);
        assert_eq!(content.footer(), Some("{{diffs|Changed}}"));
        assert_eq!(content.render_body(), "new");
    }
}
