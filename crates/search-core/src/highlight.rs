// search-core/src/highlight.rs
//! 高亮与摘要
//!
//! Marks matched tokens in result text and derives plain-text snippets.

use std::ops::Range;

use crate::expression::{analyze, MatchClause, MatchExpr};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Highlights the tokens a [`MatchExpr`] matches
pub struct Highlighter<'a> {
    expr: &'a MatchExpr,
}

impl<'a> Highlighter<'a> {
    pub fn new(expr: &'a MatchExpr) -> Self {
        Self { expr }
    }

    /// Return `text` with every matched token wrapped in `<mark>`/`</mark>`.
    /// A phrase match is marked as one span.
    pub fn highlight(&self, text: &str) -> String {
        if self.expr.is_wildcard() || text.is_empty() {
            return text.to_string();
        }

        let tokens = analyze(text);
        let mut spans: Vec<Range<usize>> = Vec::new();

        for clause in self.expr.clauses() {
            match clause {
                MatchClause::Prefix(prefix) => spans.extend(
                    tokens
                        .iter()
                        .filter(|t| t.text.starts_with(prefix.as_str()))
                        .map(|t| t.span.clone()),
                ),
                MatchClause::Exact(term) => spans.extend(
                    tokens
                        .iter()
                        .filter(|t| &t.text == term)
                        .map(|t| t.span.clone()),
                ),
                MatchClause::Phrase(terms) => {
                    for window in tokens.windows(terms.len()) {
                        if window.iter().zip(terms).all(|(t, term)| &t.text == term) {
                            spans.push(window[0].span.start..window[window.len() - 1].span.end);
                        }
                    }
                }
            }
        }

        mark_spans(text, spans)
    }
}

fn mark_spans(text: &str, mut spans: Vec<Range<usize>>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut out = String::with_capacity(text.len() + merged.len() * (MARK_OPEN.len() + MARK_CLOSE.len()));
    let mut cursor = 0;
    for span in merged {
        out.push_str(&text[cursor..span.start]);
        out.push_str(MARK_OPEN);
        out.push_str(&text[span.clone()]);
        out.push_str(MARK_CLOSE);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// `"Title: <title>\n"` and `"Body: <body>"`, each only when non-empty
pub fn combine_highlights(title: &str, body: &str) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str("Title: ");
        out.push_str(title);
        out.push('\n');
    }
    if !body.is_empty() {
        out.push_str("Body: ");
        out.push_str(body);
    }
    out
}

/// Strip highlight markers and cut to `max_len` characters, appending `...`
/// when something was cut.
pub fn snippet(highlighted: &str, max_len: usize) -> String {
    let plain = highlighted.replace(MARK_OPEN, "").replace(MARK_CLOSE, "");
    match plain.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &plain[..cut]),
        None => plain,
    }
}
