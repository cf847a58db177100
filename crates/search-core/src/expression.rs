// search-core/src/expression.rs
//! 全文匹配表达式
//!
//! Turns the free-text part of a query into match clauses and from there into
//! a tantivy query. Bare words match as prefixes, `"quoted"` units match
//! exactly (one token) or as a phrase (several tokens). All clauses must match,
//! any of the searched fields may satisfy a clause.
//!
//! A word the analyzer drops for being too long can never be found, so it makes
//! the whole expression match nothing rather than fall back to a wildcard.

use std::ops::Range;

use tantivy::query::{AllQuery, BooleanQuery, EmptyQuery, Occur, PhraseQuery, Query, RegexQuery, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::tokenizer::{SimpleTokenizer, TokenStream, Tokenizer};
use tantivy::Term;

use crate::schema::{text_analyzer, MAX_TOKEN_LEN};

/// One analyzed token with its byte span in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    pub text: String,
    pub span: Range<usize>,
}

/// Run the index analyzer over `text`
pub fn analyze(text: &str) -> Vec<AnalyzedToken> {
    let mut analyzer = text_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        let token = stream.token();
        tokens.push(AnalyzedToken {
            text: token.text.clone(),
            span: token.offset_from..token.offset_to,
        });
    }
    tokens
}

/// True when `text` holds a word the analyzer would drop for its length
fn has_overlong_word(text: &str) -> bool {
    let mut tokenizer = SimpleTokenizer::default();
    let mut stream = tokenizer.token_stream(text);
    while stream.advance() {
        if stream.token().text.len() >= MAX_TOKEN_LEN {
            return true;
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchClause {
    /// Any term starting with the token
    Prefix(String),
    /// Exactly this term
    Exact(String),
    /// These terms at consecutive positions, always two or more
    Phrase(Vec<String>),
}

/// Parsed free text. No clauses means "match everything" unless a word was
/// too long to ever be indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchExpr {
    clauses: Vec<MatchClause>,
    unmatchable: bool,
}

enum Unit<'a> {
    Bare(&'a str),
    Quoted(&'a str),
}

/// Split on whitespace, keeping balanced `"..."` runs together. An unmatched
/// quote is an ordinary character.
fn split_units(text: &str) -> Vec<Unit<'_>> {
    let mut units = Vec::new();
    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix('"') {
            if let Some(end) = after.find('"') {
                units.push(Unit::Quoted(&after[..end]));
                rest = &after[end + 1..];
                continue;
            }
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        units.push(Unit::Bare(&rest[..end]));
        rest = &rest[end..];
    }
    units
}

impl MatchExpr {
    pub fn parse(text: &str) -> Self {
        let mut clauses = Vec::new();
        let mut unmatchable = false;
        for unit in split_units(text) {
            let part = match unit {
                Unit::Bare(part) | Unit::Quoted(part) => part,
            };
            unmatchable |= has_overlong_word(part);
            match unit {
                Unit::Bare(word) => {
                    clauses.extend(analyze(word).into_iter().map(|t| MatchClause::Prefix(t.text)));
                }
                Unit::Quoted(phrase) => {
                    let mut terms: Vec<String> = analyze(phrase).into_iter().map(|t| t.text).collect();
                    match terms.len() {
                        0 => {}
                        1 => clauses.extend(terms.pop().map(MatchClause::Exact)),
                        _ => clauses.push(MatchClause::Phrase(terms)),
                    }
                }
            }
        }
        Self { clauses, unmatchable }
    }

    pub fn clauses(&self) -> &[MatchClause] {
        &self.clauses
    }

    /// Empty text, or text without a single indexable token
    pub fn is_wildcard(&self) -> bool {
        self.clauses.is_empty() && !self.unmatchable
    }

    /// Some word exceeds the indexed token length, nothing can match
    pub fn is_unmatchable(&self) -> bool {
        self.unmatchable
    }

    /// Build the tantivy query over `fields`
    pub fn to_query(&self, fields: &[Field]) -> Box<dyn Query> {
        if self.unmatchable {
            return Box::new(EmptyQuery);
        }
        if self.is_wildcard() {
            return Box::new(AllQuery);
        }

        let must: Vec<(Occur, Box<dyn Query>)> = self
            .clauses
            .iter()
            .map(|clause| {
                let per_field: Vec<(Occur, Box<dyn Query>)> = fields
                    .iter()
                    .map(|&field| (Occur::Should, clause_query(clause, field)))
                    .collect();
                (Occur::Must, Box::new(BooleanQuery::new(per_field)) as Box<dyn Query>)
            })
            .collect();

        Box::new(BooleanQuery::new(must))
    }
}

fn term_query(field: Field, text: &str) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(field, text),
        IndexRecordOption::WithFreqs,
    ))
}

fn clause_query(clause: &MatchClause, field: Field) -> Box<dyn Query> {
    match clause {
        MatchClause::Exact(text) => term_query(field, text),
        MatchClause::Phrase(terms) => {
            let terms = terms
                .iter()
                .map(|t| Term::from_field_text(field, t))
                .collect();
            Box::new(PhraseQuery::new(terms))
        }
        MatchClause::Prefix(prefix) => {
            // exact hits keep their BM25 score, longer terms come from the regex
            let pattern = format!("{}.*", regex::escape(prefix));
            match RegexQuery::from_pattern(&pattern, field) {
                Ok(regex_query) => Box::new(BooleanQuery::new(vec![
                    (Occur::Should, term_query(field, prefix)),
                    (Occur::Should, Box::new(regex_query)),
                ])),
                Err(e) => {
                    tracing::warn!("prefix pattern {:?} rejected, matching exact term only: {}", pattern, e);
                    term_query(field, prefix)
                }
            }
        }
    }
}
