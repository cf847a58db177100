use logos::{Lexer, Logos};

use crate::filter::FilterKind;

/// Raw tokens used internally by logos.
///
/// Filter keywords are case-sensitive and carry a priority over `Text` so that a
/// word like `status:open` is a filter, while logos' longest match still turns
/// `label:a:b` or `assignee:12abc` back into plain text.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"label:[^ \t\r\n\f:]+", |lex| filter_value(lex, FilterKind::Label), priority = 10)]
    Label(String),

    #[regex(r"status:[^ \t\r\n\f]+", |lex| filter_value(lex, FilterKind::Status), priority = 10)]
    Status(String),

    #[regex(r"assignee:[0-9]+", |lex| filter_value(lex, FilterKind::Assignee), priority = 10)]
    Assignee(String),

    #[regex(r"creator:[0-9]+", |lex| filter_value(lex, FilterKind::Creator), priority = 10)]
    Creator(String),

    #[regex(r"[^ \t\r\n\f]+", |lex| lex.slice().to_string())]
    Text(String),
}

fn filter_value(lex: &mut Lexer<RawToken>, kind: FilterKind) -> String {
    let slice = lex.slice();
    slice
        .get(kind.prefix_len()..)
        .unwrap_or_default()
        .to_string()
}

/// The public token type
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// `keyword:value` with the keyword stripped
    Filter(FilterKind, String),
    /// Any other whitespace separated word
    Text(String),
}

/// Splits a raw search string into filter tokens and free-text words
pub struct QueryLexer<'source> {
    lexer: Lexer<'source, RawToken>,
}

impl<'source> QueryLexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: RawToken::lexer(source),
        }
    }
}

impl<'source> Iterator for QueryLexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.lexer.next()?;

        let token = match result {
            Ok(RawToken::Label(value)) => Token::Filter(FilterKind::Label, value),
            Ok(RawToken::Status(value)) => Token::Filter(FilterKind::Status, value),
            Ok(RawToken::Assignee(value)) => Token::Filter(FilterKind::Assignee, value),
            Ok(RawToken::Creator(value)) => Token::Filter(FilterKind::Creator, value),
            Ok(RawToken::Text(text)) => Token::Text(text),
            // Every non-whitespace run is a valid `Text`, keep the slice anyway.
            Err(()) => Token::Text(self.lexer.slice().to_string()),
        };
        Some(token)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn text(s: &str) -> Token {
        Token::Text(s.into())
    }

    fn filter(kind: FilterKind, s: &str) -> Token {
        Token::Filter(kind, s.into())
    }

    #[test]
    fn test_plain_words() {
        let tokens: Vec<_> = QueryLexer::new("login  screen\tbug").collect();
        assert_eq!(tokens, vec![text("login"), text("screen"), text("bug")]);
    }

    #[test]
    fn test_all_filter_kinds() {
        let tokens: Vec<_> =
            QueryLexer::new("label:bug status:open assignee:5 creator:42").collect();
        assert_eq!(
            tokens,
            vec![
                filter(FilterKind::Label, "bug"),
                filter(FilterKind::Status, "open"),
                filter(FilterKind::Assignee, "5"),
                filter(FilterKind::Creator, "42"),
            ]
        );
    }

    #[rstest]
    #[case("label:a:b")]
    #[case("assignee:12abc")]
    #[case("creator:me")]
    #[case("Label:bug")]
    #[case("label:")]
    #[case("xlabel:bug")]
    fn test_malformed_filters_are_text(#[case] input: &str) {
        let tokens: Vec<_> = QueryLexer::new(input).collect();
        assert_eq!(tokens, vec![text(input)]);
    }

    #[test]
    fn test_status_value_is_not_validated_by_lexer() {
        let tokens: Vec<_> = QueryLexer::new("status:later").collect();
        assert_eq!(tokens, vec![filter(FilterKind::Status, "later")]);
    }

    #[test]
    fn test_unicode_words() {
        let tokens: Vec<_> = QueryLexer::new("ログイン label:バグ").collect();
        assert_eq!(
            tokens,
            vec![text("ログイン"), filter(FilterKind::Label, "バグ")]
        );
    }
}
