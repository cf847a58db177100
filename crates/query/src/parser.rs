use crate::filter::{FilterKind, StatusFilter};
use crate::lexer::{QueryLexer, Token};
use crate::structured::StructuredQuery;

/// Parse a search box string into a [`StructuredQuery`].
///
/// Never fails: anything that is not a well formed filter token stays in the
/// free text. Filters may appear anywhere in the string.
///
/// ```text
/// login bug label:ui status:open assignee:5 creator:12
/// ```
///
/// - `label:` accumulates, duplicates collapse
/// - `status:`, `assignee:` and `creator:` keep their last occurrence
/// - ids that are zero or do not fit an `i64` leave the filter unset
/// - a `status:` value other than open/closed/all is kept as text
pub fn parse_query(input: &str) -> StructuredQuery {
    let mut query = StructuredQuery::default();
    let mut words: Vec<String> = Vec::new();

    for token in QueryLexer::new(input) {
        match token {
            Token::Filter(FilterKind::Label, value) => {
                query.labels.insert(value);
            }
            Token::Filter(FilterKind::Status, value) => match value.parse::<StatusFilter>() {
                Ok(status) => query.status = status,
                Err(_) => words.push(format!("{}:{}", FilterKind::Status, value)),
            },
            Token::Filter(FilterKind::Assignee, value) => query.assignee_id = parse_id(&value),
            Token::Filter(FilterKind::Creator, value) => query.creator_id = parse_id(&value),
            Token::Text(text) => words.push(text),
        }
    }

    query.text = words.join(" ");
    query
}

/// Positive ids only, 0 means "no filter"
fn parse_id(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|id| *id > 0)
}
