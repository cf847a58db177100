// search-core/src/query_executor.rs
//! 查询执行器
//!
//! Runs a [`StructuredQuery`] against both indexes:
//! 1. free text becomes a [`MatchExpr`] query (title+body for tickets, body for comments)
//! 2. ticket hits are narrowed by status, labels, assignee and creator; comment hits by creator
//! 3. both lists are merged by rank and the requested page is highlighted

use std::cmp::Ordering;

use query::{StatusFilter, StructuredQuery};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{Searcher, TantivyDocument, Term};
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::expression::MatchExpr;
use crate::highlight::{combine_highlights, snippet, Highlighter};
use crate::indexer::IndexStore;
use crate::models::{CommentRecord, CommentTarget, TicketRecord, TicketStatus};
use crate::search::{CommentResult, SearchResult, SearchResultPage, TicketResult};

/// A filtered hit before highlighting
enum Candidate {
    Ticket(TicketRecord, f64),
    Comment(CommentRecord, f64),
}

impl Candidate {
    fn rank(&self) -> f64 {
        match self {
            Candidate::Ticket(_, rank) | Candidate::Comment(_, rank) => *rank,
        }
    }

    fn sort_key(&self) -> (i64, u8, i64) {
        match self {
            Candidate::Ticket(t, _) => (t.created_at.timestamp_millis(), 0, t.id),
            Candidate::Comment(c, _) => (c.created_at.timestamp_millis(), 1, c.id),
        }
    }
}

/// Ascending rank, newer first on ties, then tickets before comments and by id
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    let (a_created, a_kind, a_id) = a.sort_key();
    let (b_created, b_kind, b_id) = b.sort_key();
    a.rank()
        .total_cmp(&b.rank())
        .then_with(|| b_created.cmp(&a_created))
        .then_with(|| a_kind.cmp(&b_kind))
        .then_with(|| a_id.cmp(&b_id))
}

fn status_matches(filter: StatusFilter, status: TicketStatus) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Open => status == TicketStatus::Open,
        StatusFilter::Closed => status == TicketStatus::Closed,
    }
}

fn ticket_matches(ticket: &TicketRecord, query: &StructuredQuery) -> bool {
    status_matches(query.status, ticket.status)
        && query.labels.iter().all(|label| ticket.labels.contains(label))
        && query.assignee_id.is_none_or(|id| ticket.assignee_id == Some(id))
        && query.creator_id.is_none_or(|id| ticket.creator_id == id)
}

/// Every match of `query` as (negated score, document), plus the match count
fn collect_all(searcher: &Searcher, query: &dyn Query) -> Result<(usize, Vec<(f64, TantivyDocument)>), SearchError> {
    let num_docs = searcher.num_docs() as usize;
    if num_docs == 0 {
        return Ok((0, Vec::new()));
    }

    let (count, top_docs) = searcher.search(query, &(Count, TopDocs::with_limit(num_docs)))?;
    let mut hits = Vec::with_capacity(top_docs.len());
    for (score, address) in top_docs {
        let doc: TantivyDocument = searcher.doc(address)?;
        hits.push((-(score as f64), doc));
    }
    Ok((count, hits))
}

/// 执行结构化查询
///
/// `raw` is echoed back in the page. Limit and offset come from `query`.
pub fn execute(
    store: &IndexStore,
    raw: &str,
    query: &StructuredQuery,
    config: &SearchConfig,
) -> Result<SearchResultPage, SearchError> {
    let expr = MatchExpr::parse(&query.text);
    let ticket_fields = store.ticket_fields();
    let comment_fields = store.comment_fields();

    debug!(
        "executing query {:?}: {} clause(s), filters: {}",
        raw,
        expr.clauses().len(),
        query.has_filters()
    );

    let (ticket_searcher, comment_searcher) = store.searchers();

    // 工单
    let ticket_query = expr.to_query(&[ticket_fields.title, ticket_fields.body]);
    let (ticket_count, ticket_hits) = collect_all(&ticket_searcher, ticket_query.as_ref())?;

    // 评论：只搜索工单下的评论
    let target_filter: Box<dyn Query> = Box::new(ConstScoreQuery::new(
        Box::new(TermQuery::new(
            Term::from_field_text(comment_fields.target_type, CommentTarget::Ticket.as_str()),
            IndexRecordOption::Basic,
        )),
        0.0,
    ));
    let comment_query = BooleanQuery::new(vec![
        (Occur::Must, expr.to_query(&[comment_fields.body])),
        (Occur::Must, target_filter),
    ]);
    let (comment_count, comment_hits) = collect_all(&comment_searcher, &comment_query)?;

    let mut candidates: Vec<Candidate> = Vec::with_capacity(ticket_hits.len() + comment_hits.len());
    candidates.extend(
        ticket_hits
            .iter()
            .filter_map(|(rank, doc)| ticket_fields.from_document(doc).map(|t| (t, *rank)))
            .filter(|(ticket, _)| ticket_matches(ticket, query))
            .map(|(ticket, rank)| Candidate::Ticket(ticket, rank)),
    );
    candidates.extend(
        comment_hits
            .iter()
            .filter_map(|(rank, doc)| comment_fields.from_document(doc).map(|c| (c, *rank)))
            .filter(|(comment, _)| query.creator_id.is_none_or(|id| comment.creator_id == id))
            .map(|(comment, rank)| Candidate::Comment(comment, rank)),
    );
    candidates.sort_by(compare);

    let total = ticket_count + comment_count;
    let limit = query.limit();
    debug!(
        "{} ticket and {} comment text matches, {} after filters",
        ticket_count,
        comment_count,
        candidates.len()
    );

    let highlighter = Highlighter::new(&expr);
    let snippet_len = config.display.snippet_max_len;
    let results = candidates
        .into_iter()
        .skip(query.offset())
        .take(limit)
        .map(|candidate| render(candidate, &highlighter, snippet_len))
        .collect();

    Ok(SearchResultPage {
        results,
        total,
        current_page: query.page_number(),
        total_pages: total.div_ceil(limit),
        query: raw.to_string(),
    })
}

fn render(candidate: Candidate, highlighter: &Highlighter<'_>, snippet_len: usize) -> SearchResult {
    match candidate {
        Candidate::Ticket(ticket, rank) => {
            let highlighted = combine_highlights(
                &highlighter.highlight(&ticket.title),
                &highlighter.highlight(&ticket.body),
            );
            SearchResult::Ticket(TicketResult {
                id: ticket.id,
                snippet: snippet(&highlighted, snippet_len),
                highlighted,
                title: ticket.title,
                body: ticket.body,
                status: ticket.status,
                labels: ticket.labels,
                assignee_id: ticket.assignee_id,
                creator_id: ticket.creator_id,
                created_at: ticket.created_at,
                updated_at: ticket.updated_at,
                rank,
            })
        }
        Candidate::Comment(comment, rank) => {
            let highlighted = highlighter.highlight(&comment.body);
            SearchResult::Comment(CommentResult {
                id: comment.id,
                target_id: comment.target_id,
                title: format!("Comment on ticket #{}", comment.target_id),
                snippet: snippet(&highlighted, snippet_len),
                highlighted,
                body: comment.body,
                creator_id: comment.creator_id,
                created_at: comment.created_at,
                updated_at: comment.updated_at,
                rank,
            })
        }
    }
}
