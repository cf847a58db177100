use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;
use search_core::{
    CommentRecord, CommentTarget, ContentType, IndexError, IndexStore, Record, RecordEvent, RecordSnapshot,
    RecordSource, SearchConfig, SearchEngine, SearchResult, TicketRecord, TicketStatus,
};

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(n as i64)
}

fn ticket(id: i64, title: &str, body: &str, status: TicketStatus) -> TicketRecord {
    TicketRecord {
        id,
        title: title.into(),
        body: body.into(),
        status,
        labels: vec![],
        assignee_id: None,
        creator_id: 1,
        created_at: day(id as u32),
        updated_at: day(id as u32),
    }
}

fn comment(id: i64, target_id: i64, body: &str) -> CommentRecord {
    CommentRecord {
        id,
        target_type: CommentTarget::Ticket,
        target_id,
        body: body.into(),
        creator_id: 2,
        created_at: day(id as u32),
        updated_at: day(id as u32),
    }
}

fn sample_snapshot() -> RecordSnapshot {
    let mut bug = ticket(1, "Login screen bug", "Submit button does nothing", TicketStatus::Open);
    bug.labels = vec!["bug".into(), "ui".into()];
    bug.assignee_id = Some(5);
    let mut closed = ticket(2, "Login screen bug", "Old duplicate report", TicketStatus::Closed);
    closed.labels = vec!["bug".into()];
    let mut feature = ticket(3, "Dark mode", "Add a dark theme to settings", TicketStatus::Open);
    feature.labels = vec!["feature".into()];
    feature.creator_id = 9;

    let mut discussion = comment(12, 1, "login works for me in the forum");
    discussion.target_type = CommentTarget::Discussion;

    RecordSnapshot {
        tickets: vec![bug, closed, feature],
        comments: vec![
            comment(10, 1, "Login fails on Safari as well"),
            comment(11, 3, "Dark theme would be great"),
            discussion,
        ],
    }
}

fn engine_with(snapshot: RecordSnapshot) -> SearchEngine {
    let engine = SearchEngine::with_store(
        IndexStore::in_memory().unwrap(),
        Arc::new(snapshot),
        SearchConfig::default(),
    );
    engine.rebuild_index().unwrap();
    engine
}

fn keys(results: &[SearchResult]) -> Vec<(ContentType, i64)> {
    results.iter().map(|r| (r.content_type(), r.id())).collect()
}

#[test]
fn test_status_scenario_returns_only_open_ticket() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("login bug status:open", 20, 0).unwrap();
    assert_eq!(keys(&page.results), vec![(ContentType::Ticket, 1)]);
    assert_eq!(page.query, "login bug status:open");
}

#[test]
fn test_empty_query_counts_every_document() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("", 20, 0).unwrap();
    // three tickets plus two ticket comments, the discussion comment is never indexed
    assert_eq!(page.total, 5);
    assert_eq!(page.results.len(), 5);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn test_punctuation_only_query_is_wildcard() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("?!* --", 20, 0).unwrap();
    assert_eq!(page.total, 5);
}

#[test]
fn test_pagination_over_45_matches() {
    let tickets = (1..=45)
        .map(|id| ticket(id, &format!("Login issue {}", id), "", TicketStatus::Open))
        .collect();
    let engine = engine_with(RecordSnapshot {
        tickets,
        comments: vec![],
    });

    let first = engine.search("login", 20, 0).unwrap();
    assert_eq!(first.results.len(), 20);
    assert_eq!(first.total, 45);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.current_page, 1);

    let last = engine.search("login", 20, 40).unwrap();
    assert_eq!(last.results.len(), 5);
    assert_eq!(last.current_page, 3);

    let past_end = engine.search("login", 20, 60).unwrap();
    assert!(past_end.is_empty());
    assert_eq!(past_end.total, 45);
}

#[test]
fn test_pages_do_not_overlap() {
    let tickets = (1..=30)
        .map(|id| ticket(id, "Printer jam", "", TicketStatus::Open))
        .collect();
    let engine = engine_with(RecordSnapshot {
        tickets,
        comments: vec![],
    });

    let mut seen = Vec::new();
    for offset in [0, 10, 20] {
        seen.extend(keys(&engine.search("printer", 10, offset).unwrap().results));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 30);
}

#[test]
fn test_reindex_is_idempotent() {
    let engine = engine_with(sample_snapshot());
    let before = engine.search("login", 20, 0).unwrap();

    let unchanged = sample_snapshot().tickets[0].clone();
    engine.index_ticket(&unchanged).unwrap();
    engine.index_ticket(&unchanged).unwrap();

    let after = engine.search("login", 20, 0).unwrap();
    assert_eq!(keys(&after.results), keys(&before.results));
    assert_eq!(after.total, before.total);
    assert_eq!(engine.stats().tickets, 3);
}

#[rstest]
#[case("")]
#[case("login")]
#[case("\"login screen bug\"")]
#[case("label:bug")]
#[case("status:open")]
fn test_deleted_ticket_never_returned(#[case] query: &str) {
    let engine = engine_with(sample_snapshot());
    engine.remove_from_index(ContentType::Ticket, 1).unwrap();

    let page = engine.search(query, 100, 0).unwrap();
    assert!(!keys(&page.results).contains(&(ContentType::Ticket, 1)));
}

#[test]
fn test_rebuild_restores_corrupted_index() {
    let snapshot = sample_snapshot();

    // reference: every record indexed one by one
    let reference = SearchEngine::with_store(
        IndexStore::in_memory().unwrap(),
        Arc::new(RecordSnapshot::default()),
        SearchConfig::default(),
    );
    for ticket in &snapshot.tickets {
        reference.index_ticket(ticket).unwrap();
    }
    for comment in &snapshot.comments {
        reference.index_comment(comment).unwrap();
    }

    // damaged: stale content, a missing ticket and an orphan document
    let damaged = SearchEngine::with_store(
        IndexStore::in_memory().unwrap(),
        Arc::new(snapshot.clone()),
        SearchConfig::default(),
    );
    damaged
        .index_ticket(&ticket(1, "Stale title", "stale", TicketStatus::Closed))
        .unwrap();
    damaged
        .index_ticket(&ticket(99, "Orphan login", "", TicketStatus::Open))
        .unwrap();
    damaged.index_comment(&comment(50, 99, "orphan comment")).unwrap();

    damaged.rebuild_index().unwrap();

    for query in ["", "login", "dark", "label:bug", "status:closed bug", "creator:2"] {
        let expected = reference.search(query, 20, 0).unwrap();
        let actual = damaged.search(query, 20, 0).unwrap();
        assert_eq!(keys(&actual.results), keys(&expected.results), "query {:?}", query);
        assert_eq!(actual.total, expected.total, "query {:?}", query);
        for (a, e) in actual.results.iter().zip(&expected.results) {
            assert!((a.rank() - e.rank()).abs() < 1e-6, "query {:?}", query);
        }
    }
}

struct FailingComments(RecordSnapshot);

impl RecordSource for FailingComments {
    fn all_tickets(&self) -> anyhow::Result<Vec<TicketRecord>> {
        self.0.all_tickets()
    }

    fn all_ticket_comments(&self) -> anyhow::Result<Vec<CommentRecord>> {
        anyhow::bail!("comment store offline")
    }
}

#[test]
fn test_failed_rebuild_keeps_previous_state() {
    let store = IndexStore::in_memory().unwrap();
    store.rebuild_all(&sample_snapshot()).unwrap();
    let before = store.stats();

    let err = store
        .rebuild_all(&FailingComments(RecordSnapshot::default()))
        .unwrap_err();
    assert!(matches!(
        err,
        IndexError::Source {
            content_type: ContentType::Comment,
            ..
        }
    ));
    assert!(!err.is_retryable());
    assert_eq!(store.stats(), before);
}

#[test]
fn test_cancelled_rebuild_keeps_previous_state() {
    let store = IndexStore::in_memory().unwrap();
    store.rebuild_all(&sample_snapshot()).unwrap();
    let before = store.stats();

    let bigger = RecordSnapshot {
        tickets: (1..=10)
            .map(|id| ticket(id, "replacement", "", TicketStatus::Open))
            .collect(),
        comments: vec![],
    };
    let cancel = AtomicBool::new(false);
    let err = store
        .rebuild_all_with_progress(&bigger, &cancel, |done, _| {
            if done == 4 {
                cancel.store(true, Ordering::Relaxed);
            }
        })
        .unwrap_err();

    assert!(matches!(err, IndexError::Cancelled { indexed: 4, total: 10 }));
    assert_eq!(store.stats(), before);

    // the writers are usable again afterwards
    store.rebuild_all(&bigger).unwrap();
    assert_eq!(store.stats().tickets, 10);
    assert_eq!(store.stats().comments, 0);
}

#[test]
fn test_discussion_comments_are_not_searchable() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("forum", 20, 0).unwrap();
    assert!(page.is_empty());

    let mut late = comment(13, 2, "forum thread about login");
    late.target_type = CommentTarget::Discussion;
    engine
        .apply(&RecordEvent::Created(Record::Comment(late)))
        .unwrap();
    assert!(engine.search("forum", 20, 0).unwrap().is_empty());
}

#[test]
fn test_comment_results() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("safari", 20, 0).unwrap();
    assert_eq!(page.results.len(), 1);

    match &page.results[0] {
        SearchResult::Comment(hit) => {
            assert_eq!(hit.id, 10);
            assert_eq!(hit.target_id, 1);
            assert_eq!(hit.title, "Comment on ticket #1");
            assert_eq!(hit.highlighted, "Login fails on <mark>Safari</mark> as well");
            assert_eq!(hit.snippet, "Login fails on Safari as well");
        }
        other => panic!("expected a comment, got {:?}", other),
    }
}

#[test]
fn test_ticket_highlight_labels_title_and_body() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("dark status:open", 20, 0).unwrap();
    let ticket = page
        .results
        .iter()
        .find(|r| r.content_type() == ContentType::Ticket)
        .unwrap();
    assert_eq!(
        ticket.highlighted(),
        "Title: <mark>Dark</mark> mode\nBody: Add a <mark>dark</mark> theme to settings"
    );
    assert_eq!(ticket.snippet(), "Title: Dark mode\nBody: Add a dark theme to settings");
}

#[test]
fn test_long_snippet_is_cut() {
    let body = "word ".repeat(100);
    let engine = engine_with(RecordSnapshot {
        tickets: vec![ticket(1, "Long", &body, TicketStatus::Open)],
        comments: vec![],
    });
    let page = engine.search("long", 20, 0).unwrap();
    let snippet = page.results[0].snippet();
    assert!(snippet.ends_with("..."));
    assert_eq!(snippet.chars().count(), 203);
}

#[rstest]
#[case("label:bug", vec![(ContentType::Ticket, 1), (ContentType::Ticket, 2)])]
#[case("label:bug label:ui", vec![(ContentType::Ticket, 1)])]
#[case("label:bug status:closed", vec![(ContentType::Ticket, 2)])]
#[case("assignee:5", vec![(ContentType::Ticket, 1)])]
#[case("creator:9", vec![(ContentType::Ticket, 3)])]
#[case("dark creator:2", vec![(ContentType::Comment, 11)])]
fn test_filters(#[case] query: &str, #[case] expected: Vec<(ContentType, i64)>) {
    let engine = engine_with(sample_snapshot());
    let mut found: Vec<_> = keys(&engine.search(query, 20, 0).unwrap().results)
        .into_iter()
        .filter(|(kind, _)| expected.iter().any(|(k, _)| k == kind))
        .collect();
    found.sort();
    assert_eq!(found, expected);
}

#[test]
fn test_ticket_filters_do_not_apply_to_comments() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("login label:ui", 20, 0).unwrap();
    assert!(keys(&page.results).contains(&(ContentType::Comment, 10)));
    assert!(!keys(&page.results).contains(&(ContentType::Ticket, 2)));
}

#[test]
fn test_results_sorted_by_rank() {
    let engine = engine_with(sample_snapshot());
    let page = engine.search("login", 20, 0).unwrap();
    assert!(page.results.len() >= 3);
    for pair in page.results.windows(2) {
        assert!(pair[0].rank() <= pair[1].rank());
    }
}

#[test]
fn test_prefix_and_exact_matching() {
    let engine = engine_with(sample_snapshot());
    assert!(!engine.search("saf", 20, 0).unwrap().is_empty());
    assert!(engine.search("\"saf\"", 20, 0).unwrap().is_empty());
    assert!(!engine.search("\"login screen\"", 20, 0).unwrap().is_empty());
    assert!(engine.search("\"screen login\"", 20, 0).unwrap().is_empty());
}

#[test]
fn test_diacritics_are_ignored() {
    let engine = engine_with(RecordSnapshot {
        tickets: vec![ticket(1, "Café menu broken", "", TicketStatus::Open)],
        comments: vec![],
    });
    assert_eq!(engine.search("cafe", 20, 0).unwrap().results.len(), 1);
    assert_eq!(engine.search("CAFÉ", 20, 0).unwrap().results.len(), 1);
}

#[test]
fn test_zero_limit_uses_default() {
    let tickets = (1..=30)
        .map(|id| ticket(id, "Printer jam", "", TicketStatus::Open))
        .collect();
    let engine = engine_with(RecordSnapshot {
        tickets,
        comments: vec![],
    });
    let page = engine.search("", 0, 0).unwrap();
    assert_eq!(page.results.len(), 20);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn test_empty_index_returns_empty_page() {
    let store = IndexStore::in_memory().unwrap();
    let engine = SearchEngine::with_store(store, Arc::new(RecordSnapshot::default()), SearchConfig::default());
    let page = engine.search("anything", 20, 0).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn test_concurrent_writers() {
    let store = Arc::new(IndexStore::in_memory().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..5 {
                    let id = worker * 5 + n + 1;
                    store
                        .index_ticket(&ticket(id, "Concurrent write", "", TicketStatus::Open))
                        .unwrap();
                    // every worker also hammers the same shared id
                    store
                        .index_ticket(&ticket(1000, &format!("Shared {}", worker), "", TicketStatus::Open))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.stats().tickets, 41);
}

#[test]
fn test_on_disk_index_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SearchConfig::default();
    config.index.storage_path = Some(dir.path().to_path_buf());

    {
        let engine = SearchEngine::new(config.clone(), Arc::new(sample_snapshot())).unwrap();
        engine.rebuild_index().unwrap();
    }

    let reopened = SearchEngine::new(config, Arc::new(RecordSnapshot::default())).unwrap();
    let page = reopened.search("login bug status:open", 20, 0).unwrap();
    assert_eq!(keys(&page.results), vec![(ContentType::Ticket, 1)]);
}

#[rstest]
#[case("x".repeat(300))]
#[case("x".repeat(255))]
#[case(format!("login {}", "y".repeat(400)))]
#[case(format!("\"{} bug\"", "z".repeat(256)))]
fn test_overlong_word_matches_nothing(#[case] query: String) {
    let mut snapshot = sample_snapshot();
    snapshot.tickets[0].body = format!("{} {}", snapshot.tickets[0].body, "x".repeat(300));
    let engine = engine_with(snapshot);

    let page = engine.search(&query, 20, 0).unwrap();
    assert!(page.is_empty(), "{:?}", keys(&page.results));
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn test_rebuild_is_never_half_visible() {
    let old = sample_snapshot();
    let new = RecordSnapshot {
        tickets: (1..=20)
            .map(|id| ticket(id, "replacement", "", TicketStatus::Open))
            .collect(),
        comments: vec![],
    };
    let engine = Arc::new(engine_with(old.clone()));
    let done = Arc::new(AtomicBool::new(false));

    let searcher = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while !done.load(Ordering::Acquire) {
                seen.push(engine.search("", 100, 0).unwrap().total);
            }
            seen
        })
    };

    let cancel = AtomicBool::new(false);
    for round in 0..6 {
        let snapshot = if round % 2 == 0 { &new } else { &old };
        engine
            .store()
            .rebuild_all_with_progress(snapshot, &cancel, |_, _| {
                thread::sleep(std::time::Duration::from_millis(1));
            })
            .unwrap();
    }
    done.store(true, Ordering::Release);

    let seen = searcher.join().unwrap();
    assert!(!seen.is_empty());
    // old state: 3 tickets + 2 comments, new state: 20 tickets
    for total in seen {
        assert!(total == 5 || total == 20, "saw a mixed generation with {} documents", total);
    }
}

#[test]
fn test_second_engine_reads_while_first_writes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SearchConfig::default();
    config.index.storage_path = Some(dir.path().to_path_buf());

    let writer = SearchEngine::new(config.clone(), Arc::new(sample_snapshot())).unwrap();
    writer.rebuild_index().unwrap();

    let reader = SearchEngine::new(config, Arc::new(RecordSnapshot::default())).unwrap();
    let page = reader.search("login bug status:open", 20, 0).unwrap();
    assert_eq!(keys(&page.results), vec![(ContentType::Ticket, 1)]);
    assert_eq!(reader.stats().tickets, 3);

    writer.remove_from_index(ContentType::Ticket, 3).unwrap();
    assert_eq!(writer.stats().tickets, 2);
}
