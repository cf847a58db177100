// search-core/src/indexer.rs
//! 索引模块 - 工单与评论的双索引维护
//!
//! Tickets and ticket comments live in two separate tantivy indexes. Single
//! record mutations commit immediately, a rebuild replaces both indexes in one
//! step: either every document of the new state becomes visible or none does.
//!
//! Writers are created on first write, so a store opened only to search never
//! takes the directory lock.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::Serialize;
use tantivy::directory::MmapDirectory;
use tantivy::schema::{Field, Schema};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, TantivyError, Term};
use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::models::{CommentRecord, ContentType, Record, RecordEvent, TicketRecord};
use crate::schema::{
    build_comment_schema, build_ticket_schema, text_analyzer, CommentFields, TicketFields, TEXT_TOKENIZER,
};
use crate::source::RecordSource;

/// tantivy refuses writer arenas below this size
const MIN_WRITER_MEMORY: usize = 15_000_000;

/// Where the two indexes keep their data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStorage {
    InMemory,
    /// `<path>/tickets` and `<path>/comments`
    Directory(PathBuf),
}

impl From<&IndexConfig> for IndexStorage {
    fn from(config: &IndexConfig) -> Self {
        match &config.storage_path {
            Some(path) => IndexStorage::Directory(path.clone()),
            None => IndexStorage::InMemory,
        }
    }
}

/// Document counts as seen by readers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub tickets: u64,
    pub comments: u64,
}

/// What a completed rebuild wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub tickets: usize,
    pub comments: usize,
    /// Non-ticket comments returned by the source
    pub skipped: usize,
}

/// One tantivy index with its reader and serialized writer
struct TextIndex {
    name: &'static str,
    index: Index,
    reader: IndexReader,
    /// Empty until the first write
    writer: Mutex<Option<IndexWriter>>,
    writer_memory: usize,
    doc_id: Field,
}

impl TextIndex {
    fn open(
        name: &'static str,
        storage: &IndexStorage,
        schema: Schema,
        doc_id: Field,
        writer_memory: usize,
    ) -> Result<Self, IndexError> {
        let index = match storage {
            IndexStorage::InMemory => Index::create_in_ram(schema),
            IndexStorage::Directory(root) => {
                let path = root.join(name);
                fs::create_dir_all(&path)?;
                let directory = MmapDirectory::open(&path).map_err(TantivyError::from)?;
                Index::open_or_create(directory, schema)?
            }
        };
        index.tokenizers().register(TEXT_TOKENIZER, text_analyzer());

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        debug!("opened {} index ({:?})", name, storage);
        Ok(Self {
            name,
            index,
            reader,
            writer: Mutex::new(None),
            writer_memory: writer_memory.max(MIN_WRITER_MEMORY),
            doc_id,
        })
    }

    /// Run `f` with exclusive access to the writer, creating it on first use.
    /// Fails with `LockFailure` while another process holds the directory.
    // A panic while holding the writer leaves nothing half-applied that a
    // rollback cannot undo, so a poisoned lock is still usable.
    fn with_writer<R>(&self, f: impl FnOnce(&mut IndexWriter) -> Result<R, IndexError>) -> Result<R, IndexError> {
        let mut slot = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let writer = match slot.take() {
            Some(writer) => writer,
            None => {
                debug!("acquiring {} index writer", self.name);
                self.index.writer(self.writer_memory)?
            }
        };
        f(slot.insert(writer))
    }

    fn id_term(&self, id: i64) -> Term {
        Term::from_field_i64(self.doc_id, id)
    }

    fn upsert(&self, id: i64, doc: TantivyDocument) -> Result<(), IndexError> {
        self.with_writer(|writer| {
            writer.delete_term(self.id_term(id));
            let staged = writer.add_document(doc).map(|_| ());
            self.finish(writer, staged)
        })
    }

    fn delete(&self, id: i64) -> Result<(), IndexError> {
        self.with_writer(|writer| {
            writer.delete_term(self.id_term(id));
            self.finish(writer, Ok(()))
        })
    }

    /// Commit staged operations, or roll them back if staging or the commit
    /// failed.
    ///
    /// Once the commit succeeded the write is durable and this returns `Ok`
    /// even if the reader could not be refreshed.
    fn finish(&self, writer: &mut IndexWriter, staged: tantivy::Result<()>) -> Result<(), IndexError> {
        match staged.and_then(|_| writer.commit().map(|_| ())) {
            Ok(()) => {
                self.refresh();
                Ok(())
            }
            Err(e) => {
                warn!("{} index write failed, rolling back: {}", self.name, e);
                if let Err(rollback_err) = writer.rollback() {
                    warn!("{} index rollback failed: {}", self.name, rollback_err);
                }
                Err(e.into())
            }
        }
    }

    /// Make committed documents visible to new searchers. A failure leaves the
    /// previous generation in place until the next successful reload.
    fn refresh(&self) {
        if let Err(e) = self.reader.reload() {
            warn!("{} index committed but reader reload failed: {}", self.name, e);
        }
    }

    fn searcher(&self) -> Searcher {
        self.reader.searcher()
    }
}

/// 双索引存储
///
/// Owns the ticket and comment indexes. Shared by reference or `Arc`, all
/// methods take `&self`.
pub struct IndexStore {
    tickets: TextIndex,
    comments: TextIndex,
    ticket_fields: TicketFields,
    comment_fields: CommentFields,
    /// Held shared while taking a searcher pair, exclusively while a rebuild
    /// swaps both readers
    visibility: RwLock<()>,
}

impl IndexStore {
    pub fn open(storage: IndexStorage, writer_memory: usize) -> Result<Self, IndexError> {
        let (ticket_schema, ticket_fields) = build_ticket_schema();
        let (comment_schema, comment_fields) = build_comment_schema();

        let tickets = TextIndex::open("tickets", &storage, ticket_schema, ticket_fields.doc_id, writer_memory)?;
        let comments = TextIndex::open("comments", &storage, comment_schema, comment_fields.doc_id, writer_memory)?;

        info!("index store ready ({:?})", storage);
        Ok(Self {
            tickets,
            comments,
            ticket_fields,
            comment_fields,
            visibility: RwLock::new(()),
        })
    }

    pub fn in_memory() -> Result<Self, IndexError> {
        Self::open(IndexStorage::InMemory, IndexConfig::default().writer_memory)
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self, IndexError> {
        Self::open(IndexStorage::from(config), config.writer_memory)
    }

    /// Insert or replace a ticket, visible to searches on return
    pub fn index_ticket(&self, ticket: &TicketRecord) -> Result<(), IndexError> {
        debug!("indexing ticket #{}", ticket.id);
        self.tickets.upsert(ticket.id, self.ticket_fields.to_document(ticket))
    }

    /// Insert or replace a comment. Returns `false` without touching the index
    /// when the comment does not belong to a ticket.
    pub fn index_comment(&self, comment: &CommentRecord) -> Result<bool, IndexError> {
        if !comment.is_ticket_comment() {
            debug!(
                "skipping comment #{} on {} #{}",
                comment.id,
                comment.target_type.as_str(),
                comment.target_id
            );
            return Ok(false);
        }
        debug!("indexing comment #{} on ticket #{}", comment.id, comment.target_id);
        self.comments
            .upsert(comment.id, self.comment_fields.to_document(comment))?;
        Ok(true)
    }

    /// Delete a document by id. Unknown ids are a no-op.
    pub fn remove_from_index(&self, content_type: ContentType, id: i64) -> Result<(), IndexError> {
        debug!("removing {} #{}", content_type, id);
        match content_type {
            ContentType::Ticket => self.tickets.delete(id),
            ContentType::Comment => self.comments.delete(id),
        }
    }

    /// Apply a lifecycle event from the ticket/comment services
    pub fn apply(&self, event: &RecordEvent) -> Result<(), IndexError> {
        match event {
            RecordEvent::Created(record) | RecordEvent::Updated(record) => match record {
                Record::Ticket(ticket) => self.index_ticket(ticket),
                Record::Comment(comment) => self.index_comment(comment).map(|_| ()),
            },
            RecordEvent::Deleted { content_type, id } => self.remove_from_index(*content_type, *id),
        }
    }

    pub fn rebuild_all(&self, source: &dyn RecordSource) -> Result<RebuildSummary, IndexError> {
        self.rebuild_all_with_progress(source, &AtomicBool::new(false), |_, _| {})
    }

    /// 全量重建
    ///
    /// Both writers stay locked for the whole run. `progress(done, total)` is
    /// called after each document; setting `cancel` stops the run between
    /// documents. On any failure both indexes keep their previous content.
    /// Searches see either the old pair of indexes or the new pair.
    pub fn rebuild_all_with_progress<F>(
        &self,
        source: &dyn RecordSource,
        cancel: &AtomicBool,
        progress: F,
    ) -> Result<RebuildSummary, IndexError>
    where
        F: Fn(usize, usize),
    {
        self.tickets.with_writer(|tickets_writer| {
            self.comments.with_writer(|comments_writer| {
                self.rebuild_locked(tickets_writer, comments_writer, source, cancel, &progress)
            })
        })
    }

    fn rebuild_locked(
        &self,
        tickets_writer: &mut IndexWriter,
        comments_writer: &mut IndexWriter,
        source: &dyn RecordSource,
        cancel: &AtomicBool,
        progress: &dyn Fn(usize, usize),
    ) -> Result<RebuildSummary, IndexError> {
        let tickets = source
            .all_tickets()
            .map_err(|e| IndexError::source_failure(ContentType::Ticket, e))?;
        let comments = source
            .all_ticket_comments()
            .map_err(|e| IndexError::source_failure(ContentType::Comment, e))?;

        info!(
            "rebuilding indexes from {} tickets and {} comments",
            tickets.len(),
            comments.len()
        );

        let result = self.stage_rebuild(tickets_writer, comments_writer, &tickets, &comments, cancel, progress);

        match result {
            Ok(summary) => {
                {
                    let _swap = self.visibility.write().unwrap_or_else(PoisonError::into_inner);
                    self.tickets.refresh();
                    self.comments.refresh();
                }
                info!(
                    "rebuild complete: {} tickets, {} comments, {} skipped",
                    summary.tickets, summary.comments, summary.skipped
                );
                Ok(summary)
            }
            Err(e) => {
                warn!("rebuild aborted, restoring previous index state: {}", e);
                for (name, writer) in [("tickets", tickets_writer), ("comments", comments_writer)] {
                    if let Err(rollback_err) = writer.rollback() {
                        warn!("{} index rollback failed: {}", name, rollback_err);
                    }
                }
                Err(e)
            }
        }
    }

    fn stage_rebuild(
        &self,
        tickets_writer: &mut IndexWriter,
        comments_writer: &mut IndexWriter,
        tickets: &[TicketRecord],
        comments: &[CommentRecord],
        cancel: &AtomicBool,
        progress: &dyn Fn(usize, usize),
    ) -> Result<RebuildSummary, IndexError> {
        let total = tickets.len() + comments.len();
        let mut done = 0;
        let mut summary = RebuildSummary::default();

        tickets_writer.delete_all_documents()?;
        comments_writer.delete_all_documents()?;

        for ticket in tickets {
            if cancel.load(Ordering::Relaxed) {
                return Err(IndexError::Cancelled { indexed: done, total });
            }
            tickets_writer.add_document(self.ticket_fields.to_document(ticket))?;
            summary.tickets += 1;
            done += 1;
            progress(done, total);
        }

        for comment in comments {
            if cancel.load(Ordering::Relaxed) {
                return Err(IndexError::Cancelled { indexed: done, total });
            }
            if comment.is_ticket_comment() {
                comments_writer.add_document(self.comment_fields.to_document(comment))?;
                summary.comments += 1;
            } else {
                summary.skipped += 1;
            }
            done += 1;
            progress(done, total);
        }

        if cancel.load(Ordering::Relaxed) {
            return Err(IndexError::Cancelled { indexed: done, total });
        }

        let prepared_tickets = tickets_writer.prepare_commit()?;
        let prepared_comments = match comments_writer.prepare_commit() {
            Ok(prepared) => prepared,
            Err(e) => {
                if let Err(abort_err) = prepared_tickets.abort() {
                    warn!("tickets index abort failed: {}", abort_err);
                }
                return Err(e.into());
            }
        };
        prepared_tickets.commit()?;
        prepared_comments.commit()?;

        Ok(summary)
    }

    pub fn stats(&self) -> IndexStats {
        let (tickets, comments) = self.searchers();
        IndexStats {
            tickets: tickets.num_docs(),
            comments: comments.num_docs(),
        }
    }

    /// Ticket and comment searchers from the same generation
    pub(crate) fn searchers(&self) -> (Searcher, Searcher) {
        let _read = self.visibility.read().unwrap_or_else(PoisonError::into_inner);
        (self.tickets.searcher(), self.comments.searcher())
    }

    pub(crate) fn ticket_fields(&self) -> &TicketFields {
        &self.ticket_fields
    }

    pub(crate) fn comment_fields(&self) -> &CommentFields {
        &self.comment_fields
    }
}
