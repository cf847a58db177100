use super::{Command, open_engine_without_source};
use crate::cli::FilterArgs;
use crate::config::Config;
use crate::error::{Result, WrapErr};
use query::{FILTER_DEFINITIONS, StructuredQuery};
use search_core::SearchResultPage;

pub struct SearchCommand {
    config: Config,
    query: String,
    filters: FilterArgs,
    limit: usize,
    offset: usize,
    json: bool,
    explain: bool,
}

impl SearchCommand {
    pub fn new(
        cfg: Config,
        words: Vec<String>,
        filters: FilterArgs,
        limit: usize,
        offset: usize,
        json: bool,
        explain: bool,
    ) -> Self {
        Self {
            config: cfg,
            query: words.join(" "),
            filters,
            limit,
            offset,
            json,
            explain,
        }
    }
}

/// Parse the inline DSL and lay the flag filters over it
fn build_query(raw: &str, filters: &FilterArgs) -> StructuredQuery {
    let mut query = query::parse_query(raw);
    query.labels.extend(filters.labels.iter().cloned());
    if let Some(status) = filters.status {
        query.status = status;
    }
    if filters.assignee.is_some() {
        query.assignee_id = filters.assignee;
    }
    if filters.creator.is_some() {
        query.creator_id = filters.creator;
    }
    query
}

#[async_trait::async_trait]
impl Command for SearchCommand {
    async fn execute(&self) -> Result<()> {
        let structured = build_query(&self.query, &self.filters);

        if self.explain {
            println!("{}", serde_json::to_string_pretty(&structured)?);
            print_filter_help();
            return Ok(());
        }

        let engine = open_engine_without_source(&self.config)?;
        let limit = engine.config().paging.clamp_limit(self.limit);
        let page = engine
            .search_structured(&self.query, &structured.with_page(limit, self.offset))
            .wrap_err("Search failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&page)?);
        } else {
            print_page(&page, self.offset);
        }
        Ok(())
    }
}

fn filter_help() -> Vec<String> {
    FILTER_DEFINITIONS
        .iter()
        .map(|def| format!("  {:<16} {}", format!("{}:<value>", def.keyword), def.description))
        .collect()
}

fn print_filter_help() {
    println!("\nfilters:");
    for line in filter_help() {
        println!("{}", line);
    }
}

fn print_page(page: &SearchResultPage, offset: usize) {
    if page.is_empty() {
        println!("No results for {:?}", page.query);
        print_filter_help();
        return;
    }

    for (n, result) in page.results.iter().enumerate() {
        println!(
            "{:>3}. [{} #{}] {}",
            offset + n + 1,
            result.content_type(),
            result.id(),
            result.title()
        );
        println!("     {}", result.snippet().replace('\n', " | "));
    }
    println!(
        "\npage {}/{}, {} text matches for {:?}",
        page.current_page, page.total_pages, page.total, page.query
    );
}
