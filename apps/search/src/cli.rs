use clap::{ArgAction, Args, Parser, Subcommand};
use query::StatusFilter;
use search_core::ContentType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search tickets and comments
    ///
    /// Free text plus inline filters: label:<name>, status:open|closed|all,
    /// assignee:<id>, creator:<id>
    Search {
        /// The query, e.g. `login bug status:open label:ui`
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Results per page, 0 for the configured default
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
        #[arg(short, long, default_value_t = 0)]
        offset: usize,
        /// Print the result page as JSON
        #[arg(long)]
        json: bool,
        /// Print how the query was parsed instead of searching
        #[arg(long)]
        explain: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Rebuild both indexes from a record snapshot
    Rebuild {
        /// JSON export with `tickets` and `comments` arrays (defaults to the configured snapshot)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Index (or re-index) a single ticket or comment
    Index {
        /// JSON record tagged with `"type": "ticket"` or `"type": "comment"`
        record: PathBuf,
    },
    /// Remove a single document from the index
    Remove {
        /// `ticket` or `comment`
        content_type: ContentType,
        id: i64,
    },
    /// Show index document counts
    Stats,
}

/// Filters given as flags. They add to the inline filters of the query, a flag
/// wins over an inline filter of the same kind.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Ticket must carry the label, repeat for several
    #[arg(long = "label", value_name = "NAME")]
    pub labels: Vec<String>,
    /// open, closed or all
    #[arg(long)]
    pub status: Option<StatusFilter>,
    /// Assigned user id
    #[arg(long, value_name = "ID")]
    pub assignee: Option<i64>,
    /// Author user id
    #[arg(long, value_name = "ID")]
    pub creator: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["ticket-search", "search", "login", "status:open", "-l", "5"]).unwrap();
        match cli.command {
            Some(Commands::Search { query, limit, .. }) => {
                assert_eq!(query, vec!["login", "status:open"]);
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_search_filter_flags() {
        let cli = Cli::try_parse_from([
            "ticket-search",
            "search",
            "login",
            "--label",
            "ui",
            "--label",
            "bug",
            "--status",
            "Closed",
            "--assignee",
            "5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Search { query, filters, .. }) => {
                assert_eq!(query, vec!["login"]);
                assert_eq!(filters.labels, vec!["ui", "bug"]);
                assert_eq!(filters.status, Some(StatusFilter::Closed));
                assert_eq!(filters.assignee, Some(5));
                assert_eq!(filters.creator, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_search_rejects_bad_filter_flags() {
        assert!(Cli::try_parse_from(["ticket-search", "search", "x", "--status", "pending"]).is_err());
        assert!(Cli::try_parse_from(["ticket-search", "search", "x", "--creator", "me"]).is_err());
    }

    #[test]
    fn test_remove_parses_content_type() {
        let cli = Cli::try_parse_from(["ticket-search", "remove", "comment", "12"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Remove {
                content_type: ContentType::Comment,
                id: 12
            })
        ));
        assert!(Cli::try_parse_from(["ticket-search", "remove", "discussion", "1"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["ticket-search", "-vv", "stats"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
