pub mod filter;
pub mod lexer;
pub mod parser;
pub mod structured;

pub use filter::{FilterKind, StatusFilter, FILTER_DEFINITIONS};
pub use lexer::{QueryLexer, Token};
pub use parser::parse_query;
pub use structured::{DEFAULT_LIMIT, StructuredQuery};
