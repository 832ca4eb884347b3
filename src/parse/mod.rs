pub mod quotes;
pub mod split;
pub mod tokenize;
pub mod types;

pub use quotes::{QuoteState, check_unclosed_quotes};
pub use split::{extract_redirections, parse, parse_segment, split_pipes};
pub use tokenize::{BUILTINS, describe, is_builtin, unquoted_words, words};
pub use types::{CommandSegment, ParseError, ParsedCommand, Redirection, RedirectionKind};
