//! Types produced by the command splitter and consumed by the state projector.

use serde::{Deserialize, Serialize};

/// Why the splitter rejected an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ParseError {
    /// Input was empty or whitespace-only.
    #[error("Empty command")]
    EmptyInput,
    /// A `'` was opened outside double quotes and never closed.
    #[error("Unclosed single quote (')")]
    UnclosedSingleQuote,
    /// A `"` was opened outside single quotes and never closed.
    #[error("Unclosed double quote (\")")]
    UnclosedDoubleQuote,
}

impl From<ParseError> for String {
    fn from(err: ParseError) -> Self {
        err.to_string()
    }
}

impl TryFrom<String> for ParseError {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        [
            ParseError::EmptyInput,
            ParseError::UnclosedSingleQuote,
            ParseError::UnclosedDoubleQuote,
        ]
        .into_iter()
        .find(|e| e.to_string() == value)
        .ok_or_else(|| format!("unknown parse error: {value}"))
    }
}

/// Redirection operator recognised inside a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedirectionKind {
    /// `<` — read stdin from a file
    #[serde(rename = "<")]
    Input,
    /// `>` — truncate and write stdout to a file
    #[serde(rename = ">")]
    Output,
    /// `>>` — append stdout to a file
    #[serde(rename = ">>")]
    Append,
    /// `<<` — here-document terminated by a delimiter word
    #[serde(rename = "<<")]
    Heredoc,
}

impl RedirectionKind {
    /// The operator's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectionKind::Input => "<",
            RedirectionKind::Output => ">",
            RedirectionKind::Append => ">>",
            RedirectionKind::Heredoc => "<<",
        }
    }

    /// Human-readable name, e.g. `"output redirection (>)"`.
    pub fn label(self) -> &'static str {
        match self {
            RedirectionKind::Input => "input redirection (<)",
            RedirectionKind::Output => "output redirection (>)",
            RedirectionKind::Append => "append redirection (>>)",
            RedirectionKind::Heredoc => "here-document (<<)",
        }
    }

    /// Map operator text back to a kind.
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            "<" => Some(RedirectionKind::Input),
            ">" => Some(RedirectionKind::Output),
            ">>" => Some(RedirectionKind::Append),
            "<<" => Some(RedirectionKind::Heredoc),
            _ => None,
        }
    }

    /// True for `>` and `>>`.
    pub fn is_output(self) -> bool {
        matches!(self, RedirectionKind::Output | RedirectionKind::Append)
    }
}

/// One redirection: the operator plus the word right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirection {
    #[serde(rename = "type")]
    pub kind: RedirectionKind,
    /// Filename or heredoc delimiter, unexpanded.
    pub target: String,
}

/// A single pipe-delimited command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSegment {
    /// First word after redirections are stripped; empty if there is none.
    pub name: String,
    /// Remaining words, quote characters retained.
    pub args: Vec<String>,
    pub is_built_in: bool,
    /// Redirections in the order their operators appear.
    pub redirections: Vec<Redirection>,
}

impl CommandSegment {
    /// True if the segment's name matches `name` ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn has_heredoc(&self) -> bool {
        self.redirections
            .iter()
            .any(|r| r.kind == RedirectionKind::Heredoc)
    }
}

/// Structured result of splitting one input line.
///
/// For `cat file | grep x > out`, there are two segments, `hasPipes` is set
/// and the second segment carries one output redirection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    /// Input text exactly as given.
    pub raw: String,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
    /// Segments in left-to-right pipe order; empty when invalid.
    pub commands: Vec<CommandSegment>,
    pub has_pipes: bool,
    pub has_redirection: bool,
    pub has_heredoc: bool,
}

impl ParsedCommand {
    /// A rejected input carrying its error.
    pub fn invalid(raw: &str, error: ParseError) -> Self {
        Self {
            raw: raw.to_string(),
            is_valid: false,
            error: Some(error),
            commands: Vec::new(),
            has_pipes: false,
            has_redirection: false,
            has_heredoc: false,
        }
    }

    /// A valid result; the summary flags are derived from `commands`.
    pub fn from_segments(raw: &str, commands: Vec<CommandSegment>) -> Self {
        let has_redirection = commands.iter().any(|c| !c.redirections.is_empty());
        let has_heredoc = commands.iter().any(CommandSegment::has_heredoc);
        Self {
            raw: raw.to_string(),
            is_valid: true,
            error: None,
            has_pipes: commands.len() > 1,
            has_redirection,
            has_heredoc,
            commands,
        }
    }

    /// First segment whose name matches `name` ignoring case.
    pub fn find_named(&self, name: &str) -> Option<&CommandSegment> {
        self.commands.iter().find(|c| c.is_named(name))
    }

    /// Number of `|` connections between segments.
    pub fn pipe_count(&self) -> usize {
        self.commands.len().saturating_sub(1)
    }
}
