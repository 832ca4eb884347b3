use std::sync::LazyLock;

use regex::Regex;

use super::quotes::{check_unclosed_quotes, split_unquoted};
use super::tokenize::{is_builtin, words};
use super::types::{CommandSegment, ParseError, ParsedCommand, Redirection, RedirectionKind};

/// Operator followed by optional whitespace and one non-whitespace word.
/// Alternation is leftmost-first, so `<<` and `>>` win over `<` and `>`.
static REDIRECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<<|>>|<|>)\s*(\S+)").expect("redirection pattern must compile")
});

/// Split a validated line at unquoted `|`.
///
/// Each segment is trimmed. A trailing empty segment is dropped; empty
/// segments anywhere else are kept.
pub fn split_pipes(input: &str) -> Vec<String> {
    let mut segments: Vec<String> = split_unquoted(input, |c| c == '|')
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// Pull redirections out of a segment.
///
/// Returns the redirections in order of appearance and the residual text.
/// Each match is removed by text, first occurrence, so an identical
/// operator+target appearing earlier in the segment is the one removed.
/// Quotes are not considered: `echo "a > b"` yields a redirection to `b"`.
pub fn extract_redirections(segment: &str) -> (Vec<Redirection>, String) {
    let mut redirections = Vec::new();
    let mut residual = segment.to_string();

    for caps in REDIRECTION.captures_iter(segment) {
        let (Some(whole), Some(op), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let Some(kind) = RedirectionKind::from_operator(op.as_str()) else {
            continue;
        };
        redirections.push(Redirection {
            kind,
            target: target.as_str().to_string(),
        });
        residual = residual.replacen(whole.as_str(), "", 1);
    }

    (redirections, residual)
}

/// Build one segment: strip redirections, then split the rest into words.
pub fn parse_segment(segment: &str) -> CommandSegment {
    let (redirections, residual) = extract_redirections(segment);
    let mut tokens = words(residual.trim()).into_iter();
    let name = tokens.next().unwrap_or_default();
    let args: Vec<String> = tokens.collect();

    CommandSegment {
        is_built_in: is_builtin(&name),
        name,
        args,
        redirections,
    }
}

/// Split a raw input line into pipe segments with redirections and words.
///
/// Only empty input and unterminated quotes are rejected. Malformed
/// redirections such as a trailing `>` are left in place as words.
pub fn parse(input: &str) -> ParsedCommand {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        log::debug!("rejecting empty input");
        return ParsedCommand::invalid(input, ParseError::EmptyInput);
    }

    if let Some(err) = check_unclosed_quotes(trimmed) {
        log::debug!("rejecting {trimmed:?}: {err}");
        return ParsedCommand::invalid(input, err);
    }

    let commands: Vec<CommandSegment> = split_pipes(trimmed)
        .iter()
        .map(|s| parse_segment(s))
        .collect();

    log::trace!("parsed {trimmed:?} into {} segment(s)", commands.len());
    ParsedCommand::from_segments(input, commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redir(kind: RedirectionKind, target: &str) -> Redirection {
        Redirection {
            kind,
            target: target.into(),
        }
    }

    #[test]
    fn split_simple() {
        assert_eq!(split_pipes("ls -la"), vec!["ls -la"]);
    }

    #[test]
    fn split_pipe() {
        assert_eq!(
            split_pipes("cat file.txt | grep text"),
            vec!["cat file.txt", "grep text"]
        );
    }

    #[test]
    fn split_quoted_pipe() {
        assert_eq!(split_pipes("echo 'a|b' | wc"), vec!["echo 'a|b'", "wc"]);
    }

    #[test]
    fn split_trailing_pipe_dropped() {
        assert_eq!(split_pipes("cat |"), vec!["cat"]);
    }

    #[test]
    fn split_middle_empty_kept() {
        assert_eq!(split_pipes("a | | b"), vec!["a", "", "b"]);
    }

    #[test]
    fn split_leading_empty_kept() {
        assert_eq!(split_pipes("| cat"), vec!["", "cat"]);
    }

    #[test]
    fn split_double_pipe_is_two_pipes() {
        assert_eq!(split_pipes("echo hello || cat"), vec!["echo hello", "", "cat"]);
    }

    #[test]
    fn redir_output() {
        let (r, rest) = extract_redirections("echo hello > output.txt");
        assert_eq!(r, vec![redir(RedirectionKind::Output, "output.txt")]);
        assert_eq!(rest.trim(), "echo hello");
    }

    #[test]
    fn redir_append_no_space() {
        let (r, _) = extract_redirections("echo hi >>log.txt");
        assert_eq!(r, vec![redir(RedirectionKind::Append, "log.txt")]);
    }

    #[test]
    fn redir_heredoc() {
        let (r, rest) = extract_redirections("cat << EOF");
        assert_eq!(r, vec![redir(RedirectionKind::Heredoc, "EOF")]);
        assert_eq!(rest.trim(), "cat");
    }

    #[test]
    fn redir_multiple_in_order() {
        let (r, rest) = extract_redirections("sort < in.txt > out.txt");
        assert_eq!(
            r,
            vec![
                redir(RedirectionKind::Input, "in.txt"),
                redir(RedirectionKind::Output, "out.txt"),
            ]
        );
        assert_eq!(rest.trim(), "sort");
    }

    #[test]
    fn redir_trailing_operator_left_as_word() {
        let (r, rest) = extract_redirections("echo hello >");
        assert!(r.is_empty());
        assert_eq!(rest, "echo hello >");
    }

    #[test]
    fn redir_duplicate_text_removes_first_occurrence() {
        let (r, rest) = extract_redirections("echo >a >a");
        assert_eq!(r.len(), 2);
        assert_eq!(rest.trim(), "echo");
    }

    #[test]
    fn segment_words_after_redirection() {
        let seg = parse_segment("> out.txt echo hi");
        assert_eq!(seg.name, "echo");
        assert_eq!(seg.args, vec!["hi"]);
        assert!(seg.is_built_in);
    }

    #[test]
    fn segment_empty() {
        let seg = parse_segment("");
        assert_eq!(seg.name, "");
        assert!(seg.args.is_empty());
        assert!(!seg.is_built_in);
    }

    #[test]
    fn parse_whitespace_only() {
        let parsed = parse(" \t\n ");
        assert!(!parsed.is_valid);
        assert_eq!(parsed.error, Some(ParseError::EmptyInput));
        assert_eq!(parsed.raw, " \t\n ");
    }

    #[test]
    fn parse_keeps_raw_untrimmed() {
        let parsed = parse("  ls  ");
        assert_eq!(parsed.raw, "  ls  ");
        assert_eq!(parsed.commands[0].name, "ls");
    }

    #[test]
    fn parse_lone_pipe_yields_one_empty_segment() {
        let parsed = parse("|");
        assert!(parsed.is_valid);
        assert_eq!(parsed.commands.len(), 1);
        assert_eq!(parsed.commands[0].name, "");
        assert!(!parsed.has_pipes);
    }
}
