use super::types::ParseError;

/// Quote tracking shared by the validation, pipe-splitting and word scans.
///
/// Inside one kind of quote the other quote character is a literal.
/// Backslashes are ordinary characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QuoteState {
    single: bool,
    double: bool,
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance over one character, toggling quote state if it is a quote.
    pub fn feed(&mut self, c: char) {
        match c {
            '\'' if !self.double => self.single = !self.single,
            '"' if !self.single => self.double = !self.double,
            _ => {}
        }
    }

    /// True while inside either kind of quote.
    pub fn is_open(&self) -> bool {
        self.single || self.double
    }

    /// The error for whichever quote is still open, single quote first.
    pub fn unclosed(&self) -> Option<ParseError> {
        if self.single {
            Some(ParseError::UnclosedSingleQuote)
        } else if self.double {
            Some(ParseError::UnclosedDoubleQuote)
        } else {
            None
        }
    }
}

/// Scan the whole input and report an unterminated quote, if any.
pub fn check_unclosed_quotes(input: &str) -> Option<ParseError> {
    let mut state = QuoteState::new();
    for c in input.chars() {
        state.feed(c);
    }
    state.unclosed()
}

/// Split `input` at characters matching `is_sep` that sit outside quotes.
///
/// Quote characters stay in the pieces. Every piece, empty ones included,
/// is returned untrimmed.
pub fn split_unquoted(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut state = QuoteState::new();

    for c in input.chars() {
        state.feed(c);
        if !state.is_open() && is_sep(c) {
            pieces.push(std::mem::take(&mut buf));
        } else {
            buf.push(c);
        }
    }
    pieces.push(buf);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced() {
        assert_eq!(check_unclosed_quotes("echo 'a' \"b\""), None);
    }

    #[test]
    fn single_open() {
        assert_eq!(
            check_unclosed_quotes("echo 'abc"),
            Some(ParseError::UnclosedSingleQuote)
        );
    }

    #[test]
    fn double_open() {
        assert_eq!(
            check_unclosed_quotes("echo \"hello world"),
            Some(ParseError::UnclosedDoubleQuote)
        );
    }

    #[test]
    fn single_inside_double_is_literal() {
        assert_eq!(check_unclosed_quotes("echo \"it's\""), None);
    }

    #[test]
    fn double_inside_single_is_literal() {
        assert_eq!(check_unclosed_quotes("echo 'say \"hi'"), None);
    }

    #[test]
    fn backslash_does_not_escape() {
        assert_eq!(
            check_unclosed_quotes("echo \\'"),
            Some(ParseError::UnclosedSingleQuote)
        );
    }

    #[test]
    fn split_keeps_quoted_separator() {
        let parts = split_unquoted("a '|' b | c", |c| c == '|');
        assert_eq!(parts, vec!["a '|' b ", " c"]);
    }

    #[test]
    fn split_keeps_empty_pieces() {
        let parts = split_unquoted("|a|", |c| c == '|');
        assert_eq!(parts, vec!["", "a", ""]);
    }
}
