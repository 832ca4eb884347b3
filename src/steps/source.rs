//! Embedded C sources for the code viewer, keyed by their path in the
//! minishell tree.

use std::borrow::Cow;

macro_rules! sources {
    ($($path:literal),* $(,)?) => {
        &[$((
            concat!("src/", $path),
            include_str!(concat!("../../data/source/", $path)),
        )),*]
    };
}

static SOURCES: &[(&str, &str)] = sources![
    "builtins/builtin_cd.c",
    "builtins/builtin_echo.c",
    "builtins/builtin_exit.c",
    "core/join_continuation.c",
    "core/read_logical_line.c",
    "core/shell_loop.c",
    "core/shell_utils.c",
    "environment/env_utils.c",
    "executor/executor.c",
    "executor/executor_child_fds.c",
    "executor/executor_child_run.c",
    "executor/executor_commands.c",
    "expander/expander_core.c",
    "expander/expander_quotes.c",
    "history/history.c",
    "lexer/lexer.c",
    "lexer/lexer_operator.c",
    "lexer/lexer_unclose.c",
    "main/main.c",
    "parser/parser.c",
    "parser/parser_error.c",
    "parser/parser_pipeline.c",
    "parser/parser_syntax_check.c",
    "signals/signals.c",
];

/// Text of the file at `path` (`src/...`), if it is embedded.
pub fn snippet(path: &str) -> Option<&'static str> {
    SOURCES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, code)| *code)
}

/// Like [`snippet`], but a two-line C comment stands in for missing files.
pub fn snippet_or_placeholder(path: &str) -> Cow<'static, str> {
    match snippet(path) {
        Some(code) => Cow::Borrowed(code),
        None => Cow::Owned(format!(
            "// Source code not available for {path}\n// This file will be added in a future update."
        )),
    }
}
