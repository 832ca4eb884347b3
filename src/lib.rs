//! minishell-flow: a step-by-step model of how minishell runs one command line.
//!
//! The crate splits a command line into pipe segments and derives, for any of
//! the 21 pipeline steps, what the simulated shell's state (environment,
//! working directory, file descriptors, processes, heredoc temp files) looks
//! like at that point. Nothing is executed; both halves are pure functions.
//!
//! # Architecture
//!
//! - **[`parse`]** — Command splitter: quote-aware pipe splitting, redirection extraction, words.
//! - **[`state`]** — Step-state projector: snapshot types and the per-step derivation.
//! - **[`steps`]** — The 21-step catalog, a cursor over it, embedded C sources, per-command narration.
//! - **[`scenarios`]** — Canned error scenarios with their expected output.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Run logging to `~/.local/share/minishell-flow/flow.log`.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// File-based run logging.
pub mod logging;
/// Command splitting: quote tracking, pipes, redirections, words.
pub mod parse;
/// Canned error scenario catalog.
pub mod scenarios;
/// Simulated shell state and the step projector.
pub mod state;
/// Pipeline step catalog.
pub mod steps;

pub use parse::{ParsedCommand, parse};
pub use state::{MAX_STEP, ShellState, project};

/// Split `input` and project it at `step` from the default starting snapshot.
///
/// This is the main entry point for tests and simple usage.
/// For configured starting state, build it with [`config::Config::initial_state`].
pub fn state_at_step(step: usize, input: &str) -> ShellState {
    let parsed = parse(input);
    project(step, Some(&parsed), &ShellState::initial())
}
