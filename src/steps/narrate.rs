//! Per-step walkthrough of one command: what the step receives, what it
//! does with this particular command, and what it hands on.

use serde::Serialize;

use super::FlowStep;
use crate::parse::ParsedCommand;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narration {
    pub input: String,
    pub processing: Vec<String>,
    pub output: String,
    /// Short account of where the command is in the pipeline.
    pub summary: Vec<String>,
}

/// Describe what `step` does to `cmd`.
///
/// Segment-dependent lines look at the first segment only, matching the
/// builtin dispatch at steps 15 to 17. Invalid commands have no segments
/// and get the generic lines.
pub fn narrate(step: &FlowStep, cmd: &ParsedCommand) -> Narration {
    Narration {
        input: input(step.id, cmd),
        processing: processing(step.id, cmd),
        output: output(step.id, cmd),
        summary: summary(step.id, cmd),
    }
}

fn names(cmd: &ParsedCommand, sep: &str) -> String {
    cmd.commands
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

fn first_is_builtin(cmd: &ParsedCommand) -> bool {
    cmd.commands.first().is_some_and(|c| c.is_built_in)
}

fn input(id: usize, cmd: &ParsedCommand) -> String {
    match id {
        0..=10 => cmd.raw.clone(),
        11 | 12 => format!("Tokens: [{}]", names(cmd, ", ")),
        13 => format!("Pipeline: {} command(s)", cmd.commands.len()),
        _ => format!("Expanded: {}", names(cmd, " | ")),
    }
}

fn processing(id: usize, cmd: &ParsedCommand) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut push = |s: &str| lines.push(s.to_string());

    match id {
        0 => {
            push("Shell initialization");
            push("Environment setup");
        }
        1..=4 => {
            push("Signal handlers configured");
            push("Terminal settings applied");
            push("History loaded");
        }
        5 => {
            push("Waiting for user input");
            push("Readline prompt displayed");
        }
        6 => {
            push(&format!("Line length: {} characters", cmd.raw.chars().count()));
            if cmd.raw.trim().is_empty() {
                push("Empty line detected");
            } else {
                push("Non-empty line detected");
            }
        }
        7 => {
            push("Adding to command history");
            push("History file will be updated on exit");
        }
        8 => {
            push("Starting line processing");
            push("Will tokenize → parse → expand → execute");
        }
        9 => {
            push("Checking for unclosed quotes");
            if cmd.raw.contains(['"', '\'']) {
                push("Quotes found and validated");
            } else {
                push("No quotes found");
            }
        }
        10 => {
            push(&format!("Tokenizing into {} command(s)", cmd.commands.len()));
            if cmd.has_pipes {
                push("Pipe operator detected");
            }
            if cmd.has_redirection {
                push("Redirection(s) detected");
            }
        }
        11 => {
            push("Validating syntax");
            push("Checking for invalid operators");
            push("Syntax validation passed");
        }
        12 => {
            push("Building pipeline structure");
            push(&format!("Created {} command node(s)", cmd.commands.len()));
            if cmd.has_pipes {
                push("Pipe connections established");
            }
        }
        13 => {
            push("Expanding environment variables");
            push("Processing wildcards");
            push("Removing quotes");
        }
        14 => {
            push("Setting up execution environment");
            if cmd.has_pipes {
                push(&format!("Creating {} pipe(s)", cmd.pipe_count()));
            }
            push("Preparing file descriptors");
        }
        15 => {
            if let Some(first) = cmd.commands.first() {
                push(&format!("Checking if '{}' is a built-in", first.name));
                if first.is_built_in {
                    push("Built-in command detected");
                } else {
                    push("External command detected");
                }
            }
        }
        16 => {
            if let Some(first) = cmd.commands.first().filter(|c| c.is_built_in) {
                push(&format!("Executing built-in: {}", first.name));
                push("Running in parent process");
                push("Can modify shell state");
            }
        }
        17 => {
            if cmd.commands.first().is_some_and(|c| !c.is_built_in) {
                push("Forking child process");
                push("Searching PATH for executable");
                push("Calling execve()");
            }
        }
        18 => {
            push("Waiting for child processes");
            push("Collecting exit statuses");
        }
        19 => {
            push("Freeing pipeline memory");
            push("Closing file descriptors");
            push("Cleaning up resources");
        }
        _ => {
            push("Command execution complete");
            push("Ready for next command");
        }
    }

    lines
}

fn output(id: usize, cmd: &ParsedCommand) -> String {
    match id {
        0..=5 => "Waiting for input...".into(),
        6 if cmd.raw.trim().is_empty() => "Line rejected (empty)".into(),
        6 => "Line accepted".into(),
        7 => "Added to history".into(),
        8 => "Processing started".into(),
        9 => "Quotes validated".into(),
        10 => format!("Tokens: [{}]", names(cmd, ", ")),
        11 => "Syntax OK".into(),
        12 => format!("Pipeline with {} command(s)", cmd.commands.len()),
        13 => "Variables expanded, quotes removed".into(),
        14 => "Execution environment ready".into(),
        15 if first_is_builtin(cmd) => "Built-in".into(),
        15 => "External".into(),
        16 => match cmd.commands.first().filter(|c| c.is_built_in) {
            Some(first) => format!("{} executed", first.name),
            None => "N/A".into(),
        },
        17 if first_is_builtin(cmd) => "N/A".into(),
        17 => "Child process created".into(),
        18 => "Exit status collected".into(),
        19 => "Memory freed".into(),
        _ => "minishell> ".into(),
    }
}

fn summary(id: usize, cmd: &ParsedCommand) -> Vec<String> {
    match id {
        0..=5 => vec!["The shell is initializing and preparing to read your input".into()],
        6..=9 => vec![format!("Your input \"{}\" is being validated", cmd.raw)],
        10..=12 => vec![format!(
            "Tokenizing and parsing: {} command(s) detected",
            cmd.commands.len()
        )],
        13 => vec!["Expanding variables and wildcards in your command".into()],
        14..=18 => {
            let mut lines = vec![format!("Executing: {}", names(cmd, " | "))];
            if cmd.has_pipes {
                lines.push(format!("Setting up {} pipe(s)", cmd.pipe_count()));
            }
            if cmd.has_redirection {
                lines.push("Handling redirections".into());
            }
            lines
        }
        _ => vec!["Cleaning up resources used by your command".into()],
    }
}
