//! minishell-flow: command-line front end for the flowchart model.
//!
//! Reads a JSON request from stdin, writes the parsed command and the
//! projected shell state to stdout.
//!
//! Request: `{"command": "cat f | wc -l", "step": 8, "environment": {"EDITOR": "vim"}}`
//!   - `step` defaults to the last step
//!   - `environment` is merged over the configured starting environment
//!
//! Flags:
//!   --dump-config       print the effective configuration as TOML
//!   --steps             print the step catalog as JSON
//!   --scenarios         print the scenario catalog as JSON, grouped by category
//!   --scenario <id>     project a canned scenario at its entry step
//!   --walk              project the stdin command at every step
//!   --source <path>     print one embedded C source file, e.g. src/lexer/lexer.c

use std::borrow::Cow;
use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use minishell_flow::config::Config;
use minishell_flow::scenarios::{self, ErrorScenario};
use minishell_flow::steps::{self, FlowStep, Narration};
use minishell_flow::{MAX_STEP, ParsedCommand, ShellState, logging, parse, project};

#[derive(Deserialize)]
struct FlowRequest {
    command: Option<String>,
    step: Option<usize>,
    #[serde(default)]
    environment: IndexMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowResponse<'a> {
    parsed: &'a ParsedCommand,
    step: usize,
    flow_step: Option<&'static FlowStep>,
    state: ShellState,
    /// One line per segment: builtin or fork/execve.
    descriptions: Vec<&'static str>,
    narration: Option<Narration>,
    /// C sources behind the current step, with their text.
    code: Vec<SourceView>,
}

#[derive(Serialize)]
struct SourceView {
    path: &'static str,
    functions: &'static [String],
    code: Cow<'static, str>,
}

#[derive(Serialize)]
struct ScenarioResponse<'a> {
    scenario: &'a ErrorScenario,
    #[serde(flatten)]
    flow: FlowResponse<'a>,
}

fn respond<'a>(parsed: &'a ParsedCommand, step: usize, initial: &ShellState) -> FlowResponse<'a> {
    let step = step.min(MAX_STEP);
    let flow_step = steps::step(step);
    let code: Vec<SourceView> = flow_step
        .map(|f| {
            f.sources
                .iter()
                .map(|s| SourceView {
                    path: &s.path,
                    functions: &s.functions,
                    code: steps::snippet_or_placeholder(&s.path),
                })
                .collect()
        })
        .unwrap_or_default();
    FlowResponse {
        parsed,
        step,
        flow_step,
        state: project(step, Some(parsed), initial),
        descriptions: parsed.commands.iter().map(|c| c.description()).collect(),
        narration: flow_step.map(|f| steps::narrate(f, parsed)),
        code,
    }
}

/// Print a value as JSON on stdout; exit 1 if it cannot be serialized.
fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("JSON encode error: {e}");
            std::process::exit(1);
        }
    }
}

fn read_request() -> FlowRequest {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read stdin");
        std::process::exit(1);
    }
    match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load();
    logging::init(&config);

    if args.iter().any(|a| a == "--dump-config") {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("failed to render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if args.iter().any(|a| a == "--steps") {
        emit(&steps::steps());
        return;
    }

    if let Some(pos) = args.iter().position(|a| a == "--source") {
        let Some(path) = args.get(pos + 1) else {
            eprintln!("--source requires a path");
            std::process::exit(1);
        };
        let Some(code) = steps::snippet(path) else {
            eprintln!("no embedded source for {path}");
            std::process::exit(1);
        };
        print!("{code}");
        return;
    }

    if args.iter().any(|a| a == "--scenarios") {
        let grouped: IndexMap<&str, Vec<&ErrorScenario>> = scenarios::categorized()
            .into_iter()
            .map(|(cat, list)| (cat.as_str(), list))
            .collect();
        emit(&grouped);
        return;
    }

    if let Some(pos) = args.iter().position(|a| a == "--scenario") {
        let Some(id) = args.get(pos + 1) else {
            eprintln!("--scenario requires an id");
            std::process::exit(1);
        };
        let Some(scenario) = scenarios::scenario(id) else {
            eprintln!("unknown scenario: {id}");
            std::process::exit(1);
        };
        let parsed = scenario.parse();
        logging::log_run(&scenario.command, scenario.entry_step(), &parsed);
        let initial = config.initial_state();
        emit(&ScenarioResponse {
            scenario,
            flow: respond(&parsed, scenario.entry_step(), &initial),
        });
        return;
    }

    let request = read_request();
    let command = request.command.unwrap_or_default();
    let initial = config
        .initial_state()
        .with_env_overrides(&request.environment);
    let parsed = parse(&command);

    if args.iter().any(|a| a == "--walk") {
        logging::log_run(&command, MAX_STEP, &parsed);
        let frames: Vec<FlowResponse> = (0..=MAX_STEP)
            .map(|step| respond(&parsed, step, &initial))
            .collect();
        emit(&frames);
        return;
    }

    let step = request.step.unwrap_or(MAX_STEP);
    logging::log_run(&command, step, &parsed);
    emit(&respond(&parsed, step, &initial));
}
