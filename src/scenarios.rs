//! Canned error scenarios: a command, what minishell should print, and the
//! pipeline steps it exercises.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::parse::{self, ParsedCommand};

/// Embedded scenario catalog.
const SCENARIOS_TOML: &str = include_str!("../data/scenarios.toml");

static SCENARIOS: LazyLock<Vec<ErrorScenario>> = LazyLock::new(|| {
    let catalog: ScenarioCatalog =
        toml::from_str(SCENARIOS_TOML).expect("embedded scenario catalog must parse");
    catalog.scenarios
});

#[derive(Debug, Deserialize)]
struct ScenarioCatalog {
    scenarios: Vec<ErrorScenario>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    Syntax,
    Memory,
    Signals,
    Exit,
    Redirections,
    Pipes,
    Builtins,
    Quotes,
}

impl ScenarioCategory {
    /// Display order of the scenario browser.
    pub const ALL: [ScenarioCategory; 8] = [
        ScenarioCategory::Syntax,
        ScenarioCategory::Exit,
        ScenarioCategory::Signals,
        ScenarioCategory::Redirections,
        ScenarioCategory::Pipes,
        ScenarioCategory::Builtins,
        ScenarioCategory::Memory,
        ScenarioCategory::Quotes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioCategory::Syntax => "syntax",
            ScenarioCategory::Memory => "memory",
            ScenarioCategory::Signals => "signals",
            ScenarioCategory::Exit => "exit",
            ScenarioCategory::Redirections => "redirections",
            ScenarioCategory::Pipes => "pipes",
            ScenarioCategory::Builtins => "builtins",
            ScenarioCategory::Quotes => "quotes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorScenario {
    pub id: String,
    pub category: ScenarioCategory,
    pub title: String,
    pub description: String,
    pub command: String,
    pub expected_behavior: String,
    /// Empty when the scenario prints nothing.
    #[serde(default)]
    pub error_message: String,
    pub exit_code: i32,
    #[serde(default)]
    pub affected_steps: Vec<usize>,
    pub recovery_action: String,
    /// What changed in v0.29 to handle this case, if anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_note: Option<String>,
}

impl ErrorScenario {
    /// Step the flowchart jumps to when this scenario is selected.
    pub fn entry_step(&self) -> usize {
        self.affected_steps.first().copied().unwrap_or(0)
    }

    /// Run the scenario's command through the splitter.
    pub fn parse(&self) -> ParsedCommand {
        parse::parse(&self.command)
    }
}

pub fn scenarios() -> &'static [ErrorScenario] {
    &SCENARIOS
}

pub fn scenario(id: &str) -> Option<&'static ErrorScenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

pub fn by_category(category: ScenarioCategory) -> Vec<&'static ErrorScenario> {
    SCENARIOS.iter().filter(|s| s.category == category).collect()
}

/// Every category in display order with its scenarios; empty categories included.
pub fn categorized() -> Vec<(ScenarioCategory, Vec<&'static ErrorScenario>)> {
    ScenarioCategory::ALL
        .into_iter()
        .map(|c| (c, by_category(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseError;
    use crate::state::MAX_STEP;

    #[test]
    fn catalog_loads() {
        assert_eq!(scenarios().len(), 24);
    }

    #[test]
    fn ids_unique() {
        let mut ids: Vec<&str> = scenarios().iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), scenarios().len());
    }

    #[test]
    fn affected_steps_in_range() {
        for s in scenarios() {
            assert!(s.affected_steps.iter().all(|&n| n <= MAX_STEP), "{}", s.id);
        }
    }

    #[test]
    fn lookup() {
        let s = scenario("exit-too-many-args").unwrap();
        assert_eq!(s.exit_code, 1);
        assert_eq!(s.entry_step(), 16);
        assert!(s.fix_note.is_some());
        assert!(scenario("no-such-scenario").is_none());
    }

    #[test]
    fn categorized_covers_everything() {
        let groups = categorized();
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0].0, ScenarioCategory::Syntax);
        let total: usize = groups.iter().map(|(_, v)| v.len()).sum();
        assert_eq!(total, scenarios().len());
        assert_eq!(by_category(ScenarioCategory::Pipes).len(), 1);
    }

    #[test]
    fn unclosed_quote_scenario_is_rejected() {
        let parsed = scenario("syntax-unclosed-quote").unwrap().parse();
        assert_eq!(parsed.error, Some(ParseError::UnclosedDoubleQuote));
    }

    #[test]
    fn mixed_quote_scenario_is_accepted() {
        let parsed = scenario("quotes-mixed").unwrap().parse();
        assert!(parsed.is_valid);
        assert_eq!(parsed.commands[0].args, vec!["\"hello 'world'\""]);
    }

    #[test]
    fn long_command_scenario() {
        let s = scenario("memory-malloc-fail").unwrap();
        assert_eq!(s.command.len(), 1005);
    }
}
