//! The 21-step execution pipeline shown in the flowchart, plus a cursor over it.
//!
//! Each step carries its reference data (inputs, outputs, structures touched,
//! allocations, error paths, edge cases), the C sources that implement it
//! ([`snippet`]), and a per-command walkthrough ([`narrate()`]).

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::state::MAX_STEP;

mod narrate;
mod source;

pub use narrate::{Narration, narrate};
pub use source::{snippet, snippet_or_placeholder};

/// Embedded step catalog.
const STEPS_TOML: &str = include_str!("../../data/steps.toml");

static STEPS: LazyLock<Vec<FlowStep>> = LazyLock::new(|| {
    let catalog: StepCatalog =
        toml::from_str(STEPS_TOML).expect("embedded step catalog must parse");
    catalog.steps
});

#[derive(Debug, Deserialize)]
struct StepCatalog {
    steps: Vec<FlowStep>,
}

/// Flowchart node shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Start,
    Process,
    Decision,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    Control,
    Parsing,
    Execution,
    Cleanup,
}

/// A source file that implements part of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Path within the minishell tree, e.g. `src/lexer/lexer.c`.
    pub path: String,
    pub functions: Vec<String>,
    pub description: String,
}

impl SourceRef {
    /// Embedded text of this file, if the catalog ships it.
    pub fn code(&self) -> Option<&'static str> {
        snippet(&self.path)
    }
}

/// A C structure the step reads or builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStructure {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryOpKind {
    Malloc,
    Free,
    Realloc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryOperation {
    pub kind: MemoryOpKind,
    pub description: String,
}

/// A failure the step checks for and what it does about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorHandling {
    pub condition: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub kind: StepKind,
    pub category: StepCategory,
    /// Source directory, e.g. `src/lexer/`.
    pub module: String,
    /// Primary source file within `module`.
    pub file: String,
    pub input_data: String,
    pub output_data: String,
    #[serde(default)]
    pub data_structures: Vec<DataStructure>,
    #[serde(default)]
    pub memory_operations: Vec<MemoryOperation>,
    #[serde(default)]
    pub error_handling: Vec<ErrorHandling>,
    #[serde(default)]
    pub edge_cases: Vec<String>,
    #[serde(default)]
    pub related_functions: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl FlowStep {
    /// `module` and `file` joined, e.g. `src/lexer/lexer.c`.
    pub fn path(&self) -> String {
        format!("{}{}", self.module, self.file)
    }
}

/// All steps, indexed by id.
pub fn steps() -> &'static [FlowStep] {
    &STEPS
}

/// Look up a step by id.
pub fn step(id: usize) -> Option<&'static FlowStep> {
    STEPS.get(id)
}

/// Position of the flowchart animation. Always within `0..=MAX_STEP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stepper {
    current: usize,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Move forward one step. Returns false when already at the end.
    pub fn advance(&mut self) -> bool {
        if self.current >= MAX_STEP {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back one step. Returns false when already at the start.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump straight to `step`, clamped to the last step.
    pub fn jump(&mut self, step: usize) {
        self.current = step.min(MAX_STEP);
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.current == MAX_STEP
    }

    /// Catalog entry for the current position.
    pub fn flow_step(&self) -> Option<&'static FlowStep> {
        step(self.current)
    }
}
