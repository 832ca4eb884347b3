//! Snapshot types for the simulated shell.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Variables the state panel refuses to delete. Not enforced by the projector.
pub const PROTECTED_VARS: &[&str] = &["USER", "HOME", "PATH", "PWD", "SHELL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdKind {
    Stdin,
    Stdout,
    Stderr,
    PipeRead,
    PipeWrite,
    FileRead,
    FileWrite,
}

impl FdKind {
    /// stdin, stdout or stderr.
    pub fn is_standard(self) -> bool {
        matches!(self, FdKind::Stdin | FdKind::Stdout | FdKind::Stderr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub fd: i32,
    #[serde(rename = "type")]
    pub kind: FdKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub status: FdStatus,
}

impl FileDescriptor {
    /// An open descriptor pointing at `target`.
    pub fn open(fd: i32, kind: FdKind, target: impl Into<String>) -> Self {
        Self {
            fd,
            kind,
            target: Some(target.into()),
            status: FdStatus::Open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    Parent,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Running,
    Waiting,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: i32,
    #[serde(rename = "type")]
    pub role: ProcessRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub status: ProcessStatus,
}

/// Everything the state panel shows for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellState {
    /// Case-sensitive, insertion-ordered.
    pub environment_vars: IndexMap<String, String>,
    pub current_working_directory: String,
    /// Conceptually 0-255; never clamped.
    pub exit_status: i32,
    /// Creation order.
    pub file_descriptors: Vec<FileDescriptor>,
    /// Creation order.
    pub processes: Vec<Process>,
    pub heredoc_files: Vec<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::initial()
    }
}

impl ShellState {
    /// The snapshot a freshly started minishell would show.
    pub fn initial() -> Self {
        let environment_vars = [
            ("USER", "mansoor"),
            ("HOME", "/home/mansoor"),
            ("PATH", "/usr/local/bin:/usr/bin:/bin"),
            ("PWD", "/home/mansoor/minishell"),
            ("SHELL", "/home/mansoor/minishell/minishell"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            environment_vars,
            current_working_directory: "/home/mansoor/minishell".into(),
            exit_status: 0,
            file_descriptors: Self::standard_fds(),
            processes: vec![Process {
                pid: 1234,
                role: ProcessRole::Parent,
                command: Some("minishell".into()),
                status: ProcessStatus::Running,
            }],
            heredoc_files: Vec::new(),
        }
    }

    /// fds 0, 1 and 2 attached to the terminal.
    pub fn standard_fds() -> Vec<FileDescriptor> {
        vec![
            FileDescriptor::open(0, FdKind::Stdin, "terminal"),
            FileDescriptor::open(1, FdKind::Stdout, "terminal"),
            FileDescriptor::open(2, FdKind::Stderr, "terminal"),
        ]
    }

    /// Merge caller-edited variables over this snapshot's environment.
    ///
    /// Existing keys keep their position; new keys are appended in the
    /// order given.
    pub fn with_env_overrides(mut self, overrides: &IndexMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.environment_vars.insert(key.clone(), value.clone());
        }
        self
    }

    /// True for one of [`PROTECTED_VARS`].
    pub fn is_protected(key: &str) -> bool {
        PROTECTED_VARS.contains(&key)
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment_vars.get(key).map(String::as_str)
    }

    /// Variables the user added on top of `base`, or changed from it.
    pub fn custom_vars(&self, base: &ShellState) -> IndexMap<String, String> {
        self.environment_vars
            .iter()
            .filter(|(k, v)| base.environment_vars.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
