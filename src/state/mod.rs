pub mod project;
pub mod types;

pub use project::{HEREDOC_PREFIX, MAX_STEP, project};
pub use types::{
    FdKind, FdStatus, FileDescriptor, PROTECTED_VARS, Process, ProcessRole, ProcessStatus,
    ShellState,
};
