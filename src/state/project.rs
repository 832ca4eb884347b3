use crate::parse::{ParsedCommand, RedirectionKind};

use super::types::{FdKind, FileDescriptor, Process, ProcessRole, ProcessStatus, ShellState};

/// Highest step index in the pipeline.
pub const MAX_STEP: usize = 20;

/// Path prefix of the synthetic heredoc temp files.
pub const HEREDOC_PREFIX: &str = "/tmp/tmp_shell_";

const FIRST_PIPE_FD: i32 = 3;
const FIRST_HEREDOC_FD: i32 = 10;
const FIRST_REDIR_FD: i32 = 20;
const FIRST_CHILD_PID: i32 = 2000;

/// Step thresholds at which each mutation group starts to apply.
mod at {
    pub const EXPAND: usize = 3;
    pub const PIPES: usize = 4;
    pub const HEREDOC: usize = 5;
    pub const REDIRECT: usize = 6;
    pub const FORK: usize = 8;
    pub const BUILTIN_FORK: usize = 10;
    pub const RUNNING: usize = 11;
    pub const WAIT: usize = 12;
    pub const HEREDOC_CLEANUP: usize = 13;
    pub const CLOSE_FDS: usize = 14;
}

/// Derive the simulated shell state after progressing to `step`.
///
/// Starts from a fresh copy of `initial` every call and applies every
/// mutation group whose threshold `step` has reached. With no command, or an
/// invalid one, the copy is returned untouched.
pub fn project(step: usize, command: Option<&ParsedCommand>, initial: &ShellState) -> ShellState {
    let mut state = initial.clone();

    let Some(cmd) = command.filter(|c| c.is_valid) else {
        return state;
    };

    if step >= at::EXPAND {
        apply_export(&mut state, cmd);
        apply_unset(&mut state, cmd);
    }
    if step >= at::PIPES && cmd.has_pipes {
        open_pipes(&mut state, cmd);
    }
    if step >= at::HEREDOC && cmd.has_heredoc {
        open_heredocs(&mut state, cmd);
    }
    if step >= at::REDIRECT && cmd.has_redirection {
        open_redirections(&mut state, cmd);
    }
    if (at::FORK..at::WAIT).contains(&step) {
        spawn_children(&mut state, cmd, step);
    }
    if step >= at::WAIT {
        reap_children(&mut state);
    }
    if step >= at::HEREDOC_CLEANUP {
        state.heredoc_files.clear();
        state
            .file_descriptors
            .retain(|f| !f.target.as_deref().is_some_and(|t| t.starts_with(HEREDOC_PREFIX)));
    }
    if step >= at::CLOSE_FDS {
        state.file_descriptors.retain(|f| f.kind.is_standard());
    }
    if step >= at::FORK {
        apply_cd(&mut state, cmd);
    }

    state
}

/// `export KEY=VALUE ...` on the first export segment.
fn apply_export(state: &mut ShellState, cmd: &ParsedCommand) {
    let Some(export) = cmd.find_named("export") else {
        return;
    };
    for arg in &export.args {
        // KEY=VALUE takes the field between the first and second `=`.
        let mut fields = arg.split('=');
        let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        let value: String = value.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
        log::trace!("export {key}={value}");
        state.environment_vars.insert(key.to_string(), value);
    }
}

/// `unset NAME ...` on the first unset segment.
fn apply_unset(state: &mut ShellState, cmd: &ParsedCommand) {
    let Some(unset) = cmd.find_named("unset") else {
        return;
    };
    for arg in &unset.args {
        if state.environment_vars.shift_remove(arg).is_some() {
            log::trace!("unset {arg}");
        }
    }
}

/// One read/write pair per `|`: fds 3+2i and 4+2i.
fn open_pipes(state: &mut ShellState, cmd: &ParsedCommand) {
    for i in 0..cmd.pipe_count() {
        let base = FIRST_PIPE_FD + 2 * i as i32;
        let target = format!("pipe_{i}");
        state
            .file_descriptors
            .push(FileDescriptor::open(base, FdKind::PipeRead, target.clone()));
        state
            .file_descriptors
            .push(FileDescriptor::open(base + 1, FdKind::PipeWrite, target));
    }
    log::trace!("opened {} pipe(s)", cmd.pipe_count());
}

/// One temp file and read fd per segment that has a heredoc.
fn open_heredocs(state: &mut ShellState, cmd: &ParsedCommand) {
    let segments = cmd.commands.iter().filter(|c| c.has_heredoc());
    for (idx, _) in segments.enumerate() {
        let path = format!("{HEREDOC_PREFIX}{idx}");
        state.heredoc_files.push(path.clone());
        state.file_descriptors.push(FileDescriptor::open(
            FIRST_HEREDOC_FD + idx as i32,
            FdKind::FileRead,
            path,
        ));
    }
}

/// File fds for `<`, `>` and `>>`, numbered from 20 in scan order.
/// Heredocs are handled by [`open_heredocs`] and take no number here.
fn open_redirections(state: &mut ShellState, cmd: &ParsedCommand) {
    let mut next_fd = FIRST_REDIR_FD;
    for redir in cmd.commands.iter().flat_map(|c| c.redirections.iter()) {
        let kind = match redir.kind {
            RedirectionKind::Input => FdKind::FileRead,
            RedirectionKind::Output | RedirectionKind::Append => FdKind::FileWrite,
            RedirectionKind::Heredoc => continue,
        };
        state
            .file_descriptors
            .push(FileDescriptor::open(next_fd, kind, redir.target.clone()));
        next_fd += 1;
    }
}

/// Children for the fork window. Builtins only get a child from step 10 on.
fn spawn_children(state: &mut ShellState, cmd: &ParsedCommand, step: usize) {
    let status = if step == at::RUNNING {
        ProcessStatus::Running
    } else {
        ProcessStatus::Waiting
    };
    for (idx, segment) in cmd.commands.iter().enumerate() {
        if segment.is_built_in && step < at::BUILTIN_FORK {
            continue;
        }
        state.processes.push(Process {
            pid: FIRST_CHILD_PID + idx as i32,
            role: ProcessRole::Child,
            command: Some(segment.name.clone()),
            status,
        });
    }
}

/// Every child completes and the pipeline reports success.
fn reap_children(state: &mut ShellState) {
    for proc in state
        .processes
        .iter_mut()
        .filter(|p| p.role == ProcessRole::Child)
    {
        proc.status = ProcessStatus::Completed;
    }
    state.exit_status = 0;
}

/// Move the working directory for the first `cd` segment and mirror it in PWD.
fn apply_cd(state: &mut ShellState, cmd: &ParsedCommand) {
    let Some(cd) = cmd.find_named("cd") else {
        return;
    };
    let home = state.env("HOME").map(str::to_string);
    let Some(target) = cd.args.first().cloned().or_else(|| home.clone()) else {
        log::debug!("cd without argument and no HOME; directory unchanged");
        return;
    };

    let cwd = &state.current_working_directory;
    let resolved = if target == ".." {
        match cwd.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => parent.to_string(),
            _ => "/".to_string(),
        }
    } else if target.starts_with('/') {
        target
    } else if target == "~" {
        let Some(home) = home else {
            log::debug!("cd ~ with HOME unset; directory unchanged");
            return;
        };
        home
    } else {
        format!("{cwd}/{target}")
    };

    log::trace!("cd {} -> {resolved}", state.current_working_directory);
    state.current_working_directory = resolved.clone();
    state.environment_vars.insert("PWD".into(), resolved);
}
