use std::path::PathBuf;

use indexmap::IndexMap;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::state::{Process, ProcessRole, ProcessStatus, ShellState};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub initial: InitialConfig,
    /// Starting environment, in display order.
    #[serde(default)]
    pub environment: IndexMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// One of off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log destination; `~` is expanded. Empty disables file logging.
    #[serde(default)]
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

/// Everything about the starting snapshot except the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InitialConfig {
    pub cwd: String,
    #[serde(default)]
    pub exit_status: i32,
    pub shell_pid: i32,
    pub shell_command: String,
}

impl Default for InitialConfig {
    fn default() -> Self {
        let state = ShellState::initial();
        Self {
            cwd: state.current_working_directory,
            exit_status: state.exit_status,
            shell_pid: 1234,
            shell_command: "minishell".into(),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    initial: InitialOverlay,
    #[serde(default)]
    environment: EnvironmentOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InitialOverlay {
    cwd: Option<String>,
    exit_status: Option<i32>,
    shell_pid: Option<i32>,
    shell_command: Option<String>,
}

/// `replace` and `remove` are reserved; every other key is a variable.
#[derive(Debug, Deserialize, Default)]
struct EnvironmentOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    remove: Vec<String>,
    #[serde(flatten)]
    vars: IndexMap<String, String>,
}

// ── Merge logic ──

/// Merge user variables into the default environment.
/// In replace mode: user table replaces defaults entirely.
/// In merge mode: remove keys first, then set (existing keys keep their slot).
fn merge_env(
    base: &mut IndexMap<String, String>,
    add: IndexMap<String, String>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
    } else {
        base.retain(|key, _| !remove.contains(key));
        base.extend(add);
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/minishell-flow/config.toml (if exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/minishell-flow/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/minishell-flow/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                // Logging is configured from this file, so it is not up yet.
                eprintln!("minishell-flow: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }

        let i = overlay.initial;
        if let Some(v) = i.cwd {
            self.initial.cwd = v;
        }
        if let Some(v) = i.exit_status {
            self.initial.exit_status = v;
        }
        if let Some(v) = i.shell_pid {
            self.initial.shell_pid = v;
        }
        if let Some(v) = i.shell_command {
            self.initial.shell_command = v;
        }

        let e = overlay.environment;
        merge_env(&mut self.environment, e.vars, &e.remove, e.replace);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }

    /// Configured log level; unknown names fall back to info.
    pub fn log_level(&self) -> LevelFilter {
        self.settings.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Log file with `~` expanded, or None when file logging is disabled.
    pub fn log_path(&self) -> Option<PathBuf> {
        let raw = self.settings.log_file.trim();
        if raw.is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(raw).into_owned()))
    }

    /// The snapshot every projection starts from.
    pub fn initial_state(&self) -> ShellState {
        ShellState {
            environment_vars: self.environment.clone(),
            current_working_directory: self.initial.cwd.clone(),
            exit_status: self.initial.exit_status,
            file_descriptors: ShellState::standard_fds(),
            processes: vec![Process {
                pid: self.initial.shell_pid,
                role: ProcessRole::Parent,
                command: Some(self.initial.shell_command.clone()),
                status: ProcessStatus::Running,
            }],
            heredoc_files: Vec::new(),
        }
    }

    /// Effective configuration rendered back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_builtin_initial_state() {
        let config = Config::default_config();
        assert_eq!(config.initial_state(), ShellState::initial());
    }

    #[test]
    fn default_settings() {
        let config = Config::default_config();
        assert_eq!(config.log_level(), LevelFilter::Info);
        let path = config.log_path().unwrap();
        assert!(path.ends_with(".local/share/minishell-flow/flow.log"));
    }

    #[test]
    fn overlay_adds_env_in_order() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [environment]
            EDITOR = "vim"
            LANG = "C"
        "#,
        );
        let keys: Vec<&str> = config.environment.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["USER", "HOME", "PATH", "PWD", "SHELL", "EDITOR", "LANG"]);
    }

    #[test]
    fn overlay_overrides_in_place() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [environment]
            USER = "guest"
        "#,
        );
        let first = config.environment.get_index(0);
        assert_eq!(
            first.map(|(k, v)| (k.as_str(), v.as_str())),
            Some(("USER", "guest"))
        );
    }

    #[test]
    fn overlay_remove() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [environment]
            remove = ["SHELL", "PATH"]
        "#,
        );
        assert_eq!(config.environment.len(), 3);
        assert!(!config.environment.contains_key("PATH"));
    }

    #[test]
    fn overlay_replace_env() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [environment]
            replace = true
            HOME = "/root"
        "#,
        );
        assert_eq!(config.environment.len(), 1);
        assert_eq!(config.initial_state().env("HOME"), Some("/root"));
    }

    #[test]
    fn overlay_initial_scalars() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [initial]
            cwd = "/tmp"
            exit_status = 1
        "#,
        );
        let state = config.initial_state();
        assert_eq!(state.current_working_directory, "/tmp");
        assert_eq!(state.exit_status, 1);
        assert_eq!(state.processes[0].pid, 1234);
    }

    #[test]
    fn overlay_settings() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            log_level = "trace"
            log_file = ""
        "#,
        );
        assert_eq!(config.log_level(), LevelFilter::Trace);
        assert!(config.log_path().is_none());
    }

    #[test]
    fn unknown_level_falls_back() {
        let mut config = Config::default_config();
        config.settings.log_level = "chatty".into();
        assert_eq!(config.log_level(), LevelFilter::Info);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.initial_state(), Config::default_config().initial_state());
    }

    #[test]
    fn dump_round_trips() {
        let config = Config::default_config();
        let text = config.to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.environment, config.environment);
    }
}
