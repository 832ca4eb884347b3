use super::quotes::split_unquoted;
use super::types::CommandSegment;

/// Commands the shell runs in-process instead of via fork/execve.
pub const BUILTINS: &[&str] = &["cd", "echo", "pwd", "export", "unset", "env", "exit"];

/// Case-insensitive membership test against [`BUILTINS`].
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|b| b.eq_ignore_ascii_case(name))
}

/// Split text into words at unquoted whitespace. Quote characters are kept.
pub fn words(text: &str) -> Vec<String> {
    split_unquoted(text, char::is_whitespace)
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect()
}

/// Words with quotes removed, as the expander step would hand them to execve.
///
/// Uses shlex (POSIX word splitting); falls back to the raw words when shlex
/// rejects the text.
pub fn unquoted_words(segment: &CommandSegment) -> Vec<String> {
    let mut raw = Vec::with_capacity(segment.args.len() + 1);
    if !segment.name.is_empty() {
        raw.push(segment.name.clone());
    }
    raw.extend(segment.args.iter().cloned());

    let joined = raw.join(" ");
    shlex::split(&joined).unwrap_or(raw)
}

/// One-line description of what running this segment involves.
pub fn describe(segment: &CommandSegment) -> &'static str {
    if !segment.is_built_in {
        return "External command - will be executed via fork() and execve()";
    }
    match segment.name.to_ascii_lowercase().as_str() {
        "cd" => "Change directory - modifies the current working directory",
        "echo" => "Display text - prints arguments to standard output",
        "pwd" => "Print working directory - shows current directory path",
        "export" => "Set environment variable - adds or modifies environment variables",
        "unset" => "Unset environment variable - removes environment variables",
        "env" => "Display environment - shows all environment variables",
        "exit" => "Exit shell - terminates the shell process",
        _ => "Built-in command",
    }
}

impl CommandSegment {
    /// See [`describe`].
    pub fn description(&self) -> &'static str {
        describe(self)
    }

    /// See [`unquoted_words`].
    pub fn unquoted_words(&self) -> Vec<String> {
        unquoted_words(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, args: &[&str]) -> CommandSegment {
        CommandSegment {
            name: name.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            is_built_in: is_builtin(name),
            redirections: vec![],
        }
    }

    #[test]
    fn builtin_case_insensitive() {
        assert!(is_builtin("cd"));
        assert!(is_builtin("EXPORT"));
        assert!(is_builtin("Echo"));
        assert!(!is_builtin("ls"));
        assert!(!is_builtin(""));
    }

    #[test]
    fn words_simple() {
        assert_eq!(words("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn words_keep_quotes() {
        assert_eq!(
            words("echo 'hello world' \"x y\""),
            vec!["echo", "'hello world'", "\"x y\""]
        );
    }

    #[test]
    fn words_collapse_runs_of_whitespace() {
        assert_eq!(words("  a \t b  "), vec!["a", "b"]);
    }

    #[test]
    fn words_empty() {
        assert!(words("   ").is_empty());
    }

    #[test]
    fn unquoted_strips_quotes() {
        let seg = segment("echo", &["\"hello 'world'\""]);
        assert_eq!(seg.unquoted_words(), vec!["echo", "hello 'world'"]);
    }

    #[test]
    fn unquoted_empty_quotes_become_empty_args() {
        let seg = segment("echo", &["\"\"", "''"]);
        assert_eq!(seg.unquoted_words(), vec!["echo", "", ""]);
    }

    #[test]
    fn description_builtin() {
        assert_eq!(
            segment("CD", &[]).description(),
            "Change directory - modifies the current working directory"
        );
    }

    #[test]
    fn description_external() {
        assert_eq!(
            segment("grep", &["x"]).description(),
            "External command - will be executed via fork() and execve()"
        );
    }
}
