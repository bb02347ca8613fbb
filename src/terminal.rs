use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub shell_integration: bool,
}

/// How terminal mistypes are detected for a session. Exactly one is active,
/// so a single failure is never counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalDetection {
    ExitCode,
    OutputPatterns,
}

impl TerminalDetection {
    pub fn negotiate(caps: HostCapabilities) -> Self {
        if caps.shell_integration {
            TerminalDetection::ExitCode
        } else {
            TerminalDetection::OutputPatterns
        }
    }
}

fn failure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)command not found|is not recognized as|cannot be loaded because running scripts is disabled|no such file or directory|\bnot found\b",
        )
        .expect("failure pattern compiles")
    })
}

pub fn looks_like_failure(output: &str) -> bool {
    failure_pattern().is_match(output)
}

pub fn is_failed_exit(exit_code: Option<i32>) -> bool {
    matches!(exit_code, Some(code) if code != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_picks_one_strategy() {
        assert_eq!(
            TerminalDetection::negotiate(HostCapabilities {
                shell_integration: true
            }),
            TerminalDetection::ExitCode
        );
        assert_eq!(
            TerminalDetection::negotiate(HostCapabilities::default()),
            TerminalDetection::OutputPatterns
        );
    }

    #[test]
    fn shell_failure_phrases() {
        assert!(looks_like_failure("zsh: command not found: gti"));
        assert!(looks_like_failure(
            "'gti' is not recognized as an internal or external command"
        ));
        assert!(looks_like_failure(
            "File C:\\x.ps1 cannot be loaded because running scripts is disabled on this system."
        ));
        assert!(looks_like_failure("cat: foo: No such file or directory"));
        assert!(!looks_like_failure("Compiling faaah v0.1.0"));
    }

    #[test]
    fn exit_codes() {
        assert!(is_failed_exit(Some(127)));
        assert!(is_failed_exit(Some(-1)));
        assert!(!is_failed_exit(Some(0)));
        assert!(!is_failed_exit(None));
    }
}
