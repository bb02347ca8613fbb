use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Error,
    Warning,
    Victory,
    #[value(name = "terminal", alias = "terminal-mistype")]
    TerminalMistype,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Error => "error",
            Kind::Warning => "warning",
            Kind::Victory => "victory",
            Kind::TerminalMistype => "terminal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTier {
    Tier1,
    Tier2,
    Tier3,
}

impl ErrorTier {
    pub fn from_delta(delta: u32) -> Self {
        match delta {
            0 | 1 => ErrorTier::Tier1,
            2..=4 => ErrorTier::Tier2,
            _ => ErrorTier::Tier3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(ErrorTier::Tier1),
            2 => Some(ErrorTier::Tier2),
            3 => Some(ErrorTier::Tier3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningTier {
    Tier1,
    Tier2,
}

impl WarningTier {
    pub fn from_delta(delta: u32) -> Self {
        if delta >= 2 {
            WarningTier::Tier2
        } else {
            WarningTier::Tier1
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WarningTier::Tier1),
            2 => Some(WarningTier::Tier2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "snake_case")]
pub enum Cue {
    Error(ErrorTier),
    Warning(WarningTier),
    Victory,
    TerminalMistype,
}

impl Cue {
    pub fn kind(self) -> Kind {
        match self {
            Cue::Error(_) => Kind::Error,
            Cue::Warning(_) => Kind::Warning,
            Cue::Victory => Kind::Victory,
            Cue::TerminalMistype => Kind::TerminalMistype,
        }
    }

    pub fn from_parts(kind: Kind, tier: Option<u8>) -> Option<Self> {
        let tier = tier.unwrap_or(1);
        match kind {
            Kind::Error => ErrorTier::from_number(tier).map(Cue::Error),
            Kind::Warning => WarningTier::from_number(tier).map(Cue::Warning),
            Kind::Victory => Some(Cue::Victory),
            Kind::TerminalMistype => Some(Cue::TerminalMistype),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(pub String);

impl From<&str> for ResourceKey {
    fn from(value: &str) -> Self {
        ResourceKey(value.to_string())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "Error")]
    Error,
    #[serde(alias = "Warning")]
    Warning,
    #[serde(alias = "info", alias = "Information")]
    Information,
    #[serde(alias = "Hint")]
    Hint,
    #[serde(other)]
    Unknown,
}

// Diagnostic codes arrive either bare or wrapped in an object with a `value`
// field (and usually a `target` link we don't care about).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticCode {
    Number(i64),
    Text(String),
    Wrapped { value: serde_json::Value },
    Other(serde_json::Value),
}

impl DiagnosticCode {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            DiagnosticCode::Number(n) => Some(*n),
            DiagnosticCode::Text(_) => None,
            DiagnosticCode::Wrapped { value } => value.as_i64(),
            DiagnosticCode::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<DiagnosticCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiagnostics {
    pub uri: ResourceKey,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Diagnostics {
        resources: Vec<ResourceDiagnostics>,
    },
    TaskEnded {
        #[serde(default)]
        task: Option<String>,
        #[serde(default)]
        exit_code: Option<i32>,
    },
    DebugSessionEnded,
    TerminalCommandEnded {
        #[serde(default)]
        exit_code: Option<i32>,
    },
    TerminalOutput {
        data: String,
    },
    ConfigChanged,
}
