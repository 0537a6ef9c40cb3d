//! Error types for chainconf.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single field-level constraint failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending value, e.g. `network.rpcUrl`
    pub path: String,
    /// Name of the violated constraint: `type`, `url` or `pattern`
    pub constraint: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.constraint, self.message)
    }
}

/// Main error type for chainconf.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Directory creation, file write, file read or metadata failure
    #[error("Failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File content is not well-formed JSON
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed content that breaks one or more field constraints
    #[error("Invalid configuration in {}: {}", path.display(), join_violations(violations))]
    Validation {
        path: PathBuf,
        violations: Vec<Violation>,
    },

    /// Output document could not be serialized
    #[error("JSON error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Constraint pattern failed to compile
    #[error("Regex error: {0}")]
    Pattern(#[from] regex::Error),
}

impl SetupError {
    pub(crate) fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Field violations, empty for anything but a validation failure.
    pub fn violations(&self) -> &[Violation] {
        match self {
            SetupError::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Sequencer phase in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ExportSchema,
    WriteDefault,
    Validate,
}

impl Phase {
    /// Phase that follows this one in a full run.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::ExportSchema => Some(Phase::WriteDefault),
            Phase::WriteDefault => Some(Phase::Validate),
            Phase::Validate => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ExportSchema => "schema export",
            Phase::WriteDefault => "default config write",
            Phase::Validate => "config validation",
        };
        f.write_str(name)
    }
}

/// Failure tagged with the phase that produced it.
#[derive(Debug, Error)]
#[error("{phase} failed")]
pub struct PhaseError {
    pub phase: Phase,
    #[source]
    pub source: SetupError,
}

impl PhaseError {
    pub fn new(phase: Phase, source: SetupError) -> Self {
        Self { phase, source }
    }
}
