//! Compile error taxonomy.

use std::fmt;

use wombat_model::ValidationError;

/// Stage of compilation an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilePhase {
    Producer,
    Consumer,
    Transformer,
    Marshal,
}

impl CompilePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Consumer => "consumer",
            Self::Transformer => "transformer",
            Self::Marshal => "marshal",
        }
    }
}

impl fmt::Display for CompilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a compile call. No partial document accompanies it.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A step violates an exactly-one-of rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A nested failure tagged with the phase it happened in.
    #[error("compilation failed in {phase} phase: {source}")]
    Phase {
        phase: CompilePhase,
        source: Box<CompileError>,
    },

    /// The assembled tree could not be rendered as YAML.
    #[error("failed to serialize configuration: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl CompileError {
    #[must_use]
    pub fn in_phase(self, phase: CompilePhase) -> Self {
        Self::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// Outermost phase label, if the error carries one.
    pub fn phase(&self) -> Option<CompilePhase> {
        match self {
            Self::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// The innermost validation failure, looking through phase wrappers.
    pub fn root_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Phase { source, .. } => source.root_validation(),
            Self::Serialization(_) => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.root_validation().is_some()
    }
}
