//! Composition errors.
//!
//! Every error here is a programming mistake in how a dispatcher was
//! assembled, never a data-dependent condition. They are reported once, at
//! composition, and a dispatcher that failed composition never exists.

use std::fmt;

use thiserror::Error;
use tracing::error;

/// Errors raised while composing a runtime-checked dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("missing coverage for `{variant}`: no handler for {}", .missing.join(", "))]
    MissingCoverage {
        variant: &'static str,
        missing: Vec<&'static str>,
    },

    #[error(
        "ambiguous coverage for `{variant}`: alternative `{alternative}` is handled at positions {positions:?}"
    )]
    AmbiguousCoverage {
        variant: &'static str,
        alternative: &'static str,
        positions: Vec<usize>,
    },

    #[error("arity mismatch for `{variant}`: handler at position {position} takes `{domain}`, which is not an alternative")]
    ArityMismatch {
        variant: &'static str,
        position: usize,
        domain: &'static str,
    },
}

/// The kind of a [`CompositionError`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Some alternative has no handler.
    MissingCoverage,
    /// Some alternative has more than one handler.
    AmbiguousCoverage,
    /// Some handler's domain is not an alternative.
    ArityMismatch,
}

impl CompositionError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCoverage { .. } => ErrorKind::MissingCoverage,
            Self::AmbiguousCoverage { .. } => ErrorKind::AmbiguousCoverage,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
        }
    }

    /// The variant type the composition targeted.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::MissingCoverage { variant, .. }
            | Self::AmbiguousCoverage { variant, .. }
            | Self::ArityMismatch { variant, .. } => *variant,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingCoverage => "MissingCoverage",
            Self::AmbiguousCoverage => "AmbiguousCoverage",
            Self::ArityMismatch => "ArityMismatch",
        };
        f.write_str(name)
    }
}

/// Abort on an alternative that has no handler.
///
/// Unreachable for any dispatcher that passed composition; reaching it means
/// an internal invariant was broken, so this logs and panics instead of
/// returning an error.
#[cold]
#[track_caller]
pub fn unhandled_alternative(variant: &str, alternative: impl fmt::Display) -> ! {
    let alternative = alternative.to_string();
    error!(variant, alternative = alternative.as_str(), "dispatch reached an unhandled alternative");
    panic!("unhandled alternative `{alternative}` of `{variant}`")
}
