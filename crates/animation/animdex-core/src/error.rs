//! Error types for contract loading, resolution and playback.

use serde::{Deserialize, Serialize};

/// Failures surfaced by animdex-core.
///
/// Structural problems found at load time are returned immediately. Per-entry
/// clip lookups that fail are not errors; they are collected as
/// [`Diagnostic`](crate::resolver::Diagnostic)s so the character stays usable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimdexError {
    /// The index has no entry for the requested character
    #[error("no animation contract for character '{character_id}'")]
    ContractNotFound { character_id: String },

    /// The character declares no animations
    #[error("animation contract for '{character_id}' declares no animations")]
    EmptyContract { character_id: String },

    /// The default animation id cannot be used and the policy forbids a fallback
    #[error("default animation '{default_id}' of '{character_id}' does not name a resolved entry")]
    InvalidDefault {
        character_id: String,
        default_id: String,
    },

    /// Playback was requested for an id that has no resolved action
    #[error("unknown animation id '{id}'")]
    UnknownAnimationId { id: String },

    /// Two entries in one contract share an id
    #[error("animation id '{id}' is declared more than once for '{character_id}'")]
    DuplicateAnimationId { character_id: String, id: String },

    /// `defaults.crossFadeSec` is negative or not finite
    #[error("crossFadeSec {seconds} for '{character_id}' must be finite and >= 0")]
    InvalidCrossFade { character_id: String, seconds: f32 },

    /// A fade duration passed at playback time is negative or not finite
    #[error("fade duration {seconds} must be finite and >= 0")]
    InvalidFade { seconds: f32 },

    /// A per-action time scale is not finite
    #[error("time scale {scale} must be finite")]
    InvalidTimeScale { scale: f32 },

    /// The contract index could not be parsed
    #[error("parse error: {reason}")]
    Parse { reason: String },

    /// An external asset could not be loaded or decoded
    #[error("failed to load asset '{url}': {reason}")]
    AssetLoad { url: String, reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    Io { reason: String },

    /// A cancellable load was aborted before it finished
    #[error("loading '{character_id}' was cancelled")]
    Cancelled { character_id: String },
}

impl AnimdexError {
    pub fn asset(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors worth retrying or that leave a usable character behind.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownAnimationId { .. }
                | Self::InvalidFade { .. }
                | Self::InvalidTimeScale { .. }
                | Self::AssetLoad { .. }
                | Self::Io { .. }
                | Self::Cancelled { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ContractNotFound { .. }
            | Self::EmptyContract { .. }
            | Self::InvalidDefault { .. }
            | Self::DuplicateAnimationId { .. }
            | Self::InvalidCrossFade { .. } => "contract",
            Self::UnknownAnimationId { .. }
            | Self::InvalidFade { .. }
            | Self::InvalidTimeScale { .. } => "playback",
            Self::Parse { .. } => "serialization",
            Self::AssetLoad { .. } | Self::Io { .. } => "io",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

impl From<std::io::Error> for AnimdexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnimdexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverability() {
        let recoverable = AnimdexError::UnknownAnimationId { id: "run".into() };
        assert!(recoverable.is_recoverable());

        let structural = AnimdexError::EmptyContract {
            character_id: "hero".into(),
        };
        assert!(!structural.is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        let err = AnimdexError::ContractNotFound {
            character_id: "ghost".into(),
        };
        assert_eq!(err.category(), "contract");
        assert_eq!(err.to_string(), "no animation contract for character 'ghost'");

        let err: AnimdexError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn test_serialization() {
        let error = AnimdexError::asset("hero.glb", "truncated");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: AnimdexError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
