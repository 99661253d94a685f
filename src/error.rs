//! Failure taxonomy for message resolution.

use std::fmt;

use thiserror::Error;

/// Why an alias reference could not be expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AliasFailure {
    /// The alias chain revisits a key.
    Cycle,
    /// The target key is absent or has no usable default branch.
    Dangling,
}

impl fmt::Display for AliasFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle => formatter.write_str("cyclic"),
            Self::Dangling => formatter.write_str("dangling"),
        }
    }
}

/// Error raised when a key cannot be resolved to a template.
///
/// None of these escape [`crate::Engine::t`]; they feed the
/// missing-translation policy and the diagnostic reporter instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The top-level key is absent from the store.
    #[error("translation key `{key}` is missing")]
    MissingKey {
        /// Requested key.
        key: String,
    },
    /// Neither the exact plural branch nor `"n"` exists.
    #[error("plural branch `{selector_key}` missing for `{key}` and no `n` fallback")]
    MissingPluralBranch {
        /// Requested key.
        key: String,
        /// Branch key computed from the count.
        selector_key: String,
    },
    /// Neither the requested sub-key nor `"*"` exists.
    #[error("sub-key `{subkey}` missing for `{key}` and no `*` fallback")]
    MissingSubkeyBranch {
        /// Requested key.
        key: String,
        /// Requested sub-key.
        subkey: String,
    },
    /// A group was reached without a selector and has no default branch.
    #[error("`{key}` needs a selector and has no default branch")]
    MissingSelector {
        /// Requested key.
        key: String,
    },
    /// A `{{alias}}` reference was left unexpanded.
    #[error("{reason} alias `{{{{{alias}}}}}` in `{key}` left unexpanded")]
    UnresolvedAlias {
        /// Key whose template holds the reference.
        key: String,
        /// Referenced key.
        alias: String,
        /// Cycle or dangling target.
        reason: AliasFailure,
    },
}

impl ResolutionError {
    /// The key the failure is reported against.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MissingKey { key }
            | Self::MissingPluralBranch { key, .. }
            | Self::MissingSubkeyBranch { key, .. }
            | Self::MissingSelector { key }
            | Self::UnresolvedAlias { key, .. } => key,
        }
    }
}
