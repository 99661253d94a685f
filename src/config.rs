//! Engine configuration.
//!
//! `Config` deserialises from host configuration (TOML, JSON, ...) with the
//! same conventions the rest of the workspace uses: every field is optional,
//! unknown fields are rejected, and the camelCase spellings hosts tend to
//! carry over from JavaScript tooling are accepted as aliases. The custom
//! pluralizer cannot be expressed in data and is attached with
//! [`Config::with_pluralize`].

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::interpolate::OutputMode;
use crate::selection::Pluralizer;

/// Opening marker wrapped around missing keys in debug mode.
pub const SENTINEL_OPEN: &str = "[[";

/// Closing marker wrapped around missing keys in debug mode.
pub const SENTINEL_CLOSE: &str = "]]";

/// Options recognised by [`crate::Engine`].
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Wrap missing keys in sentinel markers and report a diagnostic.
    pub debug: bool,
    /// Return the raw key for missing translations, silently.
    #[serde(alias = "useKeyForMissingTranslation")]
    pub use_key_for_missing_translation: bool,
    /// Produce sequence output by default.
    #[serde(alias = "arrayMode")]
    pub array_mode: bool,
    /// Expand `{{key}}` aliases whenever a store is installed.
    #[serde(alias = "resolveAliases")]
    pub resolve_aliases: bool,
    /// Custom count-to-branch-key rule.
    #[serde(skip)]
    pub pluralize: Option<Pluralizer>,
}

impl fmt::Debug for Config {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Config")
            .field("debug", &self.debug)
            .field(
                "use_key_for_missing_translation",
                &self.use_key_for_missing_translation,
            )
            .field("array_mode", &self.array_mode)
            .field("resolve_aliases", &self.resolve_aliases)
            .field("pluralize", &self.pluralize.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// How a failed resolution is turned into output. Exactly one applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Return the key unchanged.
    UseKey,
    /// Return the key wrapped in sentinel markers and report a diagnostic.
    Sentinel,
    /// Return the key unchanged as the last resort.
    KeyFallback,
}

impl MissingPolicy {
    /// Text returned for `key` under this policy.
    ///
    /// ```
    /// use phrasebook::MissingPolicy;
    ///
    /// assert_eq!(MissingPolicy::Sentinel.render("nope"), "[[nope]]");
    /// assert_eq!(MissingPolicy::UseKey.render("nope"), "nope");
    /// ```
    #[must_use]
    pub fn render(self, key: &str) -> String {
        match self {
            Self::UseKey | Self::KeyFallback => key.to_owned(),
            Self::Sentinel => format!("{SENTINEL_OPEN}{key}{SENTINEL_CLOSE}"),
        }
    }

    /// Whether this policy reports a diagnostic.
    #[must_use]
    pub const fn reports(self) -> bool {
        matches!(self, Self::Sentinel)
    }
}

impl Config {
    /// Attach a custom pluralizer.
    ///
    /// ```
    /// use phrasebook::Config;
    ///
    /// let config = Config::default().with_pluralize(|count| {
    ///     if count == 1.0 { "one".into() } else { "other".into() }
    /// });
    /// assert!(config.pluralize.is_some());
    /// ```
    #[must_use]
    pub fn with_pluralize<F>(mut self, rule: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.pluralize = Some(Arc::new(rule));
        self
    }

    /// Output mode used when a call does not force one.
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        if self.array_mode {
            OutputMode::Sequence
        } else {
            OutputMode::Text
        }
    }

    /// Policy applied to failed resolutions.
    ///
    /// `use_key_for_missing_translation` takes precedence over `debug`.
    #[must_use]
    pub const fn missing_policy(&self) -> MissingPolicy {
        if self.use_key_for_missing_translation {
            MissingPolicy::UseKey
        } else if self.debug {
            MissingPolicy::Sentinel
        } else {
            MissingPolicy::KeyFallback
        }
    }
}
