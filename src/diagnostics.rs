//! Diagnostic side-channel for absorbed resolution failures.
//!
//! Failures never reach the caller as errors. When `debug` is enabled the
//! engine hands a [`Diagnostic`] to its [`Reporter`]; the default reporter
//! forwards it to the `log` facade.

use std::fmt;

use log::warn;

use crate::error::ResolutionError;

/// An absorbed failure together with the text returned in its place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    error: ResolutionError,
    fallback: String,
}

impl Diagnostic {
    /// Pair `error` with the `fallback` text the caller received.
    #[must_use]
    pub const fn new(error: ResolutionError, fallback: String) -> Self {
        Self { error, fallback }
    }

    /// The underlying failure.
    #[must_use]
    pub const fn error(&self) -> &ResolutionError {
        &self.error
    }

    /// The text returned (or left in place) instead of a translation.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}; using `{}`", self.error, self.fallback)
    }
}

/// Host collaborator receiving diagnostics.
///
/// Closures taking `&Diagnostic` implement this trait.
///
/// ```
/// use phrasebook::{Config, Engine, MessageStore};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let engine = Engine::new(MessageStore::new(), Config { debug: true, ..Config::default() })
///     .with_reporter(move |_: &phrasebook::Diagnostic| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     });
///
/// assert_eq!(engine.t("nope").text(), "[[nope]]");
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub trait Reporter: Send + Sync {
    /// Receive one diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> Reporter for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}

/// Default reporter: one `warn` record per diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!(target: "phrasebook::diagnostics", "{diagnostic}");
    }
}

/// Reporter that discards diagnostics.
pub fn noop_reporter(_diagnostic: &Diagnostic) {}
