//! Resolution facade: lookup, branch selection, interpolation, and the
//! missing-translation policy.
//!
//! Calls are built with [`Engine::t`]. The first call argument is a selector
//! when the key names a group and interpolation data when it names a
//! template; the decision is made after lookup, from the node itself.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::aliases::expand_aliases;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, LogReporter, Reporter};
use crate::error::ResolutionError;
use crate::interpolate::{Args, OutputMode, Piece, Translation, Value, interpolate};
use crate::selection::{Selector, select};
use crate::store::{MessageStore, StoreHandle, TranslationNode};

/// One positional argument of a translation call.
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    /// A count: plural selector for groups, `{n}`/`{count}` for templates.
    Number(f64),
    /// A sub-key for groups, `{0}` for templates.
    Text(String),
    /// Interpolation arguments.
    Args(Args),
}

impl CallArg {
    fn into_value(self) -> Option<Value> {
        match self {
            Self::Number(number) => Some(Value::Number(number)),
            Self::Text(text) => Some(Value::Text(text)),
            Self::Args(_) => None,
        }
    }

    fn into_args(self) -> Args {
        match self {
            Self::Args(args) => args,
            scalar => Args::Positional(scalar.into_value().into_iter().collect()),
        }
    }
}

macro_rules! call_arg_from_lossless {
    ($($source:ty),*) => {
        $(
            impl From<$source> for CallArg {
                fn from(number: $source) -> Self {
                    Self::Number(f64::from(number))
                }
            }
        )*
    };
}

call_arg_from_lossless!(i32, u32, f32, f64);

impl From<i64> for CallArg {
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts beyond 2^53 are not meaningful message selectors"
    )]
    fn from(number: i64) -> Self {
        Self::Number(number as f64)
    }
}

impl From<usize> for CallArg {
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts beyond 2^53 are not meaningful message selectors"
    )]
    fn from(number: usize) -> Self {
        Self::Number(number as f64)
    }
}

impl From<&str> for CallArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for CallArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Args> for CallArg {
    fn from(args: Args) -> Self {
        Self::Args(args)
    }
}

impl From<HashMap<String, Value>> for CallArg {
    fn from(map: HashMap<String, Value>) -> Self {
        Self::Args(Args::Named(map))
    }
}

impl From<Vec<Value>> for CallArg {
    fn from(values: Vec<Value>) -> Self {
        Self::Args(Args::Positional(values))
    }
}

/// A call's arguments after the looked-up node decided how to read them.
#[derive(Debug, Default)]
struct Plan {
    selector: Option<Selector>,
    args: Args,
    count: Option<f64>,
}

impl Plan {
    fn for_node(node: &TranslationNode, call_args: Vec<CallArg>) -> Self {
        if node.is_group() {
            Self::for_group(call_args)
        } else {
            Self::for_template(call_args)
        }
    }

    fn for_group(call_args: Vec<CallArg>) -> Self {
        let mut remaining = call_args.into_iter();
        match remaining.next() {
            Some(CallArg::Number(count)) => Self {
                selector: Some(Selector::Count(count)),
                args: remaining.next().map(CallArg::into_args).unwrap_or_default(),
                count: Some(count),
            },
            Some(CallArg::Text(subkey)) => Self {
                selector: Some(Selector::Subkey(subkey)),
                args: remaining.next().map(CallArg::into_args).unwrap_or_default(),
                count: None,
            },
            Some(CallArg::Args(args)) => Self {
                args,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    fn for_template(call_args: Vec<CallArg>) -> Self {
        let count = call_args.iter().find_map(|arg| match arg {
            CallArg::Number(number) => Some(*number),
            CallArg::Text(_) | CallArg::Args(_) => None,
        });
        let has_args = call_args.iter().any(|arg| matches!(arg, CallArg::Args(_)));

        let args = if has_args {
            call_args
                .into_iter()
                .find_map(|arg| match arg {
                    CallArg::Args(supplied) => Some(supplied),
                    CallArg::Number(_) | CallArg::Text(_) => None,
                })
                .unwrap_or_default()
        } else if call_args.is_empty() {
            Args::None
        } else {
            Args::Positional(call_args.into_iter().filter_map(CallArg::into_value).collect())
        };

        Self {
            selector: None,
            args,
            count,
        }
    }
}

/// Message-resolution engine bound to a swappable store and fixed options.
///
/// ```
/// use phrasebook::{Args, Config, Engine, MessageStore, TranslationNode};
///
/// let mut store = MessageStore::new();
/// store.insert("greeting", "Hello {name}!");
/// store.insert(
///     "items",
///     TranslationNode::group([("0", "no items"), ("1", "one item"), ("n", "{count} items")]),
/// );
/// let engine = Engine::new(store, Config::default());
///
/// assert_eq!(engine.t("items").arg(0).text(), "no items");
/// assert_eq!(engine.t("items").arg(5).text(), "5 items");
/// assert_eq!(
///     engine.t("greeting").arg(Args::named().with("name", "World")).text(),
///     "Hello World!"
/// );
/// ```
pub struct Engine {
    store: StoreHandle,
    config: Config,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Engine")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine that reports diagnostics through the `log` facade.
    #[must_use]
    pub fn new(store: MessageStore, config: Config) -> Self {
        Self::new_with_reporter(store, config, LogReporter)
    }

    /// Build an engine with a custom reporter.
    ///
    /// Unlike [`Engine::with_reporter`], the reporter also receives the
    /// alias diagnostics raised while the initial store is installed.
    #[must_use]
    pub fn new_with_reporter(
        store: MessageStore,
        config: Config,
        reporter: impl Reporter + 'static,
    ) -> Self {
        let mut engine = Self {
            store: StoreHandle::default(),
            config,
            reporter: Arc::new(reporter),
        };
        let prepared = engine.prepare(store);
        engine.store = StoreHandle::new(prepared);
        engine
    }

    /// Replace the reporter used for subsequent diagnostics.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// The engine's options.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The active store snapshot.
    #[must_use]
    pub fn keys(&self) -> Arc<MessageStore> {
        self.store.snapshot()
    }

    /// Install a new store, returning the snapshot it replaced.
    ///
    /// Aliases are expanded first when `resolve_aliases` is set. Calls
    /// already in flight finish against the previous snapshot.
    pub fn set_keys(&self, store: MessageStore) -> Arc<MessageStore> {
        let prepared = self.prepare(store);
        self.store.replace(prepared)
    }

    /// Whether `key` is present in the active store.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.store.snapshot().contains_key(key)
    }

    /// Start a translation call for `key`.
    pub fn t<'a>(&'a self, key: &'a str) -> Request<'a> {
        Request {
            engine: self,
            key,
            call_args: Vec::new(),
        }
    }

    /// Translate `key` in the configured output mode.
    #[must_use]
    pub fn translate(
        &self,
        key: &str,
        call_args: impl IntoIterator<Item = CallArg>,
    ) -> Translation {
        self.t(key).args(call_args).resolve()
    }

    /// Translate `key` in sequence mode regardless of `array_mode`.
    #[must_use]
    pub fn arr(&self, key: &str, call_args: impl IntoIterator<Item = CallArg>) -> Vec<Piece> {
        self.t(key).args(call_args).arr()
    }

    /// Translate `key` in string mode regardless of `array_mode`.
    #[must_use]
    pub fn text(&self, key: &str, call_args: impl IntoIterator<Item = CallArg>) -> String {
        self.t(key).args(call_args).text()
    }

    fn prepare(&self, store: MessageStore) -> MessageStore {
        let prepared = if self.config.resolve_aliases {
            let expansion = expand_aliases(&store);
            for error in expansion.unresolved {
                self.report_alias(error);
            }
            expansion.store
        } else {
            store
        };

        debug!(
            target: "phrasebook::engine",
            "installing message store with {} keys",
            prepared.len(),
        );
        prepared
    }

    fn report_alias(&self, error: ResolutionError) {
        if !self.config.missing_policy().reports() {
            return;
        }
        if let ResolutionError::UnresolvedAlias { alias, .. } = &error {
            let verbatim = format!("{{{{{alias}}}}}");
            self.reporter.report(&Diagnostic::new(error, verbatim));
        }
    }

    fn resolve_in(
        &self,
        key: &str,
        call_args: Vec<CallArg>,
        mode: OutputMode,
    ) -> Result<Translation, ResolutionError> {
        let snapshot = self.store.snapshot();
        let node = snapshot
            .get(key)
            .ok_or_else(|| ResolutionError::MissingKey {
                key: key.to_owned(),
            })?;

        let plan = Plan::for_node(node, call_args);
        let template = select(
            key,
            node,
            plan.selector.as_ref(),
            self.config.pluralize.as_ref(),
        )?;
        Ok(interpolate(template, &plan.args, plan.count, mode))
    }

    fn absorb(&self, key: &str, error: ResolutionError, mode: OutputMode) -> Translation {
        let policy = self.config.missing_policy();
        let fallback = policy.render(key);
        if policy.reports() {
            self.reporter.report(&Diagnostic::new(error, fallback.clone()));
        }
        Translation::literal(fallback, mode)
    }
}

/// A pending translation call.
///
/// At most two call arguments are read: `(selector, args)` for groups,
/// interpolation data for templates.
#[derive(Debug)]
#[must_use = "a request does nothing until it is resolved"]
pub struct Request<'a> {
    engine: &'a Engine,
    key: &'a str,
    call_args: Vec<CallArg>,
}

impl Request<'_> {
    /// Append a call argument.
    pub fn arg(mut self, call_arg: impl Into<CallArg>) -> Self {
        self.call_args.push(call_arg.into());
        self
    }

    /// Append several call arguments.
    pub fn args(mut self, call_args: impl IntoIterator<Item = CallArg>) -> Self {
        self.call_args.extend(call_args);
        self
    }

    /// Resolve in the configured output mode.
    #[must_use]
    pub fn resolve(self) -> Translation {
        let mode = self.engine.config.output_mode();
        self.resolve_as(mode)
    }

    /// Resolve in an explicit output mode, applying the missing policy.
    #[must_use]
    pub fn resolve_as(self, mode: OutputMode) -> Translation {
        let Self {
            engine,
            key,
            call_args,
        } = self;
        engine
            .resolve_in(key, call_args, mode)
            .unwrap_or_else(|error| engine.absorb(key, error, mode))
    }

    /// Resolve in sequence mode regardless of `array_mode`.
    #[must_use]
    pub fn arr(self) -> Vec<Piece> {
        self.resolve_as(OutputMode::Sequence).into_pieces()
    }

    /// Resolve in string mode regardless of `array_mode`.
    #[must_use]
    pub fn text(self) -> String {
        self.resolve_as(OutputMode::Text).into_text()
    }

    /// Resolve in the configured mode, surfacing failures instead of
    /// applying the missing policy. Nothing is reported.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolutionError`] that prevented resolution.
    pub fn try_resolve(self) -> Result<Translation, ResolutionError> {
        let mode = self.engine.config.output_mode();
        self.engine.resolve_in(self.key, self.call_args, mode)
    }
}
