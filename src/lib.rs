//! Compact message-resolution engine.
//!
//! Given a [`MessageStore`] of plain templates and single-level groups
//! (plural forms or sub-keys), [`Engine`] resolves a key plus an optional
//! selector and arguments into either a string or a sequence of literal text
//! and opaque values suitable for composing UI.
//!
//! Resolution never fails at the call site: missing keys and branches are
//! absorbed by the configured missing-translation policy and, in debug mode,
//! reported through a [`Reporter`].
//!
//! ```
//! use phrasebook::{Config, Engine, MessageStore, TranslationNode};
//!
//! let mut store = MessageStore::new();
//! store.insert("button", TranslationNode::group([("*", "Click me"), ("submit", "Send")]));
//! let engine = Engine::new(store, Config::default());
//!
//! assert_eq!(engine.t("button").text(), "Click me");
//! assert_eq!(engine.t("button").arg("submit").text(), "Send");
//! assert_eq!(engine.t("nope").text(), "nope");
//! ```

pub mod aliases;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod selection;
pub mod store;
pub mod testing;

pub use aliases::{AliasExpansion, expand_aliases, resolve_aliases};
pub use config::{Config, MissingPolicy, SENTINEL_CLOSE, SENTINEL_OPEN};
pub use diagnostics::{Diagnostic, LogReporter, Reporter, noop_reporter};
pub use engine::{CallArg, Engine, Request};
pub use error::{AliasFailure, ResolutionError};
pub use interpolate::{Args, Fragment, OutputMode, Piece, Translation, Value, interpolate};
pub use selection::{Pluralizer, Selector, select};
pub use store::{MessageStore, StoreHandle, TranslationNode};
