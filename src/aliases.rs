//! `{{key}}` alias expansion.
//!
//! # Invariants
//!
//! 1. **Terminates**: every key is expanded at most once per pass; a key met
//!    again while its own expansion is in progress is a cycle.
//!
//! 2. **Idempotent**: a reference is replaced only when its target expands
//!    without touching a cycle. Whatever is left verbatim (dangling or
//!    cycle-reaching references) is left verbatim again on the next pass.
//!    Output is substituted again until no reference in it expands, so a
//!    `{{key}}` formed where substituted text meets a literal is handled in
//!    the same pass.
//!
//! 3. **Top-level leaves only**: templates under a top-level key are
//!    rewritten; groups are copied unchanged. A group used as an alias
//!    target contributes its default branch.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behaviour |
//! |---------|-------|-----------|
//! | Dangling | Target missing, or a group with no default branch | Left verbatim |
//! | Cycle | Target chain revisits a key | Left verbatim |

use std::collections::HashMap;

use log::debug;

use crate::error::{AliasFailure, ResolutionError};
use crate::store::{MessageStore, PLURAL_FALLBACK, SUBKEY_FALLBACK, TranslationNode};

/// Result of an expansion pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasExpansion {
    /// The rewritten store.
    pub store: MessageStore,
    /// References left unexpanded, as [`ResolutionError::UnresolvedAlias`].
    pub unresolved: Vec<ResolutionError>,
}

/// Expand aliases and return only the rewritten store.
///
/// ```
/// use phrasebook::{MessageStore, TranslationNode, resolve_aliases};
///
/// let store: MessageStore = [
///     ("support", "Contact support"),
///     ("footer", "Need help? {{support}}"),
/// ]
/// .into_iter()
/// .collect();
///
/// let expanded = resolve_aliases(&store);
/// assert_eq!(
///     expanded.get("footer").and_then(TranslationNode::as_template),
///     Some("Need help? Contact support")
/// );
/// ```
#[must_use]
pub fn resolve_aliases(store: &MessageStore) -> MessageStore {
    expand_aliases(store).store
}

/// Expand aliases, reporting every reference that was left in place.
///
/// Unresolved references are listed in key order so reports are stable.
#[must_use]
pub fn expand_aliases(store: &MessageStore) -> AliasExpansion {
    let mut expander = Expander::new(store);
    let mut expanded = MessageStore::new();
    let mut unresolved = Vec::new();

    let mut entries: Vec<(&str, &TranslationNode)> = store.iter().collect();
    entries.sort_unstable_by_key(|(key, _)| *key);

    for (key, node) in entries {
        match node.as_template() {
            Some(text) => {
                let rendered = expander.render(key, text);
                unresolved.extend(rendered.unresolved.into_iter().map(|(alias, reason)| {
                    ResolutionError::UnresolvedAlias {
                        key: key.to_owned(),
                        alias,
                        reason,
                    }
                }));
                expanded.insert(key, rendered.text);
            }
            None => {
                expanded.insert(key, node.clone());
            }
        }
    }

    debug!(
        target: "phrasebook::aliases",
        "expanded aliases across {} keys; {} left unresolved",
        expanded.len(),
        unresolved.len(),
    );

    AliasExpansion {
        store: expanded,
        unresolved,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part<'a> {
    Literal(&'a str),
    Alias(&'a str),
}

fn is_alias_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && !candidate
            .chars()
            .any(|ch| matches!(ch, '{' | '}') || ch.is_whitespace())
}

fn split_aliases(text: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some((before, after)) = rest.split_once("{{") {
        parts.push(Part::Literal(before));
        match after.split_once("}}") {
            Some((inner, tail)) if is_alias_key(inner) => {
                parts.push(Part::Alias(inner));
                rest = tail;
            }
            _ => {
                parts.push(Part::Literal("{{"));
                rest = after;
            }
        }
    }

    parts.push(Part::Literal(rest));
    parts
}

/// Text an alias to `node` stands for.
fn alias_source(node: &TranslationNode) -> Option<&str> {
    node.as_template()
        .or_else(|| node.default_template())
        .or_else(|| node.child(SUBKEY_FALLBACK).and_then(TranslationNode::as_template))
        .or_else(|| node.child(PLURAL_FALLBACK).and_then(TranslationNode::as_template))
}

struct Rendered {
    text: String,
    unresolved: Vec<(String, AliasFailure)>,
}

impl Rendered {
    fn reaches_cycle(&self) -> bool {
        self.unresolved
            .iter()
            .any(|(_, reason)| *reason == AliasFailure::Cycle)
    }
}

struct Expander<'s> {
    store: &'s MessageStore,
    memo: HashMap<&'s str, Result<String, AliasFailure>>,
    visiting: Vec<&'s str>,
}

impl<'s> Expander<'s> {
    fn new(store: &'s MessageStore) -> Self {
        Self {
            store,
            memo: HashMap::new(),
            visiting: Vec::new(),
        }
    }

    /// Expand `text`, the source of `key`, until the output settles.
    ///
    /// The unresolved list describes the settled output: exactly the
    /// references it still holds.
    fn render(&mut self, key: &'s str, text: &str) -> Rendered {
        self.visiting.push(key);
        let mut rendered = self.substitute(text);

        // Substituted text can join a neighbouring literal into a fresh
        // `{{key}}` span.
        for _ in 0..=self.store.len() {
            let again = self.substitute(&rendered.text);
            let settled = again.text == rendered.text;
            rendered = again;
            if settled {
                break;
            }
        }

        self.visiting.pop();
        rendered
    }

    fn substitute(&mut self, text: &str) -> Rendered {
        let mut output = String::with_capacity(text.len());
        let mut unresolved = Vec::new();

        for part in split_aliases(text) {
            match part {
                Part::Literal(literal) => output.push_str(literal),
                Part::Alias(alias) => match self.resolve(alias) {
                    Ok(expansion) => output.push_str(&expansion),
                    Err(reason) => {
                        output.push_str("{{");
                        output.push_str(alias);
                        output.push_str("}}");
                        unresolved.push((alias.to_owned(), reason));
                    }
                },
            }
        }

        Rendered {
            text: output,
            unresolved,
        }
    }

    fn resolve(&mut self, alias: &str) -> Result<String, AliasFailure> {
        let store = self.store;
        let Some((key, node)) = store.get_entry(alias) else {
            return Err(AliasFailure::Dangling);
        };
        if let Some(done) = self.memo.get(key) {
            return done.clone();
        }
        if self.visiting.contains(&key) {
            return Err(AliasFailure::Cycle);
        }

        let result = match alias_source(node) {
            Some(source) => {
                let rendered = self.render(key, source);
                if rendered.reaches_cycle() {
                    Err(AliasFailure::Cycle)
                } else {
                    Ok(rendered.text)
                }
            }
            None => Err(AliasFailure::Dangling),
        };

        self.memo.insert(key, result.clone());
        result
    }
}
