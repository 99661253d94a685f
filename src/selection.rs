//! Branch selection for plural and sub-keyed groups.

use std::fmt;
use std::sync::Arc;

use crate::error::ResolutionError;
use crate::interpolate::format_number;
use crate::store::{PLURAL_FALLBACK, SUBKEY_FALLBACK, TranslationNode};

/// Maps a count to the child key of a plural group.
pub type Pluralizer = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Value used to pick a branch inside a group.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    /// A count for plural groups.
    Count(f64),
    /// A named branch for sub-keyed groups.
    Subkey(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => formatter.write_str(&format_number(*count)),
            Self::Subkey(subkey) => formatter.write_str(subkey),
        }
    }
}

/// Default child key for a count: the integer portion in decimal.
///
/// ```
/// use phrasebook::selection::plural_key;
///
/// assert_eq!(plural_key(5.0), "5");
/// assert_eq!(plural_key(1.75), "1");
/// assert_eq!(plural_key(-2.5), "-2");
/// ```
#[must_use]
pub fn plural_key(count: f64) -> String {
    format_number(count.trunc())
}

/// Pick the template for `node` under `selector`.
///
/// Leaves are returned unchanged whatever the selector. For groups an exact
/// branch always wins; the fallback (`"n"` for counts, `"*"` for sub-keys) is
/// consulted only when the exact branch is absent. Branches that are
/// themselves groups count as absent.
///
/// # Errors
///
/// Returns [`ResolutionError::MissingPluralBranch`],
/// [`ResolutionError::MissingSubkeyBranch`] or
/// [`ResolutionError::MissingSelector`] when no branch applies.
pub fn select<'node>(
    key: &str,
    node: &'node TranslationNode,
    selector: Option<&Selector>,
    pluralize: Option<&Pluralizer>,
) -> Result<&'node str, ResolutionError> {
    if let Some(text) = node.as_template() {
        return Ok(text);
    }

    let branch = |name: &str| leaf(node, name);

    match selector {
        Some(Selector::Count(count)) => {
            let selector_key = pluralize.map_or_else(|| plural_key(*count), |rule| rule(*count));
            branch(&selector_key)
                .or_else(|| branch(PLURAL_FALLBACK))
                .ok_or_else(|| ResolutionError::MissingPluralBranch {
                    key: key.to_owned(),
                    selector_key,
                })
        }
        Some(Selector::Subkey(subkey)) => branch(subkey)
            .or_else(|| branch(SUBKEY_FALLBACK))
            .ok_or_else(|| ResolutionError::MissingSubkeyBranch {
                key: key.to_owned(),
                subkey: subkey.clone(),
            }),
        None => node
            .default_template()
            .or_else(|| branch(SUBKEY_FALLBACK))
            .or_else(|| branch(PLURAL_FALLBACK))
            .ok_or_else(|| ResolutionError::MissingSelector {
                key: key.to_owned(),
            }),
    }
}

fn leaf<'node>(node: &'node TranslationNode, name: &str) -> Option<&'node str> {
    node.child(name).and_then(TranslationNode::as_template)
}
