//! Translation data model and the swappable store handle.
//!
//! A [`MessageStore`] maps top-level keys to [`TranslationNode`]s. Stores are
//! immutable once shared: [`StoreHandle`] hands out `Arc` snapshots and swaps
//! the whole map on replacement, so a resolution that started against one
//! snapshot finishes against the same data.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;

/// Fallback child consulted for numeric selectors.
pub const PLURAL_FALLBACK: &str = "n";

/// Fallback child consulted for sub-key selectors.
pub const SUBKEY_FALLBACK: &str = "*";

/// A single message definition.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(from = "RawNode")]
pub enum TranslationNode {
    /// Leaf message with zero or more `{placeholder}` tokens.
    Template {
        /// Raw template text.
        text: String,
    },
    /// Keyed branches used for both plural forms and sub-keys.
    Group {
        /// Branches keyed by stringified count, sub-key, `"n"` or `"*"`.
        children: HashMap<String, TranslationNode>,
        /// Branch used when no selector is supplied.
        default_child_key: Option<String>,
    },
}

impl TranslationNode {
    /// Build a leaf template.
    ///
    /// ```
    /// use phrasebook::TranslationNode;
    ///
    /// let node = TranslationNode::template("Hello {name}!");
    /// assert_eq!(node.as_template(), Some("Hello {name}!"));
    /// ```
    #[must_use]
    pub fn template(text: impl Into<String>) -> Self {
        Self::Template { text: text.into() }
    }

    /// Build a group whose default branch is derived from its children:
    /// `"*"` when present, otherwise `"n"`, otherwise none.
    ///
    /// ```
    /// use phrasebook::TranslationNode;
    ///
    /// let node = TranslationNode::group([("0", "no items"), ("n", "{count} items")]);
    /// assert_eq!(node.default_child_key(), Some("n"));
    /// ```
    #[must_use]
    pub fn group<K, V>(branches: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        let children: HashMap<String, Self> = branches
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let default_child_key = derive_default_key(&children);
        Self::Group {
            children,
            default_child_key,
        }
    }

    /// Build a group with an explicit default branch, overriding the
    /// `"*"`/`"n"` derivation.
    ///
    /// ```
    /// use phrasebook::TranslationNode;
    ///
    /// let node = TranslationNode::group_with_default(
    ///     [("*", "Click me"), ("primary", "Continue")],
    ///     "primary",
    /// );
    /// assert_eq!(node.default_template(), Some("Continue"));
    /// ```
    #[must_use]
    pub fn group_with_default<K, V>(
        branches: impl IntoIterator<Item = (K, V)>,
        default_key: impl Into<String>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        let children = branches
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::Group {
            children,
            default_child_key: Some(default_key.into()),
        }
    }

    /// Template text when the node is a leaf.
    #[must_use]
    pub fn as_template(&self) -> Option<&str> {
        match self {
            Self::Template { text } => Some(text.as_str()),
            Self::Group { .. } => None,
        }
    }

    /// Whether the node is a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Look up a direct child of a group. Leaves have no children.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Group { children, .. } => children.get(key),
            Self::Template { .. } => None,
        }
    }

    /// Key of the branch used when no selector is supplied.
    #[must_use]
    pub fn default_child_key(&self) -> Option<&str> {
        match self {
            Self::Group {
                default_child_key, ..
            } => default_child_key.as_deref(),
            Self::Template { .. } => None,
        }
    }

    /// The default branch of a group, if it exists and is a leaf.
    #[must_use]
    pub fn default_template(&self) -> Option<&str> {
        self.default_child_key()
            .and_then(|key| self.child(key))
            .and_then(Self::as_template)
    }

    /// Groups without children carry no translation.
    #[must_use]
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group { children, .. } if children.is_empty())
    }
}

impl From<&str> for TranslationNode {
    fn from(text: &str) -> Self {
        Self::template(text)
    }
}

impl From<String> for TranslationNode {
    fn from(text: String) -> Self {
        Self::Template { text }
    }
}

fn derive_default_key(children: &HashMap<String, TranslationNode>) -> Option<String> {
    [SUBKEY_FALLBACK, PLURAL_FALLBACK]
        .into_iter()
        .find(|candidate| children.contains_key(*candidate))
        .map(str::to_owned)
}

/// Shape of already-deserialized host data: strings are leaves, maps are
/// groups.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Text(String),
    Group(HashMap<String, RawNode>),
}

impl From<RawNode> for TranslationNode {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Text(text) => Self::Template { text },
            RawNode::Group(children) => Self::group(children),
        }
    }
}

/// Top-level key to node mapping.
///
/// Empty groups are dropped on insertion, so a key either maps to something
/// resolvable or is missing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "HashMap<String, TranslationNode>")]
pub struct MessageStore {
    entries: HashMap<String, TranslationNode>,
}

impl MessageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning the previous node for `key`.
    ///
    /// An empty group removes `key` instead.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        node: impl Into<TranslationNode>,
    ) -> Option<TranslationNode> {
        let owned_key = key.into();
        let owned_node = node.into();
        if owned_node.is_empty_group() {
            return self.entries.remove(&owned_key);
        }
        self.entries.insert(owned_key, owned_node)
    }

    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        self.entries.get(key)
    }

    /// Look up a top-level key, borrowing the stored key alongside the node.
    pub(crate) fn get_entry(&self, key: &str) -> Option<(&str, &TranslationNode)> {
        self.entries
            .get_key_value(key)
            .map(|(stored, node)| (stored.as_str(), node))
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the top-level keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over key/node pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }
}

impl<K, V> FromIterator<(K, V)> for MessageStore
where
    K: Into<String>,
    V: Into<TranslationNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, node) in iter {
            store.insert(key, node);
        }
        store
    }
}

impl From<HashMap<String, TranslationNode>> for MessageStore {
    fn from(entries: HashMap<String, TranslationNode>) -> Self {
        entries.into_iter().collect()
    }
}

/// Shared, atomically replaceable reference to the active [`MessageStore`].
#[derive(Debug, Default)]
pub struct StoreHandle {
    current: RwLock<Arc<MessageStore>>,
}

impl StoreHandle {
    /// Wrap `store` as the initial snapshot.
    #[must_use]
    pub fn new(store: MessageStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Return the active snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<MessageStore> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in `store`, returning the snapshot it replaced.
    ///
    /// Readers holding the previous snapshot keep it until they drop it.
    pub fn replace(&self, store: MessageStore) -> Arc<MessageStore> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(store))
    }
}
