//! Parameter store trait definition.
//!
//! This port is the key-value collaborator that holds `text`, `rate`, `pitch`
//! and `voice`. How values persist is the implementation's business.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::settings::ParamKey;

/// String key-value store for speech parameters.
///
/// Implementations use interior mutability so a single `Arc<dyn ParameterStore>`
/// can be shared between the controller and whatever UI edits the text.
pub trait ParameterStore: Send + Sync {
    /// Read a value; `None` when the key has never been set.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`ParameterStore`] for tests and single-session adapters.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryParameterStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with typed parameters.
    #[must_use]
    pub fn with_params<I, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (ParamKey, V)>,
        V: Into<String>,
    {
        let values = params
            .into_iter()
            .map(|(key, value)| (key.as_str().to_string(), value.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ParameterStore for MemoryParameterStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        tracing::trace!(key, len = value.len(), "Parameter stored");
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_store_returns_none() {
        let store = MemoryParameterStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("text"), None);
    }

    #[test]
    fn set_then_get() {
        let store = MemoryParameterStore::new();
        store.set("rate", "1.5");
        store.set("rate", "0.75");
        assert_eq!(store.get("rate").as_deref(), Some("0.75"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seeded_store_uses_canonical_key_names() {
        let store = MemoryParameterStore::with_params([
            (ParamKey::Text, "Hello world"),
            (ParamKey::Voice, "Alice"),
        ]);
        assert_eq!(store.get("text").as_deref(), Some("Hello world"));
        assert_eq!(store.get("voice").as_deref(), Some("Alice"));
        assert_eq!(store.get("pitch"), None);
    }

    #[test]
    fn shared_through_trait_object() {
        let store: Arc<dyn ParameterStore> = Arc::new(MemoryParameterStore::new());
        let writer = Arc::clone(&store);
        writer.set("text", "shared");
        assert_eq!(store.get("text").as_deref(), Some("shared"));
    }
}
