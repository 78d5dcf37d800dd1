//! Schema registry
//!
//! Owns identity -> schema caching. Composes content access and fragment
//! resolution to materialize schema nodes lazily and idempotently: an
//! identical normalized identity always yields the same schema instance
//! within one registry lifetime. Creation is serialized (single writer
//! per registry); created schemas are safe for concurrent read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use url::Url;

use crate::content::{ContentResolver, DefaultContentResolver};
use crate::error::{GeneratorError, Result};
use crate::fragment;
use crate::schema::Schema;
use crate::token;

/// Default delimiter set for fragment paths: pointer style plus the
/// dotted compatibility style.
pub const DEFAULT_FRAGMENT_DELIMITERS: &str = "#/.";

/// Identity-keyed schema cache with idempotent create-or-get semantics.
pub struct SchemaRegistry {
    resolver: Box<dyn ContentResolver + Send + Sync>,
    schemas: Mutex<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::with_resolver(Box::new(DefaultContentResolver::new()))
    }

    /// Build a registry around a custom content resolver.
    pub fn with_resolver(resolver: Box<dyn ContentResolver + Send + Sync>) -> Self {
        Self {
            resolver,
            schemas: Mutex::new(HashMap::new()),
        }
    }

    /// Create or fetch the schema for a URI, which may carry a fragment.
    ///
    /// The identity is normalized first (trailing bare `#` stripped). If
    /// the base document is not cached yet it is fetched and registered
    /// as a root; a fragment is then resolved against the base content
    /// and registered under the full normalized identity. Repeat calls
    /// with the same normalized identity return the cached instance.
    pub fn create(&self, uri: &str, delimiters: &str) -> Result<Arc<Schema>> {
        let normalized = normalize_identity(uri);
        let mut cache = self.cache();

        if let Some(existing) = cache.get(&normalized) {
            return Ok(Arc::clone(existing));
        }

        let (base, fragment) = split_fragment(&normalized);

        let base_schema = match cache.get(base) {
            Some(existing) => Arc::clone(existing),
            None => {
                debug!(uri = base, "fetching schema document");
                let content = self.resolver.resolve(base)?;
                let root = Schema::root(Some(base.to_string()), content);
                cache.insert(base.to_string(), Arc::clone(&root));
                root
            }
        };

        match fragment {
            None => Ok(base_schema),
            Some(frag) => {
                let subtree =
                    fragment::resolve(base_schema.content(), frag, delimiters, base)?.clone();
                let child = Schema::child(normalized.clone(), subtree, Arc::clone(&base_schema));
                cache.insert(normalized, Arc::clone(&child));
                Ok(child)
            }
        }
    }

    /// Resolve a path relative to a schema's identity.
    ///
    /// A bare `#` (or empty path) names the enclosing document and
    /// resolves to the transitive root. Fragment paths on a schema chain
    /// with no real backing document are resolved directly against the
    /// transitive root's content, which supports purely in-memory schema
    /// graphs. Everything else resolves through the URI-keyed path.
    pub fn create_relative(
        &self,
        parent: &Arc<Schema>,
        path: &str,
        delimiters: &str,
    ) -> Result<Arc<Schema>> {
        let stripped = path.trim_end_matches('#');
        if stripped.is_empty() {
            return Ok(parent.transitive_root());
        }

        if let Some(base_url) = parent.id().and_then(|id| Url::parse(id).ok()) {
            let joined = base_url.join(stripped).map_err(|e| {
                GeneratorError::resolution(parent.document(), path, e.to_string())
            })?;
            return self.create(joined.as_str(), delimiters);
        }

        if stripped.starts_with('#') {
            // No backing document: resolve against the in-memory root.
            let mut cache = self.cache();
            if let Some(existing) = cache.get(stripped) {
                return Ok(Arc::clone(existing));
            }
            let root = parent.transitive_root();
            let subtree =
                fragment::resolve(root.content(), stripped, delimiters, &parent.document())?
                    .clone();
            let child = Schema::child(stripped.to_string(), subtree, Arc::clone(parent));
            cache.insert(stripped.to_string(), Arc::clone(&child));
            return Ok(child);
        }

        Err(GeneratorError::resolution(
            parent.document(),
            path,
            "cannot resolve a relative reference without a base document",
        ))
    }

    /// Child schema for a declared property.
    ///
    /// The property name goes through the token codec, so names
    /// containing pointer punctuation stay addressable.
    pub fn create_property(
        &self,
        parent: &Arc<Schema>,
        property: &str,
        delimiters: &str,
    ) -> Result<Arc<Schema>> {
        self.create_nested(parent, &format!("properties/{}", token::encode(property)), delimiters)
    }

    /// Child schema at a pointer location directly below `parent`
    /// (e.g. `items`, `extends`, `oneOf/0`).
    pub fn create_nested(
        &self,
        parent: &Arc<Schema>,
        suffix: &str,
        delimiters: &str,
    ) -> Result<Arc<Schema>> {
        let path = format!("{}/{}", fragment_of(parent), suffix);
        self.create_relative(parent, &path, delimiters)
    }

    /// Number of cached identities
    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    /// Reset the registry. Required between independent generation runs
    /// so identity and type assignment never leak across runs.
    pub fn clear(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Arc<Schema>>> {
        self.schemas.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The fragment part of a schema's identity, `#` when it has none.
fn fragment_of(schema: &Schema) -> String {
    schema
        .id()
        .and_then(|id| id.find('#').map(|at| id[at..].to_string()))
        .unwrap_or_else(|| "#".to_string())
}

/// Normalize an identity: parse-normalize absolute URIs and strip a
/// trailing bare `#`.
fn normalize_identity(uri: &str) -> String {
    let trimmed = uri.trim_end_matches('#');
    match Url::parse(trimmed) {
        Ok(url) => {
            let mut s = url.to_string();
            while s.ends_with('#') {
                s.pop();
            }
            s
        }
        Err(_) => trimmed.to_string(),
    }
}

/// Split a normalized identity into base document identity and fragment.
fn split_fragment(identity: &str) -> (&str, Option<&str>) {
    match identity.find('#') {
        Some(at) => (&identity[..at], Some(&identity[at..])),
        None => (identity, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    /// Content resolver backed by a fixed map, for tests.
    struct StubResolver {
        documents: HashMap<String, Value>,
    }

    impl StubResolver {
        fn new(documents: Vec<(&str, Value)>) -> Self {
            Self {
                documents: documents
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            }
        }
    }

    impl ContentResolver for StubResolver {
        fn resolve(&self, uri: &str) -> Result<Value> {
            self.documents
                .get(uri)
                .cloned()
                .ok_or_else(|| GeneratorError::unavailable(uri, "not stubbed"))
        }
    }

    fn registry_with(documents: Vec<(&str, Value)>) -> SchemaRegistry {
        SchemaRegistry::with_resolver(Box::new(StubResolver::new(documents)))
    }

    const D: &str = DEFAULT_FRAGMENT_DELIMITERS;

    #[test]
    fn test_same_identity_yields_same_instance() {
        let registry = registry_with(vec![(
            "http://example.org/address.json",
            json!({"type": "object"}),
        )]);
        let first = registry.create("http://example.org/address.json", D).unwrap();
        let second = registry.create("http://example.org/address.json", D).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_trailing_bare_hash_is_stripped() {
        let registry = registry_with(vec![(
            "http://example.org/a.json",
            json!({"type": "object"}),
        )]);
        let plain = registry.create("http://example.org/a.json", D).unwrap();
        let hashed = registry.create("http://example.org/a.json#", D).unwrap();
        assert!(Arc::ptr_eq(&plain, &hashed));
    }

    #[test]
    fn test_fragment_creates_child_keyed_by_full_identity() {
        let registry = registry_with(vec![(
            "http://example.org/a.json",
            json!({"definitions": {"embedded": {"type": "string"}}}),
        )]);
        let embedded = registry
            .create("http://example.org/a.json#/definitions/embedded", D)
            .unwrap();
        assert_eq!(*embedded.content(), json!({"type": "string"}));
        assert_eq!(
            embedded.id(),
            Some("http://example.org/a.json#/definitions/embedded")
        );
        assert!(!embedded.is_root());

        // The base document was registered too, and "#" leads back to it.
        let root = registry.create("http://example.org/a.json", D).unwrap();
        let back = registry.create_relative(&embedded, "#", D).unwrap();
        assert!(Arc::ptr_eq(&root, &back));
    }

    #[test]
    fn test_relative_resolution_replaces_last_segment() {
        let registry = registry_with(vec![
            ("http://example.org/schemas/address.json", json!({"type": "object"})),
            ("http://example.org/schemas/enum.json", json!({"enum": ["a", "b"]})),
        ]);
        let address = registry
            .create("http://example.org/schemas/address.json", D)
            .unwrap();
        let resolved = registry.create_relative(&address, "enum.json", D).unwrap();
        assert_eq!(resolved.id(), Some("http://example.org/schemas/enum.json"));
    }

    #[test]
    fn test_hash_against_root_returns_that_root() {
        let registry = registry_with(vec![("http://example.org/a.json", json!({}))]);
        let root = registry.create("http://example.org/a.json", D).unwrap();
        let same = registry.create_relative(&root, "#", D).unwrap();
        assert!(Arc::ptr_eq(&root, &same));
    }

    #[test]
    fn test_in_memory_fragment_resolution() {
        let registry = registry_with(vec![]);
        let root = Schema::root(
            None,
            json!({"definitions": {"embedded": {"type": "integer"}}}),
        );
        let embedded = registry
            .create_relative(&root, "#/definitions/embedded", D)
            .unwrap();
        assert_eq!(*embedded.content(), json!({"type": "integer"}));

        // Idempotent for the same in-memory identity
        let again = registry
            .create_relative(&root, "#/definitions/embedded", D)
            .unwrap();
        assert!(Arc::ptr_eq(&embedded, &again));

        // "#" walks back to the in-memory root
        let back = registry.create_relative(&embedded, "#", D).unwrap();
        assert!(Arc::ptr_eq(&back, &root));
    }

    #[test]
    fn test_relative_without_base_document_fails() {
        let registry = registry_with(vec![]);
        let root = Schema::root(None, json!({}));
        let err = registry.create_relative(&root, "other.json", D).unwrap_err();
        assert!(matches!(err, GeneratorError::ReferenceResolution { .. }));
    }

    #[test]
    fn test_property_schema_with_punctuated_name() {
        let registry = registry_with(vec![]);
        let root = Schema::root(
            None,
            json!({"properties": {"com/vsv#...": {"type": "boolean"}}}),
        );
        let child = registry.create_property(&root, "com/vsv#...", D).unwrap();
        assert_eq!(*child.content(), json!({"type": "boolean"}));
        assert_eq!(child.id(), Some("#/properties/com~1vsv~2~3~3~3"));
    }

    #[test]
    fn test_missing_fragment_segment_is_resolution_error() {
        let registry = registry_with(vec![("http://example.org/a.json", json!({}))]);
        let err = registry
            .create("http://example.org/a.json#/definitions/nope", D)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::ReferenceResolution { .. }));
    }

    #[test]
    fn test_clear_resets_identities() {
        let registry = registry_with(vec![("http://example.org/a.json", json!({}))]);
        let first = registry.create("http://example.org/a.json", D).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        let second = registry.create("http://example.org/a.json", D).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unavailable_content_propagates() {
        let registry = registry_with(vec![]);
        let err = registry.create("http://example.org/missing.json", D).unwrap_err();
        assert!(matches!(err, GeneratorError::ContentUnavailable { .. }));
    }
}
