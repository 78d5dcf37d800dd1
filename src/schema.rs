//! Schema value object
//!
//! One resolvable node: a document root or a subschema within one. A
//! node carries its normalized identity, parsed content, a non-owning
//! link to its enclosing schema, a write-once generated-type handle, and
//! a lazily computed content digest used for structural deduplication.

use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::builder::TypeHandle;
use crate::checksum::Checksum;

/// A resolvable schema node.
///
/// Roots have no parent. The generated-type handle transitions at most
/// once from absent to present; the registry's creation discipline plus
/// the `OnceLock` cell make nodes safe for concurrent read after
/// creation.
#[derive(Debug)]
pub struct Schema {
    /// Normalized URI identity; `None` for pure in-memory roots
    id: Option<String>,
    content: Value,
    /// Enclosing schema; `None` marks a root
    parent: Option<Arc<Schema>>,
    resolved_type: OnceLock<TypeHandle>,
    content_hash: OnceLock<Checksum>,
}

impl Schema {
    /// Create a root schema (a whole document, or an in-memory tree).
    pub fn root(id: Option<String>, content: Value) -> Arc<Self> {
        Arc::new(Self {
            id,
            content,
            parent: None,
            resolved_type: OnceLock::new(),
            content_hash: OnceLock::new(),
        })
    }

    /// Create a subschema node enclosed by `parent`.
    pub fn child(id: String, content: Value, parent: Arc<Schema>) -> Arc<Self> {
        Arc::new(Self {
            id: Some(id),
            content,
            parent: Some(parent),
            resolved_type: OnceLock::new(),
            content_hash: OnceLock::new(),
        })
    }

    /// Normalized identity, if this node has one
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Identity for error context: the id, or the nearest ancestor's id
    pub fn document(&self) -> String {
        let mut node = self;
        loop {
            if let Some(id) = &node.id {
                return id.clone();
            }
            match &node.parent {
                Some(parent) => node = parent,
                None => return "<inline>".to_string(),
            }
        }
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Enclosing schema; `None` for roots
    pub fn parent(&self) -> Option<&Arc<Schema>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Walk parent links to the transitive root.
    pub fn transitive_root(self: &Arc<Self>) -> Arc<Schema> {
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent.clone() {
            current = parent;
        }
        current
    }

    /// Whether this node's root has a real backing document.
    pub fn has_backing_document(self: &Arc<Self>) -> bool {
        self.transitive_root().id.is_some()
    }

    /// The generated-type handle, if one has been assigned
    pub fn resolved_type(&self) -> Option<TypeHandle> {
        self.resolved_type.get().copied()
    }

    /// Assign the generated-type handle if none is set yet.
    ///
    /// Returns the handle that is actually in place afterwards: the
    /// first assignment wins, later calls are no-ops.
    pub fn set_type_if_empty(&self, handle: TypeHandle) -> TypeHandle {
        *self.resolved_type.get_or_init(|| handle)
    }

    /// Stable digest over canonically serialized content.
    ///
    /// Two distinct locations with identical content hash identically
    /// and may share one generated type.
    pub fn content_hash(&self) -> &Checksum {
        self.content_hash
            .get_or_init(|| Checksum::of_value(&self.content))
    }
}
