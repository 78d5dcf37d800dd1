//! Type Builder interface
//!
//! The rule engine emits declarations through this seam; the concrete
//! target-language syntax/text emitter lives behind it. The crate ships
//! [`InMemoryTypeBuilder`], a model-building implementation that keeps an
//! explicit namespace -> declarations index (queried by name, never by
//! reflection) and serializes cleanly so drivers can render or dump the
//! generated model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{GeneratorError, Result};

// =============================================================================
// Handles and type references
// =============================================================================

/// Opaque handle to a declared type, issued by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle(pub usize);

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// Structured record with fields and accessors
    Class,
    /// Closed set of named constants
    Enum,
    /// Choice of variant subtypes (combinator synthesis)
    Union,
}

/// Primitive representations the target type system understands.
///
/// Which of these a JSON scalar maps to is decided by the generation
/// configuration (fixed-width vs arbitrary precision numerics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Long,
    BigInteger,
    Double,
    BigDecimal,
    String,
    Null,
}

/// A reference to a type usable as a field, item, or parent position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A type declared through this builder
    Declared(TypeHandle),
    /// A scalar representation
    Primitive(PrimitiveKind),
    /// An externally-named type (format overrides, `extendsType`)
    Named(String),
    /// Ordered collection
    List(Box<TypeRef>),
    /// Unique-items collection
    Set(Box<TypeRef>),
    /// String-keyed map (additional properties)
    Map(Box<TypeRef>),
    /// Open representation for untyped nodes
    Any,
}

// =============================================================================
// Declaration pieces
// =============================================================================

/// A field on a class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Target-language identifier
    pub name: String,
    /// Original property name in the source document
    pub source_name: String,
    pub ty: TypeRef,
    pub required: bool,
    /// Default value carried over from the schema, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Accessor kinds the naming policy derives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Getter,
    Setter,
    Builder,
}

/// A derived accessor on a class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorDecl {
    pub name: String,
    pub kind: AccessorKind,
    /// Field the accessor reads or writes
    pub field: String,
}

/// A named constant on an enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstantDecl {
    pub name: String,
    /// The literal value the constant serializes to
    pub value: Value,
}

/// Where an annotation attaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationSite {
    Type,
    Field(String),
    Accessor(String),
    EnumConstant(String),
}

/// Parent-type position for inheritance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRef {
    Declared(TypeHandle),
    Named(String),
}

// =============================================================================
// Builder trait
// =============================================================================

/// Emission seam between the rule engine and the target-language emitter.
///
/// `declare_type` must signal a conflict for a repeated (namespace, name)
/// pair; the core resolves the conflict through the naming policy and
/// retries. All other operations address a previously issued handle.
pub trait TypeBuilder {
    fn declare_type(&mut self, namespace: &str, name: &str, kind: DeclKind) -> Result<TypeHandle>;

    /// Explicit namespace -> declarations index, queried by name.
    fn lookup_type(&self, namespace: &str, name: &str) -> Option<TypeHandle>;

    fn add_field(&mut self, handle: TypeHandle, field: FieldDecl) -> Result<()>;
    fn add_accessor(&mut self, handle: TypeHandle, accessor: AccessorDecl) -> Result<()>;
    fn add_enum_constant(&mut self, handle: TypeHandle, constant: EnumConstantDecl) -> Result<()>;
    fn add_annotation(&mut self, handle: TypeHandle, site: AnnotationSite, text: &str)
        -> Result<()>;
    fn set_parent(&mut self, handle: TypeHandle, parent: ParentRef) -> Result<()>;
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// A complete declaration in the in-memory model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub namespace: String,
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<AccessorDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<EnumConstantDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<(AnnotationSite, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
}

/// Default model-building implementation of [`TypeBuilder`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InMemoryTypeBuilder {
    types: Vec<TypeDecl>,
    /// (namespace, name) -> handle; the declarations index
    #[serde(skip)]
    index: HashMap<(String, String), TypeHandle>,
}

impl InMemoryTypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: TypeHandle) -> Option<&TypeDecl> {
        self.types.get(handle.0)
    }

    /// All declarations, in declaration order
    pub fn declarations(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Declarations grouped under one namespace
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a TypeDecl> {
        self.types.iter().filter(move |t| t.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn decl_mut(&mut self, handle: TypeHandle) -> Result<&mut TypeDecl> {
        let count = self.types.len();
        self.types.get_mut(handle.0).ok_or_else(|| {
            GeneratorError::conflict(
                "<builder>",
                format!("unknown type handle {} (of {count})", handle.0),
            )
        })
    }
}

impl TypeBuilder for InMemoryTypeBuilder {
    fn declare_type(&mut self, namespace: &str, name: &str, kind: DeclKind) -> Result<TypeHandle> {
        let key = (namespace.to_string(), name.to_string());
        if self.index.contains_key(&key) {
            return Err(GeneratorError::conflict(
                namespace,
                format!("type '{name}' is already declared in this namespace"),
            ));
        }
        let handle = TypeHandle(self.types.len());
        self.types.push(TypeDecl {
            name: name.to_string(),
            namespace: namespace.to_string(),
            kind,
            fields: Vec::new(),
            accessors: Vec::new(),
            constants: Vec::new(),
            annotations: Vec::new(),
            parent: None,
        });
        self.index.insert(key, handle);
        Ok(handle)
    }

    fn lookup_type(&self, namespace: &str, name: &str) -> Option<TypeHandle> {
        self.index
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    fn add_field(&mut self, handle: TypeHandle, field: FieldDecl) -> Result<()> {
        self.decl_mut(handle)?.fields.push(field);
        Ok(())
    }

    fn add_accessor(&mut self, handle: TypeHandle, accessor: AccessorDecl) -> Result<()> {
        self.decl_mut(handle)?.accessors.push(accessor);
        Ok(())
    }

    fn add_enum_constant(&mut self, handle: TypeHandle, constant: EnumConstantDecl) -> Result<()> {
        self.decl_mut(handle)?.constants.push(constant);
        Ok(())
    }

    fn add_annotation(
        &mut self,
        handle: TypeHandle,
        site: AnnotationSite,
        text: &str,
    ) -> Result<()> {
        self.decl_mut(handle)?
            .annotations
            .push((site, text.to_string()));
        Ok(())
    }

    fn set_parent(&mut self, handle: TypeHandle, parent: ParentRef) -> Result<()> {
        self.decl_mut(handle)?.parent = Some(parent);
        Ok(())
    }
}
