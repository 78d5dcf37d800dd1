//! Typesmith
//!
//! A schema-driven type generator: consumes JSON Schema documents (or,
//! in an alternate mode, plain JSON-by-example documents) and produces
//! declarations of structured types — classes, fields, accessors,
//! enums — through a pluggable Type Builder, optionally decorated per a
//! serialization-annotation style.
//!
//! ## Architecture
//!
//! ```text
//! Mapper ──► RuleEngine ──► TypeBuilder (+ Annotators)
//!               │
//!               ▼
//!        SchemaRegistry ──► ContentResolver
//!               │                  │
//!         FragmentResolver    file / http / resource
//! ```
//!
//! - **SchemaRegistry**: identity-based loading, caching, and
//!   reference/fragment resolution across documents
//! - **RuleEngine**: structural dispatch from schema shape to generated
//!   declarations, with naming/uniqueness policy, content-hash
//!   deduplication, and cycle-safe generation ordering
//! - **Mapper**: per-document orchestration, including example-JSON
//!   inference
//! - **GenerationDriver**: batch policy around the core (directory
//!   expansion, pre-flight validation, skip-and-continue)

pub mod annotate;
pub mod builder;
pub mod checksum;
pub mod config;
pub mod content;
pub mod driver;
pub mod error;
pub mod fragment;
pub mod infer;
pub mod mapper;
pub mod namespace;
pub mod naming;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod token;

pub use annotate::{Annotator, CompositeAnnotator, NoopAnnotator, SerdeStyleAnnotator};
pub use builder::{DeclKind, InMemoryTypeBuilder, PrimitiveKind, TypeBuilder, TypeHandle, TypeRef};
pub use checksum::Checksum;
pub use config::{AnnotationStyle, DriverConfig, GenerationConfig, InclusionLevel};
pub use content::{ContentResolver, DefaultContentResolver};
pub use driver::{GenerationDriver, GenerationReport};
pub use error::{GeneratorError, Result};
pub use mapper::{Mapper, Source};
pub use namespace::{MappingRule, NamespaceMapping, ScopeKind};
pub use naming::NamingPolicy;
pub use registry::{SchemaRegistry, DEFAULT_FRAGMENT_DELIMITERS};
pub use rules::{RuleEngine, SchemaKind};
pub use schema::Schema;
