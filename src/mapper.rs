//! Mapper
//!
//! Entry orchestrator for one document: obtain the root schema (by URI,
//! inline, or inferred from example JSON), pick the target namespace,
//! and hand the root to the rule engine's top-level rule.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::annotate::Annotator;
use crate::builder::{TypeBuilder, TypeRef};
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::infer::infer_schema;
use crate::namespace::NamespaceMapping;
use crate::registry::SchemaRegistry;
use crate::rules::RuleEngine;
use crate::schema::Schema;

/// A source document for one generation
#[derive(Debug, Clone)]
pub enum Source {
    /// Fetch through the registry by URI
    Uri(String),
    /// An inline schema document
    Schema(Value),
    /// An inline example document; a schema is inferred first
    Example(Value),
}

/// Orchestrates generation of one document at a time.
pub struct Mapper<'a> {
    registry: &'a SchemaRegistry,
    config: &'a GenerationConfig,
    annotator: &'a dyn Annotator,
    namespaces: NamespaceMapping,
}

impl<'a> Mapper<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        config: &'a GenerationConfig,
        annotator: &'a dyn Annotator,
    ) -> Self {
        let namespaces = NamespaceMapping::new(
            config.namespace_mappings.clone(),
            config.target_namespace.clone(),
        );
        Self {
            registry,
            config,
            annotator,
            namespaces,
        }
    }

    /// Generate types for one document, returning the root type.
    ///
    /// `name` is the contextual name for the root declaration when the
    /// document carries no override of its own.
    pub fn generate(
        &self,
        builder: &mut dyn TypeBuilder,
        name: &str,
        source: Source,
    ) -> Result<TypeRef> {
        let namespace = self.namespace_for(&source);
        debug!(name, namespace = %namespace, "generating document");

        let root: Arc<Schema> = match source {
            Source::Uri(uri) => self
                .registry
                .create(&uri, &self.config.ref_fragment_delimiters)?,
            Source::Schema(content) => Schema::root(None, content),
            Source::Example(example) => Schema::root(None, infer_schema(&example)),
        };

        let mut engine = RuleEngine::new(self.registry, builder, self.annotator, self.config);
        engine.apply(name, &root, &namespace)
    }

    fn namespace_for(&self, source: &Source) -> String {
        match source {
            Source::Uri(uri) => {
                let scope = match Url::parse(uri) {
                    Ok(url) => url.path().trim_start_matches('/').to_string(),
                    Err(_) => uri.clone(),
                };
                self.namespaces.resolve(&scope).to_string()
            }
            _ => self.namespaces.resolve("").to_string(),
        }
    }
}
