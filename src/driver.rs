//! Generation driver
//!
//! Batch orchestration over a source list: expands directories, runs
//! optional pre-flight validation, and generates each document through
//! the mapper. Skip-and-continue is driver policy, never core policy:
//! a document failure is recorded (or aborts the batch, per config)
//! without corrupting schema identities already resolved for other
//! documents.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;
use walkdir::WalkDir;

use crate::annotate;
use crate::builder::InMemoryTypeBuilder;
use crate::config::DriverConfig;
use crate::content::{ContentResolver, DefaultContentResolver};
use crate::mapper::{Mapper, Source};
use crate::registry::SchemaRegistry;

/// Outcome of one source document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub source: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one batch run
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    pub outcomes: Vec<DocumentOutcome>,
    pub type_count: usize,
    /// The generated declarations model
    pub model: InMemoryTypeBuilder,
}

impl GenerationReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

/// Batch driver around one registry lifetime.
pub struct GenerationDriver {
    config: DriverConfig,
}

impl GenerationDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Run the whole batch and return the report with the built model.
    pub fn run(&self) -> anyhow::Result<GenerationReport> {
        let registry = SchemaRegistry::new();
        let annotator = annotate::for_style(self.config.generation.annotation_style);
        let mapper = Mapper::new(&registry, &self.config.generation, &annotator);
        let mut builder = InMemoryTypeBuilder::new();
        let mut outcomes = Vec::new();

        for source in self.expand_sources()? {
            let name = document_name(&source);

            let result = self
                .preflight(&source)
                .and_then(|()| self.source_for(&source))
                .and_then(|input| {
                    mapper
                        .generate(&mut builder, &name, input)
                        .map_err(anyhow::Error::from)
                })
                .map(|_| ());

            match result {
                Ok(()) => {
                    info!(source = %source, "generated");
                    outcomes.push(DocumentOutcome {
                        source,
                        ok: true,
                        error: None,
                    });
                }
                Err(error) if self.config.continue_on_error => {
                    warn!(source = %source, %error, "generation failed, continuing");
                    outcomes.push(DocumentOutcome {
                        source,
                        ok: false,
                        error: Some(error.to_string()),
                    });
                }
                Err(error) => return Err(error.context(format!("generating {source}"))),
            }
        }

        // Identities must not leak into a later independent run.
        registry.clear();

        Ok(GenerationReport {
            generated_at: Utc::now(),
            outcomes,
            type_count: builder.len(),
            model: builder,
        })
    }

    /// Expand the configured sources: directories become their `.json`
    /// files, plain paths become `file:` URIs, URIs pass through.
    fn expand_sources(&self) -> anyhow::Result<Vec<String>> {
        let mut expanded = Vec::new();
        for source in &self.config.sources {
            if source.contains("://") || source.starts_with("resource:") || source.starts_with("classpath:") {
                expanded.push(source.clone());
                continue;
            }

            let path = Path::new(source);
            if path.is_dir() {
                for entry in WalkDir::new(path).sort_by_file_name() {
                    let entry = entry?;
                    if entry.file_type().is_file()
                        && entry.path().extension().is_some_and(|e| e == "json")
                    {
                        expanded.push(to_file_uri(entry.path())?);
                    }
                }
            } else {
                expanded.push(to_file_uri(path)?);
            }
        }
        Ok(expanded)
    }

    /// In example mode the document content is fetched up front and a
    /// schema is inferred from it; in schema mode the URI goes through
    /// the registry so relative references keep their base.
    fn source_for(&self, source: &str) -> anyhow::Result<Source> {
        if self.config.example_mode {
            let resolver = DefaultContentResolver::new();
            Ok(Source::Example(resolver.resolve(source)?))
        } else {
            Ok(Source::Uri(source.to_string()))
        }
    }

    /// Optional pre-flight check: the document must compile as a JSON
    /// Schema before generation is attempted.
    fn preflight(&self, source: &str) -> anyhow::Result<()> {
        if !self.config.validate_input || self.config.example_mode {
            return Ok(());
        }
        let resolver = DefaultContentResolver::new();
        let document = resolver.resolve(source)?;
        if let Err(error) = jsonschema::JSONSchema::compile(&document) {
            anyhow::bail!("{source} is not a valid schema: {error}");
        }
        Ok(())
    }
}

/// Contextual root-type name for a source: its file stem.
fn document_name(source: &str) -> String {
    let path = source.rsplit('/').next().unwrap_or(source);
    path.trim_end_matches(".json")
        .trim_end_matches(".schema")
        .to_string()
}

fn to_file_uri(path: &Path) -> anyhow::Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .map_err(|_| anyhow::anyhow!("not a representable file path: {}", path.display()))
}
