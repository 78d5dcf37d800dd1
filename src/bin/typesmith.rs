//! Typesmith CLI
//!
//! Generation driver frontend: generate types from schema or example
//! documents, inspect a document's structural classification, or show
//! the effective configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typesmith::config::DriverConfig;
use typesmith::content::{ContentResolver, DefaultContentResolver};
use typesmith::driver::GenerationDriver;
use typesmith::rules::SchemaKind;

#[derive(Parser)]
#[command(name = "typesmith")]
#[command(about = "Generate structured type declarations from JSON Schema or example JSON")]
struct Cli {
    /// Path to a typesmith.toml config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate types from source documents
    Generate {
        /// Source documents: URIs, files, or directories
        sources: Vec<String>,

        /// Target namespace for generated types
        #[arg(short, long)]
        namespace: Option<String>,

        /// Write the generated model here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat sources as example JSON rather than schemas
        #[arg(long)]
        example: bool,

        /// Validate each document as a schema before generating
        #[arg(long)]
        validate: bool,

        /// Keep going when a document fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Show how a document's nodes classify, without generating
    Inspect {
        /// Source document: URI or file
        source: String,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DriverConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            sources,
            namespace,
            output,
            example,
            validate,
            continue_on_error,
        } => {
            if !sources.is_empty() {
                config.sources = sources;
            }
            if let Some(namespace) = namespace {
                config.generation.target_namespace = namespace;
            }
            if let Some(output) = output {
                config.output = Some(output);
            }
            config.example_mode |= example;
            config.validate_input |= validate;
            config.continue_on_error |= continue_on_error;

            if config.sources.is_empty() {
                anyhow::bail!("no sources given (pass paths/URIs or set them in typesmith.toml)");
            }

            let report = GenerationDriver::new(config.clone()).run()?;

            let rendered = serde_json::to_string_pretty(&report)?;
            match &config.output {
                Some(path) => {
                    std::fs::write(path, &rendered)?;
                    println!(
                        "Generated {} type(s) from {} document(s) -> {}",
                        report.type_count,
                        report.outcomes.len(),
                        path.display()
                    );
                }
                None => println!("{rendered}"),
            }

            if report.failed() > 0 {
                eprintln!("{} document(s) failed", report.failed());
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Inspect { source } => {
            let resolver = DefaultContentResolver::new();
            let document = resolver.resolve(&source)?;

            let kind = SchemaKind::classify(&document);
            println!("{source}: {kind:?}");

            if let Some(properties) = document.get("properties").and_then(|p| p.as_object()) {
                for (name, node) in properties {
                    println!("  {name}: {:?}", SchemaKind::classify(node));
                }
            }
            Ok(())
        }

        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
