//! Generation configuration
//!
//! Two tiers, mirroring how the driver consumes them:
//! - [`GenerationConfig`]: passive behavioral switches the core reads
//!   (numeric representation, inclusion level, annotation style, naming
//!   delimiters, date/time representation). Unknown fields in loaded
//!   files are tolerated; every field has a default.
//! - [`DriverConfig`]: source list, output location, and batch policy,
//!   loadable from `typesmith.toml` files and `TYPESMITH_*` environment
//!   variables.

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::namespace::MappingRule;

/// Behavioral switches for one generation run. The core treats this as
/// passive data: it reads recognized fields and tolerates defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Namespace for generated types when no mapping rule applies
    #[serde(default)]
    pub target_namespace: String,

    /// Delimiter set used to split reference fragments
    #[serde(default = "default_delimiters")]
    pub ref_fragment_delimiters: String,

    /// Which members are generated per declared property
    #[serde(default)]
    pub inclusion: InclusionLevel,

    /// Serialization-annotation style applied to declarations
    #[serde(default)]
    pub annotation_style: AnnotationStyle,

    /// Numeric representation switches
    #[serde(default)]
    pub numeric: NumericConfig,

    /// Date/time representation for string formats
    #[serde(default)]
    pub date_time: DateTimeConfig,

    /// Identifier derivation switches
    #[serde(default)]
    pub naming: NamingConfig,

    /// Prefer a schema's `title` over the contextual node name
    #[serde(default)]
    pub use_title_as_name: bool,

    /// Generate a map-typed member for `additionalProperties` schemas
    #[serde(default = "default_true")]
    pub include_additional_properties: bool,

    /// Share one generated type between distinct locations with
    /// identical content
    #[serde(default = "default_true")]
    pub structural_dedup: bool,

    /// Extra `format` -> target type name overrides, merged over the
    /// built-in format table
    #[serde(default)]
    pub format_overrides: HashMap<String, String>,

    /// Ordered source-scope -> namespace rules
    #[serde(default)]
    pub namespace_mappings: Vec<MappingRule>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_namespace: String::new(),
            ref_fragment_delimiters: default_delimiters(),
            inclusion: InclusionLevel::default(),
            annotation_style: AnnotationStyle::default(),
            numeric: NumericConfig::default(),
            date_time: DateTimeConfig::default(),
            naming: NamingConfig::default(),
            use_title_as_name: false,
            include_additional_properties: true,
            structural_dedup: true,
            format_overrides: HashMap::new(),
            namespace_mappings: Vec::new(),
        }
    }
}

/// Which members are generated for each declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InclusionLevel {
    /// Fields only
    Fields,
    /// Fields and getters
    Getters,
    /// Fields, getters, and setters
    #[default]
    Accessors,
    /// Fields, getters, setters, and builder methods
    Builders,
}

impl InclusionLevel {
    pub fn getters(self) -> bool {
        self >= InclusionLevel::Getters
    }

    pub fn setters(self) -> bool {
        self >= InclusionLevel::Accessors
    }

    pub fn builders(self) -> bool {
        self >= InclusionLevel::Builders
    }
}

/// Serialization-annotation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStyle {
    /// No annotations
    None,
    /// serde-flavored rename/skip metadata
    #[default]
    Serde,
}

/// Numeric representation switches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct NumericConfig {
    #[serde(default)]
    pub integer: IntegerRepr,
    #[serde(default)]
    pub float: FloatRepr,
}

/// Representation of JSON `integer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegerRepr {
    #[default]
    Int,
    Long,
    BigInteger,
}

/// Representation of JSON `number`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FloatRepr {
    #[default]
    Double,
    BigDecimal,
}

/// Date/time representation for string formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTimeConfig {
    #[serde(default = "default_date_time_type")]
    pub date_time_type: String,
    #[serde(default = "default_date_type")]
    pub date_type: String,
    #[serde(default = "default_time_type")]
    pub time_type: String,
}

impl Default for DateTimeConfig {
    fn default() -> Self {
        Self {
            date_time_type: default_date_time_type(),
            date_type: default_date_type(),
            time_type: default_time_type(),
        }
    }
}

/// Identifier derivation switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Characters treated as word boundaries when normalizing case
    #[serde(default = "default_word_delimiters")]
    pub word_delimiters: String,

    /// Keep a name fully capitalized when it is all uppercase besides
    /// delimiters
    #[serde(default = "default_true")]
    pub preserve_screaming_case: bool,

    /// Identifiers that must not be used verbatim in the target
    #[serde(default = "default_reserved_keywords")]
    pub reserved_keywords: HashSet<String>,

    /// Accessor names reserved by the target platform
    #[serde(default = "default_reserved_accessors")]
    pub reserved_accessors: HashSet<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            word_delimiters: default_word_delimiters(),
            preserve_screaming_case: true,
            reserved_keywords: default_reserved_keywords(),
            reserved_accessors: default_reserved_accessors(),
        }
    }
}

/// Driver-level configuration: sources, output, batch policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriverConfig {
    /// Generation switches
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Source documents: URIs, file paths, or directories
    #[serde(default)]
    pub sources: Vec<String>,

    /// Where the generated model is written; stdout when absent
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Treat sources as example JSON rather than schemas
    #[serde(default)]
    pub example_mode: bool,

    /// Pre-flight validation of each input document as a schema
    #[serde(default)]
    pub validate_input: bool,

    /// Keep generating remaining documents after a failure
    #[serde(default)]
    pub continue_on_error: bool,
}

impl DriverConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering defaults, files, and environment
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["typesmith.toml", ".typesmith.toml", "config/typesmith.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "typesmith") {
            let xdg_config = config_dir.config_dir().join("typesmith.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TYPESMITH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_delimiters() -> String {
    crate::registry::DEFAULT_FRAGMENT_DELIMITERS.to_string()
}

fn default_word_delimiters() -> String {
    "-_. ".to_string()
}

fn default_date_time_type() -> String {
    "DateTime".to_string()
}

fn default_date_type() -> String {
    "Date".to_string()
}

fn default_time_type() -> String {
    "Time".to_string()
}

fn default_reserved_keywords() -> HashSet<String> {
    [
        "abstract", "bool", "boolean", "break", "case", "catch", "char", "class", "const",
        "continue", "default", "do", "double", "else", "enum", "false", "final", "float", "for",
        "if", "impl", "import", "in", "int", "interface", "let", "long", "loop", "match", "mod",
        "new", "null", "package", "private", "protected", "public", "return", "self", "static",
        "struct", "super", "switch", "this", "trait", "true", "try", "type", "use", "void",
        "while",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_reserved_accessors() -> HashSet<String> {
    ["getClass", "getType", "hashCode"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
