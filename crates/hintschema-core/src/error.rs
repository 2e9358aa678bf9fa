use thiserror::Error;

/// A type descriptor that cannot be expressed as a JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompatibleTypesError {
    #[error("unable to resolve `{0}` as a JSON schema type in strict mode")]
    IncompatibleType(String),

    #[error("mapping keys must be strings, got `{key}` in `{mapping}`")]
    NonStringKey { mapping: String, key: String },

    #[error("positional-only parameter `{0}` cannot be converted to a JSON schema object")]
    PositionalOnly(String),

    #[error("recursion limit of {limit} exceeded while resolving `{descriptor}`")]
    RecursionLimit { descriptor: String, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("string format `{0}` is fixed and cannot be overridden")]
    FormatLocked(String),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resolve error: {0}")]
    Resolve(#[from] IncompatibleTypesError),

    #[error("duplicate {section} entry `{name}`")]
    DuplicateName { section: &'static str, name: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
