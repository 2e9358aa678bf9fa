use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::resolve::ResolverOptions;

/// Project configuration loaded from `.hintschema.yaml`.
///
/// Resolver options sit at the top level of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HintSchemaConfig {
    #[serde(flatten)]
    pub resolver: ResolverOptions,
}

impl HintSchemaConfig {
    pub fn resolver_options(&self) -> ResolverOptions {
        self.resolver.clone()
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".hintschema.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<HintSchemaConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# hintschema configuration
strict: true               # only JSON-native types; false allows uuid, dates, enums, records
private_arg_prefix: "_"    # parameters and record fields with this prefix are skipped
max_depth: 32              # nested resolution limit
requirement_markers: true  # honor per-field required/not_required on keyed records
"#
}
