//! Manifest documents: descriptors, callables and classes to resolve in one go.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::descriptor::TypeDescriptor;
use crate::error::ManifestError;
use crate::resolve::{Resolver, ResolverOptions};
use crate::schema::DefaultValue;
use crate::signature::{Callable, ClassType};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Forward-reference name table.
    pub names: IndexMap<String, TypeDescriptor>,
    /// Standalone descriptors keyed by a label.
    pub types: IndexMap<String, TypeDescriptor>,
    pub functions: Vec<Callable>,
    pub classes: Vec<ClassType>,
}

impl Manifest {
    pub fn resolver(&self, options: &ResolverOptions) -> Resolver {
        Resolver::with_options(options.clone()).with_names(self.names.clone())
    }
}

/// Parse a manifest from YAML.
pub fn from_yaml(input: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse a manifest from JSON.
pub fn from_json(input: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_str(input)?)
}

/// Resolve everything in the manifest.
///
/// The result has `types`, `functions` and `classes` sections, each keyed
/// in declaration order.
pub fn generate(manifest: &Manifest, options: &ResolverOptions) -> Result<Value, ManifestError> {
    let resolver = manifest.resolver(options);

    let mut types = Map::new();
    for (label, descriptor) in &manifest.types {
        let schema = resolver.resolve(descriptor, &DefaultValue::Absent)?;
        types.insert(label.clone(), schema.to_value());
    }

    let mut functions = Map::new();
    for function in &manifest.functions {
        ensure_unique(&functions, "functions", &function.name)?;
        let annotation = resolver.resolve_callable(function, None)?;
        functions.insert(function.name.clone(), annotation.to_value());
    }

    let mut classes = Map::new();
    for class in &manifest.classes {
        ensure_unique(&classes, "classes", &class.name)?;
        let methods: Map<String, Value> = resolver
            .resolve_class(class)?
            .into_iter()
            .map(|(name, annotation)| (name, annotation.to_value()))
            .collect();
        classes.insert(class.name.clone(), Value::Object(methods));
    }

    Ok(json!({
        "types": types,
        "functions": functions,
        "classes": classes,
    }))
}

fn ensure_unique(
    section_map: &Map<String, Value>,
    section: &'static str,
    name: &str,
) -> Result<(), ManifestError> {
    if section_map.contains_key(name) {
        return Err(ManifestError::DuplicateName {
            section,
            name: name.to_string(),
        });
    }
    Ok(())
}
