pub mod builders;
pub mod rules;

use std::borrow::Cow;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Deserialize;

use crate::descriptor::TypeDescriptor;
use crate::error::IncompatibleTypesError;
use crate::schema::{AnySchema, DefaultValue, Metadata, Schema};

pub use rules::{BuildFn, DEFAULT_RULES, Matcher, Rule};

/// Default bound on nested resolutions within one top-level call.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Substituted for forward references missing from the name table.
static UNRESOLVED: TypeDescriptor = TypeDescriptor::Any;

/// Options controlling how descriptors are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Only allow rules that produce JSON-native schemas.
    pub strict: bool,
    /// Parameters and data-record fields starting with this prefix are ignored.
    pub private_arg_prefix: String,
    pub max_depth: usize,
    /// Honor per-field required/not-required markers on keyed records.
    pub requirement_markers: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            strict: true,
            private_arg_prefix: "_".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            requirement_markers: true,
        }
    }
}

impl ResolverOptions {
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}

/// Converts type descriptors into schema nodes.
///
/// A resolver is immutable once built and may be shared between threads.
///
/// ```
/// use hintschema_core::descriptor::TypeDescriptor;
/// use hintschema_core::resolve::Resolver;
/// use hintschema_core::schema::DefaultValue;
///
/// let resolver = Resolver::new();
/// let schema = resolver
///     .resolve(&TypeDescriptor::list(TypeDescriptor::Str), &DefaultValue::Absent)
///     .unwrap();
/// assert_eq!(
///     schema.to_value(),
///     serde_json::json!({"type": "array", "items": {"type": "string"}})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    options: ResolverOptions,
    rules: Cow<'static, [Rule]>,
    names: IndexMap<String, TypeDescriptor>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            options,
            rules: Cow::Borrowed(DEFAULT_RULES),
            names: IndexMap::new(),
        }
    }

    /// Replace the rule registry. Order is precedence.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = Cow::Owned(rules);
        self
    }

    /// Set the table used to substitute forward-reference names.
    pub fn with_names(mut self, names: IndexMap<String, TypeDescriptor>) -> Self {
        self.names = names;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn names(&self) -> &IndexMap<String, TypeDescriptor> {
        &self.names
    }

    /// First rule that matches the descriptor and is allowed in the current mode.
    pub fn select_rule(&self, descriptor: &TypeDescriptor) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(descriptor) && (!self.options.strict || rule.strict))
    }

    /// Resolve a descriptor. A non-absent `default` replaces any default
    /// set by the matching rule.
    pub fn resolve(
        &self,
        descriptor: &TypeDescriptor,
        default: &DefaultValue,
    ) -> Result<Schema, IncompatibleTypesError> {
        self.resolve_at(descriptor, default, 0)
    }

    fn resolve_at(
        &self,
        descriptor: &TypeDescriptor,
        default: &DefaultValue,
        depth: usize,
    ) -> Result<Schema, IncompatibleTypesError> {
        if depth > self.options.max_depth {
            return Err(IncompatibleTypesError::RecursionLimit {
                descriptor: descriptor.to_string(),
                limit: self.options.max_depth,
            });
        }

        if let TypeDescriptor::ForwardRef { name } = descriptor {
            let target = self.names.get(name).unwrap_or(&UNRESOLVED);
            trace!("substituting forward reference `{name}` with `{target}`");
            return self.resolve_at(target, default, depth + 1);
        }

        let Some(rule) = self.select_rule(descriptor) else {
            if self.options.strict {
                return Err(IncompatibleTypesError::IncompatibleType(
                    descriptor.to_string(),
                ));
            }
            debug!("no rule for `{descriptor}`, using a placeholder schema");
            return Ok(AnySchema {
                meta: Metadata {
                    title: Some(descriptor.to_string()),
                    default: default.clone(),
                    ..Metadata::default()
                },
            }
            .into());
        };

        debug!("resolving `{descriptor}` with rule `{}`", rule.name);
        let ctx = ResolveContext {
            resolver: self,
            depth,
        };
        let mut schema = (rule.build)(&ctx, descriptor)?;
        if !default.is_absent() {
            schema.meta_mut().default = default.clone();
        }
        Ok(schema)
    }
}

/// Handle passed to rule builders for resolving nested descriptors.
pub struct ResolveContext<'r> {
    resolver: &'r Resolver,
    depth: usize,
}

impl ResolveContext<'_> {
    pub fn resolver(&self) -> &Resolver {
        self.resolver
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.resolver.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve a nested descriptor with no default.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Schema, IncompatibleTypesError> {
        self.resolver
            .resolve_at(descriptor, &DefaultValue::Absent, self.depth + 1)
    }
}
