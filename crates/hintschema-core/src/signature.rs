//! Input/output schemas for callables and the methods of class types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

use crate::descriptor::{TypeDescriptor, TypeVar};
use crate::error::IncompatibleTypesError;
use crate::resolve::Resolver;
use crate::schema::{AnySchema, DefaultValue, Metadata, ObjectSchema, Schema};

/// How an argument may be passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Passable by position or by name.
    #[default]
    Normal,
    KeywordOnly,
    /// Catch-all positional arguments; never modelled.
    VarPositional,
    /// Catch-all keyword arguments; opens the object to extra properties.
    VarKeyword,
    /// Cannot be passed by name, so cannot be a JSON object property.
    PositionalOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TypeDescriptor>,
    #[serde(default, skip_serializing_if = "DefaultValue::is_absent")]
    pub default: DefaultValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Normal,
            annotation: Some(annotation),
            default: DefaultValue::Absent,
        }
    }

    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }
}

/// A function or method signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callable {
    pub name: String,
    /// Static methods have no implicit receiver parameter.
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeDescriptor>,
}

impl Callable {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            params,
            returns: None,
        }
    }

    pub fn returning(mut self, returns: TypeDescriptor) -> Self {
        self.returns = Some(returns);
        self
    }
}

/// A class type owning methods, optionally derived from a generic base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_base: Option<GenericBase>,
    #[serde(default)]
    pub methods: Vec<Callable>,
}

/// A parameterized base declaration, e.g. `Base[Concrete]`.
///
/// `origin: None` marks the root generic declaration whose `args` are the
/// formal type variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Box<ClassType>>,
    pub args: Vec<TypeDescriptor>,
}

/// Schemas for a callable's keyword input and its return value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionAnnotation {
    /// `None` when no parameter is modelled.
    pub input: Option<ObjectSchema>,
    /// `None` when no return type is declared.
    pub output: Option<Schema>,
}

impl FunctionAnnotation {
    pub fn to_value(&self) -> Value {
        json!({
            "input": self.input.clone().map(|input| Schema::Object(input).to_value()),
            "output": self.output.as_ref().map(Schema::to_value),
        })
    }
}

impl Serialize for FunctionAnnotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Substitute a type variable with the concrete argument supplied by the
/// owner's generic base, if the root generic declares it.
pub fn unify_type_var(owner: &ClassType, var: &TypeVar) -> TypeDescriptor {
    let unbound = || TypeDescriptor::TypeVar(var.clone());
    let Some(base) = &owner.generic_base else {
        return unbound();
    };

    let mut formal = &base.args;
    let mut level = Some(base);
    while let Some(current) = level {
        formal = &current.args;
        level = current
            .origin
            .as_deref()
            .and_then(|class| class.generic_base.as_ref());
    }

    formal
        .iter()
        .position(|p| matches!(p, TypeDescriptor::TypeVar(v) if v.name == var.name))
        .and_then(|index| base.args.get(index))
        .cloned()
        .unwrap_or_else(unbound)
}

fn is_private(prefix: &str, name: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

impl Resolver {
    /// Resolve a callable's parameters into an input object and its return
    /// type into an output schema. `owner` is the class the callable is
    /// bound to, if any.
    pub fn resolve_callable(
        &self,
        callable: &Callable,
        owner: Option<&ClassType>,
    ) -> Result<FunctionAnnotation, IncompatibleTypesError> {
        let prefix = self.options().private_arg_prefix.as_str();
        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        let mut additional_properties = false;

        for (index, param) in callable.params.iter().enumerate() {
            if is_private(prefix, &param.name) {
                continue;
            }
            // implicit receiver
            if owner.is_some() && index == 0 && !callable.is_static {
                continue;
            }
            match param.kind {
                ParameterKind::VarPositional => continue,
                ParameterKind::VarKeyword => {
                    additional_properties = true;
                    continue;
                }
                ParameterKind::PositionalOnly => {
                    return Err(IncompatibleTypesError::PositionalOnly(param.name.clone()));
                }
                ParameterKind::Normal | ParameterKind::KeywordOnly => {}
            }

            let schema = match (&param.annotation, owner) {
                (Some(TypeDescriptor::TypeVar(var)), Some(class)) => {
                    self.resolve(&unify_type_var(class, var), &param.default)?
                }
                (Some(annotation), _) => self.resolve(annotation, &param.default)?,
                (None, _) => self.resolve_unannotated(&param.name, &param.default)?,
            };
            if param.default.is_absent() {
                required.push(param.name.clone());
            }
            properties.insert(param.name.clone(), schema);
        }

        let input = (!properties.is_empty()).then(|| ObjectSchema {
            properties: Some(properties),
            required: Some(required),
            additional_properties: Some(additional_properties),
            ..ObjectSchema::default()
        });
        let output = callable
            .returns
            .as_ref()
            .map(|returns| self.resolve(returns, &DefaultValue::Absent))
            .transpose()?;

        Ok(FunctionAnnotation { input, output })
    }

    /// Resolve every public method of a class, keyed by method name.
    pub fn resolve_class(
        &self,
        class: &ClassType,
    ) -> Result<IndexMap<String, FunctionAnnotation>, IncompatibleTypesError> {
        let prefix = self.options().private_arg_prefix.as_str();
        let mut methods = IndexMap::new();
        for method in &class.methods {
            if is_private(prefix, &method.name) {
                continue;
            }
            methods.insert(
                method.name.clone(),
                self.resolve_callable(method, Some(class))?,
            );
        }
        Ok(methods)
    }

    fn resolve_unannotated(
        &self,
        name: &str,
        default: &DefaultValue,
    ) -> Result<Schema, IncompatibleTypesError> {
        if self.options().strict {
            return Err(IncompatibleTypesError::IncompatibleType(format!(
                "{name}: <unannotated>"
            )));
        }
        Ok(AnySchema {
            meta: Metadata {
                default: default.clone(),
                ..Metadata::default()
            },
        }
        .into())
    }
}
