use indexmap::IndexMap;
use serde_json::Value;

use super::Schema;
use super::types::{Metadata, StringFormat};
use crate::error::SchemaError;

/// A schema with no `type` keyword; matches anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnySchema {
    pub meta: Metadata,
}

/// `type: string`.
///
/// Derived aliases built with [`StringSchema::date`], [`StringSchema::date_time`],
/// [`StringSchema::uuid`] and [`StringSchema::email`] carry a fixed format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub meta: Metadata,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    /// Regex validation pattern.
    pub pattern: Option<String>,
    pub enum_values: Option<Vec<String>>,
    format: Option<StringFormat>,
    format_locked: bool,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(format: StringFormat) -> Self {
        Self {
            format: Some(format),
            format_locked: true,
            ..Self::default()
        }
    }

    pub fn date() -> Self {
        Self::locked(StringFormat::Date)
    }

    pub fn date_time() -> Self {
        Self::locked(StringFormat::DateTime)
    }

    pub fn uuid() -> Self {
        Self::locked(StringFormat::Uuid)
    }

    pub fn email() -> Self {
        Self::locked(StringFormat::Email)
    }

    pub fn format(&self) -> Option<StringFormat> {
        self.format
    }

    pub fn is_format_locked(&self) -> bool {
        self.format_locked
    }

    pub fn set_format(&mut self, format: Option<StringFormat>) -> Result<(), SchemaError> {
        if let (true, Some(current)) = (self.format_locked, self.format) {
            if format != Some(current) {
                return Err(SchemaError::FormatLocked(current.to_string()));
            }
        }
        self.format = format;
        Ok(())
    }

    pub fn with_format(mut self, format: StringFormat) -> Result<Self, SchemaError> {
        self.set_format(Some(format))?;
        Ok(self)
    }
}

/// `type: number`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub meta: Metadata,
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub enum_values: Option<Vec<f64>>,
}

/// `type: integer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerSchema {
    pub meta: Metadata,
    pub multiple_of: Option<i64>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub exclusive_minimum: Option<i64>,
    pub exclusive_maximum: Option<i64>,
    pub enum_values: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub meta: Metadata,
}

/// `type: array`. `prefix_items` describes a fixed-position tuple.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    pub meta: Metadata,
    pub items: Option<Box<Schema>>,
    pub prefix_items: Option<Vec<Schema>>,
    pub contains: Option<Box<Schema>>,
    pub additional_items: Option<bool>,
    pub unique_items: Option<bool>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl ArraySchema {
    pub fn of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }
}

/// `type: object`. Property and `required` order is kept as inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub meta: Metadata,
    pub properties: Option<IndexMap<String, Schema>>,
    pub pattern_properties: Option<IndexMap<String, Schema>>,
    pub additional_properties: Option<bool>,
    pub required: Option<Vec<String>>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
}

impl ObjectSchema {
    /// An object that rejects properties outside `properties`.
    pub fn closed(properties: IndexMap<String, Schema>, required: Vec<String>) -> Self {
        Self {
            properties: Some(properties),
            required: Some(required),
            additional_properties: Some(false),
            ..Self::default()
        }
    }
}

/// Bare `const`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstSchema {
    pub meta: Metadata,
    pub value: Value,
}

impl ConstSchema {
    pub fn new(value: Value) -> Self {
        Self {
            meta: Metadata::default(),
            value,
        }
    }
}

/// Bare `enum`. A `null` member is kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumSchema {
    pub meta: Metadata,
    pub values: Vec<Value>,
}

impl EnumSchema {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            meta: Metadata::default(),
            values,
        }
    }

    /// `{"enum": [null]}`.
    pub fn null() -> Self {
        Self::new(vec![Value::Null])
    }
}

/// Members of an `anyOf`, `oneOf` or `allOf` combinator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeSchema {
    pub meta: Metadata,
    pub items: Vec<Schema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotSchema {
    pub meta: Metadata,
    pub item: Box<Schema>,
}

/// Rendered as `oneOf: [item, {enum: [null]}]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableSchema {
    pub meta: Metadata,
    pub item: Box<Schema>,
}
