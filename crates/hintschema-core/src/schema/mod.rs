pub mod nodes;
pub mod types;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

pub use nodes::*;
pub use types::{DefaultValue, Metadata, StringFormat};

/// One JSON Schema fragment. A node exclusively owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Any(AnySchema),
    String(StringSchema),
    Number(NumberSchema),
    Integer(IntegerSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Const(ConstSchema),
    Enum(EnumSchema),
    AnyOf(CompositeSchema),
    OneOf(CompositeSchema),
    AllOf(CompositeSchema),
    Not(NotSchema),
    Nullable(NullableSchema),
}

impl Schema {
    pub fn any_of(items: Vec<Schema>) -> Self {
        Schema::AnyOf(CompositeSchema {
            meta: Metadata::default(),
            items,
        })
    }

    pub fn one_of(items: Vec<Schema>) -> Self {
        Schema::OneOf(CompositeSchema {
            meta: Metadata::default(),
            items,
        })
    }

    pub fn all_of(items: Vec<Schema>) -> Self {
        Schema::AllOf(CompositeSchema {
            meta: Metadata::default(),
            items,
        })
    }

    pub fn not(item: Schema) -> Self {
        Schema::Not(NotSchema {
            meta: Metadata::default(),
            item: Box::new(item),
        })
    }

    pub fn nullable(item: Schema) -> Self {
        Schema::Nullable(NullableSchema {
            meta: Metadata::default(),
            item: Box::new(item),
        })
    }

    pub fn null() -> Self {
        Schema::Enum(EnumSchema::null())
    }

    pub fn meta(&self) -> &Metadata {
        match self {
            Schema::Any(s) => &s.meta,
            Schema::String(s) => &s.meta,
            Schema::Number(s) => &s.meta,
            Schema::Integer(s) => &s.meta,
            Schema::Boolean(s) => &s.meta,
            Schema::Array(s) => &s.meta,
            Schema::Object(s) => &s.meta,
            Schema::Const(s) => &s.meta,
            Schema::Enum(s) => &s.meta,
            Schema::AnyOf(s) | Schema::OneOf(s) | Schema::AllOf(s) => &s.meta,
            Schema::Not(s) => &s.meta,
            Schema::Nullable(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Metadata {
        match self {
            Schema::Any(s) => &mut s.meta,
            Schema::String(s) => &mut s.meta,
            Schema::Number(s) => &mut s.meta,
            Schema::Integer(s) => &mut s.meta,
            Schema::Boolean(s) => &mut s.meta,
            Schema::Array(s) => &mut s.meta,
            Schema::Object(s) => &mut s.meta,
            Schema::Const(s) => &mut s.meta,
            Schema::Enum(s) => &mut s.meta,
            Schema::AnyOf(s) | Schema::OneOf(s) | Schema::AllOf(s) => &mut s.meta,
            Schema::Not(s) => &mut s.meta,
            Schema::Nullable(s) => &mut s.meta,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta_mut().title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.meta_mut().description = description;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.meta_mut().default = default;
        self
    }

    /// Render the JSON-compatible map form of this node and its children.
    pub fn to_canonical(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let meta = self.meta();
        meta.write_head(&mut map);

        match self {
            Schema::Any(_) => {}
            Schema::String(s) => {
                put(&mut map, "type", Some("string"));
                put(&mut map, "minLength", s.min_length);
                put(&mut map, "maxLength", s.max_length);
                put(&mut map, "pattern", s.pattern.clone());
                put(&mut map, "format", s.format().map(|f| f.as_str()));
                put(&mut map, "enum", s.enum_values.clone());
            }
            Schema::Number(s) => {
                put(&mut map, "type", Some("number"));
                put(&mut map, "multipleOf", s.multiple_of);
                put(&mut map, "minimum", s.minimum);
                put(&mut map, "maximum", s.maximum);
                put(&mut map, "exclusiveMinimum", s.exclusive_minimum);
                put(&mut map, "exclusiveMaximum", s.exclusive_maximum);
                put(&mut map, "enum", s.enum_values.as_deref().map(finite_numbers));
            }
            Schema::Integer(s) => {
                put(&mut map, "type", Some("integer"));
                put(&mut map, "multipleOf", s.multiple_of);
                put(&mut map, "minimum", s.minimum);
                put(&mut map, "maximum", s.maximum);
                put(&mut map, "exclusiveMinimum", s.exclusive_minimum);
                put(&mut map, "exclusiveMaximum", s.exclusive_maximum);
                put(&mut map, "enum", s.enum_values.clone());
            }
            Schema::Boolean(_) => {
                put(&mut map, "type", Some("boolean"));
            }
            Schema::Array(s) => {
                put(&mut map, "type", Some("array"));
                if let Some(items) = &s.items {
                    map.insert("items".to_string(), items.to_value());
                }
                if let Some(prefix) = &s.prefix_items {
                    map.insert("prefixItems".to_string(), list_value(prefix));
                }
                if let Some(contains) = &s.contains {
                    map.insert("contains".to_string(), contains.to_value());
                }
                put(&mut map, "additionalItems", s.additional_items);
                put(&mut map, "uniqueItems", s.unique_items);
                put(&mut map, "minItems", s.min_items);
                put(&mut map, "maxItems", s.max_items);
            }
            Schema::Object(s) => {
                put(&mut map, "type", Some("object"));
                if let Some(properties) = &s.properties {
                    map.insert("properties".to_string(), map_value(properties));
                }
                if let Some(patterns) = &s.pattern_properties {
                    map.insert("patternProperties".to_string(), map_value(patterns));
                }
                put(&mut map, "additionalProperties", s.additional_properties);
                put(&mut map, "required", s.required.clone());
                put(&mut map, "minProperties", s.min_properties);
                put(&mut map, "maxProperties", s.max_properties);
            }
            Schema::Const(s) => {
                map.insert("const".to_string(), s.value.clone());
            }
            Schema::Enum(s) => {
                map.insert("enum".to_string(), Value::Array(s.values.clone()));
            }
            Schema::AnyOf(s) => {
                map.insert("anyOf".to_string(), list_value(&s.items));
            }
            Schema::OneOf(s) => {
                map.insert("oneOf".to_string(), list_value(&s.items));
            }
            Schema::AllOf(s) => {
                map.insert("allOf".to_string(), list_value(&s.items));
            }
            Schema::Not(s) => {
                map.insert("not".to_string(), s.item.to_value());
            }
            Schema::Nullable(s) => {
                let items = vec![s.item.to_value(), Schema::null().to_value()];
                map.insert("oneOf".to_string(), Value::Array(items));
            }
        }

        meta.write_tail(&mut map);
        map
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_canonical())
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_canonical().serialize(serializer)
    }
}

/// Insert `value` under `key` unless it is unset or has no JSON form
/// (a non-finite float converts to `null`).
fn put<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    match value.map(Into::into) {
        Some(Value::Null) | None => {}
        Some(value) => {
            map.insert(key.to_string(), value);
        }
    }
}

fn finite_numbers(values: &[f64]) -> Vec<Value> {
    values
        .iter()
        .filter_map(|v| Number::from_f64(*v))
        .map(Value::Number)
        .collect()
}

fn list_value(items: &[Schema]) -> Value {
    Value::Array(items.iter().map(Schema::to_value).collect())
}

fn map_value(entries: &IndexMap<String, Schema>) -> Value {
    Value::Object(
        entries
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect(),
    )
}

macro_rules! impl_from_node {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for Schema {
                fn from(node: $node) -> Self {
                    Schema::$variant(node)
                }
            }
        )*
    };
}

impl_from_node! {
    AnySchema => Any,
    StringSchema => String,
    NumberSchema => Number,
    IntegerSchema => Integer,
    BooleanSchema => Boolean,
    ArraySchema => Array,
    ObjectSchema => Object,
    ConstSchema => Const,
    EnumSchema => Enum,
    NotSchema => Not,
    NullableSchema => Nullable,
}
