use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A default value that keeps "no default" apart from "default is null".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DefaultValue {
    /// No default was supplied. Never emitted.
    #[default]
    Absent,
    /// The default is explicitly `null`.
    Null,
    Value(Value),
}

impl DefaultValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DefaultValue::Absent)
    }

    /// The JSON value to emit, or `None` when absent.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            DefaultValue::Absent => None,
            DefaultValue::Null => Some(Value::Null),
            DefaultValue::Value(v) => Some(v.clone()),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DefaultValue::Null,
            other => DefaultValue::Value(other),
        }
    }
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Absent | DefaultValue::Null => serializer.serialize_none(),
            DefaultValue::Value(v) => v.serialize(serializer),
        }
    }
}

/// Deserializing only happens when the key is present, so a missing key
/// must be paired with `#[serde(default)]` to become `Absent`.
impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(DefaultValue::from(value))
    }
}

/// Annotations shared by every schema node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Option<Vec<Value>>,
    pub default: DefaultValue,
}

impl Metadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub(crate) fn write_head(&self, map: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            map.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
    }

    pub(crate) fn write_tail(&self, map: &mut Map<String, Value>) {
        if let Some(examples) = &self.examples {
            map.insert("examples".to_string(), Value::Array(examples.clone()));
        }
        if let Some(default) = self.default.to_json() {
            map.insert("default".to_string(), default);
        }
    }
}

/// Built-in JSON Schema string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    DateTime,
    Time,
    Date,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Iri,
    IriReference,
    Regex,
    Uuid,
}

impl StringFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Time => "time",
            StringFormat::Date => "date",
            StringFormat::Email => "email",
            StringFormat::IdnEmail => "idn-email",
            StringFormat::Hostname => "hostname",
            StringFormat::IdnHostname => "idn-hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uri => "uri",
            StringFormat::UriReference => "uri-reference",
            StringFormat::Iri => "iri",
            StringFormat::IriReference => "iri-reference",
            StringFormat::Regex => "regex",
            StringFormat::Uuid => "uuid",
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
