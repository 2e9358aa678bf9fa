use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TypeDescriptor;
use crate::schema::DefaultValue;

/// A named enumeration with ordered members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Descriptor for one member of this enumeration, if it exists.
    pub fn member(&self, name: &str) -> Option<TypeDescriptor> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| TypeDescriptor::EnumMember {
                owner: self.name.clone(),
                member: m.name.clone(),
                value: m.value.clone(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Value,
}

/// Per-field override of a keyed record's `total` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    #[default]
    Inherit,
    Required,
    NotRequired,
}

/// A string-keyed record whose keys are all known up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Whether fields are required unless marked otherwise.
    #[serde(default = "default_total")]
    pub total: bool,
    pub fields: Vec<KeyedField>,
}

fn default_total() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub requirement: Requirement,
}

/// A record field that may carry a declared default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeDescriptor>,
    #[serde(default, skip_serializing_if = "DefaultValue::is_absent")]
    pub default: DefaultValue,
}

/// A record whose fields are addressed by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub fields: Vec<RecordField>,
}

/// A general data record with optionally defaulted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub fields: Vec<RecordField>,
}

/// A type variable, optionally bounded by a supertype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<Box<TypeDescriptor>>,
}

impl TypeVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    pub fn bounded(name: impl Into<String>, bound: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            bound: Some(Box::new(bound)),
        }
    }
}
