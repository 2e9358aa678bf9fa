//! A closed description of "what type is this", built by the caller.
//!
//! Descriptors are plain owned trees. Recursive types are expressed with
//! [`TypeDescriptor::ForwardRef`] and resolved through the resolver's name table.

pub mod records;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use records::{
    DataRecord, EnumMember, EnumType, KeyedField, KeyedRecord, RecordField, Requirement,
    TupleRecord, TypeVar,
};

/// Base container of a parameterized generic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    List,
    Sequence,
    Collection,
    Iterable,
    Set,
    FrozenSet,
    MutableSet,
    Tuple,
    Dict,
    Mapping,
    MutableMapping,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::List => "list",
            Container::Sequence => "sequence",
            Container::Collection => "collection",
            Container::Iterable => "iterable",
            Container::Set => "set",
            Container::FrozenSet => "frozen_set",
            Container::MutableSet => "mutable_set",
            Container::Tuple => "tuple",
            Container::Dict => "dict",
            Container::Mapping => "mapping",
            Container::MutableMapping => "mutable_mapping",
        }
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Any,
    #[serde(rename = "none")]
    Null,
    Str,
    Bytes,
    AnyStr,
    Int,
    Float,
    Decimal,
    Number,
    Bool,
    Uuid,
    Date,
    DateTime,
    Generic {
        origin: Container,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeDescriptor>,
    },
    Union {
        members: Vec<TypeDescriptor>,
    },
    Literal {
        values: Vec<Value>,
    },
    Enum(EnumType),
    EnumMember {
        owner: String,
        member: String,
        value: Value,
    },
    KeyedRecord(KeyedRecord),
    TupleRecord(TupleRecord),
    DataRecord(DataRecord),
    Alias {
        name: String,
        target: Box<TypeDescriptor>,
    },
    TypeVar(TypeVar),
    ForwardRef {
        name: String,
    },
    /// Trailing "and so on" marker in type arguments.
    Ellipsis,
    /// A named type with no JSON counterpart.
    Opaque {
        name: String,
    },
}

/// The capability a descriptor exposes to registry rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Any,
    Null,
    Str,
    Bytes,
    AnyStr,
    Int,
    Float,
    Decimal,
    Number,
    Bool,
    Uuid,
    Date,
    DateTime,
    List,
    Sequence,
    Collection,
    Iterable,
    Set,
    FrozenSet,
    MutableSet,
    Tuple,
    Dict,
    Mapping,
    MutableMapping,
    Union,
    Literal,
    Enum,
    EnumMember,
    KeyedRecord,
    TupleRecord,
    DataRecord,
    Alias,
    TypeVar,
    ForwardRef,
    Ellipsis,
    Opaque,
}

impl From<Container> for TypeKind {
    fn from(container: Container) -> Self {
        match container {
            Container::List => TypeKind::List,
            Container::Sequence => TypeKind::Sequence,
            Container::Collection => TypeKind::Collection,
            Container::Iterable => TypeKind::Iterable,
            Container::Set => TypeKind::Set,
            Container::FrozenSet => TypeKind::FrozenSet,
            Container::MutableSet => TypeKind::MutableSet,
            Container::Tuple => TypeKind::Tuple,
            Container::Dict => TypeKind::Dict,
            Container::Mapping => TypeKind::Mapping,
            Container::MutableMapping => TypeKind::MutableMapping,
        }
    }
}

impl TypeDescriptor {
    pub fn generic(origin: Container, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Generic { origin, args }
    }

    /// An unparameterized container.
    pub fn bare(origin: Container) -> Self {
        Self::generic(origin, Vec::new())
    }

    pub fn list(item: TypeDescriptor) -> Self {
        Self::generic(Container::List, vec![item])
    }

    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::generic(Container::Dict, vec![key, value])
    }

    pub fn union(members: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Union { members }
    }

    /// `T | none`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::union(vec![inner, TypeDescriptor::Null])
    }

    pub fn literal(values: Vec<Value>) -> Self {
        TypeDescriptor::Literal { values }
    }

    pub fn alias(name: impl Into<String>, target: TypeDescriptor) -> Self {
        TypeDescriptor::Alias {
            name: name.into(),
            target: Box::new(target),
        }
    }

    pub fn forward_ref(name: impl Into<String>) -> Self {
        TypeDescriptor::ForwardRef { name: name.into() }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        TypeDescriptor::Opaque { name: name.into() }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Any => TypeKind::Any,
            TypeDescriptor::Null => TypeKind::Null,
            TypeDescriptor::Str => TypeKind::Str,
            TypeDescriptor::Bytes => TypeKind::Bytes,
            TypeDescriptor::AnyStr => TypeKind::AnyStr,
            TypeDescriptor::Int => TypeKind::Int,
            TypeDescriptor::Float => TypeKind::Float,
            TypeDescriptor::Decimal => TypeKind::Decimal,
            TypeDescriptor::Number => TypeKind::Number,
            TypeDescriptor::Bool => TypeKind::Bool,
            TypeDescriptor::Uuid => TypeKind::Uuid,
            TypeDescriptor::Date => TypeKind::Date,
            TypeDescriptor::DateTime => TypeKind::DateTime,
            TypeDescriptor::Generic { origin, .. } => TypeKind::from(*origin),
            TypeDescriptor::Union { .. } => TypeKind::Union,
            TypeDescriptor::Literal { .. } => TypeKind::Literal,
            TypeDescriptor::Enum(_) => TypeKind::Enum,
            TypeDescriptor::EnumMember { .. } => TypeKind::EnumMember,
            TypeDescriptor::KeyedRecord(_) => TypeKind::KeyedRecord,
            TypeDescriptor::TupleRecord(_) => TypeKind::TupleRecord,
            TypeDescriptor::DataRecord(_) => TypeKind::DataRecord,
            TypeDescriptor::Alias { .. } => TypeKind::Alias,
            TypeDescriptor::TypeVar(_) => TypeKind::TypeVar,
            TypeDescriptor::ForwardRef { .. } => TypeKind::ForwardRef,
            TypeDescriptor::Ellipsis => TypeKind::Ellipsis,
            TypeDescriptor::Opaque { .. } => TypeKind::Opaque,
        }
    }

    /// Nested type arguments: container parameters or union members.
    pub fn args(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Generic { args, .. } => args,
            TypeDescriptor::Union { members } => members,
            _ => &[],
        }
    }

    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Str | TypeDescriptor::Bytes | TypeDescriptor::AnyStr
        )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => f.write_str("any"),
            TypeDescriptor::Null => f.write_str("none"),
            TypeDescriptor::Str => f.write_str("str"),
            TypeDescriptor::Bytes => f.write_str("bytes"),
            TypeDescriptor::AnyStr => f.write_str("any_str"),
            TypeDescriptor::Int => f.write_str("int"),
            TypeDescriptor::Float => f.write_str("float"),
            TypeDescriptor::Decimal => f.write_str("decimal"),
            TypeDescriptor::Number => f.write_str("number"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Uuid => f.write_str("uuid"),
            TypeDescriptor::Date => f.write_str("date"),
            TypeDescriptor::DateTime => f.write_str("date_time"),
            TypeDescriptor::Generic { origin, args } => {
                f.write_str(origin.as_str())?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    write_joined(f, args, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeDescriptor::Union { members } => write_joined(f, members, " | "),
            TypeDescriptor::Literal { values } => {
                f.write_str("literal[")?;
                write_joined(f, values, ", ")?;
                f.write_str("]")
            }
            TypeDescriptor::Enum(e) => f.write_str(&e.name),
            TypeDescriptor::EnumMember { owner, member, .. } => write!(f, "{owner}.{member}"),
            TypeDescriptor::KeyedRecord(r) => f.write_str(&r.name),
            TypeDescriptor::TupleRecord(r) => f.write_str(&r.name),
            TypeDescriptor::DataRecord(r) => f.write_str(&r.name),
            TypeDescriptor::Alias { name, .. } => f.write_str(name),
            TypeDescriptor::TypeVar(v) => f.write_str(&v.name),
            TypeDescriptor::ForwardRef { name } => f.write_str(name),
            TypeDescriptor::Ellipsis => f.write_str("..."),
            TypeDescriptor::Opaque { name } => f.write_str(name),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(TypeDescriptor::list(TypeDescriptor::Str).to_string(), "list[str]");
        assert_eq!(
            TypeDescriptor::dict(TypeDescriptor::Str, TypeDescriptor::Int).to_string(),
            "dict[str, int]"
        );
        assert_eq!(TypeDescriptor::bare(Container::FrozenSet).to_string(), "frozen_set");
        assert_eq!(
            TypeDescriptor::optional(TypeDescriptor::Str).to_string(),
            "str | none"
        );
        assert_eq!(
            TypeDescriptor::literal(vec![json!("a"), json!(1)]).to_string(),
            r#"literal["a", 1]"#
        );
        assert_eq!(TypeDescriptor::opaque("Hashable").to_string(), "Hashable");
    }

    #[test]
    fn test_kind_follows_container_origin() {
        assert_eq!(TypeDescriptor::bare(Container::Mapping).kind(), TypeKind::Mapping);
        assert_eq!(TypeDescriptor::Str.kind(), TypeKind::Str);
        assert_eq!(TypeDescriptor::forward_ref("X").kind(), TypeKind::ForwardRef);
    }

    #[test]
    fn test_args() {
        let union = TypeDescriptor::union(vec![TypeDescriptor::Str, TypeDescriptor::Int]);
        assert_eq!(union.args().len(), 2);
        assert!(TypeDescriptor::Int.args().is_empty());
    }

    #[test]
    fn test_deserialize_tagged() {
        let yaml = r#"
kind: generic
origin: dict
args:
  - kind: str
  - kind: union
    members:
      - kind: int
      - kind: none
"#;
        let parsed: TypeDescriptor = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            TypeDescriptor::dict(
                TypeDescriptor::Str,
                TypeDescriptor::optional(TypeDescriptor::Int)
            )
        );
    }

    #[test]
    fn test_deserialize_record_defaults() {
        let json = r#"{
            "kind": "data_record",
            "name": "Point",
            "fields": [
                {"name": "x", "type": {"kind": "int"}},
                {"name": "label", "type": {"kind": "str"}, "default": null}
            ]
        }"#;
        let parsed: TypeDescriptor = serde_json::from_str(json).unwrap();
        let TypeDescriptor::DataRecord(record) = parsed else {
            panic!("expected data record");
        };
        assert!(record.fields[0].default.is_absent());
        assert_eq!(record.fields[1].default, crate::schema::DefaultValue::Null);
    }

    #[test]
    fn test_enum_member_lookup() {
        let color = EnumType {
            name: "Color".to_string(),
            doc: None,
            members: vec![EnumMember {
                name: "red".to_string(),
                value: json!("r"),
            }],
        };
        assert_eq!(
            color.member("red"),
            Some(TypeDescriptor::EnumMember {
                owner: "Color".to_string(),
                member: "red".to_string(),
                value: json!("r"),
            })
        );
        assert_eq!(color.member("blue"), None);
    }
}
