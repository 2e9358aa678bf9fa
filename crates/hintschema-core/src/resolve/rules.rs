use std::fmt;

use super::ResolveContext;
use super::builders;
use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::IncompatibleTypesError;
use crate::schema::Schema;

/// Builds a schema for a descriptor the rule has matched.
pub type BuildFn =
    fn(&ResolveContext<'_>, &TypeDescriptor) -> Result<Schema, IncompatibleTypesError>;

/// How a rule recognizes descriptors.
#[derive(Clone, Copy)]
pub enum Matcher {
    /// The descriptor's kind is one of these.
    Kinds(&'static [TypeKind]),
    /// Arbitrary check, e.g. for opaque types known by name.
    Predicate(fn(&TypeDescriptor) -> bool),
}

/// One entry of the matcher registry.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    /// Whether the rule may be selected in strict mode.
    pub strict: bool,
    pub build: BuildFn,
}

impl Rule {
    pub const fn new(
        name: &'static str,
        kinds: &'static [TypeKind],
        strict: bool,
        build: BuildFn,
    ) -> Self {
        Self {
            name,
            matcher: Matcher::Kinds(kinds),
            strict,
            build,
        }
    }

    pub fn matches(&self, descriptor: &TypeDescriptor) -> bool {
        match self.matcher {
            Matcher::Kinds(kinds) => kinds.contains(&descriptor.kind()),
            Matcher::Predicate(predicate) => predicate(descriptor),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matcher = match self.matcher {
            Matcher::Kinds(kinds) => format!("{kinds:?}"),
            Matcher::Predicate(_) => "<predicate>".to_string(),
        };
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("matcher", &matcher)
            .field("strict", &self.strict)
            .finish()
    }
}

/// The built-in registry. Order is precedence: the first eligible match wins.
pub const DEFAULT_RULES: &[Rule] = &[
    Rule::new("any", &[TypeKind::Any], true, builders::build_any),
    Rule::new(
        "string",
        &[TypeKind::Str, TypeKind::Bytes, TypeKind::AnyStr],
        true,
        builders::build_string,
    ),
    Rule::new("uuid", &[TypeKind::Uuid], false, builders::build_uuid),
    Rule::new("date", &[TypeKind::Date], false, builders::build_date),
    Rule::new("date_time", &[TypeKind::DateTime], false, builders::build_date_time),
    Rule::new("integer", &[TypeKind::Int], true, builders::build_integer),
    Rule::new(
        "number",
        &[TypeKind::Float, TypeKind::Decimal, TypeKind::Number],
        true,
        builders::build_number,
    ),
    Rule::new("boolean", &[TypeKind::Bool], true, builders::build_boolean),
    Rule::new("null", &[TypeKind::Null], true, builders::build_null),
    Rule::new("type_var", &[TypeKind::TypeVar], true, builders::build_type_var),
    Rule::new("alias", &[TypeKind::Alias], false, builders::build_alias),
    Rule::new("literal", &[TypeKind::Literal], true, builders::build_literal),
    Rule::new("union", &[TypeKind::Union], true, builders::build_union),
    Rule::new(
        "list",
        &[
            TypeKind::List,
            TypeKind::Sequence,
            TypeKind::Collection,
            TypeKind::Iterable,
        ],
        true,
        builders::build_list,
    ),
    Rule::new(
        "set",
        &[TypeKind::Set, TypeKind::FrozenSet, TypeKind::MutableSet],
        true,
        builders::build_set,
    ),
    Rule::new("tuple", &[TypeKind::Tuple], true, builders::build_tuple),
    Rule::new(
        "mapping",
        &[TypeKind::Dict, TypeKind::Mapping, TypeKind::MutableMapping],
        true,
        builders::build_mapping,
    ),
    Rule::new(
        "keyed_record",
        &[TypeKind::KeyedRecord],
        true,
        builders::build_keyed_record,
    ),
    Rule::new(
        "tuple_record",
        &[TypeKind::TupleRecord],
        false,
        builders::build_tuple_record,
    ),
    Rule::new(
        "enum_member",
        &[TypeKind::EnumMember],
        false,
        builders::build_enum_member,
    ),
    Rule::new("enum", &[TypeKind::Enum], false, builders::build_enum),
    Rule::new(
        "data_record",
        &[TypeKind::DataRecord],
        false,
        builders::build_data_record,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let names: Vec<&str> = DEFAULT_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "any",
                "string",
                "uuid",
                "date",
                "date_time",
                "integer",
                "number",
                "boolean",
                "null",
                "type_var",
                "alias",
                "literal",
                "union",
                "list",
                "set",
                "tuple",
                "mapping",
                "keyed_record",
                "tuple_record",
                "enum_member",
                "enum",
                "data_record",
            ]
        );
    }

    #[test]
    fn test_enum_member_precedes_enum_type() {
        let position = |name: &str| DEFAULT_RULES.iter().position(|r| r.name == name);
        assert!(position("enum_member") < position("enum"));
        assert!(position("union") < position("list"));
    }

    #[test]
    fn test_non_json_native_rules_are_lenient_only() {
        let lenient: Vec<&str> = DEFAULT_RULES
            .iter()
            .filter(|r| !r.strict)
            .map(|r| r.name)
            .collect();
        assert_eq!(
            lenient,
            [
                "uuid",
                "date",
                "date_time",
                "alias",
                "tuple_record",
                "enum_member",
                "enum",
                "data_record"
            ]
        );
    }

    #[test]
    fn test_matches_by_kind_and_predicate() {
        let rule = &DEFAULT_RULES[1];
        assert!(rule.matches(&TypeDescriptor::Bytes));
        assert!(!rule.matches(&TypeDescriptor::Int));

        let by_name = Rule {
            name: "hashable",
            matcher: Matcher::Predicate(|d| {
                matches!(d, TypeDescriptor::Opaque { name } if name == "Hashable")
            }),
            strict: true,
            build: builders::build_any,
        };
        assert!(by_name.matches(&TypeDescriptor::opaque("Hashable")));
        assert!(!by_name.matches(&TypeDescriptor::opaque("Callable")));
        assert!(format!("{by_name:?}").contains("<predicate>"));
    }
}
