use indexmap::IndexMap;

use super::ResolveContext;
use crate::descriptor::{Requirement, TypeDescriptor};
use crate::docstring::doc_summary;
use crate::error::IncompatibleTypesError;
use crate::schema::{
    AnySchema, ArraySchema, BooleanSchema, ConstSchema, EnumSchema, IntegerSchema, Metadata,
    NumberSchema, ObjectSchema, Schema, StringSchema,
};

type BuildResult = Result<Schema, IncompatibleTypesError>;

/// Catch-all key used to describe homogeneous string-keyed mappings.
pub const ANY_KEY_PATTERN: &str = "^.+$";

fn mismatch(descriptor: &TypeDescriptor) -> IncompatibleTypesError {
    IncompatibleTypesError::IncompatibleType(descriptor.to_string())
}

/// Resolve type arguments in order, skipping `...` markers.
fn resolve_args(
    ctx: &ResolveContext<'_>,
    args: &[TypeDescriptor],
) -> Result<Vec<Schema>, IncompatibleTypesError> {
    args.iter()
        .filter(|arg| !matches!(arg, TypeDescriptor::Ellipsis))
        .map(|arg| ctx.resolve(arg))
        .collect()
}

/// Collect the members of a (possibly nested) `anyOf` into one flat list.
fn flatten_any_of(schema: Schema, out: &mut Vec<Schema>) {
    match schema {
        Schema::AnyOf(composite) => {
            for item in composite.items {
                flatten_any_of(item, out);
            }
        }
        other => out.push(other),
    }
}

pub fn build_any(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(AnySchema::default().into())
}

pub fn build_string(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(StringSchema::new().into())
}

pub fn build_uuid(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(StringSchema::uuid().into())
}

pub fn build_date(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(StringSchema::date().into())
}

pub fn build_date_time(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(StringSchema::date_time().into())
}

pub fn build_integer(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(IntegerSchema::default().into())
}

pub fn build_number(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(NumberSchema::default().into())
}

pub fn build_boolean(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(BooleanSchema::default().into())
}

pub fn build_null(_ctx: &ResolveContext<'_>, _descriptor: &TypeDescriptor) -> BuildResult {
    Ok(Schema::null())
}

/// Unbound variables become a titled placeholder; bound ones take the
/// bound's schema under the variable's name.
pub fn build_type_var(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::TypeVar(var) = descriptor else {
        return Err(mismatch(descriptor));
    };
    let schema = match &var.bound {
        Some(bound) => ctx.resolve(bound)?,
        None => AnySchema::default().into(),
    };
    Ok(schema.with_title(var.name.clone()))
}

pub fn build_alias(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::Alias { name, target } = descriptor else {
        return Err(mismatch(descriptor));
    };
    Ok(ctx.resolve(target)?.with_title(name.clone()))
}

/// Literal values are copied verbatim, without resolving their types.
pub fn build_literal(_ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::Literal { values } = descriptor else {
        return Err(mismatch(descriptor));
    };
    Ok(EnumSchema::new(values.clone()).into())
}

/// Alternatives keep their declared order; a `none` member stays an
/// explicit `{"enum": [null]}` entry.
pub fn build_union(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::Union { members } = descriptor else {
        return Err(mismatch(descriptor));
    };
    Ok(Schema::any_of(resolve_args(ctx, members)?))
}

fn list_schema(
    ctx: &ResolveContext<'_>,
    args: &[TypeDescriptor],
) -> Result<ArraySchema, IncompatibleTypesError> {
    // Union arguments are flattened first; only the first member is honored.
    let mut members = Vec::new();
    for arg in resolve_args(ctx, args)? {
        flatten_any_of(arg, &mut members);
    }
    match members.into_iter().next() {
        Some(item) => Ok(ArraySchema::of(item)),
        None => Ok(ArraySchema::default()),
    }
}

pub fn build_list(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    Ok(list_schema(ctx, descriptor.args())?.into())
}

pub fn build_set(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let mut schema = list_schema(ctx, descriptor.args())?;
    schema.unique_items = Some(true);
    Ok(schema.into())
}

/// Fixed-arity tuples become `prefixItems`; `tuple` and `tuple[T, ...]`
/// fall back to homogeneous `items`.
pub fn build_tuple(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let args = descriptor.args();
    let variadic = args.len() > 1 && matches!(args[1], TypeDescriptor::Ellipsis);
    if args.is_empty() || variadic {
        return Ok(list_schema(ctx, args)?.into());
    }
    Ok(ArraySchema {
        prefix_items: Some(resolve_args(ctx, args)?),
        ..ArraySchema::default()
    }
    .into())
}

/// `dict[str, V]` is modelled with a single catch-all `patternProperties` key.
pub fn build_mapping(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let mut schema = ObjectSchema::default();
    if let [key, value, ..] = descriptor.args() {
        if ctx.options().strict && !key.is_string_like() {
            return Err(IncompatibleTypesError::NonStringKey {
                mapping: descriptor.to_string(),
                key: key.to_string(),
            });
        }
        if !matches!(value, TypeDescriptor::Any | TypeDescriptor::Ellipsis) {
            let mut patterns = IndexMap::new();
            patterns.insert(ANY_KEY_PATTERN.to_string(), ctx.resolve(value)?);
            schema.pattern_properties = Some(patterns);
        }
    }
    Ok(schema.into())
}

/// Closed string-keyed record. Per-field markers override the record's
/// `total` flag unless markers are disabled in the options.
pub fn build_keyed_record(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::KeyedRecord(record) = descriptor else {
        return Err(mismatch(descriptor));
    };
    let markers = ctx.options().requirement_markers;
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for field in &record.fields {
        let is_required = match field.requirement {
            Requirement::Required if markers => true,
            Requirement::NotRequired if markers => false,
            _ => record.total,
        };
        if is_required {
            required.push(field.name.clone());
        }
        properties.insert(field.name.clone(), ctx.resolve(&field.ty)?);
    }
    Ok(ObjectSchema {
        meta: Metadata {
            title: Some(record.name.clone()),
            description: record.doc.clone(),
            ..Metadata::default()
        },
        ..ObjectSchema::closed(properties, required)
    }
    .into())
}

pub fn build_tuple_record(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::TupleRecord(record) = descriptor else {
        return Err(mismatch(descriptor));
    };
    let mut items = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        let schema = match &field.ty {
            Some(ty) => ctx.resolve(ty)?,
            None => AnySchema::default().into(),
        };
        let mut schema = schema.with_title(field.name.clone());
        if !field.default.is_absent() {
            schema.meta_mut().default = field.default.clone();
        }
        items.push(schema);
    }
    Ok(ArraySchema {
        meta: Metadata {
            title: Some(record.name.clone()),
            description: record.doc.clone(),
            ..Metadata::default()
        },
        prefix_items: Some(items),
        ..ArraySchema::default()
    }
    .into())
}

pub fn build_enum_member(_ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::EnumMember {
        owner,
        member,
        value,
    } = descriptor
    else {
        return Err(mismatch(descriptor));
    };
    Ok(ConstSchema {
        meta: Metadata::titled(format!("{owner}.{member}")),
        value: value.clone(),
    }
    .into())
}

pub fn build_enum(_ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::Enum(enum_type) = descriptor else {
        return Err(mismatch(descriptor));
    };
    Ok(EnumSchema {
        meta: Metadata {
            title: Some(enum_type.name.clone()),
            description: doc_summary(enum_type.doc.as_deref()),
            ..Metadata::default()
        },
        values: enum_type.members.iter().map(|m| m.value.clone()).collect(),
    }
    .into())
}

/// Fields with the private prefix are left out; undefaulted fields are required.
pub fn build_data_record(ctx: &ResolveContext<'_>, descriptor: &TypeDescriptor) -> BuildResult {
    let TypeDescriptor::DataRecord(record) = descriptor else {
        return Err(mismatch(descriptor));
    };
    let prefix = ctx.options().private_arg_prefix.as_str();
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for field in &record.fields {
        if !prefix.is_empty() && field.name.starts_with(prefix) {
            continue;
        }
        let schema = match &field.ty {
            Some(ty) => ctx.resolve(ty)?,
            None => AnySchema::default().into(),
        };
        let schema = if field.default.is_absent() {
            required.push(field.name.clone());
            schema
        } else {
            schema.with_default(field.default.clone())
        };
        properties.insert(field.name.clone(), schema);
    }
    Ok(ObjectSchema {
        meta: Metadata {
            title: Some(record.name.clone()),
            description: doc_summary(record.doc.as_deref()),
            ..Metadata::default()
        },
        ..ObjectSchema::closed(properties, required)
    }
    .into())
}
