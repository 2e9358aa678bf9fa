use hintschema_core::descriptor::{Container, KeyedField, KeyedRecord, Requirement, TypeDescriptor, TypeVar};
use hintschema_core::error::IncompatibleTypesError;
use hintschema_core::resolve::{Resolver, ResolverOptions};
use hintschema_core::schema::DefaultValue;
use hintschema_core::signature::{Callable, ClassType, GenericBase, Parameter, ParameterKind};
use serde_json::{Value, json};

fn receiver(name: &str) -> Parameter {
    Parameter {
        name: name.to_string(),
        kind: ParameterKind::Normal,
        annotation: None,
        default: DefaultValue::Absent,
    }
}

fn bound_var() -> TypeDescriptor {
    TypeDescriptor::TypeVar(TypeVar::bounded("T", TypeDescriptor::bare(Container::Dict)))
}

fn generic_methods() -> Vec<Callable> {
    vec![
        Callable::new(
            "f_type_var",
            vec![receiver("self"), Parameter::new("value", bound_var())],
        ),
        Callable::new(
            "f_default",
            vec![
                receiver("self"),
                Parameter::new("value", TypeDescriptor::Int)
                    .with_default(DefaultValue::Value(json!(42))),
            ],
        ),
        Callable::new(
            "f_var_kws",
            vec![
                receiver("self"),
                Parameter::new("value", TypeDescriptor::Int),
                Parameter::new("kws", TypeDescriptor::Any).with_kind(ParameterKind::VarKeyword),
            ],
        ),
        Callable::new(
            "f_pos_args",
            vec![
                receiver("self"),
                Parameter::new("value", TypeDescriptor::Int),
                Parameter::new("args", TypeDescriptor::Any)
                    .with_kind(ParameterKind::VarPositional),
            ],
        ),
    ]
}

fn generic_class() -> ClassType {
    ClassType {
        name: "GenericClass".to_string(),
        generic_base: Some(GenericBase {
            origin: None,
            args: vec![bound_var()],
        }),
        methods: generic_methods(),
    }
}

fn schema_record() -> TypeDescriptor {
    TypeDescriptor::KeyedRecord(KeyedRecord {
        name: "_Schema".to_string(),
        doc: None,
        total: true,
        fields: vec![KeyedField {
            name: "id".to_string(),
            ty: TypeDescriptor::Str,
            requirement: Requirement::Inherit,
        }],
    })
}

fn input_of(resolver: &Resolver, class: &ClassType, method: &str) -> Value {
    let methods = resolver.resolve_class(class).unwrap();
    methods[method].to_value()["input"].clone()
}

fn integer_value_input(additional: bool) -> Value {
    json!({
        "type": "object",
        "properties": {"value": {"type": "integer"}},
        "additionalProperties": additional,
        "required": ["value"],
    })
}

#[test]
fn generic_class_methods() {
    let resolver = Resolver::new();
    let class = generic_class();
    let cases = [
        (
            "f_type_var",
            json!({
                "type": "object",
                "properties": {"value": {"title": "T", "type": "object"}},
                "additionalProperties": false,
                "required": ["value"],
            }),
        ),
        (
            "f_default",
            json!({
                "type": "object",
                "properties": {"value": {"type": "integer", "default": 42}},
                "additionalProperties": false,
                "required": [],
            }),
        ),
        ("f_var_kws", integer_value_input(true)),
        ("f_pos_args", integer_value_input(false)),
    ];
    for (method, expected) in cases {
        assert_eq!(input_of(&resolver, &class, method), expected, "{method}");
    }
}

#[test]
fn generic_subclass_unifies_type_variable() {
    let subclass = ClassType {
        name: "GenericSubclass".to_string(),
        generic_base: Some(GenericBase {
            origin: Some(Box::new(generic_class())),
            args: vec![schema_record()],
        }),
        methods: generic_methods(),
    };
    let input = input_of(&Resolver::new(), &subclass, "f_type_var");
    assert_eq!(
        input["properties"]["value"],
        json!({
            "type": "object",
            "title": "_Schema",
            "properties": {"id": {"type": "string"}},
            "additionalProperties": false,
            "required": ["id"],
        })
    );
}

#[test]
fn positional_only_parameter_is_rejected() {
    let callable = Callable::new(
        "f",
        vec![
            Parameter::new("value", TypeDescriptor::Int).with_kind(ParameterKind::PositionalOnly),
        ],
    );
    let err = Resolver::new().resolve_callable(&callable, None).unwrap_err();
    assert_eq!(err, IncompatibleTypesError::PositionalOnly("value".to_string()));
}

#[test]
fn class_methods_skip_receiver_and_private_parameters() {
    let private = || {
        Parameter::new("_private", TypeDescriptor::Str).with_default(DefaultValue::Null)
    };
    let name = || Parameter::new("name", TypeDescriptor::Str);
    let mut f_static = Callable::new("f_static", vec![name(), private()]);
    f_static.is_static = true;
    let class = ClassType {
        name: "TestClass".to_string(),
        generic_base: None,
        methods: vec![
            Callable::new("f", vec![receiver("self"), name(), private()]),
            Callable::new("f_cls", vec![receiver("cls"), name(), private()]),
            f_static,
            Callable::new("_hidden", vec![receiver("self"), name()]),
        ],
    };

    let methods = Resolver::new().resolve_class(&class).unwrap();
    let names: Vec<&String> = methods.keys().collect();
    assert_eq!(names, ["f", "f_cls", "f_static"]);

    let expected = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "additionalProperties": false,
        "required": ["name"],
    });
    for annotation in methods.values() {
        assert_eq!(annotation.to_value()["input"], expected);
    }
}

#[test]
fn function_without_return_type() {
    let callable = Callable::new("f", vec![Parameter::new("value", TypeDescriptor::Str)]);
    let annotation = Resolver::new().resolve_callable(&callable, None).unwrap();
    assert!(annotation.output.is_none());
    insta::assert_json_snapshot!(annotation, @r#"
    {
      "input": {
        "type": "object",
        "properties": {
          "value": {
            "type": "string"
          }
        },
        "additionalProperties": false,
        "required": [
          "value"
        ]
      },
      "output": null
    }
    "#);
}

#[test]
fn function_without_parameters() {
    let callable = Callable::new("f", Vec::new()).returning(TypeDescriptor::Int);
    let annotation = Resolver::new().resolve_callable(&callable, None).unwrap();
    assert_eq!(
        annotation.to_value(),
        json!({"input": null, "output": {"type": "integer"}})
    );
}

#[test]
fn explicit_null_default_is_kept() {
    let callable = Callable::new(
        "f",
        vec![
            Parameter::new("limit", TypeDescriptor::optional(TypeDescriptor::Int))
                .with_default(DefaultValue::Null),
        ],
    );
    let value = Resolver::new()
        .resolve_callable(&callable, None)
        .unwrap()
        .to_value();
    assert_eq!(value["input"]["required"], json!([]));
    assert_eq!(value["input"]["properties"]["limit"]["default"], Value::Null);
    assert!(
        value["input"]["properties"]["limit"]
            .as_object()
            .unwrap()
            .contains_key("default")
    );
}

#[test]
fn keyword_only_parameters_are_modelled() {
    let callable = Callable::new(
        "f",
        vec![
            Parameter::new("flag", TypeDescriptor::Bool).with_kind(ParameterKind::KeywordOnly),
        ],
    );
    let value = Resolver::new()
        .resolve_callable(&callable, None)
        .unwrap()
        .to_value();
    assert_eq!(value["input"]["required"], json!(["flag"]));
}

#[test]
fn custom_private_prefix() {
    let resolver = Resolver::with_options(ResolverOptions {
        private_arg_prefix: "__".to_string(),
        ..ResolverOptions::default()
    });
    let callable = Callable::new(
        "f",
        vec![
            Parameter::new("_visible", TypeDescriptor::Str),
            Parameter::new("__hidden", TypeDescriptor::Str),
        ],
    );
    let value = resolver.resolve_callable(&callable, None).unwrap().to_value();
    assert_eq!(value["input"]["required"], json!(["_visible"]));
}

#[test]
fn unannotated_parameter() {
    let callable = Callable::new(
        "f",
        vec![Parameter {
            annotation: None,
            ..Parameter::new("value", TypeDescriptor::Any).with_default(DefaultValue::Value(json!(1)))
        }],
    );

    let err = Resolver::new().resolve_callable(&callable, None).unwrap_err();
    assert!(matches!(err, IncompatibleTypesError::IncompatibleType(ref name) if name.starts_with("value")));

    let value = Resolver::with_options(ResolverOptions::lenient())
        .resolve_callable(&callable, None)
        .unwrap()
        .to_value();
    assert_eq!(value["input"]["properties"]["value"], json!({"default": 1}));
}

#[test]
fn free_function_type_variable_uses_bound() {
    let callable = Callable::new("f", vec![Parameter::new("value", bound_var())]);
    let value = Resolver::new()
        .resolve_callable(&callable, None)
        .unwrap()
        .to_value();
    assert_eq!(
        value["input"]["properties"]["value"],
        json!({"title": "T", "type": "object"})
    );
}

#[test]
fn strict_return_type_error_propagates() {
    let callable = Callable::new("f", Vec::new()).returning(TypeDescriptor::Uuid);
    assert!(Resolver::new().resolve_callable(&callable, None).is_err());
    let lenient = Resolver::with_options(ResolverOptions::lenient())
        .resolve_callable(&callable, None)
        .unwrap();
    assert_eq!(
        lenient.to_value()["output"],
        json!({"type": "string", "format": "uuid"})
    );
}
