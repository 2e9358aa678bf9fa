use hintschema_core::error::{IncompatibleTypesError, ManifestError};
use hintschema_core::manifest::{from_json, from_yaml, generate};
use hintschema_core::resolve::ResolverOptions;
use serde_json::json;

const SAMPLE_YAML: &str = include_str!("fixtures/sample.yaml");

#[test]
fn test_parse_sample_manifest() {
    let manifest = from_yaml(SAMPLE_YAML).expect("fixture should parse");
    assert_eq!(manifest.names.len(), 1);
    let labels: Vec<&String> = manifest.types.keys().collect();
    assert_eq!(labels, ["tags", "maybe_count", "scores", "node", "mode"]);
    assert_eq!(manifest.functions.len(), 2);
    assert_eq!(manifest.classes[0].methods.len(), 2);
}

#[test]
fn test_generate_types() {
    let manifest = from_yaml(SAMPLE_YAML).unwrap();
    let out = generate(&manifest, &ResolverOptions::default()).unwrap();
    let node = json!({
        "title": "Node",
        "description": "A tree node.",
        "type": "object",
        "properties": {"label": {"type": "string"}, "weight": {"type": "number"}},
        "additionalProperties": false,
        "required": ["label"],
    });
    assert_eq!(
        out["types"],
        json!({
            "tags": {"type": "array", "items": {"type": "string"}},
            "maybe_count": {"anyOf": [{"type": "integer"}, {"enum": [null]}]},
            "scores": {"type": "object", "patternProperties": {"^.+$": {"type": "number"}}},
            "node": node,
            "mode": {"enum": ["fast", "slow"]},
        })
    );
}

#[test]
fn test_generate_functions_and_classes() {
    let manifest = from_yaml(SAMPLE_YAML).unwrap();
    let out = generate(&manifest, &ResolverOptions::default()).unwrap();

    let search = &out["functions"]["search"];
    assert_eq!(
        search["input"],
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "default": 10},
            },
            "additionalProperties": true,
            "required": ["query"],
        })
    );
    assert_eq!(search["output"]["items"]["title"], json!("Node"));
    assert_eq!(out["functions"]["ping"], json!({"input": null, "output": null}));

    let store = out["classes"]["Store"].as_object().unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(
        store["put"]["input"]["required"],
        json!(["key", "value"])
    );
}

#[test]
fn test_function_order_follows_manifest() {
    let manifest = from_yaml(SAMPLE_YAML).unwrap();
    let out = generate(&manifest, &ResolverOptions::default()).unwrap();
    let names: Vec<&String> = out["functions"].as_object().unwrap().keys().collect();
    assert_eq!(names, ["search", "ping"]);
}

#[test]
fn test_json_manifest() {
    let input = r#"{
        "types": {
            "id": {"kind": "uuid"},
            "when": {"kind": "date_time"}
        }
    }"#;
    let manifest = from_json(input).unwrap();

    let err = generate(&manifest, &ResolverOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ManifestError::Resolve(IncompatibleTypesError::IncompatibleType(ref name)) if name == "uuid"
    ));

    let out = generate(&manifest, &ResolverOptions::lenient()).unwrap();
    assert_eq!(
        out["types"],
        json!({
            "id": {"type": "string", "format": "uuid"},
            "when": {"type": "string", "format": "date-time"},
        })
    );
}

#[test]
fn test_self_referencing_name_hits_recursion_limit() {
    let yaml = r#"
names:
  Loop:
    kind: generic
    origin: list
    args:
      - kind: forward_ref
        name: Loop
types:
  loop:
    kind: forward_ref
    name: Loop
"#;
    let manifest = from_yaml(yaml).unwrap();
    let err = generate(&manifest, &ResolverOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ManifestError::Resolve(IncompatibleTypesError::RecursionLimit { limit: 32, .. })
    ));
}
