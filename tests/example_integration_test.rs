use pretty_assertions::{assert_eq, assert_ne};
use regex::Regex;
use schemasketch::{generate_example, ExampleValue, Mode, SchemaParser};
use serde_json::{json, Value};

fn example_yaml(source: &str, mode: Mode) -> ExampleValue {
    let document: Value = serde_yaml::from_str(source).unwrap();
    let graph = SchemaParser::new().parse(&document).unwrap();
    generate_example(&graph, mode).unwrap()
}

fn value(expected: Value) -> ExampleValue {
    ExampleValue::try_from(&expected).unwrap()
}

/// Synthesizes each YAML schema in read mode and compares the example.
fn check(cases: &[(&str, &str, Value)]) {
    for (name, source, expected) in cases {
        assert_eq!(
            example_yaml(source, Mode::Read),
            value(expected.clone()),
            "case {}",
            name
        );
    }
}

#[test]
fn test_literals_and_type_defaults() {
    check(&[
        ("boolean", "{type: boolean}", json!(true)),
        ("integer", "{type: integer}", json!(1)),
        ("number", "{type: number}", json!(1.0)),
        ("example", "{type: number, example: 5}", json!(5)),
        ("examples", "{type: number, examples: [5]}", json!(5)),
        ("default-scalar", "{type: number, default: 5.0}", json!(5.0)),
        ("default-object", "{type: object, default: {foo: hello}}", json!({"foo": "hello"})),
        ("string-enum", "{type: string, enum: [one, two]}", json!("one")),
    ]);
}

#[test]
fn test_numeric_constraints() {
    check(&[
        ("min", "{type: number, minimum: 5}", json!(5.0)),
        ("exclusive-min-flag", "{type: number, minimum: 5, exclusiveMinimum: true}", json!(6.0)),
        ("exclusive-min-value", "{type: number, exclusiveMinimum: 5}", json!(6.0)),
        ("max", "{type: number, maximum: 5}", json!(5.0)),
        ("exclusive-max-flag", "{type: number, maximum: 5, exclusiveMaximum: true}", json!(4.0)),
        ("exclusive-max-value", "{type: number, exclusiveMaximum: 5}", json!(4.0)),
        ("multiple-of", "{type: number, multipleOf: 5}", json!(5.0)),
        ("integer-min", "{type: integer, minimum: 5}", json!(5)),
        ("integer-exclusive-max", "{type: integer, exclusiveMaximum: 5}", json!(4)),
    ]);
}

#[test]
fn test_string_formats() {
    check(&[
        ("date", "{type: string, format: date}", json!("2020-05-14")),
        ("time", "{type: string, format: time}", json!("23:44:51-07:00")),
        ("date-time", "{type: string, format: date-time}", json!("2020-05-14T23:44:51-07:00")),
        ("duration", "{type: string, format: duration}", json!("P30S")),
        ("email", "{type: string, format: email}", json!("user@example.com")),
        ("hostname", "{type: string, format: hostname}", json!("example.com")),
        ("ipv4", "{type: string, format: ipv4}", json!("192.0.2.1")),
        ("ipv6", "{type: string, format: ipv6}", json!("2001:db8::1")),
        ("uuid", "{type: string, format: uuid}", json!("3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a")),
        ("uri", "{type: string, format: uri}", json!("https://example.com/")),
        ("uri-reference", "{type: string, format: uri-reference}", json!("/example")),
        ("uri-template", "{type: string, format: uri-template}", json!("https://example.com/{id}")),
        ("json-pointer", "{type: string, format: json-pointer}", json!("/example/0/id")),
        ("relative-json-pointer", "{type: string, format: relative-json-pointer}", json!("0/id")),
        ("regex", "{type: string, format: regex}", json!("ab+c")),
        ("password", "{type: string, format: password}", json!("********")),
        ("unknown", "{type: string, format: zip-code}", json!("string")),
    ]);
}

#[test]
fn test_string_lengths() {
    check(&[
        ("min-length", "{type: string, minLength: 10}", json!("ssssssssss")),
        ("max-length", "{type: string, maxLength: 3}", json!("sss")),
        ("lengths-around-default", "{type: string, minLength: 2, maxLength: 20}", json!("string")),
    ]);
}

#[test]
fn test_pattern_example_matches() {
    for pattern in ["^[a-z]+$", "^a+$", r"^\w+$", "^[A-Z]{1,}$", "^[0-9]{3}-[0-9]{4}$"] {
        let source = format!("{{type: string, pattern: '{}'}}", pattern);
        let generated = example_yaml(&source, Mode::Read);
        let text = generated.as_str().unwrap();

        assert_ne!(text, "string", "pattern {} fell back to the type default", pattern);
        assert!(Regex::new(pattern).unwrap().is_match(text), "{:?} does not match {}", text, pattern);
        assert_eq!(example_yaml(&source, Mode::Read), generated);
    }
}

#[test]
fn test_unusable_pattern_falls_through_to_format() {
    check(&[(
        "bad-pattern",
        r#"{type: string, pattern: "([a-z", format: email}"#,
        json!("user@example.com"),
    )]);
}

#[test]
fn test_arrays() {
    check(&[
        ("guess-array", "items: {type: string}", json!(["string"])),
        ("empty-array", "{type: array}", json!("[<any>]")),
        ("array", "{type: array, items: {type: number}}", json!([1.0])),
        ("array-min-items", "{type: array, items: {type: number}, minItems: 2}", json!([1.0, 1.0])),
    ]);
}

#[test]
fn test_objects() {
    check(&[
        ("guess-object", "additionalProperties: true", json!({"<any>": null})),
        ("object-empty", "{type: object}", json!({})),
        ("object-prop-null", "{type: object, properties: {foo: null}}", json!({"foo": null})),
        (
            "object",
            "{type: object, properties: {foo: {type: string}, bar: {type: integer}}, required: [foo]}",
            json!({"foo": "string", "bar": 1}),
        ),
        (
            "additional-props-bool",
            "{type: object, additionalProperties: true}",
            json!({"<any>": null}),
        ),
        (
            "additional-props-schema",
            "{type: object, additionalProperties: {type: string}}",
            json!({"<any>": "string"}),
        ),
    ]);
}

#[test]
fn test_property_visibility_by_mode() {
    let source = "{type: object, properties: {foo: {type: string, readOnly: true}, bar: {type: string, writeOnly: true}}}";
    assert_eq!(example_yaml(source, Mode::Read), value(json!({"foo": "string"})));
    assert_eq!(example_yaml(source, Mode::Write), value(json!({"bar": "string"})));
}

#[test]
fn test_composition() {
    let second = "{type: object, properties: {foo: {type: string}, bar: {type: number, description: desc}}}";
    check(&[
        (
            "all-of",
            &format!("{{allOf: [{{type: object, properties: {{a: {{type: string}}}}}}, {}]}}", second),
            json!({"a": "string", "bar": 1.0, "foo": "string"}),
        ),
        ("one-of", &format!("{{oneOf: [{{type: boolean}}, {}]}}", second), json!(true)),
        ("any-of", &format!("{{anyOf: [{{type: boolean}}, {}]}}", second), json!(true)),
    ]);
}

#[test]
fn test_recursive_references() {
    check(&[
        (
            "recursive-prop",
            r##"{type: object, properties: {person: {type: object, properties: {friend: {$ref: "#/properties/person"}}}}}"##,
            json!({"person": {"friend": null}}),
        ),
        (
            "recursive-array",
            r##"{type: object, properties: {person: {type: object, properties: {friend: {type: array, items: {$ref: "#/properties/person"}}}}}}"##,
            json!({"person": {"friend": [null]}}),
        ),
        (
            "recursive-additional-props",
            r##"{type: object, properties: {person: {type: object, properties: {friend: {type: object, additionalProperties: {$ref: "#/properties/person"}}}}}}"##,
            json!({"person": {"friend": {"<any>": null}}}),
        ),
    ]);
}

#[test]
fn test_example_serializes_in_declaration_order() {
    let example = example_yaml(
        "{type: object, properties: {zeta: {type: integer}, alpha: {type: boolean}, mid: {type: array, items: {type: string}}}}",
        Mode::Read,
    );
    assert_eq!(
        serde_json::to_string(&example).unwrap(),
        r#"{"zeta":1,"alpha":true,"mid":["string"]}"#
    );
}

#[test]
fn test_shared_graph_across_threads() {
    let document: Value = serde_yaml::from_str(
        r##"
type: object
properties:
  left: {$ref: "#/$defs/Branch"}
  right: {$ref: "#/$defs/Branch"}
$defs:
  Branch:
    properties:
      next: {$ref: "#/$defs/Branch"}
      label: {type: string, minLength: 8}
"##,
    )
    .unwrap();
    let graph = SchemaParser::new().parse(&document).unwrap();
    let expected = value(json!({
        "left": {"next": null, "label": "ssssssss"},
        "right": {"next": null, "label": "ssssssss"}
    }));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| generate_example(&graph, Mode::Read).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
