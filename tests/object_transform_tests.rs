//! Schema-driven object transforms over the built-in extensions.

use trgraph::extensions::field::element;
use trgraph::extensions::primitives::SHA256_TAG;
use trgraph::{DataTree, GraphError, Schema, TrGraph, Value};

fn graph() -> TrGraph {
    TrGraph::standard().unwrap()
}

fn fixture_schema() -> Schema {
    Schema::parse(include_str!("fixtures/person_schema.json")).unwrap()
}

fn fixture_input() -> DataTree {
    DataTree::parse(include_str!("fixtures/person_input.json")).unwrap()
}

fn abc_digest() -> Value {
    let bytes = graph()
        .transform(Value::from("abc"), &["utf8-bytes", "bytes-sha256", "sha256-bytes"])
        .unwrap();
    Value::tagged(SHA256_TAG, bytes)
}

#[test]
fn test_object_transform() {
    let out = graph().object_transform(&fixture_input(), &fixture_schema()).unwrap();

    let limbs = Value::List(vec![element(1), element(1), element(0), element(0)]);
    assert_eq!(
        out.transformed,
        DataTree::node([
            (
                "other",
                DataTree::node([
                    ("digest", DataTree::value(abc_digest())),
                    ("limbs", DataTree::value(limbs)),
                ]),
            ),
            ("age", DataTree::value(element(25))),
            ("name", DataTree::value("74657374")),
        ])
    );

    // spread output of "limbs" is flattened; order follows the schema
    assert_eq!(
        out.linear,
        vec![
            abc_digest(),
            element(1),
            element(1),
            element(0),
            element(0),
            element(25),
            Value::from("74657374"),
        ]
    );
}

#[test]
fn test_linear_of_single_spread_leaf() {
    let graph = graph();
    let input = DataTree::node([("n", DataTree::value(7u64))]);
    let schema = Schema::node([("n", Schema::chain(["uint64-fp:field", "fp:field-fp:fields"]))]);

    let out = graph.object_transform(&input, &schema).unwrap();
    assert_eq!(out.linear, vec![element(7)]);
    assert_eq!(out.transformed.get("n"), Some(&DataTree::value(Value::List(vec![element(7)]))));
}

#[test]
fn test_non_spread_list_output_is_kept_whole() {
    let graph = graph();
    let input = DataTree::node([("bytes", DataTree::value(Value::Bytes(vec![1, 2])))]);
    let schema = Schema::node([("bytes", Schema::chain(["bytes"]))]);

    let out = graph.object_transform(&input, &schema).unwrap();
    assert_eq!(out.linear, vec![Value::Bytes(vec![1, 2])]);
}

#[test]
fn test_missing_field_path() {
    let input = DataTree::parse(r#"{ "name": "test", "age": 25, "other": { "digest": "abc" } }"#).unwrap();
    match graph().object_transform(&input, &fixture_schema()) {
        Err(GraphError::MissingField { path }) => assert_eq!(path.to_string(), "other.limbs"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_leaf_failure_aborts_everything() {
    let input = DataTree::parse(
        r#"{ "name": "tést", "age": 25, "other": { "digest": "abc", "limbs": 1 } }"#,
    )
    .unwrap();
    match graph().object_transform(&input, &fixture_schema()) {
        Err(GraphError::TypeMismatch { link, expected }) => {
            assert_eq!(link, "ascii-utf8");
            assert_eq!(expected, "ascii");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_unknown_link_in_schema() {
    let input = DataTree::parse(r#"{ "a": 1 }"#).unwrap();
    let schema = Schema::parse(r#"{ "a": ["uint-mina:field"] }"#).unwrap();
    assert!(matches!(
        graph().object_transform(&input, &schema),
        Err(GraphError::UnknownLink { name }) if name == "uint-mina:field"
    ));
}

#[test]
fn test_tagged_input_leaf() {
    let input = DataTree::parse(r#"{ "f": { "$tag": "fp:field", "$value": 9 } }"#).unwrap();
    let schema = Schema::parse(r#"{ "f": ["fp:field-uint64"] }"#).unwrap();
    let out = graph().object_transform(&input, &schema).unwrap();
    assert_eq!(out.linear, vec![Value::UInt(9)]);
}

#[test]
fn test_json_output() {
    let input = DataTree::parse(r#"{ "a": { "b": true } }"#).unwrap();
    let schema = Schema::parse(r#"{ "a": { "b": ["boolean-uint"] } }"#).unwrap();
    let out = graph().object_transform(&input, &schema).unwrap();
    assert_eq!(
        out.to_json(),
        serde_json::json!({ "transformed": { "a": { "b": 1 } }, "linear": [1] })
    );
}

#[test]
fn test_wide_integer_input_reaches_uint128_links() {
    let input = DataTree::parse(r#"{ "n": 340282366920938463463374607431768211455 }"#).unwrap();
    assert_eq!(input.get("n"), Some(&DataTree::value(Value::UInt(u128::MAX))));

    let schema = Schema::parse(r#"{ "n": ["uint128-fp:fields", "fp:fields-uint128"] }"#).unwrap();
    let out = graph().object_transform(&input, &schema).unwrap();
    assert_eq!(out.linear, vec![Value::UInt(u128::MAX)]);
    assert_eq!(
        out.to_json().to_string(),
        r#"{"transformed":{"n":340282366920938463463374607431768211455},"linear":[340282366920938463463374607431768211455]}"#
    );
}
