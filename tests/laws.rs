//! Round-trip and composition laws for chains.

use num_bigint::BigUint;
use proptest::prelude::*;
use trgraph::extensions::field::{element, modulus, FIELD};
use trgraph::{TrGraph, Value};

fn graph() -> TrGraph {
    TrGraph::standard().unwrap()
}

/// A candidate element of `fp:fields` and whether it belongs
fn field_candidate() -> impl Strategy<Value = (Value, bool)> {
    prop_oneof![
        any::<u128>().prop_map(|n| (element(n), true)),
        any::<u64>().prop_map(|k| (Value::tagged(FIELD, Value::from(modulus().clone() - 1u32 - k)), true)),
        any::<u64>().prop_map(|k| (Value::tagged(FIELD, Value::from(modulus().clone() + k)), false)),
        any::<u64>().prop_map(|n| (Value::from(n), false)),
        any::<u64>().prop_map(|n| (Value::tagged("fp:uint64", Value::from(n)), false)),
        "[a-z]{0,8}".prop_map(|s| (Value::tagged(FIELD, Value::Text(s)), false)),
    ]
}

proptest! {
    #[test]
    fn uint32_field_round_trip(n in any::<u32>()) {
        let graph = graph();
        let field = graph.transform(Value::from(n), &["uint32-fp:field"]).unwrap();
        let back = graph.transform(field, &["fp:field-uint32"]).unwrap();
        prop_assert_eq!(back, Value::from(n));
    }

    #[test]
    fn uint64_field_round_trip(n in any::<u64>()) {
        let graph = graph();
        let field = graph.transform(Value::from(n), &["uint64-fp:field"]).unwrap();
        let back = graph.transform(field, &["fp:field-uint64"]).unwrap();
        prop_assert_eq!(back, Value::from(n));
    }

    #[test]
    fn uint128_field_round_trip(n in any::<u128>()) {
        let graph = graph();
        let field = graph.transform(Value::UInt(n), &["uint128-fp:field"]).unwrap();
        prop_assert!(graph.is_type("fp:field", &field).unwrap());
        let back = graph.transform(field, &["fp:field-uint128"]).unwrap();
        prop_assert_eq!(back, Value::UInt(n));
    }

    #[test]
    fn field_uint256_round_trip(limbs in proptest::collection::vec(any::<u32>(), 8)) {
        let graph = graph();
        let field = Value::tagged(FIELD, Value::from(BigUint::new(limbs) % modulus()));
        let n = graph.transform(field.clone(), &["fp:field-uint256"]).unwrap();
        prop_assert!(graph.is_type("uint256", &n).unwrap());
        prop_assert_eq!(graph.transform(n, &["fp:reduce"]).unwrap(), field);
    }

    #[test]
    fn uint128_limbs_round_trip(n in any::<u128>()) {
        let graph = graph();
        let limbs = graph.transform(Value::UInt(n), &["uint128-fp:fields"]).unwrap();
        prop_assert!(graph.is_type("fp:fields", &limbs).unwrap());
        let back = graph.transform(limbs, &["fp:fields-uint128"]).unwrap();
        prop_assert_eq!(back, Value::UInt(n));
    }

    #[test]
    fn utf8_fields_round_trip(s in "\\PC*") {
        let graph = graph();
        let fields = graph.transform(Value::from(s.as_str()), &["utf8-fp:fields"]).unwrap();
        let back = graph.transform(fields, &["fp:fields-utf8"]).unwrap();
        prop_assert_eq!(back, Value::from(s));
    }

    #[test]
    fn bytes_hex_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let graph = graph();
        let hex = graph.transform(Value::Bytes(bytes.clone()), &["bytes-hex"]).unwrap();
        let back = graph.transform(hex, &["hex-bytes"]).unwrap();
        prop_assert_eq!(back, Value::Bytes(bytes));
    }

    #[test]
    fn bytes_base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let graph = graph();
        let encoded = graph.transform(Value::Bytes(bytes.clone()), &["bytes-base64"]).unwrap();
        let back = graph.transform(encoded, &["base64-bytes"]).unwrap();
        prop_assert_eq!(back, Value::Bytes(bytes));
    }

    #[test]
    fn split_chain_equals_concatenated_chain(s in "[ -~]{0,40}") {
        let graph = graph();
        let first = ["utf8-bytes", "bytes-sha256"];
        let second = ["sha256-bytes", "bytes-hex"];

        let stepwise = graph
            .transform(graph.transform(Value::from(s.as_str()), &first).unwrap(), &second)
            .unwrap();
        let joined: Vec<&str> = first.iter().chain(second.iter()).copied().collect();
        let at_once = graph.transform(Value::from(s.as_str()), &joined).unwrap();
        prop_assert_eq!(stepwise, at_once);
    }

    #[test]
    fn spread_membership_is_elementwise(candidates in proptest::collection::vec(field_candidate(), 0..8)) {
        let graph = graph();
        for (value, member) in &candidates {
            prop_assert_eq!(graph.is_type(FIELD, value).unwrap(), *member);
        }
        let expected = candidates.iter().all(|(_, member)| *member);
        let items: Vec<Value> = candidates.into_iter().map(|(value, _)| value).collect();
        prop_assert_eq!(graph.is_type("fp:fields", &Value::List(items)).unwrap(), expected);
    }
}
