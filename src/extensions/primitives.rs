//! Primitive types: booleans, unsigned integers up to 256 bits, strings, and
//! byte encodings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::{Extension, Rejected};
use crate::error::BoxError;
use crate::link::Link;
use crate::node::TypeNode;
use crate::value::Value;

/// Tag carried by SHA-256 digests
pub const SHA256_TAG: &str = "sha256";

/// Fixed-width unsigned integer types and their widths in bits
pub const UINTS: [(&str, u64); 5] = [
    ("uint16", 16),
    ("uint32", 32),
    ("uint64", 64),
    ("uint128", 128),
    ("uint256", 256),
];

/// Built-in primitive types and the conversions between them
#[derive(Debug, Clone, Copy, Default)]
pub struct Primitives;

impl Extension for Primitives {
    fn name(&self) -> &str {
        "primitives"
    }

    fn types(&self) -> Vec<TypeNode> {
        let mut types = vec![
            TypeNode::scalar("boolean", |v| matches!(v, Value::Bool(_))),
            TypeNode::scalar("uint", |v| v.uint_bits().is_some()),
        ];
        for (name, bits) in UINTS {
            types.push(TypeNode::scalar(name, move |v| fits(v, bits)));
        }
        types.extend([
            TypeNode::scalar("utf8", |v| matches!(v, Value::Text(_))),
            TypeNode::scalar("ascii", |v| matches!(v, Value::Text(s) if s.is_ascii())),
            TypeNode::scalar("hex", |v| matches!(v, Value::Text(s) if is_hex(s))),
            TypeNode::scalar("base64", |v| {
                matches!(v, Value::Text(s) if STANDARD.decode(s).is_ok())
            }),
            TypeNode::scalar("base58", |v| {
                matches!(v, Value::Text(s) if bs58::decode(s).into_vec().is_ok())
            }),
            TypeNode::scalar("bytes", |v| matches!(v, Value::Bytes(_))),
            TypeNode::scalar(SHA256_TAG, |v| {
                matches!(v.as_tagged(SHA256_TAG), Some(Value::Bytes(b)) if b.len() == 32)
            }),
        ]);
        types
    }

    fn links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .types()
            .iter()
            .map(|node| Link::identity(node.name()))
            .collect();

        for (name, bits) in UINTS {
            links.push(Link::new(format!("{name}-uint"), name, "uint", Ok));
            links.push(Link::new(format!("uint-{name}"), "uint", name, move |v| {
                if !fits(&v, bits) {
                    return Err(Rejected::new(format!("{v} does not fit in {name}")).into());
                }
                Ok(v)
            }));
        }

        links.extend([
            Link::new("boolean-uint", "boolean", "uint", |v| {
                Ok(Value::UInt(u128::from(bool::try_from(v)?)))
            }),
            Link::new("utf8-bytes", "utf8", "bytes", |v| {
                Ok(Value::Bytes(String::try_from(v)?.into_bytes()))
            }),
            Link::new("bytes-utf8", "bytes", "utf8", |v| {
                Ok(Value::Text(String::from_utf8(Vec::<u8>::try_from(v)?)?))
            }),
            Link::new("ascii-utf8", "ascii", "utf8", Ok),
            Link::new("utf8-ascii", "utf8", "ascii", |v| {
                let s = String::try_from(v)?;
                if !s.is_ascii() {
                    return Err(Rejected::new("string contains non-ASCII characters").into());
                }
                Ok(Value::Text(s))
            }),
            Link::new("bytes-hex", "bytes", "hex", |v| {
                Ok(Value::Text(hex::encode(Vec::<u8>::try_from(v)?)))
            }),
            Link::new("hex-bytes", "hex", "bytes", |v| {
                Ok(Value::Bytes(hex::decode(String::try_from(v)?)?))
            }),
            Link::new("bytes-base64", "bytes", "base64", |v| {
                Ok(Value::Text(STANDARD.encode(Vec::<u8>::try_from(v)?)))
            }),
            Link::new("base64-bytes", "base64", "bytes", |v| {
                Ok(Value::Bytes(STANDARD.decode(String::try_from(v)?)?))
            }),
            Link::new("bytes-base58", "bytes", "base58", |v| {
                Ok(Value::Text(bs58::encode(Vec::<u8>::try_from(v)?).into_string()))
            }),
            Link::new("base58-bytes", "base58", "bytes", |v| {
                Ok(Value::Bytes(bs58::decode(String::try_from(v)?).into_vec()?))
            }),
            Link::new("bytes-sha256", "bytes", SHA256_TAG, |v| {
                let digest = Sha256::digest(Vec::<u8>::try_from(v)?);
                Ok(Value::tagged(SHA256_TAG, Value::Bytes(digest.to_vec())))
            }),
            Link::new("sha256-bytes", SHA256_TAG, "bytes", digest_bytes),
            Link::new("sha256-hex", SHA256_TAG, "hex", |v| {
                let bytes = Vec::<u8>::try_from(digest_bytes(v)?)?;
                Ok(Value::Text(hex::encode(bytes)))
            }),
        ]);
        links
    }
}

fn digest_bytes(value: Value) -> Result<Value, BoxError> {
    value
        .into_tagged(SHA256_TAG)
        .ok_or_else(|| Rejected::new("expected a sha256 digest").into())
}

fn fits(value: &Value, bits: u64) -> bool {
    value.uint_bits().is_some_and(|n| n <= bits)
}

fn is_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::TrGraph;
    use num_bigint::BigUint;

    fn graph() -> TrGraph {
        let mut graph = TrGraph::new();
        graph.install(&Primitives).unwrap();
        graph
    }

    #[test]
    fn test_uint_ranges() {
        let graph = graph();
        assert!(graph.is_type("uint16", &Value::UInt(65_535)).unwrap());
        assert!(!graph.is_type("uint16", &Value::UInt(65_536)).unwrap());
        assert!(graph.is_type("uint128", &Value::UInt(u128::MAX)).unwrap());
        assert!(!graph.is_type("uint", &Value::Int(-1)).unwrap());

        let wide = Value::from(BigUint::from(u128::MAX) + 1u32);
        assert!(!graph.is_type("uint128", &wide).unwrap());
        assert!(graph.is_type("uint256", &wide).unwrap());
        assert!(graph.is_type("uint", &wide).unwrap());

        let too_wide = Value::from(BigUint::from(1u32) << 256);
        assert!(!graph.is_type("uint256", &too_wide).unwrap());
        assert!(graph.is_type("uint", &too_wide).unwrap());
    }

    #[test]
    fn test_uint256_narrowing() {
        let graph = graph();
        let max = Value::from((BigUint::from(1u32) << 256) - 1u32);
        assert_eq!(graph.transform(max.clone(), &["uint-uint256"]).unwrap(), max);
        assert!(matches!(
            graph.transform(Value::from(BigUint::from(1u32) << 256), &["uint-uint256"]),
            Err(GraphError::TransformFailed { .. })
        ));
        assert!(matches!(
            graph.transform(max, &["uint-uint128"]),
            Err(GraphError::TransformFailed { .. })
        ));
    }

    #[test]
    fn test_narrowing_fails_out_of_range() {
        let graph = graph();
        assert_eq!(
            graph.transform(Value::UInt(7), &["uint-uint16"]).unwrap(),
            Value::UInt(7)
        );
        assert!(matches!(
            graph.transform(Value::UInt(70_000), &["uint-uint16"]),
            Err(GraphError::TransformFailed { .. })
        ));
    }

    #[test]
    fn test_widening_checks_input_width() {
        let graph = graph();
        assert!(matches!(
            graph.transform(Value::UInt(u128::from(u32::MAX) + 1), &["uint32-uint"]),
            Err(GraphError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_text_encodings() {
        let graph = graph();
        let hex: String = graph
            .transform_into(Value::from("hi"), &["utf8-bytes", "bytes-hex"])
            .unwrap();
        assert_eq!(hex, "6869");

        let b64: String = graph
            .transform_into(Value::from("hello"), &["utf8-bytes", "bytes-base64"])
            .unwrap();
        assert_eq!(b64, "aGVsbG8=");

        let back: String = graph
            .transform_into(Value::from(b64), &["base64-bytes", "bytes-utf8"])
            .unwrap();
        assert_eq!(back, "hello");
    }

    #[test]
    fn test_base58() {
        let graph = graph();
        let encoded: String = graph
            .transform_into(Value::from("hello world"), &["utf8-bytes", "bytes-base58"])
            .unwrap();
        assert_eq!(encoded, "StV1DL6CwTryKyV");

        let back: String = graph
            .transform_into(Value::from(encoded), &["base58-bytes", "bytes-utf8"])
            .unwrap();
        assert_eq!(back, "hello world");

        // 0, O, I and l are outside the alphabet
        assert!(!graph.is_type("base58", &Value::from("0OIl")).unwrap());
    }

    #[test]
    fn test_hex_membership() {
        let graph = graph();
        assert!(graph.is_type("hex", &Value::from("00ff")).unwrap());
        assert!(!graph.is_type("hex", &Value::from("0ff")).unwrap());
        assert!(!graph.is_type("hex", &Value::from("zz")).unwrap());
    }

    #[test]
    fn test_invalid_utf8() {
        let graph = graph();
        assert!(matches!(
            graph.transform(Value::Bytes(vec![0xff, 0xfe]), &["bytes-utf8"]),
            Err(GraphError::TransformFailed { .. })
        ));
    }

    #[test]
    fn test_ascii() {
        let graph = graph();
        assert!(matches!(
            graph.transform(Value::from("字"), &["utf8-ascii"]),
            Err(GraphError::TransformFailed { .. })
        ));
        assert!(matches!(
            graph.transform(Value::from("字"), &["ascii-utf8"]),
            Err(GraphError::TypeMismatch { .. })
        ));
        assert_eq!(
            graph.transform(Value::from("abc"), &["utf8-ascii"]).unwrap(),
            Value::from("abc")
        );
    }

    #[test]
    fn test_sha256() {
        let graph = graph();
        let digest: String = graph
            .transform_into(Value::from("abc"), &["utf8-bytes", "bytes-sha256", "sha256-hex"])
            .unwrap();
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_boolean_uint() {
        let graph = graph();
        assert_eq!(graph.transform(Value::Bool(true), &["boolean-uint"]).unwrap(), Value::UInt(1));
        assert_eq!(graph.transform(Value::Bool(false), &["boolean"]).unwrap(), Value::Bool(false));
    }
}
