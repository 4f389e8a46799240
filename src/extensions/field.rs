//! Prime field elements over the 255-bit Pallas base field.
//!
//! Types live under the `fp:` namespace. Every unsigned integer of up to 128
//! bits is a field element as it is; wider integers enter the field through
//! `fp:reduce`. The nominal types `fp:bool`, `fp:uint64`, `fp:publickey` and
//! `fp:signature` are tagged values that serialize to a fixed number of
//! field elements.

use std::sync::OnceLock;

use num_bigint::BigUint;

use super::{Extension, Rejected};
use crate::error::BoxError;
use crate::link::Link;
use crate::node::TypeNode;
use crate::value::Value;

/// Little-endian 32-bit digits of
/// p = 0x40000000000000000000000000000000224698fc094cf91b992d30ed00000001
const MODULUS_DIGITS: [u32; 8] = [
    0x0000_0001,
    0x992d_30ed,
    0x094c_f91b,
    0x2246_98fc,
    0,
    0,
    0,
    0x4000_0000,
];

/// Tag carried by field elements
pub const FIELD: &str = "fp:field";

/// Spread type of field elements
pub const FIELDS: &str = "fp:fields";

/// Boolean in circuit form
pub const BOOL: &str = "fp:bool";

/// Unsigned 64-bit integer in circuit form
pub const UINT64: &str = "fp:uint64";

/// Public key: x coordinate and parity
pub const PUBLIC_KEY: &str = "fp:publickey";

/// Signature: two field elements
pub const SIGNATURE: &str = "fp:signature";

/// Bytes packed into one element when encoding strings
const BYTES_PER_ELEMENT: usize = 31;

/// 32-bit limbs used to split a `uint128`
const LIMBS: usize = 4;

/// Width of one element inside a base58 payload
const ELEMENT_BYTES: usize = 32;

const PUBLIC_KEY_FORMAT: Composite = Composite {
    tag: PUBLIC_KEY,
    version: 0xcb,
    arity: 2,
    flag: Some(1),
};

const SIGNATURE_FORMAT: Composite = Composite {
    tag: SIGNATURE,
    version: 0x9a,
    arity: 2,
    flag: None,
};

/// The field modulus
pub fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from_slice(&MODULUS_DIGITS))
}

/// Field elements, the nominal circuit types, and their conversions
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeField;

/// Wrap an integer as a field element
pub fn element(n: u128) -> Value {
    Value::tagged(FIELD, Value::UInt(n))
}

/// Wrap an integer of any width as a field element. The range is not checked.
pub fn big_element(n: BigUint) -> Value {
    Value::tagged(FIELD, Value::from(n))
}

fn is_element(value: &Value) -> bool {
    value
        .as_tagged(FIELD)
        .and_then(Value::to_big_uint)
        .is_some_and(|n| &n < modulus())
}

fn from_element(value: Value) -> Result<BigUint, BoxError> {
    value
        .into_tagged(FIELD)
        .and_then(|inner| inner.to_big_uint())
        .ok_or_else(|| Rejected::new("expected a field element").into())
}

fn from_elements(value: Value) -> Result<Vec<BigUint>, BoxError> {
    Vec::<Value>::try_from(value)?
        .into_iter()
        .map(from_element)
        .collect()
}

fn single(value: Value) -> Result<BigUint, BoxError> {
    let mut items = Vec::<Value>::try_from(value)?;
    match (items.pop(), items.is_empty()) {
        (Some(item), true) => from_element(item),
        _ => Err(Rejected::new("expected exactly one field element").into()),
    }
}

fn narrow(n: &BigUint, bits: u64, target: &str) -> Result<u128, BoxError> {
    if n.bits() > bits {
        return Err(Rejected::new(format!("{n} does not fit in {target}")).into());
    }
    Ok(u128::try_from(n)?)
}

fn field_to_bool(n: &BigUint) -> Result<bool, BoxError> {
    match u128::try_from(n) {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        _ => Err(Rejected::new(format!("{n} is not a boolean")).into()),
    }
}

fn circuit_bool(b: bool) -> Value {
    Value::tagged(BOOL, Value::Bool(b))
}

fn from_circuit_bool(value: Value) -> Result<bool, BoxError> {
    match value.into_tagged(BOOL) {
        Some(Value::Bool(b)) => Ok(b),
        _ => Err(Rejected::new(format!("expected {BOOL}")).into()),
    }
}

fn circuit_uint64(n: u128) -> Value {
    Value::tagged(UINT64, Value::UInt(n))
}

fn from_circuit_uint64(value: Value) -> Result<u128, BoxError> {
    match value.into_tagged(UINT64) {
        Some(Value::UInt(n)) => Ok(n),
        _ => Err(Rejected::new(format!("expected {UINT64}")).into()),
    }
}

impl Extension for PrimeField {
    fn name(&self) -> &str {
        "field"
    }

    fn types(&self) -> Vec<TypeNode> {
        vec![
            TypeNode::scalar(FIELD, is_element),
            TypeNode::spread(FIELDS, FIELD),
            TypeNode::scalar(BOOL, |v| matches!(v.as_tagged(BOOL), Some(Value::Bool(_)))),
            TypeNode::scalar(UINT64, |v| {
                matches!(v.as_tagged(UINT64), Some(Value::UInt(n)) if *n <= u128::from(u64::MAX))
            }),
            TypeNode::scalar(PUBLIC_KEY, |v| PUBLIC_KEY_FORMAT.is_member(v)),
            TypeNode::scalar(SIGNATURE, |v| SIGNATURE_FORMAT.is_member(v)),
        ]
    }

    fn links(&self) -> Vec<Link> {
        let mut links = vec![
            Link::identity(FIELD),
            Link::identity(FIELDS),
            Link::identity(BOOL),
            Link::identity(UINT64),
        ];
        links.extend(integer_links());
        links.extend(bool_links());
        links.extend(uint64_links());
        links.extend(spread_links());
        links.extend(PUBLIC_KEY_FORMAT.links());
        links.extend(SIGNATURE_FORMAT.links());
        links
    }
}

fn integer_links() -> Vec<Link> {
    let mut links = Vec::new();

    for (uint, bits) in [("uint16", 16), ("uint32", 32), ("uint64", 64), ("uint128", 128)] {
        links.push(Link::new(format!("{uint}-{FIELD}"), uint, FIELD, |v| {
            Ok(element(u128::try_from(v)?))
        }));
        links.push(Link::new(format!("{FIELD}-{uint}"), FIELD, uint, move |v| {
            Ok(Value::UInt(narrow(&from_element(v)?, bits, uint)?))
        }));
    }
    for uint in ["uint256", "uint"] {
        links.push(Link::new(format!("{FIELD}-{uint}"), FIELD, uint, |v| {
            Ok(Value::from(from_element(v)?))
        }));
    }

    links.extend([
        Link::new("fp:mod.order", "uint", "uint", |v| {
            Ok(Value::from(BigUint::try_from(v)? % modulus()))
        }),
        Link::new("fp:reduce", "uint", FIELD, |v| {
            Ok(big_element(BigUint::try_from(v)? % modulus()))
        }),
    ]);
    links
}

fn bool_links() -> Vec<Link> {
    vec![
        Link::new(format!("boolean-{FIELD}"), "boolean", FIELD, |v| {
            Ok(element(u128::from(bool::try_from(v)?)))
        }),
        Link::new(format!("{FIELD}-boolean"), FIELD, "boolean", |v| {
            Ok(Value::Bool(field_to_bool(&from_element(v)?)?))
        }),
        Link::new(format!("boolean-{BOOL}"), "boolean", BOOL, |v| {
            Ok(circuit_bool(bool::try_from(v)?))
        }),
        Link::new(format!("{BOOL}-boolean"), BOOL, "boolean", |v| {
            Ok(Value::Bool(from_circuit_bool(v)?))
        }),
        Link::new(format!("{BOOL}-{FIELD}"), BOOL, FIELD, |v| {
            Ok(element(u128::from(from_circuit_bool(v)?)))
        }),
        Link::new(format!("{FIELD}-{BOOL}"), FIELD, BOOL, |v| {
            Ok(circuit_bool(field_to_bool(&from_element(v)?)?))
        }),
        Link::new(format!("{BOOL}-{FIELDS}"), BOOL, FIELDS, |v| {
            Ok(Value::List(vec![element(u128::from(from_circuit_bool(v)?))]))
        }),
        Link::new(format!("{FIELDS}-{BOOL}"), FIELDS, BOOL, |v| {
            Ok(circuit_bool(field_to_bool(&single(v)?)?))
        }),
    ]
}

fn uint64_links() -> Vec<Link> {
    let mut links = Vec::new();

    for uint in ["uint16", "uint32", "uint64"] {
        links.push(Link::new(format!("{uint}-{UINT64}"), uint, UINT64, |v| {
            Ok(circuit_uint64(u128::try_from(v)?))
        }));
    }
    links.push(Link::new(format!("uint-{UINT64}"), "uint", UINT64, |v| {
        Ok(circuit_uint64(narrow(&BigUint::try_from(v)?, 64, UINT64)?))
    }));
    for uint in ["uint64", "uint128", "uint256", "uint"] {
        links.push(Link::new(format!("{UINT64}-{uint}"), UINT64, uint, |v| {
            Ok(Value::UInt(from_circuit_uint64(v)?))
        }));
    }

    links.extend([
        Link::new(format!("{UINT64}-{FIELD}"), UINT64, FIELD, |v| {
            Ok(element(from_circuit_uint64(v)?))
        }),
        Link::new(format!("{FIELD}-{UINT64}"), FIELD, UINT64, |v| {
            Ok(circuit_uint64(narrow(&from_element(v)?, 64, UINT64)?))
        }),
        Link::new(format!("{UINT64}-{FIELDS}"), UINT64, FIELDS, |v| {
            Ok(Value::List(vec![element(from_circuit_uint64(v)?)]))
        }),
        Link::new(format!("{FIELDS}-{UINT64}"), FIELDS, UINT64, |v| {
            Ok(circuit_uint64(narrow(&single(v)?, 64, UINT64)?))
        }),
    ]);
    links
}

fn spread_links() -> Vec<Link> {
    vec![
        Link::new(format!("{FIELD}-{FIELDS}"), FIELD, FIELDS, |v| Ok(Value::List(vec![v]))),
        Link::new(format!("{FIELDS}-{FIELD}"), FIELDS, FIELD, |v| Ok(big_element(single(v)?))),
        Link::new(format!("uint128-{FIELDS}"), "uint128", FIELDS, |v| {
            let n = u128::try_from(v)?;
            let limbs = (0..LIMBS)
                .map(|i| element((n >> (32 * i)) & u128::from(u32::MAX)))
                .collect();
            Ok(Value::List(limbs))
        }),
        Link::new(format!("{FIELDS}-uint128"), FIELDS, "uint128", |v| {
            let limbs = from_elements(v)?;
            if limbs.len() != LIMBS {
                return Err(Rejected::new(format!("expected {LIMBS} limbs, got {}", limbs.len())).into());
            }
            let mut n: u128 = 0;
            for (i, limb) in limbs.iter().enumerate() {
                n |= narrow(limb, 32, "a 32-bit limb")? << (32 * i);
            }
            Ok(Value::UInt(n))
        }),
        Link::new(format!("utf8-{FIELDS}"), "utf8", FIELDS, |v| {
            let bytes = String::try_from(v)?.into_bytes();
            Ok(Value::List(pack_bytes(&bytes)))
        }),
        Link::new(format!("{FIELDS}-utf8"), FIELDS, "utf8", |v| {
            let bytes = unpack_bytes(&from_elements(v)?)?;
            Ok(Value::Text(String::from_utf8(bytes)?))
        }),
    ]
}

/// Length element followed by little-endian chunks of 31 bytes
fn pack_bytes(bytes: &[u8]) -> Vec<Value> {
    let mut out = Vec::with_capacity(1 + bytes.len().div_ceil(BYTES_PER_ELEMENT));
    out.push(element(bytes.len() as u128));
    out.extend(
        bytes
            .chunks(BYTES_PER_ELEMENT)
            .map(|chunk| big_element(BigUint::from_bytes_le(chunk))),
    );
    out
}

fn unpack_bytes(elements: &[BigUint]) -> Result<Vec<u8>, BoxError> {
    let (len, chunks) = elements
        .split_first()
        .ok_or_else(|| Rejected::new("missing length element"))?;
    let len = usize::try_from(len)?;
    if chunks.len() != len.div_ceil(BYTES_PER_ELEMENT) {
        return Err(Rejected::new(format!(
            "{} chunks cannot hold {} bytes",
            chunks.len(),
            len
        ))
        .into());
    }

    let mut bytes = Vec::with_capacity(len);
    for chunk in chunks {
        let mut le = chunk.to_bytes_le();
        if le.len() > BYTES_PER_ELEMENT {
            return Err(Rejected::new(format!("chunk exceeds {BYTES_PER_ELEMENT} bytes")).into());
        }
        le.resize(BYTES_PER_ELEMENT, 0);
        let take = BYTES_PER_ELEMENT.min(len - bytes.len());
        bytes.extend_from_slice(&le[..take]);
    }
    Ok(bytes)
}

/// A nominal type carried as a fixed number of field elements
#[derive(Debug, Clone, Copy)]
struct Composite {
    tag: &'static str,
    /// Leading byte of the base58check payload
    version: u8,
    arity: usize,
    /// Element restricted to 0 or 1
    flag: Option<usize>,
}

impl Composite {
    fn accepts(&self, elements: &[BigUint]) -> bool {
        elements.len() == self.arity
            && elements.iter().all(|n| n < modulus())
            && self.flag.map_or(true, |i| elements[i] <= BigUint::from(1u8))
    }

    fn is_member(&self, value: &Value) -> bool {
        let Some(Value::List(items)) = value.as_tagged(self.tag) else {
            return false;
        };
        let elements: Option<Vec<BigUint>> = items
            .iter()
            .map(|item| item.as_tagged(FIELD).and_then(Value::to_big_uint))
            .collect();
        elements.is_some_and(|elements| self.accepts(&elements))
    }

    fn wrap(&self, elements: Vec<BigUint>) -> Result<Value, BoxError> {
        if !self.accepts(&elements) {
            return Err(Rejected::new(format!("elements do not form a valid {}", self.tag)).into());
        }
        let items = elements.into_iter().map(big_element).collect();
        Ok(Value::tagged(self.tag, Value::List(items)))
    }

    fn open(&self, value: Value) -> Result<Vec<BigUint>, BoxError> {
        let inner = value
            .into_tagged(self.tag)
            .ok_or_else(|| Rejected::new(format!("expected {}", self.tag)))?;
        from_elements(inner)
    }

    /// Version byte, then each element as 32 little-endian bytes, with a
    /// double-SHA-256 checksum
    fn to_base58(&self, elements: &[BigUint]) -> String {
        let mut payload = Vec::with_capacity(1 + self.arity * ELEMENT_BYTES);
        payload.push(self.version);
        for n in elements {
            let mut bytes = n.to_bytes_le();
            bytes.resize(ELEMENT_BYTES, 0);
            payload.extend(bytes);
        }
        bs58::encode(payload).with_check().into_string()
    }

    fn from_base58(&self, text: &str) -> Result<Vec<BigUint>, BoxError> {
        let payload = bs58::decode(text).with_check(None).into_vec()?;
        let (version, body) = payload
            .split_first()
            .ok_or_else(|| Rejected::new("empty base58 payload"))?;
        if *version != self.version {
            return Err(Rejected::new(format!(
                "version byte {version:#04x} does not belong to {}",
                self.tag
            ))
            .into());
        }
        if body.len() != self.arity * ELEMENT_BYTES {
            return Err(Rejected::new(format!(
                "{} payload has {} bytes, expected {}",
                self.tag,
                body.len(),
                self.arity * ELEMENT_BYTES
            ))
            .into());
        }
        Ok(body.chunks(ELEMENT_BYTES).map(BigUint::from_bytes_le).collect())
    }

    fn links(self) -> Vec<Link> {
        let tag = self.tag;
        vec![
            Link::identity(tag),
            Link::new(format!("{tag}-{FIELDS}"), tag, FIELDS, move |v| {
                Ok(Value::List(self.open(v)?.into_iter().map(big_element).collect()))
            }),
            Link::new(format!("{FIELDS}-{tag}"), FIELDS, tag, move |v| {
                self.wrap(from_elements(v)?)
            }),
            Link::new(format!("{tag}-base58"), tag, "base58", move |v| {
                Ok(Value::Text(self.to_base58(&self.open(v)?)))
            }),
            Link::new(format!("base58-{tag}"), "base58", tag, move |v| {
                self.wrap(self.from_base58(&String::try_from(v)?)?)
            }),
        ]
    }
}
