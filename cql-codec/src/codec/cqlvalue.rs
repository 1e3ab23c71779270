//! Bridges between a composite codec's object-safe `Codec::encode`/`decode`
//! and the per-element `CqlValue` preferred host shape for untyped
//! destinations ... fabricate a preferred host value").
//!
//! Primitive codecs (and `convert.rs`) never need to know `CqlValue` exists:
//! encoding unwraps a `CqlValue` to its raw canonical-ish field before
//! handing it to the element codec; decoding allocates a raw zero value,
//! lets the element codec fill it in, then re-wraps the result.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use uuid::Uuid;

use super::Codec;
use crate::column_type::ColumnType;
use crate::convert::Encodable;
use crate::error::CodecError;
use crate::value::{CqlDuration, CqlValue};
use crate::version::ProtocolVersion;

/// Unwraps one `CqlValue` layer to whatever raw type its own codec's
/// conversion matrix (or, for composites, the next codec down) expects.
pub(crate) fn as_encodable(value: &CqlValue) -> &dyn Encodable {
    match value {
        CqlValue::Ascii(v) | CqlValue::Text(v) => v as &dyn Encodable,
        CqlValue::Boolean(v) => v as &dyn Encodable,
        CqlValue::Blob(v) => v as &dyn Encodable,
        CqlValue::Counter(v) | CqlValue::BigInt(v) => v as &dyn Encodable,
        CqlValue::Decimal(v) => v as &dyn Encodable,
        CqlValue::Date(v) => v as &dyn Encodable,
        CqlValue::Double(v) => v as &dyn Encodable,
        CqlValue::Duration(v) => v as &dyn Encodable,
        CqlValue::Float(v) => v as &dyn Encodable,
        CqlValue::Int(v) => v as &dyn Encodable,
        CqlValue::Timestamp(v) => v as &dyn Encodable,
        CqlValue::Inet(v) => v as &dyn Encodable,
        CqlValue::List(v) | CqlValue::Set(v) => v as &dyn Encodable,
        CqlValue::Map(v) => v as &dyn Encodable,
        CqlValue::Tuple(v) => v as &dyn Encodable,
        CqlValue::UserDefinedType { fields, .. } => fields as &dyn Encodable,
        CqlValue::SmallInt(v) => v as &dyn Encodable,
        CqlValue::TinyInt(v) => v as &dyn Encodable,
        CqlValue::Time(v) => v as &dyn Encodable,
        CqlValue::Timeuuid(v) | CqlValue::Uuid(v) => v as &dyn Encodable,
        CqlValue::Varint(v) => v as &dyn Encodable,
    }
}

/// Runs `codec.decode` into a freshly-allocated zero value of the type
/// `ty` prefers, then wraps the result back into a `CqlValue`. Returns
/// `None` when the element was null.
pub(crate) fn decode_as_cqlvalue(
    codec: &dyn Codec,
    ty: &ColumnType,
    bytes: &[u8],
    version: ProtocolVersion,
) -> Result<Option<CqlValue>, CodecError> {
    macro_rules! scalar {
        ($variant:ident, $t:ty) => {{
            let mut dest: $t = Default::default();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::$variant(dest)) })
        }};
    }
    match ty {
        ColumnType::Ascii => scalar!(Ascii, String),
        ColumnType::Text => scalar!(Text, String),
        ColumnType::Boolean => scalar!(Boolean, bool),
        ColumnType::Blob | ColumnType::Custom(_) => scalar!(Blob, Vec<u8>),
        ColumnType::Counter => scalar!(Counter, i64),
        ColumnType::Decimal => scalar!(Decimal, BigDecimal),
        ColumnType::Date => scalar!(Date, u32),
        ColumnType::Double => scalar!(Double, f64),
        ColumnType::Duration => scalar!(Duration, CqlDuration),
        ColumnType::Float => scalar!(Float, f32),
        ColumnType::Int => scalar!(Int, i32),
        ColumnType::BigInt => scalar!(BigInt, i64),
        ColumnType::Timestamp => scalar!(Timestamp, i64),
        ColumnType::SmallInt => scalar!(SmallInt, i16),
        ColumnType::TinyInt => scalar!(TinyInt, i8),
        ColumnType::Time => scalar!(Time, i64),
        ColumnType::Varint => scalar!(Varint, BigInt),
        ColumnType::Inet => {
            let mut dest = std::net::IpAddr::from([0, 0, 0, 0]);
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Inet(dest)) })
        }
        ColumnType::Timeuuid => {
            let mut dest = Uuid::nil();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Timeuuid(dest)) })
        }
        ColumnType::Uuid => {
            let mut dest = Uuid::nil();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Uuid(dest)) })
        }
        ColumnType::List(_) => {
            let mut dest: Vec<Option<CqlValue>> = Vec::new();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::List(dest)) })
        }
        ColumnType::Set(_) => {
            let mut dest: Vec<Option<CqlValue>> = Vec::new();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Set(dest)) })
        }
        ColumnType::Map(_, _) => {
            let mut dest: Vec<(CqlValue, Option<CqlValue>)> = Vec::new();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Map(dest)) })
        }
        ColumnType::Tuple(_) => {
            let mut dest: Vec<Option<CqlValue>> = Vec::new();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null { None } else { Some(CqlValue::Tuple(dest)) })
        }
        ColumnType::UserDefinedType { keyspace, name, .. } => {
            let mut dest: Vec<(String, Option<CqlValue>)> = Vec::new();
            let was_null = codec.decode(bytes, &mut dest, version)?;
            Ok(if was_null {
                None
            } else {
                Some(CqlValue::UserDefinedType {
                    keyspace: keyspace.clone(),
                    type_name: name.clone(),
                    fields: dest,
                })
            })
        }
    }
}
