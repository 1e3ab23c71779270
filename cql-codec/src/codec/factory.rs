//! The codec factory: recursively builds a codec tree from a
//! `ColumnType`.

use std::sync::Arc;

use super::collection::CollectionCodec;
use super::map::MapCodec;
use super::primitive::{
    BigIntCodec, BooleanCodec, BytesCodec, DateCodec, DecimalCodec, DoubleCodec, DurationCodec,
    FloatCodec, InetCodec, IntCodec, SmallIntCodec, StringCodec, TimeCodec, TimestampCodec,
    TinyIntCodec, UuidCodec, VarintCodec,
};
use super::tuple::TupleCodec;
use super::udt::UserDefinedTypeCodec;
use super::{Codec, DynCodec};
use crate::column_type::ColumnType;
use crate::error::CodecError;

/// How an untyped destination should be materialized when the caller
/// decodes into a location whose concrete host type isn't known ahead of
/// a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredHostType {
    /// A scalar `CqlValue` variant.
    Scalar,
    /// `Vec<Option<CqlValue>>` (list/set).
    List,
    /// `Vec<(CqlValue, Option<CqlValue>)>` (map).
    Map,
    /// `Vec<Option<CqlValue>>` sized to the tuple's field count.
    Tuple,
    /// `Vec<(String, Option<CqlValue>)>` keyed by declared field name.
    UserDefined,
}

pub fn preferred_host_type(ty: &ColumnType) -> PreferredHostType {
    match ty {
        ColumnType::List(_) | ColumnType::Set(_) => PreferredHostType::List,
        ColumnType::Map(_, _) => PreferredHostType::Map,
        ColumnType::Tuple(_) => PreferredHostType::Tuple,
        ColumnType::UserDefinedType { .. } => PreferredHostType::UserDefined,
        _ => PreferredHostType::Scalar,
    }
}

pub fn codec_for(ty: &ColumnType) -> Result<DynCodec, CodecError> {
    Ok(match ty {
        ColumnType::Custom(class) => new_custom(class.clone()),
        ColumnType::Ascii => Arc::new(StringCodec::ascii()),
        ColumnType::Boolean => Arc::new(BooleanCodec::new()),
        ColumnType::Blob => Arc::new(BytesCodec::blob()),
        ColumnType::Counter => Arc::new(BigIntCodec::counter()),
        ColumnType::Date => Arc::new(DateCodec::new()),
        ColumnType::Decimal => Arc::new(DecimalCodec::new()),
        ColumnType::Double => Arc::new(DoubleCodec::new()),
        ColumnType::Duration => Arc::new(DurationCodec::new()),
        ColumnType::Float => Arc::new(FloatCodec::new()),
        ColumnType::Int => Arc::new(IntCodec::new()),
        ColumnType::BigInt => Arc::new(BigIntCodec::new()),
        ColumnType::Text => Arc::new(StringCodec::text()),
        ColumnType::Timestamp => Arc::new(TimestampCodec::new()),
        ColumnType::Inet => Arc::new(InetCodec::new()),
        ColumnType::SmallInt => Arc::new(SmallIntCodec::new()),
        ColumnType::TinyInt => Arc::new(TinyIntCodec::new()),
        ColumnType::Time => Arc::new(TimeCodec::new()),
        ColumnType::Timeuuid => Arc::new(UuidCodec::timeuuid()),
        ColumnType::Uuid => Arc::new(UuidCodec::uuid()),
        ColumnType::Varint => Arc::new(VarintCodec::new()),
        ColumnType::List(item) => new_list(item)?,
        ColumnType::Set(item) => new_set(item)?,
        ColumnType::Map(key, value) => new_map(key, value)?,
        ColumnType::Tuple(fields) => new_tuple(fields)?,
        ColumnType::UserDefinedType { keyspace, name, field_names, field_types } => {
            new_user_defined(keyspace.clone(), name.clone(), field_names.clone(), field_types)?
        }
    })
}

fn build_element(ty: &ColumnType, position: &str) -> Result<DynCodec, CodecError> {
    codec_for(ty).map_err(|e| e.wrap(format!("cannot build codec for {position}")))
}

pub fn new_list(element_type: &ColumnType) -> Result<DynCodec, CodecError> {
    let element = build_element(element_type, "list element")?;
    Ok(Arc::new(CollectionCodec::list(element_type.clone(), element)))
}

pub fn new_set(element_type: &ColumnType) -> Result<DynCodec, CodecError> {
    let element = build_element(element_type, "set element")?;
    Ok(Arc::new(CollectionCodec::set(element_type.clone(), element)))
}

pub fn new_map(key_type: &ColumnType, value_type: &ColumnType) -> Result<DynCodec, CodecError> {
    let key = build_element(key_type, "map key")?;
    let value = build_element(value_type, "map value")?;
    Ok(Arc::new(MapCodec::new(key_type.clone(), value_type.clone(), key, value)))
}

pub fn new_tuple(field_types: &[ColumnType]) -> Result<DynCodec, CodecError> {
    let fields = field_types
        .iter()
        .enumerate()
        .map(|(i, ty)| build_element(ty, &format!("tuple field {i}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(TupleCodec::new(field_types.to_vec(), fields)))
}

pub fn new_user_defined(
    keyspace: String,
    name: String,
    field_names: Vec<String>,
    field_types: &[ColumnType],
) -> Result<DynCodec, CodecError> {
    let fields = field_types
        .iter()
        .zip(field_names.iter())
        .map(|(ty, field_name)| build_element(ty, &format!("field {field_name}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(UserDefinedTypeCodec::new(keyspace, name, field_names, field_types.to_vec(), fields)))
}

pub fn new_custom(class: String) -> DynCodec {
    tracing::warn!(%class, "no dedicated codec for custom type, falling back to raw bytes");
    Arc::new(BytesCodec::custom(class))
}

#[allow(dead_code)]
fn _assert_codec_object_safe(_: &dyn Codec) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Null;
    use crate::version::ProtocolVersion;

    #[test]
    fn builds_nested_list_of_set_codec() {
        let ty = ColumnType::List(Box::new(ColumnType::Set(Box::new(ColumnType::Text))));
        let codec = codec_for(&ty).unwrap();
        assert_eq!(codec.data_type(), &ty);
    }

    #[test]
    fn preferred_host_type_matches_shape() {
        assert_eq!(
            preferred_host_type(&ColumnType::List(Box::new(ColumnType::Int))),
            PreferredHostType::List
        );
        assert_eq!(preferred_host_type(&ColumnType::Int), PreferredHostType::Scalar);
    }

    #[test]
    fn null_list_encodes_to_empty_bytes() {
        let ty = ColumnType::List(Box::new(ColumnType::Int));
        let codec = codec_for(&ty).unwrap();
        let bytes = codec.encode(&Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
    }
}
