//! Tuple codec: a fixed number of length-prefixed fields, no
//! outer count (the field count comes from the type descriptor, not the
//! wire). Shares the record shape with the UDT codec, so a literal Rust
//! tuple `(123, true, "abc")` works as a source via
//! `access::record::impl_record_for_tuple!`.

use crate::access::{RecordExtract, RecordInject};
use crate::column_type::ColumnType;
use crate::convert::{Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::primitive as io;
use crate::value::CqlValue;
use crate::version::ProtocolVersion;

use super::cqlvalue::{as_encodable, decode_as_cqlvalue};
use super::{check_supported, Codec, DynCodec};

#[derive(Debug)]
pub struct TupleCodec {
    ty: ColumnType,
    fields: Vec<DynCodec>,
}

impl TupleCodec {
    pub fn new(field_types: Vec<ColumnType>, fields: Vec<DynCodec>) -> Self {
        Self {
            ty: ColumnType::Tuple(field_types),
            fields,
        }
    }

    fn field_types(&self) -> &[ColumnType] {
        match &self.ty {
            ColumnType::Tuple(types) => types,
            _ => unreachable!("TupleCodec always holds Tuple"),
        }
    }

    /// No outer size prefix - just each field's length-prefixed body, in
    /// declaration order.
    fn encode_fields<'a>(
        &self,
        values: impl Iterator<Item = &'a dyn Encodable>,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        for (i, (codec, value)) in self.fields.iter().zip(values).enumerate() {
            let encoded = codec
                .encode(value, version)
                .map_err(|e| e.wrap(format!("cannot encode field {i}")))?;
            io::write_bytes(&mut buf, if encoded.is_empty() { None } else { Some(&encoded) });
        }
        Ok(buf)
    }

    /// Fails when the source has fewer elements than declared fields;
    /// excess elements are silently ignored.
    fn encode_cqlvalue_fields(
        &self,
        fields: &[Option<CqlValue>],
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        if fields.len() < self.fields.len() {
            return Err(CodecErrorKind::WrongElementType {
                expected: format!("at least {} field(s)", self.fields.len()),
                got: format!("{} field(s)", fields.len()),
            }
            .into());
        }
        self.encode_fields(
            fields[..self.fields.len()].iter().map(|item| match item {
                None => item as &dyn Encodable,
                Some(value) => as_encodable(value),
            }),
            version,
        )
    }

    /// Generic typed path: any record-shaped source, including a native Rust
    /// tuple of arity 1-8 or a `cql_record!`-declared struct used
    /// positionally. Fails when the source has fewer elements than declared
    /// fields; excess elements are silently ignored.
    pub fn encode_typed<R: RecordExtract>(
        &self,
        source: &R,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        if source.field_count() < self.fields.len() {
            return Err(CodecErrorKind::WrongElementType {
                expected: format!("at least {} field(s)", self.fields.len()),
                got: format!("{} field(s)", source.field_count()),
            }
            .into());
        }
        self.encode_fields(
            (0..self.fields.len()).map(|i| {
                source
                    .field_by_index(i)
                    .expect("index within reported field_count")
            }),
            version,
        )
    }

    pub fn decode_typed<R: RecordInject>(
        &self,
        bytes: &[u8],
        destination: &mut R,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        check_supported(&self.ty, version)?;
        if bytes.is_empty() {
            return Ok(true);
        }
        if destination.field_count() != self.fields.len() {
            return Err(CodecErrorKind::WrongElementType {
                expected: format!("{} field(s)", self.fields.len()),
                got: format!("{} field(s)", destination.field_count()),
            }
            .into());
        }
        let mut rest = bytes;
        for (i, codec) in self.fields.iter().enumerate() {
            let (next, body) = io::read_bytes(rest)?;
            rest = next;
            let slot = destination
                .field_mut_by_index(i)
                .ok_or(CodecErrorKind::IndexOutOfRange { index: i })?;
            codec
                .decode(body.unwrap_or(&[]), slot, version)
                .map_err(|e| e.wrap(format!("cannot decode field {i}")))?;
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        Ok(false)
    }
}

impl Codec for TupleCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        let any = source.as_any();
        if any.downcast_ref::<crate::convert::Null>().is_some() {
            return Ok(Vec::new());
        }
        if let Some(opt) = any.downcast_ref::<Option<Vec<Option<CqlValue>>>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(fields) => self.encode_cqlvalue_fields(fields, version),
            };
        }
        if let Some(fields) = any.downcast_ref::<Vec<Option<CqlValue>>>() {
            return self.encode_cqlvalue_fields(fields, version);
        }
        if let Some(opt) = any.downcast_ref::<Option<CqlValue>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(CqlValue::Tuple(fields)) => self.encode_cqlvalue_fields(fields, version),
                Some(other) => Err(CodecErrorKind::WrongDataType {
                    expected: self.ty.short_name(),
                    got: format!("{other:?}"),
                }
                .into()),
            };
        }
        if let Some(CqlValue::Tuple(fields)) = any.downcast_ref::<CqlValue>() {
            return self.encode_cqlvalue_fields(fields, version);
        }
        Err(CodecErrorKind::SourceTypeNotSupported { type_name: "tuple source" }.into())
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        check_supported(&self.ty, version)?;
        let was_null = bytes.is_empty();
        if was_null {
            if let Some(slot) = destination.as_any_mut().downcast_mut::<Vec<Option<CqlValue>>>() {
                slot.clear();
            }
            if let Some(slot) = destination
                .as_any_mut()
                .downcast_mut::<Option<Vec<Option<CqlValue>>>>()
            {
                *slot = None;
            }
            return Ok(true);
        }
        let mut rest = bytes;
        let mut values = Vec::with_capacity(self.fields.len());
        for (i, (field_codec, field_type)) in self.fields.iter().zip(self.field_types()).enumerate() {
            let (next, body) = io::read_bytes(rest)?;
            rest = next;
            let decoded = decode_as_cqlvalue(field_codec.as_ref(), field_type, body.unwrap_or(&[]), version)
                .map_err(|e| e.wrap(format!("cannot decode field {i}")))?;
            values.push(decoded);
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        if let Some(slot) = destination.as_any_mut().downcast_mut::<Vec<Option<CqlValue>>>() {
            *slot = values;
            return Ok(false);
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Option<Vec<Option<CqlValue>>>>()
        {
            *slot = Some(values);
            return Ok(false);
        }
        Err(CodecErrorKind::DestinationTypeNotSupported { type_name: "tuple destination" }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{BooleanCodec, IntCodec, StringCodec};
    use std::sync::Arc;

    fn tuple_int_bool_text() -> TupleCodec {
        TupleCodec::new(
            vec![ColumnType::Int, ColumnType::Boolean, ColumnType::Text],
            vec![
                Arc::new(IntCodec::new()),
                Arc::new(BooleanCodec::new()),
                Arc::new(StringCodec::text()),
            ],
        )
    }

    #[test]
    fn native_tuple_round_trips_scenario_5() {
        let codec = tuple_int_bool_text();
        let source = (123i32, true, "abc".to_owned());
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest: (i32, bool, String) = (0, false, String::new());
        let was_null = codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(!was_null);
        assert_eq!(dest, source);
    }

    #[test]
    fn tuple_has_no_outer_size_prefix() {
        let codec = TupleCodec::new(vec![ColumnType::Int], vec![Arc::new(IntCodec::new())]);
        let bytes = codec.encode_typed(&(7i32,), ProtocolVersion::V4).unwrap();
        // Exactly one length-prefixed i32 field: 4 (len) + 4 (body).
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn null_tuple_round_trips_to_empty_bytes() {
        let codec = tuple_int_bool_text();
        let bytes = codec.encode(&crate::convert::Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
        let mut dest: Vec<Option<CqlValue>> = Vec::new();
        assert!(codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        let codec = tuple_int_bool_text();
        assert!(codec.encode_typed(&(1i32,), ProtocolVersion::V4).is_err());
    }

    #[test]
    fn excess_source_fields_are_silently_ignored() {
        let codec = tuple_int_bool_text();
        let source = (123i32, true, "abc".to_owned(), "unused".to_owned());
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest: (i32, bool, String) = (0, false, String::new());
        let was_null = codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(!was_null);
        assert_eq!(dest, (123i32, true, "abc".to_owned()));
    }

    #[test]
    fn excess_cqlvalue_fields_are_silently_ignored() {
        let codec = TupleCodec::new(vec![ColumnType::Int], vec![Arc::new(IntCodec::new())]);
        let source = vec![Some(CqlValue::Int(1)), Some(CqlValue::Int(2))];
        let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
        let mut dest: Vec<Option<CqlValue>> = Vec::new();
        codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest, vec![Some(CqlValue::Int(1))]);
    }
}
