//! User-defined type codec: like tuple, a fixed number of
//! length-prefixed fields with no outer count, but fields are also
//! addressable by their declared name (case-insensitively) rather than only
//! by position.

use crate::access::{RecordExtract, RecordInject, SequenceExtract};
use crate::column_type::ColumnType;
use crate::convert::{Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::primitive as io;
use crate::value::CqlValue;
use crate::version::ProtocolVersion;

use super::cqlvalue::{as_encodable, decode_as_cqlvalue};
use super::{check_supported, Codec, DynCodec};

#[derive(Debug)]
pub struct UserDefinedTypeCodec {
    ty: ColumnType,
    fields: Vec<DynCodec>,
}

impl UserDefinedTypeCodec {
    pub fn new(
        keyspace: String,
        name: String,
        field_names: Vec<String>,
        field_types: Vec<ColumnType>,
        fields: Vec<DynCodec>,
    ) -> Self {
        Self {
            ty: ColumnType::UserDefinedType {
                keyspace,
                name,
                field_names,
                field_types,
            },
            fields,
        }
    }

    fn field_names(&self) -> &[String] {
        match &self.ty {
            ColumnType::UserDefinedType { field_names, .. } => field_names,
            _ => unreachable!("UserDefinedTypeCodec always holds UserDefinedType"),
        }
    }

    fn field_types(&self) -> &[ColumnType] {
        match &self.ty {
            ColumnType::UserDefinedType { field_types, .. } => field_types,
            _ => unreachable!("UserDefinedTypeCodec always holds UserDefinedType"),
        }
    }

    fn encode_fields<'a>(
        &self,
        values: impl Iterator<Item = &'a dyn Encodable>,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        for (i, (codec, value)) in self.fields.iter().zip(values).enumerate() {
            let encoded = codec
                .encode(value, version)
                .map_err(|e| e.wrap(format!("cannot encode field {i} ({})", self.field_names()[i])))?;
            io::write_bytes(&mut buf, if encoded.is_empty() { None } else { Some(&encoded) });
        }
        Ok(buf)
    }

    /// Preferred `CqlValue` shape: `(field name, value)` pairs, in any
    /// order. Looks each declared field up by name (case-insensitively, per
    /// `RecordExtract::field_by_name`); a declared field with no matching
    /// key in `fields` encodes as NULL rather than failing.
    fn encode_cqlvalue_fields(
        &self,
        fields: &[(String, Option<CqlValue>)],
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        let mut ordered: Vec<&Option<CqlValue>> = Vec::with_capacity(self.fields.len());
        for declared_name in self.field_names() {
            let found = fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(declared_name))
                .map(|(_, value)| value)
                .unwrap_or(&None);
            ordered.push(found);
        }
        self.encode_fields(
            ordered.into_iter().map(|item| match item {
                None => item as &dyn Encodable,
                Some(value) => as_encodable(value),
            }),
            version,
        )
    }

    /// Sequence-shaped (positional) `CqlValue` source: index `i` maps to
    /// declared field `i`. Fails when the source has fewer elements than
    /// declared fields; excess elements are silently ignored.
    fn encode_positional_cqlvalue_fields(
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

    /// Generic typed path: a `cql_record!`-declared struct (or any
    /// `RecordExtract` impl) whose field names resolve against this UDT's
    /// declared field names.
    pub fn encode_typed<R: RecordExtract>(
        &self,
        source: &R,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        let mut ordered = Vec::with_capacity(self.fields.len());
        for declared_name in self.field_names() {
            let (_, value) = source
                .field_by_name(declared_name)
                .ok_or_else(|| CodecErrorKind::NoAccessibleField {
                    field: declared_name.clone(),
                })?;
            ordered.push(value);
        }
        self.encode_fields(ordered.into_iter(), version)
    }

    /// Sequence-shaped (positional) generic typed path: index `i` maps to
    /// declared field `i`. Fails when the source has fewer elements than
    /// declared fields; excess elements are silently ignored.
    pub fn encode_typed_positional<S>(&self, source: &S, version: ProtocolVersion) -> Result<Vec<u8>, CodecError>
    where
        S: SequenceExtract,
        S::Item: Encodable,
    {
        check_supported(&self.ty, version)?;
        let len = source.size().ok_or(CodecErrorKind::WrongElementType {
            expected: format!("at least {} field(s)", self.fields.len()),
            got: "a source with unknown length".to_owned(),
        })?;
        if len < self.fields.len() {
            return Err(CodecErrorKind::WrongElementType {
                expected: format!("at least {} field(s)", self.fields.len()),
                got: format!("{len} field(s)"),
            }
            .into());
        }
        self.encode_fields(
            (0..self.fields.len()).map(|i| source.element(i).expect("index within reported size") as &dyn Encodable),
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
        let mut rest = bytes;
        for (i, codec) in self.fields.iter().enumerate() {
            let (next, body) = io::read_bytes(rest)?;
            rest = next;
            let declared_name = &self.field_names()[i];
            let (_, slot) = destination
                .field_mut_by_name(declared_name)
                .ok_or_else(|| CodecErrorKind::NoAccessibleField {
                    field: declared_name.clone(),
                })?;
            codec
                .decode(body.unwrap_or(&[]), slot, version)
                .map_err(|e| e.wrap(format!("cannot decode field {i} ({declared_name})")))?;
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        Ok(false)
    }
}

impl Codec for UserDefinedTypeCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        let any = source.as_any();
        if any.downcast_ref::<crate::convert::Null>().is_some() {
            return Ok(Vec::new());
        }
        if let Some(opt) = any.downcast_ref::<Option<Vec<(String, Option<CqlValue>)>>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(fields) => self.encode_cqlvalue_fields(fields, version),
            };
        }
        if let Some(fields) = any.downcast_ref::<Vec<(String, Option<CqlValue>)>>() {
            return self.encode_cqlvalue_fields(fields, version);
        }
        if let Some(opt) = any.downcast_ref::<Option<Vec<Option<CqlValue>>>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(fields) => self.encode_positional_cqlvalue_fields(fields, version),
            };
        }
        if let Some(fields) = any.downcast_ref::<Vec<Option<CqlValue>>>() {
            return self.encode_positional_cqlvalue_fields(fields, version);
        }
        if let Some(opt) = any.downcast_ref::<Option<CqlValue>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(CqlValue::UserDefinedType { fields, .. }) => self.encode_cqlvalue_fields(fields, version),
                Some(other) => Err(CodecErrorKind::WrongDataType {
                    expected: self.ty.short_name(),
                    got: format!("{other:?}"),
                }
                .into()),
            };
        }
        if let Some(CqlValue::UserDefinedType { fields, .. }) = any.downcast_ref::<CqlValue>() {
            return self.encode_cqlvalue_fields(fields, version);
        }
        Err(CodecErrorKind::SourceTypeNotSupported { type_name: "user-defined type source" }.into())
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
            if let Some(slot) = destination
                .as_any_mut()
                .downcast_mut::<Vec<(String, Option<CqlValue>)>>()
            {
                slot.clear();
            }
            if let Some(slot) = destination
                .as_any_mut()
                .downcast_mut::<Option<Vec<(String, Option<CqlValue>)>>>()
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
            values.push((self.field_names()[i].clone(), decoded));
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Vec<(String, Option<CqlValue>)>>()
        {
            *slot = values;
            return Ok(false);
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Option<Vec<(String, Option<CqlValue>)>>>()
        {
            *slot = Some(values);
            return Ok(false);
        }
        Err(CodecErrorKind::DestinationTypeNotSupported {
            type_name: "user-defined type destination",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{BooleanCodec, IntCodec};
    use crate::cql_record;
    use std::sync::Arc;

    cql_record! {
        #[derive(Debug, Default, PartialEq)]
        struct Address {
            f1: i32,
            f2: bool,
        }
    }

    fn udt_f1_f2() -> UserDefinedTypeCodec {
        UserDefinedTypeCodec::new(
            "ks".to_owned(),
            "address".to_owned(),
            vec!["f1".to_owned(), "f2".to_owned()],
            vec![ColumnType::Int, ColumnType::Boolean],
            vec![Arc::new(IntCodec::new()), Arc::new(BooleanCodec::new())],
        )
    }

    #[test]
    fn record_round_trips_scenario_6() {
        let codec = udt_f1_f2();
        let source = Address { f1: 123, f2: false };
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest = Address::default();
        let was_null = codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(!was_null);
        assert_eq!(dest, source);
    }

    #[test]
    fn null_udt_round_trips_to_empty_bytes() {
        let codec = udt_f1_f2();
        let bytes = codec.encode(&crate::convert::Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
        let mut dest: Vec<(String, Option<CqlValue>)> = Vec::new();
        assert!(codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    }

    #[test]
    fn record_shaped_missing_field_is_rejected() {
        let codec = udt_f1_f2();
        cql_record! {
            #[derive(Debug, Default)]
            struct OnlyF1 {
                f1: i32,
            }
        }
        let source = OnlyF1 { f1: 1 };
        assert!(codec.encode_typed(&source, ProtocolVersion::V3).is_err());
    }

    #[test]
    fn mapping_shaped_missing_field_encodes_as_null() {
        let codec = udt_f1_f2();
        let source: Vec<(String, Option<CqlValue>)> = vec![("f1".to_owned(), Some(CqlValue::Int(1)))];
        let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
        let mut dest: Vec<(String, Option<CqlValue>)> = Vec::new();
        codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(
            dest,
            vec![
                ("f1".to_owned(), Some(CqlValue::Int(1))),
                ("f2".to_owned(), None),
            ]
        );
    }

    #[test]
    fn positional_source_maps_index_to_declared_field() {
        let codec = udt_f1_f2();
        let source: Vec<Option<CqlValue>> = vec![Some(CqlValue::Int(1)), Some(CqlValue::Boolean(true))];
        let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
        let mut dest: Vec<(String, Option<CqlValue>)> = Vec::new();
        codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(
            dest,
            vec![
                ("f1".to_owned(), Some(CqlValue::Int(1))),
                ("f2".to_owned(), Some(CqlValue::Boolean(true))),
            ]
        );
    }

    #[test]
    fn excess_positional_elements_are_silently_ignored() {
        let codec = udt_f1_f2();
        let source: Vec<Option<CqlValue>> =
            vec![Some(CqlValue::Int(1)), Some(CqlValue::Boolean(true)), Some(CqlValue::Int(99))];
        let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
        let mut dest: Vec<(String, Option<CqlValue>)> = Vec::new();
        codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(
            dest,
            vec![
                ("f1".to_owned(), Some(CqlValue::Int(1))),
                ("f2".to_owned(), Some(CqlValue::Boolean(true))),
            ]
        );
    }

    #[test]
    fn too_few_positional_elements_is_rejected() {
        let codec = udt_f1_f2();
        let source: Vec<Option<CqlValue>> = vec![Some(CqlValue::Int(1))];
        assert!(codec.encode(&source, ProtocolVersion::V4).is_err());
    }

    #[test]
    fn udt_requires_v3() {
        let codec = udt_f1_f2();
        let source = Address { f1: 1, f2: true };
        assert!(codec.encode_typed(&source, ProtocolVersion::LegacyV2).is_err());
        assert!(codec.encode_typed(&source, ProtocolVersion::V3).is_ok());
    }
}
