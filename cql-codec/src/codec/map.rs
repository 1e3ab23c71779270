//! Map codec: a `<size>` prefix followed by that many
//! `<key><value>` pairs, each independently length-prefixed.

use crate::access::{MappingExtract, MappingInject, RecordExtract, RecordInject};
use crate::column_type::ColumnType;
use crate::convert::{Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::primitive as io;
use crate::value::CqlValue;
use crate::version::ProtocolVersion;

use super::cqlvalue::{as_encodable, decode_as_cqlvalue};
use super::{check_supported, Codec, DynCodec};

#[derive(Debug)]
pub struct MapCodec {
    ty: ColumnType,
    key: DynCodec,
    value: DynCodec,
}

impl MapCodec {
    pub fn new(key_type: ColumnType, value_type: ColumnType, key: DynCodec, value: DynCodec) -> Self {
        Self {
            ty: ColumnType::Map(Box::new(key_type), Box::new(value_type)),
            key,
            value,
        }
    }

    fn key_value_types(&self) -> (&ColumnType, &ColumnType) {
        match &self.ty {
            ColumnType::Map(key, value) => (key, value),
            _ => unreachable!("MapCodec always holds Map"),
        }
    }

    /// Record-shaped sources/destinations route by field name, which only
    /// makes sense when the key itself is textual.
    fn require_text_key(&self) -> Result<(), CodecError> {
        match self.key.data_type() {
            ColumnType::Text | ColumnType::Ascii => Ok(()),
            other => Err(CodecErrorKind::WrongDataType {
                expected: "text or ascii map key".to_owned(),
                got: other.short_name(),
            }
            .into()),
        }
    }

    fn encode_pairs<'a>(
        &self,
        pairs: impl ExactSizeIterator<Item = (&'a dyn Encodable, &'a dyn Encodable)>,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        let four_byte = version.four_byte_collection_length();
        let mut buf = Vec::new();
        io::write_collection_size(&mut buf, pairs.len(), four_byte)?;
        for (i, (key, value)) in pairs.enumerate() {
            let key_bytes = self
                .key
                .encode(key, version)
                .map_err(|e| e.wrap(format!("cannot encode key {i}")))?;
            io::write_bytes(&mut buf, if key_bytes.is_empty() { None } else { Some(&key_bytes) });
            let value_bytes = self
                .value
                .encode(value, version)
                .map_err(|e| e.wrap(format!("cannot encode value {i}")))?;
            io::write_bytes(
                &mut buf,
                if value_bytes.is_empty() { None } else { Some(&value_bytes) },
            );
        }
        Ok(buf)
    }

    /// Generic typed path: any host mapping whose `Key`/`Value` the key/value
    /// codecs accept, e.g. `IndexMap<String, i32>`.
    pub fn encode_typed<M>(&self, source: &M, version: ProtocolVersion) -> Result<Vec<u8>, CodecError>
    where
        M: MappingExtract,
        M::Key: Encodable,
        M::Value: Encodable,
    {
        check_supported(&self.ty, version)?;
        let count = source.len();
        self.encode_pairs(
            (0..count).map(|i| {
                let (k, v) = source.entry(i).expect("index within reported length");
                (k as &dyn Encodable, v as &dyn Encodable)
            }),
            version,
        )
    }

    /// Record-shaped source: the declared field names become keys. Only
    /// valid when the key codec's CQL type is `text`/`varchar` or `ascii`.
    pub fn encode_typed_record<R: RecordExtract>(&self, source: &R, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        self.require_text_key()?;
        let names: Vec<String> = (0..source.field_count())
            .map(|i| {
                source
                    .field_name(i)
                    .map(str::to_owned)
                    .unwrap_or_else(|| i.to_string())
            })
            .collect();
        self.encode_pairs(
            names.iter().enumerate().map(|(i, name)| {
                let value = source
                    .field_by_index(i)
                    .expect("index within reported field_count");
                (name as &dyn Encodable, value)
            }),
            version,
        )
    }

    pub fn decode_typed<M>(
        &self,
        bytes: &[u8],
        destination: &mut M,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError>
    where
        M: MappingInject,
        M::Key: Decodable + Default,
        M::Value: Decodable + Default,
    {
        check_supported(&self.ty, version)?;
        if bytes.is_empty() {
            return Ok(true);
        }
        let four_byte = version.four_byte_collection_length();
        let (mut rest, count) = io::read_collection_size(bytes, four_byte)?;
        destination.reserve(count as usize);
        for i in 0..count as usize {
            let (next, key_body) = io::read_bytes(rest)?;
            rest = next;
            let (next, value_body) = io::read_bytes(rest)?;
            rest = next;
            let mut key = M::Key::default();
            self.key
                .decode(key_body.unwrap_or(&[]), &mut key, version)
                .map_err(|e| e.wrap(format!("cannot decode key {i}")))?;
            let mut value = M::Value::default();
            self.value
                .decode(value_body.unwrap_or(&[]), &mut value, version)
                .map_err(|e| e.wrap(format!("cannot decode value {i}")))?;
            destination.insert(key, value);
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        Ok(false)
    }

    /// Record-shaped destination: each decoded key is routed to the
    /// destination field of the same name. Only valid when the key codec's
    /// CQL type is `text`/`varchar` or `ascii`.
    pub fn decode_typed_record<R: RecordInject>(
        &self,
        bytes: &[u8],
        destination: &mut R,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        check_supported(&self.ty, version)?;
        self.require_text_key()?;
        if bytes.is_empty() {
            return Ok(true);
        }
        let four_byte = version.four_byte_collection_length();
        let (mut rest, count) = io::read_collection_size(bytes, four_byte)?;
        for i in 0..count as usize {
            let (next, key_body) = io::read_bytes(rest)?;
            rest = next;
            let (next, value_body) = io::read_bytes(rest)?;
            rest = next;
            let mut key = String::new();
            self.key
                .decode(key_body.unwrap_or(&[]), &mut key, version)
                .map_err(|e| e.wrap(format!("cannot decode key {i}")))?;
            let (_, slot) = destination
                .field_mut_by_name(&key)
                .ok_or_else(|| CodecErrorKind::NoAccessibleField { field: key.clone() })?;
            self.value
                .decode(value_body.unwrap_or(&[]), slot, version)
                .map_err(|e| e.wrap(format!("cannot decode value {i} ({key})")))?;
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        Ok(false)
    }
}

impl Codec for MapCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        check_supported(&self.ty, version)?;
        let any = source.as_any();
        if any.downcast_ref::<crate::convert::Null>().is_some() {
            return Ok(Vec::new());
        }
        if let Some(opt) = any.downcast_ref::<Option<Vec<(CqlValue, Option<CqlValue>)>>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(pairs) => self.encode_pairs(pairs_as_encodable(pairs), version),
            };
        }
        if let Some(pairs) = any.downcast_ref::<Vec<(CqlValue, Option<CqlValue>)>>() {
            return self.encode_pairs(pairs_as_encodable(pairs), version);
        }
        if let Some(opt) = any.downcast_ref::<Option<CqlValue>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(CqlValue::Map(pairs)) => self.encode_pairs(pairs_as_encodable(pairs), version),
                Some(other) => Err(CodecErrorKind::WrongDataType {
                    expected: self.ty.short_name(),
                    got: format!("{other:?}"),
                }
                .into()),
            };
        }
        if let Some(CqlValue::Map(pairs)) = any.downcast_ref::<CqlValue>() {
            return self.encode_pairs(pairs_as_encodable(pairs), version);
        }
        Err(CodecErrorKind::SourceTypeNotSupported { type_name: "map source" }.into())
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
                .downcast_mut::<Vec<(CqlValue, Option<CqlValue>)>>()
            {
                slot.clear();
            }
            if let Some(slot) = destination
                .as_any_mut()
                .downcast_mut::<Option<Vec<(CqlValue, Option<CqlValue>)>>>()
            {
                *slot = None;
            }
            return Ok(true);
        }
        let (key_type, value_type) = self.key_value_types();
        let four_byte = version.four_byte_collection_length();
        let (mut rest, count) = io::read_collection_size(bytes, four_byte)?;
        let mut pairs = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let (next, key_body) = io::read_bytes(rest)?;
            rest = next;
            let (next, value_body) = io::read_bytes(rest)?;
            rest = next;
            let key = decode_as_cqlvalue(self.key.as_ref(), key_type, key_body.unwrap_or(&[]), version)
                .map_err(|e| e.wrap(format!("cannot decode key {i}")))?
                .ok_or(CodecErrorKind::NilDestination)?;
            let value = decode_as_cqlvalue(self.value.as_ref(), value_type, value_body.unwrap_or(&[]), version)
                .map_err(|e| e.wrap(format!("cannot decode value {i}")))?;
            pairs.push((key, value));
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        // Duplicate keys: last write wins, matching `MappingInject::insert`
        // for the typed path.
        let mut deduped: Vec<(CqlValue, Option<CqlValue>)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            if let Some(slot) = deduped.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                deduped.push((key, value));
            }
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Vec<(CqlValue, Option<CqlValue>)>>()
        {
            *slot = deduped;
            return Ok(false);
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Option<Vec<(CqlValue, Option<CqlValue>)>>>()
        {
            *slot = Some(deduped);
            return Ok(false);
        }
        Err(CodecErrorKind::DestinationTypeNotSupported { type_name: "map destination" }.into())
    }
}

fn pairs_as_encodable<'a>(
    pairs: &'a [(CqlValue, Option<CqlValue>)],
) -> impl ExactSizeIterator<Item = (&'a dyn Encodable, &'a dyn Encodable)> + 'a {
    pairs.iter().map(|(k, v)| {
        let key = as_encodable(k);
        let value: &dyn Encodable = match v {
            None => v as &dyn Encodable,
            Some(value) => as_encodable(value),
        };
        (key, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{IntCodec, StringCodec};
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn map_text_int() -> MapCodec {
        MapCodec::new(
            ColumnType::Text,
            ColumnType::Int,
            Arc::new(StringCodec::text()),
            Arc::new(IntCodec::new()),
        )
    }

    #[test]
    fn typed_round_trip_preserves_order() {
        let codec = map_text_int();
        let mut source: IndexMap<String, i32> = IndexMap::new();
        source.insert("b".to_owned(), 2);
        source.insert("a".to_owned(), 1);
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest: IndexMap<String, i32> = IndexMap::new();
        codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest.get_index(0), Some((&"b".to_owned(), &2)));
        assert_eq!(dest.get_index(1), Some((&"a".to_owned(), &1)));
    }

    #[test]
    fn null_map_round_trips_to_empty_bytes() {
        let codec = map_text_int();
        let bytes = codec.encode(&crate::convert::Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
        let mut dest: Vec<(CqlValue, Option<CqlValue>)> = Vec::new();
        assert!(codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    }

    #[test]
    fn duplicate_decoded_key_is_last_write_wins() {
        let codec = map_text_int();
        let mut buf = Vec::new();
        io::write_collection_size(&mut buf, 2, true).unwrap();
        io::write_bytes(&mut buf, Some(b"k".as_slice()));
        io::write_bytes(&mut buf, Some(1i32.to_be_bytes().as_slice()));
        io::write_bytes(&mut buf, Some(b"k".as_slice()));
        io::write_bytes(&mut buf, Some(2i32.to_be_bytes().as_slice()));
        let mut dest: Vec<(CqlValue, Option<CqlValue>)> = Vec::new();
        codec.decode(&buf, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest, vec![(CqlValue::Text("k".to_owned()), Some(CqlValue::Int(2)))]);
    }

    crate::cql_record! {
        #[derive(Debug, Default, PartialEq)]
        struct Scores {
            alice: i32,
            bob: i32,
        }
    }

    #[test]
    fn record_shaped_source_uses_field_names_as_keys() {
        let codec = map_text_int();
        let source = Scores { alice: 1, bob: 2 };
        let bytes = codec.encode_typed_record(&source, ProtocolVersion::V4).unwrap();
        let mut dest: IndexMap<String, i32> = IndexMap::new();
        codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest.get("alice"), Some(&1));
        assert_eq!(dest.get("bob"), Some(&2));
    }

    #[test]
    fn record_shaped_destination_routes_by_decoded_key() {
        let codec = map_text_int();
        let mut source: IndexMap<String, i32> = IndexMap::new();
        source.insert("bob".to_owned(), 9);
        source.insert("alice".to_owned(), 4);
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest = Scores::default();
        let was_null = codec.decode_typed_record(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(!was_null);
        assert_eq!(dest, Scores { alice: 4, bob: 9 });
    }

    #[test]
    fn record_shaped_source_rejected_for_non_text_key() {
        let codec = MapCodec::new(
            ColumnType::Int,
            ColumnType::Int,
            Arc::new(IntCodec::new()),
            Arc::new(IntCodec::new()),
        );
        let source = Scores { alice: 1, bob: 2 };
        assert!(codec.encode_typed_record(&source, ProtocolVersion::V4).is_err());
    }

    #[test]
    fn record_shaped_destination_rejects_unknown_key() {
        let codec = map_text_int();
        let mut source: IndexMap<String, i32> = IndexMap::new();
        source.insert("carol".to_owned(), 1);
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest = Scores::default();
        assert!(codec.decode_typed_record(&bytes, &mut dest, ProtocolVersion::V4).is_err());
    }
}
