//! List/set codec: a `<size>` prefix followed by that many
//! length-prefixed elements. List and set share a wire shape and differ only
//! in their `data_type()`.

use crate::access::{SequenceExtract, SequenceInject};
use crate::column_type::ColumnType;
use crate::convert::{Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::primitive as io;
use crate::value::CqlValue;
use crate::version::ProtocolVersion;

use super::cqlvalue::{as_encodable, decode_as_cqlvalue};
use super::{check_supported, Codec, DynCodec};

#[derive(Debug)]
pub struct CollectionCodec {
    ty: ColumnType,
    element: DynCodec,
}

impl CollectionCodec {
    pub fn list(element_type: ColumnType, element: DynCodec) -> Self {
        Self {
            ty: ColumnType::List(Box::new(element_type)),
            element,
        }
    }

    pub fn set(element_type: ColumnType, element: DynCodec) -> Self {
        Self {
            ty: ColumnType::Set(Box::new(element_type)),
            element,
        }
    }

    fn element_type(&self) -> &ColumnType {
        match &self.ty {
            ColumnType::List(item) | ColumnType::Set(item) => item,
            _ => unreachable!("CollectionCodec always holds List or Set"),
        }
    }

    fn as_items(value: &CqlValue) -> Option<&Vec<Option<CqlValue>>> {
        match value {
            CqlValue::List(items) | CqlValue::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Encodes a `<size><element>*` body from an already-resolved item list.
    fn encode_items<'a>(
        &self,
        items: impl ExactSizeIterator<Item = &'a dyn Encodable>,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, CodecError> {
        let four_byte = version.four_byte_collection_length();
        let mut buf = Vec::new();
        io::write_collection_size(&mut buf, items.len(), four_byte)?;
        for (i, item) in items.enumerate() {
            let encoded = self
                .element
                .encode(item, version)
                .map_err(|e| e.wrap(format!("cannot encode element {i}")))?;
            io::write_bytes(&mut buf, if encoded.is_empty() { None } else { Some(&encoded) });
        }
        Ok(buf)
    }

    /// Generic typed path: any host sequence whose `Item` the
    /// element codec accepts, e.g. `Vec<i32>` for `list<int>` or
    /// `Vec<Vec<String>>` for `list<set<varchar>>`.
    pub fn encode_typed<S>(&self, source: &S, version: ProtocolVersion) -> Result<Vec<u8>, CodecError>
    where
        S: SequenceExtract,
        S::Item: Encodable,
    {
        check_supported(&self.ty, version)?;
        let count = source.size().ok_or(CodecErrorKind::SourceTypeNotSupported {
            type_name: "unbounded sequence",
        })?;
        self.encode_items(
            (0..count).map(|i| {
                source
                    .element(i)
                    .map(|v| v as &dyn Encodable)
                    .expect("index within reported size")
            }),
            version,
        )
    }

    pub fn decode_typed<S>(
        &self,
        bytes: &[u8],
        destination: &mut S,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError>
    where
        S: SequenceInject,
        S::Item: Decodable + Default,
    {
        check_supported(&self.ty, version)?;
        if bytes.is_empty() {
            destination.resize(0)?;
            return Ok(true);
        }
        let four_byte = version.four_byte_collection_length();
        let (mut rest, count) = io::read_collection_size(bytes, four_byte)?;
        destination.resize(count as usize)?;
        for i in 0..count as usize {
            let (next, body) = io::read_bytes(rest)?;
            rest = next;
            let slot = destination.element_mut(i)?;
            *slot = S::Item::default();
            self.element
                .decode(body.unwrap_or(&[]), slot, version)
                .map_err(|e| e.wrap(format!("cannot decode element {i}")))?;
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        Ok(false)
    }
}

impl Codec for CollectionCodec {
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
                Some(items) => self.encode_items(items.iter().map(as_encodable_opt), version),
            };
        }
        if let Some(items) = any.downcast_ref::<Vec<Option<CqlValue>>>() {
            return self.encode_items(items.iter().map(as_encodable_opt), version);
        }
        if let Some(opt) = any.downcast_ref::<Option<CqlValue>>() {
            return match opt {
                None => Ok(Vec::new()),
                Some(value) => match Self::as_items(value) {
                    Some(items) => self.encode_items(items.iter().map(as_encodable_opt), version),
                    None => Err(CodecErrorKind::WrongDataType {
                        expected: self.ty.short_name(),
                        got: format!("{value:?}"),
                    }
                    .into()),
                },
            };
        }
        if let Some(value) = any.downcast_ref::<CqlValue>() {
            return match Self::as_items(value) {
                Some(items) => self.encode_items(items.iter().map(as_encodable_opt), version),
                None => Err(CodecErrorKind::WrongDataType {
                    expected: self.ty.short_name(),
                    got: format!("{value:?}"),
                }
                .into()),
            };
        }
        Err(CodecErrorKind::SourceTypeNotSupported {
            type_name: "collection source",
        }
        .into())
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
        let four_byte = version.four_byte_collection_length();
        let (mut rest, count) = io::read_collection_size(bytes, four_byte)?;
        let mut items = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let (next, body) = io::read_bytes(rest)?;
            rest = next;
            let decoded = decode_as_cqlvalue(self.element.as_ref(), self.element_type(), body.unwrap_or(&[]), version)
                .map_err(|e| e.wrap(format!("cannot decode element {i}")))?;
            items.push(decoded);
        }
        if !rest.is_empty() {
            tracing::warn!(remaining = rest.len(), "bytes left over after decoding");
            return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
        }
        if let Some(slot) = destination.as_any_mut().downcast_mut::<Vec<Option<CqlValue>>>() {
            *slot = items;
            return Ok(false);
        }
        if let Some(slot) = destination
            .as_any_mut()
            .downcast_mut::<Option<Vec<Option<CqlValue>>>>()
        {
            *slot = Some(items);
            return Ok(false);
        }
        Err(CodecErrorKind::DestinationTypeNotSupported {
            type_name: "collection destination",
        }
        .into())
    }
}

fn as_encodable_opt(item: &Option<CqlValue>) -> &dyn Encodable {
    match item {
        None => item as &dyn Encodable,
        Some(value) => as_encodable(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{IntCodec, StringCodec};
    use std::sync::Arc;

    fn list_int() -> CollectionCodec {
        CollectionCodec::list(ColumnType::Int, Arc::new(IntCodec::new()))
    }

    #[test]
    fn typed_round_trip_list_of_int() {
        let codec = list_int();
        let source = vec![1i32, 2, 3];
        let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        assert_eq!(
            bytes,
            vec![0x00, 0x00, 0x00, 0x03, 0, 0, 0, 4, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 3]
        );
        let mut dest: Vec<i32> = Vec::new();
        let was_null = codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(!was_null);
        assert_eq!(dest, vec![1, 2, 3]);
    }

    #[test]
    fn legacy_size_prefix_is_two_bytes() {
        let codec = list_int();
        let bytes = codec.encode_typed(&vec![7i32], ProtocolVersion::LegacyV2).unwrap();
        assert_eq!(&bytes[..2], &[0x00, 0x01]);
    }

    #[test]
    fn null_source_round_trips_to_empty_bytes() {
        let codec = list_int();
        let bytes = codec.encode(&crate::convert::Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
        let mut dest: Vec<Option<CqlValue>> = Vec::new();
        let was_null = codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(was_null);
    }

    #[test]
    fn nested_list_of_set_round_trips_through_rust_vecs() {
        let set_codec: DynCodec = Arc::new(CollectionCodec::set(ColumnType::Text, Arc::new(StringCodec::text())));
        let list_codec = CollectionCodec::list(
            ColumnType::Set(Box::new(ColumnType::Text)),
            set_codec,
        );
        let source: Vec<Vec<String>> = vec![
            vec!["abc".to_owned()],
            vec!["def".to_owned()],
        ];
        let bytes = list_codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
        let mut dest: Vec<Vec<String>> = Vec::new();
        list_codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest, source);
    }

    #[test]
    fn trailing_byte_after_last_element_is_rejected() {
        let codec = list_int();
        let mut bytes = codec.encode_typed(&vec![1i32], ProtocolVersion::V4).unwrap();
        bytes.push(0xff);
        let mut dest: Vec<i32> = Vec::new();
        assert!(codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).is_err());
    }

    #[test]
    fn element_null_propagates_through_cqlvalue_decode() {
        let codec = CollectionCodec::list(ColumnType::Int, Arc::new(IntCodec::new()));
        let mut buf = Vec::new();
        io::write_collection_size(&mut buf, 1, true).unwrap();
        io::write_bytes(&mut buf, None);
        let mut dest: Vec<Option<CqlValue>> = Vec::new();
        codec.decode(&buf, &mut dest, ProtocolVersion::V4).unwrap();
        assert_eq!(dest, vec![None]);
    }
}
