//! One codec per primitive CQL type.

use crate::codec::{decode_primitive, encode_primitive, Codec};
use crate::column_type::ColumnType;
use crate::convert::{self, Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::primitive as io;
use crate::value::CqlDuration;
use crate::version::ProtocolVersion;

#[derive(Debug, Default)]
pub struct TinyIntCodec {
    ty: ColumnType,
}

impl TinyIntCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::TinyInt }
    }
}

impl Codec for TinyIntCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "tinyint source",
            || {
                let canonical = convert::any_to_i64(source.as_any())?;
                canonical.map(narrow_i8).transpose()
            },
            |buf, v| io::write_i8(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "tinyint destination",
            bytes,
            |input| read_exact(input, io::read_i8),
            |value| convert::i64_into_any(value.map(i64::from), destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct SmallIntCodec {
    ty: ColumnType,
}

impl SmallIntCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::SmallInt }
    }
}

impl Codec for SmallIntCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "smallint source",
            || {
                let canonical = convert::any_to_i64(source.as_any())?;
                canonical.map(narrow_i16).transpose()
            },
            |buf, v| io::write_i16(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "smallint destination",
            bytes,
            |input| read_exact(input, io::read_i16),
            |value| convert::i64_into_any(value.map(i64::from), destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct IntCodec {
    ty: ColumnType,
}

impl IntCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Int }
    }
}

impl Codec for IntCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "int source",
            || {
                let canonical = convert::any_to_i64(source.as_any())?;
                canonical.map(narrow_i32).transpose()
            },
            |buf, v| io::write_i32(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "int destination",
            bytes,
            |input| read_exact(input, io::read_i32),
            |value| convert::i64_into_any(value.map(i64::from), destination.as_any_mut()),
        )
    }
}

/// Also used as `counter`'s implementation (the singletons
/// differ only by their `data-type()` for counter").
#[derive(Debug)]
pub struct BigIntCodec {
    ty: ColumnType,
}

impl BigIntCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::BigInt }
    }

    pub fn counter() -> Self {
        Self { ty: ColumnType::Counter }
    }
}

impl Default for BigIntCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for BigIntCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "bigint source",
            || convert::any_to_i64(source.as_any()),
            |buf, v| io::write_i64(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "bigint destination",
            bytes,
            |input| read_exact(input, io::read_i64),
            |value| convert::i64_into_any(value, destination.as_any_mut()),
        )
    }
}

fn narrow_i8(v: i64) -> Result<i8, CodecError> {
    i8::try_from(v).map_err(|_| CodecErrorKind::ValueOutOfRange { value: v.to_string() }.into())
}
fn narrow_i16(v: i64) -> Result<i16, CodecError> {
    i16::try_from(v).map_err(|_| CodecErrorKind::ValueOutOfRange { value: v.to_string() }.into())
}
fn narrow_i32(v: i64) -> Result<i32, CodecError> {
    i32::try_from(v).map_err(|_| CodecErrorKind::ValueOutOfRange { value: v.to_string() }.into())
}

/// Reads a fixed-width value and requires the slice to be fully consumed -
/// primitive codecs never have trailing bytes.
fn read_exact<'a, T>(
    input: &'a [u8],
    read: impl Fn(&'a [u8]) -> Result<(&'a [u8], T), CodecError>,
) -> Result<T, CodecError> {
    let (rest, value) = read(input)?;
    if !rest.is_empty() {
        return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
    }
    Ok(value)
}

#[derive(Debug, Default)]
pub struct BooleanCodec {
    ty: ColumnType,
}

impl BooleanCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Boolean }
    }
}

impl Codec for BooleanCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "boolean source",
            || convert::any_to_bool(source.as_any()),
            |buf, v| io::write_u8(buf, if v { 0x01 } else { 0x00 }),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "boolean destination",
            bytes,
            |input| read_exact(input, io::read_u8).map(|v| v != 0x00),
            |value| convert::bool_into_any(value, destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct FloatCodec {
    ty: ColumnType,
}

impl FloatCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Float }
    }
}

impl Codec for FloatCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "float source",
            || {
                let canonical = convert::any_to_f64(source.as_any())?;
                Ok(canonical.map(|v| v as f32))
            },
            |buf, v| io::write_f32(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "float destination",
            bytes,
            |input| read_exact(input, io::read_f32),
            |value| convert::f64_into_any(value.map(f64::from), destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct DoubleCodec {
    ty: ColumnType,
}

impl DoubleCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Double }
    }
}

impl Codec for DoubleCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "double source",
            || convert::any_to_f64(source.as_any()),
            |buf, v| io::write_f64(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "double destination",
            bytes,
            |input| read_exact(input, io::read_f64),
            |value| convert::f64_into_any(value, destination.as_any_mut()),
        )
    }
}

/// Shared by `ascii`/`text` (`varchar` and `text` share one wire type) - both are
/// length-prefixed UTF-8 on the wire; only `Ascii` additionally rejects
/// non-ASCII bytes.
#[derive(Debug)]
pub struct StringCodec {
    ty: ColumnType,
    ascii_only: bool,
}

impl StringCodec {
    pub fn ascii() -> Self {
        Self { ty: ColumnType::Ascii, ascii_only: true }
    }

    pub fn text() -> Self {
        Self { ty: ColumnType::Text, ascii_only: false }
    }
}

impl Codec for StringCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "string source",
            || {
                let canonical = convert::any_to_string(source.as_any())?;
                if let Some(s) = &canonical {
                    if self.ascii_only && !s.is_ascii() {
                        return Err(CodecErrorKind::ValueOutOfRange { value: s.clone() }.into());
                    }
                }
                Ok(canonical)
            },
            |buf, v: String| buf.extend_from_slice(v.as_bytes()),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "string destination",
            bytes,
            |input| {
                let text = std::str::from_utf8(input)
                    .map_err(|_| CodecErrorKind::ParseFailed { literal: "<non-utf8>".to_owned() })?;
                Ok(text.to_owned())
            },
            |value| convert::string_into_any(value, destination.as_any_mut()),
        )
    }
}

/// Shared by `blob`/`custom`/`inet`'s raw-bytes path where no further
/// structure is imposed (inet has its own codec below for length
/// validation).
#[derive(Debug)]
pub struct BytesCodec {
    ty: ColumnType,
}

impl BytesCodec {
    pub fn blob() -> Self {
        Self { ty: ColumnType::Blob }
    }

    pub fn custom(class: String) -> Self {
        Self { ty: ColumnType::Custom(class) }
    }
}

impl Codec for BytesCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "blob source",
            || convert::any_to_bytes(source.as_any()),
            |buf, v: Vec<u8>| buf.extend_from_slice(&v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "blob destination",
            bytes,
            |input| Ok(input.to_vec()),
            |value| convert::bytes_into_any(value, destination.as_any_mut()),
        )
    }
}

#[derive(Debug)]
pub struct InetCodec {
    ty: ColumnType,
}

impl InetCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Inet }
    }
}

impl Default for InetCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for InetCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "inet source",
            || convert::any_to_inet(source.as_any()),
            |buf, v: std::net::IpAddr| match v {
                std::net::IpAddr::V4(v4) => buf.extend_from_slice(&v4.octets()),
                std::net::IpAddr::V6(v6) => buf.extend_from_slice(&v6.octets()),
            },
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "inet destination",
            bytes,
            |input| match input.len() {
                4 => {
                    let octets: [u8; 4] = input.try_into().expect("checked length");
                    Ok(std::net::IpAddr::from(octets))
                }
                16 => {
                    let octets: [u8; 16] = input.try_into().expect("checked length");
                    Ok(std::net::IpAddr::from(octets))
                }
                other => Err(CodecErrorKind::WrongFixedLength { expected: 4, got: other }.into()),
            },
            |value| convert::inet_into_any(value, destination.as_any_mut()),
        )
    }
}

/// Shared by `uuid`/`timeuuid` - identical wire shape; this crate doesn't
/// enforce TimeUUID's variant/version bits.
#[derive(Debug)]
pub struct UuidCodec {
    ty: ColumnType,
}

impl UuidCodec {
    pub fn uuid() -> Self {
        Self { ty: ColumnType::Uuid }
    }

    pub fn timeuuid() -> Self {
        Self { ty: ColumnType::Timeuuid }
    }
}

impl Codec for UuidCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "uuid source",
            || convert::any_to_uuid(source.as_any()),
            |buf, v: [u8; 16]| io::write_uuid(buf, &v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "uuid destination",
            bytes,
            |input| {
                if input.len() != 16 {
                    return Err(CodecErrorKind::WrongFixedLength { expected: 16, got: input.len() }.into());
                }
                read_exact(input, io::read_uuid)
            },
            |value| convert::uuid_into_any(value, destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct DateCodec {
    ty: ColumnType,
}

impl DateCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Date }
    }
}

impl Codec for DateCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "date source",
            || convert::any_to_date(source.as_any()),
            |buf, v| io::write_u32(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "date destination",
            bytes,
            |input| read_exact(input, io::read_u32),
            |value| convert::date_into_any(value, destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct TimeCodec {
    ty: ColumnType,
}

impl TimeCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Time }
    }
}

impl Codec for TimeCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "time source",
            || convert::any_to_time(source.as_any()),
            |buf, v| io::write_i64(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "time destination",
            bytes,
            |input| {
                let nanos = read_exact(input, io::read_i64)?;
                if !(0..86_400_000_000_000i64).contains(&nanos) {
                    return Err(CodecErrorKind::ValueOutOfRange { value: nanos.to_string() }.into());
                }
                Ok(nanos)
            },
            |value| convert::time_into_any(value, destination.as_any_mut()),
        )
    }
}

#[derive(Debug, Default)]
pub struct TimestampCodec {
    ty: ColumnType,
}

impl TimestampCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Timestamp }
    }
}

impl Codec for TimestampCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "timestamp source",
            || convert::any_to_timestamp(source.as_any()),
            |buf, v| io::write_i64(buf, v),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "timestamp destination",
            bytes,
            |input| read_exact(input, io::read_i64),
            |value| convert::timestamp_into_any(value, destination.as_any_mut()),
        )
    }
}

/// Three vints in order: months, days, nanos. The three must share sign or
/// be zero.
#[derive(Debug, Default)]
pub struct DurationCodec {
    ty: ColumnType,
}

impl DurationCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Duration }
    }
}

impl Codec for DurationCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "duration source",
            || {
                let canonical = convert::any_to_duration(source.as_any())?;
                canonical.map(check_duration_signs).transpose()
            },
            |buf, v: CqlDuration| {
                io::write_vint(buf, v.months as i64);
                io::write_vint(buf, v.days as i64);
                io::write_vint(buf, v.nanoseconds);
            },
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "duration destination",
            bytes,
            |input| {
                let (rest, months) = io::read_vint(input)?;
                let (rest, days) = io::read_vint(rest)?;
                let (rest, nanos) = io::read_vint(rest)?;
                if !rest.is_empty() {
                    return Err(CodecErrorKind::BytesRemaining { remaining: rest.len() }.into());
                }
                let months = i32::try_from(months)
                    .map_err(|_| CodecErrorKind::ValueOutOfRange { value: months.to_string() })?;
                let days = i32::try_from(days)
                    .map_err(|_| CodecErrorKind::ValueOutOfRange { value: days.to_string() })?;
                check_duration_signs(CqlDuration { months, days, nanoseconds: nanos })
            },
            |value| convert::duration_into_any(value, destination.as_any_mut()),
        )
    }
}

fn check_duration_signs(d: CqlDuration) -> Result<CqlDuration, CodecError> {
    let signs = [d.months.signum() as i64, d.days.signum() as i64, d.nanoseconds.signum()];
    let positive = signs.iter().any(|&s| s > 0);
    let negative = signs.iter().any(|&s| s < 0);
    if positive && negative {
        return Err(CodecErrorKind::ValueOutOfRange {
            value: format!("{d:?} (mixed signs)"),
        }
        .into());
    }
    Ok(d)
}

#[derive(Debug, Default)]
pub struct VarintCodec {
    ty: ColumnType,
}

impl VarintCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Varint }
    }
}

impl Codec for VarintCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "varint source",
            || convert::any_to_varint(source.as_any()),
            |buf, v: num_bigint::BigInt| buf.extend_from_slice(&v.to_signed_bytes_be()),
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "varint destination",
            bytes,
            |input| Ok(num_bigint::BigInt::from_signed_bytes_be(input)),
            |value| convert::varint_into_any(value, destination.as_any_mut()),
        )
    }
}

/// 4-byte signed scale followed by the varint unscaled value.
#[derive(Debug, Default)]
pub struct DecimalCodec {
    ty: ColumnType,
}

impl DecimalCodec {
    pub fn new() -> Self {
        Self { ty: ColumnType::Decimal }
    }
}

impl Codec for DecimalCodec {
    fn data_type(&self) -> &ColumnType {
        &self.ty
    }

    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError> {
        encode_primitive(
            &self.ty,
            version,
            "decimal source",
            || convert::any_to_decimal(source.as_any()),
            |buf, v: bigdecimal::BigDecimal| {
                let (unscaled, scale) = v.as_bigint_and_exponent();
                io::write_i32(buf, scale as i32);
                buf.extend_from_slice(&unscaled.to_signed_bytes_be());
            },
        )
    }

    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError> {
        decode_primitive(
            &self.ty,
            version,
            "decimal destination",
            bytes,
            |input| {
                let (rest, scale) = io::read_i32(input)?;
                let unscaled = num_bigint::BigInt::from_signed_bytes_be(rest);
                Ok(bigdecimal::BigDecimal::new(unscaled, scale as i64))
            },
            |value| convert::decimal_into_any(value, destination.as_any_mut()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Null;

    #[test]
    fn smallint_encodes_scenario_1() {
        let codec = SmallIntCodec::new();
        let bytes = codec.encode(&1i32, ProtocolVersion::V4).unwrap();
        assert_eq!(bytes, vec![0x00, 0x01]);
    }

    #[test]
    fn time_encodes_scenario_2() {
        let codec = TimeCodec::new();
        let nanos: i64 = 45_296_123_456_789;
        let bytes = codec.encode(&nanos, ProtocolVersion::V4).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x29, 0x32, 0x53, 0x59, 0x2d, 0x15]);
    }

    #[test]
    fn smallint_narrows_at_boundary() {
        let codec = SmallIntCodec::new();
        assert!(codec.encode(&32_768i32, ProtocolVersion::V4).is_err());
        assert!(codec.encode(&32_767i32, ProtocolVersion::V4).is_ok());
        assert!(codec.encode(&(-32_768i32), ProtocolVersion::V4).is_ok());
    }

    #[test]
    fn smallint_rejected_before_v4() {
        let codec = SmallIntCodec::new();
        assert!(codec.encode(&1i32, ProtocolVersion::V3).is_err());
    }

    #[test]
    fn null_source_round_trips_to_empty_bytes() {
        let codec = IntCodec::new();
        let bytes = codec.encode(&Null, ProtocolVersion::V4).unwrap();
        assert!(bytes.is_empty());
        let mut dest: i32 = 7;
        let was_null = codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
        assert!(was_null);
        assert_eq!(dest, 0);
    }

    #[test]
    fn duration_rejects_mixed_signs() {
        let codec = DurationCodec::new();
        let bad = CqlDuration { months: 1, days: -1, nanoseconds: 0 };
        assert!(codec.encode(&bad, ProtocolVersion::V5).is_err());
        let ok = CqlDuration { months: 1, days: 1, nanoseconds: 0 };
        assert!(codec.encode(&ok, ProtocolVersion::V5).is_ok());
    }

    #[test]
    fn uuid_rejects_wrong_lengths() {
        let codec = UuidCodec::uuid();
        let mut dest = uuid::Uuid::nil();
        assert!(codec.decode(&[0u8; 15], &mut dest, ProtocolVersion::V4).is_err());
        assert!(codec.decode(&[0u8; 17], &mut dest, ProtocolVersion::V4).is_err());
        assert!(codec.decode(&[0u8; 16], &mut dest, ProtocolVersion::V4).is_ok());
    }

    #[test]
    fn trailing_byte_is_rejected() {
        let codec = IntCodec::new();
        let mut dest: i32 = 0;
        let mut bytes = vec![0, 0, 0, 1];
        bytes.push(0xff);
        assert!(codec.decode(&bytes, &mut dest, ProtocolVersion::V4).is_err());
    }

    #[test]
    fn time_rejects_exactly_24_hours() {
        let codec = TimeCodec::new();
        let nanos_per_day: i64 = 86_400_000_000_000;
        assert!(codec.encode(&nanos_per_day, ProtocolVersion::V4).is_err());
        assert!(codec.encode(&(nanos_per_day - 1), ProtocolVersion::V4).is_ok());
    }
}
