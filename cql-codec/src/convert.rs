//! The host-value conversion matrix: pure `to_canonical` /
//! `from_canonical` functions mapping between a primitive codec's canonical
//! intermediate and whatever host type the caller handed over.
//!
//! Every codec's `source`/`destination` is a `&dyn Encodable` / `&mut dyn
//! Decodable` - a runtime-typed slot, since a row's columns are
//! heterogeneously typed and the factory builds one codec tree per
//! `ColumnType`, not one per concrete Rust type. Dispatch over "any accepted
//! host type" is therefore done via `std::any::Any` downcasting rather than
//! generics, to support the dynamically-typed
//! `source`/`destination` parameters.

use std::any::Any;
use std::net::IpAddr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

use crate::error::{CodecError, CodecErrorKind};
use crate::value::CqlDuration;

/// Days between `1970-01-01` and the CQL `date` epoch bias (`2^31`).
const DATE_EPOCH_BIAS: i64 = 1 << 31;
/// Nanoseconds in a day; the valid range for the CQL `time` canonical.
const NANOS_PER_DAY: i64 = 86_400_000_000_000;
/// Default textual layout accepted/produced for `time` when a caller hands
/// over or asks for a `String` (default
/// `%H:%M:%S%.f`).
const TIME_LITERAL_FORMAT: &str = "%H:%M:%S%.f";

/// An explicit placeholder for the untyped CQL NULL, for callers that don't
/// want to reach for `Option::<T>::None` of a concrete type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

/// Anything a codec can read a value out of.
pub trait Encodable: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Encodable for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Anything a codec can write a decoded value into.
pub trait Decodable: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> Decodable for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn source_not_supported<T: ?Sized>() -> CodecError {
    CodecErrorKind::SourceTypeNotSupported {
        type_name: std::any::type_name::<T>(),
    }
    .into()
}

fn destination_not_supported<T: ?Sized>() -> CodecError {
    CodecErrorKind::DestinationTypeNotSupported {
        type_name: std::any::type_name::<T>(),
    }
    .into()
}

fn parse_failed(literal: &str) -> CodecError {
    CodecErrorKind::ParseFailed {
        literal: literal.to_owned(),
    }
    .into()
}

// ---------------------------------------------------------------------
// Integer hub: every tinyint/smallint/int/bigint/counter codec converts
// through here, narrowing/widening against a 64-bit canonical.
// ---------------------------------------------------------------------

pub fn any_to_i64(source: &dyn Any) -> Result<Option<i64>, CodecError> {
    macro_rules! try_int {
        ($t:ty) => {
            if let Some(v) = source.downcast_ref::<$t>() {
                return Ok(Some(*v as i64));
            }
            if let Some(v) = source.downcast_ref::<Option<$t>>() {
                return Ok(v.map(|v| v as i64));
            }
        };
    }
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    try_int!(i8);
    try_int!(i16);
    try_int!(i32);
    try_int!(i64);
    try_int!(u8);
    try_int!(u16);
    try_int!(u32);
    if let Some(v) = source.downcast_ref::<u64>() {
        return i64::try_from(*v)
            .map(Some)
            .map_err(|_| CodecErrorKind::ValueOutOfRange { value: v.to_string() }.into());
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return str_to_i64(v);
    }
    if let Some(v) = source.downcast_ref::<&str>() {
        return str_to_i64(v);
    }
    if let Some(v) = source.downcast_ref::<Option<String>>() {
        return v.as_deref().map(str_to_i64).transpose().map(Option::flatten);
    }
    Err(source_not_supported::<()>())
}

fn str_to_i64(s: &str) -> Result<Option<i64>, CodecError> {
    s.parse::<i64>().map(Some).map_err(|_| parse_failed(s))
}

/// Narrows the canonical `i64` into destination `T`, writing through
/// whichever accepted shape `destination` actually is.
pub fn i64_into_any(value: Option<i64>, destination: &mut dyn Any) -> Result<(), CodecError> {
    macro_rules! try_int {
        ($t:ty) => {
            if let Some(slot) = destination.downcast_mut::<$t>() {
                *slot = match value {
                    None => <$t>::default(),
                    Some(v) => <$t>::try_from(v).map_err(|_| CodecErrorKind::ValueOutOfRange {
                        value: v.to_string(),
                    })?,
                };
                return Ok(());
            }
            if let Some(slot) = destination.downcast_mut::<Option<$t>>() {
                *slot = match value {
                    None => None,
                    Some(v) => Some(<$t>::try_from(v).map_err(|_| {
                        CodecErrorKind::ValueOutOfRange { value: v.to_string() }
                    })?),
                };
                return Ok(());
            }
        };
    }
    try_int!(i8);
    try_int!(i16);
    try_int!(i32);
    try_int!(i64);
    try_int!(u8);
    try_int!(u16);
    try_int!(u32);
    try_int!(u64);
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| v.to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------

pub fn any_to_bool(source: &dyn Any) -> Result<Option<bool>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<bool>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<Option<bool>>() {
        return Ok(*v);
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return str_to_bool(v);
    }
    if let Some(v) = source.downcast_ref::<&str>() {
        return str_to_bool(v);
    }
    Err(source_not_supported::<()>())
}

fn str_to_bool(s: &str) -> Result<Option<bool>, CodecError> {
    match s {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(parse_failed(s)),
    }
}

pub fn bool_into_any(value: Option<bool>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<bool>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<bool>>() {
        *slot = value;
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Floating point: int<->float is explicitly disallowed, so no shared hub
// with the integer one.
// ---------------------------------------------------------------------

pub fn any_to_f64(source: &dyn Any) -> Result<Option<f64>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<f32>() {
        return Ok(Some(*v as f64));
    }
    if let Some(v) = source.downcast_ref::<f64>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<Option<f64>>() {
        return Ok(*v);
    }
    if let Some(v) = source.downcast_ref::<Option<f32>>() {
        return Ok(v.map(|v| v as f64));
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return v.parse::<f64>().map(Some).map_err(|_| parse_failed(v));
    }
    if let Some(v) = source.downcast_ref::<i32>() {
        let _ = v;
        return Err(CodecErrorKind::ConversionNotSupported.into());
    }
    if let Some(v) = source.downcast_ref::<i64>() {
        let _ = v;
        return Err(CodecErrorKind::ConversionNotSupported.into());
    }
    Err(source_not_supported::<()>())
}

pub fn f64_into_any(value: Option<f64>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<f64>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<f32>() {
        let v = value.unwrap_or_default();
        let narrowed = v as f32;
        if v.is_finite() && !narrowed.is_finite() {
            return Err(CodecErrorKind::ValueOutOfRange { value: v.to_string() }.into());
        }
        *slot = narrowed;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<f64>>() {
        *slot = value;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| v.to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Strings (ascii / text canonical form)
// ---------------------------------------------------------------------

pub fn any_to_string(source: &dyn Any) -> Result<Option<String>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return Ok(Some(v.clone()));
    }
    if let Some(v) = source.downcast_ref::<&str>() {
        return Ok(Some((*v).to_owned()));
    }
    if let Some(v) = source.downcast_ref::<Option<String>>() {
        return Ok(v.clone());
    }
    Err(source_not_supported::<()>())
}

pub fn string_into_any(value: Option<String>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<String>>() {
        *slot = value;
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Byte strings (blob / custom / inet canonical form)
// ---------------------------------------------------------------------

pub fn any_to_bytes(source: &dyn Any) -> Result<Option<Vec<u8>>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<Vec<u8>>() {
        return Ok(Some(v.clone()));
    }
    if let Some(v) = source.downcast_ref::<&[u8]>() {
        return Ok(Some((*v).to_owned()));
    }
    if let Some(v) = source.downcast_ref::<Option<Vec<u8>>>() {
        return Ok(v.clone());
    }
    Err(source_not_supported::<()>())
}

pub fn bytes_into_any(value: Option<Vec<u8>>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<Vec<u8>>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<Vec<u8>>>() {
        *slot = value;
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// UUID / TimeUUID (canonical: 16 raw bytes)
// ---------------------------------------------------------------------

pub fn any_to_uuid(source: &dyn Any) -> Result<Option<[u8; 16]>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<Uuid>() {
        return Ok(Some(*v.as_bytes()));
    }
    if let Some(v) = source.downcast_ref::<Option<Uuid>>() {
        return Ok(v.map(|v| *v.as_bytes()));
    }
    if let Some(v) = source.downcast_ref::<[u8; 16]>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return Uuid::parse_str(v)
            .map(|v| Some(*v.as_bytes()))
            .map_err(|_| parse_failed(v));
    }
    Err(source_not_supported::<()>())
}

pub fn uuid_into_any(value: Option<[u8; 16]>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<Uuid>() {
        *slot = Uuid::from_bytes(value.unwrap_or_default());
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<Uuid>>() {
        *slot = value.map(Uuid::from_bytes);
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| Uuid::from_bytes(v).to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Date (canonical: days since 1970-01-01, biased by 2^31)
// ---------------------------------------------------------------------

pub fn any_to_date(source: &dyn Any) -> Result<Option<u32>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<u32>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<NaiveDate>() {
        return naive_date_to_biased(*v).map(Some);
    }
    if let Some(v) = source.downcast_ref::<Option<NaiveDate>>() {
        return v.map(|v| naive_date_to_biased(v)).transpose();
    }
    if let Some(v) = source.downcast_ref::<String>() {
        let parsed = NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| parse_failed(v))?;
        return naive_date_to_biased(parsed).map(Some);
    }
    Err(source_not_supported::<()>())
}

fn naive_date_to_biased(date: NaiveDate) -> Result<u32, CodecError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid constant date");
    let days = (date - epoch).num_days() + DATE_EPOCH_BIAS;
    u32::try_from(days).map_err(|_| {
        CodecErrorKind::ValueOutOfRange {
            value: date.to_string(),
        }
        .into()
    })
}

fn biased_to_naive_date(biased: u32) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid constant date");
    epoch + chrono::Duration::days(biased as i64 - DATE_EPOCH_BIAS)
}

pub fn date_into_any(value: Option<u32>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<u32>() {
        *slot = value.unwrap_or(DATE_EPOCH_BIAS as u32);
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<NaiveDate>() {
        *slot = biased_to_naive_date(value.unwrap_or(DATE_EPOCH_BIAS as u32));
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<NaiveDate>>() {
        *slot = value.map(biased_to_naive_date);
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value
            .map(|v| biased_to_naive_date(v).format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Time of day (canonical: nanoseconds since midnight, [0, 86_400_000_000_000))
// ---------------------------------------------------------------------

fn check_time_range(nanos: i64) -> Result<i64, CodecError> {
    if !(0..NANOS_PER_DAY).contains(&nanos) {
        return Err(CodecErrorKind::ValueOutOfRange {
            value: nanos.to_string(),
        }
        .into());
    }
    Ok(nanos)
}

fn naive_time_to_nanos(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * 1_000_000_000 + time.nanosecond() as i64
}

pub fn any_to_time(source: &dyn Any) -> Result<Option<i64>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<i64>() {
        return check_time_range(*v).map(Some);
    }
    if let Some(v) = source.downcast_ref::<NaiveTime>() {
        return check_time_range(naive_time_to_nanos(*v)).map(Some);
    }
    if let Some(v) = source.downcast_ref::<std::time::Duration>() {
        return check_time_range(v.as_nanos() as i64).map(Some);
    }
    if let Some(v) = source.downcast_ref::<String>() {
        let parsed =
            NaiveTime::parse_from_str(v, TIME_LITERAL_FORMAT).map_err(|_| parse_failed(v))?;
        return check_time_range(naive_time_to_nanos(parsed)).map(Some);
    }
    Err(source_not_supported::<()>())
}

pub fn time_into_any(value: Option<i64>, destination: &mut dyn Any) -> Result<(), CodecError> {
    let nanos = value.unwrap_or(0);
    if let Some(slot) = destination.downcast_mut::<i64>() {
        *slot = nanos;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<NaiveTime>() {
        *slot = nanos_to_naive_time(nanos);
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = nanos_to_naive_time(nanos).format(TIME_LITERAL_FORMAT).to_string();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

fn nanos_to_naive_time(nanos: i64) -> NaiveTime {
    let secs = (nanos / 1_000_000_000) as u32;
    let subsec = (nanos % 1_000_000_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, subsec).unwrap_or(NaiveTime::MIN)
}

// ---------------------------------------------------------------------
// Timestamp (canonical: milliseconds since the Unix epoch)
// ---------------------------------------------------------------------

pub fn any_to_timestamp(source: &dyn Any) -> Result<Option<i64>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<i64>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<DateTime<Utc>>() {
        return Ok(Some(v.timestamp_millis()));
    }
    if let Some(v) = source.downcast_ref::<NaiveDateTime>() {
        return Ok(Some(v.and_utc().timestamp_millis()));
    }
    Err(source_not_supported::<()>())
}

pub fn timestamp_into_any(value: Option<i64>, destination: &mut dyn Any) -> Result<(), CodecError> {
    let millis = value.unwrap_or(0);
    if let Some(slot) = destination.downcast_mut::<i64>() {
        *slot = millis;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<DateTime<Utc>>() {
        *slot = millis_to_datetime(millis)?;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<NaiveDateTime>() {
        *slot = millis_to_datetime(millis)?.naive_utc();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

/// Converts epoch milliseconds to a UTC instant using floor division, so
/// negative (pre-1970) timestamps land on the correct whole second rather
/// than rounding toward zero.
fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, CodecError> {
    let secs = millis.div_euclid(1000);
    let subsec_millis = millis.rem_euclid(1000);
    DateTime::from_timestamp(secs, subsec_millis as u32 * 1_000_000).ok_or_else(|| {
        CodecErrorKind::ValueOutOfRange {
            value: millis.to_string(),
        }
        .into()
    })
}

// ---------------------------------------------------------------------
// Duration (canonical: the three-field `CqlDuration`)
// ---------------------------------------------------------------------

pub fn any_to_duration(source: &dyn Any) -> Result<Option<CqlDuration>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<CqlDuration>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<Option<CqlDuration>>() {
        return Ok(*v);
    }
    Err(source_not_supported::<()>())
}

pub fn duration_into_any(
    value: Option<CqlDuration>,
    destination: &mut dyn Any,
) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<CqlDuration>() {
        *slot = value.unwrap_or(CqlDuration {
            months: 0,
            days: 0,
            nanoseconds: 0,
        });
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<CqlDuration>>() {
        *slot = value;
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Varint (canonical: arbitrary-precision `BigInt`)
// ---------------------------------------------------------------------

pub fn any_to_varint(source: &dyn Any) -> Result<Option<BigInt>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<BigInt>() {
        return Ok(Some(v.clone()));
    }
    if let Some(v) = source.downcast_ref::<i64>() {
        return Ok(Some(BigInt::from(*v)));
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return v
            .parse::<BigInt>()
            .map(Some)
            .map_err(|_| parse_failed(v));
    }
    Err(source_not_supported::<()>())
}

pub fn varint_into_any(value: Option<BigInt>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<BigInt>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<BigInt>>() {
        *slot = value;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| v.to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Decimal (canonical: `BigDecimal`, wire form is a signed varint mantissa
// plus an `i32` scale)
// ---------------------------------------------------------------------

pub fn any_to_decimal(source: &dyn Any) -> Result<Option<BigDecimal>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<BigDecimal>() {
        return Ok(Some(v.clone()));
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return v
            .parse::<BigDecimal>()
            .map(Some)
            .map_err(|_| parse_failed(v));
    }
    Err(source_not_supported::<()>())
}

pub fn decimal_into_any(
    value: Option<BigDecimal>,
    destination: &mut dyn Any,
) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<BigDecimal>() {
        *slot = value.unwrap_or_default();
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<BigDecimal>>() {
        *slot = value;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| v.to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

// ---------------------------------------------------------------------
// Inet (canonical: `IpAddr`, wire form is 4 or 16 raw bytes)
// ---------------------------------------------------------------------

pub fn any_to_inet(source: &dyn Any) -> Result<Option<IpAddr>, CodecError> {
    if source.downcast_ref::<Null>().is_some() {
        return Ok(None);
    }
    if let Some(v) = source.downcast_ref::<IpAddr>() {
        return Ok(Some(*v));
    }
    if let Some(v) = source.downcast_ref::<String>() {
        return v.parse::<IpAddr>().map(Some).map_err(|_| parse_failed(v));
    }
    Err(source_not_supported::<()>())
}

pub fn inet_into_any(value: Option<IpAddr>, destination: &mut dyn Any) -> Result<(), CodecError> {
    if let Some(slot) = destination.downcast_mut::<IpAddr>() {
        *slot = value.unwrap_or(IpAddr::from([0, 0, 0, 0]));
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<Option<IpAddr>>() {
        *slot = value;
        return Ok(());
    }
    if let Some(slot) = destination.downcast_mut::<String>() {
        *slot = value.map(|v| v.to_string()).unwrap_or_default();
        return Ok(());
    }
    Err(destination_not_supported::<()>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widens_small_integers() {
        let small: i16 = 42;
        assert_eq!(any_to_i64(&small).unwrap(), Some(42));
    }

    #[test]
    fn narrowing_checks_range() {
        let mut dest: i16 = 0;
        assert!(i64_into_any(Some(40_000), (&mut dest) as &mut dyn Any).is_err());
        assert!(i64_into_any(Some(32_767), (&mut dest) as &mut dyn Any).is_ok());
        assert_eq!(dest, 32_767);
    }

    #[test]
    fn int16_narrows_at_boundary() {
        let mut dest: i16 = 0;
        assert!(i64_into_any(Some(32_768), (&mut dest) as &mut dyn Any).is_err());
        assert!(i64_into_any(Some(-32_768), (&mut dest) as &mut dyn Any).is_ok());
        assert_eq!(dest, -32_768);
    }

    #[test]
    fn string_boolean_parsing_is_case_sensitive() {
        assert_eq!(any_to_bool(&"true".to_string()).unwrap(), Some(true));
        assert!(any_to_bool(&"True".to_string()).is_err());
    }

    #[test]
    fn integer_to_float_is_unsupported() {
        let v: i32 = 7;
        assert!(any_to_f64(&v).is_err());
    }

    #[test]
    fn date_epoch_round_trips_through_bias() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let biased = any_to_date(&epoch).unwrap().unwrap();
        assert_eq!(biased, DATE_EPOCH_BIAS as u32);
        let mut out = NaiveDate::MIN;
        date_into_any(Some(biased), (&mut out) as &mut dyn Any).unwrap();
        assert_eq!(out, epoch);
    }

    #[test]
    fn time_rejects_the_24_hour_boundary() {
        assert!(any_to_time(&NANOS_PER_DAY).is_err());
        assert!(any_to_time(&(NANOS_PER_DAY - 1)).is_ok());
        assert!(any_to_time(&-1i64).is_err());
    }

    #[test]
    fn timestamp_floors_toward_negative_infinity_near_epoch() {
        let dt = millis_to_datetime(-500).unwrap();
        assert_eq!(dt.timestamp(), -1);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn uuid_round_trips_through_bytes() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let bytes = any_to_uuid(&id).unwrap().unwrap();
        let mut out = Uuid::nil();
        uuid_into_any(Some(bytes), (&mut out) as &mut dyn Any).unwrap();
        assert_eq!(out, id);
    }
}
