//! `CqlValue`: the untyped host representation used when a caller decodes
//! into a location whose concrete host type isn't known ahead of time (see
//! `codec::factory::preferred_host_type`). Composite elements are
//! `Option<CqlValue>` rather than a dedicated `Empty` variant, so an
//! element-NULL (wire length `-1`) round-trips distinctly from, say, an
//! empty blob or an empty string.

use std::net::IpAddr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CqlValue {
    Ascii(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Counter(i64),
    Decimal(BigDecimal),
    /// Days since 1970-01-01, biased by 2^31 (see `convert::date`).
    Date(u32),
    Double(f64),
    Duration(CqlDuration),
    Float(f32),
    Int(i32),
    BigInt(i64),
    Text(String),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Inet(IpAddr),
    List(Vec<Option<CqlValue>>),
    Map(Vec<(CqlValue, Option<CqlValue>)>),
    Set(Vec<Option<CqlValue>>),
    Tuple(Vec<Option<CqlValue>>),
    UserDefinedType {
        keyspace: String,
        type_name: String,
        /// Order matches the UDT's declared field order.
        fields: Vec<(String, Option<CqlValue>)>,
    },
    SmallInt(i16),
    TinyInt(i8),
    /// Nanoseconds since midnight, in `[0, 86_400_000_000_000)`.
    Time(i64),
    Timeuuid(Uuid),
    Uuid(Uuid),
    Varint(BigInt),
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CqlDuration {
    pub months: i32,
    pub days: i32,
    pub nanoseconds: i64,
}
