//! The `Codec` trait and the shared encode/decode skeleton every primitive
//! codec runs.

pub mod collection;
mod cqlvalue;
pub mod factory;
pub mod map;
pub mod primitive;
pub mod tuple;
pub mod udt;

use std::sync::Arc;

use crate::column_type::ColumnType;
use crate::convert::{Decodable, Encodable};
use crate::error::{CodecError, CodecErrorKind};
use crate::version::ProtocolVersion;

/// A codec bound to one CQL type descriptor. Immutable, `Send + Sync`, freely
/// shareable across threads.
pub trait Codec: Send + Sync + std::fmt::Debug {
    fn data_type(&self) -> &ColumnType;
    fn encode(&self, source: &dyn Encodable, version: ProtocolVersion) -> Result<Vec<u8>, CodecError>;
    /// Returns `was_null`.
    fn decode(
        &self,
        bytes: &[u8],
        destination: &mut dyn Decodable,
        version: ProtocolVersion,
    ) -> Result<bool, CodecError>;
}

pub type DynCodec = Arc<dyn Codec>;

fn check_supported(ty: &ColumnType, version: ProtocolVersion) -> Result<(), CodecError> {
    if version.supports(ty) {
        Ok(())
    } else {
        Err(CodecErrorKind::DataTypeNotSupported {
            type_name: ty.short_name(),
            version,
        }
        .into())
    }
}

/// Runs the primitive encode skeleton: version
/// check, `to_canonical`, then `write` the canonical value if it wasn't
/// null. `to_canonical` returning `None` is the host null path - it produces
/// empty bytes regardless of what `write` would do.
pub(crate) fn encode_primitive<C>(
    ty: &ColumnType,
    version: ProtocolVersion,
    type_name: &'static str,
    to_canonical: impl FnOnce() -> Result<Option<C>, CodecError>,
    write: impl FnOnce(&mut Vec<u8>, C),
) -> Result<Vec<u8>, CodecError> {
    check_supported(ty, version)?;
    let canonical = to_canonical().map_err(|e| e.encode_boundary(type_name, &ty.short_name(), version))?;
    let mut buf = Vec::new();
    if let Some(value) = canonical {
        write(&mut buf, value);
    }
    Ok(buf)
}

/// Runs the primitive decode skeleton: version
/// check, empty-slice-is-null, `read` the canonical value, then
/// `from_canonical` into the destination. Returns `was_null`.
pub(crate) fn decode_primitive<C>(
    ty: &ColumnType,
    version: ProtocolVersion,
    type_name: &'static str,
    bytes: &[u8],
    read: impl FnOnce(&[u8]) -> Result<C, CodecError>,
    from_canonical: impl FnOnce(Option<C>) -> Result<(), CodecError>,
) -> Result<bool, CodecError> {
    check_supported(ty, version)?;
    let was_null = bytes.is_empty();
    let run = || -> Result<(), CodecError> {
        let canonical = if was_null { None } else { Some(read(bytes)?) };
        from_canonical(canonical)
    };
    run().map_err(|e| e.decode_boundary(type_name, &ty.short_name(), version))?;
    Ok(was_null)
}
