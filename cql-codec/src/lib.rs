//! A value-level serialization engine for the Cassandra native protocol's
//! CQL type system: bi-directional codecs for every CQL type, built around
//! a codec factory, the `access` extractor/injector framework, and the
//! host-value conversion matrix in `convert`.

pub mod access;
pub mod codec;
pub mod column_type;
pub mod convert;
pub mod error;
pub mod primitive;
pub mod value;
pub mod version;

pub use codec::factory::codec_for;
pub use codec::{Codec, DynCodec};
pub use column_type::ColumnType;
pub use error::{CodecError, CodecErrorKind};
pub use value::CqlValue;
pub use version::ProtocolVersion;
