use crate::column_type::ColumnType;

/// The negotiated CQL native protocol version.
///
/// Controls two things a codec cares about: which CQL types it may touch
/// ([`ProtocolVersion::supports`]) and whether a collection's element count
/// is a 2-byte or 4-byte prefix ([`ProtocolVersion::four_byte_collection_length`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolVersion {
    /// Legacy encoding: collection counts are a 2-byte unsigned prefix.
    /// Tuples and user-defined types were not yet part of the protocol.
    LegacyV2,
    /// Introduces tuples and user-defined types.
    V3,
    /// Introduces `smallint`, `tinyint`, `date` and `time`.
    V4,
    /// Introduces `duration`.
    V5,
}

impl ProtocolVersion {
    /// Whether collection/map `<size>` prefixes are 4 bytes (modern) or 2
    /// bytes (legacy). Element length prefixes are always 4 bytes regardless.
    pub fn four_byte_collection_length(&self) -> bool {
        !matches!(self, ProtocolVersion::LegacyV2)
    }

    /// Whether this version's wire format knows how to carry `ty` at all.
    ///
    /// This only checks the type's own introduction version; a composite
    /// type (list/set/map/tuple/UDT) is considered supported here even if an
    /// inner element type is not, since that check happens when the element
    /// codec itself runs - see `codec::collection`/`codec::tuple`/`codec::udt`.
    pub fn supports(&self, ty: &ColumnType) -> bool {
        match ty {
            ColumnType::SmallInt | ColumnType::TinyInt | ColumnType::Date | ColumnType::Time => {
                *self >= ProtocolVersion::V4
            }
            ColumnType::Duration => *self >= ProtocolVersion::V5,
            ColumnType::Tuple(_) | ColumnType::UserDefinedType { .. } => {
                *self >= ProtocolVersion::V3
            }
            _ => true,
        }
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProtocolVersion::LegacyV2 => "legacy v2",
            ProtocolVersion::V3 => "v3",
            ProtocolVersion::V4 => "v4",
            ProtocolVersion::V5 => "v5",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_int_requires_v4() {
        assert!(!ProtocolVersion::V3.supports(&ColumnType::SmallInt));
        assert!(ProtocolVersion::V4.supports(&ColumnType::SmallInt));
        assert!(ProtocolVersion::V5.supports(&ColumnType::SmallInt));
    }

    #[test]
    fn duration_requires_v5() {
        assert!(!ProtocolVersion::V4.supports(&ColumnType::Duration));
        assert!(ProtocolVersion::V5.supports(&ColumnType::Duration));
    }

    #[test]
    fn tuple_and_udt_require_v3() {
        assert!(!ProtocolVersion::LegacyV2.supports(&ColumnType::Tuple(vec![])));
        assert!(ProtocolVersion::V3.supports(&ColumnType::Tuple(vec![])));
    }

    #[test]
    fn collection_length_width_follows_version() {
        assert!(!ProtocolVersion::LegacyV2.four_byte_collection_length());
        assert!(ProtocolVersion::V3.four_byte_collection_length());
        assert!(ProtocolVersion::V4.four_byte_collection_length());
        assert!(ProtocolVersion::V5.four_byte_collection_length());
    }
}
