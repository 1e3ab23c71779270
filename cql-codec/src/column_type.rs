//! The CQL type descriptor: an opaque tree the codec factory walks to build
//! a matching codec, including fully-specified `Tuple` and `UserDefinedType`
//! variants.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Custom(String),
    Ascii,
    Boolean,
    Blob,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Int,
    BigInt,
    /// Covers both CQL `text` and `varchar`; they share one wire type.
    Text,
    Timestamp,
    Inet,
    List(Box<ColumnType>),
    Map(Box<ColumnType>, Box<ColumnType>),
    Set(Box<ColumnType>),
    UserDefinedType {
        keyspace: String,
        name: String,
        field_names: Vec<String>,
        field_types: Vec<ColumnType>,
    },
    SmallInt,
    TinyInt,
    Time,
    Timeuuid,
    Tuple(Vec<ColumnType>),
    Uuid,
    Varint,
}

impl ColumnType {
    /// A short name for this type, used in error messages and
    /// `Codec::data_type` debug output. Not a full CQL-syntax renderer (no
    /// quoting of custom class names), but enough to name the type in an
    /// error frame.
    pub fn short_name(&self) -> String {
        match self {
            ColumnType::Custom(name) => format!("custom<{name}>"),
            ColumnType::Ascii => "ascii".to_owned(),
            ColumnType::Boolean => "boolean".to_owned(),
            ColumnType::Blob => "blob".to_owned(),
            ColumnType::Counter => "counter".to_owned(),
            ColumnType::Date => "date".to_owned(),
            ColumnType::Decimal => "decimal".to_owned(),
            ColumnType::Double => "double".to_owned(),
            ColumnType::Duration => "duration".to_owned(),
            ColumnType::Float => "float".to_owned(),
            ColumnType::Int => "int".to_owned(),
            ColumnType::BigInt => "bigint".to_owned(),
            ColumnType::Text => "text".to_owned(),
            ColumnType::Timestamp => "timestamp".to_owned(),
            ColumnType::Inet => "inet".to_owned(),
            ColumnType::List(item) => format!("list<{}>", item.short_name()),
            ColumnType::Map(key, value) => {
                format!("map<{}, {}>", key.short_name(), value.short_name())
            }
            ColumnType::Set(item) => format!("set<{}>", item.short_name()),
            ColumnType::UserDefinedType { keyspace, name, .. } => {
                format!("{keyspace}.{name}")
            }
            ColumnType::SmallInt => "smallint".to_owned(),
            ColumnType::TinyInt => "tinyint".to_owned(),
            ColumnType::Time => "time".to_owned(),
            ColumnType::Timeuuid => "timeuuid".to_owned(),
            ColumnType::Tuple(fields) => {
                let fields: Vec<_> = fields.iter().map(ColumnType::short_name).collect();
                format!("tuple<{}>", fields.join(", "))
            }
            ColumnType::Uuid => "uuid".to_owned(),
            ColumnType::Varint => "varint".to_owned(),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_collection_names() {
        let ty = ColumnType::List(Box::new(ColumnType::Set(Box::new(ColumnType::Text))));
        assert_eq!(ty.short_name(), "list<set<text>>");
    }

    #[test]
    fn renders_tuple_names() {
        let ty = ColumnType::Tuple(vec![ColumnType::Int, ColumnType::Boolean, ColumnType::Text]);
        assert_eq!(ty.short_name(), "tuple<int, boolean, text>");
    }
}
