//! End-to-end round trips through the public `codec_for` factory: the
//! primitive conversion matrix against native Rust types, nested
//! collections and maps against their `CqlValue`-shaped destinations, and a
//! record-shaped UDT via the generic typed path.

use cql_codec::{codec_for, cql_record, Codec, CqlValue, ProtocolVersion};

#[test]
fn primitives_round_trip_through_native_rust_types() {
    use cql_codec::ColumnType as T;

    let codec = codec_for(&T::Int).unwrap();
    let bytes = codec.encode(&-42i32, ProtocolVersion::V4).unwrap();
    let mut dest = 0i32;
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert_eq!(dest, -42);

    let codec = codec_for(&T::BigInt).unwrap();
    let bytes = codec.encode(&9_000_000_000i64, ProtocolVersion::V4).unwrap();
    let mut dest = 0i64;
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert_eq!(dest, 9_000_000_000);

    let codec = codec_for(&T::Boolean).unwrap();
    let bytes = codec.encode(&true, ProtocolVersion::V4).unwrap();
    let mut dest = false;
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert!(dest);

    let codec = codec_for(&T::Text).unwrap();
    let bytes = codec.encode(&"hello world".to_owned(), ProtocolVersion::V4).unwrap();
    let mut dest = String::new();
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert_eq!(dest, "hello world");
}

#[test]
fn nested_list_of_sets_round_trips_through_cqlvalue() {
    use cql_codec::ColumnType as T;

    let ty = T::List(Box::new(T::Set(Box::new(T::Text))));
    let codec = codec_for(&ty).unwrap();
    let inner = |words: &[&str]| {
        Some(CqlValue::Set(
            words.iter().map(|w| Some(CqlValue::Text((*w).to_owned()))).collect(),
        ))
    };
    let source: Vec<Option<CqlValue>> = vec![inner(&["a", "b"]), inner(&["c"])];
    let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
    let mut dest: Vec<Option<CqlValue>> = Vec::new();
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert_eq!(dest, source);
}

#[test]
fn map_with_null_value_round_trips() {
    use cql_codec::ColumnType as T;

    let ty = T::Map(Box::new(T::Text), Box::new(T::Int));
    let codec = codec_for(&ty).unwrap();
    let source: Vec<(CqlValue, Option<CqlValue>)> = vec![
        (CqlValue::Text("present".to_owned()), Some(CqlValue::Int(1))),
        (CqlValue::Text("absent".to_owned()), None),
    ];
    let bytes = codec.encode(&source, ProtocolVersion::V4).unwrap();
    let mut dest: Vec<(CqlValue, Option<CqlValue>)> = Vec::new();
    assert!(!codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap());
    assert_eq!(dest, source);
}

cql_record! {
    #[derive(Debug, Default, PartialEq)]
    struct CyclistName {
        id: i32,
        lastname: String,
        firstname: String,
    }
}

#[test]
fn typed_udt_round_trips_without_going_through_cqlvalue() {
    use cql_codec::ColumnType as T;

    let codec = cql_codec::codec::udt::UserDefinedTypeCodec::new(
        "cycling".to_owned(),
        "cyclist_name".to_owned(),
        vec!["id".to_owned(), "lastname".to_owned(), "firstname".to_owned()],
        vec![T::Int, T::Text, T::Text],
        vec![
            codec_for(&T::Int).unwrap(),
            codec_for(&T::Text).unwrap(),
            codec_for(&T::Text).unwrap(),
        ],
    );
    let source = CyclistName {
        id: 1,
        lastname: "Johnson".to_owned(),
        firstname: "John".to_owned(),
    };
    let bytes = codec.encode_typed(&source, ProtocolVersion::V4).unwrap();
    let mut dest = CyclistName::default();
    let was_null = codec.decode_typed(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
    assert!(!was_null);
    assert_eq!(dest, source);
}

#[test]
fn null_primitive_round_trips_to_empty_wire_representation() {
    use cql_codec::ColumnType as T;
    use cql_codec::convert::Null;

    let codec = codec_for(&T::Int).unwrap();
    let bytes = codec.encode(&Null, ProtocolVersion::V4).unwrap();
    assert!(bytes.is_empty());

    let mut dest: Option<i32> = Some(7);
    let was_null = codec.decode(&bytes, &mut dest, ProtocolVersion::V4).unwrap();
    assert!(was_null);
    assert_eq!(dest, None);
}
