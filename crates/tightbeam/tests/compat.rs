//! Schema-evolution and corrupt-input behavior.
//!
//! The format's whole reason for field ids is that the two ends of a
//! connection drift: fields appear, disappear, and occasionally change
//! type. These tests pin the lenient policy — skip what you don't
//! recognize, keep the stream aligned, never abort a whole message
//! over one stale field — and the hard failures for input that is
//! actually broken rather than merely newer.

use tightbeam::{
    BinaryReader, CodecError, ProtocolRead, Schema, StructSchema,
    StructValue, Value, WireError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =========================================================================
// Forward/backward compatibility
// =========================================================================

#[test]
fn test_unknown_field_is_skipped_without_desync() {
    init_tracing();
    // Writer's schema has fields {1: i32, 2: string}; the reader only
    // knows {1: i32}.
    let writer_schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::I32)
            .field(2, Schema::String)
            .build(),
    );
    let reader_schema =
        Schema::from(StructSchema::builder().field(1, Schema::I32).build());

    let value = Value::Struct(
        StructValue::new().with(1, Value::I32(7)).with(2, "dropped"),
    );
    let mut bytes = tightbeam::serialize(&writer_schema, &value).unwrap();
    // A sibling value after the struct proves the stream stayed
    // aligned across the skip.
    bytes.extend(tightbeam::serialize(&Schema::I64, &Value::I64(99)).unwrap());

    let mut reader = BinaryReader::new(bytes.as_slice());
    let decoded = tightbeam::read_value(&mut reader, &reader_schema)
        .unwrap()
        .unwrap();
    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.get_i32(1), Some(7));
    assert_eq!(msg.len(), 1);
    assert_eq!(reader.read_i64().unwrap(), 99);
}

#[test]
fn test_unknown_composite_field_is_skipped_recursively() {
    // The unknown field is itself a struct containing a list and a
    // nested struct — skipping must walk the whole thing.
    let inner = Schema::from(
        StructSchema::builder()
            .field(1, Schema::list(Schema::String))
            .field(
                2,
                Schema::from(
                    StructSchema::builder().field(1, Schema::Double).build(),
                ),
            )
            .build(),
    );
    let writer_schema = Schema::from(
        StructSchema::builder()
            .field(5, inner)
            .field(9, Schema::Bool)
            .build(),
    );
    let reader_schema =
        Schema::from(StructSchema::builder().field(9, Schema::Bool).build());

    let value = Value::Struct(
        StructValue::new()
            .with(
                5,
                StructValue::new()
                    .with(1, Value::List(vec!["a".into(), "b".into()]))
                    .with(2, StructValue::new().with(1, Value::Double(3.5))),
            )
            .with(9, Value::Bool(true)),
    );
    let bytes = tightbeam::serialize(&writer_schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &reader_schema)
        .unwrap()
        .unwrap();
    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.get_bool(9), Some(true));
    assert_eq!(msg.len(), 1);
}

#[test]
fn test_field_type_mismatch_leaves_field_absent() {
    init_tracing();
    // Field 3 is a string on the wire but declared i32 by the reader.
    // The rest of the struct must decode; field 3 must be absent.
    let writer_schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::I32)
            .field(3, Schema::String)
            .field(4, Schema::Bool)
            .build(),
    );
    let reader_schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::I32)
            .field(3, Schema::I32)
            .field(4, Schema::Bool)
            .build(),
    );

    let value = Value::Struct(
        StructValue::new()
            .with(1, Value::I32(1))
            .with(3, "not an i32")
            .with(4, Value::Bool(true)),
    );
    let bytes = tightbeam::serialize(&writer_schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &reader_schema)
        .unwrap()
        .unwrap();
    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.get_i32(1), Some(1));
    assert_eq!(msg.get(3), None);
    assert_eq!(msg.get_bool(4), Some(true));
}

#[test]
fn test_mismatched_container_field_reads_absent_not_partial() {
    // A list of strings where the reader expects a list of i32: the
    // whole container is abandoned, never a garbage half-collection.
    let writer_schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::list(Schema::String))
            .field(2, Schema::I32)
            .build(),
    );
    let reader_schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::list(Schema::I32))
            .field(2, Schema::I32)
            .build(),
    );

    let value = Value::Struct(
        StructValue::new()
            .with(1, Value::List(vec!["x".into(), "y".into()]))
            .with(2, Value::I32(5)),
    );
    let bytes = tightbeam::serialize(&writer_schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &reader_schema)
        .unwrap()
        .unwrap();
    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.get(1), None);
    assert_eq!(msg.get_i32(2), Some(5));
}

#[test]
fn test_mismatched_map_reads_absent() {
    let written = tightbeam::serialize(
        &Schema::map(Schema::String, Schema::I32),
        &Value::Map(vec![(Value::String("k".into()), Value::I32(1))]),
    )
    .unwrap();
    // Reader expects i64 values.
    let decoded = tightbeam::deserialize(
        &written,
        &Schema::map(Schema::String, Schema::I64),
    )
    .unwrap();
    assert_eq!(decoded, None);
}

#[test]
fn test_old_reader_new_writer_and_back() {
    // Two-way drift: each side has a field the other lacks. Messages
    // in both directions decode to the shared subset.
    let v1 = Schema::from(
        StructSchema::builder()
            .field(1, Schema::I32)
            .field(2, Schema::String)
            .build(),
    );
    let v2 = Schema::from(
        StructSchema::builder()
            .field(1, Schema::I32)
            .field(3, Schema::Double)
            .build(),
    );

    let from_v1 = tightbeam::serialize(
        &v1,
        &Value::Struct(StructValue::new().with(1, Value::I32(10)).with(2, "gone")),
    )
    .unwrap();
    let seen_by_v2 = tightbeam::deserialize(&from_v1, &v2).unwrap().unwrap();
    assert_eq!(seen_by_v2.as_struct().unwrap().get_i32(1), Some(10));
    assert_eq!(seen_by_v2.as_struct().unwrap().len(), 1);

    let from_v2 = tightbeam::serialize(
        &v2,
        &Value::Struct(
            StructValue::new()
                .with(1, Value::I32(20))
                .with(3, Value::Double(0.5)),
        ),
    )
    .unwrap();
    let seen_by_v1 = tightbeam::deserialize(&from_v2, &v1).unwrap().unwrap();
    assert_eq!(seen_by_v1.as_struct().unwrap().get_i32(1), Some(20));
    assert_eq!(seen_by_v1.as_struct().unwrap().len(), 1);
}

// =========================================================================
// Corrupt and truncated input
// =========================================================================

#[test]
fn test_truncated_struct_is_eof() {
    let schema = Schema::from(
        StructSchema::builder().field(1, Schema::String).build(),
    );
    let value = Value::Struct(StructValue::new().with(1, "hello world"));
    let bytes = tightbeam::serialize(&schema, &value).unwrap();

    // Every proper prefix must fail cleanly, never panic or hang.
    for cut in 0..bytes.len() {
        let err = tightbeam::deserialize(&bytes[..cut], &schema).unwrap_err();
        assert!(
            matches!(err, CodecError::Wire(WireError::Eof)),
            "cut at {cut}: {err}"
        );
    }
}

#[test]
fn test_invalid_field_tag_is_rejected() {
    // Field header with tag nibble 15, which is outside the closed set.
    let bytes = [(1u8 << 4) | 15];
    let schema = Schema::from(StructSchema::builder().build());
    let err = tightbeam::deserialize(&bytes, &schema).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Wire(WireError::InvalidTypeTag(15))
    ));
}

#[test]
fn test_unbounded_varint_is_rejected_not_looped() {
    // 16 continuation bytes where a field header should be.
    let bytes = [0x80u8; 16];
    let schema = Schema::from(StructSchema::builder().build());
    let err = tightbeam::deserialize(&bytes, &schema).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Wire(WireError::VarintOverflow)
    ));
}

#[test]
fn test_write_value_under_wrong_schema_is_fatal() {
    let err = tightbeam::serialize(&Schema::String, &Value::I32(1)).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedType { .. }));
}
