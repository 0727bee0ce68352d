//! End-to-end round trips through the public API, on both protocols.

use tightbeam::{
    ActionKind, Envelope, Schema, StructSchema, StructValue, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =========================================================================
// Fixtures: a representative message shape with every composite kind.
// =========================================================================

/// Player profile: scalars, a list, a set, a map, and a nested struct.
fn profile_schema() -> Schema {
    let position = StructSchema::builder()
        .field(1, Schema::Float)
        .field(2, Schema::Float)
        .build();
    Schema::from(
        StructSchema::builder()
            .field(1, Schema::String) // name
            .field(2, Schema::I32) // level
            .field(3, Schema::Bool) // online
            .field(4, Schema::list(Schema::I64)) // item ids
            .field(5, Schema::set(Schema::I16)) // badges
            .field(6, Schema::map(Schema::String, Schema::Double)) // stats
            .field(7, Schema::Struct(position)) // position
            .field(8, Schema::Binary) // avatar
            .field(9, Schema::Byte) // team
            .build(),
    )
}

fn profile_value() -> Value {
    let position = StructValue::new()
        .with(1, Value::Float(1.5))
        .with(2, Value::Float(-2.25));
    Value::Struct(
        StructValue::new()
            .with(1, "ada")
            .with(2, Value::I32(-42))
            .with(3, Value::Bool(true))
            .with(4, Value::List(vec![Value::I64(1), Value::I64(-9_000_000_000)]))
            .with(5, Value::Set(vec![Value::I16(7), Value::I16(-7)]))
            .with(
                6,
                Value::Map(vec![
                    (Value::String("speed".into()), Value::Double(0.5)),
                    (Value::String("luck".into()), Value::Double(-1.0)),
                ]),
            )
            .with(7, position)
            .with(8, Value::Binary(vec![0xDE, 0xAD]))
            .with(9, Value::Byte(3)),
    )
}

// =========================================================================
// Binary protocol
// =========================================================================

#[test]
fn test_binary_round_trip_full_profile() {
    init_tracing();
    let schema = profile_schema();
    let value = profile_value();
    let bytes = tightbeam::serialize(&schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &schema).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_binary_round_trip_with_absent_fields() {
    let schema = profile_schema();
    // Only two of nine fields present; the rest stay absent through
    // the round trip rather than materializing as defaults.
    let value = Value::Struct(
        StructValue::new().with(1, "ghost").with(3, Value::Bool(false)),
    );
    let bytes = tightbeam::serialize(&schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &schema).unwrap().unwrap();
    assert_eq!(decoded, value);

    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.len(), 2);
    assert_eq!(msg.get_i32(2), None);
    assert_eq!(msg.get_i32(2).unwrap_or(1), 1);
}

#[test]
fn test_empty_struct_serializes_to_one_byte() {
    let schema = Schema::from(StructSchema::builder().build());
    let bytes = tightbeam::serialize(&schema, &Value::Struct(StructValue::new()))
        .unwrap();
    assert_eq!(bytes.len(), 1);
    let decoded = tightbeam::deserialize(&bytes, &schema).unwrap().unwrap();
    assert_eq!(decoded, Value::Struct(StructValue::new()));
}

#[test]
fn test_zero_length_string_and_binary_are_distinct_from_absent() {
    let schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::String)
            .field(2, Schema::Binary)
            .build(),
    );
    let value = Value::Struct(
        StructValue::new()
            .with(1, "")
            .with(2, Value::Binary(Vec::new())),
    );
    let bytes = tightbeam::serialize(&schema, &value).unwrap();
    let decoded = tightbeam::deserialize(&bytes, &schema).unwrap().unwrap();
    let msg = decoded.as_struct().unwrap();
    assert_eq!(msg.get_str(1), Some(""));
    assert_eq!(msg.get_binary(2), Some(&[][..]));
}

#[test]
fn test_streaming_forms_match_buffered_forms() {
    let schema = profile_schema();
    let value = profile_value();

    let mut sink = Vec::new();
    tightbeam::serialize_into(&mut sink, &schema, &value).unwrap();
    assert_eq!(sink, tightbeam::serialize(&schema, &value).unwrap());

    let decoded = tightbeam::deserialize_from(sink.as_slice(), &schema)
        .unwrap()
        .unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_list_and_set_are_wire_identical() {
    // Bytes written as a list decode as a set, and vice versa: the
    // headers are tag-for-tag identical.
    let items = vec![Value::I32(1), Value::I32(2), Value::I32(3)];

    let as_list = tightbeam::serialize(
        &Schema::list(Schema::I32),
        &Value::List(items.clone()),
    )
    .unwrap();
    let as_set = tightbeam::serialize(
        &Schema::set(Schema::I32),
        &Value::Set(items.clone()),
    )
    .unwrap();

    // The container's own kind never reaches the wire — the header
    // carries the element tag and count, so the bytes are identical.
    assert_eq!(as_list, as_set);

    let crossed = tightbeam::deserialize(&as_list, &Schema::set(Schema::I32))
        .unwrap()
        .unwrap();
    assert_eq!(crossed, Value::Set(items.clone()));
    let crossed = tightbeam::deserialize(&as_set, &Schema::list(Schema::I32))
        .unwrap()
        .unwrap();
    assert_eq!(crossed, Value::List(items));
}

// =========================================================================
// Envelope framing
// =========================================================================

#[test]
fn test_request_envelope_with_payload_is_byte_exact() {
    let schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::String)
            .field(2, Schema::I32)
            .build(),
    );
    let value = Value::Struct(
        StructValue::new().with(1, "hello").with(2, Value::I32(12345)),
    );
    let envelope = Envelope {
        module: 7,
        action: 42,
        kind: ActionKind::Request,
        seq: 1001,
    };

    let bytes = tightbeam::serialize_message(&envelope, &schema, &value).unwrap();
    // varint(7); varint((42<<2)|1 = 169); varint(1001);
    // field (1<<4)|10; len 5; "hello"; field (2<<4)|5;
    // varint(zigzag(12345) = 24690); field-stop.
    assert_eq!(
        bytes,
        vec![
            0x07, 0xA9, 0x01, 0xE9, 0x07, // envelope
            0x1A, 0x05, b'h', b'e', b'l', b'l', b'o', // field 1
            0x25, 0xF2, 0xC0, 0x01, // field 2
            0x01, // stop
        ]
    );

    let (decoded_env, decoded) =
        tightbeam::deserialize_message(&bytes, &schema).unwrap();
    assert_eq!(decoded_env, envelope);
    assert_eq!(decoded.unwrap(), value);
}

#[test]
fn test_empty_struct_is_one_byte_past_the_envelope() {
    let schema = Schema::from(StructSchema::builder().build());
    let envelope = Envelope {
        module: 1,
        action: 2,
        kind: ActionKind::Response,
        seq: 3,
    };
    let with_payload =
        tightbeam::serialize_message(&envelope, &schema, &Value::Struct(StructValue::new()))
            .unwrap();

    let mut envelope_only = tightbeam::BinaryWriter::new(Vec::new());
    tightbeam::ProtocolWrite::write_envelope(&mut envelope_only, &envelope).unwrap();
    assert_eq!(with_payload.len(), envelope_only.into_inner().len() + 1);
}

// =========================================================================
// Text protocol
// =========================================================================

#[test]
fn test_text_round_trip() {
    init_tracing();
    // Binary fields cannot travel in text, so use a shape without them.
    let schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::String)
            .field(2, Schema::I32)
            .field(3, Schema::list(Schema::Double))
            .build(),
    );
    let value = Value::Struct(
        StructValue::new()
            .with(1, "semi;colon\\ish")
            .with(2, Value::I32(-5))
            .with(3, Value::List(vec![Value::Double(0.25), Value::Double(8.0)])),
    );
    let text = tightbeam::serialize_text(&schema, &value).unwrap();
    let decoded = tightbeam::deserialize_text(&text, &schema).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_text_refuses_binary_payloads() {
    let schema = Schema::from(
        StructSchema::builder().field(1, Schema::Binary).build(),
    );
    let value = Value::Struct(StructValue::new().with(1, Value::Binary(vec![1])));
    assert!(tightbeam::serialize_text(&schema, &value).is_err());
}

#[test]
fn test_text_and_binary_are_not_interchangeable() {
    let schema = Schema::from(
        StructSchema::builder()
            .field(1, Schema::String)
            .field(2, Schema::I32)
            .build(),
    );
    let value = Value::Struct(
        StructValue::new().with(1, "hello").with(2, Value::I32(12345)),
    );

    // Text rendering pushed through the binary reader must not yield
    // the original message.
    let text = tightbeam::serialize_text(&schema, &value).unwrap();
    match tightbeam::deserialize(text.as_bytes(), &schema) {
        Err(_) => {}
        Ok(decoded) => assert_ne!(decoded, Some(value.clone())),
    }

    // And binary bytes are not even a token stream: they are either
    // invalid UTF-8 or parse to something else entirely.
    let bytes = tightbeam::serialize(&schema, &value).unwrap();
    if let Ok(as_text) = std::str::from_utf8(&bytes) {
        match tightbeam::deserialize_text(as_text, &schema) {
            Err(_) => {}
            Ok(decoded) => assert_ne!(decoded, Some(value)),
        }
    }
}
