//! End-to-end tests: JSON documents in, protobuf wire bytes out.

mod common;

use common::{read_fields, Field, Reader};
use looseproto::{
    convert, convert_json, convert_to_hex, convert_with, encode_bytes, encode_string, encode_tag,
    encode_uint32, encode_varint, EncodeOptions, Error, Overrides, Value, WireType,
};
use serde_json::json;

fn tree(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn golden(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap()
}

#[test]
fn test_varint_roundtrip() {
    let samples = [
        0u64,
        1,
        127,
        128,
        300,
        16_383,
        16_384,
        u32::MAX as u64,
        1 << 35,
        u64::MAX - 1,
        u64::MAX,
    ];
    for v in samples {
        let encoded = encode_varint(v);
        let mut reader = Reader::new(&encoded);
        assert_eq!(reader.read_varint64(), Some(v), "value {}", v);
        assert!(!reader.has_more());
    }
}

#[test]
fn test_varint_edge_cases() {
    assert_eq!(encode_varint(0), vec![0x00]);
    assert_eq!(encode_varint(127), vec![0x7f]);
    assert_eq!(encode_varint(128), vec![0x80, 0x01]);
    assert_eq!(encode_varint(300), vec![0xac, 0x02]);
}

#[test]
fn test_tag_roundtrip() {
    for field_number in [0u32, 1, 15, 16, 2047, 2048, 1 << 28, u32::MAX] {
        for wire_type in [WireType::Varint, WireType::Bytes] {
            let encoded = encode_tag(field_number, wire_type);
            let raw = Reader::new(&encoded).read_varint64().unwrap();
            assert_eq!(raw >> 3, u64::from(field_number));
            assert_eq!(raw & 0x07, wire_type as u64);
        }
    }
}

#[test]
fn test_string_field() {
    assert_eq!(encode_string(1, "a"), vec![0x0a, 0x01, 0x61]);
}

#[test]
fn test_scalars_golden() {
    let bytes = convert(&tree(json!({"1": "hello", "2": 5})), None).unwrap();
    assert_eq!(bytes, golden("0a0568656c6c6f1005"));

    let mut expected = encode_string(1, "hello");
    expected.extend(encode_uint32(2, 5));
    assert_eq!(bytes, expected);
}

#[test]
fn test_nested_message_golden() {
    let bytes = convert(&tree(json!({"3": {"1": "x"}})), None).unwrap();
    assert_eq!(bytes, golden("1a030a0178"));

    let fields = read_fields(&bytes);
    assert_eq!(fields.len(), 1);
    match &fields[0] {
        Field::Bytes(3, payload) => {
            assert_eq!(read_fields(payload), vec![Field::Bytes(1, b"x".as_slice())]);
        }
        other => panic!("unexpected field {:?}", other),
    }
}

#[test]
fn test_repeated_integers() {
    let bytes = convert(&tree(json!({"5": [1, 2, 3]})), None).unwrap();
    let mut expected = encode_uint32(5, 1);
    expected.extend(encode_uint32(5, 2));
    expected.extend(encode_uint32(5, 3));
    assert_eq!(bytes, expected);
}

#[test]
fn test_override_single_byte() {
    let overrides = Overrides::from_json_str(r#"{"7": 2}"#).unwrap();
    let bytes = convert(&tree(json!({"7": 65})), Some(&overrides)).unwrap();
    assert_eq!(bytes, encode_bytes(7, &[65]));
    assert_ne!(bytes, encode_uint32(7, 65));
}

#[test]
fn test_dot_terminated_override_keys() {
    let overrides = Overrides::from_json_str(r#"{"3.5.": 2}"#).unwrap();
    let bytes = convert(&tree(json!({"3": {"5": 1}})), Some(&overrides)).unwrap();
    assert_eq!(bytes, golden("1a032a0101"));
}

#[test]
fn test_field_order_follows_document() {
    let bytes = convert_json(r#"{"9": 1, "1": 2, "4": 3}"#, None).unwrap();
    let numbers: Vec<u32> = read_fields(&bytes)
        .iter()
        .map(|f| match f {
            Field::Varint(n, _) | Field::Bytes(n, _) => *n,
        })
        .collect();
    assert_eq!(numbers, vec![9, 1, 4]);
}

#[test]
fn test_deterministic() {
    let input = tree(json!({
        "1": "name",
        "2": [{"1": 1}, {"1": 2}],
        "3": {"4": {"5": [7, 8]}},
    }));
    let overrides = Overrides::from_json_str(r#"{"3.4.5": 2}"#).unwrap();
    let first = convert(&input, Some(&overrides)).unwrap();
    let second = convert(&input, Some(&overrides)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_length_prefix_matches_payload() {
    let long_text = "y".repeat(300);
    let input = tree(json!({"1": {"2": long_text.clone(), "3": {"4": [1, 2, 3]}}}));
    let bytes = convert(&input, None).unwrap();

    // A successful full decode means every prefix matched its payload.
    let fields = read_fields(&bytes);
    let Field::Bytes(1, outer) = fields[0] else {
        panic!("expected length-delimited field 1");
    };
    assert_eq!(outer.len(), bytes.len() - 3);
    let inner = read_fields(outer);
    assert_eq!(inner[0], Field::Bytes(2, long_text.as_bytes()));
}

#[test]
fn test_realistic_message() {
    // A request with a repeated sub-message and a raw-id field.
    let input = tree(json!({
        "1": "req-42",
        "2": [{"1": "a", "2": 1}, {"1": "b", "2": 2}],
        "3": 255,
    }));
    let overrides = Overrides::from_json_str(r#"{"3": 2, "2.2": 0}"#).unwrap();
    let encoded = convert_to_hex(&input, Some(&overrides)).unwrap();
    assert_eq!(
        encoded,
        "0a067265712d3432\
         1205 0a0161 1001\
         1205 0a0162 1002\
         1a01ff"
            .replace(' ', "")
    );
}

#[test]
fn test_permissive_skips_unsupported() {
    let input = tree(json!({
        "1": true,
        "2": null,
        "3": 1.5,
        "4": ["skipped", 9, [1]],
        "5": "kept",
    }));
    let bytes = convert_with(&input, None, EncodeOptions::permissive()).unwrap();
    assert_eq!(bytes, golden("20092a046b657074"));

    let err = convert(&input, None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedValueType { field_number: 1, .. }));
}

#[test]
fn test_integers_beyond_u64_rejected_in_both_modes() {
    let cases = [
        (r#"{"1": 18446744073709551616, "2": 5}"#, i128::from(u64::MAX) + 1),
        (r#"{"1": -9223372036854775809, "2": 5}"#, i128::from(i64::MIN) - 1),
    ];
    for (doc, expected) in cases {
        let input = Value::from_json_str(doc).unwrap();
        for options in [EncodeOptions::default(), EncodeOptions::permissive()] {
            let err = convert_with(&input, None, options).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInteger { field_number: 1, value } if value == expected),
                "{} with {:?}: {:?}",
                doc,
                options.mode,
                err
            );
        }
        assert!(matches!(
            convert_json(doc, None),
            Err(Error::InvalidInteger { field_number: 1, .. })
        ));
    }
}

#[test]
fn test_u64_max_still_encodes() {
    let bytes = convert_json(r#"{"1": 18446744073709551615}"#, None).unwrap();
    assert_eq!(read_fields(&bytes), vec![Field::Varint(1, u64::MAX)]);
}

#[test]
fn test_conflicting_override_aliases() {
    let err = Overrides::from_json_str(r#"{"3.5": 0, "3.5.": 2}"#).unwrap_err();
    assert!(matches!(err, Error::ConflictingOverride(_)));
}

#[test]
fn test_malformed_key_aborts() {
    let err = convert_json(r#"{"1": "ok", "two": 2}"#, None).unwrap_err();
    assert!(matches!(err, Error::InvalidFieldKey { ref key } if key == "two"));
}

#[test]
fn test_non_mapping_root() {
    let err = convert(&tree(json!([1, 2])), None).unwrap_err();
    assert!(matches!(err, Error::InvalidRoot { kind: "sequence" }));
}

#[test]
fn test_deep_nesting_is_bounded() {
    let mut doc = json!({"1": 1});
    for _ in 0..150 {
        doc = json!({"1": doc});
    }
    let err = convert(&tree(doc.clone()), None).unwrap_err();
    assert!(matches!(err, Error::MaxDepthExceeded { limit: 100 }));

    let options = EncodeOptions::default().with_max_depth(200);
    assert!(convert_with(&tree(doc), None, options).is_ok());
}

#[test]
fn test_invalid_json_input() {
    assert!(matches!(convert_json("{", None), Err(Error::Json(_))));
}
