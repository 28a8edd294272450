use fdo_codec::{decode_stream, encode_stream, DecodeError, EncodeError};
use fdo_dict::AtomDictionary;
use fdo_model::{Argument, AtomNode, Stream};

fn dict() -> AtomDictionary {
    AtomDictionary::sample()
}

fn atom(dict: &AtomDictionary, name: &str, args: Vec<Argument>) -> AtomNode {
    let def = dict.lookup_by_name(name).unwrap().clone();
    AtomNode::new(name, Some(def)).with_arguments(args)
}

#[test]
fn scenario_1_mat_trigger_style_picture() {
    let dict = dict();
    let stream = Stream::new(vec![atom(
        &dict,
        "mat_trigger_style",
        vec![Argument::Identifier("picture".into())],
    )]);
    let bytes = encode_stream(&stream).unwrap();
    assert_eq!(bytes, vec![0x10, 0x58, 0x02, 0x00, 0x03]);

    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded, stream);
}

#[test]
fn scenario_2_mat_frame_style_double_line() {
    let dict = dict();
    let stream = Stream::new(vec![atom(
        &dict,
        "mat_frame_style",
        vec![Argument::Identifier("double_line".into())],
    )]);
    let bytes = encode_stream(&stream).unwrap();
    assert_eq!(bytes, vec![0x10, 0x57, 0x02, 0x00, 0x05]);
}

#[test]
fn scenario_3_empty_argument_atom_is_compact() {
    let dict = dict();
    let stream = Stream::new(vec![atom(&dict, "fm_start", vec![])]);
    let bytes = encode_stream(&stream).unwrap();
    // style=Empty(1), protocol=16 -> header 0b001_10000 = 0x30; atom_code=1.
    assert_eq!(bytes, vec![0x30, 0x01]);
    assert_eq!(bytes.len(), 2);

    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded, stream);
}

#[test]
fn scenario_4_nested_action_round_trips() {
    let dict = dict();
    let inner = Stream::new(vec![
        atom(&dict, "uni_start_stream", vec![]),
        atom(&dict, "fd_open", vec![Argument::String("X".into())]),
        atom(&dict, "uni_end_stream", vec![]),
    ]);
    let outer = Stream::new(vec![atom(
        &dict,
        "act_replace_select_action",
        vec![Argument::NestedStream(inner.clone())],
    )]);

    let bytes = encode_stream(&outer).unwrap();
    // FULL style header for protocol 18 (0b000_10010 = 0x12), atom_code 3,
    // then a length byte and the inner stream's own bytes.
    assert_eq!(bytes[0], 0x12);
    assert_eq!(bytes[1], 0x03);
    let inner_bytes = encode_stream(&inner).unwrap();
    assert_eq!(bytes[2] as usize, inner_bytes.len());
    assert_eq!(&bytes[3..], &inner_bytes[..]);

    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded, outer);
}

#[test]
fn scenario_5_object_type_with_and_without_title() {
    let dict = dict();
    let with_title = Stream::new(vec![atom(
        &dict,
        "ind_group",
        vec![Argument::ObjectType {
            type_name: "button".into(),
            title: "Title".into(),
        }],
    )]);
    let bytes = encode_stream(&with_title).unwrap();
    assert_eq!(decode_stream(&bytes, &dict).unwrap(), with_title);

    let without_title = Stream::new(vec![atom(
        &dict,
        "ind_group",
        vec![Argument::ObjectType {
            type_name: "button".into(),
            title: String::new(),
        }],
    )]);
    let bytes = encode_stream(&without_title).unwrap();
    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded, without_title);
}

#[test]
fn scenario_6_letter_and_string_list_round_trips() {
    let dict = dict();
    let stream = Stream::new(vec![atom(
        &dict,
        "ind_letter",
        vec![Argument::List(vec![
            Argument::Identifier("B".into()),
            Argument::String("text".into()),
        ])],
    )]);
    let bytes = encode_stream(&stream).unwrap();
    // header, atom_code, length byte, then the letter-tight payload.
    assert_eq!(bytes[2], 5);
    assert_eq!(bytes[3], b'B');
    assert_eq!(&bytes[4..], b"text");

    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded, stream);
}

#[test]
fn unknown_atom_decodes_to_hex_fallback() {
    let dict = dict();
    // style=Full(0), protocol=20 -> 0x14; atom_code=9; len=2; payload DE AD.
    let bytes = vec![0x14, 0x09, 0x02, 0xDE, 0xAD];
    let decoded = decode_stream(&bytes, &dict).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(decoded.atoms[0].is_unknown());
    assert_eq!(decoded.atoms[0].name, "proto20_atom9");
    assert_eq!(decoded.atoms[0].arguments, vec![Argument::Hex(vec![0xDE, 0xAD])]);
}

#[test]
fn encoding_unknown_atom_fails() {
    let stream = Stream::new(vec![AtomNode::new("mystery_atom", None)]);
    let err = encode_stream(&stream).unwrap_err();
    assert!(matches!(err, EncodeError::UnknownAtom(ref name) if name == "mystery_atom"));
}

#[test]
fn unknown_style_byte_is_rejected() {
    let dict = dict();
    let bytes = vec![0b101_00000, 0x01]; // style tag 5, reserved.
    let err = decode_stream(&bytes, &dict).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownStyle { style: 5, .. }));
}

#[test]
fn truncated_record_is_unexpected_eof() {
    let dict = dict();
    let bytes = vec![0x10]; // header only, missing atom_code byte.
    let err = decode_stream(&bytes, &dict).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
}

#[test]
fn trailing_bytes_inside_nested_stream_are_rejected() {
    let dict = dict();
    // Empty-style fm_start record (2 bytes) followed by one stray byte inside
    // a nested payload of declared length 3.
    let nested_payload = vec![0x30, 0x01, 0xFF];
    let mut bytes = vec![0x12, 0x03, nested_payload.len() as u8];
    bytes.extend_from_slice(&nested_payload);
    let err = decode_stream(&bytes, &dict).unwrap_err();
    assert!(matches!(err, DecodeError::TrailingBytes { .. }));
}

#[test]
fn payload_too_long_is_rejected() {
    let dict = dict();
    let huge = "x".repeat(40_000);
    let stream = Stream::new(vec![atom(&dict, "fd_open", vec![Argument::String(huge)])]);
    let err = encode_stream(&stream).unwrap_err();
    assert!(matches!(err, EncodeError::PayloadTooLong { .. }));
}
