use fdo_dict::{AtomDefinition, AtomDictionary, DictError, ValueType};

#[test]
fn sample_dictionary_resolves_by_name_and_by_code() {
    let dict = AtomDictionary::sample();

    let def = dict.lookup_by_name("mat_trigger_style").expect("known atom");
    assert_eq!(def.proto_atom(), (16, 88));

    let by_code = dict.lookup_by_code(16, 88).expect("known code");
    assert_eq!(by_code.name, "mat_trigger_style");

    assert!(dict.lookup_by_name("not_an_atom").is_none());
    assert!(dict.lookup_by_code(31, 255).is_none());
}

#[test]
fn duplicate_proto_atom_pair_is_rejected() {
    let entries = vec![
        AtomDefinition::new("a", 1, 1, ValueType::None),
        AtomDefinition::new("b", 1, 1, ValueType::None),
    ];
    let err = AtomDictionary::from_entries(entries).unwrap_err();
    assert!(matches!(err, DictError::DuplicateCode(1, 1, _, _)));
}

#[test]
fn duplicate_name_is_rejected() {
    let entries = vec![
        AtomDefinition::new("a", 1, 1, ValueType::None),
        AtomDefinition::new("a", 1, 2, ValueType::None),
    ];
    let err = AtomDictionary::from_entries(entries).unwrap_err();
    assert!(matches!(err, DictError::DuplicateName(_)));
}

#[test]
fn protocol_out_of_range_is_rejected() {
    let entries = vec![AtomDefinition {
        protocol: 32,
        ..AtomDefinition::new("bad", 0, 1, ValueType::None)
    }];
    let err = AtomDictionary::from_entries(entries).unwrap_err();
    assert!(matches!(err, DictError::ProtocolOutOfRange(32)));
}

#[test]
fn enum_table_round_trips_symbols() {
    let dict = AtomDictionary::sample();
    let def = dict.lookup_by_name("mat_frame_style").unwrap();
    let table = def.enum_table.as_ref().unwrap();
    assert_eq!(table.code_for("double_line"), Some(5));
    assert_eq!(table.name_for(5), Some("double_line"));
    assert_eq!(table.code_for("unknown_symbol"), None);
}

#[test]
fn fallback_name_round_trips() {
    let name = AtomDictionary::fallback_name(9, 200);
    assert_eq!(name, "proto9_atom200");
    assert_eq!(AtomDictionary::parse_fallback_name(&name), Some((9, 200)));
    assert_eq!(AtomDictionary::parse_fallback_name("not_fallback"), None);
    assert_eq!(AtomDictionary::parse_fallback_name("proto40_atom1"), None);
}

#[test]
fn list_schema_is_preserved() {
    let dict = AtomDictionary::sample();
    let def = dict.lookup_by_name("ind_letter").unwrap();
    assert_eq!(
        def.list_schema.as_ref().unwrap(),
        &vec![ValueType::Byte, ValueType::String]
    );
}
