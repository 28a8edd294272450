use fdo_dict::AtomDictionary;
use fdo_model::{Argument, AtomNode, Stream};

#[test]
fn streams_compare_structurally() {
    let dict = AtomDictionary::sample();
    let def = dict.lookup_by_name("fm_start").cloned();

    let a = Stream::new(vec![AtomNode::new("fm_start", def.clone())]);
    let b = Stream::new(vec![AtomNode::new("fm_start", def)]);
    assert_eq!(a, b);

    let c = Stream::new(vec![AtomNode::new("fm_end", None)]);
    assert_ne!(a, c);
}

#[test]
fn unknown_atom_has_no_definition() {
    let node = AtomNode::new("proto9_atom200", None)
        .with_arguments(vec![Argument::Hex(vec![0xde, 0xad])]);
    assert!(node.is_unknown());
    assert_eq!(node.protocol_and_code(), None);
}

#[test]
fn nested_stream_argument_owns_inner_stream() {
    let inner = Stream::new(vec![AtomNode::new("uni_start_stream", None)]);
    let outer = AtomNode::new("act_replace_select_action", None)
        .with_arguments(vec![Argument::NestedStream(inner.clone())]);

    match &outer.arguments[0] {
        Argument::NestedStream(s) => assert_eq!(s, &inner),
        other => panic!("expected nested stream, got {other:?}"),
    }
}

#[test]
fn stream_collects_from_iterator() {
    let stream: Stream = vec![AtomNode::new("a", None), AtomNode::new("b", None)]
        .into_iter()
        .collect();
    assert_eq!(stream.len(), 2);
    assert!(!stream.is_empty());
}
