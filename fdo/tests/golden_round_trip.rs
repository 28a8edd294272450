use fdo::{AtomDictionary, Compiler, Decompiler};

fn dict() -> AtomDictionary {
    AtomDictionary::sample()
}

#[test]
fn scenario_1_mat_trigger_style() {
    let _ = env_logger::try_init();
    let compiler = Compiler::new(dict());
    let bytes = compiler.compile("mat_trigger_style <picture>\n").unwrap();
    assert_eq!(bytes, vec![0x10, 0x58, 0x02, 0x00, 0x03]);

    let decompiler = Decompiler::new(dict());
    let text = decompiler.decompile(&bytes).unwrap();
    assert_eq!(text, "mat_trigger_style <picture>\n");
}

#[test]
fn scenario_2_mat_frame_style() {
    let compiler = Compiler::new(dict());
    let bytes = compiler.compile("mat_frame_style <double_line>\n").unwrap();
    assert_eq!(bytes, vec![0x10, 0x57, 0x02, 0x00, 0x05]);
}

#[test]
fn text_round_trips_through_binary() {
    let source = "fm_start\nind_group <button, \"Title\">\nfm_end\n";
    let compiler = Compiler::new(dict());
    let decompiler = Decompiler::new(dict());

    let bytes = compiler.compile(source).unwrap();
    let recovered = decompiler.decompile(&bytes).unwrap();
    assert_eq!(recovered, source);

    let bytes_again = compiler.compile(&recovered).unwrap();
    assert_eq!(bytes_again, bytes);
}

#[test]
fn nested_stream_round_trips() {
    let source = "act_replace_select_action <\n    uni_start_stream\n    fd_open <\"X\">\n    uni_end_stream\n>\n";
    let compiler = Compiler::new(dict());
    let decompiler = Decompiler::new(dict());

    let bytes = compiler.compile(source).unwrap();
    let recovered = decompiler.decompile(&bytes).unwrap();
    let bytes_again = compiler.compile(&recovered).unwrap();
    assert_eq!(bytes_again, bytes);
}

#[test]
fn enum_round_trips_every_declared_symbol() {
    let compiler = Compiler::new(dict());
    let decompiler = Decompiler::new(dict());
    for symbol in ["normal", "picture", "icon"] {
        let source = format!("mat_trigger_style <{symbol}>\n");
        let bytes = compiler.compile(&source).unwrap();
        let text = decompiler.decompile(&bytes).unwrap();
        assert!(text.contains(symbol));
    }
}

#[test]
fn unknown_atom_fallback_round_trips() {
    let bytes = vec![0x14, 0x09, 0x02, 0xDE, 0xAD];
    let decompiler = Decompiler::new(dict());
    let text = decompiler.decompile(&bytes).unwrap();
    assert_eq!(text, "proto20_atom9 <0xdead>\n");

    let compiler = Compiler::new(dict());
    let bytes_again = compiler.compile(&text).unwrap();
    assert_eq!(bytes_again, bytes);
}

#[test]
fn empty_argument_atom_is_the_compact_single_style() {
    let compiler = Compiler::new(dict());
    let bytes = compiler.compile("fm_start\n").unwrap();
    assert_eq!(bytes.len(), 2);
}

#[test]
fn compile_surfaces_unknown_atom_errors() {
    let compiler = Compiler::new(dict());
    assert!(compiler.compile("not_a_real_atom\n").is_err());
}
