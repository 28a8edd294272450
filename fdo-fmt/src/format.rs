//! Model → text (spec §4.7, component C7).

use fdo_dict::AtomFlags;
use fdo_model::{Argument, AtomNode, Stream};
use std::fmt::Write;

use crate::emit::{Emit, EmitCtx, EmitError};

impl Emit for AtomNode {
    fn emit<W: Write>(&self, w: &mut W, cx: &mut EmitCtx) -> Result<(), EmitError> {
        let flags = self
            .definition
            .as_ref()
            .map(|d| d.flags)
            .unwrap_or_else(AtomFlags::empty);
        if flags.contains(AtomFlags::OUTDENT) {
            cx.bump_out();
        }
        if flags.contains(AtomFlags::INDENT) {
            cx.bump_in();
        }

        cx.write_indent(w)?;
        w.write_str(&self.name)?;

        match self.arguments.as_slice() {
            [] => {}
            [Argument::NestedStream(inner)] => {
                w.write_str(" <")?;
                w.write_str(cx.newline)?;
                cx.bump_in();
                emit_stream(inner, w, cx)?;
                cx.bump_out();
                cx.write_indent(w)?;
                w.write_char('>')?;
            }
            [single] => {
                write!(w, " <{}>", format_single_arg(single))?;
            }
            _ => unreachable!("an atom carries at most one top-level argument value"),
        }

        w.write_str(cx.newline)?;
        Ok(())
    }
}

pub fn emit_stream<W: Write>(stream: &Stream, w: &mut W, cx: &mut EmitCtx) -> Result<(), EmitError> {
    for atom in stream.iter() {
        atom.emit(w, cx)?;
    }
    Ok(())
}

fn format_single_arg(arg: &Argument) -> String {
    match arg {
        Argument::String(s) => format!("\"{}\"", escape(s)),
        Argument::Number(n) => n.to_string(),
        Argument::Hex(bytes) => format!("0x{}", hex_string(bytes)),
        Argument::Gid(n) => n.to_string(),
        Argument::Identifier(s) => s.clone(),
        Argument::Piped(elements) => elements
            .iter()
            .map(format_primary)
            .collect::<Vec<_>>()
            .join(" | "),
        Argument::List(elements) => format_list(elements),
        Argument::ObjectType { type_name, title } => {
            format!("{type_name}, \"{}\"", escape(title))
        }
        Argument::NestedStream(_) => {
            unreachable!("nested streams are handled by AtomNode::emit directly")
        }
    }
}

fn format_primary(arg: &Argument) -> String {
    format_single_arg(arg)
}

/// Letter+string lists (a single uppercase-letter identifier followed by a
/// string) print with a tight comma; every other list uses `, ` (spec §4.7).
fn format_list(elements: &[Argument]) -> String {
    if let [Argument::Identifier(letter), Argument::String(s)] = elements {
        if letter.chars().count() == 1 && letter.chars().next().unwrap().is_ascii_uppercase() {
            return format!("{letter},\"{}\"", escape(s));
        }
    }
    elements.iter().map(format_primary).collect::<Vec<_>>().join(", ")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
