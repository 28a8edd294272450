//! AST/Model → bytes (spec §4.5, component C5).

use fdo_dict::{AtomDefinition, AtomDictionary, ValueType};
use fdo_model::{Argument, AtomNode, Stream};
use log::trace;

use crate::errors::{EncodeError, EncodeResult};
use crate::style::{encode_length, StyleKind};

/// Encode a complete stream as the concatenation of its atoms' records.
pub fn encode_stream(stream: &Stream) -> EncodeResult<Vec<u8>> {
    let mut out = Vec::new();
    for atom in stream.iter() {
        encode_atom(atom, &mut out)?;
    }
    Ok(out)
}

fn encode_atom(atom: &AtomNode, out: &mut Vec<u8>) -> EncodeResult<()> {
    match &atom.definition {
        Some(def) => {
            let payload = encode_payload(def, &atom.arguments)?;
            emit_record(&atom.name, def.protocol, def.atom_code, &payload, out)
        }
        None => encode_fallback_atom(atom, out),
    }
}

/// An atom with no bound definition is only legal if it carries the
/// `proto<N>_atom<M>` fallback shape produced by the decoder (spec §4.6,
/// §9): a single opaque `Hex` payload round-tripped verbatim.
fn encode_fallback_atom(atom: &AtomNode, out: &mut Vec<u8>) -> EncodeResult<()> {
    let (protocol, atom_code) = AtomDictionary::parse_fallback_name(&atom.name)
        .ok_or_else(|| EncodeError::UnknownAtom(atom.name.clone()))?;
    let payload = match atom.arguments.as_slice() {
        [Argument::Hex(bytes)] => bytes.clone(),
        _ => {
            return Err(EncodeError::ArgumentTypeMismatch {
                atom: atom.name.clone(),
                message: "unknown-atom fallback requires a single hex payload".into(),
            })
        }
    };
    emit_record(&atom.name, protocol, atom_code, &payload, out)
}

/// Pick the narrowest style that fits `payload` exactly, per the priority
/// order implied by spec §9 (narrowest first, `Full` as the catch-all).
fn emit_record(
    atom_name: &str,
    protocol: u8,
    atom_code: u8,
    payload: &[u8],
    out: &mut Vec<u8>,
) -> EncodeResult<()> {
    match payload.len() {
        0 => {
            trace!("{atom_name}: empty payload, style=Empty");
            out.push(StyleKind::Empty.header_byte(protocol));
            out.push(atom_code);
        }
        1 => {
            trace!("{atom_name}: 1-byte payload, style=InlineByte");
            out.push(StyleKind::InlineByte.header_byte(protocol));
            out.push(atom_code);
            out.push(payload[0]);
        }
        len => {
            trace!("{atom_name}: {len}-byte payload, style=Full");
            out.push(StyleKind::Full.header_byte(protocol));
            out.push(atom_code);
            encode_length(len, out).ok_or(EncodeError::PayloadTooLong {
                atom: atom_name.to_string(),
                len,
            })?;
            out.extend_from_slice(payload);
        }
    }
    Ok(())
}

fn encode_payload(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    use ValueType::*;
    match def.value_type {
        None => Ok(Vec::new()),
        Byte => encode_scalar(def, args, 1),
        Word => encode_scalar(def, args, 2),
        LongWord => encode_scalar(def, args, 4),
        String => encode_string(def, args),
        Variable => encode_variable(def, args),
        Enum | BitSet | Piped => encode_enum_like(def, args, def.resolved_code_width()),
        Gid => encode_gid(def, args),
        ObjectType => encode_object_type(def, args),
        List => encode_list(def, args),
        NestedStream => encode_nested(def, args),
    }
}

fn single_arg<'a>(def: &AtomDefinition, args: &'a [Argument]) -> EncodeResult<&'a Argument> {
    if args.len() != 1 {
        return Err(EncodeError::ArgumentTypeMismatch {
            atom: def.name.to_string(),
            message: format!("expected exactly one argument, found {}", args.len()),
        });
    }
    Ok(&args[0])
}

fn mismatch(def: &AtomDefinition, message: impl Into<String>) -> EncodeError {
    EncodeError::ArgumentTypeMismatch {
        atom: def.name.to_string(),
        message: message.into(),
    }
}

fn int_to_be_bytes(value: i64, width: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[8 - width..].to_vec()
}

fn hex_to_width(def: &AtomDefinition, bytes: &[u8], width: usize) -> EncodeResult<Vec<u8>> {
    if bytes.len() > width {
        return Err(mismatch(
            def,
            format!("hex literal of {} bytes does not fit in {width}", bytes.len()),
        ));
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(bytes);
    Ok(padded)
}

fn encode_scalar(def: &AtomDefinition, args: &[Argument], width: usize) -> EncodeResult<Vec<u8>> {
    match single_arg(def, args)? {
        Argument::Number(n) => Ok(int_to_be_bytes(*n, width)),
        Argument::Hex(bytes) => hex_to_width(def, bytes, width),
        other => Err(mismatch(def, format!("expected a numeric value, found {other:?}"))),
    }
}

fn encode_string(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    match single_arg(def, args)? {
        Argument::String(s) => Ok(s.as_bytes().to_vec()),
        other => Err(mismatch(def, format!("expected a string, found {other:?}"))),
    }
}

fn encode_variable(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    match single_arg(def, args)? {
        Argument::String(s) => Ok(s.as_bytes().to_vec()),
        Argument::Identifier(s) => Ok(s.as_bytes().to_vec()),
        Argument::Number(n) => Ok(int_to_be_bytes(*n, def.resolved_code_width())),
        Argument::Hex(bytes) => Ok(bytes.clone()),
        other => Err(mismatch(def, format!("unsupported variable value {other:?}"))),
    }
}

fn resolve_code(def: &AtomDefinition, arg: &Argument) -> EncodeResult<i64> {
    match arg {
        Argument::Number(n) => Ok(*n),
        Argument::Identifier(sym) => def
            .enum_table
            .as_ref()
            .and_then(|table| table.code_for(sym))
            .ok_or_else(|| EncodeError::EnumOutOfRange {
                atom: def.name.to_string(),
                value: sym.clone(),
            }),
        other => Err(mismatch(def, format!("expected an enum symbol or number, found {other:?}"))),
    }
}

fn encode_enum_like(def: &AtomDefinition, args: &[Argument], width: usize) -> EncodeResult<Vec<u8>> {
    let code = match single_arg(def, args)? {
        Argument::Piped(elements) => {
            let mut acc: i64 = 0;
            for element in elements {
                acc |= resolve_code(def, element)?;
            }
            acc
        }
        other => resolve_code(def, other)?,
    };
    Ok(int_to_be_bytes(code, width))
}

fn encode_gid(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    let width = def.code_width.unwrap_or(4);
    match single_arg(def, args)? {
        Argument::Gid(n) => Ok(int_to_be_bytes(*n as i64, width)),
        Argument::Number(n) => Ok(int_to_be_bytes(*n, width)),
        Argument::Hex(bytes) => hex_to_width(def, bytes, width),
        other => Err(mismatch(def, format!("expected a gid, found {other:?}"))),
    }
}

fn encode_object_type(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    match single_arg(def, args)? {
        Argument::ObjectType { type_name, title } => {
            let code = def
                .enum_table
                .as_ref()
                .and_then(|table| table.code_for(type_name))
                .ok_or_else(|| EncodeError::EnumOutOfRange {
                    atom: def.name.to_string(),
                    value: type_name.clone(),
                })?;
            let mut out = int_to_be_bytes(code, 2);
            out.extend_from_slice(title.as_bytes());
            Ok(out)
        }
        other => Err(mismatch(def, format!("expected an object_type argument, found {other:?}"))),
    }
}

fn encode_list(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    let schema = def
        .list_schema
        .as_ref()
        .ok_or_else(|| mismatch(def, "atom has no list_schema"))?;
    let elements = match single_arg(def, args)? {
        Argument::List(elements) => elements,
        other => return Err(mismatch(def, format!("expected a list, found {other:?}"))),
    };
    if elements.len() != schema.len() {
        return Err(mismatch(
            def,
            format!("list has {} elements, schema expects {}", elements.len(), schema.len()),
        ));
    }
    let mut out = Vec::new();
    for (element, value_type) in elements.iter().zip(schema.iter()) {
        match value_type {
            ValueType::String => match element {
                Argument::String(s) => out.extend_from_slice(s.as_bytes()),
                other => return Err(mismatch(def, format!("expected a string list element, found {other:?}"))),
            },
            ValueType::Byte | ValueType::Word | ValueType::LongWord => {
                let width = value_type.fixed_width().unwrap();
                match element {
                    Argument::Number(n) => out.extend_from_slice(&int_to_be_bytes(*n, width)),
                    Argument::Identifier(s) if s.len() == 1 => {
                        out.extend_from_slice(&int_to_be_bytes(s.as_bytes()[0] as i64, width))
                    }
                    Argument::Hex(bytes) => out.extend_from_slice(&hex_to_width(def, bytes, width)?),
                    other => return Err(mismatch(def, format!("expected a scalar list element, found {other:?}"))),
                }
            }
            other_type => {
                return Err(mismatch(def, format!("unsupported list element type {other_type:?}")))
            }
        }
    }
    Ok(out)
}

fn encode_nested(def: &AtomDefinition, args: &[Argument]) -> EncodeResult<Vec<u8>> {
    match single_arg(def, args)? {
        Argument::NestedStream(inner) => encode_stream(inner),
        other => Err(mismatch(def, format!("expected a nested stream, found {other:?}"))),
    }
}
