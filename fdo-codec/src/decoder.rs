//! Bytes → Model (spec §4.6, component C6).

use fdo_dict::{AtomDictionary, ValueType};
use fdo_model::{Argument, AtomNode, Stream};
use log::{trace, warn};

use crate::errors::{DecodeError, DecodeResult};
use crate::style::{decode_length, split_header_byte, StyleKind};

/// Decode a complete top-level stream: records run until `bytes` is exhausted
/// (its length is "carried by its container", spec §6).
pub fn decode_stream(bytes: &[u8], dict: &AtomDictionary) -> DecodeResult<Stream> {
    decode_records(bytes, dict, 0, false)
}

fn decode_records(
    bytes: &[u8],
    dict: &AtomDictionary,
    base_offset: usize,
    bounded: bool,
) -> DecodeResult<Stream> {
    let mut atoms = Vec::new();
    let mut cursor = 0;
    while cursor < bytes.len() {
        if bytes.len() - cursor < 2 {
            return Err(if bounded {
                DecodeError::TrailingBytes {
                    offset: base_offset + cursor,
                    extra: bytes.len() - cursor,
                }
            } else {
                DecodeError::UnexpectedEof {
                    offset: base_offset + cursor,
                }
            });
        }
        let (atom, consumed) = decode_record(&bytes[cursor..], dict, base_offset + cursor)?;
        atoms.push(atom);
        cursor += consumed;
    }
    Ok(Stream::new(atoms))
}

fn decode_record(
    slice: &[u8],
    dict: &AtomDictionary,
    offset: usize,
) -> DecodeResult<(AtomNode, usize)> {
    let header = slice[0];
    let (style, protocol) = split_header_byte(header);
    let atom_code = *slice
        .get(1)
        .ok_or(DecodeError::UnexpectedEof { offset: offset + 1 })?;

    match style {
        StyleKind::Empty => {
            let atom = build_atom(dict, protocol, atom_code, &[], offset)?;
            Ok((atom, 2))
        }
        StyleKind::InlineByte => {
            let byte = *slice
                .get(2)
                .ok_or(DecodeError::UnexpectedEof { offset: offset + 2 })?;
            let atom = build_atom(dict, protocol, atom_code, &[byte], offset)?;
            Ok((atom, 3))
        }
        StyleKind::Full => {
            let rest = &slice[2..];
            let (len, len_width) =
                decode_length(rest).ok_or(DecodeError::UnexpectedEof { offset: offset + 2 })?;
            let payload_start = 2 + len_width;
            let payload = slice
                .get(payload_start..payload_start + len)
                .ok_or(DecodeError::UnexpectedEof {
                    offset: offset + payload_start,
                })?;
            let atom = build_atom(dict, protocol, atom_code, payload, offset)?;
            Ok((atom, payload_start + len))
        }
        StyleKind::Reserved(tag) => Err(DecodeError::UnknownStyle { style: tag, offset }),
    }
}

fn build_atom(
    dict: &AtomDictionary,
    protocol: u8,
    atom_code: u8,
    payload: &[u8],
    offset: usize,
) -> DecodeResult<AtomNode> {
    match dict.lookup_by_code(protocol, atom_code) {
        Some(def) => {
            trace!("{}: decoding {} byte payload", def.name, payload.len());
            let def = def.clone();
            let args = decode_payload(&def, payload, dict, offset)?;
            Ok(AtomNode::new(def.name.to_string(), Some(def)).with_arguments(args))
        }
        None => {
            warn!("unknown atom (proto {protocol}, atom {atom_code}); falling back to raw hex");
            let name = AtomDictionary::fallback_name(protocol, atom_code);
            Ok(AtomNode::new(name, None).with_arguments(vec![Argument::Hex(payload.to_vec())]))
        }
    }
}

fn malformed(
    protocol: u8,
    atom_code: u8,
    offset: usize,
    message: impl Into<String>,
) -> DecodeError {
    DecodeError::MalformedPayload {
        protocol,
        atom_code,
        offset,
        message: message.into(),
    }
}

fn be_bytes_to_i64(bytes: &[u8]) -> i64 {
    let mut value: i64 = 0;
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    value
}

fn be_bytes_to_u64(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    for &b in bytes {
        value = (value << 8) | b as u64;
    }
    value
}

fn decode_payload(
    def: &fdo_dict::AtomDefinition,
    payload: &[u8],
    dict: &AtomDictionary,
    offset: usize,
) -> DecodeResult<Vec<Argument>> {
    use ValueType::*;
    match def.value_type {
        None => {
            if payload.is_empty() {
                Ok(Vec::new())
            } else {
                Err(malformed(def.protocol, def.atom_code, offset, "expected an empty payload"))
            }
        }
        Byte | Word | LongWord => {
            let width = def.value_type.fixed_width().unwrap();
            if payload.len() != width {
                return Err(malformed(
                    def.protocol,
                    def.atom_code,
                    offset,
                    format!("expected a {width}-byte payload, found {}", payload.len()),
                ));
            }
            Ok(vec![Argument::Number(be_bytes_to_i64(payload))])
        }
        String => {
            let s = std::str::from_utf8(payload)
                .map_err(|_| malformed(def.protocol, def.atom_code, offset, "invalid utf-8"))?;
            Ok(vec![Argument::String(s.to_string())])
        }
        Variable => Ok(vec![Argument::Hex(payload.to_vec())]),
        Enum | BitSet | Piped => {
            let width = def.resolved_code_width();
            if payload.len() != width {
                return Err(malformed(
                    def.protocol,
                    def.atom_code,
                    offset,
                    format!("expected a {width}-byte code, found {}", payload.len()),
                ));
            }
            let code = be_bytes_to_i64(payload);
            match def.enum_table.as_ref().and_then(|t| t.name_for(code)) {
                Some(sym) => Ok(vec![Argument::Identifier(sym.to_string())]),
                Option::None => Ok(vec![Argument::Number(code)]),
            }
        }
        Gid => {
            let width = def.code_width.unwrap_or(4);
            if payload.len() != width {
                return Err(malformed(
                    def.protocol,
                    def.atom_code,
                    offset,
                    format!("expected a {width}-byte gid, found {}", payload.len()),
                ));
            }
            Ok(vec![Argument::Gid(be_bytes_to_u64(payload))])
        }
        ObjectType => {
            if payload.len() < 2 {
                return Err(malformed(
                    def.protocol,
                    def.atom_code,
                    offset,
                    "object_type payload shorter than the 2-byte type code",
                ));
            }
            let code = be_bytes_to_i64(&payload[..2]);
            let type_name = def
                .enum_table
                .as_ref()
                .and_then(|t| t.name_for(code))
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("type{code}"));
            let title = std::str::from_utf8(&payload[2..])
                .map_err(|_| malformed(def.protocol, def.atom_code, offset, "invalid utf-8 title"))?
                .to_string();
            Ok(vec![Argument::ObjectType { type_name, title }])
        }
        List => decode_list(def, payload, offset),
        NestedStream => {
            let inner = decode_records(payload, dict, offset, true)?;
            Ok(vec![Argument::NestedStream(inner)])
        }
    }
}

fn decode_list(
    def: &fdo_dict::AtomDefinition,
    payload: &[u8],
    offset: usize,
) -> DecodeResult<Vec<Argument>> {
    let schema = def.list_schema.as_ref().ok_or_else(|| {
        malformed(def.protocol, def.atom_code, offset, "atom has no list_schema")
    })?;
    let mut elements = Vec::with_capacity(schema.len());
    let mut cursor = 0;
    for (index, value_type) in schema.iter().enumerate() {
        let is_last = index + 1 == schema.len();
        match value_type {
            ValueType::String => {
                let bytes = &payload[cursor..];
                let s = std::str::from_utf8(bytes).map_err(|_| {
                    malformed(def.protocol, def.atom_code, offset, "invalid utf-8 in list element")
                })?;
                elements.push(Argument::String(s.to_string()));
                cursor = payload.len();
                if !is_last {
                    return Err(malformed(
                        def.protocol,
                        def.atom_code,
                        offset,
                        "string list element must be last",
                    ));
                }
            }
            ValueType::Byte | ValueType::Word | ValueType::LongWord => {
                let width = value_type.fixed_width().unwrap();
                let slice = payload.get(cursor..cursor + width).ok_or_else(|| {
                    malformed(def.protocol, def.atom_code, offset, "list payload too short")
                })?;
                // A single byte in the A-Z range is the "letter" half of a
                // letter+string list (spec §4.7); wider fields or non-letter
                // bytes are plain numbers.
                if width == 1 && slice[0].is_ascii_uppercase() {
                    elements.push(Argument::Identifier((slice[0] as char).to_string()));
                } else {
                    elements.push(Argument::Number(be_bytes_to_i64(slice)));
                }
                cursor += width;
            }
            other => {
                return Err(malformed(
                    def.protocol,
                    def.atom_code,
                    offset,
                    format!("unsupported list element type {other:?}"),
                ))
            }
        }
    }
    if cursor != payload.len() {
        return Err(malformed(
            def.protocol,
            def.atom_code,
            offset,
            "list payload has trailing bytes beyond its schema",
        ));
    }
    Ok(vec![Argument::List(elements)])
}
