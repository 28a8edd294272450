//! Static atom dictionary for the FDO form-description codec.
//!
//! An [`AtomDictionary`] is a read-only catalogue mapping atom names to
//! [`AtomDefinition`]s and back from the wire-level `(protocol, atom_code)`
//! pair. It is pure and immutable after construction: every other component
//! (lexer excluded) looks atoms up through it and never mutates it.

use bitflags::bitflags;
use std::collections::HashMap;
use thiserror::Error;

/// Hard bound on stream nesting depth shared by the parser and decoder.
///
/// Not named in the wire format itself; it exists purely to keep recursive
/// descent from blowing the stack on adversarial input.
pub const MAX_NESTING_DEPTH: usize = 128;

bitflags! {
    /// Formatter hints attached to an atom definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AtomFlags: u8 {
        /// Indentation increases *before* this atom is printed.
        const INDENT = 0b0000_0001;
        /// Indentation decreases *before* this atom is printed (floor 0).
        const OUTDENT = 0b0000_0010;
        /// String arguments of this atom are re-escaped on the way out.
        const STRING_ESCAPED = 0b0000_0100;
    }
}

/// Argument grammar shape an atom's schema commits to. The parser consults
/// this *before* reading the argument block to disambiguate the grammar
/// (spec §4.3); the encoder and decoder use it to pick a payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Byte,
    Word,
    LongWord,
    String,
    Variable,
    Enum,
    BitSet,
    Gid,
    ObjectType,
    Piped,
    List,
    NestedStream,
}

impl ValueType {
    /// Fixed wire width in bytes for scalar types, where one exists.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ValueType::Byte => Some(1),
            ValueType::Word => Some(2),
            ValueType::LongWord => Some(4),
            _ => None,
        }
    }
}

/// Bidirectional symbolic-name <-> integer-code table backing `enum` and
/// `bit_set` atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumTable {
    by_name: HashMap<&'static str, i64>,
    by_code: HashMap<i64, &'static str>,
}

impl EnumTable {
    pub fn new(entries: &[(&'static str, i64)]) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_code = HashMap::with_capacity(entries.len());
        for &(name, code) in entries {
            by_name.insert(name, code);
            by_code.insert(code, name);
        }
        EnumTable { by_name, by_code }
    }

    pub fn code_for(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn name_for(&self, code: i64) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }
}

/// Static metadata for one atom: its wire identity, its argument grammar,
/// and the formatter hints that drive indentation.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomDefinition {
    pub name: &'static str,
    pub protocol: u8,
    pub atom_code: u8,
    pub value_type: ValueType,
    pub enum_table: Option<EnumTable>,
    pub flags: AtomFlags,
    /// For `value_type == List`: the per-position element type, e.g.
    /// `[Byte, String]` for a letter+string form such as `B,"text"`.
    pub list_schema: Option<Vec<ValueType>>,
    /// Wire width in bytes for `Enum`/`BitSet`/`Gid` payloads. Defaults to
    /// 2 (word) when unset, matching the "typically word" rule of §4.5.
    pub code_width: Option<usize>,
}

impl AtomDefinition {
    pub fn new(name: &'static str, protocol: u8, atom_code: u8, value_type: ValueType) -> Self {
        assert!(protocol < 32, "protocol must fit in 5 bits");
        AtomDefinition {
            name,
            protocol,
            atom_code,
            value_type,
            enum_table: None,
            flags: AtomFlags::empty(),
            list_schema: None,
            code_width: None,
        }
    }

    pub fn with_enum_table(mut self, table: EnumTable) -> Self {
        self.enum_table = Some(table);
        self
    }

    pub fn with_flags(mut self, flags: AtomFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_list_schema(mut self, schema: Vec<ValueType>) -> Self {
        self.list_schema = Some(schema);
        self
    }

    pub fn with_code_width(mut self, width: usize) -> Self {
        self.code_width = Some(width);
        self
    }

    /// Effective wire width for an `Enum`/`BitSet`/`Gid` payload.
    pub fn resolved_code_width(&self) -> usize {
        self.code_width.unwrap_or(2)
    }

    pub fn proto_atom(&self) -> (u8, u8) {
        (self.protocol, self.atom_code)
    }
}

#[derive(Debug, Error)]
pub enum DictError {
    #[error("duplicate atom name `{0}`")]
    DuplicateName(String),
    #[error("duplicate (protocol, atom_code) pair ({0}, {1}) for `{2}` and `{3}`")]
    DuplicateCode(u8, u8, String, String),
    #[error("protocol {0} does not fit in 5 bits")]
    ProtocolOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, DictError>;

/// Read-only catalogue of [`AtomDefinition`]s, indexed by name and by
/// `(protocol, atom_code)`.
///
/// Construction is the only fallible operation; once built, lookups never
/// fail — they return `None` for an unknown atom, as specified in §4.1.
#[derive(Debug, Clone)]
pub struct AtomDictionary {
    by_name: HashMap<&'static str, AtomDefinition>,
    by_code: HashMap<(u8, u8), &'static str>,
}

impl AtomDictionary {
    /// Build a dictionary from an explicit list of definitions. This is the
    /// "supplied at construction" entry point described in spec §1: a real
    /// deployment loads the full (generated) atom table this way rather than
    /// recompiling the crate.
    pub fn from_entries(entries: Vec<AtomDefinition>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_code: HashMap<(u8, u8), &'static str> = HashMap::with_capacity(entries.len());

        for def in entries {
            if def.protocol >= 32 {
                return Err(DictError::ProtocolOutOfRange(def.protocol));
            }
            let key = def.proto_atom();
            if let Some(existing) = by_code.get(&key) {
                return Err(DictError::DuplicateCode(
                    key.0,
                    key.1,
                    (*existing).to_string(),
                    def.name.to_string(),
                ));
            }
            if by_name.contains_key(def.name) {
                return Err(DictError::DuplicateName(def.name.to_string()));
            }
            by_code.insert(key, def.name);
            by_name.insert(def.name, def);
        }
        Ok(AtomDictionary { by_name, by_code })
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&AtomDefinition> {
        self.by_name.get(name)
    }

    pub fn lookup_by_code(&self, protocol: u8, atom_code: u8) -> Option<&AtomDefinition> {
        let name = self.by_code.get(&(protocol, atom_code))?;
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// A small built-in sample, covering every `value_type` variant and
    /// every worked example in spec §8. Real deployments are expected to
    /// supply their full generated table via [`AtomDictionary::from_entries`]
    /// instead of relying on this sample.
    pub fn sample() -> Self {
        let picture_states = EnumTable::new(&[("normal", 0), ("picture", 3), ("icon", 7)]);
        let frame_styles = EnumTable::new(&[
            ("no_line", 0),
            ("single_line", 1),
            ("double_line", 5),
        ]);
        // object_type names resolve against an enum_table the same way enum/bit_set
        // symbols do; the wire format needs a numeric type_code (§4.5) and this is
        // the only table an AtomDefinition carries.
        let object_types = EnumTable::new(&[("button", 1), ("list", 2), ("edit", 3)]);

        let entries = vec![
            AtomDefinition::new("fm_start", 16, 1, ValueType::None),
            AtomDefinition::new("fm_end", 16, 2, ValueType::None),
            AtomDefinition::new("mat_trigger_style", 16, 88, ValueType::Enum)
                .with_code_width(2)
                .with_enum_table(picture_states),
            AtomDefinition::new("mat_frame_style", 16, 87, ValueType::Enum)
                .with_code_width(2)
                .with_enum_table(frame_styles),
            AtomDefinition::new("ind_group", 16, 10, ValueType::ObjectType)
                .with_code_width(2)
                .with_enum_table(object_types),
            AtomDefinition::new("ind_letter", 16, 11, ValueType::List)
                .with_list_schema(vec![ValueType::Byte, ValueType::String]),
            AtomDefinition::new("ind_triple", 16, 12, ValueType::List).with_list_schema(vec![
                ValueType::Byte,
                ValueType::Byte,
                ValueType::LongWord,
            ]),
            AtomDefinition::new("ind_gid_ref", 16, 13, ValueType::Gid).with_code_width(4),
            AtomDefinition::new("ind_variable", 16, 14, ValueType::Variable),
            AtomDefinition::new("ind_options", 16, 15, ValueType::Piped).with_code_width(1),
            AtomDefinition::new("fd_open", 17, 1, ValueType::String),
            AtomDefinition::new(
                "uni_start_stream",
                18,
                1,
                ValueType::None,
            )
            .with_flags(AtomFlags::INDENT),
            AtomDefinition::new("uni_end_stream", 18, 2, ValueType::None)
                .with_flags(AtomFlags::OUTDENT),
            AtomDefinition::new(
                "act_replace_select_action",
                18,
                3,
                ValueType::NestedStream,
            ),
        ];
        AtomDictionary::from_entries(entries).expect("sample dictionary is internally consistent")
    }

    /// Synthesize the unknown-atom fallback name described in §4.6/§9:
    /// `proto<N>_atom<M>`. The decoder constructs one when a `(proto, atom)`
    /// pair has no entry; the parser must accept the same textual shape so
    /// decompiled-then-recompiled output round-trips.
    pub fn fallback_name(protocol: u8, atom_code: u8) -> String {
        format!("proto{protocol}_atom{atom_code}")
    }

    /// Parse a fallback name of the shape produced by [`Self::fallback_name`],
    /// if `name` matches it. Used by the parser to accept unknown-atom text
    /// symmetrically with the decoder's fallback.
    pub fn parse_fallback_name(name: &str) -> Option<(u8, u8)> {
        let rest = name.strip_prefix("proto")?;
        let (proto_str, rest) = rest.split_once("_atom")?;
        let protocol: u8 = proto_str.parse().ok()?;
        let atom_code: u8 = rest.parse().ok()?;
        if protocol >= 32 {
            return None;
        }
        Some((protocol, atom_code))
    }
}
