//! In-memory typed representation of a parsed or decoded FDO stream (spec §3,
//! component C4).
//!
//! Construction is immutable: a [`Stream`] is built once by the parser or the
//! decoder and never mutated in place. Equality is structural. Ownership is
//! tree-shaped — a `Stream` owns its [`AtomNode`]s, which own their
//! [`Argument`]s, and a [`Argument::NestedStream`] owns its inner `Stream` —
//! there are no cycles.

use fdo_dict::AtomDefinition;

/// One argument of an atom. The grammar shape that produced a given variant
/// is dictated by the atom's [`fdo_dict::ValueType`] (spec §4.3); this enum
/// only records the parsed/decoded value, not how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    String(String),
    Number(i64),
    Hex(Vec<u8>),
    Gid(u64),
    Identifier(String),
    Piped(Vec<Argument>),
    List(Vec<Argument>),
    ObjectType { type_name: String, title: String },
    NestedStream(Stream),
}

impl Argument {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Argument::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Argument::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_nested_stream(&self) -> Option<&Stream> {
        match self {
            Argument::NestedStream(s) => Some(s),
            _ => None,
        }
    }
}

/// One atom occurrence within a [`Stream`]: its source name, the dictionary
/// definition it resolved to (if any — the unknown-atom fallback of §4.6
/// leaves this `None`), and its arguments in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomNode {
    pub name: String,
    pub definition: Option<AtomDefinition>,
    pub arguments: Vec<Argument>,
}

impl AtomNode {
    pub fn new(name: impl Into<String>, definition: Option<AtomDefinition>) -> Self {
        AtomNode {
            name: name.into(),
            definition,
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn protocol_and_code(&self) -> Option<(u8, u8)> {
        self.definition.as_ref().map(AtomDefinition::proto_atom)
    }

    /// True when this node did not resolve against the dictionary and is
    /// carrying the synthetic `proto<N>_atom<M>` fallback shape.
    pub fn is_unknown(&self) -> bool {
        self.definition.is_none()
    }
}

/// An ordered sequence of [`AtomNode`]s. May be the top-level stream of a
/// compiled/decompiled unit, or nested as a [`Argument::NestedStream`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    pub atoms: Vec<AtomNode>,
}

impl Stream {
    pub fn new(atoms: Vec<AtomNode>) -> Self {
        Stream { atoms }
    }

    pub fn empty() -> Self {
        Stream::default()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtomNode> {
        self.atoms.iter()
    }
}

impl IntoIterator for Stream {
    type Item = AtomNode;
    type IntoIter = std::vec::IntoIter<AtomNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.into_iter()
    }
}

impl<'a> IntoIterator for &'a Stream {
    type Item = &'a AtomNode;
    type IntoIter = std::slice::Iter<'a, AtomNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl FromIterator<AtomNode> for Stream {
    fn from_iter<T: IntoIterator<Item = AtomNode>>(iter: T) -> Self {
        Stream {
            atoms: iter.into_iter().collect(),
        }
    }
}
