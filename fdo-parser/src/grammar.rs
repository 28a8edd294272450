//! Schema-directed recursive-descent parser (spec §4.3, component C3).
//!
//! The grammar is ambiguous without the atom dictionary: an atom's
//! `value_type` must be known *before* its argument block is parsed in order
//! to pick between a nested stream, a comma list, a pipe list, an
//! `object_type` pair, or a single primary. This mirrors the teacher's own
//! `bsharp_parser` split — lex first, then dispatch per declared shape
//! rather than trying every alternative blindly.

use fdo_dict::{AtomDictionary, ValueType};
use fdo_lexer::{tokenize, SourcePos, Token, TokenKind};
use fdo_model::{Argument, AtomNode, Stream};
use log::trace;

use crate::errors::{ParseError, Result};

pub struct Parser<'d> {
    tokens: Vec<Token>,
    pos: usize,
    dict: &'d AtomDictionary,
}

impl<'d> Parser<'d> {
    pub fn new(src: &str, dict: &'d AtomDictionary) -> Result<Self> {
        let tokens = tokenize(src)?;
        Ok(Parser {
            tokens,
            pos: 0,
            dict,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn at_pos(&self) -> SourcePos {
        self.peek().pos
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, SourcePos)> {
        let pos = self.at_pos();
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, pos))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "identifier".into(),
                found: describe(&other),
                pos,
            }),
        }
    }

    fn expect(&mut self, kind: &TokenKind, label: &str) -> Result<SourcePos> {
        let pos = self.at_pos();
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind) {
            self.advance();
            Ok(pos)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: label.into(),
                found: describe(self.peek_kind()),
                pos,
            })
        }
    }

    /// Parse a whole top-level stream: `(atom NEWLINE*)*` up to EOF.
    pub fn parse_program(mut self) -> Result<Stream> {
        let stream = self.parse_stream_body(0, &StopAt::Eof)?;
        match self.peek_kind() {
            TokenKind::Eof => Ok(stream),
            other => Err(ParseError::UnexpectedToken {
                expected: "end of input".into(),
                found: describe(other),
                pos: self.at_pos(),
            }),
        }
    }

    fn parse_stream_body(&mut self, depth: usize, stop: &StopAt) -> Result<Stream> {
        let mut atoms = Vec::new();
        loop {
            self.skip_newlines();
            if stop.matches(self.peek_kind()) {
                break;
            }
            if matches!(self.peek_kind(), TokenKind::Eof) {
                break;
            }
            atoms.push(self.parse_atom(depth)?);
        }
        Ok(Stream::new(atoms))
    }

    fn parse_atom(&mut self, depth: usize) -> Result<AtomNode> {
        let (name, pos) = self.expect_identifier()?;

        if let Some(def) = self.dict.lookup_by_name(&name).cloned() {
            let arguments = self.parse_argument_block(&name, &def.value_type, Some(&def), depth, pos)?;
            Ok(AtomNode::new(name, Some(def)).with_arguments(arguments))
        } else if AtomDictionary::parse_fallback_name(&name).is_some() {
            // Unknown-atom fallback text must round-trip symmetrically with the
            // decoder's synthetic `proto<N>_atom<M>` atoms (spec §4.6, §9): a
            // single opaque Hex payload, nothing more.
            let arguments = self.parse_fallback_payload(&name, pos)?;
            Ok(AtomNode::new(name, None).with_arguments(arguments))
        } else {
            Err(ParseError::UnknownAtom { name, pos })
        }
    }

    fn parse_argument_block(
        &mut self,
        atom_name: &str,
        value_type: &ValueType,
        def: Option<&fdo_dict::AtomDefinition>,
        depth: usize,
        atom_pos: SourcePos,
    ) -> Result<Vec<Argument>> {
        if matches!(value_type, ValueType::None) {
            return Ok(Vec::new());
        }

        if !matches!(self.peek_kind(), TokenKind::Lt) {
            // No argument block present for an atom whose schema expects one.
            return Err(ParseError::ArgumentTypeMismatch {
                atom: atom_name.to_string(),
                message: "expected an argument block `<...>`".into(),
                pos: atom_pos,
            });
        }
        self.expect(&TokenKind::Lt, "`<`")?;

        let args = match value_type {
            ValueType::None => unreachable!(),
            ValueType::NestedStream => {
                if depth + 1 > fdo_dict::MAX_NESTING_DEPTH {
                    return Err(ParseError::UnterminatedStream { pos: atom_pos });
                }
                trace!("{atom_name}: recursing into nested stream at depth {}", depth + 1);
                self.skip_newlines();
                let inner = self.parse_stream_body(depth + 1, &StopAt::Gt)?;
                self.skip_newlines();
                vec![Argument::NestedStream(inner)]
            }
            ValueType::ObjectType => {
                let (type_name, _) = self.expect_identifier()?;
                self.expect(&TokenKind::Comma, "`,`")?;
                let title = self.parse_string_literal(atom_name)?;
                vec![Argument::ObjectType { type_name, title }]
            }
            ValueType::List => {
                let schema = def.and_then(|d| d.list_schema.as_ref());
                self.parse_list(atom_name, schema)?
            }
            ValueType::Enum | ValueType::BitSet | ValueType::Piped => {
                vec![self.parse_piped(atom_name, def)?]
            }
            ValueType::String => vec![Argument::String(self.parse_string_literal(atom_name)?)],
            ValueType::Byte | ValueType::Word | ValueType::LongWord => {
                vec![self.parse_primary(atom_name)?]
            }
            ValueType::Variable => vec![self.parse_primary(atom_name)?],
            ValueType::Gid => {
                let arg = self.parse_primary(atom_name)?;
                let value = match arg {
                    Argument::Number(n) => Argument::Gid(n as u64),
                    Argument::Hex(bytes) => Argument::Gid(bytes_to_u64(&bytes)),
                    other => other,
                };
                vec![value]
            }
        };

        self.expect(&TokenKind::Gt, "`>`")?;
        Ok(args)
    }

    fn parse_fallback_payload(
        &mut self,
        atom_name: &str,
        atom_pos: SourcePos,
    ) -> Result<Vec<Argument>> {
        if !matches!(self.peek_kind(), TokenKind::Lt) {
            return Ok(Vec::new());
        }
        self.expect(&TokenKind::Lt, "`<`")?;
        let pos = self.at_pos();
        let bytes = match self.peek_kind().clone() {
            TokenKind::HexLiteral(b) => {
                self.advance();
                b
            }
            other => {
                return Err(ParseError::ArgumentTypeMismatch {
                    atom: atom_name.to_string(),
                    message: format!("expected a hex payload, found {}", describe(&other)),
                    pos,
                });
            }
        };
        self.expect(&TokenKind::Gt, "`>`").map_err(|_| ParseError::UnterminatedStream {
            pos: atom_pos,
        })?;
        Ok(vec![Argument::Hex(bytes)])
    }

    fn parse_list(
        &mut self,
        atom_name: &str,
        schema: Option<&Vec<ValueType>>,
    ) -> Result<Vec<Argument>> {
        let mut elements = Vec::new();
        let mut index = 0;
        loop {
            let expected = schema.and_then(|s| s.get(index));
            let element = match expected {
                Some(ValueType::String) => Argument::String(self.parse_string_literal(atom_name)?),
                _ => self.parse_primary(atom_name)?,
            };
            elements.push(element);
            index += 1;
            if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(vec![Argument::List(elements)])
    }

    fn parse_piped(
        &mut self,
        atom_name: &str,
        def: Option<&fdo_dict::AtomDefinition>,
    ) -> Result<Argument> {
        let mut elements = vec![self.parse_enum_or_primary(atom_name, def)?];
        while matches!(self.peek_kind(), TokenKind::Pipe) {
            self.advance();
            elements.push(self.parse_enum_or_primary(atom_name, def)?);
        }
        if elements.len() == 1 {
            Ok(elements.pop().unwrap())
        } else {
            Ok(Argument::Piped(elements))
        }
    }

    fn parse_enum_or_primary(
        &mut self,
        atom_name: &str,
        def: Option<&fdo_dict::AtomDefinition>,
    ) -> Result<Argument> {
        let pos = self.at_pos();
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                if let Some(table) = def.and_then(|d| d.enum_table.as_ref()) {
                    if table.code_for(&name).is_some() {
                        Ok(Argument::Identifier(name))
                    } else {
                        Err(ParseError::UnknownEnumValue {
                            atom: atom_name.to_string(),
                            value: name,
                            pos,
                        })
                    }
                } else {
                    // No enum table bound: accept the symbol verbatim (e.g. the
                    // unknown-atom-fallback path, or a bit_set atom whose table
                    // wasn't supplied).
                    Ok(Argument::Identifier(name))
                }
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Argument::Number(n))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "enum symbol or number".into(),
                found: describe(&other),
                pos,
            }),
        }
    }

    fn parse_primary(&mut self, atom_name: &str) -> Result<Argument> {
        let pos = self.at_pos();
        match self.peek_kind().clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(Argument::String(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Argument::Number(n))
            }
            TokenKind::HexLiteral(bytes) => {
                self.advance();
                Ok(Argument::Hex(bytes))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Argument::Identifier(name))
            }
            other => Err(ParseError::ArgumentTypeMismatch {
                atom: atom_name.to_string(),
                message: format!("expected a value, found {}", describe(&other)),
                pos,
            }),
        }
    }

    fn parse_string_literal(&mut self, atom_name: &str) -> Result<String> {
        let pos = self.at_pos();
        match self.peek_kind().clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(ParseError::ArgumentTypeMismatch {
                atom: atom_name.to_string(),
                message: format!("expected a string literal, found {}", describe(&other)),
                pos,
            }),
        }
    }
}

enum StopAt {
    Eof,
    Gt,
}

impl StopAt {
    fn matches(&self, kind: &TokenKind) -> bool {
        match self {
            StopAt::Eof => matches!(kind, TokenKind::Eof),
            StopAt::Gt => matches!(kind, TokenKind::Gt),
        }
    }
}

fn bytes_to_u64(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    for &b in bytes {
        value = (value << 8) | b as u64;
    }
    value
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Identifier(s) => format!("identifier `{s}`"),
        TokenKind::Number(n) => format!("number `{n}`"),
        TokenKind::HexLiteral(_) => "hex literal".to_string(),
        TokenKind::String(_) => "string literal".to_string(),
        TokenKind::Lt => "`<`".to_string(),
        TokenKind::Gt => "`>`".to_string(),
        TokenKind::Comma => "`,`".to_string(),
        TokenKind::Pipe => "`|`".to_string(),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}

/// Parse a complete FDO source string into a [`Stream`], resolving every atom
/// against `dict` (spec §6: `Compiler.compile` is layered on top of this).
pub fn parse(src: &str, dict: &AtomDictionary) -> Result<Stream> {
    Parser::new(src, dict)?.parse_program()
}
