//! Tokenizer for FDO source text (spec §4.2, component C2).
//!
//! Hand-rolled rather than combinator-based: the token set is small and
//! fixed, and the parser needs precise line/column spans on every token to
//! report `UnexpectedToken` errors usefully, which a generic lexer-generator
//! output would only get in the way of.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Number(i64),
    HexLiteral(Vec<u8>),
    String(String),
    Lt,
    Gt,
    Comma,
    Pipe,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: SourcePos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidEscape(char),
    StrayCharacter(char),
    InvalidNumber(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::InvalidEscape(c) => write!(f, "invalid escape sequence `\\{c}`"),
            LexErrorKind::StrayCharacter(c) => write!(f, "unexpected character `{c}`"),
            LexErrorKind::InvalidNumber(s) => write!(f, "invalid numeric literal `{s}`"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{pos}: {kind}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub kind: LexErrorKind,
    pos: SourcePos,
}

impl LexError {
    fn new(pos: SourcePos, kind: LexErrorKind) -> Self {
        LexError {
            line: pos.line,
            column: pos.column,
            kind,
            pos,
        }
    }
}

pub type Result<T> = std::result::Result<T, LexError>;

/// Splits FDO source text into a token stream, terminated by a single
/// trailing [`TokenKind::Eof`].
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn here(&self) -> SourcePos {
        SourcePos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.advance();
                }
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();
        let pos = self.here();
        let Some(b) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        match b {
            b'\n' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Newline,
                    pos,
                })
            }
            b'<' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Lt,
                    pos,
                })
            }
            b'>' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Gt,
                    pos,
                })
            }
            b',' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Comma,
                    pos,
                })
            }
            b'|' => {
                self.advance();
                Ok(Token {
                    kind: TokenKind::Pipe,
                    pos,
                })
            }
            b'"' => self.lex_string(pos),
            b'$' => self.lex_dollar_hex(pos),
            b'0' if self.peek_at(1) == Some(b'x') || self.peek_at(1) == Some(b'X') => {
                self.lex_0x_hex(pos)
            }
            b'-' | b'0'..=b'9' => self.lex_number(pos),
            b if is_ident_start(b) => self.lex_identifier(pos),
            other => {
                self.advance();
                Err(LexError::new(pos, LexErrorKind::StrayCharacter(other as char)))
            }
        }
    }

    fn lex_identifier(&mut self, pos: SourcePos) -> Result<Token> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_ident_continue(b) {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        Ok(Token {
            kind: TokenKind::Identifier(text),
            pos,
        })
    }

    fn lex_number(&mut self, pos: SourcePos) -> Result<Token> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.advance();
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let value = text
            .parse::<i64>()
            .map_err(|_| LexError::new(pos, LexErrorKind::InvalidNumber(text.clone())))?;
        Ok(Token {
            kind: TokenKind::Number(value),
            pos,
        })
    }

    fn lex_0x_hex(&mut self, pos: SourcePos) -> Result<Token> {
        self.advance(); // '0'
        self.advance(); // 'x'/'X'
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_hexdigit() {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let bytes =
            hex_to_bytes(&text).map_err(|_| LexError::new(pos, LexErrorKind::InvalidNumber(text)))?;
        Ok(Token {
            kind: TokenKind::HexLiteral(bytes),
            pos,
        })
    }

    fn lex_dollar_hex(&mut self, pos: SourcePos) -> Result<Token> {
        self.advance(); // '$'
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_hexdigit() {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let bytes =
            hex_to_bytes(&text).map_err(|_| LexError::new(pos, LexErrorKind::InvalidNumber(text)))?;
        Ok(Token {
            kind: TokenKind::HexLiteral(bytes),
            pos,
        })
    }

    fn lex_string(&mut self, pos: SourcePos) -> Result<Token> {
        self.advance(); // opening quote
        let mut out = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(LexError::new(pos, LexErrorKind::UnterminatedString));
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    let escape_pos = self.here();
                    self.advance();
                    match self.peek() {
                        Some(b'\\') => {
                            out.push('\\');
                            self.advance();
                        }
                        Some(b'"') => {
                            out.push('"');
                            self.advance();
                        }
                        Some(b'n') => {
                            out.push('\n');
                            self.advance();
                        }
                        Some(b'r') => {
                            out.push('\r');
                            self.advance();
                        }
                        Some(b't') => {
                            out.push('\t');
                            self.advance();
                        }
                        Some(other) => {
                            return Err(LexError::new(
                                escape_pos,
                                LexErrorKind::InvalidEscape(other as char),
                            ));
                        }
                        None => {
                            return Err(LexError::new(pos, LexErrorKind::UnterminatedString));
                        }
                    }
                }
                Some(_) => {
                    // Collect a run of plain bytes up to the next special character,
                    // then push it as UTF-8 in one go to tolerate multi-byte text.
                    let start = self.pos;
                    while let Some(b) = self.peek() {
                        if b == b'"' || b == b'\\' || b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                    out.push_str(&String::from_utf8_lossy(&self.src[start..self.pos]));
                }
            }
        }
        Ok(Token {
            kind: TokenKind::String(out),
            pos,
        })
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn hex_to_bytes(text: &str) -> std::result::Result<Vec<u8>, ()> {
    let digits: Vec<u8> = text.bytes().collect();
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = {
            let mut v = vec![b'0'];
            v.extend_from_slice(&digits);
            v
        };
        &padded[..]
    } else {
        &digits[..]
    };
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for chunk in digits.chunks(2) {
        let hi = (chunk[0] as char).to_digit(16).ok_or(())?;
        let lo = (chunk[1] as char).to_digit(16).ok_or(())?;
        bytes.push(((hi << 4) | lo) as u8);
    }
    Ok(bytes)
}

/// Convenience wrapper over [`Lexer::new`] + [`Lexer::tokenize`].
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    Lexer::new(src).tokenize()
}
