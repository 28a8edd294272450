use fdo_lexer::{LexError, SourcePos};
use thiserror::Error;

/// Parser error taxonomy (spec §4.3, §7). Every variant carries enough to
/// reconstruct the error-table columns from §7: a human-readable message,
/// a source position, and, where it applies, the offending atom name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("{pos}: unknown atom `{name}`")]
    UnknownAtom { name: String, pos: SourcePos },

    #[error("{pos}: unknown enum value `{value}` for atom `{atom}`")]
    UnknownEnumValue {
        atom: String,
        value: String,
        pos: SourcePos,
    },

    #[error("{pos}: argument type mismatch for atom `{atom}`: {message}")]
    ArgumentTypeMismatch {
        atom: String,
        message: String,
        pos: SourcePos,
    },

    #[error("{pos}: unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: SourcePos,
    },

    #[error("{pos}: unterminated stream")]
    UnterminatedStream { pos: SourcePos },
}

pub type Result<T> = std::result::Result<T, ParseError>;
