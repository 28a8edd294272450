use thiserror::Error;

/// Failures raised while turning a [`fdo_model::Stream`] into bytes (spec §4.5, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unknown atom `{0}`: not present in the dictionary")]
    UnknownAtom(String),

    #[error("argument type mismatch for atom `{atom}`: {message}")]
    ArgumentTypeMismatch { atom: String, message: String },

    #[error("payload of {len} bytes for atom `{atom}` exceeds the 32767-byte limit")]
    PayloadTooLong { atom: String, len: usize },

    #[error("value `{value}` for atom `{atom}` has no corresponding enum code")]
    EnumOutOfRange { atom: String, value: String },
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Failures raised while turning bytes into a [`fdo_model::Stream`] (spec §4.6, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input at byte offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unknown style code {style} at byte offset {offset}")]
    UnknownStyle { style: u8, offset: usize },

    #[error("{extra} trailing byte(s) after decoding a nested stream at byte offset {offset}")]
    TrailingBytes { offset: usize, extra: usize },

    #[error("malformed payload for atom ({protocol}, {atom_code}) at byte offset {offset}: {message}")]
    MalformedPayload {
        protocol: u8,
        atom_code: u8,
        offset: usize,
        message: String,
    },
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
