use thiserror::Error;

/// Aggregated error surface for the facade crate. Each component keeps its
/// own narrow error enum; this only flattens them behind one type so callers
/// of `Compiler`/`Decompiler` don't need to depend on every leaf crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] fdo_parser::ParseError),
    #[error(transparent)]
    Encode(#[from] fdo_codec::EncodeError),
    #[error(transparent)]
    Decode(#[from] fdo_codec::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
