//! Binary TLV encoder and decoder for the FDO wire format (spec §4.5/§4.6,
//! components C5/C6). The wire format is a bare concatenation of
//! style-prefixed records; there is no container header or checksum.

mod decoder;
mod encoder;
mod errors;
mod style;

pub use decoder::decode_stream;
pub use encoder::encode_stream;
pub use errors::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use style::StyleKind;
