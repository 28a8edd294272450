//! Bidirectional codec facade for FDO form-description streams (spec §6).
//!
//! Wires together [`fdo_parser`] + [`fdo_codec`] for compilation,
//! [`fdo_codec`] + [`fdo_fmt`] for decompilation, and re-exports the model
//! types so a caller only needs this one crate.

mod errors;

pub use errors::{Error, Result};
pub use fdo_dict::AtomDictionary;
pub use fdo_fmt::{FormatOptions, Formatter};
pub use fdo_model::{Argument, AtomNode, Stream};

use log::debug;

/// Source text → bytes (spec §6: `Compiler.compile`).
pub struct Compiler {
    dict: AtomDictionary,
}

impl Compiler {
    pub fn new(dict: AtomDictionary) -> Self {
        Compiler { dict }
    }

    pub fn compile(&self, source: &str) -> Result<Vec<u8>> {
        debug!("compiling {} bytes of source", source.len());
        let stream = fdo_parser::parse(source, &self.dict)?;
        let bytes = fdo_codec::encode_stream(&stream)?;
        Ok(bytes)
    }
}

/// Bytes → source text (spec §6: `Decompiler.decompile`).
pub struct Decompiler {
    dict: AtomDictionary,
    formatter: Formatter,
}

impl Decompiler {
    pub fn new(dict: AtomDictionary) -> Self {
        Decompiler {
            dict,
            formatter: Formatter::default(),
        }
    }

    pub fn with_format_options(dict: AtomDictionary, opts: FormatOptions) -> Self {
        Decompiler {
            dict,
            formatter: Formatter::new(opts),
        }
    }

    pub fn decompile(&self, bytes: &[u8]) -> Result<String> {
        debug!("decompiling {} bytes", bytes.len());
        let stream = fdo_codec::decode_stream(bytes, &self.dict)?;
        Ok(self.formatter.format(&stream))
    }
}

/// Bytes → [`Stream`] (spec §6: `Stream.decode`).
pub fn decode(bytes: &[u8], dict: &AtomDictionary) -> Result<Stream> {
    Ok(fdo_codec::decode_stream(bytes, dict)?)
}

/// [`Stream`] → bytes (spec §6: `Stream.to_bytes`).
pub fn to_bytes(stream: &Stream) -> Result<Vec<u8>> {
    Ok(fdo_codec::encode_stream(stream)?)
}

/// [`Stream`] → text using default [`FormatOptions`] (spec §6: `Formatter.format`).
pub fn format(stream: &Stream) -> String {
    fdo_fmt::format(stream)
}
