//! Text formatter for the FDO stream model (spec §4.7, component C7).
//! Indentation is driven entirely by [`fdo_dict::AtomFlags`] and nested
//! streams; `Formatter` carries no state beyond a single traversal (spec §9:
//! "keep it local to a single traversal, never global").

mod emit;
mod format;

pub use emit::{Emit, EmitCtx, EmitError};

use fdo_model::Stream;

#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub indent_width: usize,
    pub newline: &'static str,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent_width: 4,
            newline: "\n",
        }
    }
}

pub struct Formatter {
    opts: FormatOptions,
}

impl Formatter {
    pub fn new(opts: FormatOptions) -> Self {
        Formatter { opts }
    }

    /// Render a stream to text. Never fails: a [`Stream`] is only ever
    /// constructed by the parser or decoder, both of which guarantee shapes
    /// the formatter knows how to print (spec §6).
    pub fn format(&self, stream: &Stream) -> String {
        let mut out = String::new();
        let mut cx = EmitCtx::new(self.opts.indent_width, self.opts.newline);
        format::emit_stream(stream, &mut out, &mut cx)
            .expect("writing into a String cannot fail");
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::new(FormatOptions::default())
    }
}

/// Convenience wrapper over [`Formatter::default`] (spec §6: `Formatter.format`).
pub fn format(stream: &Stream) -> String {
    Formatter::default().format(stream)
}
