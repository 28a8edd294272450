//! Minimal emission trait mirrored from the teacher's `bsharp_syntax`
//! emitter: a single `emit` method threading a growing indent through a
//! `fmt::Write` sink. FDO's formatter never fails on well-formed input (spec
//! §6: `Formatter.format` returns a plain string), so `EmitError` only ever
//! wraps the infallible-in-practice `fmt::Error` from writing into a String.

use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write formatted output: {0}")]
    Write(#[from] std::fmt::Error),
}

pub struct EmitCtx {
    pub indent: usize,
    pub indent_width: usize,
    pub newline: &'static str,
}

impl EmitCtx {
    pub fn new(indent_width: usize, newline: &'static str) -> Self {
        EmitCtx {
            indent: 0,
            indent_width,
            newline,
        }
    }

    pub fn write_indent<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        for _ in 0..self.indent * self.indent_width {
            w.write_char(' ')?;
        }
        Ok(())
    }

    pub fn bump_in(&mut self) {
        self.indent += 1;
    }

    pub fn bump_out(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }
}

pub trait Emit {
    fn emit<W: Write>(&self, w: &mut W, cx: &mut EmitCtx) -> Result<(), EmitError>;
}
