//! Schema-directed recursive-descent parser for FDO source text (spec §4.3,
//! component C3). Depends on [`fdo_dict`] for atom resolution and
//! [`fdo_lexer`] for tokenization; produces [`fdo_model::Stream`].

mod errors;
mod grammar;

pub use errors::{ParseError, Result};
pub use grammar::{parse, Parser};
