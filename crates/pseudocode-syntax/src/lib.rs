//! Syntax tree model for the pseudocode front end.
//!
//! The external parser builds a [`ast::Program`] bottom-up, handing each
//! child to its parent by value. Nothing here validates or evaluates; the
//! tree only records structure. [`render`] produces the nested textual dump.

pub mod ast;
pub mod render;

pub use ast::{Identifier, Line, Program};
pub use render::{render_program, TreePrinter, DEFAULT_INDENT_WIDTH, MAX_INDENT_WIDTH};
