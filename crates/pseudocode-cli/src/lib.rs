//! Command-line front for the pseudocode semantic core.
//!
//! Reads a program tree produced by an external parser, reports semantic
//! diagnostics, and prints the tree and symbol table dumps on request.

pub mod args;
pub mod driver;
