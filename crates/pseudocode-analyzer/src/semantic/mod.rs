//! Semantic analysis for pseudocode programs.
//!
//! [`SemanticContext`] is the facade a parser driver calls into at
//! declaration sites and block boundaries; [`collect_declarations`] replays
//! those calls over an already-built tree.

pub mod context;

pub use context::{collect_declarations, SemanticContext};
