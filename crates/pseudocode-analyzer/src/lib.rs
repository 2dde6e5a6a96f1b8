pub mod config;
pub mod diagnostics;
pub mod scope;
pub mod semantic;

pub use config::{AnalyzerConfig, ConfigError};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use scope::{DefineError, ScopeKind, ScopeManager, ScopeOrder, Symbol, SymbolKind};
pub use semantic::{collect_declarations, SemanticContext};
