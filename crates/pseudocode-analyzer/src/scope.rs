//! Scope management for declared names.
//!
//! Scopes form a stack mirroring the nesting of lexical blocks. Depth 0 is
//! the global scope, created with the manager and never popped. Symbols live
//! exactly as long as the scope that holds them.

use std::collections::HashMap;
use std::fmt::{self, Write};

use pseudocode_syntax::ast::{Line, Literal};
use serde::Deserialize;

/// The kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program-level scope (depth 0)
    Global,
    /// Function or procedure body
    Routine,
    /// Nested control block (if, case arm, loop body)
    Block,
    /// Record type body, holding its fields
    Record,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Routine => "routine",
            ScopeKind::Block => "block",
            ScopeKind::Record => "record",
        }
    }
}

/// The kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Procedure,
    Parameter,
    Type,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Variable => "VARIABLE",
            SymbolKind::Constant => "CONSTANT",
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Procedure => "PROCEDURE",
            SymbolKind::Parameter => "PARAMETER",
            SymbolKind::Type => "TYPE",
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Depth of the scope the symbol was declared in
    pub depth: usize,
    pub line: Line,
    /// Initializer of a constant, when it is a literal
    pub value: Option<Literal>,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.kind.as_str())?;
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        write!(f, " (line {})", self.line)
    }
}

/// One level of the scope stack
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            symbols: HashMap::new(),
        }
    }

    /// Look up a symbol declared directly in this scope
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Symbols ordered by declaration line, then name
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<_> = self.symbols.values().collect();
        symbols.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));
        symbols
    }
}

/// Error when declaring a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineError {
    /// Name already exists in the innermost scope
    AlreadyDefined {
        name: String,
        /// Line of the rejected declaration
        line: Line,
        existing_line: Line,
    },
}

impl fmt::Display for DefineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineError::AlreadyDefined {
                name,
                line,
                existing_line,
            } => write!(
                f,
                "'{name}' on line {line} is already defined on line {existing_line}"
            ),
        }
    }
}

impl std::error::Error for DefineError {}

/// Order in which live scopes are listed by [`ScopeManager::render_ordered`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeOrder {
    #[default]
    OutermostFirst,
    InnermostFirst,
}

/// Stack of lexical scopes
#[derive(Debug)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    /// Create a new scope manager holding only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global)],
        }
    }

    /// Push an empty scope and return the new depth
    pub fn enter_scope(&mut self, kind: ScopeKind) -> usize {
        self.scopes.push(Scope::new(kind));
        let depth = self.depth();
        tracing::debug!(depth, kind = kind.as_str(), "entered scope");
        depth
    }

    /// Pop the innermost scope, dropping its symbols, and return the new depth.
    ///
    /// The global scope is never popped; trying to returns `None` and leaves
    /// the manager untouched.
    pub fn exit_scope(&mut self) -> Option<usize> {
        if self.scopes.len() == 1 {
            tracing::error!("attempted to exit the global scope");
            return None;
        }
        if let Some(scope) = self.scopes.pop() {
            tracing::debug!(
                depth = self.scopes.len(),
                dropped = scope.len(),
                kind = scope.kind.as_str(),
                "exited scope"
            );
        }
        Some(self.depth())
    }

    /// Depth of the innermost scope (0 = global)
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_scope_kind(&self) -> ScopeKind {
        self.current().kind
    }

    fn current(&self) -> &Scope {
        &self.scopes[self.depth()]
    }

    /// Declare a symbol in the innermost scope
    pub fn declare(&mut self, name: &str, kind: SymbolKind, line: Line) -> Result<(), DefineError> {
        self.declare_with_value(name, kind, line, None)
    }

    /// Declare a symbol carrying a value in the innermost scope
    pub fn declare_with_value(
        &mut self,
        name: &str,
        kind: SymbolKind,
        line: Line,
        value: Option<Literal>,
    ) -> Result<(), DefineError> {
        let depth = self.depth();
        let scope = &mut self.scopes[depth];

        if let Some(existing) = scope.symbols.get(name) {
            return Err(DefineError::AlreadyDefined {
                name: name.to_string(),
                line,
                existing_line: existing.line,
            });
        }

        tracing::debug!(name, kind = kind.as_str(), depth, line, "declared symbol");
        scope.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                depth,
                line,
                value,
            },
        );

        Ok(())
    }

    /// Look up a symbol by name, innermost scope first
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    /// Look up a symbol in the innermost scope only
    pub fn resolve_local(&self, name: &str) -> Option<&Symbol> {
        self.current().get(name)
    }

    /// Get all symbols in the global scope
    pub fn global_symbols(&self) -> Vec<&Symbol> {
        self.scopes[0].symbols()
    }

    /// Render every live scope, global first.
    pub fn render(&self) -> String {
        self.render_ordered(ScopeOrder::OutermostFirst)
    }

    /// Render every live scope in the given order.
    ///
    /// Each scope prints as `Scope Level N (kind):` followed by one indented
    /// line per symbol, ordered by declaration line.
    pub fn render_ordered(&self, order: ScopeOrder) -> String {
        let mut levels: Vec<_> = self.scopes.iter().enumerate().collect();
        if order == ScopeOrder::InnermostFirst {
            levels.reverse();
        }

        let mut result = String::new();
        for (level, scope) in levels {
            let _ = writeln!(result, "Scope Level {level} ({}):", scope.kind.as_str());
            for symbol in scope.symbols() {
                let _ = writeln!(result, "  {symbol}");
            }
        }
        result
    }
}

impl fmt::Display for ScopeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
