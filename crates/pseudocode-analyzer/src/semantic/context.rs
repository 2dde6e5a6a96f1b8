//! Semantic analysis context.
//!
//! Wraps the scope manager with the diagnostic reporting a parser driver
//! needs at declaration sites and at the close of counted loops.

use pseudocode_syntax::ast::{
    Block, BlockItem, Decl, Expr, FunctionDef, Identifier, Item, Literal, Param, ProcedureDef,
    Program, Stmt,
};

use crate::config::AnalyzerConfig;
use crate::diagnostics::Diagnostic;
use crate::scope::{DefineError, ScopeKind, ScopeManager, Symbol, SymbolKind};

/// State shared by everything that declares or resolves names during a run.
#[derive(Debug, Default)]
pub struct SemanticContext {
    /// Scope and symbol management
    pub scopes: ScopeManager,

    pub config: AnalyzerConfig,

    /// Error channel: diagnostics in the order they were detected
    diagnostics: Vec<Diagnostic>,
}

impl SemanticContext {
    /// Create a new semantic context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Declare `ident` in the innermost scope, reporting a redefinition.
    ///
    /// Returns whether the symbol was inserted.
    pub fn declare(&mut self, ident: &Identifier, kind: SymbolKind) -> bool {
        self.declare_with_value(ident, kind, None)
    }

    pub fn declare_with_value(
        &mut self,
        ident: &Identifier,
        kind: SymbolKind,
        value: Option<Literal>,
    ) -> bool {
        match self
            .scopes
            .declare_with_value(&ident.name, kind, ident.line, value)
        {
            Ok(()) => true,
            Err(DefineError::AlreadyDefined { name, line, .. }) => {
                self.report(Diagnostic::already_defined(name, line));
                false
            }
        }
    }

    /// Look up a name through every live scope
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.resolve(name)
    }

    /// Compare the variable opening a FOR loop with the one its NEXT names.
    ///
    /// Reports against the closing identifier and returns whether they match.
    pub fn check_for_next(&mut self, open: &Identifier, close: &Identifier) -> bool {
        if open.name == close.name {
            return true;
        }
        self.report(Diagnostic::identifiers_dont_match(&close.name, close.line));
        false
    }

    /// Push a diagnostic onto the error channel at the point of detection.
    ///
    /// The symbol table is left as the triggering operation left it. The
    /// binary prints the channel once the replay ends.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            line = diagnostic.line,
            code = diagnostic.code(),
            "{}",
            diagnostic.message()
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Render the live scopes in the configured order
    pub fn render_symbol_table(&self) -> String {
        self.scopes.render_ordered(self.config.scope_order)
    }
}

/// Replay the declarations of a finished program into the context.
///
/// Issues the same calls a parser makes while building the tree: declare at
/// every declaration site, a routine scope around each body, a record scope
/// around record fields, and the FOR/NEXT check at each counted loop.
pub fn collect_declarations(ctx: &mut SemanticContext, program: &Program) {
    for item in &program.items {
        match item {
            Item::Decl(decl) => collect_decl(decl, ctx),
            Item::Function(func) => collect_function(func, ctx),
            Item::Procedure(proc) => collect_procedure(proc, ctx),
            Item::Stmt(stmt) => collect_stmt(stmt, ctx),
        }
    }
}

fn collect_decl(decl: &Decl, ctx: &mut SemanticContext) {
    let kind = if decl.is_type() {
        SymbolKind::Type
    } else {
        SymbolKind::Variable
    };

    match decl {
        Decl::Const(c) => {
            let value = match &c.value {
                Expr::Literal(lit) => Some(lit.clone()),
                _ => None,
            };
            ctx.declare_with_value(&c.name, SymbolKind::Constant, value);
        }
        Decl::Enum(e) => {
            ctx.declare(&e.name, kind);
            for member in &e.members {
                ctx.declare(member, SymbolKind::Constant);
            }
        }
        Decl::Record(r) => {
            ctx.declare(&r.name, kind);

            // Fields only clash with each other
            ctx.scopes.enter_scope(ScopeKind::Record);
            for field in &r.fields {
                collect_decl(field, ctx);
            }
            ctx.scopes.exit_scope();
        }
        Decl::Var(_) | Decl::Array(_) | Decl::Pointer(_) | Decl::Set(_) | Decl::SetDef(_) => {
            ctx.declare(decl.ident(), kind);
        }
    }
}

fn collect_function(func: &FunctionDef, ctx: &mut SemanticContext) {
    ctx.declare(&func.name, SymbolKind::Function);
    collect_routine_body(func.params.as_deref(), &func.body, ctx);
}

fn collect_procedure(proc: &ProcedureDef, ctx: &mut SemanticContext) {
    ctx.declare(&proc.name, SymbolKind::Procedure);
    collect_routine_body(proc.params.as_deref(), &proc.body, ctx);
}

/// Parameters and body locals share one routine scope.
fn collect_routine_body(params: Option<&[Param]>, body: &Block, ctx: &mut SemanticContext) {
    ctx.scopes.enter_scope(ScopeKind::Routine);
    for param in params.unwrap_or_default() {
        ctx.declare(&param.name, SymbolKind::Parameter);
    }
    collect_block_items(body, ctx);
    ctx.scopes.exit_scope();
}

/// Control-flow bodies get their own scope only when configured to.
fn collect_nested_block(block: &Block, ctx: &mut SemanticContext) {
    if ctx.config.block_scopes {
        ctx.scopes.enter_scope(ScopeKind::Block);
        collect_block_items(block, ctx);
        ctx.scopes.exit_scope();
    } else {
        collect_block_items(block, ctx);
    }
}

fn collect_block_items(block: &Block, ctx: &mut SemanticContext) {
    for item in &block.items {
        match item {
            BlockItem::Decl(decl) => collect_decl(decl, ctx),
            BlockItem::Stmt(stmt) => collect_stmt(stmt, ctx),
        }
    }
}

fn collect_stmt(stmt: &Stmt, ctx: &mut SemanticContext) {
    match stmt {
        Stmt::If(s) => {
            collect_nested_block(&s.then_block, ctx);
            if let Some(else_block) = &s.else_block {
                collect_nested_block(else_block, ctx);
            }
        }
        Stmt::Case(s) => {
            for arm in &s.arms {
                collect_nested_block(&arm.body, ctx);
            }
        }
        Stmt::For(s) => {
            collect_nested_block(&s.body, ctx);
            // NEXT closes the loop after its body
            ctx.check_for_next(&s.var, &s.next);
        }
        Stmt::While(s) => collect_nested_block(&s.body, ctx),
        Stmt::Repeat(s) => collect_nested_block(&s.body, ctx),
        Stmt::Assign(_)
        | Stmt::Return(_)
        | Stmt::Call(_)
        | Stmt::Input(_)
        | Stmt::Output(_)
        | Stmt::File(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use pseudocode_syntax::ast::*;

    fn ident(name: &str, line: Line) -> Identifier {
        Identifier::new(name, line)
    }

    fn var_decl(name: &str, line: Line) -> Decl {
        Decl::Var(VarDecl {
            name: ident(name, line),
            ty: TypeRef::Integer,
        })
    }

    fn for_loop(var: &str, next: &str, next_line: Line, body: Vec<BlockItem>) -> Stmt {
        Stmt::For(ForStmt {
            var: ident(var, 3),
            start: Expr::int(1),
            end: Expr::int(10),
            step: None,
            body: Block::new(body),
            next: ident(next, next_line),
        })
    }

    #[test]
    fn test_declare_reports_duplicate() {
        let mut ctx = SemanticContext::new();
        assert!(ctx.declare(&ident("x", 1), SymbolKind::Variable));
        assert!(!ctx.declare(&ident("x", 2), SymbolKind::Variable));

        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("x", 2)]);
        assert_eq!(ctx.resolve("x").expect("should find").line, 1);
    }

    #[test]
    fn test_check_for_next_mismatch() {
        let mut ctx = SemanticContext::new();
        assert!(!ctx.check_for_next(&ident("i", 3), &ident("j", 7)));

        let diagnostics = ctx.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::IdentifiersDontMatch);
        assert_eq!(diagnostics[0].name, "j");
        assert_eq!(diagnostics[0].line, 7);
    }

    #[test]
    fn test_diagnostics_recorded_at_detection() {
        let mut ctx = SemanticContext::new();
        ctx.scopes.enter_scope(ScopeKind::Routine);
        assert!(ctx.declare(&ident("n", 2), SymbolKind::Parameter));
        assert!(!ctx.declare(&ident("n", 3), SymbolKind::Variable));

        // Visible before the scope closes, and the table is unchanged
        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("n", 3)]);
        assert_eq!(
            ctx.resolve("n").expect("should find").kind,
            SymbolKind::Parameter
        );

        assert!(!ctx.check_for_next(&ident("i", 4), &ident("k", 6)));
        ctx.scopes.exit_scope();
        assert_eq!(
            ctx.diagnostics(),
            [
                Diagnostic::already_defined("n", 3),
                Diagnostic::identifiers_dont_match("k", 6),
            ]
        );
    }

    #[test]
    fn test_check_for_next_match() {
        let mut ctx = SemanticContext::new();
        assert!(ctx.check_for_next(&ident("i", 3), &ident("i", 7)));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_collect_globals_and_routines() {
        let program = Program::new(vec![
            Item::Decl(Decl::Const(ConstDecl {
                name: ident("Max", 1),
                value: Expr::int(100),
            })),
            Item::Decl(var_decl("total", 2)),
            Item::Function(FunctionDef {
                name: ident("Double", 3),
                params: Some(vec![Param {
                    mode: PassMode::ByVal,
                    name: ident("n", 3),
                    ty: TypeRef::Integer,
                }]),
                return_type: TypeRef::Integer,
                body: Block::new(vec![var_decl("total", 4).into()]),
            }),
        ]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);

        // Local `total` shadows the global one without error
        assert!(!ctx.has_errors());
        assert_eq!(ctx.scopes.depth(), 0);

        let max = ctx.resolve("Max").expect("should find");
        assert_eq!(max.kind, SymbolKind::Constant);
        assert_eq!(max.value, Some(Literal::integer(100)));

        assert_eq!(
            ctx.resolve("Double").expect("should find").kind,
            SymbolKind::Function
        );
        assert_eq!(ctx.resolve("total").expect("should find").line, 2);
        // Parameters die with the routine scope
        assert!(ctx.resolve("n").is_none());
    }

    #[test]
    fn test_collect_duplicate_parameter() {
        let program = Program::new(vec![Item::Procedure(ProcedureDef {
            name: ident("Swap", 1),
            params: Some(vec![
                Param {
                    mode: PassMode::ByRef,
                    name: ident("a", 1),
                    ty: TypeRef::Integer,
                },
                Param {
                    mode: PassMode::ByRef,
                    name: ident("a", 1),
                    ty: TypeRef::Integer,
                },
            ]),
            body: Block::default(),
        })]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);
        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("a", 1)]);
    }

    #[test]
    fn test_collect_local_clashing_with_parameter() {
        let program = Program::new(vec![Item::Procedure(ProcedureDef {
            name: ident("Show", 1),
            params: Some(vec![Param {
                mode: PassMode::Default,
                name: ident("count", 1),
                ty: TypeRef::Integer,
            }]),
            body: Block::new(vec![var_decl("count", 2).into()]),
        })]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);
        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("count", 2)]);
    }

    #[test]
    fn test_collect_for_next_mismatch() {
        let program = Program::new(vec![
            Item::Stmt(for_loop("i", "j", 5, Vec::new())),
            Item::Stmt(for_loop("k", "k", 9, Vec::new())),
        ]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);
        assert_eq!(
            ctx.diagnostics(),
            [Diagnostic::identifiers_dont_match("j", 5)]
        );
    }

    #[test]
    fn test_nested_loop_reports_inner_before_outer() {
        let inner = for_loop("b", "c", 4, Vec::new());
        let outer = for_loop("a", "z", 6, vec![inner.into()]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &Program::new(vec![Item::Stmt(outer)]));

        let names: Vec<_> = ctx.diagnostics().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c", "z"]);
    }

    #[test]
    fn test_block_scopes_disabled_by_default() {
        let stmt = Stmt::While(WhileStmt {
            condition: Expr::Literal(Literal::Boolean(true)),
            body: Block::new(vec![var_decl("x", 3).into()]),
        });
        let program = Program::new(vec![Item::Decl(var_decl("x", 1)), Item::Stmt(stmt)]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);
        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("x", 3)]);
    }

    #[test]
    fn test_block_scopes_allow_shadowing() {
        let stmt = Stmt::While(WhileStmt {
            condition: Expr::Literal(Literal::Boolean(true)),
            body: Block::new(vec![var_decl("x", 3).into()]),
        });
        let program = Program::new(vec![Item::Decl(var_decl("x", 1)), Item::Stmt(stmt)]);

        let config = AnalyzerConfig {
            block_scopes: true,
            ..AnalyzerConfig::default()
        };
        let mut ctx = SemanticContext::with_config(config);
        collect_declarations(&mut ctx, &program);
        assert!(!ctx.has_errors());
        assert_eq!(ctx.scopes.depth(), 0);
    }

    #[test]
    fn test_collect_record_fields() {
        let record = Decl::Record(RecordType {
            name: ident("Pupil", 1),
            fields: vec![var_decl("Name", 2), var_decl("Age", 3), var_decl("Name", 4)],
        });
        let program = Program::new(vec![Item::Decl(record), Item::Decl(var_decl("Age", 6))]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);

        // Only the repeated field clashes; `Age` at top level does not
        assert_eq!(ctx.diagnostics(), [Diagnostic::already_defined("Name", 4)]);
        assert_eq!(
            ctx.resolve("Pupil").expect("should find").kind,
            SymbolKind::Type
        );
        assert_eq!(ctx.resolve("Age").expect("should find").line, 6);
    }

    #[test]
    fn test_collect_declaration_kinds() {
        let program = Program::new(vec![
            Item::Decl(Decl::Array(ArrayDecl {
                name: ident("scores", 1),
                ranges: vec![ArrayRange {
                    start: Expr::int(1),
                    end: Expr::int(30),
                }],
                element: TypeRef::Integer,
            })),
            Item::Decl(Decl::Pointer(PointerType {
                name: ident("IntPtr", 2),
                target: TypeRef::Integer,
            })),
            Item::Decl(Decl::Set(SetType {
                name: ident("Letters", 3),
                element: TypeRef::Char,
            })),
            Item::Decl(Decl::SetDef(SetDef {
                name: ident("Vowels", 4),
                set_type: TypeRef::named("Letters"),
                values: vec![Literal::Char('a'), Literal::Char('e')],
            })),
        ]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);

        assert!(!ctx.has_errors());
        let kind = |name: &str| ctx.resolve(name).expect("should find").kind;
        assert_eq!(kind("scores"), SymbolKind::Variable);
        assert_eq!(kind("IntPtr"), SymbolKind::Type);
        assert_eq!(kind("Letters"), SymbolKind::Type);
        assert_eq!(kind("Vowels"), SymbolKind::Type);
    }

    #[test]
    fn test_collect_enum_members() {
        let season = Decl::Enum(EnumType {
            name: ident("Season", 1),
            members: vec![ident("Spring", 1), ident("Summer", 1)],
        });
        let program = Program::new(vec![Item::Decl(season), Item::Decl(var_decl("Spring", 2))]);

        let mut ctx = SemanticContext::new();
        collect_declarations(&mut ctx, &program);
        assert_eq!(
            ctx.diagnostics(),
            [Diagnostic::already_defined("Spring", 2)]
        );
    }

    #[test]
    fn test_render_symbol_table_uses_config_order() {
        let config = AnalyzerConfig {
            scope_order: crate::scope::ScopeOrder::InnermostFirst,
            ..AnalyzerConfig::default()
        };
        let mut ctx = SemanticContext::with_config(config);
        ctx.declare(&ident("g", 1), SymbolKind::Variable);
        ctx.scopes.enter_scope(ScopeKind::Routine);

        let rendered = ctx.render_symbol_table();
        assert!(rendered.starts_with("Scope Level 1 (routine):"));
    }
}
