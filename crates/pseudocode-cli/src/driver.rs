//! Runs one program tree through the semantic core.
//!
//! The tree arrives as JSON from an external parser. Declarations are
//! replayed into a fresh [`SemanticContext`] and the requested dumps are
//! rendered once the replay has finished.

use std::path::Path;

use pseudocode_analyzer::{collect_declarations, AnalyzerConfig, Diagnostic, SemanticContext};
use pseudocode_syntax::{Program, TreePrinter};

use crate::args::Options;

/// Outcome of analyzing one program
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    /// Tree dump, when requested
    pub ast: Option<String>,
    /// Symbol table dump, when requested
    pub symbol_table: Option<String>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Deserialize a program tree from JSON
pub fn parse_program(json: &str) -> Result<Program, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and deserialize a program tree from a JSON file
pub fn load_program(path: &Path) -> Result<Program, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let program = parse_program(&content)?;
    Ok(program)
}

/// Replay declarations and render the requested dumps.
pub fn analyze(program: &Program, config: AnalyzerConfig, show_ast: bool, show_st: bool) -> Report {
    let printer = TreePrinter::with_indent_width(config.indent_width);
    let mut ctx = SemanticContext::with_config(config);
    collect_declarations(&mut ctx, program);

    tracing::debug!(
        items = program.items.len(),
        diagnostics = ctx.diagnostics().len(),
        "analyzed program"
    );

    Report {
        diagnostics: ctx.diagnostics().to_vec(),
        ast: show_ast.then(|| printer.render_program(program)),
        symbol_table: show_st.then(|| ctx.render_symbol_table()),
    }
}

/// Load the configuration and program named by `options` and analyze them.
pub fn run(options: &Options) -> Result<Report, Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => AnalyzerConfig::load_from_file(path)?,
        None => AnalyzerConfig::default(),
    };
    let program = load_program(&options.input)?;
    Ok(analyze(&program, config, options.show_ast, options.show_st))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = r#"{
        "items": [
            { "Decl": { "Var": { "name": { "name": "x", "line": 1 }, "ty": "Integer" } } },
            { "Decl": { "Var": { "name": { "name": "x", "line": 2 }, "ty": "Real" } } }
        ]
    }"#;

    #[test]
    fn test_parse_program() {
        let program = parse_program(PROGRAM).expect("should parse");
        assert_eq!(program.items.len(), 2);
    }

    #[test]
    fn test_analyze_without_flags_renders_nothing() {
        let program = parse_program(PROGRAM).expect("should parse");
        let report = analyze(&program, AnalyzerConfig::default(), false, false);

        assert!(report.ast.is_none());
        assert!(report.symbol_table.is_none());
        assert_eq!(report.diagnostics, [Diagnostic::already_defined("x", 2)]);
        assert!(report.has_errors());
    }

    #[test]
    fn test_analyze_with_flags() {
        let program = parse_program(PROGRAM).expect("should parse");
        let report = analyze(&program, AnalyzerConfig::default(), true, true);

        assert_eq!(
            report.ast.as_deref(),
            Some("CompUnit {\n  VarDecl { x, INTEGER }\n  VarDecl { x, REAL }\n}")
        );
        assert_eq!(
            report.symbol_table.as_deref(),
            Some("Scope Level 0 (global):\n  x -> VARIABLE (line 1)\n")
        );
    }

    #[test]
    fn test_parse_program_rejects_bad_json() {
        assert!(parse_program(r#"{ "items": [ { "Decl": 5 } ] }"#).is_err());
    }
}
