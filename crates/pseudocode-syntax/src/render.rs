//! Textual dump of the syntax tree.
//!
//! Statement-level nodes render one per line, prefixed by the indentation of
//! their nesting level; interior nodes list their children one level deeper
//! and close with a `}` line. Expressions and literals render inline through
//! their `Display` impls.
//!
//! The nesting level is an explicit argument threaded through every call, so
//! rendering a subtree never depends on what was rendered before it.

use std::fmt::{self, Write};

use crate::ast::{
    ArrayRange, Block, BlockItem, CallExpr, CaseArm, CaseStmt, Date, Decl, Expr, FileStmt,
    ForStmt, FunctionDef, IfStmt, Item, LValue, Literal, Number, Param, PointerExpr,
    ProcedureDef, Program, RecordType, Stmt, TypeRef,
};

/// Default number of spaces per nesting level
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Widest indentation the printer will use
pub const MAX_INDENT_WIDTH: usize = 16;

/// Renders tree nodes at a given nesting level.
#[derive(Debug, Clone)]
pub struct TreePrinter {
    indent_str: String,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::with_indent_width(DEFAULT_INDENT_WIDTH)
    }
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Printer indenting by `width` spaces, capped at [`MAX_INDENT_WIDTH`]
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            indent_str: " ".repeat(width.min(MAX_INDENT_WIDTH)),
        }
    }

    fn indent(&self, level: usize) -> String {
        self.indent_str.repeat(level)
    }

    /// Render a whole program.
    pub fn render_program(&self, program: &Program) -> String {
        let mut result = String::from("CompUnit {\n");
        for item in &program.items {
            let _ = writeln!(result, "{}", self.render_item(item, 1));
        }
        result.push('}');
        result
    }

    pub fn render_item(&self, item: &Item, indent_level: usize) -> String {
        match item {
            Item::Decl(decl) => self.render_decl(decl, indent_level),
            Item::Function(func) => self.render_function(func, indent_level),
            Item::Procedure(proc) => self.render_procedure(proc, indent_level),
            Item::Stmt(stmt) => self.render_stmt(stmt, indent_level),
        }
    }

    pub fn render_decl(&self, decl: &Decl, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        match decl {
            Decl::Const(c) => format!("{indent}ConstDecl {{ {}, {} }}", c.name, c.value),
            Decl::Var(v) => format!("{indent}VarDecl {{ {}, {} }}", v.name, v.ty),
            Decl::Array(a) => format!(
                "{indent}VarDeclArray {{ {}, {}, {} }}",
                a.name,
                Spaced(&a.ranges),
                a.element
            ),
            Decl::Enum(e) => format!("{indent}Enum {{ {}, {} }}", e.name, Spaced(&e.members)),
            Decl::Record(r) => self.render_record(r, indent_level),
            Decl::Pointer(p) => format!("{indent}Pointer {{ {}, {} }}", p.name, p.target),
            Decl::Set(s) => format!("{indent}Set {{ {}, {} }}", s.name, s.element),
            Decl::SetDef(s) => format!(
                "{indent}SetDef {{ {}, {}, {} }}",
                s.name,
                s.set_type,
                Spaced(&s.values)
            ),
        }
    }

    fn render_record(&self, record: &RecordType, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        let mut result = format!("{indent}Record {{ {},\n", record.name);
        for field in &record.fields {
            let _ = writeln!(result, "{}", self.render_decl(field, indent_level + 1));
        }
        let _ = write!(result, "{indent}}}");
        result
    }

    fn render_function(&self, func: &FunctionDef, indent_level: usize) -> String {
        let header = format!(
            "FuncDef {{ {}, {}, {},",
            func.return_type,
            func.name,
            ParamList(func.params.as_deref())
        );
        self.render_nested(&header, &func.body, indent_level)
    }

    fn render_procedure(&self, proc: &ProcedureDef, indent_level: usize) -> String {
        let header = format!(
            "ProcDef {{ {}, {},",
            proc.name,
            ParamList(proc.params.as_deref())
        );
        self.render_nested(&header, &proc.body, indent_level)
    }

    /// `header`, then `block` one level deeper, then the closing brace.
    fn render_nested(&self, header: &str, block: &Block, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        format!(
            "{indent}{header}\n{}\n{indent}}}",
            self.render_block(block, indent_level + 1)
        )
    }

    pub fn render_block(&self, block: &Block, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        let mut result = format!("{indent}Block {{\n");
        for item in &block.items {
            let rendered = match item {
                BlockItem::Decl(decl) => self.render_decl(decl, indent_level + 1),
                BlockItem::Stmt(stmt) => self.render_stmt(stmt, indent_level + 1),
            };
            let _ = writeln!(result, "{rendered}");
        }
        let _ = write!(result, "{indent}}}");
        result
    }

    pub fn render_stmt(&self, stmt: &Stmt, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        match stmt {
            Stmt::Assign(a) => format!("{indent}StmtAssign {{ {}, {} }}", a.target, a.value),
            Stmt::If(s) => self.render_if(s, indent_level),
            Stmt::Case(s) => self.render_case(s, indent_level),
            Stmt::For(s) => self.render_for(s, indent_level),
            Stmt::While(s) => {
                let header = format!("StmtWhile {{ {},", s.condition);
                self.render_nested(&header, &s.body, indent_level)
            }
            Stmt::Repeat(s) => {
                let header = format!("StmtRepeat {{ {},", s.condition);
                self.render_nested(&header, &s.body, indent_level)
            }
            Stmt::Return(r) => format!("{indent}StmtReturn {{ {} }}", r.value),
            Stmt::Call(call) => format!("{indent}StmtCall {{ {call} }}"),
            Stmt::Input(i) => format!("{indent}StmtInput {{ {} }}", i.target),
            Stmt::Output(o) => format!("{indent}StmtOutput {{ {} }}", Spaced(&o.items)),
            Stmt::File(f) => format!("{indent}{}", FileOp(f)),
        }
    }

    fn render_if(&self, stmt: &IfStmt, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        let else_part = match &stmt.else_block {
            Some(block) => self.render_block(block, indent_level + 1),
            None => format!("{}no-else", self.indent(indent_level + 1)),
        };
        format!(
            "{indent}StmtIf {{ {},\n{}\n{else_part}\n{indent}}}",
            stmt.condition,
            self.render_block(&stmt.then_block, indent_level + 1)
        )
    }

    fn render_case(&self, stmt: &CaseStmt, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        let mut result = format!("{indent}StmtCase {{ {},\n", stmt.subject);
        for arm in &stmt.arms {
            let _ = writeln!(result, "{}", self.render_case_arm(arm, indent_level + 1));
        }
        let _ = write!(result, "{indent}}}");
        result
    }

    fn render_case_arm(&self, arm: &CaseArm, indent_level: usize) -> String {
        let header = match &arm.to {
            Some(to) => format!("Case {{ {}, {},", arm.from, to),
            None => format!("Case {{ {},", arm.from),
        };
        self.render_nested(&header, &arm.body, indent_level)
    }

    fn render_for(&self, stmt: &ForStmt, indent_level: usize) -> String {
        let step = match &stmt.step {
            Some(step) => step.to_string(),
            None => "no-step".to_string(),
        };
        let header = format!(
            "StmtFor {{ {}, {}, {}, {step},",
            stmt.var, stmt.start, stmt.end
        );
        self.render_nested(&header, &stmt.body, indent_level)
    }
}

/// Render a program with the default printer.
pub fn render_program(program: &Program) -> String {
    TreePrinter::default().render_program(program)
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_program(self))
    }
}

/// Space-separated listing, as used for argument and item lists.
struct Spaced<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for Spaced<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

struct ParamList<'a>(Option<&'a [Param]>);

impl fmt::Display for ParamList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some([]) => f.write_str("ParamList { }"),
            Some(params) => write!(f, "ParamList {{ {} }}", Spaced(params)),
            None => f.write_str("no-param"),
        }
    }
}

struct FileOp<'a>(&'a FileStmt);

impl fmt::Display for FileOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FileStmt::Open { filename, mode } => {
                write!(f, "StmtOpenFile {{ {filename}, {} }}", mode.as_str())
            }
            FileStmt::Read { filename, target } => {
                write!(f, "StmtReadFile {{ {filename}, {target} }}")
            }
            FileStmt::Write { filename, value } => {
                write!(f, "StmtWriteFile {{ {filename}, {value} }}")
            }
            FileStmt::Close { filename } => write!(f, "StmtCloseFile {{ {filename} }}"),
            FileStmt::Seek { filename, position } => {
                write!(f, "StmtSeek {{ {filename}, {position} }}")
            }
            FileStmt::GetRecord { filename, target } => {
                write!(f, "StmtGetRecord {{ {filename}, {target} }}")
            }
            FileStmt::PutRecord { filename, source } => {
                write!(f, "StmtPutRecord {{ {filename}, {source} }}")
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param {{ {}, {}, {} }}", self.mode.as_str(), self.name, self.ty)
    }
}

impl fmt::Display for ArrayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrRange {{ {}, {} }}", self.start, self.end)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::LValue(lval) => write!(f, "{lval}"),
            Expr::Binary(b) => write!(
                f,
                "{} {{ {}, {}, {} }}",
                b.op.level().tag(),
                b.op.as_str(),
                b.left,
                b.right
            ),
            Expr::Unary(u) => write!(f, "UnaryExpOp {{ {}, {} }}", u.op.as_str(), u.operand),
            Expr::Call(call) => write!(f, "{call}"),
            Expr::Pointer(p) => write!(f, "{p}"),
            Expr::Eof(filename) => write!(f, "EOF {{ {filename} }}"),
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "FuncCall {{ {}, }}", self.callee)
        } else {
            write!(f, "FuncCall {{ {}, {} }}", self.callee, Spaced(&self.args))
        }
    }
}

impl fmt::Display for PointerExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PtrOp {{ {}, {} }}", self.op.as_str(), self.target)
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indices.is_empty() {
            match &self.member {
                Some(member) => write!(f, "LVal {{ {}.{member} }}", self.name),
                None => write!(f, "LVal {{ {} }}", self.name),
            }
        } else {
            write!(f, "LValArr {{ {}, {}", self.name, Spaced(&self.indices))?;
            if let Some(member) = &self.member {
                write!(f, " .{member}")?;
            }
            f.write_str(" }")
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "\"{s}\""),
            Literal::Char(c) => write!(f, "'{c}'"),
            Literal::Boolean(true) => f.write_str("TRUE"),
            Literal::Boolean(false) => f.write_str("FALSE"),
            Literal::Date(d) => write!(f, "{d}"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{v}"),
            // Debug keeps the fractional part of whole reals (2.0, not 2)
            Number::Real(v) => write!(f, "{v:?}"),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}
