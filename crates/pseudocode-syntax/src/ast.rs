use std::fmt;

use serde::{Deserialize, Serialize};

/// Source line number, 1-based
pub type Line = u32;

/// Root of the tree - one parsed program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// Top-level items in a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Decl(Decl),
    Function(FunctionDef),
    Procedure(ProcedureDef),
    Stmt(Stmt),
}

/// Identifier with the line it appeared on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub line: Line,
}

impl Identifier {
    pub fn new(name: impl Into<String>, line: Line) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Declared type of a variable, field, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Integer,
    Real,
    Char,
    String,
    Boolean,
    Date,
    /// A user-defined type referenced by name
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeRef::Integer => "INTEGER",
            TypeRef::Real => "REAL",
            TypeRef::Char => "CHAR",
            TypeRef::String => "STRING",
            TypeRef::Boolean => "BOOLEAN",
            TypeRef::Date => "DATE",
            TypeRef::Named(name) => name,
        }
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// Declaration forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Const(ConstDecl),
    Var(VarDecl),
    Array(ArrayDecl),
    Enum(EnumType),
    Record(RecordType),
    Pointer(PointerType),
    Set(SetType),
    SetDef(SetDef),
}

impl Decl {
    /// The declared identifier
    pub fn ident(&self) -> &Identifier {
        match self {
            Decl::Const(d) => &d.name,
            Decl::Var(d) => &d.name,
            Decl::Array(d) => &d.name,
            Decl::Enum(d) => &d.name,
            Decl::Record(d) => &d.name,
            Decl::Pointer(d) => &d.name,
            Decl::Set(d) => &d.name,
            Decl::SetDef(d) => &d.name,
        }
    }

    /// Whether this declaration introduces a user-defined type
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Decl::Enum(_) | Decl::Record(_) | Decl::Pointer(_) | Decl::Set(_) | Decl::SetDef(_)
        )
    }
}

/// CONSTANT name = value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub name: Identifier,
    pub value: Expr,
}

/// DECLARE name : type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Identifier,
    pub ty: TypeRef,
}

/// DECLARE name : ARRAY[lo:hi, ...] OF type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDecl {
    pub name: Identifier,
    pub ranges: Vec<ArrayRange>,
    pub element: TypeRef,
}

/// One lo:hi index range of an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayRange {
    pub start: Expr,
    pub end: Expr,
}

/// TYPE name = (A, B, C)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Identifier,
    pub members: Vec<Identifier>,
}

/// TYPE name ... ENDTYPE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: Identifier,
    pub fields: Vec<Decl>,
}

/// TYPE name = ^type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerType {
    pub name: Identifier,
    pub target: TypeRef,
}

/// TYPE name = SET OF type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetType {
    pub name: Identifier,
    pub element: TypeRef,
}

/// DEFINE name (values...) : set type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDef {
    pub name: Identifier,
    pub set_type: TypeRef,
    pub values: Vec<Literal>,
}

// ---------------------------------------------------------------------------
// Routines
// ---------------------------------------------------------------------------

/// FUNCTION name(params) RETURNS type ... ENDFUNCTION
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Identifier,
    pub params: Option<Vec<Param>>,
    pub return_type: TypeRef,
    pub body: Block,
}

/// PROCEDURE name(params) ... ENDPROCEDURE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDef {
    pub name: Identifier,
    pub params: Option<Vec<Param>>,
    pub body: Block,
}

/// Routine parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub mode: PassMode,
    pub name: Identifier,
    pub ty: TypeRef,
}

/// How an argument is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PassMode {
    ByRef,
    ByVal,
    #[default]
    Default,
}

impl PassMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PassMode::ByRef => "BYREF",
            PassMode::ByVal => "BYVAL",
            PassMode::Default => "DEFAULT",
        }
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// Ordered list of declarations and statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

impl Block {
    pub fn new(items: Vec<BlockItem>) -> Self {
        Self { items }
    }
}

/// Entry of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockItem {
    Decl(Decl),
    Stmt(Stmt),
}

impl From<Decl> for BlockItem {
    fn from(decl: Decl) -> Self {
        BlockItem::Decl(decl)
    }
}

impl From<Stmt> for BlockItem {
    fn from(stmt: Stmt) -> Self {
        BlockItem::Stmt(stmt)
    }
}

/// Statement types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Assign(AssignStmt),
    If(IfStmt),
    Case(CaseStmt),
    For(ForStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    Return(ReturnStmt),
    Call(CallExpr),
    Input(InputStmt),
    Output(OutputStmt),
    File(FileStmt),
}

/// target <- value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub target: LValue,
    pub value: Expr,
}

/// IF cond THEN ... ELSE ... ENDIF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

/// CASE OF subject ... ENDCASE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStmt {
    pub subject: Identifier,
    pub arms: Vec<CaseArm>,
}

/// One arm of a case statement; `to` turns `from` into a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseArm {
    pub from: Expr,
    pub to: Option<Expr>,
    pub body: Block,
}

/// FOR var <- start TO end STEP step ... NEXT next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub var: Identifier,
    pub start: Expr,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: Block,
    /// Identifier named by the closing NEXT marker
    pub next: Identifier,
}

/// WHILE cond ... ENDWHILE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
}

/// REPEAT ... UNTIL cond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatStmt {
    pub body: Block,
    pub condition: Expr,
}

/// RETURN value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Expr,
}

/// INPUT target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputStmt {
    pub target: Identifier,
}

/// OUTPUT a, b, c
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputStmt {
    pub items: Vec<Expr>,
}

/// File handling statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileStmt {
    Open { filename: Expr, mode: FileMode },
    Read { filename: Expr, target: Identifier },
    Write { filename: Expr, value: Expr },
    Close { filename: Expr },
    Seek { filename: Expr, position: Expr },
    GetRecord { filename: Expr, target: Identifier },
    PutRecord { filename: Expr, source: Identifier },
}

/// OPENFILE modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    Read,
    Write,
    Append,
    Random,
}

impl FileMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FileMode::Read => "READ",
            FileMode::Write => "WRITE",
            FileMode::Append => "APPEND",
            FileMode::Random => "RANDOM",
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Expression types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    LValue(LValue),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Pointer(PointerExpr),
    Eof(Box<Expr>),
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::integer(value))
    }

    pub fn real(value: f64) -> Self {
        Expr::Literal(Literal::real(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn var(name: impl Into<String>, line: Line) -> Self {
        Expr::LValue(LValue::var(Identifier::new(name, line)))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn call(callee: Identifier, args: Vec<Expr>) -> Self {
        Expr::Call(CallExpr { callee, args })
    }

    pub fn eof(filename: Expr) -> Self {
        Expr::Eof(Box::new(filename))
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl From<LValue> for Expr {
    fn from(lvalue: LValue) -> Self {
        Expr::LValue(lvalue)
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(Number),
    String(String),
    Char(char),
    Boolean(bool),
    Date(Date),
}

impl Literal {
    pub fn integer(value: i64) -> Self {
        Literal::Number(Number::Integer(value))
    }

    pub fn real(value: f64) -> Self {
        Literal::Number(Number::Real(value))
    }
}

/// Numeric payload, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// Calendar date literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl Date {
    pub fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }
}

/// Variable, array element or record member reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LValue {
    pub name: Identifier,
    pub indices: Vec<Expr>,
    pub member: Option<String>,
}

impl LValue {
    pub fn var(name: Identifier) -> Self {
        Self {
            name,
            indices: Vec::new(),
            member: None,
        }
    }

    pub fn indexed(name: Identifier, indices: Vec<Expr>) -> Self {
        Self {
            name,
            indices,
            member: None,
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

/// Binary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Multiplicative
    Mul,
    Div,
    IntDiv,
    Mod,
    // Additive
    Add,
    Sub,
    Concat,
    // Relational
    Lt,
    Gt,
    LtEq,
    GtEq,
    // Equality
    Eq,
    NotEq,
    // Logical
    And,
    Or,
}

/// Precedence level a binary operator belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLevel {
    Multiplicative,
    Additive,
    Relational,
    Equality,
    LogicalAnd,
    LogicalOr,
}

impl BinaryLevel {
    /// Tag used when rendering a node of this level
    pub fn tag(self) -> &'static str {
        match self {
            BinaryLevel::Multiplicative => "MulExpOp",
            BinaryLevel::Additive => "AddExpOp",
            BinaryLevel::Relational => "RelExpCompare",
            BinaryLevel::Equality => "EqExpCompare",
            BinaryLevel::LogicalAnd => "LAndExpOp",
            BinaryLevel::LogicalOr => "LOrExpOp",
        }
    }
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::IntDiv => "DIV",
            BinaryOp::Mod => "MOD",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Concat => "&",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }

    pub fn level(self) -> BinaryLevel {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::IntDiv | BinaryOp::Mod => {
                BinaryLevel::Multiplicative
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => BinaryLevel::Additive,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
                BinaryLevel::Relational
            }
            BinaryOp::Eq | BinaryOp::NotEq => BinaryLevel::Equality,
            BinaryOp::And => BinaryLevel::LogicalAnd,
            BinaryOp::Or => BinaryLevel::LogicalOr,
        }
    }
}

/// Unary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "NOT",
        }
    }
}

/// Function or procedure call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Identifier,
    pub args: Vec<Expr>,
}

/// Pointer reference (`^p`) or address-of (`@x`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerExpr {
    pub op: PointerOp,
    pub target: LValue,
}

/// Pointer operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerOp {
    Deref,
    AddressOf,
}

impl PointerOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PointerOp::Deref => "^",
            PointerOp::AddressOf => "@",
        }
    }
}
