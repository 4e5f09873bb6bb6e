//! Typed AST for BaiScript programs.
//!
//! Rather than the reference's single `ASTNode` struct with a string-valued
//! discriminator and two generic children, each shape here carries exactly
//! the fields it needs. Every node still carries a 1-based source line
//! number, since diagnostics are reported per-line throughout the pipeline.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Enteger,
    Charot,
    Kuan,
}

impl DataType {
    pub fn lexeme(self) -> &'static str {
        match self {
            DataType::Enteger => "ENTEGER",
            DataType::Charot => "CHAROT",
            DataType::Kuan => "KUAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDec {
    Inc,
    Dec,
}

impl IncDec {
    pub fn step(self) -> i64 {
        match self {
            IncDec::Inc => 1,
            IncDec::Dec => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    /// The binary operator a compound assignment expands to, per the TAC
    /// lowering rule `ident = ident <op> rhs`. `None` for plain `=`.
    pub fn binop(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinOp::Add),
            AssignOp::SubAssign => Some(BinOp::Sub),
            AssignOp::MulAssign => Some(BinOp::Mul),
            AssignOp::DivAssign => Some(BinOp::Div),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Literal {
    /// A decimal integer literal.
    Int(i64),
    /// A single-quoted character literal, pre-resolved to its codepoint.
    Char(i64),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal, u32),
    Identifier(String, u32),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        line: u32,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: u32,
    },
    /// `++x` / `--x`. The operand is kept general (not restricted to
    /// `Identifier` at the type level) so the analyzer can report
    /// "prefix/postfix on non-identifier" the way the reference does.
    Prefix {
        op: IncDec,
        operand: Box<Expr>,
        line: u32,
    },
    Postfix {
        op: IncDec,
        operand: Box<Expr>,
        line: u32,
    },
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal(_, line) => *line,
            Expr::Identifier(_, line) => *line,
            Expr::Binary { line, .. } => *line,
            Expr::Unary { line, .. } => *line,
            Expr::Prefix { line, .. } => *line,
            Expr::Postfix { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub datatype: DataType,
    pub declarators: Vec<Declarator>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub target: Expr,
    pub op: AssignOp,
    pub value: Expr,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub enum PrintItem {
    Expr(Expr),
    Str(String, u32),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Declaration(Declaration),
    Assignment(Assignment),
    /// A bare expression statement, e.g. `i++;` outside of a `PRENT`.
    Expr(Expr),
    Print(Vec<PrintItem>, u32),
}

/// `START` / `STATEMENT_LIST`: a program is just an ordered list of
/// statements. The reference's right-leaning binary-tree encoding of
/// statement lists is a parser artifact, not a real invariant; `Vec<Stmt>`
/// is the idiomatic equivalent.
pub type Program = Vec<Stmt>;
