use std::fmt;

/// Byte range inside the condition string.
pub type Span = std::ops::Range<usize>;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl CmpOp {
    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Left-hand side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    /// `has_item:<item>`
    HasItem(String),
    /// `namespace.segment.segment`
    Dotted(Vec<String>),
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::HasItem(item) => write!(f, "has_item:{item}"),
            Path::Dotted(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

/// Right-hand side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `true` or `false`.
    Bool(bool),
    /// Integer or decimal, possibly negative.
    Number(f64),
    /// Bare identifier, compared as text (`time.weekday==Saturday`).
    Ident(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Ident(s) => write!(f, "{s}"),
        }
    }
}

/// A single `path op literal` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// What is read from the world.
    pub path: Path,
    /// How the read value is compared.
    pub op: CmpOp,
    /// What it is compared against.
    pub literal: Literal,
    /// Span of the whole clause.
    pub span: Span,
    /// Span of the path alone, for diagnostics about unknown namespaces.
    pub path_span: Span,
}

/// A full condition: clauses joined by `&&`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// At least one clause; all must hold.
    pub clauses: Vec<Clause>,
}
