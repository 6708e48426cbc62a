//! Go syntax tree consumed by the scanner.
//!
//! Only the shapes that matter for name resolution are modelled. Types are
//! expressions, the same way the Go compiler's own `go/ast` treats them, so a
//! `make(chan T)` argument or a `[]T(x)` conversion needs no special casing.

use rowan::{TextRange, TextSize};

/// Index of a file within its package, assigned in filename order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileId(pub u32);

/// Source position of a node
///
/// Ordered by file, then by byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub file: FileId,
    pub offset: TextSize,
    pub len: TextSize,
    /// 1-based
    pub line: u32,
    /// 1-based, in bytes
    pub column: u32,
}

impl Pos {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

#[derive(Debug, Clone)]
pub struct File {
    pub id: FileId,
    pub package: Ident,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// `Some` for methods
    pub recv: Option<Vec<Field>>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Const,
    Var,
    Type,
}

/// `const`, `var` or `type` declaration, possibly grouped in parentheses
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub kind: GenKind,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub ty: Expr,
}

/// Parameter, result, struct field, or interface element
#[derive(Debug, Clone)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
}

#[derive(Debug, Clone, Default)]
pub struct FuncType {
    pub type_params: Vec<Field>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CaseClause {
    /// empty for `default:`
    pub list: Vec<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CommClause {
    /// `None` for `default:`
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(GenDecl),
    Expr(Expr),
    /// right-hand side of `=`, `op=` and `:=`; targets are never read
    Assign(Vec<Expr>),
    IncDec(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        els: Option<Box<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    /// `for k, v := range expr`; the iteration variables are never read
    Range {
        expr: Expr,
        body: Block,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<CaseClause>,
    },
    TypeSwitch {
        init: Option<Box<Stmt>>,
        expr: Expr,
        clauses: Vec<CaseClause>,
    },
    Select(Vec<CommClause>),
    Return(Vec<Expr>),
    Go(Expr),
    Defer(Expr),
    Labeled(Option<Box<Stmt>>),
    /// `break`, `continue`, `goto`, `fallthrough`
    Branch,
    Empty,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    BasicLit(Pos),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
    },
    CompositeLit {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    FuncLit {
        ty: FuncType,
        body: Block,
    },
    Unary(Box<Expr>),
    Binary(Box<Expr>, Box<Expr>),
    /// indexing and generic instantiation
    Index {
        x: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice {
        x: Box<Expr>,
        bounds: Vec<Expr>,
    },
    /// `x.(T)`, `ty` is `None` for `x.(type)`
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Paren(Box<Expr>),
    /// pointer type or dereference
    Star(Box<Expr>),
    /// `...T` in parameters, `x...` in calls
    Ellipsis(Option<Box<Expr>>),
    /// slice types have no `len`; `[...]T` lengths are `Ellipsis(None)`
    ArrayType {
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType(Box<Expr>),
    FuncType(FuncType),
    StructType(Vec<Field>),
    /// methods are fields with a `FuncType`, embedded types have no names
    InterfaceType(Vec<Field>),
    /// anything the lowering did not understand
    Bad(Pos),
}
