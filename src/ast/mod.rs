mod printer;

use crate::tokens::Token;
use crate::value::Value;

use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
        line: usize,
    },

    Group(Box<Expr>),

    Unary {
        op: Token,
        expr: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },

    Logical {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },

    Variable(Token),

    Assign {
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },

    // Reserved for classes. Parsed, never evaluated.
    Get {
        object: Box<Expr>,
        name: Token,
    },

    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This(Token),

    Super {
        keyword: Token,
        method: Token,
    },
}

impl Expr {
    /// Source line the expression is reported against.
    pub fn line(&self) -> usize {
        match self {
            Self::Literal { line, .. } => *line,
            Self::Group(expr) => expr.line(),
            Self::Unary { op, .. } | Self::Binary { op, .. } | Self::Logical { op, .. } => op.line,
            Self::Variable(name) | Self::Assign { name, .. } => name.line,
            Self::Call { paren, .. } => paren.line,
            Self::Get { name, .. } | Self::Set { name, .. } => name.line,
            Self::This(keyword) | Self::Super { keyword, .. } => keyword.line,
        }
    }
}

/// A named function with its parameters and body. Shared between the statement that declares it
/// and every function value created from it.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),

    Expr(Expr),

    Print(Expr),

    Variable {
        name: Token,
        initial: Option<Expr>,
    },

    If {
        condition: Expr,
        if_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Function(Rc<FunctionDecl>),

    Return {
        keyword: Token,
        value: Option<Expr>,
    },

    // Reserved for classes. Parsed, never evaluated.
    Class {
        name: Token,
        superclass: Option<Token>,
        methods: Vec<Rc<FunctionDecl>>,
    },
}
