use crate::function::Function;
use crate::tokens::Kind;

use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
    Function(Rc<Function>),
}

impl Value {
    /// Only `nil`, `false` and the number zero are falsy. Empty strings and functions are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::String(_) | Self::Function(_) => true,
        }
    }

    /// The value to hand out when a binding is read.
    pub fn shared(&self) -> Self {
        match self {
            Self::Function(function) => Self::Function(function.shared()),
            other => other.clone(),
        }
    }
}

/// Values of different kinds are never equal. Functions are equal only to themselves, or to
/// another handle on the same declaration and scope.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Number(l), Self::Number(r)) => l == r,
            (Self::String(l), Self::String(r)) => l == r,
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r) || l.same_as(r),
            _ => false,
        }
    }
}

impl From<&Kind> for Value {
    fn from(kind: &Kind) -> Self {
        match kind {
            Kind::False => Self::Boolean(false),
            Kind::True => Self::Boolean(true),
            Kind::Number(n) => Self::Number(*n),
            Kind::String(s) => Self::String(s.clone()),
            _ => Self::Nil,
        }
    }
}

/// The form `print` writes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Nil => write!(f, "nil"),
            Self::Function(function) => write!(f, "{}", function),
        }
    }
}
