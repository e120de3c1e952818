//! Callable values.
//!
//! A user function keeps the scope it was declared in alive, except through the binding its own
//! declaration leaves in that scope. That one holds a [`Closure::Declaring`] handle, and every
//! read of the binding trades it for a [`Closure::Shared`] one. A scope is still kept alive by
//! a shared handle stored back into it, e.g. `fun f() {} var g = f;` in the same block.

use crate::ast::FunctionDecl;
use crate::environment::{Environment, SharedEnvironment};
use crate::value::Value;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

/// Signature of a host function. It receives the evaluated arguments and the environment active
/// at the call site. An `Err` message becomes a runtime error on the call's line.
pub type NativeFn = fn(args: &[Value], env: &SharedEnvironment) -> Result<Value, String>;

pub enum Function {
    User {
        decl: Rc<FunctionDecl>,
        closure: Closure,
    },
    Native(NativeFunction),
}

/// The scope a user function was declared in.
pub enum Closure {
    Shared(SharedEnvironment),
    Declaring(Weak<RefCell<Environment>>),
}

impl Closure {
    /// `None` once a declaring scope has been freed.
    pub fn scope(&self) -> Option<SharedEnvironment> {
        match self {
            Self::Shared(scope) => Some(Rc::clone(scope)),
            Self::Declaring(scope) => scope.upgrade(),
        }
    }

    fn as_ptr(&self) -> *const RefCell<Environment> {
        match self {
            Self::Shared(scope) => Rc::as_ptr(scope),
            Self::Declaring(scope) => scope.as_ptr(),
        }
    }
}

impl Function {
    /// The value a function declaration binds in `scope`, the scope it closes over.
    pub fn declared(decl: Rc<FunctionDecl>, scope: &SharedEnvironment) -> Self {
        Self::User {
            decl,
            closure: Closure::Declaring(Rc::downgrade(scope)),
        }
    }

    /// A handle that keeps the closure alive, for a value leaving its binding.
    pub fn shared(self: &Rc<Self>) -> Rc<Self> {
        if let Self::User {
            decl,
            closure: Closure::Declaring(scope),
        } = self.as_ref()
        {
            if let Some(scope) = scope.upgrade() {
                return Rc::new(Self::User {
                    decl: Rc::clone(decl),
                    closure: Closure::Shared(scope),
                });
            }
        }

        Rc::clone(self)
    }

    /// The same declaration closed over the same scope, however the closure is held.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::User { decl, closure },
                Self::User {
                    decl: other_decl,
                    closure: other_closure,
                },
            ) => Rc::ptr_eq(decl, other_decl) && closure.as_ptr() == other_closure.as_ptr(),
            _ => false,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::User { decl, .. } => decl.params.len(),
            Self::Native(native) => native.arity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::User { decl, .. } => decl.name.name(),
            Self::Native(native) => native.name,
        }
    }
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub call_impl: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, arity: usize, call_impl: NativeFn) -> Self {
        Self {
            name,
            arity,
            call_impl,
        }
    }
}

/// Host functions installed in the global scope of every interpreter.
pub const NATIVES: &[NativeFunction] = &[NativeFunction::new("clock", 0, clock)];

fn clock(_args: &[Value], _env: &SharedEnvironment) -> Result<Value, String> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("Clock error: {}", e))?;

    Ok(Value::Number(elapsed.as_secs_f64()))
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { decl, .. } => write!(f, "<fn {}>", decl.name.name()),
            Self::Native(_) => write!(f, "<native fn>"),
        }
    }
}

// The closure is left out: it can reach this function again through its own bindings.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { decl, .. } => f
                .debug_struct("User")
                .field("name", &decl.name.name())
                .field("arity", &decl.params.len())
                .finish_non_exhaustive(),
            Self::Native(native) => f
                .debug_struct("Native")
                .field("name", &native.name)
                .field("arity", &native.arity)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Kind, Token};

    fn decl(name: &str, params: &[&str]) -> Rc<FunctionDecl> {
        Rc::new(FunctionDecl {
            name: Token::new(Kind::Identifier(name.to_string()), name, 1),
            params: params
                .iter()
                .map(|p| Token::new(Kind::Identifier(p.to_string()), *p, 1))
                .collect(),
            body: Vec::new(),
        })
    }

    #[test]
    fn user_function_arity_and_display() {
        let function = Function::User {
            decl: decl("add", &["a", "b"]),
            closure: Closure::Shared(Environment::new().into_shared()),
        };

        assert_eq!(function.arity(), 2);
        assert_eq!(function.name(), "add");
        assert_eq!(function.to_string(), "<fn add>");
    }

    #[test]
    fn declaring_scope_is_freed_once_nothing_shares_it() {
        let name = Token::new(Kind::Identifier("f".to_string()), "f", 1);
        let scope = Environment::new().into_shared();
        let freed = Rc::downgrade(&scope);

        let function = Function::declared(decl("f", &[]), &scope);
        scope
            .borrow_mut()
            .define("f", Value::Function(Rc::new(function)));

        let first = scope.borrow().get(&name).unwrap();
        let second = scope.borrow().get(&name).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "<fn f>");

        drop(scope);
        assert!(freed.upgrade().is_some());

        drop(first);
        drop(second);
        assert!(freed.upgrade().is_none());
    }

    #[test]
    fn functions_over_different_scopes_differ() {
        let f = decl("f", &[]);
        let one = Environment::new().into_shared();
        let two = Environment::new().into_shared();

        let first = Function::User {
            decl: Rc::clone(&f),
            closure: Closure::Shared(Rc::clone(&one)),
        };
        let again = Function::declared(Rc::clone(&f), &one);
        let other = Function::declared(f, &two);

        assert!(first.same_as(&again));
        assert!(!first.same_as(&other));
        assert!(!first.same_as(&Function::Native(NATIVES[0])));
    }

    #[test]
    fn clock_is_a_nullary_native() {
        let clock = NATIVES[0];
        assert_eq!(clock.name, "clock");
        assert_eq!(clock.arity, 0);

        let env = Environment::new().into_shared();
        let now = (clock.call_impl)(&[], &env).unwrap();
        assert!(matches!(now, Value::Number(n) if n > 0.0));

        assert_eq!(Function::Native(clock).to_string(), "<native fn>");
    }
}
