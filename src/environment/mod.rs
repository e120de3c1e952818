use crate::errors::RuntimeError;
use crate::tokens::Token;
use crate::value::Value;

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A scope that may be held by the running block and by any closure created inside it.
pub type SharedEnvironment = Rc<RefCell<Environment>>;

/// Name to value bindings for one scope, linked to the scope that encloses it.
#[derive(Debug, Default)]
pub struct Environment {
    values: FxHashMap<String, Value>,
    enclosing: Option<SharedEnvironment>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: &SharedEnvironment) -> Self {
        Self {
            values: FxHashMap::default(),
            enclosing: Some(Rc::clone(enclosing)),
        }
    }

    pub fn into_shared(self) -> SharedEnvironment {
        Rc::new(RefCell::new(self))
    }

    /// Insert or overwrite in this scope only. Redeclaring and shadowing both go through here.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look a name up here, then in each enclosing scope in turn.
    pub fn get(&self, ident: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(ident.name()) {
            return Ok(value.shared());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(ident),
            None => Err(RuntimeError::UndefinedVariable {
                name: ident.name().to_string(),
                line: ident.line,
            }),
        }
    }

    /// Overwrite the nearest existing binding. Never declares.
    pub fn assign(&mut self, ident: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(ident.name()) {
            *slot = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(ident, value),
            None => Err(RuntimeError::UndefinedVariable {
                name: ident.name().to_string(),
                line: ident.line,
            }),
        }
    }
}
