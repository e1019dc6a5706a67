use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::value::Value;

/// Environments are shared: call frames extend the frame a closure
/// captured, not the caller's, and several closures may hold the same
/// frame alive.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutable: bool,
}

/// One lexical scope frame: name → (value, mutable) with an optional link
/// to the enclosing frame. Lookup walks outward, definitions are local,
/// reassignment updates the frame that owns the binding.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Binding>,
    outer: Option<Env>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassignError {
    NotFound,
    Immutable,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.store.get(name) {
            return Some(binding.value.clone());
        }

        self.outer
            .as_ref()
            .and_then(|outer| outer.borrow().get(name))
    }

    /// Defines a binding in this frame, shadowing any outer binding of the
    /// same name.
    pub fn define(&mut self, name: impl ToString, value: Value, mutable: bool) {
        self.store
            .insert(name.to_string(), Binding { value, mutable });
    }

    /// Updates the closest frame holding `name`. Fails when no frame holds
    /// it or the holder is a `const` binding.
    pub fn reassign(&mut self, name: &str, value: Value) -> Result<(), ReassignError> {
        if let Some(binding) = self.store.get_mut(name) {
            if !binding.mutable {
                return Err(ReassignError::Immutable);
            }

            binding.value = value;
            return Ok(());
        }

        match &self.outer {
            Some(outer) => outer.borrow_mut().reassign(name, value),
            None => Err(ReassignError::NotFound),
        }
    }
}
