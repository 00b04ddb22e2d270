use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::object::Object;

/// A chained name→value scope. Lookup walks outward on miss; `set` always
/// writes the innermost frame, so a `let` in a nested block never leaks out.
#[derive(Debug, Clone)]
pub struct Environment {
  store: HashMap<String, Object>,
  outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
  /// A top-level scope with no parent, used for a fresh REPL session or file run.
  pub fn new_empty() -> Rc<RefCell<Environment>> {
    Rc::new(RefCell::new(Environment {
      store: HashMap::new(),
      outer: None,
    }))
  }

  /// A scope nested inside `outer`, used at function application. `outer` is
  /// the function's captured environment, not the caller's — this is what
  /// gives closures lexical rather than dynamic scope.
  pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
    Rc::new(RefCell::new(Environment {
      store: HashMap::new(),
      outer: Some(outer),
    }))
  }

  pub fn get(&self, name: &str) -> Option<Object> {
    if let Some(value) = self.store.get(name) {
      return Some(value.clone());
    }
    self.outer.as_ref()?.borrow().get(name)
  }

  pub fn set(&mut self, name: String, value: Object) {
    self.store.insert(name, value);
  }
}
