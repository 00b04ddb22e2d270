use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use parser::{expr::Identifier, stmt::BlockStatement};

use crate::environment::Environment;

/// A (type-tag, 64-bit-bucket) view of a value sufficient to use it as a
/// hash-map key. The enum discriminant supplies the type tag, so an
/// `Integer(0)` and a `Boolean(false)` key never collide even though both
/// carry a zero bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKey {
  Integer(i64),
  Boolean(bool),
  String(u64),
}

/// A key/value pair retained in a `Hash` object so iteration and inspection
/// can render the original key, not just its `HashKey` view.
#[derive(Debug, Clone)]
pub struct HashPair {
  pub key: Object,
  pub value: Object,
}

#[derive(Clone)]
pub struct FunctionObj {
  pub params: Vec<Identifier>,
  pub body: BlockStatement,
  pub env: Rc<RefCell<Environment>>,
}

impl fmt::Debug for FunctionObj {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "FunctionObj {{ params: {:?}, .. }}", self.params.iter().map(|p| &p.name).collect::<Vec<_>>())
  }
}

pub type BuiltinFn = fn(&[Object]) -> Object;

/// The runtime value family. `ReturnValue` and `Error` are control-flow
/// carriers rather than ordinary values: they propagate up through `eval`
/// and are stripped at the boundaries described in the evaluator.
#[derive(Debug, Clone)]
pub enum Object {
  Integer(i64),
  Boolean(bool),
  String(String),
  Null,
  Array(Vec<Object>),
  Hash(HashMap<HashKey, HashPair>),
  Function(Rc<FunctionObj>),
  Builtin(BuiltinFn),
  ReturnValue(Box<Object>),
  Error(String),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

/// FNV-1a 64, used to bucket string hash keys.
fn fnv1a_64(bytes: &[u8]) -> u64 {
  const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
  const PRIME: u64 = 0x0000_0100_0000_01b3;
  let mut hash = OFFSET_BASIS;
  for &byte in bytes {
    hash ^= byte as u64;
    hash = hash.wrapping_mul(PRIME);
  }
  hash
}

impl Object {
  pub fn type_name(&self) -> &'static str {
    match self {
      Object::Integer(_) => "INTEGER",
      Object::Boolean(_) => "BOOLEAN",
      Object::String(_) => "STRING",
      Object::Null => "NULL",
      Object::Array(_) => "ARRAY",
      Object::Hash(_) => "HASH",
      Object::Function(_) => "FUNCTION",
      Object::Builtin(_) => "BUILTIN",
      Object::ReturnValue(_) => "RETURN_VALUE",
      Object::Error(_) => "ERROR",
    }
  }

  pub fn is_error(&self) -> bool {
    matches!(self, Object::Error(_))
  }

  pub fn is_return_value(&self) -> bool {
    matches!(self, Object::ReturnValue(_))
  }

  /// Truthiness: only `null` and `false` are false, everything else
  /// (including integer `0`) is true.
  pub fn is_truthy(&self) -> bool {
    !matches!(self, Object::Null | Object::Boolean(false))
  }

  /// The `HashKey` view of this value, or `None` if it cannot index a hash.
  pub fn hash_key(&self) -> Option<HashKey> {
    match self {
      Object::Integer(value) => Some(HashKey::Integer(*value)),
      Object::Boolean(value) => Some(HashKey::Boolean(*value)),
      Object::String(value) => Some(HashKey::String(fnv1a_64(value.as_bytes()))),
      _ => None,
    }
  }

  pub fn error(message: impl Into<String>) -> Object {
    Object::Error(message.into())
  }
}

impl fmt::Display for Object {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Object::Integer(value) => write!(f, "{}", value),
      Object::Boolean(value) => write!(f, "{}", value),
      Object::String(value) => write!(f, "{}", value),
      Object::Null => write!(f, "null"),
      Object::Array(elements) => {
        let rendered = elements
          .iter()
          .map(|e| e.to_string())
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "[{}]", rendered)
      },
      Object::Hash(pairs) => {
        let rendered = pairs
          .values()
          .map(|pair| format!("{} : {}", pair.key, pair.value))
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "{{{}}}", rendered)
      },
      Object::Function(function) => {
        let params = function
          .params
          .iter()
          .map(|p| p.name.clone())
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "fn({}) {{\n{}\n}}", params, function.body)
      },
      Object::Builtin(_) => write!(f, "builtin function"),
      Object::ReturnValue(value) => write!(f, "{}", value),
      Object::Error(message) => write!(f, "Error: {}", message),
    }
  }
}
