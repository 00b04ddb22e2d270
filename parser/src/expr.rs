use std::fmt;

use lexer::token::Token;

use crate::stmt::BlockStatement;

/// A bare name. Used both as an expression and as the binding name of a
/// `let` statement and of function parameters.
#[derive(Debug, Clone)]
pub struct Identifier {
  pub token: Token,
  pub name: String,
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

#[derive(Debug, Clone)]
pub enum Expr {
  Identifier(Identifier),
  IntegerLiteral {
    token: Token,
    value: i64,
  },
  StringLiteral {
    token: Token,
    value: String,
  },
  BooleanLiteral {
    token: Token,
    value: bool,
  },
  Prefix {
    token: Token,
    operator: String,
    right: Box<Expr>,
  },
  Infix {
    token: Token,
    left: Box<Expr>,
    operator: String,
    right: Box<Expr>,
  },
  If {
    token: Token,
    condition: Box<Expr>,
    consequence: BlockStatement,
    alternative: Option<BlockStatement>,
  },
  FunctionLiteral {
    token: Token,
    parameters: Vec<Identifier>,
    body: BlockStatement,
  },
  Call {
    token: Token,
    function: Box<Expr>,
    arguments: Vec<Expr>,
  },
  ArrayLiteral {
    token: Token,
    elements: Vec<Expr>,
  },
  Index {
    token: Token,
    left: Box<Expr>,
    index: Box<Expr>,
  },
  HashLiteral {
    token: Token,
    pairs: Vec<(Expr, Expr)>,
  },
}

impl Expr {
  /// The literal text of the token that started this node, used for
  /// diagnostic reporting the way `TokenLiteral()` is used in the book.
  pub fn token_literal(&self) -> &str {
    match self {
      Expr::Identifier(ident) => &ident.token.literal,
      Expr::IntegerLiteral { token, .. }
      | Expr::StringLiteral { token, .. }
      | Expr::BooleanLiteral { token, .. }
      | Expr::Prefix { token, .. }
      | Expr::Infix { token, .. }
      | Expr::If { token, .. }
      | Expr::FunctionLiteral { token, .. }
      | Expr::Call { token, .. }
      | Expr::ArrayLiteral { token, .. }
      | Expr::Index { token, .. }
      | Expr::HashLiteral { token, .. } => &token.literal,
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Identifier(ident) => write!(f, "{}", ident),
      Expr::IntegerLiteral { value, .. } => write!(f, "{}", value),
      Expr::StringLiteral { value, .. } => write!(f, "{}", value),
      Expr::BooleanLiteral { value, .. } => write!(f, "{}", value),
      Expr::Prefix {
        operator, right, ..
      } => write!(f, "({}{})", operator, right),
      Expr::Infix {
        left,
        operator,
        right,
        ..
      } => write!(f, "({} {} {})", left, operator, right),
      Expr::If {
        condition,
        consequence,
        alternative,
        ..
      } => {
        write!(f, "if{} {}", condition, consequence)?;
        if let Some(alt) = alternative {
          write!(f, "else {}", alt)?;
        }
        Ok(())
      },
      Expr::FunctionLiteral {
        parameters, body, ..
      } => {
        let params = parameters
          .iter()
          .map(|p| p.to_string())
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "fn({}) {}", params, body)
      },
      Expr::Call {
        function,
        arguments,
        ..
      } => {
        let args = arguments
          .iter()
          .map(|a| a.to_string())
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "{}({})", function, args)
      },
      Expr::ArrayLiteral { elements, .. } => {
        let elems = elements
          .iter()
          .map(|e| e.to_string())
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "[{}]", elems)
      },
      Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
      Expr::HashLiteral { pairs, .. } => {
        let entries = pairs
          .iter()
          .map(|(k, v)| format!("{}:{}", k, v))
          .collect::<Vec<_>>()
          .join(", ");
        write!(f, "{{{}}}", entries)
      },
    }
  }
}
