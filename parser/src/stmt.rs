use std::fmt;

use lexer::token::Token;

use crate::expr::{Expr, Identifier};

#[derive(Debug, Clone)]
pub struct BlockStatement {
  pub token: Token,
  pub statements: Vec<Stmt>,
}

impl fmt::Display for BlockStatement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for stmt in &self.statements {
      write!(f, "{}", stmt)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub enum Stmt {
  Let {
    token: Token,
    name: Identifier,
    value: Expr,
  },
  Return {
    token: Token,
    value: Expr,
  },
  Expr {
    token: Token,
    expr: Expr,
  },
  Block(BlockStatement),
}

impl fmt::Display for Stmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stmt::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
      Stmt::Return { value, .. } => write!(f, "return {};", value),
      Stmt::Expr { expr, .. } => write!(f, "{}", expr),
      Stmt::Block(block) => write!(f, "{}", block),
    }
  }
}

/// The root of a parsed program: an ordered sequence of statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
  pub statements: Vec<Stmt>,
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for stmt in &self.statements {
      write!(f, "{}", stmt)?;
    }
    Ok(())
  }
}
