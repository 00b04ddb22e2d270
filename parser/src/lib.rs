//! A Pratt (operator-precedence) parser. Each token kind that can start an
//! expression has a prefix-parse handler; each token kind that can continue
//! one (as a binary/call/index operator) has an infix-parse handler and a
//! binding precedence. `parse_expression` ties the two together.

use diagnostic::{
  diagnostic::{Diagnostic, Label, Span},
  diagnostic_code::DiagnosticCode,
  DiagnosticEngine,
};
use lexer::{
  token::{types::TokenKind, Token},
  Lexer,
};

use crate::{
  expr::{Expr, Identifier},
  stmt::{BlockStatement, Program, Stmt},
};

pub mod expr;
pub mod stmt;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
  Lowest,
  Equals,      // == !=
  LessGreater, // < >
  Sum,         // + -
  Product,     // * /
  Prefix,      // -x or !x
  Call,        // fn(x)
  Index,       // arr[x]
}

fn precedence_of(kind: TokenKind) -> Precedence {
  match kind {
    TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
    TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
    TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
    TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
    TokenKind::LParen => Precedence::Call,
    TokenKind::LBracket => Precedence::Index,
    _ => Precedence::Lowest,
  }
}

pub struct Parser {
  lexer: Lexer,
  cur: Token,
  peek: Token,
}

impl Parser {
  pub fn new(mut lexer: Lexer) -> Self {
    let cur = lexer.next();
    let peek = lexer.next();
    Self { lexer, cur, peek }
  }

  fn advance(&mut self) {
    self.cur = std::mem::replace(&mut self.peek, self.lexer.next());
  }

  fn cur_is(&self, kind: TokenKind) -> bool {
    self.cur.kind == kind
  }

  fn peek_is(&self, kind: TokenKind) -> bool {
    self.peek.kind == kind
  }

  fn peek_precedence(&self) -> Precedence {
    precedence_of(self.peek.kind)
  }

  fn cur_precedence(&self) -> Precedence {
    precedence_of(self.cur.kind)
  }

  /// Consumes `peek` if it matches `kind`, otherwise records an error and
  /// leaves the parser positioned at the unexpected token.
  fn expect_peek(&mut self, kind: TokenKind, engine: &mut DiagnosticEngine) -> bool {
    if self.peek_is(kind) {
      self.advance();
      true
    } else {
      self.peek_error(kind, engine);
      false
    }
  }

  fn peek_error(&self, expected: TokenKind, engine: &mut DiagnosticEngine) {
    self.emit_error(
      engine,
      DiagnosticCode::UnexpectedToken,
      format!(
        "expected next token to be {:?}, got {:?} instead",
        expected, self.peek.kind
      ),
      &self.peek,
    );
  }

  fn emit_error(
    &self,
    engine: &mut DiagnosticEngine,
    code: DiagnosticCode,
    message: String,
    token: &Token,
  ) {
    let diagnostic = Diagnostic::new(code, message).with_label(Label::primary(
      Span {
        file: "input".to_string(),
        line: token.position.0,
        column: token.position.1,
        length: token.literal.len().max(1),
      },
      None,
    ));
    engine.emit(diagnostic);
  }

  /// Parses the whole token stream into a `Program`, accumulating any
  /// number of statement-level errors rather than aborting on the first.
  pub fn parse_program(&mut self, engine: &mut DiagnosticEngine) -> Program {
    let mut program = Program::default();

    while !self.cur_is(TokenKind::Eof) {
      if let Some(stmt) = self.parse_statement(engine) {
        program.statements.push(stmt);
      }
      self.advance();
    }

    program
  }

  fn parse_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Stmt> {
    match self.cur.kind {
      TokenKind::Let => self.parse_let_statement(engine),
      TokenKind::Return => self.parse_return_statement(engine),
      _ => self.parse_expression_statement(engine),
    }
  }

  fn parse_let_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Stmt> {
    let token = self.cur.clone();

    if !self.expect_peek(TokenKind::Ident, engine) {
      return None;
    }
    let name = Identifier {
      token: self.cur.clone(),
      name: self.cur.literal.clone(),
    };

    if !self.expect_peek(TokenKind::Assign, engine) {
      return None;
    }
    self.advance();

    let value = self.parse_expression(Precedence::Lowest, engine)?;

    if self.peek_is(TokenKind::Semicolon) {
      self.advance();
    }

    Some(Stmt::Let { token, name, value })
  }

  fn parse_return_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Stmt> {
    let token = self.cur.clone();
    self.advance();

    let value = self.parse_expression(Precedence::Lowest, engine)?;

    if self.peek_is(TokenKind::Semicolon) {
      self.advance();
    }

    Some(Stmt::Return { token, value })
  }

  fn parse_expression_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Stmt> {
    let token = self.cur.clone();
    let expr = self.parse_expression(Precedence::Lowest, engine)?;

    if self.peek_is(TokenKind::Semicolon) {
      self.advance();
    }

    Some(Stmt::Expr { token, expr })
  }

  fn parse_block_statement(&mut self, engine: &mut DiagnosticEngine) -> BlockStatement {
    let token = self.cur.clone();
    let mut statements = Vec::new();

    self.advance();
    while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
      if let Some(stmt) = self.parse_statement(engine) {
        statements.push(stmt);
      }
      self.advance();
    }

    BlockStatement { token, statements }
  }

  fn parse_expression(&mut self, precedence: Precedence, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let mut left = self.parse_prefix(engine)?;

    while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
      if !Self::has_infix(self.peek.kind) {
        return Some(left);
      }
      self.advance();
      left = self.parse_infix(left, engine)?;
    }

    Some(left)
  }

  fn has_infix(kind: TokenKind) -> bool {
    matches!(
      kind,
      TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::LParen
        | TokenKind::LBracket
    )
  }

  fn parse_prefix(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    match self.cur.kind {
      TokenKind::Ident => Some(self.parse_identifier()),
      TokenKind::Int => self.parse_integer_literal(engine),
      TokenKind::String => Some(self.parse_string_literal()),
      TokenKind::True | TokenKind::False => Some(self.parse_boolean_literal()),
      TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(engine),
      TokenKind::LParen => self.parse_grouped_expression(engine),
      TokenKind::If => self.parse_if_expression(engine),
      TokenKind::Function => self.parse_function_literal(engine),
      TokenKind::LBracket => self.parse_array_literal(engine),
      TokenKind::LBrace => self.parse_hash_literal(engine),
      other => {
        self.emit_error(
          engine,
          DiagnosticCode::NoPrefixParseFn,
          format!("no prefix parse function for {:?} found", other),
          &self.cur,
        );
        None
      },
    }
  }

  fn parse_infix(&mut self, left: Expr, engine: &mut DiagnosticEngine) -> Option<Expr> {
    match self.cur.kind {
      TokenKind::LParen => self.parse_call_expression(left, engine),
      TokenKind::LBracket => self.parse_index_expression(left, engine),
      _ => self.parse_infix_expression(left, engine),
    }
  }

  fn parse_identifier(&mut self) -> Expr {
    Expr::Identifier(Identifier {
      token: self.cur.clone(),
      name: self.cur.literal.clone(),
    })
  }

  fn parse_integer_literal(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    match token.literal.parse::<i64>() {
      Ok(value) => Some(Expr::IntegerLiteral { token, value }),
      Err(_) => {
        self.emit_error(
          engine,
          DiagnosticCode::InvalidIntegerLiteral,
          format!("could not parse {:?} as integer", token.literal),
          &token,
        );
        None
      },
    }
  }

  fn parse_string_literal(&mut self) -> Expr {
    Expr::StringLiteral {
      token: self.cur.clone(),
      value: self.cur.literal.clone(),
    }
  }

  fn parse_boolean_literal(&mut self) -> Expr {
    Expr::BooleanLiteral {
      token: self.cur.clone(),
      value: self.cur_is(TokenKind::True),
    }
  }

  fn parse_prefix_expression(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    let operator = token.literal.clone();
    self.advance();
    let right = self.parse_expression(Precedence::Prefix, engine)?;
    Some(Expr::Prefix {
      token,
      operator,
      right: Box::new(right),
    })
  }

  fn parse_infix_expression(&mut self, left: Expr, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    let operator = token.literal.clone();
    let precedence = self.cur_precedence();
    self.advance();
    let right = self.parse_expression(precedence, engine)?;
    Some(Expr::Infix {
      token,
      left: Box::new(left),
      operator,
      right: Box::new(right),
    })
  }

  fn parse_grouped_expression(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    self.advance();
    let expr = self.parse_expression(Precedence::Lowest, engine)?;
    if !self.expect_peek(TokenKind::RParen, engine) {
      return None;
    }
    Some(expr)
  }

  fn parse_if_expression(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();

    if !self.expect_peek(TokenKind::LParen, engine) {
      return None;
    }
    self.advance();
    let condition = self.parse_expression(Precedence::Lowest, engine)?;

    if !self.expect_peek(TokenKind::RParen, engine) {
      return None;
    }
    if !self.expect_peek(TokenKind::LBrace, engine) {
      return None;
    }
    let consequence = self.parse_block_statement(engine);

    let alternative = if self.peek_is(TokenKind::Else) {
      self.advance();
      if !self.expect_peek(TokenKind::LBrace, engine) {
        return None;
      }
      Some(self.parse_block_statement(engine))
    } else {
      None
    };

    Some(Expr::If {
      token,
      condition: Box::new(condition),
      consequence,
      alternative,
    })
  }

  fn parse_function_literal(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();

    if !self.expect_peek(TokenKind::LParen, engine) {
      return None;
    }
    let parameters = self.parse_function_parameters(engine)?;

    if !self.expect_peek(TokenKind::LBrace, engine) {
      return None;
    }
    let body = self.parse_block_statement(engine);

    Some(Expr::FunctionLiteral {
      token,
      parameters,
      body,
    })
  }

  fn parse_function_parameters(&mut self, engine: &mut DiagnosticEngine) -> Option<Vec<Identifier>> {
    let mut identifiers = Vec::new();

    if self.peek_is(TokenKind::RParen) {
      self.advance();
      return Some(identifiers);
    }

    self.advance();
    identifiers.push(Identifier {
      token: self.cur.clone(),
      name: self.cur.literal.clone(),
    });

    while self.peek_is(TokenKind::Comma) {
      self.advance();
      self.advance();
      identifiers.push(Identifier {
        token: self.cur.clone(),
        name: self.cur.literal.clone(),
      });
    }

    if !self.expect_peek(TokenKind::RParen, engine) {
      return None;
    }

    Some(identifiers)
  }

  fn parse_call_expression(&mut self, function: Expr, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    let arguments = self.parse_expression_list(TokenKind::RParen, engine)?;
    Some(Expr::Call {
      token,
      function: Box::new(function),
      arguments,
    })
  }

  fn parse_index_expression(&mut self, left: Expr, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    self.advance();
    let index = self.parse_expression(Precedence::Lowest, engine)?;

    if !self.expect_peek(TokenKind::RBracket, engine) {
      return None;
    }

    Some(Expr::Index {
      token,
      left: Box::new(left),
      index: Box::new(index),
    })
  }

  fn parse_array_literal(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    let elements = self.parse_expression_list(TokenKind::RBracket, engine)?;
    Some(Expr::ArrayLiteral { token, elements })
  }

  fn parse_expression_list(&mut self, end: TokenKind, engine: &mut DiagnosticEngine) -> Option<Vec<Expr>> {
    let mut list = Vec::new();

    if self.peek_is(end) {
      self.advance();
      return Some(list);
    }

    self.advance();
    list.push(self.parse_expression(Precedence::Lowest, engine)?);

    while self.peek_is(TokenKind::Comma) {
      self.advance();
      self.advance();
      list.push(self.parse_expression(Precedence::Lowest, engine)?);
    }

    if !self.expect_peek(end, engine) {
      return None;
    }

    Some(list)
  }

  fn parse_hash_literal(&mut self, engine: &mut DiagnosticEngine) -> Option<Expr> {
    let token = self.cur.clone();
    let mut pairs = Vec::new();

    while !self.peek_is(TokenKind::RBrace) {
      self.advance();
      let key = self.parse_expression(Precedence::Lowest, engine)?;

      if !self.expect_peek(TokenKind::Colon, engine) {
        return None;
      }
      self.advance();
      let value = self.parse_expression(Precedence::Lowest, engine)?;
      pairs.push((key, value));

      if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma, engine) {
        return None;
      }
    }

    if !self.expect_peek(TokenKind::RBrace, engine) {
      return None;
    }

    Some(Expr::HashLiteral { token, pairs })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(input: &str) -> (Program, DiagnosticEngine) {
    let lexer = Lexer::new(input.to_string());
    let mut parser = Parser::new(lexer);
    let mut engine = DiagnosticEngine::new();
    let program = parser.parse_program(&mut engine);
    (program, engine)
  }

  #[test]
  fn let_statements_bind_a_single_identifier() {
    let (program, engine) = parse("let x = 5; let y = true; let foobar = y;");
    assert!(!engine.has_errors());
    assert_eq!(program.statements.len(), 3);
    for stmt in &program.statements {
      assert!(matches!(stmt, Stmt::Let { .. }));
    }
  }

  #[test]
  fn return_statements_parse() {
    let (program, engine) = parse("return 5; return 10; return add(15);");
    assert!(!engine.has_errors());
    assert_eq!(program.statements.len(), 3);
  }

  #[test]
  fn operator_precedence_renders_canonically() {
    let cases = [
      ("-a * b", "((-a) * b)"),
      ("!-a", "(!(-a))"),
      ("a + b + c", "((a + b) + c)"),
      ("a + b - c", "((a + b) - c)"),
      ("a * b * c", "((a * b) * c)"),
      ("a * b / c", "((a * b) / c)"),
      ("a + b / c", "(a + (b / c))"),
      ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
      ("(5 + 5) * 2", "((5 + 5) * 2)"),
      ("-(5 + 5)", "(-(5 + 5))"),
      ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
      ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
    ];

    for (input, expected) in cases {
      let (program, engine) = parse(input);
      assert!(!engine.has_errors(), "unexpected errors parsing {input}");
      assert_eq!(program.to_string(), expected);
    }
  }

  #[test]
  fn parser_is_a_fixed_point_under_rendering() {
    let input = "if (x < y) { let a = x + 1; a } else { y }";
    let (program, engine) = parse(input);
    assert!(!engine.has_errors());
    let rendered = program.to_string();

    let (reparsed, engine2) = parse(&rendered);
    assert!(!engine2.has_errors());
    assert_eq!(reparsed.to_string(), rendered);
  }

  #[test]
  fn hash_literal_parses_string_keys() {
    let (program, engine) = parse(r#"{"one": 1, "two": 2}"#);
    assert!(!engine.has_errors());
    let Stmt::Expr { expr, .. } = &program.statements[0] else {
      panic!("expected expression statement");
    };
    let Expr::HashLiteral { pairs, .. } = expr else {
      panic!("expected hash literal");
    };
    assert_eq!(pairs.len(), 2);
  }

  #[test]
  fn missing_prefix_function_records_a_diagnostic_and_continues() {
    let (_program, engine) = parse("let x = ; let y = 5;");
    assert!(engine.has_errors());
  }
}
