// NOTE: the closed set of lexical units this language recognizes.
// Operators and punctuators carry their canonical text as the literal;
// INT/STRING/IDENT carry the exact source slice.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Illegal,
  Eof,

  // Identifiers and literals.
  Ident,
  Int,
  String,

  // Single-character operators.
  Assign,
  Plus,
  Minus,
  Bang,
  Asterisk,
  Slash,
  Lt,
  Gt,

  // Two-character operators.
  Eq,
  NotEq,

  // Punctuators.
  Comma,
  Semicolon,
  Colon,
  LParen,
  RParen,
  LBrace,
  RBrace,
  LBracket,
  RBracket,

  // Keywords.
  Function,
  Let,
  If,
  Else,
  True,
  False,
  Return,
}

impl TokenKind {
  pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
      "fn" => TokenKind::Function,
      "let" => TokenKind::Let,
      "if" => TokenKind::If,
      "else" => TokenKind::Else,
      "true" => TokenKind::True,
      "false" => TokenKind::False,
      "return" => TokenKind::Return,
      _ => TokenKind::Ident,
    }
  }
}
