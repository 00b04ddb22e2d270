use crate::token::{types::TokenKind, Token};

pub mod token;

/// Pulls tokens on demand from a source string.
///
/// `position` points at the byte of `ch`; `read_position` points one byte
/// past it. `ch` is `'\0'` once the input is exhausted, mirroring the
/// book's sentinel-byte style rather than wrapping every read in an Option.
pub struct Lexer {
  input: Vec<u8>,
  position: usize,
  read_position: usize,
  ch: u8,
  line: usize,
  column: usize,
}

impl Lexer {
  pub fn new(input: String) -> Self {
    let mut lexer = Self {
      input: input.into_bytes(),
      position: 0,
      read_position: 0,
      ch: 0,
      line: 1,
      column: 0,
    };
    lexer.advance();
    lexer
  }

  fn advance(&mut self) {
    self.ch = if self.read_position >= self.input.len() {
      0
    } else {
      self.input[self.read_position]
    };

    if self.ch == b'\n' {
      self.line += 1;
      self.column = 0;
    } else {
      self.column += 1;
    }

    self.position = self.read_position;
    self.read_position += 1;
  }

  fn peek(&self) -> u8 {
    if self.read_position >= self.input.len() {
      0
    } else {
      self.input[self.read_position]
    }
  }

  fn skip_whitespace(&mut self) {
    while matches!(self.ch, b' ' | b'\t' | b'\r' | b'\n') {
      self.advance();
    }
  }

  /// Produces the next token from the input. Call repeatedly until an
  /// `Eof` token is returned.
  pub fn next(&mut self) -> Token {
    self.skip_whitespace();

    let position = (self.line, self.column);

    let token = match self.ch {
      b'=' => {
        if self.peek() == b'=' {
          self.advance();
          Token::new(TokenKind::Eq, "==".to_string(), position)
        } else {
          Token::new(TokenKind::Assign, "=".to_string(), position)
        }
      },
      b'!' => {
        if self.peek() == b'=' {
          self.advance();
          Token::new(TokenKind::NotEq, "!=".to_string(), position)
        } else {
          Token::new(TokenKind::Bang, "!".to_string(), position)
        }
      },
      b'+' => Token::new(TokenKind::Plus, "+".to_string(), position),
      b'-' => Token::new(TokenKind::Minus, "-".to_string(), position),
      b'*' => Token::new(TokenKind::Asterisk, "*".to_string(), position),
      b'/' => Token::new(TokenKind::Slash, "/".to_string(), position),
      b'<' => Token::new(TokenKind::Lt, "<".to_string(), position),
      b'>' => Token::new(TokenKind::Gt, ">".to_string(), position),
      b',' => Token::new(TokenKind::Comma, ",".to_string(), position),
      b';' => Token::new(TokenKind::Semicolon, ";".to_string(), position),
      b':' => Token::new(TokenKind::Colon, ":".to_string(), position),
      b'(' => Token::new(TokenKind::LParen, "(".to_string(), position),
      b')' => Token::new(TokenKind::RParen, ")".to_string(), position),
      b'{' => Token::new(TokenKind::LBrace, "{".to_string(), position),
      b'}' => Token::new(TokenKind::RBrace, "}".to_string(), position),
      b'[' => Token::new(TokenKind::LBracket, "[".to_string(), position),
      b']' => Token::new(TokenKind::RBracket, "]".to_string(), position),
      b'"' => return self.read_string(position),
      0 => Token::new(TokenKind::Eof, String::new(), position),
      c if c.is_ascii_alphabetic() || c == b'_' => return self.read_identifier(position),
      c if c.is_ascii_digit() => return self.read_number(position),
      _ => Token::new(TokenKind::Illegal, String::new(), position),
    };

    self.advance();
    token
  }

  /// Reads a double-quoted string. An unterminated string runs to EOF and
  /// is still returned as a `String` token — the lexer never reports
  /// errors, only `Illegal` tokens (and this isn't even that).
  fn read_string(&mut self, position: (usize, usize)) -> Token {
    let start = self.position + 1;
    loop {
      self.advance();
      if self.ch == b'"' || self.ch == 0 {
        break;
      }
    }
    let literal = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
    self.advance();
    Token::new(TokenKind::String, literal, position)
  }

  /// Reads a run of letters/digits/underscore and classifies it as a
  /// keyword or a plain identifier.
  fn read_identifier(&mut self, position: (usize, usize)) -> Token {
    let start = self.position;
    while self.ch.is_ascii_alphanumeric() || self.ch == b'_' {
      self.advance();
    }
    let literal = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
    let kind = TokenKind::lookup_ident(&literal);
    Token::new(kind, literal, position)
  }

  /// Reads a run of digits. Greedy: `5x` lexes as `INT(5)` then `IDENT(x)`.
  fn read_number(&mut self, position: (usize, usize)) -> Token {
    let start = self.position;
    while self.ch.is_ascii_digit() {
      self.advance();
    }
    let literal = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
    Token::new(TokenKind::Int, literal, position)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn next_token_covers_every_kind_of_punctuation() {
    let input = "=+(){},;:[]";
    let mut lexer = Lexer::new(input.to_string());

    let expected = [
      TokenKind::Assign,
      TokenKind::Plus,
      TokenKind::LParen,
      TokenKind::RParen,
      TokenKind::LBrace,
      TokenKind::RBrace,
      TokenKind::Comma,
      TokenKind::Semicolon,
      TokenKind::Colon,
      TokenKind::LBracket,
      TokenKind::RBracket,
      TokenKind::Eof,
    ];

    for kind in expected {
      assert_eq!(lexer.next().kind, kind);
    }
  }

  #[test]
  fn next_token_handles_a_small_program() {
    let input = r#"
      let five = 5;
      let add = fn(x, y) {
        x + y;
      };
      let result = add(five, 10);
      !-/*5;
      5 < 10 > 5;

      if (5 < 10) {
        return true;
      } else {
        return false;
      }

      10 == 10;
      10 != 9;
      "foobar"
      "foo bar"
      [1, 2];
      {"foo": "bar"}
    "#;

    let mut lexer = Lexer::new(input.to_string());
    let mut kinds = Vec::new();
    loop {
      let tok = lexer.next();
      let done = tok.kind == TokenKind::Eof;
      kinds.push(tok.kind);
      if done {
        break;
      }
    }

    assert_eq!(kinds.first(), Some(&TokenKind::Let));
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    assert!(kinds.contains(&TokenKind::Function));
    assert!(kinds.contains(&TokenKind::Eq));
    assert!(kinds.contains(&TokenKind::NotEq));
    assert!(kinds.contains(&TokenKind::String));
    assert!(kinds.contains(&TokenKind::LBracket));
    assert!(kinds.contains(&TokenKind::Colon));
  }

  #[test]
  fn identifiers_and_integers_are_greedy() {
    let mut lexer = Lexer::new("123abc".to_string());
    let first = lexer.next();
    assert_eq!(first.kind, TokenKind::Int);
    assert_eq!(first.literal, "123");
    let second = lexer.next();
    assert_eq!(second.kind, TokenKind::Ident);
    assert_eq!(second.literal, "abc");
  }

  #[test]
  fn unterminated_string_runs_to_eof_without_an_error_token() {
    let mut lexer = Lexer::new(r#""unterminated"#.to_string());
    let tok = lexer.next();
    assert_eq!(tok.kind, TokenKind::String);
    assert_eq!(tok.literal, "unterminated");
    assert_eq!(lexer.next().kind, TokenKind::Eof);
  }

  #[test]
  fn unrecognized_byte_is_illegal() {
    let mut lexer = Lexer::new("@".to_string());
    assert_eq!(lexer.next().kind, TokenKind::Illegal);
  }

  /// Round-trip invariant from the testable-properties list: re-tokenising
  /// the concatenated literals with single-space separators reproduces the
  /// same kind sequence.
  #[test]
  fn token_literals_round_trip_through_relexing() {
    let input = "let x = fn(a, b) { a + b; };";
    let mut lexer = Lexer::new(input.to_string());
    let mut tokens = Vec::new();
    loop {
      let tok = lexer.next();
      let done = tok.kind == TokenKind::Eof;
      tokens.push(tok);
      if done {
        break;
      }
    }

    let rejoined = tokens
      .iter()
      .filter(|t| t.kind != TokenKind::Eof)
      .map(|t| t.literal.clone())
      .collect::<Vec<_>>()
      .join(" ");

    let mut relexer = Lexer::new(rejoined);
    for tok in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
      assert_eq!(relexer.next().kind, tok.kind);
    }
  }
}
