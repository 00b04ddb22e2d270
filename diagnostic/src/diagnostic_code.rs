/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
  Note,
  Help,
}

/// Unique identifier for each type of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
  // Lexer
  UnterminatedString,
  InvalidCharacter,

  // Parser
  UnexpectedEof,
  UnexpectedToken,
  ExpectedExpression,
  MissingClosingBrace,
  MissingClosingParen,
  MissingClosingBracket,
  ExpectedIdentifier,
  NoPrefixParseFn,
  InvalidIntegerLiteral,

  // CLI
  FileNotFound,
  InvalidArguments,
  IoError,
}

impl DiagnosticCode {
  pub fn code(&self) -> String {
    match self {
      Self::UnterminatedString => "E0001".to_string(),
      Self::InvalidCharacter => "E0002".to_string(),
      Self::UnexpectedEof => "E0100".to_string(),
      Self::UnexpectedToken => "E0101".to_string(),
      Self::ExpectedExpression => "E0102".to_string(),
      Self::MissingClosingBrace => "E0103".to_string(),
      Self::MissingClosingParen => "E0104".to_string(),
      Self::MissingClosingBracket => "E0105".to_string(),
      Self::ExpectedIdentifier => "E0106".to_string(),
      Self::NoPrefixParseFn => "E0107".to_string(),
      Self::InvalidIntegerLiteral => "E0108".to_string(),
      Self::FileNotFound => "E0400".to_string(),
      Self::InvalidArguments => "E0401".to_string(),
      Self::IoError => "E0402".to_string(),
    }
  }

  pub fn severity(&self) -> Severity {
    Severity::Error
  }
}
