use std::{
  cell::RefCell,
  io::{self, Write},
  rc::Rc,
};

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use lexer::Lexer;
use object::{Environment, Object};
use parser::Parser;

/// Drives the lexer → parser → evaluator pipeline, either interactively
/// against stdin/stdout or once over a whole file.
pub struct Runner {}

impl Runner {
  pub fn new() -> Self {
    Self {}
  }

  /// Reads lines from stdin against a single session-persistent
  /// environment until EOF, printing each result's inspect form.
  pub fn run_interactive_mode(&mut self, engine: &mut DiagnosticEngine) {
    println!("Welcome to the monkey-rs REPL.");
    println!("Enter expressions; Ctrl+D to exit.\n");

    let env = Environment::new_empty();

    loop {
      engine.clear();

      print!(">> ");
      io::stdout().flush().unwrap();

      let mut line = String::new();
      let bytes_read = io::stdin().read_line(&mut line).unwrap();
      if bytes_read == 0 {
        println!();
        break;
      }

      let result = self.interpret(&line, &env, engine);

      if engine.has_errors() {
        engine.print_all(&line);
        continue;
      }

      println!("{}", result);
    }
  }

  /// Runs a whole file once against a fresh environment, exiting 65 if any
  /// lex/parse diagnostics were emitted.
  pub fn run_file(&mut self, path: &str, engine: &mut DiagnosticEngine) {
    let source = match std::fs::read_to_string(path) {
      Ok(source) => source,
      Err(err) => {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::FileNotFound,
          format!("could not read file: {}", path),
        )
        .with_help(format!("reason: {}", err));
        engine.emit(diagnostic);
        engine.print_all("");
        std::process::exit(65);
      },
    };

    let env = Environment::new_empty();
    let result = self.interpret(&source, &env, engine);

    if engine.has_errors() {
      engine.print_all(&source);
      std::process::exit(65);
    }

    println!("{}", result);
  }

  fn interpret(
    &mut self,
    source: &str,
    env: &Rc<RefCell<Environment>>,
    engine: &mut DiagnosticEngine,
  ) -> Object {
    let lexer = Lexer::new(source.to_string());
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program(engine);

    if engine.has_errors() {
      return Object::Null;
    }

    object::eval_program(&program, env)
  }
}
