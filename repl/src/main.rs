use colored::*;
use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use runner::Runner;

mod runner;

fn main() {
  let args: Vec<String> = std::env::args().collect();
  let mut engine = DiagnosticEngine::new();
  let mut runner = Runner::new();

  match args.len() {
    1 => {
      println!("{}", "Running the interactive mode".cyan().bold());
      runner.run_interactive_mode(&mut engine);
    },
    2 => {
      println!("{}", format!("Running file: {}", args[1]).cyan().bold());
      runner.run_file(&args[1], &mut engine);
    },
    _ => {
      let diagnostic = Diagnostic::new(
        DiagnosticCode::InvalidArguments,
        "invalid number of arguments".to_string(),
      )
      .with_help("Usage: repl [script]".to_string());

      engine.emit(diagnostic);
      engine.print_all("");
      std::process::exit(64);
    },
  }
}
