use std::{cell::RefCell, collections::HashMap, rc::Rc};

use parser::{
  expr::Expr,
  stmt::{BlockStatement, Program, Stmt},
};

use crate::{
  builtins,
  environment::Environment,
  object::{FunctionObj, HashPair, Object, FALSE, NULL, TRUE},
};

fn native_bool(value: bool) -> Object {
  if value {
    TRUE
  } else {
    FALSE
  }
}

/// Program is the only level that unwraps a `ReturnValue` — everywhere else
/// it propagates as-is so `return` can unwind nested blocks up to the
/// enclosing function.
pub fn eval_program(program: &Program, env: &Rc<RefCell<Environment>>) -> Object {
  let mut result = NULL;

  for stmt in &program.statements {
    result = eval_statement(stmt, env);

    match result {
      Object::ReturnValue(value) => return *value,
      Object::Error(_) => return result,
      _ => {},
    }
  }

  result
}

/// Unlike `eval_program`, a block returns `Error`/`ReturnValue` untouched —
/// this two-level discipline is what lets `return` escape nested ifs.
fn eval_block_statement(block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> Object {
  let mut result = NULL;

  for stmt in &block.statements {
    result = eval_statement(stmt, env);

    if result.is_error() || result.is_return_value() {
      return result;
    }
  }

  result
}

fn eval_statement(stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> Object {
  match stmt {
    Stmt::Expr { expr, .. } => eval_expression(expr, env),
    Stmt::Let { name, value, .. } => {
      let evaluated = eval_expression(value, env);
      if evaluated.is_error() {
        return evaluated;
      }
      env.borrow_mut().set(name.name.clone(), evaluated);
      NULL
    },
    Stmt::Return { value, .. } => {
      let evaluated = eval_expression(value, env);
      if evaluated.is_error() {
        return evaluated;
      }
      Object::ReturnValue(Box::new(evaluated))
    },
    Stmt::Block(block) => eval_block_statement(block, env),
  }
}

fn eval_expression(expr: &Expr, env: &Rc<RefCell<Environment>>) -> Object {
  match expr {
    Expr::IntegerLiteral { value, .. } => Object::Integer(*value),
    Expr::StringLiteral { value, .. } => Object::String(value.clone()),
    Expr::BooleanLiteral { value, .. } => native_bool(*value),
    Expr::Identifier(ident) => eval_identifier(&ident.name, env),
    Expr::Prefix { operator, right, .. } => {
      let right = eval_expression(right, env);
      if right.is_error() {
        return right;
      }
      eval_prefix_expression(operator, right)
    },
    Expr::Infix {
      left,
      operator,
      right,
      ..
    } => {
      let left = eval_expression(left, env);
      if left.is_error() {
        return left;
      }
      let right = eval_expression(right, env);
      if right.is_error() {
        return right;
      }
      eval_infix_expression(operator, left, right)
    },
    Expr::If {
      condition,
      consequence,
      alternative,
      ..
    } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
    Expr::FunctionLiteral {
      parameters, body, ..
    } => Object::Function(Rc::new(FunctionObj {
      params: parameters.clone(),
      body: body.clone(),
      env: Rc::clone(env),
    })),
    Expr::Call {
      function,
      arguments,
      ..
    } => {
      let function = eval_expression(function, env);
      if function.is_error() {
        return function;
      }
      let args = match eval_expressions(arguments, env) {
        Ok(args) => args,
        Err(err) => return err,
      };
      apply_function(&function, args)
    },
    Expr::ArrayLiteral { elements, .. } => match eval_expressions(elements, env) {
      Ok(elements) => Object::Array(elements),
      Err(err) => err,
    },
    Expr::Index { left, index, .. } => {
      let left = eval_expression(left, env);
      if left.is_error() {
        return left;
      }
      let index = eval_expression(index, env);
      if index.is_error() {
        return index;
      }
      eval_index_expression(left, index)
    },
    Expr::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env),
  }
}

fn eval_identifier(name: &str, env: &Rc<RefCell<Environment>>) -> Object {
  if let Some(value) = env.borrow().get(name) {
    return value;
  }
  if let Some(builtin) = builtins::lookup(name) {
    return builtin;
  }
  Object::error(format!("identifier not found: {}", name))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
  match operator {
    "!" => eval_bang_operator(right),
    "-" => match right {
      Object::Integer(value) => Object::Integer(-value),
      other => Object::error(format!(
        "Invalid operator: type {} doesn't support '-' operator",
        other.type_name()
      )),
    },
    other => Object::error(format!(
      "Unknown operator: operator {} is not a valid prefix operator",
      other
    )),
  }
}

fn eval_bang_operator(right: Object) -> Object {
  match right {
    Object::Integer(0) => TRUE,
    Object::Integer(_) => FALSE,
    Object::Boolean(value) => native_bool(!value),
    _ => FALSE,
  }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
  match (&left, &right) {
    (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
    (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
    (Object::Boolean(l), Object::Boolean(r)) => eval_boolean_infix_expression(operator, *l, *r),
    _ if std::mem::discriminant(&left) == std::mem::discriminant(&right) => Object::error(format!(
      "Unknown operator: no {} operator registered for {}",
      operator,
      left.type_name()
    )),
    _ => Object::error(format!(
      "Type mismatch: invalid operator {} for types {} {}",
      operator,
      left.type_name(),
      right.type_name()
    )),
  }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
  match operator {
    "+" => Object::Integer(left.wrapping_add(right)),
    "-" => Object::Integer(left.wrapping_sub(right)),
    "*" => Object::Integer(left.wrapping_mul(right)),
    "/" if right == 0 => Object::error("division by zero"),
    "/" => Object::Integer(left.wrapping_div(right)),
    "<" => native_bool(left < right),
    ">" => native_bool(left > right),
    "==" => native_bool(left == right),
    "!=" => native_bool(left != right),
    _ => Object::error(format!(
      "Unknown operator: no {} operator registered for INTEGER",
      operator
    )),
  }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
  if operator == "+" {
    Object::String(format!("{}{}", left, right))
  } else {
    Object::error(format!(
      "Unknown operator: no {} operator registered for Strings",
      operator
    ))
  }
}

fn eval_boolean_infix_expression(operator: &str, left: bool, right: bool) -> Object {
  match operator {
    "==" => native_bool(left == right),
    "!=" => native_bool(left != right),
    _ => Object::error(format!(
      "Unknown operator: no {} operator registered for BOOLEAN",
      operator
    )),
  }
}

fn eval_if_expression(
  condition: &Expr,
  consequence: &BlockStatement,
  alternative: Option<&BlockStatement>,
  env: &Rc<RefCell<Environment>>,
) -> Object {
  let condition = eval_expression(condition, env);
  if condition.is_error() {
    return condition;
  }

  if condition.is_truthy() {
    eval_block_statement(consequence, env)
  } else if let Some(alternative) = alternative {
    eval_block_statement(alternative, env)
  } else {
    NULL
  }
}

/// Evaluates a comma-separated expression list left to right, stopping at
/// the first `Error` and returning it rather than the partial vector.
fn eval_expressions(exprs: &[Expr], env: &Rc<RefCell<Environment>>) -> Result<Vec<Object>, Object> {
  let mut values = Vec::with_capacity(exprs.len());
  for expr in exprs {
    let value = eval_expression(expr, env);
    if value.is_error() {
      return Err(value);
    }
    values.push(value);
  }
  Ok(values)
}

fn apply_function(function: &Object, args: Vec<Object>) -> Object {
  match function {
    Object::Function(function) => {
      if args.len() != function.params.len() {
        return Object::error(format!(
          "wrong number of arguments: expected {}, got {}",
          function.params.len(),
          args.len()
        ));
      }
      let call_env = Environment::new_enclosed(Rc::clone(&function.env));
      for (param, arg) in function.params.iter().zip(args.into_iter()) {
        call_env.borrow_mut().set(param.name.clone(), arg);
      }
      let result = eval_block_statement(&function.body, &call_env);
      match result {
        Object::ReturnValue(value) => *value,
        other => other,
      }
    },
    Object::Builtin(builtin) => builtin(&args),
    other => Object::error(format!(
      "Invalid function call, {} is not a function",
      other.type_name()
    )),
  }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
  match (&left, &index) {
    (Object::Array(elements), Object::Integer(i)) => {
      if *i < 0 || *i as usize >= elements.len() {
        Object::error("Index out of range")
      } else {
        elements[*i as usize].clone()
      }
    },
    (Object::Hash(_), _) => eval_hash_index_expression(left, index),
    _ => Object::error(format!(
      "Invalid Index: index operator not supported for type {}",
      left.type_name()
    )),
  }
}

fn eval_hash_index_expression(hash: Object, index: Object) -> Object {
  let Object::Hash(pairs) = hash else {
    unreachable!("caller guarantees a Hash");
  };

  match index.hash_key() {
    Some(key) => match pairs.get(&key) {
      Some(pair) => pair.value.clone(),
      None => NULL,
    },
    None => Object::error(format!("Unhashable type {} used as index", index.type_name())),
  }
}

fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Rc<RefCell<Environment>>) -> Object {
  let mut map = HashMap::new();

  for (key_expr, value_expr) in pairs {
    let key = eval_expression(key_expr, env);
    if key.is_error() {
      return key;
    }
    let Some(hash_key) = key.hash_key() else {
      return Object::error(format!("Object {} not hashable", key.type_name()));
    };

    let value = eval_expression(value_expr, env);
    if value.is_error() {
      return value;
    }

    map.insert(hash_key, HashPair { key, value });
  }

  Object::Hash(map)
}

#[cfg(test)]
mod tests {
  use lexer::Lexer;
  use parser::Parser;
  use diagnostic::DiagnosticEngine;

  use super::*;

  fn eval(input: &str) -> Object {
    let lexer = Lexer::new(input.to_string());
    let mut parser = Parser::new(lexer);
    let mut engine = DiagnosticEngine::new();
    let program = parser.parse_program(&mut engine);
    assert!(!engine.has_errors(), "parse errors for {input:?}");
    let env = Environment::new_empty();
    eval_program(&program, &env)
  }

  #[test]
  fn integer_expressions_fold_arithmetic() {
    let result = eval("(5 + 10 * 2 + 15 / 3) * 2 + -10");
    assert_eq!(result.to_string(), "50");
  }

  #[test]
  fn let_bindings_chain_through_the_environment() {
    let result = eval("let a = 5; let b = a; let c = a + b + 5; c;");
    assert_eq!(result.to_string(), "15");
  }

  #[test]
  fn function_application_binds_parameters() {
    let result = eval("let id = fn(x){ x }; id(42);");
    assert_eq!(result.to_string(), "42");
  }

  #[test]
  fn builtin_len_reports_string_byte_length() {
    let result = eval(r#"len("hello")"#);
    assert_eq!(result.to_string(), "5");
  }

  #[test]
  fn array_indexing_is_zero_based_and_strict_on_bounds() {
    let result = eval("[1,2,3,4][2]");
    assert_eq!(result.to_string(), "3");

    let out_of_range = eval("[1,2,3][3]");
    assert!(out_of_range.is_error());
  }

  #[test]
  fn hash_indexing_looks_up_by_hash_key() {
    let result = eval(r#"{"one":1,"two":2}["two"]"#);
    assert_eq!(result.to_string(), "2");
  }

  #[test]
  fn adding_an_integer_and_a_boolean_is_a_type_mismatch() {
    let result = eval("5 + true;");
    assert_eq!(
      result.to_string(),
      "Error: Type mismatch: invalid operator + for types INTEGER BOOLEAN"
    );
  }

  #[test]
  fn unbound_identifier_is_an_error() {
    let result = eval("foobar");
    assert_eq!(result.to_string(), "Error: identifier not found: foobar");
  }

  #[test]
  fn push_does_not_mutate_the_original_array() {
    let result = eval("push([1,2], 3)");
    assert_eq!(result.to_string(), "[1, 2, 3]");
  }

  #[test]
  fn negating_an_integer_round_trips() {
    for n in [0i64, 1, -7, 12345] {
      let result = eval(&format!("-({})", n));
      assert_eq!(result.to_string(), (-n).to_string());
    }
  }

  #[test]
  fn truthiness_treats_only_false_and_null_as_false() {
    assert_eq!(eval("if (true) { 1 } else { 0 }").to_string(), "1");
    assert_eq!(eval("if (false) { 1 } else { 0 }").to_string(), "0");
    assert_eq!(eval("if (0) { 1 } else { 0 }").to_string(), "1");
  }

  #[test]
  fn closures_capture_their_defining_environment() {
    let result = eval(
      "let newAdder = fn(x){ fn(y){ x + y } }; \
       let addTwo = newAdder(2); \
       let first = addTwo(3); \
       let x = 99; \
       addTwo(3) + 0 * first;",
    );
    assert_eq!(result.to_string(), "5");
  }

  #[test]
  fn return_unwinds_through_nested_blocks() {
    let result = eval("if (true) { if (true) { return 10; } return 1; }");
    assert_eq!(result.to_string(), "10");
  }

  #[test]
  fn calling_a_function_with_the_wrong_arity_is_an_error() {
    let result = eval("let add = fn(x, y) { x + y }; add(1);");
    assert_eq!(
      result.to_string(),
      "Error: wrong number of arguments: expected 2, got 1"
    );
  }

  #[test]
  fn dividing_by_zero_is_an_error_rather_than_a_panic() {
    let result = eval("5 / 0;");
    assert_eq!(result.to_string(), "Error: division by zero");
  }
}
