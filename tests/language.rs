use std::{cell::RefCell, rc::Rc};

use embasic::{Interpreter, Value};

/// Builds an interpreter whose print sink collects the printed values so
/// tests can inspect them.
fn collecting_interpreter() -> (Interpreter, Rc<RefCell<Vec<Value>>>) {
    let mut interpreter = Interpreter::new();
    let output = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&output);
    interpreter.set_print_sink(Box::new(move |value| sink.borrow_mut().push(value.clone())));
    (interpreter, output)
}

fn run_collect(source: &str) -> Vec<Value> {
    let (mut interpreter, output) = collecting_interpreter();
    if let Err(e) = interpreter.run(source) {
        panic!("script failed: {e}\n{source}");
    }
    let collected = output.borrow().clone();
    collected
}

fn assert_failure(source: &str) {
    let (mut interpreter, _output) = collecting_interpreter();
    if interpreter.run(source).is_ok() {
        panic!("script succeeded but was expected to fail:\n{source}");
    }
}

#[test]
fn literals_echo_in_their_native_kind() {
    assert_eq!(run_collect("let a = 5\nprint a"), vec![Value::Integer(5)]);
    assert_eq!(run_collect("let b = 2.5\nprint b"), vec![Value::Float(2.5)]);
    assert_eq!(run_collect("let c = \"hi\"\nprint c"),
               vec![Value::Str("hi".to_string())]);
    assert_eq!(run_collect("let d = true\nprint d"), vec![Value::Bool(true)]);
}

#[test]
fn identifiers_are_case_insensitive() {
    assert_eq!(run_collect("let X = 5\nprint x"), vec![Value::Integer(5)]);
    assert_eq!(run_collect("LET y = 2\nPRINT Y"), vec![Value::Integer(2)]);
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(run_collect("print 2 + 3"), vec![Value::Integer(5)]);
    assert_eq!(run_collect("print 10 - 4"), vec![Value::Integer(6)]);
    assert_eq!(run_collect("print 3 * 4"), vec![Value::Integer(12)]);
    assert_eq!(run_collect("print 15 / 3"), vec![Value::Integer(5)]);
    assert_eq!(run_collect("print 2 + 3 * 4"), vec![Value::Integer(14)]);
    assert_eq!(run_collect("print (2 + 3) * 4"), vec![Value::Integer(20)]);
}

#[test]
fn integer_division_truncates() {
    assert_eq!(run_collect("print 10 / 3"), vec![Value::Integer(3)]);
    assert_eq!(run_collect("print -7 / 2"), vec![Value::Integer(-3)]);
}

#[test]
fn mixed_arithmetic_promotes_to_float() {
    assert_eq!(run_collect("print 2 + 3.5"), vec![Value::Float(5.5)]);
    assert_eq!(run_collect("print 2.5 * 2"), vec![Value::Float(5.0)]);
    assert_eq!(run_collect("print 10.0 / 3"), vec![Value::Float(10.0 / 3.0)]);
}

#[test]
fn integer_overflow_wraps_around() {
    assert_eq!(run_collect("print 9223372036854775807 + 1"),
               vec![Value::Integer(i64::MIN)]);
}

#[test]
fn string_concatenation_coerces_non_strings() {
    assert_eq!(run_collect("let x = \"Hello\" + \" \" + \"World\"\nprint x"),
               vec![Value::Str("Hello World".to_string())]);
    assert_eq!(run_collect("print \"Value: \" + 42"),
               vec![Value::Str("Value: 42".to_string())]);
    assert_eq!(run_collect("print \"v = \" + 3.5"),
               vec![Value::Str("v = 3.5".to_string())]);
    assert_eq!(run_collect("print 42 + \"!\""),
               vec![Value::Str("42!".to_string())]);
}

#[test]
fn string_escapes() {
    assert_eq!(run_collect("print \"a\\tb\""),
               vec![Value::Str("a\tb".to_string())]);
    assert_eq!(run_collect("print \"say \\\"hi\\\"\""),
               vec![Value::Str("say \"hi\"".to_string())]);
    // Unknown escapes pass the character through.
    assert_eq!(run_collect("print \"a\\qb\""),
               vec![Value::Str("aqb".to_string())]);
}

#[test]
fn compound_assignment() {
    assert_eq!(run_collect("let x = 10\nx += 5\nprint x\nx -= 3\nprint x"),
               vec![Value::Integer(15), Value::Integer(12)]);
    assert_eq!(run_collect("let s = \"a\"\ns += \"b\"\nprint s"),
               vec![Value::Str("ab".to_string())]);
}

#[test]
fn increment_and_decrement() {
    assert_eq!(run_collect("let x = 5\nx++\nprint x"), vec![Value::Integer(6)]);
    assert_eq!(run_collect("let x = 5\nx--\nprint x"), vec![Value::Integer(4)]);
    assert_eq!(run_collect("let x = 1.5\nx++\nprint x"), vec![Value::Float(2.5)]);
}

#[test]
fn increment_rejects_non_numeric() {
    assert_failure("let s = \"a\"\ns++");
    assert_failure("let s = \"a\"\ns -= 1");
}

#[test]
fn unary_operators() {
    assert_eq!(run_collect("print -5"), vec![Value::Integer(-5)]);
    assert_eq!(run_collect("let x = 3\nprint -x"), vec![Value::Integer(-3)]);
    assert_eq!(run_collect("print not true"), vec![Value::Bool(false)]);
    assert_eq!(run_collect("print not 0"), vec![Value::Bool(true)]);
    assert_failure("print -\"abc\"");
}

#[test]
fn comparisons() {
    assert_eq!(run_collect("print 2 < 3"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 3 > 2"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 2 <= 2"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 3 >= 4"), vec![Value::Bool(false)]);
}

#[test]
fn comparison_falls_back_to_string_ordering() {
    assert_eq!(run_collect("print \"apple\" < \"banana\""),
               vec![Value::Bool(true)]);
    // Lexicographic, not numeric, once a string is involved.
    assert_eq!(run_collect("print \"10\" < 9"), vec![Value::Bool(true)]);
}

#[test]
fn equality_is_type_aware() {
    assert_eq!(run_collect("print 2 = 2"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 2 <> 3"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 2 != 3"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 1 = 1.0"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print \"a\" = \"a\""), vec![Value::Bool(true)]);
    // Cross-kind pairs beyond int/float are never equal.
    assert_eq!(run_collect("print \"1\" = 1"), vec![Value::Bool(false)]);
    assert_eq!(run_collect("print true = 1"), vec![Value::Bool(false)]);
}

#[test]
fn logical_operators_combine_truthiness() {
    assert_eq!(run_collect("print true and false"), vec![Value::Bool(false)]);
    assert_eq!(run_collect("print false or true"), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 1 and \"x\""), vec![Value::Bool(true)]);
    assert_eq!(run_collect("print 0 or \"\""), vec![Value::Bool(false)]);
}

#[test]
fn sum_loop_scenario() {
    let source = "let sum = 0\nfor i = 1 to 5\n  sum += i\nnext i\nprint sum";
    assert_eq!(run_collect(source), vec![Value::Integer(15)]);
}

#[test]
fn if_elseif_else_scenario() {
    let source = "let x = -5\nif x > 5 then\n  print \"big\"\nelseif x < 0 then\n  print \"negative\"\nelse\n  print \"small\"\nendif";
    assert_eq!(run_collect(source), vec![Value::Str("negative".to_string())]);
}

#[test]
fn first_matching_elseif_wins() {
    let source = "let x = 1\nif x > 5 then\n  print \"a\"\nelseif x = 1 then\n  print \"b\"\nelseif x < 2 then\n  print \"c\"\nendif";
    assert_eq!(run_collect(source), vec![Value::Str("b".to_string())]);
}

#[test]
fn recursive_factorial_scenario() {
    let source = "function factorial(n):\n  if n <= 1 then\n    return 1\n  endif\n  return n * factorial(n - 1)\nendfunction\nprint factorial(5)";
    assert_eq!(run_collect(source), vec![Value::Integer(120)]);
}

#[test]
fn break_exits_loop_scenario() {
    let source = "for i = 1 to 10\n  if i = 5 then\n    break\n  endif\n  print i\nnext i";
    assert_eq!(run_collect(source),
               vec![Value::Integer(1),
                    Value::Integer(2),
                    Value::Integer(3),
                    Value::Integer(4)]);
}

#[test]
fn break_exits_only_the_innermost_loop() {
    let source = "let total = 0\nfor i = 1 to 3\n  for j = 1 to 3\n    if j = 2 then\n      break\n    endif\n    total += 1\n  next j\nnext i\nprint total";
    assert_eq!(run_collect(source), vec![Value::Integer(3)]);
}

#[test]
fn loop_variable_is_not_visible_after_the_loop() {
    assert_failure("for i = 1 to 3\nnext i\nprint i");
}

#[test]
fn loop_with_start_above_end_runs_zero_times() {
    let source = "let c = 0\nfor i = 5 to 1\n  c += 1\nnext i\nprint c";
    assert_eq!(run_collect(source), vec![Value::Integer(0)]);
}

#[test]
fn float_loop_bounds_truncate() {
    let source = "let c = 0\nfor i = 1.9 to 3.2\n  c += 1\nnext i\nprint c";
    // 1.9 truncates to 1, 3.2 to 3.
    assert_eq!(run_collect(source), vec![Value::Integer(3)]);
}

#[test]
fn for_bounds_must_be_numeric() {
    assert_failure("for i = \"a\" to 3\nnext i");
    assert_failure("for i = 1 to \"z\"\nnext i");
}

#[test]
fn next_without_variable_is_allowed() {
    let source = "let sum = 0\nfor i = 1 to 3\n  sum += i\nnext\nprint sum";
    assert_eq!(run_collect(source), vec![Value::Integer(6)]);
}

#[test]
fn function_without_return_yields_the_empty_sentinel() {
    let source = "function noop():\nendfunction\nprint noop()";
    assert_eq!(run_collect(source), vec![Value::Null]);

    // The sentinel converts to the empty string.
    let source = "function noop():\nendfunction\nprint \"[\" + noop() + \"]\"";
    assert_eq!(run_collect(source), vec![Value::Str("[]".to_string())]);
}

#[test]
fn function_names_are_case_insensitive() {
    let source = "FUNCTION Seven():\n  RETURN 7\nENDFUNCTION\nprint seven()";
    assert_eq!(run_collect(source), vec![Value::Integer(7)]);
}

#[test]
fn functions_see_and_mutate_globals() {
    let source = "let counter = 0\nfunction bump():\n  counter = counter + 1\nendfunction\nbump()\nbump()\nprint counter";
    assert_eq!(run_collect(source), vec![Value::Integer(2)]);
}

#[test]
fn let_inside_a_function_shadows_instead_of_mutating() {
    let source = "let x = 1\nfunction f():\n  let x = 99\nendfunction\nf()\nprint x";
    assert_eq!(run_collect(source), vec![Value::Integer(1)]);
}

#[test]
fn function_locals_do_not_leak() {
    assert_failure("function f():\n  let local = 1\nendfunction\nf()\nprint local");
}

#[test]
fn return_restores_callers_state() {
    let source = "function inner():\n  return 1\nendfunction\nfunction outer():\n  inner()\n  return 2\nendfunction\nprint outer()";
    // inner's return must not unwind outer.
    assert_eq!(run_collect(source), vec![Value::Integer(2)]);
}

#[test]
fn top_level_return_stops_execution() {
    assert_eq!(run_collect("print 1\nreturn\nprint 2"), vec![Value::Integer(1)]);
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "# leading comment\n\nlet x = 1 # trailing comment\n\nprint x";
    assert_eq!(run_collect(source), vec![Value::Integer(1)]);
}

#[test]
fn colon_after_parameter_list_is_optional() {
    let source = "function f(a, b)\n  return a + b\nendfunction\nprint f(1, 2)";
    assert_eq!(run_collect(source), vec![Value::Integer(3)]);
}

#[test]
fn running_the_same_source_twice_behaves_identically() {
    let source = "let x = 2\nfor i = 1 to 3\n  x = x * 2\nnext i\nprint x";
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.run(source).unwrap();
    interpreter.run(source).unwrap();

    let collected = output.borrow().clone();
    assert_eq!(collected, vec![Value::Integer(16), Value::Integer(16)]);
}

#[test]
fn division_by_zero_is_an_error() {
    assert_failure("let x = 1 / 0");
    assert_failure("let x = 1.0 / 0.0");
    assert_failure("let x = 1 / 0.0");
}

#[test]
fn undefined_variable_is_an_error() {
    assert_failure("print x");
}

#[test]
fn wrong_arity_is_an_error() {
    assert_failure("function add(a, b):\n  return a + b\nendfunction\nprint add(1)");
}

#[test]
fn unknown_function_is_an_error() {
    assert_failure("print missing(1)");
}

#[test]
fn arithmetic_on_non_numeric_values_is_an_error() {
    assert_failure("let x = \"a\" - 1");
    assert_failure("let x = true * 2");
}

#[test]
fn lexical_errors() {
    assert_failure("let s = \"abc");
    assert_failure("let x = 1 ! 2");
    assert_failure("let x = @");
}

#[test]
fn parse_errors() {
    assert_failure("let = 5");
    assert_failure("if x > 5");
    assert_failure("for i = 1");
    assert_failure("function");
    assert_failure("5 + 5");
}

#[test]
fn next_variable_mismatch_is_a_parse_error() {
    assert_failure("for i = 1 to 2\nnext j");
}

#[test]
fn error_messages_carry_positions() {
    let mut interpreter = Interpreter::new();
    let err = interpreter.run("let x = 1\nprint y").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"), "unexpected message: {message}");
    assert!(message.contains("column 7"), "unexpected message: {message}");
}
