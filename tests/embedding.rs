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

#[test]
fn registered_function_is_callable_from_script() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.register_function("double", Box::new(|args| match args {
                                      [Value::Integer(n)] => Ok(Value::Integer(n * 2)),
                                      _ => Err("double requires one integer".to_string()),
                                  }));

    interpreter.run("print double(21)").unwrap();
    assert_eq!(*output.borrow(), vec![Value::Integer(42)]);
}

#[test]
fn registered_names_are_case_insensitive() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.register_function("Greet", Box::new(|args| {
                                      Ok(Value::Str(format!("hello {}", args[0])))
                                  }));

    interpreter.run("print GREET(\"world\")").unwrap();
    assert_eq!(*output.borrow(), vec![Value::Str("hello world".to_string())]);
}

#[test]
fn host_errors_propagate_verbatim() {
    let mut interpreter = Interpreter::new();
    interpreter.register_function("explode", Box::new(|_args| Err("the boiler burst".to_string())));

    let err = interpreter.run("explode()").unwrap_err();
    assert!(err.to_string().contains("the boiler burst"),
            "unexpected message: {err}");
}

#[test]
fn host_functions_shadow_script_functions() {
    let (mut interpreter, output) = collecting_interpreter();
    interpreter.register_function("mystery", Box::new(|_args| Ok(Value::Integer(1))));

    let source = "function mystery():\n  return 2\nendfunction\nprint mystery()";
    interpreter.run(source).unwrap();
    assert_eq!(*output.borrow(), vec![Value::Integer(1)]);
}

#[test]
fn registration_overwrites_previous_callback() {
    let (mut interpreter, output) = collecting_interpreter();
    interpreter.register_function("f", Box::new(|_args| Ok(Value::Integer(1))));
    interpreter.register_function("f", Box::new(|_args| Ok(Value::Integer(2))));

    interpreter.run("print f()").unwrap();
    assert_eq!(*output.borrow(), vec![Value::Integer(2)]);
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let mut interpreter = Interpreter::new();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);

    interpreter.register_function("tick", Box::new(move |_args| {
                                      *counter.borrow_mut() += 1;
                                      Ok(Value::Bool(true))
                                  }));

    interpreter.run("let x = tick() or tick()").unwrap();
    assert_eq!(*calls.borrow(), 2);

    interpreter.run("let y = tick() and tick()").unwrap();
    assert_eq!(*calls.borrow(), 4);
}

#[test]
fn load_then_call_mutates_seeded_globals() {
    let mut interpreter = Interpreter::new();
    let source = "counter = 0\nfunction bump():\n  counter = counter + 1\n  return counter\nendfunction";

    interpreter.load(source).unwrap();

    assert_eq!(interpreter.call("bump", &[]).unwrap(), Value::Integer(1));
    assert_eq!(interpreter.call("bump", &[]).unwrap(), Value::Integer(2));
    assert_eq!(interpreter.call("bump", &[]).unwrap(), Value::Integer(3));
}

#[test]
fn call_passes_arguments_and_returns_the_value() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function add(a, b):\n  return a + b\nendfunction")
               .unwrap();

    let result = interpreter.call("add", &[Value::Integer(2), Value::Integer(5)])
                            .unwrap();
    assert_eq!(result, Value::Integer(7));

    let result = interpreter.call("ADD",
                                  &[Value::Str("a".to_string()), Value::Str("b".to_string())])
                            .unwrap();
    assert_eq!(result, Value::Str("ab".to_string()));
}

#[test]
fn call_without_return_yields_null() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function noop():\nendfunction").unwrap();

    assert_eq!(interpreter.call("noop", &[]).unwrap(), Value::Null);
}

#[test]
fn function_locals_do_not_persist_between_calls() {
    let mut interpreter = Interpreter::new();
    let source = "function stash():\n  let tmp = 1\n  return tmp\nendfunction\nfunction peek():\n  return tmp\nendfunction";
    interpreter.load(source).unwrap();

    assert_eq!(interpreter.call("stash", &[]).unwrap(), Value::Integer(1));
    assert!(interpreter.call("peek", &[]).is_err());
}

#[test]
fn call_unknown_function_is_an_error() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function f():\nendfunction").unwrap();

    assert!(interpreter.call("missing", &[]).is_err());
}

#[test]
fn call_with_wrong_arity_is_an_error() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function add(a, b):\n  return a + b\nendfunction")
               .unwrap();

    assert!(interpreter.call("add", &[Value::Integer(1)]).is_err());
}

#[test]
fn has_function_reports_loaded_functions() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function f():\nendfunction").unwrap();

    assert!(interpreter.has_function("f"));
    assert!(interpreter.has_function("F"));
    assert!(!interpreter.has_function("g"));
}

#[test]
fn loading_a_new_script_replaces_the_function_table() {
    let mut interpreter = Interpreter::new();
    interpreter.load("function first():\nendfunction").unwrap();
    interpreter.load("function second():\nendfunction").unwrap();

    assert!(!interpreter.has_function("first"));
    assert!(interpreter.has_function("second"));
}

#[test]
fn iteration_budget_stops_a_single_loop() {
    let (mut interpreter, output) = collecting_interpreter();
    interpreter.set_max_iterations(5);

    let err = interpreter.run("for i = 1 to 6\n  print i\nnext i").unwrap_err();
    assert!(err.to_string().contains("Maximum loop iterations"),
            "unexpected message: {err}");
    // The budget check fires before the sixth body execution.
    assert_eq!(output.borrow().len(), 5);
}

#[test]
fn iteration_budget_spans_sequential_loops() {
    let mut interpreter = Interpreter::new();
    interpreter.set_max_iterations(10);

    let source = "for i = 1 to 6\nnext i\nfor j = 1 to 6\nnext j";
    assert!(interpreter.run(source).is_err());
}

#[test]
fn iteration_budget_resets_per_entry_point() {
    let mut interpreter = Interpreter::new();
    interpreter.set_max_iterations(10);
    interpreter.load("function spin():\n  for i = 1 to 6\n  next i\nendfunction")
               .unwrap();

    assert!(interpreter.call("spin", &[]).is_ok());
    assert!(interpreter.call("spin", &[]).is_ok());
}

#[test]
fn validate_reports_errors_without_executing() {
    let (mut interpreter, output) = collecting_interpreter();

    assert!(interpreter.validate("let = 5").is_err());
    assert!(interpreter.validate("print 1").is_ok());

    // Validation never runs the script.
    assert!(output.borrow().is_empty());
}

#[test]
fn print_delivers_typed_values_to_the_sink() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.run("print 1\nprint 1.5\nprint \"x\"\nprint true")
               .unwrap();

    assert_eq!(*output.borrow(),
               vec![Value::Integer(1),
                    Value::Float(1.5),
                    Value::Str("x".to_string()),
                    Value::Bool(true)]);
}

#[test]
fn print_sink_is_replaceable() {
    let (mut interpreter, first) = collecting_interpreter();
    interpreter.run("print 1").unwrap();

    let second = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&second);
    interpreter.set_print_sink(Box::new(move |value| sink.borrow_mut().push(value.clone())));
    interpreter.run("print 2").unwrap();

    assert_eq!(*first.borrow(), vec![Value::Integer(1)]);
    assert_eq!(*second.borrow(), vec![Value::Integer(2)]);
}

#[test]
fn math_library_is_preregistered() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.run("print sqr(9)\nprint int(3.7)\nprint pow(2, 10)\nprint abs(-5)")
               .unwrap();

    assert_eq!(*output.borrow(),
               vec![Value::Float(3.0),
                    Value::Integer(3),
                    Value::Float(1024.0),
                    Value::Float(5.0)]);
}

#[test]
fn math_library_rejects_bad_arguments() {
    let mut interpreter = Interpreter::new();

    assert!(interpreter.run("print log(0)").is_err());
    assert!(interpreter.run("print sqr(-1)").is_err());
    assert!(interpreter.run("print sin(\"x\")").is_err());
    assert!(interpreter.run("print pow(2)").is_err());
}

#[test]
fn rnd_stays_in_range() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.run("let r = rnd()\nprint r >= 0 and r < 1").unwrap();
    assert_eq!(*output.borrow(), vec![Value::Bool(true)]);
}

#[test]
fn math_functions_can_be_overridden_by_the_host() {
    let (mut interpreter, output) = collecting_interpreter();
    interpreter.register_function("sqr", Box::new(|_args| Ok(Value::Integer(-1))));

    interpreter.run("print sqr(9)").unwrap();
    assert_eq!(*output.borrow(), vec![Value::Integer(-1)]);
}

#[test]
fn globals_seeded_by_run_survive_on_the_same_instance() {
    let (mut interpreter, output) = collecting_interpreter();

    interpreter.run("let x = 41").unwrap();
    interpreter.run("print x + 1").unwrap();

    assert_eq!(*output.borrow(), vec![Value::Integer(42)]);
}
