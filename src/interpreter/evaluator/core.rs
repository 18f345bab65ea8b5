use std::{collections::HashMap, rc::Rc};

use sha2::{Digest, Sha256};

use crate::{
    ast::{Expr, FunctionDef, Pos, Program, Statement},
    error::{Error, ParseError, RuntimeError},
    interpreter::{parser::core::parse_source, value::core::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Signature for host-registered native callbacks.
///
/// A callback receives the evaluated argument values and returns either a
/// result value or an error message. The message is propagated to the script
/// caller verbatim. Callbacks run synchronously on the evaluator thread and
/// may carry mutable state.
pub type NativeFunction = Box<dyn FnMut(&[Value]) -> Result<Value, String>>;

/// Signature for print sinks.
///
/// The sink receives the typed value of every `print` statement. The default
/// sink writes the value's string conversion and a newline to standard
/// output.
pub type PrintSink = Box<dyn FnMut(&Value)>;

/// Default limit for loop iterations, guarding against runaway scripts.
pub const MAX_ITERATIONS: u64 = 100_000;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the scope stack, script-defined
/// and host-registered function tables, the print sink, the iteration
/// budget, the break/return control-flow flags, and the AST cache.
///
/// ## Usage
///
/// A `Context` is created once and reused. Scripts either execute end-to-end
/// through [`Context::run`], or are installed with [`Context::load`] and
/// then driven through [`Context::call`]. The context is strictly
/// single-threaded and not reentrant: one entry point must complete before
/// another begins, and a host callback must never call back into the same
/// context.
pub struct Context {
    /// The scope stack. Index 0 is the global frame and is never popped;
    /// further frames are pushed for function bodies and `for` loops. All
    /// keys are lowercased.
    pub scope_stack:     Vec<HashMap<String, Value>>,
    /// A mapping from lowercased function names to their script definitions.
    /// Rebuilt by `run` and `load` from the program's `function` statements.
    pub functions:       HashMap<String, Rc<FunctionDef>>,
    /// Host-registered callbacks by lowercased name. These shadow script
    /// functions of the same name.
    natives:             HashMap<String, NativeFunction>,
    /// Where `print` output goes.
    pub(crate) print_sink: PrintSink,
    /// The configured iteration budget.
    pub(crate) max_iterations: u64,
    /// Iterations consumed by the current entry point, across all loops.
    pub(crate) iteration_count: u64,
    /// Set by `break`; cleared by the loop that consumes it.
    pub(crate) break_flag:   bool,
    /// Set by `return`; unwinds blocks and loops until the call site.
    pub(crate) return_flag:  bool,
    /// The value of the last executed `return`, or `Null`.
    pub(crate) return_value: Value,
    /// Parsed programs keyed by source fingerprint. Additive, no eviction.
    ast_cache:           HashMap<u64, Rc<Program>>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a new evaluation context with an empty global scope, no
    /// functions, the default print sink (standard output) and the default
    /// iteration budget.
    #[must_use]
    pub fn new() -> Self {
        Self { scope_stack:     vec![HashMap::new()],
               functions:       HashMap::new(),
               natives:         HashMap::new(),
               print_sink:      Box::new(|value| println!("{value}")),
               max_iterations:  MAX_ITERATIONS,
               iteration_count: 0,
               break_flag:      false,
               return_flag:     false,
               return_value:    Value::Null,
               ast_cache:       HashMap::new(), }
    }

    /// Registers a host callback under a case-insensitive name.
    ///
    /// Registering the same name again overwrites the previous callback.
    /// Host callbacks take precedence over script-defined functions of the
    /// same name.
    pub fn register_function(&mut self, name: &str, callback: NativeFunction) {
        self.natives.insert(name.to_lowercase(), callback);
    }

    /// Replaces the print sink.
    ///
    /// The sink receives the typed value of every `print` statement from now
    /// on. It can be replaced at any time between entry points.
    pub fn set_print_sink(&mut self, sink: PrintSink) {
        self.print_sink = sink;
    }

    /// Replaces the iteration budget (default 100 000).
    pub fn set_max_iterations(&mut self, max: u64) {
        self.max_iterations = max;
    }

    /// Executes a script end-to-end.
    ///
    /// Per-run execution state is reset, the script-function table is
    /// rebuilt from this program's `function` statements, and the remaining
    /// top-level statements execute in order against the persistent global
    /// scope. A top-level `return` stops execution; its value is discarded
    /// and the run reports success.
    ///
    /// # Errors
    /// Returns the first lexical, syntactic or runtime failure.
    pub fn run(&mut self, source: &str) -> Result<(), Error> {
        let program = self.cached_program(source)?;
        self.execute_program(&program)?;
        Ok(())
    }

    /// Loads a script for the Load/Call pattern.
    ///
    /// The script-function table is rebuilt from this program, and the
    /// non-function top-level statements execute against the global scope so
    /// that top-level assignments seed globals which later
    /// [`Context::call`]s observe and mutate.
    ///
    /// # Errors
    /// Returns the first lexical, syntactic or runtime failure.
    pub fn load(&mut self, source: &str) -> Result<(), Error> {
        self.run(source)
    }

    /// Invokes a loaded script-defined function by name.
    ///
    /// The name is matched case-insensitively against the script-function
    /// table. Execution state is reset and the scope stack is truncated to
    /// the global frame, so function-local variables from earlier calls do
    /// not persist while load-time globals do. Arguments are bound to
    /// parameters in a fresh scope.
    ///
    /// # Errors
    /// Fails when no such function is loaded, when the argument count does
    /// not match the parameter count, or when the body raises a runtime
    /// error.
    ///
    /// # Example
    /// ```
    /// use embasic::{Value, interpreter::evaluator::core::Context};
    ///
    /// let mut context = Context::new();
    /// context.load("function double(n):\n  return n * 2\nendfunction")
    ///        .unwrap();
    ///
    /// let result = context.call("double", &[Value::Integer(21)]).unwrap();
    /// assert_eq!(result, Value::Integer(42));
    /// ```
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let lowered = name.to_lowercase();
        let Some(function) = self.functions.get(&lowered).cloned() else {
            return Err(RuntimeError::UnknownCallTarget { name: name.to_string() }.into());
        };

        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch { name:     function.name.clone(),
                                                     expected: function.params.len(),
                                                     found:    args.len(),
                                                     pos:      function.pos, }.into());
        }

        self.reset_execution_state();

        self.push_scope();
        for (param, value) in function.params.iter().zip(args) {
            self.define_local(&param.to_lowercase(), value.clone());
        }

        let outcome = self.execute_block(&function.body);
        self.pop_scope();
        outcome?;

        Ok(std::mem::replace(&mut self.return_value, Value::Null))
    }

    /// Reports whether a script-defined function with the given name is
    /// currently loaded. The check is case-insensitive.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Checks a script for lexical and syntax errors without executing it.
    ///
    /// The parsed program lands in the AST cache, so a following `run` or
    /// `load` of the same source will not parse again. Interpreter state is
    /// otherwise untouched, even on failure.
    ///
    /// # Errors
    /// Returns the first lexical or syntactic failure.
    pub fn validate(&mut self, source: &str) -> Result<(), Error> {
        self.cached_program(source)?;
        Ok(())
    }

    /// Returns a cached AST for the source, parsing and caching on a miss.
    fn cached_program(&mut self, source: &str) -> Result<Rc<Program>, ParseError> {
        let key = fingerprint(source);

        if let Some(program) = self.ast_cache.get(&key) {
            return Ok(Rc::clone(program));
        }

        let program = Rc::new(parse_source(source)?);
        self.ast_cache.insert(key, Rc::clone(&program));
        Ok(program)
    }

    /// Runs a parsed program: resets state, collects function definitions,
    /// then executes the remaining top-level statements.
    fn execute_program(&mut self, program: &Program) -> EvalResult<()> {
        self.reset_execution_state();
        self.functions.clear();
        self.register_script_functions(program);

        for statement in &program.statements {
            if matches!(statement, Statement::Function(_)) {
                continue;
            }

            self.execute_statement(statement)?;

            if self.return_flag {
                break;
            }
        }

        Ok(())
    }

    /// First pass over a program: registers every `function` statement into
    /// the script-function table under its lowercased name.
    fn register_script_functions(&mut self, program: &Program) {
        for statement in &program.statements {
            if let Statement::Function(def) = statement {
                self.functions.insert(def.name.to_lowercase(), Rc::clone(def));
            }
        }
    }

    /// Clears the per-entry-point transient state: the iteration counter,
    /// both control-flow flags, the return slot, and any scope frames above
    /// the global one. The global frame itself survives entry points.
    fn reset_execution_state(&mut self) {
        self.iteration_count = 0;
        self.break_flag = false;
        self.return_flag = false;
        self.return_value = Value::Null;
        self.scope_stack.truncate(1);
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches based on expression variant: literals, variable reads,
    /// unary and binary operations, and function calls.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The computed [`Value`].
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, pos } => self.eval_variable(name, *pos),
            Expr::Unary { op, operand, pos } => self.eval_unary(*op, operand, *pos),
            Expr::Binary { left, op, right, pos } => self.eval_binary(left, *op, right, *pos),
            Expr::Call { name, args, pos } => self.eval_call(name, args, *pos),
        }
    }

    /// Looks up a variable read.
    ///
    /// The name is lowercased and resolved against the scope stack from the
    /// innermost frame outward.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnknownVariable` when no frame binds the name.
    pub fn eval_variable(&self, name: &str, pos: Pos) -> EvalResult<Value> {
        self.get_variable(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           pos })
    }

    /// Pushes a new local scope.
    ///
    /// Used for function bodies and `for` loops.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Removes the innermost local scope. The global frame is never removed.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Retrieves a variable from the scope stack.
    ///
    /// Lookup begins at the innermost scope and proceeds outward toward the
    /// global scope. The name must already be lowercased.
    ///
    /// # Example
    /// ```
    /// use embasic::{Value, interpreter::evaluator::core::Context};
    ///
    /// let mut context = Context::new();
    /// context.define_local("x", Value::Integer(5));
    ///
    /// assert_eq!(context.get_variable("x"), Some(&Value::Integer(5)));
    /// assert_eq!(context.get_variable("y"), None);
    /// ```
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        for scope in self.scope_stack.iter().rev() {
            if let Some(v) = scope.get(name) {
                return Some(v);
            }
        }
        None
    }

    /// Defines a variable in the current (innermost) scope, shadowing any
    /// outer binding. This is `let` semantics. The name must already be
    /// lowercased.
    ///
    /// # Panics
    /// Panics if no scope exists, which indicates an internal error: the
    /// stack always holds the global frame.
    pub fn define_local(&mut self, name: &str, value: Value) {
        self.scope_stack
            .last_mut()
            .expect("at least global")
            .insert(name.to_string(), value);
    }

    /// Assigns to the nearest scope that already binds the variable, or
    /// creates it in the current scope.
    ///
    /// The search proceeds from the innermost scope outward; this is what
    /// makes assigning to a global from inside a function body work. The
    /// name must already be lowercased.
    ///
    /// # Example
    /// ```
    /// use embasic::{Value, interpreter::evaluator::core::Context};
    ///
    /// let mut context = Context::new();
    /// context.define_local("y", Value::Integer(1));
    ///
    /// context.set_variable("y", Value::Integer(5));
    ///
    /// assert_eq!(context.get_variable("y"), Some(&Value::Integer(5)));
    /// ```
    pub fn set_variable(&mut self, name: &str, value: Value) {
        for scope in self.scope_stack.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Looks up a registered host callback by lowercased name.
    pub(crate) fn native_mut(&mut self, lowered: &str) -> Option<&mut NativeFunction> {
        self.natives.get_mut(lowered)
    }
}

/// Computes the AST-cache key for a source string.
///
/// The leading 64 bits of the SHA-256 digest of the source bytes. A
/// collision would silently reuse the wrong program, so the hash must be of
/// cryptographic quality; a 64-bit prefix of it is sufficient.
fn fingerprint(source: &str) -> u64 {
    let digest = Sha256::digest(source.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}
