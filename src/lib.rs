//! # embasic
//!
//! embasic is an embeddable BASIC-style scripting language interpreter
//! written in Rust. A host application constructs an [`Interpreter`],
//! registers the native callbacks it wants to expose, and then either runs
//! scripts end-to-end or loads a script once and invokes named
//! script-defined functions repeatedly.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST
/// is built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source positions to AST nodes for error reporting.
/// - Enables extensible and robust handling of parsed code.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or evaluating code. It standardizes error reporting and carries detailed
/// information about failures, including error kinds, descriptions, and
/// source positions for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line and column numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, error handling, and all supporting infrastructure to
/// provide a complete runtime for script execution.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating scripts.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// The built-in math function library.
///
/// Trivial native callbacks (`pow`, `abs`, `sin`, `sqr`, ...) registered
/// through the same extension mechanism hosts use for their own functions.
pub mod mathlib;

pub use crate::{
    error::Error,
    interpreter::{
        evaluator::core::{Context, NativeFunction, PrintSink},
        value::core::Value,
    },
};

/// The embeddable interpreter facade.
///
/// Wraps a [`Context`] and pre-registers the built-in math library. Hosts
/// that want a bare instance without the math functions can use [`Context`]
/// directly; the operations are the same.
///
/// One instance is strictly single-threaded and not reentrant: an entry
/// point (`run`, `load`, `call`, `validate`) must complete before another
/// begins, and host callbacks must not call back into the same instance.
/// Hosts that need concurrent scripting hold one interpreter per thread;
/// separate instances share nothing.
///
/// # Example
/// ```
/// use embasic::Interpreter;
///
/// let mut interpreter = Interpreter::new();
/// assert!(interpreter.run("let x = 2 + 3\nprint x").is_ok());
///
/// // 'y' is not defined.
/// assert!(interpreter.run("print y").is_err());
/// ```
pub struct Interpreter {
    context: Context,
}

impl Interpreter {
    /// Creates a new interpreter with the default print sink (standard
    /// output), the default iteration budget (100 000) and the math library
    /// registered.
    #[must_use]
    pub fn new() -> Self {
        let mut context = Context::new();
        mathlib::install(&mut context);
        Self { context }
    }

    /// Registers a host callback under a case-insensitive name, overwriting
    /// any previous registration. Host callbacks shadow script-defined
    /// functions of the same name.
    ///
    /// # Example
    /// ```
    /// use embasic::{Interpreter, Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.register_function("answer", Box::new(|_args| Ok(Value::Integer(42))));
    ///
    /// assert!(interpreter.run("let x = answer()").is_ok());
    /// ```
    pub fn register_function(&mut self, name: &str, callback: NativeFunction) {
        self.context.register_function(name, callback);
    }

    /// Replaces the print sink. The sink receives the typed value of every
    /// `print` statement.
    pub fn set_print_sink(&mut self, sink: PrintSink) {
        self.context.set_print_sink(sink);
    }

    /// Replaces the loop-iteration budget (default 100 000).
    pub fn set_max_iterations(&mut self, max: u64) {
        self.context.set_max_iterations(max);
    }

    /// Executes a script end-to-end.
    ///
    /// # Errors
    /// Returns the first lexical, syntactic or runtime failure.
    pub fn run(&mut self, source: &str) -> Result<(), Error> {
        self.context.run(source)
    }

    /// Loads a script: registers its function definitions and executes its
    /// top-level statements, seeding globals for later [`Interpreter::call`]s.
    ///
    /// # Errors
    /// Returns the first lexical, syntactic or runtime failure.
    pub fn load(&mut self, source: &str) -> Result<(), Error> {
        self.context.load(source)
    }

    /// Invokes a loaded script-defined function by case-insensitive name and
    /// returns its value. A function whose `return` never executed yields
    /// [`Value::Null`].
    ///
    /// # Errors
    /// Fails when no such function is loaded, on argument-count mismatch, or
    /// when the body raises a runtime error.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error> {
        self.context.call(name, args)
    }

    /// Reports whether a script-defined function with the given name is
    /// currently loaded.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.context.has_function(name)
    }

    /// Checks a script for lexical and syntax errors without executing it.
    ///
    /// # Errors
    /// Returns the first lexical or syntactic failure.
    pub fn validate(&mut self, source: &str) -> Result<(), Error> {
        self.context.validate(source)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
