/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions:
/// arithmetic with integer/float promotion and string concatenation,
/// type-aware equality, ordering comparisons, and logical operators.
pub mod binary;

/// Core evaluation logic and context management.
///
/// Contains the `Context` type with its scope stack, function tables, print
/// sink, iteration budget and AST cache, together with the externally
/// visible entry points (`run`, `load`, `call`, `validate`).
pub mod core;

/// Evaluation of `for` loops.
///
/// Manages the loop variable scope, the fixed +1 step, and the global
/// iteration budget.
pub mod for_loop;

/// Function call evaluation.
///
/// Dispatches calls to host-registered callbacks and script-defined
/// functions, binds parameters, and manages the return slot.
pub mod function;

/// Statement execution.
///
/// Implements execution for all statement forms, including the break/return
/// control-flow flags.
pub mod statement;

/// Unary operator evaluation.
///
/// Handles numeric negation and logical NOT.
pub mod unary;
