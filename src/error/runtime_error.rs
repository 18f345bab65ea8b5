use crate::ast::Pos;

#[derive(Debug)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to read an undefined variable.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source position of the read.
        pos:  Pos,
    },
    /// Called an unknown function from script code.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source position of the call.
        pos:  Pos,
    },
    /// The host invoked `call` with a name no loaded script defines. This is
    /// an API-level error and carries no source position.
    UnknownCallTarget {
        /// The requested function name.
        name: String,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source position where the error occurred.
        pos:     Pos,
    },
    /// Attempted division by zero, integer or float.
    DivisionByZero {
        /// The source position of the division.
        pos: Pos,
    },
    /// The wrong number of arguments was supplied to a function.
    ArityMismatch {
        /// The name of the function.
        name:     String,
        /// How many parameters the function declares.
        expected: usize,
        /// How many arguments were supplied.
        found:    usize,
        /// The source position of the call, or of the definition when the
        /// mismatch comes from the host `call` entry point.
        pos:      Pos,
    },
    /// The total number of loop iterations exceeded the configured budget.
    IterationLimitExceeded {
        /// The configured maximum.
        limit: u64,
        /// The position of the loop that exhausted the budget.
        pos:   Pos,
    },
    /// A host-registered callback reported a failure. The message is
    /// propagated verbatim.
    HostFunction {
        /// The callback's error message.
        message: String,
        /// The source position of the call.
        pos:     Pos,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, pos } => {
                write!(f, "Error at {pos}: Unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, pos } => {
                write!(f, "Error at {pos}: Unknown function '{name}'.")
            },
            Self::UnknownCallTarget { name } => {
                write!(f, "Error: Unknown function '{name}'.")
            },
            Self::TypeError { details, pos } => {
                write!(f, "Error at {pos}: Type error: {details}.")
            },
            Self::DivisionByZero { pos } => write!(f, "Error at {pos}: Division by zero."),
            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  pos, } => write!(f,
                                                   "Error at {pos}: Function '{name}' expects {expected} arguments, but {found} were supplied."),
            Self::IterationLimitExceeded { limit, pos } => write!(f,
                                                                 "Error at {pos}: Maximum loop iterations exceeded ({limit})."),
            Self::HostFunction { message, pos } => write!(f, "Error at {pos}: {message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
