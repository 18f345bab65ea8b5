use crate::ast::Pos;

#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// A string literal was not closed before the end of the line or input.
    UnterminatedString {
        /// The source position of the opening quote.
        pos: Pos,
    },
    /// Encountered a character that does not start any token. This includes a
    /// lone `!` that is not part of `!=`.
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// The source position where the error occurred.
        pos:       Pos,
    },
    /// A numeric literal could not be represented (e.g. an integer beyond the
    /// 64-bit range).
    InvalidNumber {
        /// The literal text as written.
        literal: String,
        /// The source position where the error occurred.
        pos:     Pos,
    },
    /// Found a token that no statement or expression can start with here.
    UnexpectedToken {
        /// A description of the token encountered.
        token: String,
        /// The source position where the error occurred.
        pos:   Pos,
    },
    /// A specific token was required but something else was found.
    ExpectedToken {
        /// A description of what the parser required.
        expected: String,
        /// A description of the token actually found.
        found:    String,
        /// The source position where the error occurred.
        pos:      Pos,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// The source position where input ran out.
        pos: Pos,
    },
    /// The identifier after `next` does not match the loop variable.
    LoopVariableMismatch {
        /// The name written after `next`.
        next_name: String,
        /// The loop variable from the matching `for`.
        for_name:  String,
        /// The source position of the mismatched name.
        pos:       Pos,
    },
}

impl ParseError {
    /// Gets the source position the error points at.
    #[must_use]
    pub const fn position(&self) -> Pos {
        match self {
            Self::UnterminatedString { pos }
            | Self::UnexpectedCharacter { pos, .. }
            | Self::InvalidNumber { pos, .. }
            | Self::UnexpectedToken { pos, .. }
            | Self::ExpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos }
            | Self::LoopVariableMismatch { pos, .. } => *pos,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedString { pos } => {
                write!(f, "Error at {pos}: Unterminated string literal.")
            },

            Self::UnexpectedCharacter { character, pos } => {
                write!(f, "Error at {pos}: Unexpected character '{character}'.")
            },

            Self::InvalidNumber { literal, pos } => {
                write!(f, "Error at {pos}: Invalid numeric literal '{literal}'.")
            },

            Self::UnexpectedToken { token, pos } => {
                write!(f, "Error at {pos}: Unexpected token {token}.")
            },

            Self::ExpectedToken { expected, found, pos } => {
                write!(f, "Error at {pos}: Expected {expected}, found {found}.")
            },

            Self::UnexpectedEndOfInput { pos } => {
                write!(f, "Error at {pos}: Unexpected end of input.")
            },

            Self::LoopVariableMismatch { next_name,
                                         for_name,
                                         pos, } => write!(f,
                                                          "Error at {pos}: NEXT variable '{next_name}' does not match FOR variable '{for_name}'."),
        }
    }
}

impl std::error::Error for ParseError {}
