use std::iter::Peekable;

use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind, tokenize},
        parser::{
            binary::parse_logical_or,
            statement::parse_statement,
            utils::skip_newlines,
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Lexes and parses a complete source string.
///
/// This is the entry point the evaluator uses on an AST-cache miss. The
/// first lexical or syntactic error aborts and is returned; no partial
/// program is ever produced.
///
/// # Errors
/// Returns a [`ParseError`] from either the lexer or the parser.
///
/// # Example
/// ```
/// use embasic::interpreter::parser::core::parse_source;
///
/// assert!(parse_source("let x = 1 + 2\nprint x").is_ok());
/// assert!(parse_source("let = 5").is_err());
/// ```
pub fn parse_source(source: &str) -> ParseResult<Program> {
    let tokens = tokenize(source)?;
    let mut iter = tokens.iter().peekable();
    parse_program(&mut iter)
}

/// Parses an entire program from a token stream.
///
/// Statements are parsed until the end-of-input token; blank lines between
/// statements are skipped.
///
/// # Parameters
/// - `tokens`: Token iterator terminated by an `Eof` token.
///
/// # Returns
/// The parsed [`Program`].
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_newlines(tokens);
        match tokens.peek().copied() {
            None => break,
            Some(token) if matches!(token.kind, TokenKind::Eof) => break,
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok(Program { statements })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical OR, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_logical_or(tokens)
}
