use std::iter::Peekable;

use crate::{
    ast::Pos,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Renders a token for use in error messages.
///
/// Structural tokens are named, literals are quoted, and everything else
/// shows its lexeme as written.
pub(in crate::interpreter::parser) fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Str(value) => format!("string \"{value}\""),
        _ => format!("'{}'", token.lexeme),
    }
}

/// Consumes the next token unconditionally.
///
/// The token stream always ends with an `Eof` token, so exhaustion can only
/// happen after a previous error; it is still reported rather than unwrapped.
pub(in crate::interpreter::parser) fn advance<'a, I>(tokens: &mut Peekable<I>)
                                                     -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next()
          .ok_or(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) })
}

/// Consumes the next token and checks it against an expected kind.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `kind`: The required token kind.
/// - `expected`: Human-readable description used in the error message.
///
/// # Returns
/// The position of the consumed token.
///
/// # Errors
/// Returns `ParseError::ExpectedToken` when the next token has a different
/// kind.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: &TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<Pos>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == *kind => Ok(token.pos),
        Some(token) => Err(ParseError::ExpectedToken { expected: expected.to_string(),
                                                       found:    describe(token),
                                                       pos:      token.pos, }),
        None => Err(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) }),
    }
}

/// Skips any run of newline tokens. Used between statements, where blank
/// lines are insignificant.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while let Some(token) = tokens.peek().copied()
          && matches!(token.kind, TokenKind::Newline)
    {
        tokens.next();
    }
}

/// Consumes a single trailing newline if one is present.
///
/// Statement terminators permit an optional newline or end of input, so a
/// missing newline is not an error here.
pub(in crate::interpreter::parser) fn consume_newline<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    if let Some(token) = tokens.peek().copied()
       && matches!(token.kind, TokenKind::Newline)
    {
        tokens.next();
    }
}

/// Parses a plain identifier and returns its name and position.
///
/// The name is returned as written; callers that store it for scope lookup
/// lowercase it at the point of use.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str)
                                                              -> ParseResult<(String, Pos)>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) => match &token.kind {
            TokenKind::Identifier(name) => Ok((name.clone(), token.pos)),
            _ => Err(ParseError::ExpectedToken { expected: expected.to_string(),
                                                 found:    describe(token),
                                                 pos:      token.pos, }),
        },
        None => Err(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) }),
    }
}

/// Parses a comma-separated list of items terminated by a closing token.
///
/// This utility is shared by call-argument lists and parameter lists. It
/// repeatedly calls `parse_item` to parse one element, expecting either a
/// comma to continue the list or the closing token to end it. An immediately
/// encountered closing token produces an empty list. The closing token is
/// consumed.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or the list is not
/// properly terminated.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &TokenKind)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();

    if let Some(token) = tokens.peek().copied()
       && token.kind == *closing
    {
        tokens.next();
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek().copied() {
            Some(token) if matches!(token.kind, TokenKind::Comma) => {
                tokens.next();
            },
            Some(token) if token.kind == *closing => {
                tokens.next();
                break;
            },
            Some(token) => {
                return Err(ParseError::ExpectedToken { expected: "',' or ')'".to_string(),
                                                       found:    describe(token),
                                                       pos:      token.pos, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) }),
        }
    }

    Ok(items)
}
