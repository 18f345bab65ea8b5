use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, Pos, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{describe, expect, parse_comma_separated},
        },
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-` (numeric negation) and `not` (logical
/// NOT). Unary operators are right-associative, so `not -x` parses as
/// `not (-x)`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "not") unary
///            | primary
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::Unary`] or a primary expression.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(token) = tokens.peek().copied()
       && matches!(token.kind, TokenKind::Minus)
    {
        tokens.next();
        let operand = parse_unary(tokens)?;
        return Ok(Expr::Unary { op:      UnaryOperator::Negate,
                                operand: Box::new(operand),
                                pos:     token.pos, });
    }

    if let Some(token) = tokens.peek().copied()
       && matches!(token.kind, TokenKind::Not)
    {
        tokens.next();
        let operand = parse_unary(tokens)?;
        return Ok(Expr::Unary { op:      UnaryOperator::Not,
                                operand: Box::new(operand),
                                pos:     token.pos, });
    }

    parse_primary(tokens)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - integer, float, string and boolean literals
/// - identifiers
/// - function calls (an identifier directly followed by `(`)
/// - parenthesized expressions
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier ["(" arguments ")"]
///              | "(" expression ")"
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary
///   expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) });
    };

    match &token.kind {
        TokenKind::Integer(value) => {
            tokens.next();
            Ok(Expr::Literal { value: (*value).into(),
                               pos:   token.pos, })
        },
        TokenKind::Float(value) => {
            tokens.next();
            Ok(Expr::Literal { value: (*value).into(),
                               pos:   token.pos, })
        },
        TokenKind::Str(value) => {
            tokens.next();
            Ok(Expr::Literal { value: LiteralValue::Str(value.clone()),
                               pos:   token.pos, })
        },
        TokenKind::True => {
            tokens.next();
            Ok(Expr::Literal { value: true.into(),
                               pos:   token.pos, })
        },
        TokenKind::False => {
            tokens.next();
            Ok(Expr::Literal { value: false.into(),
                               pos:   token.pos, })
        },
        TokenKind::Identifier(name) => {
            let name = name.clone();
            tokens.next();

            if let Some(next) = tokens.peek().copied()
               && matches!(next.kind, TokenKind::LParen)
            {
                tokens.next();
                let args = parse_call_arguments(tokens)?;
                return Ok(Expr::Call { name,
                                       args,
                                       pos: token.pos });
            }

            Ok(Expr::Variable { name,
                                pos: token.pos })
        },
        TokenKind::LParen => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            expect(tokens, &TokenKind::RParen, "')' after expression")?;
            Ok(expr)
        },
        _ => Err(ParseError::UnexpectedToken { token: describe(token),
                                               pos:   token.pos, }),
    }
}

/// Parses a comma-separated argument list up to and including the closing
/// `)`. The opening `(` must already be consumed.
pub(crate) fn parse_call_arguments<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_comma_separated(tokens, parse_expression, &TokenKind::RParen)
}
