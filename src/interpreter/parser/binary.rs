use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses logical OR expressions.
///
/// Handles left-associative chains of `or`. This is the lowest precedence
/// level of the expression grammar.
///
/// Grammar: `logical_or := logical_and ("or" logical_and)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree using `BinaryOperator::Or`.
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_logical_and(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op, BinaryOperator::Or)
        {
            tokens.next();

            let right = parse_logical_and(tokens)?;

            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }

        break;
    }

    Ok(left)
}

/// Parses logical AND expressions.
///
/// Handles left-associative chains of `and`. Precedence is above OR and
/// below equality.
///
/// Grammar: `logical_and := equality ("and" equality)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree using `BinaryOperator::And`.
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_equality(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op, BinaryOperator::And)
        {
            tokens.next();

            let right = parse_equality(tokens)?;

            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }

        break;
    }

    Ok(left)
}

/// Parses equality expressions.
///
/// Handles the left-associative operators `=` and `<>`/`!=`. Both spellings
/// of not-equal produce the same operator.
///
/// Grammar: `equality := comparison (("=" | "<>" | "!=") comparison)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree combining comparison-level nodes.
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_comparison(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual)
        {
            tokens.next();
            let right = parse_comparison(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }
        break;
    }

    Ok(left)
}

/// Parses relational comparison expressions.
///
/// Handles the left-associative operators `<`, `>`, `<=` and `>=`.
///
/// Grammar: `comparison := additive (("<" | ">" | "<=" | ">=") additive)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree combining additive-level nodes.
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_additive(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op,
                       BinaryOperator::Less
                       | BinaryOperator::Greater
                       | BinaryOperator::LessEqual
                       | BinaryOperator::GreaterEqual)
        {
            tokens.next();
            let right = parse_additive(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }
        break;
    }

    Ok(left)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An `Expr::Binary` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_multiplicative(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
        {
            tokens.next();
            let right = parse_multiplicative(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }
        break;
    }

    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// Handles the left-associative operators `*` and `/`. This is the highest
/// binary precedence level; operands are unary expressions.
///
/// Grammar: `multiplicative := unary (("*" | "/") unary)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree combining unary-level nodes.
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = parse_unary(tokens)?;

    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
        {
            tokens.next();
            let right = parse_unary(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos: token.pos };
            continue;
        }
        break;
    }

    Ok(left)
}

/// Maps a token kind to its corresponding binary operator.
///
/// Returns `None` for all tokens that are not binary operators.
///
/// # Example
/// ```
/// use embasic::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&TokenKind::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&TokenKind::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(kind: &TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Equal => Some(BinaryOperator::Equal),
        TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}
