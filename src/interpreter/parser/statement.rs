use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{AssignOperator, ElseIfClause, Expr, FunctionDef, Pos, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            unary::parse_call_arguments,
            utils::{
                advance, consume_newline, describe, expect, parse_comma_separated,
                parse_identifier, skip_newlines,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a variable declaration (`let x = expr`),
/// - an identifier-led statement (assignment, increment/decrement, or a bare
///   function call),
/// - an `if` statement,
/// - a `for` loop,
/// - `break`,
/// - a function definition,
/// - `return [expr]`,
/// - `print expr`.
///
/// Dispatch is on the first token. Keywords never parse as variable names;
/// any other leading token is an error.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a statement.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { pos: Pos::new(0, 0) });
    };

    match &token.kind {
        TokenKind::Let => parse_let_statement(tokens),
        TokenKind::If => parse_if_statement(tokens),
        TokenKind::For => parse_for_statement(tokens),
        TokenKind::Break => parse_break_statement(tokens),
        TokenKind::Function => parse_function_statement(tokens),
        TokenKind::Return => parse_return_statement(tokens),
        TokenKind::Print => parse_print_statement(tokens),
        TokenKind::Identifier(_) => parse_identifier_statement(tokens),
        _ => Err(ParseError::UnexpectedToken { token: describe(token),
                                               pos:   token.pos, }),
    }
}

/// Parses a sequence of statements until one of the terminator kinds is
/// found.
///
/// Blank lines inside the block are skipped. The terminator itself is not
/// consumed; reaching the end of input without a terminator simply ends the
/// block, and the caller reports the missing keyword.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `terminators`: Token kinds that end the block (e.g. `endif`, `next`).
///
/// # Returns
/// The statements of the block, in source order.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          terminators: &[TokenKind])
                          -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_newlines(tokens);
        let Some(token) = tokens.peek().copied() else { break };
        if matches!(token.kind, TokenKind::Eof) || terminators.contains(&token.kind) {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    Ok(statements)
}

/// Parses a variable declaration: `let IDENT = expr`.
fn parse_let_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let let_token = advance(tokens)?;
    let (name, _) = parse_identifier(tokens, "identifier after 'let'")?;
    expect(tokens, &TokenKind::Equal, "'=' after variable name")?;
    let value = parse_expression(tokens)?;
    consume_newline(tokens);

    Ok(Statement::Let { name,
                        value,
                        pos: let_token.pos })
}

/// Parses a statement that begins with an identifier.
///
/// After the identifier, the next token decides the form:
/// - `=`, `+=`, `-=` followed by an expression,
/// - bare `++` or `--`,
/// - `(` starting a function-call expression statement.
///
/// Any other follower is an error.
fn parse_identifier_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let ident = advance(tokens)?;
    let TokenKind::Identifier(name) = &ident.kind else {
        return Err(ParseError::UnexpectedToken { token: describe(ident),
                                                 pos:   ident.pos, });
    };
    let name = name.clone();
    let pos = ident.pos;

    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { pos });
    };

    match token.kind {
        TokenKind::Equal | TokenKind::PlusAssign | TokenKind::MinusAssign => {
            let op = match token.kind {
                TokenKind::Equal => AssignOperator::Assign,
                TokenKind::PlusAssign => AssignOperator::AddAssign,
                _ => AssignOperator::SubAssign,
            };
            tokens.next();
            let value = parse_expression(tokens)?;
            consume_newline(tokens);
            Ok(Statement::Assign { name,
                                   op,
                                   value: Some(value),
                                   pos })
        },

        TokenKind::PlusPlus => {
            tokens.next();
            consume_newline(tokens);
            Ok(Statement::Assign { name,
                                   op: AssignOperator::Increment,
                                   value: None,
                                   pos })
        },

        TokenKind::MinusMinus => {
            tokens.next();
            consume_newline(tokens);
            Ok(Statement::Assign { name,
                                   op: AssignOperator::Decrement,
                                   value: None,
                                   pos })
        },

        TokenKind::LParen => {
            tokens.next();
            let args = parse_call_arguments(tokens)?;
            consume_newline(tokens);
            Ok(Statement::Expression { expr: Expr::Call { name, args, pos },
                                       pos })
        },

        _ => {
            Err(ParseError::ExpectedToken { expected:
                                                "an assignment operator or '(' after identifier"
                                                    .to_string(),
                                            found: describe(token),
                                            pos: token.pos, })
        },
    }
}

/// Parses an `if` statement:
///
/// ```text
///     if expr then
///         block
///     elseif expr then
///         block
///     else
///         block
///     endif
/// ```
///
/// Any number of `elseif` clauses may appear; the `else` block is optional.
fn parse_if_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let if_token = advance(tokens)?;

    let condition = parse_expression(tokens)?;
    expect(tokens, &TokenKind::Then, "'then' after if condition")?;
    consume_newline(tokens);

    let block_ends = [TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf];
    let then_block = parse_block(tokens, &block_ends)?;

    let mut else_ifs = Vec::new();
    while let Some(token) = tokens.peek().copied()
          && matches!(token.kind, TokenKind::ElseIf)
    {
        tokens.next();

        let condition = parse_expression(tokens)?;
        expect(tokens, &TokenKind::Then, "'then' after elseif condition")?;
        consume_newline(tokens);

        let block = parse_block(tokens, &block_ends)?;
        else_ifs.push(ElseIfClause { condition,
                                     block,
                                     pos: token.pos });
    }

    let else_block = if let Some(token) = tokens.peek().copied()
                        && matches!(token.kind, TokenKind::Else)
    {
        tokens.next();
        consume_newline(tokens);
        Some(parse_block(tokens, &[TokenKind::EndIf])?)
    } else {
        None
    };

    expect(tokens, &TokenKind::EndIf, "'endif'")?;
    consume_newline(tokens);

    Ok(Statement::If { condition,
                       then_block,
                       else_ifs,
                       else_block,
                       pos: if_token.pos })
}

/// Parses a counted loop: `for IDENT = expr to expr ... next [IDENT]`.
///
/// When the identifier after `next` is present it must match the loop
/// variable exactly as tokenized; a mismatch is a parse error.
fn parse_for_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let for_token = advance(tokens)?;

    let (variable, _) = parse_identifier(tokens, "identifier after 'for'")?;
    expect(tokens, &TokenKind::Equal, "'=' after loop variable")?;
    let start = parse_expression(tokens)?;
    expect(tokens, &TokenKind::To, "'to' in for loop")?;
    let end = parse_expression(tokens)?;
    consume_newline(tokens);

    let body = parse_block(tokens, &[TokenKind::Next])?;
    expect(tokens, &TokenKind::Next, "'next'")?;

    if let Some(token) = tokens.peek().copied()
       && let TokenKind::Identifier(next_name) = &token.kind
    {
        if next_name != &variable {
            return Err(ParseError::LoopVariableMismatch { next_name: next_name.clone(),
                                                          for_name:  variable,
                                                          pos:       token.pos, });
        }
        tokens.next();
    }

    consume_newline(tokens);

    Ok(Statement::For { variable,
                        start,
                        end,
                        body,
                        pos: for_token.pos })
}

/// Parses a `break` statement.
fn parse_break_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let break_token = advance(tokens)?;
    consume_newline(tokens);
    Ok(Statement::Break { pos: break_token.pos })
}

/// Parses a function definition:
///
/// ```text
///     function name(param1, param2):
///         block
///     endfunction
/// ```
///
/// The colon after the parameter list is optional.
fn parse_function_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let function_token = advance(tokens)?;

    let (name, _) = parse_identifier(tokens, "function name")?;
    expect(tokens, &TokenKind::LParen, "'(' after function name")?;

    let params = parse_comma_separated(tokens,
                                       |t| parse_identifier(t, "parameter name").map(|(n, _)| n),
                                       &TokenKind::RParen)?;

    if let Some(token) = tokens.peek().copied()
       && matches!(token.kind, TokenKind::Colon)
    {
        tokens.next();
    }
    consume_newline(tokens);

    let body = parse_block(tokens, &[TokenKind::EndFunction])?;
    expect(tokens, &TokenKind::EndFunction, "'endfunction'")?;
    consume_newline(tokens);

    Ok(Statement::Function(Rc::new(FunctionDef { name,
                                                 params,
                                                 body,
                                                 pos: function_token.pos })))
}

/// Parses a `return` statement with an optional value expression.
fn parse_return_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let return_token = advance(tokens)?;

    let value = match tokens.peek().copied() {
        Some(token) if matches!(token.kind, TokenKind::Newline | TokenKind::Eof) => None,
        None => None,
        _ => Some(parse_expression(tokens)?),
    };

    consume_newline(tokens);

    Ok(Statement::Return { value,
                           pos: return_token.pos })
}

/// Parses a `print` statement.
fn parse_print_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let print_token = advance(tokens)?;
    let value = parse_expression(tokens)?;
    consume_newline(tokens);

    Ok(Statement::Print { value,
                          pos: print_token.pos })
}
