use logos::Logos;

use crate::{ast::Pos, error::ParseError};

/// Raw token produced by the generated lexer.
///
/// This is the shape logos can match directly: literals, identifiers,
/// operators and delimiters. Keywords are deliberately absent; reserved words
/// are matched case-insensitively, so they are scanned as identifiers and
/// resolved against the keyword table afterwards. The raw stream is converted
/// into position-carrying [`Token`] values by [`tokenize`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\r]+|#[^\n]*)")]
enum RawToken {
    /// Float literal tokens, such as `3.14`. The dot must be followed by at
    /// least one digit, otherwise the digits lex as an integer and the dot is
    /// left behind.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens. Escape sequences are resolved by the callback;
    /// a raw newline inside the quotes fails the match, which surfaces as an
    /// unterminated-string error.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    Str(String),
    /// Identifier tokens; possibly a reserved word, resolved later.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Identifier,
    /// `\n`
    #[token("\n")]
    Newline,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `=`
    #[token("=")]
    Equal,
    /// `<>` or `!=`
    #[token("<>")]
    #[token("!=")]
    NotEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
}

/// Parses an integer literal from the current token slice.
///
/// Returns `None` when the digits exceed the 64-bit signed range, which fails
/// the match and is reported as an invalid numeric literal.
fn parse_integer(lex: &logos::Lexer<RawToken>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<RawToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Resolves escape sequences in a string literal.
///
/// Recognized escapes are `\"`, `\\`, `\n`, `\t` and `\r`; any other escaped
/// character is passed through literally.
fn parse_string(lex: &logos::Lexer<RawToken>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut unescaped = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            // Covers \" and \\ as well: the escaped character stands for
            // itself.
            Some(other) => unescaped.push(other),
            None => {},
        }
    }

    unescaped
}

/// The kind of a lexical token.
///
/// This is the closed set the parser works with: literals carry their parsed
/// values, reserved words each have their own kind, and a synthetic `Eof`
/// kind terminates every token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// End of input. Always the last token of a stream.
    Eof,
    /// A line break. Statement terminator.
    Newline,
    /// An identifier that is not a reserved word, carrying its name as
    /// written.
    Identifier(String),
    /// An integer literal.
    Integer(i64),
    /// A float literal.
    Float(f64),
    /// A string literal, unescaped.
    Str(String),
    /// `let`
    Let,
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `elseif`
    ElseIf,
    /// `endif`
    EndIf,
    /// `for`
    For,
    /// `to`
    To,
    /// `next`
    Next,
    /// `break`
    Break,
    /// `function`
    Function,
    /// `endfunction`
    EndFunction,
    /// `return`
    Return,
    /// `print`
    Print,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `true`
    True,
    /// `false`
    False,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Equal,
    /// `<>` or `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `:`
    Colon,
}

/// A lexical token: its kind, the literal text it was scanned from, and the
/// position of its first byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind:   TokenKind,
    /// The lexeme as written in the source. Reserved words keep their
    /// original casing here.
    pub lexeme: String,
    /// The source position of the token's first byte.
    pub pos:    Pos,
}

/// Resolves a lowercased identifier against the reserved-word table.
///
/// Reserved words are matched case-insensitively, so the caller lowercases
/// before lookup. Returns `None` for ordinary identifiers.
fn lookup_keyword(lowered: &str) -> Option<TokenKind> {
    let kind = match lowered {
        "let" => TokenKind::Let,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "endif" => TokenKind::EndIf,
        "for" => TokenKind::For,
        "to" => TokenKind::To,
        "next" => TokenKind::Next,
        "break" => TokenKind::Break,
        "function" => TokenKind::Function,
        "endfunction" => TokenKind::EndFunction,
        "return" => TokenKind::Return,
        "print" => TokenKind::Print,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => return None,
    };
    Some(kind)
}

/// Converts a raw token into its public kind.
///
/// Identifiers are checked against the reserved-word table here; everything
/// else maps one-to-one.
fn convert(raw: RawToken, lexeme: &str) -> TokenKind {
    match raw {
        RawToken::Identifier => lookup_keyword(&lexeme.to_lowercase())
            .unwrap_or_else(|| TokenKind::Identifier(lexeme.to_string())),
        RawToken::Integer(value) => TokenKind::Integer(value),
        RawToken::Float(value) => TokenKind::Float(value),
        RawToken::Str(value) => TokenKind::Str(value),
        RawToken::Newline => TokenKind::Newline,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Equal => TokenKind::Equal,
        RawToken::NotEqual => TokenKind::NotEqual,
        RawToken::Less => TokenKind::Less,
        RawToken::Greater => TokenKind::Greater,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
    }
}

/// Classifies a stretch of input the lexer could not match.
///
/// The first byte decides the report: an opening quote means the string was
/// never closed, a digit means a numeric literal that cannot be represented,
/// anything else is simply a character the language has no use for.
fn lexical_error(slice: &str, pos: Pos) -> ParseError {
    match slice.chars().next() {
        Some('"') => ParseError::UnterminatedString { pos },
        Some(c) if c.is_ascii_digit() => ParseError::InvalidNumber { literal: slice.to_string(),
                                                                    pos },
        Some(character) => ParseError::UnexpectedCharacter { character, pos },
        None => ParseError::UnexpectedEndOfInput { pos },
    }
}

/// Converts a source string into a sequence of tokens.
///
/// The sequence always ends with a single [`TokenKind::Eof`] token. Newlines
/// are significant (they terminate statements) and are emitted as tokens;
/// spaces, tabs, carriage returns and `#` line comments are skipped. Lexing
/// stops at the first error.
///
/// # Errors
/// Returns a [`ParseError`] describing the first unterminated string, invalid
/// numeric literal or unexpected character, with its source position.
///
/// # Example
/// ```
/// use embasic::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("LET x = 1").unwrap();
///
/// // Reserved words match case-insensitively but keep their spelling.
/// assert_eq!(tokens[0].kind, TokenKind::Let);
/// assert_eq!(tokens[0].lexeme, "LET");
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    let mut line = 1usize;
    let mut line_start = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let pos = Pos::new(line, span.start - line_start + 1);

        match result {
            Ok(RawToken::Newline) => {
                tokens.push(Token { kind:   TokenKind::Newline,
                                    lexeme: "\\n".to_string(),
                                    pos });
                line += 1;
                line_start = span.end;
            },
            Ok(raw) => {
                let lexeme = lexer.slice().to_string();
                let kind = convert(raw, &lexeme);
                tokens.push(Token { kind, lexeme, pos });
            },
            Err(()) => return Err(lexical_error(lexer.slice(), pos)),
        }
    }

    tokens.push(Token { kind:   TokenKind::Eof,
                        lexeme: String::new(),
                        pos:    Pos::new(line, source.len() - line_start + 1), });

    Ok(tokens)
}
