//! Lexer (tokenizer) for C-- source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. The scanner recovers from every lexical error: the offending
//! lexeme is reported through the [`Diagnostics`] sink and dropped, and
//! scanning continues at the next character. The returned stream is always
//! terminated by a [`TokenKind::Eof`] token.
//!
//! Every token records the position of its first character. Line and column
//! counters are 1-based; the column advances by the exact textual length of
//! every lexeme, including whitespace, comments, and dropped error lexemes.

use super::ast::SourceLocation;
use crate::diag::Diagnostics;

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLiteral(i32),
    /// Raw source spelling, including the surrounding quotes.
    StringLiteral(String),

    // Identifiers
    Ident(String),

    // Keywords
    Bool,
    Int,
    Void,
    True,
    False,
    Struct,
    Cin,
    Cout,
    If,
    Else,
    While,
    Repeat,
    Return,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Eq,         // =
    Bang,       // !
    PlusPlus,   // ++
    MinusMinus, // --
    EqEq,       // ==
    NotEq,      // !=
    OrOr,       // ||
    AndAnd,     // &&
    Lt,         // <
    Gt,         // >
    Le,         // <=
    Ge,         // >=
    LtLt,       // <<
    GtGt,       // >>

    // Punctuation
    LBrace,    // {
    RBrace,    // }
    LParen,    // (
    RParen,    // )
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .

    // End of file
    Eof,
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: SourceLocation,
}

/// Lexer for C-- source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, reporting lexical errors to `diag`.
    pub fn tokenize(&mut self, diag: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    loc: self.current_location(),
                });
                break;
            }

            // An error lexeme yields no token; scanning resumes after it.
            if let Some(token) = self.next_token(diag) {
                tokens.push(token);
            }
        }

        tokens
    }

    /// Get next token
    fn next_token(&mut self, diag: &mut Diagnostics) -> Option<Token> {
        let loc = self.current_location();
        let ch = self.advance()?;

        let kind = match ch {
            // String literals
            '"' => return self.string_literal(loc, diag),

            // Numeric literals
            '0'..='9' => return Some(self.number_literal(ch, loc, diag)),

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' => {
                return Some(self.identifier_or_keyword(ch, loc));
            }

            // Operators and punctuation
            '+' => {
                if self.peek() == Some('+') {
                    self.advance();
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.peek() == Some('-') {
                    self.advance();
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else if self.peek() == Some('<') {
                    self.advance();
                    TokenKind::LtLt
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::GtGt
                } else {
                    TokenKind::Gt
                }
            }
            // `&` and `|` are only legal as the doubled logical operators.
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    illegal_char(loc, '&', diag);
                    return None;
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    TokenKind::OrOr
                } else {
                    illegal_char(loc, '|', diag);
                    return None;
                }
            }
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,

            _ => {
                illegal_char(loc, ch, diag);
                return None;
            }
        };

        Some(Token { kind, loc })
    }

    /// Scan a string literal. The opening quote has already been consumed.
    ///
    /// The token value is the raw source spelling including both quotes.
    /// Three malformed shapes yield a diagnostic and no token: a literal
    /// with a bad escape, a literal left open at the end of the line, and
    /// the combination of the two. A string literal never spans lines; the
    /// terminating newline is left for the whitespace scanner.
    fn string_literal(&mut self, loc: SourceLocation, diag: &mut Diagnostics) -> Option<Token> {
        let mut text = String::from("\"");
        let mut saw_bad_escape = false;

        loop {
            match self.peek() {
                None | Some('\n') => {
                    let msg = if saw_bad_escape {
                        "unterminated string literal with bad escaped character ignored"
                    } else {
                        "unterminated string literal ignored"
                    };
                    diag.fatal(loc.line, loc.column, &format!("{} {}", msg, text));
                    return None;
                }
                Some('"') => {
                    self.advance();
                    text.push('"');
                    if saw_bad_escape {
                        diag.fatal(
                            loc.line,
                            loc.column,
                            &format!(
                                "string literal with bad escaped character ignored {}",
                                text
                            ),
                        );
                        return None;
                    }
                    return Some(Token {
                        kind: TokenKind::StringLiteral(text),
                        loc,
                    });
                }
                Some('\\') => {
                    self.advance();
                    text.push('\\');
                    match self.peek() {
                        Some(c @ ('n' | 't' | '\'' | '"' | '?' | '\\')) => {
                            self.advance();
                            text.push(c);
                        }
                        // A backslash at end of line (or input) is a bad
                        // escape; the literal is also unterminated.
                        None | Some('\n') => saw_bad_escape = true,
                        Some(c) => {
                            self.advance();
                            text.push(c);
                            saw_bad_escape = true;
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    /// Scan an integer literal (the first digit has been consumed).
    ///
    /// A value above `i32::MAX` saturates to `i32::MAX` and is flagged with
    /// a warning; the token is still produced.
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
        diag: &mut Diagnostics,
    ) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Saturating accumulation keeps arbitrarily long digit strings
        // above the i32 range without overflowing the accumulator.
        let wide = num_str.chars().fold(0i64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add((c as u8 - b'0') as i64)
        });

        let value = if wide > i32::MAX as i64 {
            diag.warn(
                loc.line,
                loc.column,
                "integer literal too large; using max value",
            );
            i32::MAX
        } else {
            wide as i32
        };

        Token {
            kind: TokenKind::IntLiteral(value),
            loc,
        }
    }

    /// Scan an identifier or keyword (the first character has been consumed).
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Reserved words never scan as identifiers.
        let kind = match ident.as_str() {
            "bool" => TokenKind::Bool,
            "int" => TokenKind::Int,
            "void" => TokenKind::Void,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "struct" => TokenKind::Struct,
            "cin" => TokenKind::Cin,
            "cout" => TokenKind::Cout,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "repeat" => TokenKind::Repeat,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident(ident),
        };

        Token { kind, loc }
    }

    /// Skip whitespace and comments.
    ///
    /// Horizontal whitespace is space and tab only; any other control
    /// character falls through to `next_token` and is reported as illegal.
    /// Comments run from `//` or `##` to the end of the line. A lone `#`
    /// is not a comment.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => self.skip_line_comment(),
                Some('#') if self.peek_ahead(1) == Some('#') => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    /// Skip a line comment up to (but not including) the newline.
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn illegal_char(loc: SourceLocation, ch: char, diag: &mut Diagnostics) {
    diag.fatal(
        loc.line,
        loc.column,
        &format!("illegal character ignored: {}", ch),
    );
}
