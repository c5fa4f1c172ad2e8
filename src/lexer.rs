//! Handwritten lexer for Basalt

use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Newline,
    OpenParen,  // (
    CloseParen, // )
    Comma,      // ,
    Equals,     // =
    Integer,
    Symbol,

    // Keywords
    KwLambda,
    KwDo,
    KwEnd,
}

/// A token with its source text and 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{0}' on line {1}")]
    UnexpectedChar(char, usize),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    /// Tokenize the entire source, producing a flat token sequence.
    ///
    /// Newlines are significant (they delimit statements) and appear as
    /// tokens; all other whitespace is skipped. A `#` starts a comment
    /// running to the end of the line.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => {
                    tokens.push(Token::new(TokenKind::Newline, "\n", self.line));
                    self.chars.next();
                    self.line += 1;
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '(' => tokens.push(self.single(TokenKind::OpenParen, "(")),
                ')' => tokens.push(self.single(TokenKind::CloseParen, ")")),
                ',' => tokens.push(self.single(TokenKind::Comma, ",")),
                '=' => tokens.push(self.single(TokenKind::Equals, "=")),
                c if c.is_ascii_digit() => {
                    let lexeme = self.take_while(|c| c.is_ascii_digit());
                    tokens.push(Token::new(TokenKind::Integer, lexeme, self.line));
                }
                c if c.is_ascii_lowercase() || c == '_' => {
                    let lexeme = self
                        .take_while(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
                    let kind = match lexeme.as_str() {
                        "lambda" => TokenKind::KwLambda,
                        "do" => TokenKind::KwDo,
                        "end" => TokenKind::KwEnd,
                        _ => TokenKind::Symbol,
                    };
                    tokens.push(Token::new(kind, lexeme, self.line));
                }
                c => return Err(LexError::UnexpectedChar(c, self.line)),
            }
        }

        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str) -> Token {
        self.chars.next();
        Token::new(kind, lexeme, self.line)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut lexeme = String::new();
        while let Some(&c) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            lexeme.push(c);
            self.chars.next();
        }
        lexeme
    }
}
