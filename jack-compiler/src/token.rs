//! Lexer: one-character (two for `/*`-vs-`//` disambiguation) lookahead over
//! the source text, emitting the five Jack token kinds.

use crate::error::JackError;
use phf::{phf_set, Set};
use std::iter::Peekable;
use std::str::Chars;

static KEYWORDS: Set<&'static str> = phf_set! {
    "class", "constructor", "function", "method", "field", "static", "var",
    "int", "char", "boolean", "void", "true", "false", "null", "this",
    "let", "do", "if", "else", "while", "return",
};

static SYMBOLS: Set<char> = phf_set! {
    '{', '}', '(', ')', '[', ']', '.', ',', ';',
    '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(String),
    Symbol(char),
    IntConst(u16),
    StrConst(String),
    Identifier(String),
}

impl Token {
    /// Human-readable description for error messages, e.g. `"'}'"` or `"identifier"`.
    pub fn describe(&self) -> String {
        match self {
            Token::Keyword(k) => format!("'{k}'"),
            Token::Symbol(c) => format!("'{c}'"),
            Token::IntConst(n) => format!("integer constant {n}"),
            Token::StrConst(s) => format!("string constant \"{s}\""),
            Token::Identifier(id) => format!("identifier '{id}'"),
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), JackError> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            while !matches!(self.chars.peek(), Some('\n') | None) {
                                self.bump();
                            }
                        }
                        Some('*') => {
                            self.bump();
                            self.bump();
                            loop {
                                match self.bump() {
                                    None => {
                                        return Err(JackError::UnexpectedEof {
                                            expected: "*/".to_string(),
                                        })
                                    }
                                    Some('*') if self.chars.peek() == Some(&'/') => {
                                        self.bump();
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, JackError> {
        self.skip_whitespace_and_comments()?;

        let Some(&first) = self.chars.peek() else {
            return Ok(None);
        };

        if first == '"' {
            return self.read_string().map(Some);
        }
        if first.is_ascii_digit() {
            return self.read_integer().map(Some);
        }
        if SYMBOLS.contains(&first) {
            self.bump();
            return Ok(Some(Token::Symbol(first)));
        }
        if is_identifier_start(first) {
            return Ok(Some(self.read_word()));
        }

        Err(JackError::IllegalCharacter {
            ch: first,
            line: self.line,
        })
    }

    fn read_string(&mut self) -> Result<Token, JackError> {
        let start_line = self.line;
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::StrConst(value)),
                Some('\n') | None => {
                    return Err(JackError::UnterminatedString { line: start_line })
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn read_integer(&mut self) -> Result<Token, JackError> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let value: u32 = digits.parse().expect("digit run parses as u32");
        if value > u16::MAX as u32 {
            return Err(JackError::IllegalCharacter {
                ch: digits.chars().next().unwrap_or('0'),
                line: self.line,
            });
        }
        Ok(Token::IntConst(value as u16))
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if is_identifier_continue(c) {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if KEYWORDS.contains(word.as_str()) {
            Token::Keyword(word)
        } else {
            Token::Identifier(word)
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
