//! Phase 1: text → token stream (spec §4.2).
//!
//! A hand-written scanner over raw bytes/chars. Specific patterns are tried
//! before general ones (docstrings before block comments, keywords before
//! identifiers) so that, e.g., `input_name` lexes as one identifier rather
//! than the keyword `input` followed by `_name`.

mod token;

pub use token::{Token, TokenKind};

use crate::position::{Position, Range};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Position),
    #[error("{0}: unterminated docstring")]
    UnterminatedDocstring(Position),
    #[error("{0}: unterminated block comment")]
    UnterminatedBlockComment(Position),
    #[error("{0}: unexpected character '{1}'")]
    UnexpectedChar(Position, char),
}

pub struct Lexer<'a> {
    filename: String,
    chars: Vec<char>,
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    byte_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(filename: impl Into<String>, src: &'a str) -> Self {
        Self {
            filename: filename.into(),
            chars: src.chars().collect(),
            src,
            pos: 0,
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_inline_whitespace();
            let start = self.here();
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Range::point(start)));
                break;
            };

            if c == '\r' {
                // Treated as inline whitespace (CRLF); consumed above but
                // guard in case it appears alone.
                self.advance();
                continue;
            }
            if c == '\n' {
                self.advance();
                tokens.push(Token::new(TokenKind::Newline, Range::new(start, self.here())));
                continue;
            }
            if c == '"' && self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') {
                tokens.push(self.read_docstring(start)?);
                continue;
            }
            if c == '/' && self.peek_at(1) == Some('/') {
                tokens.push(self.read_line_comment(start));
                continue;
            }
            if c == '/' && self.peek_at(1) == Some('*') {
                tokens.push(self.read_block_comment(start)?);
                continue;
            }
            if c == '"' {
                tokens.push(self.read_string(start)?);
                continue;
            }
            if c == '.' && self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') {
                self.advance();
                self.advance();
                self.advance();
                tokens.push(Token::new(TokenKind::Spread, Range::new(start, self.here())));
                continue;
            }
            if c.is_ascii_digit() {
                tokens.push(self.read_number(start));
                continue;
            }
            if is_ident_start(c) {
                tokens.push(self.read_word(start));
                continue;
            }
            if let Some(kind) = single_char_token(c) {
                self.advance();
                tokens.push(Token::new(kind, Range::new(start, self.here())));
                continue;
            }

            return Err(LexError::UnexpectedChar(start, c));
        }
        Ok(tokens)
    }

    fn here(&self) -> Position {
        Position::new(self.filename.clone(), self.line, self.column, self.byte_offset)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.byte_offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
    }

    fn read_word(&mut self, start: Position) -> Token {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = TokenKind::keyword_from_word(&word).unwrap_or(TokenKind::Identifier(word));
        Token::new(kind, Range::new(start, self.here()))
    }

    fn read_number(&mut self, start: Position) -> Token {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            digits.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            let value: f64 = digits.parse().unwrap_or(0.0);
            return Token::new(TokenKind::FloatLiteral(value), Range::new(start, self.here()));
        }
        let value: i64 = digits.parse().unwrap_or(0);
        Token::new(TokenKind::IntLiteral(value), Range::new(start, self.here()))
    }

    fn read_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexError::UnterminatedString(start)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"') => {
                            s.push('"');
                            self.advance();
                        }
                        Some('\\') => {
                            s.push('\\');
                            self.advance();
                        }
                        Some('n') => {
                            s.push('\n');
                            self.advance();
                        }
                        Some(other) => {
                            s.push(other);
                            self.advance();
                        }
                        None => return Err(LexError::UnterminatedString(start)),
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::StringLiteral(s), Range::new(start, self.here())))
    }

    fn read_docstring(&mut self, start: Position) -> Result<Token, LexError> {
        self.advance();
        self.advance();
        self.advance();
        let mut content = String::new();
        loop {
            if self.peek() == Some('"') && self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') {
                self.advance();
                self.advance();
                self.advance();
                break;
            }
            match self.advance() {
                Some(c) => content.push(c),
                None => return Err(LexError::UnterminatedDocstring(start)),
            }
        }
        Ok(Token::new(TokenKind::Docstring(content), Range::new(start, self.here())))
    }

    fn read_line_comment(&mut self, start: Position) -> Token {
        self.advance();
        self.advance();
        let mut content = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            content.push(c);
            self.advance();
        }
        Token::new(TokenKind::LineComment(content.trim().to_string()), Range::new(start, self.here()))
    }

    fn read_block_comment(&mut self, start: Position) -> Result<Token, LexError> {
        self.advance();
        self.advance();
        let mut content = String::new();
        loop {
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            match self.advance() {
                Some(c) => content.push(c),
                None => return Err(LexError::UnterminatedBlockComment(start)),
            }
        }
        Ok(Token::new(TokenKind::BlockComment(content.trim().to_string()), Range::new(start, self.here())))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn single_char_token(c: char) -> Option<TokenKind> {
    Some(match c {
        '@' => TokenKind::At,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '?' => TokenKind::Question,
        '=' => TokenKind::Equals,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        _ => return None,
    })
}

/// Tokenize `src`, attributing positions to `filename`.
pub fn tokenize(filename: impl Into<String>, src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(filename, src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize("t.vdl", src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_take_priority_over_identifiers() {
        assert_eq!(kinds("input"), vec![TokenKind::Input, TokenKind::Eof]);
        assert_eq!(
            kinds("input_name"),
            vec![TokenKind::Identifier("input_name".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn spread_is_lexed_before_dot_sequences() {
        assert_eq!(kinds("...Base"), vec![TokenKind::Spread, TokenKind::Identifier("Base".into()), TokenKind::Eof]);
    }

    #[test]
    fn string_literal_handles_escapes() {
        let toks = kinds(r#""a\"b\\c""#);
        assert_eq!(toks, vec![TokenKind::StringLiteral("a\"b\\c".into()), TokenKind::Eof]);
    }

    #[test]
    fn docstring_may_contain_single_quotes() {
        let toks = kinds(r#"""" it's a "quoted" word """"#);
        match &toks[0] {
            TokenKind::Docstring(s) => assert!(s.contains("it's") && s.contains("\"quoted\"")),
            other => panic!("expected docstring, got {other:?}"),
        }
    }

    #[test]
    fn line_and_block_comments() {
        assert_eq!(
            kinds("// hi\n/* bye */"),
            vec![
                TokenKind::LineComment("hi".into()),
                TokenKind::Newline,
                TokenKind::BlockComment("bye".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn float_vs_int() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral(3.14), TokenKind::Eof]);
        assert_eq!(kinds("42"), vec![TokenKind::IntLiteral(42), TokenKind::Eof]);
    }

    #[test]
    fn positions_are_non_decreasing() {
        let toks = tokenize("t.vdl", "type User {\n  id string\n}\n").unwrap();
        let mut last = 0usize;
        for t in &toks {
            assert!(t.range.start.byte_offset >= last);
            last = t.range.start.byte_offset;
        }
    }

    #[test]
    fn unterminated_string_errors() {
        let err = tokenize("t.vdl", "\"unterminated").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString(_)));
    }
}
