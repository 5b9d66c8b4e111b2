//! Token vocabulary (spec §4.2).

use crate::position::Range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    Include,
    Const,
    Enum,
    Type,
    Pattern,
    Rpc,
    Proc,
    Stream,
    Input,
    Output,
    Deprecated,
    Map,
    KwString,
    KwInt,
    KwFloat,
    KwBool,
    KwDatetime,
    True,
    False,

    // Literals
    Identifier(String),
    StringLiteral(String),
    IntLiteral(i64),
    FloatLiteral(f64),
    Docstring(String),

    // Trivia kept in the stream so the parser/formatter can re-attach them
    LineComment(String),
    BlockComment(String),

    // Operators and delimiters
    Spread,
    Newline,
    At,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Question,
    Equals,
    Lt,
    Gt,

    Eof,
}

impl TokenKind {
    /// True for the keyword set, used by the lexer's "word-boundary" rule:
    /// an identifier like `input_name` must not be lexed as `Input` followed
    /// by `_name`.
    pub fn keyword_from_word(word: &str) -> Option<TokenKind> {
        Some(match word {
            "include" => TokenKind::Include,
            "const" => TokenKind::Const,
            "enum" => TokenKind::Enum,
            "type" => TokenKind::Type,
            "pattern" => TokenKind::Pattern,
            "rpc" => TokenKind::Rpc,
            "proc" => TokenKind::Proc,
            "stream" => TokenKind::Stream,
            "input" => TokenKind::Input,
            "output" => TokenKind::Output,
            "deprecated" => TokenKind::Deprecated,
            "map" => TokenKind::Map,
            "string" => TokenKind::KwString,
            "int" => TokenKind::KwInt,
            "float" => TokenKind::KwFloat,
            "bool" => TokenKind::KwBool,
            "datetime" => TokenKind::KwDatetime,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

impl Token {
    pub fn new(kind: TokenKind, range: Range) -> Self {
        Self { kind, range }
    }
}
