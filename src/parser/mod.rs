//! Phase 2: token stream → positioned AST (spec §4.3).
//!
//! Lookahead up to five tokens distinguishes a standalone docstring (one
//! immediately followed by a blank line) from a docstring attached to the
//! next declaration. Everything else is a fairly ordinary recursive-descent
//! grammar over the token stream produced by [`crate::lexer`].

mod cursor;
mod error;

pub use error::ParseError;

use crate::ast::*;
use crate::lexer::{self, TokenKind};
use crate::position::Range;
use cursor::Cursor;

/// Parse one file's worth of VDL source into a [`Schema`].
///
/// On the first structural error, parsing stops and a single [`ParseError`]
/// is returned; the caller (the Resolver) turns that into an `E005`
/// diagnostic and continues with whatever other files in the include graph
/// parsed successfully.
pub fn parse(filename: &str, src: &str) -> Result<Schema, ParseError> {
    let tokens = lexer::tokenize(filename, src)
        .map_err(|e| ParseError::new(lex_error_range(filename, &e), e.to_string()))?;
    let mut cursor = Cursor::new(tokens);
    let mut items = Vec::new();

    cursor.skip_newlines();
    let mut pending_inline = false;
    while !cursor.is_eof() {
        let mut item = parse_schema_item(&mut cursor)?;
        if pending_inline {
            if let SchemaItem::Comment(comment) = &mut item {
                comment.inline = true;
            }
        }
        items.push(item);
        pending_inline = cursor.skip_newlines() == 0;
    }

    Ok(Schema { items })
}

fn lex_error_range(filename: &str, e: &lexer::LexError) -> Range {
    let pos = match e {
        lexer::LexError::UnterminatedString(p)
        | lexer::LexError::UnterminatedDocstring(p)
        | lexer::LexError::UnterminatedBlockComment(p)
        | lexer::LexError::UnexpectedChar(p, _) => p.clone(),
    };
    let _ = filename;
    Range::point(pos)
}

/// Leading trivia collected before a declaration keyword: an optional
/// docstring and an optional `deprecated`/`deprecated("msg")` marker, each
/// on its own line.
struct LeadingTrivia {
    docstring: Option<Docstring>,
    deprecated: Option<Deprecated>,
}

fn parse_schema_item(c: &mut Cursor) -> Result<SchemaItem, ParseError> {
    match c.peek().clone() {
        TokenKind::Include => Ok(SchemaItem::Include(parse_include(c)?)),
        TokenKind::LineComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(SchemaItem::Comment(Comment { range, text, block: false, inline: false }))
        }
        TokenKind::BlockComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(SchemaItem::Comment(Comment { range, text, block: true, inline: false }))
        }
        TokenKind::Docstring(_) if standalone_docstring_follows(c) => {
            Ok(SchemaItem::Docstring(parse_docstring(c)?))
        }
        _ => {
            let trivia = parse_leading_trivia(c)?;
            match c.peek().clone() {
                TokenKind::Type => Ok(SchemaItem::Type(parse_type(c, trivia)?)),
                TokenKind::Enum => Ok(SchemaItem::Enum(parse_enum(c, trivia)?)),
                TokenKind::Const => Ok(SchemaItem::Const(parse_const(c, trivia)?)),
                TokenKind::Pattern => Ok(SchemaItem::Pattern(parse_pattern(c, trivia)?)),
                TokenKind::Rpc => Ok(SchemaItem::Rpc(parse_rpc(c, trivia)?)),
                other => Err(ParseError::new(
                    c.current_range(),
                    format!("expected a top-level declaration, found {other:?}"),
                )),
            }
        }
    }
}

/// True when the docstring at the cursor is immediately followed by a blank
/// line (spec §4.3 rule 1): it is a standalone docstring, not attached to
/// whatever declaration follows.
fn standalone_docstring_follows(c: &Cursor) -> bool {
    // peek(0) is the Docstring token itself; the blank-run check looks one
    // token further out than `at_blank_run`'s usual call site.
    matches!(c.peek_at(1), TokenKind::Newline) && matches!(c.peek_at(2), TokenKind::Newline)
}

fn parse_docstring(c: &mut Cursor) -> Result<Docstring, ParseError> {
    let range = c.current_range();
    let raw = match c.bump().kind {
        TokenKind::Docstring(s) => s,
        other => return Err(ParseError::new(range, format!("expected docstring, found {other:?}"))),
    };
    let trimmed = raw.trim();
    let external_path = if !trimmed.is_empty() && !trimmed.contains(char::is_whitespace) && trimmed.ends_with(".md")
    {
        Some(trimmed.to_string())
    } else {
        None
    };
    Ok(Docstring {
        range,
        resolved: raw.clone(),
        raw,
        external_path,
    })
}

fn parse_leading_trivia(c: &mut Cursor) -> Result<LeadingTrivia, ParseError> {
    let mut docstring = None;
    let mut deprecated = None;

    if matches!(c.peek(), TokenKind::Docstring(_)) {
        docstring = Some(parse_docstring(c)?);
        c.skip_newlines();
    }
    if matches!(c.peek(), TokenKind::Deprecated) {
        let range = c.current_range();
        c.bump();
        let message = if matches!(c.peek(), TokenKind::LParen) {
            c.bump();
            let msg = match c.bump().kind {
                TokenKind::StringLiteral(s) => s,
                other => {
                    return Err(ParseError::new(
                        c.current_range(),
                        format!("expected string literal in deprecated(...), found {other:?}"),
                    ))
                }
            };
            expect(c, TokenKind::RParen)?;
            Some(msg)
        } else {
            None
        };
        deprecated = Some(Deprecated { range, message });
        c.skip_newlines();
    }
    Ok(LeadingTrivia { docstring, deprecated })
}

fn parse_include(c: &mut Cursor) -> Result<Include, ParseError> {
    let range = c.current_range();
    c.bump();
    let path = expect_string(c)?;
    Ok(Include { range, path })
}

fn expect(c: &mut Cursor, kind: TokenKind) -> Result<Range, ParseError> {
    if std::mem::discriminant(c.peek()) == std::mem::discriminant(&kind) {
        let range = c.current_range();
        c.bump();
        Ok(range)
    } else {
        Err(ParseError::new(
            c.current_range(),
            format!("expected {kind:?}, found {:?}", c.peek()),
        ))
    }
}

fn expect_string(c: &mut Cursor) -> Result<String, ParseError> {
    let range = c.current_range();
    match c.bump().kind {
        TokenKind::StringLiteral(s) => Ok(s),
        other => Err(ParseError::new(range, format!("expected string literal, found {other:?}"))),
    }
}

fn expect_identifier(c: &mut Cursor) -> Result<String, ParseError> {
    let range = c.current_range();
    match c.bump().kind {
        TokenKind::Identifier(s) => Ok(s),
        other => Err(ParseError::new(range, format!("expected identifier, found {other:?}"))),
    }
}

fn parse_type(c: &mut Cursor, trivia: LeadingTrivia) -> Result<TypeDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `type`
    let name = expect_identifier(c)?;
    let children = parse_type_body(c)?;
    Ok(TypeDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        children,
    })
}

fn parse_type_body(c: &mut Cursor) -> Result<Vec<TypeChild>, ParseError> {
    expect(c, TokenKind::LBrace)?;
    c.skip_newlines();
    let mut children = Vec::new();
    let mut pending_inline = false;
    while !matches!(c.peek(), TokenKind::RBrace) {
        let mut child = parse_type_child(c)?;
        if pending_inline {
            if let TypeChild::Comment(comment) = &mut child {
                comment.inline = true;
            }
        }
        children.push(child);
        pending_inline = c.skip_newlines() == 0;
    }
    c.bump(); // `}`
    Ok(children)
}

fn parse_type_child(c: &mut Cursor) -> Result<TypeChild, ParseError> {
    match c.peek().clone() {
        TokenKind::LineComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(TypeChild::Comment(Comment { range, text, block: false, inline: false }))
        }
        TokenKind::BlockComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(TypeChild::Comment(Comment { range, text, block: true, inline: false }))
        }
        TokenKind::Spread => {
            let range = c.current_range();
            c.bump();
            let type_name = expect_identifier(c)?;
            Ok(TypeChild::Spread(Spread { range, type_name }))
        }
        TokenKind::Docstring(_) if standalone_docstring_follows(c) => {
            // Section markers: a standalone docstring inside a type body is
            // kept as a comment-like marker so formatting can re-emit the
            // blank-line-delimited section.
            let d = parse_docstring(c)?;
            Ok(TypeChild::Comment(Comment {
                range: d.range,
                text: d.resolved,
                block: false,
                inline: false,
            }))
        }
        _ => parse_field(c).map(TypeChild::Field),
    }
}

fn parse_field(c: &mut Cursor) -> Result<Field, ParseError> {
    let docstring = if matches!(c.peek(), TokenKind::Docstring(_)) {
        let d = parse_docstring(c)?;
        c.skip_newlines();
        Some(d)
    } else {
        None
    };
    let range = c.current_range();
    let name = expect_identifier(c)?;
    let optional = if matches!(c.peek(), TokenKind::Question) {
        c.bump();
        true
    } else {
        false
    };
    let field_type = parse_field_type(c)?;
    Ok(Field {
        range,
        docstring,
        name,
        optional,
        field_type,
    })
}

fn parse_field_type(c: &mut Cursor) -> Result<FieldType, ParseError> {
    let base = parse_field_type_base(c)?;
    let mut array_dims = 0;
    while matches!(c.peek(), TokenKind::LBracket) {
        c.bump();
        expect(c, TokenKind::RBracket)?;
        array_dims += 1;
    }
    Ok(FieldType { base, array_dims })
}

fn parse_field_type_base(c: &mut Cursor) -> Result<FieldTypeBase, ParseError> {
    match c.peek().clone() {
        TokenKind::Map => {
            c.bump();
            expect(c, TokenKind::Lt)?;
            let value = parse_field_type(c)?;
            expect(c, TokenKind::Gt)?;
            Ok(FieldTypeBase::Map(Box::new(value)))
        }
        TokenKind::LBrace => {
            let children = parse_type_body(c)?;
            Ok(FieldTypeBase::Object(children))
        }
        TokenKind::KwString => {
            c.bump();
            Ok(FieldTypeBase::Named("string".into()))
        }
        TokenKind::KwInt => {
            c.bump();
            Ok(FieldTypeBase::Named("int".into()))
        }
        TokenKind::KwFloat => {
            c.bump();
            Ok(FieldTypeBase::Named("float".into()))
        }
        TokenKind::KwBool => {
            c.bump();
            Ok(FieldTypeBase::Named("bool".into()))
        }
        TokenKind::KwDatetime => {
            c.bump();
            Ok(FieldTypeBase::Named("datetime".into()))
        }
        TokenKind::Identifier(name) => {
            c.bump();
            Ok(FieldTypeBase::Named(name))
        }
        other => Err(ParseError::new(c.current_range(), format!("expected a field type, found {other:?}"))),
    }
}

fn parse_enum(c: &mut Cursor, trivia: LeadingTrivia) -> Result<EnumDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `enum`
    let name = expect_identifier(c)?;
    expect(c, TokenKind::LBrace)?;
    c.skip_newlines();
    let mut members = Vec::new();
    while !matches!(c.peek(), TokenKind::RBrace) {
        members.push(parse_enum_member(c)?);
        c.skip_newlines();
    }
    c.bump();
    Ok(EnumDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        members,
    })
}

fn parse_enum_member(c: &mut Cursor) -> Result<EnumMember, ParseError> {
    let docstring = if matches!(c.peek(), TokenKind::Docstring(_)) {
        let d = parse_docstring(c)?;
        c.skip_newlines();
        Some(d)
    } else {
        None
    };
    let range = c.current_range();
    let name = expect_identifier(c)?;
    let value = if matches!(c.peek(), TokenKind::Equals) {
        c.bump();
        Some(parse_literal(c)?)
    } else {
        None
    };
    Ok(EnumMember { range, docstring, name, value })
}

fn parse_literal(c: &mut Cursor) -> Result<Literal, ParseError> {
    let range = c.current_range();
    match c.bump().kind {
        TokenKind::StringLiteral(s) => Ok(Literal::Str(s)),
        TokenKind::IntLiteral(i) => Ok(Literal::Int(i)),
        TokenKind::FloatLiteral(f) => Ok(Literal::Float(f)),
        TokenKind::True => Ok(Literal::Bool(true)),
        TokenKind::False => Ok(Literal::Bool(false)),
        other => Err(ParseError::new(range, format!("expected a literal value, found {other:?}"))),
    }
}

fn parse_const(c: &mut Cursor, trivia: LeadingTrivia) -> Result<ConstDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `const`
    let name = expect_identifier(c)?;
    expect(c, TokenKind::Equals)?;
    let value = parse_literal(c)?;
    Ok(ConstDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        value,
    })
}

fn parse_pattern(c: &mut Cursor, trivia: LeadingTrivia) -> Result<PatternDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `pattern`
    let name = expect_identifier(c)?;
    expect(c, TokenKind::Equals)?;
    let template = expect_string(c)?;
    Ok(PatternDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        template,
    })
}

fn parse_rpc(c: &mut Cursor, trivia: LeadingTrivia) -> Result<RpcDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `rpc`
    let name = expect_identifier(c)?;
    expect(c, TokenKind::LBrace)?;
    c.skip_newlines();
    let mut children = Vec::new();
    let mut pending_inline = false;
    while !matches!(c.peek(), TokenKind::RBrace) {
        let mut child = parse_rpc_child(c)?;
        if pending_inline {
            if let RpcChild::Comment(comment) = &mut child {
                comment.inline = true;
            }
        }
        children.push(child);
        pending_inline = c.skip_newlines() == 0;
    }
    c.bump();
    Ok(RpcDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        children,
    })
}

fn parse_rpc_child(c: &mut Cursor) -> Result<RpcChild, ParseError> {
    match c.peek().clone() {
        TokenKind::LineComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(RpcChild::Comment(Comment { range, text, block: false, inline: false }))
        }
        TokenKind::BlockComment(text) => {
            let range = c.current_range();
            c.bump();
            Ok(RpcChild::Comment(Comment { range, text, block: true, inline: false }))
        }
        TokenKind::Docstring(_) if standalone_docstring_follows(c) => {
            Ok(RpcChild::Docstring(parse_docstring(c)?))
        }
        _ => {
            let trivia = parse_leading_trivia(c)?;
            match c.peek().clone() {
                TokenKind::Proc => Ok(RpcChild::Proc(parse_proc(c, trivia)?)),
                TokenKind::Stream => Ok(RpcChild::Stream(parse_stream(c, trivia)?)),
                other => Err(ParseError::new(
                    c.current_range(),
                    format!("expected `proc` or `stream`, found {other:?}"),
                )),
            }
        }
    }
}

fn parse_proc(c: &mut Cursor, trivia: LeadingTrivia) -> Result<ProcDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `proc`
    let name = expect_identifier(c)?;
    let (input, output) = parse_proc_body(c)?;
    Ok(ProcDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        input,
        output,
    })
}

fn parse_stream(c: &mut Cursor, trivia: LeadingTrivia) -> Result<StreamDecl, ParseError> {
    let range = c.current_range();
    c.bump(); // `stream`
    let name = expect_identifier(c)?;
    let (input, output) = parse_proc_body(c)?;
    Ok(StreamDecl {
        range,
        docstring: trivia.docstring,
        deprecated: trivia.deprecated,
        name,
        input,
        output,
    })
}

/// Shared `proc`/`stream` body. The grammar tolerates any number of
/// `input { ... }` / `output { ... }` blocks; "at most one of each" is a
/// semantic rule enforced later by the analyzer (E701/E702, spec §4.5), not
/// a syntax rule, so every block encountered is kept.
fn parse_proc_body(c: &mut Cursor) -> Result<(Vec<Block>, Vec<Block>), ParseError> {
    expect(c, TokenKind::LBrace)?;
    c.skip_newlines();
    let mut input = Vec::new();
    let mut output = Vec::new();
    while !matches!(c.peek(), TokenKind::RBrace) {
        match c.peek().clone() {
            TokenKind::Input => {
                let range = c.current_range();
                c.bump();
                let children = parse_type_body(c)?;
                input.push(Block { range, children });
            }
            TokenKind::Output => {
                let range = c.current_range();
                c.bump();
                let children = parse_type_body(c)?;
                output.push(Block { range, children });
            }
            other => {
                return Err(ParseError::new(
                    c.current_range(),
                    format!("expected `input` or `output`, found {other:?}"),
                ))
            }
        }
        c.skip_newlines();
    }
    c.bump();
    Ok((input, output))
}
