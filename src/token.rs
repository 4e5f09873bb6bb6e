//! Lexical tokens produced by [`crate::lexer`].

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Enteger,
    Charot,
    Kuan,
    Prent,
    Identifier(String),
    IntLiteral(i64),
    CharLiteral(i64),
    StrLiteral(String),
    Plus,
    Minus,
    Star,
    Slash,
    PlusPlus,
    MinusMinus,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    Comma,
    Semicolon,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}
