//! Hand-written lexer for BaiScript source text.
//!
//! Lexing and parsing are kept behind one boundary: downstream code never
//! reaches into this module directly, it only consumes [`crate::parser`]'s
//! output.

use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub line: u32,
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
}

/// Identifiers are bounded to 64 bytes, matching the fixed-size
/// `SymbolEntry.name` buffer they're eventually stored in.
pub const MAX_IDENTIFIER_LEN: usize = 64;

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let line = self.line;
            let c = match self.chars.peek() {
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        line,
                    });
                    break;
                }
                Some(&c) => c,
            };

            let kind = if c.is_ascii_digit() {
                self.lex_number()?
            } else if c == '_' || c.is_alphabetic() {
                self.lex_word()
            } else if c == '\'' {
                self.lex_char()?
            } else if c == '"' {
                self.lex_string()?
            } else {
                self.lex_operator()?
            };
            tokens.push(Token { kind, line });
        }
        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some('\n') => {
                    self.line += 1;
                    self.chars.next();
                }
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('/') => {
                    let mut clone = self.chars.clone();
                    clone.next();
                    if clone.peek() == Some(&'/') {
                        self.chars.next();
                        self.chars.next();
                        while let Some(&c) = self.chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.chars.next();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, LexError> {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s.parse::<i64>()
            .map(TokenKind::IntLiteral)
            .map_err(|_| LexError {
                message: format!("Invalid integer literal '{}'", s),
                line: self.line,
            })
    }

    fn lex_word(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_alphanumeric() {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match s.as_str() {
            "ENTEGER" => TokenKind::Enteger,
            "CHAROT" => TokenKind::Charot,
            "KUAN" => TokenKind::Kuan,
            "PRENT" => TokenKind::Prent,
            _ => {
                s.truncate(MAX_IDENTIFIER_LEN);
                TokenKind::Identifier(s)
            }
        }
    }

    fn lex_escape(&mut self) -> Result<char, LexError> {
        match self.chars.next() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some(other) => Ok(other),
            None => Err(LexError {
                message: "Unterminated escape sequence".to_string(),
                line: self.line,
            }),
        }
    }

    fn lex_char(&mut self) -> Result<TokenKind, LexError> {
        self.chars.next(); // opening quote
        let c = match self.chars.next() {
            Some('\\') => self.lex_escape()?,
            Some(c) => c,
            None => {
                return Err(LexError {
                    message: "Unterminated char literal".to_string(),
                    line: self.line,
                })
            }
        };
        match self.chars.next() {
            Some('\'') => Ok(TokenKind::CharLiteral(c as i64)),
            _ => Err(LexError {
                message: "Unterminated char literal".to_string(),
                line: self.line,
            }),
        }
    }

    fn lex_string(&mut self) -> Result<TokenKind, LexError> {
        self.chars.next(); // opening quote
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(TokenKind::StrLiteral(s)),
                Some('\\') => s.push(self.lex_escape()?),
                Some('\n') | None => {
                    return Err(LexError {
                        message: "Unterminated string literal".to_string(),
                        line: self.line,
                    })
                }
                Some(c) => s.push(c),
            }
        }
    }

    fn lex_operator(&mut self) -> Result<TokenKind, LexError> {
        let c = self.chars.next().unwrap();
        let kind = match c {
            '+' => match self.chars.peek() {
                Some('+') => {
                    self.chars.next();
                    TokenKind::PlusPlus
                }
                Some('=') => {
                    self.chars.next();
                    TokenKind::PlusAssign
                }
                _ => TokenKind::Plus,
            },
            '-' => match self.chars.peek() {
                Some('-') => {
                    self.chars.next();
                    TokenKind::MinusMinus
                }
                Some('=') => {
                    self.chars.next();
                    TokenKind::MinusAssign
                }
                _ => TokenKind::Minus,
            },
            '*' => match self.chars.peek() {
                Some('=') => {
                    self.chars.next();
                    TokenKind::StarAssign
                }
                _ => TokenKind::Star,
            },
            '/' => match self.chars.peek() {
                Some('=') => {
                    self.chars.next();
                    TokenKind::SlashAssign
                }
                _ => TokenKind::Slash,
            },
            '=' => TokenKind::Assign,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => {
                return Err(LexError {
                    message: format!("Unexpected character '{}'", other),
                    line: self.line,
                })
            }
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_declaration() {
        let k = kinds("ENTEGER a = 5;");
        assert_eq!(
            k,
            vec![
                TokenKind::Enteger,
                TokenKind::Identifier("a".to_string()),
                TokenKind::Assign,
                TokenKind::IntLiteral(5),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_postfix_and_prefix() {
        let k = kinds("i++ ++i --i i--");
        assert_eq!(
            k,
            vec![
                TokenKind::Identifier("i".to_string()),
                TokenKind::PlusPlus,
                TokenKind::PlusPlus,
                TokenKind::Identifier("i".to_string()),
                TokenKind::MinusMinus,
                TokenKind::Identifier("i".to_string()),
                TokenKind::Identifier("i".to_string()),
                TokenKind::MinusMinus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_char_escape() {
        let k = kinds("'\\n'");
        assert_eq!(k, vec![TokenKind::CharLiteral('\n' as i64), TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_literal() {
        let k = kinds("\"hello\"");
        assert_eq!(
            k,
            vec![TokenKind::StrLiteral("hello".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn rejects_unknown_character() {
        assert!(Lexer::new("@").tokenize().is_err());
    }

    #[test]
    fn truncates_long_identifiers() {
        let long_name = "x".repeat(100);
        let k = kinds(&long_name);
        match &k[0] {
            TokenKind::Identifier(s) => assert_eq!(s.len(), MAX_IDENTIFIER_LEN),
            _ => panic!("expected identifier"),
        }
    }
}
