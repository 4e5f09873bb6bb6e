//! Hand-rolled error enum, following the `vasm::Error` pattern
//! (`pest::error::Error<Rule>` plus one local variant) rather than pulling
//! in `thiserror`.

use std::fmt;

use crate::parser::Rule;

#[derive(Debug)]
pub enum Error {
    Parse(pest::error::Error<Rule>),
    UnknownMnemonic(String),
    BadOperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    BadOperandKind {
        mnemonic: String,
        detail: String,
    },
    UnknownLabel(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::UnknownMnemonic(m) => write!(f, "unknown mnemonic '{}'", m),
            Error::BadOperandCount { mnemonic, expected, found } => write!(
                f,
                "'{}' expects {} operand(s), found {}",
                mnemonic, expected, found
            ),
            Error::BadOperandKind { mnemonic, detail } => {
                write!(f, "'{}' has a malformed operand: {}", mnemonic, detail)
            }
            Error::UnknownLabel(l) => write!(f, "reference to undefined label '{}'", l),
        }
    }
}

impl std::error::Error for Error {}

impl From<pest::error::Error<Rule>> for Error {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Error::Parse(e)
    }
}
