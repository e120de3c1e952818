use crate::tokens::{Kind, Token};

use thiserror::Error;

/// Problems found while turning source text into tokens. Scanning carries on past each one.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character: {character}")]
    InvalidCharacter { character: char, line: usize },

    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
}

/// Syntax errors. The parser records these and synchronises instead of stopping.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParsingError {
    #[error("[line {line}] Error at '{lexeme}': {message}")]
    UnexpectedToken {
        message: String,
        lexeme: String,
        line: usize,
    },

    #[error("[line {line}] Error at end: {message}")]
    UnexpectedEOF { message: String, line: usize },
}

impl ParsingError {
    /// Build the right variant for an error reported at `token`.
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        let message = message.into();

        match token.kind {
            Kind::Eof => Self::UnexpectedEOF {
                message,
                line: token.line,
            },
            _ => Self::UnexpectedToken {
                message,
                lexeme: token.lexeme.clone(),
                line: token.line,
            },
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. } | Self::UnexpectedEOF { line, .. } => *line,
        }
    }
}

/// Anything that stops a program before it runs.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StaticError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Parse(#[from] ParsingError),
}

/// Errors raised while evaluating. The first one aborts the whole run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },

    #[error("Operand must be a number.")]
    NumberOperand { line: usize },

    #[error("Operands must be numbers.")]
    NumberOperands { line: usize },

    #[error("Operands must be two numbers or two strings.")]
    AddOperands { line: usize },

    #[error("Division by zero.")]
    ZeroDivision { line: usize },

    #[error("Can only call functions and classes.")]
    NotCallable { line: usize },

    #[error("Expected {expected} arguments but got {received}.")]
    ArityMismatch {
        expected: usize,
        received: usize,
        line: usize,
    },

    #[error("Stack overflow.")]
    StackOverflow { line: usize },

    #[error("{message}")]
    Native { message: String, line: usize },

    #[error("{feature} not supported.")]
    Unsupported { feature: &'static str, line: usize },

    #[error("Could not write output: {message}")]
    Output { message: String, line: usize },
}

impl RuntimeError {
    /// Source line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::NumberOperand { line }
            | Self::NumberOperands { line }
            | Self::AddOperands { line }
            | Self::ZeroDivision { line }
            | Self::NotCallable { line }
            | Self::ArityMismatch { line, .. }
            | Self::StackOverflow { line }
            | Self::Native { line, .. }
            | Self::Unsupported { line, .. }
            | Self::Output { line, .. } => *line,
        }
    }

    /// Message followed by the line, the way the command line reports it.
    pub fn report(&self) -> String {
        format!("{}\n[line {}]", self, self.line())
    }
}
