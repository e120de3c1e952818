use crate::errors::ScanError;
use crate::tokens::{Kind, Token};

use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;

/// Scan a whole source string. The returned stream always ends with an `Eof` token, even when
/// errors were found, so the parser can keep reporting problems in the same pass.
pub fn scan_tokens(source: &str) -> (Vec<Token>, Vec<ScanError>) {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for result in &mut scanner {
        match result {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(error),
        }
    }

    tokens.push(Token::eof(scanner.line));
    debug!(tokens = tokens.len(), errors = errors.len(), "scanned source");

    (tokens, errors)
}

pub struct Scanner<'a> {
    line: usize,
    string: String,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Remove whitespace and comments before any potential tokens.
        self.discard();

        // Ensure there are tokens to be scanned.
        self.chars.peek()?;

        let kind = match self.consume() {
            // Single character tokens.
            '(' => Kind::LeftParen,
            ')' => Kind::RightParen,
            '{' => Kind::LeftBrace,
            '}' => Kind::RightBrace,

            ';' => Kind::SemiColon,
            ',' => Kind::Comma,
            '.' => Kind::Dot,

            '+' => Kind::Plus,
            '-' => Kind::Minus,
            '*' => Kind::Star,
            '/' => Kind::Slash,

            // Single or double character tokens.
            '!' => self.match_next('=', Kind::BangEq, Kind::Bang),
            '=' => self.match_next('=', Kind::DoubleEq, Kind::Eq),
            '<' => self.match_next('=', Kind::LessEq, Kind::Less),
            '>' => self.match_next('=', Kind::GreaterEq, Kind::Greater),

            // Literals.
            '"' => match self.consume_string() {
                Some(kind) => kind,
                None => {
                    self.string.clear();
                    return Some(Err(ScanError::UnterminatedString { line: self.line }));
                }
            },
            '0'..='9' => self.consume_number(),
            'a'..='z' | 'A'..='Z' | '_' => self.consume_identifier(),

            character => {
                self.string.clear();
                return Some(Err(ScanError::InvalidCharacter {
                    character,
                    line: self.line,
                }));
            }
        };

        let token = Token::new(kind, self.string.as_str(), self.line);

        // Clear current string for next token.
        self.string.clear();

        Some(Ok(token))
    }
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            string: String::new(),
            chars: source.chars().peekable(),
        }
    }

    /// Consumes the next character in the source, recording it in the current lexeme.
    /// Callers peek first, so running out here only happens at end of input.
    fn consume(&mut self) -> char {
        let ch = self.chars.next().unwrap_or('\0');
        if ch == '\n' {
            self.line += 1;
        }

        self.string.push(ch);
        ch
    }

    /// Consume a string literal. `None` when the closing quote never arrives.
    fn consume_string(&mut self) -> Option<Kind> {
        while self.chars.peek().is_some() && self.chars.peek() != Some(&'"') {
            self.consume();
        }

        self.chars.peek()?;

        self.consume(); // Capture closing quote.
        Some(Kind::String(
            self.string[1..self.string.len() - 1].to_string(), // Remove surrounding quotes.
        ))
    }

    /// Consume a number literal.
    fn consume_number(&mut self) -> Kind {
        // Consume integer portion of number.
        while is_digit(self.chars.peek().copied()) {
            self.consume();
        }

        // Consume fractional portion of number (if it exists).
        if self.chars.peek().copied() == Some('.') && is_digit(self.peek_nth(1)) {
            self.consume();
            self.consume();

            while is_digit(self.chars.peek().copied()) {
                self.consume();
            }
        }

        // The lexeme is only ever ASCII digits with an optional fraction.
        Kind::Number(self.string.parse().unwrap_or_default())
    }

    /// Consume an identifier. Match against keywords.
    fn consume_identifier(&mut self) -> Kind {
        while is_ident_char(self.chars.peek().copied()) {
            self.consume();
        }

        Kind::keyword(&self.string).unwrap_or_else(|| Kind::Identifier(self.string.clone()))
    }

    /// Peek 'n' number of characters ahead of the current character.
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    /// Match against the next character in the source. Consume upon match and return appropriate Kind.
    fn match_next(&mut self, ch: char, k1: Kind, k2: Kind) -> Kind {
        if Some(&ch) == self.chars.peek() {
            self.consume();
            k1
        } else {
            k2
        }
    }

    /// Consume (and discard) any whitespace characters.
    fn discard(&mut self) {
        while let Some(ch) = self.peek_nth(0) {
            match ch {
                '\n' => {
                    self.chars.next();
                    self.line += 1;
                }

                ' ' | '\t' | '\r' => {
                    self.chars.next();
                }

                // Comments. Discard characters until end of the line or end of file.
                '/' if self.peek_nth(1) == Some('/') => {
                    while self.chars.peek().is_some() && self.chars.peek() != Some(&'\n') {
                        self.chars.next();
                    }
                }

                _ => break,
            }
        }
    }
}

fn is_digit(ch: Option<char>) -> bool {
    matches!(ch, Some('0'..='9'))
}

fn is_ident_char(ch: Option<char>) -> bool {
    matches!(ch, Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_'))
}
