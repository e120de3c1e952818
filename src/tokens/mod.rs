use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: Kind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: Kind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// End of stream marker. Its lexeme is empty.
    pub fn eof(line: usize) -> Self {
        Self::new(Kind::Eof, "", line)
    }

    /// Name carried by an identifier token, or its lexeme for anything else.
    pub fn name(&self) -> &str {
        match &self.kind {
            Kind::Identifier(name) => name,
            _ => &self.lexeme,
        }
    }
}

/// Diagnostic dump form used by the `tokenize` command: `KIND lexeme literal`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            Kind::String(s) => write!(f, "STRING {} {}", self.lexeme, s),
            Kind::Number(n) if n.fract() == 0.0 => {
                write!(f, "NUMBER {} {:.1}", self.lexeme, n)
            }
            Kind::Number(n) => write!(f, "NUMBER {} {}", self.lexeme, n),
            kind => write!(f, "{} {} null", kind.name(), self.lexeme),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    SemiColon,
    Comma,
    Dot,

    Minus,
    Plus,
    Star,
    Slash,

    // One or two character tokens.
    Bang,
    BangEq,
    Eq,
    DoubleEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,

    // Literals.
    True,
    False,
    Number(f64),
    String(String),
    Identifier(String),

    // Keywords.
    And,
    Class,
    Else,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    Var,
    While,

    Eof,
}

impl Kind {
    /// Upper snake case name of the kind, as printed in token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::LeftBrace => "LEFT_BRACE",
            Self::RightBrace => "RIGHT_BRACE",
            Self::SemiColon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Dot => "DOT",
            Self::Minus => "MINUS",
            Self::Plus => "PLUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::Bang => "BANG",
            Self::BangEq => "BANG_EQUAL",
            Self::Eq => "EQUAL",
            Self::DoubleEq => "EQUAL_EQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEq => "GREATER_EQUAL",
            Self::Less => "LESS",
            Self::LessEq => "LESS_EQUAL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Number(_) => "NUMBER",
            Self::String(_) => "STRING",
            Self::Identifier(_) => "IDENTIFIER",
            Self::And => "AND",
            Self::Class => "CLASS",
            Self::Else => "ELSE",
            Self::Fun => "FUN",
            Self::For => "FOR",
            Self::If => "IF",
            Self::Nil => "NIL",
            Self::Or => "OR",
            Self::Print => "PRINT",
            Self::Return => "RETURN",
            Self::Super => "SUPER",
            Self::This => "THIS",
            Self::Var => "VAR",
            Self::While => "WHILE",
            Self::Eof => "EOF",
        }
    }

    /// Keyword kind for a reserved word, if it is one.
    pub fn keyword(word: &str) -> Option<Kind> {
        let kind = match word {
            "and" => Kind::And,
            "class" => Kind::Class,
            "else" => Kind::Else,
            "false" => Kind::False,
            "for" => Kind::For,
            "fun" => Kind::Fun,
            "if" => Kind::If,
            "nil" => Kind::Nil,
            "or" => Kind::Or,
            "print" => Kind::Print,
            "return" => Kind::Return,
            "super" => Kind::Super,
            "this" => Kind::This,
            "true" => Kind::True,
            "var" => Kind::Var,
            "while" => Kind::While,
            _ => return None,
        };

        Some(kind)
    }
}
