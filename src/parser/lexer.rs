//! Lexer (tokenizer) for script source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Unrecognised characters do not stop the scan: each one is recorded as a
//! [`LexError`] and dropped, so a scan always yields a complete token sequence
//! ending in [`TokenKind::Eof`].

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::LazyLock;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Colon,        // :
    Dollar,       // $
    Equal,        // =

    // Arithmetic and concatenation
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Modulo,    // %
    Ampersand, // &

    // Relational
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=
    EqualEqual,   // ==
    NotEqual,     // <>

    // Literals
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    BoolLiteral,

    // Structural keywords
    Script,
    Area,
    Start,
    End,

    // Type keywords
    Int,
    Float,
    Char,
    Bool,

    // Control keywords
    If,
    Else,
    Repeat,
    When,
    For,
    Scan,
    Print,

    // Logical keywords
    And,
    Or,
    Not,

    // End of input
    Eof,
}

impl TokenKind {
    /// Upper-case name used in token dumps and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Dollar => "DOLLAR",
            TokenKind::Equal => "EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Modulo => "MODULO",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::NotEqual => "NOT_EQUAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::CharLiteral => "CHAR_LITERAL",
            TokenKind::BoolLiteral => "BOOL_LITERAL",
            TokenKind::Script => "SCRIPT",
            TokenKind::Area => "AREA",
            TokenKind::Start => "START",
            TokenKind::End => "END",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Char => "CHAR",
            TokenKind::Bool => "BOOL",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Repeat => "REPEAT",
            TokenKind::When => "WHEN",
            TokenKind::For => "FOR",
            TokenKind::Scan => "SCAN",
            TokenKind::Print => "PRINT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Eof => "EOF",
        }
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Char | TokenKind::Bool
        )
    }

    /// Literal or identifier: the leaves of an expression.
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::BoolLiteral
        )
    }

    /// Arithmetic, concatenation, relational and logical operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Modulo
                | TokenKind::Ampersand
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::EqualEqual
                | TokenKind::NotEqual
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical unit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// Short human-readable form for diagnostics, e.g. `'$'` or `end of input`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}' (line {})", self.kind, self.lexeme, self.line)
    }
}

/// Reserved words, built once and shared read-only by every scan.
///
/// Boolean literals are accepted in both upper and lower case.
static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    map.insert("SCRIPT", TokenKind::Script);
    map.insert("AREA", TokenKind::Area);
    map.insert("START", TokenKind::Start);
    map.insert("END", TokenKind::End);
    map.insert("INT", TokenKind::Int);
    map.insert("FLOAT", TokenKind::Float);
    map.insert("CHAR", TokenKind::Char);
    map.insert("BOOL", TokenKind::Bool);
    map.insert("IF", TokenKind::If);
    map.insert("ELSE", TokenKind::Else);
    map.insert("REPEAT", TokenKind::Repeat);
    map.insert("WHEN", TokenKind::When);
    map.insert("FOR", TokenKind::For);
    map.insert("SCAN", TokenKind::Scan);
    map.insert("PRINT", TokenKind::Print);
    map.insert("AND", TokenKind::And);
    map.insert("OR", TokenKind::Or);
    map.insert("NOT", TokenKind::Not);
    map.insert("TRUE", TokenKind::BoolLiteral);
    map.insert("FALSE", TokenKind::BoolLiteral);
    map.insert("true", TokenKind::BoolLiteral);
    map.insert("false", TokenKind::BoolLiteral);
    map
});

/// Look up a word in the reserved word table.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

/// Recoverable lexer error: the offending input was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub character: char,
    pub line: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexer error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

/// Lexer for script source code
pub struct Lexer {
    input: Vec<char>,
    start: usize,
    position: usize,
    line: usize,
    errors: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            start: 0,
            position: 0,
            line: 1,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input.
    ///
    /// Always returns a sequence terminated by an EOF token; lexical errors
    /// met along the way are available from [`Lexer::errors`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.start = self.position;
            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line));
        log::debug!(
            "scanned {} tokens with {} lexical error(s)",
            tokens.len(),
            self.errors.len()
        );
        tokens
    }

    /// Lexical errors reported so far, in source order.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Scan one token; `None` when the input consumed produces no token.
    fn next_token(&mut self) -> Option<Token> {
        let ch = self.advance()?;

        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '$' => TokenKind::Dollar,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Ampersand,
            '%' => {
                if self.match_char('%') {
                    self.skip_comment();
                    return None;
                }
                TokenKind::Modulo
            }
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LessEqual
                } else if self.match_char('>') {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Less
                }
            }
            ' ' | '\t' | '\r' => return None,
            '\n' => {
                self.line += 1;
                return None;
            }
            '\'' => return self.char_literal(),
            c if c.is_ascii_digit() => self.number_literal(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),
            other => {
                self.report(other, format!("Unexpected character '{}'", other));
                return None;
            }
        };

        Some(self.make_token(kind))
    }

    /// Integer literal, or float literal when a `.` is followed by a digit.
    fn number_literal(&mut self) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume '.'
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            return TokenKind::FloatLiteral;
        }

        TokenKind::IntLiteral
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text: String = self.input[self.start..self.position].iter().collect();
        keyword(&text).unwrap_or(TokenKind::Identifier)
    }

    /// Character literal: exactly one character between single quotes.
    fn char_literal(&mut self) -> Option<Token> {
        match (self.peek(), self.peek_ahead(1)) {
            (Some(c), Some('\'')) if c != '\n' => {
                self.advance();
                self.advance();
                Some(self.make_token(TokenKind::CharLiteral))
            }
            _ => {
                self.report('\'', "Unterminated character literal".to_string());
                None
            }
        }
    }

    /// Skip the rest of a `%%` comment, leaving the newline for line counting.
    fn skip_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn report(&mut self, character: char, message: String) {
        let error = LexError {
            message,
            character,
            line: self.line,
        };
        log::debug!("dropped input: {}", error);
        self.errors.push(error);
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme: String = self.input[self.start..self.position].iter().collect();
        Token::new(kind, lexeme, self.line)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}
