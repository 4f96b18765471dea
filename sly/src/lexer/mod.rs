pub mod token;

use std::ops::Range;

use tracing::debug;

use crate::error::{ErrorBundle, ErrorInfo, Recovered, Stage};
use crate::lexer::token::{Token, TokenType};

/// Converts source text into an ordered sequence of tokens.
pub struct Lexer<'a> {
    source: &'a str,
}

/// How a failed scan affects the rest of the lexing pass.
enum Fault {
    /// A single malformed token; scanning resumes after it.
    Recoverable(ErrorInfo),
    /// The input ended mid-construct; nothing after it can be resynchronized.
    Fatal(ErrorInfo),
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source }
    }

    /// Lex the whole source.
    ///
    /// Recoverable diagnostics are collected and scanning continues past them;
    /// a fatal diagnostic stops immediately. Either way the tokens recovered so
    /// far are returned alongside the bundle.
    pub fn lex(&self) -> Result<Vec<Token>, Recovered<Vec<Token>>> {
        let mut scanner = Scanner::new(self.source);
        let mut tokens = Vec::new();
        let mut errors = ErrorBundle::new();

        while !scanner.at_end() {
            match scanner.scan_token() {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => {}
                Err(Fault::Recoverable(error)) => errors.add(error),
                Err(Fault::Fatal(error)) => {
                    errors.add(error);
                    debug!(tokens = tokens.len(), errors = errors.len(), "lexing aborted");
                    return Err(Recovered {
                        partial: tokens,
                        errors,
                    });
                }
            }
        }

        debug!(tokens = tokens.len(), errors = errors.len(), "lexing finished");
        errors.into_result(tokens)
    }
}

// ---------------------------------------------------------------------------
// Character scanner
// ---------------------------------------------------------------------------

struct Scanner {
    chars: Vec<char>,
    /// Byte offset of each character, plus one past the end.
    byte_pos: Vec<usize>,
    pos: usize,
    line: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut byte_pos = Vec::with_capacity(chars.len() + 1);
        let mut offset = 0;
        for c in &chars {
            byte_pos.push(offset);
            offset += c.len_utf8();
        }
        byte_pos.push(offset);

        Scanner {
            chars,
            byte_pos,
            pos: 0,
            line: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    fn span_from(&self, start: usize) -> Range<usize> {
        self.byte_pos[start]..self.byte_pos[self.pos]
    }

    fn token(&self, ty: TokenType, start: usize, line: usize, lexeme: char) -> Token {
        Token::new(ty, line, lexeme, self.span_from(start))
    }

    fn error(&self, start: usize, line: usize, lexeme: char, message: &str) -> ErrorInfo {
        ErrorInfo::new(line, message)
            .at(lexeme)
            .in_stage(Stage::Lexing)
            .with_span(self.span_from(start))
    }

    /// Consume `suffix` if it comes next and is not itself the start of a longer word.
    fn eat_suffix(&mut self, suffix: &str) -> bool {
        let mut n = 0;
        for expected in suffix.chars() {
            if self.peek_at(n) != Some(expected) {
                return false;
            }
            n += 1;
        }
        if self.peek_at(n).is_some_and(char::is_alphanumeric) {
            return false;
        }
        self.pos += n;
        true
    }

    fn scan_token(&mut self) -> Result<Option<Token>, Fault> {
        let start = self.pos;
        let line = self.line;
        let Some(c) = self.advance() else {
            return Ok(None);
        };

        let ty = match c {
            '#' => {
                while let Some(next) = self.peek_at(0) {
                    if next == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
                return Ok(None);
            }

            ' ' | '\t' | '\r' => return Ok(None),
            '\n' => {
                self.line += 1;
                return Ok(None);
            }

            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            ';' => TokenType::Semicolon,
            ':' => TokenType::Colon,
            '.' => TokenType::Dot,
            '@' => TokenType::AtSign,
            '$' => TokenType::DollarSign,
            '=' => TokenType::EqualSign,
            ',' => TokenType::Comma,

            '-' => return self.text_block(start, line).map(Some),
            '"' => return self.string(start, line).map(Some),
            '0'..='9' => return self.integer(start, line, c).map(Some),

            _ => match self.keyword(c) {
                Some(keyword) => keyword,
                None if c.is_alphabetic() => self.identifier(c),
                None => {
                    return Err(Fault::Recoverable(self.error(
                        start,
                        line,
                        c,
                        "Unexpected character",
                    )));
                }
            },
        };

        Ok(Some(self.token(ty, start, line, c)))
    }

    fn keyword(&mut self, first: char) -> Option<TokenType> {
        match first {
            'l' if self.eat_suffix("et") => Some(TokenType::Let),
            'm' if self.eat_suffix("ut") => Some(TokenType::Mut),
            'm' if self.eat_suffix("acro") => Some(TokenType::Macro),
            's' if self.eat_suffix("lide") => Some(TokenType::Slide),
            's' if self.eat_suffix("elf") => Some(TokenType::SelfKw),
            'b' if self.eat_suffix("lock") => Some(TokenType::Block),
            _ => None,
        }
    }

    fn identifier(&mut self, first: char) -> TokenType {
        let mut ident = String::new();
        ident.push(first);
        while let Some(next) = self.peek_at(0) {
            if !next.is_alphanumeric() {
                break;
            }
            ident.push(next);
            self.pos += 1;
        }
        TokenType::Identifier(ident)
    }

    /// `---text---`. The opening dash has already been consumed.
    fn text_block(&mut self, start: usize, line: usize) -> Result<Token, Fault> {
        for n in 0..2 {
            match self.peek_at(n) {
                Some('-') => {}
                Some(_) => {
                    return Err(Fault::Recoverable(self.error(
                        start,
                        line,
                        '-',
                        "Malformed text block",
                    )));
                }
                None => {
                    self.pos = self.chars.len();
                    return Err(Fault::Fatal(self.error(
                        start,
                        line,
                        '-',
                        "Unexpected end of input",
                    )));
                }
            }
        }
        self.pos += 2;

        let mut text = String::new();
        let mut dashes = 0;
        loop {
            match self.advance() {
                None => {
                    return Err(Fault::Fatal(self.error(
                        start,
                        line,
                        '-',
                        "Unterminated text block",
                    )));
                }
                Some('-') if dashes == 2 => break,
                Some('-') => dashes += 1,
                Some(c) => {
                    // Fewer than three dashes in a row are part of the text
                    for _ in 0..dashes {
                        text.push('-');
                    }
                    dashes = 0;
                    if c == '\n' {
                        self.line += 1;
                    }
                    text.push(c);
                }
            }
        }

        Ok(self.token(TokenType::Text(text), start, line, '-'))
    }

    /// `"string"`. The opening quote has already been consumed.
    fn string(&mut self, start: usize, line: usize) -> Result<Token, Fault> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(Fault::Fatal(self.error(
                        start,
                        line,
                        '"',
                        "Unterminated string",
                    )));
                }
                Some('"') => break,
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                }
            }
        }

        Ok(self.token(TokenType::String(value), start, line, '"'))
    }

    fn integer(&mut self, start: usize, line: usize, first: char) -> Result<Token, Fault> {
        let mut digits = String::new();
        digits.push(first);
        while let Some(next) = self.peek_at(0) {
            if !next.is_ascii_digit() {
                break;
            }
            digits.push(next);
            self.pos += 1;
        }

        match digits.parse::<u8>() {
            Ok(value) => Ok(self.token(TokenType::Integer(value), start, line, first)),
            Err(_) => Err(Fault::Recoverable(self.error(
                start,
                line,
                first,
                "Integer literal out of range (0-255)",
            ))),
        }
    }
}
