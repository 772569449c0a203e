//! Tolerant lexer for controller source units.
//!
//! # Responsibilities
//! - Split controller source text into identifiers, keywords, variables,
//!   literals and punctuation
//! - Skip whitespace, comments and open/close tags
//!
//! # Design Decisions
//! - Never fails: unterminated strings, heredocs and comments run to end
//!   of input
//! - Tokens borrow from the source, no allocation per token
//! - Keywords are matched case-insensitively

/// Declaration keywords the introspector reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Extends,
    Public,
    Protected,
    Private,
    Function,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Self> {
        const KEYWORDS: [(&str, Keyword); 6] = [
            ("class", Keyword::Class),
            ("extends", Keyword::Extends),
            ("public", Keyword::Public),
            ("protected", Keyword::Protected),
            ("private", Keyword::Private),
            ("function", Keyword::Function),
        ];

        KEYWORDS
            .iter()
            .find(|(text, _)| ident.eq_ignore_ascii_case(text))
            .map(|(_, keyword)| *keyword)
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    /// `$name`; the token text keeps the sigil.
    Variable,
    /// String or numeric literal.
    Literal,
    Punct,
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: usize,
}

impl Token<'_> {
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

/// Streaming lexer over a controller source unit.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Consume `prefix` if the remaining input starts with it (ASCII, case-insensitive).
    fn eat_prefix(&mut self, prefix: &str) -> bool {
        let matched = self
            .rest()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matched {
            for _ in 0..prefix.chars().count() {
                self.advance();
            }
        }
        matched
    }

    fn skip_line(&mut self) {
        self.eat_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self) {
        while !self.rest().is_empty() {
            if self.eat_prefix("*/") {
                return;
            }
            self.advance();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if rest.starts_with(|c: char| c.is_whitespace()) {
                self.advance();
            } else if rest.starts_with("//") || (rest.starts_with('#') && !rest.starts_with("#[")) {
                self.skip_line();
            } else if rest.starts_with("/*") {
                self.skip_block_comment();
            } else if self.eat_prefix("<?php") || self.eat_prefix("<?=") || self.eat_prefix("?>") {
                continue;
            } else {
                return;
            }
        }
    }

    fn eat_string(&mut self, quote: char) {
        while let Some(c) = self.advance() {
            if c == '\\' {
                self.advance();
            } else if c == quote {
                return;
            }
        }
    }

    /// `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'` through the closing label.
    fn eat_heredoc(&mut self) {
        self.eat_prefix("<<<");
        self.eat_while(|c| c == ' ' || c == '\t');
        let quote = self.peek().filter(|c| matches!(*c, '\'' | '"'));
        if quote.is_some() {
            self.advance();
        }

        let source = self.source;
        let label_start = self.pos;
        self.eat_while(is_ident_continue);
        let label = &source[label_start..self.pos];
        if let Some(q) = quote {
            if self.peek() == Some(q) {
                self.advance();
            }
        }
        if label.is_empty() {
            return;
        }

        self.skip_line();
        while self.advance().is_some() {
            let rest = self.rest();
            let body = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
            let closes = body
                .strip_prefix(label)
                .is_some_and(|after| !after.starts_with(is_ident_continue));
            if closes {
                let end = self.pos + (rest.len() - body.len()) + label.len();
                while self.pos < end {
                    self.advance();
                }
                return;
            }
            self.skip_line();
        }
    }

    fn next_token(&mut self) -> Option<Token<'src>> {
        self.skip_trivia();

        let start = self.pos;
        let line = self.line;
        if self.rest().starts_with("<<<") {
            self.eat_heredoc();
            return Some(Token {
                kind: TokenKind::Literal,
                text: &self.source[start..self.pos],
                line,
            });
        }
        let c = self.advance()?;

        let kind = match c {
            '$' if self.peek().is_some_and(is_ident_start) => {
                self.eat_while(is_ident_continue);
                TokenKind::Variable
            }
            c if is_ident_start(c) => {
                self.eat_while(is_ident_continue);
                match Keyword::from_ident(&self.source[start..self.pos]) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Identifier,
                }
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                TokenKind::Literal
            }
            '\'' | '"' => {
                self.eat_string(c);
                TokenKind::Literal
            }
            ':' if self.peek() == Some(':') => {
                self.advance();
                TokenKind::Punct
            }
            '-' | '=' if self.peek() == Some('>') => {
                self.advance();
                TokenKind::Punct
            }
            '?' if self.rest().starts_with("->") => {
                self.advance();
                self.advance();
                TokenKind::Punct
            }
            _ => TokenKind::Punct,
        };

        Some(Token {
            kind,
            text: &self.source[start..self.pos],
            line,
        })
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}
