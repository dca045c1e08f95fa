// SPDX-License-Identifier: Apache-2.0

//! Tolerant token scanner for Verilog/SystemVerilog source text.
//!
//! The scanner never fails: characters it does not understand come back as
//! `TokenPayload::Other` so that the structural parsers built on top of it can
//! decide whether a fragment is recognizable. Every token carries a `Span`
//! with byte offsets so callers can slice the source text for fields that
//! are kept verbatim (module bodies, bit ranges, default expressions).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// Byte offset into the scanned text.
    pub offset: usize,
    pub lineno: u32,
    pub colno: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub limit: Pos,
}

impl Span {
    pub fn to_human_string(&self) -> String {
        format!(
            "{}:{}..{}:{}",
            self.start.lineno, self.start.colno, self.limit.lineno, self.limit.colno
        )
    }

    /// Returns the slice of `text` covered by this span.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start.offset..self.limit.offset]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Module,
    Macromodule,
    Endmodule,
    Input,
    Output,
    Inout,
    Parameter,
    Localparam,
}

impl Keyword {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(Keyword::Module),
            "macromodule" => Some(Keyword::Macromodule),
            "endmodule" => Some(Keyword::Endmodule),
            "input" => Some(Keyword::Input),
            "output" => Some(Keyword::Output),
            "inout" => Some(Keyword::Inout),
            "parameter" => Some(Keyword::Parameter),
            "localparam" => Some(Keyword::Localparam),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Module => "module",
            Keyword::Macromodule => "macromodule",
            Keyword::Endmodule => "endmodule",
            Keyword::Input => "input",
            Keyword::Output => "output",
            Keyword::Inout => "inout",
            Keyword::Parameter => "parameter",
            Keyword::Localparam => "localparam",
        }
    }
}

/// Compiler directive names recognized by the scanner, along with how much
/// trailing text each one owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectiveArity {
    /// No argument, e.g. `` `else ``.
    None,
    /// A single identifier argument, e.g. `` `ifdef FOO ``.
    Ident,
    /// The remainder of the line, e.g. `` `define W 8 ``.
    RestOfLine,
}

pub(crate) fn directive_arity(name: &str) -> Option<DirectiveArity> {
    match name {
        "ifdef" | "ifndef" | "elsif" | "undef" => Some(DirectiveArity::Ident),
        "define" | "include" | "timescale" | "default_nettype" | "pragma" => {
            Some(DirectiveArity::RestOfLine)
        }
        "else" | "endif" | "resetall" | "celldefine" | "endcelldefine" => {
            Some(DirectiveArity::None)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPayload {
    Identifier(String),
    Keyword(Keyword),
    /// A compiler directive such as `` `ifdef FOO ``; `arg` is the
    /// whitespace-collapsed argument text, empty when there is none.
    Directive {
        name: String,
        arg: String,
    },
    /// A text macro usage such as `` `WIDTH ``.
    MacroRef(String),
    Number(String),
    StringLit(String),
    OParen,
    CParen,
    OBrack,
    CBrack,
    OBrace,
    CBrace,
    Hash,
    Comma,
    Semi,
    Equals,
    Colon,
    Dot,
    Other(char),
}

impl TokenPayload {
    pub fn is_identifier(&self) -> bool {
        matches!(self, TokenPayload::Identifier(_))
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            TokenPayload::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPayload::Identifier(s) => write!(f, "{}", s),
            TokenPayload::Keyword(kw) => write!(f, "{}", kw.as_str()),
            TokenPayload::Directive { name, arg } => {
                if arg.is_empty() {
                    write!(f, "`{}", name)
                } else {
                    write!(f, "`{} {}", name, arg)
                }
            }
            TokenPayload::MacroRef(s) => write!(f, "`{}", s),
            TokenPayload::Number(s) => write!(f, "{}", s),
            TokenPayload::StringLit(s) => write!(f, "\"{}\"", s),
            TokenPayload::OParen => write!(f, "("),
            TokenPayload::CParen => write!(f, ")"),
            TokenPayload::OBrack => write!(f, "["),
            TokenPayload::CBrack => write!(f, "]"),
            TokenPayload::OBrace => write!(f, "{{"),
            TokenPayload::CBrace => write!(f, "}}"),
            TokenPayload::Hash => write!(f, "#"),
            TokenPayload::Comma => write!(f, ","),
            TokenPayload::Semi => write!(f, ";"),
            TokenPayload::Equals => write!(f, "="),
            TokenPayload::Colon => write!(f, ":"),
            TokenPayload::Dot => write!(f, "."),
            TokenPayload::Other(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub payload: TokenPayload,
    pub span: Span,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Collapses every run of whitespace in `s` to a single space and trims the
/// ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub struct TokenScanner<'a> {
    text: &'a str,
    pub pos: Pos,
    lookahead: Option<Token>,
}

impl<'a> TokenScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: Pos {
                offset: 0,
                lineno: 1,
                colno: 1,
            },
            lookahead: None,
        }
    }

    pub fn peekc(&self) -> Option<char> {
        self.text[self.pos.offset..].chars().next()
    }

    fn peekc_at(&self, n: usize) -> Option<char> {
        self.text[self.pos.offset..].chars().nth(n)
    }

    pub fn popc(&mut self) -> Option<char> {
        let c = self.peekc()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.lineno += 1;
            self.pos.colno = 1;
        } else {
            self.pos.colno += 1;
        }
        Some(c)
    }

    pub fn peekt(&mut self) -> Option<&Token> {
        if self.lookahead.is_none() {
            self.lookahead = self.next_token();
        }
        self.lookahead.as_ref()
    }

    pub fn popt(&mut self) -> Option<Token> {
        if self.lookahead.is_none() {
            self.lookahead = self.next_token();
        }
        self.lookahead.take()
    }

    /// Pops the next token if its payload equals `want`.
    pub fn try_pop(&mut self, want: &TokenPayload) -> Option<Token> {
        match self.peekt() {
            Some(tok) if &tok.payload == want => self.popt(),
            _ => None,
        }
    }

    /// Consumes tokens up to and including the `)` that closes an already
    /// consumed `(`. Returns the span strictly between the parentheses and the
    /// span of the closing paren, or `None` if input ran out first.
    pub fn pop_balanced_parens(&mut self, open: &Token) -> Option<(Span, Span)> {
        let mut depth = 1usize;
        while let Some(tok) = self.popt() {
            match tok.payload {
                TokenPayload::OParen => depth += 1,
                TokenPayload::CParen => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = Span {
                            start: open.span.limit,
                            limit: tok.span.start,
                        };
                        return Some((inner, tok.span));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Collects every remaining token.
    pub fn collect_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.popt() {
            tokens.push(tok);
        }
        tokens
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peekc() {
            if c.is_whitespace() {
                self.popc();
            } else {
                break;
            }
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(c) = self.peekc() {
            if c.is_whitespace() && c != '\n' {
                self.popc();
            } else {
                break;
            }
        }
    }

    fn pop_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peekc() {
            if is_ident_continue(c) {
                word.push(c);
                self.popc();
            } else {
                break;
            }
        }
        word
    }

    fn pop_rest_of_line(&mut self) -> String {
        let mut rest = String::new();
        while let Some(c) = self.peekc() {
            if c == '\n' {
                break;
            }
            rest.push(c);
            self.popc();
        }
        collapse_whitespace(&rest)
    }

    fn pop_directive(&mut self, start: Pos) -> Token {
        // Leading backtick.
        self.popc();
        let name = self.pop_word();
        let payload = match directive_arity(&name) {
            Some(DirectiveArity::None) => TokenPayload::Directive {
                name,
                arg: String::new(),
            },
            Some(DirectiveArity::Ident) => {
                self.skip_inline_whitespace();
                let arg = self.pop_word();
                TokenPayload::Directive { name, arg }
            }
            Some(DirectiveArity::RestOfLine) => {
                let arg = self.pop_rest_of_line();
                TokenPayload::Directive { name, arg }
            }
            None => TokenPayload::MacroRef(name),
        };
        Token {
            payload,
            span: Span {
                start,
                limit: self.pos,
            },
        }
    }

    fn pop_identifier(&mut self, start: Pos) -> Token {
        let mut ident = String::new();
        if self.peekc() == Some('\\') {
            // Escaped identifier: runs up to (and consumes) the next whitespace.
            self.popc();
            while let Some(c) = self.peekc() {
                if c.is_whitespace() {
                    self.popc();
                    break;
                }
                ident.push(c);
                self.popc();
            }
        } else {
            ident = self.pop_word();
        }
        let limit = self.pos;
        let payload = match Keyword::from_str(&ident) {
            Some(kw) => TokenPayload::Keyword(kw),
            None => TokenPayload::Identifier(ident),
        };
        Token {
            payload,
            span: Span { start, limit },
        }
    }

    fn pop_number(&mut self, start: Pos) -> Token {
        let mut num = String::new();
        while let Some(c) = self.peekc() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '\'' || c == '.' || c == '?' {
                num.push(c);
                self.popc();
            } else {
                break;
            }
        }
        Token {
            payload: TokenPayload::Number(num),
            span: Span {
                start,
                limit: self.pos,
            },
        }
    }

    fn pop_string(&mut self, start: Pos) -> Token {
        // Opening quote.
        self.popc();
        let mut s = String::new();
        while let Some(c) = self.popc() {
            match c {
                '"' => break,
                '\\' => {
                    s.push(c);
                    if let Some(escaped) = self.popc() {
                        s.push(escaped);
                    }
                }
                _ => s.push(c),
            }
        }
        Token {
            payload: TokenPayload::StringLit(s),
            span: Span {
                start,
                limit: self.pos,
            },
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let c = self.peekc()?;
        if c == '`' {
            return Some(self.pop_directive(start));
        }
        if is_ident_start(c) || c == '\\' {
            return Some(self.pop_identifier(start));
        }
        if c.is_ascii_digit() || (c == '\'' && self.peekc_at(1).is_some_and(is_ident_continue)) {
            return Some(self.pop_number(start));
        }
        if c == '"' {
            return Some(self.pop_string(start));
        }
        self.popc();
        let payload = match c {
            '(' => TokenPayload::OParen,
            ')' => TokenPayload::CParen,
            '[' => TokenPayload::OBrack,
            ']' => TokenPayload::CBrack,
            '{' => TokenPayload::OBrace,
            '}' => TokenPayload::CBrace,
            '#' => TokenPayload::Hash,
            ',' => TokenPayload::Comma,
            ';' => TokenPayload::Semi,
            '=' => TokenPayload::Equals,
            ':' => TokenPayload::Colon,
            '.' => TokenPayload::Dot,
            other => TokenPayload::Other(other),
        };
        Some(Token {
            payload,
            span: Span {
                start,
                limit: self.pos,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(input: &str) -> Vec<TokenPayload> {
        TokenScanner::new(input)
            .collect_tokens()
            .into_iter()
            .map(|t| t.payload)
            .collect()
    }

    #[test]
    fn test_token_scanner_punctuation() {
        assert_eq!(
            payloads("( ) ; , #"),
            vec![
                TokenPayload::OParen,
                TokenPayload::CParen,
                TokenPayload::Semi,
                TokenPayload::Comma,
                TokenPayload::Hash,
            ]
        );
    }

    #[test]
    fn test_token_scanner_keyword_and_identifier() {
        assert_eq!(
            payloads("module foo_bar"),
            vec![
                TokenPayload::Keyword(Keyword::Module),
                TokenPayload::Identifier("foo_bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_scanner_escaped_identifier() {
        assert_eq!(
            payloads("\\a[0] x"),
            vec![
                TokenPayload::Identifier("a[0]".to_string()),
                TokenPayload::Identifier("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_scanner_ifdef_takes_one_identifier() {
        assert_eq!(
            payloads("`ifdef   FOO input a"),
            vec![
                TokenPayload::Directive {
                    name: "ifdef".to_string(),
                    arg: "FOO".to_string(),
                },
                TokenPayload::Keyword(Keyword::Input),
                TokenPayload::Identifier("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_scanner_define_consumes_line() {
        assert_eq!(
            payloads("`define W  8 + 1\nwire"),
            vec![
                TokenPayload::Directive {
                    name: "define".to_string(),
                    arg: "W 8 + 1".to_string(),
                },
                TokenPayload::Identifier("wire".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_scanner_macro_reference() {
        assert_eq!(
            payloads("[`W-1:0]"),
            vec![
                TokenPayload::OBrack,
                TokenPayload::MacroRef("W".to_string()),
                TokenPayload::Other('-'),
                TokenPayload::Number("1".to_string()),
                TokenPayload::Colon,
                TokenPayload::Number("0".to_string()),
                TokenPayload::CBrack,
            ]
        );
    }

    #[test]
    fn test_token_scanner_sized_literal() {
        assert_eq!(
            payloads("8'hFF 'b1"),
            vec![
                TokenPayload::Number("8'hFF".to_string()),
                TokenPayload::Number("'b1".to_string()),
            ]
        );
    }

    #[test]
    fn test_span_slices_source_text() {
        let text = "module  m ;";
        let tokens = TokenScanner::new(text).collect_tokens();
        assert_eq!(tokens[1].span.slice(text), "m");
        assert_eq!(tokens[1].span.start.colno, 9);
        assert_eq!(tokens[2].span.start.offset, 10);
    }

    #[test]
    fn test_pop_balanced_parens() {
        let text = "(a, (b), c) ;";
        let mut scanner = TokenScanner::new(text);
        let open = scanner.popt().unwrap();
        let (inner, _close) = scanner.pop_balanced_parens(&open).unwrap();
        assert_eq!(inner.slice(text), "a, (b), c");
        assert_eq!(scanner.popt().unwrap().payload, TokenPayload::Semi);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  input \n\t wire  a "), "input wire a");
    }
}
