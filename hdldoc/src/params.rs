// SPDX-License-Identifier: Apache-2.0

//! Parameter declarations, from `#( ... )` blocks and from body statements.
//!
//! Both sources share one declarator grammar, applied per top-level-comma
//! segment:
//!
//! ```text
//! segment := <ignored> KEYWORD [type_word] [signing] range* IDENT "=" expr
//!          | IDENT "=" expr        -- continuation of an earlier KEYWORD
//! ```
//!
//! `KEYWORD` is `parameter` (plus `localparam` when
//! `ParseOptions::capture_localparams` is set). A continuation inherits the
//! size/type of the segment that carried the keyword, so
//! `parameter integer A = 1, B = 2` yields two integer parameters. A
//! declarator without a default value is not recognized.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::model::ParameterRecord;
use crate::options::ParseOptions;
use crate::ports::pop_ranges;
use crate::scan::{collapse_whitespace, Keyword, Token, TokenPayload, TokenScanner};

/// Result of trying the parameter grammar on one body statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamMatch {
    /// The statement does not declare parameters.
    NotParameter,
    /// The statement carries the keyword. `rejected` holds the raw text of
    /// every segment that did not fit the grammar.
    Declared {
        records: Vec<ParameterRecord>,
        rejected: Vec<String>,
    },
}

struct Segment {
    tokens: Vec<Token>,
    text: String,
}

fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut depth = 0usize;
    let flush = |current: &mut Vec<Token>, segments: &mut Vec<Segment>| {
        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let raw = &text[first.span.start.offset..last.span.limit.offset];
            segments.push(Segment {
                text: collapse_whitespace(raw),
                tokens: std::mem::take(current),
            });
        }
    };
    let mut scanner = TokenScanner::new(text);
    while let Some(tok) = scanner.popt() {
        match tok.payload {
            TokenPayload::OParen | TokenPayload::OBrack | TokenPayload::OBrace => depth += 1,
            TokenPayload::CParen | TokenPayload::CBrack | TokenPayload::CBrace => {
                depth = depth.saturating_sub(1)
            }
            TokenPayload::Comma if depth == 0 => {
                flush(&mut current, &mut segments);
                continue;
            }
            _ => {}
        }
        current.push(tok);
    }
    flush(&mut current, &mut segments);
    segments
}

fn keyword_position(tokens: &[Token], options: &ParseOptions) -> Option<usize> {
    tokens.iter().position(|t| match t.payload {
        TokenPayload::Keyword(Keyword::Parameter) => true,
        TokenPayload::Keyword(Keyword::Localparam) => options.capture_localparams,
        _ => false,
    })
}

fn ident_at(tokens: &[Token], i: usize) -> Option<&str> {
    tokens.get(i).and_then(|t| t.payload.identifier())
}

/// Parses `IDENT "=" expr` starting at `tokens[i]`, which must run to the end
/// of the segment.
fn parse_name_and_default(
    tokens: &[Token],
    i: usize,
    text: &str,
    size_or_type: Option<String>,
) -> Option<ParameterRecord> {
    let name = ident_at(tokens, i)?;
    if tokens.get(i + 1)?.payload != TokenPayload::Equals {
        return None;
    }
    let first = tokens.get(i + 2)?;
    let last = tokens.last()?;
    let default = collapse_whitespace(&text[first.span.start.offset..last.span.limit.offset]);
    Some(ParameterRecord {
        name: name.to_string(),
        size_or_type,
        default_expression: Some(default),
    })
}

/// Parses the declarator that follows the keyword at `tokens[keyword]`.
fn parse_declarator(tokens: &[Token], keyword: usize, text: &str) -> Option<ParameterRecord> {
    let mut i = keyword + 1;
    let mut type_words: Vec<&str> = Vec::new();
    if let Some(word) = ident_at(tokens, i) {
        let next = tokens.get(i + 1).map(|t| &t.payload);
        if matches!(next, Some(TokenPayload::Identifier(_)) | Some(TokenPayload::OBrack)) {
            type_words.push(word);
            i += 1;
        }
    }
    if let Some(word) = ident_at(tokens, i) {
        if (word == "signed" || word == "unsigned") && !type_words.contains(&word) {
            type_words.push(word);
            i += 1;
        }
    }
    let size = pop_ranges(tokens, &mut i, text).ok()?;
    let size_or_type = size.or_else(|| {
        if type_words.is_empty() {
            None
        } else {
            Some(type_words.join(" "))
        }
    });
    parse_name_and_default(tokens, i, text, size_or_type)
}

/// Applies the declarator grammar to each segment in turn.
///
/// `inherited` is `Some(size_or_type)` once a segment carrying the keyword
/// has parsed, which enables continuations.
fn parse_segments(
    segments: &[Segment],
    text: &str,
    options: &ParseOptions,
) -> (Vec<ParameterRecord>, Vec<String>) {
    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut inherited: Option<Option<String>> = None;
    for segment in segments {
        let parsed = match keyword_position(&segment.tokens, options) {
            Some(kw) => parse_declarator(&segment.tokens, kw, text),
            None => inherited
                .clone()
                .and_then(|shape| parse_name_and_default(&segment.tokens, 0, text, shape)),
        };
        match parsed {
            Some(record) => {
                inherited = Some(record.size_or_type.clone());
                records.push(record);
            }
            None => rejected.push(segment.text.clone()),
        }
    }
    (records, rejected)
}

/// Parses the text between the parentheses of a `#( ... )` block.
///
/// Every segment that does not parse is reported as `UnrecognizedParameter`.
pub fn parse_parameter_block(
    module: &str,
    text: &str,
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> Vec<ParameterRecord> {
    let segments = split_segments(text);
    let (records, rejected) = parse_segments(&segments, text, options);
    for raw in rejected {
        diags.report(DiagnosticKind::UnrecognizedParameter, module, raw);
    }
    records
}

/// Tries the parameter grammar on one `;`-delimited body statement.
pub fn match_parameter_statement(statement: &str, options: &ParseOptions) -> ParamMatch {
    let segments = split_segments(statement);
    match segments.first() {
        Some(first) if keyword_position(&first.tokens, options).is_some() => {}
        _ => return ParamMatch::NotParameter,
    }
    let (records, rejected) = parse_segments(&segments, statement, options);
    ParamMatch::Declared { records, rejected }
}
