// SPDX-License-Identifier: Apache-2.0

//! Port list parsing.
//!
//! The port list is split into comma-separated items; a preprocessor
//! directive always ends the current item and is routed to a
//! `ConditionalStack` instead of producing a port. Each remaining item is
//! parsed with:
//!
//! ```text
//! port_item := [direction] [net_type | user_type] [signing] range* IDENT
//! ```
//!
//! An item that is just an identifier inherits direction, type and size from
//! the nearest preceding fully specified port (`input a, b, c`).

use crate::conditional::ConditionalStack;
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::model::{PortDirection, PortRecord};
use crate::options::ParseOptions;
use crate::scan::{collapse_whitespace, Keyword, Token, TokenPayload, TokenScanner};
use indexmap::IndexMap;

const NET_TYPES: &[&str] = &[
    "wire", "reg", "logic", "tri", "wand", "wor", "triand", "trior", "tri0", "tri1", "supply0",
    "supply1", "uwire", "integer", "bit", "var",
];

/// One comma-delimited entry of a port list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PortItem {
    Directive { name: String, arg: String },
    Decl { tokens: Vec<Token>, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PortDecl {
    direction: Option<PortDirection>,
    data_type: Option<String>,
    size: Option<String>,
    name: String,
}

impl PortDecl {
    fn is_qualified(&self) -> bool {
        self.direction.is_some() || self.data_type.is_some() || self.size.is_some()
    }

    fn into_record(self, active_conditionals: Vec<String>) -> PortRecord {
        PortRecord {
            name: self.name,
            direction: self.direction,
            data_type: self.data_type,
            size: self.size,
            active_conditionals,
        }
    }
}

enum ItemMatch {
    Full(PortDecl),
    Bare(String),
    Unrecognized,
}

fn split_port_items(text: &str) -> Vec<PortItem> {
    let mut items = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let flush = |current: &mut Vec<Token>, items: &mut Vec<PortItem>| {
        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let raw = &text[first.span.start.offset..last.span.limit.offset];
            items.push(PortItem::Decl {
                tokens: std::mem::take(current),
                text: collapse_whitespace(raw),
            });
        }
    };
    let mut scanner = TokenScanner::new(text);
    while let Some(tok) = scanner.popt() {
        match tok.payload {
            TokenPayload::Comma => flush(&mut current, &mut items),
            TokenPayload::Directive { name, arg } => {
                flush(&mut current, &mut items);
                items.push(PortItem::Directive { name, arg });
            }
            _ => current.push(tok),
        }
    }
    flush(&mut current, &mut items);
    items
}

fn direction_of(payload: &TokenPayload) -> Option<PortDirection> {
    match payload {
        TokenPayload::Keyword(Keyword::Input) => Some(PortDirection::Input),
        TokenPayload::Keyword(Keyword::Output) => Some(PortDirection::Output),
        TokenPayload::Keyword(Keyword::Inout) => Some(PortDirection::Inout),
        _ => None,
    }
}

/// Consumes consecutive `[ ... ]` ranges starting at `tokens[*i]` and returns
/// their source text with whitespace removed. `Err(())` on an unterminated
/// range.
pub(crate) fn pop_ranges(tokens: &[Token], i: &mut usize, text: &str) -> Result<Option<String>, ()> {
    let mut size = String::new();
    while tokens.get(*i).map(|t| &t.payload) == Some(&TokenPayload::OBrack) {
        let start = tokens[*i].span.start.offset;
        let mut depth = 0usize;
        let mut end = None;
        for (j, tok) in tokens.iter().enumerate().skip(*i) {
            match tok.payload {
                TokenPayload::OBrack => depth += 1,
                TokenPayload::CBrack => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or(())?;
        let raw = &text[start..tokens[end].span.limit.offset];
        size.extend(raw.chars().filter(|c| !c.is_whitespace()));
        *i = end + 1;
    }
    Ok(if size.is_empty() { None } else { Some(size) })
}

fn ident_at(tokens: &[Token], i: usize) -> Option<&str> {
    tokens.get(i).and_then(|t| t.payload.identifier())
}

fn parse_port_decl(tokens: &[Token], text: &str) -> Option<PortDecl> {
    let mut i = 0;
    let direction = tokens.first().and_then(|t| direction_of(&t.payload));
    if direction.is_some() {
        i += 1;
    }

    let mut type_words: Vec<&str> = Vec::new();
    if let Some(word) = ident_at(tokens, i) {
        // A net type keyword, or a user-defined type directly followed by the
        // port name.
        if NET_TYPES.contains(&word) || ident_at(tokens, i + 1).is_some() {
            type_words.push(word);
            i += 1;
        }
    }
    if let Some(word) = ident_at(tokens, i) {
        if word == "signed" || word == "unsigned" {
            type_words.push(word);
            i += 1;
        }
    }
    let data_type = if type_words.is_empty() {
        None
    } else {
        Some(type_words.join(" "))
    };

    let size = pop_ranges(tokens, &mut i, text).ok()?;
    let name = ident_at(tokens, i)?.to_string();
    if i + 1 != tokens.len() {
        return None;
    }
    Some(PortDecl {
        direction,
        data_type,
        size,
        name,
    })
}

fn match_item(tokens: &[Token], text: &str) -> ItemMatch {
    match parse_port_decl(tokens, text) {
        Some(decl) if decl.is_qualified() => ItemMatch::Full(decl),
        Some(decl) => ItemMatch::Bare(decl.name),
        None => ItemMatch::Unrecognized,
    }
}

/// Parses the text between a module header's port-list parentheses.
///
/// Ports are returned in declaration order. Items that fit neither the port
/// grammar nor the bare-identifier rule are reported as
/// `UnrecognizedPort` and skipped.
pub fn parse_port_list(
    module: &str,
    text: &str,
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> IndexMap<String, PortRecord> {
    let mut stack = ConditionalStack::new(options.else_policy);
    let mut ports: IndexMap<String, PortRecord> = IndexMap::new();
    split_port_items(text)
        .into_iter()
        .fold(None, |last_full: Option<PortRecord>, item| match item {
            PortItem::Directive { name, arg } => {
                if stack.apply(&name, &arg).is_err() {
                    diags.report(DiagnosticKind::UnbalancedEndif, module, format!("`{}", name));
                }
                last_full
            }
            PortItem::Decl { tokens, text: item_text } => match match_item(&tokens, text) {
                ItemMatch::Full(decl) => {
                    let port = decl.into_record(stack.snapshot());
                    ports.insert(port.name.clone(), port.clone());
                    Some(port)
                }
                ItemMatch::Bare(name) => {
                    let port = match &last_full {
                        Some(last) => last.renamed(name, stack.snapshot()),
                        None => PortRecord::bare(name, stack.snapshot()),
                    };
                    ports.insert(port.name.clone(), port);
                    last_full
                }
                ItemMatch::Unrecognized => {
                    diags.report(DiagnosticKind::UnrecognizedPort, module, item_text);
                    last_full
                }
            },
        });
    ports
}

/// Applies a non-ANSI body declaration such as `input [3:0] a, b` to ports
/// already named in the header. Returns `false` if `statement` is not a port
/// declaration.
///
/// Only names present in `ports` are updated; their position is kept and
/// their attributes and conditional snapshot are replaced.
pub fn apply_body_port_declaration(
    ports: &mut IndexMap<String, PortRecord>,
    statement: &str,
    active_conditionals: &[String],
) -> bool {
    let items = split_port_items(statement);
    let starts_with_direction = match items.first() {
        Some(PortItem::Decl { tokens, .. }) => tokens
            .first()
            .and_then(|t| direction_of(&t.payload))
            .is_some(),
        _ => false,
    };
    if !starts_with_direction {
        return false;
    }
    let mut last_full: Option<PortRecord> = None;
    for item in items {
        let PortItem::Decl { tokens, .. } = item else {
            continue;
        };
        let port = match match_item(&tokens, statement) {
            ItemMatch::Full(decl) => {
                let port = decl.into_record(active_conditionals.to_vec());
                last_full = Some(port.clone());
                port
            }
            ItemMatch::Bare(name) => match &last_full {
                Some(last) => last.renamed(name, active_conditionals.to_vec()),
                None => continue,
            },
            ItemMatch::Unrecognized => continue,
        };
        if let Some(existing) = ports.get_mut(&port.name) {
            *existing = port;
        }
    }
    true
}
