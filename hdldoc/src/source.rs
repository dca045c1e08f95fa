// SPDX-License-Identifier: Apache-2.0

//! Source normalization: comment stripping ahead of structural parsing.

/// A single input file: an identifier (usually its path) plus raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Removes `//` line comments and `/* ... */` block comments from `text`.
///
/// Newlines inside block comments are preserved so that line numbers in the
/// normalized text still match the input file. Comment markers inside
/// string literals are left alone. An unterminated block comment runs to the
/// end of the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' | '\n' => in_string = false,
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Line comment; keep the terminating newline.
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = None;
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == Some('*') && c == '/' {
                        break;
                    }
                    prev = Some(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
