// SPDX-License-Identifier: Apache-2.0

//! Locates module declarations in normalized source text.
//!
//! Grammar handled here:
//!
//! ```text
//! module_decl := ("module" | "macromodule") IDENT
//!                [ "#" "(" balanced ")" ] [ "(" balanced ")" ] ";"
//!                body "endmodule"
//! ```
//!
//! Only the header is parsed; the parameter block, port list and body are
//! returned as raw text for the item-level parsers.

use crate::scan::{Keyword, Span, Token, TokenPayload, TokenScanner};

/// Raw pieces of one module declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource<'a> {
    pub name: String,
    /// Text between the parentheses of `#( ... )`, if present.
    pub param_block: Option<&'a str>,
    /// Text between the parentheses of the port list (empty if absent).
    pub port_list: &'a str,
    /// Text between the header's `;` and `endmodule`.
    pub body: &'a str,
    /// Span of the module name.
    pub name_span: Span,
}

fn is_module_keyword(tok: &Token) -> bool {
    matches!(
        tok.payload,
        TokenPayload::Keyword(Keyword::Module) | TokenPayload::Keyword(Keyword::Macromodule)
    )
}

/// Returns every module declaration in `text`, in source order.
///
/// A header that does not fit the grammar is skipped and scanning resumes
/// after its `module` keyword; a declaration with no `endmodule` is dropped.
/// Nested module declarations are not supported: the body runs to the first
/// `endmodule`.
pub fn extract_modules(text: &str) -> Vec<ModuleSource<'_>> {
    let mut scanner = TokenScanner::new(text);
    let mut modules = Vec::new();
    while let Some(tok) = scanner.popt() {
        if !is_module_keyword(&tok) {
            continue;
        }
        match parse_module_header(&mut scanner, text) {
            Ok(module) => modules.push(module),
            Err(message) => {
                log::debug!(
                    "extract_modules: skipping module header @ {}: {}",
                    tok.span.to_human_string(),
                    message
                );
            }
        }
    }
    modules
}

fn parse_module_header<'a>(
    scanner: &mut TokenScanner<'a>,
    text: &'a str,
) -> Result<ModuleSource<'a>, String> {
    let (name, name_span) = match scanner.popt() {
        Some(Token {
            payload: TokenPayload::Identifier(name),
            span,
        }) => (name, span),
        Some(tok) => return Err(format!("expected module name, got '{}'", tok.payload)),
        None => return Err("unexpected end of input, expected module name".to_string()),
    };

    let mut param_block = None;
    if scanner.try_pop(&TokenPayload::Hash).is_some() {
        let open = scanner
            .try_pop(&TokenPayload::OParen)
            .ok_or_else(|| format!("expected '(' after '#' in module {}", name))?;
        let (inner, _) = scanner
            .pop_balanced_parens(&open)
            .ok_or_else(|| format!("unterminated parameter block in module {}", name))?;
        param_block = Some(inner.slice(text));
    }

    let mut port_list = "";
    if let Some(open) = scanner.try_pop(&TokenPayload::OParen) {
        let (inner, _) = scanner
            .pop_balanced_parens(&open)
            .ok_or_else(|| format!("unterminated port list in module {}", name))?;
        port_list = inner.slice(text);
    }

    let semi = scanner
        .try_pop(&TokenPayload::Semi)
        .ok_or_else(|| format!("expected ';' after header of module {}", name))?;

    while let Some(tok) = scanner.popt() {
        if tok.payload == TokenPayload::Keyword(Keyword::Endmodule) {
            return Ok(ModuleSource {
                name,
                param_block,
                port_list,
                body: &text[semi.span.limit.offset..tok.span.start.offset],
                name_span,
            });
        }
    }
    log::warn!("module {} has no endmodule; dropping it", name);
    Err(format!("missing endmodule for module {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_module_with_params_and_ports() {
        let text = "module m #(parameter A=1, parameter B=2) (input a, output b);\n  assign b = a;\nendmodule\n";
        let modules = extract_modules(text);
        assert_eq!(modules.len(), 1);
        let m = &modules[0];
        assert_eq!(m.name, "m");
        assert_eq!(m.param_block, Some("parameter A=1, parameter B=2"));
        assert_eq!(m.port_list, "input a, output b");
        assert_eq!(m.body, "\n  assign b = a;\n");
    }

    #[test]
    fn test_extract_multiple_modules_in_order() {
        let text = "module a(); endmodule\nmodule b(x); wire x; endmodule";
        let names: Vec<String> = extract_modules(text).into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_parens_in_port_list() {
        let text = "module m(input [(W-1):0] a, output b); endmodule";
        let modules = extract_modules(text);
        assert_eq!(modules[0].port_list, "input [(W-1):0] a, output b");
    }

    #[test]
    fn test_module_without_port_list() {
        let modules = extract_modules("module tb; initial begin end endmodule");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].port_list, "");
        assert_eq!(modules[0].body, " initial begin end ");
    }

    #[test]
    fn test_missing_endmodule_yields_nothing() {
        assert!(extract_modules("module m(a); wire a;").is_empty());
    }

    #[test]
    fn test_no_modules_is_silent() {
        assert!(extract_modules("`define X 1\n").is_empty());
    }

    #[test]
    fn test_malformed_header_is_skipped_and_scan_resumes() {
        let text = "module (oops); endmodule\nmodule ok(a); endmodule";
        let modules = extract_modules(text);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "ok");
    }

    #[test]
    fn test_body_runs_to_first_endmodule() {
        let text = "module a(); foo u0 (); endmodule module b(); endmodule";
        let modules = extract_modules(text);
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].body, " foo u0 (); ");
    }
}
