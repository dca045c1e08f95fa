// SPDX-License-Identifier: Apache-2.0

//! Body statement splitting and the submodule-instantiation heuristic.
//!
//! A statement is classified as an instantiation when its surface shape
//! resembles `type_name [#(...)] instance_name ( connections... )`. Callees
//! that name no known module surface later as unresolved.

use crate::conditional::ConditionalStack;
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::model::InstanceRef;
use crate::options::ParseOptions;
use crate::scan::{directive_arity, DirectiveArity, TokenPayload, TokenScanner};

/// One `;`-delimited piece of a module body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Trimmed statement text with directive lines removed.
    pub text: String,
    /// Conditional directives open where the statement begins.
    pub active_conditionals: Vec<String>,
    /// Whether the statement is a `task`/`function` header or lies inside
    /// one. Declarations there are local to the subprogram.
    pub in_subprogram: bool,
}

/// Removes a leading `endtask`/`endfunction` (with an optional `: label`)
/// from `text`. Returns the remaining text and whether a keyword was found.
fn strip_subprogram_end(text: &str) -> (&str, bool) {
    let Some(first) = text.split_whitespace().next() else {
        return (text, false);
    };
    if first != "endtask" && first != "endfunction" {
        return (text, false);
    }
    let mut rest = text[first.len()..].trim_start();
    if let Some(label) = rest.strip_prefix(':') {
        let label = label.trim_start();
        let len = label
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(label.len());
        rest = label[len..].trim_start();
    }
    (rest, true)
}

/// Tracks `task`/`function` nesting across consecutive statements.
#[derive(Default)]
struct SubprogramDepth {
    depth: usize,
}

impl SubprogramDepth {
    fn statement(&mut self, text: &str, active_conditionals: Vec<String>) -> Statement {
        let mut text = text.trim();
        loop {
            let (rest, ended) = strip_subprogram_end(text);
            if !ended {
                break;
            }
            self.depth = self.depth.saturating_sub(1);
            text = rest;
        }
        let opens = matches!(text.split_whitespace().next(), Some("task" | "function"));
        let in_subprogram = opens || self.depth > 0;
        if opens {
            self.depth += 1;
        }
        Statement {
            text: text.to_string(),
            active_conditionals,
            in_subprogram,
        }
    }
}

/// Finds the first compiler directive in `line`, returning the code before it
/// and the directive's name and argument text. Macro references are left in
/// place.
fn split_directive(line: &str) -> (&str, Option<(&str, &str)>) {
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find('`') {
        let at = search_from + rel;
        let rest = &line[at + 1..];
        let word_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let word = &rest[..word_len];
        if let Some(arity) = directive_arity(word) {
            let arg = rest[word_len..].trim();
            let arg = match arity {
                DirectiveArity::Ident => arg.split_whitespace().next().unwrap_or(""),
                DirectiveArity::RestOfLine => arg,
                DirectiveArity::None => "",
            };
            return (&line[..at], Some((word, arg)));
        }
        search_from = at + 1;
    }
    (line, None)
}

/// Splits a module body into statements on `;`.
///
/// Text from a conditional or macro-definition directive to the end of its
/// line is removed; the directive itself updates a `ConditionalStack` whose
/// snapshot is attached to each statement. A leading `endtask` or
/// `endfunction` is dropped from the statement it begins. The trailing text
/// after the last `;` is returned as a final statement.
pub fn split_statements(
    module: &str,
    body: &str,
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> Vec<Statement> {
    let mut stack = ConditionalStack::new(options.else_policy);
    let mut subprograms = SubprogramDepth::default();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut snapshot: Option<Vec<String>> = None;
    for line in body.split('\n') {
        let (code, directive) = split_directive(line);
        for c in code.chars() {
            if c == ';' {
                let active = snapshot.take().unwrap_or_else(|| stack.snapshot());
                statements.push(subprograms.statement(&current, active));
                current.clear();
                continue;
            }
            if snapshot.is_none() && !c.is_whitespace() {
                snapshot = Some(stack.snapshot());
            }
            current.push(c);
        }
        current.push('\n');
        if let Some((name, arg)) = directive {
            if stack.apply(name, arg).is_err() {
                diags.report(DiagnosticKind::UnbalancedEndif, module, format!("`{}", name));
            }
        }
    }
    let active = snapshot.unwrap_or_else(|| stack.snapshot());
    statements.push(subprograms.statement(&current, active));
    statements
}

/// Leading identifier of a whitespace-delimited word, e.g. `my_mod` for
/// `my_mod#(.W(8))`. `None` if the word does not start an identifier.
fn leading_identifier(word: &str) -> Option<&str> {
    if let Some(escaped) = word.strip_prefix('\\') {
        return if escaped.is_empty() { None } else { Some(escaped) };
    }
    let first = word.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let len = word
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(word.len());
    Some(&word[..len])
}

/// Extracts the instance name following the callee and its optional
/// parameter override.
fn instance_name(statement: &str) -> Option<String> {
    let mut scanner = TokenScanner::new(statement);
    // Callee.
    scanner.popt()?;
    if scanner.try_pop(&TokenPayload::Hash).is_some() {
        let open = scanner.try_pop(&TokenPayload::OParen)?;
        scanner.pop_balanced_parens(&open)?;
    }
    match scanner.popt()?.payload {
        TokenPayload::Identifier(name) => Some(name),
        _ => None,
    }
}

/// Classifies one statement. Returns `Some` iff all hold:
///
/// - the statement is non-empty and contains `(`;
/// - its first word is not a reserved word and starts an identifier;
/// - it has more than two whitespace-separated words;
/// - the second word is not `=` or `<=`.
pub fn classify_statement(statement: &Statement, options: &ParseOptions) -> Option<InstanceRef> {
    let text = statement.text.as_str();
    if text.is_empty() || !text.contains('(') {
        return None;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 2 || options.is_reserved_word(words[0]) {
        return None;
    }
    if words[1] == "=" || words[1] == "<=" {
        return None;
    }
    let callee = leading_identifier(words[0])?;
    Some(InstanceRef {
        callee_name: callee.to_string(),
        instance_name: instance_name(text),
        raw_statement_text: text.to_string(),
        active_conditionals: statement.active_conditionals.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn statements(body: &str) -> (Vec<Statement>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let stmts = split_statements("m", body, &ParseOptions::default(), &mut diags);
        (stmts, diags)
    }

    fn scan(body: &str) -> Vec<InstanceRef> {
        let (stmts, _) = statements(body);
        stmts
            .iter()
            .filter_map(|s| classify_statement(s, &ParseOptions::default()))
            .collect()
    }

    #[test]
    fn test_always_block_is_not_an_instance() {
        assert!(scan("always @(posedge clk) begin x <= y; end").is_empty());
    }

    #[test]
    fn test_named_instance() {
        let found = scan("my_mod u_my_mod (.a(a), .b(b));");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].callee_name, "my_mod");
        assert_eq!(found[0].instance_name.as_deref(), Some("u_my_mod"));
        assert_eq!(found[0].raw_statement_text, "my_mod u_my_mod (.a(a), .b(b))");
    }

    #[test]
    fn test_parameter_override_attached_to_callee() {
        let found = scan("fifo#(.DEPTH(8)) u_fifo (.clk(clk));");
        assert_eq!(found[0].callee_name, "fifo");
        assert_eq!(found[0].instance_name.as_deref(), Some("u_fifo"));
    }

    #[test_case("assign x = f(y)"; "continuous assignment")]
    #[test_case("x = f(y)"; "blocking assignment")]
    #[test_case("x <= f(y)"; "nonblocking assignment")]
    #[test_case("if (a) b <= c"; "reserved first word")]
    #[test_case("wire [3:0] w = f(a)"; "wire declaration")]
    #[test_case("u0 (a)"; "too few words")]
    #[test_case("foo bar baz"; "no paren")]
    #[test_case("2'b01: x = f(a)"; "case label")]
    fn test_non_instances(body: &str) {
        assert!(scan(body).is_empty());
    }

    #[test]
    fn test_extra_reserved_words() {
        let options = ParseOptions {
            extra_reserved_words: vec!["task".to_string()],
            ..ParseOptions::default()
        };
        let stmt = Statement {
            text: "task automatic go (input a)".to_string(),
            active_conditionals: vec![],
            in_subprogram: true,
        };
        assert!(classify_statement(&stmt, &ParseOptions::default()).is_some());
        assert!(classify_statement(&stmt, &options).is_none());
    }

    #[test]
    fn test_directive_lines_are_stripped_and_tracked() {
        let body = "\n`ifdef SIM\n  sim_model u_sim (.a(a));\n`else\n  real_model u_real (.a(a));\n`endif\n  other u_o (.a(a));\n";
        let found = scan(body);
        let callees: Vec<&str> = found.iter().map(|i| i.callee_name.as_str()).collect();
        assert_eq!(callees, vec!["sim_model", "real_model", "other"]);
        assert_eq!(found[0].active_conditionals, vec!["`ifdef SIM"]);
        assert_eq!(found[1].active_conditionals, vec!["`ifdef SIM"]);
        assert!(found[2].active_conditionals.is_empty());
        assert!(!found[0].raw_statement_text.contains('`'));
    }

    #[test]
    fn test_trailing_text_is_a_statement() {
        let (stmts, _) = statements("a u0 (b);\n  end\n");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].text, "end");
    }

    #[test_case("`include \"defs.vh\""; "include")]
    #[test_case("`default_nettype none"; "default nettype")]
    #[test_case("`timescale 1ns/1ps"; "timescale")]
    #[test_case("`pragma protect"; "pragma")]
    #[test_case("`resetall"; "resetall")]
    fn test_instance_after_directive_line(directive: &str) {
        let body = format!("\n{}\n  sub u0 (.a(a));\n", directive);
        let found = scan(&body);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].callee_name, "sub");
        assert_eq!(found[0].raw_statement_text, "sub u0 (.a(a))");
    }

    #[test]
    fn test_macro_reference_is_kept() {
        let (stmts, _) = statements("w #(.N(`WIDTH)) u0 (.a(a));");
        assert_eq!(stmts[0].text, "w #(.N(`WIDTH)) u0 (.a(a))");
    }

    #[test]
    fn test_subprogram_nesting() {
        let body = "\n  task t;\n    input q;\n  endtask\n  input r;\n  function [7:0] f;\n    input a;\n    f = a;\n  endfunction : f\n  sub u0 (.a(a));\n";
        let (stmts, _) = statements(body);
        let flags: Vec<(&str, bool)> = stmts
            .iter()
            .map(|s| (s.text.as_str(), s.in_subprogram))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("task t", true),
                ("input q", true),
                ("input r", false),
                ("function [7:0] f", true),
                ("input a", true),
                ("f = a", true),
                ("sub u0 (.a(a))", false),
                ("", false),
            ]
        );
    }

    #[test]
    fn test_unbalanced_endif_in_body() {
        let (_, diags) = statements("`endif\nfoo u (a);");
        assert_eq!(diags.of_kind(DiagnosticKind::UnbalancedEndif).count(), 1);
    }

    #[test]
    fn test_split_directive_mid_line() {
        assert_eq!(
            split_directive("wire a; `ifdef X extra"),
            ("wire a; ", Some(("ifdef", "X")))
        );
        assert_eq!(split_directive("x = `W;"), ("x = `W;", None));
    }
}
