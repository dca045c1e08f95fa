// SPDX-License-Identifier: Apache-2.0

//! Tracking of nested `` `ifdef ``/`` `ifndef `` regions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What `` `else `` (and `` `elsif ``) does to the innermost open
/// conditional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElsePolicy {
    /// Leave the stack untouched: items in an `` `else `` branch still report
    /// the opening `` `ifdef ``/`` `ifndef `` condition.
    #[default]
    KeepCondition,
    /// Replace the innermost entry with its negation (`` `ifdef X `` becomes
    /// `` `ifndef X ``); `` `elsif Y `` replaces it with `` `elsif Y ``.
    Negate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalError {
    /// `` `endif `` with no open conditional.
    UnbalancedEndif,
}

impl fmt::Display for ConditionalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalError::UnbalancedEndif => write!(f, "`endif without matching `ifdef/`ifndef"),
        }
    }
}

impl std::error::Error for ConditionalError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalStack {
    open: Vec<String>,
    else_policy: ElsePolicy,
}

impl ConditionalStack {
    pub fn new(else_policy: ElsePolicy) -> Self {
        Self {
            open: Vec::new(),
            else_policy,
        }
    }

    /// Applies directive `name` (without the backtick) with argument text
    /// `arg`. Directives that do not open or close a conditional region are
    /// ignored.
    pub fn apply(&mut self, name: &str, arg: &str) -> Result<(), ConditionalError> {
        match name {
            "ifdef" | "ifndef" => {
                self.open.push(directive_text(name, arg));
                Ok(())
            }
            "endif" => self
                .open
                .pop()
                .map(|_| ())
                .ok_or(ConditionalError::UnbalancedEndif),
            "else" => {
                if self.else_policy == ElsePolicy::Negate {
                    if let Some(top) = self.open.last_mut() {
                        *top = negate(top);
                    }
                }
                Ok(())
            }
            "elsif" => {
                if self.else_policy == ElsePolicy::Negate {
                    if let Some(top) = self.open.last_mut() {
                        *top = directive_text(name, arg);
                    }
                }
                Ok(())
            }
            _ => {
                log::debug!("ConditionalStack: ignoring directive `{}", name);
                Ok(())
            }
        }
    }

    /// Copy of the currently open directives, outermost first.
    pub fn snapshot(&self) -> Vec<String> {
        self.open.clone()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

fn directive_text(name: &str, arg: &str) -> String {
    if arg.is_empty() {
        format!("`{}", name)
    } else {
        format!("`{} {}", name, arg)
    }
}

fn negate(entry: &str) -> String {
    if let Some(rest) = entry.strip_prefix("`ifdef") {
        format!("`ifndef{}", rest)
    } else if let Some(rest) = entry.strip_prefix("`ifndef") {
        format!("`ifdef{}", rest)
    } else {
        entry.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_and_pop() {
        let mut stack = ConditionalStack::new(ElsePolicy::KeepCondition);
        stack.apply("ifdef", "A").unwrap();
        stack.apply("ifndef", "B").unwrap();
        assert_eq!(stack.snapshot(), vec!["`ifdef A", "`ifndef B"]);
        stack.apply("endif", "").unwrap();
        assert_eq!(stack.snapshot(), vec!["`ifdef A"]);
        stack.apply("endif", "").unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_else_keeps_condition_by_default() {
        let mut stack = ConditionalStack::default();
        stack.apply("ifdef", "A").unwrap();
        stack.apply("else", "").unwrap();
        assert_eq!(stack.snapshot(), vec!["`ifdef A"]);
    }

    #[test]
    fn test_else_negates_under_negate_policy() {
        let mut stack = ConditionalStack::new(ElsePolicy::Negate);
        stack.apply("ifdef", "A").unwrap();
        stack.apply("else", "").unwrap();
        assert_eq!(stack.snapshot(), vec!["`ifndef A"]);
        stack.apply("endif", "").unwrap();
        stack.apply("ifndef", "B").unwrap();
        stack.apply("else", "").unwrap();
        assert_eq!(stack.snapshot(), vec!["`ifdef B"]);
    }

    #[test]
    fn test_elsif_under_each_policy() {
        let mut keep = ConditionalStack::new(ElsePolicy::KeepCondition);
        keep.apply("ifdef", "A").unwrap();
        keep.apply("elsif", "B").unwrap();
        assert_eq!(keep.snapshot(), vec!["`ifdef A"]);

        let mut negate = ConditionalStack::new(ElsePolicy::Negate);
        negate.apply("ifdef", "A").unwrap();
        negate.apply("elsif", "B").unwrap();
        assert_eq!(negate.snapshot(), vec!["`elsif B"]);
    }

    #[test]
    fn test_unbalanced_endif_is_an_error_and_stack_stays_usable() {
        let mut stack = ConditionalStack::default();
        assert_eq!(stack.apply("endif", ""), Err(ConditionalError::UnbalancedEndif));
        stack.apply("ifdef", "A").unwrap();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_unrelated_directives_are_ignored() {
        let mut stack = ConditionalStack::default();
        stack.apply("define", "W 8").unwrap();
        stack.apply("include", "\"x.vh\"").unwrap();
        assert!(stack.is_empty());
    }
}
