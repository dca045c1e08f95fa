// SPDX-License-Identifier: Apache-2.0

use crate::conditional::ElsePolicy;

/// First words that rule a body statement out as an instantiation.
pub const RESERVED_STATEMENT_WORDS: &[&str] = &[
    "if",
    "reg",
    "wire",
    "always",
    "end",
    "assign",
    "localparam",
    "initial",
    "generate",
    "case",
    "else",
    "endcase",
    "`assert",
    "(*",
    "{",
];

/// Knobs that adjust how module contents are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// How `` `else `` changes the active conditional set.
    pub else_policy: ElsePolicy,
    /// Whether `localparam` declarations are captured as parameters.
    pub capture_localparams: bool,
    /// Additional first words that disqualify a statement from being an
    /// instantiation.
    pub extra_reserved_words: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            else_policy: ElsePolicy::KeepCondition,
            capture_localparams: false,
            extra_reserved_words: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn is_reserved_word(&self, word: &str) -> bool {
        RESERVED_STATEMENT_WORDS.contains(&word)
            || self.extra_reserved_words.iter().any(|w| w == word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("always", true; "builtin")]
    #[test_case("(*", true; "attribute")]
    #[test_case("if_unit", false; "prefix of builtin is not reserved")]
    #[test_case("my_mod", false; "ordinary identifier")]
    fn test_builtin_reserved_words(word: &str, reserved: bool) {
        assert_eq!(ParseOptions::default().is_reserved_word(word), reserved);
    }

    #[test]
    fn test_extra_words_extend_builtin_set() {
        let options = ParseOptions {
            extra_reserved_words: vec!["function".to_string()],
            ..ParseOptions::default()
        };
        assert!(options.is_reserved_word("function"));
        assert!(options.is_reserved_word("wire"));
    }
}
