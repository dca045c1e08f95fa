// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use hdldoc::{ElsePolicy, ParseOptions};
use serde::Deserialize;

/// Module resolved as the hierarchy root when neither the command line nor
/// the config names one.
pub const DEFAULT_TOP: &str = "top";

/// Contents of the `[hdldoc]` table in `hdldoc.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    /// Name of the top module.
    pub top: Option<String>,

    /// Directory that HTML output is written to.
    pub output_dir: Option<String>,

    /// Treatment of `` `else `` when recording active conditionals:
    /// `"keep-condition"` or `"negate"`.
    pub else_policy: Option<ElsePolicy>,

    /// Record `localparam` declarations alongside `parameter` ones.
    pub capture_localparams: Option<bool>,

    /// Extra statement-leading words that are never instantiations, e.g.
    /// `task` or `function`.
    pub extra_reserved_words: Option<Vec<String>>,

    /// Path to the Graphviz `dot` binary.
    pub dot_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HdldocToml {
    pub hdldoc: DocConfig,
}

/// Top module from the `--top` flag, else the config, else `DEFAULT_TOP`.
pub fn get_top(matches: &ArgMatches, config: &Option<DocConfig>) -> String {
    if let Some(top) = matches.get_one::<String>("top") {
        top.to_string()
    } else if let Some(top) = config.as_ref().and_then(|c| c.top.clone()) {
        top
    } else {
        DEFAULT_TOP.to_string()
    }
}

/// Output directory from the `--output` flag, else the config.
pub fn get_output_dir(matches: &ArgMatches, config: &Option<DocConfig>) -> Option<String> {
    matches
        .try_get_one::<String>("output")
        .ok()
        .flatten()
        .cloned()
        .or_else(|| config.as_ref().and_then(|c| c.output_dir.clone()))
}

pub fn get_dot_path(config: &Option<DocConfig>) -> Option<String> {
    config.as_ref().and_then(|c| c.dot_path.clone())
}

/// Parse options from the config, with the library defaults for anything
/// unspecified.
pub fn get_parse_options(config: &Option<DocConfig>) -> ParseOptions {
    let mut options = ParseOptions::default();
    if let Some(config) = config {
        if let Some(else_policy) = config.else_policy {
            options.else_policy = else_policy;
        }
        if let Some(capture) = config.capture_localparams {
            options.capture_localparams = capture;
        }
        if let Some(words) = &config.extra_reserved_words {
            options.extra_reserved_words = words.clone();
        }
    }
    options
}
