// SPDX-License-Identifier: Apache-2.0

use crate::common::load_design;
use crate::doc_config::{get_parse_options, DocConfig};
use crate::report_cli_error::{report_cli_error_and_exit, report_diagnostic_summary};
use clap::ArgMatches;

/// Prints every module record, keyed by module name, as pretty JSON.
pub fn handle_json(matches: &ArgMatches, config: &Option<DocConfig>) {
    log::info!("handle_json");
    let design = load_design(matches, "json", &get_parse_options(config));
    report_diagnostic_summary("json", &design.diags);
    match serde_json::to_string_pretty(&design.registry) {
        Ok(text) => println!("{}", text),
        Err(e) => report_cli_error_and_exit(&e.to_string(), Some("json"), vec![]),
    }
}
