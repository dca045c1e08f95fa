// SPDX-License-Identifier: Apache-2.0

//! Command line driver that documents a Verilog design.
//!
//! Commands are given like:
//!
//! ```text
//! hdldoc-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - html: Writes a browsable multi-page HTML site for the design.
//! - markdown: Prints a flat Markdown dump of every module's interface.
//! - tree: Prints the instantiation hierarchy below the top module.
//! - json: Prints every extracted module record as JSON.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- html rtl/*.v --top cpu_top --output docs/
//! $ cargo run -- --config=hdldoc.toml tree rtl/*.v
//! ```

mod common;
mod doc_config;
mod hierarchy;
mod html;
mod json;
mod markdown;
mod report_cli_error;
mod tools;

use crate::doc_config::{DocConfig, HdldocToml};
use clap::{Arg, ArgAction};
use report_cli_error::report_cli_error_and_exit;

trait AppExt {
    fn add_design_input_args(self) -> Self;
    fn add_top_arg(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_design_input_args(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("files")
                .help("Verilog source files, in processing order")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append),
        )
    }

    fn add_top_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("top")
                .long("top")
                .value_name("TOP")
                .help("Top module of the hierarchy (falls back to rio, then top)")
                .action(ArgAction::Set),
        )
    }
}

/// Reads the config named by `--config`, else `hdldoc.toml` in the current
/// directory if there is one.
fn load_config(matches: &clap::ArgMatches) -> Option<DocConfig> {
    let mut toml_path: Option<std::path::PathBuf> = matches
        .get_one::<String>("config")
        .map(std::path::PathBuf::from);

    if toml_path.is_none() {
        let cwd_toml_path = std::path::PathBuf::from("hdldoc.toml");
        if cwd_toml_path.is_file() {
            log::info!("Using hdldoc.toml in current directory");
            toml_path = Some(cwd_toml_path);
        }
    }

    let path = toml_path?;
    let path_str = path.display().to_string();
    if !path.exists() {
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        report_cli_error_and_exit(
            "config toml file does not exist",
            None,
            vec![("path", &path_str), ("working directory", &cwd)],
        );
    }
    let toml_str = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => report_cli_error_and_exit(
            "could not read config toml file",
            None,
            vec![("path", &path_str), ("error", &e.to_string())],
        ),
    };
    match toml::from_str::<HdldocToml>(&toml_str) {
        Ok(parsed) => Some(parsed.hdldoc),
        Err(e) => report_cli_error_and_exit(
            "could not parse config toml file",
            None,
            vec![("path", &path_str), ("error", &e.to_string())],
        ),
    }
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    log::info!(
        "hdldoc-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("hdldoc-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Documentation generator for Verilog designs")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a hdldoc.toml file")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("html")
                .about("Writes HTML documentation for the design")
                .add_design_input_args()
                .add_top_arg()
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory (default: directory of the top module's file)")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("markdown")
                .about("Prints Markdown documentation for the design")
                .add_design_input_args()
                .add_top_arg(),
        )
        .subcommand(
            clap::Command::new("tree")
                .about("Prints the module instantiation hierarchy")
                .add_design_input_args()
                .add_top_arg(),
        )
        .subcommand(
            clap::Command::new("json")
                .about("Prints the extracted module records as JSON")
                .add_design_input_args(),
        )
        .get_matches();

    let config = load_config(&matches);

    match matches.subcommand() {
        Some(("html", sub)) => html::handle_html(sub, &config),
        Some(("markdown", sub)) => markdown::handle_markdown(sub, &config),
        Some(("tree", sub)) => hierarchy::handle_tree(sub, &config),
        Some(("json", sub)) => json::handle_json(sub, &config),
        Some(("version", _)) => println!("{}", env!("CARGO_PKG_VERSION")),
        _ => report_cli_error_and_exit("No valid subcommand provided.", None, vec![]),
    }
}
