// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod api;
mod cli;
mod config;
mod error;
mod range;
mod report;
mod status;
mod types;
mod ui;

use api::{FileStatusClient, HttpStatusClient, StatusClient};
use cli::{Cli, Command, StatusArgs};
use error::StatusError;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    let exit_code = match cli.command {
        Command::Status(args) => run_status(&args),
        Command::Ranges { indices } => run_ranges(&indices),
    };

    std::process::exit(exit_code);
}

/// Query (or load) the task status and print the report
fn run_status(args: &StatusArgs) -> i32 {
    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        return 1;
    }

    let config = match config::build_status_config(args) {
        Ok(c) => c,
        Err(e) => {
            ui::print_error(&e.to_string());
            return e.exit_code();
        }
    };

    let client: Box<dyn StatusClient> = match &config.offline {
        Some(offline) => Box::new(FileStatusClient::new(offline.summary.clone(), offline.errors.clone())),
        None => Box::new(HttpStatusClient::new(&config.server, &config.api, config.timeout)),
    };

    let flags = args.detail_flags();

    // Plain text needs only the rendered lines
    if !args.json && args.output_json.is_none() {
        return match status::fetch_and_render(client.as_ref(), &config.task, &flags) {
            Ok(lines) => {
                ui::print_report(&lines);
                0
            }
            Err(e) => {
                ui::print_error(&e.to_string());
                e.exit_code()
            }
        };
    }

    let summary = match status::fetch_report(client.as_ref(), &config.task, &flags) {
        Ok(s) => s,
        Err(e) => {
            ui::print_error(&e.to_string());
            return e.exit_code();
        }
    };

    if let Some(ref path) = args.output_json {
        match report::export_json_summary(&summary, &config.task, path) {
            Ok(_) => log::info!("JSON summary saved to: {}", path.display()),
            Err(e) => {
                let e = StatusError::from(e);
                ui::print_error(&format!("Failed to save JSON summary: {}", e));
                return e.exit_code();
            }
        }
    }

    let printed = if args.json {
        report::print_json_summary(&summary, &config.task)
    } else {
        ui::print_report(&report::render_summary(&summary));
        ui::print_report(&report::server_message_lines(&summary.server_messages));
        Ok(())
    };
    if let Err(e) = printed {
        ui::print_error(&e.to_string());
        return e.exit_code();
    }

    0
}

/// Print job indices in compact range notation
fn run_ranges(indices: &[String]) -> i32 {
    match range::parse_indices(indices) {
        Ok(jobs) if !jobs.is_empty() => {
            println!("{}", range::readable_range(&jobs));
            0
        }
        Ok(_) => {
            ui::print_error("No job indices given");
            1
        }
        Err(e) => {
            ui::print_error(&e);
            1
        }
    }
}
