//! The `casework` command-line interface.

use std::path::PathBuf;

use clap::Parser;
use miette::IntoDiagnostic;
use termcolor::{ColorChoice, StandardStream};

use crate::cli::args::{CaseworkArgs, Command};
use crate::config::RunConfig;
use crate::test::Runner;

pub mod args;
pub mod output;
pub mod selfcheck;

/// Parses arguments, runs the command, and returns the process exit code.
pub fn run() -> i32 {
    let args = CaseworkArgs::parse();
    let result = match args.command {
        Command::Selfcheck {
            filter,
            config,
            json,
            no_color,
            fail_fast,
        } => handle_selfcheck(SelfcheckOptions {
            filter,
            config,
            json,
            no_color,
            fail_fast,
        }),
    };
    match result {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            1
        }
    }
}

struct SelfcheckOptions {
    filter: Option<String>,
    config: Option<PathBuf>,
    json: bool,
    no_color: bool,
    fail_fast: bool,
}

/// Exit code 1 if any case failed or was misconfigured.
fn handle_selfcheck(options: SelfcheckOptions) -> miette::Result<i32> {
    let mut config = match &options.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(filter) = options.filter {
        config.filter = Some(filter);
    }
    if options.no_color {
        config.use_colors = false;
    }
    config.fail_fast |= options.fail_fast;

    let color = if config.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let runner = Runner::new(config)?.with_globals(selfcheck::globals());
    let report = runner.run(&selfcheck::suite())?;

    if options.json {
        println!("{}", output::render_json(&report).into_diagnostic()?);
    } else {
        let mut stdout = StandardStream::stdout(color);
        output::write_report(&mut stdout, &report).into_diagnostic()?;
    }
    Ok(i32::from(report.summary().has_failures()))
}
