/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Provides the 'osm-road-completeness' cmdline tool.

use osm_road_completeness::context;
use std::collections::HashMap;
use std::io::Write;

type Handler = fn(&[String], &mut dyn Write, &context::Context) -> i32;

/// Sets up logging to the terminal and to workdir/pipeline.log.
fn setup_logging(ctx: &context::Context) -> anyhow::Result<()> {
    let mut builder = simplelog::ConfigBuilder::new();
    builder.set_time_format_custom(simplelog::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));
    // UTC if the local offset is unknown.
    let _ = builder.set_time_offset_to_local();
    let config = builder.build();
    let logpath = ctx.get_abspath("workdir/pipeline.log");
    if let Some(parent) = std::path::Path::new(&logpath).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&logpath)?;
    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            simplelog::LevelFilter::Info,
            config.clone(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Never,
        ),
        simplelog::WriteLogger::new(simplelog::LevelFilter::Info, config, file),
    ])?;
    Ok(())
}

fn with_logging(ctx: &context::Context) {
    if let Err(err) = setup_logging(ctx) {
        eprintln!("failed to set up logging: {err:?}");
    }
}

fn run_main(args: &[String], stream: &mut dyn Write, ctx: &context::Context) -> i32 {
    with_logging(ctx);
    osm_road_completeness::pipeline::main(args, stream, ctx)
}

fn report_main(args: &[String], stream: &mut dyn Write, ctx: &context::Context) -> i32 {
    with_logging(ctx);
    osm_road_completeness::report::main(args, stream, ctx)
}

lazy_static::lazy_static! {
    static ref HANDLERS: HashMap<String, Handler> = {
        let mut ret: HashMap<String, Handler> = HashMap::new();
        ret.insert("run".into(), run_main);
        ret.insert("report".into(), report_main);
        ret.insert("validate".into(), osm_road_completeness::validator::main);
        ret
    };
}

fn main() {
    let mut args: Vec<String> = std::env::args().collect();
    let ctx = match context::Context::new("") {
        Ok(value) => value,
        Err(err) => {
            eprintln!("failed to create the context: {err:?}");
            std::process::exit(1);
        }
    };
    let run = clap::Command::new("run")
        .about("Runs the pipeline and writes the table, GeoJSON and summary exports");
    let report = clap::Command::new("report").about("Prints a data quality report of a run");
    let validate = clap::Command::new("validate").about("Validates the name table under data/");
    let subcommands = vec![run, report, validate];
    let app = clap::Command::new("osm-road-completeness").subcommand_required(true);
    // Arguments after the subcommand are parsed by the handler.
    let argv: Vec<String> = args.iter().take(2).cloned().collect();
    let matches = app
        .subcommands(subcommands)
        .try_get_matches_from(&argv)
        .unwrap_or_else(|e| e.exit());
    args.remove(1);
    let handler = matches
        .subcommand_name()
        .and_then(|name| HANDLERS.get(name));
    let handler: &Handler = match handler {
        Some(value) => value,
        None => {
            eprintln!("unknown subcommand");
            std::process::exit(1);
        }
    };

    std::process::exit(handler(&args, &mut std::io::stdout(), &ctx))
}
