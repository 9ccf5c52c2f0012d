//! Admissions CLI - classify and cross-tabulate admission records.

mod cli;
mod commands;
mod logging;
mod render;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let engine = match commands::build_engine(cli.config.as_deref(), cli.rules.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Fields { json } => commands::fields::run(&engine, json),

        Commands::Classify {
            file,
            output,
            format,
        } => commands::classify::run(engine, file, output, format, cli.verbose),

        Commands::Tabulate {
            file,
            row,
            col,
            facet,
            format,
            output,
        } => commands::tabulate::run(engine, file, row, col, facet, format, output),

        Commands::Summary { file, json } => commands::summary::run(engine, file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
