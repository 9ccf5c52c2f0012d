//! Classify command - write the data file with derived category fields.

use std::path::PathBuf;

use admissions::{Engine, RecordFormat, export};
use colored::Colorize;
use tracing::debug;

use super::ensure_exists;

pub fn run(
    mut engine: Engine,
    file: PathBuf,
    output: Option<PathBuf>,
    format: RecordFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    println!(
        "{} {}",
        "Classifying".cyan().bold(),
        file.display().to_string().white()
    );

    let dataset = engine.load(&file)?;

    if verbose {
        println!();
        println!("{}", "Derived fields:".yellow().bold());
        for set in engine.classifier().rule_sets() {
            println!("  {:20} <- {}", set.target(), set.source());
        }
        println!();
    }

    let output_path = output.unwrap_or_else(|| {
        let stem = file.file_stem().unwrap_or_default().to_string_lossy();
        file.with_file_name(format!("{}_classified.{}", stem, format.extension()))
    });

    debug!(
        output = %output_path.display(),
        format = format.extension(),
        "writing classified records"
    );
    export::save_records(&dataset.records, &output_path, format)?;

    println!(
        "Classified {} records",
        dataset.records.len().to_string().white().bold()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
