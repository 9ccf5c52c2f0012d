//! Summary command - distributions of every catalog field.

use std::path::PathBuf;

use admissions::Engine;
use colored::Colorize;

use super::ensure_exists;
use crate::render;

pub fn run(
    mut engine: Engine,
    file: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let dataset = engine.load(&file)?;
    let summary = engine.summarize(&dataset)?;
    let overview = engine.overview(&dataset)?;

    if json {
        let report = serde_json::json!({
            "file": dataset.source.as_ref().map(|s| s.file.clone()),
            "hash": dataset.key,
            "summary": summary,
            "distributions": overview,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({} records)",
        "Summary for".cyan().bold(),
        file.display().to_string().white(),
        summary.records.to_string().white().bold()
    );

    for (field, table) in summary.fields.iter().zip(&overview) {
        println!();
        println!(
            "{} {}",
            field.label.yellow().bold(),
            format!("({} values, {} missing)", field.distinct, field.nulls).dimmed()
        );
        print!("{}", render::frequency(table));
    }

    Ok(())
}
