//! Tabulate command - one-, two- or three-field count tables.

use std::fs;
use std::path::PathBuf;

use admissions::{Engine, TabulationRequest, export};
use colored::Colorize;

use super::ensure_exists;
use crate::cli::TableFormat;
use crate::render;

pub fn run(
    mut engine: Engine,
    file: PathBuf,
    row: String,
    col: Option<String>,
    facet: Option<String>,
    format: TableFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let mut request = TabulationRequest::new(row);
    if let Some(col) = col {
        request = request.with_col(col);
    }
    if let Some(facet) = facet {
        request = request.with_facet(facet);
    }
    engine.catalog().validate_selection(&request.fields())?;

    let dataset = engine.load(&file)?;
    let tables = engine.tabulate(&dataset, &request)?;

    let rendered = match format {
        TableFormat::Text => render::table_set(&tables),
        TableFormat::Json => serde_json::to_string_pretty(&tables)? + "\n",
        TableFormat::Csv => {
            let mut buf = Vec::new();
            export::write_table_set_csv(&tables, &mut buf)?;
            String::from_utf8(buf)?
        }
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
