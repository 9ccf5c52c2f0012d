//! Fields command - list the field catalog.

use admissions::Engine;
use colored::Colorize;

pub fn run(engine: &Engine, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = engine.catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    println!("{}", "Selectable fields:".cyan().bold());
    for spec in catalog.iter() {
        print!("  {:24} {}", spec.id.white().bold(), spec.label);
        if let Some(order) = &spec.canonical_order {
            print!("  {}", format!("[{}]", order.join(", ")).dimmed());
        }
        println!();
    }
    println!();
    println!(
        "Select up to {} fields per table: row, column, facet.",
        admissions::MAX_SELECTED_FIELDS
    );

    Ok(())
}
