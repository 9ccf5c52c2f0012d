//! CLI command implementations.

pub mod classify;
pub mod fields;
pub mod summary;
pub mod tabulate;

use std::path::Path;

use admissions::{Classifier, Engine, EngineConfig};

/// Build an engine from the optional config and rules files.
///
/// `--rules` takes precedence over a `rules_path` in the config file.
pub fn build_engine(
    config: Option<&Path>,
    rules: Option<&Path>,
) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::with_config(config)?;
    if let Some(path) = rules {
        engine = engine.with_classifier(Classifier::from_json_file(path)?);
    }
    Ok(engine)
}

/// Fail early with a readable message when the input file is missing.
pub(crate) fn ensure_exists(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}
