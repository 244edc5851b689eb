use anyhow::{Context, Result};

/// The built-in rule catalog as pretty-printed JSON.
pub fn ontology_json() -> Result<String> {
    let ontology = vizscan_core::rules::registry().export_ontology();
    serde_json::to_string_pretty(&ontology).context("Failed to serialize rule ontology")
}

/// Print the full rule catalog (`--help-scoring`).
pub fn help_scoring_command() -> Result<()> {
    println!("{}", ontology_json()?);
    Ok(())
}
