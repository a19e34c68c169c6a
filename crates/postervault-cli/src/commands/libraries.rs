use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Table;
use serde_json::json;
use std::path::Path;

use postervault_config::LibrariesConfig;

use crate::output::{Output, OutputFormat};

pub async fn run_libraries(
    config_path: &Path,
    check_collections: bool,
    output: &Output,
) -> Result<()> {
    let settings = super::load_settings()?;
    let config = LibrariesConfig::load(config_path)?;

    if config.is_empty() {
        output.warn(format!(
            "No libraries configured in {}.",
            config_path.display()
        ));
        return Ok(());
    }

    if check_collections {
        let outcome = config.load_collections();
        for err in &outcome.errors {
            output.warn(format!(
                "{} (library \"{}\"): {}",
                err.file.display(),
                err.library,
                err.message
            ));
        }
        output.info(format!(
            "Collection configs: {} libraries loaded, {} files with errors",
            outcome.collections.len(),
            outcome.errors.len()
        ));
    }

    let conn = super::establish_connection(&settings).await?;

    let mut rows = Vec::new();
    for name in config.names() {
        let section = conn.section(name).map_err(|e| eyre!("{e}"))?;
        let count = conn.library_items(section).await?.len();
        rows.push((name.to_string(), section.type_.clone(), count));
    }

    match output.format() {
        OutputFormat::Human => {
            output.println(format!(
                "Found Plex libraries: {}",
                rows.iter()
                    .map(|(name, _, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));

            let mut table = Table::new();
            table.set_header(vec!["Library", "Type", "Items"]);
            for (name, type_, count) in &rows {
                table.add_row(vec![name.clone(), type_.clone(), count.to_string()]);
            }
            output.println(table.to_string());
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "libraries": rows
                    .iter()
                    .map(|(name, type_, count)| {
                        json!({"name": name, "type": type_, "items": count})
                    })
                    .collect::<Vec<_>>(),
            }));
        }
    }

    Ok(())
}
