use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::path::{Path, PathBuf};

use postervault_config::LibrariesConfig;
use postervault_core::download_library_posters;

use crate::output::{Output, OutputFormat};
use crate::progress::DownloadUi;

pub async fn run_download(
    config_path: &Path,
    save_path: Option<PathBuf>,
    only: Vec<String>,
    output: &Output,
) -> Result<()> {
    output.info("Loading Plex config...");
    let settings = super::load_settings()?;
    let config = LibrariesConfig::load(config_path)?;

    for name in &only {
        if !config.names().any(|n| n == name) {
            return Err(eyre!(
                "Library named \"{}\" not found in {}. Please check the config.yml, and consult the README.",
                name,
                config_path.display()
            ));
        }
    }
    let names: Vec<&str> = config
        .names()
        .filter(|n| only.is_empty() || only.iter().any(|o| o == n))
        .collect();

    if names.is_empty() {
        output.warn(format!(
            "No libraries configured in {}; nothing to download.",
            config_path.display()
        ));
        return Ok(());
    }

    // Default output root mirrors the working directory layout the original
    // tooling used: ./Posters/<Library>/<Name>.png
    let save_root = save_path.unwrap_or_else(|| PathBuf::from("Posters"));

    let conn = super::establish_connection(&settings).await?;

    let ui = DownloadUi::new();
    let mut summaries = Vec::new();
    let mut last_dir: Option<PathBuf> = None;

    for name in names {
        let section = conn.section(name).map_err(|e| eyre!("{e}"))?.clone();
        let bar = ui.library_bar(name);

        let summary =
            download_library_posters(&conn, &section, &save_root, |done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            })
            .await?;

        bar.finish();
        if let Some(dir) = &summary.save_dir {
            last_dir = Some(dir.clone());
        }
        summaries.push(summary);
    }

    match output.format() {
        OutputFormat::Human => {
            for summary in &summaries {
                if summary.total() > 0 {
                    output.info(format!(
                        "{}: {} downloaded, {} without poster, {} failed",
                        summary.library, summary.downloaded, summary.skipped, summary.failed
                    ));
                }
            }
            let failed_total: usize = summaries.iter().map(|s| s.failed).sum();
            if failed_total > 0 {
                output.error(format!(
                    "{} posters failed to download; see the log for details",
                    failed_total
                ));
            }
            match &last_dir {
                Some(dir) => output.success(format!("Saved to {}", dir.display())),
                None => output.info("No posters were downloaded."),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "save_root": save_root.display().to_string(),
                "libraries": summaries
                    .iter()
                    .map(|s| {
                        json!({
                            "library": s.library,
                            "downloaded": s.downloaded,
                            "skipped": s.skipped,
                            "failed": s.failed,
                            "save_dir": s.save_dir.as_ref().map(|d| d.display().to_string()),
                        })
                    })
                    .collect::<Vec<_>>(),
            }));
        }
    }

    Ok(())
}
