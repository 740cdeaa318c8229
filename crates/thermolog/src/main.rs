mod bootstrap;

use std::io::Write;

use anyhow::{Context, Result};
use thermolog_core::settings::{ReportConfig, Settings};
use thermolog_data::dataset::{AppendOutcome, ThermostatLog};
use thermolog_data::export;
use thermolog_data::reader::collect_report_paths;
use thermolog_data::summary::{SummaryBuilder, SummaryTable};

fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;
    tracing::debug!("thermolog v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.init_config {
        return init_config(&settings);
    }

    let config = settings.report_config()?;
    let paths = collect_report_paths(&settings.inputs);
    if paths.is_empty() {
        anyhow::bail!("no reports found in the given inputs");
    }

    let mut log = ThermostatLog::new();
    let mut failed = 0usize;
    for (path, result) in log.append_all(&paths, &config) {
        match result {
            Ok(AppendOutcome::Appended {
                rows,
                first_day,
                last_day,
            }) => tracing::info!(
                "{}: {} rows, days {}..={}",
                path.display(),
                rows,
                first_day,
                last_day
            ),
            Ok(AppendOutcome::Skipped) => {}
            Err(_) => failed += 1,
        }
    }
    tracing::info!(
        "Merged {} of {} reports into {} records",
        log.files_appended(),
        paths.len(),
        log.len()
    );
    if failed > 0 && log.is_empty() {
        anyhow::bail!("none of the {} reports could be read", paths.len());
    }

    let summary = SummaryBuilder::summarize(&log);
    let rendered = render(&settings, &summary)?;

    match &settings.output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("while writing {}", path.display()))?,
        None => std::io::stdout().lock().write_all(&rendered)?,
    }

    Ok(())
}

fn init_config(settings: &Settings) -> Result<()> {
    let path = match &settings.config {
        Some(path) => path.clone(),
        None => {
            bootstrap::ensure_directories()?;
            ReportConfig::config_path()
        }
    };
    ReportConfig::default().save_to(&path)?;
    println!("Wrote default report configuration to {}", path.display());
    Ok(())
}

fn render(settings: &Settings, summary: &SummaryTable) -> Result<Vec<u8>> {
    let bands = settings
        .bands
        .then(|| summary.temperature_bands(settings.band_width));

    match settings.format.as_str() {
        "csv" => {
            if bands.is_some() {
                tracing::warn!("Temperature bands are not included in CSV output");
            }
            let mut buf = Vec::new();
            export::write_csv(summary, &mut buf)?;
            Ok(buf)
        }
        "json" => {
            let json = match bands {
                Some(bands) => serde_json::to_string_pretty(&serde_json::json!({
                    "days": summary,
                    "bands": bands,
                }))?,
                None => export::to_json(summary)?,
            };
            Ok(json.into_bytes())
        }
        _ => {
            let mut text = export::render_table(summary);
            if let Some(bands) = bands {
                text.push('\n');
                text.push_str(&export::render_bands(&bands));
            }
            Ok(text.into_bytes())
        }
    }
}
