mod bootstrap;

use anyhow::{Context, Result};
use tdl_chart::{ChartKind, ChartOptions, ChartRenderer};
use tdl_core::formatting::format_summary;
use tdl_core::settings::Settings;
use tdl_data::reader::load_run;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("tdl-plot v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Format: {}, size: {}x{}",
        settings.format,
        settings.width,
        settings.height
    );

    run(&settings)
}

/// Parse the input log, then dump, render or summarise it.
///
/// The whole log is parsed before anything is written, so a parse error never
/// leaves a partial chart behind.
fn run(settings: &Settings) -> Result<()> {
    let log = load_run(&settings.input)
        .with_context(|| format!("failed to load {}", settings.input.display()))?;

    if settings.dump {
        println!("{}", serde_json::to_string_pretty(&log)?);
    }

    match settings.output.as_deref() {
        Some(base) => {
            let kind: ChartKind = settings.format.parse()?;
            let renderer = ChartRenderer::new(ChartOptions {
                kind,
                width: settings.width,
                height: settings.height,
            })?;
            let written = renderer
                .render_all(&log, base)
                .context("failed to render charts")?;
            tracing::info!("Wrote {} charts", written.len());
        }
        None if !settings.dump => println!("{}", format_summary(&log)),
        None => {}
    }

    Ok(())
}
