mod bootstrap;

use anyhow::{Context, Result};

use viewing_core::selection::{AnalysisKind, Selection};
use viewing_core::settings::{LastUsedParams, Settings};
use viewing_runtime::export;
use viewing_runtime::session::ViewingSession;
use viewing_ui::app::{restore_terminal, App};
use viewing_ui::chart_view;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let one_shot = settings.analysis.is_some();
    // The TUI owns the terminal, so its logs always go to a file.
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| (!one_shot).then(bootstrap::default_log_file));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Viewing Activity v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Timezone: {}, Theme: {}, Mode: {}",
        settings.timezone,
        settings.theme,
        if one_shot { "one-shot" } else { "interactive" }
    );

    let input = bootstrap::resolve_input(&settings)?;
    let session = ViewingSession::open(&input, &settings.timezone)
        .with_context(|| format!("failed to load {}", input.display()))?;

    let stats = session.stats();
    tracing::info!(
        rows = stats.rows_read,
        supplemental = stats.supplemental_dropped,
        short = stats.short_dropped,
        kept = stats.kept,
        "loaded {}",
        input.display()
    );

    remember_input(&settings, &input);

    let selection = settings.selection()?;

    if let Some(kind) = settings.analysis_kind() {
        return run_once(&session, kind?, &selection, &settings);
    }

    let timezones = bootstrap::load_time_zone_choices(&settings.time_zones_file);
    let mut app = App::new(session, &settings.theme, timezones, bootstrap::exports_dir());
    app.preselect(&selection);

    // The loop exits on 'q' / Ctrl+C inside the TUI. We also listen for
    // Ctrl+C at the OS level so a signal received in raw mode still restores
    // the terminal.
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            restore_terminal()?;
        }
    }

    Ok(())
}

/// Run one analysis and print it, or write it to `--output`.
fn run_once(
    session: &ViewingSession,
    kind: AnalysisKind,
    selection: &Selection,
    settings: &Settings,
) -> Result<()> {
    let chart = session
        .chart_strict(kind, selection)
        .with_context(|| format!("cannot run {kind}"))?;

    if let Some(path) = &settings.output {
        export::write_json(&chart, path)?;
        println!("Wrote {}", path.display());
    } else if settings.json {
        println!("{}", export::chart_to_json(&chart)?);
    } else {
        for line in chart_view::text_report(&chart) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Persist the resolved export file so the next start can reuse it.
fn remember_input(settings: &Settings, input: &std::path::Path) {
    let mut params = LastUsedParams::from(settings);
    params.file = Some(input.to_path_buf());
    if let Err(e) = params.save() {
        tracing::warn!(error = %e, "could not save last used parameters");
    }
}
