mod bootstrap;

use anyhow::Result;
use spend_core::settings::{Settings, ViewKind};
use spend_data::analysis::analyze_file;
use spend_ui::app::App;

fn main() -> Result<()> {
    let config = Settings::load()?;

    bootstrap::setup_logging(&config.log_level)?;

    tracing::info!("Grocery Spend v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Merchants: {:?}, View: {:?}, Theme: {}, Average: {}",
        config.merchants.names(),
        config.view,
        config.theme,
        config.show_average
    );

    let csv_path = bootstrap::resolve_csv_path(config.csv_path.clone(), config.view)?;

    let report = match analyze_file(&csv_path, &config.merchants) {
        Ok(report) => report,
        // Missing file, missing columns and an empty selection are reported
        // to the user and end the run normally.
        Err(e) if e.is_reported() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match config.view {
        ViewKind::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ViewKind::Table => {
            tracing::info!("Showing table view");
            App::new(&config.theme, config.show_average).run_table(&report)?;
        }
        ViewKind::Chart => {
            tracing::info!("Showing chart view");
            App::new(&config.theme, config.show_average).run_charts(&report)?;
        }
    }

    Ok(())
}
