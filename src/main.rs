mod app;
use flashcards_app::*;

use app::MyApp;
use config::{AppConfig, CONFIG_FILE};
use database::db::{get_all_cards, init_database, seed_default_cards, sync_progress};
use generator::LocalTemplateGenerator;
use log::{LevelFilter, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::initialize(LevelFilter::Info);
    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE));

    let conn = match open_store(&config) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "Failed to open card store at {:?}: {}",
                config.database_path, err
            );
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 760.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Flashcards",
        options,
        Box::new(|_cc| {
            Ok(Box::new(MyApp::new(
                conn,
                config,
                Box::new(LocalTemplateGenerator),
            )))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("UI terminated with an error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Opens the database, seeds the starter cards on first launch and brings
/// the stored progress in line with the card set.
fn open_store(config: &AppConfig) -> Result<Connection> {
    let conn = init_database(&config.database_path)?;
    if seed_default_cards(&conn)? > 0 {
        info!("Sample cards created");
    }

    let cards = get_all_cards(&conn)?;
    let progress = sync_progress(&conn)?;
    info!(
        "Loaded {} cards ({} with progress)",
        cards.len(),
        progress.len()
    );
    Ok(conn)
}
