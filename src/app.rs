//! Main application UI and state management.
//! Shows the card list and the review screen; every change goes through the
//! database layer and the scheduler, the UI only keeps a snapshot to draw.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use flashcards_app::config::AppConfig;
use flashcards_app::database::db;
use flashcards_app::export::json::{
    export_cards_to_path, export_progress_to_path, import_cards, import_progress,
};
use flashcards_app::generator::{
    SentenceGenerator, generate_cards, generate_or_fallback, parse_word_list,
};
use flashcards_app::models::{Card, Rating, ReviewSession, StateMap, Timestamp};
use flashcards_app::scheduler::{due_count, next_due_at};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// Main application state
pub struct MyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    conn: Arc<Mutex<Connection>>,
    config: AppConfig,
    generator: Box<dyn SentenceGenerator>,

    // Snapshot of the store, refreshed after every change
    cards: Vec<Card>,
    progress: StateMap,
    now: Timestamp,

    new_sentence: String,
    new_bold_word: String,
    new_translation: String,
    // Card loaded into the form for editing; `None` while adding
    editing: Option<String>,
    bulk_words: String,
    show_bulk_dialog: bool,

    current_screen: AppScreen,
    review_session: Option<ReviewSession>,
    result_message: Option<String>,
}

/// Formats a millisecond timestamp as local date and time
fn format_timestamp(timestamp: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_bulk_dialog {
            self.render_bulk_dialog(ctx);
        }

        let mut dismiss = false;
        if let Some(message) = &self.result_message {
            egui::Window::new("Flashcards")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
        }
        if dismiss {
            self.result_message = None;
        }
    }
}

impl MyApp {
    pub fn new(conn: Connection, config: AppConfig, generator: Box<dyn SentenceGenerator>) -> Self {
        let mut app = Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            conn: Arc::new(Mutex::new(conn)),
            config,
            generator,
            cards: Vec::new(),
            progress: StateMap::new(),
            now: 0,
            new_sentence: String::new(),
            new_bold_word: String::new(),
            new_translation: String::new(),
            editing: None,
            bulk_words: String::new(),
            show_bulk_dialog: false,
            current_screen: AppScreen::Main,
            review_session: None,
            result_message: None,
        };
        app.refresh();
        app
    }

    /// Runs `f` with the connection locked.
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> flashcards_app::Result<T>,
    ) -> flashcards_app::Result<T> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }

    fn report(&mut self, message: String) {
        info!("{}", message);
        self.result_message = Some(message);
    }

    fn report_error(&mut self, context: &str, err: flashcards_app::FlashcardsError) {
        error!("{}: {}", context, err);
        self.result_message = Some(format!("{}: {}", context, err));
    }

    /// Reconciles progress and reloads the snapshot the UI draws from
    fn refresh(&mut self) {
        let loaded = self.with_conn(|conn| {
            let progress = db::sync_progress(conn)?;
            let cards = db::get_all_cards(conn)?;
            let now = db::get_current_time(conn)?;
            Ok((cards, progress, now))
        });
        match loaded {
            Ok((cards, progress, now)) => {
                self.cards = cards;
                self.progress = progress;
                self.now = now;
            }
            Err(err) => self.report_error("Failed to load cards", err),
        }
    }

    /// Renders the main screen with the card list and card management
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format_timestamp(self.now));
                if ui.button("Next Day").clicked() {
                    self.handle_next_day();
                }
            });
            ui.separator();

            let due = due_count(&self.cards, &self.progress, self.now);
            ui.horizontal(|ui| {
                ui.heading(format!("Due now: {}", due));
                if ui.add_enabled(due > 0, egui::Button::new("Review")).clicked() {
                    self.start_review_session();
                }
            });
            if due == 0 {
                match next_due_at(&self.progress, self.now) {
                    Some(next) => ui.label(format!("Next card due {}", format_timestamp(next))),
                    None => ui.label("No cards scheduled."),
                };
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Cards").clicked() {
                    self.handle_export_cards();
                }
                if ui.button("Import Cards").clicked() {
                    self.handle_import_cards();
                }
                if ui.button("Export Progress").clicked() {
                    self.handle_export_progress();
                }
                if ui.button("Import Progress").clicked() {
                    self.handle_import_progress();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Bulk Import").clicked() {
                    self.show_bulk_dialog = true;
                }
                if ui.button("Reset to Defaults").clicked() {
                    self.handle_reset();
                }
            });

            ui.separator();

            ui.heading(if self.editing.is_some() { "Edit Card" } else { "Add Card" });
            ui.horizontal(|ui| {
                ui.label("Bold word:");
                ui.text_edit_singleline(&mut self.new_bold_word);
                if ui.button("Generate").clicked() {
                    self.handle_generate();
                }
            });
            ui.horizontal(|ui| {
                ui.label("Sentence:");
                ui.text_edit_singleline(&mut self.new_sentence);
            });
            ui.horizontal(|ui| {
                ui.label("Translation:");
                ui.text_edit_singleline(&mut self.new_translation);
            });
            if self.editing.is_some() {
                ui.horizontal(|ui| {
                    if ui.button("Save Changes").clicked() {
                        self.handle_save_edit();
                    }
                    if ui.button("Cancel").clicked() {
                        self.clear_form();
                    }
                });
            } else if ui.button("Add Card").clicked() {
                self.handle_add_card();
            }

            ui.separator();

            ui.heading(format!("Cards ({})", self.cards.len()));

            // Deferred so the list can be drawn while borrowing `self.cards`
            let mut action_delete: Option<String> = None;
            let mut action_edit: Option<Card> = None;

            egui::ScrollArea::vertical()
                .id_salt("cards_list")
                .max_height(280.0)
                .show(ui, |ui| {
                    for (i, card) in self.cards.iter().enumerate() {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(format!("{}. {}", i + 1, card.sentence));
                                if ui.small_button("Edit").clicked() {
                                    action_edit = Some(card.clone());
                                }
                                if ui.small_button("Delete").clicked() {
                                    action_delete = Some(card.id.clone());
                                }
                            });
                            ui.label(format!("   {}", card.translation));
                            if let Some(state) = self.progress.get(&card.id) {
                                ui.label(format!(
                                    "   {} · ease {:.2} · interval {} d · lapses {} · due {}",
                                    state.status.as_str(),
                                    state.ease_factor,
                                    state.interval_days,
                                    state.lapse_count,
                                    format_timestamp(state.due_at)
                                ));
                            }
                        });
                    }
                });

            if let Some(card) = action_edit {
                self.start_edit(card);
            }
            if let Some(id) = action_delete {
                self.handle_delete(&id);
            }
        });
    }

    /// Renders the review screen: sentence, hidden translation, rating buttons
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_back = false;
        let mut action_rate: Option<Rating> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &mut self.review_session else {
                action_back = true;
                return;
            };

            ui.heading("Review");
            ui.label(session.progress_message());
            ui.add_space(20.0);

            if session.is_completed() {
                ui.heading("Session complete");
                match next_due_at(&self.progress, self.now) {
                    Some(next) => {
                        ui.label(format!("No cards are due right now. Next one: {}", format_timestamp(next)))
                    }
                    None => ui.label("No cards are due right now. Come back later."),
                };
                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
                return;
            }

            let Some(card) = session.current_card() else {
                return;
            };
            let show_answer = session.show_answer;
            let card = card.clone();

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        match card.highlight() {
                            Some((before, word, after)) => {
                                ui.label(before);
                                ui.label(egui::RichText::new(word).strong().underline());
                                ui.label(after);
                            }
                            None => {
                                ui.label(&card.sentence);
                            }
                        }
                    });
                    ui.add_space(20.0);

                    if show_answer {
                        ui.label(egui::RichText::new(&card.translation).italics());
                    } else {
                        ui.label("(Click 'Show Translation' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            if !show_answer {
                if ui.button("Show Translation").clicked() {
                    session.toggle_answer();
                }
            } else {
                ui.horizontal(|ui| {
                    if ui.button("Again").clicked() {
                        action_rate = Some(Rating::Again);
                    }
                    if ui.button("Good").clicked() {
                        action_rate = Some(Rating::Good);
                    }
                });
            }

            ui.add_space(20.0);
            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }
        });

        if let Some(rating) = action_rate {
            self.rate_current_card(rating);
        }
        if action_back {
            self.current_screen = AppScreen::Main;
            self.review_session = None;
            self.refresh();
        }
    }

    fn render_bulk_dialog(&mut self, ctx: &egui::Context) {
        let mut action_generate = false;
        let mut action_cancel = false;
        let word_count = parse_word_list(&self.bulk_words).len();

        egui::Window::new("Bulk Import")
            .collapsible(false)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Words separated by new lines, commas or semicolons:");
                ui.text_edit_multiline(&mut self.bulk_words);
                ui.label(format!(
                    "{} words · sentences by {} ({})",
                    word_count,
                    self.generator.name(),
                    self.config.target_language
                ));
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(word_count > 0, egui::Button::new("Generate Cards"))
                        .clicked()
                    {
                        action_generate = true;
                    }
                    if ui.button("Cancel").clicked() {
                        action_cancel = true;
                    }
                });
            });

        if action_generate {
            self.handle_bulk_import();
        }
        if action_cancel {
            self.show_bulk_dialog = false;
        }
    }

    /// Starts a review session with the cards due right now
    fn start_review_session(&mut self) {
        match self.with_conn(db::get_due_cards) {
            Ok(due) if !due.is_empty() => {
                self.review_session = Some(ReviewSession::new_from_due_cards(
                    due,
                    Arc::clone(&self.conn),
                    self.config.scheduler,
                ));
                self.current_screen = AppScreen::Review;
            }
            Ok(_) => self.report("No cards are due right now.".to_string()),
            Err(err) => self.report_error("Failed to start review", err),
        }
    }

    fn rate_current_card(&mut self, rating: Rating) {
        let Some(session) = &mut self.review_session else {
            return;
        };
        if let Err(err) = session.rate_current(rating) {
            self.report_error("Failed to save rating", err);
            return;
        }
        self.refresh();
    }

    fn handle_next_day(&mut self) {
        if let Err(err) = self.with_conn(db::advance_day) {
            self.report_error("Failed to advance the clock", err);
        }
        self.refresh();
    }

    fn handle_generate(&mut self) {
        let word = self.new_bold_word.trim().to_string();
        if word.is_empty() {
            self.report("Enter a bold word to generate from.".to_string());
            return;
        }
        let generated =
            generate_or_fallback(self.generator.as_ref(), &word, &self.config.target_language);
        self.new_sentence = generated.sentence;
        self.new_translation = generated.translation;
    }

    fn handle_add_card(&mut self) {
        let card = Card::new(
            self.new_sentence.trim(),
            self.new_bold_word.trim(),
            self.new_translation.trim(),
        );
        match self.with_conn(|conn| db::add_card(&card, conn)) {
            Ok(()) => {
                self.clear_form();
                self.refresh();
            }
            Err(err) => self.report_error("Could not add card", err),
        }
    }

    /// Loads a card into the form; saving writes it back under the same id
    fn start_edit(&mut self, card: Card) {
        self.new_sentence = card.sentence;
        self.new_bold_word = card.bold_word;
        self.new_translation = card.translation;
        self.editing = Some(card.id);
    }

    fn handle_save_edit(&mut self) {
        let Some(id) = self.editing.clone() else {
            return;
        };
        let card = Card {
            id,
            sentence: self.new_sentence.trim().to_string(),
            bold_word: self.new_bold_word.trim().to_string(),
            translation: self.new_translation.trim().to_string(),
        };
        match self.with_conn(|conn| db::update_card(&card, conn)) {
            Ok(()) => {
                self.clear_form();
                self.refresh();
            }
            Err(err) => self.report_error("Could not save card", err),
        }
    }

    fn clear_form(&mut self) {
        self.new_sentence.clear();
        self.new_bold_word.clear();
        self.new_translation.clear();
        self.editing = None;
    }

    fn handle_bulk_import(&mut self) {
        let words = parse_word_list(&self.bulk_words);
        let cards = generate_cards(&words, &self.config.target_language, self.generator.as_ref());
        let added = self.with_conn(|conn| db::add_cards(&cards, conn));
        match added {
            Ok(count) => {
                self.bulk_words.clear();
                self.show_bulk_dialog = false;
                self.report(format!("Added {} cards.", count));
            }
            Err(err) => self.report_error("Bulk import failed", err),
        }
        self.refresh();
    }

    fn handle_delete(&mut self, id: &str) {
        match self.with_conn(|conn| db::delete_card(id, conn)) {
            Ok(()) if self.editing.as_deref() == Some(id) => self.clear_form(),
            Ok(()) => {}
            Err(err) => self.report_error("Could not delete card", err),
        }
        self.refresh();
    }

    fn handle_reset(&mut self) {
        match self.with_conn(db::reset_to_defaults) {
            Ok(()) => self.clear_form(),
            Err(err) => self.report_error("Could not reset cards", err),
        }
        self.refresh();
    }

    fn handle_export_cards(&mut self) {
        let Some(path) = save_dialog("cards.json") else {
            return;
        };
        match export_cards_to_path(&self.cards, &path) {
            Ok(()) => self.report(format!("Exported {} cards.", self.cards.len())),
            Err(err) => self.report_error("Export failed", err),
        }
    }

    /// Adds imported cards; cards whose id already exists are updated in place
    fn handle_import_cards(&mut self) {
        let Some(path) = open_dialog() else {
            return;
        };
        let imported = match import_cards(&path) {
            Ok(cards) => cards,
            Err(err) => {
                self.report_error("Import failed", err);
                return;
            }
        };
        match self.with_conn(|conn| db::upsert_cards(&imported, conn)) {
            Ok(count) => self.report(format!("Imported {} cards.", count)),
            Err(err) => self.report_error("Import failed", err),
        }
        self.refresh();
    }

    fn handle_export_progress(&mut self) {
        let Some(path) = save_dialog("progress.json") else {
            return;
        };
        match export_progress_to_path(&self.progress, &path) {
            Ok(()) => self.report(format!("Exported progress for {} cards.", self.progress.len())),
            Err(err) => self.report_error("Export failed", err),
        }
    }

    fn handle_import_progress(&mut self) {
        let Some(path) = open_dialog() else {
            return;
        };
        let restored = import_progress(&path)
            .and_then(|imported| self.with_conn(|conn| db::restore_progress(&imported, conn)));
        match restored {
            Ok(progress) => self.report(format!("Restored progress for {} cards.", progress.len())),
            Err(err) => self.report_error("Import failed", err),
        }
        self.refresh();
    }
}

fn save_dialog(file_name: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(file_name)
        .add_filter("JSON files", &["json"])
        .save_file()
}

fn open_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .add_filter("JSON files", &["json"])
        .set_directory(Path::new("."))
        .pick_file()
}
