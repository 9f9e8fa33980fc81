//! Database operations for the flashcard application
//!
//! Handles SQLite initialization, CRUD for cards, storage of the per-card
//! scheduling state, and the simulated clock used to step through days.

use crate::error::{FlashcardsError, Result};
use crate::models::{
    Card, MILLIS_PER_DAY, Rating, ScheduleState, SchedulerConfig, StateMap, Status, Timestamp,
    default_cards,
};
use crate::scheduler::{create_initial_state, due_items, rate, reconcile};
use log::{debug, info, warn};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::time::SystemTime;

/// Opens (or creates) the SQLite database at `path` with the required tables.
///
/// Sets the simulated clock to the wall clock if it is not initialized yet.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    info!("Opened database {:?}", path);
    Ok(conn)
}

/// Same schema as `init_database`, kept in memory. Used by tests.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    // `position` keeps cards in the order they were added
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            position INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            sentence TEXT NOT NULL,
            bold_word TEXT NOT NULL,
            translation TEXT NOT NULL
        )",
        (),
    )?;

    // No foreign key: rows for deleted cards are dropped by the next reconcile
    conn.execute(
        "CREATE TABLE IF NOT EXISTS progress (
            item_id TEXT PRIMARY KEY,
            ease_factor REAL NOT NULL,
            interval_days REAL NOT NULL,
            repetition_count INTEGER NOT NULL,
            due_at INTEGER NOT NULL,
            lapse_count INTEGER NOT NULL,
            status TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_time', ?1)",
        params![system_now().to_string()],
    )?;

    Ok(())
}

fn system_now() -> Timestamp {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

/// Retrieves the simulated current time (ms since epoch)
pub fn get_current_time(conn: &Connection) -> Result<Timestamp> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_time'",
        [],
        |row| row.get(0),
    )?;

    match value.parse::<Timestamp>() {
        Ok(now) => Ok(now),
        Err(err) => {
            let now = system_now();
            warn!(
                "Stored clock '{}' is unreadable ({}); resetting it to {}",
                value, err, now
            );
            set_current_time(now, conn)?;
            Ok(now)
        }
    }
}

pub fn set_current_time(now: Timestamp, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_time'",
        params![now.to_string()],
    )?;
    Ok(())
}

/// Advances the simulated clock by 24 hours and returns the new time
pub fn advance_day(conn: &Connection) -> Result<Timestamp> {
    let next_day = get_current_time(conn)? + MILLIS_PER_DAY;
    set_current_time(next_day, conn)?;
    debug!("Clock advanced to {}", next_day);
    Ok(next_day)
}

/// Adds a card. Fails on blank fields or an id that is already taken.
pub fn add_card(card: &Card, conn: &Connection) -> Result<()> {
    card.validate()?;
    conn.execute(
        "INSERT INTO cards (id, sentence, bold_word, translation) VALUES (?1, ?2, ?3, ?4)",
        params![card.id, card.sentence, card.bold_word, card.translation],
    )?;
    info!("Card '{}' added", card.id);
    Ok(())
}

/// Replaces the content of an existing card. Its progress is untouched.
pub fn update_card(card: &Card, conn: &Connection) -> Result<()> {
    card.validate()?;
    let changed = conn.execute(
        "UPDATE cards SET sentence = ?1, bold_word = ?2, translation = ?3 WHERE id = ?4",
        params![card.sentence, card.bold_word, card.translation, card.id],
    )?;
    if changed == 0 {
        return Err(FlashcardsError::CardNotFound(card.id.clone()));
    }
    Ok(())
}

/// Adds several cards at once. Either all of them are stored or none is.
pub fn add_cards(cards: &[Card], conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for card in cards {
        add_card(card, &tx)?;
    }
    tx.commit()?;
    Ok(cards.len())
}

/// Stores imported cards: a known id updates that card, an unknown one adds
/// it. Either the whole batch is stored or none of it.
pub fn upsert_cards(cards: &[Card], conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for card in cards {
        let known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM cards WHERE id = ?1)",
            params![card.id],
            |row| row.get(0),
        )?;
        if known {
            update_card(card, &tx)?;
        } else {
            add_card(card, &tx)?;
        }
    }
    tx.commit()?;
    Ok(cards.len())
}

/// Removes a card. Its progress row stays until `sync_progress` drops it.
pub fn delete_card(id: &str, conn: &Connection) -> Result<()> {
    let changed = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(FlashcardsError::CardNotFound(id.to_string()));
    }
    info!("Card '{}' deleted", id);
    Ok(())
}

/// Retrieves all cards in insertion order
pub fn get_all_cards(conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt =
        conn.prepare("SELECT id, sentence, bold_word, translation FROM cards ORDER BY position")?;

    let cards = stmt
        .query_map([], |row| {
            Ok(Card {
                id: row.get(0)?,
                sentence: row.get(1)?,
                bold_word: row.get(2)?,
                translation: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<Card>>>()?;

    Ok(cards)
}

/// Inserts the built-in cards when the card table is empty.
/// Returns the number of cards inserted.
pub fn seed_default_cards(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }
    let defaults = default_cards();
    for card in &defaults {
        add_card(card, conn)?;
    }
    info!("Seeded {} default cards", defaults.len());
    Ok(defaults.len())
}

/// Replaces every card with the built-in set.
pub fn reset_to_defaults(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM cards", ())?;
    for card in default_cards() {
        add_card(&card, &tx)?;
    }
    tx.commit()?;
    info!("Cards reset to defaults");
    Ok(())
}

fn state_from_row(row: &Row) -> rusqlite::Result<ScheduleState> {
    let status: String = row.get(6)?;
    let status = Status::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("unknown status '{}'", status).into(),
        )
    })?;

    Ok(ScheduleState {
        item_id: row.get(0)?,
        ease_factor: row.get(1)?,
        interval_days: row.get(2)?,
        repetition_count: row.get(3)?,
        due_at: row.get(4)?,
        lapse_count: row.get(5)?,
        status,
    })
}

const STATE_COLUMNS: &str =
    "item_id, ease_factor, interval_days, repetition_count, due_at, lapse_count, status";

/// Loads the whole progress map as stored, without reconciling it.
pub fn load_progress(conn: &Connection) -> Result<StateMap> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM progress", STATE_COLUMNS))?;
    let states = stmt
        .query_map([], state_from_row)?
        .collect::<rusqlite::Result<Vec<ScheduleState>>>()?;

    Ok(states
        .into_iter()
        .map(|state| (state.item_id.clone(), state))
        .collect())
}

pub fn load_state(item_id: &str, conn: &Connection) -> Result<Option<ScheduleState>> {
    let state = conn
        .query_row(
            &format!("SELECT {} FROM progress WHERE item_id = ?1", STATE_COLUMNS),
            params![item_id],
            state_from_row,
        )
        .optional()?;
    Ok(state)
}

/// Writes (or overwrites) one card's scheduling state
pub fn upsert_state(state: &ScheduleState, conn: &Connection) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO progress ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            STATE_COLUMNS
        ),
        params![
            state.item_id,
            state.ease_factor,
            state.interval_days,
            state.repetition_count,
            state.due_at,
            state.lapse_count,
            state.status.as_str()
        ],
    )?;
    Ok(())
}

/// Replaces the stored progress map with `progress`.
pub fn save_progress(progress: &StateMap, conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM progress", ())?;
    for state in progress.values() {
        upsert_state(state, &tx)?;
    }
    tx.commit()?;
    Ok(())
}

/// Reconciles the stored progress against the current card set and writes
/// the result back when anything changed.
///
/// Progress that cannot be read back is treated as lost: every card starts
/// over from its initial state.
pub fn sync_progress(conn: &Connection) -> Result<StateMap> {
    let cards = get_all_cards(conn)?;
    let now = get_current_time(conn)?;
    let existing = match load_progress(conn) {
        Ok(existing) => Some(existing),
        Err(err) => {
            warn!("Stored progress is unreadable ({}); starting every card fresh", err);
            None
        }
    };

    let progress = reconcile(&cards, existing.as_ref(), now);
    if existing.as_ref() != Some(&progress) {
        save_progress(&progress, conn)?;
        debug!(
            "Progress reconciled: {} stored, {} after sync",
            existing.as_ref().map_or(0, |states| states.len()),
            progress.len()
        );
    }
    Ok(progress)
}

/// Replaces stored progress with an imported map, reconciled against the
/// current cards. Imported states for unknown cards are dropped.
///
/// The map key decides which card a state belongs to; a mismatching
/// `item_id` inside the record is overwritten with the key.
pub fn restore_progress(imported: &StateMap, conn: &Connection) -> Result<StateMap> {
    let cards = get_all_cards(conn)?;
    let now = get_current_time(conn)?;
    let imported: StateMap = imported
        .iter()
        .map(|(key, state)| {
            if state.item_id != *key {
                warn!(
                    "Imported state keyed '{}' names card '{}'; using the key",
                    key, state.item_id
                );
            }
            let state = ScheduleState {
                item_id: key.clone(),
                ..state.clone()
            };
            (key.clone(), state)
        })
        .collect();
    let progress = reconcile(&cards, Some(&imported), now);
    save_progress(&progress, conn)?;
    info!(
        "Restored progress: {} of {} imported states kept",
        imported.keys().filter(|id| progress.contains_key(*id)).count(),
        imported.len()
    );
    Ok(progress)
}

/// Cards due at the simulated current time, earliest first.
pub fn get_due_cards(conn: &Connection) -> Result<Vec<Card>> {
    let progress = sync_progress(conn)?;
    let cards = get_all_cards(conn)?;
    let now = get_current_time(conn)?;

    Ok(due_items(&cards, &progress, now)
        .into_iter()
        .cloned()
        .collect())
}

/// Rates one card at the simulated current time and stores the new state.
///
/// The read, the transition and the write happen in a single transaction.
pub fn rate_item(
    item_id: &str,
    rating: Rating,
    config: &SchedulerConfig,
    conn: &Connection,
) -> Result<ScheduleState> {
    let tx = conn.unchecked_transaction()?;
    let now = get_current_time(&tx)?;

    let state = match load_state(item_id, &tx)? {
        Some(state) => state,
        None => {
            let known: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM cards WHERE id = ?1)",
                params![item_id],
                |row| row.get(0),
            )?;
            if !known {
                return Err(FlashcardsError::CardNotFound(item_id.to_string()));
            }
            create_initial_state(item_id, now)
        }
    };

    let next = rate(&state, rating, now, config);
    upsert_state(&next, &tx)?;
    tx.commit()?;

    debug!(
        "Rated '{}' {:?}: {:?} -> {:?}, due at {}",
        item_id, rating, state.status, next.status, next.due_at
    );
    Ok(next)
}
