//! Review session over the cards that are due.
//! Each rating is written straight to the database; cards that are still in
//! a learning phase afterwards come back at the end of the queue.

use super::{Card, Rating, ScheduleState, SchedulerConfig, Status};
use crate::database::db;
use crate::error::Result;
use rusqlite::Connection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

pub struct ReviewSession {
    queue: VecDeque<Card>,
    pub show_answer: bool,
    conn: Arc<Mutex<Connection>>,
    config: SchedulerConfig,
    initial_count: usize,
    reviewed: usize,
}

impl ReviewSession {
    /// Creates a session from cards that are due, already in review order.
    pub fn new_from_due_cards(
        cards: Vec<Card>,
        conn: Arc<Mutex<Connection>>,
        config: SchedulerConfig,
    ) -> Self {
        let queue = VecDeque::from(cards);
        Self {
            initial_count: queue.len(),
            queue,
            show_answer: false,
            conn,
            config,
            reviewed: 0,
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.queue.front()
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    /// Rates the card on top of the queue and stores its new state.
    ///
    /// The connection stays locked from reading the old state to writing the
    /// new one, so two ratings of the same card cannot interleave.
    pub fn rate_current(&mut self, rating: Rating) -> Result<Option<ScheduleState>> {
        let Some(card) = self.queue.pop_front() else {
            return Ok(None);
        };

        let next = {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            match db::rate_item(&card.id, rating, &self.config, &conn) {
                Ok(next) => next,
                Err(err) => {
                    // Leave the card where it was so the rating can be retried
                    self.queue.push_front(card);
                    return Err(err);
                }
            }
        };

        self.reviewed += 1;
        if next.status != Status::Review {
            self.queue.push_back(card);
        }
        self.show_answer = false;
        Ok(Some(next))
    }

    /// Ratings given so far, including repeated cards.
    pub fn reviewed_count(&self) -> usize {
        self.reviewed
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len()
    }

    pub fn total_count(&self) -> usize {
        self.initial_count
    }

    pub fn is_completed(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn progress_message(&self) -> String {
        format!(
            "Remaining: {} of {} due ({} ratings given)",
            self.remaining_count(),
            self.total_count(),
            self.reviewed_count()
        )
    }
}
