// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The study loop: which deck is loaded, in which mode, and the session in
//! progress. Ties the scheduler, the selector, and the session tracker to
//! the database.

use rand::Rng;
use serde::Serialize;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::StudyError;
use crate::selector::ViewedSet;
use crate::selector::select_next;
use crate::session::SessionLimits;
use crate::session::SessionSummary;
use crate::session::SessionTracker;
use crate::sm2::Quality;
use crate::sm2::apply_answer;
use crate::stats::DeckStats;
use crate::stats::deck_stats;
use crate::types::date::Date;
use crate::types::deck::DeckFile;
use crate::types::deck::DeckSummary;
use crate::types::fact::DeckId;
use crate::types::fact::FactId;
use crate::types::fact::ReviewState;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

/// How many closed sessions the study statistics list.
pub const RECENT_SESSIONS: usize = 10;

#[derive(Clone, Debug)]
struct LoadedDeck {
    deck_id: DeckId,
    name: String,
    count: usize,
}

/// The outcome of asking for the next fact.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Presentation {
    Fact {
        fact_id: FactId,
        content: String,
        /// Absent in random mode, which ignores review state.
        #[serde(skip_serializing_if = "Option::is_none")]
        review: Option<ReviewState>,
    },
    /// The deck has nothing to show in the current mode.
    NoFactsAvailable,
    /// The current session hit its fact or time limit.
    SessionLimitReached { summary: SessionSummary },
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub next_review_date: Date,
    pub ease_factor: f64,
    pub interval: u32,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub mode: StudyMode,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub mode: StudyMode,
    pub started_at: Timestamp,
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub fact_limit: Option<usize>,
    pub time_limit_minutes: Option<u32>,
    pub limit_reached: bool,
}

/// Everything the study loop remembers between requests. One per server.
pub struct StudyContext {
    deck: Option<LoadedDeck>,
    mode: StudyMode,
    viewed: ViewedSet,
    sessions: SessionTracker,
    /// Limits for sessions opened implicitly by a presentation.
    default_limits: SessionLimits,
    no_repeat_random: bool,
}

impl StudyContext {
    pub fn new(config: &Config) -> Self {
        Self {
            deck: None,
            mode: config.default_mode,
            viewed: ViewedSet::new(),
            sessions: SessionTracker::new(),
            default_limits: config.session,
            no_repeat_random: config.no_repeat_random,
        }
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn deck_id(&self) -> Option<DeckId> {
        self.deck.as_ref().map(|deck| deck.deck_id)
    }

    /// Make the named deck the current one. Closes the session in progress
    /// and forgets which facts were viewed.
    pub fn load_deck(
        &mut self,
        db: &mut Database,
        name: &str,
        now: Timestamp,
    ) -> Fallible<DeckSummary> {
        let deck = db.load_deck_by_name(name)?;
        self.close_session(db, now)?;
        self.viewed.clear();
        let summary = DeckSummary::from(&deck);
        log::debug!("Loaded deck '{}' ({} facts).", deck.name, deck.facts.len());
        self.deck = Some(LoadedDeck {
            deck_id: deck.deck_id,
            name: deck.name,
            count: summary.count,
        });
        Ok(summary)
    }

    /// Store a new deck and load it.
    pub fn upload_deck(
        &mut self,
        db: &mut Database,
        deck: &DeckFile,
        now: Timestamp,
    ) -> Fallible<DeckSummary> {
        db.insert_deck(deck, now)?;
        self.load_deck(db, &deck.deck_name, now)
    }

    /// Load the sample deck, storing it first if it is not there yet.
    pub fn load_sample(
        &mut self,
        db: &mut Database,
        sample: &DeckFile,
        now: Timestamp,
    ) -> Fallible<DeckSummary> {
        if db.find_deck(&sample.deck_name)?.is_none() {
            db.insert_deck(sample, now)?;
        }
        self.load_deck(db, &sample.deck_name, now)
    }

    /// Delete a deck. If it is the current deck, it is unloaded and its
    /// session discarded.
    pub fn delete_deck(&mut self, db: &mut Database, name: &str, now: Timestamp) -> Fallible<()> {
        db.delete_deck(name)?;
        if self.deck.as_ref().is_some_and(|deck| deck.name == name) {
            self.sessions.end(now);
            self.viewed.clear();
            self.deck = None;
        }
        Ok(())
    }

    /// Switch the study mode. The session in progress is closed; the next
    /// presentation opens a new one.
    pub fn set_mode(
        &mut self,
        db: &mut Database,
        mode: StudyMode,
        now: Timestamp,
    ) -> Fallible<Option<SessionSummary>> {
        let summary = self.close_session(db, now)?;
        log::debug!("Study mode: {mode}.");
        self.mode = mode;
        Ok(summary)
    }

    /// Choose the next fact of the current deck and count its presentation.
    pub fn next_fact<R: Rng + ?Sized>(
        &mut self,
        db: &mut Database,
        now: Timestamp,
        rng: &mut R,
    ) -> Fallible<Presentation> {
        let Some(loaded) = &self.deck else {
            return Err(StudyError::NoDeckLoaded.into());
        };
        let deck_id = loaded.deck_id;
        if self.sessions.current().is_none() {
            log::debug!("Starting {} session.", self.mode);
            self.sessions
                .start(deck_id, self.mode, self.default_limits, now);
        }
        if let Some(session) = self.sessions.current() {
            if session.is_exhausted(now) {
                return Ok(Presentation::SessionLimitReached {
                    summary: session.summary(),
                });
            }
        }

        let deck = db.load_deck(deck_id)?;
        let today = now.local_date();
        let viewed = if self.mode == StudyMode::Random && self.no_repeat_random {
            Some(&mut self.viewed)
        } else {
            None
        };
        let Some(fact) = select_next(&deck.facts, self.mode, viewed, today, rng) else {
            return Ok(Presentation::NoFactsAvailable);
        };

        db.record_shown(fact.fact_id)?;
        if let Some(session) = self.sessions.current_mut() {
            session.record_shown(fact)?;
        }
        log::debug!(
            "Showing fact {} ({}, {} viewed).",
            fact.fact_id,
            self.mode,
            self.viewed.len()
        );
        let review = match self.mode {
            StudyMode::Random => None,
            _ => Some(fact.review),
        };
        Ok(Presentation::Fact {
            fact_id: fact.fact_id,
            content: fact.content.clone(),
            review,
        })
    }

    /// Grade an answer and reschedule the fact. The quality is checked
    /// before anything is read or written.
    pub fn submit_answer(
        &mut self,
        db: &mut Database,
        fact_id: FactId,
        quality: i64,
        now: Timestamp,
    ) -> Fallible<AnswerOutcome> {
        let quality = Quality::new(quality)?;
        let today = now.local_date();
        let correct = quality.is_success();
        let fact = db.update_review(fact_id, correct, |state| apply_answer(state, quality, today))?;
        let review = fact.review;
        log::debug!(
            "Fact {fact_id} q={} EF={:.2} I={}d reps={}",
            quality.value(),
            review.ease_factor,
            review.interval,
            review.repetitions
        );
        if let Some(session) = self.sessions.current_mut() {
            if !session.record_answer(fact_id, correct)? {
                log::debug!("Answer to fact {fact_id} not counted: it is not the fact shown last.");
            }
        }
        let next_review_date = review
            .next_review_date
            .ok_or_else(|| ErrorReport::new("reviewed fact has no next review date."))?;
        Ok(AnswerOutcome {
            next_review_date,
            ease_factor: review.ease_factor,
            interval: review.interval,
        })
    }

    /// Open a session with custom limits, closing the one in progress. The
    /// mode defaults to the current one.
    pub fn start_session(
        &mut self,
        db: &mut Database,
        mode: Option<StudyMode>,
        limits: SessionLimits,
        now: Timestamp,
    ) -> Fallible<()> {
        let Some(loaded) = &self.deck else {
            return Err(StudyError::NoDeckLoaded.into());
        };
        let deck_id = loaded.deck_id;
        if let Some(mode) = mode {
            self.mode = mode;
        }
        log::debug!("Starting custom {} session: {limits:?}", self.mode);
        if let Some(previous) = self.sessions.start(deck_id, self.mode, limits, now) {
            db.save_session(&previous)?;
        }
        Ok(())
    }

    /// Close the session in progress, if any, and return its summary.
    pub fn end_session(
        &mut self,
        db: &mut Database,
        now: Timestamp,
    ) -> Fallible<Option<SessionSummary>> {
        self.close_session(db, now)
    }

    pub fn progress(&self, now: Timestamp) -> Option<SessionProgress> {
        let session = self.sessions.current()?;
        Some(SessionProgress {
            mode: session.mode(),
            started_at: session.started_at(),
            summary: session.summary(),
            fact_limit: session.limits().fact_limit,
            time_limit_minutes: session.limits().time_limit_minutes,
            limit_reached: session.is_exhausted(now),
        })
    }

    pub fn status(&self) -> Status {
        Status {
            loaded: self.deck.is_some(),
            deck_name: self.deck.as_ref().map(|deck| deck.name.clone()),
            count: self.deck.as_ref().map(|deck| deck.count),
            mode: self.mode,
        }
    }

    /// Statistics for the current deck.
    pub fn stats(&self, db: &Database, today: Date) -> Fallible<DeckStats> {
        let Some(loaded) = &self.deck else {
            return Err(StudyError::NoDeckLoaded.into());
        };
        study_stats(db, &loaded.name, today)
    }

    fn close_session(
        &mut self,
        db: &mut Database,
        now: Timestamp,
    ) -> Fallible<Option<SessionSummary>> {
        let Some(session) = self.sessions.end(now) else {
            return Ok(None);
        };
        db.save_session(&session)?;
        let summary = session.summary();
        log::debug!(
            "Session closed: {} studied, {} correct ({}%).",
            summary.facts_studied,
            summary.correct_answers,
            summary.accuracy
        );
        Ok(Some(summary))
    }
}

/// Statistics for the named deck.
pub fn study_stats(db: &Database, deck_name: &str, today: Date) -> Fallible<DeckStats> {
    let deck = db.load_deck_by_name(deck_name)?;
    let sessions = db.recent_sessions(deck.deck_id, RECENT_SESSIONS)?;
    Ok(deck_stats(&deck.name, &deck.facts, today, sessions))
}
