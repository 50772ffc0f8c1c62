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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::config::DbConfig;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::StudyError;
use crate::error::fail;
use crate::session::Session;
use crate::session::accuracy;
use crate::types::deck::Deck;
use crate::types::deck::DeckFile;
use crate::types::deck::DeckSummary;
use crate::types::fact::DeckId;
use crate::types::fact::Fact;
use crate::types::fact::FactId;
use crate::types::fact::ReviewState;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

pub struct Database {
    conn: Connection,
}

/// A closed session, as stored.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub mode: StudyMode,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub facts_studied: usize,
    pub correct_answers: usize,
    pub accuracy: f64,
}

const FACT_COLUMNS: &str = "fact_id, deck_id, content, ease_factor, interval, repetitions, next_review_date, last_reviewed, times_shown, times_correct";

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Store a new deck and its facts. Every fact starts out never
    /// reviewed.
    ///
    /// If a deck with the same name exists, returns an error.
    pub fn insert_deck(&mut self, deck: &DeckFile, created_at: Timestamp) -> Fallible<DeckId> {
        deck.validate()?;
        let tx = self.conn.transaction()?;
        if find_deck_id(&tx, &deck.deck_name)?.is_some() {
            return Err(StudyError::DuplicateDeck(deck.deck_name.clone()).into());
        }
        let sql = "insert into decks (name, created_at) values (?, ?) returning deck_id;";
        let deck_id: DeckId =
            tx.query_row(sql, (&deck.deck_name, created_at), |row| row.get(0))?;
        let initial = ReviewState::default();
        {
            let sql = "insert into facts (deck_id, position, content, ease_factor, interval, repetitions) values (?, ?, ?, ?, ?, ?);";
            let mut stmt = tx.prepare(sql)?;
            for (position, content) in deck.facts.iter().enumerate() {
                stmt.execute((
                    deck_id,
                    position as i64,
                    content,
                    initial.ease_factor,
                    initial.interval,
                    initial.repetitions,
                ))?;
            }
        }
        tx.commit()?;
        log::debug!(
            "Inserted deck '{}' with {} facts.",
            deck.deck_name,
            deck.facts.len()
        );
        Ok(deck_id)
    }

    /// Return the name and size of every deck, sorted by name.
    pub fn list_decks(&self) -> Fallible<Vec<DeckSummary>> {
        let sql = "select d.name, count(f.fact_id) from decks d left outer join facts f on f.deck_id = d.deck_id group by d.deck_id order by d.name;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut decks = Vec::new();
        while let Some(row) = rows.next()? {
            let count: i64 = row.get(1)?;
            decks.push(DeckSummary {
                deck_name: row.get(0)?,
                count: count as usize,
            });
        }
        Ok(decks)
    }

    pub fn find_deck(&self, name: &str) -> Fallible<Option<DeckId>> {
        let sql = "select deck_id from decks where name = ?;";
        let deck_id = self
            .conn
            .query_row(sql, [name], |row| row.get(0))
            .optional()?;
        Ok(deck_id)
    }

    /// Load a deck and its facts, in upload order.
    pub fn load_deck(&self, deck_id: DeckId) -> Fallible<Deck> {
        let sql = "select name from decks where deck_id = ?;";
        let name: Option<String> = self
            .conn
            .query_row(sql, [deck_id], |row| row.get(0))
            .optional()?;
        let Some(name) = name else {
            return Err(StudyError::DeckNotFound(format!("#{deck_id}")).into());
        };
        let sql = format!("select {FACT_COLUMNS} from facts where deck_id = ? order by position;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([deck_id])?;
        let mut facts = Vec::new();
        while let Some(row) = rows.next()? {
            facts.push(fact_from_row(row)?);
        }
        Ok(Deck {
            deck_id,
            name,
            facts,
        })
    }

    pub fn load_deck_by_name(&self, name: &str) -> Fallible<Deck> {
        match self.find_deck(name)? {
            Some(deck_id) => self.load_deck(deck_id),
            None => Err(StudyError::DeckNotFound(name.to_string()).into()),
        }
    }

    /// Delete a deck together with its facts and sessions.
    pub fn delete_deck(&mut self, name: &str) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from decks where name = ?;", [name])?;
        if deleted == 0 {
            return Err(StudyError::DeckNotFound(name.to_string()).into());
        }
        log::debug!("Deleted deck '{name}'.");
        Ok(())
    }

    pub fn get_fact(&self, fact_id: FactId) -> Fallible<Fact> {
        let sql = format!("select {FACT_COLUMNS} from facts where fact_id = ?;");
        let fact = self
            .conn
            .query_row(&sql, [fact_id], fact_from_row)
            .optional()?;
        match fact {
            Some(fact) => Ok(fact),
            None => Err(StudyError::FactNotFound(fact_id).into()),
        }
    }

    /// Count a presentation of the fact.
    pub fn record_shown(&mut self, fact_id: FactId) -> Fallible<()> {
        let sql = "update facts set times_shown = times_shown + 1 where fact_id = ?;";
        let updated = self.conn.execute(sql, [fact_id])?;
        if updated == 0 {
            return Err(StudyError::FactNotFound(fact_id).into());
        }
        Ok(())
    }

    /// Read a fact, compute its new review state, and write it back, all in
    /// one transaction. `correct` answers also bump the fact's correct
    /// counter. Returns the updated fact. If `update` fails, nothing is
    /// written.
    pub fn update_review<F>(&mut self, fact_id: FactId, correct: bool, update: F) -> Fallible<Fact>
    where
        F: FnOnce(&ReviewState) -> Fallible<ReviewState>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sql = format!("select {FACT_COLUMNS} from facts where fact_id = ?;");
        let fact = tx.query_row(&sql, [fact_id], fact_from_row).optional()?;
        let Some(mut fact) = fact else {
            return Err(StudyError::FactNotFound(fact_id).into());
        };
        fact.review = update(&fact.review)?;
        if correct {
            fact.times_correct += 1;
        }
        let sql = "update facts set ease_factor = ?, interval = ?, repetitions = ?, next_review_date = ?, last_reviewed = ?, times_correct = ? where fact_id = ?;";
        tx.execute(
            sql,
            (
                fact.review.ease_factor,
                fact.review.interval,
                fact.review.repetitions,
                fact.review.next_review_date,
                fact.review.last_reviewed,
                fact.times_correct,
                fact_id,
            ),
        )?;
        tx.commit()?;
        Ok(fact)
    }

    /// Save a closed session.
    pub fn save_session(&mut self, session: &Session) -> Fallible<()> {
        let Some(ended_at) = session.ended_at() else {
            return fail("cannot save a session that is still open.");
        };
        let sql = "insert into sessions (deck_id, mode, started_at, ended_at, facts_studied, correct_answers) values (?, ?, ?, ?, ?, ?);";
        self.conn.execute(
            sql,
            (
                session.deck_id(),
                session.mode(),
                session.started_at(),
                ended_at,
                session.facts_studied() as i64,
                session.correct_answers() as i64,
            ),
        )?;
        Ok(())
    }

    /// The most recent closed sessions of a deck, newest first.
    pub fn recent_sessions(&self, deck_id: DeckId, limit: usize) -> Fallible<Vec<SessionRecord>> {
        let sql = "select mode, started_at, ended_at, facts_studied, correct_answers from sessions where deck_id = ? order by started_at desc, session_id desc limit ?;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((deck_id, limit as i64))?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            let facts_studied: i64 = row.get(3)?;
            let correct_answers: i64 = row.get(4)?;
            let facts_studied = facts_studied as usize;
            let correct_answers = correct_answers as usize;
            sessions.push(SessionRecord {
                mode: row.get(0)?,
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                facts_studied,
                correct_answers,
                accuracy: accuracy(facts_studied, correct_answers),
            });
        }
        Ok(sessions)
    }
}

fn fact_from_row(row: &Row) -> rusqlite::Result<Fact> {
    Ok(Fact {
        fact_id: row.get(0)?,
        deck_id: row.get(1)?,
        content: row.get(2)?,
        review: ReviewState {
            ease_factor: row.get(3)?,
            interval: row.get(4)?,
            repetitions: row.get(5)?,
            next_review_date: row.get(6)?,
            last_reviewed: row.get(7)?,
        },
        times_shown: row.get(8)?,
        times_correct: row.get(9)?,
    })
}

fn find_deck_id(tx: &Transaction, name: &str) -> Fallible<Option<DeckId>> {
    let sql = "select deck_id from decks where name = ?;";
    let deck_id = tx.query_row(sql, [name], |row| row.get(0)).optional()?;
    Ok(deck_id)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["decks"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::helper::open_test_database;
    use crate::session::SessionLimits;
    use crate::sm2::Quality;
    use crate::sm2::apply_answer;
    use crate::types::date::Date;

    fn sample() -> DeckFile {
        DeckFile {
            deck_name: "Planets".to_string(),
            facts: vec![
                "Mercury is closest to the Sun.".to_string(),
                "Jupiter is the largest planet.".to_string(),
                "Mars has two moons.".to_string(),
            ],
        }
    }

    #[test]
    fn test_reopen_existing_database() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("factflare.db");
        let path = path.to_str().unwrap();
        {
            let mut db = Database::new(path)?;
            db.insert_deck(&sample(), Timestamp::now())?;
        }
        let db = Database::new(path)?;
        assert_eq!(db.list_decks()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_insert_and_load_deck() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck_id = db.insert_deck(&sample(), Timestamp::now())?;
        let deck = db.load_deck(deck_id)?;
        assert_eq!(deck.name, "Planets");
        let contents: Vec<&str> = deck.facts.iter().map(|f| f.content.as_str()).collect();
        assert_eq!(contents, sample().facts);
        for fact in &deck.facts {
            assert_eq!(fact.review, ReviewState::default());
            assert_eq!(fact.times_shown, 0);
        }
        assert_eq!(
            db.list_decks()?,
            vec![DeckSummary {
                deck_name: "Planets".to_string(),
                count: 3
            }]
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_deck() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        db.insert_deck(&sample(), Timestamp::now())?;
        let err = db.insert_deck(&sample(), Timestamp::now()).err().unwrap();
        assert_eq!(
            err.study_error(),
            Some(&StudyError::DuplicateDeck("Planets".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_invalid_deck_is_rejected() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck = DeckFile {
            deck_name: "Empty".to_string(),
            facts: Vec::new(),
        };
        assert!(db.insert_deck(&deck, Timestamp::now()).is_err());
        assert!(db.list_decks()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_delete_cascades() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck_id = db.insert_deck(&sample(), Timestamp::now())?;
        let fact_id = db.load_deck(deck_id)?.facts[0].fact_id;
        db.delete_deck("Planets")?;
        assert!(db.list_decks()?.is_empty());
        let err = db.get_fact(fact_id).err().unwrap();
        assert_eq!(err.study_error(), Some(&StudyError::FactNotFound(fact_id)));
        let err = db.delete_deck("Planets").err().unwrap();
        assert_eq!(
            err.study_error(),
            Some(&StudyError::DeckNotFound("Planets".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_update_review() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck_id = db.insert_deck(&sample(), Timestamp::now())?;
        let fact_id = db.load_deck(deck_id)?.facts[1].fact_id;
        let today = Date::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let quality = Quality::new(5).unwrap();
        db.record_shown(fact_id)?;
        let updated = db.update_review(fact_id, true, |state| apply_answer(state, quality, today))?;
        let stored = db.get_fact(fact_id)?;
        assert_eq!(stored, updated);
        assert_eq!(stored.review.repetitions, 1);
        assert_eq!(stored.review.next_review_date, today.add_days(1));
        assert_eq!(stored.times_shown, 1);
        assert_eq!(stored.times_correct, 1);
        Ok(())
    }

    #[test]
    fn test_missing_fact() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let err = db.record_shown(99).err().unwrap();
        assert_eq!(err.study_error(), Some(&StudyError::FactNotFound(99)));
        let err = db.update_review(99, true, |state| Ok(*state)).err().unwrap();
        assert_eq!(err.study_error(), Some(&StudyError::FactNotFound(99)));
        Ok(())
    }

    #[test]
    fn test_failed_update_writes_nothing() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck_id = db.insert_deck(&sample(), Timestamp::now())?;
        let fact_id = db.load_deck(deck_id)?.facts[0].fact_id;
        let before = db.get_fact(fact_id)?;
        let last = Date::new(NaiveDate::MAX);
        let quality = Quality::new(4).unwrap();
        let result = db.update_review(fact_id, true, |state| apply_answer(state, quality, last));
        assert!(result.is_err());
        assert_eq!(db.get_fact(fact_id)?, before);
        Ok(())
    }

    #[test]
    fn test_sessions() -> Fallible<()> {
        let (_dir, mut db) = open_test_database()?;
        let deck_id = db.insert_deck(&sample(), Timestamp::now())?;
        let fact = db.load_deck(deck_id)?.facts[0].clone();
        let mut session = Session::start(
            deck_id,
            StudyMode::Spaced,
            SessionLimits::default(),
            Timestamp::now(),
        );
        assert!(db.save_session(&session).is_err());
        session.record_shown(&fact)?;
        session.record_answer(fact.fact_id, true)?;
        session.close(Timestamp::now())?;
        db.save_session(&session)?;
        let records = db.recent_sessions(deck_id, 10)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mode, StudyMode::Spaced);
        assert_eq!(records[0].facts_studied, 1);
        assert_eq!(records[0].accuracy, 100.0);
        Ok(())
    }
}
