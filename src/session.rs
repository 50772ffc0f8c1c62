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

//! Study sessions: counts and accuracy for a bounded run of presentations.

use serde::Deserialize;
use serde::Serialize;

use crate::error::StudyError;
use crate::types::fact::DeckId;
use crate::types::fact::Fact;
use crate::types::fact::FactId;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

/// Optional bounds on a session. A session past either bound is exhausted.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionLimits {
    pub fact_limit: Option<usize>,
    pub time_limit_minutes: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Open,
    Closed { ended_at: Timestamp },
}

#[derive(Clone, Debug)]
pub struct Session {
    deck_id: DeckId,
    mode: StudyMode,
    limits: SessionLimits,
    started_at: Timestamp,
    state: SessionState,
    facts_studied: usize,
    correct_answers: usize,
    /// The fact shown last, while its answer is outstanding.
    awaiting: Option<FactId>,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub facts_studied: usize,
    pub correct_answers: usize,
    /// Percentage of correct answers, to one decimal place.
    pub accuracy: f64,
}

/// Percentage of `correct` over `studied`, rounded to one decimal place.
/// Zero when nothing was studied.
pub fn accuracy(studied: usize, correct: usize) -> f64 {
    if studied == 0 {
        return 0.0;
    }
    let percent = correct as f64 / studied as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

impl Session {
    pub fn start(deck_id: DeckId, mode: StudyMode, limits: SessionLimits, now: Timestamp) -> Self {
        Self {
            deck_id,
            mode,
            limits,
            started_at: now,
            state: SessionState::Open,
            facts_studied: 0,
            correct_answers: 0,
            awaiting: None,
        }
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        match self.state {
            SessionState::Open => None,
            SessionState::Closed { ended_at } => Some(ended_at),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn facts_studied(&self) -> usize {
        self.facts_studied
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    /// Whether the session reached its fact limit or ran out of time.
    pub fn is_exhausted(&self, now: Timestamp) -> bool {
        if let Some(limit) = self.limits.fact_limit {
            if self.facts_studied >= limit {
                return true;
            }
        }
        if let Some(minutes) = self.limits.time_limit_minutes {
            if now >= self.started_at.plus_minutes(minutes) {
                return true;
            }
        }
        false
    }

    pub fn record_shown(&mut self, fact: &Fact) -> Result<(), StudyError> {
        if !self.is_open() {
            return Err(StudyError::SessionClosed);
        }
        self.facts_studied += 1;
        self.awaiting = Some(fact.fact_id);
        Ok(())
    }

    /// Record the answer to the fact shown last. An answer for any other
    /// fact, or a second answer to the same presentation, is not counted.
    /// Returns whether the answer was counted.
    pub fn record_answer(&mut self, fact_id: FactId, correct: bool) -> Result<bool, StudyError> {
        if !self.is_open() {
            return Err(StudyError::SessionClosed);
        }
        if self.awaiting != Some(fact_id) {
            return Ok(false);
        }
        self.awaiting = None;
        if correct {
            self.correct_answers += 1;
        }
        Ok(true)
    }

    pub fn close(&mut self, now: Timestamp) -> Result<SessionSummary, StudyError> {
        if !self.is_open() {
            return Err(StudyError::SessionClosed);
        }
        self.finish(now);
        Ok(self.summary())
    }

    fn finish(&mut self, now: Timestamp) {
        self.state = SessionState::Closed { ended_at: now };
        self.awaiting = None;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            facts_studied: self.facts_studied,
            correct_answers: self.correct_answers,
            accuracy: accuracy(self.facts_studied, self.correct_answers),
        }
    }
}

/// Holds at most one open session.
#[derive(Default, Debug)]
pub struct SessionTracker {
    current: Option<Session>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        self.current.as_mut()
    }

    /// Open a new session. The session that was open before, if any, is
    /// closed and returned with its counts intact.
    pub fn start(
        &mut self,
        deck_id: DeckId,
        mode: StudyMode,
        limits: SessionLimits,
        now: Timestamp,
    ) -> Option<Session> {
        let previous = self.end(now);
        self.current = Some(Session::start(deck_id, mode, limits, now));
        previous
    }

    /// Close and hand back the open session, if any.
    pub fn end(&mut self, now: Timestamp) -> Option<Session> {
        let mut session = self.current.take()?;
        if session.is_open() {
            session.finish(now);
        }
        Some(session)
    }
}
