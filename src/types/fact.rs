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

use serde::Serialize;

use crate::sm2::DEFAULT_EASE_FACTOR;
use crate::types::date::Date;

pub type FactId = i64;

pub type DeckId = i64;

/// The spaced-repetition attributes of a fact.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// Multiplier controlling interval growth. Never below 1.3.
    pub ease_factor: f64,
    /// Days until the next review. Always at least 1.
    pub interval: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    /// `None` when the fact has never been reviewed.
    pub next_review_date: Option<Date>,
    pub last_reviewed: Option<Date>,
}

impl ReviewState {
    pub fn is_new(&self) -> bool {
        self.next_review_date.is_none()
    }

    /// Whether the fact should be reviewed on `today`. Facts that were never
    /// reviewed are always due.
    pub fn is_due(&self, today: Date) -> bool {
        match self.next_review_date {
            None => true,
            Some(date) => date <= today,
        }
    }
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
            next_review_date: None,
            last_reviewed: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Fact {
    pub fact_id: FactId,
    pub deck_id: DeckId,
    /// The prompt text. Opaque to the scheduler.
    pub content: String,
    pub review: ReviewState,
    pub times_shown: u32,
    pub times_correct: u32,
}
