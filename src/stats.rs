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

use crate::db::SessionRecord;
use crate::types::date::Date;
use crate::types::fact::Fact;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub deck_name: String,
    pub total_facts: usize,
    pub reviewed_facts: usize,
    pub due_facts: usize,
    pub new_facts: usize,
    /// Mean ease factor over the whole deck, to two decimal places.
    pub avg_ease_factor: f64,
    pub recent_sessions: Vec<SessionRecord>,
}

pub fn deck_stats(
    deck_name: &str,
    facts: &[Fact],
    today: Date,
    recent_sessions: Vec<SessionRecord>,
) -> DeckStats {
    let total_facts = facts.len();
    let new_facts = facts.iter().filter(|f| f.review.is_new()).count();
    let due_facts = facts.iter().filter(|f| f.review.is_due(today)).count();
    let avg_ease_factor = if total_facts == 0 {
        0.0
    } else {
        let sum: f64 = facts.iter().map(|f| f.review.ease_factor).sum();
        (sum / total_facts as f64 * 100.0).round() / 100.0
    };
    DeckStats {
        deck_name: deck_name.to_string(),
        total_facts,
        reviewed_facts: total_facts - new_facts,
        due_facts,
        new_facts,
        avg_ease_factor,
        recent_sessions,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::fact::ReviewState;

    #[test]
    fn test_deck_stats() {
        let today = Date::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let make = |fact_id, ease_factor, next_review_date| Fact {
            fact_id,
            deck_id: 1,
            content: String::new(),
            review: ReviewState {
                ease_factor,
                next_review_date,
                last_reviewed: next_review_date,
                ..ReviewState::default()
            },
            times_shown: 0,
            times_correct: 0,
        };
        let facts = vec![
            make(1, 2.5, None),
            make(2, 1.3, Some(today)),
            make(3, 2.6, Some(today.add_days(4).unwrap())),
        ];
        let stats = deck_stats("Science", &facts, today, Vec::new());
        assert_eq!(stats.total_facts, 3);
        assert_eq!(stats.new_facts, 1);
        assert_eq!(stats.reviewed_facts, 2);
        assert_eq!(stats.due_facts, 2);
        assert_eq!(stats.avg_ease_factor, 2.13);
    }

    #[test]
    fn test_empty_deck_stats() {
        let today = Date::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let stats = deck_stats("Empty", &[], today, Vec::new());
        assert_eq!(stats.total_facts, 0);
        assert_eq!(stats.avg_ease_factor, 0.0);
    }
}
