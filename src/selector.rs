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

//! Choosing which fact to present next.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::date::Date;
use crate::types::fact::Fact;
use crate::types::mode::StudyMode;

/// In spaced mode, the next fact is drawn from this many of the most urgent
/// due facts.
pub const URGENT_POOL_SIZE: usize = 5;

/// In spaced mode, when nothing is due, the next fact is drawn from at most
/// this many never-reviewed facts.
pub const NEW_POOL_SIZE: usize = 10;

/// Facts whose ease factor is below this are crammed.
pub const HARD_EASE_THRESHOLD: f64 = 2.0;

/// The positions of the facts shown since the deck was loaded, or since
/// every fact was shown.
#[derive(Clone, Default, Debug)]
pub struct ViewedSet {
    positions: HashSet<usize>,
}

impl ViewedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Pick a position in a deck of `deck_len` facts that has not been
    /// viewed yet, and mark it viewed. Once every position has been viewed
    /// the set starts over.
    pub fn select<R: Rng + ?Sized>(&mut self, deck_len: usize, rng: &mut R) -> Option<usize> {
        if deck_len == 0 {
            return None;
        }
        if (0..deck_len).all(|p| self.positions.contains(&p)) {
            self.positions.clear();
        }
        let available: Vec<usize> = (0..deck_len)
            .filter(|p| !self.positions.contains(p))
            .collect();
        let position = *available.choose(rng)?;
        self.positions.insert(position);
        Some(position)
    }
}

/// Choose the next fact to present from `facts`, which must be in deck
/// order. Returns `None` when the deck is empty or no fact qualifies.
///
/// In random mode, passing a viewed set selects the no-repeat policy: no
/// fact is shown twice until every fact has been shown once.
pub fn select_next<'a, R: Rng + ?Sized>(
    facts: &'a [Fact],
    mode: StudyMode,
    viewed: Option<&mut ViewedSet>,
    today: Date,
    rng: &mut R,
) -> Option<&'a Fact> {
    match mode {
        StudyMode::Spaced => select_spaced(facts, today, rng),
        StudyMode::Review => facts.choose(rng),
        StudyMode::Cram => select_cram(facts, rng),
        StudyMode::Random => match viewed {
            Some(viewed) => {
                let position = viewed.select(facts.len(), rng)?;
                facts.get(position)
            }
            None => facts.choose(rng),
        },
    }
}

fn select_spaced<'a, R: Rng + ?Sized>(
    facts: &'a [Fact],
    today: Date,
    rng: &mut R,
) -> Option<&'a Fact> {
    let mut due: Vec<&Fact> = facts
        .iter()
        .filter(|fact| fact.review.is_due(today))
        .collect();
    if !due.is_empty() {
        // Stable, and `None` sorts first: never-reviewed facts are the most
        // urgent, and ties keep deck order.
        due.sort_by_key(|fact| fact.review.next_review_date);
        due.truncate(URGENT_POOL_SIZE);
        return due.choose(rng).copied();
    }
    let new: Vec<&Fact> = facts
        .iter()
        .filter(|fact| fact.review.is_new())
        .take(NEW_POOL_SIZE)
        .collect();
    new.choose(rng).copied()
}

fn select_cram<'a, R: Rng + ?Sized>(facts: &'a [Fact], rng: &mut R) -> Option<&'a Fact> {
    let hard: Vec<&Fact> = facts
        .iter()
        .filter(|fact| fact.review.ease_factor < HARD_EASE_THRESHOLD)
        .collect();
    if hard.is_empty() {
        facts.choose(rng)
    } else {
        hard.choose(rng).copied()
    }
}
