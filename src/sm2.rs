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

//! The SM-2 review scheduler.

use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::StudyError;
use crate::types::date::Date;
use crate::types::fact::ReviewState;

/// The ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The ease factor of a fact that was never reviewed.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The lowest quality that counts as a successful recall.
const PASSING_QUALITY: u8 = 3;

/// Interval after the first successful review, in days.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second successful review, in days.
const SECOND_INTERVAL: u32 = 6;

/// Intervals never grow past this many days.
pub const MAX_INTERVAL: u32 = 36_500;

/// How well a fact was recalled, from 0 (total failure) to 5 (perfect).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i64) -> Result<Self, StudyError> {
        match u8::try_from(value) {
            Ok(q) if q <= 5 => Ok(Self(q)),
            _ => Err(StudyError::InvalidQuality(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

/// The change in ease factor for an answer of the given quality.
///
/// This is applied on failed answers as well as successful ones.
pub fn ease_delta(quality: Quality) -> f64 {
    let miss = f64::from(5 - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

/// The interval after a third or later successful review, capped at
/// [`MAX_INTERVAL`].
fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).floor();
    if grown >= f64::from(MAX_INTERVAL) {
        MAX_INTERVAL
    } else {
        // In `0..MAX_INTERVAL`, so the cast is exact.
        grown.max(1.0) as u32
    }
}

/// Compute a fact's review state after it is answered on `today`.
///
/// Fails only if the next review date cannot be represented.
pub fn apply_answer(state: &ReviewState, quality: Quality, today: Date) -> Fallible<ReviewState> {
    let (repetitions, interval) = if quality.is_success() {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => FIRST_INTERVAL,
            2 => SECOND_INTERVAL,
            _ => grow_interval(state.interval, state.ease_factor),
        };
        (repetitions, interval)
    } else {
        (0, 1)
    };
    let ease_factor = (state.ease_factor + ease_delta(quality)).max(MIN_EASE_FACTOR);
    let next_review_date = today.add_days(interval).ok_or_else(|| {
        ErrorReport::new(format!("next review date is out of range: {today} + {interval} days."))
    })?;
    Ok(ReviewState {
        ease_factor,
        interval,
        repetitions,
        next_review_date: Some(next_review_date),
        last_reviewed: Some(today),
    })
}
