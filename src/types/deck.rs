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

use serde::Deserialize;
use serde::Serialize;

use crate::error::StudyError;
use crate::types::fact::DeckId;
use crate::types::fact::Fact;
use crate::types::fact::ReviewState;

/// A deck as it is uploaded and exported: a name and an ordered list of
/// fact texts.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFile {
    pub deck_name: String,
    pub facts: Vec<String>,
}

impl DeckFile {
    /// Parse and validate a deck from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, StudyError> {
        let deck: DeckFile = serde_json::from_str(json)
            .map_err(|e| StudyError::InvalidDeck(format!("malformed deck JSON: {e}")))?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.deck_name.trim().is_empty() {
            return Err(StudyError::InvalidDeck("deck name is empty.".to_string()));
        }
        if self.facts.is_empty() {
            return Err(StudyError::InvalidDeck("deck has no facts.".to_string()));
        }
        for (idx, fact) in self.facts.iter().enumerate() {
            if fact.trim().is_empty() {
                return Err(StudyError::InvalidDeck(format!("fact {} is empty.", idx + 1)));
            }
        }
        Ok(())
    }
}

/// A stored deck together with its facts, in upload order.
#[derive(Clone, Debug)]
pub struct Deck {
    pub deck_id: DeckId,
    pub name: String,
    pub facts: Vec<Fact>,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub deck_name: String,
    pub count: usize,
}

impl From<&Deck> for DeckSummary {
    fn from(deck: &Deck) -> Self {
        Self {
            deck_name: deck.name.clone(),
            count: deck.facts.len(),
        }
    }
}

/// A deck with the review state of every fact, for export.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckExport {
    pub deck_name: String,
    pub facts: Vec<FactExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactExport {
    pub content: String,
    #[serde(flatten)]
    pub review: ReviewState,
    pub times_shown: u32,
    pub times_correct: u32,
}

impl From<Deck> for DeckExport {
    fn from(deck: Deck) -> Self {
        let facts = deck
            .facts
            .into_iter()
            .map(|fact| FactExport {
                content: fact.content,
                review: fact.review,
                times_shown: fact.times_shown,
                times_correct: fact.times_correct,
            })
            .collect();
        Self {
            deck_name: deck.name,
            facts,
        }
    }
}
