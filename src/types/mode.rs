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

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// How the next fact is chosen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Most urgent due facts first.
    Spaced,
    /// Any fact in the deck.
    Review,
    /// Facts with a low ease factor.
    Cram,
    /// Any fact in the deck, optionally without repeats.
    Random,
}

impl StudyMode {
    pub fn as_str(&self) -> &str {
        match self {
            StudyMode::Spaced => "spaced",
            StudyMode::Review => "review",
            StudyMode::Cram => "cram",
            StudyMode::Random => "random",
        }
    }
}

impl Display for StudyMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for StudyMode {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "spaced" => Ok(StudyMode::Spaced),
            "review" => Ok(StudyMode::Review),
            "cram" => Ok(StudyMode::Cram),
            "random" => Ok(StudyMode::Random),
            _ => fail(format!("Invalid study mode: {}", value)),
        }
    }
}

impl ToSql for StudyMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StudyMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        StudyMode::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
