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

use axum::Json;
use axum::extract::Path;
use axum::extract::State;

use crate::api::response::ApiResult;
use crate::api::state::ServerState;
use crate::error::StudyError;
use crate::stats::DeckStats;
use crate::study::SessionProgress;
use crate::study::Status;
use crate::types::deck::DeckExport;
use crate::types::deck::DeckSummary;
use crate::types::timestamp::Timestamp;

pub async fn status_handler(State(state): State<ServerState>) -> ApiResult<Status> {
    let mutable = state.lock()?;
    Ok(Json(mutable.context.status()))
}

pub async fn list_decks_handler(State(state): State<ServerState>) -> ApiResult<Vec<DeckSummary>> {
    let mutable = state.lock()?;
    Ok(Json(mutable.db.list_decks()?))
}

pub async fn get_deck_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> ApiResult<DeckExport> {
    let mutable = state.lock()?;
    let deck = mutable.db.load_deck_by_name(&name)?;
    Ok(Json(DeckExport::from(deck)))
}

/// Export the current deck.
pub async fn export_handler(State(state): State<ServerState>) -> ApiResult<DeckExport> {
    let mutable = state.lock()?;
    let Some(deck_id) = mutable.context.deck_id() else {
        return Err(StudyError::NoDeckLoaded.into());
    };
    let deck = mutable.db.load_deck(deck_id)?;
    Ok(Json(DeckExport::from(deck)))
}

/// Progress of the session in progress; `null` when there is none.
pub async fn progress_handler(
    State(state): State<ServerState>,
) -> ApiResult<Option<SessionProgress>> {
    let mutable = state.lock()?;
    Ok(Json(mutable.context.progress(Timestamp::now())))
}

pub async fn stats_handler(State(state): State<ServerState>) -> ApiResult<DeckStats> {
    let mutable = state.lock()?;
    let today = Timestamp::now().local_date();
    Ok(Json(mutable.context.stats(&mutable.db, today)?))
}
