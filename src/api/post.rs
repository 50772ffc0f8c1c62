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
use serde::Deserialize;
use serde::Serialize;

use crate::api::response::ApiResult;
use crate::api::state::MutableState;
use crate::api::state::ServerState;
use crate::session::SessionLimits;
use crate::session::SessionSummary;
use crate::study::AnswerOutcome;
use crate::study::Presentation;
use crate::types::deck::DeckFile;
use crate::types::deck::DeckSummary;
use crate::types::fact::FactId;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

#[derive(Deserialize)]
pub struct ModeRequest {
    mode: StudyMode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionRequest {
    mode: Option<StudyMode>,
    fact_limit: Option<usize>,
    time_limit_minutes: Option<u32>,
}

/// The summary of the session a request closed, if it closed one.
#[derive(Serialize)]
pub struct Closed {
    summary: Option<SessionSummary>,
}

#[derive(Serialize)]
pub struct Deleted {
    status: &'static str,
    message: String,
}

/// Store an uploaded deck and make it current. Malformed JSON is reported as
/// an invalid deck.
pub async fn upload_handler(State(state): State<ServerState>, body: String) -> ApiResult<DeckSummary> {
    let deck = DeckFile::from_json(&body)?;
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    Ok(Json(context.upload_deck(db, &deck, Timestamp::now())?))
}

pub async fn load_sample_handler(State(state): State<ServerState>) -> ApiResult<DeckSummary> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    Ok(Json(context.load_sample(db, &state.sample, Timestamp::now())?))
}

pub async fn load_deck_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> ApiResult<DeckSummary> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    Ok(Json(context.load_deck(db, &name, Timestamp::now())?))
}

pub async fn delete_deck_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> ApiResult<Deleted> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    context.delete_deck(db, &name, Timestamp::now())?;
    Ok(Json(Deleted {
        status: "success",
        message: format!("Deck '{name}' deleted."),
    }))
}

pub async fn mode_handler(
    State(state): State<ServerState>,
    Json(request): Json<ModeRequest>,
) -> ApiResult<Closed> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    let summary = context.set_mode(db, request.mode, Timestamp::now())?;
    Ok(Json(Closed { summary }))
}

pub async fn next_fact_handler(State(state): State<ServerState>) -> ApiResult<Presentation> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, rng } = &mut *mutable;
    Ok(Json(context.next_fact(db, Timestamp::now(), rng)?))
}

pub async fn answer_handler(
    State(state): State<ServerState>,
    Path((fact_id, quality)): Path<(FactId, i64)>,
) -> ApiResult<AnswerOutcome> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    Ok(Json(context.submit_answer(db, fact_id, quality, Timestamp::now())?))
}

pub async fn start_session_handler(
    State(state): State<ServerState>,
    Json(request): Json<SessionRequest>,
) -> ApiResult<Closed> {
    let limits = SessionLimits {
        fact_limit: request.fact_limit,
        time_limit_minutes: request.time_limit_minutes,
    };
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    let now = Timestamp::now();
    let summary = context.end_session(db, now)?;
    context.start_session(db, request.mode, limits, now)?;
    Ok(Json(Closed { summary }))
}

pub async fn end_session_handler(State(state): State<ServerState>) -> ApiResult<Closed> {
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    let summary = context.end_session(db, Timestamp::now())?;
    Ok(Json(Closed { summary }))
}
