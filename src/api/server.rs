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

use std::sync::Arc;
use std::sync::Mutex;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;

use crate::api::get::export_handler;
use crate::api::get::get_deck_handler;
use crate::api::get::list_decks_handler;
use crate::api::get::progress_handler;
use crate::api::get::stats_handler;
use crate::api::get::status_handler;
use crate::api::post::answer_handler;
use crate::api::post::delete_deck_handler;
use crate::api::post::end_session_handler;
use crate::api::post::load_deck_handler;
use crate::api::post::load_sample_handler;
use crate::api::post::mode_handler;
use crate::api::post::next_fact_handler;
use crate::api::post::start_session_handler;
use crate::api::post::upload_handler;
use crate::api::state::MutableState;
use crate::api::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::study::StudyContext;
use crate::types::timestamp::Timestamp;

pub async fn start_server(directory: Option<String>, port: Option<u16>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let port = port.unwrap_or(coll.config.port);
    let sample = coll.sample_deck()?;
    log::debug!(
        "Serving {} ({} decks).",
        coll.directory.display(),
        coll.db.list_decks()?.len()
    );

    let state = ServerState {
        port,
        sample: Arc::new(sample),
        mutable: Arc::new(Mutex::new(MutableState {
            context: StudyContext::new(&coll.config),
            db: coll.db,
            rng: StdRng::from_entropy(),
        })),
    };
    let app = Router::new();
    let app = app.route("/status", get(status_handler));
    let app = app.route("/decks", get(list_decks_handler));
    let app = app.route("/decks/{name}", get(get_deck_handler));
    let app = app.route("/decks/{name}", delete(delete_deck_handler));
    let app = app.route("/decks/{name}/load", post(load_deck_handler));
    let app = app.route("/upload", post(upload_handler));
    let app = app.route("/load_sample", post(load_sample_handler));
    let app = app.route("/export", get(export_handler));
    let app = app.route("/mode", post(mode_handler));
    let app = app.route("/next_fact", post(next_fact_handler));
    let app = app.route("/submit_answer/{fact_id}/{quality}", post(answer_handler));
    let app = app.route("/session", post(start_session_handler));
    let app = app.route("/session/end", post(end_session_handler));
    let app = app.route("/session/progress", get(progress_handler));
    let app = app.route("/stats", get(stats_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("0.0.0.0:{}", state.port);

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Close the session in progress so its counts are kept.
    let mut mutable = state.lock()?;
    let MutableState { db, context, .. } = &mut *mutable;
    context.end_session(db, Timestamp::now())?;
    log::debug!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl-C, shutting down."),
        Err(e) => log::error!("error: cannot listen for Ctrl-C: {e}"),
    }
}

async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Not Found" })),
    )
}
