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
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::json;

use crate::error::ErrorReport;
use crate::error::StudyError;

/// An error on its way to the client as `{"status": "error", "message": ...}`.
pub struct ApiError(ErrorReport);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl<E: Into<ErrorReport>> From<E> for ApiError {
    fn from(value: E) -> Self {
        ApiError(value.into())
    }
}

fn status_code(err: &ErrorReport) -> StatusCode {
    match err.study_error() {
        Some(StudyError::InvalidQuality(_)) | Some(StudyError::InvalidDeck(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(StudyError::FactNotFound(_)) | Some(StudyError::DeckNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        Some(StudyError::DuplicateDeck(_))
        | Some(StudyError::NoDeckLoaded)
        | Some(StudyError::SessionClosed) => StatusCode::CONFLICT,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        log::error!("{} ({status})", self.0);
        let body = json!({
            "status": "error",
            "message": self.0.message(),
        });
        (status, Json(body)).into_response()
    }
}
