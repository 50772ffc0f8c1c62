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

mod get;
mod post;
mod response;
pub mod server;
mod state;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::Value;
    use serde_json::json;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::api::server::start_server;
    use crate::error::Fallible;
    use crate::helper::test_deck;

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> Fallible<()> {
        let result = start_server(Some("./derpherp".to_string()), Some(0)).await;
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    async fn get(url: &str) -> Result<(StatusCode, Value), reqwest::Error> {
        let response = reqwest::get(url).await?;
        let status = response.status();
        Ok((status, response.json().await?))
    }

    async fn post(url: &str, body: Option<Value>) -> Result<(StatusCode, Value), reqwest::Error> {
        let request = Client::new().post(url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        Ok((status, response.json().await?))
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let directory = dir.path().display().to_string();
        let port = portpicker::pick_unused_port().unwrap();
        spawn(async move { start_server(Some(directory), Some(port)).await });
        loop {
            if let Ok(stream) = TcpStream::connect(format!("127.0.0.1:{port}")).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        let base = format!("http://127.0.0.1:{port}");
        let url = |path: &str| format!("{base}{path}");

        // Nothing is loaded yet.
        let (status, body) = get(&url("/status")).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loaded"], false);
        assert_eq!(body["mode"], "spaced");
        let (status, body) = post(&url("/next_fact"), None).await.unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "no deck loaded.");

        // Invalid uploads.
        let response = Client::new()
            .post(url("/upload"))
            .body(r#"{"deckName": "Empty", "facts": []}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = Client::new()
            .post(url("/upload"))
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Upload a deck.
        let deck = serde_json::to_value(test_deck())?;
        let count = test_deck().facts.len();
        let (status, body) = post(&url("/upload"), Some(deck.clone())).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deckName"], "Test Deck");
        assert_eq!(body["count"], count);
        let (status, _) = post(&url("/upload"), Some(deck)).await.unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        let (_, body) = get(&url("/decks")).await.unwrap();
        assert_eq!(body, json!([{"deckName": "Test Deck", "count": count}]));

        // Present a fact and answer it.
        let (status, body) = post(&url("/next_fact"), None).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "fact");
        assert_eq!(body["review"]["easeFactor"], 2.5);
        let fact_id = body["factId"].as_i64().unwrap();
        let (status, body) = post(&url(&format!("/submit_answer/{fact_id}/7")), None)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid quality 7: must be between 0 and 5.");
        let (status, body) = post(&url(&format!("/submit_answer/{fact_id}/4")), None)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["interval"], 1);
        assert_eq!(body["easeFactor"], 2.5);
        assert!(body["nextReviewDate"].is_string());
        let (status, _) = post(&url("/submit_answer/999999/4"), None).await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get(&url("/session/progress")).await.unwrap();
        assert_eq!(body["factsStudied"], 1);
        assert_eq!(body["correctAnswers"], 1);
        assert_eq!(body["accuracy"], 100.0);

        // Switching modes closes the session.
        let (status, body) = post(&url("/mode"), Some(json!({"mode": "random"})))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["factsStudied"], 1);
        let (_, body) = get(&url("/session/progress")).await.unwrap();
        assert!(body.is_null());

        // A custom session with a fact limit of one.
        let (status, _) = post(&url("/session"), Some(json!({"factLimit": 1})))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        let (_, body) = post(&url("/next_fact"), None).await.unwrap();
        assert_eq!(body["status"], "fact");
        assert!(body.get("review").is_none());
        let (_, body) = post(&url("/next_fact"), None).await.unwrap();
        assert_eq!(body["status"], "sessionLimitReached");
        let (_, body) = post(&url("/session/end"), None).await.unwrap();
        assert_eq!(body["summary"]["factsStudied"], 1);
        assert_eq!(body["summary"]["accuracy"], 0.0);

        // Statistics and export.
        let (_, body) = get(&url("/stats")).await.unwrap();
        assert_eq!(body["totalFacts"], count);
        assert_eq!(body["reviewedFacts"], 1);
        assert_eq!(body["newFacts"], count - 1);
        assert_eq!(body["recentSessions"].as_array().unwrap().len(), 2);
        let (_, body) = get(&url("/export")).await.unwrap();
        assert_eq!(body["deckName"], "Test Deck");
        assert_eq!(body["facts"].as_array().unwrap().len(), count);

        // The sample deck.
        let (status, body) = post(&url("/load_sample"), None).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deckName"], "Sample_Facts");

        // Deletion.
        let response = Client::new()
            .delete(url("/decks/Test%20Deck"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let (_, body) = get(&url("/decks")).await.unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (status, _) = get(&url("/decks/Test%20Deck")).await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&url("/herp-derp")).await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }
}
