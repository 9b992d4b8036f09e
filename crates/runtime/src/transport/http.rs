//! HTTP client for the game service's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;

use crate::api::{
    BotId, GameService, ProtocolError, ServiceError, SessionId, SessionView, TransportError,
};

/// Game service reached over HTTP.
///
/// Endpoints, relative to the base URL:
/// - `POST /games` with the ordered bot list as body
/// - `POST /games/{id}/step`
/// - `GET /games/{id}`
///
/// Timeouts are enforced by the underlying client. A request that times out
/// is reported like any other transport failure.
pub struct HttpGameService {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGameService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                endpoint: base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        endpoint: String,
    ) -> Result<SessionView, ServiceError> {
        tracing::debug!("Game service request: {}", endpoint);

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
                body: rejection_message(&body).unwrap_or(body),
            }
            .into());
        }

        Ok(decode_view(&body)?)
    }
}

#[async_trait]
impl GameService for HttpGameService {
    async fn create_session(&self, participants: &[BotId]) -> Result<SessionView, ServiceError> {
        let endpoint = self.endpoint("games");
        let request = self.http_client.post(&endpoint).json(participants);
        self.send(request, endpoint).await
    }

    async fn step_session(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        let endpoint = self.endpoint(&format!("games/{}/step", id));
        let request = self.http_client.post(&endpoint);
        self.send(request, endpoint).await
    }

    async fn get_session(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        let endpoint = self.endpoint(&format!("games/{}", id));
        let request = self.http_client.get(&endpoint);
        self.send(request, endpoint).await
    }
}

#[derive(Deserialize)]
struct Rejection {
    error: String,
}

/// The service reports some failures as `{"error": "..."}`, occasionally with
/// a success status.
fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<Rejection>(body).ok().map(|r| r.error)
}

pub(crate) fn decode_view(body: &str) -> Result<SessionView, ProtocolError> {
    match serde_json::from_str::<SessionView>(body) {
        Ok(view) => Ok(view),
        Err(err) => match rejection_message(body) {
            Some(message) => Err(ProtocolError::Rejected(message)),
            None => Err(ProtocolError::Decode(err)),
        },
    }
}
