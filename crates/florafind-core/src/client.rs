//! Network Client
//!
//! One async method per backend endpoint. Every call resolves to a parsed
//! payload or a [`ClientError`]; GETs retry transient failures.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    ActionResponse, CareSchedule, Challenge, ChallengesResponse, CompleteTaskResponse,
    GardenResponse, LeaderboardEntry, LeaderboardResponse, LocationSuggestions, QueryReply,
    RawQueryResponse, UserStats,
};

/// Characters left unescaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddToGardenArgs {
    pub plant_id: u32,
    pub nickname: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date_planted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipArgs {
    pub plant_name: String,
    pub care_tip: String,
    pub location: String,
}

#[derive(Serialize)]
struct WithUser<'a, T: Serialize> {
    user_id: u32,
    #[serde(flatten)]
    args: &'a T,
}

#[derive(Serialize)]
struct CompleteTaskArgs<'a> {
    user_plant_id: u32,
    task_type: &'a str,
    user_id: u32,
}

#[derive(Serialize)]
struct AddCareTaskArgs<'a> {
    user_plant_id: u32,
    task_type: &'a str,
    frequency_days: u32,
}

// ========================
// Backend Seam
// ========================

/// The FloraFind backend as the client sees it
#[async_trait(?Send)]
pub trait Backend {
    async fn query(&self, q: &str, location: Option<&str>) -> Result<QueryReply, ClientError>;
    async fn add_to_garden(&self, args: &AddToGardenArgs) -> Result<ActionResponse, ClientError>;
    async fn care_calendar(
        &self,
        plant_id: u32,
        location: Option<&str>,
    ) -> Result<CareSchedule, ClientError>;
    async fn my_garden(&self) -> Result<GardenResponse, ClientError>;
    async fn complete_care_task(
        &self,
        user_plant_id: u32,
        task_type: &str,
    ) -> Result<CompleteTaskResponse, ClientError>;
    async fn challenges(&self) -> Result<Vec<Challenge>, ClientError>;
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ClientError>;
    async fn submit_tip(&self, args: &TipArgs) -> Result<ActionResponse, ClientError>;
    async fn add_care_task(
        &self,
        user_plant_id: u32,
        task_type: &str,
        frequency_days: u32,
    ) -> Result<ActionResponse, ClientError>;
    async fn location_suggestions(&self, city: &str) -> Result<LocationSuggestions, ClientError>;
    async fn user_stats(&self) -> Result<UserStats, ClientError>;
}

// ========================
// Helpers
// ========================

/// `k=v&k=v` with percent-encoded values
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&")
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

/// Classify a response body. An `error` field wins over the status code,
/// then non-2xx statuses, then the payload shape.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok();

    let backend_error = value.as_ref().and_then(|v| v.get("error")).and_then(|e| match e {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    if let Some(message) = backend_error {
        return Err(ClientError::Backend(message));
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::Status {
            status,
            message: snippet(body),
        });
    }

    let value = value.ok_or_else(|| ClientError::Decode(format!("not JSON: {}", snippet(body))))?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    gloo_timers::future::sleep(delay).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

// ========================
// HTTP Implementation
// ========================

#[derive(Debug, Clone)]
pub struct FloraClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl FloraClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn read(response: reqwest::Response) -> Result<(u16, String), ClientError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok((status, body))
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let (status, body) = Self::read(response).await?;
        decode_body(status, &body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        let policy = self.config.retry;
        let mut attempt = 1;
        loop {
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(url = %url, attempt, kind = e.kind(), error = %e, delay_ms = delay.as_millis() as u64, "GET failed, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(url = %url, attempt, kind = e.kind(), error = %e, "GET failed");
                    return Err(e);
                }
            }
        }
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        let result = async {
            let response = self
                .http
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            let (status, text) = Self::read(response).await?;
            decode_body(status, &text)
        }
        .await;
        if let Err(e) = &result {
            tracing::error!(url = %url, kind = e.kind(), error = %e, "POST failed");
        }
        result
    }
}

#[async_trait(?Send)]
impl Backend for FloraClient {
    async fn query(&self, q: &str, location: Option<&str>) -> Result<QueryReply, ClientError> {
        let user_id = self.config.user_id.to_string();
        let qs = query_string(&[
            ("q", q),
            ("user_id", &user_id),
            ("location", location.unwrap_or("")),
        ]);
        let raw: RawQueryResponse = self.get(&format!("/query?{}", qs)).await?;
        Ok(raw.into_reply())
    }

    async fn add_to_garden(&self, args: &AddToGardenArgs) -> Result<ActionResponse, ClientError> {
        let body = WithUser {
            user_id: self.config.user_id,
            args,
        };
        self.post("/add_to_garden", &body).await
    }

    async fn care_calendar(
        &self,
        plant_id: u32,
        location: Option<&str>,
    ) -> Result<CareSchedule, ClientError> {
        let qs = query_string(&[("location", location.unwrap_or(""))]);
        self.get(&format!("/care_calendar/{}?{}", plant_id, qs)).await
    }

    async fn my_garden(&self) -> Result<GardenResponse, ClientError> {
        self.get(&format!("/my_garden/{}", self.config.user_id)).await
    }

    async fn complete_care_task(
        &self,
        user_plant_id: u32,
        task_type: &str,
    ) -> Result<CompleteTaskResponse, ClientError> {
        let body = CompleteTaskArgs {
            user_plant_id,
            task_type,
            user_id: self.config.user_id,
        };
        self.post("/complete_care_task", &body).await
    }

    async fn challenges(&self) -> Result<Vec<Challenge>, ClientError> {
        let resp: ChallengesResponse = self.get("/community/challenges").await?;
        Ok(resp.challenges)
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ClientError> {
        let resp: LeaderboardResponse = self.get("/leaderboard").await?;
        Ok(resp.leaderboard)
    }

    async fn submit_tip(&self, args: &TipArgs) -> Result<ActionResponse, ClientError> {
        let body = WithUser {
            user_id: self.config.user_id,
            args,
        };
        self.post("/community/submit_tip", &body).await
    }

    async fn add_care_task(
        &self,
        user_plant_id: u32,
        task_type: &str,
        frequency_days: u32,
    ) -> Result<ActionResponse, ClientError> {
        let body = AddCareTaskArgs {
            user_plant_id,
            task_type,
            frequency_days,
        };
        self.post("/add_care_task", &body).await
    }

    async fn location_suggestions(&self, city: &str) -> Result<LocationSuggestions, ClientError> {
        let qs = query_string(&[("city", city)]);
        self.get(&format!("/location_suggestions?{}", qs)).await
    }

    async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.get(&format!("/user_stats/{}", self.config.user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_encodes_values() {
        assert_eq!(
            query_string(&[("q", "What grows in monsoon?"), ("location", "")]),
            "q=What%20grows%20in%20monsoon%3F&location="
        );
        assert_eq!(query_string(&[("city", "São Paulo")]), "city=S%C3%A3o%20Paulo");
    }

    #[test]
    fn test_error_field_wins() {
        let err = decode_body::<UserStats>(500, r#"{"error": "Search failed"}"#).unwrap_err();
        assert_eq!(err, ClientError::Backend("Search failed".into()));

        // the community endpoints answer 200 with an error next to an empty list
        let err = decode_body::<ChallengesResponse>(200, r#"{"challenges": [], "error": "db down"}"#)
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("db down"));
    }

    #[test]
    fn test_status_without_error_field() {
        let err = decode_body::<UserStats>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 502, .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_malformed_payload() {
        let err = decode_body::<UserStats>(200, "{oops").unwrap_err();
        assert_eq!(err.kind(), "decode");
        let err = decode_body::<ChallengesResponse>(200, r#"{"challenges": 3}"#).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_success_payload() {
        let stats: UserStats = decode_body(200, r#"{"points": 250, "level": 2, "badges": 3}"#).unwrap();
        assert_eq!(stats.badges, 3);
        let stats: UserStats = decode_body(200, r#"{"points": 10, "error": null}"#).unwrap();
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_user_id_is_flattened_into_body() {
        let args = TipArgs {
            plant_name: "Tulsi".into(),
            care_tip: "Morning sun".into(),
            location: "Pune".into(),
        };
        let json = serde_json::to_value(WithUser { user_id: 1, args: &args }).unwrap();
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["care_tip"], "Morning sun");
    }
}
