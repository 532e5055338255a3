//! Ranking proxy client.
//!
//! Every call degrades to a default instead of failing: an unreachable proxy
//! means 0 plays, an empty board with a message, and a logged submit failure.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use super::types::{
    PlayCountResponse, RankingEntry, RankingResponse, SubmitPayload, SubmitResponse,
    STATUS_SUCCESS,
};
use crate::log;

pub const RANKING_LOAD_ERROR: &str = "랭킹 데이터를 불러오지 못했습니다.";
pub const RANKING_NETWORK_ERROR: &str = "네트워크/CORS 문제로 랭킹을 불러오지 못했습니다.";

/// Ranking board plus an error line to show when it could not be loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingBoard {
    pub entries: Vec<RankingEntry>,
    pub error: Option<String>,
}

impl RankingBoard {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Applies the defaulting rules to a decoded response.
    pub fn from_response(resp: RankingResponse) -> Self {
        match resp.data {
            Some(entries) if resp.status == STATUS_SUCCESS => Self {
                entries,
                error: None,
            },
            _ => Self::failed(
                resp.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| RANKING_LOAD_ERROR.to_string()),
            ),
        }
    }
}

/// Remote score keeping.
pub trait ScoreService {
    /// Completed plays for the player. 0 on any failure.
    fn play_count(&self, company: &str, employee_id: &str) -> u32;

    /// Current ranking board. Never fails; errors become `RankingBoard::error`.
    fn ranking(&self) -> RankingBoard;

    /// Posts a finished session. The caller logs and ignores failures.
    fn submit(&self, payload: &SubmitPayload) -> Result<()>;
}

/// `ScoreService` over the HTTP proxy.
#[derive(Debug, Clone)]
pub struct HttpScoreService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpScoreService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .user_agent("human-ocr")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetch_play_count(&self, company: &str, employee_id: &str) -> Result<PlayCountResponse> {
        let response = self
            .client
            .get(self.url("/api/playCount"))
            .query(&[("company", company), ("employeeId", employee_id)])
            .send()?;
        response
            .json::<PlayCountResponse>()
            .context("Invalid playCount response")
    }

    fn fetch_ranking(&self) -> Result<RankingResponse> {
        let response = self.client.get(self.url("/api/ranking")).send()?;
        response
            .json::<RankingResponse>()
            .context("Invalid ranking response")
    }
}

impl ScoreService for HttpScoreService {
    fn play_count(&self, company: &str, employee_id: &str) -> u32 {
        match self.fetch_play_count(company, employee_id) {
            Ok(resp) => {
                let count = resp.count_or_zero();
                if resp.status != STATUS_SUCCESS {
                    log(&format!(
                        "playCount returned status '{}': {}",
                        resp.status,
                        resp.message.as_deref().unwrap_or("-")
                    ));
                }
                count
            }
            Err(e) => {
                log(&format!("playCount request failed, assuming 0: {}", e));
                0
            }
        }
    }

    fn ranking(&self) -> RankingBoard {
        match self.fetch_ranking() {
            Ok(resp) => RankingBoard::from_response(resp),
            Err(e) => {
                log(&format!("Ranking request failed: {}", e));
                RankingBoard::failed(RANKING_NETWORK_ERROR)
            }
        }
    }

    fn submit(&self, payload: &SubmitPayload) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/submit"))
            .json(payload)
            .send()
            .context("Submit request failed")?;

        let http_status = response.status();
        let body: SubmitResponse = response.json().unwrap_or_default();
        if body.status != STATUS_SUCCESS {
            return Err(anyhow!(
                "Submit rejected (HTTP {}): {}",
                http_status,
                body.message.as_deref().unwrap_or("no message")
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_success() {
        let resp: RankingResponse = serde_json::from_str(
            r#"{"status":"success","data":[{"rank":1,"company":"A","employeeId":"1","name":"N","accuracy":100,"time":30}]}"#,
        )
        .unwrap();
        let board = RankingBoard::from_response(resp);
        assert_eq!(board.entries.len(), 1);
        assert!(board.error.is_none());
    }

    #[test]
    fn test_ranking_error_uses_server_message() {
        let resp: RankingResponse =
            serde_json::from_str(r#"{"status":"error","message":"GAS 오류"}"#).unwrap();
        assert_eq!(RankingBoard::from_response(resp), RankingBoard::failed("GAS 오류"));
    }

    #[test]
    fn test_ranking_error_default_message() {
        let resp: RankingResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        let board = RankingBoard::from_response(resp);
        assert!(board.entries.is_empty());
        assert_eq!(board.error.as_deref(), Some(RANKING_LOAD_ERROR));
    }

    #[test]
    fn test_unreachable_proxy_defaults() {
        // Port 9 (discard) on localhost is closed in test environments
        let service = HttpScoreService::new("http://127.0.0.1:9/", 1).unwrap();
        assert_eq!(service.play_count("A", "1"), 0);
        assert_eq!(service.ranking(), RankingBoard::failed(RANKING_NETWORK_ERROR));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service = HttpScoreService::new("http://localhost:4000/", 5).unwrap();
        assert_eq!(service.url("/api/ranking"), "http://localhost:4000/api/ranking");
    }
}
