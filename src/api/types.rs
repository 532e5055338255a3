//! Wire types of the ranking proxy.
//!
//! Field names follow the proxy's JSON exactly (camelCase).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::session::{PlayerIdentity, SessionSummary};

pub const STATUS_SUCCESS: &str = "success";

/// `GET /api/playCount` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCountResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub play_count: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PlayCountResponse {
    /// Play count if the response is a success carrying a number, otherwise 0.
    pub fn count_or_zero(&self) -> u32 {
        if self.status != STATUS_SUCCESS {
            return 0;
        }
        match &self.play_count {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
                .map(|v| v.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// One row of the ranking board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    #[serde(default)]
    pub rank: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub employee_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    /// Average accuracy in percent
    #[serde(default)]
    pub accuracy: f64,
    /// Total time in seconds
    #[serde(default)]
    pub time: f64,
}

impl RankingEntry {
    /// True if this row belongs to the given player.
    pub fn is_player(&self, identity: &PlayerIdentity) -> bool {
        self.company == identity.company && self.employee_id == identity.employee_id
    }
}

/// Employee ids come back as either strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `GET /api/ranking` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<Vec<RankingEntry>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/submit` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub company: String,
    pub employee_id: String,
    pub name: String,
    /// Seconds, two decimals
    pub time_taken: f64,
    /// Percent, two decimals
    pub accuracy: f64,
    pub quiz_results: QuizResults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub total_ms: u64,
    pub avg_accuracy: f64,
    pub rounds: u8,
}

impl SubmitPayload {
    pub fn new(identity: &PlayerIdentity, summary: &SessionSummary) -> Self {
        Self {
            company: identity.company.clone(),
            employee_id: identity.employee_id.clone(),
            name: identity.name.clone(),
            time_taken: summary.time_taken_secs(),
            accuracy: summary.accuracy_percent(),
            quiz_results: QuizResults {
                total_ms: summary.total_ms,
                avg_accuracy: summary.avg_accuracy,
                rounds: summary.rounds,
            },
        }
    }
}

/// `POST /api/submit` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_count(json: &str) -> u32 {
        serde_json::from_str::<PlayCountResponse>(json)
            .unwrap()
            .count_or_zero()
    }

    #[test]
    fn test_play_count_defaults() {
        assert_eq!(parse_count(r#"{"status":"success","playCount":12}"#), 12);
        assert_eq!(parse_count(r#"{"status":"success","playCount":"12"}"#), 0);
        assert_eq!(parse_count(r#"{"status":"success"}"#), 0);
        assert_eq!(parse_count(r#"{"status":"error","playCount":5}"#), 0);
        assert_eq!(parse_count(r#"{}"#), 0);
    }

    #[test]
    fn test_ranking_entry_accepts_numeric_employee_id() {
        let json = r#"{"status":"success","data":[
            {"rank":1,"company":"A","employeeId":1234,"name":"김","accuracy":98.5,"time":41.2},
            {"rank":2,"company":"B","employeeId":"E-9","name":"이","accuracy":90,"time":50}
        ]}"#;
        let resp: RankingResponse = serde_json::from_str(json).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data[0].employee_id, "1234");
        assert_eq!(data[1].employee_id, "E-9");
        assert_eq!(data[1].accuracy, 90.0);
    }

    #[test]
    fn test_submit_payload_field_names() {
        let identity = PlayerIdentity::new("회사", "42", "홍길동");
        let summary = SessionSummary::new(61_234, 480, 5, Vec::new());
        let payload = SubmitPayload::new(&identity, &summary);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["employeeId"], "42");
        assert_eq!(value["timeTaken"], 61.23);
        assert_eq!(value["accuracy"], 96.0);
        assert_eq!(value["quizResults"]["totalMs"], 61_234);
        assert_eq!(value["quizResults"]["avgAccuracy"], 96.0);
        assert_eq!(value["quizResults"]["rounds"], 5);
    }
}
