// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. `password` only ever holds the PHC hash string.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub votes: i64,
}

impl PollOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            votes: 0,
        }
    }
}

/// A poll as stored and as returned over the API. Options are addressed by
/// their position, so their order never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<PollOption>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_index: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_serializes_with_camel_case_fields() {
        let poll = Poll {
            id: Uuid::nil(),
            question: "Q".into(),
            options: vec![PollOption::new("X")],
            created_by: "u1".into(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };

        let value = serde_json::to_value(&poll).unwrap();
        assert_eq!(value["createdBy"], "u1");
        assert_eq!(value["options"][0]["text"], "X");
        assert_eq!(value["options"][0]["votes"], 0);
        assert!(value.get("created_by").is_none());
    }

    #[test]
    fn vote_request_reads_option_index() {
        let req: VoteRequest = serde_json::from_str(r#"{"optionIndex": 2}"#).unwrap();
        assert_eq!(req.option_index, 2);
    }
}
