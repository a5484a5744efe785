use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tally::{Outcome, VoteValue};

pub const DEFAULT_ELEMENT_TYPE: &str = "knowledge_piece";
pub const DEFAULT_ACTION_TYPE: &str = "opinion";

// ===== Stored entities =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub guiding_values: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub element_type: String,
    /// Ids of elements linked to this one. The relation is symmetric.
    pub related: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Action {
    pub id: Uuid,
    pub user_id: Uuid,
    pub element_id: Option<Uuid>,
    pub action_type: String,
    pub content: String,
    pub linked_elements: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub action_id: Uuid,
    pub user_id: Uuid,
    pub value: VoteValue,
    pub cast_at: DateTime<Utc>,
}

// ===== Inputs =====

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub guiding_values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewElement {
    pub title: String,
    #[serde(rename = "type", default = "default_element_type")]
    pub element_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAction {
    pub user_id: Uuid,
    #[serde(default)]
    pub element_id: Option<Uuid>,
    #[serde(default = "default_action_type")]
    pub action_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub linked_elements: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub element_id_1: Uuid,
    pub element_id_2: Uuid,
}

/// `value` stays a raw integer here so an out-of-range ballot is a 400
/// from the handler rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: Uuid,
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

fn default_element_type() -> String {
    DEFAULT_ELEMENT_TYPE.to_string()
}

fn default_action_type() -> String {
    DEFAULT_ACTION_TYPE.to_string()
}

// ===== Responses =====

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

/// Derived on every read from the action's current votes, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub action_id: Uuid,
    #[serde(rename = "type")]
    pub action_type: String,
    pub content: String,
    pub is_approved: bool,
    pub outcome: Outcome,
    pub total_votes: u64,
    pub score: i64,
    pub votes: Vec<Vote>,
}
