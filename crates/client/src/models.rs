use serde::{Deserialize, Serialize};

// Ids stay opaque strings on this side; the backend owns their format.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub guiding_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub related: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub user_id: String,
    pub element_id: Option<String>,
    pub action_type: String,
    pub content: String,
    #[serde(default)]
    pub linked_elements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub action_id: String,
    pub user_id: String,
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Decision {
    pub action_id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub content: String,
    pub is_approved: bool,
    pub outcome: String,
    pub total_votes: u64,
    pub score: i64,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub store: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message: String,
}

// ===== Requests =====

#[derive(Debug, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub guiding_values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateElementRequest {
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkRequest {
    pub element_id_1: String,
    pub element_id_2: String,
}

#[derive(Debug, Serialize)]
pub struct CreateActionRequest {
    pub user_id: String,
    pub element_id: Option<String>,
    pub action_type: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_elements: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub user_id: String,
    pub value: i64,
}
