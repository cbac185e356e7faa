//! Suites (folders) and the response envelopes shared by all endpoints

use serde::{Deserialize, Serialize};

/// A suite groups test cases inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub cases_count: u32,
}

/// Request body for `POST /suite/{project}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSuite {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Standard wrapper around every API response
#[derive(Debug, Deserialize)]
pub struct QaseResponse<T> {
    pub status: bool,
    pub result: Option<T>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

/// Paged list payload returned by list endpoints
#[derive(Debug, Deserialize)]
pub struct EntityList<T> {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub count: u32,
    pub entities: Vec<T>,
}

/// Result of create endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}
