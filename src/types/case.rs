//! Test case payloads and their coded fields

use serde::{Deserialize, Serialize};

use super::codes::coded_enum;
use crate::steps::Step;

coded_enum! {
    /// How bad a failure of this case would be
    pub enum Severity ("severity") {
        Blocker = 1 => "blocker",
        Critical = 2 => "critical",
        Major = 3 => "major",
        Normal = 4 => "normal",
        Minor = 5 => "minor",
        Trivial = 6 => "trivial",
    }
}

coded_enum! {
    pub enum Priority ("priority") {
        High = 1 => "high",
        Medium = 2 => "medium",
        Low = 3 => "low",
    }
}

coded_enum! {
    pub enum TestType ("type") {
        Other = 1 => "other",
        Functional = 2 => "functional",
        Smoke = 3 => "smoke",
        Regression = 4 => "regression",
        Security = 5 => "security",
        Usability = 6 => "usability",
        Performance = 7 => "performance",
        Acceptance = 8 => "acceptance",
    }
}

coded_enum! {
    pub enum Layer ("layer") {
        E2e = 1 => "e2e" | "end_to_end",
        Api = 2 => "api",
        Unit = 3 => "unit",
    }
}

coded_enum! {
    pub enum Automation ("automation") {
        NotAutomated = 0 => "not_automated" | "manual",
        Automated = 1 => "automated",
        ToBeAutomated = 2 => "to_be_automated",
    }
}

coded_enum! {
    /// Lifecycle state of the case itself, not of a test run
    pub enum CaseStatus ("status") {
        Actual = 0 => "actual",
        Draft = 1 => "draft",
        Deprecated = 2 => "deprecated",
    }
}

/// Request body for `POST /case/{project}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTestCase {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<TestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation: Option<Automation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postconditions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CreateTestCase {
    /// Create a payload with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Place the case in a suite unless it already names one
    pub fn with_default_suite(mut self, suite_id: Option<i64>) -> Self {
        if self.suite_id.is_none() {
            self.suite_id = suite_id;
        }
        self
    }
}

/// A case the API acknowledged
///
/// Creation responses only carry the new id; the title is filled in from
/// the request so reports can name the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCase {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}
