//! Test case definition files
//!
//! A definition file lists the cases to create. Steps are written as a
//! plain text block, one step per line, and expanded into action /
//! expected-result pairs by the step classifier:
//!
//! ```yaml
//! cases:
//!   - title: Verify login with valid credentials
//!     severity: critical
//!     priority: high
//!     type: smoke
//!     tags: [login, regression]
//!     steps: |
//!       1. Navigate to login page
//!       2. Enter valid username
//!       3. Click login button
//!       4. Verify user is redirected to dashboard
//! ```
//!
//! YAML is the default; `.toml` and `.json` files are read by extension.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::steps;
use crate::types::{
    Automation, CaseStatus, CreateTestCase, Layer, Priority, Severity, TestType,
};

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read definition file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("case #{index} has an empty title")]
    EmptyTitle { index: usize },

    #[error("definition file contains no cases")]
    NoCases,
}

/// Serialization format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Yaml,
    Toml,
    Json,
}

impl DefinitionFormat {
    /// Pick the format from the file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => DefinitionFormat::Toml,
            Some("json") => DefinitionFormat::Json,
            _ => DefinitionFormat::Yaml,
        }
    }
}

/// Top-level shape of a definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default)]
    pub cases: Vec<CaseDefinition>,
}

/// One case as written by the author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDefinition {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(rename = "type", alias = "case_type", default)]
    pub case_type: Option<TestType>,
    #[serde(default)]
    pub layer: Option<Layer>,
    #[serde(default)]
    pub automation: Option<Automation>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub suite_id: Option<i64>,
    /// Step lines, classified on conversion
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub preconditions: Option<String>,
    #[serde(default)]
    pub postconditions: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CaseDefinition {
    /// Build the API payload, classifying the step text
    pub fn into_payload(self) -> CreateTestCase {
        CreateTestCase {
            steps: steps::classify(&self.steps),
            title: self.title.trim().to_string(),
            description: self.description,
            severity: self.severity,
            priority: self.priority,
            case_type: self.case_type,
            layer: self.layer,
            automation: self.automation,
            status: self.status,
            suite_id: self.suite_id,
            preconditions: self.preconditions,
            postconditions: self.postconditions,
            tags: self.tags,
        }
    }
}

/// Read and convert a definition file
pub fn load_definitions(path: &Path) -> Result<Vec<CreateTestCase>, DefinitionError> {
    let content = std::fs::read_to_string(path)?;
    parse_definitions(&content, DefinitionFormat::from_path(path))
}

/// Parse definition text and convert every case to a payload
pub fn parse_definitions(
    content: &str,
    format: DefinitionFormat,
) -> Result<Vec<CreateTestCase>, DefinitionError> {
    let file: DefinitionFile = match format {
        DefinitionFormat::Yaml => serde_yaml::from_str(content)?,
        DefinitionFormat::Toml => toml::from_str(content)?,
        DefinitionFormat::Json => serde_json::from_str(content)?,
    };

    if file.cases.is_empty() {
        return Err(DefinitionError::NoCases);
    }

    file.cases
        .into_iter()
        .enumerate()
        .map(|(i, case)| {
            if case.title.trim().is_empty() {
                Err(DefinitionError::EmptyTitle { index: i + 1 })
            } else {
                Ok(case.into_payload())
            }
        })
        .collect()
}
