//! Bulk creation of test cases
//!
//! [`BulkManager`] drives one run: pick the destination suite, preview and
//! confirm, then submit every case one at a time. A failed case is recorded
//! and the run moves on to the next one.

pub mod definitions;

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

pub use definitions::{
    load_definitions, parse_definitions, CaseDefinition, DefinitionError, DefinitionFile,
    DefinitionFormat,
};

use crate::api::TestCaseService;
use crate::types::{CreateTestCase, CreatedCase};
use crate::ui::{self, Prompter};

/// Where created cases go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuiteChoice {
    /// Ask interactively
    #[default]
    Prompt,
    /// Project root, no suite
    Root,
    /// A known suite id
    Existing(i64),
}

#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub suite: SuiteChoice,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Pause between consecutive create requests
    pub request_delay: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            suite: SuiteChoice::Prompt,
            assume_yes: false,
            request_delay: Duration::from_millis(100),
        }
    }
}

/// A case the service refused
#[derive(Debug, Clone, Serialize)]
pub struct FailedCase {
    pub title: String,
    pub error: String,
}

/// Tally of a submitted batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkSummary {
    pub total: usize,
    pub created: Vec<CreatedCase>,
    pub failed: Vec<FailedCase>,
}

impl BulkSummary {
    pub fn succeeded(&self) -> usize {
        self.created.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.created.len() == self.total
    }
}

#[derive(Debug, Clone)]
pub enum BulkOutcome {
    /// The user declined at the confirmation prompt
    Cancelled,
    Completed(BulkSummary),
}

/// Runs the bulk workflow against a test-management service
pub struct BulkManager<'a> {
    service: &'a dyn TestCaseService,
    options: BulkOptions,
}

impl<'a> BulkManager<'a> {
    pub fn new(service: &'a dyn TestCaseService, options: BulkOptions) -> Self {
        Self { service, options }
    }

    /// Resolve the destination suite, confirm, and create every case
    pub async fn execute(
        &self,
        cases: Vec<CreateTestCase>,
        prompter: &mut dyn Prompter,
    ) -> Result<BulkOutcome> {
        if cases.is_empty() {
            prompter.say("Nothing to create");
            return Ok(BulkOutcome::Completed(BulkSummary::default()));
        }

        let suite_id = match self.options.suite {
            SuiteChoice::Existing(id) => Some(id),
            SuiteChoice::Root => None,
            SuiteChoice::Prompt => ui::select_suite(self.service, prompter).await?,
        };

        let cases = assign_suite(cases, suite_id);
        preview(&cases, prompter);

        if !self.options.assume_yes && !ui::confirm_creation(cases.len(), suite_id, prompter)? {
            info!("Bulk creation cancelled by user");
            prompter.say("Cancelled");
            return Ok(BulkOutcome::Cancelled);
        }

        prompter.say("");
        prompter.say(&format!("Creating {} test cases...", cases.len()));
        let summary = submit_batch(self.service, &cases, self.options.request_delay, prompter).await;

        prompter.say("");
        prompter.say(&format!(
            "Result: {}/{} test cases created",
            summary.succeeded(),
            summary.total
        ));
        if !summary.failed.is_empty() {
            prompter.say(&format!("{} test cases failed", summary.failed.len()));
        }

        Ok(BulkOutcome::Completed(summary))
    }
}

/// Put every case without an explicit suite into `suite_id`
pub fn assign_suite(cases: Vec<CreateTestCase>, suite_id: Option<i64>) -> Vec<CreateTestCase> {
    cases
        .into_iter()
        .map(|case| case.with_default_suite(suite_id))
        .collect()
}

fn preview(cases: &[CreateTestCase], prompter: &mut dyn Prompter) {
    prompter.say("");
    prompter.say(&format!("Test cases ({}):", cases.len()));
    for case in cases {
        prompter.say(&format!("  - {} ({} steps)", case.title, case.steps.len()));
    }
}

/// Create cases one by one, pausing `delay` between requests.
///
/// Never fails as a whole: each error is logged and recorded in the summary.
pub async fn submit_batch(
    service: &dyn TestCaseService,
    cases: &[CreateTestCase],
    delay: Duration,
    prompter: &mut dyn Prompter,
) -> BulkSummary {
    let mut summary = BulkSummary {
        total: cases.len(),
        ..Default::default()
    };

    for (i, case) in cases.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match service.create_case(case).await {
            Ok(created) => {
                info!(id = created.id, title = %case.title, "Test case created");
                prompter.say(&format!("  ✓ {} (ID: {})", case.title, created.id));
                summary.created.push(created);
            }
            Err(e) => {
                if e.is_auth_error() {
                    warn!("Authentication failed; remaining cases will likely fail too");
                }
                error!(title = %case.title, error = %e, "Failed to create test case");
                prompter.say(&format!("  ✗ {}: {}", case.title, e));
                summary.failed.push(FailedCase {
                    title: case.title.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    summary
}

/// Payloads as they would be sent, pretty-printed as JSON
pub fn render_dry_run(cases: &[CreateTestCase]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::steps::classify;
    use crate::types::{CreateSuite, Suite};
    use crate::ui::ScriptedPrompter;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory service that rejects titles containing "reject"
    #[derive(Default)]
    struct FakeService {
        suites: Vec<Suite>,
        created: Mutex<Vec<CreateTestCase>>,
        /// Refuse every create-suite request
        suite_creation_fails: bool,
    }

    #[async_trait]
    impl TestCaseService for FakeService {
        async fn list_suites(&self) -> Result<Vec<Suite>, ApiError> {
            Ok(self.suites.clone())
        }

        async fn create_suite(&self, request: &CreateSuite) -> Result<Suite, ApiError> {
            if self.suite_creation_fails {
                return Err(ApiError::http(500, "Internal error"));
            }
            Ok(Suite {
                id: 99,
                title: request.title.clone(),
                description: request.description.clone(),
                parent_id: None,
                cases_count: 0,
            })
        }

        async fn create_case(&self, request: &CreateTestCase) -> Result<CreatedCase, ApiError> {
            if request.title.contains("reject") {
                return Err(ApiError::http(422, "Title is invalid"));
            }
            let mut created = self.created.lock().unwrap();
            created.push(request.clone());
            Ok(CreatedCase {
                id: created.len() as i64,
                title: request.title.clone(),
            })
        }
    }

    fn case(title: &str) -> CreateTestCase {
        let mut case = CreateTestCase::new(title);
        case.steps = classify("Navigate to home page\nClick login button");
        case
    }

    fn options(suite: SuiteChoice, assume_yes: bool) -> BulkOptions {
        BulkOptions {
            suite,
            assume_yes,
            request_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_execute_with_known_suite_and_yes() {
        let service = FakeService::default();
        let manager = BulkManager::new(&service, options(SuiteChoice::Existing(5), true));
        let mut prompter = ScriptedPrompter::default();

        let outcome = manager
            .execute(vec![case("First"), case("Second")], &mut prompter)
            .await
            .unwrap();

        let BulkOutcome::Completed(summary) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded(), 2);
        assert!(summary.all_succeeded());

        let created = service.created.lock().unwrap();
        assert!(created.iter().all(|c| c.suite_id == Some(5)));
        assert!(prompter.saw("Result: 2/2 test cases created"));
    }

    #[tokio::test]
    async fn test_execute_cancelled() {
        let service = FakeService::default();
        let manager = BulkManager::new(&service, options(SuiteChoice::Root, false));
        let mut prompter = ScriptedPrompter::new(["n"]);

        let outcome = manager
            .execute(vec![case("First")], &mut prompter)
            .await
            .unwrap();

        assert!(matches!(outcome, BulkOutcome::Cancelled));
        assert!(service.created.lock().unwrap().is_empty());
        assert!(prompter.saw("root level (no suite)"));
    }

    #[tokio::test]
    async fn test_failed_suite_creation_falls_back_to_root() {
        let service = FakeService {
            suite_creation_fails: true,
            ..Default::default()
        };
        let manager = BulkManager::new(&service, options(SuiteChoice::Prompt, false));
        // Create a suite when asked, name it, skip the description, confirm
        let mut prompter = ScriptedPrompter::new(["y", "Regression", "", "y"]);

        let outcome = manager
            .execute(vec![case("First"), case("Second")], &mut prompter)
            .await
            .unwrap();

        let BulkOutcome::Completed(summary) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(summary.succeeded(), 2);
        assert!(prompter.saw("Failed to create suite"));
        assert!(prompter.saw("root level (no suite)"));

        let created = service.created.lock().unwrap();
        assert!(created.iter().all(|c| c.suite_id.is_none()));
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_batch() {
        let service = FakeService::default();
        let mut prompter = ScriptedPrompter::default();
        let cases = vec![case("First"), case("please reject me"), case("Third")];

        let summary = submit_batch(&service, &cases, Duration::ZERO, &mut prompter).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].title, "please reject me");
        assert!(summary.failed[0].error.contains("422"));
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_explicit_suite_on_case_is_kept() {
        let service = FakeService::default();
        let manager = BulkManager::new(&service, options(SuiteChoice::Existing(5), true));
        let mut prompter = ScriptedPrompter::default();
        let mut pinned = case("Pinned");
        pinned.suite_id = Some(42);

        manager
            .execute(vec![pinned, case("Loose")], &mut prompter)
            .await
            .unwrap();

        let created = service.created.lock().unwrap();
        assert_eq!(created[0].suite_id, Some(42));
        assert_eq!(created[1].suite_id, Some(5));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let service = FakeService::default();
        let manager = BulkManager::new(&service, BulkOptions::default());
        let mut prompter = ScriptedPrompter::default();

        let outcome = manager.execute(Vec::new(), &mut prompter).await.unwrap();
        let BulkOutcome::Completed(summary) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(summary.total, 0);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_render_dry_run() {
        let cases = assign_suite(vec![case("First")], Some(3));
        let json = render_dry_run(&cases).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["title"], "First");
        assert_eq!(value[0]["suite_id"], 3);
        assert_eq!(value[0]["steps"][0]["action"], "Navigate to home page");
        assert_eq!(
            value[0]["steps"][1]["expected_result"],
            "User is authenticated and redirected to dashboard"
        );
        assert!(value[0].get("severity").is_none());
    }
}
