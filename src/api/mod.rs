//! Test-management API access
//!
//! The bulk workflow talks to the remote service only through
//! [`TestCaseService`], so it can run against [`QaseClient`] in production
//! and an in-memory fake in tests.

pub mod error;
pub mod qase;

use async_trait::async_trait;

pub use error::ApiError;
pub use qase::QaseClient;

use crate::types::{CreateSuite, CreateTestCase, CreatedCase, Suite};

/// Operations the bulk workflow needs from a test-management service
#[async_trait]
pub trait TestCaseService: Send + Sync {
    /// List every suite in the project
    async fn list_suites(&self) -> Result<Vec<Suite>, ApiError>;

    /// Create a suite and return it with its assigned id
    async fn create_suite(&self, request: &CreateSuite) -> Result<Suite, ApiError>;

    /// Create one test case
    async fn create_case(&self, request: &CreateTestCase) -> Result<CreatedCase, ApiError>;
}
