//! Data model for the Qase test-management API.

pub mod case;
pub(crate) mod codes;
pub mod suite;

pub use case::{
    Automation, CaseStatus, CreateTestCase, CreatedCase, Layer, Priority, Severity, TestType,
};
pub use codes::UnknownVariant;
pub use suite::{CreateSuite, CreatedId, EntityList, QaseResponse, Suite};
