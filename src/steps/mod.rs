//! Step classification for plain-text test procedures
//!
//! Turns a block of imperative step lines into ordered action /
//! expected-result pairs. Classification is rule-ordered keyword matching,
//! deterministic and stateless.

pub mod classifier;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use classifier::{categorize, classify_line, Category};
pub use parser::{clean_lines, strip_ordinal};

/// One action/expected-result pair of a test procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// The step text with numbering and surrounding whitespace removed
    pub action: String,
    /// Synthesized description of the anticipated outcome
    pub expected_result: String,
}

/// Ordered steps of one test case; order matches the input lines
pub type StepSequence = Vec<Step>;

/// Classify a multi-line block of steps.
///
/// Blank lines are dropped, ordinal prefixes ("1.", "2)") are stripped and
/// each remaining line gets an expected result. Never fails: blank input
/// yields an empty sequence.
pub fn classify(steps_text: &str) -> StepSequence {
    let actions = clean_lines(steps_text);

    actions
        .iter()
        .enumerate()
        .map(|(index, action)| Step {
            action: action.clone(),
            expected_result: classify_line(action, index, &actions),
        })
        .collect()
}
