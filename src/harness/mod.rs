//! describe/it/expect test harness
//!
//! Groups of named cases run sequentially, each in isolation: a failing
//! assertion, a returned error or a panic is recorded against that case and
//! the next case still runs. Results are streamed to a [`Reporter`] and
//! aggregated into a [`Summary`].

pub mod expect;
pub mod report;
pub mod suite;

pub use expect::{expect, AssertionFailure, Contains, Expectation};
pub use report::{CaseReport, ConsoleReporter, JsonReporter, Reporter, Summary};
pub use suite::{RunConfig, Suite, TestCase, TestGroup};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a test case did not pass
#[derive(Error, Debug)]
pub enum TestFailure {
    /// An expectation did not hold
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// Rendering or querying failed; reported separately from assertions
    #[error(transparent)]
    Error(#[from] crate::Error),
}

/// Return type of a test case body
pub type TestResult = std::result::Result<(), TestFailure>;

/// Lifecycle of a test case: `Pending -> Running -> {Passed, Failed, Errored}`
///
/// Cases excluded by a filter end as `Skipped` without running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl TestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TestStatus::Passed | TestStatus::Failed | TestStatus::Errored | TestStatus::Skipped
        )
    }

    /// Move to `next`, refusing transitions the lifecycle does not allow
    pub fn advance(self, next: TestStatus) -> Option<TestStatus> {
        use TestStatus::*;
        match (self, next) {
            (Pending, Running) | (Pending, Skipped) => Some(next),
            (Running, Passed) | (Running, Failed) | (Running, Errored) => Some(next),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Running => "RUNNING",
            TestStatus::Passed => "PASS",
            TestStatus::Failed => "FAIL",
            TestStatus::Errored => "ERROR",
            TestStatus::Skipped => "SKIP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        let s = TestStatus::Pending;
        let s = s.advance(TestStatus::Running).unwrap();
        assert!(!s.is_terminal());
        let s = s.advance(TestStatus::Passed).unwrap();
        assert!(s.is_terminal());
        // no retries
        assert_eq!(s.advance(TestStatus::Running), None);
        assert_eq!(TestStatus::Pending.advance(TestStatus::Failed), None);
    }

    #[test]
    fn failures_convert_with_question_mark() {
        fn body() -> TestResult {
            expect("abc").to_contain("z")?;
            Ok(())
        }
        assert!(matches!(body(), Err(TestFailure::Assertion(_))));

        fn erroring() -> TestResult {
            let snap = crate::render(&crate::create_element("div", serde_json::json!(5), vec![]))?;
            expect(snap.text()).to_equal("")?;
            Ok(())
        }
        assert!(matches!(erroring(), Err(TestFailure::Error(_))));
    }
}
