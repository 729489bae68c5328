//! Test registration (`describe`/`it`) and sequential execution

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use log::{debug, info};

use super::report::{CaseReport, Reporter, Summary};
use super::{TestFailure, TestResult, TestStatus};
use crate::Result;

type TestFn = Box<dyn Fn() -> TestResult>;

/// Options for [`Suite::run`]
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Only run cases whose full name contains this substring
    pub filter: Option<String>,
    /// Record a panicking case as errored instead of unwinding out of the run
    pub catch_panics: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filter: None,
            catch_panics: true,
        }
    }
}

/// A named, stateless test body
pub struct TestCase {
    name: String,
    body: TestFn,
}

impl TestCase {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// An ordered set of cases and nested groups
#[derive(Debug)]
pub struct TestGroup {
    name: String,
    cases: Vec<TestCase>,
    groups: Vec<TestGroup>,
}

impl TestGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    /// Register a case in this group
    pub fn it<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> TestResult + 'static,
    {
        self.cases.push(TestCase {
            name: name.into(),
            body: Box::new(body),
        });
        self
    }

    /// Register a nested group; `body` runs immediately to collect its cases
    pub fn describe<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut TestGroup),
    {
        let mut group = TestGroup::new(name);
        body(&mut group);
        self.groups.push(group);
        self
    }

    fn collect_names(&self, prefix: &str, out: &mut Vec<String>) {
        let path = join_name(prefix, &self.name);
        for case in &self.cases {
            out.push(join_name(&path, &case.name));
        }
        for group in &self.groups {
            group.collect_names(&path, out);
        }
    }

    fn run(
        &self,
        prefix: &str,
        config: &RunConfig,
        reporter: &mut dyn Reporter,
        summary: &mut Summary,
    ) -> Result<()> {
        let path = join_name(prefix, &self.name);
        debug!("entering group {}", path);
        for case in &self.cases {
            let report = run_case(&path, case, config);
            reporter.case_finished(&report)?;
            summary.record(report);
        }
        for group in &self.groups {
            group.run(&path, config, reporter, summary)?;
        }
        Ok(())
    }
}

/// Top-level collection of groups
#[derive(Debug, Default)]
pub struct Suite {
    groups: Vec<TestGroup>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level group; `body` runs immediately to collect its cases
    ///
    /// # Examples
    ///
    /// ```
    /// use rfsnap::harness::{expect, ConsoleReporter, RunConfig, Suite};
    ///
    /// let mut suite = Suite::new();
    /// suite.describe("math", |g| {
    ///     g.it("adds", || Ok(expect(1 + 1).to_equal(2)?));
    /// });
    /// let mut reporter = ConsoleReporter::new(Vec::new());
    /// let summary = suite.run(&RunConfig::default(), &mut reporter).unwrap();
    /// assert_eq!(summary.passed, 1);
    /// ```
    pub fn describe<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut TestGroup),
    {
        let mut group = TestGroup::new(name);
        body(&mut group);
        self.groups.push(group);
        self
    }

    /// Append all groups of `other`
    pub fn merge(&mut self, other: Suite) -> &mut Self {
        self.groups.extend(other.groups);
        self
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    /// Full names of every registered case, in execution order
    pub fn case_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for group in &self.groups {
            group.collect_names("", &mut names);
        }
        names
    }

    /// Run every case sequentially and report each result as it finishes
    pub fn run(&self, config: &RunConfig, reporter: &mut dyn Reporter) -> Result<Summary> {
        let total = self.case_names().len();
        info!("running {} test case(s)", total);
        reporter.suite_started(total)?;

        let mut summary = Summary::default();
        if config.catch_panics {
            // caught panics are reported per case; keep the default hook off stderr
            let previous = panic::take_hook();
            panic::set_hook(Box::new(|_| {}));
            let result = self.run_groups(config, reporter, &mut summary);
            panic::set_hook(previous);
            result?;
        } else {
            self.run_groups(config, reporter, &mut summary)?;
        }

        info!(
            "finished: {} passed, {} failed, {} errored, {} skipped",
            summary.passed, summary.failed, summary.errored, summary.skipped
        );
        reporter.suite_finished(&summary)?;
        Ok(summary)
    }

    fn run_groups(
        &self,
        config: &RunConfig,
        reporter: &mut dyn Reporter,
        summary: &mut Summary,
    ) -> Result<()> {
        for group in &self.groups {
            group.run("", config, reporter, summary)?;
        }
        Ok(())
    }
}

fn join_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{} > {}", prefix, name)
    }
}

fn run_case(path: &str, case: &TestCase, config: &RunConfig) -> CaseReport {
    let name = join_name(path, &case.name);
    let mut status = TestStatus::Pending;

    let selected = config
        .filter
        .as_deref()
        .map_or(true, |pattern| name.contains(pattern));
    if !selected {
        status = status.advance(TestStatus::Skipped).unwrap_or(status);
        return CaseReport {
            name,
            status,
            message: None,
            duration_ms: 0,
        };
    }

    status = status.advance(TestStatus::Running).unwrap_or(status);
    debug!("{} {}", status.label(), name);
    let started = Instant::now();

    let outcome = if config.catch_panics {
        panic::catch_unwind(AssertUnwindSafe(|| (case.body)()))
    } else {
        Ok((case.body)())
    };

    let (next, message) = match outcome {
        Ok(Ok(())) => (TestStatus::Passed, None),
        Ok(Err(TestFailure::Assertion(failure))) => (TestStatus::Failed, Some(failure.message)),
        Ok(Err(TestFailure::Error(err))) => (TestStatus::Errored, Some(err.to_string())),
        Err(payload) => (
            TestStatus::Errored,
            Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        ),
    };
    status = status.advance(next).unwrap_or(next);

    CaseReport {
        name,
        status,
        message,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
