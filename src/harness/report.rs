//! Result aggregation and reporting sinks

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::TestStatus;
use crate::Result;

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Full name: group names and the case name joined with " > "
    pub name: String,
    pub status: TestStatus,
    /// Failure or error detail
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// Aggregated results of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    /// "name: message" for every failed or errored case
    pub failures: Vec<String>,
    pub cases: Vec<CaseReport>,
}

impl Summary {
    pub fn record(&mut self, case: CaseReport) {
        match case.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Errored => self.errored += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::Pending | TestStatus::Running => {}
        }
        if matches!(case.status, TestStatus::Failed | TestStatus::Errored) {
            self.failures.push(format!(
                "{}: {}",
                case.name,
                case.message.as_deref().unwrap_or("no detail")
            ));
        }
        self.cases.push(case);
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Process exit status: 0 when nothing failed or errored
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Sink for run progress
pub trait Reporter {
    fn suite_started(&mut self, _total: usize) -> Result<()> {
        Ok(())
    }

    fn case_finished(&mut self, case: &CaseReport) -> Result<()>;

    fn suite_finished(&mut self, summary: &Summary) -> Result<()>;
}

/// Human readable report: one line per case, then a summary line
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn suite_started(&mut self, total: usize) -> Result<()> {
        writeln!(self.out, "running {} test(s)", total)?;
        Ok(())
    }

    fn case_finished(&mut self, case: &CaseReport) -> Result<()> {
        if case.status == TestStatus::Skipped {
            return Ok(());
        }
        writeln!(
            self.out,
            "{:<5} {} ({}ms)",
            case.status.label(),
            case.name,
            case.duration_ms
        )?;
        if let Some(msg) = &case.message {
            writeln!(self.out, "      {}", msg)?;
        }
        Ok(())
    }

    fn suite_finished(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out)?;
        if !summary.failures.is_empty() {
            writeln!(self.out, "failures:")?;
            for f in &summary.failures {
                writeln!(self.out, "    {}", f)?;
            }
            writeln!(self.out)?;
        }
        writeln!(
            self.out,
            "test result: {}. {} passed; {} failed; {} errored; {} skipped",
            if summary.success() { "ok" } else { "FAILED" },
            summary.passed,
            summary.failed,
            summary.errored,
            summary.skipped
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Machine readable report: the whole [`Summary`] as JSON once the run ends
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn case_finished(&mut self, _case: &CaseReport) -> Result<()> {
        Ok(())
    }

    fn suite_finished(&mut self, summary: &Summary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, status: TestStatus, message: Option<&str>) -> CaseReport {
        CaseReport {
            name: name.to_string(),
            status,
            message: message.map(str::to_string),
            duration_ms: 0,
        }
    }

    #[test]
    fn summary_counts_and_exit_code() {
        let mut s = Summary::default();
        s.record(case("a", TestStatus::Passed, None));
        assert_eq!(s.exit_code(), 0);
        s.record(case("b", TestStatus::Failed, Some("nope")));
        s.record(case("c", TestStatus::Errored, Some("boom")));
        s.record(case("d", TestStatus::Skipped, None));
        assert_eq!((s.passed, s.failed, s.errored, s.skipped), (1, 1, 1, 1));
        assert_eq!(s.failures, vec!["b: nope".to_string(), "c: boom".to_string()]);
        assert_eq!(s.total(), 4);
        assert_eq!(s.exit_code(), 1);
    }

    #[test]
    fn console_reporter_prints_lines_and_summary() {
        let mut s = Summary::default();
        let mut r = ConsoleReporter::new(Vec::new());
        let c = case("G > ok", TestStatus::Passed, None);
        r.case_finished(&c).unwrap();
        s.record(c);
        r.suite_finished(&s).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.contains("PASS  G > ok"));
        assert!(out.contains("test result: ok. 1 passed; 0 failed"));
    }

    #[test]
    fn json_reporter_writes_summary() {
        let mut s = Summary::default();
        s.record(case("x", TestStatus::Failed, Some("m")));
        let mut r = JsonReporter::new(Vec::new());
        r.suite_finished(&s).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&r.into_inner()).unwrap();
        assert_eq!(v["failed"], 1);
        assert_eq!(v["cases"][0]["status"], "failed");
    }
}
