//! Report aggregator: collects case results for one verification run
//!
//! A report starts empty, accepts results through [`Report::record`], and is
//! closed by [`Report::finalize`]. After that it is read-only. Results are
//! only ever appended, so the counters always satisfy
//! `pass + fail + error == results.len()`.
//!
//! Generated cases without an oracle are kept separately as *pending*; they
//! were never executed and do not count towards any status.

use std::fmt;

use crate::checker::{CaseResult, Status};
use crate::{Case, HarnessError, Result};

/// Final counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub pass_count: usize,
    pub fail_count: usize,
    pub error_count: usize,
    pub pending_count: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.pass_count + self.fail_count + self.error_count
    }

    /// True when every executed case passed
    pub fn all_passed(&self) -> bool {
        self.fail_count == 0 && self.error_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    /// Operation the report covers, if scoped to one
    pub operation: Option<String>,
    results: Vec<CaseResult>,
    pending: Vec<Case>,
    pass_count: usize,
    fail_count: usize,
    error_count: usize,
    finalized: bool,
}

impl Report {
    /// Fresh, empty report for one run
    pub fn start() -> Self {
        Report {
            operation: None,
            results: Vec::new(),
            pending: Vec::new(),
            pass_count: 0,
            fail_count: 0,
            error_count: 0,
            finalized: false,
        }
    }

    /// Fresh report scoped to a single operation
    pub fn for_operation(name: &str) -> Self {
        Report {
            operation: Some(name.to_string()),
            ..Self::start()
        }
    }

    /// Append a result and bump its counter.
    ///
    /// # Errors
    /// `ClosedReport` once the report has been finalized.
    pub fn record(&mut self, result: CaseResult) -> Result<()> {
        if self.finalized {
            return Err(HarnessError::ClosedReport);
        }
        match result.status {
            Status::Pass => self.pass_count += 1,
            Status::Fail => self.fail_count += 1,
            Status::Error => self.error_count += 1,
        }
        self.results.push(result);
        Ok(())
    }

    /// Keep a case that needs a human-assigned expectation.
    ///
    /// # Errors
    /// `ClosedReport` once the report has been finalized.
    pub fn defer(&mut self, case: Case) -> Result<()> {
        if self.finalized {
            return Err(HarnessError::ClosedReport);
        }
        self.pending.push(case);
        Ok(())
    }

    /// Close the report and return its counts. Calling again is harmless.
    pub fn finalize(&mut self) -> Summary {
        self.finalized = true;
        self.summary()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            pass_count: self.pass_count,
            fail_count: self.fail_count,
            error_count: self.error_count,
            pending_count: self.pending.len(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    pub fn pending(&self) -> &[Case] {
        &self.pending
    }

    /// Results that did not pass, in recording order
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.status != Status::Pass)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} errored",
            self.pass_count, self.fail_count, self.error_count
        )?;
        if self.pending_count > 0 {
            write!(f, ", {} pending", self.pending_count)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.operation.as_deref().unwrap_or("run");
        writeln!(f, "{}: {}", title, self.summary())?;
        for result in self.failures() {
            let origin = if result.case.is_edge_case { " (edge)" } else { "" };
            writeln!(f, "  {} {}{}", result.status, result.case.call_display(), origin)?;
            writeln!(f, "    expected: {}", result.case.expected)?;
            writeln!(f, "    actual:   {}", result.actual)?;
        }
        for case in &self.pending {
            writeln!(f, "  pending {}", case.call_display())?;
        }
        Ok(())
    }
}
