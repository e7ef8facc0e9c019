//! Verification runs: wires registry, checker, generator and report together
//!
//! One run processes cases strictly in order: the suite's explicit cases for
//! an operation in insertion order, then its generated edge cases. Only
//! harness-usage errors abort a run; every per-case outcome is recorded.

use std::collections::BTreeMap;
use std::fmt;

use crate::checker::{Checker, CheckerConfig, Status};
use crate::generator;
use crate::registry::Registry;
use crate::report::{Report, Summary};
use crate::{Case, Expectation, Result};

// ── Suite ─────────────────────────────────────────────────

/// Human-authored cases, grouped by operation name
#[derive(Debug, Clone, Default)]
pub struct Suite {
    cases: BTreeMap<String, Vec<Case>>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, case: Case) {
        self.cases
            .entry(case.operation_name.clone())
            .or_default()
            .push(case);
    }

    pub fn extend(&mut self, cases: impl IntoIterator<Item = Case>) {
        for case in cases {
            self.add(case);
        }
    }

    /// Explicit cases for `name`, in the order they were added
    pub fn cases_for(&self, name: &str) -> &[Case] {
        self.cases.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.cases.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Runs ──────────────────────────────────────────────────

/// Verify one registered operation and return its finalized report.
///
/// # Errors
/// `NotFound` for an unknown name; `Arity` if an explicit case has the wrong
/// number of inputs.
pub fn verify_operation(
    registry: &Registry,
    suite: &Suite,
    name: &str,
    config: &CheckerConfig,
) -> Result<Report> {
    let operation = registry.lookup(name)?;
    let checker = Checker::new(config.clone());
    let mut report = Report::for_operation(name);

    let explicit = suite.cases_for(name).iter().cloned();
    let generated = config
        .edge_cases
        .then(|| generator::generate(operation))
        .into_iter()
        .flatten();

    for case in explicit.chain(generated) {
        if case.expected == Expectation::Undetermined {
            tracing::debug!(call = %case.call_display(), "no oracle, deferring case");
            report.defer(case)?;
            continue;
        }
        let result = checker.run_case(operation, &case)?;
        if result.status != Status::Pass {
            tracing::warn!(
                call = %result.case.call_display(),
                expected = %result.case.expected,
                actual = %result.actual,
                status = %result.status,
                "case did not pass"
            );
        }
        report.record(result)?;
    }

    let summary = report.finalize();
    tracing::info!(operation = name, %summary, "verified operation");
    Ok(report)
}

/// Reports for every operation in a registry
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunSummary {
    pub reports: Vec<Report>,
}

impl RunSummary {
    /// Counts summed over all reports
    pub fn totals(&self) -> Summary {
        self.reports
            .iter()
            .map(Report::summary)
            .fold(Summary::default(), |acc, s| Summary {
                pass_count: acc.pass_count + s.pass_count,
                fail_count: acc.fail_count + s.fail_count,
                error_count: acc.error_count + s.error_count,
                pending_count: acc.pending_count + s.pending_count,
            })
    }

    pub fn all_passed(&self) -> bool {
        self.totals().all_passed()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            write!(f, "{}", report)?;
        }
        writeln!(f, "total: {}", self.totals())
    }
}

/// Verify every registered operation, in name order.
///
/// # Errors
/// Stops at the first harness-usage error.
pub fn verify_all(
    registry: &Registry,
    suite: &Suite,
    config: &CheckerConfig,
) -> Result<RunSummary> {
    let reports = registry
        .names()
        .map(|name| verify_operation(registry, suite, name, config))
        .collect::<Result<Vec<_>>>()?;
    Ok(RunSummary { reports })
}
