//! Contract checker: runs one case against one operation and classifies it
//!
//! # Classification
//!
//! | expectation   | implementation returns | implementation signals |
//! |---------------|------------------------|------------------------|
//! | value `v`     | pass if equal, else fail | error                |
//! | error `k`     | fail                   | pass if `k`, else error |
//!
//! Equality is [`Value::matches`] with the configured float tolerance.
//! A zero-denominator division that returns infinity therefore *fails*
//! against a `DivisionByZero` expectation rather than passing silently.
//!
//! # Containment
//!
//! Panics inside an implementation are caught and reported as
//! [`ErrorKind::Panic`]; the default panic hook stays silent for them and the
//! panic message goes to `tracing` at debug level instead.
//!
//! With a timeout configured, the implementation runs on a watchdog thread.
//! If it does not answer in time the case is classified with
//! [`ErrorKind::Timeout`] and the worker is left to finish on its own. The
//! checker remembers that worker: until it exits, further cases for the same
//! operation are classified `Timeout` without invoking the implementation, so
//! an operation never has two calls in flight.
//!
//! Apart from those outstanding workers the checker holds no state, so
//! checking the same case twice yields the same status.

use std::cell::Cell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc, Mutex, Once, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::value::FLOAT_TOLERANCE;
use crate::{Case, ErrorKind, Expectation, HarnessError, Operation, Outcome, Result, Value};

// ── Configuration ─────────────────────────────────────────

/// Knobs for one verification run
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckerConfig {
    /// Best-effort per-case bound in milliseconds; `None` runs inline
    pub timeout_ms: Option<u64>,
    /// Absolute tolerance for float comparison
    pub float_tolerance: f64,
    /// Append generated edge cases after the explicit ones
    pub edge_cases: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            timeout_ms: None,
            float_tolerance: FLOAT_TOLERANCE,
            edge_cases: true,
        }
    }
}

// ── Result Types ──────────────────────────────────────────

/// Classification of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "pass"),
            Status::Fail => write!(f, "fail"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// What the implementation actually produced
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "actual", rename_all = "snake_case")]
pub enum Actual {
    Value(Value),
    Error(ErrorKind),
}

impl From<Outcome> for Actual {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Ok(v) => Actual::Value(v),
            Err(k) => Actual::Error(k),
        }
    }
}

impl std::fmt::Display for Actual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actual::Value(v) => write!(f, "{}", v),
            Actual::Error(k) => write!(f, "error {}", k),
        }
    }
}

/// Outcome of checking one case; immutable once created
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaseResult {
    /// Case fingerprint, stable across runs
    pub case_id: String,
    pub case: Case,
    pub actual: Actual,
    pub status: Status,
}

// ── Checker ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Checker {
    config: CheckerConfig,
    /// Timed-out workers that may still be inside an implementation
    abandoned: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Checker {
            config,
            abandoned: Mutex::new(HashMap::new()),
        }
    }

    /// Invoke `operation` with `case.inputs` and classify the outcome.
    ///
    /// # Errors
    /// - `Arity` if the input count differs from the operation's arity
    /// - `Undetermined` if the case carries no expectation
    pub fn run_case(&self, operation: &Operation, case: &Case) -> Result<CaseResult> {
        if case.inputs.len() != operation.input_arity() {
            return Err(HarnessError::Arity {
                operation: operation.name().to_string(),
                expected: operation.input_arity(),
                found: case.inputs.len(),
            });
        }
        if case.expected == Expectation::Undetermined {
            return Err(HarnessError::Undetermined(operation.name().to_string()));
        }

        let start = Instant::now();
        let outcome = self.invoke(operation, &case.inputs);
        let status = classify(&case.expected, &outcome, self.config.float_tolerance);

        tracing::debug!(
            call = %case.call_display(),
            expected = %case.expected,
            status = %status,
            elapsed_us = start.elapsed().as_micros() as u64,
            "checked case"
        );

        Ok(CaseResult {
            case_id: case.fingerprint(),
            case: case.clone(),
            actual: outcome.into(),
            status,
        })
    }

    fn invoke(&self, operation: &Operation, inputs: &[Value]) -> Outcome {
        match self.config.timeout_ms {
            Some(ms) => self.invoke_with_timeout(operation, inputs, Duration::from_millis(ms)),
            None => invoke_inline(operation.implementation(), inputs),
        }
    }

    fn invoke_with_timeout(
        &self,
        operation: &Operation,
        inputs: &[Value],
        timeout: Duration,
    ) -> Outcome {
        let mut abandoned = self.abandoned.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(worker) = abandoned.remove(operation.name()) {
            if !worker.is_finished() {
                tracing::warn!(
                    operation = operation.name(),
                    "previous case is still running, skipping invocation"
                );
                abandoned.insert(operation.name().to_string(), worker);
                return Err(ErrorKind::Timeout);
            }
            let _ = worker.join();
        }

        let implementation = Arc::clone(operation.implementation());
        let owned_inputs = inputs.to_vec();
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name(format!("oracle-case-{}", operation.name()))
            .spawn(move || {
                let outcome = invoke_inline(&implementation, &owned_inputs);
                // Receiver is gone if the case already timed out
                let _ = tx.send(outcome);
            });

        let worker = match spawned {
            Ok(worker) => worker,
            Err(e) => {
                tracing::warn!(
                    operation = operation.name(),
                    error = %e,
                    "could not spawn watchdog thread, running inline"
                );
                return invoke_inline(operation.implementation(), inputs);
            }
        };

        match rx.recv_timeout(timeout) {
            Ok(outcome) => {
                let _ = worker.join();
                outcome
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    operation = operation.name(),
                    timeout_ms = timeout.as_millis() as u64,
                    "case exceeded timeout, abandoning worker"
                );
                abandoned.insert(operation.name().to_string(), worker);
                Err(ErrorKind::Timeout)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                let _ = worker.join();
                Err(ErrorKind::Panic)
            }
        }
    }
}

/// Classify an outcome against an expectation
pub fn classify(expected: &Expectation, outcome: &Outcome, tolerance: f64) -> Status {
    match (expected, outcome) {
        (Expectation::Value(want), Ok(got)) => {
            if got.matches(want, tolerance) {
                Status::Pass
            } else {
                Status::Fail
            }
        }
        (Expectation::Error(_), Ok(_)) => Status::Fail,
        (Expectation::Error(want), Err(got)) if want == got => Status::Pass,
        (_, Err(_)) => Status::Error,
        (Expectation::Undetermined, Ok(_)) => Status::Fail,
    }
}

/// Check a case with the default configuration
pub fn run_case(operation: &Operation, case: &Case) -> Result<CaseResult> {
    Checker::default().run_case(operation, case)
}

// ── Containment ───────────────────────────────────────

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a panic hook that logs contained panics instead of printing them.
/// Panics outside [`invoke_inline`] still reach the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) {
                tracing::debug!(panic = %info, "contained panic");
            } else {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as containing panics until dropped
struct ContainGuard {
    outer: bool,
}

impl ContainGuard {
    fn enter() -> Self {
        ContainGuard {
            outer: CONTAINING.with(|c| c.replace(true)),
        }
    }
}

impl Drop for ContainGuard {
    fn drop(&mut self) {
        CONTAINING.with(|c| c.set(self.outer));
    }
}

pub(crate) fn containing() -> bool {
    CONTAINING.with(Cell::get)
}

pub(crate) fn invoke_inline(implementation: &crate::Implementation, inputs: &[Value]) -> Outcome {
    install_quiet_hook();
    let _guard = ContainGuard::enter();
    panic::catch_unwind(AssertUnwindSafe(|| implementation(inputs)))
        .unwrap_or(Err(ErrorKind::Panic))
}

// ── Tests ─────────────────────────────────────────────────
