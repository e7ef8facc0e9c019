//! Oracle Core - contract verification for small pure functions
//!
//! Checks implementations of named operations against human-authored
//! behavioural contracts, and probes them with generated edge cases.
//!
//! # Architecture
//!
//! ```text
//! Registry ──lookup──→ Checker ←── explicit Cases (Suite)
//!                         ↑
//!              Generator ─┘ (edge cases from declared domain)
//!                         ↓
//!                       Report → Summary
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: the same case always classifies the same way
//! - **Sequential**: cases run one at a time, in the order supplied
//! - **Contained**: implementation errors and panics become results, not aborts
//! - **Scoped**: every registry, report and case lives for one run only

pub mod catalogue;
pub mod checker;
pub mod error;
pub mod generator;
pub mod registry;
pub mod report;
pub mod runner;
pub mod value;

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

pub use error::{HarnessError, Result};
pub use value::{ErrorKind, Outcome, Value};

/// Version of the oracle-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared callable under test: takes `input_arity` values, returns a value or an error kind
pub type Implementation = Arc<dyn Fn(&[Value]) -> Outcome + Send + Sync>;

// ── Domain ────────────────────────────────────────────────

/// Input domain an operation declares; drives edge-case generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Numbers; `fractional` marks whether non-integer inputs apply
    Numeric { fractional: bool },
    String,
    List,
    Boolean,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Numeric { fractional: true } => write!(f, "numeric"),
            Domain::Numeric { fractional: false } => write!(f, "numeric (integral)"),
            Domain::String => write!(f, "string"),
            Domain::List => write!(f, "list"),
            Domain::Boolean => write!(f, "boolean"),
        }
    }
}

// ── Operation ─────────────────────────────────────────────

/// A named implementation plus its declared input contract.
///
/// Immutable once built. The optional oracle is a known-good reference
/// used only to assign expectations to generated edge cases.
#[derive(Clone)]
pub struct Operation {
    name: String,
    implementation: Implementation,
    input_arity: usize,
    domain: Domain,
    oracle: Option<Implementation>,
}

impl Operation {
    pub fn new<F>(
        name: impl Into<String>,
        input_arity: usize,
        domain: Domain,
        implementation: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Outcome + Send + Sync + 'static,
    {
        Operation {
            name: name.into(),
            implementation: Arc::new(implementation),
            input_arity,
            domain,
            oracle: None,
        }
    }

    /// Attach a reference implementation used as the edge-case oracle
    pub fn with_oracle<F>(mut self, oracle: F) -> Self
    where
        F: Fn(&[Value]) -> Outcome + Send + Sync + 'static,
    {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_arity(&self) -> usize {
        self.input_arity
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn oracle(&self) -> Option<&Implementation> {
        self.oracle.as_ref()
    }

    /// Build a case for this operation expecting `value`
    pub fn case(&self, inputs: Vec<Value>, value: impl Into<Value>) -> Case {
        Case::new(&self.name, inputs, Expectation::Value(value.into()))
    }

    /// Build a case for this operation expecting the error `kind`
    pub fn error_case(&self, inputs: Vec<Value>, kind: ErrorKind) -> Case {
        Case::new(&self.name, inputs, Expectation::Error(kind))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("input_arity", &self.input_arity)
            .field("domain", &self.domain)
            .field("has_oracle", &self.oracle.is_some())
            .finish()
    }
}

// ── Case ──────────────────────────────────────────────────

/// The oracle a case is judged against
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "expected", rename_all = "snake_case")]
pub enum Expectation {
    /// Implementation must return a value equal to this one
    Value(Value),
    /// Implementation must signal exactly this error kind
    Error(ErrorKind),
    /// No oracle known; needs a human to assign one
    Undetermined,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Value(v) => write!(f, "{}", v),
            Expectation::Error(kind) => write!(f, "error {}", kind),
            Expectation::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// One concrete input / expected-output pair for an operation
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Case {
    pub operation_name: String,
    pub inputs: Vec<Value>,
    pub expected: Expectation,
    pub is_edge_case: bool,
}

impl Case {
    pub fn new(operation_name: &str, inputs: Vec<Value>, expected: Expectation) -> Self {
        Case {
            operation_name: operation_name.to_string(),
            inputs,
            expected,
            is_edge_case: false,
        }
    }

    /// Render the inputs as a call expression, e.g. `divide(1.0, 0.0)`
    pub fn call_display(&self) -> String {
        let args: Vec<String> = self.inputs.iter().map(|v| v.to_string()).collect();
        format!("{}({})", self.operation_name, args.join(", "))
    }

    /// SHA-256 of the case's canonical JSON serialization, hex encoded.
    ///
    /// Stable across runs; used as the case id in reports.
    pub fn fingerprint(&self) -> String {
        let canonical =
            serde_json::to_vec(self).unwrap_or_else(|_| self.call_display().into_bytes());
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}
