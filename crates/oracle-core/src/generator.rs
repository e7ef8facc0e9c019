//! Edge-case generator: boundary and degenerate inputs per declared domain
//!
//! | domain  | values                                   |
//! |---------|------------------------------------------|
//! | numeric | `0`, `-1`, [`LARGE_VALUE`], `0.5` if fractional |
//! | string  | `""`, `"a"`, `"   "`                     |
//! | list    | `[]`, `[1]`, `[1, 1]`                    |
//! | boolean | `true`, `false`                          |
//!
//! Each value is broadcast to every input position. Numeric operations of
//! arity two or more also get a `(1, …, 1, 0)` zero-denominator probe.
//!
//! Expectations come from the operation's oracle when it has one. Without an
//! oracle a generated case is [`Expectation::Undetermined`]: it is reported as
//! pending for a human to assign, never auto-verified against a guess.

use crate::checker::invoke_inline;
use crate::{Case, Domain, ErrorKind, Expectation, Operation, Value};

/// Magnitude probe for numeric domains
pub const LARGE_VALUE: i64 = 1_000_000_000_000;

/// Boundary values for a domain, in generation order
pub fn boundary_values(domain: Domain) -> Vec<Value> {
    match domain {
        Domain::Numeric { fractional } => {
            let mut values = vec![
                Value::Integer(0),
                Value::Integer(-1),
                Value::Integer(LARGE_VALUE),
            ];
            if fractional {
                values.push(Value::Float(0.5));
            }
            values
        }
        Domain::String => vec![Value::from(""), Value::from("a"), Value::from("   ")],
        Domain::List => vec![
            Value::Array(Vec::new()),
            Value::from(vec![1i64]),
            Value::from(vec![1i64, 1]),
        ],
        Domain::Boolean => vec![Value::Boolean(true), Value::Boolean(false)],
    }
}

/// Lazily generate edge cases for `operation`.
///
/// The sequence is finite and its order is fixed for a given domain and arity.
/// Operations taking no inputs yield nothing.
pub fn generate(operation: &Operation) -> impl Iterator<Item = Case> + '_ {
    let arity = operation.input_arity();
    let values = if arity == 0 {
        Vec::new()
    } else {
        boundary_values(operation.domain())
    };

    values
        .into_iter()
        .map(move |v| vec![v; arity])
        .chain(zero_denominator_probe(operation))
        .map(move |inputs| edge_case(operation, inputs))
}

fn zero_denominator_probe(operation: &Operation) -> Option<Vec<Value>> {
    let arity = operation.input_arity();
    match operation.domain() {
        Domain::Numeric { .. } if arity >= 2 => {
            let mut inputs = vec![Value::Integer(1); arity - 1];
            inputs.push(Value::Integer(0));
            Some(inputs)
        }
        _ => None,
    }
}

fn edge_case(operation: &Operation, inputs: Vec<Value>) -> Case {
    let expected = match operation.oracle() {
        Some(oracle) => match invoke_inline(oracle, &inputs) {
            Ok(v) => Expectation::Value(v),
            Err(ErrorKind::Panic) => {
                tracing::warn!(
                    operation = operation.name(),
                    "oracle panicked on edge case, leaving expectation undetermined"
                );
                Expectation::Undetermined
            }
            Err(kind) => Expectation::Error(kind),
        },
        None => Expectation::Undetermined,
    };

    let mut case = Case::new(operation.name(), inputs, expected);
    case.is_edge_case = true;
    case
}
