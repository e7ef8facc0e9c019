//! Demo catalogue: small utility functions and their contracts
//!
//! Two flavours of the same operations:
//!
//! - [`Flavor::Seeded`] keeps the defects of the demo project:
//!   `calculate_average([])` returns `0`, and its test file asserts wrong
//!   answers ([`planted_assertions`]). `divide` additionally carries an
//!   injected mutation: IEEE division, so `1/0` is infinity instead of an
//!   error.
//! - [`Flavor::Reference`] signals `DivisionByZero` and `EmptyInput` and is
//!   checked against the corrected contracts only.
//!
//! Both flavours carry the reference implementation as their edge-case
//! oracle. [`suite_for`] picks the cases: the corrected [`suite`] always, plus
//! the planted assertions for the seeded flavour. The seeded flavour is
//! therefore expected to fail; the reference flavour to pass.

use crate::registry::Registry;
use crate::runner::Suite;
use crate::{Case, Domain, ErrorKind, Expectation, Operation, Outcome, Result, Value};

type Func = fn(&[Value]) -> Outcome;

/// Which implementations to register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    /// Implementations with planted bugs
    #[default]
    Seeded,
    /// Corrected implementations
    Reference,
}

struct Entry {
    name: &'static str,
    arity: usize,
    domain: Domain,
    seeded: Func,
    reference: Func,
}

const ENTRIES: &[Entry] = &[
    Entry {
        name: "add",
        arity: 2,
        domain: Domain::Numeric { fractional: true },
        seeded: add,
        reference: add,
    },
    Entry {
        name: "divide",
        arity: 2,
        domain: Domain::Numeric { fractional: true },
        seeded: divide_unchecked,
        reference: divide,
    },
    Entry {
        name: "calculate_average",
        arity: 1,
        domain: Domain::List,
        seeded: calculate_average_zero_on_empty,
        reference: calculate_average,
    },
    Entry {
        name: "is_even",
        arity: 1,
        domain: Domain::Numeric { fractional: false },
        seeded: is_even,
        reference: is_even,
    },
    Entry {
        name: "reverse_string",
        arity: 1,
        domain: Domain::String,
        seeded: reverse_string,
        reference: reverse_string,
    },
    Entry {
        name: "flatten",
        arity: 1,
        domain: Domain::List,
        seeded: flatten,
        reference: flatten,
    },
];

/// Registry holding every catalogue operation in the given flavour
pub fn registry(flavor: Flavor) -> Result<Registry> {
    let mut registry = Registry::new();
    for entry in ENTRIES {
        let implementation = match flavor {
            Flavor::Seeded => entry.seeded,
            Flavor::Reference => entry.reference,
        };
        registry.register(
            Operation::new(entry.name, entry.arity, entry.domain, implementation)
                .with_oracle(entry.reference),
        )?;
    }
    Ok(registry)
}

fn value(name: &str, inputs: Vec<Value>, expected: impl Into<Value>) -> Case {
    Case::new(name, inputs, Expectation::Value(expected.into()))
}

fn error(name: &str, inputs: Vec<Value>, kind: ErrorKind) -> Case {
    Case::new(name, inputs, Expectation::Error(kind))
}

fn ints(values: &[i64]) -> Value {
    Value::from(values.to_vec())
}

/// Human-authored contracts for the catalogue operations
pub fn suite() -> Suite {
    let mut suite = Suite::new();
    suite.extend([
        value("reverse_string", vec!["hello".into()], "olleh"),
        value("reverse_string", vec!["".into()], ""),
        value("reverse_string", vec!["ab".into()], "ba"),
        value("add", vec![2i64.into(), 2i64.into()], 4i64),
        value("add", vec![(-1i64).into(), 1i64.into()], 0i64),
        value("add", vec![0.1f64.into(), 0.2f64.into()], 0.3),
        value("divide", vec![10i64.into(), 2i64.into()], 5i64),
        value("divide", vec![9i64.into(), 3i64.into()], 3.0),
        error("divide", vec![1.0f64.into(), 0.0f64.into()], ErrorKind::DivisionByZero),
        value("calculate_average", vec![ints(&[1, 2, 3, 4, 5])], 3.0),
        error("calculate_average", vec![ints(&[])], ErrorKind::EmptyInput),
        value("is_even", vec![0i64.into()], true),
        value("is_even", vec![(-4i64).into()], true),
        value("is_even", vec![3i64.into()], false),
        value(
            "flatten",
            vec![Value::Array(vec![
                Value::Integer(1),
                Value::Array(vec![Value::Integer(2), ints(&[3, 4])]),
                Value::Integer(5),
            ])],
            ints(&[1, 2, 3, 4, 5]),
        ),
        value("flatten", vec![ints(&[])], ints(&[])),
    ]);
    suite
}

/// The demo project's own test assertions that disagree with the contracts.
///
/// `calculate_average([]) == 0` agrees with the seeded implementation, so it
/// passes; the corrected suite is what flags it.
pub fn planted_assertions() -> Vec<Case> {
    vec![
        value("reverse_string", vec!["hello".into()], "lorand"),
        value("add", vec![2i64.into(), 2i64.into()], 5i64),
        value("calculate_average", vec![ints(&[1, 2, 3, 4, 5])], 3.5),
        value("calculate_average", vec![ints(&[])], 0i64),
    ]
}

/// Cases to check a flavour against
pub fn suite_for(flavor: Flavor) -> Suite {
    let mut suite = suite();
    if flavor == Flavor::Seeded {
        suite.extend(planted_assertions());
    }
    suite
}

// ── Implementations ───────────────────────────────────────

fn numbers(args: &[Value]) -> std::result::Result<(f64, f64), ErrorKind> {
    match (args[0].as_f64(), args[1].as_f64()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ErrorKind::InvalidInput),
    }
}

fn add(args: &[Value]) -> Outcome {
    if let (Some(a), Some(b)) = (args[0].as_i64(), args[1].as_i64()) {
        return a.checked_add(b).map(Value::Integer).ok_or(ErrorKind::Overflow);
    }
    let (a, b) = numbers(args)?;
    Ok(Value::Float(a + b))
}

fn divide_unchecked(args: &[Value]) -> Outcome {
    let (a, b) = numbers(args)?;
    Ok(Value::Float(a / b))
}

fn divide(args: &[Value]) -> Outcome {
    let (a, b) = numbers(args)?;
    if b == 0.0 {
        return Err(ErrorKind::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

fn mean(items: &[Value]) -> Outcome {
    let mut sum = 0.0;
    for item in items {
        sum += item.as_f64().ok_or(ErrorKind::InvalidInput)?;
    }
    Ok(Value::Float(sum / items.len() as f64))
}

fn calculate_average_zero_on_empty(args: &[Value]) -> Outcome {
    let items = args[0].as_array().ok_or(ErrorKind::InvalidInput)?;
    if items.is_empty() {
        return Ok(Value::Integer(0));
    }
    mean(items)
}

fn calculate_average(args: &[Value]) -> Outcome {
    let items = args[0].as_array().ok_or(ErrorKind::InvalidInput)?;
    if items.is_empty() {
        return Err(ErrorKind::EmptyInput);
    }
    mean(items)
}

fn is_even(args: &[Value]) -> Outcome {
    let n = args[0].as_i64().ok_or(ErrorKind::InvalidInput)?;
    Ok(Value::Boolean(n % 2 == 0))
}

fn reverse_string(args: &[Value]) -> Outcome {
    let text = args[0].as_str().ok_or(ErrorKind::InvalidInput)?;
    Ok(Value::String(text.chars().rev().collect()))
}

fn flatten(args: &[Value]) -> Outcome {
    fn walk(items: &[Value], out: &mut Vec<Value>) {
        for item in items {
            match item {
                Value::Array(inner) => walk(inner, out),
                other => out.push(other.clone()),
            }
        }
    }

    let items = args[0].as_array().ok_or(ErrorKind::InvalidInput)?;
    let mut out = Vec::new();
    walk(items, &mut out);
    Ok(Value::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{run_case, CheckerConfig, Status};
    use crate::runner::{verify_all, verify_operation};

    fn check(flavor: Flavor, name: &str, inputs: Vec<Value>, expected: Expectation) -> Status {
        let registry = registry(flavor).unwrap();
        let op = registry.lookup(name).unwrap();
        run_case(op, &Case::new(name, inputs, expected)).unwrap().status
    }

    #[test]
    fn test_registry_contents() {
        let registry = registry(Flavor::Seeded).unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["add", "calculate_average", "divide", "flatten", "is_even", "reverse_string"]
        );
        assert!(registry.operations().all(|op| op.oracle().is_some()));
    }

    #[test]
    fn test_is_even_vectors() {
        for flavor in [Flavor::Seeded, Flavor::Reference] {
            for (n, want) in [(0i64, true), (-4, true), (3, false)] {
                let status = check(
                    flavor,
                    "is_even",
                    vec![Value::Integer(n)],
                    Expectation::Value(Value::Boolean(want)),
                );
                assert_eq!(status, Status::Pass, "is_even({})", n);
            }
        }
    }

    #[test]
    fn test_reverse_string_vectors() {
        for (input, want) in [("", ""), ("ab", "ba"), ("hello", "olleh")] {
            let status = check(
                Flavor::Seeded,
                "reverse_string",
                vec![Value::from(input)],
                Expectation::Value(Value::from(want)),
            );
            assert_eq!(status, Status::Pass);
        }
    }

    #[test]
    fn test_divide_by_zero_classification() {
        let inputs = vec![Value::Float(1.0), Value::Float(0.0)];
        let expect_error = Expectation::Error(ErrorKind::DivisionByZero);
        assert_eq!(
            check(Flavor::Reference, "divide", inputs.clone(), expect_error.clone()),
            Status::Pass
        );
        assert_eq!(
            check(Flavor::Seeded, "divide", inputs.clone(), expect_error),
            Status::Fail
        );

        let expect_finite = Expectation::Value(Value::Float(0.0));
        for flavor in [Flavor::Seeded, Flavor::Reference] {
            let status = check(flavor, "divide", inputs.clone(), expect_finite.clone());
            assert_ne!(status, Status::Pass);
        }
    }

    #[test]
    fn test_average_of_empty_expects_error_kind() {
        let suite = suite();
        let empty = suite
            .cases_for("calculate_average")
            .iter()
            .find(|c| c.inputs == vec![Value::Array(vec![])])
            .unwrap();
        assert_eq!(empty.expected, Expectation::Error(ErrorKind::EmptyInput));

        let registry = registry(Flavor::Seeded).unwrap();
        let op = registry.lookup("calculate_average").unwrap();
        assert_eq!(run_case(op, empty).unwrap().status, Status::Fail);
    }

    #[test]
    fn test_add_overflow_signalled() {
        let status = check(
            Flavor::Reference,
            "add",
            vec![Value::Integer(i64::MAX), Value::Integer(1)],
            Expectation::Error(ErrorKind::Overflow),
        );
        assert_eq!(status, Status::Pass);
    }

    #[test]
    fn test_true_and_corrupted_expectations_for_every_operation() {
        let registry = registry(Flavor::Reference).unwrap();
        let suite = suite();
        for op in registry.operations() {
            for case in suite.cases_for(op.name()) {
                assert_eq!(run_case(op, case).unwrap().status, Status::Pass, "{:?}", case);
                if let Expectation::Value(v) = &case.expected {
                    let mut corrupted = case.clone();
                    corrupted.expected = Expectation::Value(Value::Array(vec![v.clone()]));
                    assert_eq!(run_case(op, &corrupted).unwrap().status, Status::Fail);
                }
            }
        }
    }

    #[test]
    fn test_reference_flavour_passes_everything() {
        let registry = registry(Flavor::Reference).unwrap();
        let run = verify_all(&registry, &suite(), &CheckerConfig::default()).unwrap();
        let totals = run.totals();
        assert!(run.all_passed(), "{}", run);
        assert_eq!(totals.pending_count, 0);
        assert!(totals.pass_count > suite().len());
    }

    #[test]
    fn test_seeded_flavour_is_caught() {
        let registry = registry(Flavor::Seeded).unwrap();
        let suite = suite();
        let config = CheckerConfig::default();

        let divide = verify_operation(&registry, &suite, "divide", &config).unwrap();
        // explicit 1/0, edge 0/0 and the 1/0 probe
        assert_eq!(divide.summary().fail_count, 3);

        let average = verify_operation(&registry, &suite, "calculate_average", &config).unwrap();
        // explicit [] and edge []
        assert_eq!(average.summary().fail_count, 2);

        for clean in ["add", "is_even", "reverse_string", "flatten"] {
            let report = verify_operation(&registry, &suite, clean, &config).unwrap();
            assert!(report.summary().all_passed(), "{}", report);
        }
    }

    #[test]
    fn test_planted_assertions_are_caught() {
        let registry = registry(Flavor::Seeded).unwrap();
        let suite = suite_for(Flavor::Seeded);
        let config = CheckerConfig {
            edge_cases: false,
            ..CheckerConfig::default()
        };

        for name in ["add", "reverse_string"] {
            let report = verify_operation(&registry, &suite, name, &config).unwrap();
            assert_eq!(report.summary().fail_count, 1, "{}", report);
        }

        let average = verify_operation(&registry, &suite, "calculate_average", &config).unwrap();
        let failing: Vec<String> = average.failures().map(|r| r.case.call_display()).collect();
        assert_eq!(failing.len(), 2, "{}", average);

        let run = verify_all(&registry, &suite, &CheckerConfig::default()).unwrap();
        assert_eq!(run.totals().fail_count, 8);
    }

    #[test]
    fn test_planted_assertions_only_in_seeded_suite() {
        let planted = planted_assertions();
        let reference = suite_for(Flavor::Reference);
        let seeded = suite_for(Flavor::Seeded);
        assert_eq!(reference.len(), suite().len());
        assert_eq!(seeded.len(), suite().len() + planted.len());
        for case in &planted {
            assert!(!reference.cases_for(&case.operation_name).contains(case));
            assert!(seeded.cases_for(&case.operation_name).contains(case));
        }
    }
}
