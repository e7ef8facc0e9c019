//! Function registry: maps operation names to implementations
//!
//! The registry is an ordinary value: build it, pass it by reference to the
//! runner, drop it when the run is over. Names are case-sensitive and unique.
//! Iteration is in name order so whole-registry runs are reproducible.

use std::collections::BTreeMap;

use crate::{HarnessError, Operation, Result};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    operations: BTreeMap<String, Operation>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation.
    ///
    /// # Errors
    /// `InvalidName` for an empty name, `DuplicateName` if the name is taken.
    pub fn register(&mut self, operation: Operation) -> Result<()> {
        let name = operation.name().to_string();
        if name.is_empty() {
            return Err(HarnessError::InvalidName);
        }
        if self.operations.contains_key(&name) {
            return Err(HarnessError::DuplicateName(name));
        }
        tracing::debug!(
            operation = %name,
            arity = operation.input_arity(),
            domain = %operation.domain(),
            "registered operation"
        );
        self.operations.insert(name, operation);
        Ok(())
    }

    /// Look up an operation by exact name.
    ///
    /// # Errors
    /// `NotFound` if nothing is registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<&Operation> {
        self.operations
            .get(name)
            .ok_or_else(|| HarnessError::NotFound(name.to_string()))
    }

    /// Registered operations in name order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
