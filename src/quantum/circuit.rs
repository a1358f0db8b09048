use std::collections::BTreeSet;
use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;

use crate::config::DecompositionConfig;
use crate::error::{ControlError, Result};
use crate::quantum::decompose::decompose_controlled;
use crate::quantum::matrix;
use crate::quantum::qid::{Operation, Qid};

/// A quantum circuit consisting of a sequence of operations, in time order
#[derive(Debug, Clone, Default)]
pub struct QuantumCircuit {
    operations: Vec<Operation>,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_operations(operations: Vec<Operation>) -> Self {
        QuantumCircuit { operations }
    }

    pub fn add(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Get the number of operations in the circuit
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every qudit touched by some operation, sorted
    pub fn all_qudits(&self) -> Vec<Qid> {
        self.operations
            .iter()
            .flat_map(|op| op.qudits().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unitary of the whole circuit over its sorted qudits
    pub fn unitary(&self) -> Option<Array2<Complex64>> {
        self.unitary_on(&self.all_qudits())
    }

    /// Unitary of the circuit with `order` as the register layout
    ///
    /// Each operation's unitary is embedded into the register and multiplied
    /// on the left, so later operations act after earlier ones. Returns
    /// `None` when an operation has no unitary or touches a qudit missing
    /// from `order`.
    pub fn unitary_on(&self, order: &[Qid]) -> Option<Array2<Complex64>> {
        let shape: Vec<usize> = order.iter().map(|q| q.dimension).collect();
        let mut result = matrix::identity(matrix::dimension(&shape));

        for op in &self.operations {
            let u = op.gate().unitary()?;
            let targets = op
                .qudits()
                .iter()
                .map(|q| order.iter().position(|o| o == q))
                .collect::<Option<Vec<usize>>>()?;
            result = matrix::embed(&u, &targets, &shape).dot(&result);
        }

        Some(result)
    }

    /// Compose this circuit with another circuit, `other` running after `self`
    pub fn compose(&self, other: &QuantumCircuit) -> QuantumCircuit {
        let mut operations = self.operations.clone();
        operations.extend(other.operations.iter().cloned());
        QuantumCircuit { operations }
    }

    /// The circuit undoing this one, when every gate has an inverse
    pub fn inverse(&self) -> Option<QuantumCircuit> {
        let operations = self
            .operations
            .iter()
            .rev()
            .map(|op| {
                let gate = op.gate().inverse()?;
                Operation::new(gate, op.qudits().to_vec()).ok()
            })
            .collect::<Option<Vec<_>>>()?;
        Some(QuantumCircuit { operations })
    }
}

impl PartialEq for QuantumCircuit {
    fn eq(&self, other: &Self) -> bool {
        self.operations == other.operations
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl FromIterator<Operation> for QuantumCircuit {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        QuantumCircuit::from_operations(iter.into_iter().collect())
    }
}

/// One decomposition step, or `None` for a leaf
pub fn decompose_once(op: &Operation) -> Option<Vec<Operation>> {
    op.decompose_once()
}

/// Decompose until only leaves remain, preserving time order
pub fn decompose(op: &Operation) -> Vec<Operation> {
    decompose_with_config(op, &DecompositionConfig::default())
}

pub fn decompose_with_config(op: &Operation, config: &DecompositionConfig) -> Vec<Operation> {
    let mut leaves = Vec::new();
    let mut pending = vec![op.clone()];

    while let Some(next) = pending.pop() {
        let step = match next.gate().as_controlled() {
            Some(gate) => decompose_controlled(gate, next.qudits(), config),
            None => next.decompose_once(),
        };
        match step {
            Some(ops) => pending.extend(ops.into_iter().rev()),
            None => leaves.push(next),
        }
    }

    leaves
}

/// Check that the fully decomposed `op` reproduces its unitary within
/// `config.atol`, global phase included
///
/// Operations without a unitary, or whose leaves lack one, have nothing to
/// compare and pass.
pub fn verify_decomposition(op: &Operation, config: &DecompositionConfig) -> Result<()> {
    let Some(expected) = op.gate().unitary() else {
        tracing::debug!(operation = %op, "no unitary, skipping verification");
        return Ok(());
    };

    let circuit: QuantumCircuit = decompose_with_config(op, config).into_iter().collect();
    let Some(actual) = circuit.unitary_on(op.qudits()) else {
        tracing::debug!(operation = %op, "decomposition has no unitary, skipping verification");
        return Ok(());
    };

    let error = matrix::max_abs_diff(&expected, &actual);
    if error > config.atol {
        return Err(ControlError::ToleranceViolation {
            operation: op.to_string(),
            error,
            tolerance: config.atol,
        });
    }
    Ok(())
}
