// src/quantum/qid.rs
//! Qudits and operations applied to them

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};
use crate::quantum::control_values::ControlValues;
use crate::quantum::controlled_gate::ControlledGate;
use crate::quantum::gate::QuantumGate;

/// A qudit on a line, identified by its index and carrying its dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qid {
    pub index: usize,
    pub dimension: usize,
}

impl Qid {
    pub fn new(index: usize, dimension: usize) -> Self {
        Qid { index, dimension }
    }

    pub fn qubit(index: usize) -> Self {
        Qid::new(index, 2)
    }

    /// Qubits `0..n`
    pub fn range(n: usize) -> Vec<Qid> {
        (0..n).map(Qid::qubit).collect()
    }

    /// One qudit per entry of `shape`, indexed from zero
    pub fn for_qid_shape(shape: &[usize]) -> Vec<Qid> {
        shape
            .iter()
            .enumerate()
            .map(|(i, &d)| Qid::new(i, d))
            .collect()
    }
}

impl fmt::Display for Qid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dimension == 2 {
            write!(f, "q({})", self.index)
        } else {
            write!(f, "q({}) (d={})", self.index, self.dimension)
        }
    }
}

/// A gate applied to an ordered list of qudits
#[derive(Debug, Clone)]
pub struct Operation {
    gate: Box<dyn QuantumGate>,
    qudits: Vec<Qid>,
}

impl Operation {
    /// Apply `gate` to `qudits`, checking count, dimensions and uniqueness
    pub fn new(gate: Box<dyn QuantumGate>, qudits: Vec<Qid>) -> Result<Self> {
        let expected = gate.qid_shape();
        if qudits.len() != expected.len() {
            return Err(ControlError::WrongQidCount {
                gate: gate.name(),
                expected: expected.len(),
                actual: qudits.len(),
            });
        }

        let actual: Vec<usize> = qudits.iter().map(|q| q.dimension).collect();
        if actual != expected {
            return Err(ControlError::WrongQidShape {
                gate: gate.name(),
                expected,
                actual,
            });
        }

        let mut seen = HashSet::new();
        for q in &qudits {
            if !seen.insert(*q) {
                return Err(ControlError::DuplicateQid(*q));
            }
        }

        Ok(Operation { gate, qudits })
    }

    pub fn gate(&self) -> &dyn QuantumGate {
        self.gate.as_ref()
    }

    pub fn qudits(&self) -> &[Qid] {
        &self.qudits
    }

    /// One step of decomposition, if the gate supports it
    pub fn decompose_once(&self) -> Option<Vec<Operation>> {
        self.gate.decompose(&self.qudits)
    }

    /// This operation conditioned on `controls`, which are placed first
    pub fn controlled_by(
        &self,
        controls: &[Qid],
        control_values: ControlValues,
    ) -> Result<Operation> {
        let shape: Vec<usize> = controls.iter().map(|q| q.dimension).collect();
        let gate = ControlledGate::builder(self.gate.clone_box())
            .control_values(control_values)
            .control_qid_shape(shape)
            .build()?;

        let mut qudits = controls.to_vec();
        qudits.extend_from_slice(&self.qudits);
        Operation::new(Box::new(gate), qudits)
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.qudits == other.qudits && self.gate.equals(other.gate.as_ref())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.gate.name(),
            self.qudits
                .iter()
                .map(|q| q.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
