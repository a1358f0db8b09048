// src/quantum/noise.rs
//! Measurements and noise channels
//!
//! Measurements and general channels cannot be coherently controlled;
//! mixtures of unitaries can, one controlled unitary per component.

use std::any::Any;

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::Result;
use crate::quantum::diagram::{DiagramArgs, DiagramInfo};
use crate::quantum::exponent::{Exponent, ParamResolver};
use crate::quantum::gate::{same_gate, PowGate, QuantumGate};
use crate::quantum::matrix;

/// Computational-basis measurement stored under a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementGate {
    key: String,
    qid_shape: Vec<usize>,
}

impl MeasurementGate {
    pub fn new(key: impl Into<String>, qid_shape: Vec<usize>) -> Self {
        MeasurementGate {
            key: key.into(),
            qid_shape,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl QuantumGate for MeasurementGate {
    fn qid_shape(&self) -> Vec<usize> {
        self.qid_shape.clone()
    }

    fn name(&self) -> String {
        format!("M('{}')", self.key)
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn QuantumGate) -> bool {
        same_gate(self, other)
    }

    fn is_measurement(&self) -> bool {
        true
    }

    fn has_kraus(&self) -> bool {
        true
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new(vec!["M"; self.qid_shape.len()]))
    }
}

/// Applies Z with probability `p`, identity otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseFlipChannel {
    probability: f64,
}

impl PhaseFlipChannel {
    pub fn new(probability: f64) -> Self {
        PhaseFlipChannel { probability }
    }
}

impl QuantumGate for PhaseFlipChannel {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2]
    }

    fn name(&self) -> String {
        format!("phase_flip(p={})", self.probability)
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn QuantumGate) -> bool {
        same_gate(self, other)
    }

    fn mixture(&self) -> Option<Vec<(f64, Array2<Complex64>)>> {
        Some(vec![
            (1.0 - self.probability, matrix::identity(2)),
            (self.probability, PowGate::z().unitary()?),
        ])
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new([format!("PF({})", self.probability)]))
    }
}

/// Loses phase coherence at rate `gamma`; a general channel, not a mixture
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDampingChannel {
    gamma: f64,
}

impl PhaseDampingChannel {
    pub fn new(gamma: f64) -> Self {
        PhaseDampingChannel { gamma }
    }

    /// Kraus operators `diag(1, sqrt(1-γ))` and `diag(0, sqrt(γ))`
    pub fn kraus(&self) -> Vec<Array2<Complex64>> {
        let mut k0 = matrix::identity(2);
        k0[[1, 1]] = Complex64::new((1.0 - self.gamma).sqrt(), 0.0);
        let mut k1 = Array2::zeros((2, 2));
        k1[[1, 1]] = Complex64::new(self.gamma.sqrt(), 0.0);
        vec![k0, k1]
    }
}

impl QuantumGate for PhaseDampingChannel {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2]
    }

    fn name(&self) -> String {
        format!("phase_damp(gamma={})", self.gamma)
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn QuantumGate) -> bool {
        same_gate(self, other)
    }

    fn has_kraus(&self) -> bool {
        true
    }
}

/// Applies `sub_gate` with some probability, identity otherwise
#[derive(Debug, Clone)]
pub struct RandomGateChannel {
    sub_gate: Box<dyn QuantumGate>,
    probability: Exponent,
}

impl RandomGateChannel {
    pub fn new(sub_gate: Box<dyn QuantumGate>, probability: impl Into<Exponent>) -> Self {
        RandomGateChannel {
            sub_gate,
            probability: probability.into(),
        }
    }

    pub fn sub_gate(&self) -> &dyn QuantumGate {
        self.sub_gate.as_ref()
    }

    pub fn probability(&self) -> &Exponent {
        &self.probability
    }
}

impl PartialEq for RandomGateChannel {
    fn eq(&self, other: &Self) -> bool {
        self.probability == other.probability && self.sub_gate.equals(other.sub_gate.as_ref())
    }
}

impl QuantumGate for RandomGateChannel {
    fn qid_shape(&self) -> Vec<usize> {
        self.sub_gate.qid_shape()
    }

    fn name(&self) -> String {
        format!("{}[prob={}]", self.sub_gate.name(), self.probability)
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn QuantumGate) -> bool {
        same_gate(self, other)
    }

    fn mixture(&self) -> Option<Vec<(f64, Array2<Complex64>)>> {
        let p = self.probability.value()?;
        let components = self.sub_gate.mixture()?;
        let dim = matrix::dimension(&self.sub_gate.qid_shape());

        let mut result = vec![(1.0 - p, matrix::identity(dim))];
        result.extend(components.into_iter().map(|(q, u)| (p * q, u)));
        Some(result)
    }

    fn has_kraus(&self) -> bool {
        self.sub_gate.has_kraus()
    }

    fn is_parameterized(&self) -> bool {
        self.probability.is_parameterized() || self.sub_gate.is_parameterized()
    }

    fn resolve_parameters(&self, resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        Ok(Box::new(RandomGateChannel {
            sub_gate: self.sub_gate.resolve_parameters(resolver)?,
            probability: self.probability.resolve(resolver),
        }))
    }
}
