// src/quantum/controlled_gate.rs
//! Gates applied only when control qudits satisfy a condition
//!
//! A [`ControlledGate`] is immutable. Nested controls are flattened when the
//! gate is built: the outer controls come first and the stored sub-gate is
//! never itself a `ControlledGate`.

use std::any::Any;
use std::fmt;

use ndarray::{s, Array2};
use num_complex::Complex64;

use crate::config::DecompositionConfig;
use crate::error::{ControlError, Result};
use crate::quantum::control_values::{ControlValues, ProductOfSums};
use crate::quantum::decompose::decompose_controlled;
use crate::quantum::diagram::{DiagramArgs, DiagramInfo};
use crate::quantum::exponent::ParamResolver;
use crate::quantum::gate::QuantumGate;
use crate::quantum::matrix;
use crate::quantum::qid::{Operation, Qid};

#[derive(Debug, Clone)]
pub struct ControlledGate {
    sub_gate: Box<dyn QuantumGate>,
    control_values: ControlValues,
    control_qid_shape: Vec<usize>,
}

impl ControlledGate {
    /// `sub_gate` controlled by one qubit in state `|1⟩`
    pub fn new(sub_gate: Box<dyn QuantumGate>) -> Result<Self> {
        Self::builder(sub_gate).build()
    }

    pub fn builder(sub_gate: Box<dyn QuantumGate>) -> ControlledGateBuilder {
        ControlledGateBuilder {
            sub_gate,
            num_controls: None,
            control_values: None,
            control_qid_shape: None,
        }
    }

    pub fn sub_gate(&self) -> &dyn QuantumGate {
        self.sub_gate.as_ref()
    }

    pub fn control_values(&self) -> &ControlValues {
        &self.control_values
    }

    pub fn control_qid_shape(&self) -> &[usize] {
        &self.control_qid_shape
    }

    pub fn num_controls(&self) -> usize {
        self.control_qid_shape.len()
    }

    /// Every control accepts exactly its top level `dim - 1`
    pub fn has_default_controls(&self) -> bool {
        self.control_values.is_default_for(&self.control_qid_shape)
    }

    /// Check that `qudits` fit this gate, controls first
    pub fn validate_args(&self, qudits: &[Qid]) -> Result<()> {
        let expected = self.qid_shape();
        if qudits.len() != expected.len() {
            return Err(ControlError::WrongQidCount {
                gate: self.name(),
                expected: expected.len(),
                actual: qudits.len(),
            });
        }
        let actual: Vec<usize> = qudits.iter().map(|q| q.dimension).collect();
        if actual != expected {
            return Err(ControlError::WrongQidShape {
                gate: self.name(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Block-diagonal lift of a sub-gate matrix: `m` on every accepted
    /// control assignment, identity elsewhere
    fn lift(&self, m: &Array2<Complex64>) -> Array2<Complex64> {
        let control_dim = matrix::dimension(&self.control_qid_shape);
        let sub_dim = m.nrows();
        let mut result = matrix::identity(control_dim * sub_dim);

        for c in 0..control_dim {
            if self
                .control_values
                .matches(&matrix::digits(c, &self.control_qid_shape))
            {
                let start = c * sub_dim;
                result
                    .slice_mut(s![start..start + sub_dim, start..start + sub_dim])
                    .assign(m);
            }
        }

        result
    }

    fn rebuild(&self, sub_gate: Box<dyn QuantumGate>) -> Result<ControlledGate> {
        ControlledGate::builder(sub_gate)
            .control_values(self.control_values.clone())
            .control_qid_shape(self.control_qid_shape.clone())
            .build()
    }
}

impl QuantumGate for ControlledGate {
    fn qid_shape(&self) -> Vec<usize> {
        let mut shape = self.control_qid_shape.clone();
        shape.extend(self.sub_gate.qid_shape());
        shape
    }

    fn name(&self) -> String {
        self.to_string()
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn QuantumGate) -> bool {
        match other.as_controlled() {
            Some(other) => {
                self.control_qid_shape == other.control_qid_shape
                    && self.control_values == other.control_values
                    && self.sub_gate.equals(other.sub_gate.as_ref())
            }
            None => false,
        }
    }

    fn unitary(&self) -> Option<Array2<Complex64>> {
        let sub = self.sub_gate.unitary()?;
        Some(self.lift(&sub))
    }

    fn mixture(&self) -> Option<Vec<(f64, Array2<Complex64>)>> {
        let components = self.sub_gate.mixture()?;
        let total: f64 = components.iter().map(|(p, _)| p).sum();
        let dim = matrix::dimension(&self.qid_shape());

        let mut result: Vec<(f64, Array2<Complex64>)> = components
            .into_iter()
            .map(|(p, u)| (p, self.lift(&u)))
            .collect();
        if 1.0 - total > 1e-12 {
            result.push((1.0 - total, matrix::identity(dim)));
        }
        Some(result)
    }

    fn has_kraus(&self) -> bool {
        self.sub_gate.has_kraus()
    }

    fn decompose(&self, qudits: &[Qid]) -> Option<Vec<Operation>> {
        decompose_controlled(self, qudits, &DecompositionConfig::default())
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        if !self.has_default_controls() {
            return None;
        }
        let sub = self.sub_gate.pow(exponent)?;
        self.rebuild(sub).ok().map(|g| Box::new(g) as Box<dyn QuantumGate>)
    }

    fn is_parameterized(&self) -> bool {
        self.sub_gate.is_parameterized()
    }

    /// Rebuilding re-runs construction checks, so a sub-gate that resolves
    /// into a channel is rejected here
    fn resolve_parameters(&self, resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        let sub = self.sub_gate.resolve_parameters(resolver)?;
        Ok(Box::new(self.rebuild(sub)?))
    }

    fn diagram_info(&self, args: &DiagramArgs) -> Option<DiagramInfo> {
        let n = self.num_controls();
        let sub_info = self.sub_gate.diagram_info(&args.skip(n))?;

        let mut wire_symbols = self.control_values.diagram_symbols(&self.control_qid_shape);
        wire_symbols.extend(sub_info.wire_symbols);
        Some(DiagramInfo {
            wire_symbols,
            exponent: sub_info.exponent,
            connected: true,
            exponent_qudit_index: Some(sub_info.exponent_qudit_index.unwrap_or(0) + n),
        })
    }

    fn as_controlled(&self) -> Option<&ControlledGate> {
        Some(self)
    }
}

impl PartialEq for ControlledGate {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for ControlledGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.control_values.prefix(&self.control_qid_shape),
            self.sub_gate.name()
        )
    }
}

/// Collects the optional pieces of a controlled gate and validates them
/// together
#[derive(Debug, Clone)]
pub struct ControlledGateBuilder {
    sub_gate: Box<dyn QuantumGate>,
    num_controls: Option<usize>,
    control_values: Option<ControlValues>,
    control_qid_shape: Option<Vec<usize>>,
}

impl ControlledGateBuilder {
    pub fn num_controls(mut self, num_controls: usize) -> Self {
        self.num_controls = Some(num_controls);
        self
    }

    pub fn control_values(mut self, control_values: impl Into<ControlValues>) -> Self {
        self.control_values = Some(control_values.into());
        self
    }

    pub fn control_qid_shape(mut self, control_qid_shape: Vec<usize>) -> Self {
        self.control_qid_shape = Some(control_qid_shape);
        self
    }

    pub fn build(self) -> Result<ControlledGate> {
        let num_controls = self
            .num_controls
            .or_else(|| self.control_values.as_ref().map(ControlValues::num_qudits))
            .or_else(|| self.control_qid_shape.as_ref().map(Vec::len))
            .unwrap_or(1);

        if let Some(values) = &self.control_values {
            if values.num_qudits() != num_controls {
                return Err(ControlError::ControlCountMismatch {
                    expected: num_controls,
                    actual: values.num_qudits(),
                });
            }
        }

        let shape = match self.control_qid_shape {
            Some(shape) if shape.len() != num_controls => {
                return Err(ControlError::ShapeLengthMismatch {
                    expected: num_controls,
                    actual: shape.len(),
                });
            }
            Some(shape) => shape,
            None => vec![2; num_controls],
        };
        if let Some(&d) = shape.iter().find(|&&d| d < 2) {
            return Err(ControlError::InvalidDimension(d));
        }

        let values = self
            .control_values
            .unwrap_or_else(|| ProductOfSums::default_for(&shape).into());
        values.validate(&shape)?;

        let sub_gate = self.sub_gate;
        if sub_gate.is_measurement() {
            return Err(ControlError::ControlledMeasurement(sub_gate.name()));
        }
        if !sub_gate.is_parameterized() && !sub_gate.has_mixture() && sub_gate.has_kraus() {
            return Err(ControlError::ControlledChannel(sub_gate.name()));
        }

        if let Some(inner) = sub_gate.as_controlled() {
            let mut control_qid_shape = shape;
            control_qid_shape.extend_from_slice(&inner.control_qid_shape);
            return Ok(ControlledGate {
                sub_gate: inner.sub_gate.clone(),
                control_values: values.and(&inner.control_values),
                control_qid_shape,
            });
        }

        Ok(ControlledGate {
            sub_gate,
            control_values: values,
            control_qid_shape: shape,
        })
    }
}

/// Adds controls to any gate
pub trait Controllable {
    fn controlled(&self) -> ControlledGateBuilder;
}

impl<G: QuantumGate + ?Sized> Controllable for G {
    fn controlled(&self) -> ControlledGateBuilder {
        ControlledGate::builder(self.clone_box())
    }
}
