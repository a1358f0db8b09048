// src/quantum/gate.rs
//! Quantum gates over qudits
//!
//! Every gate exposes its capabilities through the [`QuantumGate`] trait.
//! Each optional capability (unitary, mixture, decomposition, power,
//! parameter resolution, diagram symbols) answers with an `Option` or a
//! `Result`, so callers branch on what a gate can do rather than on what
//! type it is.

use std::any::Any;
use std::f64::consts::PI;
use std::fmt::Debug;

use ndarray::{array, Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};
use crate::quantum::controlled_gate::ControlledGate;
use crate::quantum::diagram::{DiagramArgs, DiagramInfo};
use crate::quantum::exponent::{Exponent, ParamResolver};
use crate::quantum::matrix::{self, phase};
use crate::quantum::qid::{Operation, Qid};

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// A gate split into a phase-free remainder and a global phase `e^{iπ exponent}`
#[derive(Debug, Clone)]
pub struct PhaseSplit {
    /// What is left once the phase is removed; `None` when the gate is
    /// nothing but a phase
    pub remainder: Option<Box<dyn QuantumGate>>,
    /// Phase in half-turns
    pub exponent: f64,
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Any + Send + Sync {
    /// Dimension of each qudit the gate acts on, in order
    fn qid_shape(&self) -> Vec<usize>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;

    /// Convert to Any for runtime type checking
    fn as_any(&self) -> &dyn Any;

    /// Structural equality with another gate
    fn equals(&self, other: &dyn QuantumGate) -> bool;

    fn num_qudits(&self) -> usize {
        self.qid_shape().len()
    }

    /// Dense unitary, when the gate is unitary and fully resolved
    fn unitary(&self) -> Option<Array2<Complex64>> {
        None
    }

    fn has_unitary(&self) -> bool {
        self.unitary().is_some()
    }

    /// Probability-weighted unitaries; a unitary gate is its own mixture
    fn mixture(&self) -> Option<Vec<(f64, Array2<Complex64>)>> {
        self.unitary().map(|u| vec![(1.0, u)])
    }

    fn has_mixture(&self) -> bool {
        self.mixture().is_some()
    }

    /// Whether the gate is described by Kraus operators (any channel,
    /// including unitaries and mixtures)
    fn has_kraus(&self) -> bool {
        self.has_mixture()
    }

    fn is_measurement(&self) -> bool {
        false
    }

    /// Rewrite this gate on `qudits` as a sequence of simpler operations
    fn decompose(&self, _qudits: &[Qid]) -> Option<Vec<Operation>> {
        None
    }

    fn pow(&self, _exponent: f64) -> Option<Box<dyn QuantumGate>> {
        None
    }

    fn inverse(&self) -> Option<Box<dyn QuantumGate>> {
        self.pow(-1.0)
    }

    fn is_parameterized(&self) -> bool {
        false
    }

    fn resolve_parameters(&self, _resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        Ok(self.clone_box())
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        None
    }

    /// Separate a global phase that is not implied by the gate's structure
    fn split_global_phase(&self) -> Option<PhaseSplit> {
        None
    }

    /// Access to the eigen-power structure used by the canonical table
    fn as_pow_gate(&self) -> Option<&PowGate> {
        None
    }

    /// Access to the control structure, used to flatten nested controls
    fn as_controlled(&self) -> Option<&ControlledGate> {
        None
    }

    /// Apply this gate to specific qudits
    fn on(&self, qudits: &[Qid]) -> Result<Operation> {
        Operation::new(self.clone_box(), qudits.to_vec())
    }
}

/// Equality helper for gates that derive or implement `PartialEq`
pub fn same_gate<T: QuantumGate + PartialEq>(gate: &T, other: &dyn QuantumGate) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .map_or(false, |other| gate == other)
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

impl PartialEq for Box<dyn QuantumGate> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other.as_ref())
    }
}

/// Gate families whose matrix at exponent one is a Hermitian involution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowKind {
    /// Pauli-X gate (NOT gate)
    X,
    /// Pauli-Y gate
    Y,
    /// Pauli-Z gate
    Z,
    /// Hadamard gate
    H,
    /// CNOT gate
    CX,
    /// Controlled-Z gate
    CZ,
    /// Toffoli gate (CCNOT)
    CCX,
    /// Doubly controlled Z gate
    CCZ,
    /// X ⊗ X
    XX,
    /// SWAP gate
    Swap,
}

impl PowKind {
    pub fn num_qubits(self) -> usize {
        match self {
            PowKind::X | PowKind::Y | PowKind::Z | PowKind::H => 1,
            PowKind::CX | PowKind::CZ | PowKind::XX | PowKind::Swap => 2,
            PowKind::CCX | PowKind::CCZ => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowKind::X => "X",
            PowKind::Y => "Y",
            PowKind::Z => "Z",
            PowKind::H => "H",
            PowKind::CX => "CX",
            PowKind::CZ => "CZ",
            PowKind::CCX => "CCX",
            PowKind::CCZ => "CCZ",
            PowKind::XX => "XX",
            PowKind::Swap => "SWAP",
        }
    }

    fn wire_symbols(self) -> &'static [&'static str] {
        match self {
            PowKind::X => &["X"],
            PowKind::Y => &["Y"],
            PowKind::Z => &["Z"],
            PowKind::H => &["H"],
            PowKind::CX => &["@", "X"],
            PowKind::CZ => &["@", "@"],
            PowKind::CCX => &["@", "@", "X"],
            PowKind::CCZ => &["@", "@", "@"],
            PowKind::XX => &["XX", "XX"],
            PowKind::Swap => &["×", "×"],
        }
    }

    /// The gate's matrix at exponent one
    pub fn involution(self) -> Array2<Complex64> {
        use constants::*;
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let x = array![[zero, one], [one, zero]];
        let z = array![[one, zero], [zero, -one]];

        // Controlled forms flip the sign or swap the last two basis states
        let controlled = |n: usize, tail: &Array2<Complex64>| {
            let dim = 1 << n;
            let mut m = matrix::identity(dim);
            for i in 0..2 {
                for j in 0..2 {
                    m[[dim - 2 + i, dim - 2 + j]] = tail[[i, j]];
                }
            }
            m
        };

        match self {
            PowKind::X => x,
            PowKind::Y => array![[zero, -I], [I, zero]],
            PowKind::Z => z,
            PowKind::H => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[factor, factor], [factor, -factor]]
            }
            PowKind::CX => controlled(2, &x),
            PowKind::CZ => controlled(2, &z),
            PowKind::CCX => controlled(3, &x),
            PowKind::CCZ => controlled(3, &z),
            PowKind::XX => matrix::kron(&x, &x),
            PowKind::Swap => array![
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one]
            ],
        }
    }
}

/// An involution `M` raised to a power, with an optional global shift
///
/// The unitary is `e^{iπ t s} [(I+M)/2 + e^{iπ t}(I−M)/2]` for exponent `t`
/// and shift `s`. At `t = 1, s = 0` this is `M` itself.
#[derive(Debug, Clone)]
pub struct PowGate {
    kind: PowKind,
    exponent: Exponent,
    global_shift: f64,
}

impl PowGate {
    pub fn new(kind: PowKind) -> Self {
        PowGate {
            kind,
            exponent: Exponent::Value(1.0),
            global_shift: 0.0,
        }
    }

    pub fn x() -> Self {
        Self::new(PowKind::X)
    }

    pub fn y() -> Self {
        Self::new(PowKind::Y)
    }

    pub fn z() -> Self {
        Self::new(PowKind::Z)
    }

    pub fn h() -> Self {
        Self::new(PowKind::H)
    }

    pub fn cx() -> Self {
        Self::new(PowKind::CX)
    }

    pub fn cz() -> Self {
        Self::new(PowKind::CZ)
    }

    pub fn ccx() -> Self {
        Self::new(PowKind::CCX)
    }

    pub fn ccz() -> Self {
        Self::new(PowKind::CCZ)
    }

    pub fn xx() -> Self {
        Self::new(PowKind::XX)
    }

    pub fn swap() -> Self {
        Self::new(PowKind::Swap)
    }

    /// Phase gate, `Z**0.5`
    pub fn s() -> Self {
        Self::z().with_exponent(0.5)
    }

    /// π/8 gate, `Z**0.25`
    pub fn t() -> Self {
        Self::z().with_exponent(0.25)
    }

    pub fn with_exponent(mut self, exponent: impl Into<Exponent>) -> Self {
        self.exponent = exponent.into();
        self
    }

    pub fn with_global_shift(mut self, global_shift: f64) -> Self {
        self.global_shift = global_shift;
        self
    }

    pub fn kind(&self) -> PowKind {
        self.kind
    }

    pub fn exponent(&self) -> &Exponent {
        &self.exponent
    }

    pub fn global_shift(&self) -> f64 {
        self.global_shift
    }

    /// Exponent reduced into (-1, 1] when the gate is periodic in it
    fn canonical_exponent(&self) -> Exponent {
        match self.exponent {
            Exponent::Value(t) if self.global_shift == 0.0 => {
                let mut r = t % 2.0;
                if r <= -1.0 {
                    r += 2.0;
                } else if r > 1.0 {
                    r -= 2.0;
                }
                Exponent::Value(r)
            }
            _ => self.exponent.clone(),
        }
    }

    /// S and T are named after the Z power they stand for
    fn named_phase(&self) -> Option<(&'static str, f64)> {
        if self.kind != PowKind::Z || self.global_shift != 0.0 {
            return None;
        }
        let t = self.exponent.value()?;
        [("S", 0.5), ("T", 0.25)]
            .into_iter()
            .find(|(_, base)| t.abs() == *base)
            .map(|(symbol, base)| (symbol, t / base))
    }
}

impl PartialEq for PowGate {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.global_shift == other.global_shift
            && self.canonical_exponent() == other.canonical_exponent()
    }
}

impl QuantumGate for PowGate {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2; self.kind.num_qubits()]
    }

    fn name(&self) -> String {
        if let Some((symbol, power)) = self.named_phase() {
            return if power == 1.0 {
                symbol.to_string()
            } else {
                format!("{}**{}", symbol, power)
            };
        }
        match self.exponent {
            Exponent::Value(t) if t == 1.0 => self.kind.symbol().to_string(),
            ref e => format!("{}**{}", self.kind.symbol(), e),
        }
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        let t = self.exponent.value()?;
        let m = self.kind.involution();
        let id = matrix::identity(m.nrows());
        let plus = (&id + &m).mapv(|x| x * 0.5);
        let minus = (&id - &m).mapv(|x| x * 0.5);
        let shift = phase(t * self.global_shift);
        Some((plus + minus.mapv(|x| x * phase(t))).mapv(|x| x * shift))
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        let scaled = self.exponent.scaled(exponent);
        Some(Box::new(self.clone().with_exponent(scaled)))
    }

    fn is_parameterized(&self) -> bool {
        self.exponent.is_parameterized()
    }

    fn resolve_parameters(&self, resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        let resolved = self.exponent.resolve(resolver);
        Ok(Box::new(self.clone().with_exponent(resolved)))
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        if let Some((symbol, power)) = self.named_phase() {
            return Some(DiagramInfo::new([symbol]).with_exponent(Exponent::Value(power)));
        }
        Some(DiagramInfo::new(self.kind.wire_symbols().iter().copied())
            .with_exponent(self.exponent.clone()))
    }

    fn split_global_phase(&self) -> Option<PhaseSplit> {
        if self.global_shift == 0.0 {
            return None;
        }
        let t = self.exponent.value()?;
        Some(PhaseSplit {
            remainder: Some(Box::new(self.clone().with_global_shift(0.0))),
            exponent: t * self.global_shift,
        })
    }

    fn as_pow_gate(&self) -> Option<&PowGate> {
        Some(self)
    }
}

/// Cyclic relabeling `|j⟩ → |j + shift mod d⟩` of a single qudit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuditShiftGate {
    dimension: usize,
    shift: usize,
}

impl QuditShiftGate {
    pub fn new(dimension: usize, shift: usize) -> Self {
        QuditShiftGate {
            dimension,
            shift: shift % dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    /// The shift that undoes this one
    pub fn inverted(&self) -> Self {
        QuditShiftGate::new(self.dimension, self.dimension - self.shift)
    }
}

impl QuantumGate for QuditShiftGate {
    fn qid_shape(&self) -> Vec<usize> {
        vec![self.dimension]
    }

    fn name(&self) -> String {
        format!("X(d={})**{}", self.dimension, self.shift)
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        let d = self.dimension;
        let mut m = Array2::zeros((d, d));
        for j in 0..d {
            m[[(j + self.shift) % d, j]] = Complex64::new(1.0, 0.0);
        }
        Some(m)
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        if exponent.fract() != 0.0 {
            return None;
        }
        // Reduce first: the exponent may be far outside the integer range
        let d = self.dimension as f64;
        let turns = exponent.rem_euclid(d) as usize;
        Some(Box::new(QuditShiftGate::new(self.dimension, turns * self.shift)))
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new([format!("[+{}]", self.shift)]))
    }
}

/// Phase `e^{iπ x}` on a single basis level of one qudit
#[derive(Debug, Clone, PartialEq)]
pub struct QuditPhaseGate {
    dimension: usize,
    level: usize,
    exponent: Exponent,
}

impl QuditPhaseGate {
    pub fn new(dimension: usize, level: usize, exponent: impl Into<Exponent>) -> Self {
        QuditPhaseGate {
            dimension,
            level,
            exponent: exponent.into(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn exponent(&self) -> &Exponent {
        &self.exponent
    }
}

impl QuantumGate for QuditPhaseGate {
    fn qid_shape(&self) -> Vec<usize> {
        vec![self.dimension]
    }

    fn name(&self) -> String {
        format!("Z(d={})[{}]**{}", self.dimension, self.level, self.exponent)
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        let x = self.exponent.value()?;
        let mut m = matrix::identity(self.dimension);
        m[[self.level, self.level]] = phase(x);
        Some(m)
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        Some(Box::new(QuditPhaseGate {
            exponent: self.exponent.scaled(exponent),
            ..self.clone()
        }))
    }

    fn is_parameterized(&self) -> bool {
        self.exponent.is_parameterized()
    }

    fn resolve_parameters(&self, resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        Ok(Box::new(QuditPhaseGate {
            exponent: self.exponent.resolve(resolver),
            ..self.clone()
        }))
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new([format!("Z[{}]", self.level)]).with_exponent(self.exponent.clone()))
    }
}

/// A generic gate defined by its matrix
#[derive(Debug, Clone)]
pub struct MatrixGate {
    matrix: Array2<Complex64>,
    qid_shape: Vec<usize>,
    name: Option<String>,
}

impl MatrixGate {
    /// A gate on qubits; the matrix dimension must be a power of two
    pub fn new(matrix: Array2<Complex64>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || !rows.is_power_of_two() {
            return Err(ControlError::MatrixShape {
                rows,
                cols,
                shape: Vec::new(),
            });
        }
        let qubits = rows.trailing_zeros() as usize;
        Self::with_qid_shape(matrix, vec![2; qubits])
    }

    pub fn with_qid_shape(matrix: Array2<Complex64>, qid_shape: Vec<usize>) -> Result<Self> {
        if let Some(&d) = qid_shape.iter().find(|&&d| d < 2) {
            return Err(ControlError::InvalidDimension(d));
        }
        let (rows, cols) = matrix.dim();
        if rows != cols || rows != matrix::dimension(&qid_shape) {
            return Err(ControlError::MatrixShape {
                rows,
                cols,
                shape: qid_shape,
            });
        }
        Ok(MatrixGate {
            matrix,
            qid_shape,
            name: None,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }
}

impl PartialEq for MatrixGate {
    fn eq(&self, other: &Self) -> bool {
        self.qid_shape == other.qid_shape && matrix::allclose(&self.matrix, &other.matrix, 1e-10)
    }
}

impl QuantumGate for MatrixGate {
    fn qid_shape(&self) -> Vec<usize> {
        self.qid_shape.clone()
    }

    fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("MatrixGate({}x{})", self.matrix.nrows(), self.matrix.ncols()),
        }
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        Some(self.matrix.clone())
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        if exponent.fract() != 0.0 {
            return None;
        }
        let mut base = if exponent < 0.0 {
            matrix::adjoint(&self.matrix)
        } else {
            self.matrix.clone()
        };
        let mut result = matrix::identity(self.matrix.nrows());
        let mut remaining = exponent.abs() as u64;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.dot(&base);
            }
            base = base.dot(&base);
            remaining >>= 1;
        }
        Some(Box::new(MatrixGate {
            matrix: result,
            qid_shape: self.qid_shape.clone(),
            name: None,
        }))
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        let symbol = self.name.clone().unwrap_or_else(|| "M".to_string());
        Some(DiagramInfo::new(vec![symbol; self.qid_shape.len()]))
    }

    fn split_global_phase(&self) -> Option<PhaseSplit> {
        if !self.qid_shape.is_empty() {
            return None;
        }
        Some(PhaseSplit {
            remainder: None,
            exponent: self.matrix[[0, 0]].arg() / PI,
        })
    }
}

/// Identity on any register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityGate {
    qid_shape: Vec<usize>,
}

impl IdentityGate {
    pub fn new(qid_shape: Vec<usize>) -> Self {
        IdentityGate { qid_shape }
    }

    pub fn qubits(n: usize) -> Self {
        IdentityGate::new(vec![2; n])
    }
}

impl QuantumGate for IdentityGate {
    fn qid_shape(&self) -> Vec<usize> {
        self.qid_shape.clone()
    }

    fn name(&self) -> String {
        if self.qid_shape == [2] {
            "I".to_string()
        } else {
            format!("I{:?}", self.qid_shape)
        }
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        Some(matrix::identity(matrix::dimension(&self.qid_shape)))
    }

    fn decompose(&self, _qudits: &[Qid]) -> Option<Vec<Operation>> {
        Some(Vec::new())
    }

    fn pow(&self, _exponent: f64) -> Option<Box<dyn QuantumGate>> {
        Some(self.clone_box())
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new(vec!["I"; self.qid_shape.len()]))
    }
}

/// A zero-qudit gate multiplying everything by `e^{iπ x}`
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalPhaseGate {
    exponent: Exponent,
}

impl GlobalPhaseGate {
    /// Phase given in half-turns
    pub fn new(exponent: impl Into<Exponent>) -> Self {
        GlobalPhaseGate {
            exponent: exponent.into(),
        }
    }

    /// Phase given in radians
    pub fn from_angle(angle: f64) -> Self {
        GlobalPhaseGate::new(angle / PI)
    }

    /// Phase given as a unit-modulus coefficient
    pub fn from_coefficient(coefficient: Complex64) -> Self {
        GlobalPhaseGate::new(coefficient.arg() / PI)
    }

    pub fn coefficient(&self) -> Option<Complex64> {
        self.exponent.value().map(phase)
    }
}

impl QuantumGate for GlobalPhaseGate {
    fn qid_shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn name(&self) -> String {
        format!("GlobalPhase({})", self.exponent)
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

    fn unitary(&self) -> Option<Array2<Complex64>> {
        let c = self.coefficient()?;
        Some(Array2::from_diag(&Array1::from_elem(1, c)))
    }

    fn pow(&self, exponent: f64) -> Option<Box<dyn QuantumGate>> {
        Some(Box::new(GlobalPhaseGate::new(self.exponent.scaled(exponent))))
    }

    fn is_parameterized(&self) -> bool {
        self.exponent.is_parameterized()
    }

    fn resolve_parameters(&self, resolver: &ParamResolver) -> Result<Box<dyn QuantumGate>> {
        Ok(Box::new(GlobalPhaseGate::new(self.exponent.resolve(resolver))))
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> Option<DiagramInfo> {
        Some(DiagramInfo::new(Vec::<String>::new()).with_exponent(self.exponent.clone()))
    }

    fn split_global_phase(&self) -> Option<PhaseSplit> {
        Some(PhaseSplit {
            remainder: None,
            exponent: self.exponent.value()?,
        })
    }
}
