// src/quantum/mod.rs
//! Controlled quantum operations over qudits
//!
//! Gates, the control conditions that gate them, and the decomposition of
//! controlled gates into simpler controlled operations.

pub mod canonical;
pub mod circuit;
pub mod control_values;
pub mod controlled_gate;
pub mod decompose;
pub mod diagram;
pub mod exponent;
pub mod gate;
pub mod matrix;
pub mod noise;
pub mod qid;

pub use canonical::{controlled_form, next_controlled_form, CANONICAL_CONTROLLED_FORMS};
pub use circuit::{decompose, decompose_once, decompose_with_config, verify_decomposition, QuantumCircuit};
pub use control_values::{ControlValues, ProductOfSums, SumOfProducts};
pub use controlled_gate::{Controllable, ControlledGate, ControlledGateBuilder};
pub use decompose::decompose_controlled;
pub use diagram::{DiagramArgs, DiagramInfo};
pub use exponent::{Exponent, ParamResolver};
pub use gate::{
    GlobalPhaseGate, IdentityGate, MatrixGate, PhaseSplit, PowGate, PowKind, QuantumGate, QuditPhaseGate,
    QuditShiftGate,
};
pub use noise::{MeasurementGate, PhaseDampingChannel, PhaseFlipChannel, RandomGateChannel};
pub use qid::{Operation, Qid};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{ControlValues, ProductOfSums, SumOfProducts};
    pub use super::{Controllable, ControlledGate};
    pub use super::{Exponent, ParamResolver};
    pub use super::{Operation, Qid, QuantumCircuit, QuantumGate};
    pub use super::{GlobalPhaseGate, MatrixGate, PowGate, QuditPhaseGate, QuditShiftGate};
}
