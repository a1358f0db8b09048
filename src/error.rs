// src/error.rs
//! Error types for controlled-gate construction and verification
//!
//! Only validation failures and verification failures are errors. A missing
//! capability (no unitary, no power, no decomposition) is reported as `None`
//! by the corresponding query instead.

use thiserror::Error;

use crate::quantum::qid::Qid;

/// Errors raised while building or checking controlled operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// The control values act on a different number of qudits than requested
    #[error("Control values act on {actual} qudits, but num_controls is {expected}")]
    ControlCountMismatch { expected: usize, actual: usize },

    /// The control qid shape has the wrong length
    #[error("len(control_qid_shape) is {actual}, but num_controls is {expected}")]
    ShapeLengthMismatch { expected: usize, actual: usize },

    /// An accepted value does not fit the dimension of its qudit
    #[error("Control values {values:?} for qudit {qudit} are outside of range for dimension {dimension}")]
    ValueOutOfRange {
        qudit: usize,
        values: Vec<usize>,
        dimension: usize,
    },

    /// A product-of-sums entry accepts nothing
    #[error("Control values for qudit {0} accept no basis value")]
    EmptyControlSet(usize),

    /// A sum-of-products condition has no assignments
    #[error("A sum of products needs at least one accepted assignment")]
    EmptySumOfProducts,

    /// Assignments of a sum of products have different lengths
    #[error("Assignment {assignment:?} has length {actual}, expected {expected}")]
    RaggedAssignment {
        assignment: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Qudit dimensions start at 2
    #[error("Invalid qudit dimension {0}: dimensions must be at least 2")]
    InvalidDimension(usize),

    /// Measurements cannot be coherently controlled
    #[error("Cannot control measurement {0}")]
    ControlledMeasurement(String),

    /// General channels cannot be coherently controlled
    #[error("Cannot control channel with non-unitary operators: {0}")]
    ControlledChannel(String),

    /// An operation was given the wrong number of qudits
    #[error("Wrong number of qids for {gate}: expected {expected}, got {actual}")]
    WrongQidCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// An operation was given qudits of the wrong dimensions
    #[error("Wrong shape of qids for {gate}: expected {expected:?}, got {actual:?}")]
    WrongQidShape {
        gate: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The same qudit appears twice in one operation
    #[error("Duplicate qid {0} in operation")]
    DuplicateQid(Qid),

    /// A matrix does not fit the declared qid shape
    #[error("Matrix of shape {rows}x{cols} does not match qid shape {shape:?}")]
    MatrixShape {
        rows: usize,
        cols: usize,
        shape: Vec<usize>,
    },

    /// A decomposition does not reproduce the unitary it replaces
    #[error("Decomposition of {operation} deviates from its unitary by {error:e} (tolerance {tolerance:e})")]
    ToleranceViolation {
        operation: String,
        error: f64,
        tolerance: f64,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ControlError>;
