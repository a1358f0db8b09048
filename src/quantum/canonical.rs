// src/quantum/canonical.rs
//! Canonical controlled forms of elementary gates
//!
//! Controlling one of these gates by a default qubit gives the next gate in
//! its chain: `X → CX → CCX` and `Z → CZ → CCZ`. The decomposition engine
//! prefers these forms over generic synthesis. New pairs are added to the
//! table, not to the engine.

use crate::quantum::gate::{PowGate, PowKind};

/// `(kind, kind controlled once more)`
pub static CANONICAL_CONTROLLED_FORMS: &[(PowKind, PowKind)] = &[
    (PowKind::X, PowKind::CX),
    (PowKind::CX, PowKind::CCX),
    (PowKind::Z, PowKind::CZ),
    (PowKind::CZ, PowKind::CCZ),
];

pub fn next_controlled_form(kind: PowKind) -> Option<PowKind> {
    CANONICAL_CONTROLLED_FORMS
        .iter()
        .find(|(from, _)| *from == kind)
        .map(|&(_, to)| to)
}

/// `gate` controlled by `num_controls` default qubits, as a single canonical
/// gate with the same exponent
///
/// Only gates without a global shift qualify: the canonical forms put the
/// shift's phase on the controls as well as the targets.
pub fn controlled_form(gate: &PowGate, num_controls: usize) -> Option<PowGate> {
    if gate.global_shift() != 0.0 {
        return None;
    }
    let kind = (0..num_controls).try_fold(gate.kind(), |kind, _| next_controlled_form(kind))?;
    Some(PowGate::new(kind).with_exponent(gate.exponent().clone()))
}
