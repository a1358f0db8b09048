use std::any::Any;
use std::f64::consts::PI;

use ndarray::{array, Array2};
use num_complex::Complex64;
use rand::Rng;

use qudit_control::prelude::*;
use qudit_control::quantum::circuit::{decompose, decompose_once, decompose_with_config, verify_decomposition};
use qudit_control::quantum::gate::{same_gate, IdentityGate, PowKind};
use qudit_control::quantum::matrix;

/// X followed by Z, exposed only through its decomposition and unitary
#[derive(Debug, Clone, PartialEq)]
struct XThenZ;

impl QuantumGate for XThenZ {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2]
    }

    fn name(&self) -> String {
        "XThenZ".to_string()
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
        Some(PowGate::z().unitary()?.dot(&PowGate::x().unitary()?))
    }

    fn decompose(&self, qudits: &[Qid]) -> Option<Vec<Operation>> {
        Some(vec![PowGate::x().on(qudits).ok()?, PowGate::z().on(qudits).ok()?])
    }
}

/// Claims to be X but decomposes into Z
#[derive(Debug, Clone, PartialEq)]
struct WrongDecomposition;

impl QuantumGate for WrongDecomposition {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2]
    }

    fn name(&self) -> String {
        "Wrong".to_string()
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
        PowGate::x().unitary()
    }

    fn decompose(&self, qudits: &[Qid]) -> Option<Vec<Operation>> {
        Some(vec![PowGate::z().on(qudits).ok()?])
    }
}

/// Unitary but neither decomposable nor raisable to powers
#[derive(Debug, Clone, PartialEq)]
struct OpaqueGate;

impl QuantumGate for OpaqueGate {
    fn qid_shape(&self) -> Vec<usize> {
        vec![2]
    }

    fn name(&self) -> String {
        "Opaque".to_string()
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
        PowGate::h().unitary()
    }
}

fn qudits_for(gate: &dyn QuantumGate) -> Vec<Qid> {
    Qid::for_qid_shape(&gate.qid_shape())
}

fn op_for(gate: &ControlledGate) -> Operation {
    gate.on(&qudits_for(gate)).unwrap()
}

fn assert_faithful(gate: &ControlledGate) {
    let op = op_for(gate);
    if let Err(err) = verify_decomposition(&op, &DecompositionConfig::default()) {
        panic!("{}", err);
    }
}

/// The innermost gate of an operation, looking through controls
fn innermost(op: &Operation) -> &dyn QuantumGate {
    match op.gate().as_controlled() {
        Some(controlled) => controlled.sub_gate(),
        None => op.gate(),
    }
}

#[cfg(test)]
mod canonical_tests {
    use super::*;

    #[test]
    fn test_uses_canonical_version() {
        let cases = [
            (PowGate::x(), PowGate::cx()),
            (PowGate::cx(), PowGate::ccx()),
            (PowGate::z(), PowGate::cz()),
            (PowGate::cz(), PowGate::ccz()),
            (PowGate::x().with_exponent(0.5), PowGate::cx().with_exponent(0.5)),
            (PowGate::cz().with_exponent(0.25), PowGate::ccz().with_exponent(0.25)),
        ];
        for (sub, expected) in cases {
            let gate = sub.controlled().num_controls(1).build().unwrap();
            let qudits = qudits_for(&gate);
            let ops = decompose_once(&gate.on(&qudits).unwrap()).unwrap();
            assert_eq!(ops, vec![expected.on(&qudits).unwrap()], "{}", gate);
        }
    }

    #[test]
    fn test_two_default_controls_collapse() {
        let gate = PowGate::z().with_exponent(0.3).controlled().num_controls(2).build().unwrap();
        let qudits = qudits_for(&gate);
        let ops = decompose_once(&gate.on(&qudits).unwrap()).unwrap();
        assert_eq!(ops, vec![PowGate::ccz().with_exponent(0.3).on(&qudits).unwrap()]);
    }

    #[test]
    fn test_full_decomposition() {
        for sub in [PowGate::z(), PowGate::z().with_exponent(0.3)] {
            let gate = sub.controlled().num_controls(1).build().unwrap();
            let qudits = qudits_for(&gate);
            let expected = PowGate::cz().with_exponent(sub.exponent().clone());
            assert_eq!(decompose(&gate.on(&qudits).unwrap()), vec![expected.on(&qudits).unwrap()]);
        }
    }

    #[test]
    fn test_no_canonical_form_for_shifted_or_qudit_controls() {
        let shifted = PowGate::x().with_global_shift(0.5).controlled().build().unwrap();
        let ops = decompose_once(&op_for(&shifted)).unwrap();
        assert!(ops.iter().all(|op| op.gate().as_pow_gate().map_or(true, |g| g.kind() != PowKind::CX)));

        let qutrit = PowGate::x().controlled().control_qid_shape(vec![3]).build().unwrap();
        let ops = decompose(&op_for(&qutrit));
        assert!(ops.iter().all(|op| op.gate().as_pow_gate().is_none()));
    }
}

#[cfg(test)]
mod phase_tests {
    use super::*;

    #[test]
    fn test_phase_extracted_before_decomposition() {
        let shift = 0.123;
        for kind in [PowKind::X, PowKind::Y, PowKind::Z, PowKind::CZ] {
            let shifted = PowGate::new(kind).with_global_shift(shift).controlled().build().unwrap();
            let unshifted = PowGate::new(kind).controlled().build().unwrap();
            let qudits = qudits_for(&shifted);

            let shifted_op = shifted.on(&qudits).unwrap();
            let shifted_decomposition = decompose(&shifted_op);
            let unshifted_decomposition = decompose(&unshifted.on(&qudits).unwrap());

            // The standard decomposition plus a Z for the shift
            let (z_op, rest) = shifted_decomposition.split_last().unwrap();
            assert_eq!(rest, &unshifted_decomposition[..], "{:?}", kind);
            assert_eq!(z_op.qudits(), &qudits[..1]);
            let z = z_op.gate().as_pow_gate().unwrap();
            assert_eq!(z.kind(), PowKind::Z);
            assert!((z.exponent().value().unwrap() - shift).abs() < 1e-12);
            assert_eq!(z.global_shift(), 0.0);

            verify_decomposition(&shifted_op, &DecompositionConfig::default()).unwrap();
        }
    }

    #[test]
    fn test_phase_scales_with_exponent() {
        let gate = PowGate::x()
            .with_exponent(0.7)
            .with_global_shift(-0.5)
            .controlled()
            .build()
            .unwrap();
        let ops = decompose(&op_for(&gate));
        let z = ops.last().unwrap().gate().as_pow_gate().unwrap();
        assert!((z.exponent().value().unwrap() + 0.35).abs() < 1e-12);
        assert_faithful(&gate);
    }

    #[test]
    fn test_phase_on_first_control_is_controlled_by_the_rest() {
        let gate = PowGate::y().with_global_shift(0.25).controlled().num_controls(3).build().unwrap();
        let ops = decompose_once(&op_for(&gate)).unwrap();
        assert_eq!(ops.len(), 2);
        let phase = &ops[1];
        let qudits = qudits_for(&gate);
        assert_eq!(phase.qudits(), &[qudits[1], qudits[2], qudits[0]]);
        assert_faithful(&gate);
    }

    #[test]
    fn test_qutrit_phase_uses_top_level() {
        let gate = PowGate::x()
            .with_global_shift(0.3)
            .controlled()
            .control_qid_shape(vec![3])
            .build()
            .unwrap();
        let ops = decompose_once(&op_for(&gate)).unwrap();
        let phase = ops[1].gate().as_any().downcast_ref::<QuditPhaseGate>().unwrap();
        assert_eq!(phase.level(), 2);
        assert_eq!(phase.exponent(), &Exponent::Value(0.3));
        assert_faithful(&gate);
    }

    #[test]
    fn test_controlled_global_phase_matrix_gate_decomposes() {
        let cases: Vec<(usize, f64, Vec<usize>)> = vec![
            (1, PI / 4.0, vec![1]),
            (3, -PI / 2.0, vec![1, 1, 1]),
            (2, 0.0, vec![1, 1]),
            (2, PI / 5.0, vec![0, 0]),
            (3, PI, vec![1, 0, 1]),
            (4, -PI / 3.0, vec![0, 1, 1, 0]),
        ];
        for (num_controls, angle, values) in cases {
            let phase = Complex64::new(0.0, angle).exp();
            let sub = MatrixGate::new(array![[phase]]).unwrap();
            let gate = sub
                .controlled()
                .num_controls(num_controls)
                .control_values(values)
                .control_qid_shape(vec![2; num_controls])
                .build()
                .unwrap();

            let op = op_for(&gate);
            let decomposed = decompose(&op);
            assert!(
                !decomposed.iter().any(|op| innermost(op).as_any().is::<MatrixGate>()),
                "{}",
                gate
            );
            let replayed = QuantumCircuit::from_operations(decomposed)
                .unitary_on(op.qudits())
                .unwrap();
            assert!(matrix::allclose(&replayed, &gate.unitary().unwrap(), 1e-10), "{}", gate);
        }
    }

    #[test]
    fn test_controlled_global_phase_gate() {
        let gate = GlobalPhaseGate::new(0.4).controlled().num_controls(2).build().unwrap();
        let ops = decompose(&op_for(&gate));
        assert_eq!(ops.len(), 1);
        assert!(ops[0].gate().equals(&PowGate::cz().with_exponent(0.4)));
        assert_faithful(&gate);
    }
}

#[cfg(test)]
mod fidelity_tests {
    use super::*;

    #[test]
    fn test_default_control_chains() {
        let mut rng = rand::thread_rng();
        for num_controls in 1..=3 {
            let t: f64 = rng.gen_range(-1.0..1.0);
            let subs = [
                PowGate::x(),
                PowGate::z(),
                PowGate::x().with_exponent(t),
                PowGate::z().with_exponent(t),
                PowGate::y().with_exponent(t),
                PowGate::h(),
                PowGate::cz().with_exponent(t),
            ];
            for sub in subs {
                let gate = sub.controlled().num_controls(num_controls).build().unwrap();
                assert_faithful(&gate);
            }
        }
    }

    #[test]
    fn test_shifted_chains() {
        let mut rng = rand::thread_rng();
        for num_controls in 1..=3 {
            let t: f64 = rng.gen_range(-1.0..1.0);
            let s: f64 = rng.gen_range(-1.0..1.0);
            for kind in [PowKind::X, PowKind::Y, PowKind::H, PowKind::XX] {
                let gate = PowGate::new(kind)
                    .with_exponent(t)
                    .with_global_shift(s)
                    .controlled()
                    .num_controls(num_controls)
                    .build()
                    .unwrap();
                assert_faithful(&gate);
            }
        }
    }

    #[test]
    fn test_leaves_are_small() {
        let gate = PowGate::y().controlled().num_controls(3).build().unwrap();
        for op in decompose(&op_for(&gate)) {
            assert!(op.qudits().len() <= 3, "{}", op);
        }
    }

    #[test]
    fn test_non_default_values() {
        let cases = [
            PowGate::y().controlled().control_values(vec![0]).build().unwrap(),
            PowGate::x().with_exponent(0.5).controlled().control_values(vec![0, 1]).build().unwrap(),
            PowGate::z().controlled().control_values(vec![1, 0, 1]).build().unwrap(),
            PowGate::h().controlled().control_values(vec![vec![0, 1], vec![0]]).build().unwrap(),
        ];
        for gate in cases {
            assert_faithful(&gate);
        }
    }

    #[test]
    fn test_non_default_conjugation_order() {
        let gate = PowGate::y().controlled().control_values(vec![0]).build().unwrap();
        let ops = decompose_once(&op_for(&gate)).unwrap();
        assert_eq!(ops.len(), 3);
        assert!(ops[0].gate().equals(&PowGate::x()));
        assert!(ops[1].gate().equals(&PowGate::y().controlled().build().unwrap()));
        assert!(ops[2].gate().equals(&PowGate::x()));
    }

    #[test]
    fn test_sum_of_products() {
        let xor = SumOfProducts::new(vec![vec![0, 1], vec![1, 0]]).with_name("xor");
        let nand = SumOfProducts::new(vec![vec![0, 1], vec![1, 0], vec![1, 1]]);
        let cases = [
            PowGate::h().controlled().control_values(xor.clone()).build().unwrap(),
            PowGate::x().with_exponent(0.5).controlled().control_values(nand).build().unwrap(),
            PowGate::x().controlled().control_values(xor.clone()).build().unwrap().controlled().control_values(vec![0]).build().unwrap(),
            PowGate::y()
                .controlled()
                .control_values(SumOfProducts::new(vec![vec![0, 2], vec![1, 0]]))
                .control_qid_shape(vec![2, 3])
                .build()
                .unwrap(),
        ];
        for gate in cases {
            assert_faithful(&gate);
            for op in decompose(&op_for(&gate)) {
                if let Some(controlled) = op.gate().as_controlled() {
                    assert!(matches!(controlled.control_values(), ControlValues::ProductOfSums(_)), "{}", op);
                }
            }
        }
    }

    #[test]
    fn test_sum_of_products_branches_are_disjoint() {
        let xor = SumOfProducts::new(vec![vec![0, 1], vec![1, 0]]);
        let gate = PowGate::h().controlled().control_values(xor).build().unwrap();
        let ops = decompose_once(&op_for(&gate)).unwrap();
        assert_eq!(ops.len(), 2);
        let first = ops[0].gate().as_controlled().unwrap();
        let second = ops[1].gate().as_controlled().unwrap();
        assert_eq!(first.control_values(), &ControlValues::from(vec![0, 1]));
        assert_eq!(second.control_values(), &ControlValues::from(vec![1, 0]));
    }

    #[test]
    fn test_mixed_dimensions() {
        let cases = [
            PowGate::x().with_exponent(0.5).controlled().control_qid_shape(vec![3, 2]).build().unwrap(),
            PowGate::z()
                .with_exponent(0.3)
                .controlled()
                .control_values(vec![0])
                .control_qid_shape(vec![3])
                .build()
                .unwrap(),
            PowGate::y()
                .controlled()
                .control_values(vec![vec![0, 2], vec![1]])
                .control_qid_shape(vec![4, 2])
                .build()
                .unwrap(),
            QuditShiftGate::new(3, 1)
                .controlled()
                .control_values(vec![1, 0])
                .control_qid_shape(vec![2, 3])
                .build()
                .unwrap(),
        ];
        for gate in cases {
            assert_faithful(&gate);
        }
    }

    #[test]
    fn test_qudit_controls_relabel_with_shifts() {
        let gate = PowGate::y()
            .controlled()
            .control_values(vec![0])
            .control_qid_shape(vec![3])
            .build()
            .unwrap();
        let ops = decompose_once(&op_for(&gate)).unwrap();
        let relabel = ops[0].gate().as_any().downcast_ref::<QuditShiftGate>().unwrap();
        let restore = ops[2].gate().as_any().downcast_ref::<QuditShiftGate>().unwrap();
        assert_eq!(relabel.shift(), 2);
        assert_eq!(restore.shift(), 1);
    }

    #[test]
    fn test_sub_gate_decomposition_is_controlled() {
        let gate = XThenZ.controlled().build().unwrap();
        let qudits = qudits_for(&gate);
        let ops = decompose_once(&gate.on(&qudits).unwrap()).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(ops[0].gate().equals(&PowGate::x().controlled().build().unwrap()));
        assert!(ops[1].gate().equals(&PowGate::z().controlled().build().unwrap()));

        assert_eq!(
            decompose(&gate.on(&qudits).unwrap()),
            vec![PowGate::cx().on(&qudits).unwrap(), PowGate::cz().on(&qudits).unwrap()]
        );
        assert_faithful(&gate);
    }

    #[test]
    fn test_controlled_identity_vanishes() {
        let gate = IdentityGate::qubits(2).controlled().num_controls(2).build().unwrap();
        assert!(decompose(&op_for(&gate)).is_empty());
        assert_faithful(&gate);
    }
}

#[cfg(test)]
mod fallback_tests {
    use super::*;

    #[test]
    fn test_symbolic_exponent_has_no_decomposition() {
        let gate = PowGate::x().with_exponent(Exponent::symbol("t")).controlled().build().unwrap();
        let op = op_for(&gate);
        assert!(decompose_once(&op).is_none());
        assert_eq!(decompose(&op), vec![op.clone()]);
        assert!(gate.unitary().is_none());
        assert_eq!(gate, PowGate::x().with_exponent(Exponent::symbol("t")).controlled().build().unwrap());
    }

    #[test]
    fn test_opaque_sub_gate_is_a_leaf() {
        let gate = OpaqueGate.controlled().num_controls(2).build().unwrap();
        let op = op_for(&gate);
        assert!(decompose_once(&op).is_none());
        assert!(gate.unitary().is_some());
        verify_decomposition(&op, &DecompositionConfig::default()).unwrap();
    }

    #[test]
    fn test_too_many_disjuncts() {
        let nand = SumOfProducts::new(vec![vec![0, 1], vec![1, 0], vec![1, 1]]);
        let gate = PowGate::h().controlled().control_values(nand).build().unwrap();
        let op = op_for(&gate);

        let limited = DecompositionConfig::default().with_max_disjuncts(2);
        assert_eq!(decompose_with_config(&op, &limited), vec![op.clone()]);
        assert!(decompose(&op).len() > 1);
    }

    #[test]
    fn test_verification_reports_violations() {
        let op = WrongDecomposition.on(&Qid::range(1)).unwrap();
        let err = verify_decomposition(&op, &DecompositionConfig::default()).unwrap_err();
        assert!(matches!(err, ControlError::ToleranceViolation { .. }));

        // A loose enough tolerance accepts anything
        let loose = DecompositionConfig::default().with_atol(10.0);
        assert!(verify_decomposition(&op, &loose).is_ok());
    }
}
