// src/quantum/decompose.rs
//! Decomposition of controlled gates into simpler controlled operations
//!
//! [`decompose_controlled`] performs one rewriting step. The operations it
//! returns may themselves be controlled gates, which the caller decomposes
//! again (see [`crate::quantum::circuit::decompose`]). Every step is exact
//! including global phase:
//!
//! 1. Controls accepting every value of their qudit are dropped.
//! 2. Default qubit controls on an `X`/`Z` family gate collapse into one
//!    canonical gate (`CX`, `CCX`, `CZ`, `CCZ`).
//! 3. A sub-gate's global phase moves onto the first control as a phase gate.
//! 4. Single non-default control values are conjugated into the default one.
//! 5. Multi-valued and disjunctive conditions split into disjoint branches.
//! 6. A decomposable sub-gate has each of its operations controlled.
//! 7. Two or more controls reduce to fewer through a square root of the
//!    sub-gate.
//!
//! When nothing applies the result is `None` and the operation is a leaf.

use std::collections::BTreeMap;

use crate::config::DecompositionConfig;
use crate::quantum::canonical::controlled_form;
use crate::quantum::control_values::{ControlValues, ProductOfSums, SumOfProducts};
use crate::quantum::controlled_gate::ControlledGate;
use crate::quantum::gate::{PhaseSplit, PowGate, QuantumGate, QuditPhaseGate, QuditShiftGate};
use crate::quantum::qid::{Operation, Qid};

/// One decomposition step for `gate` applied to `qudits` (controls first)
pub fn decompose_controlled(
    gate: &ControlledGate,
    qudits: &[Qid],
    config: &DecompositionConfig,
) -> Option<Vec<Operation>> {
    if gate.validate_args(qudits).is_err() {
        tracing::warn!(gate = %gate, "qudits do not fit gate, not decomposing");
        return None;
    }
    if gate.is_parameterized() {
        tracing::debug!(gate = %gate, "parameterized gate has no decomposition");
        return None;
    }

    let (controls, targets) = qudits.split_at(gate.num_controls());
    let sub = gate.sub_gate();
    if controls.is_empty() {
        return sub.on(targets).ok().map(|op| vec![op]);
    }

    match gate.control_values().canonical() {
        ControlValues::ProductOfSums(pos) => decompose_product(sub, &pos, controls, targets, config),
        ControlValues::SumOfProducts(sop) => split_sum_of_products(sub, &sop, controls, targets, config),
    }
}

fn decompose_product(
    sub: &dyn QuantumGate,
    pos: &ProductOfSums,
    controls: &[Qid],
    targets: &[Qid],
    config: &DecompositionConfig,
) -> Option<Vec<Operation>> {
    let sets = pos.sets();

    let vacuous: Vec<usize> = (0..controls.len())
        .filter(|&i| sets[i].len() == controls[i].dimension)
        .collect();
    if !vacuous.is_empty() {
        tracing::debug!(count = vacuous.len(), "dropping controls that accept every value");
        let mut kept_controls = Vec::new();
        let mut kept_sets = Vec::new();
        for (i, (q, set)) in controls.iter().zip(sets).enumerate() {
            if !vacuous.contains(&i) {
                kept_controls.push(*q);
                kept_sets.push(set.clone());
            }
        }
        let op = controlled_op(sub, &kept_controls, ProductOfSums::new(kept_sets), targets)?;
        return Some(vec![op]);
    }

    let shape: Vec<usize> = controls.iter().map(|q| q.dimension).collect();
    let all_default = pos.is_default_for(&shape);

    if all_default && shape.iter().all(|&d| d == 2) {
        if let Some(form) = sub.as_pow_gate().and_then(|g| controlled_form(g, controls.len())) {
            tracing::debug!(gate = %form.name(), "using canonical controlled form");
            let qudits = concat(controls, targets);
            return form.on(&qudits).ok().map(|op| vec![op]);
        }
    }

    let first = controls[0];
    if sets[0] == [first.dimension - 1] {
        if let Some(split) = sub.split_global_phase() {
            return extract_phase(split, pos, controls, targets);
        }
    }

    let flips: Vec<(Qid, usize)> = controls
        .iter()
        .zip(sets)
        .filter(|(q, set)| set.len() == 1 && set[0] + 1 != q.dimension)
        .map(|(q, set)| (*q, set[0]))
        .collect();
    if !flips.is_empty() {
        return conjugate_to_default(sub, pos, &flips, controls, targets);
    }

    if let Some(index) = sets.iter().position(|set| set.len() > 1) {
        tracing::debug!(qudit = %controls[index], values = ?sets[index], "splitting multi-valued control");
        return sets[index]
            .iter()
            .map(|&v| controlled_op(sub, controls, pos.with_set(index, vec![v]), targets))
            .collect();
    }

    if let Some(ops) = sub.decompose(targets) {
        tracing::debug!(gate = %sub.name(), count = ops.len(), "controlling sub-gate decomposition");
        return ops
            .into_iter()
            .map(|op| {
                op.controlled_by(controls, pos.clone().into())
                    .map_err(|err| tracing::warn!(%err, "could not control decomposed operation"))
                    .ok()
            })
            .collect();
    }

    if config.reduce_multi_controls && controls.len() >= 2 {
        if let Some(ops) = reduce_controls(sub, pos, controls, targets) {
            return Some(ops);
        }
    }

    tracing::debug!(gate = %sub.name(), controls = controls.len(), "no decomposition available");
    None
}

/// `[controlled remainder, phase on the first control]`
///
/// The phase `e^{iπx}` applies exactly when the sub-gate would, so it sits on
/// the first control's accepted level and is controlled by the others.
fn extract_phase(
    split: PhaseSplit,
    pos: &ProductOfSums,
    controls: &[Qid],
    targets: &[Qid],
) -> Option<Vec<Operation>> {
    let first = controls[0];
    tracing::debug!(qudit = %first, exponent = split.exponent, "extracting global phase onto control");

    let mut ops = Vec::new();
    if let Some(remainder) = split.remainder {
        ops.push(controlled_op(remainder.as_ref(), controls, pos.clone(), targets)?);
    }

    let phase: Box<dyn QuantumGate> = if first.dimension == 2 {
        Box::new(PowGate::z().with_exponent(split.exponent))
    } else {
        Box::new(QuditPhaseGate::new(first.dimension, first.dimension - 1, split.exponent))
    };
    ops.push(controlled_op(phase.as_ref(), &controls[1..], pos.without(0), &[first])?);
    Some(ops)
}

/// Relabel each listed control so its accepted value becomes `dim - 1`
fn conjugate_to_default(
    sub: &dyn QuantumGate,
    pos: &ProductOfSums,
    flips: &[(Qid, usize)],
    controls: &[Qid],
    targets: &[Qid],
) -> Option<Vec<Operation>> {
    tracing::debug!(count = flips.len(), "conjugating non-default control values");

    let mut before = Vec::new();
    let mut after = Vec::new();
    for &(q, value) in flips {
        let (relabel, restore): (Box<dyn QuantumGate>, Box<dyn QuantumGate>) = if q.dimension == 2 {
            (Box::new(PowGate::x()), Box::new(PowGate::x()))
        } else {
            let shift = QuditShiftGate::new(q.dimension, q.dimension - 1 - value);
            let inverse = shift.inverted();
            (Box::new(shift), Box::new(inverse))
        };
        before.push(relabel.on(&[q]).ok()?);
        after.push(restore.on(&[q]).ok()?);
    }

    let mut relabeled = pos.clone();
    for (i, q) in controls.iter().enumerate() {
        if flips.iter().any(|(f, _)| f == q) {
            relabeled = relabeled.with_set(i, vec![q.dimension - 1]);
        }
    }

    let mut ops = before;
    ops.push(controlled_op(sub, controls, relabeled, targets)?);
    ops.extend(after);
    Some(ops)
}

/// Split a disjunction on the first qudit whose value varies
///
/// Branches accept disjoint sets of assignments, so applying them one after
/// another applies the sub-gate once on every accepted assignment. Each
/// branch has fewer assignments than its parent.
fn split_sum_of_products(
    sub: &dyn QuantumGate,
    sop: &SumOfProducts,
    controls: &[Qid],
    targets: &[Qid],
    config: &DecompositionConfig,
) -> Option<Vec<Operation>> {
    let disjuncts = sop.conjunctions().len();
    if disjuncts > config.max_disjuncts {
        tracing::warn!(
            disjuncts,
            max_disjuncts = config.max_disjuncts,
            "too many disjuncts to split"
        );
        return None;
    }

    let index = (0..controls.len()).find(|&i| sop.values_at(i).len() > 1)?;
    let mut branches: BTreeMap<usize, Vec<Vec<usize>>> = BTreeMap::new();
    for conjunction in sop.conjunctions() {
        branches
            .entry(conjunction[index])
            .or_default()
            .push(conjunction.clone());
    }
    tracing::debug!(qudit = %controls[index], branches = branches.len(), "splitting disjunctive control");

    branches
        .into_values()
        .map(|group| controlled_op(sub, controls, SumOfProducts::new(group), targets))
        .collect()
}

/// Use `V` with `V² = U` to control `U` by one control fewer
///
/// With `b` the last qubit control and `R` the rest, in time order:
/// `C_b(V)`, `C_R(X_b)`, `C_b(V†)`, `C_R(X_b)`, `C_R(V)`.
fn reduce_controls(
    sub: &dyn QuantumGate,
    pos: &ProductOfSums,
    controls: &[Qid],
    targets: &[Qid],
) -> Option<Vec<Operation>> {
    let pivot = controls.iter().rposition(|q| q.dimension == 2)?;
    let root = sub.pow(0.5)?;
    let root_inverse = sub.pow(-0.5)?;
    tracing::debug!(gate = %sub.name(), pivot = %controls[pivot], "reducing control count");

    let b = controls[pivot];
    let rest: Vec<Qid> = controls
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != pivot)
        .map(|(_, q)| *q)
        .collect();
    let rest_values = pos.without(pivot);
    let on_b = ProductOfSums::from_values(&[1]);
    let flip = PowGate::x();

    Some(vec![
        controlled_op(root.as_ref(), &[b], on_b.clone(), targets)?,
        controlled_op(&flip, &rest, rest_values.clone(), &[b])?,
        controlled_op(root_inverse.as_ref(), &[b], on_b, targets)?,
        controlled_op(&flip, &rest, rest_values.clone(), &[b])?,
        controlled_op(root.as_ref(), &rest, rest_values, targets)?,
    ])
}

/// `sub` on `targets`, controlled by `controls` when there are any
fn controlled_op(
    sub: &dyn QuantumGate,
    controls: &[Qid],
    values: impl Into<ControlValues>,
    targets: &[Qid],
) -> Option<Operation> {
    let op = sub
        .on(targets)
        .map_err(|err| tracing::warn!(%err, "could not apply gate"))
        .ok()?;
    if controls.is_empty() {
        return Some(op);
    }
    op.controlled_by(controls, values.into())
        .map_err(|err| tracing::warn!(%err, "could not control operation"))
        .ok()
}

fn concat(a: &[Qid], b: &[Qid]) -> Vec<Qid> {
    let mut result = a.to_vec();
    result.extend_from_slice(b);
    result
}
