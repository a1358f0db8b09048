// src/quantum/matrix.rs
//! Dense matrix helpers for mixed-dimension qudit registers
//!
//! Registers are big-endian: the first qudit is the most significant digit
//! of a basis index. A `[2, 3]` register maps `|1, 0⟩` to index 3.

use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// `e^{iπ x}`, the phase picked up by an exponent of `x` half-turns
pub fn phase(half_turns: f64) -> Complex64 {
    Complex64::new(0.0, PI * half_turns).exp()
}

/// Total Hilbert-space dimension of a register
pub fn dimension(shape: &[usize]) -> usize {
    shape.iter().product()
}

pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_diag(&Array1::from_elem(dim, Complex64::new(1.0, 0.0)))
}

/// Kronecker product `a ⊗ b`
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (n1, m1) = a.dim();
    let (n2, m2) = b.dim();
    let mut result = Array2::zeros((n1 * n2, m1 * m2));

    for i in 0..n1 {
        for j in 0..m1 {
            for k in 0..n2 {
                for l in 0..m2 {
                    result[[i * n2 + k, j * m2 + l]] = a[[i, j]] * b[[k, l]];
                }
            }
        }
    }

    result
}

/// Conjugate transpose
pub fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|x| x.conj())
}

/// Basis index → per-qudit values
pub fn digits(mut index: usize, shape: &[usize]) -> Vec<usize> {
    let mut result = vec![0; shape.len()];
    for (slot, &dim) in result.iter_mut().zip(shape).rev() {
        *slot = index % dim;
        index /= dim;
    }
    result
}

/// Per-qudit values → basis index
pub fn index_of(values: &[usize], shape: &[usize]) -> usize {
    values
        .iter()
        .zip(shape)
        .fold(0, |acc, (&value, &dim)| acc * dim + value)
}

/// Expand a unitary acting on `targets` (positions into `shape`, in the
/// order the unitary expects them) to the whole register
///
/// An empty target list embeds a 1x1 matrix as a scalar multiple of the
/// identity.
pub fn embed(gate: &Array2<Complex64>, targets: &[usize], shape: &[usize]) -> Array2<Complex64> {
    let dim = dimension(shape);
    let target_shape: Vec<usize> = targets.iter().map(|&t| shape[t]).collect();
    let mut result = Array2::zeros((dim, dim));

    for i in 0..dim {
        let row = digits(i, shape);
        let sub_i = index_of(
            &targets.iter().map(|&t| row[t]).collect::<Vec<_>>(),
            &target_shape,
        );
        let sub_dim = dimension(&target_shape);

        // Columns reachable from row i differ from it only on the targets
        for sub_j in 0..sub_dim {
            let entry = gate[[sub_i, sub_j]];
            if entry == Complex64::new(0.0, 0.0) {
                continue;
            }
            let mut col = row.clone();
            for (&t, value) in targets.iter().zip(digits(sub_j, &target_shape)) {
                col[t] = value;
            }
            result[[i, index_of(&col, shape)]] = entry;
        }
    }

    result
}

/// Largest entrywise distance between two matrices of equal shape
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

pub fn allclose(a: &Array2<Complex64>, b: &Array2<Complex64>, atol: f64) -> bool {
    max_abs_diff(a, b) <= atol
}
