// src/config.rs
//! Tuning knobs for the decomposition engine

use serde::{Deserialize, Serialize};

/// Settings that bound how far the decomposition engine will go
///
/// Missing fields fall back to [`DecompositionConfig::default`] when the
/// configuration is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Largest sum-of-products condition (in accepted assignments) that is
    /// split into branches. Larger conditions are left undecomposed.
    pub max_disjuncts: usize,

    /// Whether gates with several default controls may be reduced through
    /// square roots of the sub-gate.
    pub reduce_multi_controls: bool,

    /// Absolute tolerance used when checking a decomposition against the
    /// unitary it replaces.
    pub atol: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        DecompositionConfig {
            max_disjuncts: 64,
            reduce_multi_controls: true,
            atol: 1e-10,
        }
    }
}

impl DecompositionConfig {
    /// Configuration with a different disjunct limit
    pub fn with_max_disjuncts(mut self, max_disjuncts: usize) -> Self {
        self.max_disjuncts = max_disjuncts;
        self
    }

    /// Configuration with multi-control reduction switched on or off
    pub fn with_multi_control_reduction(mut self, enabled: bool) -> Self {
        self.reduce_multi_controls = enabled;
        self
    }

    /// Configuration with a different verification tolerance
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }
}
