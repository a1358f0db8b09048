// src/quantum/diagram.rs
//! Wire symbols handed to circuit renderers

use serde::{Deserialize, Serialize};

use crate::quantum::exponent::Exponent;
use crate::quantum::qid::Qid;

/// Context a renderer passes when asking a gate for its symbols
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramArgs {
    /// The qudits the gate is drawn on, when the renderer knows them
    pub known_qudits: Option<Vec<Qid>>,
}

impl DiagramArgs {
    pub fn uninformed() -> Self {
        Self::default()
    }

    pub fn for_qudits(qudits: &[Qid]) -> Self {
        DiagramArgs {
            known_qudits: Some(qudits.to_vec()),
        }
    }

    /// Arguments restricted to the qudits after the first `skip`
    pub fn skip(&self, skip: usize) -> Self {
        DiagramArgs {
            known_qudits: self
                .known_qudits
                .as_ref()
                .map(|qs| qs.iter().skip(skip).copied().collect()),
        }
    }
}

/// One symbol per wire plus the exponent drawn next to the gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramInfo {
    pub wire_symbols: Vec<String>,
    pub exponent: Exponent,
    pub connected: bool,
    pub exponent_qudit_index: Option<usize>,
}

impl DiagramInfo {
    pub fn new<S: Into<String>>(wire_symbols: impl IntoIterator<Item = S>) -> Self {
        DiagramInfo {
            wire_symbols: wire_symbols.into_iter().map(Into::into).collect(),
            exponent: Exponent::Value(1.0),
            connected: true,
            exponent_qudit_index: None,
        }
    }

    pub fn with_exponent(mut self, exponent: Exponent) -> Self {
        self.exponent = exponent;
        self
    }
}
