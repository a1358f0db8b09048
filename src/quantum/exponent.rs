// src/quantum/exponent.rs
//! Numeric and symbolic gate parameters

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A gate parameter that is either a number or a scaled symbol
///
/// Symbols stay symbolic until a [`ParamResolver`] provides a value. Scaling
/// a symbol (as happens when a symbolic gate is raised to a power) keeps the
/// symbol and multiplies its coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exponent {
    /// A concrete value
    Value(f64),

    /// `scale * name`
    Symbol { name: String, scale: f64 },
}

impl Exponent {
    /// An unresolved symbol with unit coefficient
    pub fn symbol(name: impl Into<String>) -> Self {
        Exponent::Symbol {
            name: name.into(),
            scale: 1.0,
        }
    }

    /// The numeric value, if there is one
    pub fn value(&self) -> Option<f64> {
        match self {
            Exponent::Value(v) => Some(*v),
            Exponent::Symbol { .. } => None,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, Exponent::Symbol { .. })
    }

    /// Multiply by a constant factor
    pub fn scaled(&self, factor: f64) -> Exponent {
        match self {
            Exponent::Value(v) => Exponent::Value(v * factor),
            Exponent::Symbol { name, scale } => Exponent::Symbol {
                name: name.clone(),
                scale: scale * factor,
            },
        }
    }

    /// Substitute a value for the symbol when the resolver knows it
    pub fn resolve(&self, resolver: &ParamResolver) -> Exponent {
        match self {
            Exponent::Value(v) => Exponent::Value(*v),
            Exponent::Symbol { name, scale } => match resolver.get(name) {
                Some(v) => Exponent::Value(scale * v),
                None => self.clone(),
            },
        }
    }
}

impl From<f64> for Exponent {
    fn from(value: f64) -> Self {
        Exponent::Value(value)
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exponent::Value(v) => write!(f, "{}", v),
            Exponent::Symbol { name, scale } if *scale == 1.0 => write!(f, "{}", name),
            Exponent::Symbol { name, scale } => write!(f, "({}*{})", scale, name),
        }
    }
}

/// Maps symbol names to values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamResolver {
    values: HashMap<String, f64>,
}

impl ParamResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one binding
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ParamResolver {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        ParamResolver {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_keeps_symbol() {
        let a = Exponent::symbol("a").scaled(2.0);
        assert!(a.is_parameterized());
        assert_eq!(a.to_string(), "(2*a)");

        let resolved = a.resolve(&ParamResolver::new().with("a", 0.25));
        assert_eq!(resolved, Exponent::Value(0.5));
    }

    #[test]
    fn test_unknown_symbol_stays_symbolic() {
        let a = Exponent::symbol("a");
        let resolver: ParamResolver = vec![("b", 1.0)].into_iter().collect();
        assert_eq!(a.resolve(&resolver), a);
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(Exponent::Value(0.125).to_string(), "0.125");
        assert_eq!(Exponent::Value(-1.0).to_string(), "-1");
    }
}
