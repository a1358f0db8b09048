// src/quantum/control_values.rs
//! Conditions on control qudits
//!
//! A condition is either a product of sums (each qudit accepts a set of
//! values, and all qudits must accept) or a sum of products (a list of
//! complete assignments, any of which fires the gate). Both are kept in a
//! normalized form so equal conditions compare equal structurally, and
//! [`ControlValues`] compares across the two forms by accepted assignments.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};

/// Per-qudit accepted value sets, combined by conjunction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ProductOfSumsRepr")]
pub struct ProductOfSums {
    sets: Vec<Vec<usize>>,
}

/// Serialized form, normalized on the way in
#[derive(Deserialize)]
struct ProductOfSumsRepr {
    sets: Vec<Vec<usize>>,
}

impl From<ProductOfSumsRepr> for ProductOfSums {
    fn from(repr: ProductOfSumsRepr) -> Self {
        ProductOfSums::new(repr.sets)
    }
}

impl ProductOfSums {
    /// Build from per-qudit sets; each set is sorted and deduplicated
    pub fn new(sets: Vec<Vec<usize>>) -> Self {
        let sets = sets
            .into_iter()
            .map(|set| set.into_iter().collect::<BTreeSet<_>>().into_iter().collect())
            .collect();
        ProductOfSums { sets }
    }

    /// One accepted value per qudit
    pub fn from_values(values: &[usize]) -> Self {
        ProductOfSums {
            sets: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Every qudit accepts only its top basis state `dim - 1`
    pub fn default_for(shape: &[usize]) -> Self {
        ProductOfSums {
            sets: shape.iter().map(|&d| vec![d - 1]).collect(),
        }
    }

    pub fn sets(&self) -> &[Vec<usize>] {
        &self.sets
    }

    pub fn num_qudits(&self) -> usize {
        self.sets.len()
    }

    pub fn is_default_for(&self, shape: &[usize]) -> bool {
        self.sets.len() == shape.len()
            && self
                .sets
                .iter()
                .zip(shape)
                .all(|(set, &d)| set.len() == 1 && set[0] + 1 == d)
    }

    pub fn matches(&self, assignment: &[usize]) -> bool {
        assignment.len() == self.sets.len()
            && self
                .sets
                .iter()
                .zip(assignment)
                .all(|(set, v)| set.binary_search(v).is_ok())
    }

    /// The equivalent sum of products (Cartesian product of the sets)
    pub fn expand(&self) -> SumOfProducts {
        let mut conjunctions: Vec<Vec<usize>> = vec![Vec::new()];
        for set in &self.sets {
            conjunctions = conjunctions
                .into_iter()
                .flat_map(|prefix| {
                    set.iter().map(move |&v| {
                        let mut next = prefix.clone();
                        next.push(v);
                        next
                    })
                })
                .collect();
        }
        SumOfProducts::new(conjunctions)
    }

    /// Conjunction with conditions on further qudits, appended after these
    pub fn and(&self, other: &ProductOfSums) -> ProductOfSums {
        let mut sets = self.sets.clone();
        sets.extend(other.sets.iter().cloned());
        ProductOfSums { sets }
    }

    /// The condition with qudit `index` removed
    pub fn without(&self, index: usize) -> ProductOfSums {
        let mut sets = self.sets.clone();
        sets.remove(index);
        ProductOfSums { sets }
    }

    /// The condition with qudit `index` accepting `set` instead
    pub fn with_set(&self, index: usize, set: Vec<usize>) -> ProductOfSums {
        let mut sets = self.sets.clone();
        sets[index] = set;
        ProductOfSums::new(sets)
    }

    fn validate(&self, shape: &[usize]) -> Result<()> {
        for (qudit, (set, &dimension)) in self.sets.iter().zip(shape).enumerate() {
            if set.is_empty() {
                return Err(ControlError::EmptyControlSet(qudit));
            }
            if set.iter().any(|&v| v >= dimension) {
                return Err(ControlError::ValueOutOfRange {
                    qudit,
                    values: set.clone(),
                    dimension,
                });
            }
        }
        Ok(())
    }
}

/// Complete accepted assignments, combined by disjunction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SumOfProductsRepr")]
pub struct SumOfProducts {
    conjunctions: Vec<Vec<usize>>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct SumOfProductsRepr {
    conjunctions: Vec<Vec<usize>>,
    #[serde(default)]
    name: Option<String>,
}

impl From<SumOfProductsRepr> for SumOfProducts {
    fn from(repr: SumOfProductsRepr) -> Self {
        SumOfProducts {
            name: repr.name,
            ..SumOfProducts::new(repr.conjunctions)
        }
    }
}

impl SumOfProducts {
    /// Build from assignments; duplicates are dropped and order is normalized
    pub fn new(conjunctions: Vec<Vec<usize>>) -> Self {
        let conjunctions = conjunctions
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        SumOfProducts {
            conjunctions,
            name: None,
        }
    }

    /// Attach a display name, used only by string and diagram forms
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn conjunctions(&self) -> &[Vec<usize>] {
        &self.conjunctions
    }

    pub fn num_qudits(&self) -> usize {
        self.conjunctions.first().map_or(0, Vec::len)
    }

    pub fn matches(&self, assignment: &[usize]) -> bool {
        self.conjunctions
            .binary_search_by(|c| c.as_slice().cmp(assignment))
            .is_ok()
    }

    /// Values accepted at qudit `index` by at least one assignment
    pub fn values_at(&self, index: usize) -> Vec<usize> {
        self.conjunctions
            .iter()
            .map(|c| c[index])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The equivalent product of sums, when the assignments form one
    ///
    /// The assignments always lie inside the product of their per-qudit
    /// value sets, so equal cardinality means equal sets.
    pub fn factor(&self) -> Option<ProductOfSums> {
        if self.conjunctions.is_empty() {
            return None;
        }
        let sets: Vec<Vec<usize>> = (0..self.num_qudits()).map(|i| self.values_at(i)).collect();
        let size: usize = sets.iter().map(Vec::len).product();
        (size == self.conjunctions.len()).then(|| ProductOfSums { sets })
    }

    /// Conjunction with conditions on further qudits, appended after these
    pub fn and(&self, other: &SumOfProducts) -> SumOfProducts {
        let conjunctions = self
            .conjunctions
            .iter()
            .flat_map(|a| {
                other.conjunctions.iter().map(move |b| {
                    let mut joined = a.clone();
                    joined.extend_from_slice(b);
                    joined
                })
            })
            .collect();
        SumOfProducts::new(conjunctions)
    }

    fn validate(&self, shape: &[usize]) -> Result<()> {
        if self.conjunctions.is_empty() {
            return Err(ControlError::EmptySumOfProducts);
        }
        for conjunction in &self.conjunctions {
            if conjunction.len() != shape.len() {
                return Err(ControlError::RaggedAssignment {
                    assignment: conjunction.clone(),
                    expected: shape.len(),
                    actual: conjunction.len(),
                });
            }
            for (qudit, (&v, &dimension)) in conjunction.iter().zip(shape).enumerate() {
                if v >= dimension {
                    return Err(ControlError::ValueOutOfRange {
                        qudit,
                        values: vec![v],
                        dimension,
                    });
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for SumOfProducts {
    fn eq(&self, other: &Self) -> bool {
        self.conjunctions == other.conjunctions
    }
}

impl Eq for SumOfProducts {}

impl Hash for SumOfProducts {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.conjunctions.hash(state);
    }
}

/// A control condition in either representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ControlValues {
    ProductOfSums(ProductOfSums),
    SumOfProducts(SumOfProducts),
}

impl ControlValues {
    pub fn num_qudits(&self) -> usize {
        match self {
            ControlValues::ProductOfSums(pos) => pos.num_qudits(),
            ControlValues::SumOfProducts(sop) => sop.num_qudits(),
        }
    }

    /// Check the condition against the dimensions of its control qudits
    pub fn validate(&self, shape: &[usize]) -> Result<()> {
        match self {
            ControlValues::ProductOfSums(pos) => {
                if pos.num_qudits() != shape.len() {
                    return Err(ControlError::ShapeLengthMismatch {
                        expected: pos.num_qudits(),
                        actual: shape.len(),
                    });
                }
                pos.validate(shape)
            }
            // Length is checked per assignment so ragged input is reported as such
            ControlValues::SumOfProducts(sop) => sop.validate(shape),
        }
    }

    pub fn matches(&self, assignment: &[usize]) -> bool {
        match self {
            ControlValues::ProductOfSums(pos) => pos.matches(assignment),
            ControlValues::SumOfProducts(sop) => sop.matches(assignment),
        }
    }

    /// Every accepted assignment, in lexicographic order
    pub fn expand(&self) -> Vec<Vec<usize>> {
        match self {
            ControlValues::ProductOfSums(pos) => pos.expand().conjunctions,
            ControlValues::SumOfProducts(sop) => sop.conjunctions.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec<usize>> {
        self.expand().into_iter()
    }

    /// The product form, when the condition has one
    pub fn to_product_of_sums(&self) -> Option<ProductOfSums> {
        match self {
            ControlValues::ProductOfSums(pos) => Some(pos.clone()),
            ControlValues::SumOfProducts(sop) => sop.factor(),
        }
    }

    /// Prefer the product form whenever it exists
    pub fn canonical(&self) -> ControlValues {
        match self.to_product_of_sums() {
            Some(pos) => ControlValues::ProductOfSums(pos),
            None => self.clone(),
        }
    }

    /// Conjunction with a condition on further qudits, appended after these
    pub fn and(&self, other: &ControlValues) -> ControlValues {
        match (self, other) {
            (ControlValues::ProductOfSums(a), ControlValues::ProductOfSums(b)) => {
                ControlValues::ProductOfSums(a.and(b))
            }
            _ => ControlValues::SumOfProducts(self.as_sum_of_products().and(&other.as_sum_of_products())),
        }
    }

    pub fn is_default_for(&self, shape: &[usize]) -> bool {
        self.to_product_of_sums()
            .map_or(false, |pos| pos.is_default_for(shape))
    }

    /// One marker per control qudit for the circuit renderer
    pub fn diagram_symbols(&self, shape: &[usize]) -> Vec<String> {
        match self {
            ControlValues::ProductOfSums(pos) => pos
                .sets
                .iter()
                .zip(shape)
                .map(|(set, &d)| {
                    if set.len() == 1 && set[0] + 1 == d {
                        "@".to_string()
                    } else {
                        format!("({})", join(set, ","))
                    }
                })
                .collect(),
            ControlValues::SumOfProducts(sop) => {
                let n = sop.num_qudits();
                match &sop.name {
                    Some(name) => (0..n)
                        .map(|i| {
                            if i + 1 == n {
                                format!("@({})", name)
                            } else {
                                "@".to_string()
                            }
                        })
                        .collect(),
                    None => (0..n)
                        .map(|i| {
                            let column: Vec<usize> = sop.conjunctions.iter().map(|c| c[i]).collect();
                            format!("@({})", join(&column, ""))
                        })
                        .collect(),
                }
            }
        }
    }

    /// Name prefix of a gate controlled by this condition, e.g. `CC` or `C0C1`
    pub fn prefix(&self, shape: &[usize]) -> String {
        match self {
            ControlValues::ProductOfSums(pos) if pos.is_default_for(shape) => "C".repeat(pos.num_qudits()),
            ControlValues::ProductOfSums(pos) => pos
                .sets
                .iter()
                .map(|set| match set.as_slice() {
                    [v] => format!("C{}", v),
                    _ => format!("C({})", join(set, ",")),
                })
                .collect(),
            ControlValues::SumOfProducts(sop) => match &sop.name {
                Some(name) => format!("C_{}", name),
                None => format!(
                    "C_{}",
                    sop.conjunctions
                        .iter()
                        .map(|c| join(c, ""))
                        .collect::<Vec<_>>()
                        .join("_")
                ),
            },
        }
    }

    fn as_sum_of_products(&self) -> SumOfProducts {
        match self {
            ControlValues::ProductOfSums(pos) => pos.expand(),
            ControlValues::SumOfProducts(sop) => sop.clone(),
        }
    }
}

fn join(values: &[usize], separator: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

impl PartialEq for ControlValues {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ControlValues::ProductOfSums(a), ControlValues::ProductOfSums(b)) => a == b,
            _ => self.num_qudits() == other.num_qudits() && self.expand() == other.expand(),
        }
    }
}

impl Eq for ControlValues {}

/// Hashes the accepted assignments, so equal conditions in either form hash
/// alike
impl Hash for ControlValues {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expand().hash(state);
    }
}

impl From<ProductOfSums> for ControlValues {
    fn from(pos: ProductOfSums) -> Self {
        ControlValues::ProductOfSums(pos)
    }
}

impl From<SumOfProducts> for ControlValues {
    fn from(sop: SumOfProducts) -> Self {
        ControlValues::SumOfProducts(sop)
    }
}

/// One accepted value per control qudit
impl From<Vec<usize>> for ControlValues {
    fn from(values: Vec<usize>) -> Self {
        ControlValues::ProductOfSums(ProductOfSums::from_values(&values))
    }
}

/// One accepted set per control qudit
impl From<Vec<Vec<usize>>> for ControlValues {
    fn from(sets: Vec<Vec<usize>>) -> Self {
        ControlValues::ProductOfSums(ProductOfSums::new(sets))
    }
}
