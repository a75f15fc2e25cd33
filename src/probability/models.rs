//! Data models for probability computations and their audit records

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four supported probability computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Union,
    IntersectionIndependent,
    Conditional,
    Bayes,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Union,
        Operation::IntersectionIndependent,
        Operation::Conditional,
        Operation::Bayes,
    ];

    /// Label stored in the `operation` column of the audit log
    pub fn label(&self) -> &'static str {
        match self {
            Self::Union => "Union",
            Self::IntersectionIndependent => "Intersection independent",
            Self::Conditional => "Conditional",
            Self::Bayes => "Bayes",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.label() == label)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs for P(A ∪ B)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnionInput {
    #[serde(rename = "pA")]
    pub p_a: f64,
    #[serde(rename = "pB")]
    pub p_b: f64,
    #[serde(rename = "pAnB")]
    pub p_a_and_b: f64,
}

/// Inputs for P(A ∩ B) with A and B independent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionInput {
    #[serde(rename = "pA")]
    pub p_a: f64,
    #[serde(rename = "pB")]
    pub p_b: f64,
}

/// Inputs for P(A | B)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionalInput {
    #[serde(rename = "pAnB")]
    pub p_a_and_b: f64,
    #[serde(rename = "pB")]
    pub p_b: f64,
}

/// Inputs for Bayes' rule, P(A | B)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BayesInput {
    #[serde(rename = "pA")]
    pub p_a: f64,
    #[serde(rename = "pB_given_A")]
    pub p_b_given_a: f64,
    #[serde(rename = "pB_given_notA")]
    pub p_b_given_not_a: f64,
}

/// A request's input record, tagged by the operation it feeds.
///
/// Serializes untagged, so the stored snapshot is the flat object the client
/// sent (e.g. `{"pA":0.5,"pB":0.4,"pAnB":0.2}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProbabilityInput {
    Union(UnionInput),
    IntersectionIndependent(IntersectionInput),
    Conditional(ConditionalInput),
    Bayes(BayesInput),
}

impl ProbabilityInput {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Union(_) => Operation::Union,
            Self::IntersectionIndependent(_) => Operation::IntersectionIndependent,
            Self::Conditional(_) => Operation::Conditional,
            Self::Bayes(_) => Operation::Bayes,
        }
    }

    /// Named fields in the order they appear on the wire
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Self::Union(UnionInput { p_a, p_b, p_a_and_b }) => {
                vec![("pA", p_a), ("pB", p_b), ("pAnB", p_a_and_b)]
            }
            Self::IntersectionIndependent(IntersectionInput { p_a, p_b }) => {
                vec![("pA", p_a), ("pB", p_b)]
            }
            Self::Conditional(ConditionalInput { p_a_and_b, p_b }) => {
                vec![("pAnB", p_a_and_b), ("pB", p_b)]
            }
            Self::Bayes(BayesInput {
                p_a,
                p_b_given_a,
                p_b_given_not_a,
            }) => vec![
                ("pA", p_a),
                ("pB_given_A", p_b_given_a),
                ("pB_given_notA", p_b_given_not_a),
            ],
        }
    }
}

impl From<UnionInput> for ProbabilityInput {
    fn from(input: UnionInput) -> Self {
        Self::Union(input)
    }
}

impl From<IntersectionInput> for ProbabilityInput {
    fn from(input: IntersectionInput) -> Self {
        Self::IntersectionIndependent(input)
    }
}

impl From<ConditionalInput> for ProbabilityInput {
    fn from(input: ConditionalInput) -> Self {
        Self::Conditional(input)
    }
}

impl From<BayesInput> for ProbabilityInput {
    fn from(input: BayesInput) -> Self {
        Self::Bayes(input)
    }
}

/// An audit entry ready to be appended; the store assigns its id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub chapter: String,
    pub operation: String,
    pub input: String,
    pub result: String,
    pub created_at: String,
}

/// One row of the audit log, as returned by the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationRecord {
    pub id: i64,
    pub chapter: String,
    pub operation: String,
    pub input: String,
    pub result: String,
    pub created_at: String,
}

impl ComputationRecord {
    pub fn operation_kind(&self) -> Option<Operation> {
        Operation::from_label(&self.operation)
    }

    /// Parse the stored result snapshot back into a number
    pub fn result_value(&self) -> Option<f64> {
        serde_json::from_str(&self.result).ok()
    }

    pub fn input_value(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.input).ok()
    }
}
