//! Closed-form probability formulas with range validation
//!
//! Evaluation is pure: inputs are validated before any arithmetic, and a
//! failed validation never yields a result that could be recorded.

use thiserror::Error;

use super::models::{
    BayesInput, ConditionalInput, IntersectionInput, ProbabilityInput, UnionInput,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Probability must be within [0,1]: {field} = {value}")]
    Range { field: &'static str, value: f64 },

    #[error("{field} must not be 0")]
    DivisionByZero { field: &'static str },
}

/// Check that every field lies in the closed interval [0, 1].
///
/// Reports the first offending field in wire order. NaN is out of range.
pub fn validate(input: &ProbabilityInput) -> Result<(), FormulaError> {
    match input
        .fields()
        .into_iter()
        .find(|(_, value)| !(0.0..=1.0).contains(value))
    {
        Some((field, value)) => Err(FormulaError::Range { field, value }),
        None => Ok(()),
    }
}

/// Validate and compute the result for any operation
pub fn evaluate(input: &ProbabilityInput) -> Result<f64, FormulaError> {
    validate(input)?;

    match input {
        ProbabilityInput::Union(input) => Ok(union(input)),
        ProbabilityInput::IntersectionIndependent(input) => Ok(intersection_independent(input)),
        ProbabilityInput::Conditional(input) => conditional(input),
        ProbabilityInput::Bayes(input) => Ok(bayes(input)),
    }
}

/// P(A ∪ B) = P(A) + P(B) − P(A ∩ B), not clamped
fn union(input: &UnionInput) -> f64 {
    input.p_a + input.p_b - input.p_a_and_b
}

fn intersection_independent(input: &IntersectionInput) -> f64 {
    input.p_a * input.p_b
}

fn conditional(input: &ConditionalInput) -> Result<f64, FormulaError> {
    if input.p_b == 0.0 {
        return Err(FormulaError::DivisionByZero { field: "pB" });
    }
    Ok(input.p_a_and_b / input.p_b)
}

/// Posterior P(A | B). A zero evidence term yields 0 rather than an error.
fn bayes(input: &BayesInput) -> f64 {
    let numerator = input.p_b_given_a * input.p_a;
    let denominator = numerator + input.p_b_given_not_a * (1.0 - input.p_a);

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
