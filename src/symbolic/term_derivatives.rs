//! # Term Derivatives Module
//!
//! Differentiation of pre-split term lists and formatting of derivative term lists.
//!
//! A parenthesised group expands: `-(x^2+3x)` is re-split inside, the minus sign is distributed
//! over `x^2` and `3x` and each of them is differentiated, so the group yields two derivative
//! terms. Unrecognized terms differentiate to `0` and vanish from the formatted text.
//!
//! # Examples
//! ```
//! use RustedCalculus::symbolic::term_derivatives::{differentiate_terms, format_derivative};
//! let terms = vec!["x^3".to_string(), "-3x".to_string()];
//! let derivative = differentiate_terms(&terms);
//! assert_eq!(format_derivative(&derivative), "3x^2 - 3");
//! ```
use crate::symbolic::term::Term;
use crate::symbolic::term_splitter::expand_terms;

/// Differentiates every term of a pre-split term-string list.
/// The output has one derivative term per shape-level term (groups expanded), zeros included.
pub fn differentiate_terms<S: AsRef<str>>(terms: &[S]) -> Vec<Term> {
    expand_terms(terms)
        .into_iter()
        .map(|(sign, body)| Term::classify(body).scaled(sign).derivative())
        .collect()
}

/// Differentiates a list of already classified terms
pub fn differentiate(terms: &[Term]) -> Vec<Term> {
    terms.iter().map(Term::derivative).collect()
}

/// Joins the non-zero, recognized terms as `a + b - c`; `0` when nothing is left
pub fn format_derivative(terms: &[Term]) -> String {
    join_terms(terms.iter().filter(|t| !t.is_unrecognized()))
}

// joins terms left to right with algebraic spacing, dropping zero terms
pub(crate) fn join_terms<'a, I>(terms: I) -> String
where
    I: IntoIterator<Item = &'a Term>,
{
    let mut text = String::new();
    for term in terms.into_iter().filter(|t| !t.is_zero()) {
        let rendered = term.to_string();
        if text.is_empty() {
            text = rendered;
        } else if let Some(positive) = rendered.strip_prefix('-') {
            text.push_str(" - ");
            text.push_str(positive);
        } else {
            text.push_str(" + ");
            text.push_str(&rendered);
        }
    }
    if text.is_empty() {
        "0".to_string()
    } else {
        text
    }
}
