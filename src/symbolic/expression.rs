//! # Expression Module
//!
//! An ordered list of signed [`Term`]s built once from text and never mutated afterwards.
//!
//! ## Purpose
//! - parse flat expression text (`"x^3 - 3x + 2e^x"`) in permissive or strict mode
//! - evaluate it at a point, or turn it into a closure (`lambdify1D`)
//! - differentiate it any number of times without going back to text: the derivative of an
//!   `Expression` is a new `Expression`, text is produced only by `Display`
//! - sample it on a grid and check the analytic derivative against central differences
//!
//! Parenthesised groups are flattened at parse time: the sign in front of the group is
//! distributed into every inner term, so `-(x^2-3x)` is stored as `-x^2` and `3x`.
//!
//! # Examples
//! ```
//! use RustedCalculus::symbolic::expression::Expression;
//! let f = Expression::parse("x^3 - 3x");
//! assert_eq!(f.eval(2.0), 2.0);
//! let df = f.diff();
//! assert_eq!(df.to_string(), "3x^2 - 3");
//! assert_eq!(df.diff().to_string(), "6x");
//! ```
//! String-level helpers work on text or pre-split term lists directly:
//! ```
//! use RustedCalculus::symbolic::expression::{evaluate, evaluate_term};
//! assert_eq!(evaluate_term("3x^2", 2.0), 12.0);
//! assert_eq!(evaluate("-(x^2-3x)+1", 1.0), 3.0);
//! ```

use crate::symbolic::term::{Term, TermParseError};
use crate::symbolic::term_derivatives::join_terms;
use crate::symbolic::term_splitter::{expand_terms, normalize, split_terms};
use crate::symbolic::utils::{brackets_balanced, linspace, norm, numerical_derivative};
use log::{debug, warn};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// What to do with terms that match no supported shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
pub enum ParseMode {
    /// unrecognized terms are kept and evaluate to 0
    #[default]
    #[strum(serialize = "permissive")]
    Permissive,
    /// an unrecognized term or unbalanced brackets is an error
    #[strum(serialize = "strict")]
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    /// Permissive parse: never fails, unrecognized terms evaluate to 0.
    /// Whitespace is removed before splitting.
    pub fn parse(input: &str) -> Expression {
        let normalized = normalize(input);
        let terms = split_terms(&normalized);
        let expression = Expression::from_term_strings(&terms);
        let unknown = expression.unrecognized_terms();
        if !unknown.is_empty() {
            debug!("terms evaluated as 0: {:?}", unknown);
        }
        expression
    }

    /// Strict parse: reports the first unrecognized term and unbalanced brackets
    pub fn parse_strict(input: &str) -> Result<Expression, TermParseError> {
        let normalized = normalize(input);
        if !brackets_balanced(&normalized) {
            return Err(TermParseError::UnbalancedBrackets(normalized));
        }
        let expression = Expression::from_term_strings(&split_terms(&normalized));
        if let Some((position, term)) = expression
            .terms
            .iter()
            .enumerate()
            .find(|(_, t)| t.is_unrecognized())
        {
            warn!("strict parse rejected '{}'", term);
            return Err(TermParseError::UnrecognizedTerm {
                term: term.to_string(),
                position,
            });
        }
        Ok(expression)
    }

    pub fn parse_with_mode(input: &str, mode: ParseMode) -> Result<Expression, TermParseError> {
        match mode {
            ParseMode::Permissive => Ok(Expression::parse(input)),
            ParseMode::Strict => Expression::parse_strict(input),
        }
    }

    /// Builds the expression from a pre-split term-string list, expanding groups
    pub fn from_term_strings<S: AsRef<str>>(terms: &[S]) -> Expression {
        let terms = expand_terms(terms)
            .into_iter()
            .map(|(sign, body)| Term::classify(body).scaled(sign))
            .collect();
        Expression { terms }
    }

    pub fn from_terms(terms: Vec<Term>) -> Expression {
        Expression { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// raw text of the terms that matched no shape
    pub fn unrecognized_terms(&self) -> Vec<String> {
        self.terms
            .iter()
            .filter(|t| t.is_unrecognized())
            .map(|t| t.to_string())
            .collect()
    }

    /// EVALUATION
    /// Sum of the signed term values. NaN from a single term (negative power at 0) is kept.
    pub fn eval(&self, x: f64) -> f64 {
        self.terms.iter().map(|t| t.eval(x)).sum()
    }

    /// The expression as a closure of one argument
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64 + '_> {
        Box::new(move |x| self.eval(x))
    }

    /// DIFFERENTIATION
    /// Derivative as a new expression; one derivative term per term, zeros included
    pub fn diff(&self) -> Expression {
        Expression {
            terms: self.terms.iter().map(Term::derivative).collect(),
        }
    }

    pub fn nth_derivative(&self, n: usize) -> Expression {
        let mut derivative = self.clone();
        for _ in 0..n {
            derivative = derivative.diff();
        }
        derivative
    }

    /// Samples the expression on `steps` evenly spaced points of [min, max]
    pub fn sample(&self, min: f64, max: f64, steps: usize) -> Vec<(f64, f64)> {
        linspace(min, max, steps)
            .into_iter()
            .map(|x| (x, self.eval(x)))
            .collect()
    }

    /// Compares the analytic derivative with central differences on a grid.
    /// Returns the norm of the difference and whether it is below `max_norm`.
    pub fn compare_num1D(
        &self,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> (f64, bool) {
        let grid = linspace(start, end, num_values);
        let analytical_derivative = self.diff();
        let analytical: Vec<f64> = grid.iter().map(|&x| analytical_derivative.eval(x)).collect();
        let numerical = numerical_derivative(|x| self.eval(x), &grid, 1e-6);
        let norm = norm(&numerical, &analytical);
        (norm, norm < max_norm)
    }
}

impl FromStr for Expression {
    type Err = TermParseError;

    /// strict parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse_strict(s)
    }
}

/// Prints the non-zero terms joined as `a + b - c`, `0` for an empty or all-zero expression
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", join_terms(self.terms.iter()))
    }
}

/// value of one sign-stripped term at x
pub fn evaluate_term(term: &str, x: f64) -> f64 {
    Term::classify(term).eval(x)
}

/// value of a pre-split term list at x
pub fn evaluate_terms<S: AsRef<str>>(terms: &[S], x: f64) -> f64 {
    expand_terms(terms)
        .into_iter()
        .map(|(sign, body)| sign * evaluate_term(body, x))
        .sum()
}

/// value of expression text at x
pub fn evaluate(expression: &str, x: f64) -> f64 {
    evaluate_terms(&split_terms(&normalize(expression)), x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_and_eval() {
        let f = Expression::parse("x^3 - 3x + 2e^x");
        assert_eq!(f.len(), 3);
        assert_relative_eq!(f.eval(0.0), 2.0);
        assert_relative_eq!(f.eval(1.0), 1.0 - 3.0 + 2.0 * 1.0_f64.exp());
    }

    #[test]
    fn test_group_sign_is_distributed() {
        // -(x - 2) at x = 5 is -3, not -(5) - 2
        assert_relative_eq!(evaluate("-(x-2)", 5.0), -3.0);
        assert_relative_eq!(evaluate("1-(x^2-3x)", 2.0), 3.0);
        assert_relative_eq!(evaluate("-(-(x))", 4.0), 4.0);
    }

    #[test]
    fn test_string_and_expression_agree() {
        for input in ["x^2-3x+1", "-(x^2-x)+sin(x)", "2e^(2x)-cos(x)+x^-1", "ln(x)+x"] {
            let f = Expression::parse(input);
            for x in [-2.0, -0.5, 0.7, 3.0] {
                assert_relative_eq!(f.eval(x), evaluate(input, x), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_sum_of_terms_equals_whole() {
        let input = "x^3-2x+(x^2-1)-e^x";
        let terms = split_terms(input);
        for x in [-1.5, 0.3, 2.0] {
            let by_terms: f64 = terms.iter().map(|t| evaluate_terms(&[t.as_str()], x)).sum();
            assert_relative_eq!(by_terms, evaluate(input, x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_negative_exponent_gives_nan() {
        let f = Expression::parse("x^-2+1");
        assert!(f.eval(0.0).is_nan());
        assert_relative_eq!(f.eval(1.0), 2.0);
    }

    #[test]
    fn test_derivatives_in_memory() {
        let f = Expression::parse("x^3-3x");
        assert_eq!(f.diff().to_string(), "3x^2 - 3");
        assert_eq!(f.nth_derivative(2).to_string(), "6x");
        assert_eq!(f.nth_derivative(3).to_string(), "6");
        assert_eq!(f.nth_derivative(4).to_string(), "0");
        // the original is untouched
        assert_eq!(f.to_string(), "x^3 - 3x");
    }

    #[test]
    fn test_trig_second_derivative() {
        let f = Expression::parse("2sin(x)+cos(x)");
        assert_eq!(f.diff().to_string(), "2cos(x) - sin(x)");
        assert_eq!(f.nth_derivative(2).to_string(), "-2sin(x) - cos(x)");
    }

    #[test]
    fn test_strict_mode() {
        assert!(Expression::parse_strict("x^2+3x").is_ok());
        assert_eq!(
            Expression::parse_strict("x^2+ln(x)"),
            Err(TermParseError::UnrecognizedTerm {
                term: "ln(x)".to_string(),
                position: 1
            })
        );
        assert!(matches!(
            Expression::parse_strict("(x+1"),
            Err(TermParseError::UnbalancedBrackets(_))
        ));
        assert!("x+tan(x)".parse::<Expression>().is_err());
        // permissive mode keeps going
        let f = Expression::parse("x^2+ln(x)");
        assert_eq!(f.unrecognized_terms(), vec!["ln(x)".to_string()]);
        assert_relative_eq!(f.eval(3.0), 9.0);
    }

    #[test]
    fn test_unrecognized_term_keeps_written_sign() {
        let f = Expression::parse("x-ln(x)");
        assert_eq!(f.to_string(), "x - ln(x)");
        assert_eq!(f.unrecognized_terms(), vec!["-ln(x)".to_string()]);
        assert_eq!(
            Expression::parse_strict("x-(2-ln(x))"),
            Err(TermParseError::UnrecognizedTerm {
                term: "ln(x)".to_string(),
                position: 2
            })
        );
        assert_eq!(
            Expression::parse_strict("x-ln(x)"),
            Err(TermParseError::UnrecognizedTerm {
                term: "-ln(x)".to_string(),
                position: 1
            })
        );
    }

    #[test]
    fn test_dangling_sign_is_not_a_term() {
        let f = Expression::parse_strict("x+-2").unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.to_string(), "x - 2");
        assert_relative_eq!(f.eval(5.0), 3.0);
        assert!(Expression::parse("+").is_empty());
    }

    #[test]
    fn test_parse_mode_from_str() {
        assert_eq!("strict".parse::<ParseMode>().unwrap(), ParseMode::Strict);
        assert_eq!(ParseMode::default(), ParseMode::Permissive);
    }

    #[test]
    fn test_compare_num1D() {
        let f = Expression::parse("x^3-3x+2e^x+sin(x)");
        let (norm, ok) = f.compare_num1D(-2.0, 2.0, 50, 1e-4);
        assert!(ok, "norm = {}", norm);
    }

    #[test]
    fn test_sample() {
        let samples = Expression::parse("x^2").sample(-1.0, 1.0, 3);
        assert_eq!(samples, vec![(-1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_lambdify() {
        let f = Expression::parse("2x+1");
        let func = f.lambdify1D();
        assert_relative_eq!(func(3.0), 7.0);
    }
}
