//! # Analysis API
//!
//! Entry points taking expression text and plain numbers, the way a calculator front end calls
//! the engine:
//! - [`perform_derivative_analysis`]: first and second derivative, critical points on an
//!   interval and their classification
//! - [`perform_integral_analysis`]: every classic quadrature rule on one integral
//! - [`generate_graph_data`]: samples of the function for plotting
//!
//! Input is validated before anything is computed and every failure is an [`AnalysisError`].
//!
//! # Examples
//! ```
//! use RustedCalculus::numerical::analysis_api::perform_derivative_analysis;
//! use RustedCalculus::numerical::critical_points::CriticalPointKind;
//! let analysis = perform_derivative_analysis("x^3 - 3x", -5.0, 5.0).unwrap();
//! assert_eq!(analysis.first_derivative_text(), "3x^2 - 3");
//! assert_eq!(analysis.second_derivative_text(), "6x");
//! assert_eq!(analysis.critical_points[0].kind, CriticalPointKind::Maximum);
//! ```
use crate::numerical::critical_points::{
    ClassifierConfig, CriticalPoint, classify_critical_points_with, critical_points_table,
};
use crate::numerical::quadrature::{IntegralSummary, QuadratureError, integral_summary, parse_bound};
use crate::numerical::root_finding::{
    RootFindingError, RootSweeper, SweepConfig, ZeroGuardPolicy,
};
use crate::symbolic::expression::{Expression, ParseMode};
use crate::symbolic::term::TermParseError;
use crate::symbolic::term_splitter::{normalize, split_terms};
use log::info;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const GRAPH_MIN: f64 = -10.0;
pub const GRAPH_MAX: f64 = 10.0;
pub const GRAPH_STEPS: usize = 200;

static BARE_EXPONENTIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d*\.?\d*)e$").expect("bare exponential pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    EmptyFunction,
    /// the text expands to no term at all, e.g. `()`
    NoTerms,
    InvalidInterval { start: f64, end: f64 },
    InvalidIntegrationInput(String),
    Parse(TermParseError),
    RootFinding(RootFindingError),
    Quadrature(QuadratureError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::EmptyFunction => write!(f, "The function must not be empty"),
            AnalysisError::NoTerms => {
                write!(f, "Could not interpret the function, check the syntax")
            }
            AnalysisError::InvalidInterval { start, end } => write!(
                f,
                "The interval start must be smaller than its end, got [{}, {}]",
                start, end
            ),
            AnalysisError::InvalidIntegrationInput(msg) => write!(
                f,
                "Integration limits and the number of intervals must be valid numbers: {}",
                msg
            ),
            AnalysisError::Parse(e) => write!(f, "{}", e),
            AnalysisError::RootFinding(e) => write!(f, "{}", e),
            AnalysisError::Quadrature(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<TermParseError> for AnalysisError {
    fn from(e: TermParseError) -> Self {
        AnalysisError::Parse(e)
    }
}

impl From<RootFindingError> for AnalysisError {
    fn from(e: RootFindingError) -> Self {
        AnalysisError::RootFinding(e)
    }
}

impl From<QuadratureError> for AnalysisError {
    fn from(e: QuadratureError) -> Self {
        AnalysisError::Quadrature(e)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub parse_mode: ParseMode,
    pub sweep: SweepConfig,
    pub classifier: ClassifierConfig,
}

/// The sweep nudges sub-interval endpoints lying on x = 0, so that critical points at the
/// origin of a symmetric interval are searched
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::default(),
            sweep: SweepConfig {
                zero_policy: ZeroGuardPolicy::Nudge,
                ..SweepConfig::default()
            },
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Everything the derivative analysis found
#[derive(Debug, Clone)]
pub struct DerivativeAnalysis {
    /// top-level terms of the normalized input
    pub terms: Vec<String>,
    pub function: Expression,
    pub first_derivative: Expression,
    pub second_derivative: Expression,
    pub critical_points: Vec<CriticalPoint>,
}

impl DerivativeAnalysis {
    pub fn first_derivative_text(&self) -> String {
        self.first_derivative.to_string()
    }

    pub fn second_derivative_text(&self) -> String {
        self.second_derivative.to_string()
    }

    /// Human readable report with the critical points as a table
    pub fn report(&self) -> String {
        let mut report = format!(
            "f(x)   = {}\nf'(x)  = {}\nf''(x) = {}\n",
            self.function, self.first_derivative, self.second_derivative
        );
        if self.critical_points.is_empty() {
            report.push_str("no critical points found\n");
        } else {
            report.push_str(&critical_points_table(&self.critical_points));
            report.push('\n');
        }
        report
    }
}

fn parse_function(function: &str, mode: ParseMode) -> Result<(Vec<String>, Expression), AnalysisError> {
    let normalized = normalize(function);
    if normalized.is_empty() {
        return Err(AnalysisError::EmptyFunction);
    }
    let terms = split_terms(&normalized);
    let expression = Expression::parse_with_mode(&normalized, mode)?;
    if expression.is_empty() {
        return Err(AnalysisError::NoTerms);
    }
    Ok((terms, expression))
}

/// Derivative analysis with the default configuration
pub fn perform_derivative_analysis(
    function: &str,
    start: f64,
    end: f64,
) -> Result<DerivativeAnalysis, AnalysisError> {
    perform_derivative_analysis_with(function, start, end, &AnalysisConfig::default())
}

/// Differentiates twice, sweeps f' for roots on [start, end] and classifies them with f''
pub fn perform_derivative_analysis_with(
    function: &str,
    start: f64,
    end: f64,
    config: &AnalysisConfig,
) -> Result<DerivativeAnalysis, AnalysisError> {
    let (terms, function) = parse_function(function, config.parse_mode)?;
    if !start.is_finite() || !end.is_finite() || start >= end {
        return Err(AnalysisError::InvalidInterval { start, end });
    }
    let first_derivative = function.diff();
    let second_derivative = first_derivative.diff();

    let sweeper = RootSweeper::with_config(config.sweep.clone());
    let roots = sweeper.find_roots(&first_derivative, start, end)?;
    let critical_points =
        classify_critical_points_with(&function, &roots, &second_derivative, &config.classifier);

    let analysis = DerivativeAnalysis {
        terms,
        function,
        first_derivative,
        second_derivative,
        critical_points,
    };
    info!("\n{}", analysis.report());
    Ok(analysis)
}

/// Rewrites spellings front ends produce: `**` for powers and a bare `e` for `e^x`
pub fn normalize_integrand(function: &str) -> String {
    let normalized = normalize(function).replace("**", "^");
    split_terms(&normalized)
        .iter()
        .map(|term| BARE_EXPONENTIAL.replace(term, "${1}e^x").into_owned())
        .collect()
}

/// All classic quadrature rules on one integral
pub fn perform_integral_analysis(
    function: &str,
    a: f64,
    b: f64,
    n: usize,
) -> Result<IntegralSummary, AnalysisError> {
    let (_, expression) = parse_function(&normalize_integrand(function), ParseMode::Permissive)?;
    if a.is_nan() || b.is_nan() || n == 0 {
        return Err(AnalysisError::InvalidIntegrationInput(format!(
            "a = {}, b = {}, n = {}",
            a, b, n
        )));
    }
    Ok(integral_summary(&expression, a, b, n)?)
}

/// Integral analysis with limits and subdivisions typed as text
pub fn perform_integral_analysis_from_text(
    function: &str,
    a: &str,
    b: &str,
    n: &str,
) -> Result<IntegralSummary, AnalysisError> {
    let a = parse_bound(a)?;
    let b = parse_bound(b)?;
    let n = n
        .trim()
        .parse::<usize>()
        .map_err(|_| AnalysisError::InvalidIntegrationInput(format!("n = '{}'", n)))?;
    perform_integral_analysis(function, a, b, n)
}

/// Evenly spaced samples of the function for plotting; empty for empty input
pub fn generate_graph_data(function: &str, min: f64, max: f64, steps: usize) -> Vec<(f64, f64)> {
    let normalized = normalize(function);
    if normalized.is_empty() {
        return Vec::new();
    }
    Expression::parse(&normalized).sample(min, max, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::critical_points::CriticalPointKind;
    use crate::numerical::quadrature::QuadMethod;
    use approx::assert_relative_eq;

    #[test]
    fn test_cubic_analysis() {
        let analysis = perform_derivative_analysis("x^3 - 3x", -5.0, 5.0).unwrap();
        assert_eq!(analysis.terms, vec!["x^3", "-3x"]);
        assert_eq!(analysis.first_derivative_text(), "3x^2 - 3");
        assert_eq!(analysis.second_derivative_text(), "6x");
        let points = &analysis.critical_points;
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].location, -1.0, epsilon = 1e-5);
        assert_eq!(points[0].kind, CriticalPointKind::Maximum);
        assert_relative_eq!(points[1].location, 1.0, epsilon = 1e-5);
        assert_eq!(points[1].kind, CriticalPointKind::Minimum);
        let report = analysis.report();
        assert!(report.contains("f'(x)  = 3x^2 - 3"));
        assert!(report.contains("local minimum"));
    }

    #[test]
    fn test_critical_point_at_origin_of_symmetric_interval() {
        for (start, end) in [(-5.0, 5.0), (-10.0, 10.0), (-1.0, 1.0)] {
            let analysis = perform_derivative_analysis("x^2", start, end).unwrap();
            let points = &analysis.critical_points;
            assert_eq!(points.len(), 1, "on [{}, {}]", start, end);
            assert_relative_eq!(points[0].location, 0.0, epsilon = 1e-6);
            assert_eq!(points[0].kind, CriticalPointKind::Minimum);
        }
        let analysis = perform_derivative_analysis("x^4-4x^2", -3.0, 3.0).unwrap();
        let kinds: Vec<_> = analysis.critical_points.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CriticalPointKind::Minimum,
                CriticalPointKind::Maximum,
                CriticalPointKind::Minimum
            ]
        );
        assert_relative_eq!(analysis.critical_points[1].location, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_group_analysis() {
        let analysis = perform_derivative_analysis("-(x^2-4x)", 0.5, 5.0).unwrap();
        assert_eq!(analysis.first_derivative_text(), "-2x + 4");
        assert_eq!(analysis.critical_points.len(), 1);
        assert_relative_eq!(analysis.critical_points[0].location, 2.0, epsilon = 1e-5);
        assert_eq!(
            analysis.critical_points[0].kind,
            CriticalPointKind::Maximum
        );
    }

    #[test]
    fn test_derivative_analysis_validation() {
        assert_eq!(
            perform_derivative_analysis("   ", 0.0, 1.0).unwrap_err(),
            AnalysisError::EmptyFunction
        );
        assert_eq!(
            perform_derivative_analysis("x^2", 1.0, 1.0).unwrap_err(),
            AnalysisError::InvalidInterval { start: 1.0, end: 1.0 }
        );
        assert_eq!(
            perform_derivative_analysis("()", 0.0, 1.0).unwrap_err(),
            AnalysisError::NoTerms
        );
    }

    #[test]
    fn test_strict_analysis_rejects_unknown_terms() {
        let config = AnalysisConfig {
            parse_mode: ParseMode::Strict,
            ..AnalysisConfig::default()
        };
        let result = perform_derivative_analysis_with("x^2+tan(x)", -1.0, 1.0, &config);
        assert!(matches!(result, Err(AnalysisError::Parse(_))));
        // permissive mode ignores the unknown term
        let analysis = perform_derivative_analysis("x^2+tan(x)", 0.5, 1.0).unwrap();
        assert_eq!(analysis.first_derivative_text(), "2x");
    }

    #[test]
    fn test_integral_analysis() {
        let summary = perform_integral_analysis("x^2", 0.0, 1.0, 10).unwrap();
        let simpson = summary.get(QuadMethod::Simpson).unwrap().clone().unwrap();
        assert_relative_eq!(simpson, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integral_analysis_validation() {
        assert_eq!(
            perform_integral_analysis("", 0.0, 1.0, 10).unwrap_err(),
            AnalysisError::EmptyFunction
        );
        assert!(matches!(
            perform_integral_analysis("x", 0.0, 1.0, 0),
            Err(AnalysisError::InvalidIntegrationInput(_))
        ));
        assert!(matches!(
            perform_integral_analysis("x", 2.0, 1.0, 10),
            Err(AnalysisError::Quadrature(QuadratureError::InvalidInterval { .. }))
        ));
        assert!(matches!(
            perform_integral_analysis_from_text("x", "zero", "1", "10"),
            Err(AnalysisError::Quadrature(QuadratureError::InvalidBound(_)))
        ));
        assert!(matches!(
            perform_integral_analysis_from_text("x", "0", "1", "-3"),
            Err(AnalysisError::InvalidIntegrationInput(_))
        ));
    }

    #[test]
    fn test_integral_from_text() {
        let summary = perform_integral_analysis_from_text("2x", " 0", "1 ", "4").unwrap();
        let trapezoid = summary.get(QuadMethod::Trapezoid).unwrap().clone().unwrap();
        assert_relative_eq!(trapezoid, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_integrand() {
        assert_eq!(normalize_integrand("x**2 + e"), "x^2+e^x");
        assert_eq!(normalize_integrand("3e - 2e^x"), "3e^x-2e^x");
        assert_eq!(normalize_integrand("sin(x)"), "sin(x)");
    }

    #[test]
    fn test_graph_data() {
        let data = generate_graph_data("x^2", GRAPH_MIN, GRAPH_MAX, GRAPH_STEPS);
        assert_eq!(data.len(), 200);
        assert_eq!(data[0], (-10.0, 100.0));
        assert_relative_eq!(data[199].0, 10.0, epsilon = 1e-12);
        assert!(generate_graph_data("", GRAPH_MIN, GRAPH_MAX, GRAPH_STEPS).is_empty());
    }
}
