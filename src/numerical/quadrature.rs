//! # Quadrature
//!
//! Composite rules for definite integrals of a function of one variable over a finite interval:
//! left/right/midpoint Riemann sums, the trapezoid rule, Simpson's rule and Gauss-Legendre
//! quadrature (via the `gauss-quad` crate).
//!
//! Every rule validates its input first (`n > 0`, finite `a < b`). Samples where the function is
//! undefined are skipped instead of poisoning the sum; the trapezoid and Simpson rules still need
//! finite values at both endpoints.
//!
//! # Examples
//! ```
//! use RustedCalculus::numerical::quadrature::{integrate, QuadMethod};
//! use RustedCalculus::symbolic::expression::Expression;
//! let f = Expression::parse("x^2");
//! let simpson = integrate(&f, 0.0, 1.0, 2, QuadMethod::Simpson).unwrap();
//! assert!((simpson - 1.0 / 3.0).abs() < 1e-12);
//! ```
use crate::numerical::root_finding::NonlinearFunction;
use gauss_quad::GaussLegendre;
use log::{debug, info};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum QuadMethod {
    #[strum(serialize = "left")]
    LeftRiemann,
    #[strum(serialize = "right")]
    RightRiemann,
    #[strum(serialize = "midpoint")]
    MidpointRiemann,
    #[strum(serialize = "trapezoid")]
    Trapezoid,
    #[strum(serialize = "simpson")]
    Simpson,
    #[strum(serialize = "gauss_legendre")]
    GaussLegendre,
}

impl QuadMethod {
    /// Get a description of the quadrature method
    pub fn description(&self) -> &'static str {
        match self {
            QuadMethod::LeftRiemann => "Riemann sum, left edge of every sub-interval",
            QuadMethod::RightRiemann => "Riemann sum, right edge of every sub-interval",
            QuadMethod::MidpointRiemann => "Riemann sum, midpoint of every sub-interval",
            QuadMethod::Trapezoid => "composite trapezoid rule",
            QuadMethod::Simpson => "composite Simpson rule (n rounded up to even)",
            QuadMethod::GaussLegendre => "Gauss-Legendre quadrature, n nodes",
        }
    }
}

/// Sampling point of a Riemann sum inside each sub-interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiemannRule {
    Left,
    Right,
    Midpoint,
}

impl RiemannRule {
    // position of the sample inside sub-interval i, in units of dx
    fn offset(&self, i: usize) -> f64 {
        match self {
            RiemannRule::Left => i as f64,
            RiemannRule::Right => (i + 1) as f64,
            RiemannRule::Midpoint => i as f64 + 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuadratureError {
    NonPositiveSubdivisions,
    InvalidInterval { a: f64, b: f64 },
    /// bound text that is not a finite number
    InvalidBound(String),
    NonFiniteEndpoint { x: f64 },
    /// the quadrature rule could not be built (e.g. Gauss-Legendre with fewer than 2 nodes)
    QuadratureSetup(String),
}

impl fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuadratureError::NonPositiveSubdivisions => {
                write!(f, "Number of subdivisions must be positive")
            }
            QuadratureError::InvalidInterval { a, b } => write!(
                f,
                "Lower limit must be finite and smaller than the upper limit, got [{}, {}]",
                a, b
            ),
            QuadratureError::InvalidBound(bound) => {
                write!(f, "Integration limit '{}' is not a valid number", bound)
            }
            QuadratureError::NonFiniteEndpoint { x } => {
                write!(f, "Function is not finite at the interval endpoint x = {}", x)
            }
            QuadratureError::QuadratureSetup(msg) => write!(f, "Quadrature setup failed: {}", msg),
        }
    }
}

impl std::error::Error for QuadratureError {}

/// Checks n > 0 and finite a < b
pub fn validate(a: f64, b: f64, n: usize) -> Result<(), QuadratureError> {
    if n == 0 {
        return Err(QuadratureError::NonPositiveSubdivisions);
    }
    if !a.is_finite() || !b.is_finite() || a >= b {
        return Err(QuadratureError::InvalidInterval { a, b });
    }
    Ok(())
}

/// Parses an integration limit typed as text
pub fn parse_bound(text: &str) -> Result<f64, QuadratureError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(QuadratureError::InvalidBound(text.to_string())),
    }
}

fn finite_endpoints<F: NonlinearFunction>(f: &F, a: f64, b: f64) -> Result<(f64, f64), QuadratureError> {
    let fa = f.evaluate(a);
    if !fa.is_finite() {
        return Err(QuadratureError::NonFiniteEndpoint { x: a });
    }
    let fb = f.evaluate(b);
    if !fb.is_finite() {
        return Err(QuadratureError::NonFiniteEndpoint { x: b });
    }
    Ok((fa, fb))
}

// sum of the finite samples f(a + i*h) for the given indices
fn finite_sum<F, I>(f: &F, a: f64, h: f64, indices: I) -> f64
where
    F: NonlinearFunction,
    I: Iterator<Item = usize>,
{
    indices
        .map(|i| f.evaluate(a + i as f64 * h))
        .filter(|v| v.is_finite())
        .sum()
}

/// Riemann sum with n sub-intervals; non-finite samples are left out
pub fn riemann<F: NonlinearFunction>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    rule: RiemannRule,
) -> Result<f64, QuadratureError> {
    validate(a, b, n)?;
    let dx = (b - a) / n as f64;
    let sum: f64 = (0..n)
        .map(|i| f.evaluate(a + rule.offset(i) * dx))
        .filter(|v| v.is_finite())
        .sum();
    Ok(sum * dx)
}

/// Trapezoid rule: weights 1/2 at the endpoints, 1 inside
pub fn trapezoid<F: NonlinearFunction>(f: &F, a: f64, b: f64, n: usize) -> Result<f64, QuadratureError> {
    validate(a, b, n)?;
    let dx = (b - a) / n as f64;
    let (fa, fb) = finite_endpoints(f, a, b)?;
    let interior = finite_sum(f, a, dx, 1..n);
    Ok(((fa + fb) / 2.0 + interior) * dx)
}

/// Simpson's rule; an odd n is increased by one
pub fn simpson<F: NonlinearFunction>(f: &F, a: f64, b: f64, n: usize) -> Result<f64, QuadratureError> {
    validate(a, b, n)?;
    let n = if n % 2 != 0 { n + 1 } else { n };
    let h = (b - a) / n as f64;
    let (fa, fb) = finite_endpoints(f, a, b)?;
    let odd = finite_sum(f, a, h, (1..n).step_by(2));
    let even = finite_sum(f, a, h, (2..n).step_by(2));
    Ok(h / 3.0 * (fa + fb + 4.0 * odd + 2.0 * even))
}

/// Gauss-Legendre quadrature with n nodes; non-finite samples count as 0
pub fn gauss_legendre<F: NonlinearFunction>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<f64, QuadratureError> {
    validate(a, b, n)?;
    let quad = GaussLegendre::new(n).map_err(|e| {
        QuadratureError::QuadratureSetup(format!(
            "Failed to create Gauss-Legendre quadrature: {:?}",
            e
        ))
    })?;
    let result = quad.integrate(a, b, |x| {
        let value = f.evaluate(x);
        if value.is_finite() { value } else { 0.0 }
    });
    Ok(result)
}

/// Integrates with the chosen method
pub fn integrate<F: NonlinearFunction>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    method: QuadMethod,
) -> Result<f64, QuadratureError> {
    let result = match method {
        QuadMethod::LeftRiemann => riemann(f, a, b, n, RiemannRule::Left),
        QuadMethod::RightRiemann => riemann(f, a, b, n, RiemannRule::Right),
        QuadMethod::MidpointRiemann => riemann(f, a, b, n, RiemannRule::Midpoint),
        QuadMethod::Trapezoid => trapezoid(f, a, b, n),
        QuadMethod::Simpson => simpson(f, a, b, n),
        QuadMethod::GaussLegendre => gauss_legendre(f, a, b, n),
    };
    debug!("{} of {} on [{}, {}], n = {}: {:?}", method, f.name(), a, b, n, result);
    result
}

/// Default integration settings of a task
#[derive(Debug, Clone)]
pub struct QuadratureConfig {
    pub subdivisions: usize,
    pub method: QuadMethod,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            subdivisions: 100,
            method: QuadMethod::Simpson,
        }
    }
}

/// [`integrate`] with the method and subdivisions taken from a config
pub fn integrate_with<F: NonlinearFunction>(
    f: &F,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
) -> Result<f64, QuadratureError> {
    integrate(f, a, b, config.subdivisions, config.method)
}

/// Results of several rules on the same integral
#[derive(Debug, Clone)]
pub struct IntegralSummary {
    pub a: f64,
    pub b: f64,
    pub n: usize,
    pub results: Vec<(QuadMethod, Result<f64, QuadratureError>)>,
}

impl IntegralSummary {
    pub fn get(&self, method: QuadMethod) -> Option<&Result<f64, QuadratureError>> {
        self.results
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, result)| result)
    }

    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["method", "value"]);
        for (method, result) in &self.results {
            let value = match result {
                Ok(value) => format!("{:.10}", value),
                Err(e) => format!("error: {}", e),
            };
            builder.push_record([method.to_string(), value]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// The five classic rules (Riemann left/right/midpoint, trapezoid, Simpson) on one integral.
/// Validation errors are returned directly; a rule failing on its own (non-finite endpoint)
/// is recorded in the summary.
pub fn integral_summary<F: NonlinearFunction>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<IntegralSummary, QuadratureError> {
    validate(a, b, n)?;
    let results = QuadMethod::iter()
        .filter(|m| *m != QuadMethod::GaussLegendre)
        .map(|method| (method, integrate(f, a, b, n, method)))
        .collect();
    let summary = IntegralSummary { a, b, n, results };
    info!(
        "\n integral of {} on [{}, {}], n = {} \n {}",
        f.name(),
        a,
        b,
        n,
        summary.to_table()
    );
    Ok(summary)
}
