//! # Root finding
//!
//! Bisection on one bracketing interval and a sweep that partitions a larger interval into
//! sub-intervals and runs bisection wherever the samples change sign or come close to zero.
//!
//! The sweep is a bounded heuristic: two crossings inside one sub-interval cancel out, and
//! even-order roots are only found when a sample lands close enough to them. Finer granularity
//! finds more.
//!
//! # Examples
//! ```
//! use RustedCalculus::numerical::root_finding::{bisection, find_roots};
//! use RustedCalculus::symbolic::expression::Expression;
//! let root = bisection(|x| x - 2.0, 0.0, 5.0, 1e-8).unwrap();
//! assert!((root - 2.0).abs() < 1e-7);
//! let derivative = Expression::parse("x^3 - 3x").diff();
//! let roots = find_roots(&derivative, -5.0, 5.0).unwrap();
//! assert_eq!(roots.len(), 2);
//! ```
use crate::symbolic::expression::Expression;
use itertools::Itertools;
use log::{debug, info, warn};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Midpoint values above this magnitude abort a bisection
pub const DIVERGENCE_GUARD: f64 = 1e10;

/// Error types for root finding
#[derive(Debug, Clone, PartialEq)]
pub enum RootFindingError {
    /// empty interval (a == b) or non-finite bounds
    InvalidInterval,
    /// f(a) and f(b) have the same sign
    NoSignChange,
    /// f(a) or f(b) is NaN or infinite
    NonFiniteEndpoint,
    /// a midpoint value was non-finite or exceeded [`DIVERGENCE_GUARD`]
    DivergentMidpoint { x: f64 },
    InvalidInput(String),
}

impl fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootFindingError::InvalidInterval => write!(f, "Invalid interval for bisection method"),
            RootFindingError::NoSignChange => {
                write!(f, "Function does not change sign in the given interval")
            }
            RootFindingError::NonFiniteEndpoint => {
                write!(f, "Function is not finite at the interval endpoints")
            }
            RootFindingError::DivergentMidpoint { x } => {
                write!(f, "Function diverges at x = {}", x)
            }
            RootFindingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RootFindingError {}

//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////

/// Trait for representing an equation f(x) = 0
pub trait NonlinearFunction {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> f64;

    /// Get function name for debugging/logging
    fn name(&self) -> String {
        "unnamed_function".to_string()
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: String) -> Self {
        Self { func, name }
    }
}

impl<F> NonlinearFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl NonlinearFunction for Expression {
    fn evaluate(&self, x: f64) -> f64 {
        self.eval(x)
    }

    fn name(&self) -> String {
        self.to_string()
    }
}

impl<T: NonlinearFunction + ?Sized> NonlinearFunction for &T {
    fn evaluate(&self, x: f64) -> f64 {
        (**self).evaluate(x)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

///////////////////////////////////////////BISECTION///////////////////////////////////////////

/// Result structure for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingResult {
    pub root: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub converged: bool,
    pub method: String,
}

/// Configuration for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub verbose: bool,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
            verbose: false,
        }
    }
}

/// Bisection solver for one bracketing interval
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    /// Create a new ScalarRootFinder with default configuration
    pub fn new() -> Self {
        Self {
            config: RootFindingConfig::default(),
        }
    }

    /// Create a new ScalarRootFinder with custom configuration
    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    /// Set tolerance for convergence
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = tolerance;
    }

    /// Set maximum number of iterations
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.config.max_iterations = max_iterations;
    }

    /// Enable or disable per-iteration logging
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn config(&self) -> &RootFindingConfig {
        &self.config
    }

    /// Bisection method for finding roots.
    /// Requires finite f(a), f(b) of opposite signs (a zero at an endpoint counts).
    /// Stops when |f(c)| < tolerance, when the interval is no wider than the tolerance or after
    /// `max_iterations` halvings; in the last two cases the midpoint of the final interval is
    /// returned.
    pub fn bisection<F>(
        &self,
        function: &F,
        mut a: f64,
        mut b: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        if !a.is_finite() || !b.is_finite() || a == b {
            return Err(RootFindingError::InvalidInterval);
        }
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let tolerance = self.config.tolerance;

        let mut fa = function.evaluate(a);
        let fb = function.evaluate(b);
        if !fa.is_finite() || !fb.is_finite() {
            return Err(RootFindingError::NonFiniteEndpoint);
        }
        if fa * fb > 0.0 {
            return Err(RootFindingError::NoSignChange);
        }

        // Check if we already have a root at the endpoints
        if fa.abs() < tolerance {
            return Ok(Self::result(a, fa, 0, true));
        }
        if fb.abs() < tolerance {
            return Ok(Self::result(b, fb, 0, true));
        }

        if self.config.verbose {
            info!(
                "bisection for {} on [{}, {}], tolerance {}",
                function.name(),
                a,
                b,
                tolerance
            );
        }

        let mut iterations = 0;
        while (b - a) > tolerance && iterations < self.config.max_iterations {
            let c = (a + b) / 2.0;
            let fc = function.evaluate(c);
            if !fc.is_finite() || fc.abs() > DIVERGENCE_GUARD {
                debug!("bisection aborted: f({}) = {}", c, fc);
                return Err(RootFindingError::DivergentMidpoint { x: c });
            }
            if self.config.verbose {
                debug!(
                    "iteration {}: x = {:.10}, f(x) = {:.2e}, interval = [{:.6}, {:.6}]",
                    iterations + 1,
                    c,
                    fc,
                    a,
                    b
                );
            }
            if fc.abs() < tolerance {
                return Ok(Self::result(c, fc, iterations + 1, true));
            }
            // keep the half where the sign changes
            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
            iterations += 1;
        }

        let root = (a + b) / 2.0;
        let converged = (b - a) <= tolerance;
        if !converged {
            warn!(
                "bisection for {} stopped after {} iterations, interval width {:e}",
                function.name(),
                iterations,
                b - a
            );
        }
        Ok(Self::result(root, function.evaluate(root), iterations, converged))
    }

    fn result(root: f64, function_value: f64, iterations: usize, converged: bool) -> RootFindingResult {
        RootFindingResult {
            root,
            function_value,
            iterations,
            converged,
            method: "bisection".to_string(),
        }
    }
}

impl Default for ScalarRootFinder {
    fn default() -> Self {
        Self::new()
    }
}

/////////////////////////////////////////////SWEEP/////////////////////////////////////////////

/// What the sweep does with a sub-interval endpoint lying within `zero_guard` of x = 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum ZeroGuardPolicy {
    /// the sub-interval is not searched
    #[default]
    #[strum(serialize = "skip")]
    Skip,
    /// the endpoint is moved to +-zero_guard and the sub-interval is searched
    #[strum(serialize = "nudge")]
    Nudge,
}

/// Configuration of the root sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// width of a sub-interval
    pub granularity: f64,
    /// bisection tolerance, also the "near zero" threshold for samples
    pub tolerance: f64,
    pub max_iterations: usize,
    /// ranges wider than this get granularity max(granularity, range / target_subintervals)
    pub widen_above: f64,
    pub target_subintervals: usize,
    /// sweeps needing more sub-intervals than this are rejected as invalid input
    pub max_subintervals: usize,
    pub zero_guard: f64,
    pub zero_policy: ZeroGuardPolicy,
    /// samples above this magnitude mark the sub-interval as overflowing
    pub magnitude_guard: f64,
    /// accepted roots satisfy |f(root)| < acceptance
    pub acceptance: f64,
    /// roots closer than duplicate_factor * tolerance to an accepted root are duplicates
    pub duplicate_factor: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            granularity: 0.1,
            tolerance: 1e-6,
            max_iterations: 100,
            widen_above: 10.0,
            target_subintervals: 100,
            max_subintervals: 1_000_000,
            zero_guard: 1e-10,
            zero_policy: ZeroGuardPolicy::Skip,
            magnitude_guard: 1e8,
            acceptance: 1e-4,
            duplicate_factor: 100.0,
        }
    }
}

/// Partitions an interval and collects the roots bisection finds in each piece
#[derive(Debug, Clone, Default)]
pub struct RootSweeper {
    config: SweepConfig,
}

impl RootSweeper {
    pub fn new() -> Self {
        Self {
            config: SweepConfig::default(),
        }
    }

    pub fn with_config(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn set_granularity(&mut self, granularity: f64) {
        self.config.granularity = granularity;
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = tolerance;
    }

    pub fn set_zero_policy(&mut self, zero_policy: ZeroGuardPolicy) {
        self.config.zero_policy = zero_policy;
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Granularity actually used for [start, end]
    pub fn effective_granularity(&self, start: f64, end: f64) -> f64 {
        let range = end - start;
        if range > self.config.widen_above {
            self.config
                .granularity
                .max(range / self.config.target_subintervals as f64)
        } else {
            self.config.granularity
        }
    }

    /// Number of sub-intervals [start, end] is cut into (as f64, it may exceed usize)
    pub fn subinterval_count(&self, start: f64, end: f64) -> f64 {
        ((end - start) / self.effective_granularity(start, end)).ceil()
    }

    /// Sub-intervals `[start + k*g, min(start + (k+1)*g, end)]`, produced lazily
    pub fn subintervals(&self, start: f64, end: f64) -> impl Iterator<Item = (f64, f64)> {
        let granularity = self.effective_granularity(start, end);
        let count = self
            .subinterval_count(start, end)
            .min(self.config.max_subintervals as f64) as usize;
        (0..count)
            .map(move |k| {
                let lo = start + k as f64 * granularity;
                let hi = (start + (k + 1) as f64 * granularity).min(end);
                (lo, hi)
            })
            .filter(|(lo, hi)| lo < hi)
    }

    fn validate(&self, start: f64, end: f64) -> Result<(), RootFindingError> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(RootFindingError::InvalidInterval);
        }
        let c = &self.config;
        if !(c.granularity > 0.0) || !c.granularity.is_finite() {
            return Err(RootFindingError::InvalidInput(format!(
                "granularity must be positive, got {}",
                c.granularity
            )));
        }
        if !(c.tolerance > 0.0) {
            return Err(RootFindingError::InvalidInput(format!(
                "tolerance must be positive, got {}",
                c.tolerance
            )));
        }
        if c.target_subintervals == 0 {
            return Err(RootFindingError::InvalidInput(
                "target_subintervals must be positive".to_string(),
            ));
        }
        let count = self.subinterval_count(start, end);
        if !(count <= c.max_subintervals as f64) {
            return Err(RootFindingError::InvalidInput(format!(
                "granularity {} gives {:e} sub-intervals on [{}, {}], at most {} allowed",
                c.granularity, count, start, end, c.max_subintervals
            )));
        }
        Ok(())
    }

    // applies the zero guard to one endpoint, None means "do not search"
    fn guard_endpoint(&self, x: f64) -> Option<f64> {
        if x.abs() >= self.config.zero_guard {
            return Some(x);
        }
        match self.config.zero_policy {
            ZeroGuardPolicy::Skip => None,
            ZeroGuardPolicy::Nudge => Some(if x < 0.0 {
                -self.config.zero_guard
            } else {
                self.config.zero_guard
            }),
        }
    }

    /// All roots found in [start, end], sorted ascending and deduplicated
    pub fn find_roots<F>(&self, function: &F, start: f64, end: f64) -> Result<Vec<f64>, RootFindingError>
    where
        F: NonlinearFunction,
    {
        self.validate(start, end)?;
        let c = &self.config;
        let solver = ScalarRootFinder::with_config(RootFindingConfig {
            tolerance: c.tolerance,
            max_iterations: c.max_iterations,
            verbose: false,
        });
        let duplicate_tolerance = c.tolerance * c.duplicate_factor;
        let mut roots: Vec<f64> = Vec::new();

        for (lo, hi) in self.subintervals(start, end) {
            let (Some(lo), Some(hi)) = (self.guard_endpoint(lo), self.guard_endpoint(hi)) else {
                debug!("sub-interval [{}, {}] touches x = 0, skipped", lo, hi);
                continue;
            };
            let f_lo = function.evaluate(lo);
            let f_hi = function.evaluate(hi);
            if !f_lo.is_finite()
                || !f_hi.is_finite()
                || f_lo.abs() > c.magnitude_guard
                || f_hi.abs() > c.magnitude_guard
            {
                continue;
            }
            if f_lo * f_hi > 0.0 && f_lo.abs() >= c.tolerance && f_hi.abs() >= c.tolerance {
                continue;
            }
            let root = match solver.bisection(function, lo, hi) {
                Ok(result) => result.root,
                Err(e) => {
                    debug!("no root in [{}, {}]: {}", lo, hi, e);
                    continue;
                }
            };
            if root < start || root > end {
                continue;
            }
            let value = function.evaluate(root);
            if !value.is_finite() || value.abs() >= c.acceptance {
                debug!("rejected x = {}: f(x) = {:e}", root, value);
                continue;
            }
            if roots.iter().any(|r| (r - root).abs() < duplicate_tolerance) {
                continue;
            }
            roots.push(root);
        }

        roots.sort_by(|a, b| a.total_cmp(b));
        info!(
            "{} root(s) of {} on [{}, {}]: [{}]",
            roots.len(),
            function.name(),
            start,
            end,
            roots.iter().map(|r| format!("{:.6}", r)).join(", ")
        );
        Ok(roots)
    }
}

// Convenience functions for quick usage
pub fn bisection<F>(function: F, a: f64, b: f64, tolerance: f64) -> Result<f64, RootFindingError>
where
    F: Fn(f64) -> f64,
{
    let func = ClosureFunction::new(function, "bisection_function".to_string());
    let mut solver = ScalarRootFinder::new();
    solver.set_tolerance(tolerance);
    let result = solver.bisection(&func, a, b)?;
    Ok(result.root)
}

/// Sweep with the default configuration
pub fn find_roots<F>(function: &F, start: f64, end: f64) -> Result<Vec<f64>, RootFindingError>
where
    F: NonlinearFunction,
{
    RootSweeper::new().find_roots(function, start, end)
}
