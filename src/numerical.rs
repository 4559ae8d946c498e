/// # Root finding
/// bisection on one interval and a sweep collecting all roots the bisection finds in the
/// sub-intervals of a larger interval
///# Example
/// ```
/// use RustedCalculus::numerical::root_finding::{RootSweeper, ZeroGuardPolicy};
/// use RustedCalculus::symbolic::expression::Expression;
/// let f = Expression::parse("x^2 - 2");
/// let mut sweeper = RootSweeper::new();
/// sweeper.set_granularity(0.05);
/// sweeper.set_zero_policy(ZeroGuardPolicy::Nudge);
/// let roots = sweeper.find_roots(&f, -3.0, 3.0).unwrap();
/// assert_eq!(roots.len(), 2);
/// ```
pub mod root_finding;
/// second-derivative test for critical points
pub mod critical_points;
/// Riemann sums, trapezoid, Simpson and Gauss-Legendre rules
pub mod quadrature;
/// text-in, report-out derivative and integral analysis
pub mod analysis_api;
