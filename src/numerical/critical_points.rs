//! Classification of critical points by the second-derivative test.
//!
//! Candidate points usually come from [`crate::numerical::root_finding::RootSweeper`] run on
//! the first derivative. Each candidate is checked against the original function (points where
//! it is undefined or huge are treated as discontinuities and dropped) and classified by the
//! sign of the second derivative.
use crate::numerical::root_finding::NonlinearFunction;
use log::{info, warn};
use strum_macros::{Display, EnumIter};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum CriticalPointKind {
    #[strum(to_string = "local minimum")]
    Minimum,
    #[strum(to_string = "local maximum")]
    Maximum,
    #[strum(to_string = "inflection or undetermined")]
    Inflection,
    /// the second derivative is undefined at the point
    #[strum(to_string = "inconclusive")]
    Inconclusive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPoint {
    pub location: f64,
    pub kind: CriticalPointKind,
    /// f(location)
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// |f(x)| above this marks a discontinuity
    pub magnitude_guard: f64,
    /// |f''(x)| below this gives an inflection point
    pub flat_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            magnitude_guard: 1e8,
            flat_threshold: 1e-6,
        }
    }
}

/// Classifies with the default thresholds
pub fn classify_critical_points<F, S>(
    function: &F,
    points: &[f64],
    second_derivative: &S,
) -> Vec<CriticalPoint>
where
    F: NonlinearFunction,
    S: NonlinearFunction,
{
    classify_critical_points_with(function, points, second_derivative, &ClassifierConfig::default())
}

pub fn classify_critical_points_with<F, S>(
    function: &F,
    points: &[f64],
    second_derivative: &S,
    config: &ClassifierConfig,
) -> Vec<CriticalPoint>
where
    F: NonlinearFunction,
    S: NonlinearFunction,
{
    let mut classified = Vec::with_capacity(points.len());
    for &x in points {
        let value = function.evaluate(x);
        if !value.is_finite() || value.abs() > config.magnitude_guard {
            warn!("x = {:.6} is a discontinuity or a problematic point", x);
            continue;
        }
        let curvature = second_derivative.evaluate(x);
        let kind = if !curvature.is_finite() {
            CriticalPointKind::Inconclusive
        } else if curvature.abs() < config.flat_threshold {
            CriticalPointKind::Inflection
        } else if curvature > 0.0 {
            CriticalPointKind::Minimum
        } else {
            CriticalPointKind::Maximum
        };
        info!("x = {:.6} ({}), f(x) = {:.6}", x, kind, value);
        classified.push(CriticalPoint {
            location: x,
            kind,
            value,
        });
    }
    classified
}

/// Report table: x, type, f(x)
pub fn critical_points_table(points: &[CriticalPoint]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["x", "type", "f(x)"]);
    for point in points {
        builder.push_record([
            format!("{:.6}", point.location),
            point.kind.to_string(),
            format!("{:.6}", point.value),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
