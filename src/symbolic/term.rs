//! # Term Module
//!
//! One additive component of a flat single-variable expression, after its sign was extracted.
//!
//! ## Purpose
//!
//! Every string term handled by the crate ends up in exactly one of the shapes of the [`Term`]
//! enum. The shape is decided once, by [`Term::classify`], and numeric evaluation, the
//! derivative rule and display formatting are plain `match`es over the enum afterwards.
//!
//! ## Supported shapes
//! - **Polynomial**: `c*x^n`, `n` any real number (`x^-2`, `3x^0.5`)
//! - **Linear**: `c*x`
//! - **Exponential**: `c*e^x`, `c*e^(kx)` (constant factor of x), anything else after `e^`
//!   is kept as text and evaluated as plain `e^x`
//! - **Constant**: a bare number
//! - **Trigonometric**: `c*sin(x)`, `c*cos(x)`
//! - **Unrecognized**: anything else; evaluates to 0
//!
//! Coefficients are written directly in front of the variable, without `*`: `3x^2`, `-x`, `2.5e^x`.
//!
//! # Examples
//! ```
//! use RustedCalculus::symbolic::term::Term;
//! let term = Term::classify("3x^2");
//! assert_eq!(term, Term::Polynomial { coef: 3.0, exp: 2.0 });
//! assert_eq!(term.eval(2.0), 12.0);
//! assert_eq!(term.derivative().to_string(), "6x");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use strum_macros::Display;

static POLYNOMIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d*\.?\d*)x\^([+-]?\d+(?:\.\d+)?)$").expect("polynomial pattern")
});
static LINEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d*\.?\d*)x$").expect("linear pattern"));
static EXPONENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d*\.?\d*)e\^(?:\(([^()]*)\)|([+-]?[A-Za-z0-9.]*))$")
        .expect("exponential pattern")
});
static CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(?:\.\d+)?$").expect("constant pattern"));
static TRIGONOMETRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d*\.?\d*)(sin|cos)\(x\)$").expect("trigonometric pattern")
});
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)").expect("number pattern"));

/// Trigonometric function of a trig term
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum TrigKind {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
}

/// What stands after `e^` in an exponential term
#[derive(Clone, Debug, PartialEq)]
pub enum ExpArgument {
    /// bare variable: `e^x`, `e^(x)`, `e^`
    Var,
    /// argument starting with a number, used as a factor of x: `e^(2x)` is `e^(2*x)`
    Scaled { factor: f64, raw: String },
    /// any other argument; evaluated as plain `e^x`
    Other(String),
}

impl ExpArgument {
    fn from_raw(raw: &str) -> ExpArgument {
        if raw.is_empty() || raw == "x" {
            return ExpArgument::Var;
        }
        match leading_number(raw) {
            Some(factor) => ExpArgument::Scaled {
                factor,
                raw: raw.to_string(),
            },
            None => ExpArgument::Other(raw.to_string()),
        }
    }

    /// value of the exponent at x
    pub fn exponent_at(&self, x: f64) -> f64 {
        match self {
            ExpArgument::Var | ExpArgument::Other(_) => x,
            ExpArgument::Scaled { factor, .. } => factor * x,
        }
    }
}

/// Closed set of term shapes. The sign of a term is always folded into its coefficient.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    /// `coef * x^exp`
    Polynomial { coef: f64, exp: f64 },
    /// `coef * x`, kept apart from `Polynomial { exp: 1 }` for printing
    Linear { coef: f64 },
    /// `coef * e^(argument)`
    Exponential { coef: f64, argument: ExpArgument },
    /// bare number
    Constant { value: f64 },
    /// `coef * sin(x)` or `coef * cos(x)`
    Trig { kind: TrigKind, coef: f64 },
    /// text matching none of the shapes above
    Unrecognized { raw: String },
}

/// Parses the coefficient written in front of the variable.
/// Empty text and a lone `+` mean 1, a lone `-` means -1.
pub fn parse_coefficient(coef: &str) -> Option<f64> {
    match coef {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => coef.parse::<f64>().ok(),
    }
}

/// Reads the number a string starts with, ignoring the rest ("2x" -> 2.0)
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

impl Term {
    /// Classifies a sign-stripped, trimmed term. Shapes are tried from the most specific one:
    /// polynomial before linear (linear is the degenerate `x^1` case), then exponential,
    /// constant and trigonometric. Never fails: unknown text becomes `Term::Unrecognized`.
    pub fn classify(term: &str) -> Term {
        let term = term.trim();
        let unrecognized = || Term::Unrecognized {
            raw: term.to_string(),
        };

        if let Some(caps) = POLYNOMIAL.captures(term) {
            let coef = parse_coefficient(&caps[1]);
            let exp = caps[2].parse::<f64>().ok();
            return match (coef, exp) {
                (Some(coef), Some(exp)) => Term::Polynomial { coef, exp },
                _ => unrecognized(),
            };
        }
        if let Some(caps) = LINEAR.captures(term) {
            return match parse_coefficient(&caps[1]) {
                Some(coef) => Term::Linear { coef },
                None => unrecognized(),
            };
        }
        if let Some(caps) = EXPONENTIAL.captures(term) {
            let raw = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            return match parse_coefficient(&caps[1]) {
                Some(coef) => Term::Exponential {
                    coef,
                    argument: ExpArgument::from_raw(raw),
                },
                None => unrecognized(),
            };
        }
        if CONSTANT.is_match(term) {
            return match term.parse::<f64>() {
                Ok(value) => Term::Constant { value },
                Err(_) => unrecognized(),
            };
        }
        if let Some(caps) = TRIGONOMETRIC.captures(term) {
            let kind = if &caps[2] == "sin" {
                TrigKind::Sin
            } else {
                TrigKind::Cos
            };
            return match parse_coefficient(&caps[1]) {
                Some(coef) => Term::Trig { kind, coef },
                None => unrecognized(),
            };
        }
        unrecognized()
    }

    /// Numeric value of the term at x.
    /// A negative exponent at x = 0 gives NaN; unrecognized terms give 0.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Term::Polynomial { coef, exp } => {
                if *exp < 0.0 && x == 0.0 {
                    return f64::NAN;
                }
                coef * x.powf(*exp)
            }
            Term::Linear { coef } => coef * x,
            Term::Exponential { coef, argument } => coef * argument.exponent_at(x).exp(),
            Term::Constant { value } => *value,
            Term::Trig {
                kind: TrigKind::Sin,
                coef,
            } => coef * x.sin(),
            Term::Trig {
                kind: TrigKind::Cos,
                coef,
            } => coef * x.cos(),
            Term::Unrecognized { .. } => 0.0,
        }
    }

    /// Derivative of the term with respect to x.
    ///
    /// `c*e^(arg)` with an argument other than the bare variable is returned unchanged:
    /// the chain rule is not applied to exponential arguments.
    pub fn derivative(&self) -> Term {
        match self {
            Term::Constant { .. } | Term::Unrecognized { .. } => Term::Constant { value: 0.0 },
            Term::Linear { coef } => Term::Constant { value: *coef },
            Term::Polynomial { exp, .. } if *exp == 0.0 => Term::Constant { value: 0.0 },
            Term::Polynomial { coef, exp } => {
                let coef = coef * exp;
                let exp = exp - 1.0;
                if exp == 0.0 {
                    Term::Constant { value: coef }
                } else if exp == 1.0 {
                    Term::Linear { coef }
                } else {
                    Term::Polynomial { coef, exp }
                }
            }
            Term::Exponential { coef, argument } => Term::Exponential {
                coef: *coef,
                argument: argument.clone(),
            },
            Term::Trig {
                kind: TrigKind::Sin,
                coef,
            } => Term::Trig {
                kind: TrigKind::Cos,
                coef: *coef,
            },
            Term::Trig {
                kind: TrigKind::Cos,
                coef,
            } => Term::Trig {
                kind: TrigKind::Sin,
                coef: -coef,
            },
        }
    }

    /// Same shape with the coefficient multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Term {
        match self {
            Term::Polynomial { coef, exp } => Term::Polynomial {
                coef: coef * factor,
                exp: *exp,
            },
            Term::Linear { coef } => Term::Linear {
                coef: coef * factor,
            },
            Term::Exponential { coef, argument } => Term::Exponential {
                coef: coef * factor,
                argument: argument.clone(),
            },
            Term::Constant { value } => Term::Constant {
                value: value * factor,
            },
            Term::Trig { kind, coef } => Term::Trig {
                kind: *kind,
                coef: coef * factor,
            },
            // the value stays 0, only the written sign follows the factor
            Term::Unrecognized { raw } if factor < 0.0 => Term::Unrecognized {
                raw: match raw.strip_prefix('-') {
                    Some(positive) => positive.to_string(),
                    None => format!("-{}", raw),
                },
            },
            Term::Unrecognized { raw } => Term::Unrecognized { raw: raw.clone() },
        }
    }

    /// coefficient (or value, for constants)
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Term::Polynomial { coef, .. }
            | Term::Linear { coef }
            | Term::Exponential { coef, .. }
            | Term::Trig { coef, .. } => Some(*coef),
            Term::Constant { value } => Some(*value),
            Term::Unrecognized { .. } => None,
        }
    }

    /// true when the term is identically zero
    pub fn is_zero(&self) -> bool {
        self.coefficient() == Some(0.0)
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Term::Unrecognized { .. })
    }
}

/// prints a number without a trailing ".0" and never as "-0"
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

// coefficient in front of a variable: 1 and -1 are elided
fn coefficient_prefix(coef: f64) -> String {
    if coef == 1.0 {
        String::new()
    } else if coef == -1.0 {
        "-".to_string()
    } else {
        format_number(coef)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Polynomial { coef, exp } => write!(
                f,
                "{}x^{}",
                coefficient_prefix(*coef),
                format_number(*exp)
            ),
            Term::Linear { coef } => write!(f, "{}x", coefficient_prefix(*coef)),
            Term::Exponential { coef, argument } => match argument {
                ExpArgument::Var => write!(f, "{}e^x", coefficient_prefix(*coef)),
                ExpArgument::Scaled { raw, .. } | ExpArgument::Other(raw) => {
                    write!(f, "{}e^({})", coefficient_prefix(*coef), raw)
                }
            },
            Term::Constant { value } => write!(f, "{}", format_number(*value)),
            Term::Trig { kind, coef } => write!(f, "{}{}(x)", coefficient_prefix(*coef), kind),
            Term::Unrecognized { raw } => write!(f, "{}", raw),
        }
    }
}

/// Error raised by the strict parse mode
#[derive(Debug, Clone, PartialEq)]
pub enum TermParseError {
    /// the term at `position` (0-based, after group expansion) matches no supported shape
    UnrecognizedTerm { term: String, position: usize },
    /// parentheses do not pair up
    UnbalancedBrackets(String),
}

impl fmt::Display for TermParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TermParseError::UnrecognizedTerm { term, position } => {
                write!(f, "Unrecognized term '{}' at position {}", term, position)
            }
            TermParseError::UnbalancedBrackets(input) => {
                write!(f, "Unbalanced brackets in '{}'", input)
            }
        }
    }
}

impl std::error::Error for TermParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classify_polynomial() {
        assert_eq!(
            Term::classify("3x^2"),
            Term::Polynomial {
                coef: 3.0,
                exp: 2.0
            }
        );
        assert_eq!(
            Term::classify("x^-2"),
            Term::Polynomial {
                coef: 1.0,
                exp: -2.0
            }
        );
        assert_eq!(
            Term::classify("-0.5x^1.5"),
            Term::Polynomial {
                coef: -0.5,
                exp: 1.5
            }
        );
    }

    #[test]
    fn test_classify_linear_and_constant() {
        assert_eq!(Term::classify("x"), Term::Linear { coef: 1.0 });
        assert_eq!(Term::classify("-x"), Term::Linear { coef: -1.0 });
        assert_eq!(Term::classify("4.5x"), Term::Linear { coef: 4.5 });
        assert_eq!(Term::classify("7"), Term::Constant { value: 7.0 });
        assert_eq!(Term::classify("2.25"), Term::Constant { value: 2.25 });
    }

    #[test]
    fn test_classify_exponential_arguments() {
        assert_eq!(
            Term::classify("2e^x"),
            Term::Exponential {
                coef: 2.0,
                argument: ExpArgument::Var
            }
        );
        assert_eq!(
            Term::classify("e^(x)"),
            Term::Exponential {
                coef: 1.0,
                argument: ExpArgument::Var
            }
        );
        assert_eq!(
            Term::classify("e^(2x)"),
            Term::Exponential {
                coef: 1.0,
                argument: ExpArgument::Scaled {
                    factor: 2.0,
                    raw: "2x".to_string()
                }
            }
        );
        assert_eq!(
            Term::classify("3e^(y)"),
            Term::Exponential {
                coef: 3.0,
                argument: ExpArgument::Other("y".to_string())
            }
        );
    }

    #[test]
    fn test_classify_trig() {
        assert_eq!(
            Term::classify("sin(x)"),
            Term::Trig {
                kind: TrigKind::Sin,
                coef: 1.0
            }
        );
        assert_eq!(
            Term::classify("2cos(x)"),
            Term::Trig {
                kind: TrigKind::Cos,
                coef: 2.0
            }
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        for raw in ["ln(x)", "x*y", "tan(x)", ".x", "(x+1)^2", ""] {
            assert!(Term::classify(raw).is_unrecognized(), "{} should be unrecognized", raw);
        }
    }

    #[test]
    fn test_eval_shapes() {
        assert_relative_eq!(Term::classify("3x^2").eval(2.0), 12.0);
        assert_relative_eq!(Term::classify("2e^x").eval(0.0), 2.0);
        assert_relative_eq!(Term::classify("sin(x)").eval(0.0), 0.0);
        assert_relative_eq!(Term::classify("cos(x)").eval(0.0), 1.0);
        assert_relative_eq!(Term::classify("e^(2x)").eval(1.0), 2.0_f64.exp());
        assert_relative_eq!(Term::classify("e^(y)").eval(1.0), 1.0_f64.exp());
        assert_relative_eq!(Term::classify("x^0.5").eval(4.0), 2.0);
        assert_eq!(Term::classify("ln(x)").eval(3.0), 0.0);
    }

    #[test]
    fn test_negative_exponent_at_zero_is_nan() {
        assert!(Term::classify("x^-1").eval(0.0).is_nan());
        assert_relative_eq!(Term::classify("x^-1").eval(2.0), 0.5);
    }

    #[test]
    fn test_derivative_rules() {
        let d = |s: &str| Term::classify(s).derivative().to_string();
        assert_eq!(d("x^3"), "3x^2");
        assert_eq!(d("x^2"), "2x");
        assert_eq!(d("4x^1"), "4");
        assert_eq!(d("5x^0"), "0");
        assert_eq!(d("5"), "0");
        assert_eq!(d("-2x"), "-2");
        assert_eq!(d("2sin(x)"), "2cos(x)");
        assert_eq!(d("cos(x)"), "-sin(x)");
        assert_eq!(d("3e^x"), "3e^x");
        assert_eq!(d("e^(2x)"), "e^(2x)");
        assert_eq!(d("x^-1"), "-x^-2");
        assert_eq!(d("tan(x)"), "0");
    }

    #[test]
    fn test_scaled_and_display() {
        let term = Term::classify("sin(x)").scaled(-1.0);
        assert_eq!(term.to_string(), "-sin(x)");
        assert_eq!(Term::Constant { value: -0.0 }.to_string(), "0");
        assert_eq!(Term::Linear { coef: 0.5 }.to_string(), "0.5x");
        assert!(Term::Linear { coef: 0.0 }.is_zero());
    }

    #[test]
    fn test_scaled_unrecognized_keeps_sign() {
        let term = Term::classify("ln(x)").scaled(-1.0);
        assert_eq!(term.to_string(), "-ln(x)");
        assert_eq!(term.scaled(-1.0).to_string(), "ln(x)");
        assert_eq!(term.scaled(2.0).to_string(), "-ln(x)");
        assert_eq!(term.eval(2.0), 0.0);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("2x"), Some(2.0));
        assert_eq!(leading_number("-3.5x"), Some(-3.5));
        assert_eq!(leading_number("x"), None);
    }
}
