#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Term
/// the closed set of term shapes (polynomial, linear, exponential, constant, sin/cos, unrecognized):
/// 1) classifies a sign-stripped term string
/// 2) evaluates a term at a point
/// 3) differentiates a term and prints it back
///# Example
/// ```
/// use RustedCalculus::symbolic::term::Term;
/// let term = Term::classify("2sin(x)");
/// assert_eq!(term.derivative().to_string(), "2cos(x)");
/// ```
pub mod term;
///____________________________________________________________________________________________________________________________
/// splits flat expression text into signed terms at top-level '+' and '-', expands parenthesised groups
pub mod term_splitter;
///____________________________________________________________________________________________________________________________
/// derivative of a pre-split list of term strings and display of derivative term lists
///# Example
/// ```
/// use RustedCalculus::symbolic::term_splitter::split_terms;
/// use RustedCalculus::symbolic::term_derivatives::{differentiate_terms, format_derivative};
/// let terms = split_terms("x^3-3x+2e^x");
/// assert_eq!(format_derivative(&differentiate_terms(&terms)), "3x^2 - 3 + 2e^x");
/// ```
pub mod term_derivatives;
///____________________________________________________________________________________________________________________________
/// # Expression
/// an expression held in memory as an ordered list of terms
/// 1) parses text (permissive or strict)
/// 2) evaluates it, turns it into a closure
/// 3) differentiates it any number of times without going through text
/// 4) samples it on a grid and checks the derivative numerically
///# Example
/// ```
/// use RustedCalculus::symbolic::expression::Expression;
/// let f = Expression::parse("x^3 - 3x + 2e^x");
/// println!("f = {}, f' = {}, f'' = {}", f, f.diff(), f.nth_derivative(2));
/// let (norm, ok) = f.compare_num1D(-2.0, 2.0, 100, 1e-4);
/// println!("norm of analytic - numeric derivative: {}, {}", norm, ok);
/// ```
pub mod expression;
/// bracket matching, grid and numerical derivative helpers
pub mod utils;

mod term_engine_tests;
