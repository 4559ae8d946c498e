//! examples of usage of RustedCalculus
/// term parsing, derivatives, root finding, critical points and integrals
pub mod calculus_examples;
