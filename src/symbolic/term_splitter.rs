//! Splits a flat expression into signed additive terms.
//!
//! The splitter only looks at top-level `+` and `-`: anything inside parentheses stays in one
//! term, and a sign written right after `^` belongs to the exponent (`x^-2`). Concatenating the
//! pieces gives back the input exactly.
//!```
//! use RustedCalculus::symbolic::term_splitter::split_terms;
//! let terms = split_terms("x^3-3x+(2x-x^-2)");
//! assert_eq!(terms, vec!["x^3", "-3x", "+(2x-x^-2)"]);
//! assert_eq!(terms.concat(), "x^3-3x+(2x-x^-2)");
//!```
use crate::symbolic::utils::find_pair_to_this_bracket;

/// removes every whitespace character
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits at top-level `+`/`-` (depth 0, not the first character, not right after `^`).
/// Returns slices of the input; empty input gives an empty list.
pub fn split_term_slices(input: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    if input.is_empty() {
        return terms;
    }
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut previous: Option<char> = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' if i > 0 && depth == 0 && previous != Some('^') => {
                terms.push(&input[start..i]);
                start = i;
            }
            _ => {}
        }
        previous = Some(c);
    }
    terms.push(&input[start..]);
    terms
}

/// Owned version of [`split_term_slices`]
pub fn split_terms(input: &str) -> Vec<String> {
    split_term_slices(input)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Separates the leading sign of a term: `"-3x"` -> `(-1.0, "3x")`
pub fn strip_sign(term: &str) -> (f64, &str) {
    let term = term.trim();
    if let Some(rest) = term.strip_prefix('+') {
        (1.0, rest)
    } else if let Some(rest) = term.strip_prefix('-') {
        (-1.0, rest)
    } else {
        (1.0, term)
    }
}

/// Interior of a term wrapped in one pair of parentheses: `"(x+1)"` -> `Some("x+1")`.
/// `"(x+1)(x-1)"` is not wrapped in one pair and gives `None`.
pub fn group_interior(term: &str) -> Option<&str> {
    if term.len() < 2 || !term.starts_with('(') {
        return None;
    }
    match find_pair_to_this_bracket(term, 0) {
        Some(end) if end == term.len() - 1 => Some(&term[1..end]),
        _ => None,
    }
}

/// Expands one signed term into the signed shape-level terms it stands for.
/// Parenthesised groups are re-split with the same rule and the group sign is multiplied into
/// the sign of every inner term; groups inside groups recurse. A lone sign (`x+-2`) adds nothing.
pub fn signed_leaves<'a>(term: &'a str, sign: f64, leaves: &mut Vec<(f64, &'a str)>) {
    let (own_sign, body) = strip_sign(term);
    let sign = sign * own_sign;
    match group_interior(body) {
        Some(inner) => {
            for sub in split_term_slices(inner) {
                signed_leaves(sub, sign, leaves);
            }
        }
        None if body.is_empty() => {}
        None => leaves.push((sign, body)),
    }
}

/// [`signed_leaves`] over a whole pre-split term list
pub fn expand_terms<S: AsRef<str>>(terms: &[S]) -> Vec<(f64, &str)> {
    let mut leaves = Vec::new();
    for term in terms {
        signed_leaves(term.as_ref(), 1.0, &mut leaves);
    }
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        assert_eq!(split_terms("x^3-3x+2e^x"), vec!["x^3", "-3x", "+2e^x"]);
        assert_eq!(split_terms("-x+1"), vec!["-x", "+1"]);
        assert_eq!(split_terms("5"), vec!["5"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_terms("").is_empty());
    }

    #[test]
    fn test_split_keeps_exponent_sign() {
        assert_eq!(split_terms("x^-2+x^+3"), vec!["x^-2", "+x^+3"]);
        assert_eq!(split_terms("e^-x-1"), vec!["e^-x", "-1"]);
    }

    #[test]
    fn test_split_respects_brackets() {
        assert_eq!(
            split_terms("-(x^2-3x)+e^(-x)"),
            vec!["-(x^2-3x)", "+e^(-x)"]
        );
        assert_eq!(split_terms("((x+1)-2)+x"), vec!["((x+1)-2)", "+x"]);
    }

    #[test]
    fn test_split_is_reversible() {
        for input in [
            "x^3-3x+2e^x",
            "-(x^2-3x)+e^(-x)-5",
            "+x-x^-1.5+(2-(x+1))",
            "sin(x)-cos(x)",
            "x+-2",
            "(x+1",
        ] {
            assert_eq!(split_terms(input).concat(), input);
        }
    }

    #[test]
    fn test_unbalanced_does_not_panic() {
        let _ = split_terms("x)+(-(");
        let _ = split_terms("((((");
        let _ = group_interior("(x+1");
    }

    #[test]
    fn test_strip_sign() {
        assert_eq!(strip_sign("-3x"), (-1.0, "3x"));
        assert_eq!(strip_sign("+x"), (1.0, "x"));
        assert_eq!(strip_sign("x"), (1.0, "x"));
    }

    #[test]
    fn test_group_interior() {
        assert_eq!(group_interior("(x+1)"), Some("x+1"));
        assert_eq!(group_interior("((x))"), Some("(x)"));
        assert_eq!(group_interior("(x+1)(x-1)"), None);
        assert_eq!(group_interior("sin(x)"), None);
        assert_eq!(group_interior("()"), Some(""));
    }

    #[test]
    fn test_dangling_sign_adds_no_term() {
        assert_eq!(split_terms("x+-2"), vec!["x", "+", "-2"]);
        assert_eq!(expand_terms(&split_terms("x+-2")), vec![(1.0, "x"), (-1.0, "2")]);
        assert!(expand_terms(&["+", "-"]).is_empty());
    }

    #[test]
    fn test_signed_leaves_distribute_sign() {
        let leaves = expand_terms(&["x", "-(x^2-3x)", "+(-(2-x))"]);
        assert_eq!(
            leaves,
            vec![
                (1.0, "x"),
                (-1.0, "x^2"),
                (1.0, "3x"),
                (-1.0, "2"),
                (1.0, "x")
            ]
        );
    }
}
