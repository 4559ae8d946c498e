/////////////////////////////TESTS////////////////////////////////////////////////////
/*
splitter, evaluator, differentiator and Expression working together:
closed-form values of every shape
derivative table
splitting is reversible
string path and in-memory path agree
group expansion
*/

#[cfg(test)]
mod tests {
    use crate::symbolic::expression::{Expression, evaluate, evaluate_term, evaluate_terms};
    use crate::symbolic::term::Term;
    use crate::symbolic::term_derivatives::{differentiate_terms, format_derivative};
    use crate::symbolic::term_splitter::{expand_terms, normalize, split_terms};
    use approx::assert_relative_eq;

    fn derive(input: &str) -> String {
        format_derivative(&differentiate_terms(&split_terms(&normalize(input))))
    }

    #[test]
    fn test_closed_form_values() {
        assert_relative_eq!(evaluate_term("3x^2", 2.0), 12.0);
        assert_relative_eq!(evaluate_term("2e^x", 0.0), 2.0);
        assert_relative_eq!(evaluate_term("sin(x)", 0.0), 0.0);
        assert_relative_eq!(evaluate_term("cos(x)", std::f64::consts::PI), -1.0);
        assert_relative_eq!(evaluate_term("4", 123.0), 4.0);
        assert_relative_eq!(evaluate_term("-x", 3.0), -3.0);
        assert_relative_eq!(evaluate_term("x^-2", 2.0), 0.25);
        assert_relative_eq!(evaluate_term("e^(-3x)", 1.0), (-3.0_f64).exp());
        // only a leading number scales the exponent
        assert_relative_eq!(evaluate_term("e^(-x)", 1.0), 1.0_f64.exp());
    }

    #[test]
    fn test_derivative_table() {
        let table = [
            ("x^3", "3x^2"),
            ("5", "0"),
            ("-2x", "-2"),
            ("2sin(x)", "2cos(x)"),
            ("cos(x)", "-sin(x)"),
            ("x^0", "0"),
            ("x^2", "2x"),
            ("x^0.5", "0.5x^-0.5"),
            ("e^x", "e^x"),
            ("3e^(2x)", "3e^(2x)"),
            ("-(x^2+3x)", "-2x - 3"),
            ("x^3 - 3x + 2e^x", "3x^2 - 3 + 2e^x"),
            ("tan(x)", "0"),
        ];
        for (input, expected) in table {
            assert_eq!(derive(input), expected, "d/dx {}", input);
        }
    }

    #[test]
    fn test_splitting_is_reversible() {
        for input in [
            "x^3 - 3x + 2e^x",
            "-(x^2 - 3x) + e^(-x)",
            "2sin(x)-cos(x)+x^-1",
            "((x+1)-(x-1))-5",
        ] {
            let normalized = normalize(input);
            assert_eq!(split_terms(&normalized).concat(), normalized);
        }
    }

    #[test]
    fn test_string_and_memory_paths_agree() {
        for input in [
            "x^3-3x+2e^x",
            "-(x^2-3x)+1",
            "2sin(x)+cos(x)-x^0.5",
            "-(2-(x-e^x))",
        ] {
            let expression = Expression::parse(input);
            let derivative_text = derive(input);
            assert_eq!(expression.diff().to_string(), derivative_text);
            for x in [0.25, 1.0, 2.5] {
                assert_relative_eq!(expression.eval(x), evaluate(input, x), epsilon = 1e-12);
                // the printed derivative parses back into the same function
                assert_relative_eq!(
                    expression.diff().eval(x),
                    evaluate(&derivative_text, x),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_group_of_k_terms_gives_k_derivatives() {
        let terms = split_terms("1+(x^2-x+sin(x))");
        assert_eq!(expand_terms(&terms).len(), 4);
        // 1 for the constant, 3 for the group
        assert_eq!(differentiate_terms(&terms).len(), 4);
        assert_eq!(Expression::from_term_strings(&terms).diff().len(), 4);
    }

    #[test]
    fn test_sum_of_terms_equals_whole() {
        let input = "x^4-2x^3+(3x-e^x)-cos(x)";
        let terms = split_terms(input);
        for x in [-2.0, -0.3, 0.8, 4.0] {
            let by_term: f64 = terms.iter().map(|t| evaluate_terms(&[t], x)).sum();
            assert_relative_eq!(by_term, evaluate_terms(&terms, x), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_negative_exponent_at_zero_is_nan() {
        assert!(evaluate("x^-1+3", 0.0).is_nan());
        assert!(Expression::parse("2x^-0.5").eval(0.0).is_nan());
    }

    #[test]
    fn test_differentiation_is_total() {
        for input in ["", "(", "x)", "+-", "x^", "e^", "()"] {
            let _ = derive(input);
            let _ = Expression::parse(input).nth_derivative(2).to_string();
        }
        assert_eq!(Term::classify("e^").derivative().to_string(), "e^x");
    }
}
