// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::logger::{save_columns_to_csv, save_samples_to_csv};
use crate::Utils::task_parser::CalculusTask;
use crate::numerical::analysis_api::{
    GRAPH_MAX, GRAPH_MIN, GRAPH_STEPS, generate_graph_data, perform_derivative_analysis,
    perform_integral_analysis, perform_integral_analysis_from_text,
};
use crate::numerical::critical_points::{classify_critical_points, critical_points_table};
use crate::numerical::quadrature::{QuadMethod, integrate};
use crate::numerical::root_finding::{
    ClosureFunction, RootFindingConfig, RootSweeper, ScalarRootFinder, ZeroGuardPolicy, bisection,
};
use crate::symbolic::expression::{Expression, evaluate, evaluate_term};
use crate::symbolic::term_derivatives::{differentiate_terms, format_derivative};
use crate::symbolic::term_splitter::{normalize, split_terms};
use crate::symbolic::utils::linspace;
use log::{error, info};

#[allow(dead_code)]
pub fn calculus_examples(example: usize) {
    match example {
        0 => {
            // TERMS AS TEXT
            let input = "x^3 - 3x + 2e^x - (x^2 - sin(x))";
            let terms = split_terms(&normalize(input));
            println!("terms of {}: {:?}", input, terms);
            // single terms and whole expressions evaluate straight from text
            println!("3x^2 at x = 2: {}", evaluate_term("3x^2", 2.0));
            println!("f(1.5) = {}", evaluate(input, 1.5));
            // the group expands: its sign goes into every inner term
            let derivative = differentiate_terms(&terms);
            println!("f'(x) = {}", format_derivative(&derivative));
        }
        1 => {
            // EXPRESSION IN MEMORY
            let f = Expression::parse("x^4 - 2x^2 + 3cos(x) + e^(2x)");
            println!("f = {}", f);
            for order in 1..=4 {
                println!("f^({}) = {}", order, f.nth_derivative(order));
            }
            let func = f.lambdify1D();
            println!("f(0.5) = {}", func(0.5));
            // chain rule is not applied to e^(2x), so compare on a polynomial part only
            let g = Expression::parse("x^4 - 2x^2 + 3cos(x)");
            let (norm, ok) = g.compare_num1D(-2.0, 2.0, 100, 1e-6);
            println!("analytic vs numerical derivative: norm = {:e}, passed = {}", norm, ok);
        }
        2 => {
            // BISECTION AND SWEEP
            match bisection(|x| x * x - 2.0, 0.0, 2.0, 1e-12) {
                Ok(root) => println!("sqrt(2) = {}", root),
                Err(e) => error!("{}", e),
            }
            let cubic = ClosureFunction::new(|x| x * x * x - x - 1.0, "x^3 - x - 1".to_string());
            let solver = ScalarRootFinder::with_config(RootFindingConfig {
                tolerance: 1e-10,
                max_iterations: 200,
                verbose: true,
            });
            match solver.bisection(&cubic, 1.0, 2.0) {
                Ok(result) => println!("{:?}", result),
                Err(e) => error!("{}", e),
            }
            let f = Expression::parse("sin(x) - 0.5x");
            let mut sweeper = RootSweeper::new();
            sweeper.set_granularity(0.01);
            sweeper.set_zero_policy(ZeroGuardPolicy::Nudge);
            match sweeper.find_roots(&f, -5.0, 5.0) {
                Ok(roots) => println!("roots of {}: {:?}", f, roots),
                Err(e) => error!("{}", e),
            }
        }
        3 => {
            // DERIVATIVE ANALYSIS
            match perform_derivative_analysis("x^3 - 3x", -5.0, 5.0) {
                Ok(analysis) => println!("{}", analysis.report()),
                Err(e) => error!("{}", e),
            }
            // the same steps by hand
            let f = Expression::parse("x^4 - 4x^2");
            let first = f.diff();
            let second = first.diff();
            let mut sweeper = RootSweeper::new();
            sweeper.set_zero_policy(ZeroGuardPolicy::Nudge);
            match sweeper.find_roots(&first, -3.0, 3.0) {
                Ok(roots) => {
                    let points = classify_critical_points(&f, &roots, &second);
                    println!("{}", critical_points_table(&points));
                }
                Err(e) => error!("{}", e),
            }
        }
        4 => {
            // INTEGRALS
            match perform_integral_analysis("x^2", 0.0, 1.0, 10) {
                Ok(summary) => println!("{}", summary.to_table()),
                Err(e) => error!("{}", e),
            }
            match perform_integral_analysis_from_text("2e + x**3", "0", "1", "50") {
                Ok(summary) => println!("{}", summary.to_table()),
                Err(e) => error!("{}", e),
            }
            let f = Expression::parse("sin(x)");
            for n in [2, 4, 8, 16] {
                match integrate(&f, 0.0, std::f64::consts::PI, n, QuadMethod::GaussLegendre) {
                    Ok(value) => println!("Gauss-Legendre, {} nodes: {}", n, value),
                    Err(e) => error!("{}", e),
                }
            }
        }
        5 => {
            // STRICT PARSING
            for input in ["x^2 + 3x", "x^2 + ln(x)", "(x + 1"] {
                match Expression::parse_strict(input) {
                    Ok(f) => println!("{} -> {}", input, f),
                    Err(e) => println!("{} -> error: {}", input, e),
                }
            }
            let permissive = Expression::parse("x^2 + ln(x)");
            println!(
                "permissive parse evaluates {:?} as 0: f(2) = {}",
                permissive.unrecognized_terms(),
                permissive.eval(2.0)
            );
        }
        6 => {
            // SAMPLES FOR PLOTTING
            let data = generate_graph_data("x^3 - 3x", GRAPH_MIN, GRAPH_MAX, GRAPH_STEPS);
            println!("first samples: {:?}", &data[..3]);
            if let Err(e) = save_samples_to_csv("graph_data.csv", &data, "x", "f(x)") {
                error!("{}", e);
            }
            let f = Expression::parse("x^3 - 3x");
            let (df, d2f) = (f.diff(), f.nth_derivative(2));
            let x_mesh = linspace(-3.0, 3.0, 61);
            let columns: Vec<Vec<f64>> = [&f, &df, &d2f]
                .iter()
                .map(|e| x_mesh.iter().map(|&x| e.eval(x)).collect())
                .collect();
            let headers = vec!["f".to_string(), "df".to_string(), "d2f".to_string()];
            match save_columns_to_csv("calculus_example.csv", "x", &x_mesh, &headers, &columns) {
                Ok(()) => info!("saved calculus_example.csv"),
                Err(e) => error!("{}", e),
            }
        }
        7 => {
            // TASK DOCUMENT
            let document = "
                function
                  expression: x^4-2x^2
                derivative
                  start: -3 end: 3 zero_policy: nudge
                integral
                  a: -1 b: 1 n: 64 method: simpson, gauss_legendre
                logging
                  loglevel: info
            ";
            let task = match CalculusTask::from_str_document(document) {
                Ok(task) => task,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            if let Err(e) = task.init_logging() {
                error!("{}", e);
            }
            match task.run() {
                Ok(report) => println!("{}", report),
                Err(e) => error!("{}", e),
            }
        }
        _ => {
            println!("no example with number {}", example);
        }
    }
}
