#![allow(non_snake_case)]
use RustedCalculus::Examples::calculus_examples::calculus_examples;
use RustedCalculus::Utils::logger::init_logger;
use log::error;

fn main() {
    if let Err(e) = init_logger(Some("info"), false) {
        error!("{}", e);
    }
    // 0 - terms as text, 1 - Expression, 2 - roots, 3 - derivative analysis,
    // 4 - integrals, 5 - strict parsing, 6 - csv of samples, 7 - task document
    let example = 3;
    calculus_examples(example);
}
