//! Parses task documents shaped like
//! ```text
//! function
//!   expression: x^3-3x
//!   mode: permissive
//! derivative
//!   start: -5 end: 5
//! integral
//!   a: 0 b: 2 n: 100 method: simpson, trapezoid
//! logging
//!   loglevel: info
//! ```
//! into `HashMap<section, HashMap<key, Option<Vec<Value>>>>` and then into a typed
//! [`CalculusTask`]. Values of one key are separated by commas, pairs and sections by
//! whitespace, so an expression must be written without spaces. Lines starting with `//`, `#`,
//! `%` or `;` are comments.
use crate::Utils::logger::init_logger;
use crate::numerical::analysis_api::{
    AnalysisConfig, AnalysisError, DerivativeAnalysis, normalize_integrand,
    perform_derivative_analysis_with,
};
use crate::numerical::quadrature::{
    IntegralSummary, QuadMethod, QuadratureConfig, integral_summary, integrate_with, validate,
};
use crate::numerical::root_finding::SweepConfig;
use crate::symbolic::expression::{Expression, ParseMode};
use log::info;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// Value of a key, typed by what it parses as
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// integers and floats both read as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

//////////////////////////////////////////PARSERS/////////////////////////////////////////////

/// section titles and keys: a letter or '_' followed by word characters
pub(crate) fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    // a value runs until a comma, whitespace or ';'
    let raw = take_while1(|c: char| !matches!(c, ',' | ';') && !c.is_whitespace());
    map(raw, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator = delimited(space0, tag(","), space0);
    separated_list0(separator, parse_value).parse(input)
}

/// `key: v1, v2, ...`
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let (input, result) = separated_pair(parse_identifier, colon, parse_value_list).parse(input)?;
    Ok((input.trim_start(), result))
}

/// a title followed by one or more key-value pairs
pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, Vec<(String, Vec<Value>)>)> {
    let (input, _) = multispace0(input)?;
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, multispace0)).parse(input)?;
    Ok((input, (title, pairs)))
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !(trimmed.starts_with("//")
                || trimmed.starts_with('#')
                || trimmed.starts_with('%')
                || trimmed.starts_with(';')
                || trimmed.is_empty())
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document. Fails if anything is left unparsed.
pub fn parse_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    let (remaining, sections) = many1(parse_section)
        .parse(filtered.as_str())
        .map_err(|e| format!("Parsing error: {:?}", e))?;
    if !remaining.trim().is_empty() {
        return Err(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining.trim()
        ));
    }
    let mut document = DocumentMap::new();
    for (title, pairs) in sections {
        let section = document.entry(title).or_default();
        for (key, values) in pairs {
            section.insert(key, Some(values));
        }
    }
    Ok(document)
}

/// Like [`parse_document`], then every section and key of the template that is missing is
/// added with `None`
pub fn parse_document_with_template(input: &str, template: &DocumentMap) -> Result<DocumentMap, String> {
    let mut parsed = parse_document(input)?;
    for (title, keys) in template {
        let section = parsed.entry(title.clone()).or_default();
        for key in keys.keys() {
            section.entry(key.clone()).or_insert(None);
        }
    }
    Ok(parsed)
}

///////////////////////////////////////TYPED TASK/////////////////////////////////////////////

const SECTION_KEYS: [(&str, &[&str]); 4] = [
    ("function", &["expression", "mode"]),
    ("derivative", &["start", "end", "granularity", "tolerance", "zero_policy"]),
    ("integral", &["a", "b", "n", "method"]),
    ("logging", &["loglevel", "to_file"]),
];

/// Every section and key a task document may contain, all `None`
pub fn task_template() -> DocumentMap {
    SECTION_KEYS
        .iter()
        .map(|(section, keys)| {
            let keys: SectionMap = keys.iter().map(|k| (k.to_string(), None)).collect();
            (section.to_string(), keys)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DerivativeTask {
    pub start: f64,
    pub end: f64,
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone)]
pub struct IntegralTask {
    pub a: f64,
    pub b: f64,
    pub n: usize,
    /// empty means the five classic rules
    pub methods: Vec<QuadMethod>,
}

#[derive(Debug, Clone)]
pub struct CalculusTask {
    pub expression: String,
    pub parse_mode: ParseMode,
    pub derivative: Option<DerivativeTask>,
    pub integral: Option<IntegralTask>,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
}

/// What a task run produced
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub analysis: Option<DerivativeAnalysis>,
    pub integrals: Option<IntegralSummary>,
}

impl Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(analysis) = &self.analysis {
            writeln!(f, "{}", analysis.report())?;
        }
        if let Some(integrals) = &self.integrals {
            writeln!(
                f,
                "integral on [{}, {}], n = {}\n{}",
                integrals.a,
                integrals.b,
                integrals.n,
                integrals.to_table()
            )?;
        }
        Ok(())
    }
}

// single value of a key, None when the key is absent
fn single<'a>(section: &'a SectionMap, title: &str, key: &str) -> Result<Option<&'a Value>, String> {
    match section.get(key) {
        None | Some(None) => Ok(None),
        Some(Some(values)) => match values.as_slice() {
            [value] => Ok(Some(value)),
            _ => Err(format!("{}.{} expects exactly one value", title, key)),
        },
    }
}

fn float_or(section: &SectionMap, title: &str, key: &str, default: f64) -> Result<f64, String> {
    match single(section, title, key)? {
        None => Ok(default),
        Some(value) => value
            .as_float()
            .ok_or_else(|| format!("{}.{} must be a number, got '{}'", title, key, value)),
    }
}

// a section filled in by the template only has None values
fn is_written(section: &SectionMap) -> bool {
    section.values().any(Option::is_some)
}

fn text(section: &SectionMap, title: &str, key: &str) -> Result<Option<String>, String> {
    Ok(single(section, title, key)?.map(|value| value.to_string()))
}

impl CalculusTask {
    /// Builds the task from a parsed document. Missing keys take their defaults; an unknown
    /// section or key, a missing expression or a value of the wrong type is an error.
    pub fn from_document(document: &DocumentMap) -> Result<CalculusTask, String> {
        for (title, section) in document {
            let (_, allowed) = SECTION_KEYS
                .iter()
                .find(|(name, _)| *name == title.as_str())
                .ok_or_else(|| format!("unknown section '{}'", title))?;
            if let Some(key) = section.keys().find(|k| !allowed.contains(&k.as_str())) {
                return Err(format!("unknown key '{}' in section '{}'", key, title));
            }
        }
        let empty = SectionMap::new();

        let function = document
            .get("function")
            .ok_or_else(|| "section 'function' is required".to_string())?;
        let expression = text(function, "function", "expression")?
            .ok_or_else(|| "function.expression is required".to_string())?;
        let parse_mode = match text(function, "function", "mode")? {
            Some(mode) => mode
                .parse::<ParseMode>()
                .map_err(|_| format!("function.mode must be permissive or strict, got '{}'", mode))?,
            None => ParseMode::default(),
        };

        let derivative = match document.get("derivative").filter(|s| is_written(s)) {
            Some(section) => {
                let defaults = AnalysisConfig::default().sweep;
                let mut sweep = SweepConfig {
                    granularity: float_or(section, "derivative", "granularity", defaults.granularity)?,
                    tolerance: float_or(section, "derivative", "tolerance", defaults.tolerance)?,
                    ..defaults
                };
                if let Some(policy) = text(section, "derivative", "zero_policy")? {
                    sweep.zero_policy = policy
                        .parse()
                        .map_err(|_| format!("derivative.zero_policy must be skip or nudge, got '{}'", policy))?;
                }
                Some(DerivativeTask {
                    start: float_or(section, "derivative", "start", -10.0)?,
                    end: float_or(section, "derivative", "end", 10.0)?,
                    sweep,
                })
            }
            None => None,
        };

        let integral = match document.get("integral").filter(|s| is_written(s)) {
            Some(section) => {
                let n = match single(section, "integral", "n")? {
                    None => QuadratureConfig::default().subdivisions,
                    Some(value) => value
                        .as_integer()
                        .filter(|n| *n > 0)
                        .map(|n| n as usize)
                        .ok_or_else(|| format!("integral.n must be a positive integer, got '{}'", value))?,
                };
                let methods = match section.get("method") {
                    Some(Some(values)) => values
                        .iter()
                        .map(|value| {
                            value
                                .to_string()
                                .parse::<QuadMethod>()
                                .map_err(|_| format!("unknown integration method '{}'", value))
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => Vec::new(),
                };
                Some(IntegralTask {
                    a: float_or(section, "integral", "a", 0.0)?,
                    b: float_or(section, "integral", "b", 1.0)?,
                    n,
                    methods,
                })
            }
            None => None,
        };

        let logging = document.get("logging").unwrap_or(&empty);
        let loglevel = text(logging, "logging", "loglevel")?;
        let log_to_file = match single(logging, "logging", "to_file")? {
            None => false,
            Some(value) => value
                .as_boolean()
                .ok_or_else(|| format!("logging.to_file must be true or false, got '{}'", value))?,
        };

        Ok(CalculusTask {
            expression,
            parse_mode,
            derivative,
            integral,
            loglevel,
            log_to_file,
        })
    }

    /// Parses the text against [`task_template`] and builds the task
    pub fn from_str_document(input: &str) -> Result<CalculusTask, String> {
        let document = parse_document_with_template(input, &task_template())?;
        CalculusTask::from_document(&document)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CalculusTask, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        CalculusTask::from_str_document(&content)
    }

    /// Installs the logger the `logging` section asks for
    pub fn init_logging(&self) -> Result<(), String> {
        init_logger(self.loglevel.as_deref(), self.log_to_file)
    }

    /// Runs the derivative and integral parts present in the task
    pub fn run(&self) -> Result<TaskReport, AnalysisError> {
        info!("running task for f(x) = {}", self.expression);
        let analysis = match &self.derivative {
            Some(task) => {
                let config = AnalysisConfig {
                    parse_mode: self.parse_mode,
                    sweep: task.sweep.clone(),
                    ..AnalysisConfig::default()
                };
                Some(perform_derivative_analysis_with(
                    &self.expression,
                    task.start,
                    task.end,
                    &config,
                )?)
            }
            None => None,
        };
        let integrals = match &self.integral {
            Some(task) => {
                validate(task.a, task.b, task.n)?;
                let expression =
                    Expression::parse_with_mode(&normalize_integrand(&self.expression), self.parse_mode)?;
                let summary = if task.methods.is_empty() {
                    integral_summary(&expression, task.a, task.b, task.n)?
                } else {
                    let results = task
                        .methods
                        .iter()
                        .map(|&method| {
                            let config = QuadratureConfig {
                                subdivisions: task.n,
                                method,
                            };
                            (method, integrate_with(&expression, task.a, task.b, &config))
                        })
                        .collect();
                    IntegralSummary {
                        a: task.a,
                        b: task.b,
                        n: task.n,
                        results,
                    }
                };
                Some(summary)
            }
            None => None,
        };
        Ok(TaskReport {
            analysis,
            integrals,
        })
    }
}
