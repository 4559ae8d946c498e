use chrono::Local;
use csv::Writer;
use log::{LevelFilter, debug};
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io;
use std::path::Path;

/// Maps "debug", "info", "warn", "error" and "off" to a level filter
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        )),
    }
}

/// Terminal logger plus, with `to_file`, a copy in `log_<date>_<time>.txt`.
/// Level defaults to info. A logger installed earlier stays in place.
pub fn init_logger(loglevel: Option<&str>, to_file: bool) -> Result<(), String> {
    let log_option = match loglevel {
        Some(level) => parse_level(level)?,
        None => LevelFilter::Info,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let file = File::create(&name).map_err(|e| format!("cannot create {}: {}", name, e))?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_err() {
        debug!("logger already initialised");
    }
    Ok(())
}

/// Writes columns sharing one argument grid: header row `arg, headers...`, then one row per x
pub fn save_columns_to_csv<P: AsRef<Path>>(
    filename: P,
    arg: &str,
    x_mesh: &[f64],
    headers: &[String],
    columns: &[Vec<f64>],
) -> io::Result<()> {
    if headers.len() != columns.len() || columns.iter().any(|c| c.len() != x_mesh.len()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "every column needs a header and one value per grid point",
        ));
    }
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = vec![arg.to_string()];
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, x) in x_mesh.iter().enumerate() {
        let mut row_data = vec![x.to_string()];
        row_data.extend(columns.iter().map(|column| column[i].to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

/// Saves (x, y) samples, e.g. from `Expression::sample`, as a two-column csv
pub fn save_samples_to_csv<P: AsRef<Path>>(
    filename: P,
    samples: &[(f64, f64)],
    arg: &str,
    value: &str,
) -> io::Result<()> {
    let (x_mesh, values): (Vec<f64>, Vec<f64>) = samples.iter().copied().unzip();
    save_columns_to_csv(filename, arg, &x_mesh, &[value.to_string()], &[values])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Ok(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Ok(LevelFilter::Off));
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_init_logger_rejects_bad_level() {
        assert!(init_logger(Some("loud"), false).is_err());
    }

    #[test]
    fn test_save_samples_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        save_samples_to_csv(&path, &[(0.0, 1.0), (0.5, 2.25)], "x", "f(x)").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["x,f(x)", "0,1", "0.5,2.25"]);
    }

    #[test]
    fn test_save_columns_to_csv_checks_shapes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let result = save_columns_to_csv(
            &path,
            "x",
            &[0.0, 1.0],
            &["f".to_string()],
            &[vec![1.0]],
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
