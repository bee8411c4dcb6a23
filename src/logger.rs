use std::path::Path;

/// Strips cargo-registry noise out of source paths so log lines stay short.
fn simplify_file_path(file_path: &str) -> String {
    if file_path.contains("minproxy") {
        if let Some(pos) = file_path.rfind("/src/") {
            return file_path[(pos + 1)..].to_string();
        }
    }

    if let Some((_, suffix)) = file_path.split_once(".cargo/registry/src/") {
        if let Some(first_slash) = suffix.find('/') {
            suffix[(first_slash + 1)..].to_string()
        } else {
            suffix.to_string()
        }
    } else {
        file_path.to_string()
    }
}

/// Console format: colored, short timestamp, `file:line`.
pub fn console_log_formatter(
    out: fern::FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
) {
    let level = record.level();
    let level_color = match level {
        log::Level::Error => "\x1B[31m", // red
        log::Level::Warn => "\x1B[33m",  // yellow
        log::Level::Info => "\x1B[32m",  // green
        log::Level::Debug => "\x1B[0m",  // normal
        log::Level::Trace => "\x1B[35m", // purple
    };
    let reset = "\x1B[0m";

    out.finish(format_args!(
        "{}{}[{}] {}:{} {}{}",
        level_color,
        chrono::Local::now().format("%H:%M:%S.%3f "),
        get_level(level),
        simplify_file_path(record.file().unwrap_or("")),
        record.line().unwrap_or(0),
        message,
        reset,
    ))
}

/// File format: full date, no colors, same `file:line` locator.
pub fn file_log_formatter(
    out: fern::FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
) {
    out.finish(format_args!(
        "{}[{}] {}:{} {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        get_level(record.level()),
        simplify_file_path(record.file().unwrap_or("")),
        record.line().unwrap_or(0),
        message
    ))
}

/// Wires the console dispatcher, plus a file dispatcher when `log_dir` is
/// set. The console stays at debug for this crate while third-party targets
/// only surface warnings and errors.
pub fn setup_logger(log_dir: Option<&Path>) -> Result<(), fern::InitError> {
    let base_dispatcher = fern::Dispatch::new().level(log::LevelFilter::Debug);

    let stdout_dispatcher = fern::Dispatch::new()
        .level(log::LevelFilter::Debug)
        .filter(|record| {
            record.target().contains("minproxy") || record.level() < log::LevelFilter::Debug
        })
        .format(console_log_formatter)
        .chain(std::io::stdout());

    let mut dispatcher = base_dispatcher.chain(stdout_dispatcher);
    let mut log_file_path = None;

    if let Some(log_dir) = log_dir {
        std::fs::create_dir_all(log_dir)?;
        let path = log_dir.join("minproxy.log");
        let file_dispatcher = fern::Dispatch::new()
            .level(log::LevelFilter::Info)
            .filter(|record| {
                record.target().contains("minproxy") || record.level() < log::LevelFilter::Info
            })
            .format(file_log_formatter)
            .chain(fern::log_file(&path)?);
        dispatcher = dispatcher.chain(file_dispatcher);
        log_file_path = Some(path);
    }

    dispatcher.apply()?;
    log::debug!("logger initialized, log file path: {:?}", log_file_path);
    Ok(())
}

fn get_level(level: log::Level) -> String {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
    .to_string()
}

#[cfg(test)]
use log::SetLoggerError;

/// Console-only logger for tests; safe to call more than once.
#[cfg(test)]
pub fn setup_test_logger() -> Result<(), SetLoggerError> {
    if log::logger().enabled(&log::Metadata::builder().level(log::Level::Debug).build()) {
        return Ok(()); // already initialized
    }

    fern::Dispatch::new()
        .format(console_log_formatter)
        .level(log::LevelFilter::Debug)
        .filter(|record| {
            record.target().contains("minproxy") || record.level() < log::LevelFilter::Debug
        })
        .chain(std::io::stdout())
        .apply()?;

    log::debug!("test logger initialized");
    Ok(())
}
