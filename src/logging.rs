use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::errors::ConfigError;
use crate::initialization::LogConfig;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Initializes the log4rs logger with a console appender and, when a log file
/// is configured, a file appender next to it
///
/// # Arguments
///
/// * 'log_config' - level and optional log file path
pub fn setup_logger(log_config: &LogConfig) -> Result<(), ConfigError> {
    let level = match log_config.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        other => return Err(ConfigError(format!("unknown log level: {}", other))),
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)));
    let mut root = Root::builder().appender("stdout");

    if let Some(file) = &log_config.file {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(file)?;

        config = config.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    log4rs::init_config(config.build(root.build(level))?)?;

    Ok(())
}
