use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Initializes a terminal logger for the crate. Call once at program start;
/// a second call returns the error from the log facade.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
}
