//! Log levels and the `env_logger` backend

use env_logger::Builder;
use log::LevelFilter;

/// Log verbosity, from silent to everything
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Parse a level name (`warning`, `debug`, ...) or its number
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if let Ok(level) = s.parse::<i32>() {
            if !(0..=6).contains(&level) {
                anyhow::bail!("Log level out of range (0 to 6): {}", level);
            }
            return Ok(Self::from_i32(level));
        }

        match s.to_lowercase().as_str() {
            "nothing" | "off" | "none" => Ok(LogLevel::Nothing),
            "user" => Ok(LogLevel::User),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "all" | "trace" => Ok(LogLevel::All),
            _ => anyhow::bail!(
                "Invalid log level: {}. Valid options: nothing, user, error, warning, info, debug, all",
                s
            ),
        }
    }

    /// Matching filter for the `log` facade. `User` messages go out at error level.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

/// Logger builder shared by [`init`] and callers that need a custom target.
///
/// The builder itself lets everything through; verbosity is governed by the
/// facade's max level, so it can be raised or lowered after installation.
pub fn builder() -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Trace);
    builder
}

/// Install the stderr logger at the default level.
///
/// Called before config loading so its warnings are not lost. Apply the
/// configured level afterwards with [`set_level`].
pub fn init() -> Result<(), log::SetLoggerError> {
    builder().try_init()?;
    set_level(LogLevel::default());
    Ok(())
}

/// Change verbosity of the installed logger.
pub fn set_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}
