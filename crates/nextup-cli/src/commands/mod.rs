pub mod board;
pub mod completions;
pub mod config;
pub mod reminder;

use chrono::NaiveDateTime;
use nextup_core::error::Result;
use nextup_core::time::parse_local_timestamp;
use nextup_core::{AnySource, BoardData, Config, CoreError, ReminderSource};

/// Everything a command needs from the environment.
pub struct Context {
    pub config: Config,
    source_override: Option<String>,
}

impl Context {
    pub fn new(config: Config, source_override: Option<String>) -> Self {
        Self {
            config,
            source_override,
        }
    }

    /// The `--source` flag if given, otherwise the configured location.
    pub fn source(&self) -> Result<AnySource> {
        let location = match self.source_override.as_deref() {
            Some(location) => location.to_string(),
            None => self.config.source_location()?,
        };
        Ok(AnySource::from_location(
            &location,
            self.config.source_timeout(),
        )?)
    }

    /// Load one snapshot from the source.
    pub fn load(&self) -> Result<BoardData> {
        let source = self.source()?;
        let data = runtime()?.block_on(source.load())?;
        Ok(data)
    }
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// `--at` if given, otherwise the local wall clock.
pub fn resolve_now(at: Option<&str>) -> Result<NaiveDateTime> {
    match at {
        Some(value) => parse_local_timestamp(value).ok_or_else(|| {
            CoreError::Custom(format!("invalid time '{value}', expected YYYY-MM-DD HH:MM"))
        }),
        None => Ok(chrono::Local::now().naive_local()),
    }
}
