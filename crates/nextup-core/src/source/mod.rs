//! Read-only reminder sources.
//!
//! The engine never stores anything. A source hands over the current
//! reminders and settings; the clock driver calls [`ReminderSource::load`]
//! on its coarse tick and swaps the result in wholesale.

mod file;
mod http;
mod memory;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::reminder::{normalize_records, Reminder, ReminderRecord, Settings, SettingsRecord};

pub use file::FileSource;
pub use http::HttpSource;
pub use memory::MemorySource;

/// One consistent snapshot of everything the board needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub reminders: Vec<Reminder>,
    pub settings: Settings,
}

impl BoardData {
    /// Build a snapshot the way the upstream list query does: active
    /// records only, ordered by target time.
    pub fn from_records(records: Vec<ReminderRecord>, settings: Settings) -> Self {
        let mut records: Vec<ReminderRecord> =
            records.into_iter().filter(ReminderRecord::is_active).collect();
        records.sort_by(|a, b| a.target_time.cmp(&b.target_time));
        Self {
            reminders: normalize_records(records),
            settings,
        }
    }

    /// Parse a board document: either `{ "settings": .., "reminders": [..] }`
    /// or a bare array of reminder records.
    pub fn from_json(content: &str) -> Result<Self, SourceError> {
        let document: BoardDocument = serde_json::from_str(content)?;
        Ok(match document {
            BoardDocument::Full { settings, reminders } => Self::from_records(
                reminders,
                settings.unwrap_or_default().into_settings(),
            ),
            BoardDocument::List(reminders) => Self::from_records(reminders, Settings::default()),
        })
    }

    pub fn find(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoardDocument {
    Full {
        #[serde(default)]
        settings: Option<SettingsRecord>,
        reminders: Vec<ReminderRecord>,
    },
    List(Vec<ReminderRecord>),
}

/// Something that can produce a [`BoardData`] snapshot.
pub trait ReminderSource: Send + Sync {
    /// Fetch the current reminders and settings.
    fn load(&self) -> impl Future<Output = Result<BoardData, SourceError>> + Send;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// A source picked from a location string: `http(s)://` URLs go over HTTP,
/// anything else is a file path.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
}

impl AnySource {
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self, SourceError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(AnySource::Http(HttpSource::new(location, timeout)?))
        } else {
            Ok(AnySource::File(FileSource::new(location)))
        }
    }
}

impl ReminderSource for AnySource {
    async fn load(&self) -> Result<BoardData, SourceError> {
        match self {
            AnySource::File(source) => source.load().await,
            AnySource::Http(source) => source.load().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::File(source) => source.describe(),
            AnySource::Http(source) => source.describe(),
        }
    }
}
