use std::sync::{Arc, Mutex};

use super::{BoardData, ReminderSource};
use crate::error::SourceError;

/// In-memory source. Clones share state, so a caller can keep a handle and
/// swap the data (or make it fail) while a driver is running.
#[derive(Debug, Clone)]
pub struct MemorySource {
    state: Arc<Mutex<Result<BoardData, String>>>,
}

impl MemorySource {
    pub fn new(data: BoardData) -> Self {
        Self {
            state: Arc::new(Mutex::new(Ok(data))),
        }
    }

    /// Replace the data served by subsequent loads.
    pub fn set(&self, data: BoardData) {
        if let Ok(mut state) = self.state.lock() {
            *state = Ok(data);
        }
    }

    /// Make subsequent loads fail with `message`.
    pub fn fail(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            *state = Err(message.into());
        }
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(BoardData::default())
    }
}

impl ReminderSource for MemorySource {
    async fn load(&self) -> Result<BoardData, SourceError> {
        let snapshot = match self.state.lock() {
            Ok(state) => state.clone(),
            Err(_) => Err("memory source poisoned".to_string()),
        };
        snapshot.map_err(SourceError::Unavailable)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
