use std::path::PathBuf;

use super::{BoardData, ReminderSource};
use crate::error::SourceError;

/// Reads a board document from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReminderSource for FileSource {
    async fn load(&self) -> Result<BoardData, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;
        BoardData::from_json(&content)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_document_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"reminders":[{"_id":"r1","title":"Standup","targetTime":"09:30","recurrenceType":"daily"}]}"#,
        )
        .unwrap();

        let data = FileSource::new(&path).load().await.unwrap();
        assert_eq!(data.reminders.len(), 1);
        assert_eq!(data.reminders[0].title, "Standup");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let source = FileSource::new("/definitely/not/here.json");
        match source.load().await {
            Err(SourceError::Read { path, .. }) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.json"))
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
