//! Reads reminders and settings from the board's web API.
//!
//! `GET <base>/api/reminders` returns the reminder documents and
//! `GET <base>/api/settings` the settings document. A failing settings
//! endpoint is not fatal: the board falls back to default settings.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::{BoardData, ReminderSource};
use crate::error::SourceError;
use crate::reminder::{ReminderRecord, SettingsRecord};

const USER_AGENT: &str = concat!("nextup/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = self.base.join(path)?;
        let resp = self.client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ReminderSource for HttpSource {
    async fn load(&self) -> Result<BoardData, SourceError> {
        let records: Vec<ReminderRecord> = self.get_json("api/reminders").await?;
        let settings = match self.get_json::<SettingsRecord>("api/settings").await {
            Ok(record) => record.into_settings(),
            Err(e) => {
                tracing::warn!(error = %e, "settings unavailable, using defaults");
                Default::default()
            }
        };
        Ok(BoardData::from_records(records, settings))
    }

    fn describe(&self) -> String {
        format!("http {}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::{FlashMode, Settings};

    #[tokio::test]
    async fn loads_reminders_and_settings() {
        let mut server = mockito::Server::new_async().await;
        let reminders = server
            .mock("GET", "/api/reminders")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"_id":"r1","title":"Meds","targetTime":"08:00","recurrenceType":"daily","active":true}]"#,
            )
            .create_async()
            .await;
        let settings = server
            .mock("GET", "/api/settings")
            .with_status(200)
            .with_body(r#"{"theme":"dark","flashMode":"screen"}"#)
            .create_async()
            .await;

        let source = HttpSource::new(&server.url(), Duration::from_secs(5)).unwrap();
        let data = source.load().await.unwrap();

        reminders.assert_async().await;
        settings.assert_async().await;
        assert_eq!(data.reminders.len(), 1);
        assert_eq!(data.reminders[0].id, "r1");
        assert_eq!(data.settings.flash_mode, FlashMode::Screen);
    }

    #[tokio::test]
    async fn reminder_endpoint_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/reminders")
            .with_status(500)
            .with_body(r#"{"error":"Failed to fetch reminders"}"#)
            .create_async()
            .await;

        let source = HttpSource::new(&server.url(), Duration::from_secs(5)).unwrap();
        match source.load().await {
            Err(SourceError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn settings_failure_falls_back_to_defaults() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/reminders")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/api/settings")
            .with_status(401)
            .create_async()
            .await;

        let source = HttpSource::new(&server.url(), Duration::from_secs(5)).unwrap();
        let data = source.load().await.unwrap();
        assert!(data.reminders.is_empty());
        assert_eq!(data.settings, Settings::default());
    }

    #[test]
    fn base_keeps_sub_path() {
        let source = HttpSource::new("http://display.local/board", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.base().join("api/reminders").unwrap().as_str(),
            "http://display.local/board/api/reminders"
        );
    }
}
