use crate::core::constants::STATUS_MESSAGE_MS;
use instant::{Duration, Instant};

/// Severity of a user-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub posted_at: Instant,
}

/// Holds the latest transient message shown over the tile view.
///
/// Posting replaces the previous message. Every message is mirrored to the
/// log at the matching level.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    latest: Option<StatusMessage>,
    lifetime: Duration,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            latest: None,
            lifetime: Duration::from_millis(STATUS_MESSAGE_MS),
        }
    }

    pub fn post(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Info | StatusLevel::Success => log::info!("{}", text),
            StatusLevel::Warning => log::warn!("{}", text),
            StatusLevel::Error => log::error!("{}", text),
        }
        self.latest = Some(StatusMessage {
            text,
            level,
            posted_at: Instant::now(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Error, text);
    }

    /// The message to display right now, if it has not timed out
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.latest
            .as_ref()
            .filter(|msg| now.saturating_duration_since(msg.posted_at) < self.lifetime)
    }

    /// Last posted message regardless of age
    pub fn latest(&self) -> Option<&StatusMessage> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
