//! Notification sinks
//!
//! An order (or contact message) leaves the shop as a single text payload
//! handed to a [`NotificationSink`]. The hand-off is fire-and-forget: there is
//! no delivery receipt and no failure path.

use std::sync::Mutex;
use url::Url;

/// Receives formatted order and contact messages.
pub trait NotificationSink: Send + Sync {
    fn send(&self, text: &str);
}

/// Hands messages to a WhatsApp chat through a `wa.me` deep link.
#[derive(Debug, Clone)]
pub struct WhatsAppSink {
    chat: Url,
}

impl WhatsAppSink {
    /// `number` is the international number without `+`, e.g. `919697499557`.
    pub fn new(number: &str) -> Result<Self, url::ParseError> {
        let chat = Url::parse("https://wa.me/")?.join(number)?;
        Ok(Self { chat })
    }

    /// Link that opens the chat with no message filled in.
    pub fn chat_link(&self) -> &Url {
        &self.chat
    }

    /// Link that opens the chat with `text` pre-filled.
    pub fn link(&self, text: &str) -> Url {
        let mut url = self.chat.clone();
        url.query_pairs_mut().append_pair("text", text);
        url
    }
}

impl NotificationSink for WhatsAppSink {
    fn send(&self, text: &str) {
        let link = self.link(text);
        tracing::info!(chat = %self.chat, bytes = text.len(), "handing message to WhatsApp");
        tracing::debug!(%link, "hand-off link");
    }
}

/// Keeps every payload in memory, newest last.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, text: &str) {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}
