//! Chat-assisted booking: a linear transcript plus the history forwarded to the
//! remote assistant.

use tracing::warn;

use crate::backend::ClinicBackend;
use crate::models::{ChatRequest, HistoryTurn};

pub const GREETING: &str =
    "Hello! I can help you book an appointment. Just tell me when you want to come.";
pub const APOLOGY: &str = "Sorry, I lost connection to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    /// Completed exchanges only; a turn that failed is never forwarded.
    history: Vec<HistoryTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    #[cfg(test)]
    pub fn history(&self) -> &[HistoryTurn] {
        &self.history
    }

    fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.transcript.push(ChatMessage {
            sender,
            text: text.into(),
        });
    }

    /// Seed the greeting when the chat tab is opened on an empty transcript.
    pub fn ensure_greeting(&mut self) {
        if self.transcript.is_empty() {
            self.push(Sender::Bot, GREETING);
        }
    }

    /// Append `text`, ask the assistant, append its reply (or the apology).
    /// Returns false when `text` is blank and nothing happened.
    pub async fn send(&mut self, backend: &dyn ClinicBackend, token: &str, text: &str) -> bool {
        let message = text.trim();
        if message.is_empty() {
            return false;
        }
        self.push(Sender::User, message);

        let req = ChatRequest {
            message: message.to_string(),
            history: self.history.clone(),
        };
        match backend.chat(token, &req).await {
            Ok(reply) => {
                self.push(Sender::Bot, reply.clone());
                self.history.push(HistoryTurn {
                    role: "user".into(),
                    parts: vec![message.to_string()],
                });
                self.history.push(HistoryTurn {
                    role: "model".into(),
                    parts: vec![reply],
                });
            }
            Err(e) => {
                warn!("chat turn failed: {e}");
                self.push(Sender::Bot, APOLOGY);
            }
        }
        true
    }
}
