use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config::BusinessInfo;

/// Where the chat widget sends user text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, message: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

pub struct ChatSession<B> {
    backend: B,
    messages: Vec<ChatMessage>,
    typing: bool,
    /// Reply pacing bounds in milliseconds.
    delay_ms: (u64, u64),
    fallback: String,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B, business: &BusinessInfo) -> Self {
        let welcome = format!(
            "¡Hola! Soy el asistente virtual de {}. ¿En qué puedo ayudarte hoy?",
            business.name
        );
        Self {
            backend,
            messages: vec![ChatMessage::new(Sender::Bot, welcome)],
            typing: false,
            delay_ms: (1000, 2000),
            fallback: format!(
                "Lo siento, estoy experimentando problemas técnicos. Por favor intenta más tarde o contacta directamente al {}.",
                business.phone
            ),
        }
    }

    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        let min = min.as_millis() as u64;
        let max = (max.as_millis() as u64).max(min);
        self.delay_ms = (min, max);
        self
    }

    pub fn without_delay(self) -> Self {
        self.with_delay(Duration::ZERO, Duration::ZERO)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Appends the user message and exactly one bot reply. Blank input is
    /// ignored and returns `None`.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::new(Sender::User, text));
        self.typing = true;

        let reply = match self.backend.ask(text).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                self.fallback.clone()
            }
        };
        self.pause().await;

        self.messages.push(ChatMessage::new(Sender::Bot, reply));
        self.typing = false;
        self.messages.last()
    }

    async fn pause(&self) {
        let (min, max) = self.delay_ms;
        if max == 0 {
            return;
        }
        let ms = rand::rng().random_range(min..=max);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct Echo;

    #[async_trait]
    impl ChatBackend for Echo {
        async fn ask(&self, message: &str) -> anyhow::Result<String> {
            Ok(format!("eco: {message}"))
        }
    }

    struct Down(Arc<AtomicUsize>);

    #[async_trait]
    impl ChatBackend for Down {
        async fn ask(&self, _message: &str) -> anyhow::Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn starts_with_welcome_message() {
        let session = ChatSession::new(Echo, &BusinessInfo::default());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
        assert!(session.messages()[0].text.contains("Café Demo"));
    }

    #[tokio::test]
    async fn reply_is_appended_after_user_message() {
        let mut session = ChatSession::new(Echo, &BusinessInfo::default()).without_delay();
        let reply = session.send("hola").await.map(|m| m.text.clone());

        assert_eq!(reply.as_deref(), Some("eco: hola"));
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].sender, Sender::User);
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn failure_yields_one_fallback_without_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session =
            ChatSession::new(Down(calls.clone()), &BusinessInfo::default()).without_delay();
        session.send("¿abrís hoy?").await;

        let bot_replies = session.messages()[1..]
            .iter()
            .filter(|m| m.sender == Sender::Bot)
            .count();
        assert_eq!(bot_replies, 1);
        assert!(session.messages()[2].text.starts_with("Lo siento"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn fallback_is_paced_like_a_reply() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pause = Duration::from_millis(40);
        let mut session =
            ChatSession::new(Down(calls), &BusinessInfo::default()).with_delay(pause, pause);

        let started = std::time::Instant::now();
        session.send("hola").await;
        assert!(started.elapsed() >= pause);
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut session = ChatSession::new(Echo, &BusinessInfo::default()).without_delay();
        assert!(session.send("   ").await.is_none());
        assert_eq!(session.messages().len(), 1);
    }
}
