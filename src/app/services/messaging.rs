//! Telegram bot sender for the "Send to Telegram" tool.

pub const TELEGRAM_API: &str = "https://api.telegram.org";
const TIMEOUT_SECS: u64 = 30;

pub trait Messenger {
    fn set_credentials(&mut self, token: Option<&str>, chat_id: Option<&str>);
    /// `true` only when the endpoint answered HTTP 200.
    fn send_message(&self, text: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    token: Option<String>,
    chat_id: Option<String>,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: Option<&str>, chat_id: Option<&str>) -> Self {
        Self {
            token: token.map(str::to_string),
            chat_id: chat_id.map(str::to_string),
            base_url: TELEGRAM_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let chat_id = self.chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}

impl Messenger for TelegramClient {
    fn set_credentials(&mut self, token: Option<&str>, chat_id: Option<&str>) {
        self.token = token.map(str::to_string);
        self.chat_id = chat_id.map(str::to_string);
    }

    fn send_message(&self, text: &str) -> bool {
        let Some((token, chat_id)) = self.credentials() else {
            return false;
        };

        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let result = minreq::post(url)
            .with_param("chat_id", chat_id)
            .with_param("text", text)
            .with_timeout(TIMEOUT_SECS)
            .send();

        match result {
            Ok(response) if response.status_code == 200 => {
                tracing::info!(bytes = text.len(), "message sent to Telegram");
                true
            }
            Ok(response) => {
                tracing::warn!(status = response.status_code, "Telegram rejected message");
                false
            }
            Err(e) => {
                tracing::warn!("Telegram request failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::loopback::{dead_url, serve_once};

    #[test]
    fn test_missing_credentials_returns_false() {
        assert!(!TelegramClient::new(None, Some("1")).send_message("hi"));
        assert!(!TelegramClient::new(Some("t"), None).send_message("hi"));
        assert!(!TelegramClient::new(Some(""), Some("1")).send_message("hi"));
    }

    #[test]
    fn test_success_on_200() {
        let server = serve_once("200 OK", r#"{"ok":true}"#);
        let client = TelegramClient::new(Some("123abc"), Some("42")).with_base_url(server.base_url.clone());

        assert!(client.send_message("hi"));

        let request = server.request();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST /bot123abc/sendMessage?"));
        assert!(request_line.contains("chat_id=42"));
        assert!(request_line.contains("text=hi"));
    }

    #[test]
    fn test_non_200_is_false() {
        let server = serve_once("400 Bad Request", r#"{"ok":false,"description":"chat not found"}"#);
        let client = TelegramClient::new(Some("t"), Some("1")).with_base_url(server.base_url.clone());
        assert!(!client.send_message("hi"));
        server.request();
    }

    #[test]
    fn test_network_error_is_false() {
        let client = TelegramClient::new(Some("t"), Some("1")).with_base_url(dead_url());
        assert!(!client.send_message("hi"));
    }
}
