use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// Одно сообщение в ленте чата
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: String,
    pub text: String,
    pub is_user: bool,
    pub sent_at: DateTime<Local>,
    /// Заглушка "…thinking", ожидающая ответа
    pub pending: bool,
}

impl ChatMessage {
    pub fn user(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::build(sender.into(), text.into(), true, false)
    }

    pub fn assistant(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::build(sender.into(), text.into(), false, false)
    }

    pub fn placeholder(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::build(sender.into(), text.into(), false, true)
    }

    fn build(sender: String, text: String, is_user: bool, pending: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text,
            is_user,
            sent_at: Local::now(),
            pending,
        }
    }

    pub fn avatar(&self) -> String {
        avatar_initials(&self.sender)
    }

    pub fn time_label(&self) -> String {
        time_label(&self.sent_at)
    }
}

/// Инициалы: первые буквы слов, не больше двух, в верхнем регистре
pub fn avatar_initials(sender: &str) -> String {
    sender
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// 12-часовой формат, например "3:07 PM"
pub fn time_label(at: &DateTime<Local>) -> String {
    at.format("%-I:%M %p").to_string()
}
