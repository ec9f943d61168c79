//! UI-agnostic feed state
//!
//! These types describe what the feed container shows. Front-ends only
//! render them and never build them directly.

use chrono::{DateTime, Local, Utc};

use crate::message::{Message, Payload};
use crate::time_format::format_timestamp;

pub const DEFAULT_LIMIT: u32 = 10;
pub const LIMIT_OPTIONS: [u32; 4] = [5, 10, 20, 50];

pub const LOADING_TEXT: &str = "Завантаження...";
pub const EMPTY_TEXT: &str = "Повідомлень поки немає";
pub const ERROR_HEADLINE: &str = "Не вдалося завантажити повідомлення";
pub const RETRY_LABEL: &str = "Спробувати ще раз";
pub const REFRESH_LABEL: &str = "🔄";
pub const REFRESHING_LABEL: &str = "🔄 Оновлюється...";

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCard {
    /// Plain text, never interpreted as markup
    pub text: String,
    pub time_label: Option<String>,
}

impl MessageCard {
    pub fn from_message(message: Message, now: DateTime<Utc>) -> Self {
        let time_label = message
            .timestamp
            .as_deref()
            .map(|ts| format_timestamp(Some(ts), now));
        Self {
            text: message.text,
            time_label,
        }
    }
}

/// The container is always in exactly one of these states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerContent {
    Loading,
    Empty,
    Failed { detail: String },
    Messages(Vec<MessageCard>),
}

impl ContainerContent {
    pub fn from_payload(payload: Payload, now: DateTime<Utc>) -> Self {
        match payload {
            Payload::Empty => ContainerContent::Empty,
            Payload::Messages(messages) if messages.is_empty() => ContainerContent::Empty,
            Payload::Messages(messages) => ContainerContent::Messages(
                messages
                    .into_iter()
                    .map(|m| MessageCard::from_message(m, now))
                    .collect(),
            ),
        }
    }

    pub fn cards(&self) -> &[MessageCard] {
        match self {
            ContainerContent::Messages(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ContainerContent::Failed { .. })
    }
}

/// Per-view state, created at initialization.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub limit: u32,
    pub last_refresh: Option<DateTime<Local>>,
    pub is_loading: bool,
}

impl FeedState {
    pub fn new(limit: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
            last_refresh: None,
            is_loading: false,
        }
    }

    /// Label of the manual refresh trigger.
    pub fn refresh_label(&self) -> &'static str {
        if self.is_loading {
            REFRESHING_LABEL
        } else {
            REFRESH_LABEL
        }
    }
}

/// Next (or previous) entry of [`LIMIT_OPTIONS`] relative to `current`.
pub fn cycle_limit(current: u32, forward: bool) -> u32 {
    let idx = LIMIT_OPTIONS
        .iter()
        .position(|&l| l == current)
        .unwrap_or_else(|| {
            LIMIT_OPTIONS
                .iter()
                .position(|&l| l > current)
                .unwrap_or(LIMIT_OPTIONS.len() - 1)
        });

    let next = if forward {
        (idx + 1).min(LIMIT_OPTIONS.len() - 1)
    } else {
        idx.saturating_sub(1)
    };
    LIMIT_OPTIONS[next]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cards_follow_payload_order() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let payload = Payload::Messages(vec![
            Message::new("a").with_timestamp("2024-03-15T08:30:00Z"),
            Message::new("<script>b</script>"),
            Message::new("c").with_timestamp("garbage"),
        ]);

        let content = ContainerContent::from_payload(payload, now);
        let cards = content.cards();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].text, "a");
        assert_eq!(cards[0].time_label.as_deref(), Some("Сьогодні, 10:30"));
        assert_eq!(cards[1].text, "<script>b</script>");
        assert_eq!(cards[1].time_label, None);
        assert_eq!(cards[2].time_label.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_payload() {
        let now = Utc::now();
        assert_eq!(
            ContainerContent::from_payload(Payload::Empty, now),
            ContainerContent::Empty
        );
        assert_eq!(
            ContainerContent::from_payload(Payload::Messages(vec![]), now),
            ContainerContent::Empty
        );
    }

    #[test]
    fn test_state_defaults() {
        let state = FeedState::new(None);
        assert_eq!(state.limit, 10);
        assert!(!state.is_loading);
        assert!(state.last_refresh.is_none());
        assert_eq!(state.refresh_label(), REFRESH_LABEL);

        assert_eq!(FeedState::new(Some(0)).limit, 1);
    }

    #[test]
    fn test_cycle_limit() {
        assert_eq!(cycle_limit(10, true), 20);
        assert_eq!(cycle_limit(10, false), 5);
        assert_eq!(cycle_limit(50, true), 50);
        assert_eq!(cycle_limit(5, false), 5);
        // unknown values snap to the nearest larger option
        assert_eq!(cycle_limit(7, true), 20);
        assert_eq!(cycle_limit(100, false), 20);
    }
}
