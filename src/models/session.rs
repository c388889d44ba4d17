use std::collections::HashSet;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-conversation state. Lives in process memory only; cleared by an
/// explicit reset or process exit.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub greeted: bool,
    pub greeting_count: u32,
    pub discussed_service_ids: HashSet<i64>,
    pub history: Vec<HistoryEntry>,
}

impl ChatSession {
    /// Counts the greeting and returns the new total.
    pub fn record_greeting(&mut self) -> u32 {
        self.greeting_count += 1;
        self.greeted = true;
        self.greeting_count
    }

    /// Idempotent; returns false when the service was already discussed.
    pub fn mark_service_discussed(&mut self, id: i64) -> bool {
        self.discussed_service_ids.insert(id)
    }

    pub fn was_discussed(&self, id: i64) -> bool {
        self.discussed_service_ids.contains(&id)
    }

    pub fn append_history(&mut self, message: &str) {
        self.history.push(HistoryEntry {
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent_history(&self, n: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_count_increments() {
        let mut session = ChatSession::default();
        assert!(!session.greeted);
        assert_eq!(session.record_greeting(), 1);
        assert!(session.greeted);
        assert_eq!(session.record_greeting(), 2);
        assert_eq!(session.record_greeting(), 3);
    }

    #[test]
    fn mark_discussed_is_idempotent() {
        let mut session = ChatSession::default();
        assert!(session.mark_service_discussed(7));
        assert!(!session.mark_service_discussed(7));
        assert!(session.was_discussed(7));
        assert_eq!(session.discussed_service_ids.len(), 1);
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut session = ChatSession::default();
        for i in 0..5 {
            session.append_history(&format!("msg {i}"));
        }
        let recent = session.recent_history(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "msg 2");
        assert_eq!(recent[2].message, "msg 4");

        let mut short = ChatSession::default();
        short.append_history("only");
        assert_eq!(short.recent_history(3).len(), 1);
    }
}
