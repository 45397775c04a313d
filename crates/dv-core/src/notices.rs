//! Non-blocking user notices (capacity rejections, parse warnings, bad mappings)

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(6);

const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= NOTICE_TTL
    }
}

/// Bounded log of recent notices, oldest first
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: VecDeque<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: NoticeLevel, message: impl Into<String>, created: Instant) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message: message.into(),
            created,
        });
    }

    /// Notices still visible at `now`
    pub fn active(&self, now: Instant) -> Vec<Notice> {
        self.notices.iter().filter(|n| !n.is_expired(now)).cloned().collect()
    }

    /// Drop expired notices
    pub fn expire(&mut self, now: Instant) {
        self.notices.retain(|n| !n.is_expired(now));
    }

    pub fn dismiss_all(&mut self) {
        self.notices.clear();
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire() {
        let mut log = NoticeLog::new();
        let t0 = Instant::now();
        log.push_at(NoticeLevel::Warning, "full", t0);
        assert_eq!(log.active(t0).len(), 1);
        assert!(log.active(t0 + NOTICE_TTL).is_empty());

        log.expire(t0 + NOTICE_TTL + Duration::from_millis(1));
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = NoticeLog::new();
        for i in 0..(MAX_NOTICES + 5) {
            log.push(NoticeLevel::Info, format!("n{}", i));
        }
        assert_eq!(log.len(), MAX_NOTICES);
        assert_eq!(log.latest().map(|n| n.message.as_str()), Some("n36"));
    }
}
