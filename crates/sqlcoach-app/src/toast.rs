//! Transient, non-blocking notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Most toasts shown at once; older ones are dropped first
pub const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of visible toasts
#[derive(Debug, Clone)]
pub struct Toasts {
    items: VecDeque<Toast>,
    next_id: u64,
    duration: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl Toasts {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            duration,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            id,
            kind,
            message: message.into(),
            expires_at: Instant::now() + self.duration,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    /// Drop toasts whose time is up
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|t| t.expires_at > now);
    }

    /// Oldest first
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of error toasts currently visible
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|t| t.kind == ToastKind::Error)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_expire() {
        let mut toasts = Toasts::new(Duration::from_millis(100));
        toasts.success("saved");
        toasts.error("boom");
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts.error_count(), 1);

        toasts.expire(Instant::now() + Duration::from_millis(200));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut toasts = Toasts::default();
        for i in 0..MAX_TOASTS + 2 {
            toasts.info(format!("toast {i}"));
        }
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.visible().next().unwrap().message, "toast 2");
        assert_eq!(
            toasts.latest().unwrap().message,
            format!("toast {}", MAX_TOASTS + 1)
        );
    }
}
