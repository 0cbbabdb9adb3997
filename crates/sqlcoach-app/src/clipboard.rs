//! Clipboard bridge: copy a code block and drive its "Copied!" feedback
//!
//! The platform capability sits behind the [`Clipboard`] trait. The bridge
//! only records success in [`CopyState`] and raises a toast; scheduling the
//! reset after [`COPY_RESET_DELAY`] is up to the caller, which owns the timer.

use std::time::Duration;

use sqlcoach_core::prelude::*;

use crate::copy_state::CopyState;
use crate::toast::Toasts;

/// How long a block shows "Copied!"
pub const COPY_RESET_DELAY: Duration = Duration::from_millis(2000);

pub const COPY_SUCCESS_TOAST: &str = "SQL code copied!";
pub const COPY_FAILURE_TOAST: &str = "Failed to copy code";

/// Write access to the system clipboard
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Outcome of a copy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the clipboard; reset with this generation after the delay
    Copied { generation: u64 },
    /// Nothing changed besides the error toast
    Failed { reason: String },
}

/// Clipboard that always fails; used when no terminal clipboard exists
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(Error::clipboard("no clipboard available"))
    }
}

/// Copies code blocks through an injected [`Clipboard`]
pub struct ClipboardBridge {
    clipboard: Box<dyn Clipboard>,
}

impl ClipboardBridge {
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self { clipboard }
    }

    /// Copy `text` for the block identified by `key`.
    ///
    /// On success `key` becomes the active key immediately. On failure the
    /// copy state is left untouched. No retry either way.
    pub fn copy(
        &mut self,
        text: &str,
        key: &str,
        copy_state: &mut CopyState,
        toasts: &mut Toasts,
    ) -> CopyOutcome {
        match self.clipboard.set_text(text) {
            Ok(()) => {
                let generation = copy_state.activate(key);
                debug!(key, generation, "copied code block");
                toasts.success(COPY_SUCCESS_TOAST);
                CopyOutcome::Copied { generation }
            }
            Err(e) => {
                warn!(key, "copy failed: {e}");
                toasts.error(COPY_FAILURE_TOAST);
                CopyOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for ClipboardBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastKind;
    use mockall::predicate::eq;

    #[test]
    fn test_successful_copy_activates_key() {
        let mut mock = MockClipboard::new();
        mock.expect_set_text()
            .with(eq("SELECT 1"))
            .times(1)
            .returning(|_| Ok(()));

        let mut bridge = ClipboardBridge::new(Box::new(mock));
        let mut copy_state = CopyState::default();
        let mut toasts = Toasts::default();

        let outcome = bridge.copy("SELECT 1", "1700-1", &mut copy_state, &mut toasts);

        assert_eq!(outcome, CopyOutcome::Copied { generation: 1 });
        assert!(copy_state.is_active("1700-1"));
        let toast = toasts.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, COPY_SUCCESS_TOAST);
    }

    #[test]
    fn test_failed_copy_leaves_state_untouched() {
        let mut mock = MockClipboard::new();
        mock.expect_set_text()
            .times(1)
            .returning(|_| Err(Error::clipboard("denied")));

        let mut bridge = ClipboardBridge::new(Box::new(mock));
        let mut copy_state = CopyState::default();
        copy_state.activate("earlier");
        let before = copy_state.clone();
        let mut toasts = Toasts::default();

        let outcome = bridge.copy("SELECT 1", "key", &mut copy_state, &mut toasts);

        assert!(matches!(outcome, CopyOutcome::Failed { .. }));
        assert_eq!(copy_state, before);
        assert_eq!(toasts.latest().unwrap().message, COPY_FAILURE_TOAST);
        assert_eq!(toasts.error_count(), 1);
    }

    #[test]
    fn test_no_clipboard_always_fails() {
        let mut bridge = ClipboardBridge::new(Box::new(NoClipboard));
        let mut copy_state = CopyState::default();
        let mut toasts = Toasts::default();

        let outcome = bridge.copy("x", "k", &mut copy_state, &mut toasts);
        assert!(matches!(outcome, CopyOutcome::Failed { .. }));
        assert_eq!(copy_state.active_key(), None);
    }
}
