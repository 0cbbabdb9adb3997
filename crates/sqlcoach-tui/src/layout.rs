//! Screen layout definitions for the TUI
//!
//! Header on top, one-row status bar at the bottom, the active screen in
//! between. An open chat panel docks on the right, or takes the whole body
//! when full screen or when the terminal is too narrow to share.

use ratatui::layout::{Constraint, Layout, Rect};

/// Narrowest terminal that shows the docked chat next to the screen
pub const MIN_SPLIT_WIDTH: u16 = 90;

/// Chat panel placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPlacement {
    Closed,
    Docked,
    FullScreen,
}

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, navigation tabs and backend status
    pub header: Rect,

    /// The active screen; empty when the chat covers the body
    pub body: Rect,

    pub chat: Option<Rect>,

    /// Key hints
    pub status: Rect,
}

pub fn create(area: Rect, chat: ChatPlacement) -> ScreenAreas {
    let [header, middle, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let (body, chat) = match chat {
        ChatPlacement::Closed => (middle, None),
        ChatPlacement::Docked if middle.width >= MIN_SPLIT_WIDTH => {
            let [body, chat] =
                Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                    .areas(middle);
            (body, Some(chat))
        }
        ChatPlacement::Docked | ChatPlacement::FullScreen => {
            (Rect::new(middle.x, middle.y, 0, 0), Some(middle))
        }
    };

    ScreenAreas {
        header,
        body,
        chat,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_chat_gives_body_everything() {
        let layout = create(Rect::new(0, 0, 80, 24), ChatPlacement::Closed);

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 23);
        assert_eq!(layout.body.height, 20);
        assert_eq!(layout.body.y, 3);
        assert!(layout.chat.is_none());
    }

    #[test]
    fn test_docked_chat_splits_wide_terminals() {
        let layout = create(Rect::new(0, 0, 120, 30), ChatPlacement::Docked);
        let chat = layout.chat.unwrap();

        assert_eq!(layout.body.width + chat.width, 120);
        assert_eq!(chat.x, layout.body.width);
        assert_eq!(chat.height, layout.body.height);
    }

    #[test]
    fn test_docked_chat_covers_narrow_terminals() {
        let layout = create(Rect::new(0, 0, 80, 24), ChatPlacement::Docked);

        assert_eq!(layout.chat.unwrap().width, 80);
        assert!(layout.body.is_empty());
    }

    #[test]
    fn test_fullscreen_chat_covers_body() {
        let layout = create(Rect::new(0, 0, 120, 30), ChatPlacement::FullScreen);

        assert_eq!(layout.chat.unwrap(), Rect::new(0, 3, 120, 26));
        assert!(layout.body.is_empty());
    }
}
