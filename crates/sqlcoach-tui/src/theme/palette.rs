//! Color palette.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Reset;
pub const CARD_BG: Color = Color::Reset;
pub const POPUP_BG: Color = Color::Rgb(28, 33, 43);
pub const CODE_BG: Color = Color::Rgb(22, 27, 34);
pub const CODE_HEADER_BG: Color = Color::Rgb(45, 51, 59);

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;
pub const CONTRAST_FG: Color = Color::Black;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const TEXT_BRIGHT: Color = Color::White;
pub const INLINE_CODE_FG: Color = Color::LightMagenta;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;
pub const STATUS_BLUE: Color = Color::Blue;

// --- Chat bubbles ---
pub const USER_BUBBLE: Color = Color::LightBlue;
pub const ASSISTANT_BUBBLE: Color = Color::LightGreen;
