//! System clipboard through the terminal (OSC 52)
//!
//! The escape sequence is handled by the terminal emulator, so copying also
//! works over SSH. Terminals without OSC 52 support silently ignore it.

use std::io::{self, Write};

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use sqlcoach_app::Clipboard;
use sqlcoach_core::prelude::*;

/// Writes the clipboard with an OSC 52 sequence on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, CopyToClipboard::to_clipboard_from(text))
            .and_then(|()| stdout.flush())
            .map_err(|e| Error::clipboard(e.to_string()))?;
        trace!("Copied {} bytes via OSC 52", text.len());
        Ok(())
    }
}
