//! Terminal setup and restoration

use ratatui::DefaultTerminal;
use sqlcoach_core::prelude::*;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Raw mode + alternate screen, restored when dropped
pub struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    pub fn init() -> Result<Self> {
        install_panic_hook();
        let terminal = ratatui::try_init()
            .map_err(|e| Error::TerminalInit(e.to_string()))?;
        debug!("Terminal initialized");
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut DefaultTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
        debug!("Terminal restored");
    }
}
