//! Cheat sheet handlers

use sqlcoach_core::prelude::*;
use sqlcoach_core::{CheatSheetEntry, DynamicExample, DynamicExampleRequest};

use crate::cheatsheet::ExampleView;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub const LOAD_FAILED_TOAST: &str = "Failed to load cheat sheet";
pub const EXAMPLE_FAILED_TOAST: &str = "Failed to generate real-time example";

pub fn handle_loaded(state: &mut AppState, entries: Vec<CheatSheetEntry>) -> UpdateResult {
    debug!("Cheat sheet loaded: {} entries", entries.len());
    state.cheatsheet.set_entries(entries);
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Cheat sheet load failed: {}", error);
    // Not marked loaded, so the next visit retries
    state.cheatsheet.loading = false;
    state.toasts.error(LOAD_FAILED_TOAST);
    UpdateResult::none()
}

/// Request a business example for the selected entry
pub fn handle_generate_example(state: &mut AppState) -> UpdateResult {
    if state.cheatsheet.generating.is_some() {
        return UpdateResult::none();
    }

    let Some(entry) = state.cheatsheet.selected_entry() else {
        return UpdateResult::none();
    };

    let entry_id = entry.id;
    let request = match DynamicExampleRequest::try_from(entry) {
        Ok(request) => request,
        Err(e) => {
            state.toasts.error(e.to_string());
            return UpdateResult::none();
        }
    };

    state.cheatsheet.generating = Some(entry_id);
    state.cheatsheet.example = None;

    UpdateResult::action(UpdateAction::GenerateExample { entry_id, request })
}

pub fn handle_example_generated(
    state: &mut AppState,
    entry_id: i64,
    example: DynamicExample,
) -> UpdateResult {
    if state.cheatsheet.generating != Some(entry_id) {
        debug!("Dropping example for entry {}: no longer requested", entry_id);
        return UpdateResult::none();
    }
    state.cheatsheet.generating = None;

    let command = entry_command(state, entry_id);
    state.cheatsheet.example = Some(ExampleView {
        entry_id,
        command,
        example,
        fallback: false,
    });
    state.copy_focus.clear();
    UpdateResult::none()
}

/// Show the entry's static example in place of a generated one
pub fn handle_example_failed(state: &mut AppState, entry_id: i64, error: String) -> UpdateResult {
    if state.cheatsheet.generating != Some(entry_id) {
        return UpdateResult::none();
    }
    warn!("Example generation for entry {} failed: {}", entry_id, error);
    state.cheatsheet.generating = None;
    state.toasts.error(EXAMPLE_FAILED_TOAST);

    if let Some(entry) = state.cheatsheet.entries.iter().find(|e| e.id == entry_id) {
        state.cheatsheet.example = Some(ExampleView {
            entry_id,
            command: entry.command.clone(),
            example: DynamicExample::fallback_for(entry),
            fallback: true,
        });
        state.copy_focus.clear();
    }
    UpdateResult::none()
}

fn entry_command(state: &AppState, entry_id: i64) -> String {
    state
        .cheatsheet
        .entries
        .iter()
        .find(|e| e.id == entry_id)
        .map(|e| e.command.clone())
        .unwrap_or_default()
}
