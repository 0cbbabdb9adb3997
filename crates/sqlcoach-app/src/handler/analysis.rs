//! Analytics dashboard handlers

use sqlcoach_core::prelude::*;

use crate::analysis::AnalysisData;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub const LOAD_FAILED_TOAST: &str = "Failed to load analytics";

pub fn handle_refresh(state: &mut AppState) -> UpdateResult {
    let generation = state.analysis.begin_request();
    UpdateResult::action(UpdateAction::LoadAnalysis {
        user_id: state.user_id.clone(),
        generation,
    })
}

pub fn handle_loaded(state: &mut AppState, generation: u64, data: AnalysisData) -> UpdateResult {
    if !state.analysis.accepts(generation) {
        debug!("Dropping stale analytics (generation {})", generation);
        return UpdateResult::none();
    }
    state.analysis.loading = false;
    state.analysis.data = Some(data);
    state.copy_focus.clear();
    UpdateResult::none()
}

/// Previously loaded data stays on screen
pub fn handle_failed(state: &mut AppState, generation: u64, error: String) -> UpdateResult {
    if !state.analysis.accepts(generation) {
        return UpdateResult::none();
    }
    warn!("Analytics load failed: {}", error);
    state.analysis.loading = false;
    state.toasts.error(LOAD_FAILED_TOAST);
    UpdateResult::none()
}
