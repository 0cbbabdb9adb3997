//! Cheat sheet screen state

use sqlcoach_core::{CheatSheetEntry, DynamicExample};

/// Category label that disables category filtering
pub const ALL_CATEGORIES: &str = "All";

/// A generated (or fallback) example shown in the example modal
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleView {
    pub entry_id: i64,
    pub command: String,
    pub example: DynamicExample,
    /// True when generation failed and the static example is shown
    pub fallback: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CheatSheetState {
    pub entries: Vec<CheatSheetEntry>,
    pub loading: bool,
    pub loaded: bool,
    /// Index into [`Self::categories`]; 0 is "All"
    pub category_index: usize,
    pub search: String,
    /// Search field has keyboard focus
    pub searching: bool,
    /// Index into [`Self::filtered`]
    pub selected: usize,
    /// Entry whose example is being generated
    pub generating: Option<i64>,
    pub example: Option<ExampleView>,
}

impl CheatSheetState {
    /// "All" followed by the distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for entry in &self.entries {
            if !entry.category.is_empty() && !categories.contains(&entry.category) {
                categories.push(entry.category.clone());
            }
        }
        categories
    }

    pub fn active_category(&self) -> String {
        self.categories()
            .into_iter()
            .nth(self.category_index)
            .unwrap_or_else(|| ALL_CATEGORIES.to_string())
    }

    /// Entries matching the category and the search term
    pub fn filtered(&self) -> Vec<&CheatSheetEntry> {
        let category = self.active_category();
        let term = self.search.trim();

        self.entries
            .iter()
            .filter(|e| category == ALL_CATEGORIES || e.category == category)
            .filter(|e| term.is_empty() || e.matches(term))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&CheatSheetEntry> {
        self.filtered().get(self.selected).copied()
    }

    pub fn set_entries(&mut self, entries: Vec<CheatSheetEntry>) {
        self.entries = entries;
        self.loading = false;
        self.loaded = true;
        self.clamp();
    }

    pub fn select_next(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn next_category(&mut self) {
        let count = self.categories().len();
        self.category_index = (self.category_index + 1) % count;
        self.selected = 0;
    }

    pub fn prev_category(&mut self) {
        let count = self.categories().len();
        self.category_index = (self.category_index + count - 1) % count;
        self.selected = 0;
    }

    pub fn set_search(&mut self, text: String) {
        self.search = text;
        self.selected = 0;
    }

    fn clamp(&mut self) {
        if self.category_index >= self.categories().len() {
            self.category_index = 0;
        }
        let len = self.filtered().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
