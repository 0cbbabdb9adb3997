//! "Which code block was just copied" state and copy targeting

/// Transient copy feedback: at most one block shows "Copied!" at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyState {
    active_key: Option<String>,
    generation: u64,
}

impl CopyState {
    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active_key.as_deref() == Some(key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark `key` as copied; returns the generation to pass to [`Self::reset_if`]
    pub fn activate(&mut self, key: impl Into<String>) -> u64 {
        self.generation += 1;
        self.active_key = Some(key.into());
        self.generation
    }

    /// Clear the active key unless a newer copy superseded `generation`.
    ///
    /// Returns true when the key was cleared.
    pub fn reset_if(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.active_key.is_none() {
            return false;
        }
        self.active_key = None;
        true
    }
}

/// A copyable code block currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub key: String,
    pub text: String,
}

impl CopyTarget {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// Keyboard focus over the visible copy targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyFocus {
    /// Key of the focused block; survives re-layout as long as it stays visible
    key: Option<String>,
}

impl CopyFocus {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn clear(&mut self) {
        self.key = None;
    }

    /// The focused target, falling back to the first one
    pub fn resolve<'a>(&self, targets: &'a [CopyTarget]) -> Option<&'a CopyTarget> {
        self.key
            .as_deref()
            .and_then(|key| targets.iter().find(|t| t.key == key))
            .or_else(|| targets.first())
    }

    pub fn next(&mut self, targets: &[CopyTarget]) {
        self.step(targets, true);
    }

    pub fn prev(&mut self, targets: &[CopyTarget]) {
        self.step(targets, false);
    }

    fn step(&mut self, targets: &[CopyTarget], forward: bool) {
        if targets.is_empty() {
            self.key = None;
            return;
        }

        let current = self
            .key
            .as_deref()
            .and_then(|key| targets.iter().position(|t| t.key == key));

        let len = targets.len();
        let index = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            // First press focuses the first (or last, going backwards) block
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.key = Some(targets[index].key.clone());
    }
}
