//! # sqlcoach-core - Core Domain Types
//!
//! Foundation crate for SQL Coach. Provides domain types, error handling,
//! logging setup and content segmentation.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Segmentation (`segment`)
//! - [`segments()`] / [`segment()`] - Split backend text into prose and SQL code
//! - [`Segment`], [`SegmentKind`] - One typed slice of a text
//!
//! ### Domain Types (`types`)
//! - [`CheatSheetEntry`], [`LearningModule`], [`BusinessQuestion`], [`Evaluation`]
//! - [`UserAnalytics`], [`DetailedAnalytics`], [`LearningPath`]
//! - [`ChatRequest`], [`ChatReply`], [`PageContext`]
//!
//! ### Conversation (`chat`, `context`)
//! - [`ChatMessage`] - In-memory chat entry
//! - [`ConversationalContext`], [`ContextUpdate`] - "Where is the user" record
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum, one variant family per layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use sqlcoach_core::prelude::*;
//! ```

pub mod chat;
pub mod context;
pub mod error;
pub mod logging;
pub mod segment;
pub mod types;

/// Prelude for common imports used throughout all SQL Coach crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use chat::{ChatMessage, ChatRole};
pub use context::{ContextUpdate, ConversationalContext};
pub use error::{Error, Result};
pub use segment::{reassemble, segment, segments, Segment, SegmentKind, Segments};
pub use types::{
    BusinessQuestion, ChatReply, ChatRequest, CheatSheetEntry, DailyPerformance,
    DetailedAnalytics, Difficulty, DifficultyBucket, DynamicExample, DynamicExampleRequest,
    EvaluateAnswerRequest, Evaluation, HealthStatus, LearningModule, LearningPath,
    LearningSuggestion, ModuleProgress, Page, PageContext, Priority, UserAnalytics,
};
