//! Domain types exchanged with the learning backend
//!
//! Field names follow the backend's JSON (snake_case). Optional fields are
//! defaulted so that partially populated responses still decode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a backend label, ignoring case. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level screen the user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Cheatsheet,
    Practice,
    Analysis,
    #[default]
    Dashboard,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Cheatsheet => "cheatsheet",
            Page::Practice => "practice",
            Page::Analysis => "analysis",
            Page::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cheat sheet
// ─────────────────────────────────────────────────────────────────────────────

/// One reference entry of the cheat sheet
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheatSheetEntry {
    pub id: i64,
    /// Command name, e.g. `SELECT` or `LEFT JOIN`
    #[serde(default, alias = "topic")]
    pub command: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl CheatSheetEntry {
    /// Case-insensitive match of `term` against command, category and syntax
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.command.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
            || self.syntax.to_lowercase().contains(&term)
    }
}

/// Request body for a contextual cheat-sheet example
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicExampleRequest {
    pub command: String,
    pub syntax: String,
    pub category: String,
}

/// Shown when an entry without a command asks for an example
pub const MISSING_COMMAND: &str = "No command available for this cheat sheet item";

impl TryFrom<&CheatSheetEntry> for DynamicExampleRequest {
    type Error = Error;

    /// Entries without a command have nothing to build an example around
    fn try_from(entry: &CheatSheetEntry) -> Result<Self> {
        if entry.command.trim().is_empty() {
            return Err(Error::validation(MISSING_COMMAND));
        }
        Ok(Self {
            command: entry.command.clone(),
            syntax: entry.syntax.clone(),
            category: entry.category.clone(),
        })
    }
}

/// A generated business-scenario example for a cheat-sheet entry
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DynamicExample {
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub business_context: String,
    #[serde(default)]
    pub table_description: Option<String>,
    #[serde(default)]
    pub sql_example: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub sample_data: Option<String>,
}

impl DynamicExample {
    /// Example shown when generation fails: the entry's static example
    pub fn fallback_for(entry: &CheatSheetEntry) -> Self {
        Self {
            scenario: "Real-Time Scenario".to_string(),
            business_context: "Unable to generate real-time example at this time.".to_string(),
            table_description: None,
            sql_example: entry.example.clone(),
            explanation: "Please try again later or refer to the static example provided."
                .to_string(),
            sample_data: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Practice
// ─────────────────────────────────────────────────────────────────────────────

/// A practice module
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LearningModule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order_index: i64,
    /// beginner / intermediate / advanced
    #[serde(default)]
    pub difficulty_level: String,
}

/// An adaptive, backend-generated business question
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BusinessQuestion {
    pub question_id: String,
    #[serde(default)]
    pub module_id: Option<serde_json::Value>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Markdown text, may contain fenced SQL
    pub question: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub expected_sql: Option<String>,
}

/// Request body for answer evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluateAnswerRequest {
    pub question_id: String,
    pub user_sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_sql: Option<String>,
    pub question_context: String,
    pub user_id: String,
}

/// Backend verdict on a submitted answer
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Evaluation {
    #[serde(default)]
    pub is_correct: bool,
    /// 0.0–1.0, or 0–100 from some backends (see [`Evaluation::normalized_score`])
    #[serde(default)]
    pub score: f64,
    /// Markdown, may contain fenced SQL
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub correct_sql: Option<String>,
    #[serde(default)]
    pub next_difficulty: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub business_impact: Option<String>,
}

impl Evaluation {
    /// Score in the 0.0–1.0 range. Values above 1.0 are percentages.
    pub fn normalized_score(&self) -> f64 {
        let score = if self.score > 1.0 {
            self.score / 100.0
        } else {
            self.score
        };
        score.clamp(0.0, 1.0)
    }

    /// Score as a whole percentage for display
    pub fn percent(&self) -> u32 {
        (self.normalized_score() * 100.0).round() as u32
    }
}

/// The user's progress in one module
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModuleProgress {
    pub module_id: i64,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub questions_attempted: u32,
    #[serde(default)]
    pub questions_correct: u32,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub current_difficulty: Difficulty,
}

impl ModuleProgress {
    /// Progress for a module the user has not started
    pub fn not_started(module_id: i64) -> Self {
        Self {
            module_id,
            module_name: None,
            questions_attempted: 0,
            questions_correct: 0,
            completion_percentage: 0.0,
            current_difficulty: Difficulty::Easy,
        }
    }

    pub fn is_started(&self) -> bool {
        self.questions_attempted > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate analytics for a user
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct UserAnalytics {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub total_questions_attempted: u32,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub overall_accuracy: f64,
    #[serde(default)]
    pub modules_progress: Vec<ModuleProgress>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
}

/// Average score for one day
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyPerformance {
    pub date: String,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub correct: u32,
}

/// Attempts grouped by difficulty
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DifficultyBucket {
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub correct: u32,
}

/// Detailed analytics for charts
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DetailedAnalytics {
    #[serde(default)]
    pub performance_over_time: Vec<DailyPerformance>,
    #[serde(default)]
    pub difficulty_distribution: Vec<DifficultyBucket>,
}

/// Priority of a learning-path suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// One learning-path recommendation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LearningSuggestion {
    /// continue_module / increase_difficulty / start_module
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub module_name: String,
    /// Markdown, may contain fenced SQL
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Learning-path response
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LearningPath {
    #[serde(default)]
    pub suggestions: Vec<LearningSuggestion>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Request annotation describing where the user is
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageContext {
    pub page: String,
    pub module: String,
    pub question: String,
    pub progress: serde_json::Map<String, serde_json::Value>,
}

/// Request body for a chat turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: PageContext,
}

/// Assistant reply for a chat turn
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub context_aware: Option<bool>,
}

/// Liveness probe response
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn test_example_request_needs_a_command() {
        let mut entry = CheatSheetEntry {
            id: 7,
            command: "GROUP BY".into(),
            category: "Aggregation".into(),
            syntax: "GROUP BY column".into(),
            example: String::new(),
            description: None,
            tags: None,
        };
        let request = DynamicExampleRequest::try_from(&entry).unwrap();
        assert_eq!(request.command, "GROUP BY");
        assert_eq!(request.category, "Aggregation");

        entry.command = "   ".into();
        let err = DynamicExampleRequest::try_from(&entry).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.to_string(), MISSING_COMMAND);
    }

    #[test]
    fn test_cheatsheet_entry_accepts_topic_alias() {
        let entry: CheatSheetEntry = serde_json::from_str(
            r#"{"id":3,"topic":"SELECT","category":"Basics","syntax":"SELECT col FROM t","example":"SELECT 1"}"#,
        )
        .unwrap();
        assert_eq!(entry.command, "SELECT");
        assert!(entry.description.is_none());
    }

    #[test]
    fn test_cheatsheet_entry_matches_case_insensitively() {
        let entry = CheatSheetEntry {
            id: 1,
            command: "LEFT JOIN".into(),
            category: "Joins".into(),
            syntax: "SELECT ... LEFT JOIN ...".into(),
            example: String::new(),
            description: None,
            tags: None,
        };
        assert!(entry.matches("left"));
        assert!(entry.matches("JOINS"));
        assert!(!entry.matches("window"));
    }

    #[test]
    fn test_evaluation_normalizes_percentages() {
        let eval = Evaluation {
            score: 85.0,
            ..Default::default()
        };
        assert!((eval.normalized_score() - 0.85).abs() < 1e-9);
        assert_eq!(eval.percent(), 85);

        let eval = Evaluation {
            score: 0.8,
            ..Default::default()
        };
        assert_eq!(eval.percent(), 80);
    }

    #[test]
    fn test_business_question_defaults() {
        let q: BusinessQuestion =
            serde_json::from_str(r#"{"question_id":"1_easy_1234","question":"Find all rows"}"#)
                .unwrap();
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert!(q.hints.is_empty());
    }

    #[test]
    fn test_learning_suggestion_type_field() {
        let s: LearningSuggestion = serde_json::from_str(
            r#"{"type":"start_module","module_name":"Joins","reason":"Ready?","priority":"low"}"#,
        )
        .unwrap();
        assert_eq!(s.kind, "start_module");
        assert_eq!(s.priority, Priority::Low);
    }

    #[test]
    fn test_health_status() {
        let h = HealthStatus {
            status: "healthy".into(),
            message: None,
        };
        assert!(h.is_healthy());
        assert!(!HealthStatus::default().is_healthy());
    }
}
