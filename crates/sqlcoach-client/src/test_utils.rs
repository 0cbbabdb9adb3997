//! Scripted in-memory backend for tests
//!
//! `FakeBackend` records every call (with its JSON body for POSTs) and answers
//! from scripted data. Any operation can be switched to fail with a network
//! error via [`FakeBackend::fail`].

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;
use sqlcoach_core::prelude::*;
use sqlcoach_core::{
    BusinessQuestion, ChatReply, ChatRequest, CheatSheetEntry, DetailedAnalytics, Difficulty,
    DynamicExample, DynamicExampleRequest, EvaluateAnswerRequest, Evaluation, HealthStatus,
    LearningModule, LearningPath, ModuleProgress, UserAnalytics,
};

use crate::backend::Backend;
use crate::endpoints::Endpoint;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<RecordedCall>,
    failing: HashSet<&'static str>,
    cheat_sheet: Vec<CheatSheetEntry>,
    example: Option<DynamicExample>,
    modules: Vec<LearningModule>,
    questions: VecDeque<BusinessQuestion>,
    question_counter: u32,
    evaluations: VecDeque<Evaluation>,
    progress: Vec<ModuleProgress>,
    analytics: UserAnalytics,
    detailed: DetailedAnalytics,
    learning_path: LearningPath,
    chat_replies: VecDeque<ChatReply>,
}

/// Cloneable scripted backend; clones share state
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A panicking test thread poisons the lock; the data is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the operation named `op` (see [`Endpoint::name`]) fail
    pub fn fail(&self, op: &'static str) -> &Self {
        self.lock().failing.insert(op);
        self
    }

    /// Stop failing `op`
    pub fn recover(&self, op: &'static str) -> &Self {
        self.lock().failing.remove(op);
        self
    }

    pub fn with_cheat_sheet(self, entries: Vec<CheatSheetEntry>) -> Self {
        self.lock().cheat_sheet = entries;
        self
    }

    pub fn with_example(self, example: DynamicExample) -> Self {
        self.lock().example = Some(example);
        self
    }

    pub fn with_modules(self, modules: Vec<LearningModule>) -> Self {
        self.lock().modules = modules;
        self
    }

    /// Queue a question; once the queue is empty questions are generated
    pub fn push_question(&self, question: BusinessQuestion) -> &Self {
        self.lock().questions.push_back(question);
        self
    }

    pub fn push_evaluation(&self, evaluation: Evaluation) -> &Self {
        self.lock().evaluations.push_back(evaluation);
        self
    }

    pub fn with_progress(self, progress: Vec<ModuleProgress>) -> Self {
        self.lock().progress = progress;
        self
    }

    pub fn with_analytics(
        self,
        analytics: UserAnalytics,
        detailed: DetailedAnalytics,
        learning_path: LearningPath,
    ) -> Self {
        {
            let mut state = self.lock();
            state.analytics = analytics;
            state.detailed = detailed;
            state.learning_path = learning_path;
        }
        self
    }

    pub fn push_chat_reply(&self, reply: ChatReply) -> &Self {
        self.lock().chat_replies.push_back(reply);
        self
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls to the operation named `op`
    pub fn calls_to(&self, op: &str) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint.name() == op)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls_to(op).len()
    }

    /// Record the call and return the locked state, or the scripted failure
    fn begin(&self, endpoint: Endpoint, body: Option<Value>) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        let name = endpoint.name();
        state.calls.push(RecordedCall { endpoint, body });

        if state.failing.contains(name) {
            return Err(Error::network(format!("scripted failure for {name}")));
        }
        Ok(state)
    }

    fn body<T: Serialize>(value: &T) -> Option<Value> {
        serde_json::to_value(value).ok()
    }
}

/// Entry fixture
pub fn test_entry(id: i64, command: &str, category: &str) -> CheatSheetEntry {
    CheatSheetEntry {
        id,
        command: command.to_string(),
        category: category.to_string(),
        syntax: format!("{command} ..."),
        example: format!("{command} * FROM orders;"),
        description: None,
        tags: None,
    }
}

/// Module fixture
pub fn test_module(id: i64, name: &str) -> LearningModule {
    LearningModule {
        id,
        name: name.to_string(),
        description: format!("Learn {name}"),
        order_index: id,
        difficulty_level: "beginner".to_string(),
    }
}

/// Question fixture
pub fn test_question(module_id: i64, difficulty: Difficulty, n: u32) -> BusinessQuestion {
    BusinessQuestion {
        question_id: format!("{module_id}_{difficulty}_{n}"),
        module_id: Some(Value::from(module_id)),
        module_name: None,
        difficulty,
        question: format!("Question {n}: list the orders.\n```sql\nSELECT * FROM orders\n```"),
        hints: vec!["Start with `SELECT`".to_string()],
        expected_sql: Some("SELECT * FROM orders".to_string()),
    }
}

impl Backend for FakeBackend {
    async fn cheat_sheet(&self) -> Result<Vec<CheatSheetEntry>> {
        Ok(self.begin(Endpoint::CheatSheet, None)?.cheat_sheet.clone())
    }

    async fn cheat_sheet_by_category(&self, category: &str) -> Result<Vec<CheatSheetEntry>> {
        let state = self.begin(Endpoint::CheatSheetByCategory(category.to_string()), None)?;
        Ok(state
            .cheat_sheet
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect())
    }

    async fn search_cheat_sheet(&self, term: &str) -> Result<Vec<CheatSheetEntry>> {
        let state = self.begin(Endpoint::SearchCheatSheet(term.to_string()), None)?;
        Ok(state
            .cheat_sheet
            .iter()
            .filter(|e| e.matches(term))
            .cloned()
            .collect())
    }

    async fn dynamic_example(&self, request: &DynamicExampleRequest) -> Result<DynamicExample> {
        let state = self.begin(Endpoint::DynamicExample, Self::body(request))?;
        Ok(state.example.clone().unwrap_or_else(|| DynamicExample {
            scenario: format!("{} at an online store", request.command),
            business_context: "Orders placed this week".to_string(),
            table_description: None,
            sql_example: format!("{} * FROM orders;", request.command),
            explanation: "Filters the **orders** table.".to_string(),
            sample_data: None,
        }))
    }

    async fn modules(&self) -> Result<Vec<LearningModule>> {
        Ok(self.begin(Endpoint::Modules, None)?.modules.clone())
    }

    async fn module(&self, module_id: i64) -> Result<LearningModule> {
        let state = self.begin(Endpoint::Module(module_id), None)?;
        state
            .modules
            .iter()
            .find(|m| m.id == module_id)
            .cloned()
            .ok_or_else(|| Error::http(404, "Module not found"))
    }

    async fn business_question(
        &self,
        module_id: i64,
        difficulty: Difficulty,
    ) -> Result<BusinessQuestion> {
        let mut state = self.begin(
            Endpoint::BusinessQuestion {
                module_id,
                difficulty,
            },
            None,
        )?;
        state.question_counter += 1;
        let n = state.question_counter;
        Ok(state
            .questions
            .pop_front()
            .unwrap_or_else(|| test_question(module_id, difficulty, n)))
    }

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> Result<Evaluation> {
        let mut state = self.begin(Endpoint::EvaluateAnswer, Self::body(request))?;
        Ok(state.evaluations.pop_front().unwrap_or_else(|| Evaluation {
            is_correct: true,
            score: 1.0,
            feedback: "Correct!".to_string(),
            ..Default::default()
        }))
    }

    async fn progress(&self, user_id: &str) -> Result<Vec<ModuleProgress>> {
        Ok(self
            .begin(Endpoint::Progress(user_id.to_string()), None)?
            .progress
            .clone())
    }

    async fn analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        Ok(self
            .begin(Endpoint::Analytics(user_id.to_string()), None)?
            .analytics
            .clone())
    }

    async fn detailed_analytics(&self, user_id: &str) -> Result<DetailedAnalytics> {
        Ok(self
            .begin(Endpoint::DetailedAnalytics(user_id.to_string()), None)?
            .detailed
            .clone())
    }

    async fn learning_path(&self, user_id: &str) -> Result<LearningPath> {
        Ok(self
            .begin(Endpoint::LearningPath(user_id.to_string()), None)?
            .learning_path
            .clone())
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let mut state = self.begin(Endpoint::ChatMessage, Self::body(request))?;
        Ok(state.chat_replies.pop_front().unwrap_or_else(|| ChatReply {
            response: format!("You asked: {}", request.message),
            suggested_actions: Vec::new(),
            context_aware: Some(true),
        }))
    }

    async fn clear_chat(&self) -> Result<()> {
        self.begin(Endpoint::ChatClear, None)?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.begin(Endpoint::Health, None)?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            message: None,
        })
    }

    async fn chatbot_health(&self) -> Result<HealthStatus> {
        self.begin(Endpoint::ChatHealth, None)?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            message: None,
        })
    }
}
