//! End-to-end flows through process_message against a scripted backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use sqlcoach_app::actions::handle_action;
use sqlcoach_app::clipboard::{Clipboard, ClipboardBridge, COPY_RESET_DELAY};
use sqlcoach_app::practice::PracticePhase;
use sqlcoach_app::{process_message, AppState, Message, Runtime, Screen, UpdateAction};
use sqlcoach_client::test_utils::{test_entry, test_module, FakeBackend};
use sqlcoach_core::{ChatReply, Evaluation, Page};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Clipboard that records what was written
#[derive(Clone, Default)]
struct RecordingClipboard {
    written: Arc<Mutex<Vec<String>>>,
}

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> sqlcoach_core::Result<()> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Harness {
    state: AppState,
    backend: FakeBackend,
    runtime: Runtime<FakeBackend>,
    msg_rx: mpsc::Receiver<Message>,
    clipboard: RecordingClipboard,
}

impl Harness {
    fn new(backend: FakeBackend) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(64);
        let clipboard = RecordingClipboard::default();
        let runtime = Runtime::new(
            Arc::new(backend.clone()),
            msg_tx,
            ClipboardBridge::new(Box::new(clipboard.clone())),
        );
        Self {
            state: AppState::default(),
            backend,
            runtime,
            msg_rx,
            clipboard,
        }
    }

    fn send(&mut self, msg: Message) {
        process_message(&mut self.state, msg, &mut self.runtime);
    }

    /// Process background results until `done` holds
    async fn settle(&mut self, done: impl Fn(&AppState) -> bool) {
        while !done(&self.state) {
            let msg = timeout(Duration::from_secs(5), self.msg_rx.recv())
                .await
                .expect("timed out waiting for a message")
                .expect("channel closed");
            process_message(&mut self.state, msg, &mut self.runtime);
        }
    }
}

fn backend() -> FakeBackend {
    FakeBackend::new()
        .with_cheat_sheet(vec![
            test_entry(1, "SELECT", "Basics"),
            test_entry(2, "LEFT JOIN", "Joins"),
        ])
        .with_modules(vec![test_module(1, "Basics"), test_module(2, "Joins")])
}

#[tokio::test]
async fn test_practice_flow_adapts_difficulty() {
    let backend = backend();
    backend.push_evaluation(Evaluation {
        is_correct: true,
        score: 0.95,
        feedback: "Great".into(),
        ..Default::default()
    });
    let mut h = Harness::new(backend);

    h.send(Message::Navigate(Screen::PracticeList));
    h.settle(|s| s.practice_list.loaded).await;
    assert_eq!(h.state.practice_list.modules.len(), 2);
    assert_eq!(h.backend.call_count("progress"), 1);

    h.send(Message::PracticeSelectNext);
    h.send(Message::OpenSelectedModule);
    h.settle(|s| {
        s.practice
            .as_ref()
            .is_some_and(|p| p.phase == PracticePhase::QuestionPresented)
    })
    .await;

    let ctx = h.state.context.snapshot();
    assert_eq!(ctx.current_page, Page::Practice);
    assert_eq!(ctx.current_module, "Joins");

    let question_call = &h.backend.calls_to("business_question")[0];
    assert_eq!(question_call.endpoint.path(), "/modules/2/business-question");

    h.send(Message::StartEditing);
    h.send(Message::AnswerChanged {
        text: "SELECT * FROM orders".into(),
    });
    h.send(Message::SubmitAnswer);
    h.settle(|s| {
        s.practice
            .as_ref()
            .is_some_and(|p| matches!(p.phase, PracticePhase::AnswerSubmitted(_)))
    })
    .await;

    let body = h.backend.calls_to("evaluate_answer")[0].body.clone().unwrap();
    assert_eq!(body["user_sql"], "SELECT * FROM orders");
    assert_eq!(body["user_id"], "user_local");

    h.send(Message::NextQuestion);
    h.settle(|s| s.practice.as_ref().is_some_and(|p| p.question_count == 2))
        .await;

    let calls = h.backend.calls_to("business_question");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].endpoint.query(), vec![("difficulty", "medium".to_string())]);
    assert_eq!(h.state.context.snapshot().user_progress["questionCount"], json!(2));
}

#[tokio::test]
async fn test_empty_submit_sends_no_request() {
    let mut h = Harness::new(backend());
    h.send(Message::OpenModule { module_id: 1 });
    h.settle(|s| {
        s.practice
            .as_ref()
            .is_some_and(|p| p.phase == PracticePhase::QuestionPresented)
    })
    .await;

    h.send(Message::SubmitAnswer);

    assert_eq!(h.backend.call_count("evaluate_answer"), 0);
    assert_eq!(h.state.toasts.error_count(), 1);
}

#[tokio::test]
async fn test_module_failure_is_all_or_nothing() {
    let backend = backend();
    backend.fail("business_question");
    let mut h = Harness::new(backend);

    h.send(Message::OpenModule { module_id: 1 });
    h.settle(|s| {
        s.practice
            .as_ref()
            .is_some_and(|p| p.phase == PracticePhase::LoadFailed)
    })
    .await;

    let practice = h.state.practice.as_ref().unwrap();
    assert!(practice.module.is_none());
    assert!(practice.question.is_none());

    h.backend.recover("business_question");
    h.send(Message::RetryModule);
    h.settle(|s| {
        s.practice
            .as_ref()
            .is_some_and(|p| p.phase == PracticePhase::QuestionPresented)
    })
    .await;
}

#[tokio::test]
async fn test_chat_failure_yields_single_fallback() {
    let backend = backend();
    backend.fail("send_chat");
    let mut h = Harness::new(backend);

    h.send(Message::ToggleChat);
    h.send(Message::ChatInputChanged {
        text: "help".into(),
    });
    h.send(Message::SendChat);
    h.settle(|s| !s.chat.loading).await;

    assert_eq!(h.state.chat.messages.len(), 3);
    assert_eq!(h.state.toasts.error_count(), 1);
    assert_eq!(h.backend.call_count("send_chat"), 1);
}

#[tokio::test]
async fn test_chat_request_carries_context() {
    let backend = backend();
    backend.push_chat_reply(ChatReply {
        response: "Use a JOIN".into(),
        suggested_actions: vec![],
        context_aware: Some(true),
    });
    let mut h = Harness::new(backend);

    h.send(Message::Navigate(Screen::CheatSheet));
    h.send(Message::ToggleChat);
    h.send(Message::ChatInputChanged {
        text: "joins?".into(),
    });
    h.send(Message::SendChat);
    h.settle(|s| !s.chat.loading).await;

    let body = h.backend.calls_to("send_chat")[0].body.clone().unwrap();
    assert_eq!(body["message"], "joins?");
    assert_eq!(body["context"]["page"], "cheatsheet");
    assert_eq!(h.state.chat.messages.last().unwrap().content, "Use a JOIN");
}

#[tokio::test]
async fn test_analysis_needs_all_three_responses() {
    let backend = backend();
    backend.fail("learning_path");
    let mut h = Harness::new(backend);

    h.send(Message::Navigate(Screen::Analysis));
    h.settle(|s| !s.analysis.loading).await;

    assert!(h.state.analysis.data.is_none());
    assert_eq!(h.state.toasts.error_count(), 1);
}

#[tokio::test]
async fn test_cheatsheet_copy_and_reset() {
    let mut h = Harness::new(backend());

    h.send(Message::Navigate(Screen::CheatSheet));
    h.settle(|s| s.cheatsheet.loaded).await;

    h.send(Message::CopyFocused);
    assert_eq!(*h.clipboard.written.lock().unwrap(), vec!["SELECT ..."]);
    assert!(h.state.copy.is_active("cheatsheet-1"));

    // The reset arrives after the delay, not before
    let start = tokio::time::Instant::now();
    h.settle(|s| s.copy.active_key().is_none()).await;
    assert!(start.elapsed() >= COPY_RESET_DELAY);
}

#[tokio::test]
async fn test_health_check_ignores_chatbot_outage() {
    let backend = backend();
    backend.fail("chatbot_health");
    let mut h = Harness::new(backend.clone());

    let (msg_tx, mut msg_rx) = mpsc::channel(4);
    handle_action(UpdateAction::CheckHealth, h.runtime.backend(), msg_tx);
    let msg = timeout(Duration::from_secs(5), msg_rx.recv())
        .await
        .unwrap()
        .unwrap();
    h.send(msg);

    assert_eq!(h.state.backend_healthy, Some(true));
    assert_eq!(backend.call_count("health"), 1);
    assert_eq!(backend.call_count("chatbot_health"), 1);
}
