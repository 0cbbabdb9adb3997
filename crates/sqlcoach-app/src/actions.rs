//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every backend call runs in its own tokio task and reports back with a
//! message. Screens that need several responses fetch them concurrently and
//! fail as a whole when any of them fails.

use std::sync::Arc;

use sqlcoach_client::Backend;
use sqlcoach_core::prelude::*;
use tokio::sync::mpsc;

use crate::analysis::AnalysisData;
use crate::handler::UpdateAction;
use crate::message::Message;

/// Execute an action by spawning a background task
pub fn handle_action<B>(action: UpdateAction, backend: &Arc<B>, msg_tx: mpsc::Sender<Message>)
where
    B: Backend + Sync + 'static,
{
    let backend = Arc::clone(backend);

    match action {
        UpdateAction::CheckHealth => {
            tokio::spawn(async move {
                let (api, chatbot) = tokio::join!(backend.health(), backend.chatbot_health());
                if let Err(e) = chatbot {
                    warn!("Chatbot health check failed: {}", e);
                }
                let healthy = match api {
                    Ok(status) => {
                        debug!("Backend health: {}", status.status);
                        true
                    }
                    Err(e) => {
                        warn!("Backend health check failed: {}", e);
                        false
                    }
                };
                let _ = msg_tx.send(Message::HealthChecked { healthy }).await;
            });
        }

        UpdateAction::LoadCheatSheet => {
            tokio::spawn(async move {
                let msg = match backend.cheat_sheet().await {
                    Ok(entries) => Message::CheatSheetLoaded { entries },
                    Err(e) => {
                        error!("Failed to fetch cheat sheet: {}", e);
                        Message::CheatSheetLoadFailed {
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::GenerateExample { entry_id, request } => {
            tokio::spawn(async move {
                let msg = match backend.dynamic_example(&request).await {
                    Ok(example) => Message::ExampleGenerated { entry_id, example },
                    Err(e) => {
                        error!("Failed to generate example for {}: {}", request.command, e);
                        Message::ExampleFailed {
                            entry_id,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::LoadPracticeList { user_id } => {
            tokio::spawn(async move {
                let result = tokio::try_join!(backend.modules(), backend.progress(&user_id));
                let msg = match result {
                    Ok((modules, progress)) => Message::PracticeListLoaded { modules, progress },
                    Err(e) => {
                        error!("Failed to fetch practice data: {}", e);
                        Message::PracticeListFailed {
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::LoadModule {
            module_id,
            generation,
            difficulty,
        } => {
            tokio::spawn(async move {
                let result = tokio::try_join!(
                    backend.module(module_id),
                    backend.business_question(module_id, difficulty)
                );
                let msg = match result {
                    Ok((module, question)) => Message::ModuleLoaded {
                        module_id,
                        generation,
                        module,
                        question,
                    },
                    Err(e) => {
                        error!("Failed to load module {}: {}", module_id, e);
                        Message::ModuleLoadFailed {
                            module_id,
                            generation,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::EvaluateAnswer {
            module_id,
            generation,
            request,
        } => {
            tokio::spawn(async move {
                let msg = match backend.evaluate_answer(&request).await {
                    Ok(evaluation) => Message::AnswerEvaluated {
                        module_id,
                        generation,
                        evaluation,
                    },
                    Err(e) => {
                        error!("Failed to evaluate answer to {}: {}", request.question_id, e);
                        Message::EvaluationFailed {
                            module_id,
                            generation,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::LoadQuestion {
            module_id,
            generation,
            difficulty,
        } => {
            tokio::spawn(async move {
                let msg = match backend.business_question(module_id, difficulty).await {
                    Ok(question) => Message::QuestionLoaded {
                        module_id,
                        generation,
                        question,
                    },
                    Err(e) => {
                        error!(
                            "Failed to load {} question for module {}: {}",
                            difficulty, module_id, e
                        );
                        Message::QuestionLoadFailed {
                            module_id,
                            generation,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::LoadAnalysis {
            user_id,
            generation,
        } => {
            tokio::spawn(async move {
                let result = tokio::try_join!(
                    backend.analytics(&user_id),
                    backend.detailed_analytics(&user_id),
                    backend.learning_path(&user_id)
                );
                let msg = match result {
                    Ok((analytics, detailed, learning_path)) => Message::AnalysisLoaded {
                        generation,
                        data: Box::new(AnalysisData {
                            analytics,
                            detailed,
                            learning_path,
                        }),
                    },
                    Err(e) => {
                        error!("Failed to fetch analytics: {}", e);
                        Message::AnalysisFailed {
                            generation,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::SendChat { request } => {
            tokio::spawn(async move {
                let msg = match backend.send_chat(&request).await {
                    Ok(reply) => Message::ChatReplyReceived { reply },
                    Err(e) => {
                        error!("Failed to send chat message: {}", e);
                        Message::ChatFailed {
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::ClearChat => {
            tokio::spawn(async move {
                let msg = match backend.clear_chat().await {
                    Ok(()) => Message::ChatCleared,
                    Err(e) => {
                        error!("Failed to clear chat: {}", e);
                        Message::ChatClearFailed {
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::Copy { .. } => {
            // Clipboard writes are synchronous; see process::Runtime
            warn!("Copy action reached the background dispatcher; ignoring");
        }
    }
}
