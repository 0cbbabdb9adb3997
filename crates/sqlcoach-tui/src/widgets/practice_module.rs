//! Practice session: question, hints, answer editor and feedback

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use sqlcoach_app::practice::{PracticePhase, PracticeState};
use sqlcoach_app::state::CORRECT_SQL_KEY;
use sqlcoach_app::AppState;
use sqlcoach_core::{BusinessQuestion, Evaluation};

use super::code_block::highlight_sql;
use super::segmented::{ContentContext, SegmentedContent};
use crate::theme::{styles, RenderTheme};

const EDITOR_MIN_ROWS: u16 = 3;
const EDITOR_MAX_ROWS: u16 = 10;

pub struct PracticeModuleView<'a> {
    state: &'a AppState,
    theme: &'a RenderTheme,
}

impl<'a> PracticeModuleView<'a> {
    pub fn new(state: &'a AppState, theme: &'a RenderTheme) -> Self {
        Self { state, theme }
    }

    fn info_line(practice: &PracticeState) -> Line<'static> {
        let mut spans = vec![
            Span::styled(practice.module_label(), styles::accent_bold()),
            Span::styled("  │  ", styles::text_muted()),
        ];
        if practice.question.is_some() {
            let difficulty = practice.difficulty();
            spans.push(Span::styled(
                difficulty.as_str().to_uppercase(),
                styles::difficulty_style(difficulty),
            ));
            spans.push(Span::styled("  │  ", styles::text_muted()));
            spans.push(Span::styled(
                format!("Question {}", practice.question_count),
                styles::text_secondary(),
            ));
            spans.push(Span::styled("  │  ", styles::text_muted()));
        }
        spans.push(phase_indicator(&practice.phase));
        Line::from(spans)
    }

    fn question_lines(
        question: &BusinessQuestion,
        practice: &PracticeState,
        ctx: &ContentContext<'_>,
        width: u16,
    ) -> Vec<Line<'static>> {
        let mut lines =
            SegmentedContent::new(&question.question, ctx, |i| format!("question-{i}")).lines(width);

        if question.hints.is_empty() {
            return lines;
        }
        lines.push(Line::default());
        if !practice.show_hints {
            lines.push(Line::from(vec![
                Span::styled("?", styles::keybinding()),
                Span::styled(
                    format!(" show {} hint(s)", question.hints.len()),
                    styles::text_muted(),
                ),
            ]));
            return lines;
        }
        for (h, hint) in question.hints.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("💡 Hint {}", h + 1),
                styles::status_yellow(),
            )));
            lines.extend(
                SegmentedContent::new(hint, ctx, move |i| format!("hint-{h}-{i}"))
                    .code_label("SQL Hint")
                    .lines(width),
            );
        }
        lines
    }

    fn feedback_lines(
        evaluation: &Evaluation,
        ctx: &ContentContext<'_>,
        width: u16,
    ) -> Vec<Line<'static>> {
        let percent = evaluation.percent();
        let verdict = if evaluation.is_correct {
            Span::styled("✓ Correct!", styles::status_green())
        } else {
            Span::styled("✗ Not quite", styles::status_red())
        };
        let mut lines = vec![
            Line::from(Span::styled("─".repeat(usize::from(width)), styles::border_inactive())),
            Line::from(vec![
                verdict,
                Span::styled("   Score ", styles::text_muted()),
                Span::styled(format!("{}%", percent), styles::score_style(percent)),
            ]),
            Line::default(),
        ];

        lines.extend(
            SegmentedContent::new(&evaluation.feedback, ctx, |i| format!("feedback-{i}"))
                .lines(width),
        );

        if let Some(sql) = evaluation.correct_sql.as_deref() {
            if !sql.trim().is_empty() {
                lines.push(Line::default());
                lines.extend(ctx.code_block(sql.trim(), CORRECT_SQL_KEY, "Correct Solution"));
            }
        }

        if !evaluation.suggestions.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Suggestions", styles::text_bold())));
            lines.extend(evaluation.suggestions.iter().map(|s| {
                Line::from(vec![
                    Span::styled("• ", styles::accent()),
                    Span::styled(s.clone(), styles::text_primary()),
                ])
            }));
        }

        if let Some(impact) = evaluation.business_impact.as_deref().filter(|i| !i.is_empty()) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Business impact", styles::text_bold())));
            lines.push(Line::from(Span::styled(impact.to_string(), styles::text_secondary())));
        }
        lines
    }

    fn content_lines(&self, practice: &PracticeState, width: u16) -> Vec<Line<'static>> {
        let muted = |text: &str| vec![Line::from(Span::styled(text.to_string(), styles::text_muted()))];
        match (&practice.phase, &practice.question) {
            (PracticePhase::Loading, _) => return muted("Loading question..."),
            (PracticePhase::LoadFailed, _) => {
                return vec![
                    Line::from(Span::styled(
                        "Couldn't load a question for this module.",
                        styles::status_red(),
                    )),
                    Line::from(vec![
                        Span::styled("r", styles::keybinding()),
                        Span::styled(" retry   ", styles::text_muted()),
                        Span::styled("Esc", styles::keybinding()),
                        Span::styled(" back to modules", styles::text_muted()),
                    ]),
                ];
            }
            (_, None) => return muted("No question available."),
            _ => {}
        }

        let ctx = ContentContext::from_state(self.state, self.theme);
        let mut lines = Vec::new();
        if let Some(question) = &practice.question {
            lines.extend(Self::question_lines(question, practice, &ctx, width));
        }

        match &practice.phase {
            PracticePhase::Submitting => {
                lines.push(Line::default());
                lines.extend(muted("Evaluating your answer..."));
            }
            PracticePhase::AnswerSubmitted(evaluation) => {
                lines.push(Line::default());
                lines.extend(Self::feedback_lines(evaluation, &ctx, width));
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled("n", styles::keybinding()),
                    Span::styled(" next question", styles::text_muted()),
                ]));
            }
            PracticePhase::NextQuestionLoading(evaluation) => {
                lines.push(Line::default());
                lines.extend(Self::feedback_lines(evaluation, &ctx, width));
                lines.push(Line::default());
                lines.extend(muted("Loading next question..."));
            }
            _ => {}
        }
        lines
    }

    fn editor_lines(&self, practice: &PracticeState) -> Vec<Line<'static>> {
        if practice.answer.is_empty() && !practice.editing {
            return vec![Line::from(vec![
                Span::styled("Press ", styles::text_muted()),
                Span::styled("e", styles::keybinding()),
                Span::styled(" to write your SQL query", styles::text_muted()),
            ])];
        }

        let mut lines = highlight_sql(&practice.answer, self.theme);
        if practice.answer.is_empty() || practice.answer.ends_with('\n') {
            lines.push(Line::default());
        }
        if practice.editing {
            if let Some(last) = lines.last_mut() {
                last.spans.push(Span::styled("▏", styles::accent()));
            }
        }
        lines
    }

    fn render_editor(&self, practice: &PracticeState, area: Rect, buf: &mut Buffer) {
        let title = if practice.evaluation().is_some() {
            "Your SQL (submitted)"
        } else if practice.editing {
            "Your SQL (Ctrl+S to submit, Esc to stop)"
        } else {
            "Your SQL"
        };
        let block = styles::titled_block(title, practice.editing);
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buf);

        let lines = self.editor_lines(practice);
        // Keep the cursor line visible
        let overflow = (lines.len() as u16).saturating_sub(inner.height);
        Paragraph::new(lines)
            .scroll((overflow, 0))
            .render(inner, buf);
    }
}

fn phase_indicator(phase: &PracticePhase) -> Span<'static> {
    match phase {
        PracticePhase::Loading => Span::styled("○ Loading", styles::text_muted()),
        PracticePhase::LoadFailed => Span::styled("✗ Failed", styles::status_red()),
        PracticePhase::QuestionPresented => Span::styled("● Your turn", styles::accent()),
        PracticePhase::Submitting => Span::styled("◐ Evaluating", styles::status_yellow()),
        PracticePhase::AnswerSubmitted(e) | PracticePhase::NextQuestionLoading(e) => {
            Span::styled(format!("◆ Scored {}%", e.percent()), styles::score_style(e.percent()))
        }
    }
}

impl Widget for PracticeModuleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(practice) = self.state.practice.as_ref() else {
            Paragraph::new(Span::styled("No module selected", styles::text_muted()))
                .render(area, buf);
            return;
        };

        let answer_rows = practice.answer.lines().count() as u16 + 1;
        let editor_height = answer_rows.clamp(EDITOR_MIN_ROWS, EDITOR_MAX_ROWS) + 2;
        let [info, content, editor] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(editor_height),
        ])
        .areas(area);

        let block = styles::glass_block(false);
        let inner = block.inner(info).inner(Margin::new(1, 0));
        block.render(info, buf);
        Paragraph::new(Self::info_line(practice)).render(inner, buf);

        let block = styles::titled_block("Question", !practice.editing);
        let inner = block.inner(content).inner(Margin::new(1, 0));
        block.render(content, buf);
        Paragraph::new(self.content_lines(practice, inner.width))
            .wrap(Wrap { trim: false })
            .scroll((practice.scroll, 0))
            .render(inner, buf);

        self.render_editor(practice, editor, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use sqlcoach_app::Screen;
    use sqlcoach_core::Difficulty;

    fn question() -> BusinessQuestion {
        BusinessQuestion {
            question_id: "q1".into(),
            module_id: None,
            module_name: None,
            difficulty: Difficulty::Medium,
            question: "Which customers spent the most?".into(),
            hints: vec!["Group first:\n```sql\nGROUP BY customer_id\n```".into()],
            expected_sql: None,
        }
    }

    fn state_with(practice: PracticeState) -> AppState {
        let mut state = create_test_state();
        state.screen = Screen::PracticeModule;
        state.practice = Some(practice);
        state
    }

    fn presented() -> PracticeState {
        let mut practice = PracticeState::new(7);
        practice.present(question());
        practice
    }

    fn render(state: &AppState) -> TestTerminal {
        let theme = RenderTheme::default();
        let mut term = TestTerminal::wide();
        term.render_widget(PracticeModuleView::new(state, &theme), term.area());
        term
    }

    #[test]
    fn test_question_presented() {
        let term = render(&state_with(presented()));

        assert!(term.buffer_contains("Module 7"));
        assert!(term.buffer_contains("MEDIUM"));
        assert!(term.buffer_contains("Question 1"));
        assert!(term.buffer_contains("Which customers spent the most?"));
        assert!(term.buffer_contains("show 1 hint(s)"));
        assert!(term.buffer_contains("to write your SQL query"));
    }

    #[test]
    fn test_hints_render_as_sql_hint_blocks() {
        let mut practice = presented();
        practice.show_hints = true;

        let term = render(&state_with(practice));

        assert!(term.buffer_contains("Hint 1"));
        assert!(term.buffer_contains("SQL Hint"));
        assert!(term.buffer_contains("│ GROUP BY customer_id"));
    }

    #[test]
    fn test_editor_shows_answer_and_cursor() {
        let mut practice = presented();
        practice.editing = true;
        practice.answer = "SELECT name".into();

        let term = render(&state_with(practice));

        assert!(term.buffer_contains("SELECT name▏"));
        assert!(term.buffer_contains("Ctrl+S to submit"));
    }

    #[test]
    fn test_feedback_after_submission() {
        let mut practice = presented();
        practice.answer = "SELECT 1".into();
        practice.phase = PracticePhase::AnswerSubmitted(Evaluation {
            is_correct: false,
            score: 0.4,
            feedback: "Close, but aggregate first.".into(),
            correct_sql: Some("SELECT customer_id, SUM(total) FROM orders GROUP BY 1".into()),
            next_difficulty: None,
            suggestions: vec!["Use SUM".into()],
            business_impact: Some("Finds top customers".into()),
        });

        let term = render(&state_with(practice));

        assert!(term.buffer_contains("✗ Not quite"));
        assert!(term.buffer_contains("Score 40%"));
        assert!(term.buffer_contains("Close, but aggregate first."));
        assert!(term.buffer_contains("Correct Solution"));
        assert!(term.buffer_contains("• Use SUM"));
        assert!(term.buffer_contains("Your SQL (submitted)"));
    }

    #[test]
    fn test_load_failed_offers_retry() {
        let mut practice = PracticeState::new(3);
        practice.phase = PracticePhase::LoadFailed;

        let term = render(&state_with(practice));

        assert!(term.buffer_contains("Couldn't load a question"));
        assert!(term.buffer_contains("r retry"));
    }
}
