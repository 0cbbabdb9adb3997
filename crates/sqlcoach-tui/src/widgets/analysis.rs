//! Analytics screen: totals, module progress, trends and the learning path

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Sparkline, Widget, Wrap},
};
use sqlcoach_app::analysis::AnalysisData;
use sqlcoach_app::AppState;
use sqlcoach_core::{DetailedAnalytics, UserAnalytics};

use super::practice_list::progress_bar;
use super::segmented::{ContentContext, SegmentedContent};
use crate::theme::{palette, styles, RenderTheme};

/// Scores may come as 0-1 or 0-100
fn as_percent(score: f64) -> f64 {
    let percent = if score <= 1.0 { score * 100.0 } else { score };
    percent.clamp(0.0, 100.0)
}

fn push_list(lines: &mut Vec<Line<'static>>, title: &str, items: &[String], icon: &str, style: Style) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::from(Span::styled(title.to_string(), styles::text_bold())));
    for item in items {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", icon), style),
            Span::styled(item.clone(), styles::text_primary()),
        ]));
    }
    lines.push(Line::default());
}

pub struct AnalysisView<'a> {
    state: &'a AppState,
    theme: &'a RenderTheme,
}

impl<'a> AnalysisView<'a> {
    pub fn new(state: &'a AppState, theme: &'a RenderTheme) -> Self {
        Self { state, theme }
    }

    fn render_message(&self, lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
        let block = styles::titled_block("Analysis", true);
        let inner = block.inner(area).inner(Margin::new(1, 1));
        block.render(area, buf);
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_summary(data: &AnalysisData, area: Rect, buf: &mut Buffer) {
        let analytics = &data.analytics;
        let accuracy = data.accuracy_percent();
        let block = styles::titled_block("Summary", false);
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buf);

        Paragraph::new(Line::from(vec![
            Span::styled("Accuracy ", styles::text_muted()),
            Span::styled(format!("{}%", accuracy), styles::score_style(accuracy)),
            Span::styled("   Attempted ", styles::text_muted()),
            Span::styled(
                analytics.total_questions_attempted.to_string(),
                styles::text_bold(),
            ),
            Span::styled("   Correct ", styles::text_muted()),
            Span::styled(analytics.total_correct.to_string(), styles::status_green()),
            Span::styled("   Modules ", styles::text_muted()),
            Span::styled(
                analytics.modules_progress.len().to_string(),
                styles::text_bold(),
            ),
        ]))
        .render(inner, buf);
    }

    fn render_modules(analytics: &UserAnalytics, area: Rect, buf: &mut Buffer) {
        let block = styles::titled_block("Module Progress", false);
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buf);

        if analytics.modules_progress.is_empty() {
            Paragraph::new(Span::styled("No modules started", styles::text_muted()))
                .render(inner, buf);
            return;
        }

        let rows = Layout::vertical(
            analytics
                .modules_progress
                .iter()
                .map(|_| Constraint::Length(2)),
        )
        .split(inner);

        for (progress, row) in analytics.modules_progress.iter().zip(rows.iter()) {
            let [label, gauge] =
                Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(*row);
            let name = progress
                .module_name
                .clone()
                .unwrap_or_else(|| format!("Module {}", progress.module_id));
            Paragraph::new(Line::from(vec![
                Span::styled(name, styles::text_primary()),
                Span::styled(
                    format!(
                        "  {}/{} · {}",
                        progress.questions_correct,
                        progress.questions_attempted,
                        progress.current_difficulty.as_str()
                    ),
                    styles::text_muted(),
                ),
            ]))
            .render(label, buf);

            let percent = progress.completion_percentage.clamp(0.0, 100.0).round() as u16;
            Gauge::default()
                .gauge_style(Style::default().fg(palette::ACCENT).bg(palette::CODE_BG))
                .percent(percent)
                .label(format!("{}%", percent))
                .render(gauge, buf);
        }
    }

    fn render_trends(detailed: &DetailedAnalytics, area: Rect, buf: &mut Buffer) {
        let [sparkline_area, distribution_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);

        let block = styles::titled_block("Performance Over Time", false);
        let inner = block.inner(sparkline_area);
        block.render(sparkline_area, buf);
        if detailed.performance_over_time.is_empty() {
            Paragraph::new(Span::styled(" No history yet", styles::text_muted()))
                .render(inner, buf);
        } else {
            let scores: Vec<u64> = detailed
                .performance_over_time
                .iter()
                .map(|day| as_percent(day.avg_score).round() as u64)
                .collect();
            Sparkline::default()
                .data(scores)
                .max(100)
                .style(styles::accent())
                .render(inner, buf);
        }

        let block = styles::titled_block("By Difficulty", false);
        let inner = block.inner(distribution_area).inner(Margin::new(1, 0));
        block.render(distribution_area, buf);
        let lines: Vec<Line> = detailed
            .difficulty_distribution
            .iter()
            .map(|bucket| {
                let score = as_percent(bucket.avg_score);
                Line::from(vec![
                    Span::styled(
                        format!("{:<7}", bucket.difficulty_level.as_str()),
                        styles::difficulty_style(bucket.difficulty_level),
                    ),
                    Span::styled(progress_bar(score, 10), styles::accent()),
                    Span::styled(
                        format!(
                            " {:>3.0}%  {}/{} correct",
                            score, bucket.correct, bucket.attempts
                        ),
                        styles::text_secondary(),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }

    fn insight_lines(&self, data: &AnalysisData, width: u16) -> Vec<Line<'static>> {
        let analytics = &data.analytics;
        let mut lines = Vec::new();

        push_list(&mut lines, "Strengths", &analytics.strengths, "✓", styles::status_green());
        push_list(
            &mut lines,
            "Areas for improvement",
            &analytics.areas_for_improvement,
            "△",
            styles::status_yellow(),
        );

        let suggestions = &data.learning_path.suggestions;
        if !suggestions.is_empty() {
            let ctx = ContentContext::from_state(self.state, self.theme);
            lines.push(Line::from(Span::styled("Learning path", styles::text_bold())));
            for (s, suggestion) in suggestions.iter().enumerate() {
                let (priority, priority_style) = styles::priority_indicator(suggestion.priority);
                lines.push(Line::from(vec![
                    Span::styled(priority, priority_style),
                    Span::raw("  "),
                    Span::styled(suggestion.module_name.clone(), styles::accent_bold()),
                    Span::styled(
                        format!("  {}", suggestion.kind.replace('_', " ")),
                        styles::text_muted(),
                    ),
                ]));
                lines.extend(
                    SegmentedContent::new(&suggestion.reason, &ctx, move |i| {
                        format!("suggestion-{s}-{i}")
                    })
                    .lines(width),
                );
                lines.push(Line::default());
            }
        }
        lines
    }
}

impl Widget for AnalysisView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let analysis = &self.state.analysis;
        let Some(data) = analysis.data.as_ref() else {
            let message = if analysis.loading {
                "Loading analytics..."
            } else {
                "No analytics available. Press r to refresh."
            };
            self.render_message(
                vec![Line::from(Span::styled(message, styles::text_muted()))],
                area,
                buf,
            );
            return;
        };

        if data.is_empty() {
            self.render_message(
                vec![
                    Line::from(Span::styled("No practice data yet", styles::accent_bold())),
                    Line::default(),
                    Line::from(Span::styled(
                        "Answer a few practice questions and your accuracy, progress and recommendations will show up here.",
                        styles::text_secondary(),
                    )),
                    Line::default(),
                    Line::from(vec![
                        Span::styled("2", styles::keybinding()),
                        Span::styled(" start practicing", styles::text_muted()),
                    ]),
                ],
                area,
                buf,
            );
            return;
        }

        let [summary, charts, insights] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(4),
        ])
        .areas(area);

        Self::render_summary(data, summary, buf);

        let [modules, trends] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(charts);
        Self::render_modules(&data.analytics, modules, buf);
        Self::render_trends(&data.detailed, trends, buf);

        let title = if analysis.loading {
            "Insights (refreshing...)"
        } else {
            "Insights"
        };
        let block = styles::titled_block(title, true);
        let inner = block.inner(insights).inner(Margin::new(1, 0));
        block.render(insights, buf);
        Paragraph::new(self.insight_lines(data, inner.width))
            .wrap(Wrap { trim: false })
            .scroll((analysis.scroll, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use sqlcoach_app::Screen;
    use sqlcoach_core::{
        DailyPerformance, Difficulty, DifficultyBucket, LearningPath, LearningSuggestion,
        ModuleProgress, Priority,
    };

    fn data() -> AnalysisData {
        AnalysisData {
            analytics: UserAnalytics {
                user_id: "user_test".into(),
                total_questions_attempted: 10,
                total_correct: 7,
                overall_accuracy: 0.7,
                modules_progress: vec![ModuleProgress {
                    module_name: Some("Joins".into()),
                    questions_attempted: 10,
                    questions_correct: 7,
                    completion_percentage: 55.0,
                    ..ModuleProgress::not_started(2)
                }],
                strengths: vec!["Filtering".into()],
                areas_for_improvement: vec!["Window functions".into()],
            },
            detailed: DetailedAnalytics {
                performance_over_time: vec![
                    DailyPerformance {
                        date: "2026-10-01".into(),
                        avg_score: 0.5,
                        attempts: 4,
                        correct: 2,
                    },
                    DailyPerformance {
                        date: "2026-10-02".into(),
                        avg_score: 0.9,
                        attempts: 6,
                        correct: 5,
                    },
                ],
                difficulty_distribution: vec![DifficultyBucket {
                    difficulty_level: Difficulty::Easy,
                    attempts: 10,
                    avg_score: 70.0,
                    correct: 7,
                }],
            },
            learning_path: LearningPath {
                suggestions: vec![LearningSuggestion {
                    kind: "continue_module".into(),
                    module_name: "Joins".into(),
                    reason: "Practice this:\n```sql\nSELECT * FROM a JOIN b USING (id)\n```"
                        .into(),
                    priority: Priority::High,
                }],
            },
        }
    }

    fn render(state: &AppState) -> TestTerminal {
        let theme = RenderTheme::default();
        let mut term = TestTerminal::with_size(120, 48);
        term.render_widget(AnalysisView::new(state, &theme), term.area());
        term
    }

    fn state() -> AppState {
        let mut state = create_test_state();
        state.screen = Screen::Analysis;
        state
    }

    #[test]
    fn test_as_percent() {
        assert_eq!(as_percent(0.5), 50.0);
        assert_eq!(as_percent(75.0), 75.0);
        assert_eq!(as_percent(140.0), 100.0);
    }

    #[test]
    fn test_loading_and_missing_states() {
        let mut state = state();
        state.analysis.loading = true;
        assert!(render(&state).buffer_contains("Loading analytics..."));

        state.analysis.loading = false;
        assert!(render(&state).buffer_contains("No analytics available"));
    }

    #[test]
    fn test_empty_state_invites_practice() {
        let mut state = state();
        state.analysis.data = Some(AnalysisData::default());

        assert!(render(&state).buffer_contains("No practice data yet"));
    }

    #[test]
    fn test_full_dashboard() {
        let mut state = state();
        state.analysis.data = Some(data());

        let term = render(&state);

        assert!(term.buffer_contains("Accuracy 70%"));
        assert!(term.buffer_contains("Attempted 10"));
        assert!(term.buffer_contains("Joins  7/10 · easy"));
        assert!(term.buffer_contains("55%"));
        assert!(term.buffer_contains("70%  7/10 correct"));
        assert!(term.buffer_contains("✓ Filtering"));
        assert!(term.buffer_contains("△ Window functions"));
        assert!(term.buffer_contains("▲ High"));
        assert!(term.buffer_contains("│ SELECT * FROM a JOIN b USING (id)"));
    }
}
