//! Practice module list with per-module progress

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use sqlcoach_app::practice::PracticeListState;
use sqlcoach_core::{Difficulty, LearningModule, ModuleProgress};

use crate::theme::styles;

const BAR_WIDTH: usize = 20;

/// `████░░░░` bar for a 0-100 percentage
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub struct PracticeListView<'a> {
    list: &'a PracticeListState,
}

impl<'a> PracticeListView<'a> {
    pub fn new(list: &'a PracticeListState) -> Self {
        Self { list }
    }

    fn overview(&self) -> Line<'static> {
        let overview = self.list.overview();
        Line::from(vec![
            Span::styled(" Modules started ", styles::text_muted()),
            Span::styled(
                format!("{}/{}", overview.modules_started, overview.modules_total),
                styles::accent_bold(),
            ),
            Span::styled("   Correct ", styles::text_muted()),
            Span::styled(overview.total_correct.to_string(), styles::status_green()),
            Span::styled("   Attempted ", styles::text_muted()),
            Span::styled(overview.total_attempted.to_string(), styles::text_bold()),
        ])
    }

    fn item(module: &LearningModule, progress: &ModuleProgress) -> ListItem<'static> {
        let level = Difficulty::parse(&module.difficulty_level).unwrap_or_default();
        let title = Line::from(vec![
            Span::styled(module.name.clone(), styles::text_bold()),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", module.difficulty_level),
                styles::difficulty_style(level),
            ),
        ]);
        let stats = Line::from(vec![
            Span::raw("  "),
            Span::styled(
                progress_bar(progress.completion_percentage, BAR_WIDTH),
                styles::accent(),
            ),
            Span::styled(
                format!(
                    " {:>3.0}%  {}/{} correct  now {}",
                    progress.completion_percentage,
                    progress.questions_correct,
                    progress.questions_attempted,
                    progress.current_difficulty.as_str()
                ),
                styles::text_secondary(),
            ),
        ]);
        let description = Line::from(Span::styled(
            format!("  {}", module.description),
            styles::text_muted(),
        ));
        ListItem::new(vec![title, description, stats, Line::default()])
    }
}

impl Widget for PracticeListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [overview, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        let block = styles::titled_block("Overview", false);
        let inner = block.inner(overview);
        block.render(overview, buf);
        Paragraph::new(self.overview()).render(inner, buf);

        let block = styles::titled_block("Learning Modules", true);
        let inner = block.inner(body);
        block.render(body, buf);

        if self.list.loading {
            Paragraph::new(Span::styled("Loading modules...", styles::text_muted()))
                .render(inner, buf);
            return;
        }
        if self.list.modules.is_empty() {
            Paragraph::new(Span::styled(
                "No modules available. Press r to reload.",
                styles::text_muted(),
            ))
            .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .list
            .modules
            .iter()
            .map(|m| Self::item(m, &self.list.progress_for(m.id)))
            .collect();
        let list = List::new(items)
            .highlight_style(styles::focused_selected())
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.list.selected));
        StatefulWidget::render(list, inner, buf, &mut state);
    }
}
