//! Cheat sheet screen: category tabs, search, entry list and detail, plus
//! the generated-example dialog.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};
use sqlcoach_app::cheatsheet::{CheatSheetState, ExampleView};
use sqlcoach_app::state::EXAMPLE_SQL_KEY;
use sqlcoach_app::AppState;
use sqlcoach_core::CheatSheetEntry;

use super::modal_overlay::{centered_rect_percent, clear_area, dim_background};
use super::segmented::{ContentContext, SegmentedContent};
use crate::theme::{palette, styles, RenderTheme};

pub struct CheatSheetView<'a> {
    state: &'a AppState,
    theme: &'a RenderTheme,
}

impl<'a> CheatSheetView<'a> {
    pub fn new(state: &'a AppState, theme: &'a RenderTheme) -> Self {
        Self { state, theme }
    }

    fn sheet(&self) -> &CheatSheetState {
        &self.state.cheatsheet
    }

    fn category_tabs(&self) -> Line<'static> {
        let sheet = self.sheet();
        let mut spans = vec![Span::raw(" ")];
        for (i, category) in sheet.categories().into_iter().enumerate() {
            let style = if i == sheet.category_index {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            spans.push(Span::styled(format!(" {} ", category), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn search_line(&self) -> Line<'static> {
        let sheet = self.sheet();
        let mut spans = vec![Span::styled(" / ", styles::keybinding())];
        if sheet.search.is_empty() && !sheet.searching {
            spans.push(Span::styled(
                "Search commands, categories, syntax",
                styles::text_muted(),
            ));
        } else {
            spans.push(Span::styled(sheet.search.clone(), styles::text_primary()));
        }
        if sheet.searching {
            spans.push(Span::styled("▏", styles::accent()));
        }
        Line::from(spans)
    }

    fn render_list(&self, entries: &[&CheatSheetEntry], area: Rect, buf: &mut Buffer) {
        let block = styles::titled_block("Commands", !self.sheet().searching);
        let inner = block.inner(area);
        block.render(area, buf);

        let sheet = self.sheet();
        if sheet.loading {
            Paragraph::new(Span::styled("Loading cheat sheet...", styles::text_muted()))
                .render(inner, buf);
            return;
        }
        if entries.is_empty() {
            let message = if sheet.entries.is_empty() {
                "No entries available"
            } else {
                "No commands match"
            };
            Paragraph::new(Span::styled(message, styles::text_muted())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.command.clone(), styles::text_bold()),
                    Span::styled(format!("  {}", entry.category), styles::text_muted()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(styles::focused_selected())
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(Some(sheet.selected));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }

    fn detail_lines(&self, entry: &CheatSheetEntry, ctx: &ContentContext<'_>) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(entry.command.clone(), styles::accent_bold())),
            Line::from(Span::styled(entry.category.clone(), styles::text_muted())),
            Line::default(),
        ];

        if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(Line::from(Span::styled(
                description.to_string(),
                styles::text_primary(),
            )));
            lines.push(Line::default());
        }

        lines.extend(ctx.code_block(&entry.syntax, &format!("cheatsheet-{}", entry.id), "Syntax"));

        if !entry.example.trim().is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Example", styles::text_bold())));
            lines.extend(
                entry
                    .example
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), self.theme.code))),
            );
        }

        if let Some(tags) = entry.tags.as_deref().filter(|t| !t.is_empty()) {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Tags ", styles::text_muted()),
                Span::styled(tags.to_string(), styles::text_secondary()),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("g", styles::keybinding()),
            Span::styled(" generate a real-world example", styles::text_muted()),
        ]));
        lines
    }

    fn render_detail(&self, entry: Option<&CheatSheetEntry>, area: Rect, buf: &mut Buffer) {
        let block = styles::titled_block("Details", false);
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buf);

        let Some(entry) = entry else {
            return;
        };
        let ctx = ContentContext::from_state(self.state, self.theme);
        Paragraph::new(self.detail_lines(entry, &ctx))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }

    fn render_example(&self, area: Rect, buf: &mut Buffer) {
        let sheet = self.sheet();
        let dialog = centered_rect_percent(80, 80, area);
        dim_background(buf, area);
        clear_area(buf, dialog);

        let title = match &sheet.example {
            Some(view) => format!("{} Example", view.command),
            None => "Example".to_string(),
        };
        let block = styles::modal_block(&title);
        let inner = block.inner(dialog).inner(Margin::new(1, 0));
        block.render(dialog, buf);

        let lines = match &sheet.example {
            Some(view) => {
                let ctx = ContentContext::from_state(self.state, self.theme);
                example_lines(view, &ctx, inner.width)
            }
            None => vec![Line::from(Span::styled(
                "Generating example...",
                styles::text_muted(),
            ))],
        };
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(palette::POPUP_BG))
            .render(inner, buf);
    }
}

/// Body of the example dialog
fn example_lines(view: &ExampleView, ctx: &ContentContext<'_>, width: u16) -> Vec<Line<'static>> {
    let example = &view.example;
    let mut lines = vec![Line::from(Span::styled(
        example.scenario.clone(),
        styles::accent_bold(),
    ))];
    if !example.business_context.is_empty() {
        lines.push(Line::from(Span::styled(
            example.business_context.clone(),
            styles::text_secondary(),
        )));
    }

    if let Some(tables) = example.table_description.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Tables", styles::text_bold())));
        lines.extend(tables.lines().map(|l| Line::from(l.to_string())));
    }

    if !example.sql_example.trim().is_empty() {
        lines.push(Line::default());
        lines.extend(ctx.code_block(example.sql_example.trim(), EXAMPLE_SQL_KEY, "SQL Example"));
    }

    if !example.explanation.trim().is_empty() {
        lines.push(Line::default());
        lines.extend(
            SegmentedContent::new(&example.explanation, ctx, |i| format!("example-{i}"))
                .lines(width),
        );
    }

    if let Some(sample) = example.sample_data.as_deref().filter(|s| !s.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Sample data", styles::text_bold())));
        lines.extend(sample.lines().map(|l| Line::from(Span::styled(l.to_string(), ctx.theme.code))));
    }

    if view.fallback {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Showing the static example; press g to try generating again.",
            styles::text_muted(),
        )));
    }
    lines
}

impl Widget for CheatSheetView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [tabs, search, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        Paragraph::new(self.category_tabs()).render(tabs, buf);
        Paragraph::new(self.search_line()).render(search, buf);

        let entries = self.sheet().filtered();
        let [list, detail] =
            Layout::horizontal([Constraint::Percentage(38), Constraint::Percentage(62)])
                .areas(body);
        self.render_list(&entries, list, buf);
        self.render_detail(entries.get(self.sheet().selected).copied(), detail, buf);

        let sheet = self.sheet();
        if sheet.example.is_some() || sheet.generating.is_some() {
            self.render_example(area, buf);
        }
    }
}
