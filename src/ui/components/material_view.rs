use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Study material screen. `paragraphs` is the material split on blank
/// lines; one paragraph is always selected and can be sent off for an AI
/// explanation, which then overlays as a popup.
pub struct MaterialView<'a> {
    pub title: &'a str,
    pub paragraphs: &'a [String],
    pub selected: usize,
    pub loading: bool,
    pub explanation: Option<&'a str>,
    pub explaining: bool,
    pub theme: &'a Theme,
}

impl Widget for MaterialView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.loading {
            let spinner = Paragraph::new(Line::from(Span::styled(
                "Generating study material…",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            spinner.render(centered_rect(60, 30, inner), buf);
            return;
        }

        let mut lines = Vec::new();
        // Keep the selected paragraph on screen with a coarse scroll: start
        // from it when it would fall past the viewport.
        let visible_from = self.selected.saturating_sub(2);
        for (i, paragraph) in self.paragraphs.iter().enumerate().skip(visible_from) {
            let style = if i == self.selected {
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.dim())
            };
            let prefix = if i == self.selected { "▌ " } else { "  " };
            for (j, text_line) in paragraph.lines().enumerate() {
                let lead = if j == 0 { prefix } else { "  " };
                lines.push(Line::from(Span::styled(format!("{lead}{text_line}"), style)));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "[j/k] select paragraph  [e] explain  [Enter] start quiz  [Esc] back",
            Style::default().fg(colors.dim()),
        )));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if self.explaining || self.explanation.is_some() {
            self.render_explanation_popup(area, buf);
        }
    }
}

impl MaterialView<'_> {
    fn render_explanation_popup(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(70, 50, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Explanation ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let body = match self.explanation {
            Some(text) => text,
            None => "Asking…",
        };
        let mut lines: Vec<Line> = body
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(colors.fg()))))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Esc] close",
            Style::default().fg(colors.dim()),
        )));
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
