use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::plan::{DayStatus, StudyPlan};
use crate::ui::theme::Theme;

pub struct PlanView<'a> {
    pub plan: &'a StudyPlan,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for PlanView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Study plan — {} ", self.plan.topic))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for (i, day) in self.plan.days.iter().enumerate() {
            let (marker, color) = match day.status {
                DayStatus::Completed => ("✓", colors.correct()),
                DayStatus::Current => ("▶", colors.accent()),
                DayStatus::Locked => ("🔒", colors.dim()),
            };
            let mut style = Style::default().fg(color);
            if i == self.selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            lines.push(Line::from(Span::styled(
                format!("{marker} Day {} — {}", day.day, day.topic),
                style,
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", day.focus),
                Style::default().fg(colors.dim()),
            )));
            for activity in &day.activities {
                lines.push(Line::from(Span::styled(
                    format!("      · {activity}"),
                    Style::default().fg(colors.dim()),
                )));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "[Enter] open day  [j/k] move  [Esc] back",
            Style::default().fg(colors.dim()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
