use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::plan::StudyPlan;
use crate::store::schema::ProfileData;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Landing screen: streak, topic entry, plan shortcut, last-session recap.
pub struct Dashboard<'a> {
    pub profile: &'a ProfileData,
    pub topic_input: &'a LineInput,
    pub input_active: bool,
    pub plan: Option<&'a StudyPlan>,
    pub last_summary: Option<&'a str>,
    pub status_line: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" quizdr ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // streak
                Constraint::Length(3), // topic input
                Constraint::Length(2), // plan summary
                Constraint::Length(2), // last session
                Constraint::Min(0),
                Constraint::Length(1), // status
            ])
            .split(inner);

        let streak = Paragraph::new(Line::from(vec![
            Span::styled("🔥 ", Style::default().fg(colors.warning())),
            Span::styled(
                format!(
                    "{} day streak (best {})",
                    self.profile.streak_days, self.profile.best_streak
                ),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .alignment(Alignment::Center);
        streak.render(layout[0], buf);

        self.render_topic_input(layout[1], buf);

        let plan_line = match self.plan {
            Some(plan) => format!(
                "Plan: {} — {}/{} days done  [p]",
                plan.topic,
                plan.completed_count(),
                plan.days.len()
            ),
            None => "No study plan yet — enter a topic and press [g] to generate one".to_string(),
        };
        Paragraph::new(Line::from(Span::styled(
            plan_line,
            Style::default().fg(colors.fg()),
        )))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        if let Some(summary) = self.last_summary {
            Paragraph::new(Line::from(Span::styled(
                summary,
                Style::default().fg(colors.dim()),
            )))
            .alignment(Alignment::Center)
            .render(layout[3], buf);
        }

        if let Some(status) = self.status_line {
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(colors.warning()),
            )))
            .alignment(Alignment::Center)
            .render(layout[5], buf);
        }
    }
}

impl Dashboard<'_> {
    fn render_topic_input(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.input_active {
            colors.accent()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(" Topic ")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let (before, at, after) = self.topic_input.render_parts();
        let mut spans = vec![Span::styled(before, Style::default().fg(colors.fg()))];
        if self.input_active {
            match at {
                Some(ch) => {
                    spans.push(Span::styled(
                        ch.to_string(),
                        Style::default()
                            .fg(colors.selection_fg())
                            .bg(colors.selection_bg()),
                    ));
                    spans.push(Span::styled(after, Style::default().fg(colors.fg())));
                }
                None => spans.push(Span::styled(
                    " ",
                    Style::default().bg(colors.selection_bg()),
                )),
            }
        } else if before.is_empty() && at.is_none() {
            spans.push(Span::styled(
                "press [t] and type a topic…",
                Style::default().fg(colors.dim()).add_modifier(Modifier::ITALIC),
            ));
        }
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
