use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::prefetch::LoadingMode;
use crate::session::quiz::{QuizPhase, QuizSession};
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

pub struct QuizView<'a> {
    pub session: &'a QuizSession,
    /// Option currently highlighted by the cursor keys.
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(" {} — level {} ", self.session.topic, self.session.level);
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        // Blocked wait: nothing consumable, full spinner takes the screen.
        if self.session.phase == QuizPhase::Loading {
            let spinner = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Generating questions…",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "(the next batch is on its way)",
                    Style::default().fg(colors.dim()),
                )),
            ])
            .alignment(Alignment::Center);
            spinner.render(centered_rect(60, 30, inner), buf);
            return;
        }

        let Some(question) = &self.session.current else {
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // progress / background indicator
                Constraint::Min(4),    // prompt
                Constraint::Length(question.options.len() as u16 + 1),
                Constraint::Min(3), // feedback
            ])
            .split(inner);

        self.render_status(layout[0], buf);

        Paragraph::new(question.prompt.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: true })
            .render(layout[1], buf);

        self.render_options(layout[2], buf);

        if let QuizPhase::Feedback { correct, .. } = self.session.phase {
            self.render_feedback(layout[3], buf, correct);
        }
    }
}

impl QuizView<'_> {
    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::styled(
            format!(
                "answered {} · correct {} · {} buffered",
                self.session.answered(),
                self.session.correct_count(),
                self.session.queue.len()
            ),
            Style::default().fg(colors.dim()),
        )];
        // Non-blocking refill in progress: keep the quiz interactive, just hint.
        if self.session.queue.loading() == LoadingMode::Background {
            spans.push(Span::styled(
                "   ⟳ generating more…",
                Style::default().fg(colors.warning()),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_options(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = &self.session.current else {
            return;
        };
        let feedback = match self.session.phase {
            QuizPhase::Feedback { chosen, .. } => Some(chosen),
            _ => None,
        };

        let mut lines = Vec::with_capacity(question.options.len());
        // Markers mirror the number-key bindings (1 submits option 1).
        for (i, option) in question.options.iter().enumerate() {
            let marker = i + 1;
            let mut style = Style::default().fg(colors.fg());
            let mut prefix = "  ";
            if let Some(chosen) = feedback {
                if i == question.answer {
                    style = Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD);
                    prefix = "✓ ";
                } else if i == chosen {
                    style = Style::default().fg(colors.incorrect());
                    prefix = "✗ ";
                } else {
                    style = Style::default().fg(colors.dim());
                }
            } else if i == self.selected {
                style = Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg());
                prefix = "> ";
            }
            lines.push(Line::from(Span::styled(
                format!("{prefix}{marker}. {option}"),
                style,
            )));
        }
        Paragraph::new(lines).render(area, buf);
    }

    fn render_feedback(&self, area: Rect, buf: &mut Buffer, correct: bool) {
        let colors = &self.theme.colors;
        let Some(question) = &self.session.current else {
            return;
        };
        let (verdict, color) = if correct {
            ("Correct!", colors.correct())
        } else {
            ("Incorrect", colors.incorrect())
        };
        let header = match self.session.records.last() {
            Some(r) => format!(
                "{verdict}  (level {} → {})",
                r.level_before, r.level_after
            ),
            None => verdict.to_string(),
        };
        let mut lines = vec![
            Line::from(Span::styled(
                header,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                question.explanation.as_str(),
                Style::default().fg(colors.fg()),
            )),
        ];
        lines.push(Line::from(Span::styled(
            "[Enter] next  [Esc] end session",
            Style::default().fg(colors.dim()),
        )));
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
