mod app;
mod config;
mod content;
mod engine;
mod event;
mod logging;
mod session;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::Block;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use session::quiz::QuizPhase;
use ui::components::dashboard::Dashboard;
use ui::components::material_view::MaterialView;
use ui::components::plan_view::PlanView;
use ui::components::quiz_view::QuizView;
use ui::line_input::{InputResult, LineInput};

#[derive(Parser)]
#[command(
    name = "quizdr",
    version,
    about = "Terminal quiz trainer with adaptive difficulty and AI-generated questions"
)]
struct Cli {
    #[arg(short, long, help = "Start a quiz on this topic immediately")]
    topic: Option<String>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_path = logging::init()?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(events.sender());

    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
        }
    }
    if let Some(topic) = cli.topic {
        app.topic_input = LineInput::new(&topic);
        app.start_quiz(&topic, None, None);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Content(content) => app.on_content(content),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Dashboard => handle_dashboard_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Plan => handle_plan_key(app, key),
        AppScreen::Material => handle_material_key(app, key),
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    if app.input_active {
        match app.topic_input.handle_key(key) {
            InputResult::Submit => {
                app.input_active = false;
                let topic = app.topic_input.value().to_string();
                app.start_quiz(&topic, None, None);
            }
            InputResult::Cancel => app.input_active = false,
            InputResult::Continue => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('t') => app.input_active = true,
        KeyCode::Char('s') | KeyCode::Enter => {
            let topic = app.topic_input.value().to_string();
            app.start_quiz(&topic, None, None);
        }
        KeyCode::Char('g') => app.generate_plan(),
        KeyCode::Char('p') => app.open_plan(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let phase = app.session.as_ref().map(|s| s.phase);
    match phase {
        Some(QuizPhase::Answering) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.select_option(-1),
            KeyCode::Down | KeyCode::Char('j') => app.select_option(1),
            KeyCode::Enter => app.submit_selected(),
            KeyCode::Char(ch @ '1'..='9') => {
                app.submit_answer(ch as usize - '1' as usize);
            }
            KeyCode::Esc => app.end_quiz(),
            _ => {}
        },
        Some(QuizPhase::Feedback { .. }) => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.advance_question(),
            KeyCode::Esc => app.end_quiz(),
            _ => {}
        },
        // Blocked wait: only bailing out is possible.
        Some(QuizPhase::Loading) | None => {
            if key.code == KeyCode::Esc {
                app.end_quiz();
            }
        }
    }
}

fn handle_plan_key(app: &mut App, key: KeyEvent) {
    let day_count = app.plan.as_ref().map(|p| p.days.len()).unwrap_or(0);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Dashboard,
        KeyCode::Down | KeyCode::Char('j') => {
            if day_count > 0 {
                app.plan_selected = (app.plan_selected + 1).min(day_count - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.plan_selected = app.plan_selected.saturating_sub(1);
        }
        KeyCode::Enter => app.open_plan_day(app.plan_selected),
        _ => {}
    }
}

fn handle_material_key(app: &mut App, key: KeyEvent) {
    let popup_open = app
        .material
        .as_ref()
        .is_some_and(|m| m.explaining || m.explanation.is_some());
    if popup_open {
        if key.code == KeyCode::Esc {
            if let Some(material) = &mut app.material {
                material.explaining = false;
                material.explanation = None;
            }
        }
        return;
    }

    let paragraph_count = app
        .material
        .as_ref()
        .map(|m| m.paragraphs.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc => {
            app.material = None;
            app.screen = AppScreen::Plan;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(material) = &mut app.material {
                if paragraph_count > 0 {
                    material.selected = (material.selected + 1).min(paragraph_count - 1);
                }
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(material) = &mut app.material {
                material.selected = material.selected.saturating_sub(1);
            }
        }
        KeyCode::Char('e') => app.explain_selection(),
        KeyCode::Enter => app.start_material_quiz(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Dashboard => {
            let dashboard = Dashboard {
                profile: &app.profile,
                topic_input: &app.topic_input,
                input_active: app.input_active,
                plan: app.plan.as_ref(),
                last_summary: app.last_summary.as_deref(),
                status_line: app.status_line.as_deref(),
                theme: app.theme,
            };
            frame.render_widget(dashboard, area);
        }
        AppScreen::Quiz => {
            if let Some(session) = &app.session {
                let view = QuizView {
                    session,
                    selected: app.quiz_selected,
                    theme: app.theme,
                };
                frame.render_widget(view, area);
            }
        }
        AppScreen::Plan => {
            if let Some(plan) = &app.plan {
                let view = PlanView {
                    plan,
                    selected: app.plan_selected,
                    theme: app.theme,
                };
                frame.render_widget(view, area);
            }
        }
        AppScreen::Material => {
            if let Some(material) = &app.material {
                let view = MaterialView {
                    title: &material.title,
                    paragraphs: &material.paragraphs,
                    selected: material.selected,
                    loading: material.loading,
                    explanation: material.explanation.as_deref(),
                    explaining: material.explaining,
                    theme: app.theme,
                };
                frame.render_widget(view, area);
            }
        }
    }
}
