use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use log::{debug, warn};

use crate::config::Config;
use crate::content::client::ContentClient;
use crate::content::{FALLBACK_EXPLANATION, FALLBACK_MATERIAL, GenerationError};
use crate::engine::plan::StudyPlan;
use crate::engine::prefetch::FetchRequest;
use crate::event::{AppEvent, ContentEvent};
use crate::session::quiz::{QuizPhase, QuizSession};
use crate::store::json_store::JsonStore;
use crate::store::schema::ProfileData;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Plan,
    Material,
    Quiz,
}

/// Study-material screen state (loading / ready plus the explanation popup).
pub struct MaterialState {
    pub title: String,
    pub day_index: usize,
    pub raw: String,
    pub paragraphs: Vec<String>,
    pub selected: usize,
    pub loading: bool,
    pub explaining: bool,
    pub explanation: Option<String>,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub profile: ProfileData,
    pub session: Option<QuizSession>,
    pub quiz_selected: usize,
    pub plan: Option<StudyPlan>,
    pub plan_selected: usize,
    pub plan_generating: bool,
    pub material: Option<MaterialState>,
    pub topic_input: LineInput,
    pub input_active: bool,
    pub last_summary: Option<String>,
    pub status_line: Option<String>,
    pub should_quit: bool,
    /// Level carried over when the same topic is studied again (plain quiz
    /// restarts and successive plan days share one estimate).
    level_memory: Option<(String, u8)>,
    /// Bumped on every session start and stamped onto each batch fetch. A
    /// completion from a dead session of the same topic must not release
    /// the live session's fetch guard, so topic alone cannot gate routing.
    session_gen: u64,
    content: Option<Arc<ContentClient>>,
    events_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(events_tx: mpsc::Sender<AppEvent>) -> Self {
        let config = Config::load().unwrap_or_default();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let store = JsonStore::new().ok();
        let mut profile = store
            .as_ref()
            .map(|s| s.load_profile())
            .unwrap_or_default();

        // Daily check-in happens once, at startup.
        if profile.check_in(Utc::now().date_naive()) {
            if let Some(ref s) = store {
                let _ = s.save_profile(&profile);
            }
        }

        let content = ContentClient::new(&config).ok().map(Arc::new);
        if content.is_none() {
            warn!("content client failed to initialize; generation will fall back");
        }

        Self {
            screen: AppScreen::Dashboard,
            config,
            theme,
            store,
            profile,
            session: None,
            quiz_selected: 0,
            plan: None,
            plan_selected: 0,
            plan_generating: false,
            material: None,
            topic_input: LineInput::new(""),
            input_active: false,
            last_summary: None,
            status_line: None,
            should_quit: false,
            level_memory: None,
            session_gen: 0,
            content,
            events_tx,
        }
    }

    // --- quiz lifecycle ---

    /// Start a quiz session. Carries the remembered level when the topic
    /// matches the previous session; otherwise starts at the baseline.
    pub fn start_quiz(
        &mut self,
        topic: &str,
        material_context: Option<String>,
        plan_day: Option<usize>,
    ) {
        let topic = topic.trim();
        if topic.is_empty() {
            self.status_line = Some("Enter a topic first".to_string());
            return;
        }
        let carry = self
            .level_memory
            .as_ref()
            .filter(|(t, _)| t.as_str() == topic)
            .map(|(_, level)| *level);

        let (session, request) = QuizSession::start(topic, carry, material_context, plan_day);
        self.session_gen = self.session_gen.wrapping_add(1);
        self.session = Some(session);
        self.quiz_selected = 0;
        self.status_line = None;
        self.screen = AppScreen::Quiz;
        self.dispatch_batch(request);
    }

    pub fn select_option(&mut self, delta: isize) {
        let Some(session) = &self.session else { return };
        let Some(question) = &session.current else { return };
        if session.phase != QuizPhase::Answering {
            return;
        }
        let len = question.options.len() as isize;
        let next = (self.quiz_selected as isize + delta).rem_euclid(len);
        self.quiz_selected = next as usize;
    }

    pub fn submit_selected(&mut self) {
        self.submit_answer(self.quiz_selected);
    }

    pub fn submit_answer(&mut self, chosen: usize) {
        let Some(session) = &mut self.session else { return };
        if let Some(refill) = session.submit_answer(chosen) {
            self.dispatch_batch(refill);
        }
    }

    pub fn advance_question(&mut self) {
        let Some(session) = &mut self.session else { return };
        let request = session.advance();
        self.quiz_selected = 0;
        if let Some(request) = request {
            self.dispatch_batch(request);
        }
    }

    /// End the active session: remember the level for the topic, record a
    /// recap, and (for plan-day quizzes with enough answers) complete the
    /// day. The queue is dropped with the session; an in-flight fetch is
    /// left to finish and its completion discarded as stale.
    pub fn end_quiz(&mut self) {
        let Some(session) = self.session.take() else { return };
        self.level_memory = Some((session.topic.clone(), session.level));
        self.last_summary = Some(format!(
            "Last session: {} — {}/{} correct, level {}",
            session.topic,
            session.correct_count(),
            session.answered(),
            session.level
        ));

        match session.plan_day {
            Some(day_index) => {
                if session.meets_day_quota() {
                    if let Some(plan) = &mut self.plan {
                        if plan.complete_day(day_index) {
                            self.status_line = Some(format!("Day {} completed!", day_index + 1));
                        }
                    }
                } else {
                    self.status_line =
                        Some("Answer at least 3 questions to complete the day".to_string());
                }
                self.material = None;
                self.screen = AppScreen::Plan;
            }
            None => self.screen = AppScreen::Dashboard,
        }
    }

    // --- plan lifecycle ---

    pub fn generate_plan(&mut self) {
        let topic = self.topic_input.value().trim().to_string();
        if topic.is_empty() {
            self.status_line = Some("Enter a topic first".to_string());
            return;
        }
        if self.plan_generating {
            return;
        }
        self.plan_generating = true;
        self.status_line = Some(format!("Generating a study plan for “{topic}”…"));

        let level = self
            .level_memory
            .as_ref()
            .filter(|(t, _)| *t == topic)
            .map(|(_, l)| *l)
            .unwrap_or(crate::engine::difficulty::BASELINE_LEVEL);
        let client = self.content.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let result = match client {
                Some(client) => client.generate_plan(&topic, level),
                None => Err(GenerationError::Unavailable),
            };
            let _ = tx.send(AppEvent::Content(ContentEvent::Plan { topic, result }));
        });
    }

    pub fn open_plan(&mut self) {
        if self.plan.is_some() {
            self.plan_selected = self
                .plan
                .as_ref()
                .and_then(|p| p.current_index())
                .unwrap_or(0);
            self.screen = AppScreen::Plan;
        }
    }

    /// Enter a plan day: locked days are a no-op, anything else fetches its
    /// study material and opens the material screen in its loading state.
    pub fn open_plan_day(&mut self, index: usize) {
        let Some(plan) = &self.plan else { return };
        if !plan.can_start(index) {
            debug!("ignoring start request for locked day {index}");
            return;
        }
        let Some(day) = plan.day(index) else { return };

        self.material = Some(MaterialState {
            title: format!("Day {} — {}", day.day, day.topic),
            day_index: index,
            raw: String::new(),
            paragraphs: Vec::new(),
            selected: 0,
            loading: true,
            explaining: false,
            explanation: None,
        });
        self.screen = AppScreen::Material;

        let plan_topic = plan.topic.clone();
        let sub_topic = day.topic.clone();
        let focus = day.focus.clone();
        let level = self
            .level_memory
            .as_ref()
            .filter(|(t, _)| *t == plan_topic)
            .map(|(_, l)| *l)
            .unwrap_or(crate::engine::difficulty::BASELINE_LEVEL);
        let client = self.content.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let result = match client {
                Some(client) => client.generate_material(&plan_topic, &sub_topic, &focus, level),
                None => Err(GenerationError::Unavailable),
            };
            let _ = tx.send(AppEvent::Content(ContentEvent::Material {
                topic: plan_topic,
                day_index: index,
                result,
            }));
        });
    }

    /// Launch the comprehension quiz for the material on screen.
    pub fn start_material_quiz(&mut self) {
        let Some(material) = &self.material else { return };
        if material.loading {
            return;
        }
        let Some(plan) = &self.plan else { return };
        let topic = plan.topic.clone();
        let context = material.raw.clone();
        let day_index = material.day_index;
        self.start_quiz(&topic, Some(context), Some(day_index));
    }

    /// Ask for an AI explanation of the selected paragraph (clipped to 200
    /// chars at the content boundary).
    pub fn explain_selection(&mut self) {
        let Some(plan) = &self.plan else { return };
        let topic = plan.topic.clone();
        let Some(material) = &mut self.material else { return };
        if material.loading || material.explaining {
            return;
        }
        let Some(selected) = material.paragraphs.get(material.selected) else {
            return;
        };
        material.explaining = true;
        material.explanation = None;

        let selected = selected.clone();
        let client = self.content.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let result = match client {
                Some(client) => client.explain_selection(&selected, &topic),
                None => Err(GenerationError::Unavailable),
            };
            let _ = tx.send(AppEvent::Content(ContentEvent::Explanation { result }));
        });
    }

    // --- content completions ---

    pub fn on_content(&mut self, event: ContentEvent) {
        match event {
            ContentEvent::Batch {
                topic,
                generation,
                result,
            } => {
                if generation != self.session_gen {
                    warn!("discarding batch from an ended session (topic {topic:?})");
                    return;
                }
                match &mut self.session {
                    Some(session) if session.topic == topic => session.on_batch(result),
                    _ => warn!("discarding batch for inactive topic {topic:?}"),
                }
            }
            ContentEvent::Plan { topic, result } => {
                self.plan_generating = false;
                match result {
                    Ok(outline) => {
                        self.plan = Some(StudyPlan::new(&topic, outline));
                        self.plan_selected = 0;
                        self.status_line = None;
                        self.screen = AppScreen::Plan;
                    }
                    Err(err) => {
                        warn!("plan generation failed: {err}");
                        self.status_line =
                            Some("Plan generation failed — press [g] to retry".to_string());
                    }
                }
            }
            ContentEvent::Material {
                topic,
                day_index,
                result,
            } => {
                let active_topic = self.plan.as_ref().map(|p| p.topic.clone());
                let Some(material) = &mut self.material else {
                    warn!("discarding material for closed screen ({topic})");
                    return;
                };
                if material.day_index != day_index || active_topic.as_deref() != Some(&topic) {
                    warn!("discarding stale material for {topic:?} day {day_index}");
                    return;
                }
                let text = match result {
                    Ok(text) => text,
                    Err(err) => {
                        warn!("material generation failed: {err}");
                        FALLBACK_MATERIAL.to_string()
                    }
                };
                material.paragraphs = split_paragraphs(&text);
                material.raw = text;
                material.selected = 0;
                material.loading = false;
            }
            ContentEvent::Explanation { result } => {
                let Some(material) = &mut self.material else { return };
                if !material.explaining {
                    return;
                }
                material.explaining = false;
                material.explanation = Some(match result {
                    Ok(text) => text,
                    Err(err) => {
                        warn!("explanation failed: {err}");
                        FALLBACK_EXPLANATION.to_string()
                    }
                });
            }
        }
    }

    fn dispatch_batch(&self, request: FetchRequest) {
        let client = self.content.clone();
        let tx = self.events_tx.clone();
        let generation = self.session_gen;
        thread::spawn(move || {
            let result = match client {
                Some(client) => client.generate_questions(
                    &request.topic,
                    request.level,
                    &request.recent,
                    request.count,
                    request.material.as_deref(),
                ),
                None => Err(GenerationError::Unavailable),
            };
            let _ = tx.send(AppEvent::Content(ContentEvent::Batch {
                topic: request.topic,
                generation,
                result,
            }));
        });
    }
}

/// Split material text on blank lines into explainable paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Question;

    /// App wired to a throwaway channel, no store and no content client,
    /// so completions can be injected directly through `on_content`.
    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let app = App {
            screen: AppScreen::Dashboard,
            config: Config::default(),
            theme: Box::leak(Box::new(Theme::default())),
            store: None,
            profile: ProfileData::default(),
            session: None,
            quiz_selected: 0,
            plan: None,
            plan_selected: 0,
            plan_generating: false,
            material: None,
            topic_input: LineInput::new(""),
            input_active: false,
            last_summary: None,
            status_line: None,
            should_quit: false,
            level_memory: None,
            session_gen: 0,
            content: None,
            events_tx: tx,
        };
        (app, rx)
    }

    fn sample_batch() -> Vec<Question> {
        vec![Question {
            prompt: "what is a trait".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: 0,
            explanation: String::new(),
            sub_topic: String::new(),
        }]
    }

    #[test]
    fn batch_from_an_ended_session_of_the_same_topic_is_discarded() {
        let (mut app, _rx) = test_app();
        app.start_quiz("rust", None, None);
        let old_gen = app.session_gen;
        app.end_quiz();
        app.start_quiz("rust", None, None);

        // The restarted session's own blocking fetch holds the guard.
        assert!(app.session.as_ref().unwrap().queue.fetch_in_flight());

        // The dead session's fetch lands late: same topic, old generation.
        // It must not touch the live queue or release the live guard.
        app.on_content(ContentEvent::Batch {
            topic: "rust".to_string(),
            generation: old_gen,
            result: Ok(sample_batch()),
        });
        let session = app.session.as_ref().unwrap();
        assert!(
            session.queue.fetch_in_flight(),
            "guard belongs to the new session's fetch"
        );
        assert_eq!(session.phase, QuizPhase::Loading);
        assert!(session.queue.is_empty());

        // The live fetch's completion routes through as usual.
        app.on_content(ContentEvent::Batch {
            topic: "rust".to_string(),
            generation: app.session_gen,
            result: Ok(sample_batch()),
        });
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.phase, QuizPhase::Answering);
        assert!(!session.queue.fetch_in_flight());
    }

    #[test]
    fn batch_for_another_topic_is_discarded() {
        let (mut app, _rx) = test_app();
        app.start_quiz("rust", None, None);

        app.on_content(ContentEvent::Batch {
            topic: "go".to_string(),
            generation: app.session_gen,
            result: Ok(sample_batch()),
        });
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.phase, QuizPhase::Loading);
        assert!(session.queue.is_empty());
    }

    #[test]
    fn split_paragraphs_drops_blank_chunks() {
        let parts = split_paragraphs("# Title\n\nFirst para.\n\n\n\nSecond para.\n");
        assert_eq!(parts, vec!["# Title", "First para.", "Second para."]);
    }
}
