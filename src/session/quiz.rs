//! Per-session quiz state.
//!
//! Everything one quiz run owns lives in this value object: topic, the
//! difficulty estimate, the prefetch queue, the append-only answer log and
//! the per-question phase. The app holds at most one `QuizSession` and
//! drops it wholesale on exit, which is what makes a topic change safe
//! while a fetch is still in flight.

use chrono::{DateTime, Utc};

use crate::content::Question;
use crate::engine::difficulty::{self, BASELINE_LEVEL};
use crate::engine::plan::MIN_ANSWERS_PER_DAY;
use crate::engine::prefetch::{BATCH_SIZE, FetchRequest, HISTORY_TAIL, PrefetchQueue};

/// Fine-grained state of the question currently on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    /// No question available; a blocking fetch is pending.
    Loading,
    Answering,
    Feedback { chosen: usize, correct: bool },
}

/// Append-only log entry, one per answered question. The question texts of
/// the last few entries are echoed to the content source to steer it away
/// from repeats.
#[derive(Clone, Debug)]
pub struct AnswerRecord {
    pub question: String,
    pub chosen: usize,
    pub correct_index: usize,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
    pub level_before: u8,
    pub level_after: u8,
}

pub struct QuizSession {
    pub topic: String,
    pub level: u8,
    pub queue: PrefetchQueue,
    pub records: Vec<AnswerRecord>,
    pub current: Option<Question>,
    pub phase: QuizPhase,
    /// Present for comprehension quizzes launched from study material;
    /// forwarded on every fetch so refills stay grounded in the text.
    pub material_context: Option<String>,
    /// Set when the quiz was launched from a plan day; routes the exit
    /// back to the plan and enables day completion.
    pub plan_day: Option<usize>,
}

impl QuizSession {
    /// Start a session and return the initial blocking fetch to dispatch.
    /// `carry_level` continues an existing topic session; otherwise the
    /// estimate starts at the baseline.
    pub fn start(
        topic: &str,
        carry_level: Option<u8>,
        material_context: Option<String>,
        plan_day: Option<usize>,
    ) -> (Self, FetchRequest) {
        let mut session = Self {
            topic: topic.to_string(),
            level: carry_level.unwrap_or(BASELINE_LEVEL),
            queue: PrefetchQueue::new(),
            records: Vec::new(),
            current: None,
            phase: QuizPhase::Loading,
            material_context,
            plan_day,
        };
        let request = session
            .queue
            .request(
                &session.topic,
                session.level,
                Vec::new(),
                BATCH_SIZE,
                true,
                session.material_context.clone(),
            )
            .expect("fresh queue has no fetch in flight");
        (session, request)
    }

    /// Question texts of the most recent answers, oldest first.
    pub fn recent_texts(&self) -> Vec<String> {
        self.records
            .iter()
            .rev()
            .take(HISTORY_TAIL)
            .rev()
            .map(|r| r.question.clone())
            .collect()
    }

    fn present(&mut self, question: Question) {
        self.current = Some(question);
        self.phase = QuizPhase::Answering;
    }

    /// Record an answer. Accepted exactly once per question: a second
    /// submission while feedback is on screen is rejected. Returns a
    /// background refill request when the post-answer queue is at or below
    /// the threshold and nothing is already in flight.
    pub fn submit_answer(&mut self, chosen: usize) -> Option<FetchRequest> {
        if self.phase != QuizPhase::Answering {
            return None;
        }
        let question = self.current.as_ref()?;
        if chosen >= question.options.len() {
            return None;
        }

        let correct = question.is_correct(chosen);
        let level_before = self.level;
        self.level = difficulty::next_level(level_before, correct);
        self.records.push(AnswerRecord {
            question: question.prompt.clone(),
            chosen,
            correct_index: question.answer,
            correct,
            answered_at: Utc::now(),
            level_before,
            level_after: self.level,
        });
        self.phase = QuizPhase::Feedback { chosen, correct };

        // Refill check runs synchronously with the post-update level.
        if self.queue.refill_needed() {
            return self.queue.request(
                &self.topic,
                self.level,
                self.recent_texts(),
                BATCH_SIZE,
                false,
                self.material_context.clone(),
            );
        }
        None
    }

    /// Move past the feedback screen. Serves the next question from the
    /// buffer with no visible latency when it can; otherwise enters the
    /// Loading phase and returns a blocking fetch to dispatch (None when an
    /// in-flight fetch already covers it and delivery happens via
    /// `on_batch`'s reconcile).
    pub fn advance(&mut self) -> Option<FetchRequest> {
        if !matches!(self.phase, QuizPhase::Feedback { .. }) {
            return None;
        }
        if let Some(question) = self.queue.take_next() {
            self.present(question);
            return None;
        }
        self.current = None;
        self.phase = QuizPhase::Loading;
        self.queue.request(
            &self.topic,
            self.level,
            self.recent_texts(),
            BATCH_SIZE,
            true,
            self.material_context.clone(),
        )
    }

    /// Fold a completed fetch into the queue; if the reconciler frees a
    /// blocked wait, the delivered question goes on screen immediately.
    pub fn on_batch(&mut self, result: Result<Vec<Question>, crate::content::GenerationError>) {
        if let Some(question) = self.queue.complete(result) {
            self.present(question);
        }
    }

    pub fn answered(&self) -> usize {
        self.records.len()
    }

    pub fn correct_count(&self) -> usize {
        self.records.iter().filter(|r| r.correct).count()
    }

    /// Plan days require a minimum amount of practice before completion.
    pub fn meets_day_quota(&self) -> bool {
        self.records.len() >= MIN_ANSWERS_PER_DAY
    }
}
