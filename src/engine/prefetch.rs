//! Lookahead buffer between the quiz loop and the content source.
//!
//! The queue hides generation latency: questions are consumed from the
//! front while a single background fetch refills the back before the buffer
//! runs dry. At most one fetch is ever in flight (the guard below), and a
//! consumer blocked on an empty buffer is freed by `reconcile` the moment
//! any batch lands, even if its own request was dropped as a duplicate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::content::{GenerationError, Question, fallback_question};

/// Refill when this many or fewer questions remain unconsumed.
pub const REFILL_THRESHOLD: usize = 4;
/// Questions requested per fetch.
pub const BATCH_SIZE: usize = 5;
/// Answered-question texts echoed back to the source to discourage repeats.
pub const HISTORY_TAIL: usize = 5;

/// What the UI owes the user while content is (or is not) being generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingMode {
    #[default]
    Idle,
    /// A refill is running but a question is on screen; show a small
    /// "generating more" hint only.
    Background,
    /// Nothing to display until a batch lands; show a full spinner.
    Blocked,
}

/// Parameters of a fetch the caller must dispatch to the content source.
/// Emitted by [`PrefetchQueue::request`] only when the single-flight guard
/// was acquired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub topic: String,
    pub level: u8,
    pub recent: Vec<String>,
    pub count: usize,
    pub blocking: bool,
    pub material: Option<String>,
}

#[derive(Debug, Default)]
pub struct PrefetchQueue {
    items: VecDeque<Question>,
    /// Single-flight guard: true from request acquisition until the fetch's
    /// completion is processed. An explicit flag rather than a length
    /// check, because an empty queue cannot tell "idle" from "refilling".
    in_flight: AtomicBool,
    loading: LoadingMode,
}

impl PrefetchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loading(&self) -> LoadingMode {
        self.loading
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Try to start a fetch. Returns the request to dispatch if the guard
    /// was acquired; a duplicate is dropped (not queued) and returns None.
    ///
    /// A dropped *blocking* request still raises the loading mode to
    /// Blocked: the consumer has nothing to show and no callback of its own
    /// coming, so it waits for the in-flight fetch and relies on
    /// [`reconcile`](Self::reconcile) for delivery.
    pub fn request(
        &mut self,
        topic: &str,
        level: u8,
        recent: Vec<String>,
        count: usize,
        blocking: bool,
        material: Option<String>,
    ) -> Option<FetchRequest> {
        debug_assert!(count > 0);
        if blocking {
            self.loading = LoadingMode::Blocked;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("fetch already in flight, dropping request (blocking={blocking})");
            return None;
        }
        if !blocking && self.loading == LoadingMode::Idle {
            self.loading = LoadingMode::Background;
        }
        Some(FetchRequest {
            topic: topic.to_string(),
            level,
            recent,
            count,
            blocking,
            material,
        })
    }

    /// Fold a finished fetch back in. The guard is released on every path;
    /// a failed batch is replaced by the single fallback question so a
    /// waiting consumer is never stranded. Returns a question only when a
    /// Blocked consumer should be served immediately.
    pub fn complete(
        &mut self,
        result: Result<Vec<Question>, GenerationError>,
    ) -> Option<Question> {
        match result {
            Ok(batch) => {
                debug!("batch of {} appended (queue at {})", batch.len(), self.len());
                self.items.extend(batch);
            }
            Err(err) => {
                warn!("question generation failed, queueing fallback: {err}");
                self.items.push_back(fallback_question());
            }
        }
        self.in_flight.store(false, Ordering::Release);
        if self.loading == LoadingMode::Background {
            self.loading = LoadingMode::Idle;
        }
        self.reconcile()
    }

    /// Pop the next question, if any. An empty queue is the caller's cue to
    /// issue a blocking request.
    pub fn take_next(&mut self) -> Option<Question> {
        self.items.pop_front()
    }

    /// Whether the post-answer refill rule should fire: at or below the
    /// threshold with no fetch already running.
    pub fn refill_needed(&self) -> bool {
        self.items.len() <= REFILL_THRESHOLD && !self.fetch_in_flight()
    }

    /// Invariant repair, run after every queue or loading-mode mutation: a
    /// Blocked consumer plus a non-empty queue means the front item must be
    /// surfaced right now and the spinner dropped.
    pub fn reconcile(&mut self) -> Option<Question> {
        if self.loading == LoadingMode::Blocked {
            if let Some(question) = self.items.pop_front() {
                self.loading = LoadingMode::Idle;
                return Some(question);
            }
        }
        None
    }

    /// Session reset: drop buffered questions and all in-flight bookkeeping.
    /// Does not (and cannot) abort a running fetch; its completion must be
    /// discarded upstream if the topic changed.
    pub fn clear(&mut self) {
        self.items.clear();
        self.in_flight.store(false, Ordering::Release);
        self.loading = LoadingMode::Idle;
    }
}
