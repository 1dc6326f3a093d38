use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::content::{GenerationError, PlanDayOutline, Question};

/// Results delivered out of band by content-fetch worker threads. Each
/// carries enough of its origin (topic, and for batches the session
/// generation) so stale completions can be discarded at the app boundary.
pub enum ContentEvent {
    Batch {
        topic: String,
        /// Session generation the fetch was dispatched for. A batch whose
        /// generation no longer matches belongs to an ended session, even
        /// when the topic is the same, and must not touch the live queue.
        generation: u64,
        result: Result<Vec<Question>, GenerationError>,
    },
    Plan {
        topic: String,
        result: Result<Vec<PlanDayOutline>, GenerationError>,
    },
    Material {
        topic: String,
        day_index: usize,
        result: Result<String, GenerationError>,
    },
    Explanation {
        result: Result<String, GenerationError>,
    },
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    Content(ContentEvent),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if input_tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if input_tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Cloneable sender handed to fetch worker threads.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
