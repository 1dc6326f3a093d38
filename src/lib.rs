// Library target exists so integration tests can exercise the session and
// queue machinery via `quizdr::…`. The binary entry point is main.rs; this
// file re-declares the module tree. Some items are only reachable through
// the binary, so suppress dead_code warnings here.
#![allow(dead_code)]

// Public: exercised directly by integration tests
pub mod content;
pub mod engine;
pub mod session;
pub mod store;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod logging;
mod ui;
