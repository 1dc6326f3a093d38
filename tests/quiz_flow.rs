//! End-to-end session flow against scripted batches, no network involved:
//! the tests play the role of the dispatch loop, completing each emitted
//! `FetchRequest` by hand.

use quizdr::content::{GenerationError, Question};
use quizdr::engine::difficulty::next_level;
use quizdr::engine::prefetch::{BATCH_SIZE, FetchRequest, REFILL_THRESHOLD};
use quizdr::session::quiz::{QuizPhase, QuizSession};

fn question(n: usize) -> Question {
    Question {
        prompt: format!("question {n}"),
        options: vec![
            "option a".to_string(),
            "option b".to_string(),
            "option c".to_string(),
            "option d".to_string(),
        ],
        answer: 0,
        explanation: format!("explanation {n}"),
        sub_topic: format!("sub {n}"),
    }
}

fn batch(from: usize, count: usize) -> Vec<Question> {
    (from..from + count).map(question).collect()
}

/// Serve a session's emitted request, if any, with `count` questions
/// starting at `from`.
fn serve(session: &mut QuizSession, request: Option<FetchRequest>, from: usize, count: usize) {
    if request.is_some() {
        session.on_batch(Ok(batch(from, count)));
    }
}

#[test]
fn full_session_levels_follow_the_difficulty_rule() {
    let (mut session, initial) = QuizSession::start("ownership in rust", None, None, None);
    assert!(initial.blocking);
    session.on_batch(Ok(batch(0, BATCH_SIZE)));

    // Answer 10 questions, alternating correct and incorrect, serving any
    // refill the session asks for along the way.
    let mut expected = 50u8;
    let mut next_id = BATCH_SIZE;
    for i in 0..10 {
        assert_eq!(session.phase, QuizPhase::Answering, "question {i}");
        let correct = i % 2 == 0;
        let chosen = if correct { 0 } else { 1 };
        let refill = session.submit_answer(chosen);
        expected = next_level(expected, correct);
        assert_eq!(session.level, expected, "after answer {i}");

        serve(&mut session, refill, next_id, BATCH_SIZE);
        next_id += BATCH_SIZE;
        session.advance();
    }

    assert_eq!(session.answered(), 10);
    assert_eq!(session.correct_count(), 5);
    assert_eq!(
        session.records.len(),
        10,
        "log is append-only, one entry per answer"
    );
    // Levels chain: each record's before equals the previous record's after.
    for pair in session.records.windows(2) {
        assert_eq!(pair[0].level_after, pair[1].level_before);
    }
}

#[test]
fn refill_fires_exactly_once_at_the_threshold() {
    let (mut session, _) = QuizSession::start("topic", None, None, None);
    session.on_batch(Ok(batch(0, 8)));

    // Buffer: 7 after the first question is presented. Answer until the
    // buffer reaches the threshold; no refill before that point.
    let mut refills = 0;
    for _ in 0..3 {
        if session.submit_answer(0).is_some() {
            refills += 1;
        }
        session.advance();
    }
    assert_eq!(refills, 0, "above threshold, no refill");
    assert_eq!(session.queue.len(), REFILL_THRESHOLD);

    let refill = session.submit_answer(0).expect("refill at threshold");
    assert_eq!(refill.count, BATCH_SIZE);
    assert!(!refill.blocking);

    // While that fetch is outstanding every further answer stays quiet.
    session.advance();
    assert!(session.submit_answer(0).is_none());
}

#[test]
fn blocked_wait_recovers_from_an_overlapping_background_fetch() {
    let (mut session, _) = QuizSession::start("topic", None, None, None);
    session.on_batch(Ok(batch(0, 2)));

    // First answer drains the queue to 1 and triggers a background refill.
    let refill = session.submit_answer(0);
    assert!(refill.is_some());
    session.advance();

    // Second answer: queue empty, fetch still in flight, so advancing must
    // block without issuing a second request (single-flight).
    session.submit_answer(0);
    let request = session.advance();
    assert!(request.is_none());
    assert_eq!(session.phase, QuizPhase::Loading);

    // The background batch lands: the blocked wait resolves by itself.
    session.on_batch(Ok(batch(10, BATCH_SIZE)));
    assert_eq!(session.phase, QuizPhase::Answering);
    assert_eq!(session.current.as_ref().unwrap().prompt, "question 10");
    assert!(!session.queue.fetch_in_flight());
}

#[test]
fn repeated_failures_degrade_to_single_fallback_questions() {
    let (mut session, _) = QuizSession::start("topic", None, None, None);

    // Every fetch fails; the session must still hand the user one playable
    // question per round trip and never wedge the guard.
    for round in 0..3 {
        session.on_batch(Err(GenerationError::Empty));
        assert_eq!(session.phase, QuizPhase::Answering, "round {round}");
        assert!(!session.queue.fetch_in_flight());

        let q = session.current.clone().unwrap();
        let refill = session.submit_answer(q.answer);
        // Queue is empty, well below threshold: the refill fires each time.
        assert!(refill.is_some(), "round {round}");
        let request = session.advance();
        assert!(request.is_none(), "refill already in flight");
        assert_eq!(session.phase, QuizPhase::Loading);
    }
    assert_eq!(session.answered(), 3);
}

#[test]
fn history_tail_never_exceeds_five_entries() {
    let (mut session, _) = QuizSession::start("topic", None, None, None);
    session.on_batch(Ok(batch(0, 6)));

    let mut last_request = None;
    for _ in 0..8 {
        if let Some(req) = session.submit_answer(0) {
            last_request = Some(req);
            // Complete each refill with a single question so the queue
            // hovers at the threshold and keeps triggering.
            session.on_batch(Ok(batch(100, 1)));
        }
        session.advance();
    }
    let request = last_request.expect("at least one refill fired");
    assert_eq!(session.answered(), 8);
    assert_eq!(request.recent.len(), 5, "tail capped at five");
    assert!(request.recent.iter().all(|t| t.starts_with("question")));
}
