//! Prompt construction and response parsing for the chat-completion API.
//!
//! Every operation asks the model for strict JSON and parses it here; the
//! client never surfaces raw model text to the rest of the app except for
//! material and explanations, which are consumed as plain prose.

use serde_json::Value;

use crate::content::{GenerationError, PlanDayOutline, Question};

pub fn questions_prompt(
    topic: &str,
    level: u8,
    recent: &[String],
    count: usize,
    material: Option<&str>,
) -> String {
    let mut prompt = match material {
        Some(text) => format!(
            "You are a quiz author. Based STRICTLY on the study material below, \
             write {count} multiple-choice questions. Do not use outside knowledge; \
             every answer must be verifiable from the material.\n\
             Difficulty: {level}/100.\n\nMaterial:\n{text}\n"
        ),
        None => format!(
            "You are a quiz author. Write {count} multiple-choice questions about \
             \"{topic}\" at difficulty {level}/100 (0 = beginner, 100 = expert).\n"
        ),
    };
    if !recent.is_empty() {
        prompt.push_str("\nAvoid repeating the subject matter of these recent questions:\n");
        for text in recent {
            prompt.push_str("- ");
            prompt.push_str(text);
            prompt.push('\n');
        }
    }
    prompt.push_str(
        "\nRespond with a JSON array only, no surrounding prose. Each element:\n\
         {\"prompt\": str, \"options\": [str, str, str, str], \"answer\": int (0-3), \
         \"explanation\": str, \"sub_topic\": str}\n",
    );
    prompt
}

pub fn plan_prompt(topic: &str, level: u8) -> String {
    format!(
        "Design a 5-day study plan for \"{topic}\" for a learner at difficulty \
         {level}/100. Respond with a JSON array of exactly 5 elements, no prose:\n\
         {{\"day\": int (1-5), \"topic\": str, \"focus\": str, \
         \"activities\": [str, ...]}}\n"
    )
}

pub fn material_prompt(topic: &str, sub_topic: &str, focus: &str, level: u8) -> String {
    format!(
        "Write a concise study text in markdown about \"{sub_topic}\" \
         (part of \"{topic}\"), focused on: {focus}. Target a learner at \
         difficulty {level}/100. 300-500 words, headings and short paragraphs."
    )
}

pub fn explain_prompt(selected: &str, topic: &str) -> String {
    format!(
        "In the context of studying \"{topic}\", explain the following passage \
         in 2-3 plain sentences:\n\n{selected}"
    )
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_questions(raw: &str) -> Result<Vec<Question>, GenerationError> {
    let questions: Vec<Question> = serde_json::from_str(strip_fences(raw))
        .map_err(|e| GenerationError::Parse(e.to_string()))?;
    if questions.is_empty() {
        return Err(GenerationError::Empty);
    }
    for q in &questions {
        if q.options.is_empty() || q.answer >= q.options.len() {
            return Err(GenerationError::Parse(format!(
                "answer index {} out of range for {} options",
                q.answer,
                q.options.len()
            )));
        }
    }
    Ok(questions)
}

pub fn parse_plan(raw: &str) -> Result<Vec<PlanDayOutline>, GenerationError> {
    let days: Vec<PlanDayOutline> = serde_json::from_str(strip_fences(raw))
        .map_err(|e| GenerationError::Parse(e.to_string()))?;
    if days.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(days)
}

/// Pull the assistant message text out of a chat-completion response body.
pub fn extract_message(body: &Value) -> Result<String, GenerationError> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| GenerationError::Parse("no message content in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_plain_fence() {
        assert_eq!(strip_fences("```\n[1]\n```"), "[1]");
    }

    #[test]
    fn strips_fence_with_language_tag() {
        assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(strip_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn parses_question_batch() {
        let raw = r#"[
            {"prompt": "2+2?", "options": ["3", "4", "5", "6"], "answer": 1,
             "explanation": "basic addition", "sub_topic": "arithmetic"}
        ]"#;
        let qs = parse_questions(raw).unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].answer, 1);
        assert_eq!(qs[0].sub_topic, "arithmetic");
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let raw = r#"[{"prompt": "p", "options": ["a", "b"], "answer": 2, "explanation": "e"}]"#;
        assert!(matches!(
            parse_questions(raw),
            Err(GenerationError::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_batch() {
        assert!(matches!(parse_questions("[]"), Err(GenerationError::Empty)));
    }

    #[test]
    fn rejects_empty_plan() {
        assert!(matches!(parse_plan("[]"), Err(GenerationError::Empty)));
    }

    #[test]
    fn extracts_chat_message() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        });
        assert_eq!(extract_message(&body).unwrap(), "hello");
    }

    #[test]
    fn missing_message_is_parse_error() {
        let body = json!({"choices": []});
        assert!(extract_message(&body).is_err());
    }

    #[test]
    fn comprehension_prompt_forbids_outside_knowledge() {
        let p = questions_prompt("rust", 50, &[], 5, Some("Borrowing rules..."));
        assert!(p.contains("STRICTLY"));
        assert!(p.contains("Borrowing rules..."));
    }

    #[test]
    fn history_tail_is_listed() {
        let recent = vec!["old question".to_string()];
        let p = questions_prompt("rust", 50, &recent, 5, None);
        assert!(p.contains("- old question"));
    }
}
