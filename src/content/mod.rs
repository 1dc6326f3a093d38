pub mod client;
pub mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One multiple-choice question as produced by the content source.
/// Immutable once generated; consumed (and dropped) by the quiz session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`. Four options in practice, but nothing
    /// downstream depends on the exact count.
    pub answer: usize,
    pub explanation: String,
    #[serde(default)]
    pub sub_topic: String,
}

impl Question {
    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.answer
    }
}

/// One day of a generated study plan, before any progression state is
/// attached (see `engine::plan` for the status ladder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDayOutline {
    pub day: u32,
    pub topic: String,
    pub focus: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("empty response")]
    Empty,
    #[error("content client unavailable")]
    Unavailable,
}

/// Fixed substitute used when a question batch fails entirely. Served as a
/// batch of size 1 so a pending consumer always receives something.
pub fn fallback_question() -> Question {
    Question {
        prompt: "题目生成失败，请检查网络连接。准备好后选择“继续练习”。".to_string(),
        options: vec![
            "继续练习".to_string(),
            "稍后再试".to_string(),
            "检查网络".to_string(),
            "返回首页".to_string(),
        ],
        answer: 0,
        explanation: "本题为占位题：内容服务暂时不可用，回答任意选项即可继续。".to_string(),
        sub_topic: "系统".to_string(),
    }
}

pub const FALLBACK_MATERIAL: &str = "学习资料生成失败，请返回后重试。";
pub const FALLBACK_EXPLANATION: &str = "解释生成失败，请稍后重试。";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_question_is_answerable() {
        let q = fallback_question();
        assert!(!q.options.is_empty());
        assert!(q.answer < q.options.len());
        assert!(q.is_correct(q.answer));
    }

    #[test]
    fn question_serde_round_trip() {
        let q = Question {
            prompt: "What is ownership?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: 2,
            explanation: "because".to_string(),
            sub_topic: "memory".to_string(),
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }

    #[test]
    fn sub_topic_defaults_when_missing() {
        let json = r#"{"prompt":"p","options":["a","b"],"answer":1,"explanation":"e"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.sub_topic, "");
    }
}
