use std::time::Duration;

use serde_json::{Value, json};

use crate::config::Config;
use crate::content::{GenerationError, PlanDayOutline, Question, prompt};

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
/// Calls run on short-lived worker threads (see `App::dispatch_fetch`), so
/// blocking here never stalls the event loop.
pub struct ContentClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ContentClient {
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn chat(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?;
        let value: Value = response.json()?;
        prompt::extract_message(&value)
    }

    pub fn generate_questions(
        &self,
        topic: &str,
        level: u8,
        recent: &[String],
        count: usize,
        material: Option<&str>,
    ) -> Result<Vec<Question>, GenerationError> {
        debug_assert!(count > 0);
        let text = self.chat(&prompt::questions_prompt(
            topic, level, recent, count, material,
        ))?;
        prompt::parse_questions(&text)
    }

    pub fn generate_plan(
        &self,
        topic: &str,
        level: u8,
    ) -> Result<Vec<PlanDayOutline>, GenerationError> {
        let text = self.chat(&prompt::plan_prompt(topic, level))?;
        prompt::parse_plan(&text)
    }

    pub fn generate_material(
        &self,
        topic: &str,
        sub_topic: &str,
        focus: &str,
        level: u8,
    ) -> Result<String, GenerationError> {
        let text = self.chat(&prompt::material_prompt(topic, sub_topic, focus, level))?;
        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }

    pub fn explain_selection(
        &self,
        selected: &str,
        topic: &str,
    ) -> Result<String, GenerationError> {
        // The UI caps selections at 200 chars; enforce it here too so the
        // prompt stays bounded no matter the caller.
        let clipped: String = selected.chars().take(200).collect();
        let text = self.chat(&prompt::explain_prompt(&clipped, topic))?;
        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }
}
