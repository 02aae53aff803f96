// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LLM client for workout recommendations.
//!
//! Handles:
//! - Prompt composition from a stored profile
//! - A single chat-completion call (no retries)
//! - Extraction and schema validation of the returned plan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::plan::{validate_plan, ExerciseEntry};
use crate::models::{Profile, EXERCISES};
use crate::time_utils::calculate_age;

const SYSTEM_PROMPT: &str = "You are a knowledgeable and experienced fitness coach.";

/// Chat-completion client for an OpenAI-compatible API.
#[derive(Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl RecommendationClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.llm_base_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    /// Send `prompt` to the model and return the raw reply text.
    pub async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Recommendation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Recommendation(format!("HTTP {}: {}", status, body)));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Recommendation(format!("Malformed completion: {}", e)))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Recommendation("Completion had no content".to_string()))
    }

    /// Generate and validate a plan for `profile` as of `today`.
    pub async fn recommend_plan(
        &self,
        profile: &Profile,
        today: NaiveDate,
    ) -> Result<Vec<ExerciseEntry>, AppError> {
        let age = calculate_age(profile.date_of_birth, today);
        let prompt = build_prompt(profile, age);

        tracing::debug!(email = %profile.email, age, model = %self.model, "Requesting workout plan");

        let reply = self.ask(&prompt).await?;
        let plan = parse_plan(&reply)?;

        tracing::info!(email = %profile.email, entries = plan.len(), "Workout plan generated");
        Ok(plan)
    }
}

/// Compose the recommendation prompt for a profile.
pub fn build_prompt(profile: &Profile, age: i32) -> String {
    format!(
        "Create a weekly workout plan for the following person.\n\
         Gender: {gender}\n\
         Age: {age} years\n\
         Weight: {weight} kg\n\
         Height: {height} cm\n\
         Primary goal: {goal}\n\
         Past exercise frequency: {history}\n\
         Preferred intensity: {intensity}\n\
         Preferred workout duration: {duration}\n\
         Workout days: {days}\n\
         Preferred time of day: {time_of_day}\n\
         \n\
         Use only these exercises, each at least once: {exercises}.\n\
         Schedule exercises only on the workout days listed above. Keep the total duration \
         of all exercises in the plan equal to the preferred workout duration.\n\
         Respond with only a JSON array and no other text. Each element must be an object \
         with the keys \"exercise_name\" (string), \"exercise_reps\" (integer), \
         \"exercise_sets\" (integer), \"duration\" (string) and \"day\" (string).",
        gender = profile.gender,
        age = age,
        weight = profile.weight,
        height = profile.height,
        goal = profile.goal,
        history = profile.exercise_history,
        intensity = profile.intensity,
        duration = profile.duration,
        days = profile.workout_days,
        time_of_day = profile.workout_time_of_day,
        exercises = EXERCISES.join(", "),
    )
}

/// Extract the plan array from a model reply and validate it.
///
/// Tolerates Markdown code fences and prose around the array.
pub fn parse_plan(reply: &str) -> Result<Vec<ExerciseEntry>, AppError> {
    let start = reply.find('[');
    let end = reply.rfind(']');

    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(AppError::InvalidPlan(
                "reply does not contain a JSON array".to_string(),
            ))
        }
    };

    let plan: Vec<ExerciseEntry> =
        serde_json::from_str(json).map_err(|e| AppError::InvalidPlan(e.to_string()))?;

    validate_plan(&plan).map_err(|e| AppError::InvalidPlan(e.to_string()))?;

    Ok(plan)
}
