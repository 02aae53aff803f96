//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and shared read-only through `AppState`.

use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project hosting the Firestore database
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Base URL of the OpenAI-compatible chat completions API
    pub llm_base_url: String,
    /// Chat model used for workout recommendations
    pub llm_model: String,
    /// Upper bound on a single recommendation call
    pub llm_timeout_secs: u64,
    /// Token signing algorithm (HMAC family)
    pub jwt_algorithm: Algorithm,
    /// `iss` claim for issued tokens
    pub jwt_issuer: String,
    /// Lifetime of access tokens
    pub access_token_expire_minutes: i64,
    /// Enable the log-backed mail notifier
    pub mail_notifications: bool,

    // --- Secrets ---
    /// API key for the LLM provider
    pub llm_api_key: String,
    /// JWT signing key (raw bytes)
    pub jwt_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_algorithm = match env::var("JWT_ALGORITHM") {
            Ok(raw) => parse_algorithm(raw.trim())?,
            Err(_) => Algorithm::HS256,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            llm_base_url: env::var("LLM_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", 60)?,
            jwt_algorithm,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "posture-perfect".to_string()),
            access_token_expire_minutes: parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            mail_notifications: env::var("MAIL_NOTIFICATIONS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),

            llm_api_key: env::var("APP_LLM_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("APP_LLM_KEY"))?,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            llm_base_url: "http://127.0.0.1:9".to_string(),
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 5,
            jwt_algorithm: Algorithm::HS256,
            jwt_issuer: "posture-perfect".to_string(),
            access_token_expire_minutes: 30,
            mail_notifications: false,
            llm_api_key: "test_llm_key".to_string(),
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Only shared-secret algorithms make sense with a single `JWT_SECRET`.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(raw) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::Invalid("JWT_ALGORITHM", raw.to_string())),
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
