//! Runtime configuration parsed from environment variables.
//!
//! Loading never fails: a missing API key disables the assistant features and
//! malformed numbers fall back to their defaults.

use std::path::PathBuf;

pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_VISION_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const API_KEY_VARS: [&str; 3] = ["GREENLAND_AI_API_KEY", "GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeouts: AiTimeouts,
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl AiConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ai: AiConfig,
    pub data_dir: PathBuf,
}

impl Config {
    /// Build config from the process environment.
    ///
    /// - `GREENLAND_AI_API_KEY` (else `GEMINI_API_KEY`, else `API_KEY`)
    /// - `GREENLAND_AI_BASE_URL`
    /// - `GREENLAND_AI_TEXT_MODEL`, `GREENLAND_AI_VISION_MODEL`
    /// - `GREENLAND_AI_TIMEOUT_SECS`: default 60
    /// - `GREENLAND_CONNECT_TIMEOUT_SECS`: default 10
    /// - `GREENLAND_DATA_DIR`: default `<data dir>/greenland`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parse_u64 = |key: &str, default: u64| {
            non_empty(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        let api_key = API_KEY_VARS.iter().find_map(|var| non_empty(var));
        let base_url = non_empty("GREENLAND_AI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let ai = AiConfig {
            api_key,
            base_url,
            text_model: non_empty("GREENLAND_AI_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: non_empty("GREENLAND_AI_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            timeouts: AiTimeouts {
                request_secs: parse_u64("GREENLAND_AI_TIMEOUT_SECS", DEFAULT_AI_TIMEOUT_SECS),
                connect_secs: parse_u64("GREENLAND_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        };

        let data_dir = non_empty("GREENLAND_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self { ai, data_dir }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("greenland")
}
