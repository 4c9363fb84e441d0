use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

pub const DEFAULT_INPUT_FILE: &str = "weekly_report_input_template.yaml";
pub const DEFAULT_TEMPLATE_FILE: &str = "Weekly_Report_Template.docx";

/// Application configuration loaded from environment variables.
/// Every variable is optional; a malformed value fails at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub rust_log: String,
    /// YAML file read for defaults and written back when `persist_yaml` is set.
    pub input_file: PathBuf,
    pub persist_yaml: bool,
    pub template_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
            rust_log: "info".to_string(),
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            persist_yaml: false,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let debug = match lookup("DEBUG") {
            Some(value) => parse_bool("DEBUG", &value)?,
            None => match lookup("FLASK_DEBUG") {
                Some(value) => parse_bool("FLASK_DEBUG", &value)?,
                None => false,
            },
        };
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let persist_yaml = match lookup("WEEKLY_REPORT_PERSIST_YAML") {
            Some(value) => parse_bool("WEEKLY_REPORT_PERSIST_YAML", &value)?,
            None => false,
        };

        Ok(Config {
            host: non_empty(lookup("HOST")).unwrap_or(defaults.host),
            port,
            debug,
            rust_log: non_empty(lookup("RUST_LOG"))
                .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string()),
            input_file: non_empty(lookup("WEEKLY_REPORT_INPUT_FILE"))
                .map(PathBuf::from)
                .unwrap_or(defaults.input_file),
            persist_yaml,
            template_path: non_empty(lookup("WEEKLY_REPORT_TEMPLATE"))
                .map(PathBuf::from)
                .unwrap_or(defaults.template_path),
            openai_api_key: non_empty(lookup("OPENAI_API_KEY")),
            openai_base_url: non_empty(lookup("OPENAI_BASE_URL")).unwrap_or(defaults.openai_base_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts the usual spellings of a boolean flag; anything else is a startup error.
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" | "" => Ok(false),
        other => bail!("{key} must be a boolean flag, got '{other}'"),
    }
}
