//! Application configuration
//!
//! Built once at startup from the process environment and passed by
//! reference to everything that needs it.

use std::env;
use std::path::PathBuf;

use super::error::{AgentError, AgentResult};
use crate::agent::DEFAULT_SYSTEM_PROMPT;

/// Environment variable holding the identity that authorizes each service
pub const USER_ID_VAR: &str = "ARCADE_USER_ID";
/// Environment variable holding the model identifier
pub const MODEL_VAR: &str = "OPENAI_MODEL";

const DEFAULT_BROKER_URL: &str = "https://api.arcade.dev";
const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TOOL_LIMIT: usize = 100;
const DEFAULT_MAX_STEPS: usize = 25;
const DEFAULT_SESSION_ID: &str = "1";

/// Tools that write to Confluence and therefore need a human in the loop
pub const DEFAULT_APPROVAL_TOOLS: &[&str] = &[
    "Confluence_CreatePage",
    "Confluence_UpdatePageContent",
    "Confluence_RenamePage",
];

/// Tool broker endpoint settings
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Chat-completions endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Output format for the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory the log files are written to
    pub directory: PathBuf,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            format: LogFormat::Text,
        }
    }
}

/// Everything the session needs, resolved once at process start
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Identity used when listing, authorizing and executing tools
    pub user_id: String,
    /// Toolkits whose tools are all exposed to the agent
    pub toolkits: Vec<String>,
    /// Individual tools exposed in addition to the toolkits
    pub isolated_tools: Vec<String>,
    /// Upper bound on the number of tool definitions fetched
    pub tool_limit: usize,
    /// Conversation key reused by every turn
    pub session_id: String,
    pub system_prompt: String,
    /// Tools whose calls must be approved at the console
    pub approval_tools: Vec<String>,
    /// Model calls allowed per pass before the executor gives up
    pub max_steps: usize,
    pub broker: BrokerConfig,
    pub llm: LlmConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> AgentResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user_id = get(USER_ID_VAR).ok_or_else(|| AgentError::MissingConfig(USER_ID_VAR.into()))?;
        let model = get(MODEL_VAR).ok_or_else(|| AgentError::MissingConfig(MODEL_VAR.into()))?;

        let tool_limit = match get("ARCADE_TOOL_LIMIT") {
            Some(raw) => parse_positive("ARCADE_TOOL_LIMIT", &raw)?,
            None => DEFAULT_TOOL_LIMIT,
        };
        let max_steps = match get("AGENT_MAX_STEPS") {
            Some(raw) => parse_positive("AGENT_MAX_STEPS", &raw)?,
            None => DEFAULT_MAX_STEPS,
        };

        // An explicitly empty list turns approval off, so read it unfiltered.
        let approval_tools = match lookup("AGENT_APPROVAL_TOOLS") {
            Some(raw) => split_list(&raw),
            None => DEFAULT_APPROVAL_TOOLS.iter().map(|s| s.to_string()).collect(),
        };

        let format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AgentError::InvalidConfig(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            user_id,
            toolkits: get("ARCADE_TOOLKITS")
                .map(|raw| split_list(&raw))
                .unwrap_or_else(|| vec!["Confluence".to_string()]),
            isolated_tools: get("ARCADE_ISOLATED_TOOLS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            tool_limit,
            session_id: DEFAULT_SESSION_ID.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            approval_tools,
            max_steps,
            broker: BrokerConfig {
                base_url: get("ARCADE_BASE_URL").unwrap_or_else(|| DEFAULT_BROKER_URL.to_string()),
                api_key: get("ARCADE_API_KEY"),
            },
            llm: LlmConfig {
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_URL.to_string()),
                api_key: get("OPENAI_API_KEY"),
                model,
            },
            log: LogConfig {
                directory: get("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
                format,
            },
        })
    }

    /// The model identifier
    pub fn model(&self) -> &str {
        &self.llm.model
    }
}

/// Load a `.env` file from the working directory into the environment
///
/// Returns the file's path, or `None` when there is no such file.
pub fn load_dotenv() -> AgentResult<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AgentError::InvalidConfig(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive(key: &str, raw: &str) -> AgentResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AgentError::InvalidConfig(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_user_id_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[(MODEL_VAR, "gpt-4o")])).unwrap_err();
        assert!(matches!(err, AgentError::MissingConfig(ref v) if v == USER_ID_VAR));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[(USER_ID_VAR, "me@example.com")])).unwrap_err();
        assert!(matches!(err, AgentError::MissingConfig(ref v) if v == MODEL_VAR));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (USER_ID_VAR, "   "),
            (MODEL_VAR, "gpt-4o"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AgentError::MissingConfig(_)));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (USER_ID_VAR, "me@example.com"),
            (MODEL_VAR, "gpt-4o"),
        ]))
        .unwrap();

        assert_eq!(config.user_id, "me@example.com");
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.toolkits, vec!["Confluence"]);
        assert!(config.isolated_tools.is_empty());
        assert_eq!(config.tool_limit, 100);
        assert_eq!(config.session_id, "1");
        assert_eq!(config.max_steps, 25);
        assert_eq!(config.approval_tools.len(), DEFAULT_APPROVAL_TOOLS.len());
        assert_eq!(config.broker.base_url, "https://api.arcade.dev");
        assert!(config.broker.api_key.is_none());
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (USER_ID_VAR, "me@example.com"),
            (MODEL_VAR, "gpt-4o"),
            ("ARCADE_TOOLKITS", "Confluence, Jira"),
            ("ARCADE_ISOLATED_TOOLS", "Slack.SendMessage"),
            ("ARCADE_TOOL_LIMIT", "10"),
            ("AGENT_APPROVAL_TOOLS", ""),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.toolkits, vec!["Confluence", "Jira"]);
        assert_eq!(config.isolated_tools, vec!["Slack.SendMessage"]);
        assert_eq!(config.tool_limit, 10);
        assert!(config.approval_tools.is_empty());
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_limit() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (USER_ID_VAR, "me@example.com"),
            (MODEL_VAR, "gpt-4o"),
            ("ARCADE_TOOL_LIMIT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfig(_)));
    }
}
