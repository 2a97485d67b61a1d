use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::{BotError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub line: LineConfig,
    pub server: ServerConfig,
    pub counter: CounterConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineConfig {
    pub access_token: String,
    pub channel_secret: String,
    pub verify_signature: bool,
    /// Upper bound on each Messaging API call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind: String,
    pub webhook_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CounterConfig {
    pub target_phrase: String,
    pub stats_command: String,
    pub cooldown_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line: LineConfig {
                access_token: String::new(),
                channel_secret: String::new(),
                verify_signature: true,
                request_timeout_seconds: default_request_timeout(),
            },
            server: ServerConfig {
                bind: "0.0.0.0:5000".to_string(),
                webhook_path: "/callback".to_string(),
            },
            counter: CounterConfig {
                target_phrase: "我拉屎了".to_string(),
                stats_command: "/要幾次".to_string(),
                cooldown_minutes: 10,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("."),
            },
        }
    }
}

impl Config {
    pub fn load_or_create(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| BotError::Config(format!("Failed to read config file: {}", e)))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| BotError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Created default config at {}", path);
            Ok(config)
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BotError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| BotError::Config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Secrets from the environment take precedence over the file.
    pub fn apply_env(&mut self) {
        if let Ok(token) = env::var("LINE_ACCESS_TOKEN") {
            self.line.access_token = token;
        }
        if let Ok(secret) = env::var("LINE_SECRET") {
            self.line.channel_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.line.access_token.trim().is_empty() {
            return Err(BotError::Config(
                "LINE access token is missing (set LINE_ACCESS_TOKEN)".to_string(),
            ));
        }
        if self.line.verify_signature && self.line.channel_secret.is_empty() {
            return Err(BotError::Config(
                "Signature verification needs a channel secret (set LINE_SECRET)".to_string(),
            ));
        }
        if self.line.request_timeout_seconds == 0 {
            return Err(BotError::Config("Request timeout must be positive".to_string()));
        }
        if self.counter.target_phrase.is_empty() {
            return Err(BotError::Config("Target phrase must not be empty".to_string()));
        }
        if self.counter.cooldown_minutes < 0 {
            return Err(BotError::Config("Cooldown must not be negative".to_string()));
        }
        Ok(())
    }
}
