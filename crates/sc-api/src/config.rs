//! Chat API server configuration.
//!
//! Loaded from an optional TOML file (`SC_CONFIG`), then overridden by
//! environment variables. Missing credentials are not an error here; the
//! shared client initializer reports them on first use.

use std::path::Path;

use anyhow::Context;
use sc_pipeline::PipelineSettings;
use sc_pipeline::intent::IntentMode;
use sc_pipeline::llm::OpenAiConfig;
use serde::Deserialize;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "SC_CONFIG";

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL.
    #[serde(default)]
    pub database_url: Option<String>,
    /// OpenAI API key.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ApiConfig {
    /// File (if `SC_CONFIG` is set) plus process environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value {port:?}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = var("CHAT_MODEL") {
            self.openai.chat_model = model;
        }
        if let Some(model) = var("EMBEDDING_MODEL") {
            self.openai.embedding_model = model;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(mode) = var("INTENT_MODE") {
            self.pipeline.intent_mode = IntentMode::parse(&mode)
                .with_context(|| format!("unknown INTENT_MODE {mode:?}, expected llm or keywords"))?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            openai_api_key: None,
            cors_origins: vec![],
            openai: OpenAiConfig::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai.chat_model, "gpt-4o-mini");
        assert_eq!(config.pipeline.intent_mode, IntentMode::Llm);
        assert_eq!(config.pipeline.retrieval.doc_count, 5);
    }

    #[test]
    fn toml_sections() {
        let config: ApiConfig = toml::from_str(
            r#"
            port = 8080
            cors_origins = ["https://showcase.example"]

            [openai]
            chat_model = "gpt-4o"

            [pipeline]
            intent_mode = "keywords"

            [pipeline.retrieval]
            match_threshold = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, ["https://showcase.example"]);
        assert_eq!(config.openai.chat_model, "gpt-4o");
        assert_eq!(config.openai.embedding_model, "text-embedding-3-small");
        assert_eq!(config.pipeline.intent_mode, IntentMode::Keywords);
        assert_eq!(config.pipeline.retrieval.match_threshold, 0.2);
        assert_eq!(config.pipeline.retrieval.product_count, 3);
    }

    #[test]
    fn env_overrides() {
        let mut config = ApiConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "8081"),
                ("DATABASE_URL", "postgres://localhost/showcase"),
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
                ("CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("INTENT_MODE", "rules"),
            ]))
            .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/showcase"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai.base_url, "http://localhost:9000/v1");
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
        assert_eq!(config.pipeline.intent_mode, IntentMode::Keywords);
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ApiConfig::default();
        config
            .apply_env(env(&[("OPENAI_API_KEY", "  "), ("HOST", "")]))
            .unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn invalid_env_values_are_errors() {
        let mut config = ApiConfig::default();
        assert!(config.apply_env(env(&[("PORT", "http")])).is_err());
        assert!(config.apply_env(env(&[("INTENT_MODE", "magic")])).is_err());
    }
}
