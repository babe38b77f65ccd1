use std::path::PathBuf;

use gemini_designer::GeminiConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:8080,http://127.0.0.1:8080,http://localhost:3000,http://127.0.0.1:3000";

/// Server settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origins allowed by CORS; empty means any
    pub allowed_origins: Vec<String>,
    /// Built frontend to serve for unmatched paths
    pub static_dir: Option<PathBuf>,
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    pub fn new(gemini: GeminiConfig) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            static_dir: None,
            gemini,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(GeminiConfig::from_env()?);
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }
        config.static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
        Ok(config)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new(GeminiConfig::new("key".to_string()));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.allowed_origins.contains(&"http://localhost:8080".to_string()));
        assert!(config.static_dir.is_none());
    }
}
